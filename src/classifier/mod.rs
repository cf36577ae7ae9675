mod fallback;
mod gate;
pub mod keywords;
pub mod labels;
mod normalize;
mod pipeline;

pub use normalize::{normalize, token_count};
pub use pipeline::{EmailClassifier, MIN_TOKENS};
