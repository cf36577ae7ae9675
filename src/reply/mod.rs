pub mod extract;
mod selector;
pub mod templates;

pub use selector::ResponseSelector;
