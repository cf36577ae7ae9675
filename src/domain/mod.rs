pub mod types;

pub use types::{
    preview, Category, ClassificationResult, ClassificationSource, EmailOutcome, KeywordKind,
    KeywordMatch, SessionResult,
};
