use crate::domain::{Category, KeywordMatch};

use super::keywords::KeywordSet;

pub fn fallback(text: &str, keywords: &KeywordSet) -> (Category, Option<KeywordMatch>) {
    match keywords.first_match(text) {
        Some(hit) => (hit.kind.bias(), Some(hit)),
        None => (Category::Improdutivo, None),
    }
}
