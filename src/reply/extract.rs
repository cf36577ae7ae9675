use once_cell::sync::Lazy;
use regex::Regex;

static THINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<think>.*?(</think>|$)").expect("valid think regex"));
static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".+?(?:[.!?]+(?:\s+|$)|$)").expect("valid sentence regex"));
static LEAK_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(let me|let's see|i should|i need to|i will now|i'll start|maybe|perhaps|the user|deixe-me|deixa eu|preciso pensar|talvez|o usuário|a usuária|vou começar|vou escrever|vou responder)\b",
    )
    .expect("valid leak regex")
});
static LEAK_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:(?:okay|ok|alright|so|well|certo|bem|então)\s*[,:]|hmm+\b|hum+\b)")
        .expect("valid opener regex")
});
static GREETING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(prezad[oa]s?|olá|caro|cara|bom dia|boa tarde|boa noite|dear|hello|hi|good morning|good afternoon|good evening)\b",
    )
    .expect("valid greeting regex")
});
static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("valid paragraph regex"));

/// Returns the final message hidden in a raw completion, or an empty string
/// when nothing usable survives the cleanup.
pub fn extract_final_reply(raw: &str) -> String {
    let cleaned = strip_reasoning(raw);

    if let Some(found) = GREETING.find(&cleaned) {
        let from_greeting = cleaned[found.start()..].trim();
        if !from_greeting.is_empty() {
            return from_greeting.to_string();
        }
    }

    let paragraphs: Vec<&str> = BLANK_LINES
        .split(cleaned.trim())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.len() > 1 {
        if let Some(last) = paragraphs.last() {
            return last.to_string();
        }
    }

    cleaned.trim().to_string()
}

pub fn strip_reasoning(raw: &str) -> String {
    let without_think = THINK_BLOCK.replace_all(raw, "");
    let mut lines = Vec::new();
    for line in without_think.lines() {
        if line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let sentences: Vec<&str> = SENTENCE
            .find_iter(line)
            .map(|m| m.as_str().trim())
            .filter(|sentence| !sentence.is_empty())
            .collect();
        if !sentences.iter().any(|sentence| is_leak(sentence)) {
            lines.push(line.trim_end().to_string());
            continue;
        }
        let kept: Vec<&str> = sentences
            .into_iter()
            .filter(|sentence| !is_leak(sentence))
            .collect();
        if !kept.is_empty() {
            lines.push(kept.join(" "));
        }
    }
    collapse_blank_runs(&lines)
}

fn is_leak(sentence: &str) -> bool {
    LEAK_PHRASE.is_match(sentence) || LEAK_OPENER.is_match(sentence)
}

fn collapse_blank_runs(lines: &[String]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.is_empty() && out.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|line| line.is_empty()) {
        out.pop();
    }
    out.join("\n")
}
