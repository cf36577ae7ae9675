use once_cell::sync::Lazy;
use regex::Regex;

static HEADER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(from|to|subject|date|cc|bcc|de|para|assunto|data):.*$")
        .expect("valid header regex")
});
static SENT_FROM_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*sent from .*$").expect("valid sent-from regex"));
static SEPARATOR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*_{8,}[ \t]*$").expect("valid separator regex"));
static SIGNATURE_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?ms)^--[ \t]*$.*").expect("valid signature regex"));
static CLOSING_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ims)^[ \t]*(atenciosamente|cordialmente|abraços|grande abraço|att|best regards|kind regards|regards|sincerely|cheers)[ \t]*[,.!]?[ \t]*$.*",
    )
    .expect("valid closing regex")
});
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

pub fn normalize(raw: &str) -> String {
    let raw = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = HEADER_LINE.replace_all(&raw, "");
    let text = SENT_FROM_LINE.replace_all(&text, "");
    let text = SEPARATOR_LINE.replace_all(&text, "");
    let text = SIGNATURE_DELIMITER.replace(&text, "");
    let text = CLOSING_BLOCK.replace(&text, "");
    collapse_whitespace(&text)
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

pub fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}
