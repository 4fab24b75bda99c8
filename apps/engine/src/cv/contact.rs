use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("email regex")
});

/// Mexican and international formats: `+52 (55) 1234-5678`, `55 1234 5678`, `5512345678`.
pub static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.\-]?)?(?:\(\d{2,3}\)|\d{2,3})[\s.\-]?\d{3,4}[\s.\-]?\d{4}")
        .expect("phone regex")
});

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(https?://|www\.|linkedin|github\.com)").expect("url regex"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Pulls name, first email and first phone out of the contact block.
pub fn parse_contact(lines: &[String]) -> ContactInfo {
    let joined = lines.join("\n");
    let email = EMAIL_RE.find(&joined).map(|m| m.as_str().to_string());
    let phone = PHONE_RE.find(&joined).map(|m| m.as_str().trim().to_string());

    let name = lines
        .iter()
        .map(|l| l.trim())
        .find(|l| looks_like_name(l))
        .map(String::from);

    ContactInfo { name, email, phone }
}

/// `true` for lines that are contact details rather than prose.
pub fn is_contact_line(line: &str) -> bool {
    EMAIL_RE.is_match(line) || PHONE_RE.is_match(line) || URL_RE.is_match(line)
}

fn looks_like_name(line: &str) -> bool {
    if line.is_empty() || line.chars().count() > 60 || is_contact_line(line) {
        return false;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=6).contains(&words.len())
        && words
            .iter()
            .all(|w| w.chars().all(|c| c.is_alphabetic() || c == '.' || c == '\'' || c == '-'))
}
