//! Per-section heuristics for the structured (Harvard-style) CV fields.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cv::contact::is_contact_line;
use crate::cv::dictionaries::{
    CERTIFICATION_KEYWORDS, DEGREE_KEYWORDS, LANGUAGE_LEVELS, LANGUAGE_NAMES, SENIORITY_KEYWORDS,
    UNIVERSITY_KEYWORDS,
};
use crate::cv::sections::{paragraphs, strip_bullet, SectionKind, SectionedCv};
use crate::cv::{EducationEntry, ExperienceEntry};
use crate::normalize::{contains_phrase, normalize, truncate_chars};

pub const MAX_EDUCATION: usize = 3;
pub const MAX_EXPERIENCE: usize = 4;
pub const MAX_CERTIFICATIONS: usize = 5;
pub const MAX_LANGUAGES: usize = 5;
pub const MAX_OBJECTIVE_CHARS: usize = 500;
const MAX_ITEM_CHARS: usize = 200;
const MAX_DESCRIPTION_CHARS: usize = 2000;
/// Shortest preamble paragraph that can seed the objective.
const MIN_OBJECTIVE_CHARS: usize = 40;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("year regex"));

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b((?:19|20)\d{2})\s*[–—\-/]\s*(presente|actual|present|current|(?:19|20)\d{2})?")
        .expect("date range regex")
});

fn has_keyword(line: &str, keywords: &[&str]) -> bool {
    let norm = normalize(line);
    keywords.iter().any(|k| contains_phrase(&norm, k))
}

fn clean(line: &str) -> String {
    strip_bullet(line).to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Objective
// ────────────────────────────────────────────────────────────────────────────

/// OBJECTIVE section body when present, otherwise the first substantive
/// preamble paragraph after the contact block.
pub fn extract_objective(cv: &SectionedCv) -> Option<String> {
    let body = if cv.has(SectionKind::Objective) {
        paragraphs(&cv.lines_of(SectionKind::Objective))
            .into_iter()
            .map(|p| p.join(" "))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        paragraphs(&cv.preamble)
            .into_iter()
            .map(|p| {
                p.into_iter()
                    .filter(|l| !is_contact_line(l))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .find(|text| text.chars().count() >= MIN_OBJECTIVE_CHARS)
            .unwrap_or_default()
    };

    let body = body.trim();
    (!body.is_empty()).then(|| truncate_chars(body, MAX_OBJECTIVE_CHARS))
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

/// Splits section lines into rows: blank lines separate rows, and a second
/// institution line inside one paragraph starts a new row.
fn education_rows(lines: &[String]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for paragraph in paragraphs(lines) {
        let mut current: Vec<String> = Vec::new();
        for line in paragraph {
            let starts_new = has_keyword(&line, UNIVERSITY_KEYWORDS)
                && current.iter().any(|l| has_keyword(l, UNIVERSITY_KEYWORDS));
            if starts_new {
                rows.push(std::mem::take(&mut current));
            }
            current.push(clean(&line));
        }
        if !current.is_empty() {
            rows.push(current);
        }
    }
    rows
}

fn field_of_study(degree_line: &str) -> Option<String> {
    let start = [" en ", " in ", " of "]
        .iter()
        .filter_map(|sep| degree_line.find(sep).map(|i| i + sep.len()))
        .min()?;
    let rest = &degree_line[start..];
    let end = rest
        .find(|c: char| matches!(c, ',' | '|' | '(' | '–' | '—') || c.is_ascii_digit())
        .unwrap_or(rest.len());
    let field = rest[..end].trim().trim_end_matches('-').trim();
    (!field.is_empty()).then(|| truncate_chars(field, MAX_ITEM_CHARS))
}

pub fn extract_education(cv: &SectionedCv) -> Vec<EducationEntry> {
    education_rows(&cv.lines_of(SectionKind::Education))
        .into_iter()
        .filter(|row| {
            row.iter()
                .any(|l| has_keyword(l, UNIVERSITY_KEYWORDS) || has_keyword(l, DEGREE_KEYWORDS))
        })
        .filter_map(|row| {
            let institution = row
                .iter()
                .find(|l| !l.is_empty() && !YEAR_RE.is_match(l) || has_keyword(l, UNIVERSITY_KEYWORDS))?
                .clone();
            let degree = row.iter().find(|l| has_keyword(l, DEGREE_KEYWORDS)).cloned();
            let field = degree.as_deref().and_then(field_of_study);
            let graduation_year = row
                .iter()
                .flat_map(|l| YEAR_RE.find_iter(l))
                .filter_map(|m| m.as_str().parse::<i32>().ok())
                .max();

            Some(EducationEntry {
                institution: truncate_chars(&institution, MAX_ITEM_CHARS),
                degree: degree.map(|d| truncate_chars(&d, MAX_ITEM_CHARS)),
                field_of_study: field,
                graduation_year,
            })
        })
        .take(MAX_EDUCATION)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

fn without_dates(line: &str) -> String {
    DATE_RANGE_RE
        .replace_all(line, "")
        .trim()
        .trim_matches(|c: char| matches!(c, '|' | ',' | '-' | '–' | '—' | '·' | '(' | ')') || c.is_whitespace())
        .to_string()
}

pub fn extract_experience(cv: &SectionedCv) -> Vec<ExperienceEntry> {
    paragraphs(&cv.lines_of(SectionKind::Experience))
        .into_iter()
        .filter_map(|row| {
            let caps = row.iter().find_map(|l| DATE_RANGE_RE.captures(l))?;
            let start_date = caps.get(1).map(|m| m.as_str().to_string());
            let end_date = caps.get(2).map(|m| m.as_str().to_string());

            let mut header = Vec::new();
            let mut description = Vec::new();
            for line in &row {
                let bulleted = strip_bullet(line).len() != line.trim().len();
                let text = without_dates(strip_bullet(line));
                if text.is_empty() {
                    continue;
                }
                if header.len() < 2 && !bulleted {
                    header.push(text);
                } else {
                    description.push(text);
                }
            }

            let mut header = header.into_iter();
            let position = header.next().unwrap_or_default();
            let company = header.next();
            let description = description.join(" ");

            Some(ExperienceEntry {
                position: truncate_chars(&position, MAX_ITEM_CHARS),
                company: company.map(|c| truncate_chars(&c, MAX_ITEM_CHARS)),
                start_date,
                end_date,
                description: (!description.is_empty())
                    .then(|| truncate_chars(&description, MAX_DESCRIPTION_CHARS)),
            })
        })
        .take(MAX_EXPERIENCE)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Certifications & languages
// ────────────────────────────────────────────────────────────────────────────

/// Every line of a CERTIFICATIONS section; without one, any line carrying a
/// certification keyword.
pub fn extract_certifications(cv: &SectionedCv, text: &str) -> Vec<String> {
    let candidates: Vec<String> = if cv.has(SectionKind::Certifications) {
        cv.lines_of(SectionKind::Certifications)
    } else {
        text.lines()
            .filter(|l| has_keyword(l, CERTIFICATION_KEYWORDS))
            .map(String::from)
            .collect()
    };

    let mut seen = std::collections::HashSet::new();
    candidates
        .iter()
        .map(|l| clean(l))
        .filter(|l| !l.is_empty() && seen.insert(normalize(l)))
        .map(|l| truncate_chars(&l, MAX_ITEM_CHARS))
        .take(MAX_CERTIFICATIONS)
        .collect()
}

fn level_at(tokens: &[&str], i: usize) -> Option<(&'static str, usize)> {
    LANGUAGE_LEVELS.iter().find_map(|(key, display)| {
        let parts: Vec<&str> = key.split(' ').collect();
        let end = i + parts.len();
        (end <= tokens.len() && tokens[i..end] == parts[..]).then_some((*display, parts.len()))
    })
}

/// Language names paired with the level word that follows them, e.g.
/// `Inglés (B2)`.
pub fn extract_languages(cv: &SectionedCv, text: &str) -> Vec<String> {
    let source = if cv.has(SectionKind::Languages) {
        cv.lines_of(SectionKind::Languages).join("\n")
    } else {
        text.to_string()
    };

    let mut found: Vec<(&'static str, Option<&'static str>)> = Vec::new();
    for line in source.lines() {
        let norm = normalize(line);
        let tokens: Vec<&str> = norm.split(' ').filter(|t| !t.is_empty()).collect();
        // index into `found` of the language still waiting for a level
        let mut pending: Option<usize> = None;
        let mut i = 0;
        while i < tokens.len() {
            if let Some(&(_, name)) = LANGUAGE_NAMES.iter().find(|(key, _)| *key == tokens[i]) {
                pending = match found.iter().position(|(n, _)| *n == name) {
                    Some(existing) => Some(existing),
                    None => {
                        found.push((name, None));
                        Some(found.len() - 1)
                    }
                };
                i += 1;
            } else if let Some((level, width)) = level_at(&tokens, i) {
                if let Some(idx) = pending.take() {
                    found[idx].1.get_or_insert(level);
                }
                i += width;
            } else {
                i += 1;
            }
        }
    }

    found
        .into_iter()
        .take(MAX_LANGUAGES)
        .map(|(name, level)| match level {
            Some(level) => format!("{name} ({level})"),
            None => name.to_string(),
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Seniority
// ────────────────────────────────────────────────────────────────────────────

/// Keyword tag when one appears, otherwise derived from the number of
/// experience rows.
pub fn infer_seniority(normalized_text: &str, experience: &[ExperienceEntry]) -> String {
    let tagged = SENIORITY_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| contains_phrase(normalized_text, w)))
        .map(|(tag, _)| *tag);

    let tag = tagged.unwrap_or(match experience.len() {
        0 => "intern",
        1 | 2 => "junior",
        _ => "mid",
    });
    tag.to_string()
}
