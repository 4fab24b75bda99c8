//! Dictionary-driven skill extraction.
//!
//! Matching rule: a keyword's normalized form must appear in the normalized
//! résumé as a whole-token run; keywords of six or more characters may also
//! match as a plain substring (`python` in `python3`). Shorter keywords stay
//! token-bound so `go` does not fire on `google` nor `java` on `javascript`.

use std::collections::HashSet;

use crate::cv::dictionaries::{INDUSTRY_SKILLS, SOFT_SKILLS};
use crate::cv::language::Language;
use crate::normalize::{normalize, truncate_chars};

pub const MAX_SKILL_CHARS: usize = 200;
const SUBSTRING_MIN_LEN: usize = 6;

/// Byte position of the first occurrence of `keyword` in `text`, or `None`.
/// Both must be normalized.
pub fn keyword_position(text: &str, keyword: &str) -> Option<usize> {
    if keyword.is_empty() {
        return None;
    }
    let padded = format!(" {text} ");
    let token_hit = padded.find(&format!(" {keyword} "));
    if token_hit.is_some() || keyword.len() < SUBSTRING_MIN_LEN {
        return token_hit;
    }
    text.find(keyword)
}

#[derive(Debug, Clone, PartialEq)]
struct Hit {
    display: String,
    position: usize,
    order: usize,
}

fn ordered_unique(mut hits: Vec<Hit>, cap: usize) -> Vec<String> {
    // first-seen in the résumé; dictionary order breaks ties
    hits.sort_by_key(|h| (h.position, h.order));
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|h| seen.insert(normalize(&h.display)))
        .map(|h| truncate_chars(&h.display, MAX_SKILL_CHARS))
        .take(cap)
        .collect()
}

/// Technical skills across every industry table.
pub fn extract_skills(normalized_text: &str, cap: usize) -> Vec<String> {
    let hits = INDUSTRY_SKILLS
        .iter()
        .flat_map(|(_, skills)| skills.iter())
        .enumerate()
        .filter_map(|(order, skill)| {
            keyword_position(normalized_text, &normalize(skill)).map(|position| Hit {
                display: (*skill).to_string(),
                position,
                order,
            })
        })
        .collect();
    ordered_unique(hits, cap)
}

/// Soft skills, reported in the CV's language whichever form matched.
pub fn extract_soft_skills(normalized_text: &str, language: Language, cap: usize) -> Vec<String> {
    let hits = SOFT_SKILLS
        .iter()
        .enumerate()
        .filter_map(|(order, (es, en))| {
            let position = [es, en]
                .iter()
                .filter_map(|form| keyword_position(normalized_text, &normalize(form)))
                .min()?;
            let display = match language {
                Language::Spanish => es,
                Language::English => en,
            };
            Some(Hit {
                display: (*display).to_string(),
                position,
                order,
            })
        })
        .collect();
    ordered_unique(hits, cap)
}

/// Industry whose curated list covers the most of `skills`. Ties go to the
/// earlier table entry; `None` when nothing matches.
pub fn infer_industry(skills: &[String]) -> Option<String> {
    let extracted: HashSet<String> = skills.iter().map(|s| normalize(s)).collect();

    let mut best: Option<(&str, usize)> = None;
    for (industry, list) in INDUSTRY_SKILLS {
        let count = list
            .iter()
            .filter(|s| extracted.contains(&normalize(s)))
            .count();
        if count > 0 && best.map_or(true, |(_, c)| count > c) {
            best = Some((industry, count));
        }
    }
    best.map(|(industry, _)| industry.to_string())
}
