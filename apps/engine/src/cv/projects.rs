use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cv::contact::is_contact_line;
use crate::cv::dictionaries::PROJECT_INDICATORS;
use crate::cv::sections::{detect_header, strip_bullet};
use crate::normalize::{contains_phrase, normalize, truncate_chars};

pub const MAX_PROJECT_CHARS: usize = 2000;
/// A sentence must be longer than this to count as a project.
const MIN_PROJECT_CHARS: usize = 20;
/// Candidates sharing this many leading normalized characters are duplicates.
const DEDUP_PREFIX_CHARS: usize = 50;

// Terminator followed by whitespace, so `Node.js` and `v2.1` stay whole.
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?;]+\s+").expect("sentence regex"));

static INDICATORS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut seen = HashSet::new();
    PROJECT_INDICATORS
        .iter()
        .map(|w| normalize(w))
        .filter(|w| seen.insert(w.clone()))
        .collect()
});

fn sentences(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && detect_header(l).is_none() && !is_contact_line(l))
        .flat_map(|line| {
            SENTENCE_END
                .split(strip_bullet(line))
                .map(|s| s.trim().trim_end_matches(['.', '!', '?', ';']).trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_project_sentence(sentence: &str) -> bool {
    if sentence.chars().count() <= MIN_PROJECT_CHARS {
        return false;
    }
    let norm = normalize(sentence);
    INDICATORS.iter().any(|w| contains_phrase(&norm, w))
}

/// Sentences that describe projects, in document order.
pub fn extract_projects(text: &str, cap: usize) -> Vec<String> {
    let mut prefixes = HashSet::new();
    sentences(text)
        .into_iter()
        .filter(|s| is_project_sentence(s))
        .map(|s| truncate_chars(&s, MAX_PROJECT_CHARS))
        .filter(|s| prefixes.insert(truncate_chars(&normalize(s), DEDUP_PREFIX_CHARS)))
        .take(cap)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_indicator_sentences() {
        let text = "Me gusta el café. Desarrollé una API REST con FastAPI y PostgreSQL. Vivo en CDMX.";
        assert_eq!(
            extract_projects(text, 10),
            vec!["Desarrollé una API REST con FastAPI y PostgreSQL"]
        );
    }

    #[test]
    fn test_short_sentences_rejected() {
        assert!(extract_projects("Proyecto X.", 10).is_empty());
    }

    #[test]
    fn test_dotted_tokens_do_not_split() {
        let projects = extract_projects("Built a dashboard with Node.js and React for sales data", 10);
        assert_eq!(projects, vec!["Built a dashboard with Node.js and React for sales data"]);
    }

    #[test]
    fn test_dedup_by_prefix_and_cap() {
        let text = "\
- Desarrollé un sistema de inventarios para una tienda local de barrio con Django
- Desarrollé un sistema de inventarios para una tienda local de barrio con Flask
- Implementé una plataforma de reservas para el laboratorio de la facultad
- Creé una aplicación móvil para registrar asistencia de alumnos en clase";
        let projects = extract_projects(text, 10);
        assert_eq!(projects.len(), 3);
        assert!(projects[0].ends_with("Django"));

        assert_eq!(extract_projects(text, 2).len(), 2);
    }

    #[test]
    fn test_truncates_long_projects() {
        let text = format!("Proyecto de {}", "x".repeat(3000));
        let projects = extract_projects(&text, 1);
        assert_eq!(projects[0].chars().count(), MAX_PROJECT_CHARS);
    }

    #[test]
    fn test_headers_and_contact_lines_skipped() {
        let text = "PROYECTOS\nproyectos@ejemplo.com proyecto de correo masivo\n";
        assert!(extract_projects(text, 10).is_empty());
    }
}
