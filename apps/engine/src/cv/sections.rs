//! Section splitting: recognizes Harvard-style headers in Spanish and
//! English and groups the lines between consecutive headers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// Longest normalized line still considered a header candidate.
const MAX_HEADER_LEN: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Objective,
    Education,
    Experience,
    Skills,
    Languages,
    Certifications,
    Projects,
}

static HEADER_PATTERNS: Lazy<Vec<(SectionKind, Regex)>> = Lazy::new(|| {
    let table: &[(SectionKind, &str)] = &[
        (
            SectionKind::Objective,
            r"^(objetivo|objetivo profesional|perfil|perfil profesional|resumen|resumen profesional|acerca de mi|sobre mi|objective|career objective|summary|professional summary|profile|about me)$",
        ),
        (
            SectionKind::Education,
            r"^(educacion|formacion|formacion academica|estudios|antecedentes academicos|education|academic background|academic formation)$",
        ),
        (
            SectionKind::Experience,
            r"^(experiencia|experiencia laboral|experiencia profesional|historial laboral|trayectoria profesional|experience|work experience|professional experience|employment history|work history)$",
        ),
        (
            SectionKind::Skills,
            r"^(habilidades|habilidades tecnicas|habilidades y competencias|competencias|conocimientos|conocimientos tecnicos|aptitudes|herramientas|skills|technical skills|competencies|tools)$",
        ),
        (
            SectionKind::Languages,
            r"^(idiomas|lenguas|lenguajes|languages)$",
        ),
        (
            SectionKind::Certifications,
            r"^(certificaciones|certificados|cursos|cursos y certificaciones|certificaciones y cursos|diplomados|certifications|certificates|courses|licenses and certifications)$",
        ),
        (
            SectionKind::Projects,
            r"^(proyectos|proyectos academicos|proyectos personales|proyectos destacados|projects|academic projects|personal projects|side projects)$",
        ),
    ];
    table
        .iter()
        .filter_map(|(kind, pattern)| Regex::new(pattern).ok().map(|re| (*kind, re)))
        .collect()
});

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    /// Trimmed raw lines; blank lines are kept as "" to delimit paragraphs.
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionedCv {
    /// Lines before the first header (contact block and free text).
    pub preamble: Vec<String>,
    pub sections: Vec<Section>,
}

impl SectionedCv {
    /// All body lines of every section of `kind`, in document order.
    pub fn lines_of(&self, kind: SectionKind) -> Vec<String> {
        self.sections
            .iter()
            .filter(|s| s.kind == kind)
            .flat_map(|s| s.lines.iter().cloned().chain(std::iter::once(String::new())))
            .collect()
    }

    pub fn has(&self, kind: SectionKind) -> bool {
        self.sections.iter().any(|s| s.kind == kind)
    }
}

/// Returns the section kind when `line` is a header. A header may carry
/// inline content after a colon (`Habilidades: Python, SQL`); the content is
/// returned alongside.
pub fn detect_header(line: &str) -> Option<(SectionKind, Option<String>)> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(kind) = match_header(trimmed) {
        return Some((kind, None));
    }

    let (head, rest) = trimmed.split_once(':')?;
    let kind = match_header(head)?;
    let rest = rest.trim();
    Some((kind, (!rest.is_empty()).then(|| rest.to_string())))
}

fn match_header(candidate: &str) -> Option<SectionKind> {
    let norm = normalize(candidate);
    if norm.is_empty() || norm.len() > MAX_HEADER_LEN {
        return None;
    }
    HEADER_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(&norm))
        .map(|(kind, _)| *kind)
}

pub fn split_sections(text: &str) -> SectionedCv {
    let mut cv = SectionedCv::default();

    for raw in text.lines() {
        let line = raw.trim();
        match detect_header(line) {
            Some((kind, inline)) => {
                cv.sections.push(Section {
                    kind,
                    lines: inline.into_iter().collect(),
                });
            }
            None => match cv.sections.last_mut() {
                Some(section) => section.lines.push(line.to_string()),
                None => cv.preamble.push(line.to_string()),
            },
        }
    }

    cv
}

/// Groups lines into blank-line separated paragraphs, dropping empties.
pub fn paragraphs(lines: &[String]) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim().to_string());
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Strips list bullets and decoration from the start of a line.
pub fn strip_bullet(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '·' | '■' | '▪' | '●' | '○' | '>' | '–' | '—'))
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_headers_both_languages() {
        assert_eq!(detect_header("EXPERIENCIA LABORAL").map(|h| h.0), Some(SectionKind::Experience));
        assert_eq!(detect_header("Work Experience:").map(|h| h.0), Some(SectionKind::Experience));
        assert_eq!(detect_header("Formación Académica").map(|h| h.0), Some(SectionKind::Education));
        assert_eq!(detect_header("  IDIOMAS  ").map(|h| h.0), Some(SectionKind::Languages));
        assert_eq!(detect_header("■ Proyectos").map(|h| h.0), Some(SectionKind::Projects));
        assert_eq!(detect_header("Certifications").map(|h| h.0), Some(SectionKind::Certifications));
        assert_eq!(detect_header("Perfil Profesional").map(|h| h.0), Some(SectionKind::Objective));
    }

    #[test]
    fn test_non_headers() {
        assert_eq!(detect_header(""), None);
        assert_eq!(detect_header("Desarrollé una experiencia de usuario nueva"), None);
        assert_eq!(detect_header("Python, SQL, Docker"), None);
    }

    #[test]
    fn test_inline_header_content() {
        let (kind, inline) = detect_header("Habilidades: Python, SQL").unwrap();
        assert_eq!(kind, SectionKind::Skills);
        assert_eq!(inline.as_deref(), Some("Python, SQL"));
    }

    #[test]
    fn test_split_sections_preamble_and_bodies() {
        let text = "Juan Pérez\njuan@email.com\n\nEDUCACIÓN\nUNAM\nIngeniería en Computación\n\nHABILIDADES\nPython\nSQL\n";
        let cv = split_sections(text);
        assert_eq!(cv.preamble, vec!["Juan Pérez", "juan@email.com", ""]);
        assert_eq!(cv.sections.len(), 2);
        assert_eq!(cv.sections[0].kind, SectionKind::Education);
        assert_eq!(cv.sections[0].lines, vec!["UNAM", "Ingeniería en Computación", ""]);
        assert_eq!(cv.sections[1].kind, SectionKind::Skills);
        assert!(cv.has(SectionKind::Skills));
        assert!(!cv.has(SectionKind::Projects));
    }

    #[test]
    fn test_lines_of_merges_repeated_sections() {
        let cv = split_sections("Proyectos\nA\nSkills\nPython\nProjects\nB");
        assert_eq!(cv.lines_of(SectionKind::Projects), vec!["A", "", "B", ""]);
    }

    #[test]
    fn test_paragraphs_grouping() {
        let lines: Vec<String> = ["a", "b", "", "", "c", " "].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            paragraphs(&lines),
            vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]
        );
    }

    #[test]
    fn test_strip_bullet() {
        assert_eq!(strip_bullet("  • Python"), "Python");
        assert_eq!(strip_bullet("- AWS Certified"), "AWS Certified");
        assert_eq!(strip_bullet("plain"), "plain");
    }
}
