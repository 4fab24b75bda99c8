//! CV Extractor: turns free-form résumé text into a structured,
//! language-tagged profile.

pub mod contact;
pub mod dictionaries;
pub mod extractor;
pub mod handlers;
pub mod harvard;
pub mod language;
pub mod pdf;
pub mod projects;
pub mod sections;
pub mod skills;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use contact::ContactInfo;
pub use extractor::CvExtractor;
pub use language::Language;

/// Per-profile list caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionLimits {
    pub max_skills: usize,
    pub max_soft_skills: usize,
    pub max_projects: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_skills: 50,
            max_soft_skills: 20,
            max_projects: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub graduation_year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub position: String,
    pub company: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

/// Everything the extractor pulls out of one résumé.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvExtract {
    pub language: Language,
    pub contact: ContactInfo,
    pub objective: Option<String>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub projects: Vec<String>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
    pub industry: Option<String>,
    pub seniority: Option<String>,
    /// Clipped ratio of extracted items to a saturation constant, in [0, 1].
    pub confidence: f64,
}

#[derive(Debug, Error)]
pub enum CvError {
    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("résumé text is not valid UTF-8")]
    NotUtf8,
}
