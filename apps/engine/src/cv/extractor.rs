use tracing::debug;

use crate::cv::contact::parse_contact;
use crate::cv::harvard::{
    extract_certifications, extract_education, extract_experience, extract_languages,
    extract_objective, infer_seniority,
};
use crate::cv::language::detect_language;
use crate::cv::projects::extract_projects;
use crate::cv::sections::split_sections;
use crate::cv::skills::{extract_skills, extract_soft_skills, infer_industry};
use crate::cv::{CvExtract, ExtractionLimits};
use crate::normalize::normalize;

/// Inputs with fewer meaningful characters than this yield an empty extract.
pub const MIN_MEANINGFUL_CHARS: usize = 50;
/// Item count at which confidence saturates to 1.0.
const CONFIDENCE_SATURATION: f64 = 10.0;

#[derive(Debug, Clone, Default)]
pub struct CvExtractor {
    limits: ExtractionLimits,
}

impl CvExtractor {
    pub fn new(limits: ExtractionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> ExtractionLimits {
        self.limits
    }

    pub fn extract(&self, text: &str) -> CvExtract {
        let normalized = normalize(text);
        let meaningful = normalized.chars().filter(|c| !c.is_whitespace()).count();
        if meaningful < MIN_MEANINGFUL_CHARS {
            debug!(meaningful, "résumé too short, returning empty extract");
            return CvExtract::default();
        }

        let language = detect_language(&normalized);
        let cv = split_sections(text);

        let skills = extract_skills(&normalized, self.limits.max_skills);
        let soft_skills = extract_soft_skills(&normalized, language, self.limits.max_soft_skills);
        let projects = extract_projects(text, self.limits.max_projects);
        let experience = extract_experience(&cv);

        let items = skills.len() + soft_skills.len() + projects.len();
        let confidence = (items as f64 / CONFIDENCE_SATURATION).clamp(0.0, 1.0);

        let extract = CvExtract {
            language,
            contact: parse_contact(&cv.preamble),
            objective: extract_objective(&cv),
            education: extract_education(&cv),
            seniority: Some(infer_seniority(&normalized, &experience)),
            experience,
            industry: infer_industry(&skills),
            certifications: extract_certifications(&cv, text),
            languages: extract_languages(&cv, text),
            skills,
            soft_skills,
            projects,
            confidence,
        };

        debug!(
            language = extract.language.code(),
            skills = extract.skills.len(),
            projects = extract.projects.len(),
            confidence = extract.confidence,
            "résumé extracted"
        );
        extract
    }
}
