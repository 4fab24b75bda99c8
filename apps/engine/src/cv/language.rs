use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cv::dictionaries::{ENGLISH_MARKERS, SPANISH_MARKERS};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Installation's primary locale; wins ties.
    #[default]
    Spanish,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::English => "en",
        }
    }
}

/// Scores normalized tokens against both marker sets. Ties go to Spanish.
pub fn detect_language(normalized_text: &str) -> Language {
    let spanish: HashSet<&str> = SPANISH_MARKERS.iter().copied().collect();
    let english: HashSet<&str> = ENGLISH_MARKERS.iter().copied().collect();

    let (mut es, mut en) = (0usize, 0usize);
    for token in normalized_text.split(' ') {
        if spanish.contains(token) {
            es += 1;
        }
        if english.contains(token) {
            en += 1;
        }
    }

    if en > es {
        Language::English
    } else {
        Language::Spanish
    }
}
