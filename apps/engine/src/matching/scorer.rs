//! Profile ↔ job scoring.
//!
//! Per side (skills, projects):
//!
//! ```text
//! sim = (1 - COVERAGE_BLEND) · cosine(tfidf(side_text, job_text))
//!     +      COVERAGE_BLEND  · matched_items / items
//! ```
//!
//! and `score = clip(sim_skills · w_skills + sim_projects · w_projects, 0, 1)`.
//! The coverage term keeps a short skill list that is fully present in a long
//! posting from being diluted by the posting's own vocabulary.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::matching::vectorizer::Vectorizer;
use crate::matching::weights::MatchWeights;
use crate::normalize::{normalize, truncate_chars};

pub const MAX_SKILL_CHARS: usize = 200;
pub const MAX_PROJECT_CHARS: usize = 2000;
pub const MAX_JOB_CHARS: usize = 50_000;
pub const MAX_MATCHED_ITEM_CHARS: usize = 300;
pub const COVERAGE_BLEND: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub skill_similarity: f64,
    pub project_similarity: f64,
    pub weights_used: MatchWeights,
    pub matching_skills: Vec<String>,
    pub matching_projects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: f64,
    pub details: MatchDetails,
}

#[derive(Clone)]
pub struct MatchScorer {
    vectorizer: Arc<dyn Vectorizer>,
    default_weights: MatchWeights,
}

impl std::fmt::Debug for MatchScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchScorer")
            .field("vectorizer", &self.vectorizer.name())
            .field("default_weights", &self.default_weights)
            .finish()
    }
}

/// One side of the comparison after sanitization.
struct Side {
    items: Vec<String>,
    normalized: Vec<String>,
}

impl Side {
    fn new(raw: Option<&[String]>, max_chars: usize) -> Self {
        let items: Vec<String> = raw
            .unwrap_or_default()
            .iter()
            .map(|s| truncate_chars(s, max_chars))
            .collect();
        let normalized = items.iter().map(|s| normalize(s)).collect();
        Self { items, normalized }
    }

    fn is_empty(&self) -> bool {
        self.normalized.iter().all(String::is_empty)
    }

    fn text(&self) -> String {
        self.normalized
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl MatchScorer {
    pub fn new(vectorizer: Arc<dyn Vectorizer>, default_weights: MatchWeights) -> Self {
        Self {
            vectorizer,
            default_weights: default_weights.normalized(),
        }
    }

    pub fn vectorizer_name(&self) -> &'static str {
        self.vectorizer.name()
    }

    pub fn default_weights(&self) -> MatchWeights {
        self.default_weights
    }

    /// Scores a profile against one job description. Never fails on string
    /// input; oversize input is truncated before any computation.
    pub fn score(
        &self,
        skills: Option<&[String]>,
        projects: Option<&[String]>,
        job_description: &str,
        weights: Option<&Map<String, Value>>,
    ) -> MatchResult {
        let weights_used = MatchWeights::resolve(self.default_weights, weights);

        let skills = Side::new(skills, MAX_SKILL_CHARS);
        let projects = Side::new(projects, MAX_PROJECT_CHARS);
        let job = normalize(&truncate_chars(job_description, MAX_JOB_CHARS));

        if job.is_empty() && skills.is_empty() && projects.is_empty() {
            return MatchResult {
                score: 0.0,
                details: MatchDetails {
                    skill_similarity: 0.0,
                    project_similarity: 0.0,
                    weights_used,
                    matching_skills: Vec::new(),
                    matching_projects: Vec::new(),
                },
            };
        }

        let (skill_similarity, matching_skills) = self.side_similarity(&skills, &job);
        let (project_similarity, matching_projects) = self.side_similarity(&projects, &job);

        let score = (skill_similarity * weights_used.skills
            + project_similarity * weights_used.projects)
            .clamp(0.0, 1.0);

        MatchResult {
            score,
            details: MatchDetails {
                skill_similarity: round6(skill_similarity),
                project_similarity: round6(project_similarity),
                weights_used,
                matching_skills,
                matching_projects,
            },
        }
    }

    fn side_similarity(&self, side: &Side, job: &str) -> (f64, Vec<String>) {
        let matched = matching_items(&side.items, &side.normalized, job);
        let considered = side.normalized.iter().filter(|s| !s.is_empty()).count();
        if considered == 0 {
            return (0.0, matched);
        }

        let cosine = self.vectorizer.similarity(&side.text(), job);
        let matched_count = side
            .normalized
            .iter()
            .filter(|n| !n.is_empty() && item_matches(n, job))
            .count();
        let coverage = matched_count as f64 / considered as f64;

        let sim = (1.0 - COVERAGE_BLEND) * cosine + COVERAGE_BLEND * coverage;
        (sim.clamp(0.0, 1.0), matched)
    }
}

/// An item matches when its whole normalized form, or any of its tokens of
/// two or more characters, is a substring of the normalized job text.
fn item_matches(normalized_item: &str, job: &str) -> bool {
    if normalized_item.is_empty() {
        return false;
    }
    job.contains(normalized_item)
        || normalized_item
            .split(' ')
            .filter(|t| t.chars().count() >= 2)
            .any(|t| job.contains(t))
}

/// Input items found in the job text, deduplicated in input order and
/// truncated for reporting.
pub fn matching_items(items: &[String], normalized: &[String], job: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .zip(normalized)
        .filter(|(_, norm)| item_matches(norm, job))
        .map(|(item, _)| truncate_chars(item, MAX_MATCHED_ITEM_CHARS))
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::vectorizer::{NaturalTfidf, SmoothTfidf};
    use serde_json::json;

    fn scorer() -> MatchScorer {
        MatchScorer::new(Arc::new(SmoothTfidf), MatchWeights::default())
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    const JOB: &str = "Buscamos Python, SQL, FastAPI.";

    #[test]
    fn test_identical_vocabularies() {
        let skills = strings(&["Python", "SQL"]);
        let projects = strings(&["API REST con FastAPI"]);
        let result = scorer().score(Some(&skills), Some(&projects), JOB, None);

        assert!(result.score > 0.6, "score {}", result.score);
        assert_eq!(result.details.matching_skills, vec!["Python", "SQL"]);
        assert!(result
            .details
            .matching_projects
            .contains(&"API REST con FastAPI".to_string()));
        assert_eq!(result.details.weights_used, MatchWeights::default());
    }

    #[test]
    fn test_weights_override_moves_score_toward_skills() {
        let skills = strings(&["Python", "SQL"]);
        let projects = strings(&["API REST con FastAPI"]);
        let overrides = json!({"skills": 0.9, "projects": 0.1});

        let default = scorer().score(Some(&skills), Some(&projects), JOB, None);
        let tuned = scorer().score(Some(&skills), Some(&projects), JOB, overrides.as_object());

        assert_eq!(tuned.details.weights_used, MatchWeights { skills: 0.9, projects: 0.1 });
        let sim_skills = tuned.details.skill_similarity;
        assert!((tuned.score - sim_skills).abs() < (default.score - sim_skills).abs());
    }

    #[test]
    fn test_identical_texts_score_one() {
        let items = strings(&["python sql docker"]);
        let result = scorer().score(Some(&items), Some(&items), "python sql docker", None);
        assert!((result.score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_disjoint_vocabularies_score_low() {
        let skills = strings(&["Contabilidad", "Excel"]);
        let projects = strings(&["Auditoría fiscal trimestral"]);
        let result = scorer().score(
            Some(&skills),
            Some(&projects),
            "Kubernetes Terraform Golang",
            None,
        );
        assert!(result.score < 0.1, "score {}", result.score);
        assert!(result.details.matching_skills.is_empty());
    }

    #[test]
    fn test_empty_inputs_short_circuit() {
        let result = scorer().score(None, None, "", None);
        assert_eq!(result.score, 0.0);
        assert!(result.details.matching_skills.is_empty());
        assert!((result.details.weights_used.skills + result.details.weights_used.projects - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_side_contributes_zero() {
        let skills = strings(&["Python"]);
        let result = scorer().score(Some(&skills), None, "Python developer", None);
        assert_eq!(result.details.project_similarity, 0.0);
        assert!(result.score > 0.0 && result.score <= 1.0);
    }

    #[test]
    fn test_matching_items_dedup_preserves_order() {
        let skills = strings(&["SQL", "Python", "SQL", "Rust", "Python"]);
        let result = scorer().score(Some(&skills), None, "python y sql", None);
        assert_eq!(result.details.matching_skills, vec!["SQL", "Python"]);
    }

    #[test]
    fn test_oversize_inputs_truncated() {
        let long_skill = format!("python {}", "x".repeat(1000));
        let job = format!("python {}", "a ".repeat(40_000));
        let result = scorer().score(Some(&[long_skill]), None, &job, None);
        assert_eq!(result.details.matching_skills.len(), 1);
        assert_eq!(result.details.matching_skills[0].chars().count(), MAX_SKILL_CHARS);
        assert!((0.0..=1.0).contains(&result.score));
    }

    #[test]
    fn test_similarities_rounded_to_six_decimals() {
        let skills = strings(&["Python", "SQL"]);
        let result = scorer().score(Some(&skills), None, JOB, None);
        let s = result.details.skill_similarity;
        assert_eq!(s, (s * 1e6).round() / 1e6);
    }

    #[test]
    fn test_deterministic_output() {
        let skills = strings(&["Python", "SQL"]);
        let projects = strings(&["API REST con FastAPI"]);
        let a = serde_json::to_string(&scorer().score(Some(&skills), Some(&projects), JOB, None)).unwrap();
        let b = serde_json::to_string(&scorer().score(Some(&skills), Some(&projects), JOB, None)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_natural_vectorizer_bounds() {
        let natural = MatchScorer::new(Arc::new(NaturalTfidf), MatchWeights::default());
        let skills = strings(&["Python", "SQL"]);
        let projects = strings(&["API REST con FastAPI"]);
        let result = natural.score(Some(&skills), Some(&projects), JOB, None);
        assert!((0.0..=1.0).contains(&result.score));
        assert_eq!(result.details.matching_skills, vec!["Python", "SQL"]);
    }
}
