use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::matching::scorer::{MatchDetails, MatchScorer};
use crate::models::job::JobRow;

/// Skills and projects a profile is scored on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileInput {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub source: String,
    pub external_job_id: String,
    pub title: String,
    pub company: String,
    pub score: f64,
    pub details: MatchDetails,
}

/// Scores every job and returns the best `limit`, highest score first.
/// Equal scores are ordered by `external_job_id` so the ranking is stable.
pub fn rank_jobs(
    scorer: &MatchScorer,
    profile: &ProfileInput,
    jobs: &[JobRow],
    weights: Option<&Map<String, Value>>,
    limit: usize,
) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = jobs
        .iter()
        .map(|job| {
            let result = scorer.score(
                Some(&profile.skills),
                Some(&profile.projects),
                &job.match_text(),
                weights,
            );
            Recommendation {
                source: job.source.clone(),
                external_job_id: job.external_job_id.clone(),
                title: job.title.clone(),
                company: job.company.clone(),
                score: result.score,
                details: result.details,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.external_job_id.cmp(&b.external_job_id))
    });
    ranked.truncate(limit);
    ranked
}
