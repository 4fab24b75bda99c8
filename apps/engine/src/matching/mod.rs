//! Matching Scorer: weighted TF-IDF similarity between a student profile
//! and job postings.

pub mod handlers;
pub mod recommend;
pub mod scorer;
pub mod vectorizer;
pub mod weights;

pub use recommend::{rank_jobs, ProfileInput, Recommendation};
pub use scorer::{MatchResult, MatchScorer};
pub use vectorizer::VectorizerKind;
pub use weights::MatchWeights;
