use std::sync::Arc;

use crate::config::Config;
use crate::cv::CvExtractor;
use crate::encryption::EncryptionService;
use crate::harvester::Harvester;
use crate::matching::MatchScorer;
use crate::store::KvStore;
use crate::students::StudentRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn KvStore>,
    /// Process-wide key holder; nothing else keeps key material.
    pub crypto: Arc<EncryptionService>,
    pub extractor: CvExtractor,
    pub scorer: MatchScorer,
    /// Owns the session manager, so every query shares one adaptive delay.
    pub harvester: Arc<Harvester>,
    pub students: StudentRepository,
}
