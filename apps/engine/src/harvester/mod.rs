//! Job Harvester: fetches listing pages under an adaptive delay, parses
//! job records, validates and de-duplicates them, and persists them with
//! contact PII encrypted.

pub mod dedup;
pub mod handlers;
pub mod listing;
pub mod pacing;
pub mod persistence;
pub mod pipeline;
pub mod session;
pub mod urls;
pub mod validator;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::encryption::CryptoError;
use crate::models::job::{JobType, WorkMode, DEFAULT_SOURCE};
use crate::store::StoreError;

pub use pipeline::{Harvester, SearchQuery};
pub use session::SessionManager;

#[derive(Debug, Clone)]
pub struct HarvesterConfig {
    pub base_url: String,
    pub source: String,
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub pool_max: usize,
    pub keepalive_max: usize,
    pub timeout: Duration,
    /// Encrypted in place of a missing contact email.
    pub contact_placeholder: String,
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.occ.com.mx".to_string(),
            source: DEFAULT_SOURCE.to_string(),
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(3),
            max_retries: 2,
            pool_max: 10,
            keepalive_max: 5,
            timeout: Duration::from_secs(30),
            contact_placeholder: "contacto@occ.com.mx".to_string(),
        }
    }
}

/// A job as parsed from a listing page, before encryption. Contact fields
/// never leave the process in serialized form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub external_job_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: Option<String>,
    pub work_mode: WorkMode,
    pub job_type: JobType,
    pub skills: Vec<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    #[serde(skip_serializing)]
    pub contact_email: Option<String>,
    #[serde(skip_serializing)]
    pub contact_phone: Option<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("upstream unavailable after {attempts} attempts: {url}")]
    UpstreamUnavailable { url: String, attempts: u32 },

    #[error("rate limited by upstream ({status}): {url}")]
    RateLimited { url: String, status: u16 },

    #[error("invalid record: {0}")]
    Validation(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
