//! Student profiles: encrypted contact columns, hash lookups, upsert on
//! re-upload and soft deactivation.

pub mod handlers;
pub mod ingest;
pub mod repository;

use thiserror::Error;

use crate::encryption::CryptoError;
use crate::store::StoreError;

pub use ingest::{ingest_resume, Identity, IngestOutcome};
pub use repository::StudentRepository;

#[derive(Debug, Error)]
pub enum StudentError {
    #[error("an email address is required")]
    MissingEmail,

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
