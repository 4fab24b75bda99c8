//! Persistence adapter: turns validated records into `JobRow`s (contact
//! columns encrypted, hash columns computed) and upserts them by
//! `(source, external_job_id)`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::encryption::{hash_email, hash_phone, EncryptionService};
use crate::harvester::{HarvestError, JobRecord};
use crate::models::job::{JobRow, DEFAULT_CURRENCY, SUMMARY_CHARS};
use crate::models::to_json_list;
use crate::normalize::truncate_chars;
use crate::store::{get_json, KvStore, StoreError};

/// Row fields stored as ciphertext.
const CONTACT_FIELDS: [&str; 2] = ["contact_email", "contact_phone"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistOutcome {
    pub inserted: usize,
    pub updated: usize,
}

#[derive(Clone)]
pub struct JobPersister {
    store: Arc<dyn KvStore>,
    crypto: Arc<EncryptionService>,
    source: String,
    contact_placeholder: String,
}

impl JobPersister {
    pub fn new(
        store: Arc<dyn KvStore>,
        crypto: Arc<EncryptionService>,
        source: impl Into<String>,
        contact_placeholder: impl Into<String>,
    ) -> Self {
        Self {
            store,
            crypto,
            source: source.into(),
            contact_placeholder: contact_placeholder.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn store(&self) -> &dyn KvStore {
        self.store.as_ref()
    }

    /// Storage row for `record`. A missing email is replaced by the
    /// placeholder so the hash column is always indexable.
    pub fn build_row(&self, record: &JobRecord, now: DateTime<Utc>) -> Result<JobRow, HarvestError> {
        let email = record
            .contact_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(&self.contact_placeholder);
        let phone = record
            .contact_phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let mut contact = Map::new();
        contact.insert("contact_email".to_string(), Value::from(email));
        if let Some(phone) = phone {
            contact.insert("contact_phone".to_string(), Value::from(phone));
        }
        let sealed = self.crypto.encrypt_dict(&contact, &CONTACT_FIELDS)?;
        let sealed_field = |field: &str| sealed.get(field).and_then(Value::as_str).map(String::from);

        Ok(JobRow {
            id: Uuid::new_v4(),
            source: self.source.clone(),
            external_job_id: record.external_job_id.clone(),
            title: record.title.clone(),
            company: record.company.clone(),
            location: record.location.clone(),
            description: truncate_chars(&record.description, SUMMARY_CHARS),
            full_description: Some(record.description.clone()),
            url: record.url.clone(),
            work_mode: record.work_mode,
            job_type: record.job_type,
            skills: to_json_list(&record.skills),
            salary_min: record.salary_min,
            salary_max: record.salary_max,
            currency: DEFAULT_CURRENCY.to_string(),
            contact_email: sealed_field("contact_email").unwrap_or_default(),
            contact_email_hash: hash_email(email),
            contact_phone: sealed_field("contact_phone"),
            contact_phone_hash: phone.map(hash_phone),
            published_at: record.published_at,
            created_at: now,
            updated_at: now,
        })
    }

    /// Upserts every record or none of them. Rows are built (and encrypted)
    /// before the first write; a store failure mid-way restores every key
    /// already touched.
    pub async fn upsert_all(&self, records: &[JobRecord]) -> Result<PersistOutcome, HarvestError> {
        let now = Utc::now();
        let rows = records
            .iter()
            .map(|r| self.build_row(r, now))
            .collect::<Result<Vec<_>, _>>()?;

        let mut touched: Vec<(String, Option<String>)> = Vec::with_capacity(rows.len());
        let mut outcome = PersistOutcome::default();

        for row in rows {
            let key = row.key();
            match self.write_row(&key, row, now).await {
                Ok((previous, inserted)) => {
                    if inserted {
                        outcome.inserted += 1;
                    } else {
                        outcome.updated += 1;
                    }
                    touched.push((key, previous));
                }
                Err(err) => {
                    error!(key = %key, error = %err, "job upsert failed, rolling back batch");
                    self.rollback(touched).await;
                    return Err(err.into());
                }
            }
        }

        debug!(
            inserted = outcome.inserted,
            updated = outcome.updated,
            source = %self.source,
            "jobs persisted"
        );
        Ok(outcome)
    }

    /// Returns the previous raw value and whether the row was new.
    async fn write_row(
        &self,
        key: &str,
        row: JobRow,
        now: DateTime<Utc>,
    ) -> Result<(Option<String>, bool), StoreError> {
        let previous = self.store.get(key).await?;
        let (next, inserted) = match previous.as_deref().map(serde_json::from_str::<JobRow>) {
            Some(Ok(mut existing)) => {
                existing.updated_at = now;
                (existing, false)
            }
            Some(Err(err)) => {
                warn!(key, error = %err, "unreadable job row, replacing");
                (row, false)
            }
            None => (row, true),
        };
        self.store.set(key, &serde_json::to_string(&next)?).await?;
        Ok((previous, inserted))
    }

    async fn rollback(&self, touched: Vec<(String, Option<String>)>) {
        for (key, previous) in touched.into_iter().rev() {
            let restored = match previous {
                Some(raw) => self.store.set(&key, &raw).await,
                None => self.store.delete(&key).await,
            };
            if let Err(err) = restored {
                error!(key = %key, error = %err, "rollback failed");
            }
        }
    }

    pub async fn get(&self, external_job_id: &str) -> Result<Option<JobRow>, StoreError> {
        get_json(self.store.as_ref(), &JobRow::store_key(&self.source, external_job_id)).await
    }

    pub async fn get_from(
        &self,
        source: &str,
        external_job_id: &str,
    ) -> Result<Option<JobRow>, StoreError> {
        get_json(self.store.as_ref(), &JobRow::store_key(source, external_job_id)).await
    }

    /// Every stored job of this source, ordered by external id key.
    pub async fn list(&self) -> Result<Vec<JobRow>, StoreError> {
        let prefix = JobRow::store_key(&self.source, "");
        let mut rows = Vec::new();
        for (key, raw) in self.store.scan_prefix(&prefix).await? {
            match serde_json::from_str::<JobRow>(&raw) {
                Ok(row) => rows.push(row),
                Err(err) => warn!(key = %key, error = %err, "skipping unreadable job row"),
            }
        }
        Ok(rows)
    }
}
