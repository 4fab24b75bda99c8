use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cv::{CvExtract, ExtractionLimits};
use crate::encryption::{hash_email, hash_phone, EncryptionService};
use crate::models::student::StudentRow;
use crate::models::to_json_list;
use crate::normalize::truncate_chars;
use crate::store::{get_json, set_json, KvStore, StoreError};
use crate::students::StudentError;

pub const MAX_SKILL_CHARS: usize = 200;
pub const MAX_PROJECT_CHARS: usize = 2000;
pub const MAX_OBJECTIVE_CHARS: usize = 500;
pub const MAX_LIST_ITEMS: usize = 20;

/// Plaintext input for an upsert. `profile` carries the résumé fields.
#[derive(Debug, Clone, Default)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub program: Option<String>,
    pub profile: CvExtract,
}

#[derive(Debug, Clone)]
pub struct Upserted {
    pub student: StudentRow,
    pub created: bool,
}

#[derive(Clone)]
pub struct StudentRepository {
    store: Arc<dyn KvStore>,
    crypto: Arc<EncryptionService>,
    limits: ExtractionLimits,
    /// Serializes upserts so the index lookup and the writes act as one step.
    writes: Arc<Mutex<()>>,
}

fn capped(items: &[String], max_items: usize, max_chars: usize) -> Vec<String> {
    items
        .iter()
        .map(|s| truncate_chars(s.trim(), max_chars))
        .filter(|s| !s.is_empty())
        .take(max_items)
        .collect()
}

impl StudentRepository {
    pub fn new(store: Arc<dyn KvStore>, crypto: Arc<EncryptionService>, limits: ExtractionLimits) -> Self {
        Self {
            store,
            crypto,
            limits,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Inserts a new profile, or overwrites the résumé fields of the one
    /// already indexed under the same email hash (id and `created_at` kept).
    pub async fn upsert_by_email_hash(&self, new: NewStudent) -> Result<Upserted, StudentError> {
        let email = new.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(StudentError::MissingEmail);
        }
        let email_hash = hash_email(&email);
        let phone = new
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let _guard = self.writes.lock().await;
        let existing = self.find_by_email_hash(&email_hash).await?;
        let now = Utc::now();
        let profile = &new.profile;

        let row = StudentRow {
            id: existing.as_ref().map_or_else(Uuid::new_v4, |row| row.id),
            name: new.name.trim().to_string(),
            email: self.crypto.encrypt(&email)?,
            email_hash: email_hash.clone(),
            phone: phone.map(|p| self.crypto.encrypt(p)).transpose()?,
            phone_hash: phone.map(hash_phone),
            program: new.program.clone().or_else(|| existing.as_ref().and_then(|r| r.program.clone())),
            language: profile.language,
            objective: profile
                .objective
                .as_deref()
                .map(|o| truncate_chars(o, MAX_OBJECTIVE_CHARS)),
            education: profile.education.clone(),
            experience: profile.experience.clone(),
            skills: to_json_list(&capped(&profile.skills, self.limits.max_skills, MAX_SKILL_CHARS)),
            soft_skills: to_json_list(&capped(
                &profile.soft_skills,
                self.limits.max_soft_skills,
                MAX_SKILL_CHARS,
            )),
            projects: capped(&profile.projects, self.limits.max_projects, MAX_PROJECT_CHARS),
            certifications: capped(&profile.certifications, MAX_LIST_ITEMS, MAX_SKILL_CHARS),
            languages: capped(&profile.languages, MAX_LIST_ITEMS, MAX_SKILL_CHARS),
            industry: profile.industry.clone(),
            seniority: profile.seniority.clone(),
            is_active: existing.as_ref().map_or(true, |r| r.is_active),
            created_at: existing.as_ref().map_or(now, |r| r.created_at),
            updated_at: now,
        };

        set_json(self.store.as_ref(), &StudentRow::store_key(row.id), &row).await?;
        self.store
            .set(&StudentRow::email_index_key(&email_hash), &row.id.to_string())
            .await?;

        let created = existing.is_none();
        info!(student_id = %row.id, created, "student profile saved");
        Ok(Upserted { student: row, created })
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<StudentRow>, StoreError> {
        get_json(self.store.as_ref(), &StudentRow::store_key(id)).await
    }

    /// Equality lookup through the hash index; nothing is decrypted.
    pub async fn find_by_email_hash(&self, email_hash: &str) -> Result<Option<StudentRow>, StoreError> {
        let Some(raw_id) = self.store.get(&StudentRow::email_index_key(email_hash)).await? else {
            return Ok(None);
        };
        let Ok(id) = raw_id.parse::<Uuid>() else {
            debug!(email_hash, "email index points at a malformed id");
            return Ok(None);
        };
        Ok(self.get(id).await?.filter(|row| row.email_hash == email_hash))
    }

    /// Soft (de)activation. `None` when the student does not exist.
    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<StudentRow>, StoreError> {
        let Some(mut row) = self.get(id).await? else {
            return Ok(None);
        };
        row.is_active = active;
        row.updated_at = Utc::now();
        set_json(self.store.as_ref(), &StudentRow::store_key(id), &row).await?;
        info!(student_id = %id, active, "student activation changed");
        Ok(Some(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn repository() -> (StudentRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let key = EncryptionService::generate_key_b64();
        let crypto = Arc::new(EncryptionService::from_config(Some(&key)).unwrap());
        (
            StudentRepository::new(store.clone(), crypto, ExtractionLimits::default()),
            store,
        )
    }

    fn student(name: &str, email: &str, skills: &[&str]) -> NewStudent {
        NewStudent {
            name: name.to_string(),
            email: email.to_string(),
            profile: CvExtract {
                skills: skills.iter().map(|s| s.to_string()).collect(),
                ..CvExtract::default()
            },
            ..NewStudent::default()
        }
    }

    #[tokio::test]
    async fn test_hash_search_finds_student() {
        let (repo, store) = repository();
        repo.upsert_by_email_hash(student("Juan", "JUAN@EMAIL.COM", &["Python"]))
            .await
            .unwrap();

        let found = repo
            .find_by_email_hash(&hash_email("juan@email.com"))
            .await
            .unwrap()
            .expect("student indexed by email hash");
        assert_eq!(found.name, "Juan");
        assert_eq!(repo.crypto.decrypt(&found.email).unwrap(), "juan@email.com");

        let raw = store.get(&StudentRow::store_key(found.id)).await.unwrap().unwrap();
        assert!(!raw.to_lowercase().contains("juan@email.com"));

        assert!(repo
            .find_by_email_hash(&hash_email("otro@email.com"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_reupload_updates_in_place() {
        let (repo, store) = repository();
        let first = repo
            .upsert_by_email_hash(student("Juan", "juan@email.com", &["Python"]))
            .await
            .unwrap();
        assert!(first.created);

        let second = repo
            .upsert_by_email_hash(student("Juan Pérez", " Juan@Email.com ", &["Python", "Rust"]))
            .await
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.student.id, first.student.id);
        assert_eq!(second.student.created_at, first.student.created_at);
        assert_eq!(second.student.skills(), vec!["Python", "Rust"]);

        let students = store.scan_prefix("student:").await.unwrap();
        // one row plus one index entry
        assert_eq!(students.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_uploads_share_one_row() {
        let (repo, store) = repository();
        let uploads: Vec<_> = (0..8)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.upsert_by_email_hash(student(&format!("Juan {i}"), "juan@email.com", &["Python"]))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut created = 0;
        let mut ids = std::collections::HashSet::new();
        for upload in uploads {
            let outcome = upload.await.unwrap();
            created += usize::from(outcome.created);
            ids.insert(outcome.student.id);
        }
        assert_eq!(created, 1);
        assert_eq!(ids.len(), 1);
        // one row plus one index entry
        assert_eq!(store.scan_prefix("student:").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_caps_applied() {
        let (repo, _) = repository();
        let long = "x".repeat(500);
        let many: Vec<String> = (0..80).map(|i| format!("skill{i}")).collect();
        let mut new = student("Ana", "ana@uni.mx", &[]);
        new.profile.skills = many;
        new.profile.skills.insert(0, long);
        new.profile.projects = vec!["p".repeat(3000)];

        let row = repo.upsert_by_email_hash(new).await.unwrap().student;
        let skills = row.skills();
        assert_eq!(skills.len(), ExtractionLimits::default().max_skills);
        assert_eq!(skills[0].chars().count(), MAX_SKILL_CHARS);
        assert_eq!(row.projects[0].chars().count(), MAX_PROJECT_CHARS);
    }

    #[tokio::test]
    async fn test_missing_email_rejected() {
        let (repo, _) = repository();
        let err = repo
            .upsert_by_email_hash(student("Sin correo", "  ", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, StudentError::MissingEmail));
    }

    #[tokio::test]
    async fn test_phone_hash_and_deactivation() {
        let (repo, _) = repository();
        let mut new = student("Luis", "luis@ipn.mx", &[]);
        new.phone = Some("+52 55 9876 5432".into());
        let row = repo.upsert_by_email_hash(new).await.unwrap().student;
        assert_eq!(row.phone_hash, Some(hash_phone("525598765432")));
        assert_ne!(row.phone.as_deref(), Some("+52 55 9876 5432"));

        let inactive = repo.set_active(row.id, false).await.unwrap().unwrap();
        assert!(!inactive.is_active);

        // a later upload keeps the deactivated flag
        let again = repo
            .upsert_by_email_hash(student("Luis", "luis@ipn.mx", &[]))
            .await
            .unwrap();
        assert!(!again.student.is_active);

        assert!(repo.set_active(Uuid::new_v4(), true).await.unwrap().is_none());
    }
}
