use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cv::{CvExtract, CvExtractor};
use crate::models::student::StudentView;
use crate::students::repository::{NewStudent, StudentRepository};
use crate::students::StudentError;

/// Caller-supplied identity. Anything missing is taken from the résumé's
/// contact block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub student: StudentView,
    pub created: bool,
    pub confidence: f64,
}

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Extracts `text`, fills identity gaps from the contact block and upserts
/// the profile by email hash.
pub async fn ingest_resume(
    extractor: &CvExtractor,
    repository: &StudentRepository,
    text: &str,
    identity: Identity,
) -> Result<IngestOutcome, StudentError> {
    let profile: CvExtract = extractor.extract(text);
    let contact = profile.contact.clone();

    let email = present(identity.email)
        .or(contact.email)
        .ok_or(StudentError::MissingEmail)?;
    let name = present(identity.name)
        .or(contact.name)
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
    let confidence = profile.confidence;

    let upserted = repository
        .upsert_by_email_hash(NewStudent {
            name,
            email,
            phone: present(identity.phone).or(contact.phone),
            program: present(identity.program),
            profile,
        })
        .await?;

    info!(
        student_id = %upserted.student.id,
        created = upserted.created,
        confidence,
        "résumé ingested"
    );
    Ok(IngestOutcome {
        student: StudentView::from(&upserted.student),
        created: upserted.created,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cv::ExtractionLimits;
    use crate::encryption::{hash_email, EncryptionService};
    use crate::store::MemoryStore;

    const RESUME: &str = "\
María López
maria.lopez@unam.mx | 55 1234 5678

HABILIDADES
Python, SQL, Docker, Git, Linux
Trabajo en equipo, liderazgo

PROYECTOS
Construí un dashboard de ventas con Python y SQL para una tienda local.
";

    fn repository() -> StudentRepository {
        let key = EncryptionService::generate_key_b64();
        StudentRepository::new(
            Arc::new(MemoryStore::new()),
            Arc::new(EncryptionService::from_config(Some(&key)).unwrap()),
            ExtractionLimits::default(),
        )
    }

    #[tokio::test]
    async fn test_identity_from_contact_block() {
        let repo = repository();
        let outcome = ingest_resume(&CvExtractor::default(), &repo, RESUME, Identity::default())
            .await
            .unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.student.name, "María López");
        assert_eq!(outcome.student.email_hash, hash_email("maria.lopez@unam.mx"));
        assert!(outcome.student.skills.contains(&"Python".to_string()));
        assert!(outcome.confidence > 0.0);

        let stored = repo
            .find_by_email_hash(&hash_email("MARIA.LOPEZ@UNAM.MX"))
            .await
            .unwrap()
            .unwrap();
        assert!(stored.phone_hash.is_some());
    }

    #[tokio::test]
    async fn test_explicit_identity_wins() {
        let repo = repository();
        let identity = Identity {
            name: Some("M. López".into()),
            email: Some("mlopez@alumnos.unam.mx".into()),
            program: Some("Ingeniería en Computación".into()),
            ..Identity::default()
        };
        let outcome = ingest_resume(&CvExtractor::default(), &repo, RESUME, identity)
            .await
            .unwrap();
        assert_eq!(outcome.student.name, "M. López");
        assert_eq!(outcome.student.email_hash, hash_email("mlopez@alumnos.unam.mx"));
        assert_eq!(outcome.student.program.as_deref(), Some("Ingeniería en Computación"));
    }

    #[tokio::test]
    async fn test_second_upload_is_update() {
        let repo = repository();
        let extractor = CvExtractor::default();
        ingest_resume(&extractor, &repo, RESUME, Identity::default()).await.unwrap();
        let again = ingest_resume(&extractor, &repo, RESUME, Identity::default()).await.unwrap();
        assert!(!again.created);
    }

    #[tokio::test]
    async fn test_no_email_anywhere() {
        let repo = repository();
        let text = "Resumen profesional sin datos de contacto. Python, SQL, Docker y mucho más texto.";
        let err = ingest_resume(&CvExtractor::default(), &repo, text, Identity::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StudentError::MissingEmail));
    }
}
