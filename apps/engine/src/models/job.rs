use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::parse_json_list;

pub const DEFAULT_SOURCE: &str = "occ.com.mx";
pub const DEFAULT_CURRENCY: &str = "MXN";
/// Length of the indexable `description` summary.
pub const SUMMARY_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkMode {
    #[default]
    InPerson,
    Remote,
    Hybrid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Temporary,
    Freelance,
}

/// A persisted job posting. `contact_email` / `contact_phone` hold
/// ciphertext; the hash columns are the equality index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRow {
    pub id: Uuid,
    pub source: String,
    pub external_job_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub full_description: Option<String>,
    pub url: Option<String>,
    pub work_mode: WorkMode,
    pub job_type: JobType,
    /// JSON array serialized as a string.
    pub skills: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub currency: String,
    pub contact_email: String,
    pub contact_email_hash: String,
    pub contact_phone: Option<String>,
    pub contact_phone_hash: Option<String>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRow {
    pub fn store_key(source: &str, external_job_id: &str) -> String {
        format!("job:{source}:{external_job_id}")
    }

    pub fn key(&self) -> String {
        Self::store_key(&self.source, &self.external_job_id)
    }

    pub fn skills(&self) -> Vec<String> {
        parse_json_list("skills", &self.skills, &self.external_job_id)
    }

    /// Text the scorer compares profiles against.
    pub fn match_text(&self) -> String {
        let body = self.full_description.as_deref().unwrap_or(&self.description);
        format!("{} {} {}", self.title, body, self.skills().join(" "))
    }
}

/// Public projection of a job: no contact columns, full description only
/// on request.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    pub id: Uuid,
    pub source: String,
    pub external_job_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    pub url: Option<String>,
    pub work_mode: WorkMode,
    pub job_type: JobType,
    pub skills: Vec<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub currency: String,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobView {
    pub fn from_row(row: &JobRow, full_details: bool) -> Self {
        Self {
            id: row.id,
            source: row.source.clone(),
            external_job_id: row.external_job_id.clone(),
            title: row.title.clone(),
            company: row.company.clone(),
            location: row.location.clone(),
            description: row.description.clone(),
            full_description: if full_details { row.full_description.clone() } else { None },
            url: row.url.clone(),
            work_mode: row.work_mode,
            job_type: row.job_type,
            skills: row.skills(),
            salary_min: row.salary_min,
            salary_max: row.salary_max,
            currency: row.currency.clone(),
            published_at: row.published_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_row(external_job_id: &str, description: &str) -> JobRow {
        let now = Utc::now();
        JobRow {
            id: Uuid::new_v4(),
            source: DEFAULT_SOURCE.to_string(),
            external_job_id: external_job_id.to_string(),
            title: "Desarrollador Python".to_string(),
            company: "Acme".to_string(),
            location: "CDMX".to_string(),
            description: description.chars().take(SUMMARY_CHARS).collect(),
            full_description: Some(description.to_string()),
            url: None,
            work_mode: WorkMode::Remote,
            job_type: JobType::FullTime,
            skills: r#"["Python"]"#.to_string(),
            salary_min: None,
            salary_max: None,
            currency: DEFAULT_CURRENCY.to_string(),
            contact_email: "ciphertext".to_string(),
            contact_email_hash: "hash".to_string(),
            contact_phone: None,
            contact_phone_hash: None,
            published_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&WorkMode::InPerson).unwrap(), r#""in-person""#);
        assert_eq!(serde_json::to_string(&JobType::FullTime).unwrap(), r#""full-time""#);
        assert_eq!(JobType::default(), JobType::FullTime);
    }

    #[test]
    fn test_view_hides_contact_and_full_description() {
        let row = sample_row("123", "Buscamos desarrollador con Python y SQL");
        let json = serde_json::to_value(JobView::from_row(&row, false)).unwrap();
        assert!(json.get("contact_email").is_none());
        assert!(json.get("full_description").is_none());
        assert_eq!(json["skills"], serde_json::json!(["Python"]));

        let json = serde_json::to_value(JobView::from_row(&row, true)).unwrap();
        assert_eq!(json["full_description"], "Buscamos desarrollador con Python y SQL");
    }

    #[test]
    fn test_store_key() {
        assert_eq!(JobRow::store_key("occ.com.mx", "42"), "job:occ.com.mx:42");
    }
}
