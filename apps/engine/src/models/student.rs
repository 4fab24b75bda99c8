use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cv::{EducationEntry, ExperienceEntry, Language};
use crate::models::parse_json_list;

/// A persisted student profile. `email` / `phone` hold ciphertext; lookups
/// go through `email_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub email_hash: String,
    pub phone: Option<String>,
    pub phone_hash: Option<String>,
    pub program: Option<String>,
    pub language: Language,
    pub objective: Option<String>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    /// JSON array serialized as a string.
    pub skills: String,
    /// JSON array serialized as a string.
    pub soft_skills: String,
    pub projects: Vec<String>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
    pub industry: Option<String>,
    pub seniority: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentRow {
    pub fn store_key(id: Uuid) -> String {
        format!("student:{id}")
    }

    pub fn email_index_key(email_hash: &str) -> String {
        format!("student:email:{email_hash}")
    }

    pub fn skills(&self) -> Vec<String> {
        parse_json_list("skills", &self.skills, &self.id.to_string())
    }

    pub fn soft_skills(&self) -> Vec<String> {
        parse_json_list("soft_skills", &self.soft_skills, &self.id.to_string())
    }
}

/// Public projection of a student: hashes only, never contact ciphertext.
#[derive(Debug, Clone, Serialize)]
pub struct StudentView {
    pub id: Uuid,
    pub name: String,
    pub email_hash: String,
    pub program: Option<String>,
    pub language: Language,
    pub objective: Option<String>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub projects: Vec<String>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
    pub industry: Option<String>,
    pub seniority: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&StudentRow> for StudentView {
    fn from(row: &StudentRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            email_hash: row.email_hash.clone(),
            program: row.program.clone(),
            language: row.language,
            objective: row.objective.clone(),
            education: row.education.clone(),
            experience: row.experience.clone(),
            skills: row.skills(),
            soft_skills: row.soft_skills(),
            projects: row.projects.clone(),
            certifications: row.certifications.clone(),
            languages: row.languages.clone(),
            industry: row.industry.clone(),
            seniority: row.seniority.clone(),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
