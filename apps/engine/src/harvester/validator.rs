use thiserror::Error;
use tracing::warn;

use crate::harvester::JobRecord;

pub const TITLE_MIN_CHARS: usize = 4;
pub const TITLE_MAX_CHARS: usize = 200;
pub const FIELD_MAX_CHARS: usize = 200;
pub const EXTERNAL_ID_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MIN_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordIssue {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("{field} has {len} chars, expected {min}..={max}")]
    OutOfBounds {
        field: &'static str,
        len: usize,
        min: usize,
        max: usize,
    },
}

fn check(field: &'static str, value: &str, min: usize, max: usize) -> Result<(), RecordIssue> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(RecordIssue::Missing(field));
    }
    if len < min || len > max {
        return Err(RecordIssue::OutOfBounds { field, len, min, max });
    }
    Ok(())
}

/// Required fields present and within bounds.
pub fn validate(record: &JobRecord) -> Result<(), RecordIssue> {
    check("external_job_id", &record.external_job_id, 1, EXTERNAL_ID_MAX_CHARS)?;
    check("title", &record.title, TITLE_MIN_CHARS, TITLE_MAX_CHARS)?;
    check("company", &record.company, 1, FIELD_MAX_CHARS)?;
    check("location", &record.location, 1, FIELD_MAX_CHARS)?;
    check("description", &record.description, DESCRIPTION_MIN_CHARS, usize::MAX)?;
    Ok(())
}

/// Keeps valid records; each dropped record is logged. Returns the
/// survivors and the number dropped.
pub fn retain_valid(records: Vec<JobRecord>) -> (Vec<JobRecord>, usize) {
    let total = records.len();
    let valid: Vec<JobRecord> = records
        .into_iter()
        .filter(|record| match validate(record) {
            Ok(()) => true,
            Err(issue) => {
                warn!(
                    external_job_id = %record.external_job_id,
                    reason = %issue,
                    "dropping invalid job record"
                );
                false
            }
        })
        .collect();
    let dropped = total - valid.len();
    (valid, dropped)
}
