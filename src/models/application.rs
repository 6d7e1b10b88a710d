use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Error;

/// Pipeline stage of an application. The set is closed: there is no way to
/// add a custom stage at runtime.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    New,
    Screening,
    Interview,
    Offered,
    Hired,
    Rejected,
}

impl ApplicationStatus {
    /// All stages in pipeline order.
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::New,
        ApplicationStatus::Screening,
        ApplicationStatus::Interview,
        ApplicationStatus::Offered,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::New => "new",
            ApplicationStatus::Screening => "screening",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offered => "offered",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::New => "New",
            ApplicationStatus::Screening => "Screening",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offered => "Offered",
            ApplicationStatus::Hired => "Hired",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Column accent colour. Display only.
    pub fn color(&self) -> &'static str {
        match self {
            ApplicationStatus::New => "blue",
            ApplicationStatus::Screening => "yellow",
            ApplicationStatus::Interview => "purple",
            ApplicationStatus::Offered => "orange",
            ApplicationStatus::Hired => "green",
            ApplicationStatus::Rejected => "red",
        }
    }

    /// Badge style hint. Display only.
    pub fn badge(&self) -> &'static str {
        match self {
            ApplicationStatus::New => "bg-blue-100 text-blue-800",
            ApplicationStatus::Screening => "bg-yellow-100 text-yellow-800",
            ApplicationStatus::Interview => "bg-purple-100 text-purple-800",
            ApplicationStatus::Offered => "bg-orange-100 text-orange-800",
            ApplicationStatus::Hired => "bg-green-100 text-green-800",
            ApplicationStatus::Rejected => "bg-red-100 text-red-800",
        }
    }

    /// Zero-based index in pipeline order.
    pub fn position(&self) -> usize {
        match self {
            ApplicationStatus::New => 0,
            ApplicationStatus::Screening => 1,
            ApplicationStatus::Interview => 2,
            ApplicationStatus::Offered => 3,
            ApplicationStatus::Hired => 4,
            ApplicationStatus::Rejected => 5,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::Validation(format!("Unknown application status: {}", s)))
    }
}

/// Status as it arrives on the wire. Values outside the pipeline are kept
/// verbatim so one bad record cannot fail a whole list; they never render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordStatus {
    Known(ApplicationStatus),
    Unrecognized(String),
}

impl RecordStatus {
    pub fn stage(&self) -> Option<ApplicationStatus> {
        match self {
            RecordStatus::Known(status) => Some(*status),
            RecordStatus::Unrecognized(_) => None,
        }
    }

    pub fn is(&self, status: ApplicationStatus) -> bool {
        self.stage() == Some(status)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordStatus::Known(status) => status.as_str(),
            RecordStatus::Unrecognized(raw) => raw,
        }
    }
}

impl Default for RecordStatus {
    fn default() -> Self {
        RecordStatus::Known(ApplicationStatus::New)
    }
}

impl From<ApplicationStatus> for RecordStatus {
    fn from(status: ApplicationStatus) -> Self {
        RecordStatus::Known(status)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the candidate taken when the application was submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub field_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub value: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPositionRef {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: RecordStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub applicant: Applicant,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answers: Vec<Answer>,
    #[serde(
        default,
        deserialize_with = "lenient_rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_position: Option<JobPositionRef>,
}

/// The CMS sends `null` for fields that were never set.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ratings are whole stars in `[0, 5]`. Fractional values are rounded and
/// anything that is not a number reads as unrated.
fn lenient_rating<'de, D>(deserializer: D) -> std::result::Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(JsonValue::as_f64)
        .filter(|r| r.is_finite())
        .map(|r| r.round().clamp(0.0, 5.0) as u8))
}

impl Application {
    /// Rating used for ordering; absent counts as unrated (0).
    pub fn effective_rating(&self) -> u8 {
        self.rating.unwrap_or(0).min(5)
    }

    pub fn position_id(&self) -> Option<&str> {
        self.job_position.as_ref().map(|p| p.id.as_str())
    }

    /// Copy with only the status replaced. A rejection reason does not
    /// survive leaving the `rejected` stage.
    pub fn with_status(&self, status: ApplicationStatus) -> Application {
        let mut next = self.clone();
        next.status = status.into();
        if status != ApplicationStatus::Rejected {
            next.rejection_reason = None;
        }
        next
    }

    /// Copy with a previous status restored, keeping every other field.
    pub fn with_record_status(&self, status: RecordStatus) -> Application {
        let mut next = self.clone();
        next.status = status;
        next
    }

    /// Copy taking the reviewer-owned fields from `other`, status untouched.
    pub fn with_review_from(&self, other: &Application) -> Application {
        let mut next = self.clone();
        next.rating = other.rating;
        next.notes = other.notes.clone();
        next.rejection_reason = other.rejection_reason.clone();
        next
    }
}

/// Per-stage totals as returned by `/applications/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStats {
    pub total: u64,
    pub new: u64,
    pub screening: u64,
    pub interview: u64,
    pub offered: u64,
    pub hired: u64,
    pub rejected: u64,
}

impl ApplicationStats {
    pub fn tally<'a, I>(applications: I) -> Self
    where
        I: IntoIterator<Item = &'a Application>,
    {
        let mut stats = ApplicationStats::default();
        for application in applications {
            stats.total += 1;
            if let Some(stage) = application.status.stage() {
                *stats.slot_mut(stage) += 1;
            }
        }
        stats
    }

    pub fn count(&self, status: ApplicationStatus) -> u64 {
        match status {
            ApplicationStatus::New => self.new,
            ApplicationStatus::Screening => self.screening,
            ApplicationStatus::Interview => self.interview,
            ApplicationStatus::Offered => self.offered,
            ApplicationStatus::Hired => self.hired,
            ApplicationStatus::Rejected => self.rejected,
        }
    }

    fn slot_mut(&mut self, status: ApplicationStatus) -> &mut u64 {
        match status {
            ApplicationStatus::New => &mut self.new,
            ApplicationStatus::Screening => &mut self.screening,
            ApplicationStatus::Interview => &mut self.interview,
            ApplicationStatus::Offered => &mut self.offered,
            ApplicationStatus::Hired => &mut self.hired,
            ApplicationStatus::Rejected => &mut self.rejected,
        }
    }
}
