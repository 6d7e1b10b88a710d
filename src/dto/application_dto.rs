use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::application::{Answer, Applicant, ApplicationStatus};

/// Body of `PATCH /applications/{id}/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangePayload {
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[validate(range(max = 5, message = "Rating must be between 0 and 5"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl StatusChangePayload {
    pub fn to(status: ApplicationStatus) -> Self {
        Self {
            status,
            notes: None,
            rating: None,
            rejection_reason: None,
        }
    }

    /// Whether the payload carries reviewer fields besides the status.
    pub fn has_review_fields(&self) -> bool {
        self.notes.is_some() || self.rating.is_some() || self.rejection_reason.is_some()
    }
}

/// Body of `PUT /applications/{id}`: only the fields present are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[validate(range(max = 5, message = "Rating must be between 0 and 5"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<Answer>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplicantPayload {
    #[validate(length(min = 1, message = "Applicant name is required"))]
    pub name: String,
    #[validate(email(message = "Applicant email is invalid"))]
    pub email: String,
}

impl From<ApplicantPayload> for Applicant {
    fn from(payload: ApplicantPayload) -> Self {
        Applicant {
            name: payload.name,
            email: payload.email,
        }
    }
}

/// Body of `POST /applications`, used to seed the service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationPayload {
    #[validate(length(min = 1, message = "positionId must not be empty"))]
    pub position_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_title: Option<String>,
    #[validate(nested)]
    pub applicant: ApplicantPayload,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationListQuery {
    pub position_id: Option<String>,
}

/// Error body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
