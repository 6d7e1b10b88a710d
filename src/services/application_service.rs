use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dto::application_dto::{
    CreateApplicationPayload, StatusChangePayload, UpdateApplicationPayload,
};
use crate::error::{Error, Result};
use crate::models::application::{
    Application, ApplicationStats, ApplicationStatus, JobPositionRef, RecordStatus,
};

/// In-memory applications repository behind the API service.
#[derive(Clone, Default)]
pub struct ApplicationService {
    records: Arc<RwLock<HashMap<String, Application>>>,
}

impl ApplicationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, applications: Vec<Application>) -> usize {
        let mut records = self.records.write().await;
        let count = applications.len();
        for application in applications {
            records.insert(application.id.clone(), application);
        }
        count
    }

    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Newest first, optionally restricted to one position.
    pub async fn list(&self, position_id: Option<&str>) -> Vec<Application> {
        let records = self.records.read().await;
        let mut items: Vec<Application> = records
            .values()
            .filter(|a| position_id.map_or(true, |p| a.position_id() == Some(p)))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.applied_at.cmp(&a.applied_at).then_with(|| a.id.cmp(&b.id)));
        items
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Application> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    pub async fn create(&self, payload: CreateApplicationPayload) -> Result<Application> {
        let application = Application {
            id: Uuid::new_v4().to_string(),
            status: RecordStatus::Known(ApplicationStatus::New),
            applicant: payload.applicant.into(),
            answers: payload.answers,
            rating: None,
            notes: None,
            rejection_reason: None,
            applied_at: Some(payload.applied_at.unwrap_or_else(Utc::now)),
            job_position: Some(JobPositionRef {
                id: payload.position_id,
                title: payload.position_title,
            }),
        };
        self.records
            .write()
            .await
            .insert(application.id.clone(), application.clone());
        tracing::info!(application_id = %application.id, "application created");
        Ok(application)
    }

    pub async fn update(&self, id: &str, payload: UpdateApplicationPayload) -> Result<Application> {
        let mut records = self.records.write().await;
        let application = records
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))?;

        if let Some(status) = payload.status {
            *application = application.with_status(status);
        }
        if let Some(rating) = payload.rating {
            application.rating = Some(rating);
        }
        if let Some(notes) = payload.notes {
            application.notes = Some(notes);
        }
        if let Some(answers) = payload.answers {
            application.answers = answers;
        }
        if application.status.is(ApplicationStatus::Rejected) {
            if let Some(reason) = payload.rejection_reason {
                application.rejection_reason = Some(reason);
            }
        }
        Ok(application.clone())
    }

    pub async fn update_status(
        &self,
        id: &str,
        payload: StatusChangePayload,
    ) -> Result<Application> {
        let mut records = self.records.write().await;
        let application = records
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))?;

        let previous = application.status.clone();
        *application = application.with_status(payload.status);
        if payload.status == ApplicationStatus::Rejected {
            application.rejection_reason = payload.rejection_reason;
        }
        if let Some(notes) = payload.notes {
            application.notes = Some(notes);
        }
        if let Some(rating) = payload.rating {
            application.rating = Some(rating);
        }
        tracing::info!(
            application_id = id,
            from = %previous,
            to = %payload.status,
            "application status changed"
        );
        Ok(application.clone())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.records
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    pub async fn stats(&self) -> ApplicationStats {
        let records = self.records.read().await;
        ApplicationStats::tally(records.values())
    }
}
