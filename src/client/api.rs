use async_trait::async_trait;

use crate::dto::application_dto::{StatusChangePayload, UpdateApplicationPayload};
use crate::error::Result;
use crate::models::application::{Application, ApplicationStats};

/// The applications endpoints the board talks to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationsApi: Send + Sync {
    /// `GET /applications?positionId=`
    async fn list(&self, position_id: Option<String>) -> Result<Vec<Application>>;

    /// `GET /applications/{id}`
    async fn get(&self, id: &str) -> Result<Application>;

    /// `PUT /applications/{id}`
    async fn update(&self, id: &str, payload: UpdateApplicationPayload) -> Result<Application>;

    /// `PATCH /applications/{id}/status`
    async fn update_status(&self, id: &str, payload: StatusChangePayload) -> Result<Application>;

    /// `DELETE /applications/{id}`
    async fn delete(&self, id: &str) -> Result<()>;

    /// `GET /applications/stats`
    async fn stats(&self) -> Result<ApplicationStats>;
}
