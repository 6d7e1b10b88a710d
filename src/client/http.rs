use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::api::ApplicationsApi;
use crate::config::Config;
use crate::dto::application_dto::{ErrorBody, StatusChangePayload, UpdateApplicationPayload};
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStats};

/// reqwest-backed client for the applications API.
#[derive(Clone)]
pub struct HttpApplicationsApi {
    client: Client,
    base_url: Url,
}

impl HttpApplicationsApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base_url, config.http_timeout())
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "API base URL cannot carry paths: {}",
                base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("API base URL cannot carry paths: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Turns a non-2xx response into `Error::Api`, taking the message from the
/// `{ "error": ... }` body when there is one.
async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

    warn!(status = status.as_u16(), %message, "applications API returned an error");
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let resp = check(resp).await?;
    Ok(resp.json::<T>().await?)
}

#[async_trait]
impl ApplicationsApi for HttpApplicationsApi {
    async fn list(&self, position_id: Option<String>) -> Result<Vec<Application>> {
        let url = self.endpoint(&["applications"])?;
        debug!(%url, position_id = ?position_id, "listing applications");

        let mut request = self.client.get(url);
        if let Some(position_id) = position_id.as_deref() {
            request = request.query(&[("positionId", position_id)]);
        }
        decode(request.send().await?).await
    }

    async fn get(&self, id: &str) -> Result<Application> {
        let url = self.endpoint(&["applications", id])?;
        decode(self.client.get(url).send().await?).await
    }

    async fn update(&self, id: &str, payload: UpdateApplicationPayload) -> Result<Application> {
        let url = self.endpoint(&["applications", id])?;
        decode(self.client.put(url).json(&payload).send().await?).await
    }

    async fn update_status(&self, id: &str, payload: StatusChangePayload) -> Result<Application> {
        let url = self.endpoint(&["applications", id, "status"])?;
        debug!(%url, status = %payload.status, "persisting status change");
        decode(self.client.patch(url).json(&payload).send().await?).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["applications", id])?;
        check(self.client.delete(url).send().await?).await?;
        Ok(())
    }

    async fn stats(&self) -> Result<ApplicationStats> {
        let url = self.endpoint(&["applications", "stats"])?;
        decode(self.client.get(url).send().await?).await
    }
}
