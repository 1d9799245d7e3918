//! Typed wrapper over the broadcaster's HTTP API.

use kairan_shared::dto::{ErrorBodyDto, HistoryEntryDto, PollResponseDto};
use reqwest::{Response, StatusCode};

use crate::error::ClientError;

/// Result of one `/messages` long poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Message(String),
    /// The poll window elapsed without a message
    Empty,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:8080`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn join(&self, client_id: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url("/join"))
            .query(&[("id", client_id)])
            .send()
            .await?;
        check(resp, client_id).await?;
        Ok(())
    }

    pub async fn leave(&self, client_id: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url("/leave"))
            .query(&[("id", client_id)])
            .send()
            .await?;
        check(resp, client_id).await?;
        Ok(())
    }

    pub async fn send(&self, client_id: &str, message: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url("/send"))
            .query(&[("id", client_id), ("message", message)])
            .send()
            .await?;
        check(resp, client_id).await?;
        Ok(())
    }

    /// Wait for the next message addressed to `client_id`
    ///
    /// Fails with [`ClientError::NotJoined`] when the server has no mailbox for the id.
    pub async fn poll(&self, client_id: &str) -> Result<PollOutcome, ClientError> {
        let resp = self
            .http
            .get(self.url("/messages"))
            .query(&[("id", client_id)])
            .send()
            .await?;
        let resp = check(resp, client_id).await?;

        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(PollOutcome::Empty);
        }
        let body: PollResponseDto = resp.json().await?;
        Ok(PollOutcome::Message(body.message))
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntryDto>, ClientError> {
        let resp = self.http.get(self.url("/history")).send().await?;
        let resp = check(resp, "").await?;
        Ok(resp.json().await?)
    }
}

/// Map non-2xx responses to `ClientError`
async fn check(resp: Response, client_id: &str) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBodyDto>(&text)
        .map(|body| body.error.message)
        .unwrap_or(text);

    Err(match status {
        StatusCode::BAD_REQUEST => ClientError::BadRequest(message),
        StatusCode::NOT_FOUND => ClientError::NotJoined(client_id.to_string()),
        StatusCode::SERVICE_UNAVAILABLE => ClientError::Unavailable(message),
        _ => ClientError::UnexpectedStatus {
            status: status.as_u16(),
            message,
        },
    })
}
