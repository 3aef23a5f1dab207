use crate::constants::*;
use crate::errors::{AppError, AppResult};
use crate::models::{
    ApiEnvelope, LoginResponse, Record, RecordPage, Segment, SegmentPage, SessionFilter,
    TimeWindow,
};
use crate::utils::to_rfc3339z;
use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Thin wrapper around the NAC query API.
///
/// Holds the HTTP client, the base URL, the organization identifier, and —
/// after [`login`](Self::login) — the access token sent as a bearer
/// authorization header on every query. The token is valid for the duration
/// of the run; there is no refresh logic.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    org_id: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: Url, org_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            org_id,
            token: None,
        }
    }

    /// Exchanges the long-lived key credentials for a short-lived access
    /// token.
    ///
    /// # Errors
    ///
    /// Any non-success response, network failure, or unparseable body is
    /// returned as `AuthError` — the caller is expected to abort the run;
    /// there is no retry.
    pub async fn login(&mut self, key_id: &str, key_value: &str) -> AppResult<()> {
        let url = self.endpoint(LOGIN_PATH)?;
        info!("Logging in");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .query(&[("keyID", key_id), ("keyValue", key_value)])
            .timeout(Duration::from_secs(LOGIN_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| AppError::AuthError(format!("Login request failed: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::AuthError(format!("Login rejected: {e}")))?;

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| AppError::AuthError(format!("Unexpected login response: {e}")))?;

        self.token = Some(body.token);
        info!("Login successful");
        Ok(())
    }

    /// Fetches one page of session records for a window.
    ///
    /// The query carries the organization identifier, the window bounds as
    /// RFC 3339 `Z` timestamps, the page limit and offset, and whatever the
    /// filter adds (status, session type, segment).
    pub async fn session_list(
        &self,
        filter: &SessionFilter,
        window: &TimeWindow,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<Record>> {
        let mut payload = json!({
            "orgID": self.org_id,
            "fromTimestamp": to_rfc3339z(&window.from),
            "toTimestamp": to_rfc3339z(&window.to),
            "limit": limit,
            "offset": offset,
        });
        if let Some(status) = &filter.status {
            payload["status"] = json!(status);
        }
        if let Some(session_type) = &filter.session_type {
            payload["sessionType"] = json!(session_type);
        }
        if let Some(segment_id) = &filter.segment_id {
            payload["filters"] = json!([{ "field": "segment_id", "value": segment_id }]);
        }

        let page: RecordPage = self.post_query(SESSION_LIST_PATH, &payload).await?;
        Ok(page.records)
    }

    /// Fetches all records of one statistic type from `from` onwards.
    pub async fn stats_get(&self, stat_type: &str, from: &DateTime<Utc>) -> AppResult<Vec<Record>> {
        let payload = json!({
            "orgID": self.org_id,
            "type": stat_type,
            "from": to_rfc3339z(from),
        });
        let page: RecordPage = self.post_query(STATS_GET_PATH, &payload).await?;
        Ok(page.records)
    }

    /// Lists the organization's configured segments.
    pub async fn segment_list(&self) -> AppResult<Vec<Segment>> {
        let payload = json!({ "orgID": self.org_id });
        let page: SegmentPage = self.post_query(SEGMENT_LIST_PATH, &payload).await?;
        Ok(page.records)
    }

    /// Fetches extended identity details for one client MAC.
    pub async fn client_get(&self, mac: &str) -> AppResult<Record> {
        let payload = json!({ "orgID": self.org_id, "mac": mac });
        self.post_query(CLIENT_GET_PATH, &payload).await
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url.join(path).map_err(Into::into)
    }

    fn bearer(&self) -> AppResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| AppError::AuthError("Not logged in".into()))
    }

    /// POSTs a query payload and unwraps the `{error, data}` envelope.
    ///
    /// A truthy `error` field or a missing `data` field is an `ApiError`
    /// even when the HTTP status is 200.
    async fn post_query<T: DeserializeOwned + Default>(&self, path: &str, payload: &Value) -> AppResult<T> {
        let url = self.endpoint(path)?;
        let token = self.bearer()?;
        debug!(endpoint = path, "Issuing query");

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(payload)
            .timeout(Duration::from_secs(QUERY_TIMEOUT_SECS))
            .send()
            .await?
            .error_for_status()?;

        let envelope: ApiEnvelope<T> = response.json().await.map_err(|e| AppError::ApiError {
            endpoint: path.to_string(),
            message: format!("invalid response body: {e}"),
        })?;

        if let Some(message) = envelope.error_message() {
            return Err(AppError::ApiError {
                endpoint: path.to_string(),
                message,
            });
        }

        envelope.data.ok_or_else(|| AppError::ApiError {
            endpoint: path.to_string(),
            message: "response is missing the data field".into(),
        })
    }
}
