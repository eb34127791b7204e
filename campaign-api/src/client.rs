use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::params::QueryParams;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// JSON-over-HTTP wrapper around one backend base URL.
///
/// No timeouts, retries or cancellation: a failed request is reported once
/// and the caller decides what to surface.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_http(reqwest::Client::new(), config)
    }

    pub fn with_http(http: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<T, ApiError> {
        let mut request = self.http.get(self.url(path));
        if !params.is_empty() {
            request = request.query(params.pairs());
        }
        self.execute(Method::GET, path, request).await
    }

    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = with_json(self.http.post(self.url(path)), body);
        self.execute(Method::POST, path, request).await
    }

    pub async fn put<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = with_json(self.http.put(self.url(path)), body);
        self.execute(Method::PUT, path, request).await
    }

    pub async fn del<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.http.delete(self.url(path));
        self.execute(Method::DELETE, path, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(%method, path, "api request");
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| {
                warn!(%method, path, %err, "api request failed to send");
                ApiError::Transport(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                &body,
            );
            warn!(%method, path, status = status.as_u16(), %err, "api request rejected");
            return Err(err);
        }

        if status == StatusCode::NO_CONTENT {
            return decode_body("");
        }
        let body = response.text().await?;
        decode_body(&body)
    }
}

fn with_json<B: Serialize + ?Sized>(request: RequestBuilder, body: Option<&B>) -> RequestBuilder {
    match body {
        Some(body) => request.json(body),
        None => request,
    }
}

/// An empty body stands for "no value": `T` is decoded from JSON `null`, so
/// `()`, `Option<_>` and `IgnoredAny` callers all accept a 204.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    if body.trim().is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::models::Party;

    #[test]
    fn joins_paths_without_double_slashes() {
        let client = ApiClient::new(&ApiConfig::new("http://localhost:8080/api/", "g"));
        assert_eq!(client.url("/groups/g/parties"), "http://localhost:8080/api/groups/g/parties");
        assert_eq!(client.url("group/g"), "http://localhost:8080/api/group/g");
    }

    #[test]
    fn empty_body_decodes_as_undefined() {
        assert!(decode_body::<()>("").is_ok());
        let none: Option<Party> = decode_body("  ").unwrap();
        assert!(none.is_none());
        assert!(decode_body::<Party>("").is_err());
    }
}
