use super::candidate::MatchesResponse;
use super::{HealthError, MatchBackend, MatchCandidate, RetrievalError, SubmissionError};
use crate::config::{BackendConfig, ConfigError};
use crate::conversation::ProfileRecord;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

const UNKNOWN_ID: &str = "unknown";

/// Identifier from a save-profile response: `user_id`, then `id`, else `"unknown"`.
pub fn extract_identifier(body: &Value) -> String {
    ["user_id", "id"]
        .iter()
        .filter_map(|key| match body.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .next()
        .unwrap_or_else(|| UNKNOWN_ID.to_string())
}

/// HTTP client for the profile and match endpoints.
#[derive(Debug, Clone)]
pub struct MatchClient {
    client: Client,
    base_url: Url,
    save_profile_path: String,
    match_path: String,
}

impl MatchClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("saheli-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
            save_profile_path: config.save_profile_path.trim_matches('/').to_string(),
            match_path: config.match_path.trim_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn save_profile_url(&self) -> Result<Url, String> {
        self.base_url
            .join(&self.save_profile_path)
            .map_err(|e| e.to_string())
    }

    /// `<base>/<match_path>/<id>` with `id` encoded as a single segment.
    pub fn match_url(&self, id: &str) -> Result<Url, String> {
        let mut url = self
            .base_url
            .join(&format!("{}/", self.match_path))
            .map_err(|e| e.to_string())?;
        url.path_segments_mut()
            .map_err(|_| "Base URL cannot carry a path".to_string())?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// `true` when `/health` answers with `"status": "ok"`.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<bool, HealthError> {
        let url = self.base_url.join("health")?;
        let body: Value = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let healthy = body.get("status").and_then(Value::as_str) == Some("ok");
        info!(healthy, "Backend health checked");
        Ok(healthy)
    }
}

#[async_trait]
impl MatchBackend for MatchClient {
    #[instrument(skip(self, profile))]
    async fn submit_profile(&self, profile: &ProfileRecord) -> Result<String, SubmissionError> {
        let url = self.save_profile_url().map_err(SubmissionError::Transport)?;

        let response = self
            .client
            .post(url)
            .json(profile)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SubmissionError::Timeout
                } else {
                    SubmissionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Profile submission rejected");
            return Err(SubmissionError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SubmissionError::Parse(e.to_string()))?;
        debug!(response = %body, "Profile service response");

        Ok(extract_identifier(&body))
    }

    #[instrument(skip(self))]
    async fn fetch_matches(&self, id: &str) -> Result<Vec<MatchCandidate>, RetrievalError> {
        let url = self.match_url(id).map_err(RetrievalError::Transport)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RetrievalError::Timeout
            } else {
                RetrievalError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status(status.as_u16()));
        }

        let body: MatchesResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Parse(e.to_string()))?;
        Ok(body.matches.into_iter().map(MatchCandidate::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{MatchOutcome, MatchRetriever, MatchSource};
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::sync::Arc;

    fn client_for(server: &Server) -> MatchClient {
        let config = BackendConfig {
            base_url: server.url(),
            request_timeout_seconds: 5,
            ..Default::default()
        };
        MatchClient::new(&config).unwrap()
    }

    fn profile() -> ProfileRecord {
        ProfileRecord {
            name: Some("Asha".into()),
            personality: Some("Introvert".into()),
            habits: Some("Neither".into()),
            budget: Some("10-15k".into()),
            city: Some("Bangalore".into()),
        }
    }

    #[test]
    fn identifier_prefers_user_id_then_id() {
        assert_eq!(extract_identifier(&json!({"user_id": "u-1", "id": "x"})), "u-1");
        assert_eq!(extract_identifier(&json!({"id": 42})), "42");
        assert_eq!(extract_identifier(&json!({"status": "saved"})), "unknown");
        assert_eq!(extract_identifier(&json!({"user_id": ""})), "unknown");
    }

    #[test]
    fn match_url_encodes_the_identifier() {
        let config = BackendConfig {
            base_url: "http://localhost:5000/app".into(),
            ..Default::default()
        };
        let client = MatchClient::new(&config).unwrap();
        assert_eq!(
            client.match_url("a b/c").unwrap().as_str(),
            "http://localhost:5000/app/match-user/a%20b%2Fc"
        );
    }

    #[tokio::test]
    async fn submits_profile_as_flat_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/save_profile")
            .match_body(Matcher::Json(json!({
                "name": "Asha",
                "personality": "Introvert",
                "habits": "Neither",
                "budget": "10-15k",
                "city": "Bangalore"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"success","user_id":"u-42"}"#)
            .create_async()
            .await;

        let id = client_for(&server).submit_profile(&profile()).await.unwrap();
        assert_eq!(id, "u-42");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn submission_http_error_is_reported() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/save_profile")
            .with_status(500)
            .create_async()
            .await;

        let result = client_for(&server).submit_profile(&profile()).await;
        assert_eq!(result, Err(SubmissionError::Status(500)));
    }

    #[tokio::test]
    async fn submission_with_non_json_body_is_a_parse_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/save_profile")
            .with_status(200)
            .with_body("saved!")
            .create_async()
            .await;

        let result = client_for(&server).submit_profile(&profile()).await;
        assert!(matches!(result, Err(SubmissionError::Parse(_))));
    }

    #[tokio::test]
    async fn live_matches_keep_their_scores() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/match-user/u-42")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "matches": [{
                        "name": "Meera Iyer",
                        "profession": "Architect",
                        "city": "Chennai",
                        "avatar": "🧑‍🎨",
                        "score": 0.876
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let matches = client_for(&server).fetch_matches("u-42").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Meera Iyer");
        assert_eq!(matches[0].compatibility.percentage(), "87.6%");
    }

    #[tokio::test]
    async fn not_found_lookup_falls_back_end_to_end() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/save_profile")
            .with_status(200)
            .with_body(r#"{"id":"u-9"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/match-user/u-9")
            .with_status(404)
            .with_body(r#"{"error":"User u-9 not found"}"#)
            .create_async()
            .await;

        let retriever = MatchRetriever::new(Arc::new(client_for(&server)));
        let outcome = retriever.find_matches(&profile()).await.unwrap();
        assert_eq!(outcome.source, MatchSource::Fallback);
        assert_eq!(outcome, MatchOutcome::fallback(RetrievalError::Status(404)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let config = BackendConfig {
            base_url: "http://127.0.0.1:9/".into(),
            request_timeout_seconds: 2,
            ..Default::default()
        };
        let client = MatchClient::new(&config).unwrap();

        let result = client.submit_profile(&profile()).await;
        assert!(matches!(
            result,
            Err(SubmissionError::Transport(_)) | Err(SubmissionError::Timeout)
        ));
    }

    #[tokio::test]
    async fn health_reads_status_field() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status":"ok","message":"SaheliSync is running."}"#)
            .create_async()
            .await;

        assert!(matches!(client_for(&server).health().await, Ok(true)));
    }

    #[tokio::test]
    async fn health_failure_is_its_own_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(503)
            .create_async()
            .await;

        assert!(matches!(
            client_for(&server).health().await,
            Err(HealthError::Request(_))
        ));
    }

    #[tokio::test]
    async fn any_success_status_is_accepted_for_lookups() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/match-user/u-3")
            .with_status(203)
            .with_body(r#"{"matches":[{"name":"Kavya","profession":"Designer","city":"Pune","score":0.5}]}"#)
            .create_async()
            .await;

        let matches = client_for(&server).fetch_matches("u-3").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].compatibility.percentage(), "50.0%");
    }
}
