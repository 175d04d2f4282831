use anyhow::{anyhow, Context, Result};
use common::score::{ApiResponse, PlayerStats, SavedScore, ScoreRecord, ScoreSubmission};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Blocking client for the score service. Calls happen between games, so
/// the UI loop can afford to wait on them.
pub struct ScoreClient {
    base_url: String,
    http: Client,
}

impl ScoreClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn submit(&self, player: &str, score: u32) -> Result<SavedScore> {
        let submission = ScoreSubmission {
            player: player.to_string(),
            score: score as i64,
        };
        let body = self
            .http
            .post(self.endpoint("game/scores"))
            .json(&submission)
            .send()
            .context("Failed to reach score service")?
            .text()
            .context("Failed to read score service response")?;

        let saved = decode_envelope::<SavedScore>(&body)?;
        info!("Submitted score {} for {}", saved.score, saved.player);
        Ok(saved)
    }

    pub fn high_scores(&self) -> Result<Vec<ScoreRecord>> {
        self.get("game/scores")
    }

    pub fn player_stats(&self, player: &str) -> Result<PlayerStats> {
        self.get(&format!("game/stats/{}", player))
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        debug!("GET {}", url);
        let body = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("Failed to reach {}", url))?
            .text()
            .context("Failed to read score service response")?;
        decode_envelope(&body)
    }
}

/// Unwraps `{success, data, message}`, turning a failure envelope into an error.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T> {
    let response: ApiResponse<T> =
        serde_json::from_str(body).context("Score service sent an unexpected response")?;

    if !response.success {
        let message = response.message.unwrap_or_else(|| "Request failed".to_string());
        return Err(match response.details {
            Some(details) if !details.is_empty() => anyhow!("{}: {}", message, details.join(", ")),
            _ => anyhow!(message),
        });
    }
    response
        .data
        .ok_or_else(|| anyhow!("Score service response had no data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_cleanly() {
        let client = ScoreClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.endpoint("game/scores"), "http://localhost:5000/api/game/scores");
        assert_eq!(client.endpoint("/health"), "http://localhost:5000/api/health");
    }

    #[test]
    fn decodes_success_envelope() {
        let body = r#"{"success":true,"data":[{"player":"B","score":50,"date":"2024-01-01T00:00:00Z"}]}"#;
        let scores: Vec<ScoreRecord> = decode_envelope(body).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].player, "B");
        assert_eq!(scores[0].score, 50);
    }

    #[test]
    fn failure_envelope_becomes_error() {
        let body = r#"{"success":false,"message":"Invalid score submission","details":["player must not be empty"]}"#;
        let err = decode_envelope::<SavedScore>(body).unwrap_err();
        assert_eq!(err.to_string(), "Invalid score submission: player must not be empty");

        let err = decode_envelope::<SavedScore>(r#"{"success":false,"message":"Failed to save score"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Failed to save score");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode_envelope::<SavedScore>("<html>").is_err());
        assert!(decode_envelope::<SavedScore>(r#"{"success":true}"#).is_err());
    }
}
