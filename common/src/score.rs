use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of entries in the public high score table
pub const HIGH_SCORE_LIMIT: usize = 10;

/// Number of best scores listed in a player's stats
pub const PLAYER_TOP_SCORES: usize = 5;

/// Body of `POST /api/game/scores`. The score is signed so that a negative
/// value reaches validation instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub player: String,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedScore {
    pub player: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player: String,
    pub score: u32,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub player: String,
    pub games_played: usize,
    pub highest_score: u32,
    pub average_score: u32,
    pub last_scores: Vec<ScoreRecord>,
}

impl PlayerStats {
    /// Summarise a player's scores. `scores` must already be sorted best first.
    pub fn from_sorted_scores(player: &str, scores: &[ScoreRecord]) -> Self {
        let games_played = scores.len();
        let highest_score = scores.first().map(|s| s.score).unwrap_or(0);
        let average_score = if games_played > 0 {
            let total: u64 = scores.iter().map(|s| s.score as u64).sum();
            (total as f64 / games_played as f64).round() as u32
        } else {
            0
        };

        PlayerStats {
            player: player.to_string(),
            games_played,
            highest_score,
            average_score,
            last_scores: scores.iter().take(PLAYER_TOP_SCORES).cloned().collect(),
        }
    }
}

/// Envelope used by every score service response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: None,
            details: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            message: Some(message.into()),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(player: &str, score: u32) -> ScoreRecord {
        ScoreRecord {
            player: player.to_string(),
            score,
            date: Utc::now(),
        }
    }

    #[test]
    fn stats_for_unknown_player_are_zero() {
        let stats = PlayerStats::from_sorted_scores("nobody", &[]);
        assert_eq!(stats.games_played, 0);
        assert_eq!(stats.highest_score, 0);
        assert_eq!(stats.average_score, 0);
        assert!(stats.last_scores.is_empty());
    }

    #[test]
    fn average_is_rounded() {
        let stats = PlayerStats::from_sorted_scores("a", &[record("a", 15), record("a", 10)]);
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.highest_score, 15);
        assert_eq!(stats.average_score, 13);
    }

    #[test]
    fn keeps_five_best() {
        let scores: Vec<ScoreRecord> = (0..8).rev().map(|i| record("a", i * 10)).collect();
        let stats = PlayerStats::from_sorted_scores("a", &scores);
        assert_eq!(stats.last_scores.len(), 5);
        assert_eq!(stats.last_scores[0].score, 70);
        assert_eq!(stats.last_scores[4].score, 30);
    }

    #[test]
    fn error_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::error("Failed to save score")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Failed to save score");
        assert!(json.get("data").is_none());
        assert!(json.get("details").is_none());
    }

    /// Generic over any payload type, the way hosts unwrap responses.
    fn parse_envelope<T: serde::de::DeserializeOwned>(body: &str) -> ApiResponse<T> {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn envelopes_parse_for_payloads_without_default() {
        let saved: ApiResponse<SavedScore> = parse_envelope(r#"{"success":true,"data":{"player":"A","score":30}}"#);
        assert_eq!(saved.data, Some(SavedScore { player: "A".to_string(), score: 30 }));

        let failed: ApiResponse<SavedScore> = parse_envelope(r#"{"success":false,"message":"Failed to save score"}"#);
        assert_eq!(failed.data, None);
        assert_eq!(failed.message.as_deref(), Some("Failed to save score"));
        assert_eq!(failed.details, None);
    }

    #[test]
    fn stats_use_camel_case() {
        let json = serde_json::to_value(PlayerStats::from_sorted_scores("a", &[])).unwrap();
        assert_eq!(json["gamesPlayed"], 0);
        assert_eq!(json["lastScores"], serde_json::json!([]));
    }
}
