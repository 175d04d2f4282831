use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use common::score::{
    ApiResponse, HIGH_SCORE_LIMIT, PlayerStats, SavedScore, ScoreRecord, ScoreSubmission,
};

use super::error::{ApiError, OrInternal};
use crate::repository::ScoreRepository;

/// Longest accepted player name, in characters
pub const MAX_PLAYER_NAME_LEN: usize = 32;

/// State for score endpoints
#[derive(Clone)]
pub struct ScoreState {
    pub repository: Arc<dyn ScoreRepository>,
}

/// Checks a submission and normalises the player name.
pub fn validate_submission(submission: ScoreSubmission) -> Result<SavedScore, Vec<String>> {
    let mut errors = Vec::new();
    let player = submission.player.trim().to_string();

    if player.is_empty() {
        errors.push("Player name must not be empty".to_string());
    }
    if player.chars().count() > MAX_PLAYER_NAME_LEN {
        errors.push(format!(
            "Player name must be at most {} characters long",
            MAX_PLAYER_NAME_LEN
        ));
    }

    let score = u32::try_from(submission.score);
    if score.is_err() {
        errors.push("Score must be a non-negative integer".to_string());
    }

    match score {
        Ok(score) if errors.is_empty() => Ok(SavedScore { player, score }),
        _ => Err(errors),
    }
}

/// POST /api/game/scores
pub async fn save_score(
    State(state): State<ScoreState>,
    payload: Result<Json<ScoreSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<SavedScore>>), ApiError> {
    let Json(submission) = payload.map_err(|rejection| ApiError::Validation(vec![rejection.body_text()]))?;
    let saved = validate_submission(submission).map_err(ApiError::Validation)?;

    state
        .repository
        .save(ScoreRecord {
            player: saved.player.clone(),
            score: saved.score,
            date: Utc::now(),
        })
        .await
        .or_internal("Failed to save score")?;

    info!("Saved score {} for {}", saved.score, saved.player);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(saved))))
}

/// GET /api/game/scores
pub async fn get_high_scores(
    State(state): State<ScoreState>,
) -> Result<Json<ApiResponse<Vec<ScoreRecord>>>, ApiError> {
    let scores = state
        .repository
        .top_n(HIGH_SCORE_LIMIT)
        .await
        .or_internal("Failed to fetch high scores")?;
    Ok(Json(ApiResponse::ok(scores)))
}

/// GET /api/game/stats/:player_id
pub async fn get_player_stats(
    State(state): State<ScoreState>,
    Path(player_id): Path<String>,
) -> Result<Json<ApiResponse<PlayerStats>>, ApiError> {
    let scores = state
        .repository
        .by_player(&player_id)
        .await
        .or_internal("Failed to fetch player stats")?;
    Ok(Json(ApiResponse::ok(PlayerStats::from_sorted_scores(&player_id, &scores))))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
