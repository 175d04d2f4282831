use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use common::score::ScoreRecord;

/// Storage for finished games. Implementations keep their own locking.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn save(&self, record: ScoreRecord) -> Result<()>;

    /// Best `n` scores, highest first
    async fn top_n(&self, n: usize) -> Result<Vec<ScoreRecord>>;

    /// All scores of one player, highest first
    async fn by_player(&self, player: &str) -> Result<Vec<ScoreRecord>>;
}

/// Process-lifetime store. Scores are kept sorted best first; equal scores
/// stay in the order they were saved.
#[derive(Debug, Default)]
pub struct InMemoryScoreRepository {
    scores: RwLock<Vec<ScoreRecord>>,
}

impl InMemoryScoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.scores.read().await.len()
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    async fn save(&self, record: ScoreRecord) -> Result<()> {
        let mut scores = self.scores.write().await;
        let index = scores.partition_point(|existing| existing.score >= record.score);
        debug!(player = %record.player, score = record.score, rank = index + 1, "Saving score");
        scores.insert(index, record);
        Ok(())
    }

    async fn top_n(&self, n: usize) -> Result<Vec<ScoreRecord>> {
        let scores = self.scores.read().await;
        Ok(scores.iter().take(n).cloned().collect())
    }

    async fn by_player(&self, player: &str) -> Result<Vec<ScoreRecord>> {
        let scores = self.scores.read().await;
        Ok(scores
            .iter()
            .filter(|record| record.player == player)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(player: &str, score: u32) -> ScoreRecord {
        ScoreRecord {
            player: player.to_string(),
            score,
            date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn keeps_scores_sorted_descending() {
        let repo = InMemoryScoreRepository::new();
        for (player, score) in [("a", 30), ("b", 50), ("c", 10), ("d", 40)] {
            repo.save(record(player, score)).await.unwrap();
        }

        let top: Vec<u32> = repo.top_n(10).await.unwrap().iter().map(|r| r.score).collect();
        assert_eq!(top, vec![50, 40, 30, 10]);
        assert_eq!(repo.len().await, 4);
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let repo = InMemoryScoreRepository::new();
        repo.save(record("first", 20)).await.unwrap();
        repo.save(record("second", 20)).await.unwrap();
        repo.save(record("third", 30)).await.unwrap();

        let players: Vec<String> = repo
            .top_n(10)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.player)
            .collect();
        assert_eq!(players, vec!["third", "first", "second"]);
    }

    #[tokio::test]
    async fn top_n_truncates() {
        let repo = InMemoryScoreRepository::new();
        for score in 0..15 {
            repo.save(record("p", score * 10)).await.unwrap();
        }
        let top = repo.top_n(10).await.unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].score, 140);
        assert_eq!(top[9].score, 50);
    }

    #[tokio::test]
    async fn by_player_filters_and_sorts() {
        let repo = InMemoryScoreRepository::new();
        repo.save(record("a", 10)).await.unwrap();
        repo.save(record("b", 99)).await.unwrap();
        repo.save(record("a", 40)).await.unwrap();

        let scores: Vec<u32> = repo.by_player("a").await.unwrap().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![40, 10]);
        assert!(repo.by_player("zed").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_saves_are_all_kept() {
        let repo = std::sync::Arc::new(InMemoryScoreRepository::new());
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.save(record("p", i)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(repo.len().await, 20);
        let top = repo.top_n(1).await.unwrap();
        assert_eq!(top[0].score, 19);
    }
}
