#![allow(dead_code)]

use async_trait::async_trait;
use duckdb::Connection;
use nl_vidstats::llm::models::GenerationOptions;
use nl_vidstats::llm::{LlmError, LlmManager, ModelEndpoint};
use std::path::{Path, PathBuf};

/// Model stub that always answers with the same text.
pub struct StubModel(pub String);

#[async_trait]
impl ModelEndpoint for StubModel {
    async fn complete(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String, LlmError> {
        Ok(self.0.clone())
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

/// Model stub whose endpoint is down.
pub struct DownModel;

#[async_trait]
impl ModelEndpoint for DownModel {
    async fn complete(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String, LlmError> {
        Err(LlmError::ConnectionError("connection refused".to_string()))
    }

    fn model_name(&self) -> &str {
        "down"
    }
}

pub fn stub_llm(reply: &str) -> LlmManager {
    LlmManager::with_endpoint(Box::new(StubModel(reply.to_string())), GenerationOptions::default())
}

/// Creates a small videos database under `dir` and returns its path.
pub fn seed_database(dir: &Path) -> PathBuf {
    let path = dir.join("videos.duckdb");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "
        CREATE TABLE videos (
            id VARCHAR(36) PRIMARY KEY,
            creator_id VARCHAR(32) NOT NULL,
            video_created_at TIMESTAMP NOT NULL,
            views_count BIGINT NOT NULL DEFAULT 0,
            likes_count BIGINT NOT NULL DEFAULT 0,
            comments_count BIGINT NOT NULL DEFAULT 0,
            reports_count BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        );
        CREATE TABLE video_snapshots (
            id VARCHAR(32) PRIMARY KEY,
            video_id VARCHAR(36) NOT NULL REFERENCES videos(id),
            views_count BIGINT NOT NULL DEFAULT 0,
            likes_count BIGINT NOT NULL DEFAULT 0,
            comments_count BIGINT NOT NULL DEFAULT 0,
            reports_count BIGINT NOT NULL DEFAULT 0,
            delta_views_count BIGINT NOT NULL DEFAULT 0,
            delta_likes_count BIGINT NOT NULL DEFAULT 0,
            delta_comments_count BIGINT NOT NULL DEFAULT 0,
            delta_reports_count BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        );
        INSERT INTO videos VALUES
            ('v1', 'c1', '2025-11-01 10:00:00', 150000, 10, 1, 0, '2025-11-01 10:00:00', '2025-11-28 10:00:00'),
            ('v2', 'c1', '2025-11-02 10:00:00', 500, 3, 0, 0, '2025-11-02 10:00:00', '2025-11-28 10:00:00'),
            ('v3', 'c2', '2025-11-03 10:00:00', 200000, 40, 7, 1, '2025-11-03 10:00:00', '2025-11-28 10:00:00');
        INSERT INTO video_snapshots VALUES
            ('s1', 'v1', 100000, 5, 1, 0, 1000, 1, 0, 0, '2025-11-28 12:00:00', '2025-11-28 12:00:00'),
            ('s2', 'v3', 190000, 30, 5, 1, 2500, 4, 1, 0, '2025-11-28 13:00:00', '2025-11-28 13:00:00'),
            ('s3', 'v2', 500, 3, 0, 0, 0, 0, 0, 0, '2025-11-28 14:00:00', '2025-11-28 14:00:00');
        ",
    )
    .unwrap();
    path
}
