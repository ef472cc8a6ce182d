mod common;

use nl_vidstats::llm::LlmManager;
use nl_vidstats::llm::models::GenerationOptions;
use nl_vidstats::sql::{SqlSafetyValidator, clean, validate};
use nl_vidstats::{FailureKind, GenerationError, Translator};

#[tokio::test]
async fn stub_count_query_resolves_to_validated_sql() {
    let translator = Translator::new(common::stub_llm("SELECT COUNT(*) FROM videos"));
    let sql = translator.text_to_sql("How many videos are there?").await.unwrap();
    assert_eq!(sql.as_str(), "SELECT COUNT(*) FROM videos;");
}

#[tokio::test]
async fn stub_delete_is_untrusted_output() {
    let translator = Translator::new(common::stub_llm("DELETE FROM videos;"));
    let err = translator.text_to_sql("How many videos are there?").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::UntrustedOutputRejected);
}

#[tokio::test]
async fn chatty_model_output_is_reduced_to_one_statement() {
    let reply = "<s>Sure! Here is the query:\n```sql\nSELECT COALESCE(SUM(delta_views_count), 0)\nFROM video_snapshots\nWHERE DATE(created_at) = '2025-11-28'\n```\nThis sums the daily growth.</s>";
    let translator = Translator::new(common::stub_llm(reply));
    let sql = translator
        .text_to_sql("На сколько просмотров выросли все видео 28 ноября 2025?")
        .await
        .unwrap();
    assert_eq!(
        sql.as_str(),
        "SELECT COALESCE(SUM(delta_views_count), 0) FROM video_snapshots WHERE DATE(created_at) = '2025-11-28';"
    );
}

#[tokio::test]
async fn write_hidden_in_cte_is_rejected() {
    let reply = "SELECT 1; WITH gone AS (DELETE FROM videos RETURNING id) SELECT COUNT(*) FROM gone";
    let translator = Translator::new(common::stub_llm(reply));
    let err = translator.text_to_sql("How many videos?").await.unwrap_err();
    assert!(matches!(err, GenerationError::UntrustedOutputRejected(_)));
}

#[tokio::test]
async fn endpoint_down_is_distinct_from_rejection() {
    let llm = LlmManager::with_endpoint(Box::new(common::DownModel), GenerationOptions::default());
    let err = Translator::new(llm).text_to_sql("How many videos?").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::EndpointUnavailable);
    assert!(err.is_transient());
}

#[tokio::test]
async fn duckdb_dialect_validator_is_honored() {
    let translator = Translator::new(common::stub_llm("SELECT COUNT(*) FROM videos"))
        .with_validator(SqlSafetyValidator::for_dialect("duckdb").unwrap());
    assert!(translator.text_to_sql("How many videos?").await.is_ok());
}

#[tokio::test]
async fn concurrent_requests_do_not_interfere() {
    let translator = std::sync::Arc::new(Translator::new(common::stub_llm(
        "SELECT COUNT(*) FROM videos",
    )));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let translator = std::sync::Arc::clone(&translator);
            tokio::spawn(async move {
                let question = if i % 2 == 0 { "How many videos?" } else { "   " };
                translator.text_to_sql(question).await.map_err(|e| e.kind())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.await.unwrap();
        if i % 2 == 0 {
            assert_eq!(result.unwrap().as_str(), "SELECT COUNT(*) FROM videos;");
        } else {
            assert_eq!(result.unwrap_err(), FailureKind::MalformedInput);
        }
    }
}

#[test]
fn cleaned_output_round_trips_through_validation() {
    let cleaned = clean("```sql\nSELECT COUNT(*) FROM videos\n```");
    assert_eq!(cleaned, "SELECT COUNT(*) FROM videos;");
    assert_eq!(clean(&cleaned), cleaned);
    assert!(validate(&cleaned));
}
