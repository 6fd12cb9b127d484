use std::sync::Arc;

use ingestion_embedding::{Embedder, EmbeddingConfig, HashEmbedder};
use ingestion_parameters::EncodedValue;
use storage_vector::schema::vector_literal;
use storage_vector::{
    ExecutorError, ProductQueries, QueryError, RecordingExecutor, RecordsFormat, StatementOutcome,
};

const SEARCH_RECORDS: &str = r#"[
  {"product_id":"B07JW9H4J1","product_name":"Wayona Nylon Braided USB to Lightning Fast Charging Cable","category":"Computers&Accessories|Accessories&Peripherals|Cables","discounted_price":"₹399","actual_price":"₹1,099","discount_percentage":"64%","rating":"4.2","rating_count":"24,269","about_product":"High Compatibility, Fast Charging"},
  {"product_id":"B096MSW6CT","product_name":"Sounce Fast Phone Charging Cable","category":"Computers&Accessories|Accessories&Peripherals|Cables","discounted_price":"₹199","actual_price":"₹1,899","discount_percentage":"90%","rating":"3.9","rating_count":"7,928","about_product":null}
]"#;

fn fixture() -> (Arc<HashEmbedder>, Arc<RecordingExecutor>, ProductQueries) {
    let embedder = Arc::new(HashEmbedder::new(EmbeddingConfig::new("hash".into(), 4)));
    let executor = Arc::new(RecordingExecutor::default());
    let queries = ProductQueries::new(embedder.clone(), executor.clone());
    (embedder, executor, queries)
}

#[tokio::test]
async fn search_binds_embedding_literal_and_limit() {
    let (embedder, executor, queries) = fixture();
    executor
        .script_response(Ok(StatementOutcome::records(SEARCH_RECORDS)))
        .await;

    let products = queries
        .search("fast charging cable", 5)
        .await
        .expect("search succeeds");
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].product_id.as_deref(), Some("B07JW9H4J1"));
    assert_eq!(products[1].about_product, None);

    let calls = executor.calls().await;
    assert_eq!(calls.len(), 1);
    let request = &calls[0];
    assert!(request.sql.contains("ORDER BY embedding <-> :query_embedding::vector LIMIT :limit"));
    assert_eq!(request.records_format, RecordsFormat::Json);

    let expected = vector_literal(&embedder.embed("fast charging cable").await.expect("embed"));
    assert_eq!(request.parameters[0].name, "query_embedding");
    assert_eq!(request.parameters[0].value, EncodedValue::String(expected));
    assert_eq!(request.parameters[1].name, "limit");
    assert_eq!(request.parameters[1].value, EncodedValue::Long(5));
}

#[tokio::test]
async fn zero_limit_never_reaches_the_database() {
    let (_, executor, queries) = fixture();
    let err = queries.search("cable", 0).await.expect_err("limit 0 rejected");
    assert!(matches!(err, QueryError::InvalidLimit { limit: 0, .. }));
    assert!(executor.calls().await.is_empty());
}

#[tokio::test]
async fn executor_failures_propagate() {
    let (_, executor, queries) = fixture();
    executor
        .script_response(Err(ExecutorError::Remote("relation does not exist".into())))
        .await;
    let err = queries.search("cable", 3).await.expect_err("remote failure");
    assert!(matches!(err, QueryError::Executor(ExecutorError::Remote(_))));
}

#[tokio::test]
async fn empty_result_sets_decode_as_no_products() {
    let (_, executor, queries) = fixture();
    executor
        .script_response(Ok(StatementOutcome::records("[]")))
        .await;
    let products = queries.search("cable", 5).await.expect("search succeeds");
    assert!(products.is_empty());
}

#[tokio::test]
async fn product_lookup_lists_related_products() {
    let (_, executor, queries) = fixture();
    executor
        .script_response(Ok(StatementOutcome::records(
            r#"[{"product_id":"B098NS6PVG","product_name":"Ambrane Unbreakable 60W Type C Cable"}]"#,
        )))
        .await;
    executor
        .script_response(Ok(StatementOutcome::records(
            r#"[{"product_id":"B07JW9H4J1","product_name":"Wayona Cable"},{"product_id":"B096MSW6CT","product_name":"Sounce Cable"}]"#,
        )))
        .await;

    let detail = queries
        .get_product("B098NS6PVG")
        .await
        .expect("lookup succeeds")
        .expect("product exists");
    assert_eq!(detail.product.product_id.as_deref(), Some("B098NS6PVG"));
    let related: Vec<_> = detail
        .related
        .iter()
        .filter_map(|p| p.product_id.as_deref())
        .collect();
    assert_eq!(related, ["B07JW9H4J1", "B096MSW6CT"]);

    let calls = executor.calls().await;
    assert_eq!(calls.len(), 2);
    assert!(calls[1].sql.contains("WHERE product_id <> :product_id"));
    assert_eq!(calls[1].parameters[1].value, EncodedValue::Long(5));

    let json = serde_json::to_value(&detail).expect("serializes");
    assert_eq!(json["product_id"], "B098NS6PVG");
    assert_eq!(json["related"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn unknown_products_are_none() {
    let (_, executor, queries) = fixture();
    executor
        .script_response(Ok(StatementOutcome::records("[]")))
        .await;
    let detail = queries.get_product("missing").await.expect("lookup succeeds");
    assert!(detail.is_none());
    assert_eq!(executor.calls().await.len(), 1, "no related lookup issued");
}
