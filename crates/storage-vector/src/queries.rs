use ingestion_embedding::SharedEmbedder;
use ingestion_parameters::{parameterize, ScalarValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::QueryError;
use crate::executor::{RecordsFormat, SharedExecutor, StatementRequest};
use crate::schema::{product_by_id_sql, related_products_sql, search_sql, vector_literal};

pub const DEFAULT_SEARCH_LIMIT: usize = 5;
pub const MAX_SEARCH_LIMIT: usize = 100;
pub const RELATED_PRODUCT_LIMIT: usize = 5;

/// One `product_info` row without its embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub discounted_price: Option<String>,
    pub actual_price: Option<String>,
    pub discount_percentage: Option<String>,
    pub rating: Option<String>,
    pub rating_count: Option<String>,
    pub about_product: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedProduct {
    pub product_id: Option<String>,
    pub product_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub related: Vec<RelatedProduct>,
}

/// Similarity lookups over the product table.
pub struct ProductQueries {
    embedder: SharedEmbedder,
    executor: SharedExecutor,
}

impl ProductQueries {
    #[must_use]
    pub fn new(embedder: SharedEmbedder, executor: SharedExecutor) -> Self {
        Self { embedder, executor }
    }

    /// Products nearest to `text` in embedding space, closest first.
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str, limit: usize) -> Result<Vec<Product>, QueryError> {
        let limit = checked_limit(limit)?;
        let embedding = self.embedder.embed(text).await?;
        debug!(dimensions = embedding.len(), "embedded query");

        let parameters = parameterize(
            &["query_embedding", "limit"],
            &[
                ScalarValue::Text(vector_literal(&embedding)),
                ScalarValue::Integer(limit),
            ],
        )?;
        let outcome = self
            .executor
            .execute(
                StatementRequest::new(search_sql())
                    .with_parameters(parameters)
                    .with_records_format(RecordsFormat::Json),
            )
            .await?;
        let products: Vec<Product> = decode_records(outcome.formatted_records.as_deref())?;
        info!(results = products.len(), "search complete");
        Ok(products)
    }

    /// One product plus its nearest neighbours; `None` for unknown ids.
    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: &str) -> Result<Option<ProductDetail>, QueryError> {
        let parameters = parameterize(&["product_id"], &[ScalarValue::from(product_id)])?;
        let outcome = self
            .executor
            .execute(
                StatementRequest::new(product_by_id_sql())
                    .with_parameters(parameters)
                    .with_records_format(RecordsFormat::Json),
            )
            .await?;
        let Some(product) = decode_records::<Product>(outcome.formatted_records.as_deref())?
            .into_iter()
            .next()
        else {
            return Ok(None);
        };

        let parameters = parameterize(
            &["product_id", "limit"],
            &[
                ScalarValue::from(product_id),
                ScalarValue::Integer(checked_limit(RELATED_PRODUCT_LIMIT)?),
            ],
        )?;
        let outcome = self
            .executor
            .execute(
                StatementRequest::new(related_products_sql())
                    .with_parameters(parameters)
                    .with_records_format(RecordsFormat::Json),
            )
            .await?;
        let related = decode_records(outcome.formatted_records.as_deref())?;
        Ok(Some(ProductDetail { product, related }))
    }
}

fn checked_limit(limit: usize) -> Result<i64, QueryError> {
    if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
        return Err(QueryError::InvalidLimit {
            limit,
            max: MAX_SEARCH_LIMIT,
        });
    }
    i64::try_from(limit).map_err(|_| QueryError::InvalidLimit {
        limit,
        max: MAX_SEARCH_LIMIT,
    })
}

/// Decode a `formattedRecords` JSON array; absent records decode as empty.
pub fn decode_records<T: DeserializeOwned>(records: Option<&str>) -> Result<Vec<T>, QueryError> {
    match records {
        None => Ok(Vec::new()),
        Some(json) if json.trim().is_empty() => Ok(Vec::new()),
        Some(json) => serde_json::from_str(json).map_err(|e| QueryError::Decode(e.to_string())),
    }
}
