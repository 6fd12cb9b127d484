//! The `product_info` table and the statements issued against it.

use std::fmt::Display;

pub const TABLE_NAME: &str = "product_info";
pub const EMBEDDING_COLUMN: &str = "embedding";

/// Text columns, in table order. All are stored as `varchar`.
pub const PRODUCT_COLUMNS: [&str; 9] = [
    "product_id",
    "product_name",
    "category",
    "discounted_price",
    "actual_price",
    "discount_percentage",
    "rating",
    "rating_count",
    "about_product",
];

/// Every column written by an import: the product columns then `embedding`.
#[must_use]
pub fn table_columns() -> Vec<&'static str> {
    PRODUCT_COLUMNS
        .iter()
        .copied()
        .chain(std::iter::once(EMBEDDING_COLUMN))
        .collect()
}

pub const CREATE_EXTENSION_SQL: &str = "CREATE EXTENSION IF NOT EXISTS vector";

#[must_use]
pub fn create_table_sql() -> String {
    let columns = PRODUCT_COLUMNS
        .iter()
        .map(|column| format!("{column} varchar"))
        .chain(std::iter::once(format!("{EMBEDDING_COLUMN} vector")))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {TABLE_NAME} ({columns})")
}

/// One-row insert; the embedding placeholder carries a `::vector` cast.
#[must_use]
pub fn insert_sql() -> String {
    let columns = table_columns();
    let placeholders = columns
        .iter()
        .map(|column| {
            if *column == EMBEDDING_COLUMN {
                format!(":{column}::vector")
            } else {
                format!(":{column}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {TABLE_NAME} ({}) VALUES ({placeholders})",
        columns.join(", ")
    )
}

/// Nearest products to `:query_embedding`, at most `:limit` rows.
#[must_use]
pub fn search_sql() -> String {
    format!(
        "SELECT {} FROM {TABLE_NAME} ORDER BY {EMBEDDING_COLUMN} <-> :query_embedding::vector LIMIT :limit",
        PRODUCT_COLUMNS.join(", ")
    )
}

#[must_use]
pub fn product_by_id_sql() -> String {
    format!(
        "SELECT {} FROM {TABLE_NAME} WHERE product_id = :product_id LIMIT 1",
        PRODUCT_COLUMNS.join(", ")
    )
}

/// Neighbours of `:product_id` by embedding distance, excluding itself.
#[must_use]
pub fn related_products_sql() -> String {
    format!(
        "SELECT product_id, product_name FROM {TABLE_NAME} \
         WHERE product_id <> :product_id \
         ORDER BY {EMBEDDING_COLUMN} <-> \
         (SELECT {EMBEDDING_COLUMN} FROM {TABLE_NAME} WHERE product_id = :product_id LIMIT 1) \
         LIMIT :limit"
    )
}

/// pgvector text form: `[a,b,c]`.
pub fn vector_literal<T: Display>(values: &[T]) -> String {
    let body = values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("[{body}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_table_types_every_column() {
        assert_eq!(
            create_table_sql(),
            "CREATE TABLE IF NOT EXISTS product_info (product_id varchar, product_name varchar, \
             category varchar, discounted_price varchar, actual_price varchar, \
             discount_percentage varchar, rating varchar, rating_count varchar, \
             about_product varchar, embedding vector)"
        );
    }

    #[test]
    fn insert_casts_only_the_embedding() {
        let sql = insert_sql();
        assert!(sql.starts_with("INSERT INTO product_info (product_id, product_name,"));
        assert!(sql.ends_with(":about_product, :embedding::vector)"));
        assert_eq!(sql.matches("::vector").count(), 1);
    }

    #[test]
    fn search_orders_by_distance() {
        assert_eq!(
            search_sql(),
            "SELECT product_id, product_name, category, discounted_price, actual_price, \
             discount_percentage, rating, rating_count, about_product FROM product_info \
             ORDER BY embedding <-> :query_embedding::vector LIMIT :limit"
        );
    }

    #[test]
    fn literals_use_shortest_number_text() {
        assert_eq!(vector_literal(&[0.1_f32, -2.0, 0.5]), "[0.1,-2,0.5]");
        assert_eq!(vector_literal::<f64>(&[]), "[]");
    }
}
