use std::fs;
use std::time::Duration;

use runtime_pipeline::{ConfigError, ConfigOverrides, EmbedderKind, PipelineConfig};
use storage_objects::ObjectLocation;
use storage_vector::ArrayBinding;

const FULL_CONFIG: &str = r#"
region = "eu-west-1"

[storage]
bucket = "catalog-assets"
input_url = "s3://catalog-input/data/amazon.csv"
embeddings_name = "vectors.csv"

[embedding]
provider = "hash"
model_id = "amazon.titan-embed-text-v1"
dimensions = 8
text_column = "about_product"
concurrency = 4

[database]
cluster_arn = "arn:aws:rds:eu-west-1:123456789012:cluster:products"
secret_arn = "arn:aws:secretsmanager:eu-west-1:123456789012:secret:db"
database = "products"
native_arrays = true

[import]
pace_ms = 0
create_extension = true
max_attempts = 5
backoff_ms = 200
"#;

#[test]
fn toml_file_populates_every_stage() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("catalog.toml");
    fs::write(&path, FULL_CONFIG).expect("write config");
    let config = PipelineConfig::load(Some(&path)).expect("config loads");

    assert_eq!(config.region.as_deref(), Some("eu-west-1"));
    assert_eq!(config.embedding.provider, EmbedderKind::Hash);
    assert_eq!(config.array_binding(), ArrayBinding::Native);

    let generation = config.generation_config().expect("generation settings");
    assert_eq!(
        generation.input,
        ObjectLocation::s3("catalog-input", "data/amazon.csv")
    );
    assert_eq!(generation.output, ObjectLocation::s3("catalog-assets", "vectors.csv"));
    assert_eq!(generation.text_column, "about_product");
    assert_eq!(generation.concurrency, 4);

    let import = config.import_config().expect("import settings");
    assert_eq!(import.pace, Duration::ZERO);
    assert!(import.create_extension);
    assert_eq!(import.retry.max_attempts, 5);

    let target = config.data_api_target().expect("database target");
    assert_eq!(target.database, "products");

    let embedding = config.embedding_config();
    assert_eq!(embedding.dimensions, 8);
    assert_eq!(embedding.model_id, "amazon.titan-embed-text-v1");
}

#[test]
fn overrides_replace_file_values() {
    let config = PipelineConfig::from_toml_str(FULL_CONFIG)
        .expect("config parses")
        .with_overrides(ConfigOverrides {
            bucket: Some("other-bucket".into()),
            database: Some("staging".into()),
            model_id: Some("amazon.titan-embed-text-v2:0".into()),
            ..ConfigOverrides::default()
        });
    assert_eq!(
        config.embeddings_location().expect("location"),
        ObjectLocation::s3("other-bucket", "vectors.csv")
    );
    assert_eq!(config.data_api_target().expect("target").database, "staging");
    assert_eq!(config.embedding.model_id, "amazon.titan-embed-text-v2:0");
    assert_eq!(
        config.database.cluster_arn.as_deref(),
        Some("arn:aws:rds:eu-west-1:123456789012:cluster:products"),
        "unset overrides keep file values"
    );
}

#[test]
fn missing_settings_name_the_variable() {
    let config = PipelineConfig::default();
    assert!(matches!(
        config.input_location(),
        Err(ConfigError::Missing {
            key: "INPUT_BUCKET_URL"
        })
    ));
    assert!(matches!(
        config.import_config(),
        Err(ConfigError::Missing { key: "BUCKET_NAME" })
    ));
    let config = config.with_overrides(ConfigOverrides {
        cluster_arn: Some("arn:cluster".into()),
        ..ConfigOverrides::default()
    });
    assert!(matches!(
        config.data_api_target(),
        Err(ConfigError::Missing { key: "SECRET_ARN" })
    ));
}

#[test]
fn malformed_files_are_rejected() {
    assert!(matches!(
        PipelineConfig::from_toml_str("[storage]\nbukket = \"typo\"\n"),
        Err(ConfigError::Parse(_))
    ));
    let dir = tempfile::tempdir().expect("temp dir");
    assert!(matches!(
        PipelineConfig::load(Some(&dir.path().join("absent.toml"))),
        Err(ConfigError::Read { .. })
    ));
    let config = PipelineConfig::default().with_overrides(ConfigOverrides {
        input_url: Some("gs://bucket/key".into()),
        ..ConfigOverrides::default()
    });
    assert!(matches!(
        config.input_location(),
        Err(ConfigError::Location(_))
    ));
}
