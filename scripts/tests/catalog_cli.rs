use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

#[allow(deprecated)]
fn cargo_bin(name: &str) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin(name).expect("binary not built");
    cmd.env_clear();
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("tests")
        .join("fixtures")
        .join("catalog")
        .join(name)
}

#[test]
fn every_binary_documents_the_deployment_variables() {
    for name in ["generate_embeddings", "import_data", "query_products"] {
        let assert = cargo_bin(name).arg("--help").assert().success();
        let help = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        assert!(help.contains("BUCKET_NAME"), "{name} help lists BUCKET_NAME");
        assert!(help.contains("--log-format"), "{name} help lists --log-format");
    }
}

#[test]
fn offline_generation_writes_embeddings_under_local_root() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("amazon.csv");
    fs::copy(fixture("products.csv"), &input).unwrap();

    let assert = cargo_bin("generate_embeddings")
        .arg("--local-root")
        .arg(dir.path())
        .arg("--bucket")
        .arg("catalog-assets")
        .arg("--input-url")
        .arg(&input)
        .arg("--hash-embedder")
        .arg("--dimensions")
        .arg("4")
        .arg("--region")
        .arg("us-east-1")
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("json report");
    assert_eq!(report["rows"], 3);
    assert_eq!(report["dimensions"], 4);

    let written = dir.path().join("catalog-assets").join("embeddings.csv");
    let contents = fs::read_to_string(written).expect("embeddings written");
    let header = contents.lines().next().unwrap();
    assert!(header.ends_with(",embedding"));
    assert_eq!(contents.lines().count(), 4);
}

#[test]
fn import_without_bucket_names_the_missing_variable() {
    let assert = cargo_bin("import_data")
        .arg("--region")
        .arg("us-east-1")
        .assert()
        .failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("missing required setting `BUCKET_NAME`"), "{stderr}");
}

#[test]
fn query_requires_something_to_ask() {
    let assert = cargo_bin("query_products")
        .arg("--region")
        .arg("us-east-1")
        .assert()
        .failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("provide a query"), "{stderr}");
}

#[test]
fn unreadable_config_files_fail() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("catalog.toml");
    fs::write(&config, "[storage]\nbucket = 42\n").unwrap();
    let assert = cargo_bin("import_data")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("loading pipeline configuration"), "{stderr}");
}
