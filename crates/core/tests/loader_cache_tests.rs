//! Loader and materialization cache tests

use serde_json::json;
use std::fs;
use std::sync::Arc;
use table_fusion_core::cache::{
    CacheConfig, CachedMaterializer, FileMaterializer, Materializer, SharedDatasetCache,
};
use table_fusion_core::dataset::{StorageType, Value};
use table_fusion_core::feature::JoinSpec;
use table_fusion_core::join::JoinOrchestrator;
use table_fusion_core::loader::{CsvLoader, DatasetLoader, JsonRecordsLoader};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_csv_and_json_sources_join() {
    let temp = TempDir::new().unwrap();
    let stations = write(
        &temp,
        "stations.csv",
        "station,region\nNorth Gate,north\nSouth Pier,south\nEast Yard,east\nEast Yard,east\n",
    );
    let readings = write(
        &temp,
        "readings.json",
        r#"[
            {"station": "north gate", "reading": 12.5, "taken": "2024-03-01 10:00:00"},
            {"station": "east yard", "reading": 7.25, "taken": "2024-03-01 11:00:00"}
        ]"#,
    );

    let left = CsvLoader::new().load(&stations).unwrap();
    let right = JsonRecordsLoader::new().load(&readings).unwrap();
    assert_eq!(right.columns()[1].storage(), StorageType::Numeric);
    assert_eq!(right.columns()[2].storage(), StorageType::DateTime);

    let spec = JoinSpec::by_name(&left, &right, &[("station", "station")]).unwrap();
    let result = JoinOrchestrator::new().augment(&left, &right, &[spec]);

    assert_eq!(result.coverage(), Some(0.5));
    let reading = result.dataset.column_index("reading").unwrap();
    assert_eq!(result.dataset.value(0, reading), Some(&Value::Number(12.5)));
    assert_eq!(result.dataset.value(1, reading), Some(&Value::Null));
    assert_eq!(result.dataset.value(2, reading), Some(&Value::Number(7.25)));
    assert_eq!(result.dataset.value(3, reading), Some(&Value::Null));
}

#[test]
fn test_cached_file_materializer_reuses_dataset() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "codes.tsv", "code\tlabel\nA\tAlpha\nB\tBeta\n");
    let descriptor = json!({"path": path.to_str().unwrap()});

    let cache = SharedDatasetCache::with_config(&CacheConfig::new().with_capacity(4));
    let materializer = CachedMaterializer::new(FileMaterializer::new(), cache.clone());

    let first = materializer.materialize(&descriptor).unwrap();
    fs::remove_file(&path).unwrap();
    let second = materializer.materialize(&descriptor).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.column_count(), 2);
    let stats = cache.stats().unwrap();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);

    // Different descriptor misses and reports the missing file
    let other = json!({"path": path.to_str().unwrap(), "format": "csv"});
    assert!(materializer.materialize(&other).is_err());
}
