use std::fs;
use std::path::Path;

use sales_etl::config::PipelineConfig;
use sales_etl::pipeline::run;
use sales_etl::processing::TransformStatus;
use sales_etl::sink::{LoadOutcome, SqliteStore, TableSink};
use sales_etl::types::DataSet;
use sales_etl::{EtlError, EtlResult};

fn config_in(root: &Path) -> PipelineConfig {
    PipelineConfig {
        input_dir: root.join("input"),
        output_file: root.join("processed").join("processed_sales_data.csv"),
        database_path: root.join("sales_data.db"),
        table_name: "sales".to_string(),
    }
}

fn sales_count(store: &SqliteStore) -> i64 {
    store
        .connection()
        .query_row("SELECT COUNT(*) FROM sales", [], |r| r.get(0))
        .unwrap()
}

struct FailingSink;

impl TableSink for FailingSink {
    fn replace_table(&mut self, _table: &str, _dataset: &DataSet) -> EtlResult<usize> {
        Err(EtlError::Io(std::io::Error::other("connection refused")))
    }
}

#[test]
fn full_run_loads_database_and_exports_csv() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::create_dir_all(&config.input_dir).unwrap();
    fs::copy("tests/fixtures/sales_sample.csv", config.input_dir.join("a.csv")).unwrap();
    fs::copy("tests/fixtures/sales_latin1.csv", config.input_dir.join("b.csv")).unwrap();

    let mut store = SqliteStore::open(&config.database_path).unwrap();
    let summary = run(&config, &mut store).unwrap();

    assert_eq!(summary.files_found, 2);
    assert_eq!(summary.raw_rows, 10);
    assert_eq!(summary.output_rows, 6);
    assert_eq!(summary.transform_status, Some(TransformStatus::Transformed));
    assert_eq!(summary.load, Some(LoadOutcome::Loaded { rows: 6 }));
    assert_eq!(summary.export_path.as_deref(), Some(config.output_file.as_path()));
    assert_eq!(sales_count(&store), 6);

    let expected_total = 30.0 * 95.7 + 34.0 * 81.35 + 45.0 * 83.26 + 48.0 * 100.0 + 2.0 * 3.5 + 10.0;
    let total = summary.total_sales.unwrap();
    assert!((total - expected_total).abs() < 1e-9);

    let exported = fs::read_to_string(&config.output_file).unwrap();
    let mut lines = exported.lines();
    assert_eq!(
        lines.next(),
        Some("SaleDate,Item,Quantity,Price,Category,TotalSales,source_file")
    );
    assert_eq!(lines.count(), 6);
    assert!(exported.contains(",b.csv"));
}

#[test]
fn rerun_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::create_dir_all(&config.input_dir).unwrap();
    fs::copy("tests/fixtures/sales_sample.csv", config.input_dir.join("a.csv")).unwrap();

    let mut store = SqliteStore::open(&config.database_path).unwrap();
    run(&config, &mut store).unwrap();
    let first_export = fs::read_to_string(&config.output_file).unwrap();
    run(&config, &mut store).unwrap();

    assert_eq!(sales_count(&store), 4);
    assert_eq!(fs::read_to_string(&config.output_file).unwrap(), first_export);
}

#[test]
fn no_input_files_does_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::create_dir_all(&config.input_dir).unwrap();
    fs::write(config.input_dir.join("readme.txt"), "not a csv").unwrap();

    let mut store = SqliteStore::open_in_memory().unwrap();
    let summary = run(&config, &mut store).unwrap();

    assert_eq!(summary.files_found, 0);
    assert_eq!(summary.load, None);
    assert!(!config.output_file.exists());
}

#[test]
fn all_rows_rejected_skips_both_sinks() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::create_dir_all(&config.input_dir).unwrap();
    fs::write(
        config.input_dir.join("cancelled.csv"),
        "ORDERDATE,PRODUCTCODE,QUANTITYORDERED,PRICEEACH,STATUS\n2003-02-24,S1,2,3.5,Cancelled\n",
    )
    .unwrap();

    let mut store = SqliteStore::open_in_memory().unwrap();
    let summary = run(&config, &mut store).unwrap();

    assert_eq!(summary.transform_status, Some(TransformStatus::EmptyAfterCleaning));
    assert_eq!(summary.load, Some(LoadOutcome::Skipped));
    assert_eq!(summary.export_path, None);
    assert!(!config.output_file.exists());
}

#[test]
fn database_failure_still_exports() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::create_dir_all(&config.input_dir).unwrap();
    fs::copy("tests/fixtures/sales_sample.csv", config.input_dir.join("a.csv")).unwrap();

    let summary = run(&config, &mut FailingSink).unwrap();

    assert!(matches!(summary.load, Some(LoadOutcome::Failed { .. })));
    assert!(config.output_file.exists());
}

#[test]
fn missing_status_column_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::create_dir_all(&config.input_dir).unwrap();
    fs::write(
        config.input_dir.join("no_status.csv"),
        "ORDERDATE,PRODUCTCODE,QUANTITYORDERED,PRICEEACH\n2003-02-24,S1,2,3.5\n",
    )
    .unwrap();

    let mut store = SqliteStore::open_in_memory().unwrap();
    let err = run(&config, &mut store).unwrap_err();

    assert!(matches!(err, EtlError::MissingColumn { .. }));
    assert!(!config.output_file.exists());
}

#[test]
fn default_config_uses_fixed_paths() {
    let config = PipelineConfig::default();
    assert_eq!(config.table_name, "sales");
    assert!(config.output_file.ends_with("processed_sales_data.csv"));
    assert_eq!(config.database_path, Path::new("sales_data.db"));
}
