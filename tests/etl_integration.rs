//! Integration tests for complete pipeline runs
//!
//! These tests drive real source media and a real SQLite destination through
//! the extract → transform → load sequence.

use eyre::Result;
use rusqlite::Connection;
use serde_json::json;
use tabular_etl::etl::Pipeline;
use tabular_etl::sink::SqliteLoader;
use tabular_etl::source::{DelimitedExtractor, JsonApiExtractor, SqlExtractor, XmlExtractor};
use tabular_etl::transform::BasicTransformer;
use tabular_etl::{ExtractionError, PipelineError};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const CSV_FIXTURE: &str = "\
identifier,date,quantity,price
1,2024-07-01,10,9.99
2,2024-07-02,15,19.99
3,2024-07-03,7,14.99
4,2024-07-04,,29.99
5,2024-07-05,20,9.99
";

/// One row of the loaded destination table
struct LoadedRow {
    identifier: i64,
    quantity: i64,
    price: f64,
    total: f64,
    source: String,
    timestamp: String,
}

fn read_loaded_rows(db_path: &std::path::Path, table: &str) -> Result<Vec<LoadedRow>> {
    let connection = Connection::open(db_path)?;
    let mut statement = connection.prepare(&format!(
        "SELECT identifier, quantity, price, total, source, timestamp FROM {table}"
    ))?;
    let rows = statement
        .query_map([], |row| {
            Ok(LoadedRow {
                identifier: row.get(0)?,
                quantity: row.get(1)?,
                price: row.get(2)?,
                total: row.get(3)?,
                source: row.get(4)?,
                timestamp: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[tokio::test]
async fn test_file_to_sqlite_end_to_end() -> Result<()> {
    init_logging();
    let temp_dir = TempDir::new()?;
    let source_path = temp_dir.path().join("source_data.csv");
    let db_path = temp_dir.path().join("warehouse.db");
    std::fs::write(&source_path, CSV_FIXTURE)?;

    let pipeline = Pipeline::new(
        DelimitedExtractor::new(&source_path),
        BasicTransformer::new(),
        SqliteLoader::new(&db_path, "transformed_sales"),
    );

    let count = pipeline.run().await?;
    assert_eq!(count, 5, "all fixture records should be loaded");

    let rows = read_loaded_rows(&db_path, "transformed_sales")?;
    assert_eq!(rows.len(), 5);

    for row in &rows {
        assert_eq!(row.total, row.quantity as f64 * row.price);
        assert_eq!(row.source, "file");
        assert!(!row.timestamp.is_empty());
    }

    // The missing quantity was forward-filled from the preceding record
    let filled = rows.iter().find(|row| row.identifier == 4).unwrap();
    assert_eq!(filled.quantity, 7);
    assert_eq!(filled.total, 7.0 * 29.99);

    // One load call, one timestamp
    assert!(rows.iter().all(|row| row.timestamp == rows[0].timestamp));

    Ok(())
}

#[tokio::test]
async fn test_missing_source_file_fails_without_loading() -> Result<()> {
    init_logging();
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("warehouse.db");

    let pipeline = Pipeline::new(
        DelimitedExtractor::new(temp_dir.path().join("no-such-file.csv")),
        BasicTransformer::new(),
        SqliteLoader::new(&db_path, "transformed_sales"),
    );

    let error = pipeline.run().await.unwrap_err();
    assert!(matches!(
        error,
        PipelineError::Extraction(ExtractionError::NotFound { .. })
    ));

    // The sink was never invoked, so no destination exists
    assert!(!db_path.exists());

    Ok(())
}

#[tokio::test]
async fn test_api_to_sqlite_end_to_end() -> Result<()> {
    init_logging();
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("warehouse.db");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"identifier": 1, "date": "2024-07-01", "quantity": 10, "price": 9.99},
            {"identifier": 2, "date": "2024-07-02", "quantity": 15, "price": 19.99},
            {"identifier": 3, "date": "2024-07-03", "quantity": null, "price": 14.99}
        ])))
        .mount(&server)
        .await;
    let url = Url::parse(&format!("{}/data", server.uri()))?;

    let pipeline = Pipeline::new(
        JsonApiExtractor::new(url),
        BasicTransformer::new(),
        SqliteLoader::new(&db_path, "api_sales"),
    );

    let count = pipeline.run().await?;
    assert_eq!(count, 3);

    let rows = read_loaded_rows(&db_path, "api_sales")?;
    assert!(rows.iter().all(|row| row.source == "api"));
    let filled = rows.iter().find(|row| row.identifier == 3).unwrap();
    assert_eq!(filled.quantity, 15);

    Ok(())
}

#[tokio::test]
async fn test_xml_to_sqlite_end_to_end() -> Result<()> {
    init_logging();
    let temp_dir = TempDir::new()?;
    let source_path = temp_dir.path().join("source_data.xml");
    let db_path = temp_dir.path().join("warehouse.db");
    std::fs::write(
        &source_path,
        r#"<data>
    <record identifier="1" date="2024-07-01" quantity="10" price="9.99"/>
    <record identifier="2" date="2024-07-02" quantity="15" price="19.99"/>
</data>"#,
    )?;

    let pipeline = Pipeline::new(
        XmlExtractor::new(&source_path),
        BasicTransformer::new(),
        SqliteLoader::new(&db_path, "xml_sales"),
    );

    let count = pipeline.run().await?;
    assert_eq!(count, 2);

    let rows = read_loaded_rows(&db_path, "xml_sales")?;
    assert!(rows.iter().all(|row| row.source == "xml"));

    Ok(())
}

#[tokio::test]
async fn test_sql_to_sqlite_end_to_end() -> Result<()> {
    init_logging();
    let temp_dir = TempDir::new()?;
    let source_db = temp_dir.path().join("source.db");
    let warehouse_db = temp_dir.path().join("warehouse.db");

    let connection = Connection::open(&source_db)?;
    connection.execute_batch(
        "CREATE TABLE sales (identifier INTEGER, date TEXT, quantity INTEGER, price REAL);
         INSERT INTO sales VALUES (1, '2024-07-01', 10, 9.99);
         INSERT INTO sales VALUES (2, '2024-07-02', 15, 19.99);
         INSERT INTO sales VALUES (3, '2024-07-03', 7, 14.99);",
    )?;
    drop(connection);

    let pipeline = Pipeline::new(
        SqlExtractor::new(&source_db, "SELECT * FROM sales"),
        BasicTransformer::new(),
        SqliteLoader::new(&warehouse_db, "transformed_sales"),
    );

    let count = pipeline.run().await?;
    assert_eq!(count, 3);

    let rows = read_loaded_rows(&warehouse_db, "transformed_sales")?;
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.source == "sql"));
    assert!(rows.iter().all(|row| row.total == row.quantity as f64 * row.price));

    Ok(())
}

#[tokio::test]
async fn test_duplicate_rows_are_dropped_before_load() -> Result<()> {
    init_logging();
    let temp_dir = TempDir::new()?;
    let source_path = temp_dir.path().join("source_data.csv");
    let db_path = temp_dir.path().join("warehouse.db");
    std::fs::write(
        &source_path,
        "identifier,date,quantity,price\n\
         1,2024-07-01,10,9.99\n\
         1,2024-07-01,10,9.99\n\
         2,2024-07-02,15,19.99\n",
    )?;

    let pipeline = Pipeline::new(
        DelimitedExtractor::new(&source_path),
        BasicTransformer::new(),
        SqliteLoader::new(&db_path, "transformed_sales"),
    );

    let count = pipeline.run().await?;
    assert_eq!(count, 2, "the duplicate row should not survive the transform");

    Ok(())
}
