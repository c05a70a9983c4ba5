use anyhow::Result;
use exrates::core::session::ConversionSession;
use exrates::domain::ports::Pipeline;
use exrates::{
    CurrencyRepository, CurrencySet, EtlEngine, ExportPipeline, FxError, LocalStorage, TomlConfig,
};
use httpmock::prelude::*;
use std::io::Cursor;
use std::time::Duration;
use tempfile::TempDir;

const RATES_CSV: &str = "Country/Territories,Currency,Currency Code,Currency units per £1,Start date,End date\n\
    UK,Pound,GBP,0.85,01/12/2020,31/12/2020\n\
    France,Euro,EUR,1.1066,01/12/2020,31/12/2020\n\
    Japan,Yen,JPY,138.5,01/12/2020,31/12/2020\n\
    Eurozone,Euro,EUR,1.1066,01/12/2020,31/12/2020\n";

fn storage_in(dir: &TempDir) -> LocalStorage {
    LocalStorage::new(dir.path().to_str().unwrap().to_string())
}

fn config_for(server: &MockServer, path: &str, dir: &TempDir) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.source.url = server.url(path);
    config.source.timeout_seconds = 5;
    config.export.output_path = dir.path().to_str().unwrap().to_string();
    config
}

#[tokio::test]
async fn test_fetch_parse_and_lookup_from_remote_table() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    let rates_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/exrates.csv");
            then.status(200)
                .header("Content-Type", "text/csv")
                .body(RATES_CSV);
        })
        .await;

    let repository = CurrencyRepository::new(storage_in(&temp_dir));
    let text = repository.fetch_source_text(&server.url("/exrates.csv")).await;
    rates_mock.assert_async().await;

    let rates = CurrencySet::parse_all(&text).unwrap();

    // EUR appears twice; the later row replaces the earlier one
    assert_eq!(rates.len(), 3);
    assert_eq!(rates.get("EUR").unwrap().country_name(), "Eurozone");

    let uk = rates.find_by_country("UK").unwrap();
    assert_eq!(uk.currency_code(), "GBP");
    assert!(rates.find_by_country("Atlantis").is_none());
}

#[tokio::test]
async fn test_failed_fetch_yields_empty_rate_set() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    let failing_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/missing.csv");
            then.status(500);
        })
        .await;

    let repository = CurrencyRepository::new(storage_in(&temp_dir));
    let text = repository.fetch_source_text(&server.url("/missing.csv")).await;

    failing_mock.assert_async().await;
    assert_eq!(text, "");
    assert!(CurrencySet::parse_all(&text).unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_remote_row_fails_whole_parse() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/broken.csv");
            then.status(200).body("header\nUK,Pound,GBP,0.85,a,b\nUK,Pound,GBP\n");
        })
        .await;

    let repository = CurrencyRepository::new(storage_in(&temp_dir));
    let text = repository.fetch_source_text(&server.url("/broken.csv")).await;

    let err = CurrencySet::parse_all(&text).unwrap_err();
    assert!(matches!(err, FxError::Parse { line: Some(3), .. }));
}

#[test]
fn test_export_is_byte_identical_across_destinations() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = CurrencyRepository::new(storage_in(&temp_dir));
    let rates = CurrencySet::parse_all(RATES_CSV)?;
    let snapshot = rates.snapshot();

    repository.write_export(&snapshot, 12.5, "first.csv")?;
    repository.write_export(&snapshot, 12.5, "second.csv")?;

    let first = std::fs::read(temp_dir.path().join("first.csv"))?;
    let second = std::fs::read(temp_dir.path().join("second.csv"))?;
    assert_eq!(first, second);

    let first = String::from_utf8(first)?;
    assert_eq!(first.lines().count(), 3);
    assert!(first.starts_with("GBP,UK,10.625000,0.850000,01/12/2020,31/12/2020"));
    Ok(())
}

#[test]
fn test_export_matches_preview_text() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = CurrencyRepository::new(storage_in(&temp_dir));
    let rates = CurrencySet::parse_all(RATES_CSV)?;

    repository.write_export(&rates.snapshot(), 3.0, "preview.csv")?;

    let written = std::fs::read_to_string(temp_dir.path().join("preview.csv"))?;
    assert_eq!(written, rates.format_all_with_conversion(3.0));
    Ok(())
}

#[tokio::test]
async fn test_export_pipeline_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    let rates_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/exrates.csv");
            then.status(200).body(RATES_CSV);
        })
        .await;

    let config = config_for(&server, "/exrates.csv", &temp_dir);
    let repository =
        CurrencyRepository::with_timeout(storage_in(&temp_dir), Duration::from_secs(5)).unwrap();
    let pipeline = ExportPipeline::new(repository, config, 2.0).with_filename("converted.csv");

    let output_path = EtlEngine::new(pipeline).run().await.unwrap();
    rates_mock.assert_async().await;

    assert!(output_path.ends_with("converted.csv"));
    let written = std::fs::read_to_string(temp_dir.path().join("converted.csv")).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        vec![
            "GBP,UK,1.700000,0.850000,01/12/2020,31/12/2020",
            "EUR,Eurozone,2.213200,1.106600,01/12/2020,31/12/2020",
            "JPY,Japan,277.000000,138.500000,01/12/2020,31/12/2020",
        ]
    );
}

#[tokio::test]
async fn test_export_pipeline_with_unreachable_source_writes_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/down.csv");
            then.status(503);
        })
        .await;

    let config = config_for(&server, "/down.csv", &temp_dir);
    let pipeline = ExportPipeline::new(CurrencyRepository::new(storage_in(&temp_dir)), config, 1.0)
        .with_filename("empty.csv");

    let rates = pipeline.transform(pipeline.extract().await.unwrap()).await.unwrap();
    assert!(rates.is_empty());

    pipeline.load(rates).await.unwrap();
    let written = std::fs::read_to_string(temp_dir.path().join("empty.csv")).unwrap();
    assert_eq!(written, "");
}

#[tokio::test]
async fn test_session_over_fetched_rates() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/exrates.csv");
            then.status(200).body(RATES_CSV);
        })
        .await;

    let repository = CurrencyRepository::new(storage_in(&temp_dir));
    let text = repository.fetch_source_text(&server.url("/exrates.csv")).await;
    let rates = CurrencySet::parse_all(&text).unwrap();

    let input = "c\n100\nt\nJapan\nc\n100\ne\nsession.csv\nq\n";
    let mut output = Vec::new();
    ConversionSession::new(&rates, &repository, Cursor::new(input), &mut output)
        .run()
        .unwrap();
    let output = String::from_utf8(output).unwrap();

    assert!(output.contains("The calculated value is: 13850.00 Yen"));
    assert!(output.contains("JPY,Japan,13850.000000,138.500000,01/12/2020,31/12/2020"));

    let written = std::fs::read_to_string(temp_dir.path().join("session.csv")).unwrap();
    assert_eq!(written, rates.format_all_with_conversion(100.0));
}
