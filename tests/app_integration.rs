use std::fs;
use tracing::info;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod test_utils {
    use super::*;

    pub fn table(columns: &[&str], rows: &[(&str, &[Option<f64>])]) -> String {
        let rows: Vec<serde_json::Value> = rows
            .iter()
            .map(|(date, values)| serde_json::json!({ "date": date, "values": values }))
            .collect();
        serde_json::json!({ "columns": columns, "rows": rows }).to_string()
    }

    pub async fn mount_day(server: &MockServer, endpoint: &str, date: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(query_param("start", date))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    /// Market data for 1399 and 1400; anything else comes back empty.
    pub async fn create_mock_server() -> MockServer {
        let server = MockServer::start().await;

        mount_day(
            &server,
            "/usd",
            "1399-01-05",
            table(&["Open", "Close"], &[("1399-01-05", &[Some(249_000.0), Some(250_000.0)])]),
        )
        .await;
        mount_day(
            &server,
            "/usd",
            "1400-01-04",
            table(&["Open", "Close"], &[("1400-01-04", &[Some(499_000.0), Some(500_000.0)])]),
        )
        .await;
        mount_day(
            &server,
            "/index/equal-weight",
            "1399-01-04",
            table(&["Adj Close"], &[("1399-01-04", &[Some(400.0)])]),
        )
        .await;
        mount_day(
            &server,
            "/index/equal-weight",
            "1400-01-04",
            table(&["Adj Close"], &[("1400-01-04", &[Some(1_000.0)])]),
        )
        .await;
        mount_day(
            &server,
            "/stock/FOOLAD/history",
            "1399-01-01",
            table(
                &["Close", "Adj Close"],
                &[
                    ("1399-01-06", &[Some(5_100.0), None]),
                    ("1399-01-07", &[Some(5_300.0), Some(5_000.0)]),
                ],
            ),
        )
        .await;
        mount_day(
            &server,
            "/stock/FOOLAD/history",
            "1400-01-01",
            table(&["Close", "Adj Close"], &[("1400-01-05", &[Some(8_000.0), Some(7_500.0)])]),
        )
        .await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rows": []}"#))
            .with_priority(10)
            .mount(&server)
            .await;

        server
    }

    pub fn write_config(dir: &std::path::Path, base_url: &str) -> std::path::PathBuf {
        let config_path = dir.join("config.yaml");
        let data_path = dir.join("cache");
        let config_content = format!(
            r#"
providers:
  tse:
    base_url: "{}"
    retries: 0
probe:
  delay_ms: 0
stock:
  symbol: "FOOLAD"
data_path: "{}"
"#,
            base_url,
            data_path.display()
        );
        fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri());
    let output = dir.path().join("aligned.csv");

    let result = yearly_growth::run_command(
        yearly_growth::AppCommand::Compare {
            start_year: 1399,
            end_year: 1400,
            output: Some(output.clone()),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Compare command failed with: {:?}",
        result.err()
    );

    let cache_dir = dir.path().join("cache");
    assert_eq!(
        fs::read_to_string(cache_dir.join("usd_cache.csv")).unwrap(),
        "year,usd_rate\n1399,250000\n1400,500000\n"
    );
    assert_eq!(
        fs::read_to_string(cache_dir.join("equal_index_cache.csv")).unwrap(),
        "year,equal_index\n1399,400\n1400,1000\n"
    );
    assert_eq!(
        fs::read_to_string(cache_dir.join("stock_cache.csv")).unwrap(),
        "year,stock_price\n1399,5000\n1400,7500\n"
    );

    let exported = fs::read_to_string(&output).unwrap();
    info!(%exported, "Exported aligned table");
    let lines: Vec<&str> = exported.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("1399,36.4,250000.0,400.0,5000.0,100.0,100.0,100.0,100.0"));
    assert!(lines[2].starts_with("1400,40.2,500000.0,1000.0,7500.0,"));
    assert!(lines[2].ends_with(",200.0,250.0,150.0"));
}

#[test_log::test(tokio::test)]
async fn test_second_run_uses_cache_only() {
    let mock_server = test_utils::create_mock_server().await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri());
    let config = yearly_growth::core::config::AppConfig::load_from_path(&config_path).unwrap();

    let first = yearly_growth::run_pipeline(&config, 1399, 1400, |_| {})
        .await
        .unwrap();
    let requests_after_first = mock_server.received_requests().await.unwrap().len();
    let usd_file = dir.path().join("cache").join("usd_cache.csv");
    let usd_before = fs::read(&usd_file).unwrap();

    let mut messages = Vec::new();
    let second = yearly_growth::run_pipeline(&config, 1399, 1400, |m| messages.push(m.to_string()))
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        mock_server.received_requests().await.unwrap().len(),
        requests_after_first
    );
    assert_eq!(fs::read(&usd_file).unwrap(), usd_before);
    assert_eq!(
        messages,
        vec![
            "Starting comparison for 1399-1400".to_string(),
            "Comparison complete: 2 year(s)".to_string(),
        ]
    );
}

#[test_log::test(tokio::test)]
async fn test_missing_years_are_retried_on_next_run() {
    let mock_server = test_utils::create_mock_server().await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri());
    let config = yearly_growth::core::config::AppConfig::load_from_path(&config_path).unwrap();

    let report = yearly_growth::run_pipeline(&config, 1400, 1401, |_| {})
        .await
        .unwrap();
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[1].usd, None);
    assert_eq!(report.rows[1].usd_growth, None);

    let before = mock_server.received_requests().await.unwrap().len();
    yearly_growth::run_pipeline(&config, 1400, 1401, |_| {})
        .await
        .unwrap();
    let retried = mock_server.received_requests().await.unwrap().len() - before;

    // 12 probes each for USD and index, one window query for the stock
    assert_eq!(retried, 25);
    assert_eq!(
        fs::read_to_string(dir.path().join("cache").join("usd_cache.csv")).unwrap(),
        "year,usd_rate\n1400,500000\n"
    );
}

#[test_log::test(tokio::test)]
async fn test_inverted_range_is_rejected() {
    let mock_server = test_utils::create_mock_server().await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri());

    let result = yearly_growth::run_command(
        yearly_growth::AppCommand::Compare {
            start_year: 1402,
            end_year: 1399,
            output: None,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    assert!(result.is_err());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
    assert!(!dir.path().join("cache").exists());
}
