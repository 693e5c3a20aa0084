use httpmock::prelude::*;
use leadgen_etl::config::targets::TargetsConfig;
use leadgen_etl::{
    AppConfig, LeadEngine, LeadPipeline, LocalStorage, OpenRouterEvaluator, SerpApiSearch,
};
use std::time::Duration;
use tempfile::TempDir;

fn app_config(output_path: &str, locations: &[&str], categories: &[&str]) -> AppConfig {
    AppConfig {
        serpapi_key: "serp-test-key".to_string(),
        openrouter_key: "router-test-key".to_string(),
        model: "openai/gpt-4o-mini".to_string(),
        site_url: None,
        app_name: None,
        targets: TargetsConfig {
            locations: locations.iter().map(|s| s.to_string()).collect(),
            categories: categories.iter().map(|s| s.to_string()).collect(),
            exclude_keywords: vec![
                "kirana".to_string(),
                "paan".to_string(),
                "street vendor".to_string(),
                "small shop".to_string(),
            ],
        },
        output_path: output_path.to_string(),
        leads_file: "leads.csv".to_string(),
        search_delay_ms: 0,
        eval_delay_ms: 0,
        result_cap: 20,
    }
}

fn build_engine(
    serp_server: &MockServer,
    llm_server: &MockServer,
    config: AppConfig,
) -> LeadEngine<LeadPipeline<SerpApiSearch, OpenRouterEvaluator, LocalStorage, AppConfig>> {
    let search = SerpApiSearch::new(config.serpapi_key.clone())
        .with_base_url(serp_server.url(""))
        .with_result_cap(config.result_cap)
        .with_exclude_keywords(config.targets.exclude_keywords.clone())
        .with_delay(Duration::ZERO);
    let evaluator = OpenRouterEvaluator::new(config.openrouter_key.clone())
        .with_base_url(llm_server.url(""))
        .with_model(config.model.clone());
    let storage = LocalStorage::new(config.output_path.clone());
    LeadEngine::new(LeadPipeline::new(search, evaluator, storage, config))
}

fn verdict_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}

fn read_leads_csv(output_path: &std::path::Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(output_path.join("leads.csv")).unwrap();
    let headers = reader.headers().unwrap().clone();
    let records = reader.records().map(|r| r.unwrap()).collect();
    (headers, records)
}

#[tokio::test]
async fn test_end_to_end_single_qualifying_lead() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let serp_server = MockServer::start();
    let serp_mock = serp_server.mock(|when, then| {
        when.method(GET)
            .path("/search")
            .query_param("engine", "google_maps")
            .query_param("q", "Coaching Institutes in Varanasi, Uttar Pradesh");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "local_results": [{
                    "title": "Sunrise Coaching Classes",
                    "phone": "+91 98765 43210",
                    "rating": 4.6,
                    "reviews": 75,
                    "address": "Lanka Road, Varanasi"
                }]
            }));
    });

    let llm_server = MockServer::start();
    let llm_mock = llm_server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .header("Authorization", "Bearer router-test-key")
            .body_contains("Sunrise Coaching Classes");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(verdict_body(
                r#"{"needs_website": true, "priority": "High", "reasoning": "75 reviews and no website", "has_online_presence": "none"}"#,
            ));
    });

    let config = app_config(
        &output_path,
        &["Varanasi, Uttar Pradesh"],
        &["Coaching Institutes"],
    );
    let engine = build_engine(&serp_server, &llm_server, config);

    let result = engine.run().await.unwrap();

    serp_mock.assert();
    llm_mock.assert();

    let saved_path = result.expect("one qualifying lead should produce output");
    assert!(saved_path.ends_with("leads.csv"));

    let (headers, records) = read_leads_csv(temp_dir.path());
    assert_eq!(headers.len(), 11);
    assert_eq!(&headers[7], "priority");
    assert_eq!(&headers[10], "outreach_message");

    assert_eq!(records.len(), 1);
    let row = &records[0];
    assert_eq!(&row[0], "Sunrise Coaching Classes");
    assert_eq!(&row[7], "High");
    // Website was absent; the cell renders as empty string.
    assert_eq!(&row[4], "");
    assert!(!row[10].is_empty());
    assert!(row[10].contains("students"));
}

#[tokio::test]
async fn test_evaluator_failure_degrades_and_run_continues() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let serp_server = MockServer::start();
    serp_server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "local_results": [
                    {"title": "City Care Hospital", "reviews": 220},
                    {"title": "Sunrise Coaching Classes", "reviews": 75}
                ]
            }));
    });

    let llm_server = MockServer::start();
    let failing_mock = llm_server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .body_contains("City Care Hospital");
        then.status(500).body("upstream exploded");
    });
    let working_mock = llm_server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .body_contains("Sunrise Coaching Classes");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(verdict_body(
                r#"{"needs_website": true, "priority": "Medium", "reasoning": "no site", "has_online_presence": "social_only"}"#,
            ));
    });

    let config = app_config(
        &output_path,
        &["Varanasi, Uttar Pradesh"],
        &["Coaching Institutes"],
    );
    let engine = build_engine(&serp_server, &llm_server, config);

    let result = engine.run().await.unwrap();

    // The failed evaluation degraded to the forced-negative verdict; the
    // second business was still processed and qualified.
    failing_mock.assert();
    working_mock.assert();

    assert!(result.is_some());
    let (_, records) = read_leads_csv(temp_dir.path());
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][0], "Sunrise Coaching Classes");
    assert_eq!(&records[0][7], "Medium");
    assert!(!records[0][10].is_empty());
}

#[tokio::test]
async fn test_no_qualifying_leads_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let serp_server = MockServer::start();
    serp_server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "local_results": [{"title": "Grand Palace Hotel", "website": "https://grandpalace.example", "reviews": 300}]
            }));
    });

    let llm_server = MockServer::start();
    llm_server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(verdict_body(
                r#"{"needs_website": false, "priority": "Low", "reasoning": "already has a good website", "has_online_presence": "good_website"}"#,
            ));
    });

    let config = app_config(&output_path, &["Varanasi, Uttar Pradesh"], &["Hotels"]);
    let engine = build_engine(&serp_server, &llm_server, config);

    let result = engine.run().await.unwrap();

    assert!(result.is_none());
    assert!(!temp_dir.path().join("leads.csv").exists());
}

#[tokio::test]
async fn test_excluded_names_are_never_evaluated() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let serp_server = MockServer::start();
    serp_server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "local_results": [
                    {"title": "Sharma Kirana Store", "reviews": 400},
                    {"title": "Modern Restaurant", "reviews": 90}
                ]
            }));
    });

    let llm_server = MockServer::start();
    let llm_mock = llm_server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(verdict_body(
                r#"{"needs_website": true, "priority": "High", "reasoning": "busy but offline", "has_online_presence": "none"}"#,
            ));
    });

    let config = app_config(&output_path, &["Varanasi, Uttar Pradesh"], &["Restaurants"]);
    let engine = build_engine(&serp_server, &llm_server, config);

    engine.run().await.unwrap();

    // Only the non-excluded business reached the evaluator.
    llm_mock.assert_hits(1);

    let (_, records) = read_leads_csv(temp_dir.path());
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][0], "Modern Restaurant");
}

#[tokio::test]
async fn test_search_failure_degrades_to_empty_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let serp_server = MockServer::start();
    serp_server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"error": "Your account has run out of searches."}));
    });

    let llm_server = MockServer::start();

    let config = app_config(&output_path, &["Varanasi, Uttar Pradesh"], &["Hotels"]);
    let engine = build_engine(&serp_server, &llm_server, config);

    // Provider error is non-fatal: the run completes with no output.
    let result = engine.run().await.unwrap();
    assert!(result.is_none());
    assert!(!temp_dir.path().join("leads.csv").exists());
}
