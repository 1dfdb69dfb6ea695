use application::pipeline_service::FailurePolicy;
use infrastructure::config::Config;
use shared::types::{GeneratorError, RemoteServiceError};
use tempfile::TempDir;
use tests::pipeline;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, key: Option<&str>) -> Config {
    Config {
        groq_api_key: key.map(str::to_string),
        groq_base_url: server.uri(),
        ..Config::default()
    }
}

#[tokio::test]
async fn groq_client_drives_the_pipeline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk_test"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama-3.1-8b-instant",
            "temperature": 0.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                {
                    "message": {
                        "role": "assistant",
                        "content": "def test_tc_001_login():\n    pass"
                    }
                }
            ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let config = config_for(&server, Some("gsk_test"));
    let pipeline = pipeline(
        config.build_embedder(),
        config.build_generator().unwrap(),
        FailurePolicy::FailFast,
    )
    .await
    .unwrap();

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("test_cases.txt");
    std::fs::write(&input, "login with valid credentials\nlogin with invalid credentials\n")
        .unwrap();

    let mut out = Vec::new();
    let summary = pipeline.run(&input, &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(text.matches("def test_tc_001_login():").count(), 2);
}

#[tokio::test]
async fn missing_api_key_surfaces_on_first_call() {
    let server = MockServer::start().await;
    let config = config_for(&server, None);
    let pipeline = pipeline(
        config.build_embedder(),
        config.build_generator().unwrap(),
        FailurePolicy::FailFast,
    )
    .await
    .unwrap();

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("test_cases.txt");
    std::fs::write(&input, "login test\n").unwrap();

    let mut out = Vec::new();
    let err = pipeline.run(&input, &mut out).await.unwrap_err();
    assert!(matches!(
        err,
        GeneratorError::Remote(RemoteServiceError::Authentication(_))
    ));
    assert!(out.is_empty());
}
