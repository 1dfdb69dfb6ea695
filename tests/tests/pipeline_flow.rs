use application::pipeline_service::FailurePolicy;
use infrastructure::embedder::HashingEmbedder;
use shared::types::{GeneratorError, RemoteServiceError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tests::{pipeline, CountingEmbedder, StubGenerator};

const REPLY: &str = "def test_tc_XXX(): pass";

fn input_file(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("test_cases.txt");
    std::fs::write(&path, contents).unwrap();
    path
}

fn headers(output: &str) -> Vec<&str> {
    output
        .lines()
        .filter(|l| l.starts_with("--- Generating for: "))
        .collect()
}

#[tokio::test]
async fn two_login_cases_produce_two_ordered_blocks() {
    let dir = TempDir::new().unwrap();
    let path = input_file(
        &dir,
        "login with valid credentials\nlogin with invalid credentials\n",
    );
    let pipeline = pipeline(
        HashingEmbedder::default(),
        StubGenerator::new(REPLY),
        FailurePolicy::FailFast,
    )
    .await
    .unwrap();

    let mut out = Vec::new();
    let summary = pipeline.run(&path, &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(
        headers(&text),
        vec![
            "--- Generating for: login with valid credentials ---",
            "--- Generating for: login with invalid credentials ---",
        ]
    );
    assert_eq!(text.matches(REPLY).count(), 2);
    let first = text.find("valid credentials ---").unwrap();
    let first_reply = text.find(REPLY).unwrap();
    let second = text.find("invalid credentials ---").unwrap();
    assert!(first < first_reply && first_reply < second);
    assert_eq!(text.matches(&"=".repeat(50)).count(), 2);
}

#[tokio::test]
async fn blank_lines_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = input_file(&dir, "\n  \nlogin test\n");
    let pipeline = pipeline(
        HashingEmbedder::default(),
        StubGenerator::new(REPLY),
        FailurePolicy::FailFast,
    )
    .await
    .unwrap();

    let mut out = Vec::new();
    let summary = pipeline.run(&path, &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(headers(&text), vec!["--- Generating for: login test ---"]);
    assert_eq!(pipeline.rag().generator().calls(), 1);
}

#[tokio::test]
async fn block_count_matches_non_blank_line_count() {
    let dir = TempDir::new().unwrap();
    let lines = ["open home page", "", "search for shoes", "   ", "add to cart", "checkout"];
    let path = input_file(&dir, &lines.join("\n"));
    let pipeline = pipeline(
        HashingEmbedder::default(),
        StubGenerator::new(REPLY),
        FailurePolicy::FailFast,
    )
    .await
    .unwrap();

    let mut out = Vec::new();
    pipeline.run(&path, &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    let expected: Vec<String> = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| format!("--- Generating for: {l} ---"))
        .collect();
    assert_eq!(headers(&text), expected);
}

#[tokio::test]
async fn empty_input_is_a_successful_no_op() {
    let dir = TempDir::new().unwrap();
    let path = input_file(&dir, "\n\n");
    let pipeline = pipeline(
        HashingEmbedder::default(),
        StubGenerator::new(REPLY),
        FailurePolicy::FailFast,
    )
    .await
    .unwrap();

    let mut out = Vec::new();
    let summary = pipeline.run(&path, &mut out).await.unwrap();
    assert!(out.is_empty());
    assert_eq!(summary.processed, 0);
    assert!(summary.is_success());
    assert_eq!(pipeline.rag().generator().calls(), 0);
}

#[tokio::test]
async fn missing_input_fails_before_any_output() {
    let pipeline = pipeline(
        HashingEmbedder::default(),
        StubGenerator::new(REPLY),
        FailurePolicy::FailFast,
    )
    .await
    .unwrap();

    let mut out = Vec::new();
    let err = pipeline
        .run(Path::new("/no/such/dir/test_cases.txt"), &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, GeneratorError::Input { .. }));
    assert!(out.is_empty());
    assert_eq!(pipeline.rag().generator().calls(), 0);
}

#[tokio::test]
async fn remote_failure_aborts_at_that_line() {
    let dir = TempDir::new().unwrap();
    let path = input_file(&dir, "case one\ncase two\ncase three\ncase four\n");
    let pipeline = pipeline(
        HashingEmbedder::default(),
        StubGenerator::new(REPLY).failing_on(2),
        FailurePolicy::FailFast,
    )
    .await
    .unwrap();

    let mut out = Vec::new();
    let err = pipeline.run(&path, &mut out).await.unwrap_err();
    let text = String::from_utf8(out).unwrap();

    assert!(matches!(
        err,
        GeneratorError::Remote(RemoteServiceError::RateLimited(_))
    ));
    assert_eq!(headers(&text), vec!["--- Generating for: case one ---"]);
    assert!(!text.contains("case two"));
    assert_eq!(pipeline.rag().generator().calls(), 2);
}

#[tokio::test]
async fn continue_on_error_records_failure_and_keeps_going() {
    let dir = TempDir::new().unwrap();
    let path = input_file(&dir, "case one\ncase two\ncase three\n");
    let pipeline = pipeline(
        HashingEmbedder::default(),
        StubGenerator::new(REPLY).failing_on(2),
        FailurePolicy::ContinueOnError,
    )
    .await
    .unwrap();

    let mut out = Vec::new();
    let summary = pipeline.run(&path, &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].position, 2);
    assert_eq!(summary.failures[0].query, "case two");
    assert_eq!(
        headers(&text),
        vec![
            "--- Generating for: case one ---",
            "--- Generating for: case three ---",
        ]
    );
}

#[tokio::test]
async fn identical_queries_are_not_deduplicated() {
    let dir = TempDir::new().unwrap();
    let path = input_file(&dir, "login test\nlogin test\n");
    let pipeline = pipeline(
        CountingEmbedder::default(),
        StubGenerator::new(REPLY),
        FailurePolicy::FailFast,
    )
    .await
    .unwrap();
    let after_indexing = pipeline.rag().store().embedder().calls();
    assert_eq!(after_indexing, 1);

    let mut out = Vec::new();
    pipeline.run(&path, &mut out).await.unwrap();

    assert_eq!(pipeline.rag().generator().calls(), 2);
    assert_eq!(pipeline.rag().store().embedder().calls(), after_indexing + 2);
}

#[tokio::test]
async fn each_prompt_carries_its_own_query() {
    let dir = TempDir::new().unwrap();
    let path = input_file(&dir, "first case\nsecond case\n");
    let pipeline = pipeline(
        HashingEmbedder::default(),
        StubGenerator::new(REPLY),
        FailurePolicy::FailFast,
    )
    .await
    .unwrap();

    let mut out = Vec::new();
    pipeline.run(&path, &mut out).await.unwrap();

    let prompts = pipeline.rag().generator().user_prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].ends_with("first case"));
    assert!(prompts[1].ends_with("second case"));
}
