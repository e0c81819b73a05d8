//! End-to-end driver tests against the loopback mock service.

use std::io::Write;
use std::time::Duration;

use meme_cli::{run, run_on, DriverError, Invocation};
use meme_client::{BatchSource, ClientError, Connection, Deadline, StreamPolicy};
use meme_core::{CategoryFilter, MemeRecord};
use meme_testkit::{MockBehavior, MockMemeService, MockServer};

fn meme(id: &str, title: &str, category: &str) -> MemeRecord {
    MemeRecord {
        id: id.to_string(),
        title: title.to_string(),
        url: format!("http://img/{}.png", id),
        category: category.to_string(),
    }
}

async fn start(behavior: MockBehavior) -> MockServer {
    MockMemeService::new(vec![
        meme("1", "X", "funny"),
        meme("2", "Y", "funny"),
        meme("3", "Z", ""),
    ])
    .with_behavior(behavior)
    .serve()
    .await
    .unwrap()
}

async fn run_to_string(server: &MockServer, invocation: Invocation) -> (Result<(), DriverError>, String) {
    let config = server.client_config(Duration::from_secs(5));
    let mut out = Vec::new();
    let result = run(invocation, &config, &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_list_funny_renders_in_order() {
    let server = start(MockBehavior::Normal).await;

    let (result, output) =
        run_to_string(&server, Invocation::List(CategoryFilter::new("funny"))).await;
    result.unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"1) id=1 title="X" url=http://img/1.png category="funny""#,
            r#"2) id=2 title="Y" url=http://img/2.png category="funny""#,
            "Listed 2 memes",
        ]
    );
}

#[tokio::test]
async fn test_list_with_no_matches() {
    let server = start(MockBehavior::Normal).await;

    let (result, output) =
        run_to_string(&server, Invocation::List(CategoryFilter::new("dogs"))).await;
    result.unwrap();
    assert_eq!(output, "Listed 0 memes\n");
}

#[tokio::test]
async fn test_random_renders_uncategorized() {
    let server = start(MockBehavior::Normal).await;

    // The mock rotates through matches; the third pick is the uncategorized one.
    let mut seen = String::new();
    for _ in 0..3 {
        let (result, output) =
            run_to_string(&server, Invocation::Random(CategoryFilter::all())).await;
        result.unwrap();
        assert!(output.starts_with("Random meme: id="));
        seen.push_str(&output);
    }
    assert!(seen.contains(r#"category="uncategorized""#));
}

#[tokio::test]
async fn test_stream_reports_count() {
    let server = start(MockBehavior::Normal).await;

    let (result, output) = run_to_string(&server, Invocation::Stream(CategoryFilter::all())).await;
    result.unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("1) id=1"));
    assert!(lines[2].starts_with("3) id=3"));
    assert_eq!(lines[3], "Stream completed after 3 items");
}

#[tokio::test]
async fn test_interrupted_stream_follows_policy() {
    let server = start(MockBehavior::FailStreamAfter(2)).await;
    let config = server.client_config(Duration::from_secs(5));

    // Tolerant (default): partial count is reported.
    let mut out = Vec::new();
    run(Invocation::Stream(CategoryFilter::all()), &config, &mut out)
        .await
        .unwrap();
    assert!(String::from_utf8(out)
        .unwrap()
        .ends_with("Stream completed after 2 items\n"));

    // Strict: the interruption is an error.
    let connection = Connection::open(&config).await.unwrap();
    let mut out = Vec::new();
    let err = run_on(
        connection,
        Invocation::Stream(CategoryFilter::all()),
        StreamPolicy::Strict,
        &Deadline::default(),
        &mut out,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DriverError::Client(ClientError::Remote { .. })));
}

#[tokio::test]
async fn test_upload_from_file() {
    let server = start(MockBehavior::Normal).await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"title": "a", "url": "http://img/a.png", "category": "funny"}},
            {{"title": "b", "url": "http://img/b.png"}}]"#
    )
    .unwrap();

    let (result, output) = run_to_string(
        &server,
        Invocation::Upload(BatchSource::File(file.path().to_path_buf())),
    )
    .await;
    result.unwrap();

    assert_eq!(output, "Uploaded 2 memes. Message: Uploaded 2 memes\n");
    let uploads = server.uploads();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[1].category, "");
}

#[tokio::test]
async fn test_inline_upload_with_empty_title_is_rejected() {
    let server = start(MockBehavior::Normal).await;

    let (result, output) = run_to_string(
        &server,
        Invocation::Upload(BatchSource::Inline {
            title: String::new(),
            url: "http://img/a.png".into(),
            category: String::new(),
        }),
    )
    .await;

    assert!(matches!(
        result,
        Err(DriverError::Client(ClientError::Validation(_)))
    ));
    assert!(output.is_empty());
    assert!(server.uploads().is_empty());
}

#[tokio::test]
async fn test_timeout_releases_connection_once() {
    let server = start(MockBehavior::Stall).await;
    let config = server.client_config(Duration::from_secs(5));

    let connection = Connection::open(&config).await.unwrap();
    let release = connection.release_handle();

    let mut out = Vec::new();
    let err = run_on(
        connection,
        Invocation::List(CategoryFilter::all()),
        StreamPolicy::default(),
        &Deadline::after(Duration::from_millis(300)),
        &mut out,
    )
    .await
    .unwrap_err();

    match err {
        DriverError::Client(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(release.release_count(), 1);
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_error_message_names_operation() {
    let server = start(MockBehavior::Normal).await;

    let (result, _) = run_to_string(&server, Invocation::Random(CategoryFilter::new("dogs"))).await;
    let message = result.unwrap_err().to_string();
    assert!(message.starts_with("GetRandomMeme:"), "{message}");
}
