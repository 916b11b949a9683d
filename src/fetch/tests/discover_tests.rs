use super::mount_page;
use crate::{Error, FetchCause, Harvester};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_discover_resolves_against_origin() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/blog/post",
        r#"<html><head><title>Post</title></head><body>
            <img src="/img/a.png">
            <img src="https://cdn.other.com/x.jpg">
            <img src="img/b.png">
            <img src="/img/a.png">
            <img src="">
        </body></html>"#,
    )
    .await;

    let page = Harvester::new()
        .discover(&format!("{}/blog/post", server.uri()))
        .await
        .unwrap();

    assert_eq!(page.title.as_deref(), Some("Post"));
    assert_eq!(
        page.images.urls(),
        vec![
            format!("{}/img/a.png", server.uri()),
            "https://cdn.other.com/x.jpg".to_string(),
            format!("{}/img/b.png", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_discover_distinct_absolute_references() {
    let server = MockServer::start().await;
    let urls: Vec<String> = (0..6)
        .map(|i| format!("https://cdn{}.example.com/pic{}.jpg", i % 2, i))
        .collect();
    let html = urls
        .iter()
        .map(|u| format!(r#"<p><img src="{}"></p>"#, u))
        .collect::<String>();
    mount_page(&server, "/", &html).await;

    let page = Harvester::new().discover(&server.uri()).await.unwrap();
    assert_eq!(page.images.urls(), urls);
}

#[tokio::test]
async fn test_discover_page_without_images() {
    let server = MockServer::start().await;
    mount_page(&server, "/empty", "<html><body><p>nothing here</p></body></html>").await;

    let page = Harvester::new()
        .discover(&format!("{}/empty", server.uri()))
        .await
        .unwrap();
    assert!(page.images.is_empty());
}

#[tokio::test]
async fn test_discover_applies_configured_filter() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<img src="/a.png"><img src="/logo.svg"><img src="/b.png"><img src="/c.png">"#,
    )
    .await;

    let harvester = Harvester::new()
        .with_config_str(r#"{ "filter": { "exclude_patterns": ["\\.svg$"] }, "max_images": 2 }"#)
        .unwrap();
    let page = harvester.discover(&server.uri()).await.unwrap();

    assert_eq!(
        page.images.urls(),
        vec![
            format!("{}/a.png", server.uri()),
            format!("{}/b.png", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_discover_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = Harvester::new()
        .discover(&format!("{}/broken", server.uri()))
        .await
        .unwrap_err();

    match err {
        Error::FetchFailed { cause, .. } => assert_eq!(cause, FetchCause::Status(500)),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_discover_invalid_input_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for bad in ["not a url", "/relative/page", "ftp://example.com/"] {
        let err = Harvester::new().discover(bad).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "{:?}", bad);
    }
}

#[tokio::test]
async fn test_discover_unreachable_host() {
    // Grab a free port, then release it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = Harvester::new()
        .with_request_timeout(5)
        .discover(&format!("http://127.0.0.1:{}/", port))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FetchFailed { .. }));
}
