//! Integration tests for the credentialed and callback transports.

use iiif_manifold::clients::{
    CallbackTransport, CredentialedTransport, Transport, TransportError, TransportRequest,
    MANIFEST_CALLBACK,
};
use serde_json::json;
use std::io::{Read, Write};
use std::net::TcpListener;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_credentialed_get_decodes_json_and_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/manifest.json"))
        .and(header("Accept", "application/json"))
        .and(header_exists("User-Agent"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Served-By", "iiif")
                .set_body_json(json!({"@id": "m"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = CredentialedTransport::new(Some("Viewer/1.0"));
    let response = transport
        .fetch(TransportRequest::get(format!("{}/manifest.json", server.uri())))
        .await
        .unwrap();

    assert_eq!(response.code, 200);
    assert_eq!(response.body, Some(json!({"@id": "m"})));
    assert_eq!(
        response.headers.get("x-served-by"),
        Some(&vec!["iiif".to_string()])
    );
}

#[tokio::test]
async fn test_credentialed_error_keeps_json_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "missingCredentials"})))
        .mount(&server)
        .await;

    let transport = CredentialedTransport::new(None);
    let result = transport
        .fetch(TransportRequest::get(format!("{}/info.json", server.uri())))
        .await;

    match result {
        Err(TransportError::Response(error)) => {
            assert_eq!(error.code, 401);
            assert_eq!(error.message, "HTTP 401 Unauthorized");
            assert_eq!(error.body, Some(json!({"error": "missingCredentials"})));
        }
        other => panic!("Expected Response error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_credentialed_rejects_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let transport = CredentialedTransport::new(None);
    let result = transport
        .fetch(TransportRequest::get(format!("{}/page.html", server.uri())))
        .await;

    let error = tokio_test::assert_err!(result);
    assert!(matches!(error, TransportError::InvalidBody { code: 200, .. }));
    assert_eq!(error.status(), 200);
}

#[tokio::test]
async fn test_callback_transport_issues_get_for_head_and_drops_token() {
    let server = MockServer::start().await;
    Mock::given(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/video.mp4"))
        .and(query_param("callback", MANIFEST_CALLBACK))
        .respond_with(ResponseTemplate::new(200).set_body_string("manifestCallback({\"ok\":true})"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = CallbackTransport::new(MANIFEST_CALLBACK, None);
    let response = transport
        .fetch(
            TransportRequest::head(format!("{}/video.mp4", server.uri()))
                .bearer_token(Some("ignored".to_string())),
        )
        .await
        .unwrap();

    assert_eq!(response.body, Some(json!({"ok": true})));
}

#[tokio::test]
async fn test_callback_transport_rejects_unwrapped_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/manifest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"@id": "m"})))
        .mount(&server)
        .await;

    let transport = CallbackTransport::new(MANIFEST_CALLBACK, None);
    let result = transport
        .fetch(TransportRequest::get(format!("{}/manifest.json", server.uri())))
        .await;

    assert!(matches!(result, Err(TransportError::InvalidBody { .. })));
}

/// Answers one request with fewer body bytes than `Content-Length` declares.
fn serve_truncated_body(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0_u8; 4096];
            let _ = stream.read(&mut buf);
            let head = "HTTP/1.1 200 OK\r\nContent-Length: 500\r\n\r\n";
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_credentialed_truncated_body_is_a_network_error() {
    let base = serve_truncated_body(r#"{"@id": "http://x"#);

    let transport = CredentialedTransport::new(None);
    let result = transport
        .fetch(TransportRequest::get(format!("{base}/manifest.json")))
        .await;

    let error = tokio_test::assert_err!(result);
    assert!(matches!(error, TransportError::Network(_)));
    assert_eq!(error.status(), 0);
}

#[tokio::test]
async fn test_callback_truncated_body_is_a_network_error() {
    let base = serve_truncated_body("manifestCallback({\"@id\"");

    let transport = CallbackTransport::new(MANIFEST_CALLBACK, None);
    let result = transport
        .fetch(TransportRequest::get(format!("{base}/manifest.json")))
        .await;

    assert!(matches!(result, Err(TransportError::Network(_))));
}
