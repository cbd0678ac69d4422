//! Tests for [`crate::HttpTransport`] against a mockito server.

use futures::StreamExt;
use mockito::Matcher;
use serde_json::json;

use crate::{ApiRequest, Credentials, HttpTransport, HttpTransportOptions, RocketChatError, Transport, UploadForm};

fn segments(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

fn transport(server: &mockito::ServerGuard) -> HttpTransport {
    HttpTransport::new(
        Credentials::new(server.url(), "user-1", "token-abcdefghijkl"),
        HttpTransportOptions::default(),
    )
    .unwrap()
}

/// **Test: Every call carries both auth headers and the query string.**
///
/// **Setup:** Mock `GET /api/v1/channels.history` requiring both headers and `roomId`.
/// **Action:** `call("channels.history", get().query("roomId", "GENERAL"))`.
/// **Expected:** Returns the JSON body; mock hit exactly once.
#[tokio::test]
async fn test_call_sends_auth_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/channels.history")
        .match_header("x-auth-token", "token-abcdefghijkl")
        .match_header("x-user-id", "user-1")
        .match_query(Matcher::UrlEncoded("roomId".into(), "GENERAL".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"messages":[],"success":true}"#)
        .expect(1)
        .create_async()
        .await;

    let body = transport(&server)
        .call("channels.history", ApiRequest::get().query("roomId", "GENERAL"))
        .await
        .unwrap();

    assert_eq!(body["success"], json!(true));
    mock.assert_async().await;
}

/// **Test: A 2xx body with `success: false` is an upstream failure carrying the server text.**
#[tokio::test]
async fn test_success_false_is_upstream_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v1/chat.postMessage")
        .with_status(200)
        .with_body(r#"{"success":false,"error":"error-action-not-allowed"}"#)
        .create_async()
        .await;

    let err = transport(&server)
        .call("chat.postMessage", ApiRequest::post(json!({"roomId": "r1", "text": "hi"})))
        .await
        .unwrap_err();

    match err {
        RocketChatError::Upstream(message) => assert_eq!(message, "error-action-not-allowed"),
        other => panic!("expected upstream error, got {other:?}"),
    }
}

/// **Test: Non-2xx status uses the server's error text, or the status when there is none.**
#[tokio::test]
async fn test_http_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _with_text = server
        .mock("GET", "/api/v1/groups.info")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"success":false,"error":"error-room-not-found"}"#)
        .create_async()
        .await;
    let _bare = server
        .mock("GET", "/api/v1/me")
        .with_status(401)
        .with_body("unauthorized")
        .create_async()
        .await;

    let transport = transport(&server);
    let err = transport
        .call("groups.info", ApiRequest::get().query("roomName", "x"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "error-room-not-found");

    let err = transport.call("me", ApiRequest::get()).await.unwrap_err();
    assert!(err.to_string().contains("401"));
}

/// **Test: JSON body is forwarded as-is.**
#[tokio::test]
async fn test_post_json_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/chat.react")
        .match_body(Matcher::Json(json!({"messageId": "m1", "emoji": ":+1:", "shouldReact": true})))
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    transport(&server)
        .call(
            "chat.react",
            ApiRequest::post(json!({"messageId": "m1", "emoji": ":+1:", "shouldReact": true})),
        )
        .await
        .unwrap();
    mock.assert_async().await;
}

/// **Test: Multipart upload streams the file and includes optional text fields.**
#[tokio::test]
async fn test_multipart_upload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "release notes").unwrap();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/rooms.upload/r1")
        .match_header("content-type", Matcher::Regex("multipart/form-data".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("release notes".into()),
            Matcher::Regex(r#"name="msg""#.into()),
            Matcher::Regex(r#"filename="notes.txt""#.into()),
        ]))
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let form = UploadForm {
        file_path: path,
        file_name: "notes.txt".to_string(),
        mime_type: Some("text/plain".to_string()),
        message: Some("see attached".to_string()),
        description: None,
        thread_id: None,
    };
    transport(&server)
        .call("rooms.upload/r1", ApiRequest::upload(form))
        .await
        .unwrap();
    mock.assert_async().await;
}

/// **Test: Upload of a missing file fails locally with an IO error.**
#[tokio::test]
async fn test_multipart_missing_file() {
    let server = mockito::Server::new_async().await;
    let form = UploadForm {
        file_path: "/definitely/not/here.bin".into(),
        file_name: "here.bin".to_string(),
        mime_type: None,
        message: None,
        description: None,
        thread_id: None,
    };
    let err = transport(&server)
        .call("rooms.upload/r1", ApiRequest::upload(form))
        .await
        .unwrap_err();
    assert!(matches!(err, RocketChatError::Io(_)));
}

/// **Test: Download streams the body; names are percent-encoded as one path segment.**
#[tokio::test]
async fn test_download_streams_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/file-upload/F1/my%20report.pdf")
        .match_header("x-auth-token", "token-abcdefghijkl")
        .with_status(200)
        .with_body(b"%PDF-1.4 body")
        .create_async()
        .await;

    let mut stream = transport(&server)
        .download(segments(&["file-upload", "F1", "my report.pdf"]))
        .await
        .unwrap();
    let mut collected = Vec::new();
    while let Some(chunk) = stream.next().await {
        collected.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(collected, b"%PDF-1.4 body");
}

/// **Test: Download of a missing file is an upstream failure.**
#[tokio::test]
async fn test_download_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/file-upload/F2/gone.png")
        .with_status(404)
        .create_async()
        .await;

    let result = transport(&server).download(segments(&["file-upload", "F2", "gone.png"])).await;
    match result {
        Err(RocketChatError::Upstream(message)) => assert!(message.contains("404")),
        Err(other) => panic!("expected upstream error, got {other:?}"),
        Ok(_) => panic!("expected failure"),
    }
}
