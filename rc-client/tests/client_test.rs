//! Client operations over the scripted transport.

use std::sync::Arc;

use rc_client::{AnalysisKind, AnalysisRequest, NewRoom, RocketChatClient, RocketChatError, UserLookup};
use rc_core::testing::MockTransport;
use rc_core::{RequestBody, UploadedFile};
use serde_json::json;

fn client(mock: &MockTransport) -> RocketChatClient {
    RocketChatClient::with_transport(Arc::new(mock.clone()))
}

fn json_body(mock: &MockTransport, path: &str) -> serde_json::Value {
    let (_, request) = mock
        .calls()
        .into_iter()
        .find(|(p, _)| p == path)
        .unwrap();
    match request.body {
        RequestBody::Json(body) => body,
        other => panic!("expected JSON body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_message_actions_use_message_id() {
    let mock = MockTransport::new();
    for path in ["chat.pinMessage", "chat.unPinMessage", "chat.starMessage", "chat.unStarMessage", "chat.react"] {
        mock.respond(path, json!({"success": true}));
    }
    let client = client(&mock);

    client.pin_message("m1").await.unwrap();
    client.unpin_message("m1").await.unwrap();
    client.star_message("m1").await.unwrap();
    client.unstar_message("m1").await.unwrap();
    client.react("m1", "tada", false).await.unwrap();

    assert_eq!(json_body(&mock, "chat.starMessage"), json!({"messageId": "m1"}));
    assert_eq!(
        json_body(&mock, "chat.react"),
        json!({"messageId": "m1", "emoji": ":tada:", "shouldReact": false})
    );
    assert_eq!(mock.total_calls(), 5);
}

#[tokio::test]
async fn test_empty_text_rejected_before_request() {
    let mock = MockTransport::new();
    let err = client(&mock).send_message("ROOM", "  ", None).await.unwrap_err();
    assert!(matches!(err, RocketChatError::Validation(_)));
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn test_update_and_delete() {
    let mock = MockTransport::new();
    mock.respond(
        "chat.update",
        json!({"message": {"_id": "m1", "rid": "ROOM", "msg": "fixed", "ts": 1709287200000i64, "u": {"_id": "u1", "username": "a"}}}),
    )
    .respond("chat.delete", json!({"_id": "m1", "success": true}));
    let client = client(&mock);

    let updated = client.update_message("ROOM", "m1", "fixed").await.unwrap();
    client.delete_message("ROOM", "m1").await.unwrap();

    assert_eq!(updated.text, "fixed");
    assert_eq!(json_body(&mock, "chat.delete"), json!({"roomId": "ROOM", "msgId": "m1"}));
}

#[tokio::test]
async fn test_thread_messages() {
    let mock = MockTransport::new();
    mock.respond_for(
        "chat.getThreadMessages",
        "tmid",
        "parent",
        json!({"messages": [{"_id": "r1", "msg": "reply", "ts": "2024-03-01T10:00:00Z", "u": {"_id": "u1", "username": "a"}, "tmid": "parent"}]}),
    );

    let replies = client(&mock).thread_messages("parent", 20).await.unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].thread_id.as_deref(), Some("parent"));
}

#[tokio::test]
async fn test_create_group_and_direct_message() {
    let mock = MockTransport::new();
    mock.respond("groups.create", json!({"group": {"_id": "G1", "name": "core-team", "t": "p"}}))
        .respond("im.create", json!({"room": {"_id": "D1", "t": "d"}}));
    let client = client(&mock);

    let mut new_room = NewRoom::group("core-team");
    new_room.members = vec!["alice".to_string()];
    let group = client.create_room(&new_room).await.unwrap();
    let dm = client.open_direct_message("@bob").await.unwrap();

    assert_eq!(group.id, "G1");
    assert_eq!(
        json_body(&mock, "groups.create"),
        json!({"name": "core-team", "members": ["alice"], "readOnly": false})
    );
    assert_eq!(dm.id, "D1");
    assert_eq!(json_body(&mock, "im.create"), json!({"username": "bob"}));
    assert_eq!(mock.call_count("channels.create"), 0);
}

#[tokio::test]
async fn test_room_name_with_space_rejected() {
    let mock = MockTransport::new();
    let err = client(&mock)
        .create_room(&NewRoom::channel("two words"))
        .await
        .unwrap_err();
    assert!(matches!(err, RocketChatError::Validation(_)));
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn test_user_info_and_me() {
    let mock = MockTransport::new();
    mock.respond_for(
        "users.info",
        "username",
        "alice",
        json!({"user": {"_id": "u1", "username": "alice", "active": true}}),
    )
    .respond("me", json!({"_id": "u0", "username": "bot", "success": true}));
    let client = client(&mock);

    let user = client.user_info(UserLookup::Username("@alice")).await.unwrap();
    let me = client.me().await.unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(me.username, "bot");
}

#[tokio::test]
async fn test_set_topic_returns_stored_topic() {
    let mock = MockTransport::new();
    mock.respond("channels.setTopic", json!({"topic": "Release week", "success": true}));
    let topic = client(&mock).set_topic("ROOM", "Release week").await.unwrap();
    assert_eq!(topic, "Release week");
}

/// **Test: Custom analysis without a prompt fails before history is fetched.**
#[tokio::test]
async fn test_analysis_prompt_validates_first() {
    let mock = MockTransport::new();
    let err = client(&mock)
        .analysis_prompt("ROOM", &AnalysisRequest::new(AnalysisKind::Custom), 50)
        .await
        .unwrap_err();
    assert!(matches!(err, RocketChatError::Validation(_)));
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn test_analysis_prompt_renders_history() {
    let mock = MockTransport::new();
    mock.respond(
        "channels.history",
        json!({"messages": [{"_id": "m1", "msg": "ship friday", "ts": "2024-03-01T10:00:00Z", "u": {"_id": "u1", "username": "alice"}}]}),
    );

    let prompt = client(&mock)
        .analysis_prompt("ROOM", &AnalysisRequest::new(AnalysisKind::Summary), 50)
        .await
        .unwrap();

    assert!(prompt.contains("[2024-03-01 10:00] alice: ship friday"));
}

#[tokio::test]
async fn test_download_requires_id_and_name() {
    let mock = MockTransport::new();
    let dir = tempfile::tempdir().unwrap();
    let err = client(&mock)
        .download_file("F1", "", dir.path())
        .await
        .unwrap_err();
    assert!(matches!(err, RocketChatError::Validation(_)));
    assert!(mock.downloads().is_empty());
}

#[tokio::test]
async fn test_download_streams_chunks_to_file() {
    let mock = MockTransport::new();
    mock.serve_file(&["file-upload", "F1", "a.bin"], b"0123456789");
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("nested").join("copy.bin");

    let saved = client(&mock).download_file("F1", "a.bin", &dest).await.unwrap();

    assert_eq!(saved.path, dest);
    assert_eq!(saved.bytes, 10);
    assert_eq!(std::fs::read(&dest).unwrap(), b"0123456789");
}

/// **Test: an uploaded file downloads from the address it reports.**
///
/// **Setup:** an `UploadedFile` for F7; content served under its download segments.
/// **Expected:** one download at `file-upload/F7/notes.txt`, saved under the file's name.
#[tokio::test]
async fn test_download_uploaded_uses_file_address() {
    let uploaded = UploadedFile {
        id: "F7".to_string(),
        name: "notes.txt".to_string(),
        mime_type: "text/plain".to_string(),
        size: 5,
        url: "/file-upload/F7/notes.txt".to_string(),
        message_id: None,
    };
    let segments = uploaded.download_segments();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
    let mock = MockTransport::new();
    mock.serve_file(&segments, b"hello");
    let dir = tempfile::tempdir().unwrap();

    let saved = client(&mock).download_uploaded(&uploaded, dir.path()).await.unwrap();

    assert_eq!(mock.downloads(), vec!["file-upload/F7/notes.txt"]);
    assert_eq!(saved.path, dir.path().join("notes.txt"));
    assert_eq!(saved.bytes, 5);
}
