//! Argument parsing and dispatch over the scripted transport.

use std::sync::Arc;

use clap::Parser;
use rc_cli::{execute, Cli, Commands};
use rc_client::{
    MessageKindFilter, RocketChatClient, SortBy, SortOrder, DEFAULT_MESSAGE_SAMPLE,
    DEFAULT_ROOM_SAMPLE,
};
use rc_core::testing::MockTransport;
use serde_json::json;

fn client(mock: &MockTransport) -> RocketChatClient {
    RocketChatClient::with_transport(Arc::new(mock.clone()))
}

#[test]
fn test_parse_advanced_search() {
    let cli = Cli::try_parse_from([
        "rc",
        "advanced-search",
        "deploy",
        "--room",
        "GENERAL",
        "--kind",
        "pinned",
        "--sort-by",
        "timestamp",
        "--order",
        "asc",
        "--from",
        "2024-03-01T00:00:00Z",
    ])
    .unwrap();

    match cli.command {
        Commands::AdvancedSearch {
            query,
            room,
            kind,
            sort_by,
            order,
            from,
            limit,
            ..
        } => {
            assert_eq!(query, "deploy");
            assert_eq!(room.as_deref(), Some("GENERAL"));
            assert_eq!(kind, Some(MessageKindFilter::Pinned));
            assert_eq!(sort_by, Some(SortBy::Timestamp));
            assert_eq!(order, SortOrder::Asc);
            assert!(from.is_some());
            assert_eq!(limit, 20);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

/// **Test: sample sizes default to the analytics defaults.**
#[test]
fn test_parse_sample_defaults() {
    match Cli::try_parse_from(["rc", "activity", "alice"]).unwrap().command {
        Commands::Activity { sample, .. } => assert_eq!(sample, DEFAULT_ROOM_SAMPLE),
        other => panic!("unexpected command: {other:?}"),
    }
    match Cli::try_parse_from(["rc", "analytics", "ROOM"]).unwrap().command {
        Commands::Analytics { messages, .. } => assert_eq!(messages, DEFAULT_MESSAGE_SAMPLE),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_rejects_unknown_kind() {
    assert!(Cli::try_parse_from(["rc", "advanced-search", "x", "--kind", "loud"]).is_err());
}

#[test]
fn test_parse_repeated_members() {
    let cli = Cli::try_parse_from([
        "rc", "create-room", "core", "--private", "--member", "alice", "--member", "bob",
    ])
    .unwrap();
    assert_eq!(
        cli.command,
        Commands::CreateRoom {
            name: "core".to_string(),
            private: true,
            read_only: false,
            members: vec!["alice".to_string(), "bob".to_string()],
        }
    );
}

#[tokio::test]
async fn test_execute_invite_reports_kind() {
    let mock = MockTransport::new();
    mock.fail("channels.invite", "not a channel")
        .respond("groups.invite", json!({"success": true}));

    let output = execute(
        &client(&mock),
        Commands::Invite {
            room: "ROOM".to_string(),
            user_id: "u2".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(output, json!({"success": true, "kind": "private_group"}));
}

#[tokio::test]
async fn test_execute_propagates_errors() {
    let mock = MockTransport::new();
    let err = execute(
        &client(&mock),
        Commands::Counters {
            room: "ROOM".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to fetch room counters - room not found or no access"
    );
}
