//! CLI parser.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rc_client::{
    AnalysisKind, MessageKindFilter, SortBy, SortOrder, DEFAULT_MESSAGE_SAMPLE, DEFAULT_ROOM_SAMPLE,
};

#[derive(Parser, Debug)]
#[command(name = "rc")]
#[command(about = "Rocket.Chat client CLI: messages, rooms, files, search, analytics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log file (overrides ROCKETCHAT_LOG_FILE).
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Post a message, optionally as a thread reply.
    Send {
        room: String,
        text: String,
        #[arg(long)]
        thread: Option<String>,
    },
    /// Fetch one message by id.
    GetMessage { id: String },
    /// Replace a message's text.
    Edit { room: String, id: String, text: String },
    Delete { room: String, id: String },
    /// Add a reaction, or remove it with --remove.
    React {
        id: String,
        emoji: String,
        #[arg(long)]
        remove: bool,
    },
    Pin {
        id: String,
        #[arg(long)]
        undo: bool,
    },
    Star {
        id: String,
        #[arg(long)]
        undo: bool,
    },
    /// Replies of a thread.
    Thread {
        id: String,
        #[arg(long, default_value = "50")]
        count: u32,
    },
    /// Recent messages of a room (channel, group or DM).
    History {
        room: String,
        #[arg(long, default_value = "50")]
        count: u32,
    },
    Members {
        room: String,
        #[arg(long, default_value = "50")]
        count: u32,
    },
    Files {
        room: String,
        #[arg(long, default_value = "50")]
        count: u32,
    },
    Counters { room: String },
    Invite { room: String, user_id: String },
    Kick { room: String, user_id: String },
    Announce { room: String, text: String },
    Describe { room: String, text: String },
    Topic { room: String, text: String },
    /// Room details by id or name.
    RoomInfo { reference: String },
    /// Rooms the authenticated user belongs to.
    Rooms,
    CreateRoom {
        name: String,
        #[arg(long)]
        private: bool,
        #[arg(long)]
        read_only: bool,
        /// Username to add; repeatable.
        #[arg(long = "member")]
        members: Vec<String>,
    },
    /// Open a direct-message room.
    Dm { username: String },
    User { username: String },
    Me,
    Upload {
        room: String,
        path: PathBuf,
        #[arg(long)]
        message: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        thread: Option<String>,
        #[arg(long)]
        mime: Option<String>,
    },
    /// Download a file by id and name into a file or directory.
    Download {
        id: String,
        name: String,
        #[arg(default_value = ".")]
        dest: PathBuf,
    },
    Search {
        query: String,
        #[arg(long)]
        room: Option<String>,
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    AdvancedSearch {
        query: String,
        #[arg(long)]
        room: Option<String>,
        /// Author user id.
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        #[arg(long)]
        to: Option<DateTime<Utc>>,
        /// mentions | starred | pinned
        #[arg(long)]
        kind: Option<MessageKindFilter>,
        /// timestamp | relevance
        #[arg(long)]
        sort_by: Option<SortBy>,
        /// asc | desc
        #[arg(long, default_value = "desc")]
        order: SortOrder,
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    GlobalSearch {
        query: String,
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    Analytics {
        room: String,
        #[arg(long, default_value_t = DEFAULT_MESSAGE_SAMPLE)]
        messages: u32,
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        #[arg(long)]
        to: Option<DateTime<Utc>>,
        #[arg(long)]
        skip_messages: bool,
        #[arg(long)]
        skip_files: bool,
        #[arg(long)]
        skip_members: bool,
    },
    /// Activity of one user (id or username) across the first rooms.
    Activity {
        user: String,
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        #[arg(long)]
        to: Option<DateTime<Utc>>,
        /// Messages read per room.
        #[arg(long, default_value_t = DEFAULT_ROOM_SAMPLE)]
        sample: u32,
    },
    /// Transcript plus instruction for a language model.
    Analyze {
        room: String,
        /// summary | sentiment | topics | custom
        #[arg(long, default_value = "summary")]
        kind: AnalysisKind,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long, default_value = "100")]
        count: u32,
    },
}
