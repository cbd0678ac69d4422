//! Domain types deserialized from Rocket.Chat REST payloads.

mod file;
mod member;
mod message;
mod room;
pub mod timestamp;
mod window;

pub use file::{download_path, download_segments, FileUploader, RoomFile, UploadedFile};
pub use member::{Member, Presence, User};
pub use message::{FileRef, Mention, Message, MessageAuthor, Reaction, SYSTEM_USERNAME};
pub use room::{Room, RoomCounters, RoomKind};
pub use window::DateWindow;
