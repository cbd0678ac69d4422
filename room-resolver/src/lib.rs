//! # room-resolver
//!
//! A room reference does not say whether it names a public channel, a private group or a
//! direct message, and each kind lives under its own endpoint family. [`RoomResolver`] tries
//! the families in a fixed order through [`FallbackChain`] and returns the first success,
//! or one "room not found or no access" error.

pub mod chain;
pub mod operation;
pub mod resolver;

pub use chain::FallbackChain;
pub use operation::{Candidate, RoomOperation};
pub use resolver::{looks_like_room_id, HistoryQuery, Page, Resolved, RoomResolver};
