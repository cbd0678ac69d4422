//! # rc-search
//!
//! Message search over a Rocket.Chat server. Scoped searches filter a bounded history window
//! locally and fall back to `chat.search`; unscoped searches do the reverse. Advanced search
//! adds author, date and type filters plus timestamp sorting; global search merges messages,
//! rooms and users.

pub mod filters;
pub mod global;
pub mod local;
pub mod search;

pub use filters::{AdvancedSearchParams, AppliedFilters, MessageKindFilter, SortBy, SortOrder};
pub use global::{GlobalResults, GlobalSearchResult, GlobalTotals};
pub use local::{filter_by_text, local_window, DEFAULT_LIMIT};
pub use search::{MessageSearch, SearchResultSet, CROSS_ROOM_LIMIT, PER_ROOM_WINDOW};
