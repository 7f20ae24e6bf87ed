//! Client-side mirrors of the backend collections.
//!
//! Each list owns an in-memory copy of one server collection, seeded
//! once when a notebook is opened and reconciled after every mutation
//! round trip. Lists are ordered by mutation recency: creates and
//! document updates surface at the front, removals filter by id, and
//! nothing else is ever sorted.

mod conversations;
mod mirror;
mod notes;
pub mod notices;
mod sources;

pub use conversations::ConversationList;
pub use mirror::{Keyed, Mirror};
pub use notes::NoteList;
pub use notices::{Notice, NoticeLevel, NoticeSender};
pub use sources::SourceList;
