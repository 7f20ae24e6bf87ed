pub mod discover;

pub use discover::{DiscoverClient, DiscoveredSource, RESULT_COUNT};
