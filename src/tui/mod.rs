pub mod handler;
pub mod ui;

pub use handler::{handle_key_event, AppAction};
pub use ui::draw;
