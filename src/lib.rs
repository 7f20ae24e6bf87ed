//! TUI client for notebook research workspaces.
//!
//! Talks to a notebook backend over REST, keeping local mirrors of a
//! notebook's sources, conversations and notes in sync with it, and
//! optionally discovers new web sources through the Claude API.

pub mod ai;
pub mod api;
pub mod app;
pub mod config;
pub mod discover;
pub mod error;
pub mod models;
pub mod sync;
pub mod tui;
