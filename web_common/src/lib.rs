//! Shared API types and client logic for the IPTV channel admin panel.
//!
//! This crate provides the wire types exchanged with the channel server
//! and the pure logic behind the browser client. Everything here is
//! WASM-compatible and free of DOM access, so it runs natively under
//! `cargo test` as well as inside `web_app`.
//!
//! # Architecture
//!
//! - `models` / `requests` / `responses` - REST DTOs and form bodies
//! - `table` - channel table view-model (filter, sort, selection, toggles)
//! - `numbering` - inline number edits and insert-at shift planning
//! - `color` - EPG colour parsing and contrast-safe label colours
//! - `streams` - live stream status summaries
//! - `profiles` - FFmpeg profile rules
//! - `epg` - EPG search and colour inference planning
//! - `settings` - settings page busy flags and one-shot query parameters
//!
//! # Usage
//!
//! ```rust
//! use web_common::{ChannelRow, ChannelTableModel, SortState, ChannelColumn};
//! ```

mod requests;
mod responses;
mod models;
mod table;
mod numbering;
mod color;
mod streams;
mod profiles;
mod epg;
mod settings;

pub use requests::*;
pub use responses::*;
pub use models::*;
pub use table::*;
pub use numbering::*;
pub use color::*;
pub use streams::*;
pub use profiles::*;
pub use epg::*;
pub use settings::*;
