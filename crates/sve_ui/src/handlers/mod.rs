//! Message handlers, split by concern.
//!
//! Each file adds an `impl App` block; `app.rs` only dispatches.

mod browse;
pub mod dialogs;
mod export;
mod playlist;
