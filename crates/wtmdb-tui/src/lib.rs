//! Terminal UI components for wtmdb.
//!
//! The browsing core (debounce, query cleaning, result merging, sorting,
//! request tracking, focus handling, detail formatting) is free of I/O;
//! [`browser`] wires it to the terminal and the TMDB client.

/// Movie browser TUI.
pub mod browser;
/// Value debouncing for search input.
pub mod debounce;
/// Detail modal formatting.
pub mod detail;
/// Focus cycling and trapping.
pub mod focus;
/// Search query cleaning and catalog request selection.
pub mod query;
/// Per-kind request generation tracking.
pub mod request;
/// Accumulated search results.
pub mod results;
/// Client-side sort modes.
pub mod sort;

pub use browser::{BrowserOptions, run_browser};
pub use sort::SortMode;
