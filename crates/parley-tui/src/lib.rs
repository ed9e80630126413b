//! parley-tui: Terminal UI components
//!
//! Presentation layer for the chat client. Owns its own view-model types
//! (`TranscriptEntry` and friends) so it stays decoupled from the session
//! core; the binary maps core state into these before rendering.

pub mod input;
pub mod theme;
pub mod widgets;

pub use theme::Theme;
