//! Custom widgets for the TUI

pub mod composer;
pub mod picker;
pub mod transcript;

pub use composer::Composer;
pub use picker::{PersonaPicker, PickerEntry, PickerState};
pub use transcript::{Speaker, Transcript, TranscriptEntry};
