//! Transcript widget: the scrollable message thread.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Typing-indicator animation frames (one dot "bouncing")
const TYPING_FRAMES: &[&str] = &["●  ", " ● ", "  ●"];

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Agent,
}

/// View-model for one rendered message
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub content: String,
    /// Pre-formatted clock label ("14:32")
    pub timestamp: String,
}

impl TranscriptEntry {
    /// Create a user entry
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Create an agent entry
    pub fn agent(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Agent,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Widget rendering the message thread with an optional typing indicator
pub struct Transcript<'a> {
    entries: &'a [TranscriptEntry],
    agent_label: &'a str,
    theme: &'a Theme,
    scroll: usize,
    pending: bool,
}

impl<'a> Transcript<'a> {
    /// Create a transcript over `entries`; `agent_label` names the agent
    /// side of the conversation (the active persona).
    pub fn new(entries: &'a [TranscriptEntry], agent_label: &'a str, theme: &'a Theme) -> Self {
        Self {
            entries,
            agent_label,
            theme,
            scroll: 0,
            pending: false,
        }
    }

    /// Set scroll offset in lines
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Show the typing indicator below the last entry
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    fn entry_lines(&self, entry: &TranscriptEntry, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        let (label, style) = match entry.speaker {
            Speaker::User => ("You".to_string(), self.theme.accent_bold()),
            Speaker::Agent => (self.agent_label.to_string(), self.theme.agent_bold()),
        };
        lines.push(Line::from(Span::styled(label, style)));

        let content_width = width.saturating_sub(2).max(1);
        for wrapped in textwrap::wrap(&entry.content, content_width) {
            lines.push(Line::from(Span::styled(
                format!("  {}", wrapped),
                self.theme.base_style(),
            )));
        }

        lines.push(Line::from(Span::styled(
            format!("  {}", entry.timestamp),
            self.theme.dim_style(),
        )));
        lines.push(Line::from(""));

        lines
    }

    fn typing_line(&self) -> Line<'static> {
        let frame_idx = (std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis()
            / 200) as usize
            % TYPING_FRAMES.len();
        Line::from(Span::styled(
            format!("  {}", TYPING_FRAMES[frame_idx]),
            self.theme.dim_style(),
        ))
    }
}

impl Widget for Transcript<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;
        let mut all_lines: Vec<Line> = Vec::new();

        for entry in self.entries {
            all_lines.extend(self.entry_lines(entry, width));
        }

        if self.pending {
            all_lines.push(Line::from(Span::styled(
                self.agent_label.to_string(),
                self.theme.agent_bold(),
            )));
            all_lines.push(self.typing_line());
        }

        let visible: Vec<Line> = all_lines
            .into_iter()
            .skip(self.scroll)
            .take(area.height as usize)
            .collect();

        Paragraph::new(visible).render(area, buf);
    }
}

/// Total rendered height of the transcript in lines, for scroll clamping.
/// Must match the line production in `Widget::render`.
pub fn transcript_height(entries: &[TranscriptEntry], width: usize, pending: bool) -> usize {
    let content_width = width.saturating_sub(2).max(1);
    let mut total = 0;

    for entry in entries {
        // Speaker label + wrapped content + timestamp + separator
        total += 1;
        total += textwrap::wrap(&entry.content, content_width).len();
        total += 2;
    }

    if pending {
        total += 2;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_counts_wrapping() {
        let entries = vec![TranscriptEntry::user("a".repeat(30), "10:00")];
        // 30 chars at content width 8 wrap to 4 lines, plus label,
        // timestamp, and separator
        assert_eq!(transcript_height(&entries, 10, false), 7);
    }

    #[test]
    fn test_height_includes_typing_indicator() {
        let entries = vec![TranscriptEntry::agent("hi", "10:00")];
        let without = transcript_height(&entries, 40, false);
        let with = transcript_height(&entries, 40, true);
        assert_eq!(with, without + 2);
    }

    #[test]
    fn test_height_of_empty_transcript() {
        assert_eq!(transcript_height(&[], 40, false), 0);
    }
}
