//! Composer widget: the single-line message input.

use crate::input::Action;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthChar;

/// Single-line text input with unicode-aware cursor movement and
/// horizontal scrolling.
#[derive(Debug, Default)]
pub struct Composer {
    /// Current text
    content: String,
    /// Cursor position as a character index
    cursor: usize,
    /// Horizontal scroll offset in display columns
    scroll: usize,
    /// Placeholder shown while empty
    placeholder: String,
    /// Whether the composer has focus
    focused: bool,
}

impl Composer {
    /// Create a new composer
    pub fn new() -> Self {
        Self::default()
    }

    /// Set placeholder text
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set focus state
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Get the current content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Clear the content
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Byte offset of the character at `char_idx`
    fn byte_at(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    /// Display width of the text before the cursor
    fn width_before_cursor(&self) -> usize {
        self.content
            .chars()
            .take(self.cursor)
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    fn remove_char_at(&mut self, char_idx: usize) {
        let start = self.byte_at(char_idx);
        let end = self.byte_at(char_idx + 1);
        self.content.drain(start..end);
    }

    /// Keep the cursor within the visible window of `visible` columns
    fn clamp_scroll(&mut self, visible: usize) {
        if visible == 0 {
            return;
        }
        let cursor_w = self.width_before_cursor();
        if cursor_w < self.scroll {
            self.scroll = cursor_w;
        } else if cursor_w >= self.scroll + visible {
            self.scroll = cursor_w + 1 - visible;
        }
    }

    /// Handle an input action; returns true if the content or cursor moved.
    /// `width` is the widget's total width (borders included).
    pub fn handle_action(&mut self, action: &Action, width: u16) -> bool {
        let visible = (width as usize).saturating_sub(2);
        let char_count = self.content.chars().count();

        let changed = match action {
            Action::Char(c) => {
                let at = self.byte_at(self.cursor);
                self.content.insert(at, *c);
                self.cursor += 1;
                true
            }
            Action::Paste(text) => {
                let at = self.byte_at(self.cursor);
                // Keep the composer single-line: newlines become spaces
                let flat: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                self.cursor += flat.chars().count();
                self.content.insert_str(at, &flat);
                true
            }
            Action::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.remove_char_at(self.cursor);
                    true
                } else {
                    false
                }
            }
            Action::Delete => {
                if self.cursor < char_count {
                    self.remove_char_at(self.cursor);
                    true
                } else {
                    false
                }
            }
            Action::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    true
                } else {
                    false
                }
            }
            Action::Right => {
                if self.cursor < char_count {
                    self.cursor += 1;
                    true
                } else {
                    false
                }
            }
            Action::Home => {
                self.cursor = 0;
                true
            }
            Action::End => {
                self.cursor = char_count;
                true
            }
            Action::ClearLine => {
                self.clear();
                true
            }
            _ => false,
        };

        if changed {
            self.clamp_scroll(visible);
        }
        changed
    }

    /// Screen position of the cursor inside `area`, for the host frame.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let offset = self.width_before_cursor().saturating_sub(self.scroll);
        (area.x + 1 + offset as u16, area.y + 1)
    }

    /// Render with the given theme (consumed by value like ratatui widgets)
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.focused {
                theme.accent_style()
            } else {
                theme.border_style()
            });
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.content.is_empty() {
            let span = Span::styled(self.placeholder.clone(), theme.dim_style());
            buf.set_span(inner.x, inner.y, &span, inner.width);
            return;
        }

        // Drop columns left of the scroll offset, then take what fits
        let mut skipped = 0usize;
        let mut shown = 0usize;
        let mut text = String::new();
        for c in self.content.chars() {
            let w = c.width().unwrap_or(0);
            if skipped < self.scroll {
                skipped += w;
                continue;
            }
            if shown + w > inner.width as usize {
                break;
            }
            shown += w;
            text.push(c);
        }

        let span = Span::styled(text, theme.base_style());
        buf.set_span(inner.x, inner.y, &span, inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> Composer {
        let mut c = Composer::new();
        for ch in s.chars() {
            c.handle_action(&Action::Char(ch), 80);
        }
        c
    }

    #[test]
    fn test_typing_appends() {
        let c = typed("hello");
        assert_eq!(c.content(), "hello");
    }

    #[test]
    fn test_backspace_removes_before_cursor() {
        let mut c = typed("hello");
        c.handle_action(&Action::Backspace, 80);
        assert_eq!(c.content(), "hell");
    }

    #[test]
    fn test_insert_mid_line() {
        let mut c = typed("hllo");
        c.handle_action(&Action::Home, 80);
        c.handle_action(&Action::Right, 80);
        c.handle_action(&Action::Char('e'), 80);
        assert_eq!(c.content(), "hello");
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut c = typed("hxello");
        c.handle_action(&Action::Home, 80);
        c.handle_action(&Action::Right, 80);
        c.handle_action(&Action::Delete, 80);
        assert_eq!(c.content(), "hello");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut c = typed("héllo");
        c.handle_action(&Action::End, 80);
        for _ in 0..3 {
            c.handle_action(&Action::Backspace, 80);
        }
        assert_eq!(c.content(), "hé");
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut c = Composer::new();
        c.handle_action(&Action::Paste("two\nlines".into()), 80);
        assert_eq!(c.content(), "two lines");
    }

    #[test]
    fn test_clear_line() {
        let mut c = typed("hello");
        c.handle_action(&Action::ClearLine, 80);
        assert_eq!(c.content(), "");
    }

    #[test]
    fn test_scroll_follows_cursor() {
        // 10 visible columns (12 - borders); type past the window
        let mut c = Composer::new();
        for ch in "abcdefghijklmnop".chars() {
            c.handle_action(&Action::Char(ch), 12);
        }
        // Cursor is at column 16; window must have scrolled
        assert!(c.scroll > 0);
        let (x, _) = c.cursor_position(Rect::new(0, 0, 12, 3));
        assert!(x <= 11);
    }
}
