//! Persona picker: a centered popup for switching the active persona.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, StatefulWidget, Widget},
};

/// Maximum popup width
const MAX_POPUP_WIDTH: u16 = 70;

/// One selectable persona
#[derive(Debug, Clone)]
pub struct PickerEntry {
    /// Persona display name
    pub label: String,
    /// Persona description, shown dimmed beneath the label
    pub detail: String,
}

/// Selection state for the picker popup
#[derive(Debug, Clone, Default)]
pub struct PickerState {
    /// Index of the highlighted entry
    pub selected: usize,
    /// Whether the popup is visible
    pub visible: bool,
}

impl PickerState {
    /// Open the popup with `selected` highlighted
    pub fn open(&mut self, selected: usize) {
        self.selected = selected;
        self.visible = true;
    }

    /// Close the popup
    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Move the highlight up
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the highlight down, clamped to `count` entries
    pub fn down(&mut self, count: usize) {
        if self.selected + 1 < count {
            self.selected += 1;
        }
    }
}

/// Popup widget listing personas with the current one marked
pub struct PersonaPicker<'a> {
    entries: &'a [PickerEntry],
    /// Index of the persona the session is currently using
    current: usize,
    state: &'a PickerState,
    theme: &'a Theme,
}

impl<'a> PersonaPicker<'a> {
    /// Create a picker over `entries`
    pub fn new(
        entries: &'a [PickerEntry],
        current: usize,
        state: &'a PickerState,
        theme: &'a Theme,
    ) -> Self {
        Self {
            entries,
            current,
            state,
            theme,
        }
    }

    fn popup_size(&self) -> (u16, u16) {
        let mut width = " Switch persona ".len() + 4;
        for entry in self.entries {
            width = width.max(entry.label.len() + 6);
            width = width.max(entry.detail.len() + 8);
        }
        // Two lines per entry plus the border
        let height = (self.entries.len() as u16) * 2 + 2;
        ((width as u16).clamp(24, MAX_POPUP_WIDTH), height.min(20))
    }
}

impl Widget for PersonaPicker<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.state.visible || self.entries.is_empty() {
            return;
        }

        let (width, height) = self.popup_size();
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let popup = Rect::new(x, y, width.min(area.width), height.min(area.height));

        Clear.render(popup, buf);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let marker = if i == self.current { "● " } else { "  " };
                let label_style = if i == self.state.selected {
                    Style::default()
                        .bg(self.theme.accent)
                        .fg(self.theme.bg)
                        .add_modifier(Modifier::BOLD)
                } else if i == self.current {
                    self.theme.accent_style()
                } else {
                    self.theme.base_style()
                };
                ListItem::new(vec![
                    Line::from(Span::styled(
                        format!("{}{}", marker, entry.label),
                        label_style,
                    )),
                    Line::from(Span::styled(
                        format!("    {}", entry.detail),
                        self.theme.dim_style(),
                    )),
                ])
            })
            .collect();

        let block = Block::default()
            .title(" Switch persona ")
            .title_style(self.theme.accent_bold())
            .borders(Borders::ALL)
            .border_style(self.theme.accent_style());

        let list = List::new(items).block(block);

        let mut list_state = ListState::default();
        list_state.select(Some(self.state.selected));

        StatefulWidget::render(list, popup, buf, &mut list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_navigation_clamps() {
        let mut state = PickerState::default();
        state.open(0);
        state.up();
        assert_eq!(state.selected, 0);

        state.down(3);
        state.down(3);
        state.down(3);
        assert_eq!(state.selected, 2);
    }

    #[test]
    fn test_open_and_close() {
        let mut state = PickerState::default();
        assert!(!state.visible);
        state.open(1);
        assert!(state.visible);
        assert_eq!(state.selected, 1);
        state.close();
        assert!(!state.visible);
    }
}
