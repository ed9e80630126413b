//! TUI implementation for parley

use std::time::Duration;

use crossterm::{
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, EventStream, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::sync::mpsc;

use chrono::TimeZone;
use parley_core::{Dispatcher, Message, Persona, Role, SendRejected, Session, registry};
use parley_tui::{
    Theme,
    input::{Action, event_to_action},
    widgets::{
        Composer, PersonaPicker, PickerEntry, PickerState, Transcript, TranscriptEntry,
        transcript::transcript_height,
    },
};

/// TUI application state: the session core plus view concerns
/// (composer, picker, scrolling).
struct TuiState {
    /// Conversation state machine
    session: Session,
    /// Dispatcher for accepted submissions
    dispatcher: Dispatcher,
    /// Channel replies arrive on, tagged with their generation
    reply_tx: mpsc::Sender<(u64, Message)>,
    /// Available personas, registry order
    personas: Vec<Persona>,
    /// Picker rows derived from `personas`
    picker_entries: Vec<PickerEntry>,
    /// Message input
    composer: Composer,
    /// Persona popup state
    picker: PickerState,
    /// Transcript scroll offset in lines
    scroll: usize,
    /// Whether the transcript follows its tail
    follow: bool,
    theme: Theme,
}

impl TuiState {
    fn new(
        session: Session,
        dispatcher: Dispatcher,
        reply_tx: mpsc::Sender<(u64, Message)>,
        theme: Theme,
    ) -> Self {
        let personas = registry::list_personas();
        let picker_entries = personas
            .iter()
            .map(|p| PickerEntry {
                label: p.name.clone(),
                detail: p.description.clone(),
            })
            .collect();

        let mut composer = Composer::new().with_placeholder("Type your message...");
        composer.set_focused(true);

        Self {
            session,
            dispatcher,
            reply_tx,
            personas,
            picker_entries,
            composer,
            picker: PickerState::default(),
            scroll: 0,
            follow: true,
            theme,
        }
    }

    /// Index of the active persona in the registry order
    fn current_index(&self) -> usize {
        self.personas
            .iter()
            .position(|p| p.id == self.session.persona().id)
            .unwrap_or(0)
    }

    /// Map a core message into the transcript view-model
    fn to_entry(message: &Message) -> TranscriptEntry {
        let timestamp = chrono::Local
            .timestamp_millis_opt(message.created_at)
            .single()
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_default();
        match message.role {
            Role::User => TranscriptEntry::user(&message.content, timestamp),
            Role::Assistant => TranscriptEntry::agent(&message.content, timestamp),
        }
    }

    /// Apply a resolved reply to the session
    fn apply_reply(&mut self, generation: u64, message: Message) {
        self.session.complete_send(generation, message);
        self.follow = true;
    }

    fn scroll_up(&mut self, lines: usize) {
        self.follow = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    /// Accept the composer content and hand it to the dispatcher.
    ///
    /// `begin_send` mutates the session before any network activity, so
    /// the user message and the typing indicator appear immediately.
    fn submit(&mut self) {
        self.session.set_draft(self.composer.content());
        match self.session.begin_send() {
            Ok(outbound) => {
                self.composer.clear();
                self.follow = true;

                let dispatcher = self.dispatcher.clone();
                let reply_tx = self.reply_tx.clone();
                tokio::spawn(async move {
                    let reply = dispatcher
                        .send(&outbound.content, &outbound.persona_id)
                        .await;
                    // Receiver gone means the UI is shutting down
                    let _ = reply_tx.send((outbound.generation, reply)).await;
                });
            }
            Err(SendRejected::EmptyDraft) => {}
            Err(SendRejected::RequestInFlight) => {
                tracing::debug!("submission rejected; a request is already in flight");
            }
        }
    }

    /// Handle an input action, return false to quit
    fn handle_action(&mut self, action: Action, width: u16) -> bool {
        if self.picker.visible {
            match action {
                Action::Up => self.picker.up(),
                Action::Down => self.picker.down(self.personas.len()),
                Action::Submit => {
                    let persona = self.personas[self.picker.selected].clone();
                    self.session.switch_persona(persona);
                    self.composer.clear();
                    self.picker.close();
                    self.follow = true;
                }
                Action::Escape | Action::PersonaSelect => self.picker.close(),
                Action::Interrupt | Action::Quit => return false,
                _ => {}
            }
            return true;
        }

        match action {
            Action::Interrupt | Action::Quit => return false,
            Action::Submit => self.submit(),
            Action::NewChat => {
                self.session.reset();
                self.composer.clear();
                self.follow = true;
            }
            Action::PersonaSelect => self.picker.open(self.current_index()),
            Action::Up => self.scroll_up(1),
            Action::Down => self.scroll_down(1),
            Action::PageUp => self.scroll_up(10),
            Action::PageDown => self.scroll_down(10),
            Action::Escape | Action::Unknown => {}
            other => {
                if self.composer.handle_action(&other, width) {
                    self.session.set_draft(self.composer.content());
                }
            }
        }
        true
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_transcript(frame, chunks[1]);

        let composer_area = chunks[2];
        self.composer
            .render(composer_area, frame.buffer_mut(), &self.theme);
        if !self.picker.visible {
            let (x, y) = self.composer.cursor_position(composer_area);
            frame.set_cursor_position((x, y));
        }

        if self.picker.visible {
            let picker = PersonaPicker::new(
                &self.picker_entries,
                self.current_index(),
                &self.picker,
                &self.theme,
            );
            frame.render_widget(picker, frame.area());
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(self.session.persona().name.clone(), self.theme.accent_bold()),
            Span::raw("  "),
        ];
        if self.session.is_in_flight() {
            spans.push(Span::styled("sending…  ", self.theme.dim_style()));
        }
        spans.push(Span::styled(
            "Ctrl+P personas · Ctrl+N new chat · Ctrl+Q quit",
            self.theme.dim_style(),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_transcript(&mut self, frame: &mut Frame, area: Rect) {
        let entries: Vec<TranscriptEntry> =
            self.session.log().iter().map(Self::to_entry).collect();
        let label = self.session.persona().name.clone();
        let pending = self.session.is_in_flight();

        let total = transcript_height(&entries, area.width as usize, pending);
        let max_scroll = total.saturating_sub(area.height as usize);
        if self.follow {
            self.scroll = max_scroll;
        } else {
            self.scroll = self.scroll.min(max_scroll);
            if self.scroll == max_scroll {
                self.follow = true;
            }
        }

        let transcript = Transcript::new(&entries, &label, &self.theme)
            .scroll(self.scroll)
            .pending(pending);
        frame.render_widget(transcript, area);
    }
}

/// Run the chat TUI until the user quits.
pub async fn run_tui(session: Session, dispatcher: Dispatcher, theme: Theme) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (reply_tx, mut reply_rx) = mpsc::channel::<(u64, Message)>(8);
    let mut state = TuiState::new(session, dispatcher, reply_tx, theme);

    let mut event_stream = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(100));

    let result = loop {
        terminal.draw(|frame| state.render(frame))?;
        let width = terminal.size()?.width;

        tokio::select! {
            // Resolved dispatcher replies, possibly for an earlier
            // conversation (the switch-while-pending race; the session
            // appends them regardless)
            reply = reply_rx.recv() => {
                if let Some((generation, message)) = reply {
                    state.apply_reply(generation, message);
                }
            }

            event = event_stream.next() => {
                match event {
                    Some(Ok(Event::Mouse(mouse))) => match mouse.kind {
                        MouseEventKind::ScrollUp => state.scroll_up(3),
                        MouseEventKind::ScrollDown => state.scroll_down(3),
                        _ => {}
                    },
                    Some(Ok(event)) => {
                        if let Some(action) = event_to_action(event) {
                            if !state.handle_action(action, width) {
                                break Ok(());
                            }
                        }
                    }
                    Some(Err(e)) => {
                        break Err(anyhow::anyhow!("event error: {}", e));
                    }
                    None => {
                        break Ok(());
                    }
                }
            }

            // Tick for the typing-indicator animation
            _ = tick.tick() => {}
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}
