//! Conversation session state: persona binding, message log, draft, and
//! in-flight tracking.
//!
//! The session is a two-state machine (`Idle`/`Sending`) with a single
//! mutator at a time by construction of the event loop. `begin_send` is the
//! only guarded transition; persona switches and resets are legal in both
//! states and always land back in `Idle` with a fresh greeting-only log.

use thiserror::Error;

use crate::types::{Message, Persona, Role};

/// Why a submission was not accepted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejected {
    /// Draft was empty (or whitespace only) at submit time
    #[error("draft is empty")]
    EmptyDraft,

    /// A previous submission has not completed yet
    #[error("a request is already in flight")]
    RequestInFlight,
}

/// An accepted submission, ready for the dispatcher.
///
/// Carries the conversation generation it was accepted under so a reply
/// that outlives a persona switch can be recognized as stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    /// Trimmed message text
    pub content: String,
    /// Persona the request is bound to
    pub persona_id: String,
    /// Session generation at accept time
    pub generation: u64,
}

/// Mutable conversation state for one chat session.
#[derive(Debug, Clone)]
pub struct Session {
    persona: Persona,
    log: Vec<Message>,
    draft: String,
    in_flight: bool,
    generation: u64,
}

impl Session {
    /// Create a session for `persona` with its greeting as the sole entry.
    pub fn new(persona: Persona) -> Self {
        let greeting = Message::assistant(&persona.greeting);
        Self {
            persona,
            log: vec![greeting],
            draft: String::new(),
            in_flight: false,
            generation: 0,
        }
    }

    /// The persona bound to outgoing requests.
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// The append-only message log. Never empty.
    pub fn log(&self) -> &[Message] {
        &self.log
    }

    /// The current input draft.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Whether a submission is awaiting its reply.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Current conversation generation. Bumped by [`Self::switch_persona`]
    /// and [`Self::reset`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the draft. No validation; trimming happens at submit time.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Start a fresh conversation with `persona`.
    ///
    /// The log is replaced by the persona's greeting and the draft is
    /// cleared. Legal while a request is in flight: the outstanding network
    /// call is neither cancelled nor awaited, and its eventual reply will
    /// be appended to whatever log exists then (see [`Self::complete_send`]).
    pub fn switch_persona(&mut self, persona: Persona) {
        let greeting = Message::assistant(&persona.greeting);
        self.persona = persona;
        self.log = vec![greeting];
        self.draft.clear();
        self.in_flight = false;
        self.generation += 1;
    }

    /// Start a fresh conversation with the current persona.
    pub fn reset(&mut self) {
        self.switch_persona(self.persona.clone());
    }

    /// Accept the current draft as a user message.
    ///
    /// Rejected when the trimmed draft is empty or a send is already in
    /// flight; rejection leaves the session untouched. On acceptance the
    /// trimmed text is appended as a user message, the draft is cleared,
    /// and the in-flight flag is set before any network activity starts,
    /// so the UI shows the pending state immediately.
    pub fn begin_send(&mut self) -> Result<Outbound, SendRejected> {
        let content = self.draft.trim();
        if content.is_empty() {
            return Err(SendRejected::EmptyDraft);
        }
        if self.in_flight {
            return Err(SendRejected::RequestInFlight);
        }

        let content = content.to_string();
        self.log.push(Message::user(&content));
        self.draft.clear();
        self.in_flight = true;

        Ok(Outbound {
            content,
            persona_id: self.persona.id.clone(),
            generation: self.generation,
        })
    }

    /// Append the dispatcher's reply and return to idle.
    ///
    /// Called exactly once per accepted send; the dispatcher produces a
    /// displayable message for failures too, so there is no error branch.
    /// A reply whose `generation` predates a persona switch is appended
    /// anyway — the race is inherited behavior; we only surface it.
    pub fn complete_send(&mut self, generation: u64, reply: Message) {
        debug_assert_eq!(reply.role, Role::Assistant);
        if generation != self.generation {
            tracing::warn!(
                reply_generation = generation,
                session_generation = self.generation,
                "reply arrived for an earlier conversation; appending to the current log"
            );
        }
        self.log.push(reply);
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    fn session() -> Session {
        Session::new(registry::default_persona())
    }

    // --- initialization ---

    #[test]
    fn test_new_session_has_single_greeting() {
        let s = session();
        assert_eq!(s.log().len(), 1);
        assert_eq!(s.log()[0].role, Role::Assistant);
        assert_eq!(s.log()[0].content, s.persona().greeting);
        assert_eq!(s.draft(), "");
        assert!(!s.is_in_flight());
    }

    // --- begin_send ---

    #[test]
    fn test_begin_send_appends_user_message() {
        let mut s = session();
        s.set_draft("hello");

        let outbound = s.begin_send().unwrap();

        assert_eq!(outbound.content, "hello");
        assert_eq!(outbound.persona_id, s.persona().id);
        assert_eq!(s.log().len(), 2);
        assert_eq!(s.log()[1].role, Role::User);
        assert_eq!(s.log()[1].content, "hello");
        assert!(s.is_in_flight());
    }

    #[test]
    fn test_begin_send_clears_draft_at_accept_time() {
        let mut s = session();
        s.set_draft("  spaced out  ");

        let outbound = s.begin_send().unwrap();

        assert_eq!(outbound.content, "spaced out");
        assert_eq!(s.log()[1].content, "spaced out");
        assert_eq!(s.draft(), "");
    }

    #[test]
    fn test_begin_send_rejects_empty_draft() {
        let mut s = session();
        assert_eq!(s.begin_send(), Err(SendRejected::EmptyDraft));
        assert_eq!(s.log().len(), 1);
        assert!(!s.is_in_flight());
    }

    #[test]
    fn test_begin_send_rejects_whitespace_draft() {
        let mut s = session();
        s.set_draft("   ");

        assert_eq!(s.begin_send(), Err(SendRejected::EmptyDraft));
        assert_eq!(s.log().len(), 1);
        assert!(!s.is_in_flight());
        // An empty-draft rejection does not clear the draft either
        assert_eq!(s.draft(), "   ");
    }

    #[test]
    fn test_begin_send_rejects_while_in_flight() {
        let mut s = session();
        s.set_draft("first");
        s.begin_send().unwrap();

        s.set_draft("second");
        assert_eq!(s.begin_send(), Err(SendRejected::RequestInFlight));

        // The second call changed nothing
        assert_eq!(s.log().len(), 2);
        assert_eq!(s.draft(), "second");
        assert!(s.is_in_flight());
    }

    // --- complete_send ---

    #[test]
    fn test_complete_send_appends_and_returns_to_idle() {
        let mut s = session();
        s.set_draft("hello");
        let outbound = s.begin_send().unwrap();

        s.complete_send(outbound.generation, Message::assistant("Hi there!"));

        assert_eq!(s.log().len(), 3);
        assert_eq!(s.log()[2].role, Role::Assistant);
        assert_eq!(s.log()[2].content, "Hi there!");
        assert!(!s.is_in_flight());
    }

    #[test]
    fn test_send_allowed_again_after_complete() {
        let mut s = session();
        s.set_draft("one");
        let outbound = s.begin_send().unwrap();
        s.complete_send(outbound.generation, Message::assistant("reply"));

        s.set_draft("two");
        assert!(s.begin_send().is_ok());
    }

    // --- switch / reset ---

    #[test]
    fn test_switch_persona_resets_log_to_greeting() {
        let mut s = session();
        s.set_draft("hello");
        let outbound = s.begin_send().unwrap();
        s.complete_send(outbound.generation, Message::assistant("reply"));
        s.set_draft("unsent text");

        let gaming = registry::list_personas()
            .into_iter()
            .find(|p| p.name == "Gaming Agent")
            .unwrap();
        s.switch_persona(gaming.clone());

        assert_eq!(s.persona().name, "Gaming Agent");
        assert_eq!(s.log().len(), 1);
        assert_eq!(s.log()[0].content, gaming.greeting);
        assert_eq!(s.draft(), "");
        assert!(!s.is_in_flight());
    }

    #[test]
    fn test_reset_keeps_persona() {
        let mut s = session();
        s.set_draft("hello");
        let outbound = s.begin_send().unwrap();
        s.complete_send(outbound.generation, Message::assistant("reply"));

        let persona = s.persona().clone();
        s.reset();

        assert_eq!(*s.persona(), persona);
        assert_eq!(s.log().len(), 1);
        assert_eq!(s.log()[0].content, persona.greeting);
    }

    #[test]
    fn test_switch_while_in_flight_resets_immediately() {
        let mut s = session();
        s.set_draft("hello");
        let outbound = s.begin_send().unwrap();
        assert!(s.is_in_flight());

        let gaming = registry::list_personas()
            .into_iter()
            .find(|p| p.name == "Gaming Agent")
            .unwrap();
        s.switch_persona(gaming.clone());

        // The pending request does not block the switch
        assert_eq!(s.log().len(), 1);
        assert_eq!(s.log()[0].content, gaming.greeting);
        assert!(!s.is_in_flight());

        // The stale reply is still appended when it eventually resolves
        s.complete_send(outbound.generation, Message::assistant("late reply"));
        assert_eq!(s.log().len(), 2);
        assert_eq!(s.log()[1].content, "late reply");
        assert!(!s.is_in_flight());
    }

    #[test]
    fn test_switch_bumps_generation() {
        let mut s = session();
        assert_eq!(s.generation(), 0);
        s.switch_persona(registry::default_persona());
        assert_eq!(s.generation(), 1);
        s.reset();
        assert_eq!(s.generation(), 2);
    }

    #[test]
    fn test_log_is_append_only_between_resets() {
        let mut s = session();
        let mut last_len = s.log().len();

        for turn in 0..3 {
            s.set_draft(format!("message {turn}"));
            let outbound = s.begin_send().unwrap();
            assert!(s.log().len() >= last_len);
            last_len = s.log().len();

            s.complete_send(outbound.generation, Message::assistant("ok"));
            assert!(s.log().len() >= last_len);
            last_len = s.log().len();
        }

        assert_eq!(s.log().len(), 7);
    }

    #[test]
    fn test_message_ids_unique_within_session() {
        let mut s = session();
        for turn in 0..3 {
            s.set_draft(format!("message {turn}"));
            let outbound = s.begin_send().unwrap();
            s.complete_send(outbound.generation, Message::assistant("ok"));
        }

        let ids: Vec<_> = s.log().iter().map(|m| m.id.clone()).collect();
        for (i, a) in ids.iter().enumerate() {
            for b in ids.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
