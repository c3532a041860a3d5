//! The comment composer: a text input with `@mention` capabilities.
//!
//! The composer owns the draft text and the mention popup state machine,
//! and reports everything the enclosing view needs through an event sink
//! passed in at construction. It holds a snapshot of the user roster,
//! delivered via [`RosterSubscriber`], and never performs I/O itself: the
//! roster fetch is the request worker's job, and until it completes (or if
//! it fails) the composer simply produces no suggestions.

use std::sync::Arc;

use crate::mention::{
    apply_suggestion, build_suggestions, detect_mention_context, render_mentions,
    MentionContext, Segment,
};
use crate::models::{User, UserId};
use crate::roster::RosterSubscriber;

/// The mention popup state of the composer.
///
/// `Suggesting` is entered only when a mention context is detected *and*
/// at least one candidate matches; losing either condition returns the
/// composer to `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposerState {
    /// No popup; normal typing.
    Idle,
    /// The suggestion popup is visible.
    Suggesting {
        /// Byte index of the `@` that opened the popup.
        mention_start: usize,
    },
}

/// Notifications the composer sends to its enclosing view.
#[derive(Clone, Debug, PartialEq)]
pub enum ComposerEvent {
    /// The detected mention context changed (Some = show popup anchor,
    /// None = hide it).
    MentionContextChanged(Option<MentionContext>),
    /// The candidate list to render in the popup. Empty when no context
    /// is active or nothing matches.
    SuggestionsChanged(Vec<User>),
    /// The draft text was rewritten by applying a suggestion.
    TextChanged(String),
    /// The draft was cleared by submission or cancellation.
    DraftCleared,
}

/// A comment-in-progress with mention detection, suggestion, and insertion.
pub struct CommentComposer {
    /// The authoring user, excluded from suggestion lists (no
    /// self-mention suggestions).
    author_id: Option<UserId>,
    draft: String,
    /// Last-fetched roster snapshot; `None` while the fetch is in flight
    /// or after it failed.
    roster: Option<Arc<Vec<User>>>,
    state: ComposerState,
    last_context: Option<MentionContext>,
    sink: Box<dyn FnMut(ComposerEvent) + Send>,
}

impl CommentComposer {
    /// Creates an empty composer for the given author. `sink` receives
    /// every [`ComposerEvent`] the composer emits.
    pub fn new(
        author_id: Option<UserId>,
        sink: impl FnMut(ComposerEvent) + Send + 'static,
    ) -> Self {
        Self {
            author_id,
            draft: String::new(),
            roster: None,
            state: ComposerState::Idle,
            last_context: None,
            sink: Box::new(sink),
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn state(&self) -> &ComposerState {
        &self.state
    }

    pub fn is_suggesting(&self) -> bool {
        matches!(self.state, ComposerState::Suggesting { .. })
    }

    fn roster_slice(&self) -> &[User] {
        self.roster.as_deref().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Core text change handler; call on every keystroke with the full
    /// new draft text.
    pub fn handle_text_change(&mut self, text: String) {
        self.draft = text;
        self.refresh_mention_state();
    }

    /// Re-derives the mention context and suggestion list from the
    /// current draft, emitting events for whatever changed.
    fn refresh_mention_state(&mut self) {
        let context = detect_mention_context(&self.draft);

        let suggestions: Vec<User> = match &context {
            Some(ctx) => build_suggestions(&ctx.token, self.roster_slice(), self.author_id)
                .into_iter()
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        self.state = match (&context, suggestions.is_empty()) {
            (Some(ctx), false) => ComposerState::Suggesting { mention_start: ctx.mention_start },
            _ => ComposerState::Idle,
        };

        if context != self.last_context {
            (self.sink)(ComposerEvent::MentionContextChanged(context.clone()));
            self.last_context = context;
        }
        (self.sink)(ComposerEvent::SuggestionsChanged(suggestions));
    }

    /// Inserts the chosen candidate into the draft, replacing the
    /// in-progress token, and closes the popup.
    ///
    /// Ignored when no popup is open; the selection event raced with an
    /// edit that already invalidated the context.
    pub fn select_suggestion(&mut self, chosen_username: &str) {
        let ComposerState::Suggesting { mention_start } = self.state else {
            return;
        };

        let new_text = apply_suggestion(&self.draft, mention_start, chosen_username);
        self.draft = new_text.clone();
        self.state = ComposerState::Idle;
        self.last_context = None;
        (self.sink)(ComposerEvent::TextChanged(new_text));
        (self.sink)(ComposerEvent::MentionContextChanged(None));
        (self.sink)(ComposerEvent::SuggestionsChanged(Vec::new()));
    }

    /// Takes the draft for submission, clearing the composer.
    ///
    /// Returns `None` when the draft is blank (nothing to submit).
    /// Submission succeeds regardless of roster state; unresolved
    /// mentions are a display concern, not a submission error.
    pub fn submit(&mut self) -> Option<String> {
        if self.draft.trim().is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.draft);
        self.reset_popup();
        (self.sink)(ComposerEvent::DraftCleared);
        Some(text)
    }

    /// Discards the draft and closes the popup.
    pub fn cancel(&mut self) {
        self.draft.clear();
        self.reset_popup();
        (self.sink)(ComposerEvent::DraftCleared);
    }

    fn reset_popup(&mut self) {
        if self.is_suggesting() {
            (self.sink)(ComposerEvent::MentionContextChanged(None));
            (self.sink)(ComposerEvent::SuggestionsChanged(Vec::new()));
        }
        self.state = ComposerState::Idle;
        self.last_context = None;
    }

    /// Decomposes submitted comment text for display, resolving mentions
    /// against the current roster snapshot.
    ///
    /// With no roster (fetch pending or failed), every `@token` run comes
    /// back as an unresolved mention segment: styled, but with no user to
    /// click through to.
    pub fn render_comment<'a>(&'a self, text: &'a str) -> Vec<Segment<'a>> {
        render_mentions(text, self.roster_slice())
    }
}

impl RosterSubscriber for CommentComposer {
    fn on_roster_updated(&mut self, users: Arc<Vec<User>>) {
        self.roster = Some(users);
        // If the user already typed an `@` while the fetch was in flight,
        // the popup can open now that candidates exist.
        self.refresh_mention_state();
    }
}
