//! The mention resolver: pure text analysis for `@mention` tokens in
//! comment drafts and submitted comment text.
//!
//! Everything in this module is a pure function over in-memory strings and
//! the already-fetched user roster. No function here performs I/O, and none
//! of them can fail: empty strings, bare `@` characters, and text with
//! multiple `@` runs all produce empty/none results rather than errors.

use unicode_segmentation::UnicodeSegmentation;

use crate::models::{User, UserId};
use crate::utils::safe_replace_by_byte_indices;

/// An in-progress `@mention` detected at the tail of a comment draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MentionContext {
    /// Byte index of the `@` that opens the mention.
    pub mention_start: usize,
    /// The partial username typed so far, lower-cased for matching.
    pub token: String,
}

/// One piece of a comment's display decomposition: either a literal text
/// run or an `@mention` token, in original order.
///
/// Concatenating the `raw` strings of all segments reproduces the input
/// text exactly.
#[derive(Clone, Debug, PartialEq)]
pub enum Segment<'a> {
    /// A literal run of non-mention text.
    Text(&'a str),
    /// An `@` followed by one or more word characters. `resolved` is set
    /// only when the token exactly matches a roster username; an
    /// unresolved mention still gets mention styling but no click target.
    Mention {
        /// The exact original substring, including the leading `@`.
        raw: &'a str,
        resolved: Option<&'a User>,
    },
}

impl<'a> Segment<'a> {
    /// The exact substring of the original text covered by this segment.
    pub fn raw(&self) -> &'a str {
        match self {
            Segment::Text(s) => s,
            Segment::Mention { raw, .. } => raw,
        }
    }
}

/// Word characters are what may appear in a mention token after the `@`.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Determines whether the tail of `text` is an in-progress `@mention`.
///
/// Scans backward for the last `@`. A context is detected only if that `@`
/// is the first character or immediately preceded by a space (this is what
/// keeps "email@domain" from triggering the popup), and no whitespace
/// appears between the `@` and the end of the text.
///
/// Note that only the trailing token of the draft is considered, not an
/// arbitrary caret position inside it. That restriction is intentional and
/// pinned by tests; see the composer for how it plays out.
pub fn detect_mention_context(text: &str) -> Option<MentionContext> {
    let mention_start = text.rfind('@')?;

    // Boundary check: `@` must open the text or follow a space.
    if mention_start > 0 {
        let preceding = text[..mention_start].graphemes(true).next_back();
        if preceding != Some(" ") {
            return None;
        }
    }

    let token = &text[mention_start + 1..];
    if token.chars().any(char::is_whitespace) {
        // The mention was finished (or abandoned) by a later separator.
        return None;
    }

    Some(MentionContext {
        mention_start,
        token: token.to_lowercase(),
    })
}

/// Filters the roster down to mention candidates for the given token.
///
/// A user is a candidate when their username starts with `token`
/// (case-insensitively) and they are not the author identified by
/// `exclude_user_id` (no self-mention suggestions). Roster order is
/// preserved; no re-ranking is applied. An empty token matches everyone,
/// so typing a bare `@` offers the whole roster.
pub fn build_suggestions<'a>(
    token: &str,
    users: &'a [User],
    exclude_user_id: Option<UserId>,
) -> Vec<&'a User> {
    let token = token.to_lowercase();
    users
        .iter()
        .filter(|user| exclude_user_id != Some(user.user_id))
        .filter(|user| user.username.to_lowercase().starts_with(&token))
        .collect()
}

/// Replaces the token run starting at `mention_start` with the chosen
/// username, returning the new draft text.
///
/// The replaced run is the `@` plus the contiguous word-character run that
/// follows it; matching stops at the first non-word character. The
/// inserted text is `@{username} ` with a trailing space so the user can
/// keep typing; if the run was already followed by a space, that space is
/// consumed rather than doubled.
///
/// If `mention_start` does not point at an `@` the text is returned
/// unchanged; the caller's context has gone stale and there is nothing
/// sensible to replace.
pub fn apply_suggestion(text: &str, mention_start: usize, chosen_username: &str) -> String {
    if !text.get(mention_start..).is_some_and(|s| s.starts_with('@')) {
        return text.to_string();
    }

    let after_at = mention_start + 1;
    let run_len = text[after_at..]
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(text.len() - after_at);
    let mut run_end = after_at + run_len;
    if text[run_end..].starts_with(' ') {
        run_end += 1;
    }

    let replacement = format!("@{chosen_username} ");
    safe_replace_by_byte_indices(text, mention_start, run_end, &replacement)
}

/// Decomposes submitted comment text into alternating literal and mention
/// segments for display.
///
/// The split pattern is fixed: an `@` immediately followed by one or more
/// word characters is a mention segment; everything else is literal text.
/// Each mention token is looked up by exact, case-sensitive username match
/// against the roster. Unresolved tokens remain mention segments with
/// `resolved: None` so they can be styled identically but stay
/// non-interactive.
pub fn render_mentions<'a>(text: &'a str, users: &'a [User]) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut search_from = 0;

    while let Some(rel) = text[search_from..].find('@') {
        let at_index = search_from + rel;
        let after_at = at_index + 1;
        let run_len = text[after_at..]
            .char_indices()
            .find(|(_, c)| !is_word_char(*c))
            .map(|(i, _)| i)
            .unwrap_or(text.len() - after_at);

        if run_len == 0 {
            // A lone `@` is literal text.
            search_from = after_at;
            continue;
        }

        if literal_start < at_index {
            segments.push(Segment::Text(&text[literal_start..at_index]));
        }

        let run_end = after_at + run_len;
        let token = &text[after_at..run_end];
        segments.push(Segment::Mention {
            raw: &text[at_index..run_end],
            resolved: users.iter().find(|u| u.username == token),
        });

        literal_start = run_end;
        search_from = run_end;
    }

    if literal_start < text.len() {
        segments.push(Segment::Text(&text[literal_start..]));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_user;

    fn roster(names: &[&str]) -> Vec<User> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| test_user(i as u64 + 1, name))
            .collect()
    }

    #[test]
    fn detects_trailing_token_after_space() {
        let ctx = detect_mention_context("hello @wor").unwrap();
        assert_eq!(ctx.mention_start, 6);
        assert_eq!(ctx.token, "wor");
    }

    #[test]
    fn detects_mention_at_start_of_text() {
        let ctx = detect_mention_context("@al").unwrap();
        assert_eq!(ctx.mention_start, 0);
        assert_eq!(ctx.token, "al");
    }

    #[test]
    fn bare_at_detects_with_empty_token() {
        let ctx = detect_mention_context("@").unwrap();
        assert_eq!(ctx.mention_start, 0);
        assert_eq!(ctx.token, "");
    }

    #[test]
    fn no_context_mid_word() {
        // Email-style text must not open the popup.
        assert_eq!(detect_mention_context("hello@world"), None);
        assert_eq!(detect_mention_context("a@b"), None);
    }

    #[test]
    fn no_context_after_completed_mention() {
        // Whitespace after the token means the mention is finished.
        assert_eq!(detect_mention_context("hey @alice how"), None);
    }

    #[test]
    fn no_context_without_any_at() {
        assert_eq!(detect_mention_context(""), None);
        assert_eq!(detect_mention_context("just words"), None);
    }

    #[test]
    fn only_the_last_at_is_considered() {
        // The last `@` is mid-word, so no context even though an earlier
        // `@` would have qualified.
        assert_eq!(detect_mention_context("hi @a@b"), None);

        let ctx = detect_mention_context("@alice said hi @b").unwrap();
        assert_eq!(ctx.mention_start, 15);
        assert_eq!(ctx.token, "b");
    }

    #[test]
    fn token_is_lowercased_for_matching() {
        let ctx = detect_mention_context("hey @AL").unwrap();
        assert_eq!(ctx.token, "al");
    }

    #[test]
    fn suggestions_preserve_roster_order() {
        let users = roster(&["alice", "albert", "bob"]);
        let names: Vec<_> = build_suggestions("al", &users, None)
            .iter()
            .map(|u| u.username.as_str())
            .collect();
        assert_eq!(names, ["alice", "albert"]);
    }

    #[test]
    fn suggestions_match_case_insensitively() {
        let users = roster(&["Alice", "albert"]);
        let names: Vec<_> = build_suggestions("AL", &users, None)
            .iter()
            .map(|u| u.username.as_str())
            .collect();
        assert_eq!(names, ["Alice", "albert"]);
    }

    #[test]
    fn suggestions_never_include_the_author() {
        let users = roster(&["alice", "albert", "bob"]);
        let author_id = users[0].user_id;
        let names: Vec<_> = build_suggestions("al", &users, Some(author_id))
            .iter()
            .map(|u| u.username.as_str())
            .collect();
        assert_eq!(names, ["albert"]);

        // The exclusion holds for the empty token too.
        assert!(build_suggestions("", &users, Some(author_id))
            .iter()
            .all(|u| u.user_id != author_id));
    }

    #[test]
    fn empty_token_matches_whole_roster() {
        let users = roster(&["alice", "bob"]);
        assert_eq!(build_suggestions("", &users, None).len(), 2);
    }

    #[test]
    fn empty_roster_yields_no_suggestions() {
        assert!(build_suggestions("anything", &[], None).is_empty());
    }

    #[test]
    fn apply_replaces_exactly_one_token_run() {
        assert_eq!(
            apply_suggestion("hey @al how are you", 4, "alice"),
            "hey @alice how are you",
        );
    }

    #[test]
    fn apply_at_end_of_text_appends_trailing_space() {
        assert_eq!(apply_suggestion("hey @al", 4, "alice"), "hey @alice ");
        assert_eq!(apply_suggestion("@", 0, "bob"), "@bob ");
    }

    #[test]
    fn apply_stops_at_first_non_word_character() {
        assert_eq!(
            apply_suggestion("see @al, thanks", 4, "alice"),
            "see @alice , thanks",
        );
    }

    #[test]
    fn apply_with_stale_start_index_leaves_text_unchanged() {
        assert_eq!(apply_suggestion("hello there", 3, "alice"), "hello there");
        assert_eq!(apply_suggestion("short", 99, "alice"), "short");
    }

    #[test]
    fn render_splits_text_and_mentions_in_order() {
        let users = roster(&["alice"]);
        let segments = render_mentions("hi @alice and @ghost", &users);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], Segment::Text("hi "));
        match &segments[1] {
            Segment::Mention { raw, resolved } => {
                assert_eq!(*raw, "@alice");
                assert_eq!(resolved.unwrap().username, "alice");
            }
            other => panic!("expected mention, got {other:?}"),
        }
        assert_eq!(segments[2], Segment::Text(" and "));
        match &segments[3] {
            Segment::Mention { raw, resolved } => {
                assert_eq!(*raw, "@ghost");
                assert!(resolved.is_none());
            }
            other => panic!("expected mention, got {other:?}"),
        }
    }

    #[test]
    fn render_resolution_is_case_sensitive() {
        let users = roster(&["alice"]);
        let segments = render_mentions("hi @Alice", &users);
        match &segments[1] {
            Segment::Mention { resolved, .. } => assert!(resolved.is_none()),
            other => panic!("expected mention, got {other:?}"),
        }
    }

    #[test]
    fn render_treats_lone_at_as_literal_text() {
        let segments = render_mentions("just @ nothing", &[]);
        assert_eq!(segments, vec![Segment::Text("just @ nothing")]);
    }

    #[test]
    fn render_of_empty_text_is_empty() {
        assert!(render_mentions("", &[]).is_empty());
    }

    #[test]
    fn render_round_trip_is_lossless() {
        let users = roster(&["alice", "bob"]);
        for text in [
            "hi @alice and @ghost",
            "@bob@alice",
            "email me at a@b.com @alice!",
            "@@@",
            "plain text only",
        ] {
            let segments = render_mentions(text, &users);
            let joined: String = segments.iter().map(Segment::raw).collect();
            assert_eq!(joined, text);
            // Re-rendering the joined text reproduces the same segments.
            assert_eq!(render_mentions(&joined, &users), segments);
        }
    }
}
