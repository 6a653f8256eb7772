//! Directive extraction for assistant replies.
//!
//! The model embeds UI instructions inline:
//!
//! ```text
//! ||SUGGEST: opt1, opt2||   suggestion chips, comma separated
//! ||IMAGE:key||             image looked up in the static table
//! ||COMMIT:SICK|LATE|INFO|| intent category for the history log
//! ||TYPE:SUMMARY||          render this reply as a summary card
//! [COMPLETE]                legacy "conversation complete" marker
//! ```
//!
//! Only the first directive of each kind is honoured; later duplicates are
//! stripped but ignored. Whether first-wins is the intended rule has not been
//! confirmed, so tests pin it explicitly.
//!
//! Extraction never fails. Spans that look like directives but do not parse
//! (unknown name, unknown commit token, unterminated `||`) stay in the text.

pub mod images;

use crate::types::CommitKind;

const DELIM: &str = "||";
const COMPLETE_MARKER: &str = "[COMPLETE]";
const DONE_SUGGESTION: &str = "I am done";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveBundle {
    pub display_text: String,
    pub suggestions: Vec<String>,
    /// Normalised key from the first `IMAGE` directive, resolvable or not.
    pub image_key: Option<String>,
    pub image_url: Option<&'static str>,
    pub commit: Option<CommitKind>,
    pub is_summary: bool,
    /// The legacy `[COMPLETE]` marker was present.
    pub completed: bool,
}

impl DirectiveBundle {
    pub fn has_directives(&self) -> bool {
        !self.suggestions.is_empty()
            || self.image_key.is_some()
            || self.commit.is_some()
            || self.is_summary
            || self.completed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Directive {
    Suggest(Vec<String>),
    Image(String),
    Commit(CommitKind),
    Summary,
}

/// Whether the reply signals that the report has everything it needs.
pub fn is_report_complete(bundle: &DirectiveBundle) -> bool {
    bundle.completed || bundle.suggestions.iter().any(|s| is_done_suggestion(s))
}

pub fn is_done_suggestion(label: &str) -> bool {
    label.contains(DONE_SUGGESTION)
}

/// Split a raw assistant reply into display text and directives.
///
/// Stripping can glue fragments into a fresh directive (`||SUG` + `GEST:…||`),
/// so passes repeat until the text is stable. Earlier passes keep priority.
pub fn extract(raw: &str) -> DirectiveBundle {
    let mut bundle = DirectiveBundle::default();
    let mut text = raw.to_string();
    loop {
        let (next, stripped) = strip_pass(&text, &mut bundle);
        if !stripped {
            break;
        }
        text = next;
    }
    bundle.display_text = text;
    bundle
}

fn strip_pass(raw: &str, bundle: &mut DirectiveBundle) -> (String, bool) {
    let mut out = String::with_capacity(raw.len());
    let mut stripped = false;
    let mut after_tag = false;
    let mut rest = raw;

    while let Some(open) = rest.find(DELIM) {
        let body_start = open + DELIM.len();
        let Some(close) = rest[body_start..].find(DELIM) else {
            break;
        };
        let body = &rest[body_start..body_start + close];
        match parse_directive(body) {
            Some(directive) => {
                after_tag = push_literal(&mut out, &rest[..open], after_tag, bundle, &mut stripped);
                apply_first_wins(bundle, directive);
                stripped = true;
                after_tag = true;
                rest = &rest[body_start + close + DELIM.len()..];
            }
            None => {
                // Keep the opening delimiter literally; its partner may open a real tag.
                after_tag =
                    push_literal(&mut out, &rest[..body_start], after_tag, bundle, &mut stripped);
                rest = &rest[body_start..];
            }
        }
    }
    push_literal(&mut out, rest, after_tag, bundle, &mut stripped);

    if stripped {
        (out.trim().to_string(), true)
    } else {
        (out, false)
    }
}

/// Append literal text, removing legacy markers and the whitespace a removed
/// tag leaves behind. Returns whether the text ended on a removed marker.
fn push_literal(
    out: &mut String,
    text: &str,
    mut after_tag: bool,
    bundle: &mut DirectiveBundle,
    stripped: &mut bool,
) -> bool {
    let mut parts = text.split(COMPLETE_MARKER);
    if let Some(first) = parts.next() {
        push_segment(out, first, after_tag);
    }
    for part in parts {
        bundle.completed = true;
        *stripped = true;
        after_tag = true;
        push_segment(out, part, after_tag);
    }
    after_tag && (text.is_empty() || text.ends_with(COMPLETE_MARKER))
}

fn push_segment(out: &mut String, segment: &str, after_tag: bool) {
    let mut segment = segment;
    if after_tag {
        if out.is_empty() || out.ends_with([' ', '\t', '\n']) {
            segment = segment.trim_start_matches([' ', '\t']);
        }
        if segment.starts_with('\n') {
            let keep = out.trim_end_matches([' ', '\t']).len();
            out.truncate(keep);
        }
    }
    out.push_str(segment);
}

fn parse_directive(body: &str) -> Option<Directive> {
    if body.contains('\n') {
        return None;
    }
    let (name, payload) = body.split_once(':')?;
    match name {
        "SUGGEST" => Some(Directive::Suggest(
            payload
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        "IMAGE" => Some(Directive::Image(images::normalize_key(payload))),
        "COMMIT" => CommitKind::parse(payload.trim()).map(Directive::Commit),
        "TYPE" if payload.trim() == "SUMMARY" => Some(Directive::Summary),
        _ => None,
    }
}

fn apply_first_wins(bundle: &mut DirectiveBundle, directive: Directive) {
    match directive {
        Directive::Suggest(list) => {
            if bundle.suggestions.is_empty() {
                bundle.suggestions = list;
            }
        }
        Directive::Image(key) => {
            if bundle.image_key.is_none() && !key.is_empty() {
                bundle.image_url = images::lookup(&key);
                bundle.image_key = Some(key);
            }
        }
        Directive::Commit(kind) => {
            bundle.commit.get_or_insert(kind);
        }
        Directive::Summary => bundle.is_summary = true,
    }
}

#[cfg(test)]
mod tests {
    use super::{extract, is_report_complete};
    use crate::types::CommitKind;

    #[test]
    fn plain_text_is_untouched() {
        for raw in ["Hello there.", "  spaced  out  ", "a | b || c", "", "line\n\nbreak"] {
            let b = extract(raw);
            assert_eq!(b.display_text, raw);
            assert!(b.suggestions.is_empty());
            assert_eq!(b.image_key, None);
            assert_eq!(b.commit, None);
            assert!(!b.is_summary);
            assert!(!b.completed);
        }
    }

    #[test]
    fn suggestions_are_split_and_trimmed() {
        let b = extract("Pick one ||SUGGEST: A, B ,C||");
        assert_eq!(b.suggestions, vec!["A", "B", "C"]);
        assert_eq!(b.display_text, "Pick one");
    }

    #[test]
    fn take_today_off_scenario() {
        let b = extract("Take today off? ||SUGGEST: Yes please, No - Tomorrow||");
        assert_eq!(b.display_text, "Take today off?");
        assert_eq!(b.suggestions, vec!["Yes please", "No - Tomorrow"]);
    }

    #[test]
    fn image_and_suggestions_scenario() {
        let b = extract("Go to the room. ||IMAGE:level2|| ||SUGGEST: Done (Next), Repeat||");
        assert_eq!(b.display_text, "Go to the room.");
        assert_eq!(b.image_key.as_deref(), Some("level2"));
        assert_eq!(b.image_url, super::images::lookup("level2"));
        assert!(b.image_url.is_some());
        assert_eq!(b.suggestions, vec!["Done (Next)", "Repeat"]);
    }

    #[test]
    fn unknown_image_key_is_stripped_without_image() {
        let b = extract("Look here ||IMAGE:unicorn||");
        assert_eq!(b.display_text, "Look here");
        assert_eq!(b.image_key.as_deref(), Some("unicorn"));
        assert_eq!(b.image_url, None);
    }

    #[test]
    fn commit_and_summary_flags() {
        let b = extract("||TYPE:SUMMARY|| You are off today. ||COMMIT:SICK||");
        assert_eq!(b.display_text, "You are off today.");
        assert!(b.is_summary);
        assert_eq!(b.commit, Some(CommitKind::Sick));
    }

    #[test]
    fn unknown_commit_token_stays_visible() {
        let b = extract("Noted ||COMMIT:HOLIDAY||");
        assert_eq!(b.commit, None);
        assert_eq!(b.display_text, "Noted ||COMMIT:HOLIDAY||");
    }

    #[test]
    fn first_directive_of_each_kind_wins() {
        let b = extract(
            "||SUGGEST: A||x ||SUGGEST: B|| ||COMMIT:LATE|| ||COMMIT:INFO|| ||IMAGE:bin|| ||IMAGE:level2||",
        );
        assert_eq!(b.suggestions, vec!["A"]);
        assert_eq!(b.commit, Some(CommitKind::Late));
        assert_eq!(b.image_key.as_deref(), Some("bin"));
        assert_eq!(b.display_text, "x");
    }

    #[test]
    fn legacy_marker_is_stripped_and_reported() {
        let b = extract("Thank you. I have noted your symptoms. [COMPLETE]");
        assert!(b.completed);
        assert_eq!(b.display_text, "Thank you. I have noted your symptoms.");
        assert!(is_report_complete(&b));
    }

    #[test]
    fn done_suggestion_marks_report_complete() {
        let b = extract("All set? ||SUGGEST: I am done (Submit), Add more||");
        assert!(is_report_complete(&b));
        assert!(!is_report_complete(&extract("Hi ||SUGGEST: Yes, No||")));
    }

    #[test]
    fn unterminated_delimiter_never_panics() {
        for raw in ["Hi ||SUGGEST: A, B", "||", "|||", "||||", "a ||IMAGE:", "[COMPLETE"] {
            let b = extract(raw);
            assert!(b.suggestions.is_empty());
            assert_eq!(b.display_text, raw);
        }
    }

    #[test]
    fn stray_pipes_do_not_hide_a_later_directive() {
        let b = extract("a || b ||SUGGEST: x||");
        assert_eq!(b.suggestions, vec!["x"]);
        assert_eq!(b.display_text, "a || b");
    }

    #[test]
    fn directive_spanning_lines_is_not_recognised() {
        let raw = "||SUGGEST: a\nb||";
        assert_eq!(extract(raw).display_text, raw);
    }

    #[test]
    fn newlines_survive_stripping() {
        let b = extract("Step one. ||IMAGE:gloves||\nStep two.");
        assert_eq!(b.display_text, "Step one.\nStep two.");
    }

    #[test]
    fn stripping_is_a_fixed_point() {
        let samples = [
            "Take today off? ||SUGGEST: Yes please, No - Tomorrow||",
            "||SUG||TYPE:SUMMARY||GEST: a||",
            "[COMP[COMPLETE]LETE] ok",
            "x ||IMAGE:level2||||SUGGEST: a||||COMMIT:INFO|| y",
            "plain",
        ];
        for raw in samples {
            let once = extract(raw);
            let twice = extract(&once.display_text);
            assert_eq!(twice.display_text, once.display_text, "input: {raw}");
            assert!(!twice.has_directives(), "input: {raw}");
        }
    }

    #[test]
    fn glued_fragments_are_resolved() {
        let b = extract("||SUG||TYPE:SUMMARY||GEST: a||");
        assert!(b.is_summary);
        assert_eq!(b.suggestions, vec!["a"]);
        assert_eq!(b.display_text, "");
    }

    #[test]
    fn extraction_is_deterministic() {
        let raw = "Go. ||IMAGE:level2|| ||SUGGEST: Done (Next), Repeat|| ||COMMIT:INFO||";
        assert_eq!(extract(raw), extract(raw));
    }
}
