use crossterm::style::Stylize;
use unicode_width::UnicodeWidthChar;

use crate::agent::provider::{Message, Role};
use crate::flow::{FlowState, side_flow, ticket};
use crate::i18n::Labels;
use crate::types::{HomeView, Tab, TextSize, TicketStage};
use crate::ui::symbols::Symbols;

/// Display options derived from the accessibility settings.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Style {
    /// No colours: high-contrast and colour-vision modes.
    pub plain: bool,
    pub text_size: TextSize,
}

pub(crate) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' && matches!(chars.peek(), Some('[')) {
            let _ = chars.next();
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
            continue;
        }
        out.push(ch);
    }
    out
}

pub(crate) fn rendered_text_width(s: &str) -> usize {
    const TAB_STOP: usize = 8;
    let mut col = 0usize;
    for ch in s.chars() {
        match ch {
            '\t' => col += TAB_STOP - (col % TAB_STOP),
            '\r' | '\n' => {}
            c if c.is_control() => {}
            c => col += UnicodeWidthChar::width(c).unwrap_or(0),
        }
    }
    col
}

/// Keep the tail of `s` that fits in `max_width`, marking the cut.
pub(crate) fn fit_single_line_tail(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    let plain = strip_ansi(s).replace('\t', " ");
    if rendered_text_width(&plain) <= max_width {
        return plain;
    }

    let ellipsis = Symbols::current().ellipsis;
    let ellipsis_width = rendered_text_width(ellipsis);
    if max_width <= ellipsis_width {
        return ellipsis.to_string();
    }
    let budget = max_width - ellipsis_width;

    let mut kept_rev: Vec<char> = Vec::new();
    let mut used = 0usize;
    for ch in plain.chars().rev() {
        if ch.is_control() {
            continue;
        }
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        kept_rev.push(ch);
        used += w;
    }
    kept_rev.reverse();
    let mut out = ellipsis.to_string();
    out.extend(kept_rev);
    out
}

/// Greedy word wrap by display width. Newlines are kept; words wider than
/// `width` are split.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for para in text.split('\n') {
        let mut line = String::new();
        let mut line_w = 0usize;
        for word in para.split(' ').filter(|w| !w.is_empty()) {
            let word_w = rendered_text_width(word);
            let sep = usize::from(!line.is_empty());
            if line_w + sep + word_w <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_w += sep + word_w;
                continue;
            }
            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
                line_w = 0;
            }
            for ch in word.chars() {
                let w = UnicodeWidthChar::width(ch).unwrap_or(0);
                if line_w + w > width && !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                    line_w = 0;
                }
                line.push(ch);
                line_w += w;
            }
        }
        out.push(line);
    }
    out
}

/// Render `**bold**` spans. Bold state carries across wrapped lines through
/// `bold`; other markdown markers are dropped.
pub(crate) fn render_inline_markdown(line: &str, bold: &mut bool, plain: bool) -> String {
    let mut out = String::new();
    let mut segment = String::new();
    let mut chars = line.chars().peekable();

    let flush = |segment: &mut String, out: &mut String, bold: bool| {
        if segment.is_empty() {
            return;
        }
        if bold && !plain {
            out.push_str(&segment.as_str().bold().to_string());
        } else {
            out.push_str(segment);
        }
        segment.clear();
    };

    while let Some(ch) = chars.next() {
        match ch {
            '*' if chars.peek() == Some(&'*') => {
                let _ = chars.next();
                flush(&mut segment, &mut out, *bold);
                *bold = !*bold;
            }
            '*' | '`' => {}
            c => segment.push(c),
        }
    }
    flush(&mut segment, &mut out, *bold);
    out
}

fn message_lines(msg: &Message, width: usize, style: Style) -> Vec<String> {
    let sym = Symbols::current();
    let (prefix, indent) = match msg.role {
        Role::User => (format!("{} ", sym.prompt), "  "),
        Role::Assistant => (format!("{} ", sym.assistant), "  "),
        Role::System => (format!("{} ", sym.system), "  "),
    };
    let body_width = width.saturating_sub(rendered_text_width(&prefix)).max(1);

    let mut out = Vec::new();
    let mut bold = false;
    for (i, line) in wrap_text(&msg.content, body_width).iter().enumerate() {
        let rendered = render_inline_markdown(line, &mut bold, style.plain);
        let lead = if i == 0 { prefix.as_str() } else { indent };
        let text = match (msg.role, style.plain) {
            (_, true) => rendered,
            (Role::User, false) => rendered.cyan().to_string(),
            (Role::System, false) => rendered.dark_grey().to_string(),
            (Role::Assistant, false) => rendered,
        };
        out.push(format!("{lead}{text}"));
    }
    if let Some(url) = &msg.image {
        out.push(format!(
            "{indent}{} {}",
            sym.image,
            fit_single_line_tail(url, body_width.saturating_sub(3))
        ));
    }
    if style.text_size != TextSize::Normal {
        out.push(String::new());
    }
    out
}

fn heading(text: &str, style: Style) -> String {
    if style.plain {
        text.to_uppercase()
    } else {
        text.bold().to_string()
    }
}

/// Everything above the menu for the current tab.
pub(crate) fn body_lines(
    state: &FlowState,
    labels: &Labels,
    user_name: &str,
    width: usize,
    style: Style,
) -> Vec<String> {
    match state.tab {
        Tab::Home => home_lines(state, labels, user_name, width, style),
        Tab::History => history_lines(state, labels, style),
        Tab::Settings => vec![
            heading(labels.tab_settings, style),
            format!("{}: {user_name}", labels.label_name),
        ],
    }
}

fn history_lines(state: &FlowState, labels: &Labels, style: Style) -> Vec<String> {
    let sym = Symbols::current();
    let mut out = vec![heading(labels.tab_history, style)];
    if state.history.is_empty() {
        out.push(format!("  {}", sym.ellipsis));
    }
    for item in state.history.newest_first() {
        out.push(format!(
            "{} {}  {}  [{}]",
            sym.bullet,
            labels.ticket_title(item.category),
            item.timestamp,
            labels.status(item.status)
        ));
    }
    out
}

fn home_lines(
    state: &FlowState,
    labels: &Labels,
    user_name: &str,
    width: usize,
    style: Style,
) -> Vec<String> {
    let sym = Symbols::current();

    if let Some(started) = state.call_started {
        let secs = (chrono::Local::now() - started).num_seconds().max(0);
        return vec![
            heading(&format!("{} {}", sym.phone, labels.chip_call), style),
            side_flow::format_duration(secs),
        ];
    }
    if let Some(topic) = state.active_instruction {
        let (title, body) = labels.instruction(topic);
        let mut out = vec![heading(title, style)];
        out.extend(wrap_text(body, width));
        return out;
    }
    if let Some(kind) = state.outcome {
        let mut out = vec![heading(&format!("{} {}", sym.check, labels.success_title(kind)), style)];
        if kind == crate::types::SuccessKind::Security {
            out.push(labels.security_msg.to_string());
        }
        return out;
    }
    if state.ticket == TicketStage::ReviewingSummary {
        let kind = ticket::commit_category(state.draft.as_ref(), state.pending_commit);
        let mut out = vec![
            heading(labels.header_review, style),
            format!("{}: {user_name}", labels.label_name),
            format!("{}: {}", labels.label_type, labels.ticket_title(kind.into())),
            format!("{}:", labels.label_details),
        ];
        out.extend(
            wrap_text(&ticket::review_details(state), width.saturating_sub(2))
                .into_iter()
                .map(|l| format!("  {l}")),
        );
        return out;
    }

    let mut out = Vec::new();
    if state.messages.is_empty() {
        out.push(heading(&format!("{}, {user_name}!", labels.welcome), style));
        out.push(labels.greeting.to_string());
        out.push(String::new());
        match state.view {
            HomeView::Main if state.show_questions => out.push(labels.header_common.to_string()),
            HomeView::Main => {}
            HomeView::Problems => out.push(labels.header_select_problem.to_string()),
            HomeView::Instructions => out.push(labels.header_workplace_guide.to_string()),
        }
    }
    for msg in &state.messages {
        out.extend(message_lines(msg, width, style));
    }
    if let Some(summary) = &state.summary_card {
        let rule = "─".repeat(width.min(40));
        out.push(rule.clone());
        out.extend(wrap_text(summary, width));
        out.push(rule);
    }
    if let Some(file) = &state.pending_upload {
        out.push(format!("{} {}", sym.attachment, file.name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{Style, body_lines, fit_single_line_tail, render_inline_markdown, wrap_text};
    use crate::agent::provider::Message;
    use crate::flow::FlowState;
    use crate::i18n::Labels;
    use crate::types::{Language, TextSize, TicketStage};

    const PLAIN: Style = Style {
        plain: true,
        text_size: TextSize::Normal,
    };

    #[test]
    fn wrap_breaks_on_words_and_keeps_newlines() {
        assert_eq!(
            wrap_text("Go to the utility room\nnow", 10),
            ["Go to the", "utility", "room", "now"]
        );
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh", 3), ["abc", "def", "gh"]);
    }

    #[test]
    fn wrap_counts_wide_chars() {
        assert_eq!(wrap_text("日本語", 4), ["日本", "語"]);
    }

    #[test]
    fn bold_carries_across_lines_in_plain_mode() {
        let mut bold = false;
        assert_eq!(render_inline_markdown("the **Utility", &mut bold, true), "the Utility");
        assert!(bold);
        assert_eq!(render_inline_markdown("Room** now `x`", &mut bold, true), "Room now x");
        assert!(!bold);
    }

    #[test]
    fn tail_fit_keeps_end_of_input() {
        let out = fit_single_line_tail("hello world", 6);
        assert!(out.ends_with("world"));
    }

    #[test]
    fn review_screen_shows_category_and_details() {
        let mut state = FlowState::default();
        state.ticket = TicketStage::ReviewingSummary;
        let lines = body_lines(
            &state,
            Labels::for_language(Language::English),
            "Fatima",
            60,
            PLAIN,
        );
        assert_eq!(lines[0], "REVIEW YOUR REPORT");
        assert!(lines.iter().any(|l| l == "Type: Sick Leave"));
        assert!(lines.iter().any(|l| l.contains("not feeling well")));
    }

    #[test]
    fn chat_lines_include_image_reference() {
        let mut state = FlowState::default();
        state
            .messages
            .push(Message::assistant("Here").with_image(Some("http://img/x.png")));
        let lines = body_lines(
            &state,
            Labels::for_language(Language::English),
            "Fatima",
            60,
            PLAIN,
        );
        assert!(lines.iter().any(|l| l.contains("http://img/x.png")));
    }
}
