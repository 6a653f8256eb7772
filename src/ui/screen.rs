use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, Stylize},
    terminal::{self, Clear, ClearType},
};

use crate::flow::FlowState;
use crate::flow::menu::MenuItem;
use crate::i18n::Labels;
use crate::types::{AccessMode, Tab};
use crate::ui::format::{Style, body_lines, fit_single_line_tail, rendered_text_width};
use crate::ui::symbols::Symbols;

const BRAND: Color = Color::Rgb {
    r: 108,
    g: 43,
    b: 217,
};

/// Full-redraw renderer. Everything above the input line is derived from
/// [`FlowState`]; the screen only owns the input buffer and menu cursor.
pub(crate) struct Screen {
    stdout: io::Stdout,
    pub input: String,
    pub status: String,
    pub menu_sel: usize,
    /// Next Enter names a file to attach instead of sending a message.
    pub picking_file: bool,
    pub spinner_tick: u64,
}

/// What the caller knows that [`FlowState`] does not.
pub(crate) struct Frame<'a> {
    pub state: &'a FlowState,
    pub labels: &'a Labels,
    pub user_name: &'a str,
    pub menu: &'a [MenuItem],
    pub listening: bool,
}

impl Screen {
    pub(crate) fn new() -> io::Result<Self> {
        let mut s = Self {
            stdout: io::stdout(),
            input: String::new(),
            status: String::new(),
            menu_sel: 0,
            picking_file: false,
            spinner_tick: 0,
        };
        queue!(s.stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
        s.stdout.flush()?;
        Ok(s)
    }

    pub(crate) fn restore(&mut self) {
        let _ = queue!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = self.stdout.flush();
    }

    pub(crate) fn clamp_menu(&mut self, len: usize) {
        if len == 0 {
            self.menu_sel = 0;
        } else if self.menu_sel >= len {
            self.menu_sel = len - 1;
        }
    }

    pub(crate) fn draw(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let (cols, rows) = terminal::size().unwrap_or((80, 24));
        let (cols, rows) = (cols.max(20) as usize, rows.max(8) as usize);
        let settings = frame.state.settings;
        let style = Style {
            plain: matches!(settings.mode, AccessMode::Vision | AccessMode::ColorVision),
            text_size: settings.text_size,
        };
        let sym = Symbols::current();

        let header = tab_bar(frame.state.tab, frame.labels, style.plain);
        let menu_lines: Vec<String> = frame
            .menu
            .iter()
            .enumerate()
            .map(|(i, item)| menu_line(item, i == self.menu_sel, cols, style.plain))
            .collect();
        let status = self.status_line(frame, cols);
        let prompt = format!("{} ", sym.prompt);
        let input_budget = cols.saturating_sub(rendered_text_width(&prompt) + 1);
        let input = if frame.state.accepts_input() || self.picking_file {
            fit_single_line_tail(&self.input, input_budget)
        } else {
            String::new()
        };

        let reserved = 1 + menu_lines.len() + 2;
        let body_rows = rows.saturating_sub(reserved);
        let body = body_lines(frame.state, frame.labels, frame.user_name, cols - 2, style);
        let skip = body.len().saturating_sub(body_rows);

        queue!(self.stdout, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
        queue!(self.stdout, Print(header), Print("\r\n"))?;
        for line in body.iter().skip(skip) {
            queue!(self.stdout, Print(format!(" {line}\r\n")))?;
        }
        let used = 1 + body.len() - skip;
        let pad = rows.saturating_sub(used + menu_lines.len() + 2);
        for _ in 0..pad {
            queue!(self.stdout, Print("\r\n"))?;
        }
        for line in &menu_lines {
            queue!(self.stdout, Print(line), Print("\r\n"))?;
        }
        queue!(
            self.stdout,
            Print(status),
            Print("\r\n"),
            Print(prompt),
            Print(input)
        )?;
        self.stdout.flush()
    }

    fn status_line(&self, frame: &Frame<'_>, cols: usize) -> String {
        let sym = Symbols::current();
        let text = if frame.listening {
            format!("{} {}", sym.mic, frame.labels.status_listening)
        } else if frame.state.is_loading() {
            let spin = sym.spinner_frames[(self.spinner_tick as usize) % sym.spinner_frames.len()];
            format!("{spin} {}", frame.labels.thinking)
        } else if !self.status.is_empty() {
            format!("{} {}", sym.warning, self.status)
        } else if self.picking_file {
            "File path, then Enter (Esc to cancel)".to_string()
        } else if frame.state.accepts_input() {
            frame.labels.input_placeholder.to_string()
        } else {
            String::new()
        };
        fit_single_line_tail(&text, cols).dark_grey().to_string()
    }
}

fn tab_bar(active: Tab, labels: &Labels, plain: bool) -> String {
    [
        (Tab::Home, labels.tab_home),
        (Tab::History, labels.tab_history),
        (Tab::Settings, labels.tab_settings),
    ]
    .iter()
    .map(|(tab, label)| match (*tab == active, plain) {
        (true, true) => format!("[{label}]"),
        (true, false) => format!(" {label} ").on(BRAND).white().bold().to_string(),
        (false, _) => format!(" {label} "),
    })
    .collect::<Vec<_>>()
    .join(" ")
}

fn menu_line(item: &MenuItem, selected: bool, cols: usize, plain: bool) -> String {
    let sym = Symbols::current();
    let marker = if selected { sym.selected } else { " " };
    let label = fit_single_line_tail(&item.label, cols.saturating_sub(4));
    match (selected, item.primary, plain) {
        (_, _, true) if selected => format!(" {marker} [{label}]"),
        (_, _, true) => format!(" {marker}  {label} "),
        (true, _, false) => format!(" {marker} {}", format!(" {label} ").on(BRAND).white().bold()),
        (false, true, false) => format!(" {marker} {}", label.with(BRAND).bold()),
        (false, false, false) => format!(" {marker} {label}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{menu_line, tab_bar};
    use crate::flow::Action;
    use crate::flow::menu::MenuItem;
    use crate::i18n::Labels;
    use crate::types::{Language, Tab};

    #[test]
    fn plain_tab_bar_brackets_active_tab() {
        let bar = tab_bar(Tab::History, Labels::for_language(Language::English), true);
        assert_eq!(bar, " Home  [History]  Settings ");
    }

    #[test]
    fn plain_menu_marks_selection() {
        let item = MenuItem {
            label: "Sick leave".into(),
            action: Action::ChooseSubmit,
            primary: false,
        };
        assert!(menu_line(&item, true, 40, true).contains("[Sick leave]"));
        assert!(!menu_line(&item, false, 40, true).contains('['));
    }
}
