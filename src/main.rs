mod agent;
mod config;
mod directive;
mod flow;
mod i18n;
mod session;
mod speech;
mod telemetry;
mod types;
mod ui;

use std::{io, time::Duration};

use agent::provider::{build_http_client, client_from_config};
use config::Config;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event as CEvent, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use flow::{Action, Attachment, Effect, FlowState, QuickAction, Settings, menu};
use i18n::Labels;
use session::Session;
use speech::{ListeningSession, NoSpeech, SpeechPlayer};
use ui::screen::{Frame, Screen};

// ── App ───────────────────────────────────────────────────────────────────────
pub(crate) struct App {
    pub session: Session,
    pub listening: ListeningSession,
    pub user_name: String,
}

impl App {
    fn new(config: &Config, session: Session) -> Self {
        Self {
            session,
            listening: ListeningSession::new(Box::new(NoSpeech)),
            user_name: config.profile.user_name.clone(),
        }
    }

    fn labels(&self) -> &'static Labels {
        Labels::for_language(self.session.state.settings.language)
    }

    fn menu(&self) -> Vec<menu::MenuItem> {
        menu::items(&self.session.state, self.labels())
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let log_path = telemetry::init()?;
    let config = Config::load()?;
    tracing::info!(log = %log_path.display(), endpoint = %config.endpoint.url, "starting");

    let http_client = build_http_client(&config.endpoint)?;
    let client = client_from_config(http_client, &config.endpoint)?;
    let profile = &config.profile;
    let state = FlowState::new(Settings {
        language: profile.language,
        tts: profile.tts || profile.mode == types::AccessMode::Vision,
        text_size: profile.text_size,
        mode: profile.mode,
    });
    let session = Session::new(state, client, SpeechPlayer::new(Box::new(NoSpeech)));
    let mut app = App::new(&config, session);

    enable_raw_mode()?;
    execute!(io::stdout(), EnableBracketedPaste)?;
    let mut screen = Screen::new()?;

    let run_result = run_loop(&mut app, &mut screen).await;

    screen.restore();
    let _ = execute!(io::stdout(), DisableBracketedPaste);
    let _ = disable_raw_mode();
    run_result
}

async fn run_loop(app: &mut App, screen: &mut Screen) -> anyhow::Result<()> {
    let mut dirty = true;

    loop {
        let effects = app.session.drain();
        if !effects.is_empty() || app.session.state.is_loading() || app.session.state.is_calling()
        {
            dirty = true;
        }
        apply_ui_effects(screen, effects);
        if let Some(notice) = app.session.take_notice() {
            screen.status = notice;
            dirty = true;
        }

        if dirty {
            let items = app.menu();
            screen.clamp_menu(items.len());
            let frame = Frame {
                state: &app.session.state,
                labels: app.labels(),
                user_name: &app.user_name,
                menu: &items,
                listening: app.listening.is_listening(),
            };
            screen.draw(&frame)?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(app, screen, key.code, key.modifiers) {
                        break;
                    }
                }
                CEvent::Paste(text) => screen.input.push_str(&text.replace(['\r', '\n'], " ")),
                _ => {}
            }
            dirty = true;
        }
        screen.spinner_tick = screen.spinner_tick.wrapping_add(1);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    Ok(())
}

fn dispatch(app: &mut App, screen: &mut Screen, action: Action) {
    let effects = app.session.dispatch(action);
    apply_ui_effects(screen, effects);
}

fn apply_ui_effects(screen: &mut Screen, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::PickFile => {
                screen.picking_file = true;
                screen.input.clear();
            }
            Effect::FocusInput => screen.menu_sel = 0,
            Effect::RequestCompletion { .. } | Effect::Speak(_) => {}
        }
    }
}

// ── Key handling ──────────────────────────────────────────────────────────────

fn handle_key(app: &mut App, screen: &mut Screen, key: KeyCode, modifiers: KeyModifiers) -> bool {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        match key {
            KeyCode::Char('c') => return true,
            KeyCode::Char('t') => {
                let next = app.session.state.tab.cycle();
                dispatch(app, screen, Action::SwitchTab(next));
            }
            KeyCode::Char('r') => toggle_listening(app, screen),
            KeyCode::Char('o') => dispatch(app, screen, Action::Quick(QuickAction::UploadNote)),
            KeyCode::Char('p') => toggle_playback(app, screen),
            KeyCode::Char('x') => app.session.player_mut().stop(),
            _ => {}
        }
        return false;
    }

    match key {
        KeyCode::Esc => {
            screen.status.clear();
            if app.listening.is_listening() {
                app.listening.cancel();
            } else if screen.picking_file {
                screen.picking_file = false;
                screen.input.clear();
            } else {
                app.session.player_mut().stop();
                dispatch(app, screen, Action::HomeReset);
            }
        }
        KeyCode::Up => screen.menu_sel = screen.menu_sel.saturating_sub(1),
        KeyCode::Down => screen.menu_sel += 1,
        KeyCode::Enter => submit(app, screen),
        KeyCode::Backspace => {
            screen.input.pop();
        }
        KeyCode::Char(c) if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT => {
            screen.input.push(c);
        }
        _ => {}
    }
    false
}

fn submit(app: &mut App, screen: &mut Screen) {
    screen.status.clear();
    let text = screen.input.trim().to_string();

    if screen.picking_file {
        screen.picking_file = false;
        screen.input.clear();
        if !text.is_empty() {
            dispatch(app, screen, Action::AttachFile(Attachment::new(text)));
        }
        return;
    }

    let state = &app.session.state;
    if !text.is_empty() && state.accepts_input() {
        if state.is_loading() {
            return;
        }
        screen.input.clear();
        dispatch(app, screen, Action::SendText(text));
        return;
    }

    let items = app.menu();
    if let Some(item) = items.into_iter().nth(screen.menu_sel) {
        dispatch(app, screen, item.action);
        screen.menu_sel = 0;
    }
}

fn toggle_listening(app: &mut App, screen: &mut Screen) {
    if app.listening.is_listening() {
        app.listening.finish(&mut screen.input);
        return;
    }
    let language = app.session.state.settings.language;
    if let Err(err) = app.listening.start(language) {
        tracing::info!(%err, "voice input unavailable");
        screen.status = err.to_string();
    }
}

fn toggle_playback(app: &mut App, screen: &mut Screen) {
    let player = app.session.player_mut();
    let result = match player.state() {
        speech::PlaybackState::Playing => player.pause(),
        speech::PlaybackState::Paused => player.resume(),
        speech::PlaybackState::Idle => Ok(()),
    };
    if let Err(err) = result {
        screen.status = err.to_string();
    }
}
