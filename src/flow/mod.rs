//! Conversation and report state machine.
//!
//! All UI state lives in one [`FlowState`] and changes only through
//! [`reduce`]. The reducer never performs I/O; it returns [`Effect`]s for the
//! session driver to carry out (completion requests, speech, file picking).

pub mod history;
pub mod menu;
pub mod side_flow;
pub mod ticket;


use chrono::{DateTime, Local};

use crate::agent::prompt::load_file_event;
use crate::agent::provider::Message;
use crate::directive::{self, DirectiveBundle};
use crate::i18n;
use crate::types::{
    AccessMode, CommitKind, HomeView, InstructionTopic, Language, ReportKind, SideFlow,
    SuccessKind, Tab, TextSize, TicketStage,
};

use history::HistoryLog;
use side_flow::SideFlowChoice;
use ticket::ReportDraft;

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// File name without directories or extension, as named in load-file events.
    pub fn stem(&self) -> &str {
        let base = self
            .name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.name.as_str());
        match base.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => base,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub language: Language,
    pub tts: bool,
    pub text_size: TextSize,
    pub mode: AccessMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    SickLeave,
    LateToWork,
    ReportProblem,
    UploadNote,
    ForgotKey,
    NeedAssistance,
    CallManager,
    QuickLateLog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SendText(String),
    SelectSuggestion(String),
    ChooseSubmit,
    ChooseAskMore,
    ConfirmSend,
    HomeReset,
    SwitchTab(Tab),
    OpenView(HomeView),
    ToggleQuestions,
    Quick(QuickAction),
    SideFlow(SideFlowChoice),
    EndCall,
    AttachFile(Attachment),
    CancelUpload,
    ConfirmUpload,
    OpenInstruction(InstructionTopic),
    DismissInstruction,
    DismissSummaryCard,
    SetLanguage(Language),
    ToggleTts,
    SetTextSize(TextSize),
    SelectMode(AccessMode),
    CompletionSucceeded { request: RequestId, raw: String },
    CompletionFailed { request: RequestId, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send `messages` to the completion endpoint and report back with `request`.
    RequestCompletion {
        request: RequestId,
        messages: Vec<Message>,
    },
    Speak(String),
    PickFile,
    FocusInput,
}

#[derive(Debug, Clone, Default)]
pub struct FlowState {
    pub tab: Tab,
    pub view: HomeView,
    pub show_questions: bool,
    pub ticket: TicketStage,
    pub side_flow: SideFlow,
    /// Terminal success screen, set by a submission or a side-flow.
    pub outcome: Option<SuccessKind>,
    pub messages: Vec<Message>,
    pub suggestions: Vec<String>,
    pub draft: Option<ReportDraft>,
    /// Latest commit directive seen during the current ticket.
    pub pending_commit: Option<CommitKind>,
    pub summary_card: Option<String>,
    pub pending_upload: Option<Attachment>,
    pub active_instruction: Option<InstructionTopic>,
    pub call_started: Option<DateTime<Local>>,
    pub in_flight: Option<RequestId>,
    next_request: RequestId,
    pub history: HistoryLog,
    pub settings: Settings,
}

impl FlowState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_calling(&self) -> bool {
        self.call_started.is_some()
    }

    /// The input bar is hidden on the review and success screens.
    pub fn accepts_input(&self) -> bool {
        self.outcome.is_none()
            && matches!(
                self.ticket,
                TicketStage::Chatting | TicketStage::AwaitingDecision
            )
    }

    fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        self.next_request
    }
}

pub fn reduce(state: &mut FlowState, action: Action) -> Vec<Effect> {
    match action {
        Action::SendText(text) => send_text(state, text),
        Action::SelectSuggestion(label) => select_suggestion(state, label),
        Action::ChooseSubmit => ticket::choose_submit(state),
        Action::ChooseAskMore => ticket::ask_more(state),
        Action::ConfirmSend => ticket::confirm_send(state),
        Action::HomeReset => {
            home_reset(state);
            Vec::new()
        }
        Action::SwitchTab(tab) => {
            state.tab = tab;
            Vec::new()
        }
        Action::OpenView(view) => {
            state.view = view;
            state.show_questions = false;
            Vec::new()
        }
        Action::ToggleQuestions => {
            state.show_questions = !state.show_questions;
            Vec::new()
        }
        Action::Quick(quick) => quick_action(state, quick),
        Action::SideFlow(choice) => side_flow::choose(state, choice),
        Action::EndCall => side_flow::end_call(state),
        Action::AttachFile(file) => {
            state.pending_upload = Some(file);
            Vec::new()
        }
        Action::CancelUpload => {
            state.pending_upload = None;
            Vec::new()
        }
        Action::ConfirmUpload => confirm_upload(state),
        Action::OpenInstruction(InstructionTopic::Tools) => side_flow::enter_cleaning_tools(state),
        Action::OpenInstruction(topic) => {
            state.active_instruction = Some(topic);
            Vec::new()
        }
        Action::DismissInstruction => {
            state.active_instruction = None;
            Vec::new()
        }
        Action::DismissSummaryCard => {
            state.summary_card = None;
            Vec::new()
        }
        Action::SetLanguage(language) => {
            state.settings.language = language;
            Vec::new()
        }
        Action::ToggleTts => {
            state.settings.tts = !state.settings.tts;
            Vec::new()
        }
        Action::SetTextSize(size) => {
            state.settings.text_size = size;
            Vec::new()
        }
        Action::SelectMode(mode) => {
            state.settings.mode = mode;
            match mode {
                AccessMode::Vision => state.settings.tts = true,
                AccessMode::Standard => state.settings.tts = false,
                _ => {}
            }
            Vec::new()
        }
        Action::CompletionSucceeded { request, raw } => completion_succeeded(state, request, &raw),
        Action::CompletionFailed { request, error } => {
            completion_failed(state, request, &error);
            Vec::new()
        }
    }
}

fn send_text(state: &mut FlowState, text: String) -> Vec<Effect> {
    if !state.accepts_input() {
        return Vec::new();
    }
    if state.ticket == TicketStage::AwaitingDecision && i18n::is_ask_more_phrase(&text) {
        return ticket::ask_more(state);
    }
    if text.trim().is_empty() || state.is_loading() {
        return Vec::new();
    }
    if state.side_flow == SideFlow::LateToWork {
        return side_flow::answer_late(state, text);
    }
    ticket::note_user_reply(state, &text);
    dispatch_user_text(state, text)
}

/// Append a user message and ask the model to continue. Callers have already
/// checked that no request is in flight.
fn dispatch_user_text(state: &mut FlowState, text: String) -> Vec<Effect> {
    state.messages.push(Message::user(text));
    state.suggestions.clear();
    state.view = HomeView::Main;
    state.show_questions = false;
    vec![request_completion(state, None)]
}

fn request_completion(state: &mut FlowState, hidden: Option<Message>) -> Effect {
    let request = state.next_request_id();
    state.in_flight = Some(request);
    let mut messages = state.messages.clone();
    messages.extend(hidden);
    tracing::debug!(request, messages = messages.len(), "requesting completion");
    Effect::RequestCompletion { request, messages }
}

fn select_suggestion(state: &mut FlowState, label: String) -> Vec<Effect> {
    if directive::is_done_suggestion(&label) {
        if state.ticket != TicketStage::AwaitingDecision || !state.suggestions.contains(&label) {
            tracing::debug!(label = %label, "ignoring done chip that was not offered");
            return Vec::new();
        }
        return ticket::choose_submit(state);
    }
    send_text(state, label)
}

fn completion_succeeded(state: &mut FlowState, request: RequestId, raw: &str) -> Vec<Effect> {
    if state.in_flight != Some(request) {
        tracing::warn!(request, "dropping completion that is no longer awaited");
        return Vec::new();
    }
    state.in_flight = None;
    if !state.accepts_input() {
        tracing::debug!(request, stage = state.ticket.as_str(), "report closed; reply discarded");
        return Vec::new();
    }

    let bundle = directive::extract(raw);
    tracing::debug!(request, directives = bundle.has_directives(), "completion received");
    if let (Some(key), None) = (&bundle.image_key, bundle.image_url) {
        tracing::warn!(key = %key, "assistant referenced an unknown image key");
    }
    apply_bundle(state, bundle)
}

fn apply_bundle(state: &mut FlowState, bundle: DirectiveBundle) -> Vec<Effect> {
    let mut effects = Vec::new();

    if let Some(kind) = bundle.commit {
        ticket::note_commit(state, kind);
    }
    if bundle.is_summary {
        state.summary_card = Some(bundle.display_text.clone());
        if let Some(draft) = state.draft.as_mut() {
            draft.detail = bundle.display_text.clone();
        }
    }
    if !bundle.display_text.is_empty() || bundle.image_url.is_some() {
        let message = Message::assistant(bundle.display_text.clone()).with_image(bundle.image_url);
        push_spoken(state, message, &mut effects);
    }
    state.suggestions = bundle.suggestions.clone();
    ticket::after_cycle(state, &bundle);
    effects
}

fn completion_failed(state: &mut FlowState, request: RequestId, error: &str) {
    if state.in_flight != Some(request) {
        return;
    }
    state.in_flight = None;
    tracing::warn!(request, error, "completion failed; conversation left unchanged");
}

/// Append an assistant or system message, reading it aloud when enabled.
pub(crate) fn push_spoken(state: &mut FlowState, message: Message, effects: &mut Vec<Effect>) {
    if state.settings.tts && !message.content.is_empty() {
        effects.push(Effect::Speak(message.content.clone()));
    }
    state.messages.push(message);
}

fn announce(state: &FlowState, text: &str, effects: &mut Vec<Effect>) {
    if state.settings.tts {
        effects.push(Effect::Speak(text.to_string()));
    }
}

/// Home outside the home tab only switches tabs; on the home tab it clears the
/// session. Submitted history and settings survive.
fn home_reset(state: &mut FlowState) {
    if state.tab != Tab::Home {
        state.tab = Tab::Home;
        return;
    }
    let history = std::mem::take(&mut state.history);
    let settings = state.settings;
    let next_request = state.next_request;
    *state = FlowState {
        history,
        settings,
        next_request,
        ..FlowState::default()
    };
    tracing::info!("session reset to home");
}

fn quick_action(state: &mut FlowState, quick: QuickAction) -> Vec<Effect> {
    match quick {
        QuickAction::SickLeave => start_report(
            state,
            ReportKind::SickLeave,
            "Sick leave selected",
            "Sick leave",
        ),
        QuickAction::LateToWork => start_report(
            state,
            ReportKind::LateArrival,
            "Late to work selected",
            "I am late to work",
        ),
        QuickAction::ReportProblem => {
            state.view = HomeView::Problems;
            state.show_questions = false;
            Vec::new()
        }
        QuickAction::UploadNote => {
            state.show_questions = false;
            vec![Effect::PickFile]
        }
        QuickAction::ForgotKey => side_flow::enter_lost_key(state),
        QuickAction::NeedAssistance => side_flow::enter_call_manager(state),
        QuickAction::CallManager => side_flow::start_call(state),
        QuickAction::QuickLateLog => side_flow::enter_late_to_work(state),
    }
}

fn start_report(
    state: &mut FlowState,
    kind: ReportKind,
    announcement: &str,
    opening: &str,
) -> Vec<Effect> {
    if !state.accepts_input() || state.is_loading() {
        return Vec::new();
    }
    let mut effects = Vec::new();
    announce(state, announcement, &mut effects);
    ticket::start_draft(state, kind);
    effects.extend(dispatch_user_text(state, opening.to_string()));
    effects
}

fn confirm_upload(state: &mut FlowState) -> Vec<Effect> {
    if state.is_loading() || !state.accepts_input() {
        return Vec::new();
    }
    let Some(file) = state.pending_upload.take() else {
        return Vec::new();
    };
    state.messages.push(Message::user(format!("Uploaded: {}", file.name)));
    state.view = HomeView::Main;
    state.show_questions = false;
    let hidden = Message::system(load_file_event(file.stem()));
    tracing::info!(file = %file.name, "uploading reference file");
    vec![request_completion(state, Some(hidden))]
}
