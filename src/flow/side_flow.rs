//! Short scripted sub-dialogs. None of these call the model.

use chrono::Local;

use crate::agent::provider::Message;
use crate::directive::images;
use crate::types::{HistoryCategory, HomeView, SideFlow, SuccessKind, TicketStage};

use super::{Effect, FlowState, push_spoken};

const LOST_KEY_PROMPT: &str =
    "Don't worry. Do you need me to notify the Security Desk for a temporary pass?";
const SECURITY_NOTIFIED: &str = "Security has been notified. Please proceed to the front desk.";
const KEY_FOUND: &str = "Great! Have a productive day.";
const ASSISTANCE_PROMPT: &str = "I can help. Do you want to call your manager directly?";
const LATE_PROMPT: &str = "Sorry to hear that. How late will you be?";
const TOOLS_PROMPT: &str = "Which cleaning tools do you need?";

pub const LATE_DELAYS: [&str; 3] = ["15 mins", "30 mins", "1 hour"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningTool {
    Mops,
    Cloths,
    Chemicals,
}

impl CleaningTool {
    pub const ALL: [CleaningTool; 3] = [Self::Mops, Self::Cloths, Self::Chemicals];

    pub fn label(self) -> &'static str {
        match self {
            Self::Mops => "Mops",
            Self::Cloths => "Cloths",
            Self::Chemicals => "Chemicals",
        }
    }

    fn answer(self) -> &'static str {
        match self {
            Self::Mops => {
                "They are in the Utility Room (Level 2), inside the blue cabinet. \
                 Blue mops are for general areas, red mops for bathrooms only."
            }
            Self::Cloths => {
                "They are in the Utility Room (Level 2), inside the blue cabinet. \
                 Blue cloth for desks, red cloth for toilets and sinks."
            }
            Self::Chemicals => {
                "They are in the Utility Room (Level 2), inside the blue cabinet. \
                 Green bottle for tables, red bottle for toilets. Never mix them."
            }
        }
    }

    fn image_key(self) -> &'static str {
        match self {
            Self::Mops => "mops",
            Self::Cloths => "cloths",
            Self::Chemicals => "chemicals",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideFlowChoice {
    NotifySecurity,
    FoundKey,
    CallManager,
    LateBy(String),
    Tool(CleaningTool),
}

impl SideFlowChoice {
    pub fn label(&self) -> &str {
        match self {
            Self::NotifySecurity => "Yes, notify Security",
            Self::FoundKey => "No, I found it",
            Self::CallManager => "Call Manager",
            Self::LateBy(delay) => delay.as_str(),
            Self::Tool(tool) => tool.label(),
        }
    }

    fn belongs_to(&self) -> SideFlow {
        match self {
            Self::NotifySecurity | Self::FoundKey => SideFlow::LostKey,
            Self::CallManager => SideFlow::CallManager,
            Self::LateBy(_) => SideFlow::LateToWork,
            Self::Tool(_) => SideFlow::CleaningToolSelection,
        }
    }
}

/// Choices offered while `flow` is active.
pub fn choices(flow: SideFlow) -> Vec<SideFlowChoice> {
    match flow {
        SideFlow::None => Vec::new(),
        SideFlow::LostKey => vec![SideFlowChoice::NotifySecurity, SideFlowChoice::FoundKey],
        SideFlow::CallManager => vec![SideFlowChoice::CallManager],
        SideFlow::LateToWork => LATE_DELAYS
            .iter()
            .map(|d| SideFlowChoice::LateBy(d.to_string()))
            .collect(),
        SideFlow::CleaningToolSelection => {
            CleaningTool::ALL.into_iter().map(SideFlowChoice::Tool).collect()
        }
    }
}

fn can_enter(state: &FlowState) -> bool {
    state.outcome.is_none() && state.ticket == TicketStage::Chatting && !state.is_calling()
}

fn enter(state: &mut FlowState, flow: SideFlow, opening: &str, prompt: &str) -> Vec<Effect> {
    if !can_enter(state) {
        return Vec::new();
    }
    state.view = HomeView::Main;
    state.show_questions = false;
    state.suggestions.clear();
    state.side_flow = flow;
    state.messages.push(Message::user(opening));
    let mut effects = Vec::new();
    push_spoken(state, Message::assistant(prompt), &mut effects);
    tracing::info!(flow = flow.as_str(), "side-flow started");
    effects
}

pub(super) fn enter_lost_key(state: &mut FlowState) -> Vec<Effect> {
    enter(state, SideFlow::LostKey, "Forgot a key/card", LOST_KEY_PROMPT)
}

pub(super) fn enter_call_manager(state: &mut FlowState) -> Vec<Effect> {
    enter(state, SideFlow::CallManager, "Need assistance", ASSISTANCE_PROMPT)
}

pub(super) fn enter_late_to_work(state: &mut FlowState) -> Vec<Effect> {
    enter(state, SideFlow::LateToWork, "Running late", LATE_PROMPT)
}

pub(super) fn enter_cleaning_tools(state: &mut FlowState) -> Vec<Effect> {
    enter(
        state,
        SideFlow::CleaningToolSelection,
        "Cleaning tools",
        TOOLS_PROMPT,
    )
}

pub(super) fn choose(state: &mut FlowState, choice: SideFlowChoice) -> Vec<Effect> {
    if state.side_flow != choice.belongs_to() {
        tracing::debug!(
            active = state.side_flow.as_str(),
            choice = choice.label(),
            "ignoring choice for inactive side-flow"
        );
        return Vec::new();
    }
    match choice {
        SideFlowChoice::NotifySecurity => {
            let effects = reply(state, "Yes, notify Security", Message::assistant(SECURITY_NOTIFIED));
            state.history.record(HistoryCategory::LostKey);
            state.outcome = Some(SuccessKind::Security);
            effects
        }
        SideFlowChoice::FoundKey => reply(state, "No, I found it", Message::assistant(KEY_FOUND)),
        SideFlowChoice::CallManager => start_call(state),
        SideFlowChoice::LateBy(delay) => answer_late(state, delay),
        SideFlowChoice::Tool(tool) => {
            let answer = Message::assistant(tool.answer())
                .with_image(images::lookup(tool.image_key()));
            reply(state, tool.label(), answer)
        }
    }
}

/// Append the user's pick and the scripted answer, then leave the side-flow.
fn reply(state: &mut FlowState, picked: &str, answer: Message) -> Vec<Effect> {
    state.messages.push(Message::user(picked));
    let mut effects = Vec::new();
    push_spoken(state, answer, &mut effects);
    tracing::info!(flow = state.side_flow.as_str(), picked, "side-flow finished");
    state.side_flow = SideFlow::None;
    effects
}

pub(super) fn answer_late(state: &mut FlowState, delay: String) -> Vec<Effect> {
    let delay = delay.trim().to_string();
    if delay.is_empty() {
        return Vec::new();
    }
    let ack = Message::assistant(format!(
        "Thanks. I have told your manager you will arrive in {delay}."
    ));
    let effects = reply(state, &delay, ack);
    state.history.record(HistoryCategory::LateArrival);
    state.outcome = Some(SuccessKind::Late);
    effects
}

pub(super) fn start_call(state: &mut FlowState) -> Vec<Effect> {
    if state.is_calling() || state.outcome.is_some() {
        return Vec::new();
    }
    state.call_started = Some(Local::now());
    if state.side_flow == SideFlow::CallManager {
        state.side_flow = SideFlow::None;
    }
    tracing::info!("call to manager started");
    Vec::new()
}

pub(super) fn end_call(state: &mut FlowState) -> Vec<Effect> {
    let Some(started) = state.call_started.take() else {
        return Vec::new();
    };
    let secs = (Local::now() - started).num_seconds().max(0);
    let text = format!(
        "Call ended. Duration: {}. A follow-up note has been sent to your manager.",
        format_duration(secs)
    );
    let mut effects = Vec::new();
    push_spoken(state, Message::system(text), &mut effects);
    effects
}

/// `M:SS`.
pub fn format_duration(secs: i64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::{CleaningTool, SideFlowChoice, choices, format_duration};
    use crate::types::SideFlow;

    #[test]
    fn durations_pad_seconds() {
        assert_eq!(format_duration(42), "0:42");
        assert_eq!(format_duration(125), "2:05");
    }

    #[test]
    fn choices_follow_active_flow() {
        assert!(choices(SideFlow::None).is_empty());
        assert_eq!(
            choices(SideFlow::LostKey),
            [SideFlowChoice::NotifySecurity, SideFlowChoice::FoundKey]
        );
        let tools = choices(SideFlow::CleaningToolSelection);
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[2], SideFlowChoice::Tool(CleaningTool::Chemicals));
        assert_eq!(choices(SideFlow::LateToWork)[0].label(), "15 mins");
    }
}
