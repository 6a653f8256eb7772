use crate::agent::provider::Message;
use crate::directive::{self, DirectiveBundle};
use crate::types::{CommitKind, HistoryCategory, ReportKind, SuccessKind, TicketStage};

use super::{Effect, FlowState, push_spoken};

pub const ASK_MORE_ACK: &str = "Okay, what else can I help with?";

const DEFAULT_SICK_DETAIL: &str = "User reported not feeling well and requested sick leave.";

/// In-progress sick-leave or late-arrival request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub kind: ReportKind,
    pub detail: String,
    pub arrival_estimate: Option<String>,
}

impl ReportDraft {
    pub fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            detail: String::new(),
            arrival_estimate: None,
        }
    }

    fn note_reply(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.detail.is_empty() {
            self.detail.push_str("; ");
        }
        self.detail.push_str(text);

        if self.kind == ReportKind::LateArrival {
            let lower = text.to_lowercase();
            if !lower.contains("late") && !lower.contains("done") {
                self.arrival_estimate = Some(text.to_string());
            }
        }
    }

    /// Details line shown on the review screen.
    pub fn review_details(&self) -> String {
        match self.kind {
            ReportKind::LateArrival => match &self.arrival_estimate {
                Some(est) if est.ends_with(|c: char| c.is_ascii_digit()) => {
                    format!("Arriving in {est} mins")
                }
                Some(est) => format!("Arriving in {est}"),
                None if !self.detail.is_empty() => self.detail.clone(),
                None => "Arrival time not given".to_string(),
            },
            ReportKind::SickLeave if self.detail.is_empty() => DEFAULT_SICK_DETAIL.to_string(),
            ReportKind::SickLeave => self.detail.clone(),
        }
    }
}

/// Category a submission is filed under: an explicit commit directive wins,
/// then the draft kind, then sick leave.
pub fn commit_category(draft: Option<&ReportDraft>, pending: Option<CommitKind>) -> CommitKind {
    pending
        .or_else(|| draft.map(|d| d.kind.commit_kind()))
        .unwrap_or(CommitKind::Sick)
}

/// Details for the review screen when there may be no draft.
pub fn review_details(state: &FlowState) -> String {
    match (&state.draft, &state.summary_card) {
        (Some(draft), _) => draft.review_details(),
        (None, Some(summary)) => summary.clone(),
        (None, None) => DEFAULT_SICK_DETAIL.to_string(),
    }
}

pub(super) fn start_draft(state: &mut FlowState, kind: ReportKind) {
    if state.ticket != TicketStage::Chatting {
        return;
    }
    state.draft = Some(ReportDraft::new(kind));
    state.pending_commit = None;
}

pub(super) fn note_user_reply(state: &mut FlowState, text: &str) {
    if state.ticket != TicketStage::Chatting {
        return;
    }
    if let Some(draft) = state.draft.as_mut() {
        draft.note_reply(text);
    }
}

pub(super) fn note_commit(state: &mut FlowState, kind: CommitKind) {
    if matches!(
        state.ticket,
        TicketStage::ReviewingSummary | TicketStage::Submitted
    ) {
        return;
    }
    tracing::info!(kind = kind.as_str(), "commit signal received");
    state.pending_commit = Some(kind);
    if state.draft.is_none() {
        let kind = match kind {
            CommitKind::Sick => Some(ReportKind::SickLeave),
            CommitKind::Late => Some(ReportKind::LateArrival),
            CommitKind::Info => None,
        };
        state.draft = kind.map(ReportDraft::new);
    }
}

/// Re-evaluated after every processed assistant message.
pub(super) fn after_cycle(state: &mut FlowState, bundle: &DirectiveBundle) {
    if state.ticket == TicketStage::Chatting && directive::is_report_complete(bundle) {
        mark_ready(state);
    }
}

fn mark_ready(state: &mut FlowState) {
    state.ticket = TicketStage::AwaitingDecision;
    tracing::info!(stage = state.ticket.as_str(), "report ready for decision");
}

/// A reply still in flight could rewrite the draft, so the decision waits for it.
pub(super) fn choose_submit(state: &mut FlowState) -> Vec<Effect> {
    if state.ticket != TicketStage::AwaitingDecision || state.is_loading() {
        return Vec::new();
    }
    state.ticket = TicketStage::ReviewingSummary;
    state.suggestions.clear();
    Vec::new()
}

pub(super) fn ask_more(state: &mut FlowState) -> Vec<Effect> {
    if state.ticket != TicketStage::AwaitingDecision || state.is_loading() {
        return Vec::new();
    }
    state.ticket = TicketStage::Chatting;
    state.suggestions.clear();
    let mut effects = Vec::new();
    push_spoken(state, Message::assistant(ASK_MORE_ACK), &mut effects);
    effects.push(Effect::FocusInput);
    effects
}

pub(super) fn confirm_send(state: &mut FlowState) -> Vec<Effect> {
    if state.ticket != TicketStage::ReviewingSummary {
        return Vec::new();
    }
    let kind = commit_category(state.draft.as_ref(), state.pending_commit);
    state.history.record(HistoryCategory::from(kind));
    state.outcome = Some(match kind {
        CommitKind::Late => SuccessKind::Late,
        CommitKind::Sick | CommitKind::Info => SuccessKind::Manager,
    });
    state.ticket = TicketStage::Submitted;
    state.suggestions.clear();
    tracing::info!(kind = kind.as_str(), "report submitted");
    Vec::new()
}
