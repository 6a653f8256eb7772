//! Projection of [`FlowState`] onto the actions the UI may offer right now.

use crate::directive;
use crate::i18n::Labels;
use crate::types::{HomeView, InstructionTopic, Tab, TicketStage};

use super::side_flow;
use super::{Action, FlowState, QuickAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub action: Action,
    /// Rendered emphasised (submit chips, confirm buttons).
    pub primary: bool,
}

impl MenuItem {
    fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
            primary: false,
        }
    }

    fn primary(label: impl Into<String>, action: Action) -> Self {
        Self {
            primary: true,
            ..Self::new(label, action)
        }
    }
}

pub fn items(state: &FlowState, labels: &Labels) -> Vec<MenuItem> {
    match state.tab {
        Tab::Home => home_items(state, labels),
        Tab::History => vec![MenuItem::new(labels.btn_back_home, Action::SwitchTab(Tab::Home))],
        Tab::Settings => settings_items(state, labels),
    }
}

fn home_items(state: &FlowState, labels: &Labels) -> Vec<MenuItem> {
    if state.is_calling() {
        return vec![MenuItem::primary(labels.btn_end_call, Action::EndCall)];
    }
    if state.active_instruction.is_some() {
        return vec![MenuItem::new(labels.btn_back, Action::DismissInstruction)];
    }
    if state.outcome.is_some() || state.ticket == TicketStage::Submitted {
        return vec![MenuItem::primary(labels.btn_back_home, Action::HomeReset)];
    }
    if state.ticket == TicketStage::ReviewingSummary {
        return vec![MenuItem::primary(labels.btn_send_manager, Action::ConfirmSend)];
    }

    let mut items = Vec::new();
    if state.pending_upload.is_some() {
        items.push(MenuItem::primary(labels.btn_upload_confirm, Action::ConfirmUpload));
        items.push(MenuItem::new(labels.btn_upload_cancel, Action::CancelUpload));
        return items;
    }
    if state.ticket == TicketStage::AwaitingDecision {
        if state.is_loading() {
            return items;
        }
        items.push(MenuItem::primary(labels.btn_submit_done, Action::ChooseSubmit));
        items.push(MenuItem::new(labels.btn_ask_more, Action::ChooseAskMore));
        return items;
    }

    items.extend(
        side_flow::choices(state.side_flow)
            .into_iter()
            .map(|c| MenuItem::primary(c.label().to_string(), Action::SideFlow(c))),
    );
    if !state.is_loading() {
        items.extend(state.suggestions.iter().map(|s| {
            let action = Action::SelectSuggestion(s.clone());
            if directive::is_done_suggestion(s) {
                MenuItem::primary(s.clone(), action)
            } else {
                MenuItem::new(s.clone(), action)
            }
        }));
    }
    if state.summary_card.is_some() {
        items.push(MenuItem::new(labels.btn_back, Action::DismissSummaryCard));
    }
    if state.messages.is_empty() {
        items.extend(idle_items(state, labels));
    }
    items
}

/// Entry points shown before any conversation has started.
fn idle_items(state: &FlowState, labels: &Labels) -> Vec<MenuItem> {
    let quick = |label: &str, q: QuickAction| MenuItem::new(label, Action::Quick(q));
    match state.view {
        HomeView::Main => {
            let mut items = vec![
                MenuItem::new(labels.btn_questions, Action::ToggleQuestions),
                MenuItem::new(labels.btn_instructions, Action::OpenView(HomeView::Instructions)),
            ];
            if state.show_questions {
                items.extend([
                    quick(labels.chip_sick, QuickAction::SickLeave),
                    quick(labels.chip_late, QuickAction::LateToWork),
                    quick(labels.chip_problem, QuickAction::ReportProblem),
                    quick(labels.chip_upload, QuickAction::UploadNote),
                ]);
            }
            items
        }
        HomeView::Problems => vec![
            quick(labels.chip_forgot, QuickAction::ForgotKey),
            quick(labels.chip_assist, QuickAction::NeedAssistance),
            quick(labels.chip_call, QuickAction::CallManager),
            quick(labels.chip_late_quick, QuickAction::QuickLateLog),
            MenuItem::new(labels.btn_back, Action::OpenView(HomeView::Main)),
        ],
        HomeView::Instructions => {
            let mut items: Vec<MenuItem> = [
                InstructionTopic::Tools,
                InstructionTopic::Safety,
                InstructionTopic::Waste,
                InstructionTopic::Emergency,
            ]
            .into_iter()
            .map(|t| MenuItem::new(labels.instruction(t).0, Action::OpenInstruction(t)))
            .collect();
            items.push(MenuItem::new(labels.btn_back, Action::OpenView(HomeView::Main)));
            items
        }
    }
}

fn settings_items(state: &FlowState, labels: &Labels) -> Vec<MenuItem> {
    let s = &state.settings;
    vec![
        MenuItem::new(
            format!("{}: {:?}", labels.label_language, s.language),
            Action::SetLanguage(s.language.cycle()),
        ),
        MenuItem::new(
            format!("{}: {:?}", labels.label_text_size, s.text_size),
            Action::SetTextSize(s.text_size.cycle()),
        ),
        MenuItem::new(
            format!("{}: {:?}", labels.label_mode, s.mode),
            Action::SelectMode(s.mode.cycle()),
        ),
        MenuItem::new(
            format!("{}: {}", labels.label_tts, if s.tts { "on" } else { "off" }),
            Action::ToggleTts,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::items;
    use crate::agent::provider::Message;
    use crate::flow::{Action, FlowState, QuickAction};
    use crate::i18n::Labels;
    use crate::types::{HomeView, Language, Tab, TicketStage};

    fn actions(state: &FlowState) -> Vec<Action> {
        items(state, Labels::for_language(Language::English))
            .into_iter()
            .map(|i| i.action)
            .collect()
    }

    #[test]
    fn idle_home_offers_entry_points() {
        let mut state = FlowState::default();
        assert_eq!(
            actions(&state),
            [Action::ToggleQuestions, Action::OpenView(HomeView::Instructions)]
        );
        state.show_questions = true;
        assert!(actions(&state).contains(&Action::Quick(QuickAction::SickLeave)));
    }

    #[test]
    fn awaiting_decision_hides_suggestion_chips() {
        let mut state = FlowState::default();
        state.ticket = TicketStage::AwaitingDecision;
        state.suggestions = vec!["I am done (Submit)".into(), "I have more questions".into()];
        assert_eq!(actions(&state), [Action::ChooseSubmit, Action::ChooseAskMore]);
    }

    #[test]
    fn decision_buttons_hidden_while_loading() {
        let mut state = FlowState::default();
        state.ticket = TicketStage::AwaitingDecision;
        state.in_flight = Some(3);
        assert!(actions(&state).is_empty());
    }

    #[test]
    fn suggestions_hidden_while_loading() {
        let mut state = FlowState::default();
        state.messages.push(Message::assistant("Take today off?"));
        state.suggestions = vec!["Yes".into()];
        assert_eq!(actions(&state), [Action::SelectSuggestion("Yes".into())]);
        state.in_flight = Some(1);
        assert!(actions(&state).is_empty());
    }

    #[test]
    fn review_and_success_screens_have_single_exit() {
        let mut state = FlowState::default();
        state.ticket = TicketStage::ReviewingSummary;
        assert_eq!(actions(&state), [Action::ConfirmSend]);
        state.ticket = TicketStage::Submitted;
        assert_eq!(actions(&state), [Action::HomeReset]);
    }

    #[test]
    fn settings_tab_cycles_values() {
        let mut state = FlowState::default();
        state.tab = Tab::Settings;
        let acts = actions(&state);
        assert_eq!(acts[0], Action::SetLanguage(Language::Swedish));
        assert!(acts.contains(&Action::ToggleTts));
    }
}
