//! Runs the flow reducer against real collaborators: completions are spawned
//! on the tokio runtime and come back through a worker channel, speech goes to
//! the configured player. The reducer stays the only thing that mutates
//! [`FlowState`].

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::agent::provider::{ChatError, CompletionClient};
use crate::flow::{self, Action, Effect, FlowState, RequestId};
use crate::speech::SpeechPlayer;

pub(crate) enum WorkerEvent {
    Completion {
        request: RequestId,
        result: Result<String, ChatError>,
    },
}

pub struct Session {
    pub state: FlowState,
    client: Arc<dyn CompletionClient>,
    player: SpeechPlayer,
    tx: mpsc::Sender<WorkerEvent>,
    rx: mpsc::Receiver<WorkerEvent>,
    notice: Option<String>,
    speech_warned: bool,
}

impl Session {
    pub fn new(state: FlowState, client: Arc<dyn CompletionClient>, player: SpeechPlayer) -> Self {
        let (tx, rx) = mpsc::channel(16);
        Self {
            state,
            client,
            player,
            tx,
            rx,
            notice: None,
            speech_warned: false,
        }
    }

    /// Apply `action` and run its effects. Effects the terminal has to handle
    /// itself (file picking, input focus) are returned.
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        let effects = flow::reduce(&mut self.state, action);
        self.run_effects(effects)
    }

    /// Feed every finished completion back into the reducer without blocking.
    pub fn drain(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            let action = self.completion_action(event);
            out.extend(self.dispatch(action));
        }
        out
    }

    /// Wait for the next finished completion and apply it.
    pub async fn next_completion(&mut self) -> Option<Vec<Effect>> {
        let event = self.rx.recv().await?;
        let action = self.completion_action(event);
        Some(self.dispatch(action))
    }

    /// User-facing message from the last failure, shown once.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn player_mut(&mut self) -> &mut SpeechPlayer {
        &mut self.player
    }

    fn completion_action(&mut self, event: WorkerEvent) -> Action {
        match event {
            WorkerEvent::Completion {
                request,
                result: Ok(raw),
            } => Action::CompletionSucceeded { request, raw },
            WorkerEvent::Completion {
                request,
                result: Err(err),
            } => {
                if self.state.in_flight == Some(request) {
                    self.notice = Some(format!("Could not reach the assistant: {err}"));
                }
                Action::CompletionFailed {
                    request,
                    error: err.to_string(),
                }
            }
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>) -> Vec<Effect> {
        let mut ui = Vec::new();
        for effect in effects {
            match effect {
                Effect::RequestCompletion { request, messages } => {
                    let client = Arc::clone(&self.client);
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let result = client.complete(&messages).await;
                        let _ = tx.send(WorkerEvent::Completion { request, result }).await;
                    });
                }
                Effect::Speak(text) => self.speak(&text),
                other => ui.push(other),
            }
        }
        ui
    }

    fn speak(&mut self, text: &str) {
        if let Err(err) = self.player.speak(text, self.state.settings.language) {
            if !self.speech_warned {
                tracing::warn!(%err, "speech output unavailable");
                self.notice = Some(err.to_string());
                self.speech_warned = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::Session;
    use crate::agent::provider::{ChatError, CompletionClient, Message};
    use crate::flow::{Action, FlowState, QuickAction, Settings};
    use crate::speech::{NoSpeech, SpeechPlayer};
    use crate::types::{SideFlow, TicketStage};

    struct Scripted {
        calls: AtomicUsize,
        replies: Vec<&'static str>,
    }

    #[async_trait]
    impl CompletionClient for Scripted {
        async fn complete(&self, _messages: &[Message]) -> Result<String, ChatError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.replies.get(n) {
                Some(reply) => Ok(reply.to_string()),
                None => Err(ChatError::Status {
                    status: 500,
                    message: "Internal Server Error".into(),
                }),
            }
        }
    }

    fn session(replies: Vec<&'static str>) -> (Session, Arc<Scripted>) {
        let client = Arc::new(Scripted {
            calls: AtomicUsize::new(0),
            replies,
        });
        let session = Session::new(
            FlowState::default(),
            client.clone(),
            SpeechPlayer::new(Box::new(NoSpeech)),
        );
        (session, client)
    }

    #[tokio::test]
    async fn reply_is_applied_and_loading_cleared() {
        let (mut s, client) = session(vec!["Take today off? ||SUGGEST: Yes please, No - Tomorrow||"]);
        s.dispatch(Action::Quick(QuickAction::SickLeave));
        assert!(s.state.is_loading());

        s.next_completion().await.expect("channel open");

        assert!(!s.state.is_loading());
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(s.state.messages.len(), 2);
        assert_eq!(s.state.suggestions, ["Yes please", "No - Tomorrow"]);
    }

    #[tokio::test]
    async fn second_send_while_loading_makes_no_request() {
        let (mut s, client) = session(vec!["one", "two"]);
        s.dispatch(Action::SendText("first".into()));
        s.dispatch(Action::SendText("second".into()));
        s.next_completion().await.expect("channel open");

        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(s.state.messages.len(), 2);
    }

    #[tokio::test]
    async fn failure_sets_notice_and_keeps_history() {
        let (mut s, _client) = session(Vec::new());
        s.dispatch(Action::SendText("hello".into()));
        s.next_completion().await.expect("channel open");

        assert!(!s.state.is_loading());
        assert_eq!(s.state.messages.len(), 1);
        let notice = s.take_notice().expect("notice set");
        assert!(notice.contains("500"));
        assert!(s.take_notice().is_none());
    }

    #[tokio::test]
    async fn reply_after_reset_is_ignored() {
        let (mut s, _client) = session(vec!["stale answer"]);
        s.dispatch(Action::SendText("hello".into()));
        s.dispatch(Action::HomeReset);
        s.next_completion().await.expect("channel open");

        assert!(s.state.messages.is_empty());
        assert_eq!(s.state.ticket, TicketStage::Chatting);
    }

    #[tokio::test]
    async fn scripted_side_flow_never_calls_client() {
        let (mut s, client) = session(Vec::new());
        s.dispatch(Action::Quick(QuickAction::ForgotKey));
        assert_eq!(s.state.side_flow, SideFlow::LostKey);
        assert!(s.drain().is_empty());
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_speech_engine_warns_once() {
        let client = Arc::new(Scripted {
            calls: AtomicUsize::new(0),
            replies: vec!["Hi", "Again"],
        });
        let mut s = Session::new(
            FlowState::new(Settings {
                tts: true,
                ..Settings::default()
            }),
            client,
            SpeechPlayer::new(Box::new(NoSpeech)),
        );
        s.dispatch(Action::SendText("hello".into()));
        s.next_completion().await.expect("channel open");
        assert!(s.take_notice().is_some());

        s.dispatch(Action::SendText("hello".into()));
        s.next_completion().await.expect("channel open");
        assert!(s.take_notice().is_none());
    }
}
