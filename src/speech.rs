//! Speech sessions over pluggable engines.
//!
//! Both sessions are exclusive: starting a new one stops whatever the same
//! session was doing. The terminal build ships [`NoSpeech`], which reports
//! itself unavailable so callers surface a notice instead of failing.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Language;

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("{0} is not supported on this device")]
    Unsupported(&'static str),

    #[error("speech engine failed: {0}")]
    Engine(String),
}

pub trait SpeechSynthesizer: Send {
    fn is_available(&self) -> bool;
    fn speak(&mut self, text: &str, language: Language) -> Result<(), SpeechError>;
    fn pause(&mut self) -> Result<(), SpeechError>;
    fn resume(&mut self) -> Result<(), SpeechError>;
    fn cancel(&mut self);
}

pub trait SpeechRecognizer: Send {
    fn is_available(&self) -> bool;
    fn start(&mut self, language: Language) -> Result<(), SpeechError>;
    fn stop(&mut self);
    fn abort(&mut self);
}

// ── Synthesis ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
}

pub struct SpeechPlayer {
    engine: Box<dyn SpeechSynthesizer>,
    state: PlaybackState,
}

impl SpeechPlayer {
    pub fn new(engine: Box<dyn SpeechSynthesizer>) -> Self {
        Self {
            engine,
            state: PlaybackState::Idle,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Speak `text`, cutting off any utterance already playing.
    pub fn speak(&mut self, text: &str, language: Language) -> Result<(), SpeechError> {
        if !self.engine.is_available() {
            return Err(SpeechError::Unsupported("Text-to-speech"));
        }
        if self.state != PlaybackState::Idle {
            self.engine.cancel();
            self.state = PlaybackState::Idle;
        }
        let clean = strip_markdown(text);
        if clean.trim().is_empty() {
            return Ok(());
        }
        self.engine.speak(&clean, language)?;
        self.state = PlaybackState::Playing;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), SpeechError> {
        if self.state == PlaybackState::Playing {
            self.engine.pause()?;
            self.state = PlaybackState::Paused;
        }
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), SpeechError> {
        if self.state == PlaybackState::Paused {
            self.engine.resume()?;
            self.state = PlaybackState::Playing;
        }
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.state != PlaybackState::Idle {
            self.engine.cancel();
        }
        self.state = PlaybackState::Idle;
    }
}

static MARKDOWN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*_#`]").expect("valid markdown regex"));

/// Drop markdown emphasis characters so they are not read aloud.
pub fn strip_markdown(text: &str) -> String {
    MARKDOWN.replace_all(text, "").into_owned()
}

// ── Recognition ───────────────────────────────────────────────────────────────

pub struct ListeningSession {
    engine: Box<dyn SpeechRecognizer>,
    listening: bool,
    partial: String,
}

impl ListeningSession {
    pub fn new(engine: Box<dyn SpeechRecognizer>) -> Self {
        Self {
            engine,
            listening: false,
            partial: String::new(),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn start(&mut self, language: Language) -> Result<(), SpeechError> {
        if !self.engine.is_available() {
            return Err(SpeechError::Unsupported("Speech recognition"));
        }
        if self.listening {
            self.cancel();
        }
        self.engine.start(language)?;
        self.listening = true;
        Ok(())
    }

    /// Latest interim transcript from the engine.
    pub fn on_transcript(&mut self, text: &str) {
        if self.listening {
            self.partial = text.trim().to_string();
        }
    }

    /// Stop listening and append the transcript to `input`.
    pub fn finish(&mut self, input: &mut String) {
        if !self.listening {
            return;
        }
        self.engine.stop();
        self.listening = false;
        let transcript = std::mem::take(&mut self.partial);
        if transcript.is_empty() {
            return;
        }
        if !input.is_empty() && !input.ends_with(' ') {
            input.push(' ');
        }
        input.push_str(&transcript);
    }

    /// Stop listening and discard anything heard so far.
    pub fn cancel(&mut self) {
        if self.listening {
            self.engine.abort();
        }
        self.listening = false;
        self.partial.clear();
    }
}

/// Engine for hosts without speech support.
pub struct NoSpeech;

impl SpeechSynthesizer for NoSpeech {
    fn is_available(&self) -> bool {
        false
    }
    fn speak(&mut self, _text: &str, _language: Language) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported("Text-to-speech"))
    }
    fn pause(&mut self) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported("Text-to-speech"))
    }
    fn resume(&mut self) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported("Text-to-speech"))
    }
    fn cancel(&mut self) {}
}

impl SpeechRecognizer for NoSpeech {
    fn is_available(&self) -> bool {
        false
    }
    fn start(&mut self, _language: Language) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported("Speech recognition"))
    }
    fn stop(&mut self) {}
    fn abort(&mut self) {}
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default)]
    struct Calls(Arc<Mutex<Vec<String>>>);

    impl Calls {
        fn log(&self, call: impl Into<String>) {
            self.0.lock().unwrap().push(call.into());
        }
    }

    struct FakeEngine(Calls);

    impl SpeechSynthesizer for FakeEngine {
        fn is_available(&self) -> bool {
            true
        }
        fn speak(&mut self, text: &str, language: Language) -> Result<(), SpeechError> {
            self.0.log(format!("speak {} {text}", language.speech_tag()));
            Ok(())
        }
        fn pause(&mut self) -> Result<(), SpeechError> {
            self.0.log("pause");
            Ok(())
        }
        fn resume(&mut self) -> Result<(), SpeechError> {
            self.0.log("resume");
            Ok(())
        }
        fn cancel(&mut self) {
            self.0.log("cancel");
        }
    }

    impl SpeechRecognizer for FakeEngine {
        fn is_available(&self) -> bool {
            true
        }
        fn start(&mut self, _language: Language) -> Result<(), SpeechError> {
            self.0.log("start");
            Ok(())
        }
        fn stop(&mut self) {
            self.0.log("stop");
        }
        fn abort(&mut self) {
            self.0.log("abort");
        }
    }

    fn fake() -> (Box<FakeEngine>, Arc<Mutex<Vec<String>>>) {
        let calls = Calls::default();
        let log = Arc::clone(&calls.0);
        (Box::new(FakeEngine(calls)), log)
    }

    #[test]
    fn markdown_is_not_spoken() {
        assert_eq!(strip_markdown("Go to **Level 2** `now` #1"), "Go to Level 2 now 1");
    }

    #[test]
    fn player_is_never_playing_and_paused() {
        let (engine, log) = fake();
        let mut player = SpeechPlayer::new(engine);
        player.resume().unwrap();
        assert_eq!(player.state(), PlaybackState::Idle);

        player.speak("Hello", Language::Swedish).unwrap();
        assert_eq!(player.state(), PlaybackState::Playing);
        player.pause().unwrap();
        player.pause().unwrap();
        assert_eq!(player.state(), PlaybackState::Paused);
        player.resume().unwrap();
        assert_eq!(player.state(), PlaybackState::Playing);
        player.stop();
        assert_eq!(player.state(), PlaybackState::Idle);

        assert_eq!(
            *log.lock().unwrap(),
            ["speak sv-SE Hello", "pause", "resume", "cancel"]
        );
    }

    #[test]
    fn new_utterance_cuts_off_previous() {
        let (engine, log) = fake();
        let mut player = SpeechPlayer::new(engine);
        player.speak("one", Language::English).unwrap();
        player.pause().unwrap();
        player.speak("two", Language::English).unwrap();
        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(
            *log.lock().unwrap(),
            ["speak en-US one", "pause", "cancel", "speak en-US two"]
        );
    }

    #[test]
    fn unsupported_engines_report_at_point_of_use() {
        let mut player = SpeechPlayer::new(Box::new(NoSpeech));
        let err = player.speak("hi", Language::English).unwrap_err();
        assert!(matches!(err, SpeechError::Unsupported(_)));
        assert_eq!(player.state(), PlaybackState::Idle);

        let mut listen = ListeningSession::new(Box::new(NoSpeech));
        assert!(listen.start(Language::English).is_err());
        assert!(!listen.is_listening());
    }

    #[test]
    fn finished_transcript_is_appended_with_space() {
        let (engine, log) = fake();
        let mut listen = ListeningSession::new(engine);
        listen.start(Language::English).unwrap();
        listen.on_transcript(" I have a fever ");
        let mut input = String::from("Hello");
        listen.finish(&mut input);
        assert_eq!(input, "Hello I have a fever");
        assert!(!listen.is_listening());
        assert_eq!(*log.lock().unwrap(), ["start", "stop"]);
    }

    #[test]
    fn cancel_discards_partial_transcript() {
        let (engine, _log) = fake();
        let mut listen = ListeningSession::new(engine);
        listen.start(Language::English).unwrap();
        listen.on_transcript("half a sent");
        listen.cancel();
        let mut input = String::new();
        listen.finish(&mut input);
        assert!(input.is_empty());
    }

    #[test]
    fn restarting_aborts_previous_session() {
        let (engine, log) = fake();
        let mut listen = ListeningSession::new(engine);
        listen.start(Language::English).unwrap();
        listen.on_transcript("old");
        listen.start(Language::Arabic).unwrap();
        let mut input = String::new();
        listen.finish(&mut input);
        assert!(input.is_empty());
        assert_eq!(*log.lock().unwrap(), ["start", "abort", "start", "stop"]);
    }
}
