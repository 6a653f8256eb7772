use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    History,
    Settings,
}

impl Tab {
    pub fn cycle(self) -> Self {
        match self {
            Self::Home => Self::History,
            Self::History => Self::Settings,
            Self::Settings => Self::Home,
        }
    }
}

/// Which panel of the home tab is open while no conversation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeView {
    #[default]
    Main,
    Problems,
    Instructions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TicketStage {
    #[default]
    Chatting,
    AwaitingDecision,
    ReviewingSummary,
    Submitted,
}

impl TicketStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chatting => "chatting",
            Self::AwaitingDecision => "awaiting_decision",
            Self::ReviewingSummary => "reviewing_summary",
            Self::Submitted => "submitted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SideFlow {
    #[default]
    None,
    LateToWork,
    CallManager,
    LostKey,
    CleaningToolSelection,
}

impl SideFlow {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::LateToWork => "late_to_work",
            Self::CallManager => "call_manager",
            Self::LostKey => "lost_key",
            Self::CleaningToolSelection => "cleaning_tools_selection",
        }
    }
}

/// Which terminal success screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessKind {
    Manager,
    Late,
    Security,
}

/// Category token carried by a `||COMMIT:KIND||` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    Sick,
    Late,
    Info,
}

impl CommitKind {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "SICK" => Some(Self::Sick),
            "LATE" => Some(Self::Late),
            "INFO" => Some(Self::Info),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sick => "SICK",
            Self::Late => "LATE",
            Self::Info => "INFO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    SickLeave,
    LateArrival,
}

impl ReportKind {
    pub fn commit_kind(self) -> CommitKind {
        match self {
            Self::SickLeave => CommitKind::Sick,
            Self::LateArrival => CommitKind::Late,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCategory {
    SickLeave,
    LateArrival,
    ItSupport,
    LostKey,
}

impl From<CommitKind> for HistoryCategory {
    fn from(kind: CommitKind) -> Self {
        match kind {
            CommitKind::Sick => Self::SickLeave,
            CommitKind::Late => Self::LateArrival,
            CommitKind::Info => Self::ItSupport,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus {
    Sent,
    Reviewing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Language {
    #[default]
    English,
    Swedish,
    Arabic,
}

impl Language {
    pub fn cycle(self) -> Self {
        match self {
            Self::English => Self::Swedish,
            Self::Swedish => Self::Arabic,
            Self::Arabic => Self::English,
        }
    }

    /// BCP-47 tag handed to speech engines.
    pub fn speech_tag(self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::Swedish => "sv-SE",
            Self::Arabic => "ar-SA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TextSize {
    #[default]
    Normal,
    Large,
    Huge,
}

impl TextSize {
    pub fn cycle(self) -> Self {
        match self {
            Self::Normal => Self::Large,
            Self::Large => Self::Huge,
            Self::Huge => Self::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum AccessMode {
    #[default]
    Standard,
    Vision,
    Hearing,
    Motor,
    Cognitive,
    ColorVision,
}

impl AccessMode {
    pub const ALL: [AccessMode; 6] = [
        Self::Vision,
        Self::Hearing,
        Self::Motor,
        Self::Cognitive,
        Self::ColorVision,
        Self::Standard,
    ];

    pub fn cycle(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionTopic {
    Tools,
    Safety,
    Waste,
    Emergency,
}

#[cfg(test)]
mod tests {
    use super::{AccessMode, CommitKind, HistoryCategory, Language, Tab};

    #[test]
    fn tab_cycle_wraps_back_home() {
        assert_eq!(Tab::Home.cycle().cycle().cycle(), Tab::Home);
    }

    #[test]
    fn commit_kind_tokens_are_case_sensitive() {
        assert_eq!(CommitKind::parse("LATE"), Some(CommitKind::Late));
        assert_eq!(CommitKind::parse("late"), None);
        assert_eq!(CommitKind::parse(" SICK"), None);
    }

    #[test]
    fn info_commit_maps_to_it_support() {
        assert_eq!(HistoryCategory::from(CommitKind::Info), HistoryCategory::ItSupport);
    }

    #[test]
    fn access_mode_cycle_visits_every_mode() {
        let mut mode = AccessMode::Standard;
        for _ in 0..AccessMode::ALL.len() {
            mode = mode.cycle();
        }
        assert_eq!(mode, AccessMode::Standard);
    }

    #[test]
    fn speech_tags_follow_language() {
        assert_eq!(Language::Swedish.speech_tag(), "sv-SE");
        assert_eq!(Language::Arabic.speech_tag(), "ar-SA");
    }
}
