//! Static label tables. Flow logic only uses the ask-more and submit labels;
//! everything else is read by the renderer.

use crate::types::{HistoryCategory, HistoryStatus, InstructionTopic, Language, SuccessKind};

pub struct Labels {
    pub welcome: &'static str,
    pub greeting: &'static str,
    pub btn_questions: &'static str,
    pub btn_instructions: &'static str,
    pub tab_home: &'static str,
    pub tab_history: &'static str,
    pub tab_settings: &'static str,
    pub header_common: &'static str,
    pub header_workplace_guide: &'static str,
    pub header_select_problem: &'static str,
    pub header_review: &'static str,
    pub label_name: &'static str,
    pub label_type: &'static str,
    pub label_details: &'static str,
    pub label_language: &'static str,
    pub label_text_size: &'static str,
    pub label_mode: &'static str,
    pub label_tts: &'static str,
    pub btn_back: &'static str,
    pub btn_back_home: &'static str,
    pub btn_send_manager: &'static str,
    pub btn_submit_done: &'static str,
    pub btn_ask_more: &'static str,
    pub btn_end_call: &'static str,
    pub btn_upload_confirm: &'static str,
    pub btn_upload_cancel: &'static str,
    pub thinking: &'static str,
    pub status_listening: &'static str,
    pub input_placeholder: &'static str,
    pub success_manager: &'static str,
    pub success_late: &'static str,
    pub header_security: &'static str,
    pub security_msg: &'static str,
    pub chip_sick: &'static str,
    pub chip_late: &'static str,
    pub chip_problem: &'static str,
    pub chip_upload: &'static str,
    pub chip_forgot: &'static str,
    pub chip_assist: &'static str,
    pub chip_call: &'static str,
    pub chip_late_quick: &'static str,
    pub ticket_sick: &'static str,
    pub ticket_late: &'static str,
    pub ticket_it: &'static str,
    pub ticket_key: &'static str,
    pub status_sent: &'static str,
    pub status_review: &'static str,
    pub status_done: &'static str,
    instr: [(&'static str, &'static str); 4],
}

impl Labels {
    pub fn for_language(language: Language) -> &'static Labels {
        match language {
            Language::English => &ENGLISH,
            Language::Swedish => &SWEDISH,
            Language::Arabic => &ARABIC,
        }
    }

    pub fn success_title(&self, kind: SuccessKind) -> &'static str {
        match kind {
            SuccessKind::Manager => self.success_manager,
            SuccessKind::Late => self.success_late,
            SuccessKind::Security => self.header_security,
        }
    }

    pub fn ticket_title(&self, category: HistoryCategory) -> &'static str {
        match category {
            HistoryCategory::SickLeave => self.ticket_sick,
            HistoryCategory::LateArrival => self.ticket_late,
            HistoryCategory::ItSupport => self.ticket_it,
            HistoryCategory::LostKey => self.ticket_key,
        }
    }

    pub fn status(&self, status: HistoryStatus) -> &'static str {
        match status {
            HistoryStatus::Sent => self.status_sent,
            HistoryStatus::Reviewing => self.status_review,
            HistoryStatus::Done => self.status_done,
        }
    }

    /// Title and body of a workplace-guide card.
    pub fn instruction(&self, topic: InstructionTopic) -> (&'static str, &'static str) {
        let idx = match topic {
            InstructionTopic::Tools => 0,
            InstructionTopic::Safety => 1,
            InstructionTopic::Waste => 2,
            InstructionTopic::Emergency => 3,
        };
        self.instr[idx]
    }
}

/// True when `text` is any language's ask-more label or the typed phrase.
pub fn is_ask_more_phrase(text: &str) -> bool {
    let text = text.trim();
    text == "I have more questions"
        || [&ENGLISH, &SWEDISH, &ARABIC]
            .iter()
            .any(|l| l.btn_ask_more == text)
}

static ENGLISH: Labels = Labels {
    welcome: "Hi",
    greeting: "How can I help you today?",
    btn_questions: "Quick Questions",
    btn_instructions: "Instruction Files",
    tab_home: "Home",
    tab_history: "History",
    tab_settings: "Settings",
    header_common: "Common questions",
    header_workplace_guide: "Workplace Guide",
    header_select_problem: "Select a problem",
    header_review: "Review your Report",
    label_name: "Name",
    label_type: "Type",
    label_details: "Details",
    label_language: "Language",
    label_text_size: "Text Size",
    label_mode: "Accessibility",
    label_tts: "Read aloud",
    btn_back: "Back",
    btn_back_home: "Back to Home",
    btn_send_manager: "Send to Manager",
    btn_submit_done: "I am done (Submit)",
    btn_ask_more: "Ask More Questions",
    btn_end_call: "End call",
    btn_upload_confirm: "Upload doctor's note",
    btn_upload_cancel: "Remove file",
    thinking: "Thinking...",
    status_listening: "Listening...",
    input_placeholder: "Ask me about anything",
    success_manager: "Sent to Manager! Get well soon.",
    success_late: "Logged Successfully! Get here safely.",
    header_security: "Security Notified!",
    security_msg: "Please proceed to the front desk.",
    chip_sick: "Sick leave",
    chip_late: "Late to work",
    chip_problem: "Report a problem",
    chip_upload: "Upload doctor's note",
    chip_forgot: "Forgot a key/card",
    chip_assist: "Need assistance",
    chip_call: "Call my manager",
    chip_late_quick: "Running late (quick log)",
    ticket_sick: "Sick Leave",
    ticket_late: "Late Arrival",
    ticket_it: "IT Support",
    ticket_key: "Lost Key",
    status_sent: "Sent",
    status_review: "Reviewing",
    status_done: "Done",
    instr: [
        ("Cleaning Tools", "Red cloth = Toilets.\nBlue cloth = Desks."),
        ("Safety Rules", "Wet floor sign must be visible."),
        ("Waste Sorting", "Black bag = General.\nGreen bag = Food."),
        ("Emergency", "Call 112.\nMeeting: Main Entrance."),
    ],
};

static SWEDISH: Labels = Labels {
    welcome: "Hej",
    greeting: "Hur kan jag hjälpa dig idag?",
    btn_questions: "Snabba Frågor",
    btn_instructions: "Instruktioner",
    tab_home: "Hem",
    tab_history: "Historik",
    tab_settings: "Inställningar",
    header_common: "Vanliga frågor",
    header_workplace_guide: "Arbetsplatsguide",
    header_select_problem: "Välj ett problem",
    header_review: "Granska din rapport",
    label_name: "Namn",
    label_type: "Typ",
    label_details: "Detaljer",
    label_language: "Språk",
    label_text_size: "Textstorlek",
    label_mode: "Tillgänglighet",
    label_tts: "Läs upp",
    btn_back: "Tillbaka",
    btn_back_home: "Tillbaka till Hem",
    btn_send_manager: "Skicka till chefen",
    btn_submit_done: "Jag är klar (Skicka)",
    btn_ask_more: "Ställ fler frågor",
    btn_end_call: "Avsluta samtal",
    btn_upload_confirm: "Ladda upp läkarintyg",
    btn_upload_cancel: "Ta bort fil",
    thinking: "Tänker...",
    status_listening: "Lyssnar...",
    input_placeholder: "Fråga mig om vad som helst",
    success_manager: "Skickat till chefen! Krya på dig.",
    success_late: "Loggat! Ta dig hit säkert.",
    header_security: "Säkerhetsvakt meddelad!",
    security_msg: "Vänligen gå till receptionen.",
    chip_sick: "Sjukfrånvaro",
    chip_late: "Sen ankomst",
    chip_problem: "Rapportera problem",
    chip_upload: "Ladda upp läkarintyg",
    chip_forgot: "Glömt nyckel/kort",
    chip_assist: "Behöver hjälp",
    chip_call: "Ring min chef",
    chip_late_quick: "Försenad (snabblogg)",
    ticket_sick: "Sjukfrånvaro",
    ticket_late: "Sen Ankomst",
    ticket_it: "IT-stöd",
    ticket_key: "Förlorad Nyckel",
    status_sent: "Skickad",
    status_review: "Granskas",
    status_done: "Klar",
    instr: [
        ("Städverktyg", "Röd trasa = Toaletter.\nBlå trasa = Skrivbord."),
        ("Säkerhetsregler", "Skylt för halt golv måste synas."),
        ("Sopsortering", "Svart påse = Allmänt.\nGrön påse = Mat."),
        ("Nödsituation", "Ring 112.\nSamlingsplats: Huvudentrén."),
    ],
};

static ARABIC: Labels = Labels {
    welcome: "مرحبا",
    greeting: "كيف يمكنني مساعدتك اليوم؟",
    btn_questions: "أسئلة سريعة",
    btn_instructions: "ملفات التعليمات",
    tab_home: "الرئيسية",
    tab_history: "السجل",
    tab_settings: "الإعدادات",
    header_common: "الأسئلة الشائعة",
    header_workplace_guide: "دليل العمل",
    header_select_problem: "حدد مشكلة",
    header_review: "مراجعة تقريرك",
    label_name: "الاسم",
    label_type: "النوع",
    label_details: "التفاصيل",
    label_language: "اللغة",
    label_text_size: "حجم النص",
    label_mode: "إمكانية الوصول",
    label_tts: "القراءة بصوت عال",
    btn_back: "رجوع",
    btn_back_home: "العودة للرئيسية",
    btn_send_manager: "إرسال للمدير",
    btn_submit_done: "أنا انتهيت (إرسال)",
    btn_ask_more: "طرح المزيد من الأسئلة",
    btn_end_call: "إنهاء المكالمة",
    btn_upload_confirm: "رفع تقرير طبي",
    btn_upload_cancel: "إزالة الملف",
    thinking: "جاري التفكير...",
    status_listening: "يستمع...",
    input_placeholder: "اسألني عن أي شيء",
    success_manager: "تم الإرسال للمدير! أتمنى لك الشفاء.",
    success_late: "تم التسجيل! طريقاً آمناً.",
    header_security: "تم إبلاغ الأمن!",
    security_msg: "يرجى التوجه للاستقبال.",
    chip_sick: "إجازة مرضية",
    chip_late: "تأخر عن العمل",
    chip_problem: "إبلاغ عن مشكلة",
    chip_upload: "رفع تقرير طبي",
    chip_forgot: "نسيت مفتاح/بطاقة",
    chip_assist: "بحاجة لمساعدة",
    chip_call: "الاتصال بمديري",
    chip_late_quick: "متأخر (تسجيل سريع)",
    ticket_sick: "إجازة مرضية",
    ticket_late: "تأخر عن العمل",
    ticket_it: "دعم فني",
    ticket_key: "مفتاح مفقود",
    status_sent: "تم الإرسال",
    status_review: "قيد المراجعة",
    status_done: "تم",
    instr: [
        ("أدوات التنظيف", "قماش أحمر = دورات مياه.\nقماش أزرق = مكاتب."),
        ("قواعد السلامة", "يجب وضع علامة أرضية مبللة."),
        ("فرز النفايات", "كيس أسود = عام.\nكيس أخضر = طعام."),
        ("طوارئ", "اتصل بـ 112.\nالتجمع: المدخل الرئيسي."),
    ],
};

#[cfg(test)]
mod tests {
    use super::{Labels, is_ask_more_phrase};
    use crate::types::{HistoryCategory, InstructionTopic, Language};

    #[test]
    fn ask_more_matches_every_language() {
        assert!(is_ask_more_phrase("Ask More Questions"));
        assert!(is_ask_more_phrase("Ställ fler frågor"));
        assert!(is_ask_more_phrase(" I have more questions "));
        assert!(!is_ask_more_phrase("ask more questions"));
    }

    #[test]
    fn ticket_titles_are_localised() {
        let sv = Labels::for_language(Language::Swedish);
        assert_eq!(sv.ticket_title(HistoryCategory::LostKey), "Förlorad Nyckel");
    }

    #[test]
    fn instruction_cards_have_title_and_body() {
        let (title, body) = Labels::for_language(Language::English).instruction(InstructionTopic::Waste);
        assert_eq!(title, "Waste Sorting");
        assert!(body.contains("Green bag"));
    }
}
