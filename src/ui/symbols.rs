pub(crate) struct Symbols {
    pub spinner_frames: &'static [&'static str],
    pub prompt: &'static str,
    pub selected: &'static str,
    pub assistant: &'static str,
    pub system: &'static str,
    pub image: &'static str,
    pub attachment: &'static str,
    pub phone: &'static str,
    pub mic: &'static str,
    pub check: &'static str,
    pub ellipsis: &'static str,
    pub bullet: &'static str,
    pub warning: &'static str,
}

impl Symbols {
    pub fn current() -> &'static Self {
        #[cfg(windows)]
        {
            let is_modern = std::env::var("WT_SESSION").is_ok()
                || std::env::var("TERM_PROGRAM").is_ok()
                || std::env::var("ALACRITTY_WINDOW_ID").is_ok();
            if !is_modern {
                return &ASCII_SYMBOLS;
            }
        }
        &UNICODE_SYMBOLS
    }
}

const UNICODE_SYMBOLS: Symbols = Symbols {
    spinner_frames: &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"],
    prompt: "❯",
    selected: "▶",
    assistant: "◆",
    system: "·",
    image: "🖼",
    attachment: "📎",
    phone: "📞",
    mic: "🎤",
    check: "✅",
    ellipsis: "…",
    bullet: "•",
    warning: "⚠",
};

#[cfg_attr(not(windows), allow(dead_code))]
const ASCII_SYMBOLS: Symbols = Symbols {
    spinner_frames: &["|", "/", "-", "\\"],
    prompt: ">",
    selected: ">",
    assistant: "*",
    system: "-",
    image: "[img]",
    attachment: "[file]",
    phone: "[call]",
    mic: "[mic]",
    check: "[ok]",
    ellipsis: "...",
    bullet: "*",
    warning: "!",
};
