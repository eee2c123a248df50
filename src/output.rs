//! Terminal formatting helpers: colors, banners, and the diagnostic
//! prefixes used across the tool. All coloring goes through [`Painter`],
//! which carries a single capability flag instead of any global state.

use std::fmt::Display;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Default,
    Red,
    Yellow,
    Cyan,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightMagenta,
    LightCyan,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Color::Default => "\x1b[39m",
            Color::Red => "\x1b[31m",
            Color::Yellow => "\x1b[33m",
            Color::Cyan => "\x1b[36m",
            Color::LightRed => "\x1b[91m",
            Color::LightGreen => "\x1b[92m",
            Color::LightYellow => "\x1b[93m",
            Color::LightBlue => "\x1b[94m",
            Color::LightMagenta => "\x1b[95m",
            Color::LightCyan => "\x1b[96m",
        }
    }
}

/// Stateless color renderer. Constructed once near the entry point and
/// passed down to anything that formats user-facing text.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enable colors only when stdout is an interactive terminal.
    pub fn auto(no_color: bool) -> Self {
        Self::new(!no_color && std::io::stdout().is_terminal())
    }

    pub fn paint(&self, item: impl Display, color: Color) -> String {
        if self.enabled && color != Color::Default {
            format!("{}{item}{}", color.code(), Color::Default.code())
        } else {
            item.to_string()
        }
    }

    /// A three-line banner surrounding `text` with `banner_char`.
    pub fn banner(&self, text: &str, banner_char: char, color: Color) -> String {
        // +4 accounts for the char and space on each side of the text.
        let border: String = std::iter::repeat(banner_char)
            .take(text.chars().count() + 4)
            .collect();
        self.paint(
            format!("{border}\n{banner_char} {text} {banner_char}\n{border}"),
            color,
        )
    }

    pub fn print_critical(&self, msg: impl Display) {
        eprintln!("{}", self.paint(format!("TOOL ERROR: {msg}"), Color::Red));
    }

    pub fn print_error(&self, msg: impl Display) {
        eprintln!("{}", self.paint(format!("ERROR: {msg}."), Color::LightRed));
    }

    pub fn print_warning(&self, msg: impl Display) {
        eprintln!(
            "{}",
            self.paint(format!("WARNING: {msg}."), Color::LightYellow)
        );
    }
}
