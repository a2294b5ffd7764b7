//! # Formatted Text
//!
//! A report is built once as a list of styled spans and rendered per target:
//! Discord markdown, plain text, or an ANSI terminal.

/// Style of one span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Plain,
    Bold,
    Underline,
    Italic,
}

impl Style {
    const fn markdown(self) -> &'static str {
        match self {
            Style::Plain => "",
            Style::Bold => "**",
            Style::Underline => "__",
            Style::Italic => "*",
        }
    }

    const fn ansi(self) -> &'static str {
        match self {
            Style::Plain => "",
            Style::Bold => "\x1b[1m",
            Style::Underline => "\x1b[4m",
            Style::Italic => "\x1b[3m",
        }
    }
}

const ANSI_RESET: &str = "\x1b[0m";

/// Shortcodes used by the reports and their unicode rendering.
const EMOJI: &[(&str, &str)] = &[
    (":red_square:", "\u{1F7E5}"),
    (":orange_square:", "\u{1F7E7}"),
    (":yellow_square:", "\u{1F7E8}"),
    (":green_square:", "\u{1F7E9}"),
    (":blue_square:", "\u{1F7E6}"),
    (":arrow_upper_right:", "\u{2197}\u{FE0F}"),
    (":arrow_lower_right:", "\u{2198}\u{FE0F}"),
    (":left_right_arrow:", "\u{2194}\u{FE0F}"),
    (":negative_squared_cross_mark:", "\u{274E}"),
];

/// Replace known emoji shortcodes with unicode. Unknown codes stay as-is.
fn emojize(text: &str) -> String {
    EMOJI
        .iter()
        .fold(text.to_string(), |acc, (code, glyph)| acc.replace(code, glyph))
}

/// A run of text in one style.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Span {
    style: Style,
    text: String,
}

/// Ordered list of styled spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedText {
    spans: Vec<Span>,
}

impl FormattedText {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, style: Style, text: impl Into<String>) -> &mut Self {
        self.spans.push(Span {
            style,
            text: text.into(),
        });
        self
    }

    pub fn plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Style::Plain, text)
    }

    pub fn bold(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Style::Bold, text)
    }

    pub fn underline(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Style::Underline, text)
    }

    pub fn italic(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Style::Italic, text)
    }

    /// Plain when `underlined` is false.
    pub fn underline_if(&mut self, underlined: bool, text: impl Into<String>) -> &mut Self {
        if underlined {
            self.underline(text)
        } else {
            self.plain(text)
        }
    }

    pub fn append(&mut self, other: FormattedText) -> &mut Self {
        self.spans.extend(other.spans);
        self
    }

    /// Discord markdown. Special characters are not escaped.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            let mark = span.style.markdown();
            out.push_str(mark);
            out.push_str(&span.text);
            out.push_str(mark);
        }
        out
    }

    /// Text with all styling dropped.
    pub fn to_plain(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// ANSI-styled text with emoji rendered to unicode.
    pub fn to_console(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            let text = emojize(&span.text);
            match span.style {
                Style::Plain => out.push_str(&text),
                style => {
                    out.push_str(style.ansi());
                    out.push_str(&text);
                    out.push_str(ANSI_RESET);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FormattedText {
        let mut ft = FormattedText::new();
        ft.bold("Tier 2")
            .plain("\n:green_square: ")
            .underline("Riverside")
            .plain(" ")
            .italic("changed");
        ft
    }

    #[test]
    fn markdown_wraps_styles() {
        assert_eq!(
            sample().to_markdown(),
            "**Tier 2**\n:green_square: __Riverside__ *changed*"
        );
    }

    #[test]
    fn plain_strips_markup() {
        assert_eq!(sample().to_plain(), "Tier 2\n:green_square: Riverside changed");
    }

    #[test]
    fn console_renders_ansi_and_emoji() {
        let console = sample().to_console();
        assert!(console.starts_with("\x1b[1mTier 2\x1b[0m"));
        assert!(console.contains("\u{1F7E9}"));
        assert!(console.contains("\x1b[4mRiverside\x1b[0m"));
        assert!(!console.contains(":green_square:"));
    }

    #[test]
    fn underline_if_only_styles_the_target() {
        let mut ft = FormattedText::new();
        ft.underline_if(true, "Riverside").plain(", ").underline_if(false, "Vabbi");
        assert_eq!(ft.to_markdown(), "__Riverside__, Vabbi");
    }

    #[test]
    fn unknown_shortcodes_survive() {
        assert_eq!(emojize(":not_an_emoji: :blue_square:"), ":not_an_emoji: \u{1F7E6}");
    }
}
