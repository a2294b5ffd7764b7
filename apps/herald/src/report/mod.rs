//! # Report Module
//!
//! Builds the matchup and population reports as formatted text. The same
//! [`Report`] is printed to the console or posted as a Discord embed.

pub mod matchup;
pub mod population;
mod text;

pub use text::FormattedText;

/// A named block below the description (an embed field on Discord).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: FormattedText,
}

/// A rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub description: FormattedText,
    pub fields: Vec<Field>,
    /// Embed accent color.
    pub color: Option<u32>,
}

impl Report {
    /// Title, description and fields as one text, for printing.
    pub fn to_text(&self) -> FormattedText {
        let mut ft = FormattedText::new();
        ft.bold(self.title.as_str()).plain("\n\n");
        ft.append(self.description.clone());
        for field in &self.fields {
            ft.plain("\n\n").bold(field.name.as_str()).plain("\n");
            ft.append(field.value.clone());
        }
        ft
    }
}
