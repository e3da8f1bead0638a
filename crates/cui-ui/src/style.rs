use colored::{ColoredString, Colorize};

/// Named colours used across the CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Red,
    Green,
    Yellow,
    Cyan,
    Dim,
}

/// Apply a [`Style`] to anything string-like.
pub trait StyledText {
    fn with_style(&self, style: Style) -> ColoredString;
}

impl<T: AsRef<str> + ?Sized> StyledText for T {
    fn with_style(&self, style: Style) -> ColoredString {
        let text = self.as_ref();
        match style {
            Style::Red => text.red(),
            Style::Green => text.green(),
            Style::Yellow => text.yellow(),
            Style::Cyan => text.cyan(),
            Style::Dim => text.dimmed(),
        }
    }
}

/// Status icons printed in front of per-file result lines.
pub mod icons {
    use colored::{ColoredString, Colorize};

    pub fn success() -> ColoredString {
        "✓".green().bold()
    }

    pub fn warning() -> ColoredString {
        "!".yellow().bold()
    }

    pub fn error() -> ColoredString {
        "✗".red().bold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_style_keeps_text() {
        colored::control::set_override(false);
        assert_eq!("Button.tsx".with_style(Style::Green).to_string(), "Button.tsx");
        assert_eq!(
            String::from("Card.jsx").with_style(Style::Dim).to_string(),
            "Card.jsx"
        );
    }
}
