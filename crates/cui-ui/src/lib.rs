//! # cui-ui
//!
//! Terminal UI pieces shared by the `cui` commands: spinners, styled text
//! and status icons.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cui_ui::{Spinner, Style, StyledText};
//!
//! let spinner = Spinner::builder("Migrating").start();
//! // ... do work ...
//! spinner.finish();
//! println!("{}", "Button.tsx".with_style(Style::Green));
//! ```

mod spinner;
mod style;

pub use spinner::{Spinner, SpinnerBuilder};
pub use style::{Style, StyledText, icons};

pub use colored::Colorize;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Colorize,
        spinner::{Spinner, SpinnerBuilder},
        style::{Style, StyledText},
    };
}
