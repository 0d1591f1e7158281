//! Terminal output rendering.

use std::io::{self, Write};

/// ANSI escape code for dim text (used for usage lines).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Trait for rendering chat output.
///
/// This abstraction keeps the session loop independent of terminal
/// capabilities: a plain renderer for piped output, a styled one for
/// interactive use.
pub trait Renderer {
    /// Print a block of response text.
    fn print_text(&mut self, text: &str);

    /// Print a dimmed usage/accounting line.
    fn print_usage(&mut self, line: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new renderer with ANSI styling enabled.
    pub fn new() -> Self {
        Self { use_color: true }
    }

    /// Creates a new renderer with the specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_text(&mut self, text: &str) {
        println!("{text}");
        self.flush();
    }

    fn print_usage(&mut self, line: &str) {
        if self.use_color {
            println!("{ANSI_DIM}{line}{ANSI_RESET}");
        } else {
            println!("{line}");
        }
        self.flush();
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
