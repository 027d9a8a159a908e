//! Colored terminal output utilities.

use console::{Style, Term};

/// Tone of a status message.
#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Success,
    Warning,
    Error,
    Heading,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Plain => Style::new(),
            Self::Success => Style::new().green(),
            Self::Warning => Style::new().yellow(),
            Self::Error => Style::new().red(),
            Self::Heading => Style::new().cyan().bold(),
        }
    }
}

/// Terminal output formatter.
///
/// Status messages go to stderr. Command results go to stdout so they can be
/// piped into other tools.
pub(crate) struct Output {
    status: Term,
    results: Term,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            results: Term::stdout(),
        }
    }

    /// Print a command result line to stdout.
    pub(crate) fn print(&self, line: &str) -> std::io::Result<()> {
        self.results.write_line(line)
    }

    pub(crate) fn info(&self, msg: &str) {
        self.status_line(Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.status_line(Tone::Success, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.status_line(Tone::Warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.status_line(Tone::Error, msg);
    }

    pub(crate) fn heading(&self, msg: &str) {
        self.status_line(Tone::Heading, msg);
    }

    fn status_line(&self, tone: Tone, msg: &str) {
        // A closed stderr is not worth failing a command over.
        let _ = self
            .status
            .write_line(&tone.style().apply_to(msg).to_string());
    }
}
