use std::fmt;

use crate::domain::Variant;

/// Which floating surface a field opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Dropdown,
    Calendar,
}

impl OverlayKind {
    pub fn for_variant(variant: Variant) -> Option<Self> {
        match variant {
            Variant::Select => Some(OverlayKind::Dropdown),
            Variant::Date => Some(OverlayKind::Calendar),
            _ => None,
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverlayKind::Dropdown => "options",
            OverlayKind::Calendar => "a date",
        })
    }
}

/// What the footer reports about the last interaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ready,
    Editing(String),
    Choosing { label: String, kind: OverlayKind },
    Dismissed(String),
    Issues(usize),
    Saved,
    PendingExit,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => f.write_str("Ready. Press Ctrl+S to validate and save."),
            Status::Editing(label) => write!(f, "Editing {label}"),
            Status::Choosing { label, kind } => {
                write!(f, "Choosing {kind} for {label} (Esc or click outside to close)")
            }
            Status::Dismissed(label) => write!(f, "Closed {label}"),
            Status::Issues(count) => write!(f, "{count} issue(s) remaining"),
            Status::Saved => f.write_str("Form saved"),
            Status::PendingExit => {
                f.write_str("Unsaved changes. Press Ctrl+Q again to quit without saving.")
            }
        }
    }
}

/// The current status plus its rendered text, so frames borrow a `&str`.
#[derive(Debug, Clone)]
pub struct StatusLine {
    status: Status,
    message: String,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::from_status(Status::Ready)
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_status(status: Status) -> Self {
        let message = status.to_string();
        Self { status, message }
    }

    pub fn set(&mut self, status: Status) {
        if self.status != status {
            *self = Self::from_status(status);
        }
    }

    /// Report focus landing on a field, naming the overlay when it is open.
    pub fn focused(&mut self, variant: Variant, label: &str, open: bool) {
        let status = match OverlayKind::for_variant(variant) {
            Some(kind) if open => Status::Choosing {
                label: label.to_string(),
                kind,
            },
            _ => Status::Editing(label.to_string()),
        };
        self.set(status);
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choosing_names_the_overlay() {
        let mut line = StatusLine::new();
        line.focused(Variant::Date, "Birthday", true);
        assert_eq!(
            line.message(),
            "Choosing a date for Birthday (Esc or click outside to close)"
        );
        line.focused(Variant::Date, "Birthday", false);
        assert_eq!(line.message(), "Editing Birthday");
        line.focused(Variant::Text, "Name", true);
        assert_eq!(line.status(), &Status::Editing("Name".into()));
    }
}
