#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Listening,
    Speaking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub label: String,
}

/// One label slot; the latest `show` or `hide` wins.
#[derive(Debug, Default, Clone)]
pub struct StatusIndicator {
    current: Option<Status>,
}

impl StatusIndicator {
    pub fn show(&mut self, kind: StatusKind, label: impl Into<String>) -> &Status {
        self.current.insert(Status {
            kind,
            label: label.into(),
        })
    }

    pub fn hide(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Status> {
        self.current.as_ref()
    }

    pub fn is_hidden(&self) -> bool {
        self.current.is_none()
    }
}

pub fn listening_label() -> String {
    "🎙 Listening...".to_string()
}

pub fn speaking_label(assistant: &str) -> String {
    format!("🗣 {} is speaking...", assistant)
}
