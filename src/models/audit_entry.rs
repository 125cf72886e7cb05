#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuditKind {
    Success,
    Failure,
    Info,
}

impl AuditKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "ok",
            Self::Failure => "rejected",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AuditEntry {
    pub kind: AuditKind,
    pub message: String,
    pub timestamp: String,
}

impl AuditEntry {
    pub(crate) fn new(kind: AuditKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: chrono::Local::now().to_rfc3339(),
        }
    }

    /// `HH:MM:SS` for list display.
    pub(crate) fn short_time(&self) -> String {
        chrono::DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }
}
