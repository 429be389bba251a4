//! Messages surfaced to the caller alongside the analysis.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Soft-empty state, e.g. no images in the document
    Info,
    /// Recoverable failure of one item
    Warning,
    /// Recoverable failure of a whole phase
    Error,
}

/// A message produced during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Page the message is about, if any
    pub page: Option<u32>,
    /// Message text
    pub message: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    /// Warning notice.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    /// Error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            page: None,
            message: message.into(),
        }
    }

    /// Attribute the notice to a page.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        match self.page {
            Some(page) => write!(f, "[{}] page {}: {}", level, page, self.message),
            None => write!(f, "[{}] {}", level, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_display() {
        let n = Notice::warning("bad image").on_page(4);
        assert_eq!(n.to_string(), "[warning] page 4: bad image");
        assert_eq!(Notice::info("no tables").to_string(), "[info] no tables");
    }
}
