//! Flash notices.
//!
//! Operations never show anything themselves. They return an outcome, the
//! route layer turns it into a [`Notice`], stores it in the session, and the
//! next page render displays it once.

use serde::{Deserialize, Serialize};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    /// CSS modifier class used by the notice template.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "notice--success",
            Self::Info => "notice--info",
            Self::Error => "notice--error",
        }
    }
}

/// A message for the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// CSS class for the notice banner.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        self.level.css_class()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(Notice::success("ok").level, NoticeLevel::Success);
        assert_eq!(Notice::info("hm").level, NoticeLevel::Info);
        assert_eq!(Notice::error("no").css_class(), "notice--error");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Notice::success("Listo")).unwrap();
        assert_eq!(json, serde_json::json!({"level": "success", "message": "Listo"}));
    }
}
