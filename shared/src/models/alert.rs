//! Weather alert models

use serde::{Deserialize, Serialize};

/// Alert severity as stored in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl std::str::FromStr for AlertSeverity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(AlertSeverity::Low),
            "medium" => Ok(AlertSeverity::Medium),
            "high" => Ok(AlertSeverity::High),
            _ => Err(()),
        }
    }
}

/// Display class of an alert: high severity renders as a warning,
/// everything else as an informational notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Info,
}

impl AlertKind {
    pub fn from_severity(severity: AlertSeverity) -> Self {
        match severity {
            AlertSeverity::High => AlertKind::Warning,
            AlertSeverity::Low | AlertSeverity::Medium => AlertKind::Info,
        }
    }
}

/// An alert shaped for display in the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertDisplay {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub time: String,
    pub severity: AlertSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_high_severity_is_warning() {
        assert_eq!(
            AlertKind::from_severity(AlertSeverity::High),
            AlertKind::Warning
        );
        assert_eq!(
            AlertKind::from_severity(AlertSeverity::Medium),
            AlertKind::Info
        );
        assert_eq!(AlertKind::from_severity(AlertSeverity::Low), AlertKind::Info);
    }

    #[test]
    fn test_severity_parses_lowercase() {
        assert_eq!("high".parse(), Ok(AlertSeverity::High));
        assert!("HIGH".parse::<AlertSeverity>().is_err());
    }
}
