//! Weather alert feed
//!
//! Loads active, unexpired alerts for display. Failure policy is the same
//! degrade-silently pattern as the weather service: on any database
//! problem (including the database not being configured at all) the two
//! fixed fallback alerts are served and no error escapes.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::{AlertDisplay, AlertKind, AlertSeverity};

use crate::error::AppResult;

/// Alerts shown per load
const ALERT_LIMIT: i64 = 10;

/// Weather alert service
#[derive(Clone)]
pub struct AlertService {
    db: Option<PgPool>,
}

/// Row model for the weather_alerts table
#[derive(Debug, Clone, FromRow)]
pub struct WeatherAlertRow {
    pub id: Uuid,
    pub location: Option<String>,
    pub alert_type: String,
    pub title: String,
    pub message: String,
    pub severity: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AlertService {
    /// Create a new AlertService instance
    pub fn new(db: Option<PgPool>) -> Self {
        Self { db }
    }

    /// Load active, unexpired alerts, newest first, capped at ten.
    /// Never errors: any failure degrades to the fixed fallback alerts.
    pub async fn active_alerts(&self) -> Vec<AlertDisplay> {
        let Some(db) = &self.db else {
            return fallback_alerts();
        };

        match self.query_active(db).await {
            Ok(rows) => rows.iter().map(display_alert).collect(),
            Err(err) => {
                tracing::warn!("Failed to load weather alerts, serving fallback: {}", err);
                fallback_alerts()
            }
        }
    }

    async fn query_active(&self, db: &PgPool) -> AppResult<Vec<WeatherAlertRow>> {
        let rows = sqlx::query_as::<_, WeatherAlertRow>(
            r#"
            SELECT id, location, alert_type, title, message, severity, active,
                   created_at, expires_at
            FROM weather_alerts
            WHERE active = true AND expires_at >= NOW()
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(ALERT_LIMIT)
        .fetch_all(db)
        .await?;

        Ok(rows)
    }
}

/// Shape a row for display. Unknown severity strings degrade to low.
fn display_alert(row: &WeatherAlertRow) -> AlertDisplay {
    let severity = row.severity.parse().unwrap_or(AlertSeverity::Low);
    AlertDisplay {
        kind: AlertKind::from_severity(severity),
        title: row.title.clone(),
        message: row.message.clone(),
        time: row.created_at.format("%Y-%m-%d %H:%M").to_string(),
        severity,
        location: row.location.clone(),
    }
}

/// The two fixed alerts served when the database is unreachable
pub fn fallback_alerts() -> Vec<AlertDisplay> {
    vec![
        AlertDisplay {
            kind: AlertKind::Warning,
            title: "Heavy Rain Expected".to_string(),
            message: "Heavy rainfall expected tomorrow. Prepare drainage systems and cover \
                      sensitive crops."
                .to_string(),
            time: "2 hours ago".to_string(),
            severity: AlertSeverity::High,
            location: None,
        },
        AlertDisplay {
            kind: AlertKind::Info,
            title: "Optimal Planting Conditions".to_string(),
            message: "Perfect soil moisture and temperature for planting maize this week."
                .to_string(),
            time: "6 hours ago".to_string(),
            severity: AlertSeverity::Low,
            location: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(severity: &str) -> WeatherAlertRow {
        WeatherAlertRow {
            id: Uuid::new_v4(),
            location: Some("Gauteng".to_string()),
            alert_type: "rain".to_string(),
            title: "Storm warning".to_string(),
            message: "Severe thunderstorms expected".to_string(),
            severity: severity.to_string(),
            active: true,
            created_at: Utc::now(),
            expires_at: Utc::now(),
        }
    }

    #[test]
    fn test_high_severity_displays_as_warning() {
        let display = display_alert(&row("high"));
        assert_eq!(display.kind, AlertKind::Warning);
        assert_eq!(display.severity, AlertSeverity::High);
    }

    #[test]
    fn test_other_severities_display_as_info() {
        assert_eq!(display_alert(&row("medium")).kind, AlertKind::Info);
        assert_eq!(display_alert(&row("low")).kind, AlertKind::Info);
    }

    #[test]
    fn test_unknown_severity_degrades_to_low() {
        let display = display_alert(&row("catastrophic"));
        assert_eq!(display.severity, AlertSeverity::Low);
        assert_eq!(display.kind, AlertKind::Info);
    }

    #[test]
    fn test_fallback_is_exactly_two_alerts() {
        let alerts = fallback_alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::Warning);
        assert_eq!(alerts[0].title, "Heavy Rain Expected");
        assert_eq!(alerts[1].kind, AlertKind::Info);
        assert_eq!(alerts[1].title, "Optimal Planting Conditions");
    }

    #[tokio::test]
    async fn test_unconfigured_database_serves_fallback() {
        let service = AlertService::new(None);
        let alerts = service.active_alerts().await;
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].title, "Heavy Rain Expected");
    }
}
