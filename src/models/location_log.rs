use jiff::{Timestamp, civil, tz::TimeZone};
use serde::{Deserialize, Serialize};

use crate::models::validation::{Issues, ValidationError};

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct LocationLog {
    /// Store-assigned identifier
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub lat: f64,
    pub long: f64,
    /// When the visit started
    pub started_at: Timestamp,
    /// When the visit ended, if it has
    pub ended_at: Option<Timestamp>,
    /// Parent location
    pub location_id: u64,
    /// Owner of the log
    pub user_id: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LocationLogFields {
    pub name: String,
    pub description: Option<String>,
    pub lat: f64,
    pub long: f64,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
}

impl LocationLogFields {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::default();
        issues.check_name(&self.name);
        issues.check_description(self.description.as_deref());
        issues.check_coordinates(self.lat, self.long);
        if let Some(ended_at) = self.ended_at
            && ended_at < self.started_at
        {
            issues.push("ended_at", "must not be before started_at");
        }
        issues.finish()
    }
}

impl From<&LocationLog> for LocationLogFields {
    fn from(log: &LocationLog) -> Self {
        Self {
            name: log.name.clone(),
            description: log.description.clone(),
            lat: log.lat,
            long: log.long,
            started_at: log.started_at,
            ended_at: log.ended_at,
        }
    }
}

/// Accepts an RFC 3339 instant, or a civil date/datetime read in the local
/// time zone (`2025-06-01`, `2025-06-01 18:30`).
pub fn parse_timestamp(input: &str) -> Result<Timestamp, jiff::Error> {
    let input = input.trim();
    if let Ok(timestamp) = input.parse::<Timestamp>() {
        return Ok(timestamp);
    }
    let datetime = match input.parse::<civil::DateTime>() {
        Ok(datetime) => datetime,
        Err(_) => input.parse::<civil::Date>()?.to_datetime(civil::Time::midnight()),
    };
    Ok(datetime.to_zoned(TimeZone::system())?.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let instant = parse_timestamp("2025-06-01T10:00:00Z").unwrap();
        assert_eq!(instant.to_string(), "2025-06-01T10:00:00Z");

        let local = parse_timestamp("2025-06-01 10:00").unwrap();
        let date_only = parse_timestamp("2025-06-01").unwrap();
        assert!(date_only < local);

        assert!(parse_timestamp("yesterday-ish").is_err());
    }

    #[test]
    fn test_ended_before_started_is_rejected() {
        let started_at: Timestamp = "2025-06-01T10:00:00Z".parse().unwrap();
        let fields = LocationLogFields {
            name: String::from("Morning walk"),
            started_at,
            ended_at: Some("2025-06-01T09:00:00Z".parse().unwrap()),
            ..LocationLogFields::default()
        };

        let error = fields.validate().unwrap_err();
        assert_eq!(error.issues.len(), 1);
        assert_eq!(error.issues[0].field, "ended_at");
    }

    #[test]
    fn test_open_ended_log_is_valid() {
        let fields = LocationLogFields {
            name: String::from("Morning walk"),
            started_at: "2025-06-01T10:00:00Z".parse().unwrap(),
            ..LocationLogFields::default()
        };

        assert!(fields.validate().is_ok());
    }
}
