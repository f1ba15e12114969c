use std::fmt;

use thiserror::Error;

use crate::models::location::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH};

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
#[error("{}", .issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

/// Accumulates every failing field so the user sees them all at once.
#[derive(Default)]
pub(crate) struct Issues(Vec<Issue>);

impl Issues {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(Issue {
            field,
            message: message.into(),
        });
    }

    pub fn check_name(&mut self, name: &str) {
        let length = name.trim().chars().count();
        if length == 0 {
            self.push("name", "must not be empty");
        } else if name.chars().count() > MAX_NAME_LENGTH {
            self.push(
                "name",
                format!("must be at most {MAX_NAME_LENGTH} characters"),
            );
        }
    }

    pub fn check_description(&mut self, description: Option<&str>) {
        if let Some(description) = description
            && description.chars().count() > MAX_DESCRIPTION_LENGTH
        {
            self.push(
                "description",
                format!("must be at most {MAX_DESCRIPTION_LENGTH} characters"),
            );
        }
    }

    pub fn check_coordinates(&mut self, lat: f64, long: f64) {
        if !(-90.0..=90.0).contains(&lat) {
            self.push("lat", "must be between -90 and 90");
        }
        if !(-180.0..=180.0).contains(&long) {
            self.push("long", "must be between -180 and 180");
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues: self.0 })
        }
    }
}
