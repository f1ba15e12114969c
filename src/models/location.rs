use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::{
    location_log::LocationLog,
    validation::{Issues, ValidationError},
};

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Location {
    /// Store-assigned identifier
    pub id: u64,
    /// Display name, unique per owner
    pub name: String,
    /// Free-form notes about the place
    pub description: Option<String>,
    pub lat: f64,
    pub long: f64,
    /// URL slug, unique across every user
    pub slug: String,
    /// Owner of the location
    pub user_id: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The user-editable part of a location.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LocationFields {
    pub name: String,
    pub description: Option<String>,
    pub lat: f64,
    pub long: f64,
}

impl LocationFields {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::default();
        issues.check_name(&self.name);
        issues.check_description(self.description.as_deref());
        issues.check_coordinates(self.lat, self.long);
        issues.finish()
    }
}

impl From<&Location> for LocationFields {
    fn from(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            description: location.description.clone(),
            lat: location.lat,
            long: location.long,
        }
    }
}

/// A location together with its logs, newest first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LocationWithLogs {
    #[serde(flatten)]
    pub location: Location,
    pub logs: Vec<LocationLog>,
}
