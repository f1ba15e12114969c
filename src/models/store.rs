use jiff::Timestamp;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    location::{Location, LocationFields, LocationWithLogs},
    location_log::{LocationLog, LocationLogFields},
};

/// Current schema version
pub const CURRENT_VERSION: u32 = 2;

/// Raised when a write would break one of the store's uniqueness rules.
#[derive(Debug, Error, PartialEq)]
pub enum ConstraintViolation {
    #[error("slug '{0}' is already taken")]
    SlugTaken(String),

    #[error("a location named '{0}' already exists")]
    NameTaken(String),
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Store {
    pub version: u32,
    pub next_location_id: u64,
    pub next_location_log_id: u64,
    pub locations: Vec<Location>,
    pub location_logs: Vec<LocationLog>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            next_location_id: 1,
            next_location_log_id: 1,
            locations: vec![],
            location_logs: vec![],
        }
    }
}

impl Store {
    pub fn slug_exists(&self, slug: &str) -> bool {
        self.locations.iter().any(|l| l.slug == slug)
    }

    pub fn name_exists_for_user(&self, name: &str, user_id: u64) -> bool {
        self.locations
            .iter()
            .any(|l| l.user_id == user_id && l.name == name)
    }

    pub fn insert_location(
        &mut self,
        fields: LocationFields,
        slug: String,
        user_id: u64,
    ) -> Result<Location, ConstraintViolation> {
        if self.slug_exists(&slug) {
            return Err(ConstraintViolation::SlugTaken(slug));
        }
        if self.name_exists_for_user(&fields.name, user_id) {
            return Err(ConstraintViolation::NameTaken(fields.name));
        }

        let now = Timestamp::now();
        let location = Location {
            id: self.next_location_id,
            name: fields.name,
            description: fields.description,
            lat: fields.lat,
            long: fields.long,
            slug,
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.next_location_id += 1;

        debug!("inserted location {} ({})", location.id, location.slug);
        self.locations.push(location.clone());
        Ok(location)
    }

    pub fn locations_for_user(&self, user_id: u64) -> impl Iterator<Item = &Location> {
        self.locations.iter().filter(move |l| l.user_id == user_id)
    }

    pub fn location_for_user(&self, slug: &str, user_id: u64) -> Option<&Location> {
        self.locations
            .iter()
            .find(|l| l.slug == slug && l.user_id == user_id)
    }

    pub fn location_with_logs(&self, slug: &str, user_id: u64) -> Option<LocationWithLogs> {
        let location = self.location_for_user(slug, user_id)?.clone();
        let mut logs: Vec<_> = self
            .location_logs
            .iter()
            .filter(|log| log.location_id == location.id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.started_at.cmp(&a.started_at));

        Some(LocationWithLogs { location, logs })
    }

    /// Updates the editable fields of a location. The slug never changes.
    pub fn update_location_by_slug(
        &mut self,
        fields: LocationFields,
        slug: &str,
        user_id: u64,
    ) -> Result<Option<Location>, ConstraintViolation> {
        let renamed_onto_other = self
            .locations
            .iter()
            .any(|l| l.user_id == user_id && l.name == fields.name && l.slug != slug);
        if renamed_onto_other {
            return Err(ConstraintViolation::NameTaken(fields.name));
        }

        let Some(location) = self
            .locations
            .iter_mut()
            .find(|l| l.slug == slug && l.user_id == user_id)
        else {
            return Ok(None);
        };

        location.name = fields.name;
        location.description = fields.description;
        location.lat = fields.lat;
        location.long = fields.long;
        location.updated_at = Timestamp::now();

        Ok(Some(location.clone()))
    }

    /// Removes a location and every log recorded under it.
    pub fn remove_location_by_slug(
        &mut self,
        slug: &str,
        user_id: u64,
    ) -> Option<(Location, usize)> {
        let index = self
            .locations
            .iter()
            .position(|l| l.slug == slug && l.user_id == user_id)?;
        let removed = self.locations.remove(index);

        let before = self.location_logs.len();
        self.location_logs
            .retain(|log| log.location_id != removed.id);
        let cascaded = before - self.location_logs.len();

        debug!(
            "removed location {} and {} log(s)",
            removed.slug, cascaded
        );
        Some((removed, cascaded))
    }

    pub fn location_log_for_user(&self, id: u64, user_id: u64) -> Option<&LocationLog> {
        self.location_logs
            .iter()
            .find(|log| log.id == id && log.user_id == user_id)
    }

    pub fn insert_location_log(
        &mut self,
        location_id: u64,
        fields: LocationLogFields,
        user_id: u64,
    ) -> LocationLog {
        let now = Timestamp::now();
        let log = LocationLog {
            id: self.next_location_log_id,
            name: fields.name,
            description: fields.description,
            lat: fields.lat,
            long: fields.long,
            started_at: fields.started_at,
            ended_at: fields.ended_at,
            location_id,
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.next_location_log_id += 1;

        self.location_logs.push(log.clone());
        log
    }

    pub fn update_location_log(
        &mut self,
        id: u64,
        fields: LocationLogFields,
        user_id: u64,
    ) -> Option<LocationLog> {
        let log = self
            .location_logs
            .iter_mut()
            .find(|log| log.id == id && log.user_id == user_id)?;

        log.name = fields.name;
        log.description = fields.description;
        log.lat = fields.lat;
        log.long = fields.long;
        log.started_at = fields.started_at;
        log.ended_at = fields.ended_at;
        log.updated_at = Timestamp::now();

        Some(log.clone())
    }

    pub fn delete_location_log(&mut self, id: u64, user_id: u64) -> Option<LocationLog> {
        let index = self
            .location_logs
            .iter()
            .position(|log| log.id == id && log.user_id == user_id)?;
        Some(self.location_logs.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> LocationFields {
        LocationFields {
            name: String::from(name),
            description: None,
            lat: 51.5,
            long: -0.12,
        }
    }

    fn log_fields(name: &str, started_at: &str) -> LocationLogFields {
        LocationLogFields {
            name: String::from(name),
            started_at: started_at.parse().unwrap(),
            ..LocationLogFields::default()
        }
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut store = Store::default();
        let first = store
            .insert_location(fields("One"), String::from("one"), 1)
            .unwrap();
        let second = store
            .insert_location(fields("Two"), String::from("two"), 1)
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.next_location_id, 3);
    }

    #[test]
    fn test_slug_is_unique_across_users() {
        let mut store = Store::default();
        store
            .insert_location(fields("Home"), String::from("home"), 1)
            .unwrap();

        let result = store.insert_location(fields("Home"), String::from("home"), 2);
        assert_eq!(
            result,
            Err(ConstraintViolation::SlugTaken(String::from("home")))
        );
    }

    #[test]
    fn test_name_is_unique_per_user() {
        let mut store = Store::default();
        store
            .insert_location(fields("Home"), String::from("home"), 1)
            .unwrap();

        let same_user = store.insert_location(fields("Home"), String::from("home-2"), 1);
        assert!(matches!(same_user, Err(ConstraintViolation::NameTaken(_))));

        let other_user = store.insert_location(fields("Home"), String::from("home-3"), 2);
        assert!(other_user.is_ok());
    }

    #[test]
    fn test_exists_checks_are_repeatable() {
        let mut store = Store::default();
        store
            .insert_location(fields("Home"), String::from("home"), 1)
            .unwrap();

        assert_eq!(store.slug_exists("home"), store.slug_exists("home"));
        assert_eq!(store.slug_exists("away"), store.slug_exists("away"));
        assert!(store.name_exists_for_user("Home", 1));
        assert!(!store.name_exists_for_user("Home", 2));
    }

    #[test]
    fn test_location_with_logs_orders_newest_first() {
        let mut store = Store::default();
        let location = store
            .insert_location(fields("Home"), String::from("home"), 1)
            .unwrap();
        store.insert_location_log(location.id, log_fields("old", "2024-01-01T00:00:00Z"), 1);
        store.insert_location_log(location.id, log_fields("new", "2025-01-01T00:00:00Z"), 1);

        let found = store.location_with_logs("home", 1).unwrap();
        let names: Vec<_> = found.logs.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old"]);

        assert!(store.location_with_logs("home", 2).is_none());
    }

    #[test]
    fn test_update_keeps_slug_and_rejects_taken_name() {
        let mut store = Store::default();
        store
            .insert_location(fields("Home"), String::from("home"), 1)
            .unwrap();
        store
            .insert_location(fields("Work"), String::from("work"), 1)
            .unwrap();

        let updated = store
            .update_location_by_slug(fields("Cottage"), "home", 1)
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Cottage");
        assert_eq!(updated.slug, "home");

        let clash = store.update_location_by_slug(fields("Work"), "home", 1);
        assert!(matches!(clash, Err(ConstraintViolation::NameTaken(_))));

        let foreign = store.update_location_by_slug(fields("Mine"), "home", 2);
        assert_eq!(foreign, Ok(None));
    }

    #[test]
    fn test_remove_location_cascades_logs() {
        let mut store = Store::default();
        let home = store
            .insert_location(fields("Home"), String::from("home"), 1)
            .unwrap();
        let work = store
            .insert_location(fields("Work"), String::from("work"), 1)
            .unwrap();
        store.insert_location_log(home.id, log_fields("a", "2024-01-01T00:00:00Z"), 1);
        store.insert_location_log(home.id, log_fields("b", "2024-02-01T00:00:00Z"), 1);
        store.insert_location_log(work.id, log_fields("c", "2024-03-01T00:00:00Z"), 1);

        assert!(store.remove_location_by_slug("home", 2).is_none());

        let (removed, cascaded) = store.remove_location_by_slug("home", 1).unwrap();
        assert_eq!(removed.id, home.id);
        assert_eq!(cascaded, 2);
        assert_eq!(store.location_logs.len(), 1);
    }

    #[test]
    fn test_logs_are_scoped_to_owner() {
        let mut store = Store::default();
        let home = store
            .insert_location(fields("Home"), String::from("home"), 1)
            .unwrap();
        let log = store.insert_location_log(home.id, log_fields("a", "2024-01-01T00:00:00Z"), 1);

        assert!(store.location_log_for_user(log.id, 2).is_none());
        assert!(store
            .update_location_log(log.id, log_fields("b", "2024-01-01T00:00:00Z"), 2)
            .is_none());
        assert!(store.delete_location_log(log.id, 2).is_none());

        assert!(store.delete_location_log(log.id, 1).is_some());
        assert!(store.location_log_for_user(log.id, 1).is_none());
    }
}
