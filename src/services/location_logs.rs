use jiff::Timestamp;
use log::info;
use thiserror::Error;

use crate::{
    models::{
        location_log::{LocationLog, LocationLogFields},
        store::Store,
        validation::ValidationError,
    },
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum AddLocationLogError {
    #[error("Location '{0}' not found")]
    LocationNotFound(String),

    #[error("Invalid location log: {0}")]
    InvalidFields(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddLocationLogParameters {
    pub user_id: u64,
    pub location_slug: String,
    pub fields: LocationLogFields,
}

pub fn add_location_log(
    store: &mut Store,
    storage: &impl Storage,
    parameters: AddLocationLogParameters,
) -> Result<LocationLog, AddLocationLogError> {
    let AddLocationLogParameters {
        user_id,
        location_slug,
        fields,
    } = parameters;

    let Some(location) = store.location_for_user(&location_slug, user_id) else {
        return Err(AddLocationLogError::LocationNotFound(location_slug));
    };
    let location_id = location.id;

    fields.validate()?;

    let log = store.insert_location_log(location_id, fields, user_id);
    storage.save(store)?;
    info!("added log {} to location {}", log.id, location_slug);

    Ok(log)
}

#[derive(Debug, Error)]
pub enum FindLocationLogError {
    #[error("Location log #{0} not found")]
    LocationLogNotFound(u64),
}

pub fn find_location_log(
    store: &Store,
    id: u64,
    user_id: u64,
) -> Result<LocationLog, FindLocationLogError> {
    store
        .location_log_for_user(id, user_id)
        .cloned()
        .ok_or(FindLocationLogError::LocationLogNotFound(id))
}

/// Fields left as `None` keep their current value. An empty description
/// clears it, as does `ended_at: Some(None)`.
#[derive(Default)]
pub struct LocationLogChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Option<Timestamp>>,
}

impl LocationLogChanges {
    fn apply(self, mut fields: LocationLogFields) -> LocationLogFields {
        if let Some(name) = self.name {
            fields.name = name;
        }
        if let Some(description) = self.description {
            fields.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Some(lat) = self.lat {
            fields.lat = lat;
        }
        if let Some(long) = self.long {
            fields.long = long;
        }
        if let Some(started_at) = self.started_at {
            fields.started_at = started_at;
        }
        if let Some(ended_at) = self.ended_at {
            fields.ended_at = ended_at;
        }
        fields
    }
}

#[derive(Debug, Error)]
pub enum UpdateLocationLogError {
    #[error("Location log #{0} not found")]
    LocationLogNotFound(u64),

    #[error("Invalid location log: {0}")]
    InvalidFields(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct UpdateLocationLogParameters {
    pub user_id: u64,
    pub id: u64,
    pub changes: LocationLogChanges,
}

pub fn update_location_log(
    store: &mut Store,
    storage: &impl Storage,
    parameters: UpdateLocationLogParameters,
) -> Result<LocationLog, UpdateLocationLogError> {
    let UpdateLocationLogParameters {
        user_id,
        id,
        changes,
    } = parameters;

    let current = store
        .location_log_for_user(id, user_id)
        .ok_or(UpdateLocationLogError::LocationLogNotFound(id))?;

    let fields = changes.apply(LocationLogFields::from(current));
    fields.validate()?;

    let updated = store
        .update_location_log(id, fields, user_id)
        .ok_or(UpdateLocationLogError::LocationLogNotFound(id))?;

    storage.save(store)?;
    info!("updated log {}", id);

    Ok(updated)
}

#[derive(Debug, Error)]
pub enum DeleteLocationLogError {
    #[error("Location log #{0} not found")]
    LocationLogNotFound(u64),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub fn delete_location_log(
    store: &mut Store,
    storage: &impl Storage,
    id: u64,
    user_id: u64,
) -> Result<LocationLog, DeleteLocationLogError> {
    let deleted = store
        .delete_location_log(id, user_id)
        .ok_or(DeleteLocationLogError::LocationLogNotFound(id))?;

    storage.save(store)?;
    info!("deleted log {}", id);

    Ok(deleted)
}
