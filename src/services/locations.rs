use log::{info, warn};
use thiserror::Error;

use crate::{
    models::{
        location::{Location, LocationFields, LocationWithLogs},
        store::{ConstraintViolation, Store},
        validation::ValidationError,
    },
    slugs::{SlugError, allocate_slug, base_slug},
    storage::{Storage, StorageError},
};

/// How many times a create retries when its slug is taken between the check
/// and the insert.
pub const MAX_SLUG_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum CreateLocationError {
    #[error("Invalid location: {0}")]
    InvalidFields(#[from] ValidationError),

    #[error("A location named '{0}' already exists")]
    LocationAlreadyExists(String),

    #[error("{0}")]
    Slug(#[from] SlugError),

    #[error("Could not find a free slug for '{0}' after {MAX_SLUG_ATTEMPTS} attempts")]
    SlugCollision(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct CreateLocationParameters {
    pub user_id: u64,
    pub fields: LocationFields,
}

pub fn create_location(
    store: &mut Store,
    storage: &impl Storage,
    parameters: CreateLocationParameters,
) -> Result<Location, CreateLocationError> {
    create_location_with(store, storage, parameters, |store, name| {
        allocate_slug(store, name)
    })
}

fn create_location_with(
    store: &mut Store,
    storage: &impl Storage,
    parameters: CreateLocationParameters,
    mut allocate: impl FnMut(&Store, &str) -> Result<String, SlugError>,
) -> Result<Location, CreateLocationError> {
    let CreateLocationParameters { user_id, fields } = parameters;
    fields.validate()?;

    if store.name_exists_for_user(&fields.name, user_id) {
        return Err(CreateLocationError::LocationAlreadyExists(fields.name));
    }

    for attempt in 1..=MAX_SLUG_ATTEMPTS {
        let slug = allocate(store, &fields.name)?;

        match store.insert_location(fields.clone(), slug, user_id) {
            Ok(location) => {
                storage.save(store)?;
                info!("created location {} for user {}", location.slug, user_id);
                return Ok(location);
            }
            Err(ConstraintViolation::SlugTaken(slug)) => {
                warn!(
                    "slug {} was taken before insert (attempt {}/{})",
                    slug, attempt, MAX_SLUG_ATTEMPTS
                );
            }
            Err(ConstraintViolation::NameTaken(name)) => {
                return Err(CreateLocationError::LocationAlreadyExists(name));
            }
        }
    }

    Err(CreateLocationError::SlugCollision(base_slug(&fields.name)))
}

pub fn list_locations(store: &Store, user_id: u64) -> Vec<Location> {
    store.locations_for_user(user_id).cloned().collect()
}

#[derive(Debug, Error)]
pub enum FindLocationError {
    #[error("Location '{0}' not found")]
    LocationNotFound(String),
}

pub struct FindLocationParameters {
    pub user_id: u64,
    pub slug: String,
}

pub fn find_location(
    store: &Store,
    parameters: FindLocationParameters,
) -> Result<LocationWithLogs, FindLocationError> {
    store
        .location_with_logs(&parameters.slug, parameters.user_id)
        .ok_or(FindLocationError::LocationNotFound(parameters.slug))
}

/// Fields left as `None` keep their current value. An empty description
/// clears it.
#[derive(Default)]
pub struct LocationChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

impl LocationChanges {
    fn apply(self, mut fields: LocationFields) -> LocationFields {
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
        fields
    }
}

#[derive(Debug, Error)]
pub enum UpdateLocationError {
    #[error("Location '{0}' not found")]
    LocationNotFound(String),

    #[error("Invalid location: {0}")]
    InvalidFields(#[from] ValidationError),

    #[error("A location named '{0}' already exists")]
    LocationAlreadyExists(String),

    #[error("{0}")]
    Conflict(ConstraintViolation),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct UpdateLocationParameters {
    pub user_id: u64,
    pub slug: String,
    pub changes: LocationChanges,
}

pub fn update_location(
    store: &mut Store,
    storage: &impl Storage,
    parameters: UpdateLocationParameters,
) -> Result<Location, UpdateLocationError> {
    let UpdateLocationParameters {
        user_id,
        slug,
        changes,
    } = parameters;

    let Some(current) = store.location_for_user(&slug, user_id) else {
        return Err(UpdateLocationError::LocationNotFound(slug));
    };

    let fields = changes.apply(LocationFields::from(current));
    fields.validate()?;

    let updated = match store.update_location_by_slug(fields, &slug, user_id) {
        Ok(Some(location)) => location,
        Ok(None) => return Err(UpdateLocationError::LocationNotFound(slug)),
        Err(ConstraintViolation::NameTaken(name)) => {
            return Err(UpdateLocationError::LocationAlreadyExists(name));
        }
        Err(violation) => return Err(UpdateLocationError::Conflict(violation)),
    };

    storage.save(store)?;
    info!("updated location {}", updated.slug);

    Ok(updated)
}

#[derive(Debug, Error)]
pub enum RemoveLocationError {
    #[error("Location '{0}' not found")]
    LocationNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct RemoveLocationParameters {
    pub user_id: u64,
    pub slug: String,
}

pub struct RemoveLocationResult {
    pub location: Location,
    pub cascaded_logs_count: usize,
}

pub fn remove_location(
    store: &mut Store,
    storage: &impl Storage,
    parameters: RemoveLocationParameters,
) -> Result<RemoveLocationResult, RemoveLocationError> {
    let (location, cascaded_logs_count) = store
        .remove_location_by_slug(&parameters.slug, parameters.user_id)
        .ok_or_else(|| RemoveLocationError::LocationNotFound(parameters.slug.clone()))?;

    storage.save(store)?;
    info!(
        "removed location {} ({} log(s))",
        location.slug, cascaded_logs_count
    );

    Ok(RemoveLocationResult {
        location,
        cascaded_logs_count,
    })
}
