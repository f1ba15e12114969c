use log::debug;
use rand::{Rng, seq::SliceRandom};
use slug::slugify;
use thiserror::Error;

use crate::{models::store::Store, storage::StorageError};

/// Lowercase alphanumerics without 'z'.
pub const SUFFIX_ALPHABET: &[u8] = b"1234567890abcdefghijklmnopqrstuvwxy";
pub const SUFFIX_LENGTH: usize = 5;

const FALLBACK_BASE: &str = "location";

#[derive(Debug, Error)]
pub enum SlugError {
    #[error("Could not check whether slug '{slug}' is taken: {source}")]
    Lookup {
        slug: String,
        #[source]
        source: StorageError,
    },
}

/// Read-only existence check the allocator probes against.
pub trait SlugLookup {
    fn slug_exists(&self, slug: &str) -> Result<bool, StorageError>;
}

impl SlugLookup for Store {
    fn slug_exists(&self, slug: &str) -> Result<bool, StorageError> {
        Ok(Store::slug_exists(self, slug))
    }
}

pub fn base_slug(name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        slug
    }
}

/// Returns a slug for `name` that no location currently uses.
///
/// Nothing is reserved: the slug is only free at the moment of return, so the
/// insert that follows can still lose a race and must be prepared to retry.
pub fn allocate_slug(lookup: &impl SlugLookup, name: &str) -> Result<String, SlugError> {
    allocate_slug_with(lookup, name, &mut rand::thread_rng())
}

pub fn allocate_slug_with(
    lookup: &impl SlugLookup,
    name: &str,
    rng: &mut impl Rng,
) -> Result<String, SlugError> {
    let base = base_slug(name);
    if !exists(lookup, &base)? {
        return Ok(base);
    }

    loop {
        let candidate = format!("{}-{}", base, random_suffix(rng));
        if !exists(lookup, &candidate)? {
            return Ok(candidate);
        }
        debug!("slug candidate {} is taken, drawing again", candidate);
    }
}

fn exists(lookup: &impl SlugLookup, slug: &str) -> Result<bool, SlugError> {
    lookup.slug_exists(slug).map_err(|source| SlugError::Lookup {
        slug: slug.to_string(),
        source,
    })
}

fn random_suffix(rng: &mut impl Rng) -> String {
    (0..SUFFIX_LENGTH)
        .filter_map(|_| SUFFIX_ALPHABET.choose(&mut *rng))
        .map(|&b| b as char)
        .collect()
}
