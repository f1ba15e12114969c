pub mod location;
pub mod location_log;
pub mod store;
pub mod validation;
