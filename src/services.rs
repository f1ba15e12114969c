pub mod location_logs;
pub mod locations;
