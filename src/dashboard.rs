pub mod camera;
pub mod fetch;
pub mod map;
pub mod routes;
pub mod session;
pub mod sidebar;
