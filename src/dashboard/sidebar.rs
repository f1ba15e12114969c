use crate::{
    dashboard::{map::MapPoint, routes::Route},
    models::{location::Location, location_log::LocationLog},
};

pub const LOCATION_ICON: &str = "tabler:map-pin-filled";
pub const LOCATION_LOG_ICON: &str = "tabler:map-pin";

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarItem {
    pub id: String,
    pub label: String,
    pub icon: &'static str,
    pub navigation_target: Route,
    pub map_point: MapPoint,
}

impl SidebarItem {
    pub fn for_location(location: &Location) -> Self {
        Self {
            id: format!("location-{}", location.id),
            label: location.name.clone(),
            icon: LOCATION_ICON,
            navigation_target: Route::location(location.slug.as_str()),
            map_point: MapPoint::from(location),
        }
    }

    pub fn for_location_log(location: &Location, log: &LocationLog) -> Self {
        Self {
            id: format!("location-log-{}", log.id),
            label: log.name.clone(),
            icon: LOCATION_LOG_ICON,
            navigation_target: Route::location_log(location.slug.as_str(), log.id),
            map_point: MapPoint::from(log),
        }
    }
}

#[derive(Debug, Default)]
pub struct SidebarStore {
    pub items: Vec<SidebarItem>,
    pub loading: bool,
}
