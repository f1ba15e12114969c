use log::{debug, warn};

use crate::{
    dashboard::{
        camera::MapCamera,
        fetch::{Fetch, FetchError, FetchStatus},
        map::{AddedPoint, MapPoint, MapStore},
        routes::{PageCategory, Route},
        sidebar::{SidebarItem, SidebarStore},
    },
    models::{
        location::{Location, LocationWithLogs},
        location_log::LocationLog,
        store::Store,
    },
    services::{
        location_logs::find_location_log,
        locations::{FindLocationParameters, find_location, list_locations},
    },
};

/// Where the dashboard loads its data from.
pub trait DashboardSource {
    fn locations(&self, user_id: u64) -> Result<Vec<Location>, FetchError>;
    fn location(&self, slug: &str, user_id: u64) -> Result<LocationWithLogs, FetchError>;
    fn location_log(&self, id: u64, user_id: u64) -> Result<LocationLog, FetchError>;
}

impl DashboardSource for Store {
    fn locations(&self, user_id: u64) -> Result<Vec<Location>, FetchError> {
        Ok(list_locations(self, user_id))
    }

    fn location(&self, slug: &str, user_id: u64) -> Result<LocationWithLogs, FetchError> {
        find_location(
            self,
            FindLocationParameters {
                user_id,
                slug: slug.to_string(),
            },
        )
        .map_err(|_| FetchError::NotFound(format!("Location '{slug}'")))
    }

    fn location_log(&self, id: u64, user_id: u64) -> Result<LocationLog, FetchError> {
        find_location_log(self, id, user_id)
            .map_err(|_| FetchError::NotFound(format!("Location log #{id}")))
    }
}

/// Dashboard state for one signed-in user.
///
/// Every mutation ends with [`DashboardSession::sync`], so the sidebar and the
/// map always reflect the current route and the latest loaded data.
pub struct DashboardSession<C> {
    user_id: u64,
    route: Option<Route>,
    locations: Fetch<Vec<Location>>,
    current_location: Fetch<LocationWithLogs>,
    current_slug: Option<String>,
    current_location_log: Fetch<LocationLog>,
    current_log_id: Option<u64>,
    sidebar: SidebarStore,
    map: MapStore<C>,
}

impl<C: MapCamera> DashboardSession<C> {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            route: None,
            locations: Fetch::default(),
            current_location: Fetch::default(),
            current_slug: None,
            current_location_log: Fetch::default(),
            current_log_id: None,
            sidebar: SidebarStore::default(),
            map: MapStore::default(),
        }
    }

    pub fn init_camera(&mut self, camera: C) {
        self.map.init(camera);
    }

    pub fn sidebar(&self) -> &SidebarStore {
        &self.sidebar
    }

    pub fn map(&self) -> &MapStore<C> {
        &self.map
    }

    pub fn loading(&self) -> bool {
        self.sidebar.loading
    }

    pub fn locations(&self) -> &Fetch<Vec<Location>> {
        &self.locations
    }

    pub fn current_location(&self) -> &Fetch<LocationWithLogs> {
        &self.current_location
    }

    pub fn current_location_log(&self) -> &Fetch<LocationLog> {
        &self.current_location_log
    }

    /// Switches page and starts whatever loads the new page needs.
    pub fn navigate(&mut self, route: Route) {
        debug!("navigating to {}", route.path());

        if self.locations.status() == FetchStatus::Idle {
            self.locations.start();
        }

        let category = route.category();
        if matches!(
            category,
            PageCategory::CurrentLocation | PageCategory::CurrentLocationLog
        ) && route.slug != self.current_slug
        {
            self.current_slug = route.slug.clone();
            match self.current_slug {
                Some(_) => self.current_location.start(),
                None => self.current_location.reset(),
            }
        }
        if category == PageCategory::CurrentLocationLog && route.id != self.current_log_id {
            self.current_log_id = route.id;
            match self.current_log_id {
                Some(_) => self.current_location_log.start(),
                None => self.current_location_log.reset(),
            }
        }

        self.route = Some(route);
        self.sync();
    }

    /// Completes every pending load from `source`.
    pub fn load(&mut self, source: &impl DashboardSource) {
        if self.locations.is_pending() {
            let result = source.locations(self.user_id);
            log_failure("locations", &result);
            self.locations.resolve(result);
            self.sync();
        }

        if self.current_location.is_pending()
            && let Some(slug) = &self.current_slug
        {
            let result = source.location(slug, self.user_id);
            log_failure("current location", &result);
            self.current_location.resolve(result);
            self.sync();
        }

        if self.current_location_log.is_pending()
            && let Some(id) = self.current_log_id
        {
            let result = source.location_log(id, self.user_id);
            log_failure("current location log", &result);
            self.current_location_log.resolve(result);
            self.sync();
        }
    }

    pub fn refresh_locations(&mut self) {
        self.locations.refresh();
        self.sync();
    }

    pub fn select_point(&mut self, point: Option<MapPoint>) {
        self.map.select_point(point);
    }

    pub fn select_point_without_fly_to(&mut self, point: Option<MapPoint>) {
        self.map.select_point_without_fly_to(point);
    }

    pub fn set_added_point(&mut self, added: Option<AddedPoint>) {
        self.map.set_added_point(added);
    }

    /// Re-derives the sidebar and the map points from the route and the
    /// loaded data. Routes outside the dashboard leave everything untouched.
    pub fn sync(&mut self) {
        let Some(route) = &self.route else {
            return;
        };

        let loading = match route.category() {
            PageCategory::Locations => self.locations.is_pending(),
            PageCategory::CurrentLocation => self.current_location.is_pending(),
            PageCategory::CurrentLocationLog => self.current_location_log.is_pending(),
            PageCategory::Other => return,
        };

        self.sidebar.loading = loading;
        if loading {
            // Sidebar items stay until fresh data replaces them.
            self.map.set_map_points(vec![]);
            return;
        }

        let derived: Option<(Vec<SidebarItem>, Vec<MapPoint>)> = match route.category() {
            PageCategory::Locations => self.locations.data().map(|locations| {
                locations
                    .iter()
                    .map(SidebarItem::for_location)
                    .map(|item| {
                        let point = item.map_point.clone();
                        (item, point)
                    })
                    .unzip()
            }),
            PageCategory::CurrentLocation => self.current_location.data().map(|current| {
                let (items, points): (Vec<_>, Vec<_>) = current
                    .logs
                    .iter()
                    .map(|log| {
                        let item = SidebarItem::for_location_log(&current.location, log);
                        let point = item.map_point.clone();
                        (item, point)
                    })
                    .unzip();
                if points.is_empty() {
                    (vec![], vec![MapPoint::from(&current.location)])
                } else {
                    (items, points)
                }
            }),
            PageCategory::CurrentLocationLog => self
                .current_location_log
                .data()
                .map(|log| (vec![], vec![MapPoint::from(log)])),
            PageCategory::Other => None,
        };

        if let Some((items, points)) = derived {
            self.sidebar.items = items;
            self.map.set_map_points(points);
        }
    }
}

fn log_failure<T>(what: &str, result: &Result<T, FetchError>) {
    if let Err(error) = result {
        warn!("failed to load {}: {}", what, error);
    }
}
