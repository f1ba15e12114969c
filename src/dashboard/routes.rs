pub const LOCATION_PAGES: &[&str] = &["dashboard", "dashboard-add"];

pub const CURRENT_LOCATION_PAGES: &[&str] = &[
    "dashboard-location-slug",
    "dashboard-location-slug-add",
    "dashboard-location-slug-edit",
];

pub const CURRENT_LOCATION_LOG_PAGES: &[&str] = &[
    "dashboard-location-slug-id",
    "dashboard-location-slug-id-add",
    "dashboard-location-slug-id-edit",
];

/// Pages that show a form over the map.
pub const EDIT_PAGES: &[&str] = &[
    "dashboard-add",
    "dashboard-location-slug-add",
    "dashboard-location-slug-edit",
    "dashboard-location-slug-id-edit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCategory {
    /// Every location of the user
    Locations,
    /// One location and its logs
    CurrentLocation,
    /// A single log
    CurrentLocationLog,
    Other,
}

impl PageCategory {
    pub fn of(route_name: &str) -> Self {
        if LOCATION_PAGES.contains(&route_name) {
            PageCategory::Locations
        } else if CURRENT_LOCATION_PAGES.contains(&route_name) {
            PageCategory::CurrentLocation
        } else if CURRENT_LOCATION_LOG_PAGES.contains(&route_name) {
            PageCategory::CurrentLocationLog
        } else {
            PageCategory::Other
        }
    }
}

/// A named page plus the parameters it was opened with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    pub name: String,
    pub slug: Option<String>,
    pub id: Option<u64>,
}

impl Route {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn dashboard() -> Self {
        Self::new("dashboard")
    }

    pub fn location(slug: impl Into<String>) -> Self {
        Self::new("dashboard-location-slug").with_slug(slug)
    }

    pub fn location_log(slug: impl Into<String>, id: u64) -> Self {
        Self::new("dashboard-location-slug-id")
            .with_slug(slug)
            .with_id(id)
    }

    pub fn category(&self) -> PageCategory {
        PageCategory::of(&self.name)
    }

    pub fn is_edit_page(&self) -> bool {
        EDIT_PAGES.contains(&self.name.as_str())
    }

    /// Expands the route name into a path, e.g.
    /// `dashboard-location-slug-id` → `/dashboard/location/home/3`.
    pub fn path(&self) -> String {
        self.name
            .split('-')
            .map(|segment| match segment {
                "slug" => self.slug.clone().unwrap_or_else(|| String::from(":slug")),
                "id" => self
                    .id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| String::from(":id")),
                other => other.to_string(),
            })
            .fold(String::new(), |path, segment| path + "/" + &segment)
    }
}
