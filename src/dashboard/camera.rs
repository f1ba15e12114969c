/// `[longitude, latitude]`, the order map libraries expect.
pub type LngLat = [f64; 2];

pub const DEFAULT_CENTER: LngLat = [-74.00685, 40.73330];
pub const DEFAULT_ZOOM: f64 = 2.0;
pub const FIT_PADDING: u32 = 40;
pub const FIT_MAX_ZOOM: f64 = 10.0;
pub const FLY_SPEED: f64 = 0.8;
pub const ADDED_POINT_ZOOM: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLatBounds {
    pub south_west: LngLat,
    pub north_east: LngLat,
}

impl LngLatBounds {
    pub fn from_point(point: LngLat) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    pub fn extend(self, [long, lat]: LngLat) -> Self {
        Self {
            south_west: [self.south_west[0].min(long), self.south_west[1].min(lat)],
            north_east: [self.north_east[0].max(long), self.north_east[1].max(lat)],
        }
    }

    /// The smallest box holding every point, or `None` for no points.
    pub fn covering(points: impl IntoIterator<Item = LngLat>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = Self::from_point(points.next()?);
        Some(points.fold(first, Self::extend))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CameraCommand {
    FlyTo {
        center: LngLat,
        zoom: Option<f64>,
        speed: Option<f64>,
    },
    FitBounds {
        bounds: LngLatBounds,
        padding: u32,
        max_zoom: Option<f64>,
    },
}

/// Whatever actually moves the map view.
pub trait MapCamera {
    fn apply(&mut self, command: CameraCommand);
}

/// Records commands instead of animating anything.
impl MapCamera for Vec<CameraCommand> {
    fn apply(&mut self, command: CameraCommand) {
        self.push(command);
    }
}
