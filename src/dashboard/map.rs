use log::debug;

use crate::{
    dashboard::camera::{
        ADDED_POINT_ZOOM, CameraCommand, DEFAULT_CENTER, DEFAULT_ZOOM, FIT_MAX_ZOOM, FIT_PADDING,
        FLY_SPEED, LngLat, LngLatBounds, MapCamera,
    },
    models::{location::Location, location_log::LocationLog},
};

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub id: u64,
    pub label: String,
    pub lat: f64,
    pub long: f64,
}

impl MapPoint {
    pub fn lng_lat(&self) -> LngLat {
        [self.long, self.lat]
    }
}

impl From<&Location> for MapPoint {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id,
            label: location.name.clone(),
            lat: location.lat,
            long: location.long,
        }
    }
}

impl From<&LocationLog> for MapPoint {
    fn from(log: &LocationLog) -> Self {
        Self {
            id: log.id,
            label: log.name.clone(),
            lat: log.lat,
            long: log.long,
        }
    }
}

/// A point being placed by the user, e.g. while filling the add form.
#[derive(Debug, Clone, PartialEq)]
pub struct AddedPoint {
    pub point: MapPoint,
    /// Re-center even if a point was already being added
    pub center_map: bool,
    pub zoom: Option<f64>,
}

/// Map state plus the camera reactions to it.
///
/// Every setter only reacts when the value really changes. Until a camera is
/// attached with [`MapStore::init`] the reactions update state only.
pub struct MapStore<C> {
    map_points: Vec<MapPoint>,
    selected_point: Option<MapPoint>,
    added_point: Option<AddedPoint>,
    should_fly_to: bool,
    bounds: Option<LngLatBounds>,
    camera: Option<C>,
}

impl<C> Default for MapStore<C> {
    fn default() -> Self {
        Self {
            map_points: vec![],
            selected_point: None,
            added_point: None,
            should_fly_to: true,
            bounds: None,
            camera: None,
        }
    }
}

impl<C: MapCamera> MapStore<C> {
    pub fn init(&mut self, camera: C) {
        self.camera = Some(camera);
        self.on_points_changed();
        // Nothing was deselected yet, so there is no refit to run.
        if self.selected_point.is_some() {
            self.on_selection_changed();
        }
        self.on_added_point_changed(false);
    }

    pub fn camera(&self) -> Option<&C> {
        self.camera.as_ref()
    }

    pub fn map_points(&self) -> &[MapPoint] {
        &self.map_points
    }

    pub fn selected_point(&self) -> Option<&MapPoint> {
        self.selected_point.as_ref()
    }

    pub fn added_point(&self) -> Option<&AddedPoint> {
        self.added_point.as_ref()
    }

    /// The last box fitted around a non-empty set of points.
    pub fn bounds(&self) -> Option<LngLatBounds> {
        self.bounds
    }

    pub fn set_map_points(&mut self, points: Vec<MapPoint>) {
        if points == self.map_points {
            return;
        }
        self.map_points = points;
        self.on_points_changed();
    }

    pub fn select_point(&mut self, point: Option<MapPoint>) {
        if point == self.selected_point {
            return;
        }
        self.selected_point = point;
        self.on_selection_changed();
    }

    /// Selects without moving the camera, e.g. when the user hovers a marker
    /// that is already on screen. Only this one selection is affected.
    pub fn select_point_without_fly_to(&mut self, point: Option<MapPoint>) {
        self.should_fly_to = false;
        self.select_point(point);
        self.should_fly_to = true;
    }

    pub fn set_added_point(&mut self, added: Option<AddedPoint>) {
        if added == self.added_point {
            return;
        }
        let had_added_point = self.added_point.is_some();
        self.added_point = added;
        self.on_added_point_changed(had_added_point);
    }

    fn on_points_changed(&mut self) {
        let Some(bounds) = LngLatBounds::covering(self.map_points.iter().map(MapPoint::lng_lat))
        else {
            self.send(CameraCommand::FlyTo {
                center: DEFAULT_CENTER,
                zoom: Some(DEFAULT_ZOOM),
                speed: None,
            });
            return;
        };

        self.bounds = Some(bounds);
        if self.selected_point.is_none() {
            self.send(CameraCommand::FitBounds {
                bounds,
                padding: FIT_PADDING,
                max_zoom: Some(FIT_MAX_ZOOM),
            });
        }
    }

    fn on_selection_changed(&mut self) {
        // The added point owns the camera while it exists.
        if self.added_point.is_some() {
            return;
        }

        let command = match &self.selected_point {
            Some(point) if self.should_fly_to => Some(CameraCommand::FlyTo {
                center: point.lng_lat(),
                zoom: None,
                speed: Some(FLY_SPEED),
            }),
            Some(_) => None,
            None => self.bounds.map(|bounds| CameraCommand::FitBounds {
                bounds,
                padding: FIT_PADDING,
                max_zoom: None,
            }),
        };

        if let Some(command) = command {
            self.send(command);
        }
    }

    fn on_added_point_changed(&mut self, had_added_point: bool) {
        let Some(added) = &self.added_point else {
            return;
        };
        if had_added_point && !added.center_map {
            return;
        }

        let command = CameraCommand::FlyTo {
            center: added.point.lng_lat(),
            zoom: Some(added.zoom.unwrap_or(ADDED_POINT_ZOOM)),
            speed: Some(FLY_SPEED),
        };
        self.send(command);
    }

    fn send(&mut self, command: CameraCommand) {
        match self.camera.as_mut() {
            Some(camera) => camera.apply(command),
            None => debug!("no camera attached, skipping {:?}", command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestStore = MapStore<Vec<CameraCommand>>;

    fn point(id: u64, long: f64, lat: f64) -> MapPoint {
        MapPoint {
            id,
            label: format!("Point {id}"),
            lat,
            long,
        }
    }

    fn initialized() -> TestStore {
        let mut store = TestStore::default();
        store.init(vec![]);
        store
    }

    fn commands(store: &TestStore) -> &[CameraCommand] {
        store.camera().unwrap()
    }

    fn fly_to(center: LngLat) -> CameraCommand {
        CameraCommand::FlyTo {
            center,
            zoom: None,
            speed: Some(FLY_SPEED),
        }
    }

    #[test]
    fn test_init_with_no_points_flies_to_default_center() {
        let store = initialized();
        assert_eq!(
            commands(&store),
            &[CameraCommand::FlyTo {
                center: DEFAULT_CENTER,
                zoom: Some(DEFAULT_ZOOM),
                speed: None,
            }]
        );
    }

    #[test]
    fn test_points_fit_bounds() {
        let mut store = initialized();
        store.set_map_points(vec![point(1, 0.0, 0.0), point(2, 10.0, 5.0)]);

        let expected = LngLatBounds {
            south_west: [0.0, 0.0],
            north_east: [10.0, 5.0],
        };
        assert_eq!(
            commands(&store).last(),
            Some(&CameraCommand::FitBounds {
                bounds: expected,
                padding: FIT_PADDING,
                max_zoom: Some(FIT_MAX_ZOOM),
            })
        );
        assert_eq!(store.bounds(), Some(expected));
    }

    #[test]
    fn test_unchanged_points_do_not_move_camera() {
        let mut store = initialized();
        store.set_map_points(vec![point(1, 0.0, 0.0)]);
        let before = commands(&store).len();

        store.set_map_points(vec![point(1, 0.0, 0.0)]);
        assert_eq!(commands(&store).len(), before);
    }

    #[test]
    fn test_points_do_not_fit_while_selected() {
        let mut store = initialized();
        store.set_map_points(vec![point(1, 0.0, 0.0)]);
        store.select_point(Some(point(1, 0.0, 0.0)));
        let before = commands(&store).len();

        store.set_map_points(vec![point(1, 0.0, 0.0), point(2, 3.0, 3.0)]);
        assert_eq!(commands(&store).len(), before);
        assert_eq!(store.bounds().unwrap().north_east, [3.0, 3.0]);
    }

    #[test]
    fn test_selecting_flies_and_deselecting_refits() {
        let mut store = initialized();
        store.set_map_points(vec![point(1, 1.0, 2.0), point(2, 3.0, 4.0)]);

        store.select_point(Some(point(2, 3.0, 4.0)));
        assert_eq!(commands(&store).last(), Some(&fly_to([3.0, 4.0])));

        store.select_point(None);
        assert_eq!(
            commands(&store).last(),
            Some(&CameraCommand::FitBounds {
                bounds: store.bounds().unwrap(),
                padding: FIT_PADDING,
                max_zoom: None,
            })
        );
    }

    #[test]
    fn test_deselect_without_bounds_does_nothing() {
        let mut store = initialized();
        store.select_point(Some(point(1, 1.0, 1.0)));
        let before = commands(&store).len();

        store.select_point(None);
        assert_eq!(commands(&store).len(), before);
    }

    #[test]
    fn test_silent_selection_suppresses_exactly_one_fly_to() {
        let mut store = initialized();
        store.set_map_points(vec![point(1, 1.0, 1.0), point(2, 2.0, 2.0)]);
        let before = commands(&store).len();

        store.select_point_without_fly_to(Some(point(1, 1.0, 1.0)));
        assert_eq!(commands(&store).len(), before);
        assert_eq!(store.selected_point(), Some(&point(1, 1.0, 1.0)));

        store.select_point(Some(point(2, 2.0, 2.0)));
        assert_eq!(commands(&store).len(), before + 1);
        assert_eq!(commands(&store).last(), Some(&fly_to([2.0, 2.0])));
    }

    #[test]
    fn test_silent_reselect_of_same_point_does_not_leak() {
        let mut store = initialized();
        store.select_point(Some(point(1, 1.0, 1.0)));
        store.select_point_without_fly_to(Some(point(1, 1.0, 1.0)));

        store.select_point(Some(point(2, 2.0, 2.0)));
        assert_eq!(commands(&store).last(), Some(&fly_to([2.0, 2.0])));
    }

    #[test]
    fn test_added_point_flies_with_zoom() {
        let mut store = initialized();
        store.set_added_point(Some(AddedPoint {
            point: point(0, 5.0, 6.0),
            center_map: false,
            zoom: None,
        }));

        assert_eq!(
            commands(&store).last(),
            Some(&CameraCommand::FlyTo {
                center: [5.0, 6.0],
                zoom: Some(ADDED_POINT_ZOOM),
                speed: Some(FLY_SPEED),
            })
        );
    }

    #[test]
    fn test_moving_added_point_only_recenters_on_request() {
        let mut store = initialized();
        store.set_added_point(Some(AddedPoint {
            point: point(0, 5.0, 6.0),
            center_map: false,
            zoom: None,
        }));
        let before = commands(&store).len();

        store.set_added_point(Some(AddedPoint {
            point: point(0, 7.0, 8.0),
            center_map: false,
            zoom: None,
        }));
        assert_eq!(commands(&store).len(), before);

        store.set_added_point(Some(AddedPoint {
            point: point(0, 9.0, 9.0),
            center_map: true,
            zoom: Some(12.0),
        }));
        assert_eq!(
            commands(&store).last(),
            Some(&CameraCommand::FlyTo {
                center: [9.0, 9.0],
                zoom: Some(12.0),
                speed: Some(FLY_SPEED),
            })
        );
    }

    #[test]
    fn test_selection_is_ignored_while_adding() {
        let mut store = initialized();
        store.set_added_point(Some(AddedPoint {
            point: point(0, 5.0, 6.0),
            center_map: false,
            zoom: None,
        }));
        let before = commands(&store).len();

        store.select_point(Some(point(1, 1.0, 1.0)));
        assert_eq!(commands(&store).len(), before);
    }

    #[test]
    fn test_reactions_before_init_only_update_state() {
        let mut store = TestStore::default();
        store.set_map_points(vec![point(1, 1.0, 1.0)]);
        assert!(store.camera().is_none());
        assert!(store.bounds().is_some());

        store.init(vec![]);
        assert_eq!(
            commands(&store),
            &[CameraCommand::FitBounds {
                bounds: LngLatBounds::from_point([1.0, 1.0]),
                padding: FIT_PADDING,
                max_zoom: Some(FIT_MAX_ZOOM),
            }]
        );
    }

    #[test]
    fn test_init_with_selection_flies_to_it() {
        let mut store = TestStore::default();
        store.set_map_points(vec![point(1, 1.0, 1.0), point(2, 3.0, 3.0)]);
        store.select_point(Some(point(2, 3.0, 3.0)));

        store.init(vec![]);
        assert_eq!(commands(&store), &[fly_to([3.0, 3.0])]);
    }
}
