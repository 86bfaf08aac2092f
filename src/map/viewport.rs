use crate::geo::{wrap_lon_delta, GeoBounds, GeoCoordinate, GeoRect};
use crate::map::{MapError, Rotation, ZoomModel};
use glam::{DVec2, DVec3};
use std::cell::Cell;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::debug;

/// Boundary samples taken per screen edge when deriving the bounding region.
const EDGE_SAMPLES: usize = 8;
/// Samples taken around the globe's silhouette circle.
const RIM_SAMPLES: usize = 32;

/// Owns the projection state: screen size, globe orientation and zoom.
///
/// The visible geographic bounding region is derived lazily; any mutation
/// invalidates it and the next `bounding_box` call recomputes it once.
#[derive(Debug, Clone)]
pub struct Viewport {
    width: u32,
    height: u32,
    rotation: Rotation,
    zoom: ZoomModel,
    bounds: Cell<Option<GeoBounds>>,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rotation: Rotation::IDENTITY,
            zoom: ZoomModel::new(),
            bounds: Cell::new(None),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Globe radius in pixels: the linear zoom is the orthographic scale.
    pub fn radius(&self) -> f64 {
        self.zoom.linear_zoom()
    }

    /// Update the screen size. Negative sizes are rejected atomically;
    /// zero is a legal degenerate size that yields an empty bounding region.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), MapError> {
        if width < 0 || height < 0 {
            return Err(MapError::InvalidDimensions { width, height });
        }
        self.width = width as u32;
        self.height = height as u32;
        self.invalidate();
        Ok(())
    }

    /// Compose an incremental rotation with the current orientation.
    pub fn rotate(&mut self, delta: Rotation) {
        self.rotation = self.rotation.compose(delta);
        self.invalidate();
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        self.invalidate();
    }

    pub fn set_zoom(&mut self, linear: i32) -> Result<(), MapError> {
        let before = self.zoom.log_zoom();
        self.zoom.set_zoom(linear)?;
        if self.zoom.log_zoom() != before {
            self.invalidate();
        }
        Ok(())
    }

    pub fn zoom(&self) -> i32 {
        self.zoom.zoom()
    }

    pub fn log_zoom(&self) -> f64 {
        self.zoom.log_zoom()
    }

    pub fn step_up(&mut self) {
        if self.zoom.step_up() {
            self.invalidate();
        }
    }

    pub fn step_down(&mut self) {
        if self.zoom.step_down() {
            self.invalidate();
        }
    }

    /// Project a geographic point to pixel coordinates.
    /// Returns `None` for points on the far side of the globe.
    pub fn project(&self, point: GeoCoordinate) -> Option<DVec2> {
        let v = self.rotation.rotate(point.to_vec3());
        if v.x <= 0.0 {
            return None;
        }
        Some(self.view_to_screen(v))
    }

    /// Map a view-space unit vector to pixel coordinates.
    pub(crate) fn view_to_screen(&self, v: DVec3) -> DVec2 {
        let r = self.radius();
        DVec2::new(
            self.width as f64 / 2.0 + v.y * r,
            self.height as f64 / 2.0 - v.z * r,
        )
    }

    /// Back-project pixel coordinates onto the sphere.
    /// Returns `None` outside the visible disc.
    pub fn unproject(&self, px: f64, py: f64) -> Option<GeoCoordinate> {
        let r = self.radius();
        let sy = (px - self.width as f64 / 2.0) / r;
        let sz = (self.height as f64 / 2.0 - py) / r;
        let r2 = sy * sy + sz * sz;
        if r2 > 1.0 {
            return None;
        }
        let v = DVec3::new((1.0 - r2).sqrt(), sy, sz);
        Some(GeoCoordinate::from_vec3(self.rotation.rotate_back(v)))
    }

    /// The geographic region containing everything on screen. Lazy: recomputed
    /// only after a mutation, idempotent between mutations.
    pub fn bounding_box(&self) -> GeoBounds {
        if let Some(bounds) = self.bounds.get() {
            return bounds;
        }
        let bounds = self.compute_bounds();
        self.bounds.set(Some(bounds));
        bounds
    }

    fn invalidate(&mut self) {
        self.bounds.set(None);
    }

    /// Sample the screen boundary and the globe silhouette, back-project, and
    /// take the enclosing lat/lon rectangle. Over-approximates (sampling gaps
    /// are padded, poles widen the rectangle), never under-approximates.
    fn compute_bounds(&self) -> GeoBounds {
        let (w, h) = (self.width as f64, self.height as f64);
        if self.width == 0 || self.height == 0 {
            debug!(width = self.width, height = self.height, "degenerate viewport");
            return GeoBounds::Empty;
        }
        let r = self.radius();
        if 2.0 * r <= w && 2.0 * r <= h {
            debug!(radius = r, "whole globe in view");
            return GeoBounds::WholeGlobe;
        }

        let mut samples: Vec<GeoCoordinate> = Vec::with_capacity(4 * EDGE_SAMPLES + RIM_SAMPLES + 1);

        // Screen center is always on the disc.
        if let Some(c) = self.unproject(w / 2.0, h / 2.0) {
            samples.push(c);
        }

        // Perimeter of the screen rectangle.
        for i in 0..=EDGE_SAMPLES {
            let t = i as f64 / EDGE_SAMPLES as f64;
            for (px, py) in [
                (t * w, 0.0),
                (t * w, h),
                (0.0, t * h),
                (w, t * h),
            ] {
                if let Some(p) = self.unproject(px, py) {
                    samples.push(p);
                }
            }
        }

        // Silhouette circle, where it falls on screen.
        let mut rim_sampled = false;
        for i in 0..RIM_SAMPLES {
            let theta = TAU * i as f64 / RIM_SAMPLES as f64;
            let view = DVec3::new(0.0, theta.cos(), theta.sin());
            let screen = self.view_to_screen(view);
            if screen.x >= 0.0 && screen.x <= w && screen.y >= 0.0 && screen.y <= h {
                samples.push(GeoCoordinate::from_vec3(self.rotation.rotate_back(view)));
                rim_sampled = true;
            }
        }

        let Some(first) = samples.first().copied() else {
            return GeoBounds::Empty;
        };

        // Enclose the samples, unwrapping longitudes around the first sample.
        let mut min_lon = first.lon;
        let mut max_lon = first.lon;
        let mut min_lat = first.lat;
        let mut max_lat = first.lat;
        for p in &samples[1..] {
            let lon = first.lon + wrap_lon_delta(p.lon - first.lon);
            min_lon = min_lon.min(lon);
            max_lon = max_lon.max(lon);
            min_lat = min_lat.min(p.lat);
            max_lat = max_lat.max(p.lat);
        }

        // Pad for the angular gap between adjacent samples.
        let edge_gap = (w.max(h) / EDGE_SAMPLES as f64) / r;
        let rim_gap = if rim_sampled { TAU / RIM_SAMPLES as f64 } else { 0.0 };
        let pad = (0.5 * edge_gap.max(rim_gap) + 1e-6).min(PI / 4.0);
        min_lon -= pad;
        max_lon += pad;
        min_lat = (min_lat - pad).max(-FRAC_PI_2);
        max_lat = (max_lat + pad).min(FRAC_PI_2);

        // A visible pole makes every longitude visible.
        for (pole, north) in [(DVec3::Z, true), (DVec3::NEG_Z, false)] {
            let v = self.rotation.rotate(pole);
            if v.x >= 0.0 {
                let screen = self.view_to_screen(v);
                if screen.x >= 0.0 && screen.x <= w && screen.y >= 0.0 && screen.y <= h {
                    min_lon = -PI;
                    max_lon = PI;
                    if north {
                        max_lat = FRAC_PI_2;
                    } else {
                        min_lat = -FRAC_PI_2;
                    }
                }
            }
        }

        // Longitude ranges wider than a hemisphere are not trustworthy under
        // the unwrapping above; widen to the full circle.
        if max_lon - min_lon > PI {
            min_lon = -PI;
            max_lon = PI;
        }

        debug!(
            min_lon, max_lon, min_lat, max_lat,
            "recomputed viewport bounding region"
        );
        GeoBounds::Rect(GeoRect::new(min_lon, max_lon, min_lat, max_lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(width: u32, height: u32, zoom: i32) -> Viewport {
        let mut vp = Viewport::new(width, height);
        vp.set_zoom(zoom).unwrap();
        vp
    }

    #[test]
    fn test_project_center() {
        let vp = viewport(800, 600, 1000);
        let p = vp.project(GeoCoordinate::new(0.0, 0.0)).unwrap();
        assert!((p.x - 400.0).abs() < 1e-9);
        assert!((p.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_project_far_side_dropped() {
        let vp = viewport(800, 600, 1000);
        assert!(vp.project(GeoCoordinate::from_degrees(180.0, 0.0)).is_none());
    }

    #[test]
    fn test_unproject_round_trip() {
        let mut vp = viewport(800, 600, 2000);
        vp.rotate(Rotation::looking_at(GeoCoordinate::from_degrees(30.0, 50.0)));
        let geo = GeoCoordinate::from_degrees(32.0, 48.0);
        let px = vp.project(geo).unwrap();
        let back = vp.unproject(px.x, px.y).unwrap();
        assert!((back.lon - geo.lon).abs() < 1e-9);
        assert!((back.lat - geo.lat).abs() < 1e-9);
    }

    #[test]
    fn test_resize_rejects_negative() {
        let mut vp = viewport(800, 600, 1000);
        assert_eq!(
            vp.resize(-1, 600),
            Err(MapError::InvalidDimensions {
                width: -1,
                height: 600
            })
        );
        // Atomic failure: size unchanged.
        assert_eq!(vp.width(), 800);
        assert_eq!(vp.height(), 600);
    }

    #[test]
    fn test_zero_size_is_empty_not_fatal() {
        let mut vp = viewport(800, 600, 1000);
        vp.resize(0, 0).unwrap();
        assert_eq!(vp.bounding_box(), GeoBounds::Empty);
    }

    #[test]
    fn test_whole_globe_when_zoomed_out() {
        // Radius 5 (zoom 5) against an 800x600 screen: the disc fits entirely.
        let vp = viewport(800, 600, 5);
        assert_eq!(vp.bounding_box(), GeoBounds::WholeGlobe);
    }

    #[test]
    fn test_bounding_box_contains_visible_points() {
        for (lon, lat) in [(0.0, 0.0), (60.0, 20.0), (-130.0, -45.0), (175.0, 80.0)] {
            let mut vp = viewport(800, 600, 2500);
            vp.rotate(Rotation::looking_at(GeoCoordinate::from_degrees(lon, lat)));
            let bounds = vp.bounding_box();

            for px in (0..=800).step_by(50) {
                for py in (0..=600).step_by(50) {
                    if let Some(geo) = vp.unproject(px as f64, py as f64) {
                        assert!(
                            bounds.contains(geo),
                            "({}, {}) on screen but outside bounds {:?} at view ({}, {})",
                            geo.lon.to_degrees(),
                            geo.lat.to_degrees(),
                            bounds,
                            lon,
                            lat
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_bounding_box_idempotent() {
        let mut vp = viewport(800, 600, 1500);
        vp.rotate(Rotation::looking_at(GeoCoordinate::from_degrees(10.0, 10.0)));
        let a = vp.bounding_box();
        let b = vp.bounding_box();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pole_in_view_widens_longitudes() {
        let mut vp = viewport(800, 600, 1200);
        vp.rotate(Rotation::looking_at(GeoCoordinate::from_degrees(0.0, 90.0)));
        match vp.bounding_box() {
            GeoBounds::Rect(rect) => {
                assert!(rect.covers_all_lons() || rect.lon_span() >= PI);
                assert!((rect.max_lat - FRAC_PI_2).abs() < 1e-9);
            }
            GeoBounds::WholeGlobe => {}
            GeoBounds::Empty => panic!("pole view produced empty bounds"),
        }
    }
}
