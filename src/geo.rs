use glam::DVec3;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Wrap an angular difference into [-π, π) (the shorter way around).
#[inline(always)]
pub fn wrap_lon_delta(delta: f64) -> f64 {
    (delta + PI).rem_euclid(TAU) - PI
}

/// Normalize a longitude into (-π, π].
#[inline(always)]
pub fn normalize_lon(lon: f64) -> f64 {
    let wrapped = wrap_lon_delta(lon);
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}

/// A geographic position in radians.
/// Longitude is kept in (-π, π], latitude in [-π/2, π/2].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub lon: f64,
    pub lat: f64,
}

impl GeoCoordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon: normalize_lon(lon),
            lat: lat.clamp(-FRAC_PI_2, FRAC_PI_2),
        }
    }

    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        Self::new(lon.to_radians(), lat.to_radians())
    }

    /// Unit-sphere vector: x toward (0°, 0°), y east, z north.
    pub fn to_vec3(self) -> DVec3 {
        DVec3::new(
            self.lat.cos() * self.lon.cos(),
            self.lat.cos() * self.lon.sin(),
            self.lat.sin(),
        )
    }

    pub fn from_vec3(v: DVec3) -> Self {
        Self::new(v.y.atan2(v.x), v.z.clamp(-1.0, 1.0).asin())
    }
}

/// Geographic rectangle. Longitudes are stored unwrapped (`min_lon <= max_lon`
/// but either may leave (-π, π] when the rectangle crosses the antimeridian);
/// the overlap test shifts intervals by full turns as needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRect {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl GeoRect {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Tight rectangle around a point chain, accumulating longitudes along the
    /// shorter angular path so a chain touching 179° and -179° spans 2°, not 358°.
    pub fn from_chain(points: &[GeoCoordinate]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        };
        let mut lon = first.lon;
        let mut min_lon = lon;
        let mut max_lon = lon;
        let mut min_lat = first.lat;
        let mut max_lat = first.lat;
        let mut prev = first.lon;

        for p in &points[1..] {
            lon += wrap_lon_delta(p.lon - prev);
            prev = p.lon;
            min_lon = min_lon.min(lon);
            max_lon = max_lon.max(lon);
            min_lat = min_lat.min(p.lat);
            max_lat = max_lat.max(p.lat);
        }
        Self::new(min_lon, max_lon, min_lat, max_lat)
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn mid_lon(&self) -> f64 {
        0.5 * (self.min_lon + self.max_lon)
    }

    /// Whether the rectangle covers every longitude.
    pub fn covers_all_lons(&self) -> bool {
        self.lon_span() >= TAU - 1e-12
    }

    pub fn intersects(&self, other: &GeoRect) -> bool {
        if self.min_lat > other.max_lat || other.min_lat > self.max_lat {
            return false;
        }
        if self.covers_all_lons() || other.covers_all_lons() {
            return true;
        }
        // Longitude intervals live on a circle: try the three possible alignments.
        for shift in [-TAU, 0.0, TAU] {
            if self.min_lon <= other.max_lon + shift && other.min_lon + shift <= self.max_lon {
                return true;
            }
        }
        false
    }

    pub fn contains(&self, point: GeoCoordinate) -> bool {
        if point.lat < self.min_lat || point.lat > self.max_lat {
            return false;
        }
        if self.covers_all_lons() {
            return true;
        }
        for shift in [-TAU, 0.0, TAU] {
            let lon = point.lon + shift;
            if lon >= self.min_lon && lon <= self.max_lon {
                return true;
            }
        }
        false
    }
}

/// The geographic region guaranteed to contain everything visible on screen.
/// May over-approximate, never under-approximate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoBounds {
    /// Full sphere in view; clipping is a no-op downstream.
    WholeGlobe,
    Rect(GeoRect),
    /// Degenerate viewport (zero-sized); nothing is visible.
    Empty,
}

impl GeoBounds {
    pub fn intersects(&self, rect: &GeoRect) -> bool {
        match self {
            GeoBounds::WholeGlobe => true,
            GeoBounds::Rect(r) => r.intersects(rect),
            GeoBounds::Empty => false,
        }
    }

    pub fn contains(&self, point: GeoCoordinate) -> bool {
        match self {
            GeoBounds::WholeGlobe => true,
            GeoBounds::Rect(r) => r.contains(point),
            GeoBounds::Empty => false,
        }
    }
}
