//! Clips geographic chains against the viewport's bounding region and
//! projects the survivors to screen space.
//!
//! Clipping happens in lat/lon space against the four half-planes of the
//! bounding rectangle, walking consecutive point pairs and inserting
//! interpolated boundary crossings. Longitude interpolation always follows
//! the shorter angular path, so chains crossing the antimeridian never
//! produce full-width artifacts. Projection then rotates each survivor onto
//! the view hemisphere; chains crossing the horizon are split at the
//! silhouette instead of being joined across it.

use crate::geo::{wrap_lon_delta, GeoBounds, GeoCoordinate, GeoRect};
use crate::map::{VectorLayer, Viewport};
use glam::{DVec2, DVec3};
use tracing::trace;

/// Points this close to a clip boundary (radians) count as on-boundary and
/// are kept, so rounding at region edges cannot flicker geometry in and out.
pub const BOUNDARY_EPS: f64 = 1e-9;

/// One screen-space chain; `closed` marks a ring that survived clipping
/// intact and can be filled.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenChain {
    pub points: Vec<DVec2>,
    pub closed: bool,
}

/// The screen-space result of clipping one layer against one viewport.
/// Ephemeral: recomputed per paint pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClippedPath {
    pub chains: Vec<ScreenChain>,
}

impl ClippedPath {
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

/// Clip and project one layer. Stateless: a pure function of viewport and
/// layer geometry. Malformed chains are skipped, never fatal.
pub fn clip(viewport: &Viewport, layer: &VectorLayer) -> ClippedPath {
    let mut out = ClippedPath::default();
    let bounds = viewport.bounding_box();
    if bounds == GeoBounds::Empty {
        return out;
    }

    for chain in layer.chains() {
        if chain.points().len() < 2 {
            trace!(
                layer = layer.kind().name(),
                points = chain.points().len(),
                "skipping degenerate chain"
            );
            continue;
        }
        match bounds {
            GeoBounds::Empty => unreachable!("empty bounds handled above"),
            GeoBounds::WholeGlobe => {
                project_chain(viewport, chain.points(), chain.closed(), &mut out);
            }
            GeoBounds::Rect(rect) => {
                if !rect.intersects(chain.bounds()) {
                    continue;
                }
                if chain.closed() {
                    let ring = clip_ring(chain.points(), &rect);
                    if ring.len() >= 3 {
                        project_chain(viewport, &ring, true, &mut out);
                    }
                } else {
                    for segment in clip_polyline(chain.points(), &rect) {
                        if segment.len() >= 2 {
                            project_chain(viewport, &segment, false, &mut out);
                        }
                    }
                }
            }
        }
    }
    out
}

/// A point in the clipper's working space: latitude plus a longitude
/// unwrapped into the window centered on the clip rectangle.
#[derive(Debug, Clone, Copy)]
struct ClipPt {
    lon: f64,
    lat: f64,
}

#[derive(Debug, Clone, Copy)]
enum HalfPlane {
    LonMin(f64),
    LonMax(f64),
    LatMin(f64),
    LatMax(f64),
}

impl HalfPlane {
    fn signed_dist(self, p: ClipPt) -> f64 {
        match self {
            HalfPlane::LonMin(v) => p.lon - v,
            HalfPlane::LonMax(v) => v - p.lon,
            HalfPlane::LatMin(v) => p.lat - v,
            HalfPlane::LatMax(v) => v - p.lat,
        }
    }

    fn inside(self, p: ClipPt) -> bool {
        self.signed_dist(p) >= -BOUNDARY_EPS
    }

    /// Boundary crossing between `a` and `b`, interpolating longitude along
    /// the shorter angular path.
    fn crossing(self, a: ClipPt, b: ClipPt) -> ClipPt {
        match self {
            HalfPlane::LonMin(v) | HalfPlane::LonMax(v) => {
                let dlon = wrap_lon_delta(b.lon - a.lon);
                let t = if dlon.abs() > f64::EPSILON {
                    ((v - a.lon) / dlon).clamp(0.0, 1.0)
                } else {
                    0.5
                };
                ClipPt {
                    lon: v,
                    lat: a.lat + t * (b.lat - a.lat),
                }
            }
            HalfPlane::LatMin(v) | HalfPlane::LatMax(v) => {
                let dlat = b.lat - a.lat;
                let t = if dlat.abs() > f64::EPSILON {
                    ((v - a.lat) / dlat).clamp(0.0, 1.0)
                } else {
                    0.5
                };
                ClipPt {
                    lon: a.lon + t * wrap_lon_delta(b.lon - a.lon),
                    lat: v,
                }
            }
        }
    }
}

fn half_planes(rect: &GeoRect) -> Vec<HalfPlane> {
    let mut planes = Vec::with_capacity(4);
    if !rect.covers_all_lons() {
        planes.push(HalfPlane::LonMin(rect.min_lon));
        planes.push(HalfPlane::LonMax(rect.max_lon));
    }
    planes.push(HalfPlane::LatMin(rect.min_lat));
    planes.push(HalfPlane::LatMax(rect.max_lat));
    planes
}

fn to_clip_space(points: &[GeoCoordinate], rect: &GeoRect) -> Vec<ClipPt> {
    let mid = rect.mid_lon();
    points
        .iter()
        .map(|p| ClipPt {
            lon: mid + wrap_lon_delta(p.lon - mid),
            lat: p.lat,
        })
        .collect()
}

fn from_clip_space(points: Vec<ClipPt>) -> Vec<GeoCoordinate> {
    points
        .into_iter()
        .map(|p| GeoCoordinate::new(p.lon, p.lat))
        .collect()
}

/// Sutherland-Hodgman ring clip: the result stays a closed ring suitable
/// for filling. Interior vertices are preserved verbatim.
pub(crate) fn clip_ring(points: &[GeoCoordinate], rect: &GeoRect) -> Vec<GeoCoordinate> {
    let mut ring = to_clip_space(points, rect);
    for plane in half_planes(rect) {
        ring = clip_ring_halfplane(&ring, plane);
        if ring.len() < 3 {
            return Vec::new();
        }
    }
    from_clip_space(ring)
}

fn clip_ring_halfplane(ring: &[ClipPt], plane: HalfPlane) -> Vec<ClipPt> {
    let mut out = Vec::with_capacity(ring.len() + 4);
    for i in 0..ring.len() {
        let cur = ring[i];
        let next = ring[(i + 1) % ring.len()];
        let cur_in = plane.inside(cur);
        let next_in = plane.inside(next);
        if cur_in {
            out.push(cur);
        }
        if cur_in != next_in {
            out.push(plane.crossing(cur, next));
        }
    }
    out
}

/// Clip an open polyline; the path may split into disjoint segments when it
/// exits and re-enters the region.
pub(crate) fn clip_polyline(points: &[GeoCoordinate], rect: &GeoRect) -> Vec<Vec<GeoCoordinate>> {
    let mut segments = vec![to_clip_space(points, rect)];
    for plane in half_planes(rect) {
        let mut next = Vec::with_capacity(segments.len());
        for segment in segments {
            clip_polyline_halfplane(segment, plane, &mut next);
        }
        segments = next;
        if segments.is_empty() {
            return Vec::new();
        }
    }
    segments.into_iter().map(from_clip_space).collect()
}

fn clip_polyline_halfplane(segment: Vec<ClipPt>, plane: HalfPlane, out: &mut Vec<Vec<ClipPt>>) {
    let mut current: Vec<ClipPt> = Vec::new();
    if let Some(&first) = segment.first() {
        if plane.inside(first) {
            current.push(first);
        }
    }
    for pair in segment.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        match (plane.inside(a), plane.inside(b)) {
            (true, true) => current.push(b),
            (true, false) => {
                current.push(plane.crossing(a, b));
                if current.len() >= 2 {
                    out.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
            (false, true) => {
                current.clear();
                current.push(plane.crossing(a, b));
                current.push(b);
            }
            (false, false) => {}
        }
    }
    if current.len() >= 2 {
        out.push(current);
    }
}

/// Chord interpolation to the horizon (view-space x = 0), re-projected onto
/// the unit sphere so the split lands on the silhouette.
fn horizon_point(a: DVec3, b: DVec3) -> DVec3 {
    let t = (a.x / (a.x - b.x)).clamp(0.0, 1.0);
    a.lerp(b, t).normalize()
}

/// Rotate a clipped chain into view space, drop the far hemisphere, split at
/// the horizon and map to pixels.
fn project_chain(viewport: &Viewport, points: &[GeoCoordinate], closed: bool, out: &mut ClippedPath) {
    let rotation = viewport.rotation();
    let view: Vec<DVec3> = points.iter().map(|p| rotation.rotate(p.to_vec3())).collect();
    let n = view.len();
    if n < 2 {
        return;
    }

    if closed && view.iter().all(|v| v.x > 0.0) {
        out.chains.push(ScreenChain {
            points: view.iter().map(|&v| viewport.view_to_screen(v)).collect(),
            closed: true,
        });
        return;
    }

    let pair_count = if closed { n } else { n - 1 };
    let mut segments: Vec<Vec<DVec3>> = Vec::new();
    let mut current: Vec<DVec3> = Vec::new();
    if view[0].x > 0.0 {
        current.push(view[0]);
    }
    for i in 0..pair_count {
        let a = view[i];
        let b = view[(i + 1) % n];
        match (a.x > 0.0, b.x > 0.0) {
            (true, true) => current.push(b),
            (true, false) => {
                current.push(horizon_point(a, b));
                if current.len() >= 2 {
                    segments.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
            (false, true) => {
                current.clear();
                current.push(horizon_point(a, b));
                current.push(b);
            }
            (false, false) => {}
        }
    }
    if current.len() >= 2 {
        segments.push(current);
    }

    // A ring whose start vertex is visible gets walked past the wrap point;
    // stitch the tail segment back onto the head so the split count matches
    // the number of actual horizon crossings.
    if closed && segments.len() >= 2 && view[0].x > 0.0 {
        let tail = segments.pop().unwrap();
        let head = &segments[0];
        let mut merged = tail;
        merged.extend_from_slice(&head[1..]);
        segments[0] = merged;
    }

    for segment in segments {
        out.chains.push(ScreenChain {
            points: segment
                .into_iter()
                .map(|v| viewport.view_to_screen(v))
                .collect(),
            closed: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{GeoChain, LayerKind};

    fn deg_ring(points: &[(f64, f64)]) -> Vec<GeoCoordinate> {
        points
            .iter()
            .map(|&(lon, lat)| GeoCoordinate::from_degrees(lon, lat))
            .collect()
    }

    fn deg_rect(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> GeoRect {
        GeoRect::new(
            min_lon.to_radians(),
            max_lon.to_radians(),
            min_lat.to_radians(),
            max_lat.to_radians(),
        )
    }

    fn approx(a: GeoCoordinate, b: GeoCoordinate) -> bool {
        (a.lon - b.lon).abs() < 1e-12 && (a.lat - b.lat).abs() < 1e-12
    }

    #[test]
    fn test_ring_inside_is_identity() {
        let ring = deg_ring(&[(-10.0, -10.0), (10.0, -10.0), (10.0, 10.0), (-10.0, 10.0)]);
        let rect = deg_rect(-90.0, 90.0, -90.0, 90.0);
        let clipped = clip_ring(&ring, &rect);
        assert_eq!(clipped.len(), ring.len());
        for (c, r) in clipped.iter().zip(&ring) {
            assert!(approx(*c, *r), "{:?} != {:?}", c, r);
        }
    }

    #[test]
    fn test_ring_outside_is_empty() {
        let ring = deg_ring(&[(100.0, -10.0), (120.0, -10.0), (120.0, 10.0), (100.0, 10.0)]);
        let rect = deg_rect(-90.0, 90.0, -90.0, 90.0);
        assert!(clip_ring(&ring, &rect).is_empty());
    }

    #[test]
    fn test_ring_straddling_one_boundary() {
        // Square from -5° to 15° clipped at max_lon = 10°: the two vertices
        // beyond 10° are replaced by crossings exactly on the boundary and
        // the inside vertices survive untouched.
        let ring = deg_ring(&[(-5.0, -5.0), (15.0, -5.0), (15.0, 5.0), (-5.0, 5.0)]);
        let rect = deg_rect(-90.0, 10.0, -90.0, 90.0);
        let clipped = clip_ring(&ring, &rect);

        let boundary = 10f64.to_radians();
        let on_boundary: Vec<_> = clipped
            .iter()
            .filter(|p| (p.lon - boundary).abs() < 1e-9)
            .collect();
        assert_eq!(on_boundary.len(), 2);
        for survivor in [(-5.0, -5.0), (-5.0, 5.0)] {
            let expected = GeoCoordinate::from_degrees(survivor.0, survivor.1);
            assert!(clipped.iter().any(|p| approx(*p, expected)));
        }
        assert!(!clipped.iter().any(|p| p.lon > boundary + 1e-9));
        assert_eq!(clipped.len(), 4);
    }

    #[test]
    fn test_antimeridian_chain_stays_adjacent() {
        // 179° and -179° are 2° apart; clipping against a window straddling
        // the antimeridian must keep the segment intact instead of treating
        // it as a 358° sweep.
        let chain = deg_ring(&[(179.0, 0.0), (-179.0, 0.0)]);
        let rect = deg_rect(170.0, 190.0, -10.0, 10.0);
        let segments = clip_polyline(&chain, &rect);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), 2);
        assert!(approx(segments[0][0], chain[0]));
        assert!(approx(segments[0][1], chain[1]));
    }

    #[test]
    fn test_antimeridian_chain_rejected_far_away() {
        // The same short chain is nowhere near a window around 0° and must
        // clip to nothing, not to a globe-spanning band.
        let chain = deg_ring(&[(179.0, 0.0), (-179.0, 0.0)]);
        let rect = deg_rect(-90.0, 90.0, -10.0, 10.0);
        assert!(clip_polyline(&chain, &rect).is_empty());
    }

    #[test]
    fn test_polyline_splits_on_reentry() {
        // Runs out over max_lat and comes back: two disjoint segments.
        let chain = deg_ring(&[(0.0, 0.0), (2.0, 20.0), (4.0, 0.0)]);
        let rect = deg_rect(-90.0, 90.0, -10.0, 10.0);
        let segments = clip_polyline(&chain, &rect);
        assert_eq!(segments.len(), 2);
        for segment in &segments {
            assert!(segment.len() >= 2);
            let boundary = 10f64.to_radians();
            assert!(segment.iter().any(|p| (p.lat - boundary).abs() < 1e-9));
        }
    }

    #[test]
    fn test_degenerate_chain_is_empty_not_error() {
        let mut vp = Viewport::new(800, 600);
        vp.set_zoom(1000).unwrap();
        let layer = VectorLayer::new(
            LayerKind::River,
            vec![
                GeoChain::line(vec![]),
                GeoChain::line(vec![GeoCoordinate::new(0.0, 0.0)]),
            ],
        );
        assert!(clip(&vp, &layer).is_empty());
    }

    #[test]
    fn test_horizon_split_inserts_silhouette_point() {
        // Zoomed far out so the whole globe is the bounding region; the chain
        // marches east past the 90° horizon and must be cut there.
        let mut vp = Viewport::new(800, 600);
        vp.set_zoom(5).unwrap();
        let layer = VectorLayer::new(
            LayerKind::River,
            vec![GeoChain::line(deg_ring(&[
                (0.0, 0.0),
                (40.0, 0.0),
                (80.0, 0.0),
                (120.0, 0.0),
                (160.0, 0.0),
            ]))],
        );
        let path = clip(&vp, &layer);
        assert_eq!(path.chains.len(), 1);
        let chain = &path.chains[0];
        assert_eq!(chain.points.len(), 4);

        // The inserted cut sits on the silhouette: one radius east of center.
        let r = vp.radius();
        let last = chain.points.last().unwrap();
        assert!((last.x - (400.0 + r)).abs() < 1e-6);
        assert!((last.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_ring_crossing_horizon_becomes_open_segment() {
        let mut vp = Viewport::new(800, 600);
        vp.set_zoom(5).unwrap();
        // Band straddling the horizon at lon 90°.
        let layer = VectorLayer::new(
            LayerKind::Land,
            vec![GeoChain::ring(deg_ring(&[
                (60.0, -20.0),
                (120.0, -20.0),
                (120.0, 20.0),
                (60.0, 20.0),
            ]))],
        );
        let path = clip(&vp, &layer);
        assert!(!path.is_empty());
        for chain in &path.chains {
            assert!(!chain.closed);
        }
    }

    #[test]
    fn test_fully_visible_ring_stays_closed() {
        let mut vp = Viewport::new(800, 600);
        vp.set_zoom(5).unwrap();
        let layer = VectorLayer::new(
            LayerKind::Land,
            vec![GeoChain::ring(deg_ring(&[
                (-10.0, -10.0),
                (10.0, -10.0),
                (10.0, 10.0),
                (-10.0, 10.0),
            ]))],
        );
        let path = clip(&vp, &layer);
        assert_eq!(path.chains.len(), 1);
        assert!(path.chains[0].closed);
        assert_eq!(path.chains[0].points.len(), 4);
    }

    #[test]
    fn test_empty_viewport_clips_everything() {
        let mut vp = Viewport::new(800, 600);
        vp.set_zoom(1000).unwrap();
        vp.resize(0, 0).unwrap();
        let layer = VectorLayer::new(
            LayerKind::Land,
            vec![GeoChain::ring(deg_ring(&[
                (-10.0, -10.0),
                (10.0, -10.0),
                (10.0, 10.0),
                (-10.0, 10.0),
            ]))],
        );
        assert!(clip(&vp, &layer).is_empty());
    }
}
