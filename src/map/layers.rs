use crate::geo::{GeoCoordinate, GeoRect};
use crate::map::MapError;

/// The closed set of thematic layers. Adding a layer means extending this
/// enumeration and the paint order, not adding bespoke style fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Ocean,
    Land,
    Ice,
    Lake,
    Glacier,
    River,
    CountryBorder,
    StateBorder,
}

impl LayerKind {
    pub const COUNT: usize = 8;

    pub const ALL: [LayerKind; Self::COUNT] = [
        LayerKind::Ocean,
        LayerKind::Land,
        LayerKind::Ice,
        LayerKind::Lake,
        LayerKind::Glacier,
        LayerKind::River,
        LayerKind::CountryBorder,
        LayerKind::StateBorder,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Ocean => "ocean",
            LayerKind::Land => "land",
            LayerKind::Ice => "ice",
            LayerKind::Lake => "lake",
            LayerKind::Glacier => "glacier",
            LayerKind::River => "river",
            LayerKind::CountryBorder => "country-border",
            LayerKind::StateBorder => "state-border",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, MapError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| MapError::UnknownLayer {
                name: name.to_string(),
            })
    }

    /// Fill layers carry a brush and no pen; the rest are stroke-only.
    pub fn is_fill(self) -> bool {
        matches!(
            self,
            LayerKind::Ocean | LayerKind::Land | LayerKind::Ice | LayerKind::Lake | LayerKind::Glacier
        )
    }

    /// The stroke treatment is fixed per layer kind; state borders are dotted.
    pub fn stroke(self) -> Stroke {
        if self.is_fill() {
            Stroke::Fill
        } else if self == LayerKind::StateBorder {
            Stroke::Dotted
        } else {
            Stroke::Solid
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Fill,
    Solid,
    Dotted,
}

/// Resolved presentation of one layer: RGBA color, fill/stroke treatment
/// and whether the layer is painted at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub visible: bool,
    pub color: [f32; 4],
    pub stroke: Stroke,
}

impl LayerStyle {
    pub const fn new(visible: bool, color: [f32; 4], stroke: Stroke) -> Self {
        Self {
            visible,
            color,
            stroke,
        }
    }
}

/// One geographic point chain: a closed ring (fillable) or an open polyline.
/// The bounding rectangle is precomputed for the clipper's cheap reject.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoChain {
    points: Vec<GeoCoordinate>,
    closed: bool,
    bounds: GeoRect,
}

impl GeoChain {
    pub fn ring(points: Vec<GeoCoordinate>) -> Self {
        Self::build(points, true)
    }

    pub fn line(points: Vec<GeoCoordinate>) -> Self {
        Self::build(points, false)
    }

    fn build(mut points: Vec<GeoCoordinate>, closed: bool) -> Self {
        // A ring closing onto its own first point would double it downstream.
        if closed && points.len() >= 2 {
            let first = points[0];
            let last = *points.last().unwrap();
            if (first.lon - last.lon).abs() < 1e-12 && (first.lat - last.lat).abs() < 1e-12 {
                points.pop();
            }
        }
        let bounds = GeoRect::from_chain(&points);
        Self {
            points,
            closed,
            bounds,
        }
    }

    pub fn points(&self) -> &[GeoCoordinate] {
        &self.points
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn bounds(&self) -> &GeoRect {
        &self.bounds
    }
}

/// An immutable geometry snapshot for one layer, supplied by the external
/// parsing collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorLayer {
    kind: LayerKind,
    chains: Vec<GeoChain>,
}

impl VectorLayer {
    pub fn new(kind: LayerKind, chains: Vec<GeoChain>) -> Self {
        Self { kind, chains }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn chains(&self) -> &[GeoChain] {
        &self.chains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_names_round_trip() {
        for kind in LayerKind::ALL {
            assert_eq!(LayerKind::from_name(kind.name()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_layer_rejected() {
        assert_eq!(
            LayerKind::from_name("asteroids"),
            Err(MapError::UnknownLayer {
                name: "asteroids".to_string()
            })
        );
    }

    #[test]
    fn test_stroke_kinds() {
        assert_eq!(LayerKind::Land.stroke(), Stroke::Fill);
        assert_eq!(LayerKind::River.stroke(), Stroke::Solid);
        assert_eq!(LayerKind::CountryBorder.stroke(), Stroke::Solid);
        assert_eq!(LayerKind::StateBorder.stroke(), Stroke::Dotted);
    }

    #[test]
    fn test_ring_drops_closing_duplicate() {
        let ring = GeoChain::ring(vec![
            GeoCoordinate::from_degrees(0.0, 0.0),
            GeoCoordinate::from_degrees(10.0, 0.0),
            GeoCoordinate::from_degrees(10.0, 10.0),
            GeoCoordinate::from_degrees(0.0, 0.0),
        ]);
        assert_eq!(ring.points().len(), 3);
        assert!(ring.closed());
    }
}
