//! Resolves per-layer styles and emits paint operations in the fixed order
//! the paint surface must honor: later entries occlude earlier ones.

use crate::map::clip::{clip, ClippedPath, ScreenChain};
use crate::map::{LayerKind, LayerStyle, MapError, Stroke, VectorLayer, Viewport};
use glam::DVec2;
use std::f64::consts::TAU;

/// Painting sequence. Changing this order produces visibly wrong maps
/// (e.g. borders hidden under the land fill).
pub const PAINT_ORDER: [LayerKind; LayerKind::COUNT] = [
    LayerKind::Ocean,
    LayerKind::Land,
    LayerKind::Ice,
    LayerKind::Lake,
    LayerKind::Glacier,
    LayerKind::River,
    LayerKind::CountryBorder,
    LayerKind::StateBorder,
];

/// Vertex count of the synthesized ocean disc ring.
const DISC_SAMPLES: usize = 64;

/// One entry of a frame: a clipped, projected path and the style to draw
/// it with. Consumed in sequence by the external paint surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintOp {
    pub kind: LayerKind,
    pub path: ClippedPath,
    pub style: LayerStyle,
}

/// Owns the style table; geometry is borrowed per call. Style mutations must
/// be serialized with `composite` by the caller (apply between frames).
#[derive(Debug, Clone, PartialEq)]
pub struct LayerCompositor {
    styles: [LayerStyle; LayerKind::COUNT],
}

impl LayerCompositor {
    /// Atlas-flavored default styles; everything visible.
    pub fn new() -> Self {
        let mut styles =
            [LayerStyle::new(true, [1.0, 1.0, 1.0, 1.0], Stroke::Solid); LayerKind::COUNT];
        for kind in LayerKind::ALL {
            let color = match kind {
                LayerKind::Ocean => [0.26, 0.46, 0.73, 1.0],
                LayerKind::Land => [0.55, 0.67, 0.46, 1.0],
                LayerKind::Ice => [0.93, 0.96, 0.99, 1.0],
                LayerKind::Lake => [0.33, 0.55, 0.80, 1.0],
                LayerKind::Glacier => [0.82, 0.89, 0.94, 1.0],
                LayerKind::River => [0.40, 0.62, 0.86, 1.0],
                LayerKind::CountryBorder => [0.75, 0.65, 0.30, 1.0],
                LayerKind::StateBorder => [0.60, 0.60, 0.60, 1.0],
            };
            styles[kind.index()] = LayerStyle::new(true, color, kind.stroke());
        }
        Self { styles }
    }

    pub fn style(&self, kind: LayerKind) -> &LayerStyle {
        &self.styles[kind.index()]
    }

    /// Replace a layer's color by name. The fill/stroke treatment stays fixed
    /// per kind (fill layers are brush-only, borders and rivers pen-only,
    /// state borders dotted). Unknown names fail without touching the table.
    pub fn set_style(&mut self, name: &str, color: [f32; 4]) -> Result<(), MapError> {
        let kind = LayerKind::from_name(name)?;
        let entry = &mut self.styles[kind.index()];
        entry.color = color;
        entry.stroke = kind.stroke();
        Ok(())
    }

    /// Toggle a layer by name. Invisible layers are skipped before clipping.
    pub fn set_visible(&mut self, name: &str, visible: bool) -> Result<(), MapError> {
        let kind = LayerKind::from_name(name)?;
        self.styles[kind.index()].visible = visible;
        Ok(())
    }

    pub fn is_visible(&self, kind: LayerKind) -> bool {
        self.styles[kind.index()].visible
    }

    pub fn toggle(&mut self, kind: LayerKind) {
        let entry = &mut self.styles[kind.index()];
        entry.visible = !entry.visible;
    }

    /// Produce one frame: for every visible layer in paint order, clip the
    /// layer's geometry and pair it with its resolved style. Visible layers
    /// whose geometry clips away entirely still emit an op with an empty
    /// path. Pure given immutable viewport and geometry snapshots.
    pub fn composite(&self, viewport: &Viewport, layers: &[VectorLayer]) -> Vec<PaintOp> {
        let mut ops = Vec::with_capacity(LayerKind::COUNT);
        for kind in PAINT_ORDER {
            let style = self.styles[kind.index()];
            if !style.visible {
                continue;
            }

            let mut path = ClippedPath::default();
            let mut has_geometry = false;
            for layer in layers.iter().filter(|l| l.kind() == kind) {
                has_geometry = true;
                path.chains.extend(clip(viewport, layer).chains);
            }

            // The ocean has no vector geometry of its own; it fills the
            // visible disc behind everything else.
            if kind == LayerKind::Ocean && !has_geometry {
                path = ocean_disc(viewport);
            }

            ops.push(PaintOp { kind, path, style });
        }
        ops
    }
}

impl Default for LayerCompositor {
    fn default() -> Self {
        Self::new()
    }
}

/// The globe's silhouette as a closed screen-space ring.
fn ocean_disc(viewport: &Viewport) -> ClippedPath {
    if viewport.width() == 0 || viewport.height() == 0 {
        return ClippedPath::default();
    }
    let cx = viewport.width() as f64 / 2.0;
    let cy = viewport.height() as f64 / 2.0;
    let r = viewport.radius();
    let points = (0..DISC_SAMPLES)
        .map(|i| {
            let theta = TAU * i as f64 / DISC_SAMPLES as f64;
            DVec2::new(cx + r * theta.cos(), cy + r * theta.sin())
        })
        .collect();
    ClippedPath {
        chains: vec![ScreenChain {
            points,
            closed: true,
        }],
    }
}
