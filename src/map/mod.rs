mod cache;
pub mod clip;
mod compose;
mod error;
mod layers;
mod rotation;
mod viewport;
mod zoom;

pub use cache::{TileCacheConfig, DEFAULT_PERSISTENT_LIMIT, DEFAULT_VOLATILE_LIMIT};
pub use clip::{ClippedPath, ScreenChain};
pub use compose::{LayerCompositor, PaintOp, PAINT_ORDER};
pub use error::MapError;
pub use layers::{GeoChain, LayerKind, LayerStyle, Stroke, VectorLayer};
pub use rotation::Rotation;
pub use viewport::Viewport;
pub use zoom::ZoomModel;
