//! Rotatable vector globe core: zoom model, quaternion viewport,
//! geographic clipping and layered compositing. The terminal shell in the
//! binary is one possible paint surface; the core emits paint operations
//! as plain data.

pub mod braille;
pub mod data;
pub mod geo;
pub mod map;
