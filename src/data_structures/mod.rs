//! Level data structures: vertices, textures, areas and the scene arena.
//!
//! - `vertex` is the interleaved vertex format uploaded for every surface
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `area` holds surfaces, portals and the per-frame render marker of an area
//! - `scene` owns all areas and decides which of them a frame draws

pub mod area;
pub mod scene;
pub mod texture;
pub mod vertex;
