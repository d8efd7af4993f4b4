//! Layered dirty-rectangle compositing engine for 2D game display layers.
//!
//! `bd_compositing` holds the platform-neutral engine (cameras, blit
//! records, the compositor's incremental-redraw pass, scene state);
//! `bd_backend_soft` supplies CPU pixel buffers behind its backend traits.
//! This crate re-exports both so embedders need a single dependency.

pub use bd_compositing::{
    Blit, Camera, Clipping, Color, CompositingError, Compositor, Display, DirtyBuffers,
    FrameStats, Point, Rect, Scale, ScaleCache, SceneId, SceneStore, Size, SpriteId, Surface,
    SurfaceId, blend,
};

pub use bd_backend_soft::{SoftDisplay, SoftSurface};
