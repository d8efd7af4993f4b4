//! Platform-neutral dirty-rectangle compositing core.
//!
//! Sprites are blitted through [`Camera`]s (nested virtual-to-real
//! coordinate spaces) into a single [`Compositor`], which keeps
//! two-frame-deep dirty-rectangle bookkeeping and repaints only the
//! regions that changed. Pixel storage is behind the [`Surface`] and
//! [`Display`] traits; see `bd_backend_soft` for the CPU implementation.

pub mod backend;
pub mod blit;
pub mod camera;
pub mod compositor;
pub mod dirty;
pub mod error;
pub mod scale;
pub mod scene;
pub mod types;

#[cfg(test)]
mod mock;

pub use backend::{Display, Surface, blend};
pub use blit::{Blit, Clipping};
pub use camera::Camera;
pub use compositor::{Compositor, FrameStats};
pub use dirty::DirtyBuffers;
pub use error::CompositingError;
pub use scale::ScaleCache;
pub use scene::SceneStore;
pub use types::{Color, Point, Rect, Scale, SceneId, Size, SpriteId, SurfaceId};
