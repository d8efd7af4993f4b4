use crate::types::{Color, Point, Rect, Scale, Size, SurfaceId};

/// Blend flag constants understood by surface backends.
///
/// Unknown bits are ignored, so flags can be forwarded untouched from
/// draw requests to the backend.
pub mod blend {
    /// Straight alpha-over compositing (the default).
    pub const ALPHA: u32 = 0;
    /// Additive blending.
    pub const ADD: u32 = 1;
}

/// A 2D pixel buffer with alpha, provided by the backend.
///
/// Surfaces are handles: cloning is cheap and clones alias the same pixels.
/// The size of a surface never changes after creation. `id` must be stable
/// for the lifetime of the handle and shared by its clones; the scale cache
/// keys on it, so pixel contents must not be mutated behind a cached id.
pub trait Surface: Clone {
    fn id(&self) -> SurfaceId;

    fn size(&self) -> Size;

    /// The surface area as an origin-anchored rectangle.
    fn rect(&self) -> Rect {
        Rect::of_size(self.size())
    }

    /// Fill the whole surface with a solid color.
    fn fill(&mut self, color: Color);

    /// Composite `src[area]` (or all of `src`) with its top-left at `dest`.
    ///
    /// The source area is clipped to the source bounds and the painted
    /// region to this surface's bounds. Returns the rectangle actually
    /// painted, empty if the blit landed entirely outside.
    fn blit(&mut self, src: &Self, dest: Point, area: Option<Rect>, flags: u32) -> Rect;

    /// Copy out a sub-region as a new surface. `area` must lie inside
    /// the surface bounds.
    fn subsurface(&self, area: Rect) -> Self;

    /// Resample to `ceil(size * factor)`. Pure: the receiver is unchanged
    /// and the result is a fresh surface.
    fn scaled(&self, factor: Scale) -> Self;
}

/// The physical display owned by the root compositor.
pub trait Display {
    type Surface: Surface;

    fn size(&self) -> Size;

    /// The back buffer all compositing lands on.
    fn screen(&mut self) -> &mut Self::Surface;

    /// Allocate a fresh surface (e.g. a replacement background).
    fn create_surface(&mut self, size: Size) -> Self::Surface;

    /// Flush the given regions of the back buffer to the physical display.
    fn present(&mut self, rects: &[Rect]);
}
