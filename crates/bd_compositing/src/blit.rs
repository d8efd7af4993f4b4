use crate::types::{Point, Rect};

/// Clipping attached to a draw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clipping {
    /// Shift applied to the destination rect at composite time.
    pub offset: Point,
    /// Optional sub-area of the source surface to composite.
    pub region: Option<Rect>,
}

impl Clipping {
    pub const NONE: Clipping = Clipping {
        offset: Point::ZERO,
        region: None,
    };
}

/// A single normalized draw request, in display coordinates.
///
/// Created by a camera once scaling and bounds clipping are done, then
/// owned by the compositor: dynamic blits live for one frame in the
/// pending list, static blits persist in the static map until replaced
/// or removed.
#[derive(Debug, Clone)]
pub struct Blit<S> {
    pub surface: S,
    pub rect: Rect,
    pub layer: i32,
    pub flags: u32,
    pub is_static: bool,
    pub clipping: Clipping,
}

impl<S> Blit<S> {
    /// Destination rect with the clipping offset applied.
    pub fn screen_rect(&self) -> Rect {
        self.rect.translated(self.clipping.offset.x, self.clipping.offset.y)
    }
}
