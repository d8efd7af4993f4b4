use crate::backend::{Display, Surface};
use crate::blit::{Blit, Clipping};
use crate::compositor::Compositor;
use crate::error::CompositingError;
use crate::types::{Point, Rect, Scale, SceneId, Size, SpriteId};

/// A virtual coordinate space mapped onto a region of the display.
///
/// A camera is plain geometry: virtual size, real size, the cumulative
/// scale down the ancestor chain, and bounds in display space. All mutable
/// render state lives in the [`Compositor`], which every drawing call takes
/// explicitly, so any number of cameras can feed the same display without
/// shared-ownership plumbing.
///
/// The root camera comes from [`Compositor::camera`]; nested spaces are
/// derived with [`Camera::make_child`].
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    vsize: Size,
    rsize: Size,
    scale: Scale,
    bounds: Rect,
}

impl Camera {
    /// Create a top-level camera that is not backed by a compositor's
    /// display geometry. A real size is required here; only the root
    /// camera may derive it from the display.
    pub fn new(
        virtual_size: Option<Size>,
        real_size: Option<Size>,
    ) -> Result<Self, CompositingError> {
        let rsize = match real_size {
            Some(s) if !s.is_zero() => s,
            _ => {
                return Err(CompositingError::Config(
                    "a real size is required for a non-root camera".into(),
                ));
            }
        };
        Ok(Self::with_parent_scale(virtual_size, rsize, Scale::ONE))
    }

    /// Build a camera whose bounds and scale compose with a parent factor.
    /// An unspecified or zero virtual size falls back to the real size.
    pub(crate) fn with_parent_scale(
        virtual_size: Option<Size>,
        rsize: Size,
        parent: Scale,
    ) -> Self {
        let (vsize, own) = match virtual_size {
            Some(v) if !v.is_zero() => (v, Scale::ratio(rsize, v)),
            _ => (rsize, Scale::ONE),
        };
        Self {
            vsize,
            rsize,
            scale: parent.compose(own),
            bounds: Rect::of_size(rsize.scaled_ceil(parent)),
        }
    }

    /// Derive a nested camera. The real size is expressed in this camera's
    /// virtual space and defaults to it, so an omitted real size yields a
    /// child covering the parent exactly.
    pub fn make_child(&self, virtual_size: Option<Size>, real_size: Option<Size>) -> Camera {
        let rsize = match real_size {
            Some(s) if !s.is_zero() => s,
            _ => self.vsize,
        };
        Self::with_parent_scale(virtual_size, rsize, self.scale)
    }

    /// Virtual size of this camera's space.
    pub fn size(&self) -> Size {
        self.vsize
    }

    /// Origin rect sized to the virtual space.
    pub fn rect(&self) -> Rect {
        Rect::of_size(self.vsize)
    }

    pub fn real_size(&self) -> Size {
        self.rsize
    }

    /// Cumulative virtual-to-display scale factor.
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// This camera's footprint in display coordinates.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Map a display-space position into this camera's virtual space.
    /// Returns `None` for positions outside the camera's bounds.
    pub fn world_to_local(&self, pos: Point) -> Option<Point> {
        if !self.bounds.contains_point(pos) {
            return None;
        }
        Some(Point::new(
            (pos.x as f32 / self.scale.x).floor() as i32,
            (pos.y as f32 / self.scale.y).floor() as i32,
        ))
    }

    /// Submit a transient draw request. The surface is resampled through
    /// the compositor's scale cache, clipped against the camera bounds,
    /// and queued for this frame only.
    pub fn blit<D: Display>(
        &self,
        comp: &mut Compositor<D>,
        surface: &D::Surface,
        pos: Point,
        layer: i32,
        flags: u32,
        clipping: Clipping,
    ) {
        if let Some((surface, rect)) = self.project(comp, surface, pos) {
            comp.push_dynamic(Blit {
                surface,
                rect,
                layer,
                flags,
                is_static: false,
                clipping,
            });
        }
    }

    /// Submit a persistent draw request keyed by the owning sprite.
    /// Replaces any previous record for `sprite` and schedules the stale
    /// area for background restoration.
    pub fn static_blit<D: Display>(
        &self,
        comp: &mut Compositor<D>,
        sprite: SpriteId,
        surface: &D::Surface,
        pos: Point,
        layer: i32,
        flags: u32,
        clipping: Clipping,
    ) {
        if let Some((surface, rect)) = self.project(comp, surface, pos) {
            comp.push_static(
                sprite,
                Blit {
                    surface,
                    rect,
                    layer,
                    flags,
                    is_static: true,
                    clipping,
                },
            );
        }
    }

    /// Install a background for the scene that owns this camera. The image
    /// must match the camera's virtual size. If `scene` is the compositor's
    /// active scene the background goes live immediately with a full
    /// restore scheduled; otherwise it is parked until the scene is entered.
    pub fn set_background<D: Display>(
        &self,
        comp: &mut Compositor<D>,
        scene: SceneId,
        image: D::Surface,
    ) -> Result<(), CompositingError> {
        if image.size() != self.vsize {
            return Err(CompositingError::SizeMismatch {
                expected: self.vsize,
                actual: image.size(),
            });
        }
        comp.install_background(scene, image);
        Ok(())
    }

    /// Scale and clip one draw request into display space. Returns `None`
    /// when the destination lies entirely outside the camera bounds, which
    /// silently drops the draw.
    fn project<D: Display>(
        &self,
        comp: &mut Compositor<D>,
        surface: &D::Surface,
        pos: Point,
    ) -> Option<(D::Surface, Rect)> {
        let pos = pos.scaled(self.scale);
        let mut scaled = comp.scale_surface(surface, self.scale);
        let mut rect = Rect::from_pos_size(pos, scaled.size());

        if self.bounds.contains_rect(&rect) {
            // Fully visible, forward unchanged.
        } else if self.bounds.intersects(&rect) {
            let visible = rect.clip(&self.bounds);
            let src = visible.translated(-rect.x, -rect.y);
            scaled = scaled.subsurface(src);
            rect = visible;
        } else {
            return None;
        }
        Some((scaled, rect))
    }
}
