//! Software surface backend for the compositing core.
//!
//! Pixels live in CPU `tiny_skia::Pixmap`s. Surfaces are cheap handles
//! (`Rc` shared pixels), and the display is double-buffered: compositing
//! lands on a back buffer and `present` copies only the requested
//! rectangles to the front buffer, which tests and embedders can read
//! back pixel by pixel.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use bd_compositing::backend::{Display, Surface, blend};
use bd_compositing::types::{Color, Point, Rect, Scale, Size, SurfaceId};
use tiny_skia::{
    BlendMode, FilterQuality, IntRect, Pixmap, PixmapPaint, Transform,
};

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

fn alloc_pixmap(size: Size) -> Pixmap {
    // Zero dimensions are clamped; a surface always has at least one pixel.
    Pixmap::new(size.w.max(1), size.h.max(1))
        .unwrap_or_else(|| Pixmap::new(1, 1).expect("1x1 pixmap"))
}

fn int_rect(rect: Rect) -> Option<IntRect> {
    IntRect::from_xywh(rect.x, rect.y, rect.size().w, rect.size().h)
}

/// A shared-handle pixel buffer.
///
/// Clones alias the same pixels and identity; `subsurface` and `scaled`
/// produce fresh surfaces with new identities.
#[derive(Debug, Clone)]
pub struct SoftSurface {
    id: SurfaceId,
    pixmap: Rc<RefCell<Pixmap>>,
}

impl SoftSurface {
    /// Allocate a transparent surface.
    pub fn new(size: Size) -> Self {
        Self::from_pixmap(alloc_pixmap(size))
    }

    /// Allocate a surface filled with a solid color.
    pub fn filled(size: Size, color: Color) -> Self {
        let mut surface = Self::new(size);
        surface.fill(color);
        surface
    }

    fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            id: NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed),
            pixmap: Rc::new(RefCell::new(pixmap)),
        }
    }

    /// Read back one pixel, straight (non-premultiplied) RGBA.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let pixmap = self.pixmap.borrow();
        let p = pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(p.red(), p.green(), p.blue(), p.alpha()))
    }
}

impl Surface for SoftSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn size(&self) -> Size {
        let pixmap = self.pixmap.borrow();
        Size::new(pixmap.width(), pixmap.height())
    }

    fn fill(&mut self, color: Color) {
        self.pixmap.borrow_mut().fill(tiny_skia::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }

    fn blit(&mut self, src: &Self, dest: Point, area: Option<Rect>, flags: u32) -> Rect {
        let src_bounds = src.rect();
        let area = match area {
            Some(a) => a.clip(&src_bounds),
            None => src_bounds,
        };
        if area.is_empty() {
            return Rect::ZERO;
        }
        let painted = Rect::from_pos_size(dest, area.size()).clip(&self.rect());
        if painted.is_empty() {
            return Rect::ZERO;
        }

        let paint = PixmapPaint {
            blend_mode: if flags & blend::ADD != 0 {
                BlendMode::Plus
            } else {
                BlendMode::SourceOver
            },
            ..PixmapPaint::default()
        };

        if area == src_bounds && !Rc::ptr_eq(&self.pixmap, &src.pixmap) {
            let src_pixmap = src.pixmap.borrow();
            self.pixmap.borrow_mut().draw_pixmap(
                dest.x,
                dest.y,
                src_pixmap.as_ref(),
                &paint,
                Transform::identity(),
                None,
            );
        } else {
            // Sub-area (or self-to-self) blits go through a copy of the
            // source region.
            let copy = {
                let src_pixmap = src.pixmap.borrow();
                int_rect(area).and_then(|r| src_pixmap.clone_rect(r))
            };
            if let Some(copy) = copy {
                self.pixmap.borrow_mut().draw_pixmap(
                    dest.x,
                    dest.y,
                    copy.as_ref(),
                    &paint,
                    Transform::identity(),
                    None,
                );
            }
        }
        painted
    }

    fn subsurface(&self, area: Rect) -> Self {
        let area = area.clip(&self.rect());
        let pixmap = {
            let src = self.pixmap.borrow();
            int_rect(area).and_then(|r| src.clone_rect(r))
        };
        Self::from_pixmap(pixmap.unwrap_or_else(|| alloc_pixmap(Size::ZERO)))
    }

    fn scaled(&self, factor: Scale) -> Self {
        let out_size = self.size().scaled_ceil(factor);
        let mut out = alloc_pixmap(out_size);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        out.draw_pixmap(
            0,
            0,
            self.pixmap.borrow().as_ref(),
            &paint,
            Transform::from_scale(factor.x, factor.y),
            None,
        );
        Self::from_pixmap(out)
    }
}

/// Double-buffered CPU display.
pub struct SoftDisplay {
    back: SoftSurface,
    front: SoftSurface,
    size: Size,
}

impl SoftDisplay {
    pub fn new(size: Size) -> Self {
        Self {
            back: SoftSurface::new(size),
            front: SoftSurface::new(size),
            size,
        }
    }

    /// The last presented frame.
    pub fn front(&self) -> &SoftSurface {
        &self.front
    }

    /// The in-progress frame (compositing target).
    pub fn back(&self) -> &SoftSurface {
        &self.back
    }
}

impl Display for SoftDisplay {
    type Surface = SoftSurface;

    fn size(&self) -> Size {
        self.size
    }

    fn screen(&mut self) -> &mut SoftSurface {
        &mut self.back
    }

    fn create_surface(&mut self, size: Size) -> SoftSurface {
        SoftSurface::new(size)
    }

    fn present(&mut self, rects: &[Rect]) {
        let bounds = Rect::of_size(self.size);
        let paint = PixmapPaint {
            // Straight copy; the front buffer mirrors the back buffer
            // exactly inside the flushed region.
            blend_mode: BlendMode::Source,
            ..PixmapPaint::default()
        };
        let back = self.back.pixmap.borrow();
        let mut front = self.front.pixmap.borrow_mut();
        for rect in rects {
            let rect = rect.clip(&bounds);
            if rect.is_empty() {
                continue;
            }
            let copy = int_rect(rect).and_then(|r| back.clone_rect(r));
            if let Some(copy) = copy {
                front.draw_pixmap(
                    rect.x,
                    rect.y,
                    copy.as_ref(),
                    &paint,
                    Transform::identity(),
                    None,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bd_compositing::backend::{Display, Surface, blend};
    use bd_compositing::types::{Color, Point, Rect, Scale, Size};

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    #[test]
    fn test_blit_paints_and_reports_rect() {
        let mut dst = super::SoftSurface::filled(Size::new(20, 20), Color::WHITE);
        let src = super::SoftSurface::filled(Size::new(4, 4), RED);

        let painted = dst.blit(&src, Point::new(2, 3), None, 0);

        assert_eq!(painted, Rect::new(2, 3, 4, 4));
        assert_eq!(dst.pixel(2, 3), Some(RED));
        assert_eq!(dst.pixel(5, 6), Some(RED));
        assert_eq!(dst.pixel(6, 7), Some(Color::WHITE));
    }

    #[test]
    fn test_blit_clips_to_destination() {
        let mut dst = super::SoftSurface::filled(Size::new(10, 10), Color::WHITE);
        let src = super::SoftSurface::filled(Size::new(4, 4), RED);

        let painted = dst.blit(&src, Point::new(8, 8), None, 0);
        assert_eq!(painted, Rect::new(8, 8, 2, 2));

        let painted = dst.blit(&src, Point::new(20, 20), None, 0);
        assert!(painted.is_empty());
    }

    #[test]
    fn test_blit_with_area_selects_source_region() {
        let mut dst = super::SoftSurface::filled(Size::new(10, 10), Color::WHITE);
        let mut src = super::SoftSurface::filled(Size::new(4, 4), RED);
        // Paint the right half blue, then blit only that half.
        let half = super::SoftSurface::filled(Size::new(2, 4), BLUE);
        src.blit(&half, Point::new(2, 0), None, 0);

        let painted = dst.blit(&src, Point::new(0, 0), Some(Rect::new(2, 0, 2, 4)), 0);

        assert_eq!(painted, Rect::new(0, 0, 2, 4));
        assert_eq!(dst.pixel(0, 0), Some(BLUE));
        assert_eq!(dst.pixel(2, 0), Some(Color::WHITE));
    }

    #[test]
    fn test_alpha_blit_composites_over() {
        let mut dst = super::SoftSurface::filled(Size::new(2, 2), Color::rgb(0, 0, 0));
        let src = super::SoftSurface::filled(Size::new(2, 2), Color::rgba(255, 0, 0, 0));

        dst.blit(&src, Point::ZERO, None, 0);
        // A fully transparent source leaves the destination untouched.
        assert_eq!(dst.pixel(0, 0), Some(Color::rgb(0, 0, 0)));
    }

    #[test]
    fn test_additive_blit_sums_channels() {
        let mut dst = super::SoftSurface::filled(Size::new(2, 2), Color::rgb(100, 0, 60));
        let src = super::SoftSurface::filled(Size::new(2, 2), Color::rgb(50, 0, 200));

        dst.blit(&src, Point::ZERO, None, blend::ADD);

        // Channels add and saturate at 255.
        assert_eq!(dst.pixel(0, 0), Some(Color::rgb(150, 0, 255)));
    }

    #[test]
    fn test_subsurface_copies_pixels() {
        let mut src = super::SoftSurface::filled(Size::new(8, 8), Color::WHITE);
        let patch = super::SoftSurface::filled(Size::new(2, 2), RED);
        src.blit(&patch, Point::new(4, 4), None, 0);

        let sub = src.subsurface(Rect::new(4, 4, 2, 2));
        assert_eq!(sub.size(), Size::new(2, 2));
        assert_ne!(sub.id(), src.id());
        assert_eq!(sub.pixel(0, 0), Some(RED));
    }

    #[test]
    fn test_scaled_rounds_size_up() {
        let src = super::SoftSurface::filled(Size::new(3, 3), RED);
        let out = src.scaled(Scale::new(1.5, 2.0));
        assert_eq!(out.size(), Size::new(5, 6));
        assert_eq!(out.pixel(2, 2), Some(RED));
    }

    #[test]
    fn test_clones_share_pixels_and_id() {
        let a = super::SoftSurface::filled(Size::new(2, 2), Color::WHITE);
        let mut b = a.clone();
        b.fill(RED);
        assert_eq!(a.id(), b.id());
        assert_eq!(a.pixel(0, 0), Some(RED));
    }

    #[test]
    fn test_present_flushes_only_given_rects() {
        let mut display = super::SoftDisplay::new(Size::new(10, 10));
        display.screen().fill(RED);

        display.present(&[Rect::new(0, 0, 4, 4)]);

        assert_eq!(display.front().pixel(1, 1), Some(RED));
        // Outside the flushed rect the front buffer is untouched.
        assert_eq!(display.front().pixel(5, 5), Some(Color::TRANSPARENT));
    }
}
