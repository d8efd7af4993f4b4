use serde::{Deserialize, Serialize};

/// Stable identity of a surface, assigned by the backend.
pub type SurfaceId = u64;

/// Opaque identity of a sprite that owns a static blit.
///
/// The owner is responsible for calling `remove_static_blit` on teardown;
/// the compositor never keeps the sprite itself alive.
pub type SpriteId = u64;

/// Opaque identity of a scene, used as a key for saved render state.
pub type SceneId = u64;

/// Integer pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point::new(0, 0);

    /// Map this point by a componentwise scale factor, flooring to pixels.
    pub fn scaled(&self, factor: Scale) -> Point {
        Point::new(
            (self.x as f32 * factor.x).floor() as i32,
            (self.y as f32 * factor.y).floor() as i32,
        )
    }
}

/// Pixel dimensions of a surface or display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub const ZERO: Size = Size::new(0, 0);

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Scale componentwise, rounding up so no source pixel is dropped.
    pub fn scaled_ceil(&self, factor: Scale) -> Size {
        Size::new(
            (self.w as f32 * factor.x).ceil() as u32,
            (self.h as f32 * factor.y).ceil() as u32,
        )
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Componentwise virtual-to-real scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
}

impl Scale {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ONE: Scale = Scale::new(1.0, 1.0);

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.x == 1.0 && self.y == 1.0
    }

    /// Factor mapping a virtual size onto a real size.
    pub fn ratio(real: Size, virtual_size: Size) -> Scale {
        Scale::new(
            real.w as f32 / virtual_size.w as f32,
            real.h as f32 / virtual_size.h as f32,
        )
    }

    /// Compose two factors (parent then own).
    pub fn compose(&self, other: Scale) -> Scale {
        Scale::new(self.x * other.x, self.y * other.y)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::ONE
    }
}

/// Integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Point, size: Size) -> Self {
        Self::new(pos.x, pos.y, size.w as i32, size.h as i32)
    }

    /// Rectangle anchored at the origin with the given size.
    pub fn of_size(size: Size) -> Self {
        Self::new(0, 0, size.w as i32, size.h as i32)
    }

    pub const ZERO: Rect = Rect::new(0, 0, 0, 0);

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.w.max(0) as u32, self.h.max(0) as u32)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check whether a point lies inside the rectangle.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Check whether `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check strict overlap; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Intersection of two rectangles. Empty when they do not overlap.
    pub fn clip(&self, other: &Rect) -> Rect {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return Rect::ZERO;
        }
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    /// The same rectangle shifted by an offset.
    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
