use std::collections::BTreeMap;
use std::mem;

use log::trace;

use crate::backend::{Display, Surface, blend};
use crate::blit::Blit;
use crate::camera::Camera;
use crate::dirty::DirtyBuffers;
use crate::scale::ScaleCache;
use crate::scene::SceneStore;
use crate::types::{Color, Point, Rect, Scale, SceneId, Size, SpriteId};

/// Counters for one composite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Static blits currently registered.
    pub static_total: usize,
    /// Static blits actually redrawn this pass.
    pub static_drawn: usize,
    /// Dynamic blits composited this pass.
    pub dynamic_drawn: usize,
    /// Rectangles flushed to the physical display.
    pub presented: usize,
}

/// Owner of the display and of all mutable render state.
///
/// Exactly one compositor exists per display. Cameras are detached
/// geometry handles; every draw request they issue funnels into the
/// pending list or the static map here, and [`Compositor::draw`] runs the
/// restore / composite / present / rotate pass once per frame.
pub struct Compositor<D: Display> {
    display: D,
    background: D::Surface,
    background_color: Color,
    pending: Vec<Blit<D::Surface>>,
    static_blits: BTreeMap<SpriteId, Blit<D::Surface>>,
    dirty: DirtyBuffers,
    scale_cache: ScaleCache<D::Surface>,
    scenes: SceneStore<D::Surface>,
    active_scene: Option<SceneId>,
    root: Camera,
}

impl<D: Display> Compositor<D> {
    /// Bind a display with an identity virtual space.
    pub fn new(display: D) -> Self {
        Self::build(display, None)
    }

    /// Bind a display whose root camera maps `virtual_size` onto it.
    pub fn with_virtual_size(display: D, virtual_size: Size) -> Self {
        Self::build(display, Some(virtual_size))
    }

    fn build(mut display: D, virtual_size: Option<Size>) -> Self {
        let rsize = display.size();
        let root = Camera::with_parent_scale(virtual_size, rsize, Scale::ONE);
        let background_color = Color::WHITE;
        let mut background = display.create_surface(rsize);
        background.fill(background_color);
        display
            .screen()
            .blit(&background, Point::ZERO, None, blend::ALPHA);
        Self {
            display,
            background,
            background_color,
            pending: Vec::new(),
            static_blits: BTreeMap::new(),
            dirty: DirtyBuffers::new(),
            scale_cache: ScaleCache::new(),
            scenes: SceneStore::new(),
            active_scene: None,
            root,
        }
    }

    /// The root camera covering the whole display.
    pub fn camera(&self) -> Camera {
        self.root
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Tear down the compositor, handing the display back.
    pub fn into_display(self) -> D {
        self.display
    }

    pub fn background(&self) -> &D::Surface {
        &self.background
    }

    pub fn active_scene(&self) -> Option<SceneId> {
        self.active_scene
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn static_len(&self) -> usize {
        self.static_blits.len()
    }

    pub fn has_static(&self, sprite: SpriteId) -> bool {
        self.static_blits.contains_key(&sprite)
    }

    pub fn clear_this_frame(&self) -> &[Rect] {
        &self.dirty.clear_this_frame
    }

    pub fn clear_next_frame(&self) -> &[Rect] {
        &self.dirty.clear_next_frame
    }

    pub fn soft_clear(&self) -> &[Rect] {
        &self.dirty.soft_clear
    }

    pub(crate) fn scale_surface(&mut self, surface: &D::Surface, factor: Scale) -> D::Surface {
        self.scale_cache.scale(surface, factor)
    }

    pub(crate) fn push_dynamic(&mut self, blit: Blit<D::Surface>) {
        self.pending.push(blit);
    }

    /// Register or replace the static record for a sprite. Replacement
    /// schedules the union of the stale and fresh rects for restoration so
    /// no pixels of the old placement survive.
    pub(crate) fn push_static(&mut self, sprite: SpriteId, blit: Blit<D::Surface>) {
        let fresh = blit.rect;
        match self.static_blits.insert(sprite, blit) {
            Some(old) => self.dirty.erase_this_frame(old.rect.union(&fresh)),
            None => self.dirty.erase_this_frame(fresh),
        }
    }

    /// Drop a sprite's static record and schedule its area for
    /// restoration. No-op when the sprite has no record.
    pub fn remove_static_blit(&mut self, sprite: SpriteId) {
        if let Some(blit) = self.static_blits.remove(&sprite) {
            self.dirty.erase_this_frame(blit.rect);
        }
    }

    /// Swap in a background live when its scene is active, otherwise park
    /// it for activation on the next `scene_enter`.
    pub(crate) fn install_background(&mut self, scene: SceneId, image: D::Surface) {
        if self.active_scene == Some(scene) {
            self.dirty.erase_this_frame(image.rect());
            self.background = image;
        } else {
            self.scenes.set_background(scene, image);
        }
    }

    /// Force full restoration on the next draw pass.
    pub fn redraw(&mut self) {
        self.dirty.erase_this_frame(self.background.rect());
    }

    /// Run one composite pass: restore stale regions from the background,
    /// draw the merged blit list in layer order, present the dirty region,
    /// rotate the frame buffers.
    pub fn draw(&mut self) -> FrameStats {
        // Idle pass: nothing queued and nothing stale to erase or refresh.
        if self.pending.is_empty() && self.dirty.is_clean() {
            return FrameStats {
                static_total: self.static_blits.len(),
                ..FrameStats::default()
            };
        }

        let screen_rect = Rect::of_size(self.display.size());
        let bg_rect = self.background.rect();

        // Restore phase: put the background back over everything drawn
        // last frame that needs refreshing.
        let mut clear_this = mem::take(&mut self.dirty.clear_this_frame);
        let soft_prev = mem::take(&mut self.dirty.soft_clear);
        for rect in clear_this.iter().chain(soft_prev.iter()) {
            let rect = bg_rect.clip(rect);
            if rect.is_empty() {
                continue;
            }
            self.display
                .screen()
                .blit(&self.background, rect.pos(), Some(rect), blend::ALPHA);
        }

        // Composite phase: dynamic and static records merged, lower layers
        // first. The sort is stable, so submission order breaks ties and
        // the static map's key order keeps equal-layer statics deterministic.
        let static_total = self.static_blits.len();
        let mut blits = mem::take(&mut self.pending);
        blits.extend(self.static_blits.values().cloned());
        blits.sort_by_key(|b| b.layer);

        let mut soft_new: Vec<Rect> = Vec::new();
        let mut static_drawn = 0usize;
        let mut dynamic_drawn = 0usize;

        for blit in &blits {
            let rect = blit.screen_rect();
            if !screen_rect.intersects(&rect) {
                continue;
            }
            if blit.is_static {
                // Redraw a static only where the background was just
                // restored over it, or where it was already being kept
                // visible through the soft set.
                if clear_this.iter().any(|r| rect.intersects(r)) {
                    self.display.screen().blit(
                        &blit.surface,
                        rect.pos(),
                        blit.clipping.region,
                        blit.flags,
                    );
                    clear_this.push(rect);
                    soft_new.push(rect);
                    static_drawn += 1;
                    continue;
                }
                if soft_prev.iter().any(|r| rect.intersects(r)) {
                    self.display.screen().blit(
                        &blit.surface,
                        rect.pos(),
                        blit.clipping.region,
                        blit.flags,
                    );
                    soft_new.push(rect);
                    static_drawn += 1;
                }
            } else {
                // Dynamic blits are always drawn; the backend clips and
                // reports the region actually painted, which must be
                // erased again next frame.
                let painted = self.display.screen().blit(
                    &blit.surface,
                    rect.pos(),
                    blit.clipping.region,
                    blit.flags,
                );
                if !painted.is_empty() {
                    self.dirty.erase_next_frame(painted);
                    dynamic_drawn += 1;
                }
            }
        }

        // Present phase: flush only the union of both clear sets.
        self.dirty.clear_this_frame = clear_this;
        self.dirty.soft_clear = soft_new;
        let present_rects = self.dirty.present_set();
        self.display.present(&present_rects);

        // Rotate phase.
        self.dirty.rotate();

        let stats = FrameStats {
            static_total,
            static_drawn,
            dynamic_drawn,
            presented: present_rects.len(),
        };
        trace!(
            "frame: {}/{} static, {} dynamic, {} rects presented",
            stats.static_drawn, stats.static_total, stats.dynamic_drawn, stats.presented
        );
        stats
    }

    /// Snapshot the scene's visual state and reset to a blank default
    /// background, painted over the whole screen.
    pub fn scene_exit(&mut self, scene: SceneId) {
        let blits = mem::take(&mut self.static_blits);
        self.scenes.save_blits(scene, blits);

        let size = self.display.size();
        let mut fresh = self.display.create_surface(size);
        fresh.fill(self.background_color);
        let old = mem::replace(&mut self.background, fresh);
        self.scenes.set_background(scene, old);
        self.display
            .screen()
            .blit(&self.background, Point::ZERO, None, blend::ALPHA);
        // Pending erase rects referred to the old scene's content; the
        // wholesale repaint supersedes them.
        self.dirty.clear();

        if self.active_scene == Some(scene) {
            self.active_scene = None;
        }
    }

    /// Make `scene` active and bring back any state saved for it. Without
    /// saved state the current static map and background stay in place.
    pub fn scene_enter(&mut self, scene: SceneId) {
        self.active_scene = Some(scene);
        if let Some(blits) = self.scenes.take_blits(scene) {
            self.static_blits = blits;
        }
        if let Some(background) = self.scenes.take_background(scene) {
            self.dirty.erase_this_frame(background.rect());
            self.background = background;
        }
    }

    /// Whether `scene_enter` would restore saved state for `scene`.
    pub fn has_saved_scene(&self, scene: SceneId) -> bool {
        self.scenes.has_state(scene)
    }

    /// Drop all saved state for a scene that will never be re-entered.
    pub fn forget_scene(&mut self, scene: SceneId) {
        self.scenes.remove(scene);
    }
}
