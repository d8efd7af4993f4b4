use crate::types::Rect;

/// Double-buffered dirty-rectangle bookkeeping for the compositor.
///
/// Three disjoint sets of display-space rectangles:
/// - `clear_this_frame`: erased to background at the start of this pass
///   and carried into the presented region.
/// - `clear_next_frame`: painted by dynamic blits this pass; becomes
///   `clear_this_frame` when the pass rotates, so dynamic content is
///   erased one frame after it was drawn.
/// - `soft_clear`: erased this pass only. Static blits that were just
///   redrawn land here so they are refreshed, not accumulated into the
///   rolling clear set.
#[derive(Debug, Default)]
pub struct DirtyBuffers {
    pub clear_this_frame: Vec<Rect>,
    pub clear_next_frame: Vec<Rect>,
    pub soft_clear: Vec<Rect>,
}

impl DirtyBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a rect for background restoration on the current frame.
    pub fn erase_this_frame(&mut self, rect: Rect) {
        if !rect.is_empty() {
            self.clear_this_frame.push(rect);
        }
    }

    /// Schedule a rect for background restoration on the following frame.
    pub fn erase_next_frame(&mut self, rect: Rect) {
        if !rect.is_empty() {
            self.clear_next_frame.push(rect);
        }
    }

    /// The minimal region to flush: everything erased or painted this pass.
    pub fn present_set(&self) -> Vec<Rect> {
        let mut rects =
            Vec::with_capacity(self.clear_next_frame.len() + self.clear_this_frame.len());
        rects.extend_from_slice(&self.clear_next_frame);
        rects.extend_from_slice(&self.clear_this_frame);
        rects
    }

    /// End-of-pass rotation: next-frame rects become this-frame rects.
    pub fn rotate(&mut self) {
        self.clear_this_frame = std::mem::take(&mut self.clear_next_frame);
    }

    pub fn is_clean(&self) -> bool {
        self.clear_this_frame.is_empty()
            && self.clear_next_frame.is_empty()
            && self.soft_clear.is_empty()
    }

    /// Drop everything, e.g. on a scene teardown that repaints wholesale.
    pub fn clear(&mut self) {
        self.clear_this_frame.clear();
        self.clear_next_frame.clear();
        self.soft_clear.clear();
    }
}
