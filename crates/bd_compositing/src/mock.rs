//! Journaling backend used by the unit tests in this crate.
//!
//! Surfaces carry no pixels; every backend call is appended to a shared
//! journal so tests can assert on the exact sequence of composite
//! operations the engine issued.

use std::cell::RefCell;
use std::rc::Rc;

use crate::backend::{Display, Surface};
use crate::types::{Color, Point, Rect, Scale, Size, SurfaceId};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Fill {
        target: SurfaceId,
        color: Color,
    },
    Blit {
        target: SurfaceId,
        src: SurfaceId,
        dest: Point,
        area: Option<Rect>,
        flags: u32,
        painted: Rect,
    },
    Subsurface {
        src: SurfaceId,
        area: Rect,
        out: SurfaceId,
    },
    Scaled {
        src: SurfaceId,
        factor: Scale,
        out: SurfaceId,
    },
    Present {
        rects: Vec<Rect>,
    },
}

#[derive(Debug, Default)]
struct JournalInner {
    ops: Vec<Op>,
    next_id: SurfaceId,
}

/// Shared recorder handed to every mock surface and display.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    inner: Rc<RefCell<JournalInner>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> SurfaceId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        inner.next_id
    }

    fn record(&self, op: Op) {
        self.inner.borrow_mut().ops.push(op);
    }

    pub fn surface(&self, size: Size) -> MockSurface {
        MockSurface {
            id: self.next_id(),
            size,
            journal: self.clone(),
        }
    }

    pub fn display(&self, size: Size) -> MockDisplay {
        MockDisplay {
            screen: self.surface(size),
            size,
            journal: self.clone(),
        }
    }

    pub fn ops(&self) -> Vec<Op> {
        self.inner.borrow().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.inner.borrow_mut().ops.clear();
    }

    pub fn count_scaled(&self) -> usize {
        self.inner
            .borrow()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Scaled { .. }))
            .count()
    }

    /// Blits onto `target`, in journal order.
    pub fn blits_onto(&self, target: SurfaceId) -> Vec<Op> {
        self.inner
            .borrow()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Blit { target: t, .. } if *t == target))
            .cloned()
            .collect()
    }

    pub fn presents(&self) -> Vec<Vec<Rect>> {
        self.inner
            .borrow()
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Present { rects } => Some(rects.clone()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct MockSurface {
    id: SurfaceId,
    size: Size,
    journal: Journal,
}

impl Surface for MockSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn size(&self) -> Size {
        self.size
    }

    fn fill(&mut self, color: Color) {
        self.journal.record(Op::Fill {
            target: self.id,
            color,
        });
    }

    fn blit(&mut self, src: &Self, dest: Point, area: Option<Rect>, flags: u32) -> Rect {
        let src_area = match area {
            Some(a) => a.clip(&src.rect()),
            None => src.rect(),
        };
        let painted = Rect::from_pos_size(dest, src_area.size()).clip(&self.rect());
        self.journal.record(Op::Blit {
            target: self.id,
            src: src.id,
            dest,
            area,
            flags,
            painted,
        });
        painted
    }

    fn subsurface(&self, area: Rect) -> Self {
        let out = MockSurface {
            id: self.journal.next_id(),
            size: area.size(),
            journal: self.journal.clone(),
        };
        self.journal.record(Op::Subsurface {
            src: self.id,
            area,
            out: out.id,
        });
        out
    }

    fn scaled(&self, factor: Scale) -> Self {
        let out = MockSurface {
            id: self.journal.next_id(),
            size: self.size.scaled_ceil(factor),
            journal: self.journal.clone(),
        };
        self.journal.record(Op::Scaled {
            src: self.id,
            factor,
            out: out.id,
        });
        out
    }
}

#[derive(Debug)]
pub struct MockDisplay {
    screen: MockSurface,
    size: Size,
    journal: Journal,
}

impl MockDisplay {
    pub fn screen_id(&self) -> SurfaceId {
        self.screen.id
    }
}

impl Display for MockDisplay {
    type Surface = MockSurface;

    fn size(&self) -> Size {
        self.size
    }

    fn screen(&mut self) -> &mut MockSurface {
        &mut self.screen
    }

    fn create_surface(&mut self, size: Size) -> MockSurface {
        self.journal.surface(size)
    }

    fn present(&mut self, rects: &[Rect]) {
        self.journal.record(Op::Present {
            rects: rects.to_vec(),
        });
    }
}
