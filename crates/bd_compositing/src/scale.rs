use std::collections::HashMap;

use crate::backend::Surface;
use crate::types::{Scale, SurfaceId};

/// Memoization key: surface identity plus the exact factor bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ScaleKey {
    surface: SurfaceId,
    fx: u32,
    fy: u32,
}

impl ScaleKey {
    fn new(surface: SurfaceId, factor: Scale) -> Self {
        Self {
            surface,
            fx: factor.x.to_bits(),
            fy: factor.y.to_bits(),
        }
    }
}

/// Memoized surface resampling.
///
/// Resampling a sprite at the same camera factor every frame would dominate
/// the draw pass, so results are cached by `(surface id, factor)`. Cached
/// surfaces are shared handles; callers must not mutate them in place.
#[derive(Debug, Default)]
pub struct ScaleCache<S> {
    entries: HashMap<ScaleKey, S>,
}

impl<S: Surface> ScaleCache<S> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Resample `surface` by `factor`, reusing a cached result when one
    /// exists. The identity factor returns the input handle untouched and
    /// is never cached.
    pub fn scale(&mut self, surface: &S, factor: Scale) -> S {
        if factor.is_identity() {
            return surface.clone();
        }
        self.entries
            .entry(ScaleKey::new(surface.id(), factor))
            .or_insert_with(|| surface.scaled(factor))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
