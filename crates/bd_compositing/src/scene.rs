use std::collections::{BTreeMap, HashMap};

use crate::blit::Blit;
use crate::types::{SceneId, SpriteId};

/// Per-scene saved render state.
///
/// On scene exit the compositor parks its static-blit map and background
/// here; re-entering the scene consumes them again, restoring the exact
/// visual state the scene left behind. Backgrounds can also be parked
/// ahead of time by a deferred `set_background` for an inactive scene.
/// Keys are plain scene ids; a scene's owner tears its entry down with
/// [`SceneStore::remove`] when the scene is gone for good.
#[derive(Debug)]
pub struct SceneStore<S> {
    saved_blits: HashMap<SceneId, BTreeMap<SpriteId, Blit<S>>>,
    backgrounds: HashMap<SceneId, S>,
}

impl<S> SceneStore<S> {
    pub fn new() -> Self {
        Self {
            saved_blits: HashMap::new(),
            backgrounds: HashMap::new(),
        }
    }

    pub fn save_blits(&mut self, scene: SceneId, blits: BTreeMap<SpriteId, Blit<S>>) {
        self.saved_blits.insert(scene, blits);
    }

    /// Consume the saved static blits for a scene, if any.
    pub fn take_blits(&mut self, scene: SceneId) -> Option<BTreeMap<SpriteId, Blit<S>>> {
        self.saved_blits.remove(&scene)
    }

    pub fn set_background(&mut self, scene: SceneId, background: S) {
        self.backgrounds.insert(scene, background);
    }

    /// Consume the saved background for a scene, if any.
    pub fn take_background(&mut self, scene: SceneId) -> Option<S> {
        self.backgrounds.remove(&scene)
    }

    pub fn has_state(&self, scene: SceneId) -> bool {
        self.saved_blits.contains_key(&scene) || self.backgrounds.contains_key(&scene)
    }

    /// Drop everything saved for a scene. No-op for unknown scenes.
    pub fn remove(&mut self, scene: SceneId) {
        self.saved_blits.remove(&scene);
        self.backgrounds.remove(&scene);
    }
}

impl<S> Default for SceneStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    #[test]
    fn test_take_consumes_entry() {
        let mut store: super::SceneStore<u32> = super::SceneStore::new();
        store.save_blits(1, BTreeMap::new());
        store.set_background(1, 42);

        assert!(store.has_state(1));
        assert_eq!(store.take_background(1), Some(42));
        assert!(store.take_blits(1).is_some());
        assert!(!store.has_state(1));
        assert_eq!(store.take_background(1), None);
    }

    #[test]
    fn test_remove_unknown_scene_is_noop() {
        let mut store: super::SceneStore<u32> = super::SceneStore::new();
        store.set_background(3, 7);
        store.remove(99);
        assert!(store.has_state(3));
        store.remove(3);
        assert!(!store.has_state(3));
    }
}
