/*
 * Deferred image references: "image number N" or "the image whose key is K".
 *
 * Toolkit items (tree nodes, toolbar buttons, tabs) refer to images in a shared
 * image list. The reference is stored as either an ordinal or a key and is
 * resolved to a position only when read, because the list may gain or lose
 * images after the reference was set. The indexer holds the list weakly; a
 * dropped list simply resolves to `UNRESOLVED_INDEX`.
 */

use crate::diagnostics::ContiguousEnum;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Sentinel for "no image".
pub const UNRESOLVED_INDEX: i32 = -1;

/// Lookup side of a shared image collection.
pub trait ImageKeyLookup {
    /// Position of the first entry with `key`, or `UNRESOLVED_INDEX`.
    fn index_of_key(&self, key: &str) -> i32;
}

/// A shared, mutable list of image keys in image-list order.
#[derive(Debug, Default)]
pub struct ImageKeyList {
    keys: RefCell<Vec<String>>,
}

impl ImageKeyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `key` and returns its position.
    pub fn add(&self, key: impl Into<String>) -> i32 {
        let mut keys = self.keys.borrow_mut();
        keys.push(key.into());
        (keys.len() - 1) as i32
    }

    /// Inserts `key` at `index` (clamped to the end).
    pub fn insert(&self, index: usize, key: impl Into<String>) {
        let mut keys = self.keys.borrow_mut();
        let index = index.min(keys.len());
        keys.insert(index, key.into());
    }

    /// Removes the first entry with `key`.
    pub fn remove_by_key(&self, key: &str) -> bool {
        let mut keys = self.keys.borrow_mut();
        match keys.iter().position(|k| k == key) {
            Some(position) => {
                keys.remove(position);
                true
            }
            None => false,
        }
    }

    pub fn remove_at(&self, index: usize) -> Option<String> {
        let mut keys = self.keys.borrow_mut();
        (index < keys.len()).then(|| keys.remove(index))
    }

    pub fn key_at(&self, index: usize) -> Option<String> {
        self.keys.borrow().get(index).cloned()
    }

    pub fn clear(&self) {
        self.keys.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.keys.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.borrow().is_empty()
    }
}

impl ImageKeyLookup for ImageKeyList {
    fn index_of_key(&self, key: &str) -> i32 {
        if key.is_empty() {
            return UNRESOLVED_INDEX;
        }
        self.keys
            .borrow()
            .iter()
            .position(|k| k == key)
            .map_or(UNRESOLVED_INDEX, |position| position as i32)
    }
}

/// Which half of an `ImageIndexer` is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ImageIndexMode {
    Ordinal = 0,
    Keyed = 1,
}

impl ContiguousEnum for ImageIndexMode {
    const NAME: &'static str = "ImageIndexMode";
    const MIN: i32 = ImageIndexMode::Ordinal as i32;
    const MAX: i32 = ImageIndexMode::Keyed as i32;
    const VARIANTS: &'static [Self] = &[Self::Ordinal, Self::Keyed];

    fn to_raw(self) -> i32 {
        self as i32
    }
}

/// An ordinal-or-key reference into a shared image collection.
#[derive(Debug, Clone)]
pub struct ImageIndexer {
    index: i32,
    key: String,
    mode: ImageIndexMode,
    collection: Option<Weak<dyn ImageKeyLookup>>,
}

impl Default for ImageIndexer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageIndexer {
    /// Ordinal mode, unresolved, no collection.
    pub fn new() -> Self {
        Self {
            index: UNRESOLVED_INDEX,
            key: String::new(),
            mode: ImageIndexMode::Ordinal,
            collection: None,
        }
    }

    pub fn set_collection<C>(&mut self, collection: &Rc<C>)
    where
        C: ImageKeyLookup + 'static,
    {
        let weak = Rc::downgrade(collection) as Weak<dyn ImageKeyLookup>;
        self.collection = Some(weak);
    }

    pub fn clear_collection(&mut self) {
        self.collection = None;
    }

    /// The associated collection, if it is still alive.
    pub fn collection(&self) -> Option<Rc<dyn ImageKeyLookup>> {
        self.collection.as_ref().and_then(Weak::upgrade)
    }

    /// Switches to ordinal mode and clears the key.
    pub fn set_index(&mut self, index: i32) {
        self.key.clear();
        self.index = index;
        self.mode = ImageIndexMode::Ordinal;
    }

    /// Switches to keyed mode and clears the ordinal. `None` stores the empty
    /// key, which never resolves.
    pub fn set_key(&mut self, key: Option<&str>) {
        self.index = UNRESOLVED_INDEX;
        self.key = key.unwrap_or_default().to_owned();
        self.mode = ImageIndexMode::Keyed;
    }

    /// The stored ordinal; `UNRESOLVED_INDEX` whenever a key was set last.
    pub fn index(&self) -> i32 {
        self.index
    }

    /// The stored key; empty whenever an ordinal was set last.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn mode(&self) -> ImageIndexMode {
        self.mode
    }

    /*
     * Resolves the reference now. Ordinal mode returns the stored ordinal
     * without range checks. Keyed mode asks the collection every time, so
     * insertions and removals since `set_key` are reflected; a missing
     * collection or key yields `UNRESOLVED_INDEX`.
     */
    pub fn actual_index(&self) -> i32 {
        match self.mode {
            ImageIndexMode::Ordinal => self.index,
            ImageIndexMode::Keyed => self
                .collection()
                .map_or(UNRESOLVED_INDEX, |collection| collection.index_of_key(&self.key)),
        }
    }
}
