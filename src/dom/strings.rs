//! String storage for the DOM
//!
//! All strings live in one contiguous buffer addressed by `(offset, len)`
//! spans. Names, namespace URIs and attribute values are interned (a
//! finding aid repeats `container`, `type="Folder"` and friends thousands
//! of times); character data is appended without deduplication.
//!
//! ID 0 is reserved for the empty string.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

#[derive(Debug)]
pub struct StringPool {
    data: String,
    spans: Vec<(u32, u32)>,
    /// Hash of interned content -> IDs with that hash
    index: HashMap<u64, Vec<u32>>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    pub fn new() -> Self {
        StringPool {
            data: String::with_capacity(4096),
            spans: vec![(0, 0)],
            index: HashMap::new(),
        }
    }

    #[inline]
    fn hash_of(s: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern `s`, returning the existing ID when already present
    pub fn intern(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }
        let hash = Self::hash_of(s);
        if let Some(ids) = self.index.get(&hash) {
            if let Some(&id) = ids.iter().find(|&&id| self.get(id) == s) {
                return id;
            }
        }
        let id = self.push(s);
        self.index.entry(hash).or_default().push(id);
        id
    }

    /// Store `s` without deduplication
    pub fn push(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }
        let offset = self.data.len() as u32;
        self.data.push_str(s);
        let id = self.spans.len() as u32;
        self.spans.push((offset, s.len() as u32));
        id
    }

    /// String for `id`, empty for unknown IDs
    pub fn get(&self, id: u32) -> &str {
        match self.spans.get(id as usize) {
            Some(&(offset, len)) => &self.data[offset as usize..(offset + len) as usize],
            None => "",
        }
    }

    pub fn bytes_used(&self) -> usize {
        self.data.len()
    }
}
