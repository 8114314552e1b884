use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::layout::{LayoutSettings, Page, PageGeometry};
use crate::domain::paper::Part;
use crate::domain::question_set::QuestionSet;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Clone)]
struct CachedLayout {
    fingerprint: String,
    pages: Arc<Vec<Page>>,
}

#[derive(Default)]
struct Entries {
    map: HashMap<String, CachedLayout>,
    order: VecDeque<String>,
}

/// Layouts keyed by a digest of everything layout depends on. Layout is
/// deterministic, so a hit is always equal to a fresh computation.
pub struct LayoutCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[derive(Serialize)]
struct LayoutInputs<'a> {
    parts: &'a [Part],
    questions: &'a QuestionSet,
    geometry: &'a PageGeometry,
    settings: &'a LayoutSettings,
}

impl LayoutCache {
    /// A capacity of zero disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn key(
        parts: &[Part],
        questions: &QuestionSet,
        geometry: &PageGeometry,
        settings: &LayoutSettings,
    ) -> ApplicationResult<String> {
        let inputs = LayoutInputs {
            parts,
            questions,
            geometry,
            settings,
        };
        let bytes = serde_json::to_vec(&inputs)
            .map_err(|e| ApplicationError::infrastructure(format!("layout key: {e}")))?;
        Ok(URL_SAFE_NO_PAD.encode(Sha256::digest(&bytes)))
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(super) fn get(&self, key: &str) -> Option<(String, Arc<Vec<Page>>)> {
        self.lock()
            .map
            .get(key)
            .map(|hit| (hit.fingerprint.clone(), Arc::clone(&hit.pages)))
    }

    /// Oldest entries are evicted first.
    pub(super) fn insert(&self, key: String, fingerprint: String, pages: Arc<Vec<Page>>) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.lock();
        if entries.map.contains_key(&key) {
            return;
        }
        while entries.map.len() >= self.capacity {
            match entries.order.pop_front() {
                Some(oldest) => {
                    entries.map.remove(&oldest);
                }
                None => break,
            }
        }
        entries.order.push_back(key.clone());
        entries.map.insert(key, CachedLayout { fingerprint, pages });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(n: u32) -> Arc<Vec<Page>> {
        Arc::new(
            (1..=n)
                .map(|index| Page {
                    index,
                    usable_height: 100.0,
                    used_height: 0.0,
                    blocks: Vec::new(),
                })
                .collect(),
        )
    }

    #[test]
    fn evicts_oldest_first() {
        let cache = LayoutCache::with_capacity(2);
        cache.insert("a".into(), "fa".into(), pages(1));
        cache.insert("b".into(), "fb".into(), pages(2));
        cache.insert("c".into(), "fc".into(), pages(3));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("c").unwrap().1.len(), 3);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = LayoutCache::with_capacity(0);
        cache.insert("a".into(), "fa".into(), pages(1));
        assert!(cache.is_empty());
    }

    #[test]
    fn key_changes_with_geometry() {
        let parts: Vec<Part> = Vec::new();
        let questions = QuestionSet::new();
        let settings = LayoutSettings::default();
        let a4 = PageGeometry::a4();
        let letter = PageGeometry {
            page_width: 612.0,
            page_height: 792.0,
            ..PageGeometry::a4()
        };
        let k1 = LayoutCache::key(&parts, &questions, &a4, &settings).unwrap();
        let k2 = LayoutCache::key(&parts, &questions, &a4, &settings).unwrap();
        let k3 = LayoutCache::key(&parts, &questions, &letter, &settings).unwrap();
        assert_eq!(k1, k2);
        assert_ne!(k1, k3);
    }
}
