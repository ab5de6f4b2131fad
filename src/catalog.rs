//! The name-keyed image catalog
//!
//! A catalog is built fresh for every request and never outlives it. Records
//! are keyed by base filename. The first record inserted under a name wins
//! outright; later records with the same name are dropped whole, with no
//! merging of their fields.

use crate::image::{ImageRecord, KindSet};
use std::collections::{hash_map::Entry, HashMap};

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    records: HashMap<String, ImageRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ImageRecord> {
        self.records.get(name)
    }

    /// Insert each record whose name isn't already present
    ///
    /// Returns how many were inserted.
    pub fn merge<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = ImageRecord>,
    {
        let mut inserted = 0;
        for record in records {
            match self.records.entry(record.name.clone()) {
                Entry::Occupied(_) => {
                    log::trace!("{} already cataloged, dropping later record", record.name);
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                    inserted += 1;
                }
            }
        }
        inserted
    }

    /// Mark every ancestor of an in-use image as in use too
    ///
    /// Ancestors that aren't in the catalog are skipped. This must run once,
    /// after every merge, so the outcome doesn't depend on discovery order.
    pub fn propagate_usage(&mut self) {
        let mut ancestors = Vec::new();
        for record in self.records.values().filter(|record| record.in_use) {
            ancestors.extend(record.backing_images.iter().cloned());
        }
        for name in ancestors {
            match self.records.get_mut(&name) {
                Some(ancestor) => ancestor.in_use = true,
                None => log::trace!("backing image {} is not cataloged", name),
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.values()
    }

    /// Every record, in no particular order
    pub fn into_records(self) -> Vec<ImageRecord> {
        self.records.into_iter().map(|(_, record)| record).collect()
    }

    /// Records of the given kinds that `allow` accepts, sorted by name
    pub fn select<F>(self, kinds: &KindSet, allow: F) -> Vec<ImageRecord>
    where
        F: Fn(&ImageRecord) -> bool,
    {
        let mut selected: Vec<ImageRecord> = self
            .into_records()
            .into_iter()
            .filter(|record| kinds.contains(record.kind))
            .filter(|record| allow(record))
            .collect();
        selected.sort_by(|a, b| a.name.cmp(&b.name));
        selected
    }
}
