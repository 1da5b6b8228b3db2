//! The in-memory dataset the engine operates over, plus the per-prefix
//! counter cache.
//!
//! The engine never owns persistence: callers hand it a read-only [`Dataset`]
//! snapshot and a mutable [`Counters`], and append tags the engine returns.
//! This is a single-process, synchronous model — the counter read-modify-write
//! in [`crate::counter::next_number`] is safe only because no other caller can
//! observe the cache between read and write. Multi-process deployments would
//! need an external atomic counter; that is a documented limitation, not a
//! supported mode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::reference::{DictionaryItem, GlobalVariable, Project, ReservedRange};
use crate::model::tag::Tag;
use crate::model::template::Template;

/// Read-only snapshot of everything the engine consults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub dictionaries: Vec<DictionaryItem>,
    #[serde(default)]
    pub global_variables: Vec<GlobalVariable>,
    #[serde(default)]
    pub reserved_ranges: Vec<ReservedRange>,
}

impl Dataset {
    /// Tags belonging to one project.
    pub fn tags_in<'a, 'p>(&'a self, project_id: &'p str) -> impl Iterator<Item = &'a Tag> + use<'a, 'p> {
        self.tags.iter().filter(move |t| t.project_id == project_id)
    }

    /// Templates belonging to one project.
    pub fn templates_in<'a, 'p>(
        &'a self,
        project_id: &'p str,
    ) -> impl Iterator<Item = &'a Template> + use<'a, 'p> {
        self.templates
            .iter()
            .filter(move |t| t.project_id == project_id)
    }

    /// Look up a template by id within a project.
    #[must_use]
    pub fn template(&self, project_id: &str, template_id: &str) -> Option<&Template> {
        self.templates_in(project_id).find(|t| t.id == template_id)
    }

    /// Look up a tag by record id or by its full tag string.
    #[must_use]
    pub fn find_tag(&self, project_id: &str, key: &str) -> Option<&Tag> {
        self.tags_in(project_id)
            .find(|t| t.id == key || t.full_tag == key)
    }

    /// Whether a full tag string is already taken within a project.
    #[must_use]
    pub fn tag_exists(&self, project_id: &str, full_tag: &str) -> bool {
        self.tags_in(project_id).any(|t| t.full_tag == full_tag)
    }

    /// Reserved ranges applying to one `(project, prefix)` scope.
    pub fn ranges_for<'a, 'p, 's>(
        &'a self,
        project_id: &'p str,
        scope: &'s str,
    ) -> impl Iterator<Item = &'a ReservedRange> + use<'a, 'p, 's> {
        self.reserved_ranges
            .iter()
            .filter(move |r| r.project_id == project_id && r.scope == scope)
    }
}

/// Composite key scoping a counter to one prefix within one project.
///
/// A real key type rather than `"{project_id}_{prefix}"` string splicing, so
/// separator characters inside ids or prefixes cannot collide two counters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CounterKey {
    pub project_id: String,
    pub prefix: String,
}

impl CounterKey {
    #[must_use]
    pub fn new(project_id: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            prefix: prefix.into(),
        }
    }
}

/// Serialized form of one counter entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterEntry {
    pub project_id: String,
    pub prefix: String,
    pub last_issued: u64,
}

/// Cache of the last-issued number per `(project, prefix)`.
///
/// Purely an accelerator for [`crate::counter::next_number`]: a missing or
/// stale entry is repaired by re-scanning tags, so the cache can always be
/// dropped or rebuilt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CounterEntry>", into = "Vec<CounterEntry>")]
pub struct Counters {
    map: BTreeMap<CounterKey, u64>,
}

impl Counters {
    /// Last-issued number for a key, if cached.
    #[must_use]
    pub fn get(&self, key: &CounterKey) -> Option<u64> {
        self.map.get(key).copied()
    }

    /// Record `last_issued` for a key.
    pub fn set(&mut self, key: CounterKey, last_issued: u64) {
        self.map.insert(key, last_issued);
    }

    /// All cached entries, in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&CounterKey, u64)> {
        self.map.iter().map(|(k, v)| (k, *v))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Recompute every cached entry from the tag set, dropping entries whose
    /// prefix no longer matches any tag.
    pub fn rebuild(&mut self, dataset: &Dataset) {
        let keys: Vec<CounterKey> = self.map.keys().cloned().collect();
        for key in keys {
            let max = crate::counter::scan_max_number(dataset, &key.project_id, &key.prefix);
            if max == 0 {
                self.map.remove(&key);
            } else {
                self.map.insert(key, max);
            }
        }
    }
}

impl From<Vec<CounterEntry>> for Counters {
    fn from(entries: Vec<CounterEntry>) -> Self {
        let mut map = BTreeMap::new();
        for e in entries {
            map.insert(CounterKey::new(e.project_id, e.prefix), e.last_issued);
        }
        Self { map }
    }
}

impl From<Counters> for Vec<CounterEntry> {
    fn from(counters: Counters) -> Self {
        counters
            .map
            .into_iter()
            .map(|(k, v)| CounterEntry {
                project_id: k.project_id,
                prefix: k.prefix,
                last_issued: v,
            })
            .collect()
    }
}
