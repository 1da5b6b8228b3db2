//! Dictionary and global-variable lookups.
//!
//! Pure reads over the dataset snapshot. Absence is never an error here:
//! tag assembly substitutes the empty string and previews render a visible
//! placeholder instead, so in-progress forms stay usable.

use crate::dataset::Dataset;
use crate::model::reference::{DictionaryItem, GlobalVariable};

/// First dictionary item matching `(project, category, code)`, in list order.
#[must_use]
pub fn resolve_dictionary<'a>(
    dataset: &'a Dataset,
    project_id: &str,
    category: &str,
    code: &str,
) -> Option<&'a DictionaryItem> {
    dataset
        .dictionaries
        .iter()
        .find(|d| d.project_id == project_id && d.category == category && d.code == code)
}

/// First global variable matching `(project, key)`. Keys are case-sensitive.
#[must_use]
pub fn resolve_global_var<'a>(
    dataset: &'a Dataset,
    project_id: &str,
    key: &str,
) -> Option<&'a GlobalVariable> {
    dataset
        .global_variables
        .iter()
        .find(|v| v.project_id == project_id && v.key == key)
}

/// Dictionary items of one category, for selection lists.
pub fn dictionary_items<'a>(
    dataset: &'a Dataset,
    project_id: &'a str,
    category: &'a str,
) -> impl Iterator<Item = &'a DictionaryItem> {
    dataset
        .dictionaries
        .iter()
        .filter(move |d| d.project_id == project_id && d.category == category)
}

/// Whether `(category, code)` is free within a project.
///
/// Used by the write path: adding a duplicate code would make read-time
/// resolution silently pick the first match, so writes are refused instead.
#[must_use]
pub fn code_is_unique(dataset: &Dataset, project_id: &str, category: &str, code: &str) -> bool {
    resolve_dictionary(dataset, project_id, category, code).is_none()
}
