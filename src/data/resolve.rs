use thiserror::Error;

use super::model::{Table, TableCollection};

/// A multi-sheet workbook was resolved without a usable sheet choice.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("ambiguous sheet selection {selection:?}: expected one of {available:?}")]
pub struct AmbiguousSelection {
    pub selection: Option<String>,
    pub available: Vec<String>,
}

/// Pick exactly one table out of a collection.
///
/// A single-entry collection ignores `selection` entirely.  A multi-entry
/// collection requires `selection` to name an existing sheet.  Pure and
/// deterministic; prompting the user is the caller's job.
pub fn resolve<'a>(
    collection: &'a TableCollection,
    selection: Option<&str>,
) -> Result<&'a Table, AmbiguousSelection> {
    if collection.len() == 1 {
        return Ok(collection.first());
    }
    selection
        .and_then(|name| collection.get(name))
        .ok_or_else(|| AmbiguousSelection {
            selection: selection.map(str::to_string),
            available: collection
                .sheet_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
}
