//! Resource records for the resource store.

use serde::{Deserialize, Serialize};

/// A named resource file (corpus, serialized model, ...) that agents can
/// look up by its logical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Logical name, e.g. "corpora.cornell".
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Where to download the file when it is missing locally.
    #[serde(default)]
    pub url: String,
    /// File name inside the resource folder.
    pub filename: String,
}
