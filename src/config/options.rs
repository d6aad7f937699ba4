use serde::{Deserialize, Serialize};

/// Knobs for loading and querying a [`Config`](super::Config)
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Splits section names and `_deletes` entries into keys
    #[serde(default = "default_separator")]
    pub separator: char,
    /// Reserved top-level key of an extension file listing paths to delete
    #[serde(default = "default_deletes_key")]
    pub deletes_key: String,
}

// Default value functions
fn default_separator() -> char {
    '.'
}
fn default_deletes_key() -> String {
    "_deletes".to_string()
}

impl Default for Options {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            deletes_key: default_deletes_key(),
        }
    }
}
