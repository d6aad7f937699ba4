//! Configuration loading for confpatch
//!
//! A [`Config`] owns one TOML tree. Extension files are merged over it with
//! [`Config::load_ext`]: tables gain keys, arrays are appended to, and other
//! values are overwritten. An extension may list paths under the reserved
//! `_deletes` key; those are removed before anything is merged, which is how
//! an array or table gets replaced instead of extended:
//!
//! ```toml
//! # drop foo and bar.player, then define foo afresh
//! _deletes = ['foo', 'bar.player']
//! foo = ['only', 'these']
//! ```
//!
//! # Example
//!
//! ```no_run
//! use confpatch::Config;
//!
//! let mut config = Config::load_file("service.conf")?;
//! config.load_ext("service-ext.conf")?;
//! let port: Option<u16> = config.unmarshal("http.server.port")?;
//! # Ok::<(), confpatch::ConfigError>(())
//! ```

pub mod options;

pub use options::Options;

use crate::error::{ConfigError, Result};
use crate::patch::Patch;
use crate::path::DottedPath;
use serde::de::{DeserializeOwned, IntoDeserializer};
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use toml::{Table, Value};

/// A loaded configuration tree
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    root: Value,
    options: Options,
}

impl Config {
    /// Parse the TOML file at `path`
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_file_with(path, Options::default())
    }

    pub fn load_file_with(path: impl AsRef<Path>, options: Options) -> Result<Self> {
        let path = path.as_ref();
        let table = read_table(path)?;
        tracing::debug!("Loaded config {} ({} top-level keys)", path.display(), table.len());
        Ok(Self::from_table_with(table, options))
    }

    /// Parse TOML text, e.g. embedded defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::from_toml_str_with(text, Options::default())
    }

    pub fn from_toml_str_with(text: &str, options: Options) -> Result<Self> {
        parse_table(text, "<string>").map(|table| Self::from_table_with(table, options))
    }

    #[must_use]
    pub fn from_table(table: Table) -> Self {
        Self::from_table_with(table, Options::default())
    }

    #[must_use]
    pub fn from_table_with(table: Table, options: Options) -> Self {
        Self {
            root: Value::Table(table),
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The whole tree; always a table
    #[must_use]
    pub fn tree(&self) -> &Value {
        &self.root
    }

    /// Look up a raw value by dotted section. Malformed sections resolve to
    /// nothing.
    #[must_use]
    pub fn get(&self, section: &str) -> Option<&Value> {
        DottedPath::parse(section, self.options.separator)
            .ok()?
            .lookup(&self.root)
    }

    #[must_use]
    pub fn contains(&self, section: &str) -> bool {
        self.get(section).is_some()
    }

    /// Decode `section` into `T`. An empty section decodes the whole tree.
    ///
    /// Field names are matched against keys through serde, so
    /// `#[serde(rename = "...")]` binds a field to a differently named key.
    /// A missing section decodes to `None` for `Option<_>` targets and is a
    /// [`ConfigError::Decode`] for everything else.
    pub fn unmarshal<T: DeserializeOwned>(&self, section: &str) -> Result<T> {
        let path = DottedPath::parse(section, self.options.separator)?;
        decode(path.lookup(&self.root), &path)
    }

    /// Like [`Config::unmarshal`], but writes into `target`, which is left
    /// untouched on error.
    pub fn unmarshal_into<T: DeserializeOwned>(&self, section: &str, target: &mut T) -> Result<()> {
        *target = self.unmarshal(section)?;
        Ok(())
    }

    /// Merge the extension file at `path` over the current tree.
    ///
    /// On error the current tree is left exactly as it was.
    pub fn load_ext(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let ext = read_table(path)?;
        self.apply_extension(ext)?;
        tracing::debug!("Applied extension {}", path.display());
        Ok(())
    }

    /// Merge extension TOML text over the current tree
    pub fn load_ext_str(&mut self, text: &str) -> Result<()> {
        let ext = parse_table(text, "<string>")?;
        self.apply_extension(ext)
    }

    fn apply_extension(&mut self, mut ext: Table) -> Result<()> {
        let patch = self
            .take_deletions(&mut ext)?
            .into_iter()
            .fold(Patch::new(), Patch::delete)
            .add(DottedPath::root(), Value::Table(ext));

        self.root = patch.apply(&self.root)?;
        Ok(())
    }

    fn take_deletions(&self, ext: &mut Table) -> Result<Vec<DottedPath>> {
        let key = &self.options.deletes_key;
        match ext.remove(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(raw) => DottedPath::parse(raw, self.options.separator),
                    other => Err(ConfigError::Patch(format!(
                        "`{key}` entries must be strings, found {}",
                        other.type_str()
                    ))),
                })
                .collect(),
            Some(other) => Err(ConfigError::Patch(format!(
                "`{key}` must be an array of strings, found {}",
                other.type_str()
            ))),
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_toml_str(s)
    }
}

fn read_table(path: &Path) -> Result<Table> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    // TOML documents must be UTF-8, so bad bytes are malformed content
    let origin = path.display().to_string();
    let content = String::from_utf8(bytes).map_err(|source| ConfigError::Parse {
        origin: origin.clone(),
        source: source.into(),
    })?;

    parse_table(&content, &origin)
}

fn parse_table(text: &str, origin: &str) -> Result<Table> {
    text.parse::<Table>().map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source: source.into(),
    })
}

fn decode<T: DeserializeOwned>(value: Option<&Value>, section: &DottedPath) -> Result<T> {
    let Some(value) = value else {
        // Only targets that accept "nothing" (Option<_>, ()) decode from an absent section
        let absent: serde::de::value::UnitDeserializer<serde::de::value::Error> =
            ().into_deserializer();
        return T::deserialize(absent).map_err(|_| ConfigError::Decode {
            path: section.to_string(),
            message: "section is missing".to_string(),
        });
    };

    serde_path_to_error::deserialize(value.clone()).map_err(|err| ConfigError::Decode {
        path: field_path(section, &err.path().to_string()),
        message: err.into_inner().to_string(),
    })
}

/// Join a section with the field path reported by the decoder
fn field_path(section: &DottedPath, field: &str) -> String {
    match (section.is_root(), field) {
        (_, ".") => section.to_string(),
        (true, field) => field.to_string(),
        (false, field) if field.starts_with('[') => format!("{section}{field}"),
        (false, field) => format!("{section}{}{field}", section.separator()),
    }
}
