//! Layered TOML configuration.
//!
//! Load a base file with [`Config::load_file`], layer extension files over it
//! with [`Config::load_ext`], and decode dotted sections into your own types
//! with [`Config::unmarshal`].
//!
//! ```no_run
//! use confpatch::Config;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Server {
//!     #[serde(rename = "listen_addr")]
//!     addr: String,
//! }
//!
//! let mut config = Config::load_file("service.conf")?;
//! config.load_ext("service-ext.conf")?;
//! let server: Server = config.unmarshal("http.server")?;
//! # Ok::<(), confpatch::ConfigError>(())
//! ```

pub mod config;
pub mod error;
pub mod patch;
pub mod path;

pub use config::{Config, Options};
pub use error::{ConfigError, Result};
pub use patch::{merge, Patch, PatchEntry};
pub use path::DottedPath;
