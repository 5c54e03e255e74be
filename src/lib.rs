//! Report configuration fields that were present but never read.
//!
//! Wrap a deserialized JSON/YAML/TOML tree in a [`TrackedMapping`], read what
//! you need through it, then call [`TrackedMapping::unaccessed`] to get the
//! dotted path of every field nobody touched. This catches both parser code
//! that silently ignores a field and typo'd user keys, without keeping a
//! separate list of expected keys.
//!
//! ```
//! use tracked_config::{Format, TrackedMapping, load};
//!
//! let value = load::from_str(
//!     r#"{"server": {"host": "localhost", "port": 8080}, "debug": true}"#,
//!     Format::Json,
//! )?;
//! let config = TrackedMapping::new(&value)?;
//!
//! let host = config.mapping("server")?.scalar("host")?;
//! assert_eq!(host.to_string(), "localhost");
//!
//! assert_eq!(config.unaccessed(), ["debug", "server.port"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Structure
//!
//! | Module   | Purpose                                         |
//! |----------|-------------------------------------------------|
//! | `value`  | `Value` tree and parser conversions             |
//! | `track`  | `TrackedMapping`, `TrackedSequence`, paths      |
//! | `load`   | Format detection, text → `Value`                |
//! | `error`  | `TrackError`, `LoadError`                       |
//! | `logger` | `debug!` macro, verbose flag                   |
//!
//! Trackers use `Rc` and `RefCell` internally and are not thread-safe.

mod error;
pub mod load;
pub mod logger;
mod track;
mod value;

pub use error::{LoadError, TrackError};
pub use load::Format;
pub use track::{Keys, Tracked, TrackedMapping, TrackedSequence, path, track};
pub use value::{Kind, Mapping, Scalar, Sequence, Value};
