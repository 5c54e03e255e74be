//! Loading configuration text into a [`Value`] tree.
//!
//! Parsing is delegated to `serde_json`, `toml` and `serde_yaml`; this module
//! only picks the parser and normalizes the result.
//!
//! | Extension       | Format  |
//! |-----------------|---------|
//! | `.json`         | JSON    |
//! | `.toml`         | TOML    |
//! | `.yaml`, `.yml` | YAML    |

use crate::error::LoadError;
use crate::value::Value;
use std::{fmt, fs, path::Path};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    /// Detect format from a file extension (case-insensitive, no leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Detect format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse `content` as `format`.
pub fn from_str(content: &str, format: Format) -> Result<Value, LoadError> {
    let value = match format {
        Format::Json => Value::from(serde_json::from_str::<serde_json::Value>(content)?),
        Format::Toml => Value::from(toml::from_str::<toml::Value>(content)?),
        Format::Yaml => Value::try_from(serde_yaml::from_str::<serde_yaml::Value>(content)?)?,
    };
    Ok(value)
}

/// Read and parse a file, detecting the format from its extension.
pub fn from_path(path: &Path) -> Result<Value, LoadError> {
    let format =
        Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;

    let content =
        fs::read_to_string(path).map_err(|err| LoadError::Io(path.to_path_buf(), err))?;

    crate::debug!("load"; "parsing {} as {}", path.display(), format);
    from_str(&content, format)
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_extension("json"), Some(Format::Json));
        assert_eq!(Format::from_extension("TOML"), Some(Format::Toml));
        assert_eq!(Format::from_extension("yml"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("yaml"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("ini"), None);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            Format::from_path(Path::new("/etc/app/config.json")),
            Some(Format::Json)
        );
        assert_eq!(Format::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_formats_agree() {
        let json = from_str(r#"{"server": {"port": 8080, "hosts": ["a", "b"]}}"#, Format::Json)
            .unwrap();
        let toml = from_str("[server]\nport = 8080\nhosts = [\"a\", \"b\"]\n", Format::Toml)
            .unwrap();
        let yaml = from_str("server:\n  port: 8080\n  hosts: [a, b]\n", Format::Yaml).unwrap();

        assert_eq!(json, toml);
        assert_eq!(json, yaml);
    }

    #[test]
    fn test_keeps_document_order() {
        let value = from_str("zeta = 1\nalpha = 2\n", Format::Toml).unwrap();
        let keys: Vec<_> = value.as_mapping().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            from_str("{not json", Format::Json),
            Err(LoadError::Json(_))
        ));
        assert!(matches!(
            from_str("[base\ntitle = \"x\"", Format::Toml),
            Err(LoadError::Toml(_))
        ));
        assert!(matches!(
            from_str("a: [unclosed", Format::Yaml),
            Err(LoadError::Yaml(_))
        ));
        assert!(matches!(
            from_str("1: a\n\"1\": b\n", Format::Yaml),
            Err(LoadError::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[site]\ntitle = \"Test\"").unwrap();

        let value = from_path(file.path()).unwrap();
        let site = value.as_mapping().unwrap()["site"].as_mapping().unwrap();
        assert_eq!(site["title"], Value::Scalar(Scalar::from("Test")));
    }

    #[test]
    fn test_from_path_errors() {
        let err = from_path(Path::new("config.ini")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));

        let dir = tempfile::tempdir().unwrap();
        let err = from_path(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io(..)));
    }
}
