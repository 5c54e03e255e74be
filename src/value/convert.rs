//! Conversions from parser value trees into [`Value`].

use super::{Mapping, Scalar, Value};
use crate::error::LoadError;

// ============================================================================
// JSON
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Scalar::Null.into(),
            Json::Bool(b) => Scalar::Bool(b).into(),
            Json::Number(n) => json_number(&n).into(),
            Json::String(s) => Scalar::String(s).into(),
            Json::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Json::Object(map) => Self::Mapping(
                map.into_iter()
                    .map(|(key, child)| (key, Self::from(child)))
                    .collect(),
            ),
        }
    }
}

fn json_number(n: &serde_json::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Integer(i)
    } else if let Some(u) = n.as_u64() {
        Scalar::Unsigned(u)
    } else {
        n.as_f64()
            .map_or_else(|| Scalar::String(n.to_string()), Scalar::Float)
    }
}

// ============================================================================
// TOML
// ============================================================================

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        use toml::Value as Toml;

        match value {
            Toml::String(s) => Scalar::String(s).into(),
            Toml::Integer(i) => Scalar::Integer(i).into(),
            Toml::Float(f) => Scalar::Float(f).into(),
            Toml::Boolean(b) => Scalar::Bool(b).into(),
            Toml::Datetime(dt) => Scalar::Datetime(dt.to_string()).into(),
            Toml::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Toml::Table(table) => Self::Mapping(
                table
                    .into_iter()
                    .map(|(key, child)| (key, Self::from(child)))
                    .collect(),
            ),
        }
    }
}

// ============================================================================
// YAML
// ============================================================================

/// YAML allows arbitrary mapping keys; only scalar keys with a textual form
/// are accepted.
impl TryFrom<serde_yaml::Value> for Value {
    type Error = LoadError;

    fn try_from(value: serde_yaml::Value) -> Result<Self, Self::Error> {
        use serde_yaml::Value as Yaml;

        Ok(match value {
            Yaml::Null => Scalar::Null.into(),
            Yaml::Bool(b) => Scalar::Bool(b).into(),
            Yaml::Number(n) => yaml_number(&n).into(),
            Yaml::String(s) => Scalar::String(s).into(),
            Yaml::Sequence(items) => Self::Sequence(
                items
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Yaml::Mapping(map) => {
                let mut out = Mapping::with_capacity(map.len());
                for (key, child) in map {
                    // `1` and `"1"` are distinct YAML keys but the same text
                    let key = yaml_key(key)?;
                    if out.contains_key(&key) {
                        return Err(LoadError::DuplicateKey(key));
                    }
                    out.insert(key, Self::try_from(child)?);
                }
                Self::Mapping(out)
            }
            Yaml::Tagged(tagged) => Self::try_from(tagged.value)?,
        })
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Integer(i)
    } else if let Some(u) = n.as_u64() {
        Scalar::Unsigned(u)
    } else {
        n.as_f64()
            .map_or_else(|| Scalar::String(n.to_string()), Scalar::Float)
    }
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, LoadError> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(LoadError::UnsupportedKey(format!("{other:?}"))),
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{"b": 1, "a": [true, null, 1.5, "x"], "big": 18446744073709551615}"#,
        )
        .unwrap();
        let value = Value::from(json);

        let map = value.as_mapping().unwrap();
        assert_eq!(map["b"], Value::Scalar(Scalar::Integer(1)));
        assert_eq!(
            map["a"],
            Value::Sequence(vec![
                Scalar::Bool(true).into(),
                Scalar::Null.into(),
                Scalar::Float(1.5).into(),
                Scalar::from("x").into(),
            ])
        );
        assert_eq!(map["big"], Value::Scalar(Scalar::Unsigned(u64::MAX)));
    }

    #[test]
    fn test_from_toml() {
        let toml: toml::Value = toml::from_str(
            "title = \"demo\"\nwhen = 1979-05-27T07:32:00Z\n[server]\nport = 8080\n",
        )
        .unwrap();
        let value = Value::from(toml);

        let map = value.as_mapping().unwrap();
        assert_eq!(map["title"], Value::Scalar(Scalar::from("demo")));
        assert_eq!(
            map["when"],
            Value::Scalar(Scalar::Datetime("1979-05-27T07:32:00Z".into()))
        );
        let server = map["server"].as_mapping().unwrap();
        assert_eq!(server["port"], Value::Scalar(Scalar::Integer(8080)));
    }

    #[test]
    fn test_from_yaml() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("name: demo\n1: one\ntrue: yes\nlist:\n  - !tag 3\n").unwrap();
        let value = Value::try_from(yaml).unwrap();

        let map = value.as_mapping().unwrap();
        assert_eq!(map["name"], Value::Scalar(Scalar::from("demo")));
        assert_eq!(map["1"], Value::Scalar(Scalar::from("one")));
        assert!(map.contains_key("true"));
        assert_eq!(
            map["list"],
            Value::Sequence(vec![Scalar::Integer(3).into()])
        );
    }

    #[test]
    fn test_from_yaml_rejects_composite_key() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("? [a, b]\n: value\n").unwrap();
        let err = Value::try_from(yaml).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedKey(_)));
    }

    #[test]
    fn test_from_yaml_rejects_duplicate_key() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("1: a\n\"1\": b\n").unwrap();
        let err = Value::try_from(yaml).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateKey(ref key) if key == "1"));

        // a later sibling must not hide the collision either
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("1: first\n\"1\": second\nok: 1\n").unwrap();
        assert!(matches!(
            Value::try_from(yaml),
            Err(LoadError::DuplicateKey(_))
        ));
    }
}
