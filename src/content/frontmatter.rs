//! Front-matter parsing

use serde::de::{self, DeserializeOwned, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Line that opens and closes a YAML front-matter block
const FENCE: &str = "---";

/// Split a document into its raw YAML front-matter and its body.
///
/// The block must start on the very first line (an optional UTF-8 BOM is
/// skipped) and be closed by another `---` line. Anything else is treated
/// as a document without front-matter, so the whole input is the body.
pub fn split(input: &str) -> (Option<&str>, &str) {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    let (first, rest) = match input.find('\n') {
        Some(pos) => (&input[..pos], &input[pos + 1..]),
        None => (input, ""),
    };
    if first.trim_end() != FENCE {
        return (None, input);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    // Unclosed block
    (None, input)
}

/// Parse a document's front-matter into `T` and return it with the body.
///
/// Missing or empty front-matter yields `T::default()`. YAML that fails to
/// parse, or that is not a mapping, is an error.
pub fn parse<T>(input: &str) -> Result<(T, &str), serde_yaml::Error>
where
    T: DeserializeOwned + Default,
{
    let (yaml, body) = split(input);
    let Some(yaml) = yaml.filter(|y| !y.trim().is_empty()) else {
        return Ok((T::default(), body));
    };

    let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    let data = match value {
        serde_yaml::Value::Null => T::default(),
        serde_yaml::Value::Mapping(mapping) => {
            T::deserialize(serde_yaml::Value::Mapping(stringify_keys(mapping)))?
        }
        _ => {
            return Err(de::Error::custom(
                "front-matter must be a mapping of keys to values",
            ))
        }
    };

    Ok((data, body))
}

/// Turn every mapping key into a string key.
///
/// Field names are matched as strings, so a key such as `2023:` or `true:`
/// would otherwise fail the whole document.
fn stringify_keys(mapping: serde_yaml::Mapping) -> serde_yaml::Mapping {
    mapping
        .into_iter()
        .map(|(key, value)| {
            let key = match key {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Null => "null".to_string(),
                other => serde_yaml::to_string(&other)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_default(),
            };
            (serde_yaml::Value::String(key), value)
        })
        .collect()
}

/// A scalar YAML value read as text.
///
/// Authors write `title: 2024` or `date: 2024-01-01` without quotes; those
/// arrive as numbers or strings depending on the value, and both are kept.
struct ScalarString(String);

impl<'de> Deserialize<'de> for ScalarString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = ScalarString;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, number or boolean")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(ScalarString(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
                Ok(ScalarString(value))
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
                Ok(ScalarString(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(ScalarString(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(ScalarString(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
                Ok(ScalarString(value.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// Required text field: `null` becomes the empty string
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<ScalarString>::deserialize(deserializer)?;
    Ok(value.map(|s| s.0).unwrap_or_default())
}

/// Optional text field: `null` stays absent
pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<ScalarString>::deserialize(deserializer)?;
    Ok(value.map(|s| s.0))
}

/// Custom deserializer that handles both a single string and a list of strings
pub(crate) fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            // Null items (`[Rust, ~]`) are dropped
            while let Some(item) = seq.next_element::<Option<ScalarString>>()? {
                if let Some(item) = item {
                    vec.push(item.0);
                }
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
