//! Search criteria and their JSON wire form
//!
//! Criteria are an insertion-ordered mapping of attribute name to an
//! insertion-ordered set of values. On the wire a key with one value is a
//! plain string; a key with several values becomes an array of single-key
//! objects:
//!
//! ```json
//! {"NAME_FULL":[{"NAME_FULL":"JOHN DOE"},{"NAME_FULL":"JANE DOE"}],"ADDR_CITY":"LOS ANGELES"}
//! ```

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{HarnessError, Result};

/// One attribute with one or more values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub key: String,
    pub values: Vec<String>,
}

/// Shorthand constructor for a [`Criterion`]
pub fn criterion<I, V>(key: impl Into<String>, values: I) -> Criterion
where
    I: IntoIterator<Item = V>,
    V: Into<String>,
{
    Criterion {
        key: key.into(),
        values: values.into_iter().map(Into::into).collect(),
    }
}

/// Ordered attribute → values mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchCriteria {
    entries: Vec<(String, Vec<String>)>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from criteria; repeated keys merge into the first occurrence
    pub fn from_criteria(criteria: impl IntoIterator<Item = Criterion>) -> Self {
        let mut result = Self::new();
        for c in criteria {
            result.add(c.key, c.values);
        }
        result
    }

    /// Single-key criteria
    pub fn single<I, V>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::from_criteria([criterion(key, values)])
    }

    /// Append values under `key`, skipping values already present
    pub fn add<I, V>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let key = key.into();
        let index = match self.entries.iter().position(|(k, _)| *k == key) {
            Some(index) => index,
            None => {
                self.entries.push((key, Vec::new()));
                self.entries.len() - 1
            }
        };
        let existing = &mut self.entries[index].1;
        for value in values {
            let value = value.into();
            if !existing.contains(&value) {
                existing.push(value);
            }
        }
    }

    pub fn with<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.add(key, values);
        self
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object in the service's criteria shape; keys without values are dropped
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (key, values) in &self.entries {
            match values.as_slice() {
                [] => continue,
                [single] => {
                    object.insert(key.clone(), Value::String(single.clone()));
                }
                many => {
                    let items = many.iter().map(|v| single_key_object(key, v)).collect();
                    object.insert(key.clone(), Value::Array(items));
                }
            }
        }
        Value::Object(object)
    }

    /// Compact JSON text used as the `attrs` query parameter
    pub fn to_attrs_text(&self) -> String {
        self.to_json().to_string()
    }
}

impl fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_attrs_text())
    }
}

fn single_key_object(key: &str, value: &str) -> Value {
    let mut object = Map::new();
    object.insert(key.to_string(), Value::String(value.to_string()));
    Value::Object(object)
}

/// Parse `attrs` text into a criteria object
///
/// The text must be a JSON object with at least one attribute.
pub fn parse_attrs(attrs: &str) -> Result<Map<String, Value>> {
    if attrs.trim().is_empty() {
        return Err(HarnessError::MissingCriteria);
    }
    match serde_json::from_str::<Value>(attrs)? {
        Value::Object(object) if !object.is_empty() => Ok(object),
        Value::Object(_) => Err(HarnessError::MissingCriteria),
        other => Err(HarnessError::invalid_argument(format!(
            "attrs must be a JSON object, found: {}",
            other
        ))),
    }
}

/// Convert repeated `attr=KEY:value` parameters into a criteria object
///
/// A key seen once maps to its value. A key seen several times maps under
/// `KEY_LIST` to an array of single-key objects. Values may be empty.
pub fn attr_params_to_json<S: AsRef<str>>(params: &[S]) -> Result<Map<String, Value>> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();

    for param in params {
        let param = param.as_ref();
        let colon = param.find(':').ok_or_else(|| HarnessError::InvalidAttrParam {
            param: param.to_string(),
            reason: "must be a colon-delimited string",
        })?;
        if colon == 0 {
            return Err(HarnessError::InvalidAttrParam {
                param: param.to_string(),
                reason: "no property name before the colon",
            });
        }

        let (name, value) = (&param[..colon], &param[colon + 1..]);
        match grouped.iter_mut().find(|(k, _)| k == name) {
            Some((_, values)) => values.push(value.to_string()),
            None => grouped.push((name.to_string(), vec![value.to_string()])),
        }
    }

    let mut object = Map::new();
    for (name, values) in grouped {
        if let [single] = values.as_slice() {
            object.insert(name, Value::String(single.clone()));
        } else {
            let items = values.iter().map(|v| single_key_object(&name, v)).collect();
            object.insert(format!("{}_LIST", name), Value::Array(items));
        }
    }

    if object.is_empty() {
        return Err(HarnessError::MissingCriteria);
    }
    Ok(object)
}
