use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

use crate::error::{Error, Result};

/// One newline-delimited GeoJSON feature. The geometry and every member other than
/// `properties` are carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Value,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub members: Map<String, Value>,
}

impl Feature {
    pub fn from_line(line: &str, line_number: usize) -> Result<Self> {
        serde_json::from_str(line).map_err(|source| Error::MalformedLine {
            line: line_number,
            source,
        })
    }

    pub fn properties(&self) -> PropertyBag<'_> {
        PropertyBag::new(self.properties.as_ref())
    }
}

/// Read-only view over a feature's source attributes.
#[derive(Clone, Copy)]
pub struct PropertyBag<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> PropertyBag<'a> {
    pub fn new(map: Option<&'a Map<String, Value>>) -> Self {
        Self { map }
    }

    /// Text value of a field. Numbers and booleans are rendered; null, arrays and
    /// objects read as absent.
    pub fn get(&self, field: &str) -> Option<Cow<'a, str>> {
        match self.map?.get(field)? {
            Value::String(text) => Some(Cow::Borrowed(text.as_str())),
            Value::Number(number) => Some(Cow::Owned(number.to_string())),
            Value::Bool(flag) => Some(Cow::Owned(flag.to_string())),
            _ => None,
        }
    }

    pub fn is(&self, field: &str, expected: &str) -> bool {
        self.get(field).as_deref() == Some(expected)
    }

    /// The field must be present; its value may still be null.
    pub fn require(&self, field: &'static str) -> Result<Option<Cow<'a, str>>> {
        let present = self
            .map
            .map(|map| map.contains_key(field))
            .unwrap_or(false);
        if !present {
            return Err(self.missing(field));
        }
        Ok(self.get(field))
    }

    /// The field must be present and carry a non-null value.
    pub fn require_value(&self, field: &'static str) -> Result<Cow<'a, str>> {
        self.get(field).ok_or_else(|| self.missing(field))
    }

    pub fn describe(&self) -> String {
        match self.map {
            Some(map) => serde_json::to_string(map).unwrap_or_else(|_| "{..}".to_string()),
            None => "null".to_string(),
        }
    }

    fn missing(&self, field: &'static str) -> Error {
        Error::MissingField {
            field,
            properties: self.describe(),
        }
    }
}
