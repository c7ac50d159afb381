use osmpbfreader::Tags;
use serde_json::{Map, Value};

pub const FOREST_SERVICE: &str = "US Forest Service";

/// Insert `value` under `key`. A missing value leaves the key out entirely.
pub fn set_tag<V: Into<String>>(tags: &mut Tags, key: &str, value: Option<V>) {
    if let Some(value) = value {
        let value: String = value.into();
        tags.insert(key.into(), value.into());
    }
}

pub fn tag<'a>(tags: &'a Tags, key: &str) -> Option<&'a str> {
    tags.get(key).map(|value| value.as_str())
}

/// GeoJSON `properties` object for a finished tag set.
pub fn to_properties(tags: &Tags) -> Map<String, Value> {
    tags.iter()
        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
        .collect()
}
