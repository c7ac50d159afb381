use osmpbfreader::Tags;
use std::io::Write;

use super::Sink;
use crate::error::Result;
use crate::feature::Feature;
use crate::tags::to_properties;

/// Writes each feature back out on its own line with its properties replaced.
pub struct GeoJsonSink<W: Write> {
    out: W,
}

impl<W: Write> GeoJsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for GeoJsonSink<W> {
    fn write(&mut self, mut feature: Feature, tags: &Tags) -> Result<bool> {
        feature.properties = Some(to_properties(tags));
        serde_json::to_writer(&mut self.out, &feature)?;
        self.out.write_all(b"\n")?;
        Ok(true)
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::set_tag;
    use serde_json::{json, Value};

    #[test]
    fn properties_are_replaced_and_geometry_kept() {
        let line = r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[-121.5,46.1]},"properties":{"RECAREANAME":"X","MARKERACTIVITY":"Trailhead"}}"#;
        let feature = Feature::from_line(line, 1).unwrap();
        let mut tags = Tags::new();
        set_tag(&mut tags, "highway", Some("trailhead"));

        let mut sink = GeoJsonSink::new(Vec::new());
        assert!(sink.write(feature, &tags).unwrap());
        sink.finish().unwrap();
        let written = String::from_utf8(sink.into_inner()).unwrap();

        assert!(written.ends_with('\n'));
        let value: Value = serde_json::from_str(written.trim_end()).unwrap();
        assert_eq!(value["type"], json!("Feature"));
        assert_eq!(value["geometry"]["coordinates"], json!([-121.5, 46.1]));
        assert_eq!(value["properties"], json!({"highway": "trailhead"}));
    }
}
