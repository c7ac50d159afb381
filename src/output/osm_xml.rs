//! OSM XML output for loading converted records into a map editor.
//!
//! Every element gets a negative id so editors treat it as new. Way nodes at the
//! same coordinate are shared, which keeps connected roads and trails connected.

use osmpbfreader::Tags;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;
use tracing::warn;

use super::Sink;
use crate::error::Result;
use crate::feature::Feature;

pub struct OsmXmlSink<W: Write> {
    writer: Writer<W>,
    next_id: i64,
    way_nodes: HashMap<(u64, u64), i64>,
    ways: Vec<(Vec<i64>, Tags)>,
    finished: bool,
}

impl<W: Write> OsmXmlSink<W> {
    pub fn new(out: W) -> Result<Self> {
        let mut writer = Writer::new_with_indent(out, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new("osm").with_attributes([
            ("version", "0.6"),
            ("generator", env!("CARGO_PKG_NAME")),
        ])))?;
        Ok(Self {
            writer,
            next_id: -1,
            way_nodes: HashMap::new(),
            ways: Vec::new(),
            finished: false,
        })
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id -= 1;
        id
    }

    fn write_node(&mut self, coord: (f64, f64), tags: &Tags) -> Result<i64> {
        let id = self.allocate_id();
        let id_text = id.to_string();
        let lat = format!("{:.7}", coord.1);
        let lon = format!("{:.7}", coord.0);
        let node = BytesStart::new("node").with_attributes([
            ("id", id_text.as_str()),
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
        ]);
        self.write_element(node, "node", tags, &[])?;
        Ok(id)
    }

    fn way_node(&mut self, coord: (f64, f64)) -> Result<i64> {
        let key = (coord.0.to_bits(), coord.1.to_bits());
        if let Some(id) = self.way_nodes.get(&key) {
            return Ok(*id);
        }
        let id = self.write_node(coord, &Tags::new())?;
        self.way_nodes.insert(key, id);
        Ok(id)
    }

    fn add_way(&mut self, line: &[Value], tags: &Tags) -> Result<bool> {
        let Some(coords) = positions(line) else {
            warn!("skipping line with invalid coordinates");
            return Ok(false);
        };
        if coords.len() < 2 {
            warn!("skipping line with fewer than two positions");
            return Ok(false);
        }
        let mut refs = Vec::with_capacity(coords.len());
        for coord in coords {
            refs.push(self.way_node(coord)?);
        }
        self.ways.push((refs, tags.clone()));
        Ok(true)
    }

    fn add_node(&mut self, point: &Value, tags: &Tags) -> Result<bool> {
        match position(point) {
            Some(coord) => {
                self.write_node(coord, tags)?;
                Ok(true)
            }
            None => {
                warn!("skipping point with invalid coordinates");
                Ok(false)
            }
        }
    }

    fn write_element(
        &mut self,
        start: BytesStart<'_>,
        name: &str,
        tags: &Tags,
        refs: &[i64],
    ) -> Result<()> {
        if tags.is_empty() && refs.is_empty() {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        self.writer.write_event(Event::Start(start))?;
        for reference in refs {
            let reference = reference.to_string();
            self.writer.write_event(Event::Empty(
                BytesStart::new("nd").with_attributes([("ref", reference.as_str())]),
            ))?;
        }
        for (key, value) in tags.iter() {
            self.writer.write_event(Event::Empty(
                BytesStart::new("tag").with_attributes([("k", key.as_str()), ("v", value.as_str())]),
            ))?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}

impl<W: Write> Sink for OsmXmlSink<W> {
    fn write(&mut self, feature: Feature, tags: &Tags) -> Result<bool> {
        let geometry = &feature.geometry;
        let coordinates = &geometry["coordinates"];
        let mut written = false;
        match geometry["type"].as_str() {
            Some("Point") => written = self.add_node(coordinates, tags)?,
            Some("MultiPoint") => {
                for point in coordinates.as_array().into_iter().flatten() {
                    written |= self.add_node(point, tags)?;
                }
            }
            Some("LineString") => {
                if let Some(line) = coordinates.as_array() {
                    written = self.add_way(line, tags)?;
                }
            }
            Some("MultiLineString") => {
                for line in coordinates.as_array().into_iter().flatten() {
                    if let Some(line) = line.as_array() {
                        written |= self.add_way(line, tags)?;
                    }
                }
            }
            other => warn!(geometry = ?other, "skipping unsupported geometry"),
        }
        Ok(written)
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        let ways = std::mem::take(&mut self.ways);
        for (refs, tags) in ways {
            let id = self.allocate_id().to_string();
            let way = BytesStart::new("way").with_attributes([("id", id.as_str())]);
            self.write_element(way, "way", &tags, &refs)?;
        }
        self.writer.write_event(Event::End(BytesEnd::new("osm")))?;
        self.writer.get_mut().write_all(b"\n")?;
        self.writer.get_mut().flush()?;
        Ok(())
    }
}

fn position(value: &Value) -> Option<(f64, f64)> {
    let pair = value.as_array()?;
    let lon = pair.first()?.as_f64()?;
    let lat = pair.get(1)?.as_f64()?;
    Some((lon, lat))
}

fn positions(line: &[Value]) -> Option<Vec<(f64, f64)>> {
    line.iter().map(position).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::set_tag;

    fn feature(geometry: &str) -> Feature {
        let line = format!(r#"{{"type":"Feature","geometry":{geometry},"properties":{{}}}}"#);
        Feature::from_line(&line, 1).unwrap()
    }

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        let mut tags = Tags::new();
        for (key, value) in pairs {
            set_tag(&mut tags, key, Some(*value));
        }
        tags
    }

    fn render(features: Vec<(Feature, Tags)>) -> String {
        let mut sink = OsmXmlSink::new(Vec::new()).unwrap();
        for (feature, tags) in features {
            assert!(sink.write(feature, &tags).unwrap());
        }
        sink.finish().unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn point_becomes_tagged_node() {
        let xml = render(vec![(
            feature(r#"{"type":"Point","coordinates":[-121.5,46.25]}"#),
            tags(&[("highway", "trailhead"), ("name", "Eagle & Lake Trailhead")]),
        )]);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"<node id="-1" lat="46.2500000" lon="-121.5000000">"#));
        assert!(xml.contains(r#"<tag k="highway" v="trailhead"/>"#));
        assert!(xml.contains(r#"v="Eagle &amp; Lake Trailhead""#));
        assert!(xml.trim_end().ends_with("</osm>"));
    }

    #[test]
    fn lines_share_nodes_and_follow_all_nodes() {
        let xml = render(vec![
            (
                feature(r#"{"type":"LineString","coordinates":[[0.0,0.0],[1.0,0.0]]}"#),
                tags(&[("highway", "track"), ("ref", "FR 0912")]),
            ),
            (
                feature(r#"{"type":"MultiLineString","coordinates":[[[1.0,0.0],[2.0,0.0]]]}"#),
                tags(&[("highway", "path")]),
            ),
        ]);

        assert_eq!(xml.matches("<node ").count(), 3);
        assert_eq!(xml.matches("<way ").count(), 2);
        assert_eq!(xml.matches(r#"<nd ref="-2"/>"#).count(), 2);
        let last_node = xml.rfind("<node ").unwrap();
        let first_way = xml.find("<way ").unwrap();
        assert!(last_node < first_way);
        assert!(xml.contains(r#"<way id="-4">"#));
    }

    #[test]
    fn unsupported_geometry_is_skipped() {
        let mut sink = OsmXmlSink::new(Vec::new()).unwrap();
        let tags = tags(&[("highway", "track")]);
        let polygon = feature(r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#);
        assert!(!sink.write(polygon, &tags).unwrap());
        assert!(!sink
            .write(feature(r#"{"type":"LineString","coordinates":[[0.0,0.0]]}"#), &tags)
            .unwrap());
        assert!(!sink.write(feature("null"), &tags).unwrap());
        sink.finish().unwrap();

        let xml = String::from_utf8(sink.into_inner()).unwrap();
        assert!(!xml.contains("<node "));
        assert!(!xml.contains("<way "));
    }
}
