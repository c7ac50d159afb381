pub mod geojson;
pub mod osm_xml;

use clap::ValueEnum;
use osmpbfreader::Tags;
use serde::Deserialize;

use crate::error::Result;
use crate::feature::Feature;

pub use geojson::GeoJsonSink;
pub use osm_xml::OsmXmlSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Newline-delimited GeoJSON features.
    #[default]
    Geojson,
    /// An OSM XML document for map editors.
    Osm,
}

/// Destination for converted records.
pub trait Sink {
    /// Returns `false` when the feature had nothing the sink could write.
    fn write(&mut self, feature: Feature, tags: &Tags) -> Result<bool>;

    fn finish(&mut self) -> Result<()>;
}
