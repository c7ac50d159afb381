//! Per-dataset attribute mapping.

pub mod common;
pub mod recareas;
pub mod roads;
pub mod trails;

use clap::ValueEnum;
use osmpbfreader::Tags;
use serde::Deserialize;

use crate::error::Result;
use crate::feature::PropertyBag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Roads,
    Trails,
    #[value(name = "recareas", alias = "recsites")]
    #[serde(alias = "recsites")]
    RecAreas,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MapOptions {
    /// Never emit `motor_vehicle`, as the first conversions of these datasets did.
    pub legacy_motor_vehicle: bool,
}

impl Dataset {
    /// Tags for one record. `None` means the record is dropped.
    pub fn map(self, props: &PropertyBag<'_>, options: &MapOptions) -> Result<Option<Tags>> {
        let tags = match self {
            Dataset::Roads => Some(roads::map(props, options)?),
            Dataset::Trails => Some(trails::map(props)?),
            Dataset::RecAreas => recareas::map(props)?,
        };
        Ok(tags.filter(|tags| !tags.is_empty()))
    }

    pub fn name_field(self) -> &'static str {
        match self {
            Dataset::Roads => roads::NAME_FIELD,
            Dataset::Trails => trails::NAME_FIELD,
            Dataset::RecAreas => recareas::NAME_FIELD,
        }
    }

    pub fn id_field(self) -> Option<&'static str> {
        match self {
            Dataset::Roads => Some(roads::ID_FIELD),
            Dataset::Trails => Some(trails::ID_FIELD),
            Dataset::RecAreas => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dataset::Roads => "roads",
            Dataset::Trails => "trails",
            Dataset::RecAreas => "recareas",
        }
    }
}
