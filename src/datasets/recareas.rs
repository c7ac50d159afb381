//! Recreation-area points. Only trailheads are mapped so far.

use once_cell::sync::Lazy;
use osmpbfreader::Tags;
use tracing::debug;

use super::common::{self, BAD_NAMES, LONG_DISTANCE_TRAILS, NFST_NUMBER, SPECIAL_CASES, TRAIL_ABBREVIATIONS};
use crate::error::Result;
use crate::feature::PropertyBag;
use crate::names::{NameRules, SuffixRule, Terminal, WordChars};
use crate::tags::{set_tag, FOREST_SERVICE};

pub const NAME_FIELD: &str = "RECAREANAME";

const TRAILHEAD: &[(&str, &str)] = &[("TH", "Trailhead")];

pub static NAME_RULES: Lazy<NameRules> = Lazy::new(|| NameRules {
    abbreviations: common::table(&[TRAIL_ABBREVIATIONS, TRAILHEAD, LONG_DISTANCE_TRAILS]),
    special_cases: common::table(&[SPECIAL_CASES]),
    bad_words: common::set(&["FDR"]),
    bad_names: common::set(BAD_NAMES),
    bad_name_patterns: common::patterns(&[NFST_NUMBER]),
    word_chars: WordChars::Letters,
    reject_embedded_id: false,
    reject_route_numbers: false,
    drop_numbered_markers: true,
    terminal: Terminal {
        words: &["Trailhead"],
        default: "Trailhead",
        rule: SuffixRule::Contains,
    },
});

/// Recreation categories decoded from `MARKERACTIVITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Trailhead,
    Viewpoint,
    CampSite,
    PicnicSite,
    VisitorCenter,
    Unsupported,
}

impl Activity {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("Trailhead") => Activity::Trailhead,
            Some("Viewing Scenery") => Activity::Viewpoint,
            Some("Campground Camping" | "Group Camping" | "Dispersed Camping") => {
                Activity::CampSite
            }
            Some("Picnicking") => Activity::PicnicSite,
            Some("Visitor Centers") => Activity::VisitorCenter,
            _ => Activity::Unsupported,
        }
    }
}

/// Tags for one recreation point, or `None` when its category is not mapped.
pub fn map(props: &PropertyBag<'_>) -> Result<Option<Tags>> {
    let activity = Activity::from_code(props.get("MARKERACTIVITY").as_deref());
    let mut tags = match activity {
        Activity::Trailhead => trailhead(props)?,
        // TODO: tourism=viewpoint, tourism=camp_site, tourism=picnic_site and
        // tourism=information for visitor centres once their names are reviewed.
        Activity::Viewpoint
        | Activity::CampSite
        | Activity::PicnicSite
        | Activity::VisitorCenter => {
            debug!(?activity, "recreation category not mapped yet");
            return Ok(None);
        }
        Activity::Unsupported => return Ok(None),
    };

    if tags.is_empty() {
        return Ok(None);
    }
    set_tag(&mut tags, "operator", Some(FOREST_SERVICE));
    Ok(Some(tags))
}

fn trailhead(props: &PropertyBag<'_>) -> Result<Tags> {
    let raw_name = props.require(NAME_FIELD)?;

    let mut tags = Tags::new();
    set_tag(&mut tags, "highway", Some("trailhead"));
    set_tag(&mut tags, "name", NAME_RULES.normalize(raw_name.as_deref(), None));
    set_tag(&mut tags, "website", props.get("RECAREAURL"));
    Ok(tags)
}
