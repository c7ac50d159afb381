//! National Forest System Trails (`S_USA.TrailNFS`).

use once_cell::sync::Lazy;
use osmpbfreader::Tags;

use super::common::{self, BAD_NAMES, LONG_DISTANCE_TRAILS, NFST_NUMBER, SPECIAL_CASES, TRAIL_ABBREVIATIONS};
use crate::error::Result;
use crate::feature::PropertyBag;
use crate::names::{NameRules, SuffixRule, Terminal, WordChars};
use crate::tags::{set_tag, FOREST_SERVICE};

pub const NAME_FIELD: &str = "TRAIL_NAME";
pub const ID_FIELD: &str = "TRAIL_NO";

pub static NAME_RULES: Lazy<NameRules> = Lazy::new(|| NameRules {
    abbreviations: common::table(&[TRAIL_ABBREVIATIONS, LONG_DISTANCE_TRAILS]),
    special_cases: common::table(&[SPECIAL_CASES]),
    bad_words: common::set(&["FDR"]),
    bad_names: common::set(BAD_NAMES),
    bad_name_patterns: common::patterns(&[NFST_NUMBER]),
    word_chars: WordChars::Alphanumeric,
    reject_embedded_id: true,
    reject_route_numbers: false,
    drop_numbered_markers: false,
    terminal: Terminal {
        words: &["Road", "Trail", "Connector", "Tie", "Loop", "Spur"],
        default: "Trail",
        rule: SuffixRule::EndsWith,
    },
});

// ALLOWED_TERRA_USE digits that need a vehicle-width track.
const ATV: u32 = 5;
const FOUR_WHEEL_DRIVE_GT_50: u32 = 6;

const FULL_YEAR: &str = "01/01-12/31";

/// OSM access key and the column prefix carrying its season fields.
const ACCESS_MODES: &[(&str, &str)] = &[
    ("foot", "HIKER_PEDESTRIAN"),
    ("bicycle", "BICYCLE"),
    ("horse", "PACK_SADDLE"),
];

pub fn map(props: &PropertyBag<'_>) -> Result<Tags> {
    let number = props.require_value(ID_FIELD)?;
    let raw_name = props.require(NAME_FIELD)?;

    let mut tags = Tags::new();
    set_tag(&mut tags, "highway", highway(props));
    set_tag(
        &mut tags,
        "name",
        NAME_RULES.normalize(raw_name.as_deref(), Some(&*number)),
    );
    set_tag(&mut tags, "ref", Some(trail_ref(&number)));
    set_tag(&mut tags, "operator", Some(FOREST_SERVICE));
    for (key, prefix) in ACCESS_MODES {
        set_tag(&mut tags, key, access(props, prefix));
    }

    Ok(tags)
}

fn allowed_terra_use(props: &PropertyBag<'_>) -> Option<Vec<u32>> {
    let value = props.get("ALLOWED_TERRA_USE")?;
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(value.chars().filter_map(|c| c.to_digit(10)).collect())
}

fn highway(props: &PropertyBag<'_>) -> Option<&'static str> {
    if !props.is("TRAIL_TYPE", "TERRA") {
        return None;
    }
    let vehicles = allowed_terra_use(props)
        .map(|uses| uses.contains(&ATV) || uses.contains(&FOUR_WHEEL_DRIVE_GT_50))
        .unwrap_or(false);
    Some(if vehicles { "track" } else { "path" })
}

fn trail_ref(number: &str) -> String {
    let number = number.strip_prefix('T').unwrap_or(number);
    let number = number.strip_prefix("O-").unwrap_or(number);
    number.to_string()
}

/// Year-round status only; partial seasons make no claim.
fn access(props: &PropertyBag<'_>, prefix: &str) -> Option<&'static str> {
    let all_year = |suffix: &str| props.is(&format!("{prefix}_{suffix}"), FULL_YEAR);
    if all_year("MANAGED") {
        Some("designated")
    } else if all_year("ACCPT_DISC") {
        Some("yes")
    } else if all_year("RESTRICTED") {
        Some("no")
    } else {
        None
    }
}
