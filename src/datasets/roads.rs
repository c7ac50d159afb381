//! National Forest System Roads (`S_USA.RoadCore`).

use once_cell::sync::Lazy;
use osmpbfreader::Tags;

use super::common::{self, BAD_NAMES};
use super::MapOptions;
use crate::error::Result;
use crate::feature::PropertyBag;
use crate::names::{NameRules, SuffixRule, Terminal, WordChars};
use crate::tags::{set_tag, FOREST_SERVICE};

pub const NAME_FIELD: &str = "NAME";
pub const ID_FIELD: &str = "ID";

const CLOSED: &str = "1 - BASIC CUSTODIAL CARE (CLOSED)";

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("N", "North"),
    ("S", "South"),
    ("E", "East"),
    ("W", "West"),
    ("MTN", "Mountian"),
    ("CG", "Campground"),
    ("CR", "Creek"),
    ("FK", "Fork"),
    ("LK", "Lake"),
    ("RD", "Road"),
    ("TS", "Timber Sale"),
    ("T.S.", "Timber Sale"),
    ("FY", "Fiscal Year"),
];

pub static NAME_RULES: Lazy<NameRules> = Lazy::new(|| NameRules {
    abbreviations: common::table(&[ABBREVIATIONS]),
    special_cases: common::table(&[]),
    bad_words: common::set(&["(FDR)", "FDR"]),
    bad_names: common::set(BAD_NAMES),
    bad_name_patterns: Vec::new(),
    word_chars: WordChars::Alphanumeric,
    reject_embedded_id: true,
    reject_route_numbers: true,
    drop_numbered_markers: false,
    terminal: Terminal {
        words: &["Road"],
        default: "Road",
        rule: SuffixRule::EndsWith,
    },
});

const SURFACE_TYPES: &[(&str, &str)] = &[
    ("AC - ASPHALT", "asphalt"),
    ("AGG - CRUSHED AGGREGATE OR GRAVEL", "gravel"),
    ("BST - BITUMINOUS SURFACE TREATMENT", "chipseal"),
    ("CSOIL - COMPACTED SOIL", "compacted"),
    // more like gravel than ground
    ("IMP - IMPROVED NATIVE MATERIAL", "gravel"),
    ("NAT - NATIVE MATERIAL", "ground"),
    ("P - PAVED", "paved"),
    ("PCC - PORTLAND CEMENT CONCRETE", "concrete"),
];

/// Operational maintenance level to OSM smoothness. Level 1 roads are closed for
/// long periods and their condition is unknown, so they have no entry.
const SMOOTHNESS: &[(&str, &str)] = &[
    ("5 - HIGH DEGREE OF USER COMFORT", "good"),
    ("4 - MODERATE DEGREE OF USER COMFORT", "intermediate"),
    ("3 - SUITABLE FOR PASSENGER CARS", "bad"),
    ("2 - HIGH CLEARANCE VEHICLES", "very_bad"),
];

pub fn map(props: &PropertyBag<'_>, options: &MapOptions) -> Result<Tags> {
    let id = props.require_value(ID_FIELD)?;
    let raw_name = props.require(NAME_FIELD)?;
    let jurisdiction = props.require("JURISDICTION")?;

    let mut tags = Tags::new();
    set_tag(&mut tags, "highway", Some(highway(props)));
    set_tag(
        &mut tags,
        "name",
        NAME_RULES.normalize(raw_name.as_deref(), Some(&*id)),
    );
    set_tag(&mut tags, "ref", Some(route_ref(&id)));
    set_tag(
        &mut tags,
        "operator",
        (jurisdiction.as_deref() == Some("FS - FOREST SERVICE")).then_some(FOREST_SERVICE),
    );
    set_tag(
        &mut tags,
        "surface",
        common::lookup(SURFACE_TYPES, props.get("SURFACE_TYPE").as_deref()),
    );
    set_tag(
        &mut tags,
        "smoothness",
        common::lookup(SMOOTHNESS, props.get("OPER_MAINT_LEVEL").as_deref()),
    );
    set_tag(&mut tags, "lanes", lanes(props));
    set_tag(
        &mut tags,
        "disused",
        props
            .is("OBJECTIVE_MAINT_LEVEL", "D - DECOMMISSION")
            .then_some("yes"),
    );
    set_tag(&mut tags, "motor_vehicle", motor_vehicle(props, options));

    Ok(tags)
}

fn highway(props: &PropertyBag<'_>) -> &'static str {
    if props.is("FUNCTIONAL_CLASS", "A - ARTERIAL") {
        "unclassified"
    } else {
        "track"
    }
}

/// `0900000` is route `NF 09`, `0912000` is road `FR 0912` and `0912034` is spur
/// `FR 0912-034`. Anything that is not seven characters is used as-is.
fn route_ref(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() != 7 {
        return format!("FR {id}");
    }
    let route: String = chars[..2].iter().collect();
    let road: String = chars[..4].iter().collect();
    let spur: String = chars[4..].iter().collect();
    if id.ends_with("00000") {
        format!("NF {route}")
    } else if id.ends_with("000") {
        format!("FR {road}")
    } else {
        format!("FR {road}-{spur}")
    }
}

fn lanes(props: &PropertyBag<'_>) -> Option<String> {
    props
        .get("LANES")?
        .chars()
        .next()
        .filter(|c| c.is_numeric())
        .map(String::from)
}

/// Closed roads and roads not open to all users get `motor_vehicle=no`.
fn motor_vehicle(props: &PropertyBag<'_>, options: &MapOptions) -> Option<&'static str> {
    if options.legacy_motor_vehicle {
        return None;
    }
    let restricted = !props.is("OPENFORUSETO", "ALL") || props.is("OPER_MAINT_LEVEL", CLOSED);
    restricted.then_some("no")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::tag;
    use rstest::rstest;
    use serde_json::{json, Value};

    fn road(overrides: Value) -> Value {
        let mut props = json!({
            "ID": "0912034",
            "NAME": "Smith CR Rd",
            "JURISDICTION": "FS - FOREST SERVICE",
            "FUNCTIONAL_CLASS": "L - LOCAL",
            "SURFACE_TYPE": "AGG - CRUSHED AGGREGATE OR GRAVEL",
            "OPER_MAINT_LEVEL": "2 - HIGH CLEARANCE VEHICLES",
            "OBJECTIVE_MAINT_LEVEL": "2 - HIGH CLEARANCE VEHICLES",
            "OPENFORUSETO": "ALL",
            "LANES": "1 LANE",
        });
        for (key, value) in overrides.as_object().unwrap() {
            props[key] = value.clone();
        }
        props
    }

    fn map_road(props: &Value) -> Tags {
        map(&PropertyBag::new(props.as_object()), &MapOptions::default()).unwrap()
    }

    #[test]
    fn typical_road() {
        let tags = map_road(&road(json!({})));
        assert_eq!(tag(&tags, "highway"), Some("track"));
        assert_eq!(tag(&tags, "name"), Some("Smith Creek Road"));
        assert_eq!(tag(&tags, "ref"), Some("FR 0912-034"));
        assert_eq!(tag(&tags, "operator"), Some("US Forest Service"));
        assert_eq!(tag(&tags, "surface"), Some("gravel"));
        assert_eq!(tag(&tags, "smoothness"), Some("very_bad"));
        assert_eq!(tag(&tags, "lanes"), Some("1"));
        assert_eq!(tag(&tags, "disused"), None);
        assert_eq!(tag(&tags, "motor_vehicle"), None);
    }

    #[rstest]
    #[case("0900000", "NF 09")]
    #[case("0912000", "FR 0912")]
    #[case("0912034", "FR 0912-034")]
    #[case("0912345", "FR 0912-345")]
    #[case("12", "FR 12")]
    #[case("09120001", "FR 09120001")]
    fn refs_follow_id_layout(#[case] id: &str, #[case] expected: &str) {
        assert_eq!(route_ref(id), expected);
    }

    #[test]
    fn numeric_ids_are_read_as_text() {
        let tags = map_road(&road(json!({"ID": 912000})));
        assert_eq!(tag(&tags, "ref"), Some("FR 912000"));
    }

    #[test]
    fn closed_roads_have_no_smoothness_and_no_motor_vehicles() {
        let tags = map_road(&road(json!({"OPER_MAINT_LEVEL": CLOSED})));
        assert_eq!(tag(&tags, "smoothness"), None);
        assert_eq!(tag(&tags, "motor_vehicle"), Some("no"));
    }

    #[test]
    fn restricted_use_blocks_motor_vehicles() {
        let tags = map_road(&road(json!({"OPENFORUSETO": "ADMIN"})));
        assert_eq!(tag(&tags, "motor_vehicle"), Some("no"));

        let tags = map_road(&road(json!({"OPENFORUSETO": null})));
        assert_eq!(tag(&tags, "motor_vehicle"), Some("no"));
    }

    #[test]
    fn legacy_mode_never_emits_motor_vehicle() {
        let props = road(json!({"OPER_MAINT_LEVEL": CLOSED, "OPENFORUSETO": "ADMIN"}));
        let options = MapOptions {
            legacy_motor_vehicle: true,
        };
        let tags = map(&PropertyBag::new(props.as_object()), &options).unwrap();
        assert_eq!(tag(&tags, "motor_vehicle"), None);
    }

    #[test]
    fn arterial_decommissioned_paved_road() {
        let tags = map_road(&road(json!({
            "FUNCTIONAL_CLASS": "A - ARTERIAL",
            "SURFACE_TYPE": "P - PAVED",
            "OPER_MAINT_LEVEL": "5 - HIGH DEGREE OF USER COMFORT",
            "OBJECTIVE_MAINT_LEVEL": "D - DECOMMISSION",
            "LANES": "DOUBLE",
            "JURISDICTION": "C - COUNTY",
        })));
        assert_eq!(tag(&tags, "highway"), Some("unclassified"));
        assert_eq!(tag(&tags, "surface"), Some("paved"));
        assert_eq!(tag(&tags, "smoothness"), Some("good"));
        assert_eq!(tag(&tags, "disused"), Some("yes"));
        assert_eq!(tag(&tags, "lanes"), None);
        assert_eq!(tag(&tags, "operator"), None);
    }

    #[test]
    fn unknown_codes_and_bad_names_leave_tags_out() {
        let tags = map_road(&road(json!({
            "SURFACE_TYPE": "X - SOMETHING NEW",
            "NAME": "UNNAMED",
            "LANES": null,
        })));
        assert_eq!(tag(&tags, "surface"), None);
        assert_eq!(tag(&tags, "name"), None);
        assert_eq!(tag(&tags, "lanes"), None);
        assert_eq!(tag(&tags, "highway"), Some("track"));
    }

    #[test]
    fn names_embedding_the_id_are_dropped() {
        let tags = map_road(&road(json!({"NAME": "ROAD 0912034"})));
        assert_eq!(tag(&tags, "name"), None);
    }

    #[test]
    fn missing_required_fields_fail() {
        let props = json!({"NAME": "Smith"});
        let err = map(&PropertyBag::new(props.as_object()), &MapOptions::default()).unwrap_err();
        assert!(err.to_string().contains("ID"));

        let props = json!({"ID": "0912034", "NAME": null});
        assert!(map(&PropertyBag::new(props.as_object()), &MapOptions::default()).is_err());
    }
}
