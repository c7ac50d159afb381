//! Tables shared by more than one dataset.

use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Whole-name placeholders that mean "no name".
pub const BAD_NAMES: &[&str] = &[
    "NO NAME",
    "UNNAMED",
    "UN-NAMED",
    "UNKNOWN",
    "LOCAL",
    "MAJOR LOCAL",
    // some roads near Rainier, meaning unknown
    "HUC",
    // Forest Development Road
    "(FDR)",
    // Minimum Road System
    "MRS",
    // to be decommissioned
    "2B DECOMM'D",
];

pub const SPECIAL_CASES: &[(&str, &str)] = &[
    ("ATV", "ATV"),
    ("OHV", "OHV"),
    ("XC", "XC"),
    ("OF", "of"),
    ("THE", "the"),
    ("IN", "in"),
    ("TO", "to"),
];

/// Abbreviations found in trail and recreation-site names. `I.T.` is listed only
/// with its periods so the word "it" is left alone.
pub const TRAIL_ABBREVIATIONS: &[(&str, &str)] = &[
    ("N", "North"),
    ("S", "South"),
    ("SO", "South"),
    ("E", "East"),
    ("W", "West"),
    ("MT", "Mount"),
    ("MTN", "Mountian"),
    ("NTL", "National"),
    ("NATL", "National"),
    ("CG", "Campground"),
    ("CK", "Creek"),
    ("CR", "Creek"),
    ("CRK", "Creek"),
    ("CYN", "Canyon"),
    ("FK", "Fork"),
    ("I.T.", "Interpretive Trail"),
    ("LK", "Lake"),
    ("LKS", "Lakes"),
    ("PK", "Park"),
    ("RD", "Road"),
    ("ST", "Saint"),
    ("TR", "Trail"),
    ("SMT", "Snowmobile Trail"),
    ("HWT", "Hunter Walking Trail"),
    ("NRT", "National Recreation Trail"),
    ("NST", "National Scenic Trail"),
];

pub const LONG_DISTANCE_TRAILS: &[(&str, &str)] = &[
    ("PCT", "Pacific Crest Trail"),
    ("PCNST", "Pacific Crest National Scenic Trail"),
    ("CDT", "Continental Divide Trail"),
    ("GWT", "Great Western Trail"),
    ("INHT", "Iditarod National Historic Trail"),
    ("TRT", "Tahoe Rim Trail"),
    ("FNST", "Florida National Scenic Trail"),
    ("LSHT", "Lone Star Hiking Trail"),
    ("MCCT", "Michigan Cross-Country Cycle Trail"),
    ("MCCCT", "Michigan Cross-Country Cycle Trail"),
];

/// National Forest System trail numbers used in place of a name.
pub const NFST_NUMBER: &str = r"(?i)^NFST-\d+";

pub fn table(
    parts: &[&[(&'static str, &'static str)]],
) -> HashMap<&'static str, &'static str> {
    parts.iter().flat_map(|part| part.iter().copied()).collect()
}

pub fn set(words: &[&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

pub fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|source| Regex::new(source).expect("valid bad-name pattern"))
        .collect()
}

/// Code-table lookup; unknown codes have no value.
pub fn lookup(table: &[(&str, &'static str)], code: Option<&str>) -> Option<&'static str> {
    let code = code?;
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, value)| *value)
}
