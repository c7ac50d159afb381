use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::ErrorPolicy;
use crate::datasets::{Dataset, MapOptions};
use crate::error::{Error, Result};
use crate::output::Format;

/// Convert USFS roads, trails and recreation areas into OSM tags.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Which USFS dataset the input comes from.
    #[arg(short, long, value_enum)]
    pub dataset: Option<Dataset>,

    /// Newline-delimited GeoJSON features. Reads stdin when omitted.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output path. Writes stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// What to do with records that fail to parse or lack required fields.
    #[arg(long, value_enum)]
    pub on_error: Option<ErrorPolicy>,

    /// Also write a CSV of raw and normalized names.
    #[arg(long)]
    pub names_report: Option<PathBuf>,

    /// Never emit motor_vehicle on roads.
    #[arg(long)]
    pub legacy_motor_vehicle: bool,

    /// TOML file with the same options. Flags given here win.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub dataset: Option<Dataset>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<Format>,
    pub on_error: Option<ErrorPolicy>,
    pub names_report: Option<PathBuf>,
    pub legacy_motor_vehicle: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| {
            Error::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        Ok(toml::from_str(&content)?)
    }
}

/// Resolved options for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dataset: Dataset,
    pub format: Format,
    pub on_error: ErrorPolicy,
    pub options: MapOptions,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub names_report: Option<PathBuf>,
}

impl Settings {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            format: Format::default(),
            on_error: ErrorPolicy::default(),
            options: MapOptions::default(),
            input: None,
            output: None,
            names_report: None,
        }
    }

    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let dataset = cli.dataset.or(file.dataset).ok_or_else(|| {
            Error::Config("no dataset given, pass --dataset or set it in the config file".into())
        })?;
        Ok(Self {
            dataset,
            format: cli.format.or(file.format).unwrap_or_default(),
            on_error: cli.on_error.or(file.on_error).unwrap_or_default(),
            options: MapOptions {
                legacy_motor_vehicle: cli.legacy_motor_vehicle
                    || file.legacy_motor_vehicle.unwrap_or(false),
            },
            input: cli.input.clone().or(file.input),
            output: cli.output.clone().or(file.output),
            names_report: cli.names_report.clone().or(file.names_report),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("usfs.toml");
        fs::write(
            &path,
            r#"
dataset = "trails"
format = "osm"
on_error = "skip"
output = "trails.osm"
legacy_motor_vehicle = true
"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "usfs_osm_tags",
            "--config",
            path.to_str().unwrap(),
            "--dataset",
            "roads",
            "--output",
            "roads.osm",
        ]);
        let settings = Settings::load(&cli).unwrap();

        assert_eq!(settings.dataset, Dataset::Roads);
        assert_eq!(settings.format, Format::Osm);
        assert_eq!(settings.on_error, ErrorPolicy::Skip);
        assert_eq!(settings.output, Some(PathBuf::from("roads.osm")));
        assert!(settings.options.legacy_motor_vehicle);
        assert_eq!(settings.input, None);
    }

    #[test]
    fn defaults_apply_without_a_config_file() {
        let cli = Cli::parse_from(["usfs_osm_tags", "-d", "recsites"]);
        let settings = Settings::load(&cli).unwrap();

        assert_eq!(settings.dataset, Dataset::RecAreas);
        assert_eq!(settings.format, Format::Geojson);
        assert_eq!(settings.on_error, ErrorPolicy::Abort);
        assert!(!settings.options.legacy_motor_vehicle);
        assert!(settings.names_report.is_none());
    }

    #[test]
    fn missing_dataset_is_a_config_error() {
        let err = Settings::load(&Cli::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let err = toml::from_str::<FileConfig>("datset = \"roads\"").unwrap_err();
        assert!(err.to_string().contains("datset"));
    }

    #[test]
    fn unreadable_config_file_is_reported() {
        let dir = tempdir().unwrap();
        let cli = Cli {
            config: Some(dir.path().join("missing.toml")),
            ..Cli::default()
        };
        let err = Settings::load(&cli).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}
