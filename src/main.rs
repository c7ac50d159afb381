mod config;
mod convert;
mod datasets;
mod error;
mod feature;
mod logging;
mod names;
mod output;
mod report;
mod tags;

use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::config::{Cli, Settings};
use crate::convert::{convert, Stats};
use crate::error::Result;
use crate::output::{Format, GeoJsonSink, OsmXmlSink, Sink};
use crate::report::NamesReport;

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    })
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn execute(settings: &Settings) -> Result<Stats> {
    let input = open_input(settings.input.as_deref())?;
    let out = open_output(settings.output.as_deref())?;
    let mut sink: Box<dyn Sink> = match settings.format {
        Format::Geojson => Box::new(GeoJsonSink::new(out)),
        Format::Osm => Box::new(OsmXmlSink::new(out)?),
    };
    let mut report = settings
        .names_report
        .as_deref()
        .map(NamesReport::create)
        .transpose()?;

    info!(dataset = settings.dataset.label(), format = ?settings.format, "converting");
    let stats = convert(input, settings, sink.as_mut(), report.as_mut())?;
    sink.finish()?;
    if let Some(report) = report.as_mut() {
        report.finish()?;
    }

    info!(
        read = stats.read,
        emitted = stats.emitted,
        dropped = stats.dropped,
        skipped = stats.skipped,
        "done"
    );
    Ok(stats)
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let settings = Settings::load(&cli)?;
    execute(&settings)?;
    Ok(())
}
