use clap::ValueEnum;
use osmpbfreader::Tags;
use serde::Deserialize;
use std::io::{BufRead, Write};
use tracing::{debug, error, warn};

use crate::config::Settings;
use crate::error::Result;
use crate::feature::{Feature, PropertyBag};
use crate::output::Sink;
use crate::report::NamesReport;

/// What to do with a record that cannot be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first malformed record.
    #[default]
    Abort,
    /// Log it and carry on with the next record.
    Skip,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub read: usize,
    pub emitted: usize,
    pub dropped: usize,
    pub skipped: usize,
}

/// Stream newline-delimited features from `input` into `sink`, in input order.
pub fn convert<R: BufRead, A: Write>(
    input: R,
    settings: &Settings,
    sink: &mut dyn Sink,
    mut report: Option<&mut NamesReport<A>>,
) -> Result<Stats> {
    let mut stats = Stats::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;
        stats.read += 1;

        // Only bad records fall under the policy; output failures always stop the run.
        let (feature, tags) = match map_line(&line, line_number, settings) {
            Ok(Some(mapped)) => mapped,
            Ok(None) => {
                debug!(line = line_number, "no tags, dropping record");
                stats.dropped += 1;
                continue;
            }
            Err(err) => {
                error!(line = line_number, %err, "malformed record");
                match settings.on_error {
                    ErrorPolicy::Abort => return Err(err),
                    ErrorPolicy::Skip => {
                        warn!(line = line_number, "skipping record");
                        stats.skipped += 1;
                        continue;
                    }
                }
            }
        };

        let raw = report
            .is_some()
            .then(|| feature.properties.clone())
            .flatten();
        if !sink.write(feature, &tags)? {
            debug!(line = line_number, "nothing writable in geometry, dropping record");
            stats.dropped += 1;
            continue;
        }
        if let Some(report) = report.as_deref_mut() {
            report.record(settings.dataset, &PropertyBag::new(raw.as_ref()), &tags)?;
        }
        stats.emitted += 1;
    }

    Ok(stats)
}

/// Parse one line and map its properties. `None` means the dataset has no tags for it.
fn map_line(line: &str, line_number: usize, settings: &Settings) -> Result<Option<(Feature, Tags)>> {
    let feature = Feature::from_line(line, line_number)?;
    let tags = settings
        .dataset
        .map(&feature.properties(), &settings.options)?;
    Ok(tags.map(|tags| (feature, tags)))
}
