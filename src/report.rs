use csv::Writer;
use osmpbfreader::Tags;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::datasets::Dataset;
use crate::error::Result;
use crate::feature::PropertyBag;
use crate::tags::tag;

/// CSV audit of raw names next to what the normalizer made of them.
pub struct NamesReport<W: Write> {
    writer: Writer<W>,
}

impl NamesReport<File> {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::from_writer(Writer::from_path(path)?)
    }
}

impl<W: Write> NamesReport<W> {
    pub fn from_writer(mut writer: Writer<W>) -> Result<Self> {
        writer.write_record(["dataset", "id", "raw_name", "name"])?;
        Ok(Self { writer })
    }

    pub fn record(&mut self, dataset: Dataset, props: &PropertyBag<'_>, tags: &Tags) -> Result<()> {
        let id = dataset
            .id_field()
            .and_then(|field| props.get(field))
            .unwrap_or_default();
        let raw_name = props.get(dataset.name_field()).unwrap_or_default();
        let name = tag(tags, "name").unwrap_or_default();
        self.writer
            .write_record([dataset.label(), &*id, &*raw_name, name])?;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::set_tag;
    use csv::ReaderBuilder;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn report_lists_raw_and_normalized_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit").join("names.csv");
        let mut report = NamesReport::create(&path).unwrap();

        let props = json!({"ID": "0912034", "NAME": "Smith CR Rd"});
        let mut tags = Tags::new();
        set_tag(&mut tags, "name", Some("Smith Creek Road"));
        report
            .record(Dataset::Roads, &PropertyBag::new(props.as_object()), &tags)
            .unwrap();

        let props = json!({"RECAREANAME": null});
        report
            .record(Dataset::RecAreas, &PropertyBag::new(props.as_object()), &Tags::new())
            .unwrap();
        report.finish().unwrap();

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|row| row.unwrap().iter().map(|value| value.to_string()).collect())
            .collect();

        assert_eq!(rows[0], vec!["dataset", "id", "raw_name", "name"]);
        assert_eq!(rows[1], vec!["roads", "0912034", "Smith CR Rd", "Smith Creek Road"]);
        assert_eq!(rows[2], vec!["recareas", "", "", ""]);
    }
}
