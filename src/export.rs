//! Column-oriented export of recorded samples.
//!
//! [`DataTable`] itself is always available so [`crate::Chronometer::export`]
//! keeps one signature; the tabular rendering (comfy-table) and CSV writing
//! live behind the `export` feature which carries those dependencies.

use std::time::Duration;

use serde::Serialize;

/// One label's samples in seconds, padded with `None` to the table's row
/// count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataColumn {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// Recorded samples as one column per label, all columns equally long.
///
/// Row `i` holds each label's `i`-th completed measurement; labels with
/// fewer measurements carry absent cells at the bottom, mirroring how a
/// dataframe pads ragged columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataTable {
    columns: Vec<DataColumn>,
}

impl DataTable {
    pub(crate) fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [Duration])>,
    {
        let mut columns: Vec<DataColumn> = records
            .into_iter()
            .map(|(label, samples)| DataColumn {
                label: label.to_string(),
                values: samples.iter().map(|d| Some(d.as_secs_f64())).collect(),
            })
            .collect();

        let rows = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        for column in &mut columns {
            column.values.resize(rows, None);
        }
        Self { columns }
    }

    pub fn columns(&self) -> &[DataColumn] {
        &self.columns
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.label.as_str())
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// The padded value column for `label`, if present.
    pub fn column(&self, label: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.values.as_slice())
    }
}

#[cfg(feature = "export")]
impl DataTable {
    /// Render a human-readable table, values formatted to `precision`
    /// decimal places and absent cells left blank.
    pub fn render(&self, precision: usize) -> String {
        use comfy_table::presets::UTF8_FULL;
        use comfy_table::Table;

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(self.labels().collect::<Vec<_>>());
        for row in 0..self.num_rows() {
            table.add_row(self.columns.iter().map(|c| match c.values[row] {
                Some(secs) => format!("{secs:.precision$}"),
                None => String::new(),
            }));
        }
        table.to_string()
    }

    /// Write the table as CSV: a header row of labels, then one row per
    /// sample index, absent cells empty. Values keep full precision.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> crate::Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(self.labels())?;
        for row in 0..self.num_rows() {
            csv.write_record(self.columns.iter().map(|c| match c.values[row] {
                Some(secs) => secs.to_string(),
                None => String::new(),
            }))?;
        }
        csv.flush()?;
        Ok(())
    }

    /// [`DataTable::write_csv`] into a string.
    pub fn to_csv_string(&self) -> crate::Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataTable {
        DataTable::from_records([
            (
                "a",
                [Duration::from_secs(1), Duration::from_secs(2)].as_slice(),
            ),
            ("b", [Duration::from_secs(3)].as_slice()),
        ])
    }

    #[test]
    fn pads_short_columns() {
        let table = table();
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column("a").unwrap(), [Some(1.0), Some(2.0)]);
        assert_eq!(table.column("b").unwrap(), [Some(3.0), None]);
        assert_eq!(table.column("c"), None);
    }

    #[test]
    fn empty_table_has_no_rows() {
        let table = DataTable::from_records(std::iter::empty::<(&str, &[Duration])>());
        assert!(table.is_empty());
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn serializes_as_ordered_columns() {
        let json = serde_json::to_string(&table()).unwrap();
        assert_eq!(
            json,
            r#"[{"label":"a","values":[1.0,2.0]},{"label":"b","values":[3.0,null]}]"#
        );
    }

    #[cfg(feature = "export")]
    #[test]
    fn renders_headers_and_values() {
        let rendered = table().render(2);
        assert!(rendered.contains('a'));
        assert!(rendered.contains('b'));
        assert!(rendered.contains("1.00"));
        assert!(rendered.contains("3.00"));
    }

    #[cfg(feature = "export")]
    #[test]
    fn writes_csv_with_blank_padding() {
        let csv = table().to_csv_string().unwrap();
        assert_eq!(csv, "a,b\n1,3\n2,\n");
    }
}
