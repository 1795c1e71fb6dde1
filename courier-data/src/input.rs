//! CSV loading of depot and delivery address lists.
//!
//! Each file has a header row with an `address` (or `Address`) column and an
//! optional `name` (or `Name`) column. Rows without an address are skipped.
//! A missing name becomes `Stop_{n}`, where `n` counts the rows accepted so
//! far including this one.

use camino::{Utf8Path, Utf8PathBuf};
use courier_core::AddressRecord;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading an address list.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be opened.
    #[error("failed to open address list {path}")]
    Open {
        /// File that was requested.
        path: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: std::io::Error,
    },
    /// A row could not be decoded.
    #[error("failed to read address list {path}")]
    Csv {
        /// File being read.
        path: Utf8PathBuf,
        /// Source error from the CSV reader.
        #[source]
        source: csv::Error,
    },
    /// No row carried an address.
    #[error("no addresses found in {path}; add at least one row")]
    EmptyInput {
        /// File that was read.
        path: Utf8PathBuf,
    },
}

#[derive(Debug, Deserialize)]
struct AddressRow {
    #[serde(default, alias = "Name")]
    name: Option<String>,
    #[serde(default, alias = "Address")]
    address: Option<String>,
}

/// Load the address list at `path`.
///
/// # Errors
///
/// Returns [`InputError::Open`] when the file cannot be opened,
/// [`InputError::Csv`] when a row cannot be decoded and
/// [`InputError::EmptyInput`] when no row has an address.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use courier_data::load_address_records;
///
/// let depots = load_address_records(Utf8Path::new("data/input/depots.csv"))?;
/// assert!(!depots.is_empty());
/// # Ok::<(), courier_data::InputError>(())
/// ```
pub fn load_address_records(path: &Utf8Path) -> Result<Vec<AddressRecord>, InputError> {
    let file = courier_fs::open_utf8_file(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_address_records(file).map_err(|source| InputError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    if records.is_empty() {
        return Err(InputError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    debug!("loaded {} addresses from {path}", records.len());
    Ok(records)
}

/// Decode address rows from any CSV source.
///
/// # Errors
///
/// Returns the reader's error when a row cannot be decoded.
pub fn read_address_records(reader: impl std::io::Read) -> Result<Vec<AddressRecord>, csv::Error> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut records = Vec::new();
    for row in csv.deserialize::<AddressRow>() {
        let AddressRow { name, address } = row?;
        let Some(address) = address.filter(|value| !value.is_empty()) else {
            continue;
        };
        let name = name
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| format!("Stop_{}", records.len() + 1));
        records.push(AddressRecord::new(name, address));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn names_and_addresses(records: &[AddressRecord]) -> Vec<(&str, &str)> {
        records
            .iter()
            .map(|record| (record.name.as_str(), record.address.as_str()))
            .collect()
    }

    #[rstest]
    #[case("name,address\nHQ,1 Dock Road\n")]
    #[case("Name,Address\nHQ,1 Dock Road\n")]
    #[case("Address,Name\n1 Dock Road,HQ\n")]
    fn accepts_either_header_case(#[case] csv: &str) {
        let records = read_address_records(csv.as_bytes()).expect("decode");
        assert_eq!(names_and_addresses(&records), vec![("HQ", "1 Dock Road")]);
    }

    #[rstest]
    fn missing_names_count_accepted_rows() {
        let csv = "name,address\n,1 Dock Road\nNamed,2 Dock Road\n,\n,3 Dock Road\n";
        let records = read_address_records(csv.as_bytes()).expect("decode");
        assert_eq!(
            names_and_addresses(&records),
            vec![
                ("Stop_1", "1 Dock Road"),
                ("Named", "2 Dock Road"),
                ("Stop_3", "3 Dock Road"),
            ]
        );
    }

    #[rstest]
    fn address_only_files_are_accepted() {
        let csv = "address\n\"12 High Street, Leeds\"\n";
        let records = read_address_records(csv.as_bytes()).expect("decode");
        assert_eq!(
            names_and_addresses(&records),
            vec![("Stop_1", "12 High Street, Leeds")]
        );
    }

    #[rstest]
    fn file_without_addresses_is_empty_input() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("deliveries.csv")).expect("utf-8");
        courier_fs::write_atomic(&path, b"name,address\nA,\n").expect("seed");

        let err = load_address_records(&path).expect_err("no addresses");
        assert!(matches!(err, InputError::EmptyInput { .. }));
    }

    #[rstest]
    fn missing_file_reports_path() {
        let err = load_address_records(Utf8Path::new("/definitely/not/here.csv"))
            .expect_err("missing file");
        match err {
            InputError::Open { path, .. } => assert_eq!(path, "/definitely/not/here.csv"),
            other => panic!("expected open error, got {other:?}"),
        }
    }
}
