//! Real-transaction history import from published CSV exports.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::workflows::screening::domain::{DealRecord, Location};
use parser::DealRow;

#[derive(Debug)]
pub enum DealImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for DealImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealImportError::Io(err) => write!(f, "failed to read deal history export: {}", err),
            DealImportError::Csv(err) => write!(f, "invalid deal history CSV data: {}", err),
        }
    }
}

impl std::error::Error for DealImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DealImportError::Io(err) => Some(err),
            DealImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for DealImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DealImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImportOptions {
    /// Drop transactions for units smaller than this area.
    pub min_area_m2: Option<f64>,
}

pub struct DealHistoryImporter;

impl DealHistoryImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        options: ImportOptions,
    ) -> Result<Vec<DealRecord>, DealImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, options)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        options: ImportOptions,
    ) -> Result<Vec<DealRecord>, DealImportError> {
        let rows = parser::parse_rows(reader)?;
        let total = rows.len();
        let deals: Vec<DealRecord> = rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| accept_row(index, row, &options))
            .collect();

        info!(rows = total, imported = deals.len(), "deal history imported");
        Ok(deals)
    }
}

fn accept_row(index: usize, row: DealRow, options: &ImportOptions) -> Option<DealRecord> {
    let line = index + 2;
    let deal = DealRecord {
        property_name: row.property_name,
        location: Location {
            region: row.region,
            subregion: row.subregion,
            neighborhood: row.neighborhood,
        },
        deal_year: row.deal_year,
        deal_month: row.deal_month,
        deal_price: row.deal_price,
        area_m2: row.area_m2,
        floor: row.floor,
    };

    if let Err(reason) = deal.validate() {
        warn!(line, %reason, "skipping deal row");
        return None;
    }
    if let Some(min_area) = options.min_area_m2 {
        if deal.area_m2 < min_area {
            return None;
        }
    }
    Some(deal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str =
        "region,subregion,neighborhood,property_name,deal_year,deal_month,deal_amount,area_m2,floor\n";

    #[test]
    fn importer_skips_invalid_months_and_nameless_rows() {
        let csv = format!(
            "{HEADER}충청북도,청주시,복대동,청주 푸르지오,2024,5,\"30,000\",84.9,7\n\
충청북도,청주시,복대동,청주 푸르지오,2024,13,\"30,000\",84.9,7\n\
충청북도,청주시,복대동,,2024,4,\"30,000\",84.9,7\n"
        );
        let deals = DealHistoryImporter::from_reader(Cursor::new(csv), ImportOptions::default())
            .expect("import succeeds");

        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].location.region, "충북");
        assert_eq!(deals[0].deal_price, 300_000_000);
        assert_eq!(deals[0].location.neighborhood.as_deref(), Some("복대동"));
    }

    #[test]
    fn importer_applies_minimum_area() {
        let csv = format!(
            "{HEADER}경북,포항시,,포항 자이,2024,1,21000,59.9,3\n\
경북,포항시,,포항 자이,2024,2,15000,49.5,3\n"
        );
        let options = ImportOptions {
            min_area_m2: Some(59.0),
        };
        let deals = DealHistoryImporter::from_reader(Cursor::new(csv), options).expect("import");

        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].area_m2, 59.9);
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = DealHistoryImporter::from_path("./does-not-exist.csv", ImportOptions::default())
            .expect_err("expected io error");

        match error {
            DealImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
