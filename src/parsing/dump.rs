use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::catalog::store::Catalog;
use crate::core::record::{BeerRecord, BreweryRecord};
use crate::core::types::RecordId;
use crate::utils::validation::check_record_limit;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("{0}")]
    TooManyRecords(String),
}

/// Parse a catalog dump file with columns: id, name, brewery_id, brewery
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_dump_file(path: &Path) -> Result<Catalog, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_dump_reader(file)
}

/// Parse catalog dump text with columns: id, name, brewery_id, brewery
///
/// # Errors
///
/// See [`parse_dump_reader`].
pub fn parse_dump_text(text: &str) -> Result<Catalog, ParseError> {
    parse_dump_reader(text.as_bytes())
}

/// Parse a catalog dump.
///
/// Each row lists one beer under one brewery. Rows are grouped into breweries
/// in first-seen order; a beer listed under several breweries is added to
/// each. A row with an empty beer id and name registers a brewery without a
/// beer. Repeated (brewery, beer) rows are ignored. An optional header row
/// (first field `id`) and `#` comment lines are skipped.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a row has fewer than 4 fields or
/// lacks a brewery id, `ParseError::Csv` on malformed CSV, or
/// `ParseError::TooManyRecords` if the limit is exceeded.
pub fn parse_dump_reader<R: Read>(reader: R) -> Result<Catalog, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut breweries: Vec<BreweryRecord> = Vec::new();
    let mut brewery_positions: HashMap<RecordId, usize> = HashMap::new();
    let mut rows = 0usize;
    let mut first_data_line = true;

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // Line numbers in errors are 1-based for user friendliness
        let line_num = record.position().map_or(idx + 1, |p| p.line() as usize);

        if first_data_line {
            first_data_line = false;
            if record.get(0).is_some_and(|f| f.eq_ignore_ascii_case("id")) {
                continue;
            }
        }

        if record.len() < 4 {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than 4 fields"
            )));
        }

        if let Some(msg) = check_record_limit(rows) {
            return Err(ParseError::TooManyRecords(format!("Line {line_num}: {msg}")));
        }
        rows += 1;

        let (beer_id, beer_name, brewery_id, brewery_name) =
            (&record[0], &record[1], &record[2], &record[3]);

        if brewery_id.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has no brewery id"
            )));
        }
        if beer_id.is_empty() && !beer_name.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has a beer name but no beer id"
            )));
        }

        let brewery_id = RecordId::new(brewery_id);
        let position = *brewery_positions
            .entry(brewery_id.clone())
            .or_insert_with(|| {
                breweries.push(BreweryRecord::new(brewery_id.as_str(), brewery_name));
                breweries.len() - 1
            });

        if beer_id.is_empty() {
            continue;
        }

        let brewery = &mut breweries[position];
        if !brewery.has_beer(&RecordId::new(beer_id)) {
            brewery.add_beer(BeerRecord::new(beer_id, beer_name));
        }
    }

    let catalog = Catalog::from_breweries(breweries);
    debug!(
        rows,
        breweries = catalog.len(),
        beers = catalog.beer_count(),
        "Parsed catalog dump"
    );

    Ok(catalog)
}
