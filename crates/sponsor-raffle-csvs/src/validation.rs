/*!
# CSV Validation & I/O

This module reads and writes every raffle CSV file and validates headers so that
a reordered or mislabelled spreadsheet fails loudly instead of drawing against
the wrong columns.
*/

use crate::{
    errors::{CsvError, CsvResult},
    schemas::{
        parse_race_label, parse_sticker_flag, AwardRow, CarRow, HistoryRow, ResultRow,
        SponsorRow, WinnerCell, CARS_CSV_FIXED_HEADERS, HISTORY_CSV_FIXED_HEADERS,
        RESULTS_CAR_COLUMN, RESULTS_CLASS_COLUMN, RESULTS_DRIVER_COLUMN, RESULTS_GAP_COLUMN,
        RESULTS_MIN_COLUMNS, RESULTS_POSITION_COLUMN, SPONSORS_CSV_HEADERS,
    },
};
use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// cars.csv contents together with its sponsor columns, in header order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarsTable {
    pub sponsors: Vec<String>,
    pub rows: Vec<CarRow>,
}

/// winners.csv contents together with its sponsor columns, in header order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryTable {
    pub sponsors: Vec<String>,
    pub rows: Vec<HistoryRow>,
}

// ================================================================================================
// CSV Reading with Validation
// ================================================================================================

/// Read and validate a cars CSV file
pub fn read_cars_csv<P: AsRef<Path>>(path: P) -> CsvResult<CarsTable> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = rdr.headers()?.clone();
    let sponsors = sponsor_columns(&headers, CARS_CSV_FIXED_HEADERS, "cars.csv")?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let car = field(&record, 0).to_string();
        if car.is_empty() {
            continue;
        }

        let stickers = sponsors
            .iter()
            .enumerate()
            .map(|(i, sponsor)| {
                let raw = field(&record, CARS_CSV_FIXED_HEADERS.len() + i);
                (sponsor.clone(), parse_sticker_flag(raw))
            })
            .collect();

        rows.push(CarRow {
            car,
            driver: field(&record, 1).to_string(),
            stickers,
        });
    }

    if rows.is_empty() {
        return Err(CsvError::SchemaValidation(
            "Cars CSV file is empty".to_string(),
        ));
    }

    Ok(CarsTable { sponsors, rows })
}

/// Read one race results export. Title lines and short lines are skipped.
pub fn read_results_csv<P: AsRef<Path>>(path: P) -> CsvResult<Vec<ResultRow>> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.len() < RESULTS_MIN_COLUMNS {
            continue;
        }

        rows.push(ResultRow {
            driver: field(&record, RESULTS_DRIVER_COLUMN).to_string(),
            position: field(&record, RESULTS_POSITION_COLUMN).parse().ok(),
            car: field(&record, RESULTS_CAR_COLUMN).to_string(),
            class: field(&record, RESULTS_CLASS_COLUMN).to_string(),
            gap: field(&record, RESULTS_GAP_COLUMN).to_string(),
        });
    }

    Ok(rows)
}

/// Read and validate a sponsors CSV file
pub fn read_sponsors_csv<P: AsRef<Path>>(path: P) -> CsvResult<Vec<SponsorRow>> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(file);

    // Validate headers
    let headers = rdr.headers()?;
    validate_headers(headers.iter(), SPONSORS_CSV_HEADERS, "sponsors.csv")?;

    // Read and deserialize rows
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: SponsorRow = result?;
        if row.sponsor.is_empty() {
            continue;
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(CsvError::SchemaValidation(
            "Sponsors CSV file is empty".to_string(),
        ));
    }

    Ok(rows)
}

/// Read and validate a winner history CSV file
///
/// Blank rows are dropped. An empty history is valid (first event of a season).
pub fn read_history_csv<P: AsRef<Path>>(path: P) -> CsvResult<HistoryTable> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = rdr.headers()?.clone();
    let sponsors = sponsor_columns(&headers, HISTORY_CSV_FIXED_HEADERS, "winners.csv")?;

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result?;

        // +2: one for the header, one for 1-based line numbers
        let race = parse_race_label(field(&record, 1)).map_err(|e| {
            CsvError::InvalidFormat(format!("winners.csv line {}: {}", line + 2, e))
        })?;

        let winners = sponsors
            .iter()
            .enumerate()
            .filter_map(|(i, sponsor)| {
                WinnerCell::parse(field(&record, HISTORY_CSV_FIXED_HEADERS.len() + i))
                    .map(|cell| (sponsor.clone(), cell))
            })
            .collect();

        let row = HistoryRow {
            event: field(&record, 0).to_string(),
            race,
            winners,
        };

        if !row.is_blank() {
            rows.push(row);
        }
    }

    Ok(HistoryTable { sponsors, rows })
}

// ================================================================================================
// CSV Writing
// ================================================================================================

/// Write cars CSV with one column per sponsor
pub fn write_cars_csv<P: AsRef<Path>>(path: P, table: &CarsTable) -> CsvResult<()> {
    let mut wtr = Writer::from_path(path)?;

    let mut headers: Vec<&str> = CARS_CSV_FIXED_HEADERS.to_vec();
    headers.extend(table.sponsors.iter().map(String::as_str));
    wtr.write_record(&headers)?;

    for row in &table.rows {
        let mut record = vec![row.car.clone(), row.driver.clone()];
        for sponsor in &table.sponsors {
            let has_sticker = row.stickers.get(sponsor).copied().unwrap_or(false);
            record.push(if has_sticker { "x" } else { "" }.to_string());
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write a race results export in RaceHero column order (title line first)
pub fn write_results_csv<P: AsRef<Path>>(path: P, title: &str, rows: &[ResultRow]) -> CsvResult<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    wtr.write_record([title])?;

    for row in rows {
        let position = row.position.map(|p| p.to_string()).unwrap_or_default();
        wtr.write_record([
            row.driver.as_str(),
            position.as_str(),
            "",
            row.car.as_str(),
            row.class.as_str(),
            row.gap.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write sponsors CSV with proper headers
pub fn write_sponsors_csv<P: AsRef<Path>>(path: P, rows: &[SponsorRow]) -> CsvResult<()> {
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    // Write data rows (csv crate automatically writes headers)
    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write winner history rows with one column per sponsor
pub fn write_history_csv<P: AsRef<Path>>(path: P, table: &HistoryTable) -> CsvResult<()> {
    let mut wtr = Writer::from_path(path)?;

    let mut headers: Vec<&str> = HISTORY_CSV_FIXED_HEADERS.to_vec();
    headers.extend(table.sponsors.iter().map(String::as_str));
    wtr.write_record(&headers)?;

    for row in &table.rows {
        let race = row.race.map(|r| format!("Race {}", r)).unwrap_or_default();
        let mut record = vec![row.event.clone(), race];
        for sponsor in &table.sponsors {
            record.push(
                row.winners
                    .get(sponsor)
                    .map(WinnerCell::to_string)
                    .unwrap_or_default(),
            );
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write awards CSV with proper headers
pub fn write_awards_csv<P: AsRef<Path>>(path: P, rows: &[AwardRow]) -> CsvResult<()> {
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

// ================================================================================================
// Header Validation
// ================================================================================================

fn validate_headers<'a, I>(actual: I, expected: &[&str], file_type: &str) -> CsvResult<()>
where
    I: Iterator<Item = &'a str>,
{
    let actual_headers: Vec<&str> = actual.collect();

    if actual_headers.len() != expected.len() {
        return Err(CsvError::SchemaValidation(format!(
            "{}: expected {} headers, found {}",
            file_type,
            expected.len(),
            actual_headers.len()
        )));
    }

    for (i, (actual, expected)) in actual_headers.iter().zip(expected.iter()).enumerate() {
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(CsvError::SchemaValidation(format!(
                "{}: header {} should be '{}', found '{}'",
                file_type,
                i + 1,
                expected,
                actual
            )));
        }
    }

    Ok(())
}

/// Validate the fixed leading headers and return the sponsor columns after them
fn sponsor_columns(headers: &StringRecord, fixed: &[&str], file_type: &str) -> CsvResult<Vec<String>> {
    for (i, expected) in fixed.iter().enumerate() {
        match headers.get(i) {
            None => {
                return Err(CsvError::MissingHeader(format!("{}: {}", file_type, expected)));
            }
            Some(actual) if !actual.eq_ignore_ascii_case(expected) => {
                return Err(CsvError::SchemaValidation(format!(
                    "{}: header {} should be '{}', found '{}'",
                    file_type,
                    i + 1,
                    expected,
                    actual
                )));
            }
            Some(_) => {}
        }
    }

    let sponsors: Vec<String> = headers
        .iter()
        .skip(fixed.len())
        .map(str::to_string)
        .collect();

    if let Some(blank) = sponsors.iter().position(String::is_empty) {
        return Err(CsvError::SchemaValidation(format!(
            "{}: sponsor column {} has no name",
            file_type,
            fixed.len() + blank + 1
        )));
    }

    let mut seen = BTreeMap::new();
    for sponsor in &sponsors {
        if seen.insert(sponsor.as_str(), ()).is_some() {
            return Err(CsvError::SchemaValidation(format!(
                "{}: sponsor column '{}' appears twice",
                file_type, sponsor
            )));
        }
    }

    Ok(sponsors)
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_cars_csv_with_sponsor_columns() {
        let file = temp_with(
            "car,driver,Toyo,AAF,Griots\n\
             42,Jane Racer,x,,TRUE\n\
             7,Sam Driver,,x,\n",
        );

        let table = read_cars_csv(file.path()).unwrap();

        assert_eq!(table.sponsors, vec!["Toyo", "AAF", "Griots"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].car, "42");
        assert_eq!(table.rows[0].stickers["Toyo"], true);
        assert_eq!(table.rows[0].stickers["AAF"], false);
        assert_eq!(table.rows[0].stickers["Griots"], true);
        assert_eq!(table.rows[1].stickers["AAF"], true);
    }

    #[test]
    fn test_read_cars_csv_short_rows_mean_no_sticker() {
        let file = temp_with("car,driver,Toyo,AAF\n42,Jane Racer,x\n");

        let table = read_cars_csv(file.path()).unwrap();

        assert_eq!(table.rows[0].stickers["Toyo"], true);
        assert_eq!(table.rows[0].stickers["AAF"], false);
    }

    #[test]
    fn test_read_cars_csv_rejects_wrong_prefix() {
        let file = temp_with("number,driver,Toyo\n42,Jane,x\n");

        let result = read_cars_csv(file.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("header 1 should be 'car'"));
    }

    #[test]
    fn test_read_cars_csv_rejects_duplicate_sponsor() {
        let file = temp_with("car,driver,Toyo,Toyo\n42,Jane,x,x\n");

        let result = read_cars_csv(file.path());
        assert!(result.unwrap_err().to_string().contains("appears twice"));
    }

    #[test]
    fn test_read_results_csv_skips_title_and_short_lines() {
        let file = temp_with(
            "\"Thunderhill Summer Race 1\"\n\
             \"Jane Racer\",\"1\",\"\",\"42\",\"PRO3\",\"-\"\n\
             Sam Driver, 2, , 7, PRO3, DNS\n\
             Other Class,3,,99,E0,+1 lap\n",
        );

        let rows = read_results_csv(file.path()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].driver, "Jane Racer");
        assert_eq!(rows[0].position, Some(1));
        assert_eq!(rows[0].car, "42");
        assert_eq!(rows[0].class, "PRO3");
        assert_eq!(rows[1].gap, "DNS");
        assert_eq!(rows[2].class, "E0");
    }

    #[test]
    fn test_write_and_read_sponsors_csv() {
        let rows = vec![
            SponsorRow {
                sponsor: "Toyo".to_string(),
                prize_type: "Toyo Bucks".to_string(),
                per_race: Decimal::ZERO,
                per_race_count: 1,
                per_weekend: Decimal::ZERO,
                per_weekend_count: 0,
            },
            SponsorRow {
                sponsor: "Griots".to_string(),
                prize_type: "Gift Card".to_string(),
                per_race: Decimal::from(50),
                per_race_count: 2,
                per_weekend: Decimal::from(100),
                per_weekend_count: 1,
            },
        ];

        let temp_file = NamedTempFile::new().unwrap();
        write_sponsors_csv(temp_file.path(), &rows).unwrap();
        let read_rows = read_sponsors_csv(temp_file.path()).unwrap();

        assert_eq!(rows, read_rows);
    }

    #[test]
    fn test_read_sponsors_csv_rejects_bad_headers() {
        let file = temp_with("sponsor,type,per_race,per_race_count,per_weekend,per_weekend_count\n");

        let result = read_sponsors_csv(file.path());
        assert!(result.unwrap_err().to_string().contains("should be 'prize_type'"));
    }

    #[test]
    fn test_read_history_csv() {
        let file = temp_with(
            "event,race,Toyo,AAF\n\
             Sonoma,,Jane Racer (Weekend),\n\
             ,Race 1,Sam Driver (Toyo Bucks),Jane Racer (Cash)\n\
             ,,,Alex Pilot (Cash)\n\
             ,,,\n\
             ,Race 2,Alex Pilot,\n",
        );

        let table = read_history_csv(file.path()).unwrap();

        assert_eq!(table.sponsors, vec!["Toyo", "AAF"]);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0].event, "Sonoma");
        assert_eq!(table.rows[0].race, None);
        assert_eq!(table.rows[1].race, Some(1));
        assert_eq!(table.rows[1].winners["Toyo"].driver, "Sam Driver");
        assert_eq!(table.rows[2].race, None);
        assert_eq!(table.rows[2].winners["AAF"].driver, "Alex Pilot");
        assert_eq!(table.rows[3].race, Some(2));
    }

    #[test]
    fn test_read_history_csv_reports_line_of_bad_race_label() {
        let file = temp_with("event,race,Toyo\n,Race 1,Jane\n,Race x,Sam\n");

        let result = read_history_csv(file.path());
        assert!(result.unwrap_err().to_string().contains("line 3"));
    }

    #[test]
    fn test_history_rows_written_in_sponsor_column_order() {
        let mut winners = BTreeMap::new();
        winners.insert(
            "Toyo".to_string(),
            WinnerCell {
                driver: "Jane Racer".to_string(),
                note: Some("Toyo Bucks".to_string()),
            },
        );
        let table = HistoryTable {
            sponsors: vec!["Toyo".to_string(), "AAF".to_string()],
            rows: vec![HistoryRow {
                event: String::new(),
                race: Some(4),
                winners,
            }],
        };

        let temp_file = NamedTempFile::new().unwrap();
        write_history_csv(temp_file.path(), &table).unwrap();
        let written = std::fs::read_to_string(temp_file.path()).unwrap();

        assert_eq!(written, "event,race,Toyo,AAF\n,Race 4,Jane Racer (Toyo Bucks),\n");
        assert_eq!(read_history_csv(temp_file.path()).unwrap(), table);
    }
}
