/*!
# CSV Schema Definitions

This module defines the authoritative CSV schemas used by the sponsor raffle.
These schemas serve as the contract between:
- the league spreadsheets (producers of cars, results, sponsors and winners)
- `draw` (consumer of inputs, producer of awards and history rows)
- `convert-history` (consumer of winners)

Sponsor-keyed files (cars, winners) carry one column per sponsor. The sponsor
set is whatever the header row says; nothing here knows sponsor names.
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::{CsvError, CsvResult};

// ================================================================================================
// Cars CSV Schema
// ================================================================================================

/// Fixed leading headers of cars.csv; every following column is a sponsor
pub const CARS_CSV_FIXED_HEADERS: &[&str] = &["car", "driver"];

/// Row structure for cars.csv
///
/// **File**: `cars.csv`
/// **Purpose**: Which sponsor stickers each car displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarRow {
    /// Car number as painted on the car (not necessarily numeric)
    pub car: String,

    /// Registered driver; informational only, drives carry their own driver
    pub driver: String,

    /// Sticker flag per sponsor column
    pub stickers: BTreeMap<String, bool>,
}

// ================================================================================================
// Race Results Schema
// ================================================================================================

/// Column positions of a RaceHero results export (no header row)
pub const RESULTS_DRIVER_COLUMN: usize = 0;
pub const RESULTS_POSITION_COLUMN: usize = 1;
pub const RESULTS_CAR_COLUMN: usize = 3;
pub const RESULTS_CLASS_COLUMN: usize = 4;
pub const RESULTS_GAP_COLUMN: usize = 5;
pub const RESULTS_MIN_COLUMNS: usize = 6;

/// One line of a race results export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub driver: String,

    /// Finishing position; `None` for title lines and unclassified entries
    pub position: Option<u32>,

    pub car: String,

    /// Car class (only one class takes part in the raffle)
    pub class: String,

    /// Gap to leader, or a status marker such as `DNS`
    pub gap: String,
}

// ================================================================================================
// Sponsors CSV Schema
// ================================================================================================

/// Expected headers for sponsors.csv in exact order
pub const SPONSORS_CSV_HEADERS: &[&str] = &[
    "sponsor",
    "prize_type",
    "per_race",
    "per_race_count",
    "per_weekend",
    "per_weekend_count",
];

/// Row structure for sponsors.csv
///
/// **File**: `sponsors.csv`
/// **Purpose**: Prize declarations per sponsor and prize type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SponsorRow {
    pub sponsor: String,

    /// Free text, e.g. "Cash" or "Gift Card"
    pub prize_type: String,

    /// Amount of each per-race prize
    #[serde(deserialize_with = "deserialize_amount")]
    pub per_race: Decimal,

    /// Units awarded in every race
    #[serde(deserialize_with = "deserialize_count")]
    pub per_race_count: u32,

    /// Amount of each weekend prize
    #[serde(deserialize_with = "deserialize_amount")]
    pub per_weekend: Decimal,

    /// Units awarded once per weekend
    #[serde(deserialize_with = "deserialize_count")]
    pub per_weekend_count: u32,
}

// ================================================================================================
// Winner History Schema
// ================================================================================================

/// Fixed leading headers of winners.csv; every following column is a sponsor
pub const HISTORY_CSV_FIXED_HEADERS: &[&str] = &["event", "race"];

/// One sponsor cell of winners.csv: `Driver Name (note)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerCell {
    pub driver: String,

    /// Trailing parenthetical, usually the prize type
    pub note: Option<String>,
}

impl WinnerCell {
    /// Parse a cell, returning `None` for blank cells
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if raw.ends_with(')') {
            if let Some(open) = raw.rfind('(') {
                let driver = raw[..open].trim().to_string();
                let note = raw[open + 1..raw.len() - 1].trim().to_string();
                if !driver.is_empty() {
                    return Some(Self {
                        driver,
                        note: (!note.is_empty()).then_some(note),
                    });
                }
            }
        }

        Some(Self {
            driver: raw.to_string(),
            note: None,
        })
    }
}

impl fmt::Display for WinnerCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.note {
            Some(note) => write!(f, "{} ({})", self.driver, note),
            None => write!(f, "{}", self.driver),
        }
    }
}

/// Row structure for winners.csv
///
/// **File**: `winners.csv`
/// **Purpose**: Season history of prior winners, appended after every event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryRow {
    /// Event name; blank on rows continuing the current event
    pub event: String,

    /// Season race number; `None` on weekend rows and continuation rows
    pub race: Option<u32>,

    /// Winner per sponsor column (blank cells omitted)
    pub winners: BTreeMap<String, WinnerCell>,
}

impl HistoryRow {
    pub fn is_blank(&self) -> bool {
        self.event.is_empty() && self.race.is_none() && self.winners.is_empty()
    }
}

// ================================================================================================
// Awards CSV Schema
// ================================================================================================

/// Expected headers for awards.csv in exact order
pub const AWARDS_CSV_HEADERS: &[&str] = &[
    "sponsor",
    "prize_type",
    "frequency",
    "race",
    "amount",
    "driver",
    "car",
    "drive_race",
];

/// Row structure for awards.csv
///
/// **File**: `awards.csv`
/// **Producer**: `draw` command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AwardRow {
    pub sponsor: String,
    pub prize_type: String,

    /// `race` or `weekend`
    pub frequency: String,

    /// Race the prize belongs to; empty for weekend prizes
    pub race: Option<u32>,

    pub amount: Decimal,
    pub driver: String,
    pub car: String,

    /// Race of the winning drive
    pub drive_race: u32,
}

// ================================================================================================
// Cell Parsing
// ================================================================================================

/// Interpret a sticker cell. Anything non-blank counts, except explicit negatives.
pub fn parse_sticker_flag(raw: &str) -> bool {
    let value = raw.trim();
    !value.is_empty()
        && !matches!(
            value.to_ascii_lowercase().as_str(),
            "0" | "false" | "no" | "n"
        )
}

/// Parse the race column of winners.csv: `Race 12`, `12` or blank
pub fn parse_race_label(raw: &str) -> CsvResult<Option<u32>> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let number = value
        .split_whitespace()
        .last()
        .unwrap_or(value)
        .trim_start_matches('#');

    number
        .parse::<u32>()
        .map(Some)
        .map_err(|_| CsvError::InvalidFormat(format!("Invalid race label '{}'", value)))
}

// ================================================================================================
// Custom Serde Functions
// ================================================================================================

/// Deserialize an amount such as `85`, `$85.50` or blank (zero)
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim().trim_start_matches('$').replace(',', "");
    if s.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(&s).map_err(serde::de::Error::custom)
}

/// Deserialize a unit count, blank meaning zero
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }
    s.parse::<u32>().map_err(serde::de::Error::custom)
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sponsor_row_tolerates_blanks_and_dollar_signs() {
        let data = "sponsor,prize_type,per_race,per_race_count,per_weekend,per_weekend_count\n\
                    Toyo,Toyo Bucks,$85,1,,\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let row: SponsorRow = rdr.deserialize().next().unwrap().unwrap();

        assert_eq!(row.sponsor, "Toyo");
        assert_eq!(row.per_race, Decimal::from(85));
        assert_eq!(row.per_race_count, 1);
        assert_eq!(row.per_weekend, Decimal::ZERO);
        assert_eq!(row.per_weekend_count, 0);
    }

    #[test]
    fn test_sponsor_row_rejects_fractional_count() {
        let data = "sponsor,prize_type,per_race,per_race_count,per_weekend,per_weekend_count\n\
                    AAF,Cash,50,1.5,0,0\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let result: Result<SponsorRow, _> = rdr.deserialize().next().unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn test_winner_cell_parsing() {
        assert_eq!(WinnerCell::parse("   "), None);

        let plain = WinnerCell::parse(" Jane Racer ").unwrap();
        assert_eq!(plain.driver, "Jane Racer");
        assert_eq!(plain.note, None);

        let noted = WinnerCell::parse("Jane Racer (Gift Card)").unwrap();
        assert_eq!(noted.driver, "Jane Racer");
        assert_eq!(noted.note.as_deref(), Some("Gift Card"));
        assert_eq!(noted.to_string(), "Jane Racer (Gift Card)");

        let empty_note = WinnerCell::parse("Jane Racer ()").unwrap();
        assert_eq!(empty_note.note, None);
    }

    #[test]
    fn test_race_label_parsing() {
        assert_eq!(parse_race_label("").unwrap(), None);
        assert_eq!(parse_race_label("Race 12").unwrap(), Some(12));
        assert_eq!(parse_race_label(" 7 ").unwrap(), Some(7));
        assert_eq!(parse_race_label("Race #3").unwrap(), Some(3));
        assert!(parse_race_label("Race twelve").is_err());
    }

    #[test]
    fn test_sticker_flags() {
        assert!(parse_sticker_flag("x"));
        assert!(parse_sticker_flag("TRUE"));
        assert!(parse_sticker_flag("1"));
        assert!(!parse_sticker_flag(""));
        assert!(!parse_sticker_flag(" "));
        assert!(!parse_sticker_flag("FALSE"));
        assert!(!parse_sticker_flag("0"));
        assert!(!parse_sticker_flag("No"));
    }

    #[test]
    fn test_award_row_serialization() {
        let row = AwardRow {
            sponsor: "Toyo".to_string(),
            prize_type: "Toyo Bucks".to_string(),
            frequency: "race".to_string(),
            race: Some(2),
            amount: Decimal::from(175),
            driver: "Jane Racer".to_string(),
            car: "42".to_string(),
            drive_race: 2,
        };

        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(&row).unwrap();
        let csv_data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

        assert_eq!(
            csv_data,
            "sponsor,prize_type,frequency,race,amount,driver,car,drive_race\n\
             Toyo,Toyo Bucks,race,2,175,Jane Racer,42,2\n"
        );
    }
}
