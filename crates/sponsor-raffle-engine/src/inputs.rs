/*!
# Input Loading

Turns parsed CSV rows into the engine's records and runs the soft consistency
checks. Nothing here rejects a data problem the draw can live with: unknown cars
and unmatched sponsor names are logged and returned, never raised.
*/

use sponsor_raffle_csvs::{
    read_cars_csv, read_history_csv, read_results_csv, read_sponsors_csv, CarRow, HistoryTable,
    ResultRow, SponsorRow,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::catalog::PrizeDeclaration;
use crate::error::{RaffleError, RaffleResult};
use crate::history::WinnerHistory;
use crate::rules::RaffleRules;
use crate::types::{Car, CarRoster, Drive, RaceId, SponsorName};

/// Which result lines count as drives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveFilter {
    pub participating_class: String,
    pub did_not_start_marker: String,
}

impl Default for DriveFilter {
    fn default() -> Self {
        Self {
            participating_class: "PRO3".to_string(),
            did_not_start_marker: "DNS".to_string(),
        }
    }
}

impl DriveFilter {
    pub fn accepts(&self, row: &ResultRow) -> bool {
        !row.driver.is_empty()
            && row.class == self.participating_class
            && row.gap != self.did_not_start_marker
    }
}

// ================================================================================================
// Row Conversion
// ================================================================================================

pub fn roster_from_rows(rows: &[CarRow]) -> CarRoster {
    rows.iter()
        .map(|row| {
            Car::new(
                row.car.clone(),
                row.stickers
                    .iter()
                    .filter(|(_, &has_sticker)| has_sticker)
                    .map(|(sponsor, _)| sponsor.clone()),
            )
        })
        .collect()
}

pub fn drives_from_results(race: RaceId, rows: &[ResultRow], filter: &DriveFilter) -> Vec<Drive> {
    rows.iter()
        .filter(|row| filter.accepts(row))
        .map(|row| Drive::new(row.driver.clone(), row.car.clone(), race))
        .collect()
}

pub fn declarations_from_rows(rows: &[SponsorRow]) -> Vec<PrizeDeclaration> {
    rows.iter()
        .map(|row| PrizeDeclaration {
            sponsor: row.sponsor.clone(),
            prize_type: row.prize_type.clone(),
            per_race: row.per_race,
            per_race_count: row.per_race_count,
            per_weekend: row.per_weekend,
            per_weekend_count: row.per_weekend_count,
        })
        .collect()
}

// ================================================================================================
// Consistency Checks
// ================================================================================================

/// Drives whose car is missing from the roster; they can never win
pub fn unknown_car_drives<'d>(roster: &CarRoster, drives: &'d [Drive]) -> Vec<&'d Drive> {
    let unknown: Vec<&Drive> = drives
        .iter()
        .filter(|drive| !roster.contains(&drive.car))
        .collect();

    if !unknown.is_empty() {
        let listed: Vec<String> = unknown
            .iter()
            .map(|d| format!("{} #{} (race {})", d.driver, d.car, d.race))
            .collect();
        warn!(
            count = unknown.len(),
            "Some drives were in an unknown car: {}",
            listed.join(", ")
        );
    }

    unknown
}

/// Declared sponsors that no sticker column names, plus a cooldown sponsor
/// nobody declared. Logged once as a single warning.
pub fn unmatched_sponsors(
    sticker_sponsors: &[SponsorName],
    declarations: &[PrizeDeclaration],
    rules: &RaffleRules,
) -> Vec<SponsorName> {
    let stickers: BTreeSet<&str> = sticker_sponsors.iter().map(String::as_str).collect();
    let declared: BTreeSet<&str> = declarations.iter().map(|d| d.sponsor.as_str()).collect();

    let mut unmatched: Vec<SponsorName> = declared
        .iter()
        .filter(|sponsor| !stickers.contains(*sponsor))
        .map(|sponsor| sponsor.to_string())
        .collect();

    if let Some(cooldown) = rules.cooldown_sponsor.as_deref() {
        if !declared.contains(cooldown) && !unmatched.iter().any(|s| s == cooldown) {
            unmatched.push(cooldown.to_string());
        }
    }

    if !unmatched.is_empty() {
        warn!(
            "Sponsor names do not line up between cars and prizes: {}",
            unmatched.join(", ")
        );
    }

    unmatched
}

// ================================================================================================
// Loading
// ================================================================================================

/// Where the inputs of one event live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub cars: PathBuf,
    /// Results per race, race 1 first
    pub results: Vec<PathBuf>,
    pub sponsors: PathBuf,
    /// Season history; `None` for the first event of a season
    pub history: Option<PathBuf>,
}

/// Everything read from disk for one event, converted to engine records
#[derive(Debug, Clone)]
pub struct RaffleInputs {
    pub sticker_sponsors: Vec<SponsorName>,
    pub roster: CarRoster,
    pub drives: Vec<Drive>,
    pub declarations: Vec<PrizeDeclaration>,
    pub history_table: HistoryTable,
    pub history: WinnerHistory,
}

impl RaffleInputs {
    /// Read and convert all inputs
    ///
    /// A results file that does not exist is skipped (not every weekend runs
    /// every race); having no drives at all is an error.
    pub fn load(paths: &InputPaths, filter: &DriveFilter) -> RaffleResult<Self> {
        let cars = read_cars_csv(&paths.cars)?;
        let roster = roster_from_rows(&cars.rows);
        info!(cars = roster.len(), "Loaded cars");

        let mut drives = Vec::new();
        for (index, path) in paths.results.iter().enumerate() {
            let race = index as RaceId + 1;
            if !path.exists() {
                warn!(race, path = %path.display(), "Results file not found, skipping race");
                continue;
            }
            let rows = read_results_csv(path)?;
            let race_drives = drives_from_results(race, &rows, filter);
            info!(race, drives = race_drives.len(), "Loaded results");
            drives.extend(race_drives);
        }

        if drives.is_empty() {
            return Err(RaffleError::NoDrives);
        }

        let declarations = declarations_from_rows(&read_sponsors_csv(&paths.sponsors)?);
        info!(declarations = declarations.len(), "Loaded prize declarations");

        let history_table = match &paths.history {
            Some(path) => read_history_csv(path)?,
            None => HistoryTable::default(),
        };
        let history = WinnerHistory::from_rows(&history_table.rows);
        info!(
            races = history.len(),
            last_race = history.last_race(),
            "Loaded winner history"
        );

        Ok(Self {
            sticker_sponsors: cars.sponsors,
            roster,
            drives,
            declarations,
            history_table,
            history,
        })
    }
}

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
