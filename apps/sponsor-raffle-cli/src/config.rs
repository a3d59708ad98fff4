use serde::{Deserialize, Serialize};
use sponsor_raffle_engine::{
    resolve_path, DriveFilter, InputPaths, PayoutSchedule, PayoutTier, Prize, PrizeAward,
    RaffleRules, RaffleStatus, RaffleSummary, RoundReport, DEFAULT_COOLDOWN_LOOKBACK,
    DEFAULT_MAX_ROUNDS,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// Raffle configuration file structure
///
/// Input paths are relative to the directory holding the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaffleConfig {
    /// Event name written to the weekend history row
    pub event_name: String,

    /// Car roster with one sticker column per sponsor
    pub cars_file: PathBuf,

    /// One results export per race, race 1 first. Missing files are skipped.
    pub results_files: Vec<PathBuf>,

    /// Prize declarations
    pub sponsors_file: PathBuf,

    /// Season winner history; omit for the first event of a season
    #[serde(default)]
    pub history_file: Option<PathBuf>,

    /// Car class whose results count as drives
    #[serde(default = "default_participating_class")]
    pub participating_class: String,

    /// Gap column value marking a driver who did not start
    #[serde(default = "default_did_not_start_marker")]
    pub did_not_start_marker: String,

    /// Sponsor whose prizes use the cooldown and the payout schedule
    #[serde(default)]
    pub cooldown_sponsor: Option<String>,

    #[serde(default = "default_cooldown_lookback")]
    pub cooldown_lookback: usize,

    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,

    /// Optional: fixed RNG seed (if not provided, a fresh one is drawn and reported)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Optional: replaces the default cooldown payout tiers
    #[serde(default)]
    pub payout_schedule: Option<Vec<PayoutTier>>,

    /// Published sponsor names keyed by sponsor column name
    #[serde(default)]
    pub sponsor_display_names: BTreeMap<String, String>,
}

impl RaffleConfig {
    pub fn load(path: &Path) -> CliResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: RaffleConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.event_name.trim().is_empty() {
            return Err(CliError::InvalidConfig(
                "event_name must not be empty".to_string(),
            ));
        }

        if self.results_files.is_empty() {
            return Err(CliError::InvalidConfig(
                "results_files must list at least one race".to_string(),
            ));
        }

        Ok(())
    }

    pub fn rules(&self) -> CliResult<RaffleRules> {
        let payout_schedule = match &self.payout_schedule {
            Some(tiers) => PayoutSchedule::new(tiers.clone())?,
            None => PayoutSchedule::default(),
        };

        let rules = RaffleRules {
            cooldown_sponsor: self.cooldown_sponsor.clone(),
            cooldown_lookback: self.cooldown_lookback,
            max_rounds: self.max_rounds,
            payout_schedule,
        };
        rules.validate()?;
        Ok(rules)
    }

    pub fn drive_filter(&self) -> DriveFilter {
        DriveFilter {
            participating_class: self.participating_class.clone(),
            did_not_start_marker: self.did_not_start_marker.clone(),
        }
    }

    pub fn input_paths(&self, base_dir: &Path) -> InputPaths {
        InputPaths {
            cars: resolve_path(base_dir, &self.cars_file),
            results: self
                .results_files
                .iter()
                .map(|path| resolve_path(base_dir, path))
                .collect(),
            sponsors: resolve_path(base_dir, &self.sponsors_file),
            history: self
                .history_file
                .as_ref()
                .map(|path| resolve_path(base_dir, path)),
        }
    }
}

/// Draw output structure (awards.json)
#[derive(Debug, Clone, Serialize)]
pub struct RaffleReport<'a> {
    pub event: &'a str,

    /// Seed that replays this draw
    pub seed: u64,

    pub status: RaffleStatus,
    pub rounds: &'a [RoundReport],
    pub summary: &'a RaffleSummary,
    pub awards: &'a [PrizeAward],
    pub unawarded: &'a [Prize],
}

fn default_participating_class() -> String {
    "PRO3".to_string()
}

fn default_did_not_start_marker() -> String {
    "DNS".to_string()
}

fn default_cooldown_lookback() -> usize {
    DEFAULT_COOLDOWN_LOOKBACK
}

fn default_max_rounds() -> usize {
    DEFAULT_MAX_ROUNDS
}
