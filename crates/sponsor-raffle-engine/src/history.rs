/*!
# Winner History & Cooldown Tracker

Prior winners of the season, one record per race, read once before the draw
and never touched during it. The cooldown sponsor's prize skips any driver who
won it within the lookback window.

The lookback window covers the last `lookback` race numbers up to the most
recent race on file: a win in race N blocks races N+1 through N+lookback. An
empty history has no window and nobody is in cooldown.

This module also renders a finished draw back into history rows so the season
file can be extended after every event.
*/

use sponsor_raffle_csvs::{HistoryRow, WinnerCell};
use std::collections::BTreeMap;
use tracing::debug;

use crate::types::{DriverName, PrizeAward, PrizeScope, RaceId, SponsorName};

/// Winners of one prior race (weekend awards attach to the race before them)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub race: RaceId,
    pub event: String,
    pub winners: Vec<(SponsorName, DriverName)>,
}

impl HistoryRecord {
    pub fn new(race: RaceId, event: impl Into<String>) -> Self {
        Self {
            race,
            event: event.into(),
            winners: Vec::new(),
        }
    }

    pub fn with_winner(mut self, sponsor: impl Into<SponsorName>, driver: impl Into<DriverName>) -> Self {
        self.winners.push((sponsor.into(), driver.into()));
        self
    }

    pub fn has_winner(&self, sponsor: &str, driver: &str) -> bool {
        self.winners
            .iter()
            .any(|(s, d)| s == sponsor && d == driver)
    }
}

/// Season history ordered by ascending race number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinnerHistory {
    records: Vec<HistoryRecord>,
}

impl WinnerHistory {
    /// Sort records by race and merge records sharing a race number
    pub fn new(records: Vec<HistoryRecord>) -> Self {
        let mut by_race: BTreeMap<RaceId, HistoryRecord> = BTreeMap::new();
        for record in records {
            match by_race.get_mut(&record.race) {
                Some(existing) => existing.winners.extend(record.winners),
                None => {
                    by_race.insert(record.race, record);
                }
            }
        }

        Self {
            records: by_race.into_values().collect(),
        }
    }

    /// Build from winners.csv rows
    ///
    /// A row without a race number belongs to the most recent race above it.
    /// Rows before the first race number have nowhere to go and are dropped.
    pub fn from_rows(rows: &[HistoryRow]) -> Self {
        let mut records = Vec::new();
        let mut current_event = String::new();
        let mut current: Option<HistoryRecord> = None;

        for row in rows {
            if !row.event.is_empty() {
                current_event = row.event.clone();
            }

            if let Some(race) = row.race {
                if let Some(done) = current.take() {
                    records.push(done);
                }
                current = Some(HistoryRecord::new(race, current_event.clone()));
            }

            match current.as_mut() {
                Some(record) => record.winners.extend(
                    row.winners
                        .iter()
                        .map(|(sponsor, cell)| (sponsor.clone(), cell.driver.clone())),
                ),
                None => debug!(event = %row.event, "History row before any race number, ignored"),
            }
        }

        records.extend(current);
        Self::new(records)
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest race number on record, 0 for an empty season
    pub fn last_race(&self) -> RaceId {
        self.records.last().map(|r| r.race).unwrap_or(0)
    }

    /// Records inside the cooldown lookback window
    ///
    /// The window covers the last `lookback` race numbers up to and including
    /// `last_race`, so gaps in the season shrink it rather than reach further back.
    pub fn cooldown_window(&self, lookback: usize) -> &[HistoryRecord] {
        let last_race = self.last_race();
        let lookback = RaceId::try_from(lookback).unwrap_or(RaceId::MAX);
        let window_start = last_race - last_race.min(lookback);
        let first = self
            .records
            .partition_point(|record| record.race <= window_start);
        &self.records[first..]
    }

    /// Whether `driver` won `sponsor`'s prize inside the lookback window
    pub fn in_cooldown(&self, driver: &str, sponsor: &str, lookback: usize) -> bool {
        self.cooldown_window(lookback)
            .iter()
            .any(|record| record.has_winner(sponsor, driver))
    }
}

// ================================================================================================
// Recording
// ================================================================================================

/// Render awards as winners.csv rows for this event
///
/// One or more weekend rows (each carrying the event name) come first, then the
/// rows of every race, numbered on from `last_race`. A sponsor with several
/// awards in one race spills onto continuation rows.
pub fn history_rows(awards: &[PrizeAward], event: &str, last_race: RaceId) -> Vec<HistoryRow> {
    let mut weekend: BTreeMap<&str, Vec<&PrizeAward>> = BTreeMap::new();
    let mut races: BTreeMap<RaceId, BTreeMap<&str, Vec<&PrizeAward>>> = BTreeMap::new();

    for award in awards {
        match award.prize.scope {
            PrizeScope::Weekend => weekend
                .entry(award.prize.sponsor.as_str())
                .or_default()
                .push(award),
            PrizeScope::Race(race) => races
                .entry(race)
                .or_default()
                .entry(award.prize.sponsor.as_str())
                .or_default()
                .push(award),
        }
    }

    let mut rows = Vec::new();

    let weekend_rows = weekend.values().map(Vec::len).max().unwrap_or(0).max(1);
    for i in 0..weekend_rows {
        rows.push(HistoryRow {
            event: event.to_string(),
            race: None,
            winners: cells_at(&weekend, i),
        });
    }

    for (race, sponsors) in &races {
        let race_rows = sponsors.values().map(Vec::len).max().unwrap_or(0);
        for i in 0..race_rows {
            rows.push(HistoryRow {
                event: String::new(),
                race: (i == 0).then_some(last_race + race),
                winners: cells_at(sponsors, i),
            });
        }
    }

    rows
}

fn cells_at(by_sponsor: &BTreeMap<&str, Vec<&PrizeAward>>, index: usize) -> BTreeMap<String, WinnerCell> {
    by_sponsor
        .iter()
        .filter_map(|(sponsor, awards)| {
            awards.get(index).map(|award| {
                (
                    sponsor.to_string(),
                    WinnerCell {
                        driver: award.winner.driver.clone(),
                        note: Some(award.prize.prize_type.clone()),
                    },
                )
            })
        })
        .collect()
}
