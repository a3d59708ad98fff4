/*!
# Award Registry

Structured JSON form of the season's winner history, grouped by event and race,
for publishing results outside the spreadsheet.

Row interpretation:
- event name with a blank race: weekend awards of that event
- race number: awards of that race (event inherited when blank)
- both blank: continues whatever the previous row was
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sponsor_raffle_csvs::HistoryRow;
use std::collections::BTreeMap;
use tracing::debug;

use crate::types::RaceId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardRegistry {
    pub records: Vec<EventRecord>,
    pub last_updated_date_time: String,
    pub last_updated_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub name: String,
    pub races: Vec<RaceRecord>,
    pub weekend_awards: Vec<Award>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceRecord {
    pub timestamp: String,
    pub race_id: RaceId,
    pub awards: Vec<Award>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub driver_name: String,
    pub sponsor_name: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Weekend,
    Race(RaceId),
}

impl AwardRegistry {
    /// Build the registry from winners.csv rows
    ///
    /// `display_names` maps sponsor columns to published sponsor names;
    /// unmapped sponsors keep their column name.
    pub fn from_history(
        rows: &[HistoryRow],
        updated_by: &str,
        now: DateTime<Utc>,
        display_names: &BTreeMap<String, String>,
    ) -> Self {
        let timestamp = now.format("%Y-%m-%d").to_string();
        let mut registry = Self {
            records: Vec::new(),
            last_updated_date_time: now.to_rfc3339(),
            last_updated_by: updated_by.to_string(),
        };

        let mut event = String::new();
        let mut section: Option<Section> = None;

        for row in rows {
            if !row.event.is_empty() {
                event = row.event.clone();
            }

            section = match (row.race, row.event.is_empty()) {
                (Some(race), _) => Some(Section::Race(race)),
                (None, false) => Some(Section::Weekend),
                (None, true) => section,
            };

            let awards = row.winners.iter().map(|(sponsor, cell)| Award {
                driver_name: cell.driver.clone(),
                sponsor_name: display_names
                    .get(sponsor)
                    .cloned()
                    .unwrap_or_else(|| sponsor.clone()),
                value: cell.note.clone().unwrap_or_default(),
            });

            match section {
                Some(Section::Weekend) => registry
                    .upsert_event(&event)
                    .weekend_awards
                    .extend(awards),
                Some(Section::Race(race)) => registry
                    .upsert_race(&event, race, &timestamp)
                    .awards
                    .extend(awards),
                None => debug!("History row before any event or race, ignored"),
            }
        }

        for record in &mut registry.records {
            record
                .weekend_awards
                .sort_by(|a, b| a.driver_name.cmp(&b.driver_name));
            record.races.sort_by_key(|race| race.race_id);
            for race in &mut record.races {
                race.awards.sort_by(|a, b| a.driver_name.cmp(&b.driver_name));
            }
        }

        registry
    }

    pub fn award_count(&self) -> usize {
        self.records
            .iter()
            .map(|record| {
                record.weekend_awards.len()
                    + record.races.iter().map(|r| r.awards.len()).sum::<usize>()
            })
            .sum()
    }

    fn upsert_event(&mut self, name: &str) -> &mut EventRecord {
        match self.records.iter().position(|r| r.name == name) {
            Some(index) => &mut self.records[index],
            None => {
                self.records.push(EventRecord {
                    name: name.to_string(),
                    races: Vec::new(),
                    weekend_awards: Vec::new(),
                });
                let last = self.records.len() - 1;
                &mut self.records[last]
            }
        }
    }

    fn upsert_race(&mut self, event: &str, race_id: RaceId, timestamp: &str) -> &mut RaceRecord {
        let record = self.upsert_event(event);
        match record.races.iter().position(|r| r.race_id == race_id) {
            Some(index) => &mut record.races[index],
            None => {
                record.races.push(RaceRecord {
                    timestamp: timestamp.to_string(),
                    race_id,
                    awards: Vec::new(),
                });
                let last = record.races.len() - 1;
                &mut record.races[last]
            }
        }
    }
}
