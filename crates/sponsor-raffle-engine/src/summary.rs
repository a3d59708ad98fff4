/*!
# Run Summary

Aggregate counts and the per-prize listing printed after a draw.
*/

use serde::Serialize;
use sponsor_raffle_csvs::AwardRow;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::types::{Drive, DriverName, Prize, PrizeAward, PrizeScope};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaffleSummary {
    pub total_prizes: usize,
    pub total_drives: usize,
    pub unique_drivers: usize,
    pub unique_winners: usize,
    /// Drivers with more than one prize, fewest wins first
    pub duplicate_winners: Vec<(DriverName, usize)>,
}

impl RaffleSummary {
    pub fn new(total_prizes: usize, drives: &[Drive], awarded: &[PrizeAward]) -> Self {
        let unique_drivers = drives
            .iter()
            .map(|d| d.driver.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        let mut wins: HashMap<&str, usize> = HashMap::new();
        for award in awarded {
            *wins.entry(award.winner.driver.as_str()).or_insert(0) += 1;
        }

        let mut duplicate_winners: Vec<(DriverName, usize)> = wins
            .iter()
            .filter(|(_, &count)| count > 1)
            .map(|(driver, &count)| (driver.to_string(), count))
            .collect();
        duplicate_winners.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total_prizes,
            total_drives: drives.len(),
            unique_drivers,
            unique_winners: wins.len(),
            duplicate_winners,
        }
    }
}

/// Listing key of a prize, e.g. `Toyo -- $175 Toyo Bucks (Race #2)`
pub fn prize_label(prize: &Prize) -> String {
    let scope = match prize.scope {
        PrizeScope::Race(race) => format!("(Race #{})", race),
        PrizeScope::Weekend => "(Weekend)".to_string(),
    };
    format!(
        "{} -- ${} {} {}",
        prize.sponsor.trim_start_matches('_'),
        prize.amount,
        prize.prize_type,
        scope
    )
}

/// Winners per prize label, sorted by label. Labels of prizes nobody won map
/// to an empty list.
pub fn group_awards<'a>(
    awarded: &'a [PrizeAward],
    unawarded: &[Prize],
) -> BTreeMap<String, Vec<&'a Drive>> {
    let mut grouped: BTreeMap<String, Vec<&Drive>> = BTreeMap::new();

    for prize in unawarded {
        grouped.entry(prize_label(prize)).or_default();
    }
    for award in awarded {
        grouped
            .entry(prize_label(&award.prize))
            .or_default()
            .push(&award.winner);
    }

    grouped
}

/// Render one listing line: `label: Jane #42, Sam #7` or `label: Unclaimed`
pub fn listing_line(label: &str, winners: &[&Drive]) -> String {
    if winners.is_empty() {
        return format!("{}: Unclaimed", label);
    }
    let names: Vec<String> = winners
        .iter()
        .map(|w| format!("{} #{}", w.driver, w.car))
        .collect();
    format!("{}: {}", label, names.join(", "))
}

pub fn award_rows(awarded: &[PrizeAward]) -> Vec<AwardRow> {
    awarded
        .iter()
        .map(|award| AwardRow {
            sponsor: award.prize.sponsor.clone(),
            prize_type: award.prize.prize_type.clone(),
            frequency: award.prize.frequency().to_string(),
            race: award.prize.race(),
            amount: award.prize.amount,
            driver: award.winner.driver.clone(),
            car: award.winner.car.clone(),
            drive_race: award.winner.race,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn award(driver: &str, prize: Prize) -> PrizeAward {
        PrizeAward {
            winner: Drive::new(driver, "7", prize.race().unwrap_or(1)),
            prize,
        }
    }

    #[test]
    fn test_summary_counts_and_duplicates() {
        let drives = vec![
            Drive::new("Jane", "1", 1),
            Drive::new("Jane", "1", 2),
            Drive::new("Sam", "2", 1),
            Drive::new("Alex", "3", 1),
            Drive::new("Lee", "4", 1),
        ];
        let cash = |race| Prize::per_race("AAF", "Cash", race, Decimal::from(10));
        let awarded = vec![
            award("Jane", cash(1)),
            award("Sam", cash(1)),
            award("Jane", cash(2)),
            award("Jane", cash(2)),
            award("Sam", cash(2)),
            award("Alex", cash(1)),
        ];

        let summary = RaffleSummary::new(7, &drives, &awarded);

        assert_eq!(summary.total_prizes, 7);
        assert_eq!(summary.total_drives, 5);
        assert_eq!(summary.unique_drivers, 4);
        assert_eq!(summary.unique_winners, 3);
        assert_eq!(
            summary.duplicate_winners,
            vec![("Sam".to_string(), 2), ("Jane".to_string(), 3)]
        );
    }

    #[test]
    fn test_prize_label() {
        let race = Prize::per_race("_425", "Cash", 2, Decimal::from(50));
        assert_eq!(prize_label(&race), "425 -- $50 Cash (Race #2)");

        let weekend = Prize::weekend("Griots", "Gift Card", Decimal::new(2550, 2));
        assert_eq!(prize_label(&weekend), "Griots -- $25.50 Gift Card (Weekend)");
    }

    #[test]
    fn test_grouped_listing_includes_unclaimed() {
        let prize = Prize::per_race("AAF", "Cash", 1, Decimal::from(10));
        let awarded = vec![award("Jane", prize.clone()), award("Sam", prize)];
        let unawarded = vec![Prize::weekend("Toyo", "Toyo Bucks", Decimal::from(85))];

        let grouped = group_awards(&awarded, &unawarded);
        let lines: Vec<String> = grouped
            .iter()
            .map(|(label, winners)| listing_line(label, winners))
            .collect();

        assert_eq!(
            lines,
            vec![
                "AAF -- $10 Cash (Race #1): Jane #7, Sam #7".to_string(),
                "Toyo -- $85 Toyo Bucks (Weekend): Unclaimed".to_string(),
            ]
        );
    }

    #[test]
    fn test_award_rows() {
        let rows = award_rows(&[award("Jane", Prize::weekend("Toyo", "Bucks", Decimal::from(85)))]);
        assert_eq!(rows[0].frequency, "weekend");
        assert_eq!(rows[0].race, None);
        assert_eq!(rows[0].driver, "Jane");
        assert_eq!(rows[0].drive_race, 1);
    }
}
