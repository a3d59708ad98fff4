/*!
# Prize Catalog Builder

Expands sponsor declarations into individual prizes:

- `per_race_count` prizes of `per_race` in every race that has drives
- `per_weekend_count` prizes of `per_weekend` for the weekend

The cooldown sponsor's per-race prizes are paid by race participation instead
of a fixed amount (see [`PayoutSchedule`](crate::rules::PayoutSchedule)). A race
too small to pay anything gets no such prize.

The finished catalog is shuffled. Draw order matters because candidate pools
shrink as the round goes on; a fixed order would let drivers game which
stickers they run.
*/

use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::rules::RaffleRules;
use crate::types::{Drive, Prize, RaceId, SponsorName};

/// What one sponsor puts up for one prize type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeDeclaration {
    pub sponsor: SponsorName,
    pub prize_type: String,
    pub per_race: Decimal,
    pub per_race_count: u32,
    pub per_weekend: Decimal,
    pub per_weekend_count: u32,
}

/// Number of drives per race, ascending by race
pub fn race_participation(drives: &[Drive]) -> BTreeMap<RaceId, usize> {
    let mut counts = BTreeMap::new();
    for drive in drives {
        *counts.entry(drive.race).or_insert(0) += 1;
    }
    counts
}

/// Expand declarations into prizes, in declaration order
pub fn expand_prizes(
    declarations: &[PrizeDeclaration],
    drives: &[Drive],
    rules: &RaffleRules,
) -> Vec<Prize> {
    let participation = race_participation(drives);
    let mut prizes = Vec::new();

    for declaration in declarations {
        let is_cooldown_sponsor = rules.is_cooldown_sponsor(&declaration.sponsor);

        for (&race, &drive_count) in &participation {
            let amount = if is_cooldown_sponsor {
                rules.payout_schedule.amount_for(drive_count)
            } else {
                declaration.per_race
            };

            if is_cooldown_sponsor && amount.is_zero() {
                debug!(
                    sponsor = %declaration.sponsor,
                    race,
                    drives = drive_count,
                    "Race too small for a payout, prize omitted"
                );
                continue;
            }

            for _ in 0..declaration.per_race_count {
                prizes.push(Prize::per_race(
                    declaration.sponsor.clone(),
                    declaration.prize_type.clone(),
                    race,
                    amount,
                ));
            }
        }

        for _ in 0..declaration.per_weekend_count {
            prizes.push(Prize::weekend(
                declaration.sponsor.clone(),
                declaration.prize_type.clone(),
                declaration.per_weekend,
            ));
        }
    }

    prizes
}

/// Expand and shuffle: the catalog in draw order
pub fn build_prize_catalog<R: Rng + ?Sized>(
    declarations: &[PrizeDeclaration],
    drives: &[Drive],
    rules: &RaffleRules,
    rng: &mut R,
) -> Vec<Prize> {
    let mut prizes = expand_prizes(declarations, drives, rules);
    prizes.shuffle(rng);
    prizes
}
