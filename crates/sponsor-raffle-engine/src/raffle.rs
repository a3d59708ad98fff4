/*!
# Raffle Controller

Runs rounds over the shrinking pool of unawarded prizes until every prize has a
winner or the round cap is reached. Between rounds every driver becomes eligible
again, except for sponsors they already won from.

```text
DRAWING --(prizes left, rounds left)--> DRAWING
DRAWING --(pool empty)----------------> DONE
DRAWING --(round cap, prizes left)----> FAILED
```

A failed run is still a result: everything awarded so far is kept and reported.
*/

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::RaffleResult;
use crate::history::WinnerHistory;
use crate::round::draw_round;
use crate::rules::RaffleRules;
use crate::types::{CarRoster, Drive, Prize, PrizeAward};

/// Everything a draw reads, loaded up front and immutable for the run
#[derive(Debug, Clone)]
pub struct RaffleContext {
    roster: CarRoster,
    drives: Vec<Drive>,
    history: WinnerHistory,
    rules: RaffleRules,
}

impl RaffleContext {
    pub fn new(
        roster: CarRoster,
        drives: Vec<Drive>,
        history: WinnerHistory,
        rules: RaffleRules,
    ) -> RaffleResult<Self> {
        rules.validate()?;
        Ok(Self {
            roster,
            drives,
            history,
            rules,
        })
    }

    pub fn roster(&self) -> &CarRoster {
        &self.roster
    }

    pub fn drives(&self) -> &[Drive] {
        &self.drives
    }

    pub fn history(&self) -> &WinnerHistory {
        &self.history
    }

    pub fn rules(&self) -> &RaffleRules {
        &self.rules
    }

    /// Draw `prizes` in the given order until all are awarded or rounds run out
    pub fn run<R: Rng + ?Sized>(&self, prizes: Vec<Prize>, rng: &mut R) -> RaffleOutcome {
        let mut awarded: Vec<PrizeAward> = Vec::new();
        let mut unawarded = prizes;
        let mut rounds = Vec::new();

        let mut round = 1;
        while !unawarded.is_empty() && round <= self.rules.max_rounds {
            let pool_size = unawarded.len();
            info!(round, prizes = pool_size, "Running raffle round");

            let results = draw_round(self, &awarded, unawarded, rng);
            debug_assert_eq!(results.awarded.len() + results.unawarded.len(), pool_size);

            rounds.push(RoundReport {
                round,
                pool_size,
                awarded: results.awarded.len(),
                unawarded: results.unawarded.len(),
            });

            awarded.extend(results.awarded);
            unawarded = results.unawarded;
            round += 1;
        }

        let status = if unawarded.is_empty() {
            RaffleStatus::Done
        } else {
            warn!(
                rounds = rounds.len(),
                unawarded = unawarded.len(),
                "Could not award all prizes before the round limit"
            );
            RaffleStatus::Failed
        };

        RaffleOutcome {
            status,
            rounds,
            awarded,
            unawarded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RaffleStatus {
    /// Every prize has a winner
    Done,
    /// Round limit hit with prizes left over
    Failed,
}

/// Per-round counts; `awarded + unawarded == pool_size` always holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    pub round: usize,
    pub pool_size: usize,
    pub awarded: usize,
    pub unawarded: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RaffleOutcome {
    pub status: RaffleStatus,
    pub rounds: Vec<RoundReport>,
    pub awarded: Vec<PrizeAward>,
    pub unawarded: Vec<Prize>,
}

impl RaffleOutcome {
    pub fn is_done(&self) -> bool {
        self.status == RaffleStatus::Done
    }

    pub fn total_prizes(&self) -> usize {
        self.awarded.len() + self.unawarded.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Car;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;

    #[test]
    fn test_empty_catalog_is_done_without_rounds() {
        let ctx = RaffleContext::new(
            CarRoster::new(),
            vec![Drive::new("A", "1", 1)],
            WinnerHistory::default(),
            RaffleRules::default(),
        )
        .unwrap();

        let outcome = ctx.run(vec![], &mut StdRng::seed_from_u64(0));

        assert!(outcome.is_done());
        assert!(outcome.rounds.is_empty());
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let rules = RaffleRules {
            max_rounds: 0,
            ..RaffleRules::default()
        };
        let result = RaffleContext::new(CarRoster::new(), vec![], WinnerHistory::default(), rules);
        assert!(result.is_err());
    }

    #[test]
    fn test_second_round_reopens_drivers_for_other_sponsors() {
        // One driver, two sponsors: round 1 awards one, round 2 the other
        let roster: CarRoster = vec![Car::new("1", ["X", "Y"])].into_iter().collect();
        let ctx = RaffleContext::new(
            roster,
            vec![Drive::new("A", "1", 1)],
            WinnerHistory::default(),
            RaffleRules::default(),
        )
        .unwrap();

        let prizes = vec![
            Prize::per_race("X", "Cash", 1, Decimal::from(10)),
            Prize::per_race("Y", "Cash", 1, Decimal::from(10)),
        ];
        let outcome = ctx.run(prizes, &mut StdRng::seed_from_u64(3));

        assert!(outcome.is_done());
        assert_eq!(outcome.rounds.len(), 2);
        assert_eq!(outcome.rounds[0].awarded, 1);
        assert_eq!(outcome.rounds[1].awarded, 1);
        assert_eq!(outcome.total_prizes(), 2);
    }

    #[test]
    fn test_custom_round_limit() {
        let roster: CarRoster = vec![Car::new("1", ["X"])].into_iter().collect();
        let rules = RaffleRules {
            max_rounds: 2,
            ..RaffleRules::default()
        };
        let ctx = RaffleContext::new(roster, vec![], WinnerHistory::default(), rules).unwrap();

        let outcome = ctx.run(
            vec![Prize::weekend("X", "Cash", Decimal::from(10))],
            &mut StdRng::seed_from_u64(3),
        );

        assert_eq!(outcome.status, RaffleStatus::Failed);
        assert_eq!(outcome.rounds.len(), 2);
        assert_eq!(outcome.unawarded.len(), 1);
    }
}
