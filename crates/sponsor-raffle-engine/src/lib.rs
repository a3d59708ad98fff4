/*!
# Sponsor Raffle Engine

Draws sponsor prizes among the drivers of a race weekend.

Every prize goes to the driver of a randomly picked eligible drive, so the more
races a driver runs with a sponsor's sticker, the better their odds for that
sponsor. Per round a driver wins at most one prize, and across the whole run at
most one prize per sponsor. Prizes nobody can win in a round are drawn again in
the next round, up to a fixed number of rounds.

## Pipeline

1. [`RaffleInputs::load`] reads cars, results, sponsors and history
2. [`build_prize_catalog`] expands declarations into shuffled prizes
3. [`RaffleContext::run`] draws rounds until done or out of rounds
4. [`RaffleSummary`], [`group_awards`] and [`history_rows`] report the result

## Example

```rust
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use sponsor_raffle_engine::{
    Car, CarRoster, Drive, Prize, RaffleContext, RaffleRules, RaffleStatus, WinnerHistory,
};

let roster: CarRoster = vec![Car::new("1", ["X"]), Car::new("2", ["Y"])]
    .into_iter()
    .collect();
let drives = vec![Drive::new("A", "1", 1), Drive::new("B", "2", 1)];
let ctx = RaffleContext::new(roster, drives, WinnerHistory::default(), RaffleRules::default())?;

let prizes = vec![
    Prize::per_race("X", "Cash", 1, Decimal::from(50)),
    Prize::per_race("Y", "Cash", 1, Decimal::from(50)),
];
let outcome = ctx.run(prizes, &mut StdRng::seed_from_u64(42));

assert_eq!(outcome.status, RaffleStatus::Done);
# Ok::<(), sponsor_raffle_engine::RaffleError>(())
```
*/

mod catalog;
mod eligibility;
mod error;
mod history;
mod inputs;
mod raffle;
mod registry;
mod round;
mod rules;
mod summary;
mod types;

pub use catalog::{build_prize_catalog, expand_prizes, race_participation, PrizeDeclaration};
pub use eligibility::{candidates, is_candidate, RoundState};
pub use error::{RaffleError, RaffleResult};
pub use history::{history_rows, HistoryRecord, WinnerHistory};
pub use inputs::{
    declarations_from_rows, drives_from_results, resolve_path, roster_from_rows,
    unknown_car_drives, unmatched_sponsors, DriveFilter, InputPaths, RaffleInputs,
};
pub use raffle::{RaffleContext, RaffleOutcome, RaffleStatus, RoundReport};
pub use registry::{Award, AwardRegistry, EventRecord, RaceRecord};
pub use round::{draw_round, RoundResults};
pub use rules::{
    PayoutSchedule, PayoutTier, RaffleRules, DEFAULT_COOLDOWN_LOOKBACK, DEFAULT_MAX_ROUNDS,
};
pub use summary::{award_rows, group_awards, listing_line, prize_label, RaffleSummary};
pub use types::{
    Car, CarNumber, CarRoster, Drive, DriverName, Frequency, Prize, PrizeAward, PrizeScope,
    RaceId, SponsorName,
};
