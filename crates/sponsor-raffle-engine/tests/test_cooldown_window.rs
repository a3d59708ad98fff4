use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use sponsor_raffle_engine::{
    Car, CarRoster, Drive, HistoryRecord, Prize, RaffleContext, RaffleRules, RaffleStatus,
    WinnerHistory,
};

/// A season of `races` races where Jane won Toyo in `jane_race` and Other won
/// it everywhere else
fn season(races: u32, jane_race: u32) -> WinnerHistory {
    WinnerHistory::new(
        (1..=races)
            .map(|race| {
                let winner = if race == jane_race { "Jane" } else { "Other" };
                HistoryRecord::new(race, "Season").with_winner("Toyo", winner)
            })
            .collect(),
    )
}

fn jane_context(history: WinnerHistory) -> RaffleContext {
    let roster: CarRoster = vec![Car::new("7", ["Toyo", "AAF"])].into_iter().collect();
    RaffleContext::new(
        roster,
        vec![Drive::new("Jane", "7", 1)],
        history,
        RaffleRules::with_cooldown_sponsor("Toyo"),
    )
    .unwrap()
}

fn toyo_prize() -> Prize {
    Prize::weekend("Toyo", "Toyo Bucks", Decimal::from(175))
}

/// Test the nine-race cooldown against a twelve-race season
///
/// The draw is for race 13. A Toyo win in races 4..=12 keeps Jane out; a win in
/// race 3 or earlier has aged out.
#[test]
fn test_cooldown_covers_previous_nine_races() {
    for jane_race in 4..=12 {
        let ctx = jane_context(season(12, jane_race));
        let outcome = ctx.run(vec![toyo_prize()], &mut StdRng::seed_from_u64(jane_race as u64));

        assert_eq!(
            outcome.status,
            RaffleStatus::Failed,
            "win in race {} should still be cooling down",
            jane_race
        );
        assert!(outcome.awarded.is_empty());
    }

    for jane_race in 1..=3 {
        let ctx = jane_context(season(12, jane_race));
        let outcome = ctx.run(vec![toyo_prize()], &mut StdRng::seed_from_u64(jane_race as u64));

        assert_eq!(outcome.status, RaffleStatus::Done);
        assert_eq!(outcome.awarded[0].winner.driver, "Jane");
    }
}

/// Test that the cooldown only binds the cooldown sponsor
#[test]
fn test_cooldown_ignores_other_sponsors() {
    let ctx = jane_context(season(12, 12));
    let prizes = vec![Prize::per_race("AAF", "Cash", 1, Decimal::from(50))];

    let outcome = ctx.run(prizes, &mut StdRng::seed_from_u64(1));

    assert_eq!(outcome.status, RaffleStatus::Done);
    assert_eq!(outcome.awarded[0].winner.driver, "Jane");
}

/// Test that an empty season never cools anyone down
#[test]
fn test_empty_history_has_no_cooldown() {
    let ctx = jane_context(WinnerHistory::default());
    let outcome = ctx.run(vec![toyo_prize()], &mut StdRng::seed_from_u64(2));
    assert_eq!(outcome.status, RaffleStatus::Done);
}

/// Test the cooldown early in a season
///
/// A race 1 winner sits out race 2 and every race up to race 10, whatever
/// the number of records on file.
#[test]
fn test_early_season_winner_sits_out() {
    for races in [1, 3, 9] {
        let ctx = jane_context(season(races, 1));
        let outcome = ctx.run(vec![toyo_prize()], &mut StdRng::seed_from_u64(races as u64));

        assert_eq!(
            outcome.status,
            RaffleStatus::Failed,
            "race 1 win should still count after {} races",
            races
        );
    }

    let ctx = jane_context(season(10, 1));
    let outcome = ctx.run(vec![toyo_prize()], &mut StdRng::seed_from_u64(10));
    assert_eq!(outcome.status, RaffleStatus::Done);
}

/// Test the window against race numbers with gaps
///
/// Only races 3 and 13 are on file. The draw is for race 14, so a win in race 3
/// is out of the window even though it is the previous record.
#[test]
fn test_window_counts_race_numbers_not_records() {
    let history = WinnerHistory::new(vec![
        HistoryRecord::new(3, "Opener").with_winner("Toyo", "Jane"),
        HistoryRecord::new(13, "Finale").with_winner("Toyo", "Other"),
    ]);
    assert!(!history.in_cooldown("Jane", "Toyo", 9));

    let history = WinnerHistory::new(vec![
        HistoryRecord::new(6, "Opener").with_winner("Toyo", "Jane"),
        HistoryRecord::new(13, "Finale").with_winner("Toyo", "Other"),
    ]);
    assert!(history.in_cooldown("Jane", "Toyo", 9));
}
