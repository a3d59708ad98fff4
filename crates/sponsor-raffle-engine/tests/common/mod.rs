#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use sponsor_raffle_engine::{
    Car, CarRoster, Drive, PrizeDeclaration, RaffleContext, RaffleRules, WinnerHistory,
};

pub const SPONSORS: &[&str] = &["Toyo", "AAF", "Griots", "Redline", "RoR"];

/// A weekend of `races` races with `drivers` drivers sharing `cars` cars
pub struct Weekend {
    pub roster: CarRoster,
    pub drives: Vec<Drive>,
}

/// Deterministic, reasonably messy weekend: random stickers, car sharing,
/// drivers skipping races, one drive in a car missing from the roster
pub fn weekend(seed: u64, cars: usize, drivers: usize, races: u32) -> Weekend {
    let mut rng = StdRng::seed_from_u64(seed);

    let roster: CarRoster = (0..cars)
        .map(|i| {
            let stickers: Vec<&str> = SPONSORS
                .iter()
                .copied()
                .filter(|_| rng.gen_bool(0.7))
                .collect();
            Car::new(format!("{}", i + 1), stickers)
        })
        .collect();

    let mut drives = Vec::new();
    for race in 1..=races {
        for d in 0..drivers {
            if rng.gen_bool(0.85) {
                let car = rng.gen_range(1..=cars);
                drives.push(Drive::new(format!("Driver {}", d + 1), car.to_string(), race));
            }
        }
    }
    drives.push(Drive::new("Stranger", "999", 1));

    Weekend { roster, drives }
}

pub fn declaration(sponsor: &str, per_race_count: u32, per_weekend_count: u32) -> PrizeDeclaration {
    PrizeDeclaration {
        sponsor: sponsor.to_string(),
        prize_type: "Cash".to_string(),
        per_race: Decimal::from(50),
        per_race_count,
        per_weekend: Decimal::from(150),
        per_weekend_count,
    }
}

pub fn declarations() -> Vec<PrizeDeclaration> {
    vec![
        declaration("Toyo", 1, 0),
        declaration("AAF", 2, 1),
        declaration("Griots", 1, 1),
        declaration("Redline", 1, 0),
        declaration("RoR", 3, 2),
    ]
}

pub fn context(weekend: &Weekend, history: WinnerHistory) -> RaffleContext {
    RaffleContext::new(
        weekend.roster.clone(),
        weekend.drives.clone(),
        history,
        RaffleRules::with_cooldown_sponsor("Toyo"),
    )
    .unwrap()
}
