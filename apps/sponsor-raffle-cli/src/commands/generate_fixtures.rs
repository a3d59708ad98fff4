use crate::config::RaffleConfig;
use crate::error::{CliError, CliResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use sponsor_raffle_csvs::{
    write_cars_csv, write_history_csv, write_results_csv, write_sponsors_csv, CarRow, CarsTable,
    HistoryRow, HistoryTable, ResultRow, SponsorRow, WinnerCell,
};
use sponsor_raffle_engine::{DEFAULT_COOLDOWN_LOOKBACK, DEFAULT_MAX_ROUNDS};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "raffle.yaml";

const EVENT_NAME: &str = "Fixture Weekend";
const PREVIOUS_EVENT_NAME: &str = "Season Opener";
const COOLDOWN_SPONSOR: &str = "Toyo";
const HIGHEST_CAR_NUMBER: usize = 99;

/// (sponsor, prize type, per race, per race count, per weekend, per weekend count)
const SPONSORS: &[(&str, &str, i64, u32, i64, u32)] = &[
    ("Toyo", "Toyo Bucks", 0, 1, 0, 0),
    ("AAF", "Cash", 50, 1, 100, 1),
    ("Griots", "Gift Card", 25, 1, 0, 0),
    ("Hawk", "Brake Pads", 0, 0, 200, 1),
    ("_425", "Cash", 25, 1, 0, 0),
];

/// Generate a deterministic sample event directory
pub fn execute(
    output_dir: PathBuf,
    seed: u64,
    car_count: usize,
    driver_count: usize,
    race_count: u32,
) -> CliResult<()> {
    if car_count == 0 || car_count > HIGHEST_CAR_NUMBER {
        return Err(CliError::InvalidConfig(format!(
            "cars must be between 1 and {}",
            HIGHEST_CAR_NUMBER
        )));
    }
    if driver_count == 0 || race_count == 0 {
        return Err(CliError::InvalidConfig(
            "drivers and races must be at least 1".to_string(),
        ));
    }

    println!("Generating fixtures with seed {}", seed);
    println!(
        "{} cars, {} drivers, {} races",
        car_count, driver_count, race_count
    );

    let mut rng = StdRng::seed_from_u64(seed);
    fs::create_dir_all(&output_dir)?;

    let drivers = generate_driver_names(driver_count);
    let cars = generate_car_numbers(&mut rng, car_count);

    // Drivers beyond the car count share cars
    let seats: Vec<(&str, &str)> = drivers
        .iter()
        .enumerate()
        .map(|(i, driver)| (driver.as_str(), cars[i % cars.len()].as_str()))
        .collect();

    println!("\n📋 Generating car roster...");
    let cars_table = generate_cars_table(&mut rng, &cars, &seats);
    write_cars_csv(output_dir.join("cars.csv"), &cars_table)?;

    println!("📋 Generating race results...");
    let mut results_files = Vec::new();
    for race in 1..=race_count {
        let file = PathBuf::from(format!("results{}.csv", race));
        let rows = generate_results(&mut rng, &seats);
        write_results_csv(
            output_dir.join(&file),
            &format!("PRO3 Race {} Results", race),
            &rows,
        )?;
        results_files.push(file);
    }

    println!("📋 Generating sponsor prizes...");
    write_sponsors_csv(output_dir.join("sponsors.csv"), &sponsor_rows())?;

    println!("📋 Generating winner history...");
    let history = generate_history(&mut rng, &drivers);
    write_history_csv(output_dir.join("winners.csv"), &history)?;

    let config = RaffleConfig {
        event_name: EVENT_NAME.to_string(),
        cars_file: PathBuf::from("cars.csv"),
        results_files,
        sponsors_file: PathBuf::from("sponsors.csv"),
        history_file: Some(PathBuf::from("winners.csv")),
        participating_class: "PRO3".to_string(),
        did_not_start_marker: "DNS".to_string(),
        cooldown_sponsor: Some(COOLDOWN_SPONSOR.to_string()),
        cooldown_lookback: DEFAULT_COOLDOWN_LOOKBACK,
        max_rounds: DEFAULT_MAX_ROUNDS,
        seed: Some(seed),
        payout_schedule: None,
        sponsor_display_names: [
            ("Toyo".to_string(), "Toyo Tires".to_string()),
            ("_425".to_string(), "425 Motorsports".to_string()),
        ]
        .into_iter()
        .collect(),
    };
    fs::write(output_dir.join(CONFIG_FILE), serde_yaml::to_string(&config)?)?;

    println!("\n🎉 Fixture generation completed!");
    println!(
        "Try: sponsor-raffle draw --config {}",
        output_dir.join(CONFIG_FILE).display()
    );

    Ok(())
}

fn generate_driver_names(count: usize) -> Vec<String> {
    let base_names = [
        "Jane Doe",
        "Sam Roe",
        "Alex Poe",
        "Lee Moe",
        "Mia Coe",
        "Kai Loe",
        "Noor Hale",
        "Ravi Stone",
        "Ines Park",
        "Theo Lund",
        "Ada Quinn",
        "Omar Reyes",
    ];

    (0..count)
        .map(|i| match base_names.get(i) {
            Some(name) => name.to_string(),
            None => format!("Driver {}", i + 1),
        })
        .collect()
}

fn generate_car_numbers<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    let numbers: Vec<usize> = (1..=HIGHEST_CAR_NUMBER).collect();
    let mut picked: Vec<usize> = numbers.choose_multiple(rng, count).copied().collect();
    picked.sort_unstable();
    picked.iter().map(usize::to_string).collect()
}

fn generate_cars_table<R: Rng + ?Sized>(
    rng: &mut R,
    cars: &[String],
    seats: &[(&str, &str)],
) -> CarsTable {
    let sponsors: Vec<String> = SPONSORS.iter().map(|s| s.0.to_string()).collect();

    let rows = cars
        .iter()
        .map(|car| {
            let driver = seats
                .iter()
                .find(|(_, seat_car)| *seat_car == car.as_str())
                .map(|(driver, _)| driver.to_string())
                .unwrap_or_default();
            let stickers: BTreeMap<String, bool> = sponsors
                .iter()
                .map(|sponsor| (sponsor.clone(), rng.gen_bool(0.75)))
                .collect();
            CarRow {
                car: car.clone(),
                driver,
                stickers,
            }
        })
        .collect();

    CarsTable { sponsors, rows }
}

/// Results of one race: most seats start, a few are DNS, plus one car from
/// another class sharing the track
fn generate_results<R: Rng + ?Sized>(rng: &mut R, seats: &[(&str, &str)]) -> Vec<ResultRow> {
    let mut starters: Vec<&(&str, &str)> = seats.iter().filter(|_| rng.gen_bool(0.9)).collect();
    starters.shuffle(rng);

    let mut rows = Vec::new();
    let mut position = 0;
    for (driver, car) in starters {
        let gap = if rng.gen_bool(0.05) {
            "DNS".to_string()
        } else if position == 0 {
            "-".to_string()
        } else {
            format!("+{:.1}", rng.gen_range(0.1..30.0))
        };
        position += 1;
        rows.push(ResultRow {
            driver: driver.to_string(),
            position: Some(position),
            car: car.to_string(),
            class: "PRO3".to_string(),
            gap,
        });
    }

    rows.push(ResultRow {
        driver: "Guest Driver".to_string(),
        position: Some(1),
        car: "100".to_string(),
        class: "E0".to_string(),
        gap: "-".to_string(),
    });

    rows
}

fn sponsor_rows() -> Vec<SponsorRow> {
    SPONSORS
        .iter()
        .map(
            |&(sponsor, prize_type, per_race, per_race_count, per_weekend, per_weekend_count)| {
                SponsorRow {
                    sponsor: sponsor.to_string(),
                    prize_type: prize_type.to_string(),
                    per_race: Decimal::from(per_race),
                    per_race_count,
                    per_weekend: Decimal::from(per_weekend),
                    per_weekend_count,
                }
            },
        )
        .collect()
}

/// A previous two-race event so the cooldown has something to look at
fn generate_history<R: Rng + ?Sized>(rng: &mut R, drivers: &[String]) -> HistoryTable {
    let sponsors: Vec<String> = SPONSORS.iter().map(|s| s.0.to_string()).collect();

    let weekend = winners(rng, drivers, &[("AAF", "Cash")]);
    let race_prizes = [(COOLDOWN_SPONSOR, "Toyo Bucks"), ("Griots", "Gift Card")];
    let race_one = winners(rng, drivers, &race_prizes);
    let race_two = winners(rng, drivers, &race_prizes);

    HistoryTable {
        sponsors,
        rows: vec![
            HistoryRow {
                event: PREVIOUS_EVENT_NAME.to_string(),
                race: None,
                winners: weekend,
            },
            HistoryRow {
                event: String::new(),
                race: Some(1),
                winners: race_one,
            },
            HistoryRow {
                event: String::new(),
                race: Some(2),
                winners: race_two,
            },
        ],
    }
}

fn winners<R: Rng + ?Sized>(
    rng: &mut R,
    drivers: &[String],
    prizes: &[(&str, &str)],
) -> BTreeMap<String, WinnerCell> {
    prizes
        .iter()
        .filter_map(|(sponsor, note)| {
            drivers.choose(rng).map(|driver| {
                (
                    sponsor.to_string(),
                    WinnerCell {
                        driver: driver.clone(),
                        note: Some(note.to_string()),
                    },
                )
            })
        })
        .collect()
}
