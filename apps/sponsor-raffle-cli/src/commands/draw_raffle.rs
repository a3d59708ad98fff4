use crate::config::{RaffleConfig, RaffleReport};
use crate::error::CliResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sponsor_raffle_csvs::{write_awards_csv, write_history_csv, HistoryTable};
use sponsor_raffle_engine::{
    award_rows, build_prize_catalog, group_awards, history_rows, listing_line, unknown_car_drives,
    unmatched_sponsors, PrizeDeclaration, RaffleContext, RaffleInputs, RaffleOutcome,
    RaffleStatus, RaffleSummary,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const AWARDS_JSON: &str = "awards.json";
pub const AWARDS_CSV: &str = "awards.csv";
pub const HISTORY_ROWS_CSV: &str = "history_rows.csv";

pub fn execute(config_path: PathBuf, seed: Option<u64>, output_dir: PathBuf) -> CliResult<()> {
    println!("🏁 Running sponsor raffle...");
    println!("Config file: {}", config_path.display());
    println!("Output directory: {}", output_dir.display());

    // Step 1: Load configuration
    let config = RaffleConfig::load(&config_path)?;
    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let rules = config.rules()?;
    println!("✅ Event: {}", config.event_name);

    // Step 2: Load inputs and run the soft consistency checks
    println!("\n📋 Loading event inputs...");
    let inputs = RaffleInputs::load(&config.input_paths(&base_dir), &config.drive_filter())?;
    let unknown = unknown_car_drives(&inputs.roster, &inputs.drives).len();
    let unmatched = unmatched_sponsors(&inputs.sticker_sponsors, &inputs.declarations, &rules).len();
    println!(
        "✅ Loaded {} cars, {} drives, {} prize declarations, {} history races",
        inputs.roster.len(),
        inputs.drives.len(),
        inputs.declarations.len(),
        inputs.history.len()
    );
    if unknown > 0 || unmatched > 0 {
        println!(
            "⚠️  {} drives in unknown cars, {} unmatched sponsor names (see log)",
            unknown, unmatched
        );
    }

    // Step 3: Build the prize catalog
    let seed = seed
        .or(config.seed)
        .unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, "Seeding raffle");
    let mut rng = StdRng::seed_from_u64(seed);

    let last_race = inputs.history.last_race();
    let history_sponsors = history_columns(&inputs.history_table, &inputs.declarations);
    let prizes = build_prize_catalog(&inputs.declarations, &inputs.drives, &rules, &mut rng);
    println!("\n🎁 Prize catalog: {} prizes (seed {})", prizes.len(), seed);

    // Step 4: Draw
    let ctx = RaffleContext::new(inputs.roster, inputs.drives, inputs.history, rules)?;
    let outcome = ctx.run(prizes, &mut rng);
    let summary = RaffleSummary::new(outcome.total_prizes(), ctx.drives(), &outcome.awarded);

    print_results(&outcome, &summary);

    // Step 5: Write outputs
    fs::create_dir_all(&output_dir)?;

    let report = RaffleReport {
        event: &config.event_name,
        seed,
        status: outcome.status,
        rounds: &outcome.rounds,
        summary: &summary,
        awards: &outcome.awarded,
        unawarded: &outcome.unawarded,
    };
    fs::write(
        output_dir.join(AWARDS_JSON),
        serde_json::to_string_pretty(&report)?,
    )?;

    write_awards_csv(output_dir.join(AWARDS_CSV), &award_rows(&outcome.awarded))?;

    let history = HistoryTable {
        sponsors: history_sponsors,
        rows: history_rows(&outcome.awarded, &config.event_name, last_race),
    };
    write_history_csv(output_dir.join(HISTORY_ROWS_CSV), &history)?;

    println!("\n💾 Wrote {}, {}, {}", AWARDS_JSON, AWARDS_CSV, HISTORY_ROWS_CSV);

    match outcome.status {
        RaffleStatus::Done => println!("\n🎉 Raffle completed!"),
        RaffleStatus::Failed => println!(
            "\n❌ Raffle failed: {} prizes left unclaimed after {} rounds",
            outcome.unawarded.len(),
            outcome.rounds.len()
        ),
    }

    Ok(())
}

fn print_results(outcome: &RaffleOutcome, summary: &RaffleSummary) {
    println!("\n🎲 Rounds:");
    for round in &outcome.rounds {
        println!(
            "  Round {}: {} prizes, {} awarded, {} left",
            round.round, round.pool_size, round.awarded, round.unawarded
        );
    }

    println!("\n📊 Summary:");
    println!("  - Total prizes: {}", summary.total_prizes);
    println!("  - Total drives: {}", summary.total_drives);
    println!("  - Unique drivers: {}", summary.unique_drivers);
    println!("  - Unique winners: {}", summary.unique_winners);
    for (driver, wins) in &summary.duplicate_winners {
        println!("  - {} won {} prizes", driver, wins);
    }

    println!("\n🏆 Winners:");
    for (label, winners) in group_awards(&outcome.awarded, &outcome.unawarded) {
        println!("  {}", listing_line(&label, &winners));
    }
}

/// Sponsor columns for the history rows: the season file's columns, then any
/// declared sponsor it does not have yet
fn history_columns(history: &HistoryTable, declarations: &[PrizeDeclaration]) -> Vec<String> {
    let mut columns = history.sponsors.clone();
    for declaration in declarations {
        if !columns.contains(&declaration.sponsor) {
            columns.push(declaration.sponsor.clone());
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::generate_fixtures;
    use rust_decimal::Decimal;
    use sponsor_raffle_csvs::read_history_csv;
    use tempfile::tempdir;

    fn declaration(sponsor: &str) -> PrizeDeclaration {
        PrizeDeclaration {
            sponsor: sponsor.to_string(),
            prize_type: "Cash".to_string(),
            per_race: Decimal::from(10),
            per_race_count: 1,
            per_weekend: Decimal::ZERO,
            per_weekend_count: 0,
        }
    }

    #[test]
    fn test_history_columns_append_new_sponsors() {
        let history = HistoryTable {
            sponsors: vec!["Toyo".to_string(), "AAF".to_string()],
            rows: vec![],
        };
        let declarations = vec![declaration("AAF"), declaration("Griots")];

        assert_eq!(
            history_columns(&history, &declarations),
            vec!["Toyo", "AAF", "Griots"]
        );
    }

    #[test]
    fn test_draw_on_generated_fixtures() {
        let dir = tempdir().unwrap();
        let event_dir = dir.path().join("event");
        let output_dir = dir.path().join("out");

        generate_fixtures::execute(event_dir.clone(), 7, 12, 16, 3).unwrap();
        execute(
            event_dir.join(generate_fixtures::CONFIG_FILE),
            Some(99),
            output_dir.clone(),
        )
        .unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output_dir.join(AWARDS_JSON)).unwrap())
                .unwrap();
        assert_eq!(report["seed"], 99);
        assert_eq!(report["event"], "Fixture Weekend");
        assert!(report["status"] == "DONE" || report["status"] == "FAILED");

        let awarded = report["awards"].as_array().unwrap().len();
        let unawarded = report["unawarded"].as_array().unwrap().len();
        assert_eq!(
            report["summary"]["total_prizes"].as_u64().unwrap() as usize,
            awarded + unawarded
        );

        let history = read_history_csv(output_dir.join(HISTORY_ROWS_CSV)).unwrap();
        assert_eq!(history.rows[0].event, "Fixture Weekend");
        assert!(output_dir.join(AWARDS_CSV).exists());
    }

    #[test]
    fn test_same_seed_same_report() {
        let dir = tempdir().unwrap();
        let event_dir = dir.path().join("event");
        generate_fixtures::execute(event_dir.clone(), 3, 10, 12, 2).unwrap();

        let run = |name: &str| {
            let output_dir = dir.path().join(name);
            execute(
                event_dir.join(generate_fixtures::CONFIG_FILE),
                Some(5),
                output_dir.clone(),
            )
            .unwrap();
            fs::read_to_string(output_dir.join(AWARDS_JSON)).unwrap()
        };

        assert_eq!(run("first"), run("second"));
    }
}
