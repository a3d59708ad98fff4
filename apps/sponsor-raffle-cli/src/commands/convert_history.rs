use crate::config::RaffleConfig;
use crate::error::CliResult;
use chrono::Utc;
use sponsor_raffle_csvs::read_history_csv;
use sponsor_raffle_engine::AwardRegistry;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

pub fn execute(
    history_csv_in: PathBuf,
    user: String,
    registry_json_out: PathBuf,
    config: Option<PathBuf>,
) -> CliResult<()> {
    println!("📚 Converting winner history...");
    println!("History file: {}", history_csv_in.display());
    println!("Output file: {}", registry_json_out.display());

    let display_names = match config {
        Some(path) => RaffleConfig::load(&path)?.sponsor_display_names,
        None => BTreeMap::new(),
    };

    let history = read_history_csv(&history_csv_in)?;
    println!(
        "✅ Loaded {} history rows across {} sponsors",
        history.rows.len(),
        history.sponsors.len()
    );

    let registry = AwardRegistry::from_history(&history.rows, &user, Utc::now(), &display_names);
    fs::write(&registry_json_out, serde_json::to_string_pretty(&registry)?)?;

    println!(
        "🎉 Wrote {} awards in {} events",
        registry.award_count(),
        registry.records.len()
    );

    Ok(())
}
