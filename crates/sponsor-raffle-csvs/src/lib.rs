/*!
# Sponsor Raffle CSV Schema Definitions

This crate provides the **authoritative CSV schemas** used by the sponsor raffle.

## Purpose

This crate is the parsing boundary between the league's spreadsheets and the
drawing engine. Everything here is row-oriented: typed rows in, typed rows out.
The engine converts these rows into its own records and never sees raw text.

## Schema Files

### Cars CSV (`cars.csv`)
- `car`: Car number
- `driver`: Registered driver (informational)
- one column per sponsor, named by the sponsor; a non-empty cell marks the sticker

### Race results (`results1.csv`, `results2.csv`, ...)
RaceHero export without a header row. Positional columns:
driver, position, (ignored), car number, class, gap.

### Sponsors CSV (`sponsors.csv`)
- `sponsor`, `prize_type`
- `per_race`, `per_race_count`: amount and units awarded in every race
- `per_weekend`, `per_weekend_count`: amount and units awarded once per weekend

### Winner history (`winners.csv`)
- `event`, `race` (`Race N`, `N` or blank)
- one column per sponsor holding `Driver Name (note)`

### Awards CSV (`awards.csv`)
Output of a draw, one row per awarded prize.

## Usage

```rust
use sponsor_raffle_csvs::{read_cars_csv, read_sponsors_csv, CsvResult};

fn example() -> CsvResult<()> {
    let cars = read_cars_csv("cars.csv")?;
    let sponsors = read_sponsors_csv("sponsors.csv")?;
    println!("{} cars, {} sponsors", cars.rows.len(), sponsors.len());
    Ok(())
}
```
*/

pub mod errors;
pub mod schemas;
pub mod validation;

// Re-export main types for convenience
pub use errors::{CsvError, CsvResult};
pub use schemas::{
    parse_race_label, parse_sticker_flag, AwardRow, CarRow, HistoryRow, ResultRow, SponsorRow,
    WinnerCell,
};
pub use validation::{
    read_cars_csv, read_history_csv, read_results_csv, read_sponsors_csv, write_awards_csv,
    write_cars_csv, write_history_csv, write_results_csv, write_sponsors_csv, CarsTable,
    HistoryTable,
};
