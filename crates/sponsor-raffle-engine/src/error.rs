use thiserror::Error;

/// Errors that can abort a raffle run
///
/// Scarcity never shows up here: a prize nobody can win is data
/// (it stays unawarded), not an error.
#[derive(Debug, Error)]
pub enum RaffleError {
    #[error("CSV error: {0}")]
    Csv(#[from] sponsor_raffle_csvs::CsvError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid payout schedule: {0}")]
    InvalidPayoutSchedule(String),

    #[error("No drives found in any results file")]
    NoDrives,
}

pub type RaffleResult<T> = Result<T, RaffleError>;
