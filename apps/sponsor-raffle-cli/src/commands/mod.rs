pub mod convert_history;
pub mod draw_raffle;
pub mod generate_fixtures;
