/*!
# Round Drawer

Draws every prize of a pool once, in pool order. Each prize goes to a drive
picked uniformly at random among its candidates, so a driver with more eligible
drives holds more tickets. Prizes without candidates are set aside for the next
round.
*/

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::eligibility::{candidates, RoundState};
use crate::raffle::RaffleContext;
use crate::types::{Prize, PrizeAward};

/// Awarded and set-aside prizes of one round
#[derive(Debug, Clone, Default)]
pub struct RoundResults {
    pub awarded: Vec<PrizeAward>,
    pub unawarded: Vec<Prize>,
}

/// Draw one round over `pool`
///
/// `prior_awards` are the awards of earlier rounds of the same run.
pub fn draw_round<R: Rng + ?Sized>(
    ctx: &RaffleContext,
    prior_awards: &[PrizeAward],
    pool: Vec<Prize>,
    rng: &mut R,
) -> RoundResults {
    let mut state = RoundState::new(prior_awards);
    let mut unawarded = Vec::new();

    for prize in pool {
        let winner = candidates(ctx, &prize, &state).choose(rng).map(|d| (*d).clone());

        match winner {
            Some(winner) => {
                debug!(
                    sponsor = %prize.sponsor,
                    prize_type = %prize.prize_type,
                    driver = %winner.driver,
                    car = %winner.car,
                    "Prize awarded"
                );
                state.record(PrizeAward { prize, winner });
            }
            None => {
                debug!(
                    sponsor = %prize.sponsor,
                    prize_type = %prize.prize_type,
                    "No eligible drive, prize set aside"
                );
                unawarded.push(prize);
            }
        }
    }

    RoundResults {
        awarded: state.into_awards(),
        unawarded,
    }
}
