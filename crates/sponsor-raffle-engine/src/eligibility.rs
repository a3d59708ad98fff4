/*!
# Eligibility Evaluator

A drive is a candidate for a prize when all of the following hold:

1. per-race prizes only: the drive is in the prize's race
2. the drive's car displays the prize sponsor's sticker (unknown cars display none)
3. the driver has not won anything else in this round
4. the driver has not won this sponsor's prize before, in this round or an earlier one
5. cooldown sponsor only: the driver is outside the cooldown window
*/

use std::collections::HashSet;

use crate::raffle::RaffleContext;
use crate::types::{Drive, DriverName, Prize, PrizeAward, PrizeScope};

/// Exclusions accumulated while one round is drawn
///
/// Lives for exactly one round. Awards from earlier rounds are only consulted
/// for the same-sponsor rule.
#[derive(Debug)]
pub struct RoundState<'a> {
    prior_awards: &'a [PrizeAward],
    winners: HashSet<DriverName>,
    awards: Vec<PrizeAward>,
}

impl<'a> RoundState<'a> {
    pub fn new(prior_awards: &'a [PrizeAward]) -> Self {
        Self {
            prior_awards,
            winners: HashSet::new(),
            awards: Vec::new(),
        }
    }

    /// Driver already won a prize in this round
    pub fn has_won(&self, driver: &str) -> bool {
        self.winners.contains(driver)
    }

    /// Driver already won a prize from `sponsor` in this run
    pub fn has_won_from(&self, driver: &str, sponsor: &str) -> bool {
        self.prior_awards
            .iter()
            .chain(self.awards.iter())
            .any(|award| award.winner.driver == driver && award.prize.sponsor == sponsor)
    }

    pub fn record(&mut self, award: PrizeAward) {
        self.winners.insert(award.winner.driver.clone());
        self.awards.push(award);
    }

    pub fn into_awards(self) -> Vec<PrizeAward> {
        self.awards
    }
}

/// Whether `drive` may win `prize` given the round so far
pub fn is_candidate(ctx: &RaffleContext, prize: &Prize, drive: &Drive, state: &RoundState) -> bool {
    if let PrizeScope::Race(race) = prize.scope {
        if drive.race != race {
            return false;
        }
    }

    if !ctx.roster().has_sticker(&drive.car, &prize.sponsor) {
        return false;
    }

    if state.has_won(&drive.driver) || state.has_won_from(&drive.driver, &prize.sponsor) {
        return false;
    }

    let rules = ctx.rules();
    if rules.is_cooldown_sponsor(&prize.sponsor)
        && ctx
            .history()
            .in_cooldown(&drive.driver, &prize.sponsor, rules.cooldown_lookback)
    {
        return false;
    }

    true
}

/// Every drive that may win `prize`, in drive-list order
pub fn candidates<'c>(ctx: &'c RaffleContext, prize: &Prize, state: &RoundState) -> Vec<&'c Drive> {
    ctx.drives()
        .iter()
        .filter(|drive| is_candidate(ctx, prize, drive, state))
        .collect()
}
