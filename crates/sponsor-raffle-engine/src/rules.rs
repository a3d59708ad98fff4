/*!
# Raffle Rules

Configuration knobs of a draw: which sponsor carries the cooldown restriction,
how far back the cooldown looks, how many rounds the controller may run, and the
participation-based payout schedule of the cooldown sponsor.
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{RaffleError, RaffleResult};
use crate::types::SponsorName;

/// Rounds run before the controller gives up on the remaining prizes
pub const DEFAULT_MAX_ROUNDS: usize = 5;

/// Races a cooldown sponsor's winner sits out. Half a season plus one, so
/// nobody wins the sponsor's prize more than twice a season.
pub const DEFAULT_COOLDOWN_LOOKBACK: usize = 9;

/// Default cooldown payout: (minimum drives in the race, amount)
const DEFAULT_PAYOUT_TIERS: &[(usize, i64)] = &[
    (0, 0),
    (3, 85),
    (6, 175),
    (11, 265),
    (16, 355),
    (21, 440),
    (25, 550),
    (31, 600),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutTier {
    /// Smallest race participation count paying `amount`
    pub min_drives: usize,
    pub amount: Decimal,
}

/// Step function from race participation to prize amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayoutSchedule {
    tiers: Vec<PayoutTier>,
}

impl PayoutSchedule {
    /// Tiers must start at zero drives and be strictly ascending
    pub fn new(tiers: Vec<PayoutTier>) -> RaffleResult<Self> {
        match tiers.first() {
            None => {
                return Err(RaffleError::InvalidPayoutSchedule(
                    "at least one tier is required".to_string(),
                ))
            }
            Some(first) if first.min_drives != 0 => {
                return Err(RaffleError::InvalidPayoutSchedule(format!(
                    "first tier must start at 0 drives, found {}",
                    first.min_drives
                )))
            }
            Some(_) => {}
        }

        for pair in tiers.windows(2) {
            if pair[1].min_drives <= pair[0].min_drives {
                return Err(RaffleError::InvalidPayoutSchedule(format!(
                    "tiers must be strictly ascending, found {} after {}",
                    pair[1].min_drives, pair[0].min_drives
                )));
            }
        }

        if let Some(tier) = tiers.iter().find(|t| t.amount.is_sign_negative()) {
            return Err(RaffleError::InvalidPayoutSchedule(format!(
                "negative amount {} for {}+ drives",
                tier.amount, tier.min_drives
            )));
        }

        Ok(Self { tiers })
    }

    /// Amount paid for a race with `drives` participants
    pub fn amount_for(&self, drives: usize) -> Decimal {
        self.tiers
            .iter()
            .take_while(|tier| tier.min_drives <= drives)
            .last()
            .map(|tier| tier.amount)
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for PayoutSchedule {
    fn default() -> Self {
        Self {
            tiers: DEFAULT_PAYOUT_TIERS
                .iter()
                .map(|&(min_drives, amount)| PayoutTier {
                    min_drives,
                    amount: Decimal::from(amount),
                })
                .collect(),
        }
    }
}

/// Rules applied to one raffle run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaffleRules {
    /// Sponsor whose prizes use the cooldown and the payout schedule
    pub cooldown_sponsor: Option<SponsorName>,
    pub cooldown_lookback: usize,
    pub max_rounds: usize,
    pub payout_schedule: PayoutSchedule,
}

impl RaffleRules {
    pub fn with_cooldown_sponsor(sponsor: impl Into<SponsorName>) -> Self {
        Self {
            cooldown_sponsor: Some(sponsor.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> RaffleResult<()> {
        if self.max_rounds == 0 {
            return Err(RaffleError::InvalidConfig(
                "max_rounds must be at least 1".to_string(),
            ));
        }

        if matches!(&self.cooldown_sponsor, Some(sponsor) if sponsor.trim().is_empty()) {
            return Err(RaffleError::InvalidConfig(
                "cooldown_sponsor must not be blank".to_string(),
            ));
        }

        Ok(())
    }

    pub fn is_cooldown_sponsor(&self, sponsor: &str) -> bool {
        self.cooldown_sponsor.as_deref() == Some(sponsor)
    }
}

impl Default for RaffleRules {
    fn default() -> Self {
        Self {
            cooldown_sponsor: None,
            cooldown_lookback: DEFAULT_COOLDOWN_LOOKBACK,
            max_rounds: DEFAULT_MAX_ROUNDS,
            payout_schedule: PayoutSchedule::default(),
        }
    }
}
