use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

pub type CarNumber = String;
pub type DriverName = String;
pub type RaceId = u32;
pub type SponsorName = String;

// ================================================================================================
// Cars
// ================================================================================================

/// A car and the sponsor stickers it displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Car {
    pub number: CarNumber,
    pub stickers: BTreeSet<SponsorName>,
}

impl Car {
    pub fn new<I, S>(number: impl Into<CarNumber>, stickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SponsorName>,
    {
        Self {
            number: number.into(),
            stickers: stickers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_sticker(&self, sponsor: &str) -> bool {
        self.stickers.contains(sponsor)
    }
}

/// All cars of the event, keyed by car number
#[derive(Debug, Clone, Default)]
pub struct CarRoster {
    cars: HashMap<CarNumber, Car>,
}

impl CarRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a car, replacing any earlier car with the same number
    pub fn insert(&mut self, car: Car) -> Option<Car> {
        self.cars.insert(car.number.clone(), car)
    }

    pub fn get(&self, number: &str) -> Option<&Car> {
        self.cars.get(number)
    }

    pub fn contains(&self, number: &str) -> bool {
        self.cars.contains_key(number)
    }

    /// Unknown cars carry no stickers
    pub fn has_sticker(&self, number: &str, sponsor: &str) -> bool {
        self.get(number).is_some_and(|car| car.has_sticker(sponsor))
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}

impl FromIterator<Car> for CarRoster {
    fn from_iter<T: IntoIterator<Item = Car>>(iter: T) -> Self {
        let mut roster = CarRoster::new();
        for car in iter {
            roster.insert(car);
        }
        roster
    }
}

// ================================================================================================
// Drives
// ================================================================================================

/// One driver's participation in one race, in one car
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Drive {
    pub driver: DriverName,
    pub car: CarNumber,
    pub race: RaceId,
}

impl Drive {
    pub fn new(driver: impl Into<DriverName>, car: impl Into<CarNumber>, race: RaceId) -> Self {
        Self {
            driver: driver.into(),
            car: car.into(),
            race,
        }
    }
}

// ================================================================================================
// Prizes
// ================================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Race,
    Weekend,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Race => write!(f, "race"),
            Frequency::Weekend => write!(f, "weekend"),
        }
    }
}

/// Where a prize can be won. Weekend prizes have no race to filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "frequency", content = "race", rename_all = "lowercase")]
pub enum PrizeScope {
    Race(RaceId),
    Weekend,
}

/// One unit of sponsor-funded award
///
/// Prizes have no identity beyond their position in a list; a catalog
/// routinely holds several equal prizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Prize {
    pub sponsor: SponsorName,
    pub prize_type: String,
    #[serde(flatten)]
    pub scope: PrizeScope,
    pub amount: Decimal,
}

impl Prize {
    pub fn per_race(
        sponsor: impl Into<SponsorName>,
        prize_type: impl Into<String>,
        race: RaceId,
        amount: Decimal,
    ) -> Self {
        Self {
            sponsor: sponsor.into(),
            prize_type: prize_type.into(),
            scope: PrizeScope::Race(race),
            amount,
        }
    }

    pub fn weekend(
        sponsor: impl Into<SponsorName>,
        prize_type: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            sponsor: sponsor.into(),
            prize_type: prize_type.into(),
            scope: PrizeScope::Weekend,
            amount,
        }
    }

    pub fn frequency(&self) -> Frequency {
        match self.scope {
            PrizeScope::Race(_) => Frequency::Race,
            PrizeScope::Weekend => Frequency::Weekend,
        }
    }

    pub fn race(&self) -> Option<RaceId> {
        match self.scope {
            PrizeScope::Race(race) => Some(race),
            PrizeScope::Weekend => None,
        }
    }
}

/// A prize paired with the drive that won it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrizeAward {
    pub prize: Prize,
    pub winner: Drive,
}
