use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Width of each fixed band in whole currency units.
pub const BAND_WIDTH: Decimal = Decimal::from_parts(500_000, 0, 0, false, 0);

/// A position in the progressive schedule.
///
/// The first five bands are each [`BAND_WIDTH`] wide; `Other` covers all
/// income above the fifth band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Other,
}

impl Band {
    /// Every band in schedule order.
    pub const ALL: [Band; 6] = [
        Band::First,
        Band::Second,
        Band::Third,
        Band::Fourth,
        Band::Fifth,
        Band::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::First => "First 500,000",
            Self::Second => "Second 500,000",
            Self::Third => "Third 500,000",
            Self::Fourth => "Fourth 500,000",
            Self::Fifth => "Fifth 500,000",
            Self::Other => "Other",
        }
    }

    /// Fixed width of the band, `None` for the unbounded `Other` band.
    pub fn width(&self) -> Option<Decimal> {
        match self {
            Self::Other => None,
            _ => Some(BAND_WIDTH),
        }
    }
}

/// Marginal rates of the schedule, each a whole percentage in `[1, 100]`.
///
/// Rates are not required to be non-decreasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBrackets {
    pub first: Decimal,
    pub second: Decimal,
    pub third: Decimal,
    pub fourth: Decimal,
    pub fifth: Decimal,
    pub other: Decimal,
}

impl TaxBrackets {
    pub fn rate(
        &self,
        band: Band,
    ) -> Decimal {
        match band {
            Band::First => self.first,
            Band::Second => self.second,
            Band::Third => self.third,
            Band::Fourth => self.fourth,
            Band::Fifth => self.fifth,
            Band::Other => self.other,
        }
    }

    pub fn set_rate(
        &mut self,
        band: Band,
        rate: Decimal,
    ) {
        let slot = match band {
            Band::First => &mut self.first,
            Band::Second => &mut self.second,
            Band::Third => &mut self.third,
            Band::Fourth => &mut self.fourth,
            Band::Fifth => &mut self.fifth,
            Band::Other => &mut self.other,
        };
        *slot = rate;
    }

    /// Rates paired with their band, in schedule order.
    pub fn iter(&self) -> impl Iterator<Item = (Band, Decimal)> + '_ {
        Band::ALL.into_iter().map(|band| (band, self.rate(band)))
    }
}
