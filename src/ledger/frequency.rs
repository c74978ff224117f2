use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::{shift_month, shift_year};

/// Average number of weeks in a month used for weekly normalization.
pub const WEEKS_PER_MONTH: f64 = 4.33;
/// Average number of fortnights in a month used for biweekly normalization.
pub const FORTNIGHTS_PER_MONTH: f64 = 2.17;

/// Cadence at which a recurring item falls due.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
    /// Cadence written by a client this build does not understand.
    #[serde(other)]
    Unknown,
}

impl Frequency {
    /// Converts a per-cycle amount into its monthly equivalent.
    ///
    /// Unknown cadences pass the amount through unchanged.
    pub fn monthly_equivalent(&self, amount: f64) -> f64 {
        match self {
            Frequency::Weekly => amount * WEEKS_PER_MONTH,
            Frequency::Biweekly => amount * FORTNIGHTS_PER_MONTH,
            Frequency::Monthly => amount,
            Frequency::Quarterly => amount / 3.0,
            Frequency::Yearly => amount / 12.0,
            Frequency::Unknown => amount,
        }
    }

    /// Moves `from` forward by exactly one cycle. Returns `None` for unknown cadences
    /// and when the step would leave the representable calendar.
    pub fn advance(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Weekly => from.checked_add_signed(Duration::days(7)),
            Frequency::Biweekly => from.checked_add_signed(Duration::days(14)),
            Frequency::Monthly => Some(shift_month(from, 1)),
            Frequency::Quarterly => Some(shift_month(from, 3)),
            Frequency::Yearly => Some(shift_year(from, 1)),
            Frequency::Unknown => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Biweekly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Yearly => "Yearly",
            Frequency::Unknown => "Unknown",
        }
    }

    pub const ALL: [Frequency; 5] = [
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Yearly,
    ];
}

/// Free-function form of [`Frequency::monthly_equivalent`].
pub fn to_monthly_equivalent(amount: f64, frequency: Frequency) -> f64 {
    frequency.monthly_equivalent(amount)
}
