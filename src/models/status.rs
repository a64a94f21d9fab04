use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, FromRepr};

/// Stock status codes as carried on the wire.
///
/// The numeric codes are fixed by the backend; serialization round-trips
/// through the raw integer rather than the variant name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, FromRepr,
)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum StockStatus {
    #[strum(serialize = "OK")]
    Ok = 10,
    Attention = 50,
    Damaged = 55,
    Destroyed = 60,
    Rejected = 65,
    Lost = 70,
    Quarantined = 75,
    Returned = 85,
}

impl Default for StockStatus {
    fn default() -> Self {
        StockStatus::Ok
    }
}

impl From<StockStatus> for u16 {
    fn from(status: StockStatus) -> Self {
        status as u16
    }
}

impl TryFrom<u16> for StockStatus {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        StockStatus::from_repr(code).ok_or_else(|| format!("unknown stock status code {}", code))
    }
}

impl StockStatus {
    /// Badge color used by the status indicator.
    pub fn color(&self) -> BadgeColor {
        match self {
            StockStatus::Ok => BadgeColor::Green,
            StockStatus::Attention | StockStatus::Returned => BadgeColor::Yellow,
            StockStatus::Damaged | StockStatus::Destroyed | StockStatus::Rejected => {
                BadgeColor::Red
            }
            StockStatus::Lost => BadgeColor::Gray,
            StockStatus::Quarantined => BadgeColor::Blue,
        }
    }
}

/// Renderer-agnostic badge color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Blue,
    Green,
    Yellow,
    Red,
    Gray,
}
