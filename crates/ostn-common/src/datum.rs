//! Vertical datum flags carried by the OSGM02 geoid model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vertical datum region reported for a transformed height.
///
/// Each grid node of the correction dataset carries one of these codes. The
/// code identifies which local tide-gauge datum the orthometric height is
/// referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalDatum {
    /// Node lies outside the geoid model boundary
    OutsideModelBoundary,
    /// Ordnance Datum Newlyn (UK mainland)
    NewlynMainland,
    /// St Mary's (Isles of Scilly)
    StMarys,
    /// Douglas 02 (Isle of Man)
    Douglas,
    /// Stornoway (Outer Hebrides)
    Stornoway,
    /// St Kilda
    StKilda,
    /// Lerwick (Shetland Isles)
    Lerwick,
    /// Newlyn (Orkney Isles)
    NewlynOrkney,
    /// Fair Isle
    FairIsle,
    /// Flannan Isles
    FlannanIsles,
    /// North Rona
    NorthRona,
    /// Sule Skerry
    SuleSkerry,
    /// Foula
    Foula,
    /// Malin Head (Republic of Ireland)
    MalinHead,
    /// Belfast (Northern Ireland)
    Belfast,
}

impl VerticalDatum {
    /// Decode the integer flag stored in the correction dataset.
    pub fn from_code(code: u8) -> Result<Self, DatumCodeError> {
        let datum = match code {
            0 => Self::OutsideModelBoundary,
            1 => Self::NewlynMainland,
            2 => Self::StMarys,
            3 => Self::Douglas,
            4 => Self::Stornoway,
            5 => Self::StKilda,
            6 => Self::Lerwick,
            7 => Self::NewlynOrkney,
            8 => Self::FairIsle,
            9 => Self::FlannanIsles,
            10 => Self::NorthRona,
            11 => Self::SuleSkerry,
            12 => Self::Foula,
            13 => Self::MalinHead,
            14 => Self::Belfast,
            other => return Err(DatumCodeError::UnknownCode(other)),
        };
        Ok(datum)
    }

    /// The integer flag as stored in the correction dataset.
    pub fn code(&self) -> u8 {
        match self {
            Self::OutsideModelBoundary => 0,
            Self::NewlynMainland => 1,
            Self::StMarys => 2,
            Self::Douglas => 3,
            Self::Stornoway => 4,
            Self::StKilda => 5,
            Self::Lerwick => 6,
            Self::NewlynOrkney => 7,
            Self::FairIsle => 8,
            Self::FlannanIsles => 9,
            Self::NorthRona => 10,
            Self::SuleSkerry => 11,
            Self::Foula => 12,
            Self::MalinHead => 13,
            Self::Belfast => 14,
        }
    }

    /// Human readable datum name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OutsideModelBoundary => "Outside model boundary",
            Self::NewlynMainland => "Newlyn (UK mainland)",
            Self::StMarys => "St Mary's",
            Self::Douglas => "Douglas02",
            Self::Stornoway => "Stornoway",
            Self::StKilda => "St Kilda",
            Self::Lerwick => "Lerwick",
            Self::NewlynOrkney => "Newlyn (Orkney)",
            Self::FairIsle => "Fair Isle",
            Self::FlannanIsles => "Flannan Isles",
            Self::NorthRona => "North Rona",
            Self::SuleSkerry => "Sule Skerry",
            Self::Foula => "Foula",
            Self::MalinHead => "Malin Head",
            Self::Belfast => "Belfast",
        }
    }

    /// Whether the node has a usable geoid height.
    pub fn is_within_model(&self) -> bool {
        !matches!(self, Self::OutsideModelBoundary)
    }
}

impl fmt::Display for VerticalDatum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DatumCodeError {
    #[error("Unknown vertical datum code: {0}")]
    UnknownCode(u8),
}
