//! Closed vocabularies shared by the validators and the builders.
//!
//! Integer and string wire values match the modeling engine, so these types
//! serialize straight into engine payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BmdsError;

/// Dataset type tag supplied by the caller on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetType {
    #[serde(rename = "D")]
    Dichotomous,
    #[serde(rename = "C")]
    Continuous,
    #[serde(rename = "CI")]
    ContinuousIndividual,
    #[serde(rename = "ND")]
    NestedDichotomous,
    #[serde(rename = "MT")]
    MultiTumor,
}

/// Family a dataset type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    Dichotomous,
    Continuous,
    NestedDichotomous,
}

impl DatasetType {
    pub const ALL: [DatasetType; 5] = [
        DatasetType::Dichotomous,
        DatasetType::Continuous,
        DatasetType::ContinuousIndividual,
        DatasetType::NestedDichotomous,
        DatasetType::MultiTumor,
    ];

    /// Wire tag, e.g. `"CI"`.
    pub fn tag(&self) -> &'static str {
        match self {
            DatasetType::Dichotomous => "D",
            DatasetType::Continuous => "C",
            DatasetType::ContinuousIndividual => "CI",
            DatasetType::NestedDichotomous => "ND",
            DatasetType::MultiTumor => "MT",
        }
    }

    /// Multi-tumor analyses are built from dichotomous datasets.
    pub fn family(&self) -> ModelFamily {
        match self {
            DatasetType::Dichotomous | DatasetType::MultiTumor => ModelFamily::Dichotomous,
            DatasetType::Continuous | DatasetType::ContinuousIndividual => ModelFamily::Continuous,
            DatasetType::NestedDichotomous => ModelFamily::NestedDichotomous,
        }
    }

    pub fn is_dichotomous(&self) -> bool {
        self.family() == ModelFamily::Dichotomous
    }

    pub fn is_continuous(&self) -> bool {
        self.family() == ModelFamily::Continuous
    }
}

impl FromStr for DatasetType {
    type Err = BmdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetType::ALL
            .into_iter()
            .find(|d| d.tag() == s)
            .ok_or_else(|| BmdsError::UnknownDatasetType(s.to_string()))
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Prior regime requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorClassTag {
    FrequentistRestricted,
    FrequentistUnrestricted,
    Bayesian,
}

impl PriorClassTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorClassTag::FrequentistRestricted => "frequentist_restricted",
            PriorClassTag::FrequentistUnrestricted => "frequentist_unrestricted",
            PriorClassTag::Bayesian => "bayesian",
        }
    }

    /// Engine prior class for this tag.
    pub fn prior_class(&self) -> PriorClass {
        match self {
            PriorClassTag::FrequentistRestricted => PriorClass::FrequentistRestricted,
            PriorClassTag::FrequentistUnrestricted => PriorClass::FrequentistUnrestricted,
            PriorClassTag::Bayesian => PriorClass::Bayesian,
        }
    }
}

impl FromStr for PriorClassTag {
    type Err = BmdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frequentist_restricted" => Ok(PriorClassTag::FrequentistRestricted),
            "frequentist_unrestricted" => Ok(PriorClassTag::FrequentistUnrestricted),
            "bayesian" => Ok(PriorClassTag::Bayesian),
            other => Err(BmdsError::UnknownPriorClass(other.to_string())),
        }
    }
}

impl fmt::Display for PriorClassTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine-side prior class identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum PriorClass {
    FrequentistUnrestricted = 0,
    FrequentistRestricted = 1,
    Bayesian = 2,
}

/// Direction of an adverse effect for continuous data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum AdverseDirection {
    Automatic = -1,
    Down = 0,
    Up = 1,
}

impl AdverseDirection {
    /// Parse a wire value, rejecting anything outside {-1, 0, 1}.
    pub fn from_code(code: i64) -> Result<Self, BmdsError> {
        Self::try_from(code).map_err(|_| BmdsError::UnknownAdverseDirection(code))
    }

    /// Tri-state `is_increasing` flag consumed by continuous settings.
    pub fn is_increasing(&self) -> Option<bool> {
        match self {
            AdverseDirection::Automatic => None,
            AdverseDirection::Up => Some(true),
            AdverseDirection::Down => Some(false),
        }
    }
}

/// Benchmark response type for dichotomous models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum DichotomousRiskType {
    AddedRisk = 0,
    ExtraRisk = 1,
}

/// Benchmark response type for continuous models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ContinuousRiskType {
    AbsoluteDeviation = 1,
    StandardDeviation = 2,
    RelativeDeviation = 3,
    PointEstimate = 4,
    Extra = 5,
    HybridExtra = 6,
    HybridAdded = 7,
}

/// Response distribution assumed by continuous models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum DistType {
    Normal = 1,
    NormalNcv = 2,
    LogNormal = 3,
}

/// Litter-specific covariate handling for nested dichotomous models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum LitterSpecificCovariate {
    Unused = 0,
    OverallMean = 1,
    ControlGroupMean = 2,
}

/// Integer-coded enums: conversions in both directions plus the list of
/// accepted wire values, which the options validator reports on failure.
macro_rules! int_enum {
    ($ty:ident, $err:expr, [$($variant:ident),+ $(,)?]) => {
        impl $ty {
            pub const VALUES: &'static [i64] = &[$($ty::$variant as i64),+];
        }

        impl TryFrom<i64> for $ty {
            type Error = String;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                $(
                    if value == $ty::$variant as i64 {
                        return Ok($ty::$variant);
                    }
                )+
                Err(format!("{} {}", $err, value))
            }
        }

        impl From<$ty> for i64 {
            fn from(value: $ty) -> i64 {
                value as i64
            }
        }
    };
}

int_enum!(PriorClass, "unknown prior class", [FrequentistUnrestricted, FrequentistRestricted, Bayesian]);
int_enum!(AdverseDirection, "unknown adverse direction", [Automatic, Down, Up]);
int_enum!(DichotomousRiskType, "unknown dichotomous risk type", [AddedRisk, ExtraRisk]);
int_enum!(
    ContinuousRiskType,
    "unknown continuous risk type",
    [
        AbsoluteDeviation,
        StandardDeviation,
        RelativeDeviation,
        PointEstimate,
        Extra,
        HybridExtra,
        HybridAdded,
    ]
);
int_enum!(DistType, "unknown distribution type", [Normal, NormalNcv, LogNormal]);
int_enum!(
    LitterSpecificCovariate,
    "unknown litter specific covariate",
    [Unused, OverallMean, ControlGroupMean]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_type_round_trip_tags() {
        for dtype in DatasetType::ALL {
            assert_eq!(dtype.tag().parse::<DatasetType>().unwrap(), dtype);
        }
    }

    #[test]
    fn test_unknown_dataset_type() {
        let err = "XX".parse::<DatasetType>().unwrap_err();
        assert!(matches!(err, BmdsError::UnknownDatasetType(ref t) if t == "XX"));
    }

    #[test]
    fn test_families() {
        assert!(DatasetType::MultiTumor.is_dichotomous());
        assert!(DatasetType::ContinuousIndividual.is_continuous());
        assert_eq!(DatasetType::NestedDichotomous.family(), ModelFamily::NestedDichotomous);
    }

    #[test]
    fn test_adverse_direction_wire_values() {
        assert_eq!(AdverseDirection::try_from(-1).unwrap(), AdverseDirection::Automatic);
        assert_eq!(AdverseDirection::try_from(1).unwrap().is_increasing(), Some(true));
        assert_eq!(AdverseDirection::try_from(0).unwrap().is_increasing(), Some(false));
        assert!(AdverseDirection::try_from(2).is_err());
        assert!(matches!(
            AdverseDirection::from_code(5),
            Err(BmdsError::UnknownAdverseDirection(5))
        ));
    }

    #[test]
    fn test_prior_class_serializes_as_int() {
        let json = serde_json::to_string(&PriorClassTag::Bayesian.prior_class()).unwrap();
        assert_eq!(json, "2");
    }

    #[test]
    fn test_risk_type_values() {
        assert_eq!(DichotomousRiskType::VALUES, &[0, 1]);
        assert_eq!(ContinuousRiskType::try_from(2).unwrap(), ContinuousRiskType::StandardDeviation);
    }
}
