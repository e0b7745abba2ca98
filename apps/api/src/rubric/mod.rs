//! Rubric Catalog: typed scoring levels and the two fixed rubric sets.
//!
//! Items and dispositions are `&'static` tables in `catalog`; nothing here is loaded at runtime.
//! Levels are only constructible through checked conversions, so an out-of-range score can
//! never reach the aggregator or validator.

pub mod catalog;

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Wire/disk marker for a competency item with no observable evidence.
pub const NOT_OBSERVED: &str = "not_observed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("level {value} is outside the allowed range {min}..={max}")]
pub struct LevelOutOfRange {
    pub value: u8,
    pub min: u8,
    pub max: u8,
}

// ────────────────────────────────────────────────────────────────────────────
// Levels
// ────────────────────────────────────────────────────────────────────────────

/// Competency score, 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CompetencyLevel(u8);

impl CompetencyLevel {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 3;
    /// Lowest level that counts as meeting expectations.
    pub const PASSING: CompetencyLevel = CompetencyLevel(2);

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = CompetencyLevel> {
        (Self::MIN..=Self::MAX).map(CompetencyLevel)
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "Does Not Meet Expectations",
            1 => "Approaching Expectations",
            2 => "Meets Expectations",
            _ => "Exceeds Expectations",
        }
    }
}

impl TryFrom<u8> for CompetencyLevel {
    type Error = LevelOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= Self::MAX {
            Ok(CompetencyLevel(value))
        } else {
            Err(LevelOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }
}

impl From<CompetencyLevel> for u8 {
    fn from(level: CompetencyLevel) -> Self {
        level.0
    }
}

/// Professional disposition score, 1..=4. Stricter passing threshold than competencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DispositionLevel(u8);

impl DispositionLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;
    pub const PASSING: DispositionLevel = DispositionLevel(3);

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = DispositionLevel> {
        (Self::MIN..=Self::MAX).map(DispositionLevel)
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Unacceptable",
            2 => "Developing",
            3 => "Proficient",
            _ => "Exemplary",
        }
    }
}

impl TryFrom<u8> for DispositionLevel {
    type Error = LevelOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(DispositionLevel(value))
        } else {
            Err(LevelOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }
}

impl From<DispositionLevel> for u8 {
    fn from(level: DispositionLevel) -> Self {
        level.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Score
// ────────────────────────────────────────────────────────────────────────────

/// A competency item score.
///
/// Serialized as a bare integer for `Level` and as `"not_observed"` for `NotObserved`,
/// which keeps stored files readable by older tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Score {
    Level(CompetencyLevel),
    NotObserved,
}

impl Score {
    /// Numeric level, or `None` for `NotObserved`.
    pub fn level(self) -> Option<CompetencyLevel> {
        match self {
            Score::Level(level) => Some(level),
            Score::NotObserved => None,
        }
    }

    pub fn label(self) -> String {
        match self {
            Score::Level(level) => format!("{} - {}", level.value(), level.label()),
            Score::NotObserved => "Not Observed".to_string(),
        }
    }
}

impl From<CompetencyLevel> for Score {
    fn from(level: CompetencyLevel) -> Self {
        Score::Level(level)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Level(level) => write!(f, "{}", level.value()),
            Score::NotObserved => f.write_str(NOT_OBSERVED),
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Score::Level(level) => serializer.serialize_u8(level.value()),
            Score::NotObserved => serializer.serialize_str(NOT_OBSERVED),
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawScore {
            Level(u8),
            Marker(String),
        }

        match RawScore::deserialize(deserializer)? {
            RawScore::Level(value) => CompetencyLevel::try_from(value)
                .map(Score::Level)
                .map_err(de::Error::custom),
            RawScore::Marker(marker) if marker == NOT_OBSERVED => Ok(Score::NotObserved),
            RawScore::Marker(other) => Err(de::Error::custom(format!(
                "expected a level 0-3 or \"{NOT_OBSERVED}\", got \"{other}\""
            ))),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rubric data
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LevelDescriptor {
    pub level: u8,
    pub description: &'static str,
}

/// A single competency item. `levels[i]` describes level `i`.
#[derive(Debug, Clone, Serialize)]
pub struct RubricItem {
    pub id: &'static str,
    pub code: &'static str,
    pub title: &'static str,
    pub area: &'static str,
    pub levels: [LevelDescriptor; 4],
}

impl RubricItem {
    pub fn level_description(&self, level: CompetencyLevel) -> &'static str {
        self.levels[level.value() as usize].description
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Disposition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub criteria: &'static [&'static str],
}

/// Selects one of the two fixed rubric sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricType {
    FieldEvaluation,
    Ster,
}

impl RubricType {
    pub fn as_str(self) -> &'static str {
        match self {
            RubricType::FieldEvaluation => "field_evaluation",
            RubricType::Ster => "ster",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RubricType::FieldEvaluation => "Field Evaluation",
            RubricType::Ster => "Student Teaching Evaluation Rubric (STER)",
        }
    }

    pub fn rubric_set(self) -> RubricSet {
        match self {
            RubricType::FieldEvaluation => RubricSet {
                rubric_type: self,
                title: self.display_name(),
                items: catalog::FIELD_EVALUATION_ITEMS,
                dispositions: catalog::DISPOSITIONS,
            },
            RubricType::Ster => RubricSet {
                rubric_type: self,
                title: self.display_name(),
                items: catalog::STER_ITEMS,
                dispositions: &[],
            },
        }
    }
}

impl std::str::FromStr for RubricType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "field_evaluation" => Ok(RubricType::FieldEvaluation),
            "ster" => Ok(RubricType::Ster),
            other => Err(format!("unknown rubric type '{other}'")),
        }
    }
}

/// The active items and dispositions for one rubric type.
#[derive(Debug, Clone, Serialize)]
pub struct RubricSet {
    pub rubric_type: RubricType,
    pub title: &'static str,
    pub items: &'static [RubricItem],
    pub dispositions: &'static [Disposition],
}

impl RubricSet {
    pub fn item(&self, id: &str) -> Option<&'static RubricItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn disposition(&self, id: &str) -> Option<&'static Disposition> {
        self.dispositions.iter().find(|d| d.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competency_level_range() {
        assert!(CompetencyLevel::try_from(0).is_ok());
        assert!(CompetencyLevel::try_from(3).is_ok());
        let err = CompetencyLevel::try_from(4).unwrap_err();
        assert_eq!(err.max, 3);
    }

    #[test]
    fn test_disposition_level_range() {
        assert!(DispositionLevel::try_from(0).is_err());
        assert!(DispositionLevel::try_from(1).is_ok());
        assert!(DispositionLevel::try_from(4).is_ok());
        assert!(DispositionLevel::try_from(5).is_err());
    }

    #[test]
    fn test_score_serializes_as_int_or_marker() {
        let level = Score::Level(CompetencyLevel::try_from(2).unwrap());
        assert_eq!(serde_json::to_string(&level).unwrap(), "2");
        assert_eq!(
            serde_json::to_string(&Score::NotObserved).unwrap(),
            "\"not_observed\""
        );
    }

    #[test]
    fn test_score_deserializes_both_shapes() {
        let level: Score = serde_json::from_str("3").unwrap();
        assert_eq!(level.level().map(|l| l.value()), Some(3));
        let marker: Score = serde_json::from_str("\"not_observed\"").unwrap();
        assert_eq!(marker, Score::NotObserved);
    }

    #[test]
    fn test_score_rejects_out_of_range_and_unknown_marker() {
        assert!(serde_json::from_str::<Score>("4").is_err());
        assert!(serde_json::from_str::<Score>("-1").is_err());
        assert!(serde_json::from_str::<Score>("\"n/a\"").is_err());
    }

    #[test]
    fn test_disposition_level_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<DispositionLevel>("0").is_err());
        let level: DispositionLevel = serde_json::from_str("4").unwrap();
        assert_eq!(level.value(), 4);
    }

    #[test]
    fn test_rubric_type_serde_snake_case() {
        let json = serde_json::to_string(&RubricType::FieldEvaluation).unwrap();
        assert_eq!(json, "\"field_evaluation\"");
        let parsed: RubricType = serde_json::from_str("\"ster\"").unwrap();
        assert_eq!(parsed, RubricType::Ster);
        assert_eq!("ster".parse::<RubricType>().unwrap(), RubricType::Ster);
        assert!("other".parse::<RubricType>().is_err());
    }
}
