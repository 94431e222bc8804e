//! Column names and categorical values of the batted-ball event table.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const BATTER: &str = "BATTER";
pub const PITCHER: &str = "PITCHER";
pub const LAUNCH_ANGLE: &str = "LAUNCH_ANGLE";
pub const EXIT_SPEED: &str = "EXIT_SPEED";
pub const HIT_DISTANCE: &str = "HIT_DISTANCE";
pub const HANG_TIME: &str = "HANG_TIME";
pub const HIT_SPIN_RATE: &str = "HIT_SPIN_RATE";
pub const PLAY_OUTCOME: &str = "PLAY_OUTCOME";
pub const GAME_DATE: &str = "GAME_DATE";

/// Every column a batted-ball file must carry.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    BATTER,
    PITCHER,
    LAUNCH_ANGLE,
    EXIT_SPEED,
    HIT_DISTANCE,
    HANG_TIME,
    HIT_SPIN_RATE,
    PLAY_OUTCOME,
    GAME_DATE,
];

/// Measurement columns, coerced to `Float64` at load time.
pub const NUMERIC_COLUMNS: [&str; 5] = [
    LAUNCH_ANGLE,
    EXIT_SPEED,
    HIT_DISTANCE,
    HANG_TIME,
    HIT_SPIN_RATE,
];

/// Columns whose missing values are filled with the column mean.
pub const IMPUTED_COLUMNS: [&str; 2] = [HANG_TIME, HIT_SPIN_RATE];

/// Columns checked for IQR outliers, in report order.
pub const OUTLIER_COLUMNS: [&str; 5] = [
    EXIT_SPEED,
    LAUNCH_ANGLE,
    HIT_DISTANCE,
    HANG_TIME,
    HIT_SPIN_RATE,
];

/// Result of a batted ball as recorded in `PLAY_OUTCOME`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayOutcome {
    Single,
    Double,
    Triple,
    HomeRun,
    Sacrifice,
    /// Outs and anything else the source records.
    Other(String),
}

impl PlayOutcome {
    /// Parse a raw outcome label. Unknown labels are kept verbatim.
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Single" => Self::Single,
            "Double" => Self::Double,
            "Triple" => Self::Triple,
            "HomeRun" => Self::HomeRun,
            "Sacrifice" => Self::Sacrifice,
            other => Self::Other(other.to_string()),
        }
    }

    /// Bases credited for a hit, `None` for non-hits.
    pub fn total_bases(&self) -> Option<u32> {
        match self {
            Self::Single => Some(1),
            Self::Double => Some(2),
            Self::Triple => Some(3),
            Self::HomeRun => Some(4),
            Self::Sacrifice | Self::Other(_) => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.total_bases().is_some()
    }

    /// Whether the event counts as an at-bat. Only sacrifices are excluded.
    pub fn counts_as_at_bat(&self) -> bool {
        !matches!(self, Self::Sacrifice)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Triple => "Triple",
            Self::HomeRun => "HomeRun",
            Self::Sacrifice => "Sacrifice",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for PlayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_outcomes() {
        assert_eq!(PlayOutcome::parse("Single"), PlayOutcome::Single);
        assert_eq!(PlayOutcome::parse(" HomeRun "), PlayOutcome::HomeRun);
        assert_eq!(PlayOutcome::parse("Sacrifice"), PlayOutcome::Sacrifice);
    }

    #[test]
    fn test_parse_unknown_outcome_is_kept() {
        let outcome = PlayOutcome::parse("FieldersChoice");
        assert_eq!(outcome, PlayOutcome::Other("FieldersChoice".to_string()));
        assert_eq!(outcome.to_string(), "FieldersChoice");
        assert!(!outcome.is_hit());
        assert!(outcome.counts_as_at_bat());
    }

    #[test]
    fn test_total_bases() {
        assert_eq!(PlayOutcome::Single.total_bases(), Some(1));
        assert_eq!(PlayOutcome::HomeRun.total_bases(), Some(4));
        assert_eq!(PlayOutcome::Sacrifice.total_bases(), None);
        assert!(!PlayOutcome::Sacrifice.counts_as_at_bat());
    }

    #[test]
    fn test_outlier_columns_are_numeric() {
        for column in OUTLIER_COLUMNS {
            assert!(NUMERIC_COLUMNS.contains(&column));
        }
        for column in IMPUTED_COLUMNS {
            assert!(NUMERIC_COLUMNS.contains(&column));
        }
    }
}
