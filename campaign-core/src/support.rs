use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete voter support level, ordered from strongest support to
/// strongest opposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportLevel {
    StrongSupporter,
    Leaning,
    Undecided,
    SoftOpposition,
    HardOpposition,
}

impl SupportLevel {
    pub const ALL: [SupportLevel; 5] = [
        SupportLevel::StrongSupporter,
        SupportLevel::Leaning,
        SupportLevel::Undecided,
        SupportLevel::SoftOpposition,
        SupportLevel::HardOpposition,
    ];

    /// Weight used by the party support score.
    pub fn weight(self) -> i32 {
        match self {
            SupportLevel::StrongSupporter => 2,
            SupportLevel::Leaning => 1,
            SupportLevel::Undecided => 0,
            SupportLevel::SoftOpposition => -1,
            SupportLevel::HardOpposition => -2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SupportLevel::StrongSupporter => "strong_supporter",
            SupportLevel::Leaning => "leaning",
            SupportLevel::Undecided => "undecided",
            SupportLevel::SoftOpposition => "soft_opposition",
            SupportLevel::HardOpposition => "hard_opposition",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SupportLevel::StrongSupporter => "Strong supporter",
            SupportLevel::Leaning => "Leaning",
            SupportLevel::Undecided => "Undecided",
            SupportLevel::SoftOpposition => "Soft opposition",
            SupportLevel::HardOpposition => "Hard opposition",
        }
    }

    /// Categorical map/chart colour (diverging green to red).
    pub fn color(self) -> &'static str {
        match self {
            SupportLevel::StrongSupporter => "#1a9850",
            SupportLevel::Leaning => "#91cf60",
            SupportLevel::Undecided => "#fee08b",
            SupportLevel::SoftOpposition => "#fc8d59",
            SupportLevel::HardOpposition => "#d73027",
        }
    }
}

impl fmt::Display for SupportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strong_supporter" | "strong" => Ok(SupportLevel::StrongSupporter),
            "leaning" => Ok(SupportLevel::Leaning),
            "undecided" => Ok(SupportLevel::Undecided),
            "soft_opposition" | "soft_opp" => Ok(SupportLevel::SoftOpposition),
            "hard_opposition" | "hard_opp" => Ok(SupportLevel::HardOpposition),
            other => Err(CoreError::UnknownSupportLevel(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_symmetric() {
        let total: i32 = SupportLevel::ALL.iter().map(|l| l.weight()).sum();
        assert_eq!(total, 0);
        assert_eq!(SupportLevel::StrongSupporter.weight(), 2);
        assert_eq!(SupportLevel::HardOpposition.weight(), -2);
    }

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!("strong".parse::<SupportLevel>(), Ok(SupportLevel::StrongSupporter));
        assert_eq!(" Soft_Opp ".parse::<SupportLevel>(), Ok(SupportLevel::SoftOpposition));
        assert_eq!(
            "maybe".parse::<SupportLevel>(),
            Err(CoreError::UnknownSupportLevel("maybe".into()))
        );
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&SupportLevel::StrongSupporter).unwrap();
        assert_eq!(json, "\"strong_supporter\"");
        let back: SupportLevel = serde_json::from_str("\"hard_opposition\"").unwrap();
        assert_eq!(back, SupportLevel::HardOpposition);
    }
}
