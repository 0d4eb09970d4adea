// ============================================================
// Layer 3 — Rotation Policy
// ============================================================
// Selects which augmented copies of the training split the
// sample source adds. Parsed leniently: anything that is not a
// known name means "no augmentation".

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    /// Training samples are used as loaded
    #[default]
    None,
    /// Add a horizontally mirrored copy of every training sample
    Flip,
    /// Add copies rotated by 90, 180 and 270 degrees
    AllAngle,
}

impl RotationPolicy {
    /// Case-insensitive lookup; unknown names fall back to `None`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "flip"     => Self::Flip,
            "allangle" => Self::AllAngle,
            _          => Self::None,
        }
    }
}

impl fmt::Display for RotationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None     => "none",
            Self::Flip     => "flip",
            Self::AllAngle => "allangle",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_are_case_insensitive() {
        assert_eq!(RotationPolicy::from_name("Flip"), RotationPolicy::Flip);
        assert_eq!(RotationPolicy::from_name("ALLANGLE"), RotationPolicy::AllAngle);
        assert_eq!(RotationPolicy::from_name("none"), RotationPolicy::None);
    }

    #[test]
    fn test_unknown_name_falls_back_to_none() {
        assert_eq!(RotationPolicy::from_name("sideways"), RotationPolicy::None);
        assert_eq!(RotationPolicy::from_name(""), RotationPolicy::None);
    }

    #[test]
    fn test_display_round_trips_through_from_name() {
        for p in [RotationPolicy::None, RotationPolicy::Flip, RotationPolicy::AllAngle] {
            assert_eq!(RotationPolicy::from_name(&p.to_string()), p);
        }
    }
}
