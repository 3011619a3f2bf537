//! Rule-based habitability scoring
//!
//! This module provides the pure scoring function that maps a 4-feature
//! exoplanet vector `[period, radius, distance, temperature]` to a
//! confidence score, a verdict, and human-readable reasoning. No I/O,
//! no state: identical input always produces identical output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of input features the classifier expects
pub const FEATURE_COUNT: usize = 4;

/// Confidence at or above this threshold yields a CONFIRMED verdict
pub const CONFIRMED_THRESHOLD: f64 = 0.5;

/// Ordered feature vector for a candidate exoplanet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    /// Orbital period in days
    pub period: f64,

    /// Planetary radius in Earth radii
    pub radius: f64,

    /// Orbital distance in AU
    pub distance: f64,

    /// Equilibrium temperature in Kelvin
    pub temperature: f64,
}

/// Error returned when a raw feature slice has the wrong arity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFeatures {
    pub expected: usize,
    pub got: usize,
}

impl fmt::Display for InvalidFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {} features [period, radius, distance, temperature], got {}",
            self.expected, self.got
        )
    }
}

impl std::error::Error for InvalidFeatures {}

impl TryFrom<&[f64]> for Features {
    type Error = InvalidFeatures;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        match values {
            [period, radius, distance, temperature] => Ok(Self {
                period: *period,
                radius: *radius,
                distance: *distance,
                temperature: *temperature,
            }),
            _ => Err(InvalidFeatures {
                expected: FEATURE_COUNT,
                got: values.len(),
            }),
        }
    }
}

impl Features {
    /// Flatten back to the wire ordering `[period, radius, distance, temperature]`
    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.period, self.radius, self.distance, self.temperature]
    }
}

/// Binary classification output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "CONFIRMED")]
    Confirmed,

    #[serde(rename = "FALSE POSITIVE")]
    FalsePositive,
}

impl Verdict {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Verdict::Confirmed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Confirmed => "CONFIRMED",
            Verdict::FalsePositive => "FALSE POSITIVE",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring one feature vector
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub verdict: Verdict,

    /// Aggregate rule-satisfaction strength in [0, 1]
    pub confidence: f64,

    /// Satisfied rule descriptions joined with ", "; empty if none matched
    pub reasoning: String,
}

/// Additive weighted rules, applied in this fixed order
const RULES: [(fn(&Features) -> bool, f64, &str); 4] = [
    (
        |f| (200.0..=500.0).contains(&f.period),
        0.30,
        "Favorable orbital period",
    ),
    (
        |f| (0.5..=2.0).contains(&f.radius),
        0.30,
        "Earth-like size",
    ),
    (
        |f| (0.8..=1.5).contains(&f.distance),
        0.25,
        "In habitable zone",
    ),
    (
        |f| (273.0..=373.0).contains(&f.temperature),
        0.15,
        "Temperature allows liquid water",
    ),
];

/// Score a feature vector against the habitability rules.
///
/// Each satisfied rule contributes its fixed weight; the weights sum to 1.0,
/// so the clamp is defensive only. Ties at exactly 0.5 go to CONFIRMED.
pub fn assess(features: &Features) -> Assessment {
    let mut confidence = 0.0;
    let mut reasons: Vec<&str> = Vec::new();

    for (satisfied, weight, reason) in RULES {
        if satisfied(features) {
            confidence += weight;
            reasons.push(reason);
        }
    }

    let confidence = confidence.min(1.0);

    let verdict = if confidence >= CONFIRMED_THRESHOLD {
        Verdict::Confirmed
    } else {
        Verdict::FalsePositive
    };

    Assessment {
        verdict,
        confidence,
        reasoning: reasons.join(", "),
    }
}
