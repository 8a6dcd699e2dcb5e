use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HealthAgeError;

/// Biological sex used to select every gender-specific threshold and table row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = HealthAgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(HealthAgeError::invalid_input(
                "gender",
                format!("expected 'male' or 'female', got '{}'", other),
            )),
        }
    }
}

/// One body-composition snapshot for one person
///
/// The lean-mass signals (`ffm_kg`, `smm_kg`, `smi`, `muscle_above_standard`) are
/// alternatives of decreasing directness; the engine uses only the most direct one present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAgeInput {
    /// Chronological age in years (10-99)
    pub actual_age: f64,

    pub gender: Gender,

    /// Height in centimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,

    /// Body weight in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,

    /// Body fat percentage (0-100)
    pub body_fat_percent: f64,

    /// Scanner-specific unitless visceral fat score
    pub visceral_fat_level: f64,

    /// Measured fat-free mass in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffm_kg: Option<f64>,

    /// Skeletal muscle mass in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smm_kg: Option<f64>,

    /// Skeletal muscle index (kg/m²)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smi: Option<f64>,

    /// Caller-supplied muscle classification, overrides every derived signal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_above_standard: Option<bool>,
}

impl HealthAgeInput {
    /// Create an input carrying only the required fields
    pub fn new(actual_age: f64, gender: Gender, body_fat_percent: f64, visceral_fat_level: f64) -> Self {
        Self {
            actual_age,
            gender,
            height_cm: None,
            weight_kg: None,
            body_fat_percent,
            visceral_fat_level,
            ffm_kg: None,
            smm_kg: None,
            smi: None,
            muscle_above_standard: None,
        }
    }

    pub fn with_height(mut self, height_cm: f64) -> Self {
        self.height_cm = Some(height_cm);
        self
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }

    pub fn with_ffm(mut self, ffm_kg: f64) -> Self {
        self.ffm_kg = Some(ffm_kg);
        self
    }

    pub fn with_smm(mut self, smm_kg: f64) -> Self {
        self.smm_kg = Some(smm_kg);
        self
    }

    pub fn with_smi(mut self, smi: f64) -> Self {
        self.smi = Some(smi);
        self
    }

    pub fn with_muscle_above_standard(mut self, above: bool) -> Self {
        self.muscle_above_standard = Some(above);
        self
    }
}

/// Per-factor health scores, each in [0, 1] with higher meaning healthier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuousScores {
    pub bf_score: f64,
    pub vf_score: f64,
    pub muscle_score: f64,
    /// Unweighted mean of the three factor scores
    pub athletic_score: f64,
}

/// Diagnostics explaining how a health age was reached
///
/// Read-only evidence for downstream explanation. `HealthAgeResult::health_age` is the
/// only authoritative number; nothing here should be used to recompute it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAgeDebug {
    pub athletic_score: f64,
    pub scores: ContinuousScores,
    /// Lean mass actually used, measured or derived from weight
    pub ffm_kg: Option<f64>,
    pub expected_ffm_kg: Option<f64>,
    pub metabolic_ratio: Option<f64>,
    pub ratio_clamped: Option<f64>,
    pub metabolic_age_raw: f64,
    pub health_age_raw: f64,
    pub athletic_bonus: f64,
    pub fat_penalty: f64,
    pub visceral_penalty: f64,
    pub clamp_min: f64,
    pub clamp_max: f64,
}

impl HealthAgeDebug {
    /// True when the result came from the insufficient-data path
    pub fn is_degraded(&self) -> bool {
        self.expected_ffm_kg.is_none()
    }
}

/// Outcome of one health-age computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAgeResult {
    pub health_age: i32,
    pub is_athletic: bool,
    pub debug: HealthAgeDebug,
}
