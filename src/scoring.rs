//! Derived body-composition metrics
//!
//! Muscle classification, continuous factor scores, the athletic majority vote, expected
//! lean mass and the fat/visceral-fat penalties. Everything here is a pure function of a
//! `HealthAgeInput` and the reference tables.

use crate::models::{ContinuousScores, Gender, HealthAgeInput};
use crate::numeric::{clamp, ramp_down, ramp_up};
use crate::reference::{
    expected_ffm_by_age, smm_standard_min, thresholds, HEIGHT_FACTOR_MAX, HEIGHT_FACTOR_MIN,
    SMI_RAMP_HALF_WIDTH, VF_BAD, VF_GOOD, VF_LOW, VF_WORST,
};

/// Years added at the worst body fat / visceral fat
pub const MAX_FAT_PENALTY_YEARS: f64 = 6.0;
pub const MAX_VISCERAL_PENALTY_YEARS: f64 = 6.0;

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Whether this person's muscle mass is at or above the standard for their gender
///
/// First applicable signal wins: explicit flag, then SMI, then height-bucketed SMM.
/// Without any usable signal the answer is `false`.
pub fn compute_muscle_above_standard(input: &HealthAgeInput) -> bool {
    if let Some(explicit) = input.muscle_above_standard {
        return explicit;
    }

    let t = thresholds(input.gender);

    if let Some(smi) = finite(input.smi) {
        return smi >= t.smi_standard;
    }

    if let (Some(height), Some(smm)) = (positive(input.height_cm), finite(input.smm_kg)) {
        return smm >= smm_standard_min(input.gender, height);
    }

    false
}

/// Per-factor scores in [0, 1] plus their mean
pub fn compute_continuous_scores(input: &HealthAgeInput) -> ContinuousScores {
    let t = thresholds(input.gender);

    let bf_score = ramp_down(input.body_fat_percent, t.bf_good, t.bf_bad);
    let vf_score = ramp_down(input.visceral_fat_level, VF_GOOD, VF_BAD);

    let muscle_score = match (input.muscle_above_standard, finite(input.smi)) {
        (Some(explicit), _) => bool_score(explicit),
        (None, Some(smi)) => ramp_up(
            smi,
            t.smi_standard - SMI_RAMP_HALF_WIDTH,
            t.smi_standard + SMI_RAMP_HALF_WIDTH,
        ),
        (None, None) => bool_score(compute_muscle_above_standard(input)),
    };

    let athletic_score = clamp((bf_score + vf_score + muscle_score) / 3.0, 0.0, 1.0);

    ContinuousScores {
        bf_score,
        vf_score,
        muscle_score,
        athletic_score,
    }
}

fn bool_score(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Majority vote: at least two of low body fat, low visceral fat, muscle at standard
pub fn compute_is_athletic(input: &HealthAgeInput) -> bool {
    let t = thresholds(input.gender);

    let criteria = [
        input.body_fat_percent <= t.bf_low,
        input.visceral_fat_level <= VF_LOW,
        compute_muscle_above_standard(input),
    ];

    criteria.iter().filter(|&&hit| hit).count() >= 2
}

/// Expected fat-free mass (kg) for this age, corrected for stature
///
/// The correction factor is `height / reference height`, bounded to [0.9, 1.1]. A missing
/// or non-positive height leaves the table value unchanged.
pub fn expected_ffm_with_height(gender: Gender, age: f64, height_cm: Option<f64>) -> f64 {
    let base = expected_ffm_by_age(gender, age);

    let factor = match positive(height_cm) {
        Some(height) => clamp(
            height / thresholds(gender).reference_height_cm,
            HEIGHT_FACTOR_MIN,
            HEIGHT_FACTOR_MAX,
        ),
        None => 1.0,
    };

    base * factor
}

/// Lean mass (kg) for this person: measured FFM, else weight minus fat mass
pub fn lean_mass(input: &HealthAgeInput) -> Option<f64> {
    if let Some(ffm) = positive(input.ffm_kg) {
        return Some(ffm);
    }

    positive(input.weight_kg)
        .map(|weight| weight * (1.0 - input.body_fat_percent / 100.0))
        .filter(|ffm| ffm.is_finite() && *ffm > 0.0)
}

/// Years added for body fat above the gender "low" threshold
pub fn fat_penalty(gender: Gender, body_fat_percent: f64) -> f64 {
    let t = thresholds(gender);
    MAX_FAT_PENALTY_YEARS * (1.0 - ramp_down(body_fat_percent, t.bf_low, t.bf_worst))
}

/// Years added for visceral fat above 6
pub fn visceral_penalty(visceral_fat_level: f64) -> f64 {
    MAX_VISCERAL_PENALTY_YEARS * (1.0 - ramp_down(visceral_fat_level, VF_LOW, VF_WORST))
}
