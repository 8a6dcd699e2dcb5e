//! Health-age computation
//!
//! Turns one body-composition snapshot into a displayable health age:
//!
//! 1. Validate the required fields (age, body fat, visceral fat)
//! 2. Derive lean mass; without it, fall back to chronological age
//! 3. Metabolic age = actual age / clamp(FFM / expected FFM, 0.7, 1.5)^0.8
//! 4. Subtract the continuous athletic bonus, add fat and visceral penalties
//! 5. Clamp to actual age ± 7, round once, then apply the athletic override
//!
//! The computation is deterministic: no clock, no randomness, no shared state.

use tracing::{debug, trace};

use crate::error::{HealthAgeError, Result};
use crate::models::{HealthAgeDebug, HealthAgeInput, HealthAgeResult};
use crate::numeric::{clamp, round_for_display};
use crate::scoring::{
    compute_continuous_scores, compute_is_athletic, expected_ffm_with_height, fat_penalty,
    lean_mass, visceral_penalty,
};

pub const MIN_AGE: f64 = 10.0;
pub const MAX_AGE: f64 = 99.0;

/// Half-width of the window around actual age that a health age may occupy
pub const UX_CLAMP_YEARS: f64 = 7.0;

pub const RATIO_MIN: f64 = 0.7;
pub const RATIO_MAX: f64 = 1.5;

/// Dampens the metabolic ratio's effect on age
pub const RATIO_EXPONENT: f64 = 0.8;

/// Years subtracted at a perfect athletic score
pub const MAX_ATHLETIC_BONUS_YEARS: f64 = 10.0;

/// Reject inputs the engine refuses to degrade on
pub fn validate_input(input: &HealthAgeInput) -> Result<()> {
    if !input.actual_age.is_finite() {
        return Err(HealthAgeError::invalid_input(
            "actualAge",
            "must be a finite number",
        ));
    }
    if !(MIN_AGE..=MAX_AGE).contains(&input.actual_age) {
        return Err(HealthAgeError::invalid_input(
            "actualAge",
            format!(
                "must be within [{}, {}], got {}",
                MIN_AGE, MAX_AGE, input.actual_age
            ),
        ));
    }
    if input.actual_age.fract() != 0.0 {
        return Err(HealthAgeError::invalid_input(
            "actualAge",
            format!("must be a whole number of years, got {}", input.actual_age),
        ));
    }
    if !input.body_fat_percent.is_finite() {
        return Err(HealthAgeError::invalid_input(
            "bodyFatPercent",
            "must be a finite number",
        ));
    }
    if !input.visceral_fat_level.is_finite() {
        return Err(HealthAgeError::invalid_input(
            "visceralFatLevel",
            "must be a finite number",
        ));
    }
    Ok(())
}

/// Compute the health age for one measurement snapshot
///
/// Fails only when a required field is invalid. Missing weight and lean-mass data is not an
/// error: the result is the chronological age with `debug.expected_ffm_kg == None`.
pub fn compute_health_age(input: &HealthAgeInput) -> Result<HealthAgeResult> {
    validate_input(input)?;

    let actual_age = input.actual_age;
    let clamp_min = actual_age - UX_CLAMP_YEARS;
    let clamp_max = actual_age + UX_CLAMP_YEARS;

    let scores = compute_continuous_scores(input);
    let is_athletic = compute_is_athletic(input);

    let ffm = match lean_mass(input) {
        Some(ffm) => ffm,
        None => {
            debug!(
                actual_age,
                is_athletic, "No usable lean mass, falling back to chronological age"
            );

            let health_age = finalize(actual_age, actual_age, is_athletic);

            return Ok(HealthAgeResult {
                health_age,
                is_athletic,
                debug: HealthAgeDebug {
                    athletic_score: scores.athletic_score,
                    scores,
                    ffm_kg: None,
                    expected_ffm_kg: None,
                    metabolic_ratio: None,
                    ratio_clamped: None,
                    metabolic_age_raw: actual_age,
                    health_age_raw: actual_age,
                    athletic_bonus: 0.0,
                    fat_penalty: 0.0,
                    visceral_penalty: 0.0,
                    clamp_min,
                    clamp_max,
                },
            });
        }
    };

    let expected_ffm = expected_ffm_with_height(input.gender, actual_age, input.height_cm);
    let metabolic_ratio = ffm / expected_ffm;
    let ratio_clamped = clamp(metabolic_ratio, RATIO_MIN, RATIO_MAX);
    let metabolic_age_raw = actual_age / ratio_clamped.powf(RATIO_EXPONENT);

    trace!(
        ffm,
        expected_ffm,
        metabolic_ratio,
        metabolic_age_raw,
        "Metabolic age computed"
    );

    let athletic_bonus = MAX_ATHLETIC_BONUS_YEARS * scores.athletic_score;
    let fat = fat_penalty(input.gender, input.body_fat_percent);
    let visceral = visceral_penalty(input.visceral_fat_level);

    let health_age_raw = metabolic_age_raw - athletic_bonus + fat + visceral;
    let health_age = finalize(health_age_raw, actual_age, is_athletic);

    debug!(
        actual_age,
        health_age,
        health_age_raw,
        athletic_bonus,
        fat_penalty = fat,
        visceral_penalty = visceral,
        is_athletic,
        "Health age computed"
    );

    Ok(HealthAgeResult {
        health_age,
        is_athletic,
        debug: HealthAgeDebug {
            athletic_score: scores.athletic_score,
            scores,
            ffm_kg: Some(ffm),
            expected_ffm_kg: Some(expected_ffm),
            metabolic_ratio: Some(metabolic_ratio),
            ratio_clamped: Some(ratio_clamped),
            metabolic_age_raw,
            health_age_raw,
            athletic_bonus,
            fat_penalty: fat,
            visceral_penalty: visceral,
            clamp_min,
            clamp_max,
        },
    })
}

/// Clamp, then round, then apply the athletic override. The order is fixed.
fn finalize(health_age_raw: f64, actual_age: f64, is_athletic: bool) -> i32 {
    let clamped = clamp(
        health_age_raw,
        actual_age - UX_CLAMP_YEARS,
        actual_age + UX_CLAMP_YEARS,
    );

    let rounded = round_for_display(clamped);

    if is_athletic {
        rounded.min(round_for_display(actual_age))
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn base_male() -> HealthAgeInput {
        HealthAgeInput::new(40.0, Gender::Male, 20.0, 8.0)
    }

    #[test]
    fn test_graceful_degradation_without_lean_mass() {
        let result = compute_health_age(&base_male()).unwrap();

        assert_eq!(result.health_age, 40);
        assert!(!result.is_athletic);
        assert_eq!(result.debug.expected_ffm_kg, None);
        assert_eq!(result.debug.metabolic_age_raw, 40.0);
        assert_eq!(result.debug.athletic_bonus, 0.0);
        assert_eq!(result.debug.fat_penalty, 0.0);
        assert_eq!(result.debug.visceral_penalty, 0.0);
        assert!(result.debug.is_degraded());
    }

    #[test]
    fn test_degraded_path_still_reports_athletic() {
        let input = HealthAgeInput::new(40.0, Gender::Male, 12.0, 3.0);
        let result = compute_health_age(&input).unwrap();

        assert!(result.is_athletic);
        assert_eq!(result.health_age, 40);
        assert_eq!(result.debug.scores.bf_score, 1.0);
    }

    #[test]
    fn test_typical_male_with_weight() {
        let input = base_male().with_height(175.0).with_weight(80.0);
        let result = compute_health_age(&input).unwrap();

        let debug = &result.debug;
        assert!((debug.ffm_kg.unwrap() - 64.0).abs() < 1e-9);
        assert!((debug.expected_ffm_kg.unwrap() - 58.0 * 175.0 / 171.0).abs() < 1e-9);
        assert!((debug.fat_penalty - 1.5).abs() < 1e-9);
        assert!((debug.visceral_penalty - 6.0 * 2.0 / 9.0).abs() < 1e-9);
        assert!((debug.athletic_bonus - 10.0 / 9.0).abs() < 1e-9);
        assert_eq!(result.health_age, 39);
        assert!(!result.is_athletic);
    }

    #[test]
    fn test_measured_ffm_preferred_over_weight() {
        let with_ffm = base_male().with_height(171.0).with_weight(80.0).with_ffm(58.0);
        let result = compute_health_age(&with_ffm).unwrap();

        assert_eq!(result.debug.ffm_kg, Some(58.0));
        assert!((result.debug.metabolic_ratio.unwrap() - 1.0).abs() < 1e-12);
        assert!((result.debug.metabolic_age_raw - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_is_clamped() {
        let input = base_male().with_height(171.0).with_ffm(200.0);
        let result = compute_health_age(&input).unwrap();

        assert!(result.debug.metabolic_ratio.unwrap() > RATIO_MAX);
        assert_eq!(result.debug.ratio_clamped, Some(RATIO_MAX));
        let expected = 40.0 / RATIO_MAX.powf(RATIO_EXPONENT);
        assert!((result.debug.metabolic_age_raw - expected).abs() < 1e-9);
    }

    #[test]
    fn test_athletic_protection_overrides_formula() {
        // Low lean mass pushes metabolic age up, but fat and visceral criteria make it athletic
        let input = HealthAgeInput::new(40.0, Gender::Male, 15.0, 6.0)
            .with_height(171.0)
            .with_weight(50.0);
        let result = compute_health_age(&input).unwrap();

        assert!(result.is_athletic);
        assert!(result.debug.health_age_raw > 45.0);
        assert_eq!(result.health_age, 40);
    }

    #[test]
    fn test_upper_clamp_boundary() {
        let input = HealthAgeInput::new(40.0, Gender::Male, 50.0, 20.0)
            .with_height(150.0)
            .with_weight(60.0);
        let result = compute_health_age(&input).unwrap();

        assert!(result.debug.health_age_raw > 47.0);
        assert_eq!(result.health_age, 47);
        assert_eq!(result.debug.clamp_max, 47.0);
    }

    #[test]
    fn test_lower_clamp_boundary() {
        let input = HealthAgeInput::new(40.0, Gender::Male, 5.0, 1.0)
            .with_height(190.0)
            .with_ffm(90.0)
            .with_smi(10.0);
        let result = compute_health_age(&input).unwrap();

        assert!(result.debug.health_age_raw < 33.0);
        assert_eq!(result.health_age, 33);
        assert!(result.is_athletic);
    }

    #[test]
    fn test_validation_rejects_bad_age() {
        for age in [5.0, 9.99, 99.5, 150.0, f64::NAN, f64::INFINITY] {
            let input = HealthAgeInput::new(age, Gender::Male, 20.0, 8.0);
            match compute_health_age(&input) {
                Err(HealthAgeError::InvalidInput { field, .. }) => assert_eq!(field, "actualAge"),
                other => panic!("expected actualAge error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_validation_rejects_non_finite_measurements() {
        let input = HealthAgeInput::new(40.0, Gender::Male, f64::NAN, 8.0);
        let err = compute_health_age(&input).unwrap_err();
        assert!(err.to_string().contains("bodyFatPercent"));

        let input = HealthAgeInput::new(40.0, Gender::Male, 20.0, f64::NEG_INFINITY);
        let err = compute_health_age(&input).unwrap_err();
        assert!(err.to_string().contains("visceralFatLevel"));
    }

    #[test]
    fn test_validation_accepts_age_boundaries() {
        assert!(compute_health_age(&HealthAgeInput::new(10.0, Gender::Female, 25.0, 3.0)).is_ok());
        assert!(compute_health_age(&HealthAgeInput::new(99.0, Gender::Female, 25.0, 3.0)).is_ok());
    }

    #[test]
    fn test_validation_rejects_fractional_age() {
        for age in [40.5, 69.5, 10.25] {
            let input = HealthAgeInput::new(age, Gender::Male, 50.0, 20.0)
                .with_height(150.0)
                .with_weight(60.0);
            match compute_health_age(&input) {
                Err(HealthAgeError::InvalidInput { field, reason }) => {
                    assert_eq!(field, "actualAge");
                    assert!(reason.contains("whole number"));
                }
                other => panic!("expected actualAge error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_finalize_clamps_before_rounding() {
        assert_eq!(finalize(47.5, 40.0, false), 47);
        assert_eq!(finalize(32.4, 40.0, false), 33);
        assert_eq!(finalize(46.5, 40.0, false), 47);
        assert_eq!(finalize(33.6, 40.0, false), 34);
    }

    #[test]
    fn test_finalize_override_after_rounding() {
        // Clamped to 47 first, then capped at actual age
        assert_eq!(finalize(60.0, 40.0, true), 40);
        // 40.4 rounds to 40 and stays there
        assert_eq!(finalize(40.4, 40.0, true), 40);
        // 40.5 rounds to 41 before the override pulls it back
        assert_eq!(finalize(40.5, 40.0, true), 40);
        // Override never raises a lower result
        assert_eq!(finalize(35.2, 40.0, true), 35);
    }

    #[test]
    fn test_result_stays_within_window() {
        let input = HealthAgeInput::new(41.0, Gender::Male, 50.0, 20.0)
            .with_height(150.0)
            .with_weight(60.0);
        let result = compute_health_age(&input).unwrap();

        assert_eq!(result.health_age, 48);
        assert!(result.health_age as f64 <= result.debug.clamp_max);
    }

    #[test]
    fn test_deterministic() {
        let input = HealthAgeInput::new(52.0, Gender::Female, 31.5, 9.0)
            .with_height(163.0)
            .with_weight(68.0)
            .with_smi(6.2);

        let first = compute_health_age(&input).unwrap();
        let second = compute_health_age(&input).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.debug.health_age_raw.to_bits(),
            second.debug.health_age_raw.to_bits()
        );
    }
}
