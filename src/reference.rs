//! Reference tables for body-composition standards
//!
//! Tables are ordered `(upper bound, value)` pairs; lookups return the value of the first
//! row whose upper bound is at or above the query, and the last row is a catch-all.

use crate::models::Gender;

/// One row of a bucketed reference table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    /// Inclusive upper bound of this bucket
    pub upper: f64,
    pub value: f64,
}

const fn bucket(upper: f64, value: f64) -> Bucket {
    Bucket { upper, value }
}

/// Expected fat-free mass (kg) by age for a reference-height man
pub const EXPECTED_FFM_BY_AGE_MALE: &[Bucket] = &[
    bucket(19.0, 54.0),
    bucket(29.0, 59.5),
    bucket(39.0, 59.0),
    bucket(49.0, 58.0),
    bucket(59.0, 56.0),
    bucket(69.0, 53.5),
    bucket(f64::INFINITY, 50.5),
];

/// Expected fat-free mass (kg) by age for a reference-height woman
pub const EXPECTED_FFM_BY_AGE_FEMALE: &[Bucket] = &[
    bucket(19.0, 40.5),
    bucket(29.0, 42.5),
    bucket(39.0, 42.0),
    bucket(49.0, 41.5),
    bucket(64.0, 40.0),
    bucket(f64::INFINITY, 38.0),
];

/// Minimum skeletal muscle mass (kg) by height (cm), men
pub const SMM_STANDARD_MIN_BY_HEIGHT_MALE: &[Bucket] = &[
    bucket(165.0, 30.0),
    bucket(175.0, 33.0),
    bucket(185.0, 36.0),
    bucket(f64::INFINITY, 39.0),
];

/// Minimum skeletal muscle mass (kg) by height (cm), women
pub const SMM_STANDARD_MIN_BY_HEIGHT_FEMALE: &[Bucket] = &[
    bucket(155.0, 19.0),
    bucket(165.0, 21.0),
    bucket(175.0, 23.0),
    bucket(f64::INFINITY, 25.0),
];

/// Gender-specific scoring thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenderThresholds {
    /// Body fat % scoring 1.0 on the continuous scale
    pub bf_good: f64,
    /// Body fat % scoring 0.0 on the continuous scale
    pub bf_bad: f64,
    /// Body fat % at or below which the athletic criterion holds; fat penalty starts here
    pub bf_low: f64,
    /// Body fat % at which the fat penalty reaches its maximum
    pub bf_worst: f64,
    /// Minimum skeletal muscle index considered at standard
    pub smi_standard: f64,
    /// Height (cm) the expected-FFM table was built for
    pub reference_height_cm: f64,
}

pub const MALE_THRESHOLDS: GenderThresholds = GenderThresholds {
    bf_good: 12.0,
    bf_bad: 20.0,
    bf_low: 15.0,
    bf_worst: 35.0,
    smi_standard: 8.5,
    reference_height_cm: 171.0,
};

pub const FEMALE_THRESHOLDS: GenderThresholds = GenderThresholds {
    bf_good: 22.0,
    bf_bad: 30.0,
    bf_low: 25.0,
    bf_worst: 40.0,
    smi_standard: 6.0,
    reference_height_cm: 158.0,
};

/// Visceral fat level scoring 1.0 on the continuous scale
pub const VF_GOOD: f64 = 4.0;
/// Visceral fat level scoring 0.0 on the continuous scale
pub const VF_BAD: f64 = 10.0;
/// Visceral fat level at or below which the athletic criterion holds; penalty starts here
pub const VF_LOW: f64 = 6.0;
/// Visceral fat level at which the visceral penalty reaches its maximum
pub const VF_WORST: f64 = 15.0;

/// Half-width of the SMI ramp around the gender standard
pub const SMI_RAMP_HALF_WIDTH: f64 = 0.5;

/// Bounds on the height correction applied to expected FFM
pub const HEIGHT_FACTOR_MIN: f64 = 0.9;
pub const HEIGHT_FACTOR_MAX: f64 = 1.1;

pub fn thresholds(gender: Gender) -> &'static GenderThresholds {
    match gender {
        Gender::Male => &MALE_THRESHOLDS,
        Gender::Female => &FEMALE_THRESHOLDS,
    }
}

pub fn expected_ffm_table(gender: Gender) -> &'static [Bucket] {
    match gender {
        Gender::Male => EXPECTED_FFM_BY_AGE_MALE,
        Gender::Female => EXPECTED_FFM_BY_AGE_FEMALE,
    }
}

pub fn smm_standard_table(gender: Gender) -> &'static [Bucket] {
    match gender {
        Gender::Male => SMM_STANDARD_MIN_BY_HEIGHT_MALE,
        Gender::Female => SMM_STANDARD_MIN_BY_HEIGHT_FEMALE,
    }
}

/// Value of the first bucket whose upper bound covers `x`
///
/// Falls back to the last row for inputs the table does not cover (including NaN).
pub fn lookup(table: &[Bucket], x: f64) -> f64 {
    table
        .iter()
        .find(|b| x <= b.upper)
        .or_else(|| table.last())
        .map(|b| b.value)
        .unwrap_or(0.0)
}

/// Base expected FFM (kg) for a reference-height person of this age
pub fn expected_ffm_by_age(gender: Gender, age: f64) -> f64 {
    lookup(expected_ffm_table(gender), age)
}

/// Minimum skeletal muscle mass (kg) for this height
pub fn smm_standard_min(gender: Gender, height_cm: f64) -> f64 {
    lookup(smm_standard_table(gender), height_cm)
}
