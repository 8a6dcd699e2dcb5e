use healthage::export::{self, ExportFormat};
use healthage::scoring::{compute_continuous_scores, compute_is_athletic};
use healthage::{
    compute_health_age, evaluate_batch, BatchConfig, Gender, HealthAgeError, HealthAgeInput,
    ImportManager,
};
use std::io::Write;
use tempfile::tempdir;

/// Integration tests covering import → evaluate → export and the engine's public contract

#[test]
fn test_graceful_degradation_contract() {
    let input = HealthAgeInput::new(40.0, Gender::Male, 20.0, 8.0);
    let result = compute_health_age(&input).unwrap();

    assert_eq!(result.health_age, 40);
    assert_eq!(result.debug.expected_ffm_kg, None);
    assert_eq!(result.debug.metabolic_age_raw, 40.0);
}

#[test]
fn test_explicit_muscle_flag_priority() {
    let input = HealthAgeInput::new(40.0, Gender::Male, 25.0, 5.0)
        .with_muscle_above_standard(true)
        .with_smi(7.5);

    assert_eq!(compute_continuous_scores(&input).muscle_score, 1.0);
    // visceral + explicit muscle flag carry the vote even though SMI is below 8.5
    assert!(compute_is_athletic(&input));
}

#[test]
fn test_validation_errors_name_the_field() {
    let err = compute_health_age(&HealthAgeInput::new(5.0, Gender::Male, 20.0, 8.0)).unwrap_err();
    assert!(matches!(err, HealthAgeError::InvalidInput { ref field, .. } if field == "actualAge"));
    assert!(err.user_message().contains("Please complete required measurements"));

    let json = r#"{"actualAge":40,"gender":"other","bodyFatPercent":20,"visceralFatLevel":8}"#;
    assert!(serde_json::from_str::<HealthAgeInput>(json).is_err());
    assert!("other".parse::<Gender>().is_err());
}

#[test]
fn test_extreme_inputs_at_youngest_age() {
    let worst = HealthAgeInput::new(10.0, Gender::Female, 60.0, 30.0)
        .with_height(120.0)
        .with_weight(30.0);
    let result = compute_health_age(&worst).unwrap();
    assert_eq!(result.health_age, 17);

    let best = HealthAgeInput::new(10.0, Gender::Female, 5.0, 1.0)
        .with_height(200.0)
        .with_ffm(80.0)
        .with_muscle_above_standard(true);
    let result = compute_health_age(&best).unwrap();
    assert_eq!(result.health_age, 3);
    assert!(result.is_athletic);
}

#[test]
fn test_extreme_inputs_at_oldest_age() {
    let worst = HealthAgeInput::new(99.0, Gender::Male, 55.0, 25.0)
        .with_height(150.0)
        .with_weight(45.0);
    let result = compute_health_age(&worst).unwrap();
    assert_eq!(result.health_age, 106);

    let best = HealthAgeInput::new(99.0, Gender::Male, 8.0, 2.0)
        .with_height(185.0)
        .with_ffm(75.0)
        .with_smi(9.5);
    let result = compute_health_age(&best).unwrap();
    assert_eq!(result.health_age, 92);
}

#[test]
fn test_csv_import_batch_and_export() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("scans.csv");

    let mut file = std::fs::File::create(&input_path).unwrap();
    writeln!(file, "id,measured_at,age,gender,height,weight,body_fat,visceral_fat,smi").unwrap();
    writeln!(file, "a,2024-05-01,40,male,175,80,20,8,").unwrap();
    writeln!(file, "b,2024-05-02,40,male,,,20,8,").unwrap();
    writeln!(file, "c,2024-05-03,8,female,160,55,28,4,6.1").unwrap();
    writeln!(file, "d,2024-05-04,33,female,165,58,21,3,6.8").unwrap();
    drop(file);

    let records = ImportManager::new().import_file(&input_path).unwrap();
    assert_eq!(records.len(), 4);

    let summary = evaluate_batch(&records, &BatchConfig::default()).unwrap();
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.degraded, 1);

    let first = summary.outcomes[0].result.as_ref().unwrap();
    assert_eq!(first.health_age, 39);

    let athlete = summary.outcomes[3].result.as_ref().unwrap();
    assert!(athlete.is_athletic);
    assert!(athlete.health_age <= 33);

    let output_path = dir.path().join("results.json");
    export::export_summary(&summary, ExportFormat::Json, &output_path).unwrap();

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(exported["total"], 4);
    assert_eq!(exported["outcomes"][1]["result"]["debug"]["expectedFfmKg"], serde_json::Value::Null);
    assert!(exported["outcomes"][2]["error"]
        .as_str()
        .unwrap()
        .contains("actualAge"));
}

#[test]
fn test_json_import_round_trip_through_text_report() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("scans.json");
    std::fs::write(
        &input_path,
        r#"[
            {"id": "x", "actualAge": 61, "gender": "female", "heightCm": 158,
             "weightKg": 70, "bodyFatPercent": 38, "visceralFatLevel": 12},
            {"id": "y", "actualAge": 61, "gender": "female", "heightCm": 158,
             "ffmKg": 44, "bodyFatPercent": 24, "visceralFatLevel": 5, "smi": 6.3}
        ]"#,
    )
    .unwrap();

    let records = ImportManager::new().import_file(&input_path).unwrap();
    let summary = evaluate_batch(&records, &BatchConfig::default()).unwrap();

    let heavy = summary.outcomes[0].result.as_ref().unwrap();
    let lean = summary.outcomes[1].result.as_ref().unwrap();
    assert!(heavy.health_age > 61);
    assert!(lean.health_age < 61);

    let report = export::render(&summary, ExportFormat::Text).unwrap();
    assert!(report.contains("Records:   2"));
    assert!(report.contains("Succeeded: 2"));
}

#[test]
fn test_fractional_age_rejected_from_text_sources() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("fractional.json");
    std::fs::write(
        &input_path,
        r#"[
            {"id": "half", "actualAge": 40.5, "gender": "male", "heightCm": 150,
             "weightKg": 60, "bodyFatPercent": 50, "visceralFatLevel": 20},
            {"id": "whole", "actualAge": 40, "gender": "male", "heightCm": 150,
             "weightKg": 60, "bodyFatPercent": 50, "visceralFatLevel": 20}
        ]"#,
    )
    .unwrap();

    let records = ImportManager::new().import_file(&input_path).unwrap();
    let summary = evaluate_batch(&records, &BatchConfig::default()).unwrap();

    assert_eq!(summary.failed, 1);
    assert!(summary.outcomes[0].error.as_ref().unwrap().contains("actualAge"));

    let whole = &summary.outcomes[1];
    let result = whole.result.as_ref().unwrap();
    assert_eq!(result.health_age, 47);
    assert!(result.health_age as f64 <= whole.actual_age + 7.0);
}
