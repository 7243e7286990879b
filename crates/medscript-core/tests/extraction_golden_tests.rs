//! Golden tests for the heuristic extraction engine.
//!
//! These tests verify extraction against known prescription lines.

use medscript_core::extraction::HeuristicExtractor;
use medscript_core::models::DrugForm;

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    line: &'static str,
    expected_name: &'static str,
    expected_form: DrugForm,
    expected_dosage: &'static str,
    expected_frequency: i64,
    expected_duration: Option<i64>,
    expected_instruction: Option<&'static str>,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "tablet-od",
            line: "Tab Dolo 650 OD x 5d",
            expected_name: "Dolo",
            expected_form: DrugForm::Tablet,
            expected_dosage: "1 tablet (650)",
            expected_frequency: 1,
            expected_duration: Some(5),
            expected_instruction: None,
        },
        GoldenCase {
            id: "capsule-bd",
            line: "Cap Amoxil 500 BD x 7d",
            expected_name: "Amoxil",
            expected_form: DrugForm::Capsule,
            expected_dosage: "1 capsule (500)",
            expected_frequency: 2,
            expected_duration: Some(7),
            expected_instruction: None,
        },
        GoldenCase {
            id: "syrup-tds",
            line: "Syr Cetirizine 5ml TDS x 3d",
            expected_name: "Cetirizine",
            expected_form: DrugForm::Syrup,
            expected_dosage: "1 measure (5ml)",
            expected_frequency: 3,
            expected_duration: Some(3),
            expected_instruction: None,
        },
        GoldenCase {
            id: "injection-qds-prn",
            line: "Inj Insulin 10u QDS PRN",
            expected_name: "Insulin",
            expected_form: DrugForm::Injection,
            expected_dosage: "1 injection (10u)",
            expected_frequency: 4,
            expected_duration: None,
            expected_instruction: Some("As needed"),
        },
        GoldenCase {
            id: "natural-language",
            line: "Paracetamol 500mg twice daily for 3 days",
            expected_name: "Paracetamol",
            expected_form: DrugForm::Tablet,
            expected_dosage: "1 tablet (500mg)",
            expected_frequency: 2,
            expected_duration: Some(3),
            expected_instruction: None,
        },
        GoldenCase {
            id: "dashed-capsule",
            line: "Amoxicillin 500mg - 1 capsule - twice daily - 7 days",
            expected_name: "Amoxicillin",
            expected_form: DrugForm::Capsule,
            expected_dosage: "1 capsule (500mg)",
            expected_frequency: 2,
            expected_duration: Some(7),
            expected_instruction: None,
        },
        GoldenCase {
            id: "dashed-n-times",
            line: "Dolo 650 - 1 tablet - 3 times daily - 5 days",
            expected_name: "Dolo",
            expected_form: DrugForm::Tablet,
            expected_dosage: "1 tablet (650)",
            expected_frequency: 3,
            expected_duration: Some(5),
            expected_instruction: None,
        },
        GoldenCase {
            id: "weeks-before-meals",
            line: "Tab Pantoprazole 40mg OD AC x 2 weeks",
            expected_name: "Pantoprazole",
            expected_form: DrugForm::Tablet,
            expected_dosage: "1 tablet (40mg)",
            expected_frequency: 1,
            expected_duration: Some(14),
            expected_instruction: Some("Before meals"),
        },
        GoldenCase {
            id: "count-after-strength",
            line: "Cap Omez 20 2 BD",
            expected_name: "Omez",
            expected_form: DrugForm::Capsule,
            expected_dosage: "2 capsules (20)",
            expected_frequency: 2,
            expected_duration: None,
            expected_instruction: None,
        },
        GoldenCase {
            id: "numbered-bedtime",
            line: "1. Tab Montair LC HS x 10d",
            expected_name: "Montair LC",
            expected_form: DrugForm::Tablet,
            expected_dosage: "1 tablet",
            expected_frequency: 1,
            expected_duration: Some(10),
            expected_instruction: Some("At bedtime"),
        },
        GoldenCase {
            id: "leading-prn-tablet",
            line: "PRN Tab Dolo 650",
            expected_name: "Dolo",
            expected_form: DrugForm::Tablet,
            expected_dosage: "1 tablet (650)",
            expected_frequency: 1,
            expected_duration: None,
            expected_instruction: Some("As needed"),
        },
        GoldenCase {
            id: "leading-sos-injection",
            line: "SOS Inj Insulin 10u",
            expected_name: "Insulin",
            expected_form: DrugForm::Injection,
            expected_dosage: "1 injection (10u)",
            expected_frequency: 1,
            expected_duration: None,
            expected_instruction: Some("As needed"),
        },
    ]
}

#[test]
fn test_golden_cases() {
    let engine = HeuristicExtractor::new();

    for case in get_golden_cases() {
        let candidate = engine
            .extract_line(case.line)
            .unwrap_or_else(|| panic!("Case {}: no candidate", case.id));

        assert_eq!(
            candidate.medicine_name.as_deref(),
            Some(case.expected_name),
            "Case {}: name mismatch",
            case.id
        );
        assert_eq!(
            candidate.form,
            Some(case.expected_form),
            "Case {}: form mismatch",
            case.id
        );
        assert_eq!(
            candidate.dosage.as_deref(),
            Some(case.expected_dosage),
            "Case {}: dosage mismatch",
            case.id
        );
        assert_eq!(
            candidate.frequency,
            Some(case.expected_frequency),
            "Case {}: frequency mismatch",
            case.id
        );
        assert_eq!(
            candidate.course_duration_days, case.expected_duration,
            "Case {}: duration mismatch",
            case.id
        );
        assert_eq!(
            candidate.administration_instruction.as_deref(),
            case.expected_instruction,
            "Case {}: instruction mismatch",
            case.id
        );
        assert_eq!(
            candidate.raw_line.as_deref(),
            Some(case.line),
            "Case {}: raw line mismatch",
            case.id
        );
    }
}

#[test]
fn test_golden_cases_as_one_document() {
    let engine = HeuristicExtractor::new();
    let cases = get_golden_cases();
    let document = cases
        .iter()
        .map(|c| c.line)
        .collect::<Vec<_>>()
        .join("\n");

    let names: Vec<String> = engine
        .extract(&document)
        .into_iter()
        .filter_map(|c| c.medicine_name)
        .collect();
    let expected: Vec<&str> = cases.iter().map(|c| c.expected_name).collect();

    assert_eq!(names, expected);
}

#[test]
fn test_lines_without_a_name_are_dropped() {
    let engine = HeuristicExtractor::new();

    for line in [
        "Patient: John Doe",
        "Date: 12/03/2024",
        "x 5 days",
        "650 OD",
        "---",
        "BD x 7d",
    ] {
        assert!(
            engine.extract_line(line).is_none(),
            "{:?} should not yield a candidate",
            line
        );
    }
}
