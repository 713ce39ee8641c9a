use chrono::NaiveDate;
use planner_core::{Assignment, AssignmentValidationError, Lesson, TenantId};

fn due() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, 14).unwrap()
}

#[test]
fn validate_rejects_blank_and_placeholder_notes() {
    let blank = Assignment::new(Lesson::Math, due(), false, " \t ");
    assert_eq!(blank.validate(), Err(AssignmentValidationError::BlankNotes));

    for placeholder in ["Notes...", "notes...", "NOTES..."] {
        let assignment = Assignment::new(Lesson::Math, due(), false, placeholder);
        assert_eq!(
            assignment.validate(),
            Err(AssignmentValidationError::PlaceholderNotes)
        );
    }

    let padded = Assignment::new(Lesson::Math, due(), false, " Notes... ");
    assert!(padded.is_valid());
}

#[test]
fn validate_rejects_placeholder_lesson_regardless_of_notes() {
    let assignment = Assignment::new(Lesson::None, due(), true, "a perfectly fine note");
    assert_eq!(
        assignment.validate(),
        Err(AssignmentValidationError::PlaceholderLesson)
    );
    assert_eq!(Lesson::None.display_name(), "+");
}

#[test]
fn assignments_compare_by_value() {
    let a = Assignment::new(Lesson::Art, due(), false, "sketch");
    let b = Assignment::new(Lesson::Art, due(), false, "sketch");
    let c = Assignment::new(Lesson::Art, due(), true, "sketch");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn assignment_serialization_uses_expected_wire_fields() {
    let assignment = Assignment::new(Lesson::ComputerScience, due(), true, "binary search");

    let json = serde_json::to_value(&assignment).unwrap();
    assert_eq!(json["lesson"], "computer_science");
    assert_eq!(json["due_date"], "2026-12-14");
    assert_eq!(json["completed"], true);
    assert_eq!(json["notes"], "binary search");

    let decoded: Assignment = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, assignment);
}

#[test]
fn tenant_id_deserialization_enforces_validation() {
    let ok: TenantId = serde_json::from_value(serde_json::json!(" alex ")).unwrap();
    assert_eq!(ok.as_str(), "alex");

    let err = serde_json::from_value::<TenantId>(serde_json::json!("a,b")).unwrap_err();
    assert!(err.to_string().contains("must not contain"), "unexpected error: {err}");
}
