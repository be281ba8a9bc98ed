use daylog_core::{
    Priority, Review, ReviewDraft, ReviewId, ReviewPatch, ReviewStatus, ReviewValidationError,
};
use serde_json::json;

fn sample() -> Review {
    serde_json::from_value(json!({
        "id": "1737170000000",
        "title": "morning run",
        "content": "5km",
        "priority": "high",
        "createTime": 1_737_170_000_000_i64
    }))
    .unwrap()
}

#[test]
fn legacy_record_decodes_with_absent_status() {
    let review = sample();

    assert_eq!(review.id, ReviewId::from("1737170000000"));
    assert_eq!(review.priority, Priority::High);
    assert_eq!(review.status, None);
    assert!(review.is_completed());
    assert!(!review.is_failed());
}

#[test]
fn serialization_uses_collection_wire_fields() {
    let mut review = sample();
    review.priority = Priority::None;
    review.status = Some(ReviewStatus::Failed);

    let value = serde_json::to_value(&review).unwrap();
    assert_eq!(value["id"], "1737170000000");
    assert_eq!(value["priority"], "");
    assert_eq!(value["status"], "failed");
    assert_eq!(value["createTime"], 1_737_170_000_000_i64);
    assert!(value.get("create_time").is_none());

    let decoded: Review = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, review);
}

#[test]
fn absent_status_is_not_written_back() {
    let value = serde_json::to_value(sample()).unwrap();
    assert!(value.get("status").is_none());
}

#[test]
fn unknown_fields_survive_a_round_trip() {
    let raw = json!({
        "id": "a",
        "title": "t",
        "content": "",
        "priority": "",
        "createTime": 1,
        "offsetX": -80,
        "isDeleting": false
    });
    let review: Review = serde_json::from_value(raw).unwrap();
    assert_eq!(review.extra["offsetX"], -80);

    let encoded = serde_json::to_value(&review).unwrap();
    assert_eq!(encoded["offsetX"], -80);
    assert_eq!(encoded["isDeleting"], false);
}

#[test]
fn patch_changes_only_listed_fields() {
    let mut review = sample();
    let original = review.clone();
    let patch = ReviewPatch::new()
        .content("10km")
        .status(ReviewStatus::Completed);

    review.apply(&patch);

    assert_eq!(review.id, original.id);
    assert_eq!(review.create_time, original.create_time);
    assert_eq!(review.title, original.title);
    assert_eq!(review.priority, original.priority);
    assert_eq!(review.content, "10km");
    assert_eq!(review.status, Some(ReviewStatus::Completed));
}

#[test]
fn patch_validation_rejects_long_titles() {
    let patch = ReviewPatch::new().title("this-title-is-far-too-long-for-the-limit");
    assert!(matches!(
        patch.validate().unwrap_err(),
        ReviewValidationError::TitleTooLong { max: 14, .. }
    ));
    assert!(ReviewPatch::new().content("anything").validate().is_ok());
}

#[test]
fn draft_validation_checks_title() {
    assert!(ReviewDraft::new("fourteen chars").validate().is_ok());
    assert_eq!(
        ReviewDraft::new("").validate().unwrap_err(),
        ReviewValidationError::EmptyTitle
    );
}

#[test]
fn generated_ids_are_distinct() {
    let ids: std::collections::HashSet<ReviewId> =
        (0..64).map(|_| ReviewId::generate()).collect();
    assert_eq!(ids.len(), 64);
}
