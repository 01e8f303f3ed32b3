use serde_json::json;
use storycad_core::{ElementValidationError, StoryElement, StoryItemType};
use uuid::Uuid;

#[test]
fn element_new_generates_id_and_normalizes_name() {
    let element = StoryElement::new(StoryItemType::Scene, "  Storm   at sea ").unwrap();

    assert!(!element.uuid.is_nil());
    assert_eq!(element.kind, StoryItemType::Scene);
    assert_eq!(element.name, "Storm at sea");
}

#[test]
fn element_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let element = StoryElement::with_id(id, StoryItemType::TrashCan, "Deleted").unwrap();

    let value = serde_json::to_value(&element).unwrap();
    assert_eq!(value["uuid"], id.to_string());
    assert_eq!(value["type"], "trash_can");
    assert_eq!(value["name"], "Deleted");

    let decoded: StoryElement = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, element);
}

#[test]
fn deserialization_rejects_nil_uuid_and_blank_name() {
    let nil = json!({ "uuid": Uuid::nil().to_string(), "type": "scene", "name": "A" });
    assert!(serde_json::from_value::<StoryElement>(nil).is_err());

    let blank = json!({ "uuid": Uuid::new_v4().to_string(), "type": "scene", "name": "  " });
    assert!(serde_json::from_value::<StoryElement>(blank).is_err());

    let unknown = json!({ "uuid": Uuid::new_v4().to_string(), "type": "chapter", "name": "A" });
    assert!(serde_json::from_value::<StoryElement>(unknown).is_err());
}

#[test]
fn with_id_rejects_nil_uuid() {
    let err = StoryElement::with_id(Uuid::nil(), StoryItemType::Scene, "A").unwrap_err();
    assert_eq!(err, ElementValidationError::NilUuid);
}

#[test]
fn rename_keeps_previous_name_on_blank_input() {
    let mut element = StoryElement::new(StoryItemType::Character, "Ariel").unwrap();
    assert_eq!(
        element.rename("\t\n").unwrap_err(),
        ElementValidationError::BlankName
    );
    assert_eq!(element.name, "Ariel");
}
