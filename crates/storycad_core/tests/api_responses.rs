use storycad_core::api;
use storycad_core::{StoryDocument, StoryItemType, StoryViewType};

fn story() -> StoryDocument {
    let mut doc = StoryDocument::new("Story").unwrap();
    let root = doc.root(StoryViewType::Explorer);
    let folder = doc.add_element(root, StoryItemType::Folder, "F").unwrap();
    doc.add_element(folder, StoryItemType::Scene, "A").unwrap();
    doc.add_element(folder, StoryItemType::Scene, "B").unwrap();
    doc.add_element(root, StoryItemType::Problem, "P").unwrap();
    doc
}

fn find(doc: &StoryDocument, name: &str) -> storycad_core::NodeId {
    let root = doc.root(StoryViewType::Explorer);
    doc.tree()
        .flatten(root)
        .find(|node| node.name() == name)
        .map(|node| node.id())
        .unwrap()
}

#[test]
fn copy_messages_follow_selection_kind() {
    let mut doc = story();
    let scene = find(&doc, "A");
    let folder = find(&doc, "F");
    let problem = find(&doc, "P");

    let response = api::copy_to_narrator(&mut doc, Some(scene));
    assert!(response.ok);
    assert_eq!(response.message, "Copied A");
    assert_eq!(response.count, 1);
    assert!(response.node_id.is_some());

    let response = api::copy_to_narrator(&mut doc, Some(scene));
    assert!(!response.ok);
    assert_eq!(
        response.message,
        "This scene already appears in the narrative view."
    );

    let response = api::copy_to_narrator(&mut doc, Some(folder));
    assert!(response.ok);
    assert_eq!(response.message, "Copied 1 scene(s) from F.");

    let response = api::copy_to_narrator(&mut doc, Some(problem));
    assert!(!response.ok);
    assert_eq!(response.message, "You can't copy that.");
}

#[test]
fn copy_all_reports_count() {
    let mut doc = story();
    let response = api::copy_all_unused_scenes(&mut doc);
    assert!(response.ok);
    assert_eq!(response.message, "Copied 2 unused scene(s).");

    let response = api::copy_all_unused_scenes(&mut doc);
    assert_eq!(response.message, "Copied 0 unused scene(s).");
    assert_eq!(response.node_id, None);
}

#[test]
fn narrator_delete_messages() {
    let mut doc = story();
    let narrator_root = doc.root(StoryViewType::Narrator);
    let response = api::copy_all_unused_scenes(&mut doc);
    let first_copy = doc.tree().children(narrator_root)[0];
    assert_eq!(response.node_id, Some(first_copy.to_string()));

    let response = api::delete_from_narrator(&mut doc, Some(narrator_root));
    assert_eq!(response.message, "You can't delete this node!");

    let scene = find(&doc, "B");
    let response = api::delete_from_narrator(&mut doc, Some(scene));
    assert_eq!(response.message, "You can't delete from here!");

    let response = api::delete_from_narrator(&mut doc, Some(first_copy));
    assert!(response.ok);
    assert_eq!(response.message, "Deleted A");
}

#[test]
fn outline_command_messages() {
    let mut doc = story();
    let scene_a = find(&doc, "A");
    let scene_b = find(&doc, "B");
    let root = doc.root(StoryViewType::Explorer);

    let response = api::move_node(&mut doc, Some(scene_b), Some(scene_a));
    assert!(response.ok);
    assert_eq!(response.message, "Drag and drop successful");

    let response = api::move_node(&mut doc, Some(scene_b), Some(root));
    assert_eq!(response.message, "Drag target is not below root");

    let response = api::delete_node(&mut doc, Some(scene_a));
    assert_eq!(response.message, "Deleted A");
    let response = api::move_node(&mut doc, Some(scene_b), Some(scene_a));
    assert_eq!(response.message, "Drag to Trashcan invalid");
    let response = api::move_node(&mut doc, Some(scene_a), Some(scene_b));
    assert_eq!(response.message, "Invalid drag source");

    let response = api::restore_from_trash(&mut doc, Some(scene_a));
    assert!(response.ok);
    assert_eq!(response.message, "Restored A");

    api::delete_node(&mut doc, Some(scene_a));
    let response = api::empty_trash(&mut doc);
    assert_eq!(response.count, 1);

    let response = api::delete_node(&mut doc, Some(root));
    assert_eq!(response.message, "You can't delete this node!");
}

#[test]
fn search_response_lists_matches() {
    let doc = story();
    let response = api::search(&doc, StoryViewType::Explorer, "a");
    let names: Vec<_> = response.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["A"]);
    assert_eq!(response.items[0].kind, StoryItemType::Scene);
    assert_eq!(response.message, "Found 1 node(s).");

    let response = api::search(&doc, StoryViewType::Explorer, "");
    assert!(response.items.is_empty());
}

#[test]
fn action_response_serializes_flat_fields() {
    let mut doc = story();
    let response = api::copy_to_narrator(&mut doc, None);
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["ok"], false);
    assert_eq!(value["message"], "No node selected.");
    assert!(value["node_id"].is_null());
    assert_eq!(value["count"], 0);
}
