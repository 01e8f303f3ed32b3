use storycad_core::{
    DestinationIssue, NarrativeService, NodeId, OutlineError, OutlineService, StoryDocument,
    StoryItemType, StoryViewType,
};

fn child_names(doc: &StoryDocument, parent: NodeId) -> Vec<String> {
    doc.tree()
        .children(parent)
        .iter()
        .filter_map(|id| doc.tree().get(*id))
        .map(|node| node.name().to_string())
        .collect()
}

fn three_scenes() -> (StoryDocument, [NodeId; 3]) {
    let mut doc = StoryDocument::new("Story").unwrap();
    let root = doc.root(StoryViewType::Explorer);
    let a = doc.add_element(root, StoryItemType::Scene, "A").unwrap();
    let b = doc.add_element(root, StoryItemType::Scene, "B").unwrap();
    let c = doc.add_element(root, StoryItemType::Scene, "C").unwrap();
    doc.mark_saved();
    (doc, [a, b, c])
}

#[test]
fn drag_and_drop_reorders_siblings() {
    let (mut doc, [a, _, c]) = three_scenes();

    OutlineService::new(&mut doc)
        .move_node(Some(c), Some(a))
        .unwrap();

    let root = doc.root(StoryViewType::Explorer);
    assert_eq!(child_names(&doc, root), vec!["C", "A", "B"]);
    assert!(doc.is_changed());
}

#[test]
fn drag_validation_messages() {
    let (mut doc, [a, b, _]) = three_scenes();
    let trash = doc.root(StoryViewType::Trash);
    let mut outline = OutlineService::new(&mut doc);

    assert_eq!(
        outline.validate_drag_source(None),
        Err(OutlineError::InvalidSelection)
    );
    let err = outline.validate_drop_target(Some(trash)).unwrap_err();
    assert_eq!(err.user_message(), "Drag target is not below root");

    outline.delete_node(Some(b)).unwrap();
    let err = outline.move_node(Some(a), Some(b)).unwrap_err();
    assert_eq!(
        err,
        OutlineError::InvalidDestination {
            node: b,
            issue: DestinationIssue::InTrash,
        }
    );
    assert_eq!(err.user_message(), "Drag to Trashcan invalid");

    let err = outline.move_node(Some(b), Some(a)).unwrap_err();
    assert_eq!(err, OutlineError::InvalidSource(b));
    assert_eq!(err.user_message(), "Invalid drag source");
}

#[test]
fn drag_between_views_is_rejected() {
    let (mut doc, [a, b, _]) = three_scenes();
    let report = NarrativeService::new(&mut doc)
        .copy_selected(Some(b))
        .unwrap();

    let err = OutlineService::new(&mut doc)
        .move_node(Some(a), Some(report.copied[0]))
        .unwrap_err();
    assert!(matches!(
        err,
        OutlineError::InvalidDestination {
            issue: DestinationIssue::OtherView,
            ..
        }
    ));
}

#[test]
fn explorer_delete_trashes_subtree_and_drops_narrator_copies() {
    let mut doc = StoryDocument::new("Story").unwrap();
    let root = doc.root(StoryViewType::Explorer);
    let folder = doc.add_element(root, StoryItemType::Folder, "Act I").unwrap();
    let scene = doc.add_element(folder, StoryItemType::Scene, "A").unwrap();
    let report = NarrativeService::new(&mut doc)
        .copy_selected(Some(scene))
        .unwrap();
    let copy = report.copied[0];
    let registry_len = doc.registry().len();

    let outcome = OutlineService::new(&mut doc)
        .delete_node(Some(folder))
        .unwrap();

    assert_eq!(outcome.view, StoryViewType::Explorer);
    assert_eq!(outcome.affected, 2);
    assert_eq!(outcome.narrator_removed, 1);
    assert_eq!(outcome.released, 0);
    let trash = doc.root(StoryViewType::Trash);
    assert_eq!(doc.tree().children(trash), &[folder]);
    assert_eq!(doc.tree().get(scene).unwrap().view(), StoryViewType::Trash);
    assert!(doc.tree().get(copy).is_none());
    assert_eq!(doc.registry().len(), registry_len);
}

#[test]
fn restore_moves_top_level_trash_item_back() {
    let mut doc = StoryDocument::new("Story").unwrap();
    let root = doc.root(StoryViewType::Explorer);
    let folder = doc.add_element(root, StoryItemType::Folder, "Act I").unwrap();
    let scene = doc.add_element(folder, StoryItemType::Scene, "A").unwrap();
    doc.add_element(root, StoryItemType::Scene, "B").unwrap();
    let mut outline = OutlineService::new(&mut doc);
    outline.delete_node(Some(folder)).unwrap();

    assert_eq!(
        outline.restore_from_trash(Some(scene)),
        Err(OutlineError::NotRestorable(scene))
    );
    outline.restore_from_trash(Some(folder)).unwrap();

    assert_eq!(child_names(&doc, root), vec!["B", "Act I"]);
    for node in doc.tree().flatten(folder) {
        assert_eq!(node.view(), StoryViewType::Explorer);
    }
    assert_eq!(doc.tree().parent(scene), Some(folder));
    assert_eq!(doc.tree().view_len(StoryViewType::Trash), 1);
}

#[test]
fn empty_trash_releases_elements() {
    let (mut doc, [a, b, _]) = three_scenes();
    let uuid_a = doc.tree().get(a).unwrap().uuid();
    let mut outline = OutlineService::new(&mut doc);
    outline.delete_node(Some(a)).unwrap();
    outline.delete_node(Some(b)).unwrap();

    assert_eq!(outline.empty_trash().unwrap(), 2);
    assert_eq!(outline.empty_trash().unwrap(), 0);
    assert!(!doc.registry().contains(uuid_a));
    assert_eq!(doc.registry().len(), 3 + 1);
    assert_eq!(doc.tree().view_len(StoryViewType::Trash), 1);
}

#[test]
fn deleting_inside_trash_is_permanent() {
    let (mut doc, [a, _, _]) = three_scenes();
    let mut outline = OutlineService::new(&mut doc);
    outline.delete_node(Some(a)).unwrap();

    let outcome = outline.delete_node(Some(a)).unwrap();
    assert_eq!(outcome.view, StoryViewType::Trash);
    assert_eq!(outcome.released, 1);
    assert!(doc.tree().get(a).is_none());
}

#[test]
fn roots_and_trash_can_are_protected() {
    let (mut doc, _) = three_scenes();
    let roots = [
        StoryViewType::Explorer,
        StoryViewType::Narrator,
        StoryViewType::Trash,
    ]
    .map(|view| doc.root(view));
    let mut outline = OutlineService::new(&mut doc);
    for root in roots {
        assert_eq!(
            outline.delete_node(Some(root)),
            Err(OutlineError::ProtectedNode(root))
        );
    }
}

#[test]
fn search_finds_nodes_in_preorder() {
    let mut doc = StoryDocument::new("Storm Story").unwrap();
    let root = doc.root(StoryViewType::Explorer);
    let folder = doc.add_element(root, StoryItemType::Folder, "Storms").unwrap();
    let inner = doc
        .add_element(folder, StoryItemType::Scene, "The storm breaks")
        .unwrap();
    doc.add_element(root, StoryItemType::Setting, "Island").unwrap();

    let outline = OutlineService::new(&mut doc);
    let hits = outline.search(StoryViewType::Explorer, "STORM").unwrap();
    assert_eq!(hits, vec![root, folder, inner]);
    assert!(outline
        .search(StoryViewType::Narrator, "storm")
        .unwrap()
        .is_empty());
    assert!(outline.search(StoryViewType::Explorer, ".*").unwrap().is_empty());
}
