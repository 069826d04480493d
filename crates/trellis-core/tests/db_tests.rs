use jiff::civil::Date;
use serde_json::json;
use tempfile::NamedTempFile;
use trellis_core::{
    Database, ItemFilter, ItemStatus, NewItem, NewStep, PlannerError, UpdateItemRequest,
};

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn plan(name: &str) -> NewItem {
    NewItem {
        name: name.to_string(),
        ..Default::default()
    }
}

fn date(year: i16, month: i8, day: i8) -> Date {
    Date::new(year, month, day).unwrap()
}

#[test]
fn test_database_initialization() {
    let (temp_file, _db) = create_test_db();
    assert!(temp_file.path().exists());
}

#[test]
fn test_create_item() {
    let (_temp_file, mut db) = create_test_db();

    let item = db
        .create_item(&NewItem {
            name: "Japan Trip".to_string(),
            description: Some("A week in Tokyo and Kyoto".to_string()),
            category: "travel".to_string(),
            ..Default::default()
        })
        .expect("Failed to create item");

    assert!(item.id > 0);
    assert_eq!(item.name, "Japan Trip");
    assert_eq!(item.description, Some("A week in Tokyo and Kyoto".to_string()));
    assert_eq!(item.category, "travel");
    assert_eq!(item.status, ItemStatus::Pending);
    assert!(item.is_plan());
    assert_eq!(item.created_at, item.updated_at);
}

#[test]
fn test_create_item_rejects_blank_name() {
    let (_temp_file, mut db) = create_test_db();

    for name in ["", "   "] {
        let result = db.create_item(&plan(name));
        assert!(matches!(
            result.unwrap_err(),
            PlannerError::InvalidInput { ref field, .. } if field == "name"
        ));
    }
}

#[test]
fn test_create_item_with_missing_parent() {
    let (_temp_file, mut db) = create_test_db();

    let result = db.create_item(&NewItem {
        name: "Orphan".to_string(),
        parent_id: Some(999),
        ..Default::default()
    });

    match result.unwrap_err() {
        PlannerError::ItemNotFound { id } => assert_eq!(id, 999),
        other => panic!("Expected ItemNotFound, got {other:?}"),
    }
}

#[test]
fn test_get_item() {
    let (_temp_file, mut db) = create_test_db();

    let created = db.create_item(&plan("Get Me")).expect("Failed to create item");

    let fetched = db
        .get_item(created.id)
        .expect("Failed to get item")
        .expect("Item should exist");
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, "Get Me");

    assert!(db.get_item(999).expect("Failed to get item").is_none());
}

#[test]
fn test_metadata_round_trip() {
    let (_temp_file, mut db) = create_test_db();

    let created = db
        .create_item(&NewItem {
            name: "Budgeted".to_string(),
            metadata: json!({"budget": 500}),
            ..Default::default()
        })
        .expect("Failed to create item");

    let fetched = db
        .get_item(created.id)
        .expect("Failed to get item")
        .expect("Item should exist");
    assert_eq!(fetched.metadata, json!({"budget": 500}));
    assert_eq!(fetched.metadata["budget"], 500);
}

#[test]
fn test_add_step_inherits_parent_category() {
    let (_temp_file, mut db) = create_test_db();

    let parent = db
        .create_item(&NewItem {
            name: "Japan Trip".to_string(),
            category: "travel".to_string(),
            ..Default::default()
        })
        .expect("Failed to create parent");

    let step = db
        .add_step(
            parent.id,
            &NewStep {
                name: "Book Flight".to_string(),
                ..Default::default()
            },
        )
        .expect("Failed to add step");

    assert_eq!(step.parent_id, Some(parent.id));
    assert_eq!(step.category, "travel");
    assert_eq!(step.status, ItemStatus::Pending);

    // The copy is one-time: changing the parent's category afterwards does
    // not propagate to the step.
    db.update_item(
        parent.id,
        &UpdateItemRequest {
            category: Some("vacation".to_string()),
            ..Default::default()
        },
    )
    .expect("Failed to update parent");

    let fetched = db
        .get_item(step.id)
        .expect("Failed to get step")
        .expect("Step should exist");
    assert_eq!(fetched.category, "travel");
}

#[test]
fn test_add_step_with_missing_parent() {
    let (_temp_file, mut db) = create_test_db();

    let result = db.add_step(
        42,
        &NewStep {
            name: "Dangling".to_string(),
            ..Default::default()
        },
    );
    assert!(matches!(
        result.unwrap_err(),
        PlannerError::ItemNotFound { id: 42 }
    ));
}

#[test]
fn test_query_parent_modes_are_distinct() {
    let (_temp_file, mut db) = create_test_db();

    let plan_a = db.create_item(&plan("Plan A")).unwrap();
    let plan_b = db.create_item(&plan("Plan B")).unwrap();
    let step = db
        .add_step(
            plan_a.id,
            &NewStep {
                name: "Step under A".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

    // No parent filter: everything.
    let all = db.query_items(&ItemFilter::default()).unwrap();
    assert_eq!(all.len(), 3);

    // Top-level only: the two plans, not the step.
    let top = db.query_items(&ItemFilter::top_level()).unwrap();
    assert_eq!(top.len(), 2);
    assert!(top.iter().all(|i| i.parent_id.is_none()));

    // Children of one item.
    let children = db.query_items(&ItemFilter::children_of(plan_a.id)).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, step.id);

    let none = db.query_items(&ItemFilter::children_of(plan_b.id)).unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_query_filters_combine_with_and_semantics() {
    let (_temp_file, mut db) = create_test_db();

    let travel = db
        .create_item(&NewItem {
            name: "Trip".to_string(),
            category: "travel".to_string(),
            ..Default::default()
        })
        .unwrap();
    db.create_item(&NewItem {
        name: "Course".to_string(),
        category: "study".to_string(),
        ..Default::default()
    })
    .unwrap();

    db.update_item(
        travel.id,
        &UpdateItemRequest {
            status: Some(ItemStatus::InProgress),
            ..Default::default()
        },
    )
    .unwrap();

    let filter = ItemFilter {
        category: Some("travel".to_string()),
        status: Some(ItemStatus::InProgress),
        ..Default::default()
    };
    let matched = db.query_items(&filter).unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, travel.id);

    // Same category, different status: no match, empty list rather than an
    // error.
    let filter = ItemFilter {
        category: Some("travel".to_string()),
        status: Some(ItemStatus::Completed),
        ..Default::default()
    };
    assert!(db.query_items(&filter).unwrap().is_empty());
}

#[test]
fn test_query_orders_by_schedule_then_creation() {
    let (_temp_file, mut db) = create_test_db();

    let dateless = db.create_item(&plan("Dateless")).unwrap();
    let later = db
        .create_item(&NewItem {
            name: "Later".to_string(),
            scheduled_at: Some(date(2099, 6, 1)),
            ..Default::default()
        })
        .unwrap();
    let earlier = db
        .create_item(&NewItem {
            name: "Earlier".to_string(),
            scheduled_at: Some(date(2099, 1, 1)),
            ..Default::default()
        })
        .unwrap();

    let items = db.query_items(&ItemFilter::default()).unwrap();
    let ids: Vec<u64> = items.iter().map(|i| i.id).collect();

    // Dated items ascending first; dateless items sort after them.
    assert_eq!(ids, vec![earlier.id, later.id, dateless.id]);
}

#[test]
fn test_query_scheduled_date_range() {
    let (_temp_file, mut db) = create_test_db();

    for (name, month) in [("Jan", 1), ("Jun", 6), ("Dec", 12)] {
        db.create_item(&NewItem {
            name: name.to_string(),
            scheduled_at: Some(date(2099, month, 15)),
            ..Default::default()
        })
        .unwrap();
    }

    let filter = ItemFilter {
        scheduled_from: Some(date(2099, 2, 1)),
        scheduled_to: Some(date(2099, 7, 1)),
        ..Default::default()
    };
    let matched = db.query_items(&filter).unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "Jun");
}

#[test]
fn test_update_item_fields() {
    let (_temp_file, mut db) = create_test_db();

    let item = db.create_item(&plan("Original")).unwrap();

    std::thread::sleep(std::time::Duration::from_millis(5));

    let updated = db
        .update_item(
            item.id,
            &UpdateItemRequest {
                name: Some("Renamed".to_string()),
                description: Some("Now described".to_string()),
                status: Some(ItemStatus::InProgress),
                metadata: Some(json!({"priority": "high"})),
                ..Default::default()
            },
        )
        .expect("Failed to update item");
    assert!(updated);

    let fetched = db.get_item(item.id).unwrap().unwrap();
    assert_eq!(fetched.name, "Renamed");
    assert_eq!(fetched.description, Some("Now described".to_string()));
    assert_eq!(fetched.status, ItemStatus::InProgress);
    assert_eq!(fetched.metadata, json!({"priority": "high"}));
    assert!(fetched.updated_at > item.updated_at);
    assert_eq!(fetched.created_at, item.created_at);
}

#[test]
fn test_update_missing_item_returns_false() {
    let (_temp_file, mut db) = create_test_db();

    let updated = db
        .update_item(
            999,
            &UpdateItemRequest {
                name: Some("Ghost".to_string()),
                ..Default::default()
            },
        )
        .expect("Update of missing item should not error");
    assert!(!updated);
}

#[test]
fn test_empty_update_returns_false() {
    let (_temp_file, mut db) = create_test_db();

    let item = db.create_item(&plan("Untouched")).unwrap();
    let updated = db
        .update_item(item.id, &UpdateItemRequest::default())
        .unwrap();
    assert!(!updated);

    let fetched = db.get_item(item.id).unwrap().unwrap();
    assert_eq!(fetched.updated_at, item.updated_at);
}

#[test]
fn test_idempotent_status_update_still_refreshes_updated_at() {
    let (_temp_file, mut db) = create_test_db();

    let item = db.create_item(&plan("Same Status")).unwrap();

    std::thread::sleep(std::time::Duration::from_millis(5));

    let updated = db
        .update_item(
            item.id,
            &UpdateItemRequest {
                status: Some(ItemStatus::Pending),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(updated);

    let fetched = db.get_item(item.id).unwrap().unwrap();
    assert_eq!(fetched.status, ItemStatus::Pending);
    assert!(fetched.updated_at > item.updated_at);
}

#[test]
fn test_update_reparent_and_detach() {
    let (_temp_file, mut db) = create_test_db();

    let plan_a = db.create_item(&plan("Plan A")).unwrap();
    let plan_b = db.create_item(&plan("Plan B")).unwrap();
    let step = db
        .add_step(
            plan_a.id,
            &NewStep {
                name: "Mobile Step".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

    // Move the step under the other plan.
    db.update_item(
        step.id,
        &UpdateItemRequest {
            parent: Some(Some(plan_b.id)),
            ..Default::default()
        },
    )
    .unwrap();
    let fetched = db.get_item(step.id).unwrap().unwrap();
    assert_eq!(fetched.parent_id, Some(plan_b.id));

    // Detach it to top level.
    db.update_item(
        step.id,
        &UpdateItemRequest {
            parent: Some(None),
            ..Default::default()
        },
    )
    .unwrap();
    let fetched = db.get_item(step.id).unwrap().unwrap();
    assert!(fetched.is_plan());
}

#[test]
fn test_update_rejects_missing_new_parent() {
    let (_temp_file, mut db) = create_test_db();

    let item = db.create_item(&plan("Loner")).unwrap();
    let result = db.update_item(
        item.id,
        &UpdateItemRequest {
            parent: Some(Some(999)),
            ..Default::default()
        },
    );
    assert!(matches!(
        result.unwrap_err(),
        PlannerError::ItemNotFound { id: 999 }
    ));
}

#[test]
fn test_update_rejects_cycle_creating_reparent() {
    let (_temp_file, mut db) = create_test_db();

    // root <- mid <- leaf
    let root = db.create_item(&plan("Root")).unwrap();
    let mid = db
        .add_step(
            root.id,
            &NewStep {
                name: "Mid".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    let leaf = db
        .add_step(
            mid.id,
            &NewStep {
                name: "Leaf".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

    // Reparenting the root under its own grandchild must fail.
    let result = db.update_item(
        root.id,
        &UpdateItemRequest {
            parent: Some(Some(leaf.id)),
            ..Default::default()
        },
    );
    assert!(matches!(
        result.unwrap_err(),
        PlannerError::InvalidInput { ref field, .. } if field == "parent_id"
    ));

    // And the tree is unchanged.
    let fetched = db.get_item(root.id).unwrap().unwrap();
    assert!(fetched.is_plan());
    assert_eq!(db.count_subtree(root.id).unwrap(), 3);

    // Self-parenting is the degenerate cycle.
    let result = db.update_item(
        mid.id,
        &UpdateItemRequest {
            parent: Some(Some(mid.id)),
            ..Default::default()
        },
    );
    assert!(matches!(
        result.unwrap_err(),
        PlannerError::InvalidInput { .. }
    ));
}

#[test]
fn test_get_tree_materializes_descendants() {
    let (_temp_file, mut db) = create_test_db();

    let trip = db
        .create_item(&NewItem {
            name: "Japan Trip".to_string(),
            category: "travel".to_string(),
            ..Default::default()
        })
        .unwrap();
    let flight = db
        .add_step(
            trip.id,
            &NewStep {
                name: "Book Flight".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    db.add_step(
        trip.id,
        &NewStep {
            name: "Book Hotel".to_string(),
            ..Default::default()
        },
    )
    .unwrap();
    let seat = db
        .add_step(
            flight.id,
            &NewStep {
                name: "Pick Seat".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

    let tree = db
        .get_tree(trip.id)
        .expect("Failed to get tree")
        .expect("Tree should exist");

    assert_eq!(tree.item.id, trip.id);
    assert_eq!(tree.children.len(), 2);
    assert!(tree.children.iter().all(|c| c.item.category == "travel"));

    let flight_node = tree
        .children
        .iter()
        .find(|c| c.item.id == flight.id)
        .expect("Flight should be in the tree");
    assert_eq!(flight_node.children.len(), 1);
    assert_eq!(flight_node.children[0].item.id, seat.id);

    assert_eq!(tree.count(), 4);
}

#[test]
fn test_get_tree_missing_root() {
    let (_temp_file, db) = create_test_db();
    assert!(db.get_tree(999).expect("Failed to get tree").is_none());
}

#[test]
fn test_get_tree_sibling_order_follows_query_order() {
    let (_temp_file, mut db) = create_test_db();

    let parent = db.create_item(&plan("Parent")).unwrap();
    let second = db
        .add_step(
            parent.id,
            &NewStep {
                name: "June".to_string(),
                scheduled_at: Some(date(2099, 6, 1)),
                ..Default::default()
            },
        )
        .unwrap();
    let first = db
        .add_step(
            parent.id,
            &NewStep {
                name: "January".to_string(),
                scheduled_at: Some(date(2099, 1, 1)),
                ..Default::default()
            },
        )
        .unwrap();
    let last = db
        .add_step(
            parent.id,
            &NewStep {
                name: "Sometime".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

    let tree = db.get_tree(parent.id).unwrap().unwrap();
    let ids: Vec<u64> = tree.children.iter().map(|c| c.item.id).collect();
    assert_eq!(ids, vec![first.id, second.id, last.id]);
}

#[test]
fn test_count_subtree_recurrence() {
    let (_temp_file, mut db) = create_test_db();

    let root = db.create_item(&plan("Root")).unwrap();
    let a = db
        .add_step(
            root.id,
            &NewStep {
                name: "A".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    let b = db
        .add_step(
            root.id,
            &NewStep {
                name: "B".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    db.add_step(
        a.id,
        &NewStep {
            name: "A1".to_string(),
            ..Default::default()
        },
    )
    .unwrap();

    // count(root) == 1 + sum(count(child)) over direct children
    let child_sum = db.count_subtree(a.id).unwrap() + db.count_subtree(b.id).unwrap();
    assert_eq!(db.count_subtree(root.id).unwrap(), 1 + child_sum);
    assert_eq!(db.count_subtree(root.id).unwrap(), 4);

    assert_eq!(db.count_subtree(999).unwrap(), 0);
}

#[test]
fn test_cascade_delete_removes_whole_subtree() {
    let (_temp_file, mut db) = create_test_db();

    let trip = db
        .create_item(&NewItem {
            name: "Japan Trip".to_string(),
            category: "travel".to_string(),
            ..Default::default()
        })
        .unwrap();
    let flight = db
        .add_step(
            trip.id,
            &NewStep {
                name: "Book Flight".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    let hotel = db
        .add_step(
            trip.id,
            &NewStep {
                name: "Book Hotel".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(db.count_subtree(trip.id).unwrap(), 3);

    let removed = db
        .cascade_delete(trip.id)
        .expect("Failed to delete")
        .expect("Item should have existed");
    assert_eq!(removed, 3);

    for id in [trip.id, flight.id, hotel.id] {
        assert!(db.get_item(id).unwrap().is_none());
    }
    assert_eq!(db.count_subtree(trip.id).unwrap(), 0);
}

#[test]
fn test_cascade_delete_missing_item() {
    let (_temp_file, mut db) = create_test_db();
    assert!(db.cascade_delete(999).expect("Delete should not error").is_none());
}

#[test]
fn test_cascade_delete_leaves_unrelated_items() {
    let (_temp_file, mut db) = create_test_db();

    let doomed = db.create_item(&plan("Doomed")).unwrap();
    db.add_step(
        doomed.id,
        &NewStep {
            name: "Doomed Step".to_string(),
            ..Default::default()
        },
    )
    .unwrap();
    let survivor = db.create_item(&plan("Survivor")).unwrap();

    db.cascade_delete(doomed.id).unwrap();

    assert!(db.get_item(survivor.id).unwrap().is_some());
    assert_eq!(db.query_items(&ItemFilter::default()).unwrap().len(), 1);
}

#[test]
fn test_ids_are_not_reused_after_delete() {
    let (_temp_file, mut db) = create_test_db();

    let first = db.create_item(&plan("First")).unwrap();
    db.cascade_delete(first.id).unwrap();

    let second = db.create_item(&plan("Second")).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn test_deeply_nested_subtree() {
    let (_temp_file, mut db) = create_test_db();

    let root = db.create_item(&plan("Depth 0")).unwrap();
    let mut parent_id = root.id;
    for depth in 1..=20 {
        let child = db
            .add_step(
                parent_id,
                &NewStep {
                    name: format!("Depth {depth}"),
                    ..Default::default()
                },
            )
            .unwrap();
        parent_id = child.id;
    }

    assert_eq!(db.count_subtree(root.id).unwrap(), 21);

    let mut node = db.get_tree(root.id).unwrap().unwrap();
    let mut depth = 0;
    while !node.children.is_empty() {
        assert_eq!(node.children.len(), 1);
        node = node.children.into_iter().next().unwrap();
        depth += 1;
    }
    assert_eq!(depth, 20);

    let removed = db.cascade_delete(root.id).unwrap().unwrap();
    assert_eq!(removed, 21);
}
