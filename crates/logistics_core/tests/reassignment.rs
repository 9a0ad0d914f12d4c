use logistics_core::{
    decode_dataset, Customer, Dataset, DragEvent, Location, MoveOutcome, OccupiedSlotPolicy, ReassignError,
    ReassignmentEngine,
};
use std::collections::HashSet;

fn with_placements(placements: &[(&str, usize, usize)]) -> Dataset {
    let mut dataset = Dataset::default();
    for (customer_id, day, slot) in placements {
        dataset.planner.schedule.insert(*day, *slot, *customer_id);
    }
    dataset.validate().unwrap();
    dataset
}

fn assert_unique_placements(dataset: &Dataset) {
    let mut seen = HashSet::new();
    for (_, _, customer_id) in dataset.planner.schedule.iter() {
        assert!(seen.insert(customer_id), "{customer_id} placed twice");
    }
    for queued in dataset.queue_ids() {
        assert!(!seen.contains(queued), "{queued} both queued and placed");
    }
    dataset.validate().unwrap();
}

#[test]
fn default_scenario_places_first_customer() {
    let dataset = Dataset::default();
    let event = DragEvent::new("customer-1", Location::Queue, Some(Location::slot(0, 1)));

    let result = ReassignmentEngine::default().apply(&dataset, &event).unwrap();

    assert_eq!(result.outcome, MoveOutcome::Moved);
    assert_eq!(result.dataset.planner.schedule.get(0, 1), Some("customer-1"));
    assert_eq!(result.dataset.planner.schedule.len(), 1);
    assert_eq!(result.dataset.queue_ids(), vec!["customer-2"]);
    assert_eq!(result.dataset.customers, dataset.customers);
}

#[test]
fn same_location_drop_is_noop() {
    let dataset = with_placements(&[("customer-1", 1, 2)]);
    let engine = ReassignmentEngine::default();

    for location in [Location::Queue, Location::slot(1, 2), Location::slot(4, 0)] {
        let event = DragEvent::new("customer-1", location, Some(location));
        let result = engine.apply(&dataset, &event).unwrap();
        assert_eq!(result.outcome, MoveOutcome::NoOp);
        assert_eq!(result.dataset, dataset);
    }
}

#[test]
fn move_then_move_back_is_identity() {
    let original = Dataset::default();
    let engine = ReassignmentEngine::default();

    let placed = engine
        .apply(
            &original,
            &DragEvent::new("customer-1", Location::Queue, Some(Location::slot(2, 1))),
        )
        .unwrap()
        .dataset;
    let restored = engine
        .apply(
            &placed,
            &DragEvent::new("customer-1", Location::slot(2, 1), Some(Location::Queue)),
        )
        .unwrap();

    assert_eq!(restored.outcome, MoveOutcome::Moved);
    assert_eq!(restored.dataset, original);
}

#[test]
fn loaded_empty_day_does_not_break_move_back_identity() {
    let raw = r#"{
        "customers": [
            {"id": "customer-1", "name": "Customer A", "pickup": "Location A", "dropoff": "Location B"},
            {"id": "customer-2", "name": "Customer B", "pickup": "Location C", "dropoff": "Location D"}
        ],
        "planner": {
            "slots": ["Slot 1", "Slot 2", "Slot 3", "Slot 4"],
            "days": 7,
            "schedule": {"2": {}}
        }
    }"#;
    let loaded = decode_dataset(raw).unwrap();
    assert!(loaded.planner.schedule.is_empty());

    let engine = ReassignmentEngine::default();
    let placed = engine
        .apply(
            &loaded,
            &DragEvent::new("customer-1", Location::Queue, Some(Location::slot(2, 1))),
        )
        .unwrap()
        .dataset;
    let restored = engine
        .apply(
            &placed,
            &DragEvent::new("customer-1", Location::slot(2, 1), Some(Location::Queue)),
        )
        .unwrap()
        .dataset;

    assert_eq!(restored, loaded);
}

#[test]
fn slot_to_slot_move_clears_source() {
    let dataset = with_placements(&[("customer-1", 0, 0)]);
    let event = DragEvent::new("customer-1", Location::slot(0, 0), Some(Location::slot(6, 3)));

    let result = ReassignmentEngine::default().apply(&dataset, &event).unwrap();

    assert_eq!(result.dataset.planner.schedule.get(0, 0), None);
    assert_eq!(result.dataset.planner.schedule.get(6, 3), Some("customer-1"));
    assert_unique_placements(&result.dataset);
}

#[test]
fn occupied_slot_is_rejected_and_state_preserved() {
    let dataset = with_placements(&[("customer-1", 0, 0)]);
    let event = DragEvent::new("customer-2", Location::Queue, Some(Location::slot(0, 0)));

    let result = ReassignmentEngine::default().apply(&dataset, &event).unwrap();

    assert_eq!(
        result.outcome,
        MoveOutcome::RejectedPlacement {
            occupant: "customer-1".to_string()
        }
    );
    assert_eq!(result.dataset, dataset);
    assert_eq!(result.dataset.location_of("customer-1"), Some(Location::slot(0, 0)));
    assert_eq!(result.dataset.location_of("customer-2"), Some(Location::Queue));
}

#[test]
fn rejected_slot_to_slot_drop_keeps_source_placement() {
    let dataset = with_placements(&[("customer-1", 0, 0), ("customer-2", 5, 2)]);
    let event = DragEvent::new("customer-2", Location::slot(5, 2), Some(Location::slot(0, 0)));

    let result = ReassignmentEngine::default().apply(&dataset, &event).unwrap();

    assert!(!result.outcome.changes_dataset());
    assert_eq!(result.dataset, dataset);
    assert_eq!(result.dataset.planner.schedule.get(5, 2), Some("customer-2"));
    assert_unique_placements(&result.dataset);
}

#[test]
fn stale_source_is_reported_and_state_preserved() {
    let dataset = with_placements(&[("customer-1", 1, 2)]);
    let event = DragEvent::new("customer-1", Location::Queue, Some(Location::slot(3, 3)));

    let err = ReassignmentEngine::default().apply(&dataset, &event).unwrap_err();

    assert_eq!(
        err,
        ReassignError::StaleEvent {
            customer_id: "customer-1".to_string(),
            claimed: Location::Queue,
            actual: Location::slot(1, 2),
        }
    );
    assert_eq!(dataset.location_of("customer-1"), Some(Location::slot(1, 2)));
}

#[test]
fn unknown_customer_is_invalid_reference() {
    let dataset = Dataset::default();
    let event = DragEvent::new("customer-9", Location::Queue, Some(Location::slot(0, 0)));

    let err = ReassignmentEngine::default().apply(&dataset, &event).unwrap_err();
    assert_eq!(err, ReassignError::InvalidReference("customer-9".to_string()));
}

#[test]
fn swap_policy_exchanges_locations() {
    let dataset = with_placements(&[("customer-1", 0, 0), ("customer-2", 5, 1)]);
    let engine = ReassignmentEngine::with_policy(OccupiedSlotPolicy::Swap);
    let event = DragEvent::new("customer-2", Location::slot(5, 1), Some(Location::slot(0, 0)));

    let result = engine.apply(&dataset, &event).unwrap();

    assert_eq!(
        result.outcome,
        MoveOutcome::Swapped {
            displaced: "customer-1".to_string()
        }
    );
    assert_eq!(result.dataset.location_of("customer-2"), Some(Location::slot(0, 0)));
    assert_eq!(result.dataset.location_of("customer-1"), Some(Location::slot(5, 1)));
    assert_unique_placements(&result.dataset);
}

#[test]
fn swap_from_queue_sends_occupant_to_queue() {
    let dataset = with_placements(&[("customer-1", 0, 0)]);
    let engine = ReassignmentEngine::with_policy(OccupiedSlotPolicy::Swap);
    let event = DragEvent::new("customer-2", Location::Queue, Some(Location::slot(0, 0)));

    let result = engine.apply(&dataset, &event).unwrap();

    assert_eq!(result.dataset.location_of("customer-1"), Some(Location::Queue));
    assert_eq!(result.dataset.location_of("customer-2"), Some(Location::slot(0, 0)));
    assert_unique_placements(&result.dataset);
}

#[test]
fn displace_policy_returns_occupant_to_queue() {
    let dataset = with_placements(&[("customer-1", 0, 0), ("customer-2", 2, 2)]);
    let engine = ReassignmentEngine::with_policy(OccupiedSlotPolicy::DisplaceToQueue);
    let event = DragEvent::new("customer-2", Location::slot(2, 2), Some(Location::slot(0, 0)));

    let result = engine.apply(&dataset, &event).unwrap();

    assert_eq!(
        result.outcome,
        MoveOutcome::Displaced {
            displaced: "customer-1".to_string()
        }
    );
    assert_eq!(result.dataset.location_of("customer-1"), Some(Location::Queue));
    assert_eq!(result.dataset.planner.schedule.get(2, 2), None);
    assert_unique_placements(&result.dataset);
}

#[test]
fn event_sequences_keep_placements_unique() {
    let mut dataset = Dataset::default();
    for index in 3..=6 {
        let customer = Customer::with_id(
            format!("customer-{index}"),
            format!("Customer {index}"),
            "Depot",
            "Site",
        )
        .unwrap();
        dataset.add_customer(customer).unwrap();
    }

    let policies = [
        OccupiedSlotPolicy::Reject,
        OccupiedSlotPolicy::Swap,
        OccupiedSlotPolicy::DisplaceToQueue,
    ];
    let targets = [
        Location::slot(0, 0),
        Location::slot(0, 1),
        Location::slot(0, 0),
        Location::Queue,
        Location::slot(6, 3),
        Location::slot(0, 1),
    ];

    for policy in policies {
        let engine = ReassignmentEngine::with_policy(policy);
        let mut current = dataset.clone();
        for (step, target) in targets.iter().enumerate() {
            let customer_id = format!("customer-{}", step % 6 + 1);
            let source = current.location_of(&customer_id).unwrap();
            let event = DragEvent::new(customer_id, source, Some(*target));
            current = engine.apply(&current, &event).unwrap().dataset;
            assert_unique_placements(&current);
        }
        assert_eq!(current.customers, dataset.customers);
    }
}
