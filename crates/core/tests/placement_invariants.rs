use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;
use tarotboard_core::{
    BoardMode, BoardSession, CardId, CatalogBuilder, CatalogConfig, DropTarget, Location,
    PlacementStore, RawFirm, SlotId, SlotSpec,
};

fn card_ids(count: usize) -> Vec<CardId> {
    (1..=count).map(|n| CardId::from(format!("firm-{n}"))).collect()
}

fn layout() -> Vec<SlotSpec> {
    vec![
        SlotSpec::new("gold", "Gold", 1),
        SlotSpec::new("silver", "Silver", 2),
        SlotSpec::new("bronze", "Bronze", 3),
    ]
}

fn check_slotted(store: &PlacementStore, ids: &[CardId]) {
    let mut seen: HashMap<CardId, usize> = HashMap::new();
    for spec in store.slot_specs() {
        let cards = store.slot_cards(&spec.id).expect("slot");
        assert!(cards.len() <= spec.capacity, "slot {} over capacity", spec.id);
        for card in cards {
            *seen.entry(card.clone()).or_default() += 1;
        }
    }
    for card in store.pool() {
        *seen.entry(card).or_default() += 1;
    }
    for id in ids {
        assert_eq!(seen.get(id), Some(&1), "card {id} must have exactly one location");
    }
    assert_eq!(seen.len(), ids.len());
}

#[test]
fn random_slot_sequences_keep_capacity_and_uniqueness() {
    let ids = card_ids(8);
    let slots = layout();
    let mode = BoardMode::Slotted {
        slots: slots.clone(),
    };
    for seed in 1..=20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut store = PlacementStore::new(&mode, ids.clone()).expect("layout");
        for _ in 0..200 {
            let card = &ids[rng.gen_range(0..ids.len())];
            if rng.gen_range(0..4) == 0 {
                store.release(card).expect("release known card");
            } else {
                let slot = &slots[rng.gen_range(0..slots.len())].id;
                let before = store.snapshot();
                if store.assign_to_slot(card, slot).is_err() {
                    assert_eq!(store.snapshot(), before, "rejected assignment mutated state");
                }
            }
            check_slotted(&store, &ids);
        }
    }
}

#[test]
fn random_reorders_keep_a_permutation() {
    let ids = card_ids(6);
    for seed in 1..=20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut store = PlacementStore::free(ids.clone());
        for _ in 0..100 {
            let a = &ids[rng.gen_range(0..ids.len())];
            let b = &ids[rng.gen_range(0..ids.len())];
            if rng.gen_range(0..3) == 0 {
                store.move_to_end(a).expect("known card");
            } else {
                let _ = store.reorder(a, b);
            }
            let mut order = store.order().expect("free").to_vec();
            order.sort();
            let mut expected = ids.clone();
            expected.sort();
            assert_eq!(order, expected);
        }
    }
}

#[test]
fn third_card_into_pair_slot_is_rejected() {
    let ids = card_ids(3);
    let mode = BoardMode::Slotted {
        slots: vec![SlotSpec::new("pair", "Pair", 2)],
    };
    let mut store = PlacementStore::new(&mode, ids.clone()).expect("layout");
    let pair = SlotId::from("pair");
    store.assign_to_slot(&ids[0], &pair).expect("first");
    store.assign_to_slot(&ids[1], &pair).expect("second");
    assert!(store.assign_to_slot(&ids[2], &pair).is_err());
    assert_eq!(store.slot_cards(&pair), Some(&ids[..2]));
}

#[test]
fn gesture_sequences_never_leave_a_dangling_session() {
    let records: Vec<RawFirm> = (1..=5u64)
        .map(|n| RawFirm::new(n, &format!("Firm {n}")))
        .collect();
    let catalog = CatalogBuilder::new(&CatalogConfig::default()).build(&records);
    let ids: Vec<CardId> = catalog.ids().cloned().collect();
    let mode = BoardMode::Slotted { slots: layout() };
    let mut board = BoardSession::new(catalog, &mode).expect("board");
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..300 {
        let card = ids[rng.gen_range(0..ids.len())].clone();
        board.drag_start(&card).expect("start");
        assert!(board.drag().is_some());
        let target = match rng.gen_range(0..4) {
            0 => DropTarget::Pool,
            1 => DropTarget::Card(ids[rng.gen_range(0..ids.len())].clone()),
            _ => DropTarget::Slot(layout()[rng.gen_range(0..3)].id.clone()),
        };
        board.drag_enter(target.clone());
        if rng.gen_range(0..5) == 0 {
            let before = board.store().snapshot();
            board.drag_end();
            assert_eq!(board.store().snapshot(), before);
        } else {
            let _ = board.drop(target);
        }
        assert!(board.drag().is_none());
        assert!(board.drop_target().is_none());
        check_slotted(board.store(), &ids);
        assert!(board
            .store()
            .location(&card)
            .is_some_and(|location| !matches!(location, Location::Position(_))));
    }
}
