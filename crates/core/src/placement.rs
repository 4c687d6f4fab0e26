//! Where every card currently lives on a board.
//!
//! A board is either *free* (one ordered sequence that can be rearranged) or
//! *slotted* (a fixed set of capacity-bounded slots plus an unassigned pool).
//! All mutation goes through [`PlacementStore`]; a rejected request leaves the
//! store exactly as it was.

use crate::CardId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use thiserror::Error;
use tracing::debug;

pub const MAX_SLOT_CAPACITY: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SlotId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotSpec {
    pub id: SlotId,
    pub label: String,
    pub capacity: usize,
}

impl SlotSpec {
    pub fn new(id: &str, label: &str, capacity: usize) -> Self {
        Self {
            id: SlotId::from(id),
            label: label.to_string(),
            capacity,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardMode {
    #[default]
    Free,
    Slotted { slots: Vec<SlotSpec> },
}

impl BoardMode {
    pub fn is_slotted(&self) -> bool {
        matches!(self, Self::Slotted { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Location {
    Pool,
    Position(usize),
    Slot(SlotId),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pool => f.write_str("pool"),
            Self::Position(idx) => write!(f, "position {idx}"),
            Self::Slot(slot) => write!(f, "slot {slot}"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("unknown card {0}")]
    UnknownCard(CardId),
    #[error("unknown slot {0}")]
    UnknownSlot(SlotId),
    #[error("card {0} cannot be placed relative to itself")]
    SameCard(CardId),
    #[error("slot {slot} is full ({capacity} max)")]
    SlotFull { slot: SlotId, capacity: usize },
    #[error("{0} is not available on a {1} board")]
    WrongMode(&'static str, &'static str),
    #[error("invalid slot layout: {0}")]
    InvalidLayout(String),
}

#[derive(Debug, Clone)]
struct SlotState {
    spec: SlotSpec,
    cards: Vec<CardId>,
}

impl SlotState {
    fn is_full(&self) -> bool {
        self.cards.len() >= self.spec.capacity
    }
}

#[derive(Debug, Clone)]
enum Arrangement {
    Ordered(Vec<CardId>),
    Slotted(Vec<SlotState>),
}

#[derive(Debug, Clone)]
pub struct PlacementStore {
    /// Every known card in catalog order. Used for pool ordering and resets.
    cards: Vec<CardId>,
    members: HashSet<CardId>,
    arrangement: Arrangement,
}

impl PlacementStore {
    /// Build a store with every card in its initial location: catalog order on
    /// a free board, the pool on a slotted one. Duplicate ids are dropped.
    pub fn new(
        mode: &BoardMode,
        ids: impl IntoIterator<Item = CardId>,
    ) -> Result<Self, PlacementError> {
        let mut members = HashSet::new();
        let cards: Vec<CardId> = ids
            .into_iter()
            .filter(|id| members.insert(id.clone()))
            .collect();
        let arrangement = match mode {
            BoardMode::Free => Arrangement::Ordered(cards.clone()),
            BoardMode::Slotted { slots } => {
                validate_slots(slots)?;
                Arrangement::Slotted(
                    slots
                        .iter()
                        .map(|spec| SlotState {
                            spec: spec.clone(),
                            cards: Vec::new(),
                        })
                        .collect(),
                )
            }
        };
        Ok(Self {
            cards,
            members,
            arrangement,
        })
    }

    pub fn free(ids: impl IntoIterator<Item = CardId>) -> Self {
        let mut members = HashSet::new();
        let cards: Vec<CardId> = ids
            .into_iter()
            .filter(|id| members.insert(id.clone()))
            .collect();
        Self {
            arrangement: Arrangement::Ordered(cards.clone()),
            cards,
            members,
        }
    }

    pub fn is_slotted(&self) -> bool {
        matches!(self.arrangement, Arrangement::Slotted(_))
    }

    pub fn mode_label(&self) -> &'static str {
        if self.is_slotted() {
            "slotted"
        } else {
            "free"
        }
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.members.contains(id)
    }

    /// Put every card back where [`PlacementStore::new`] started it.
    pub fn reset(&mut self) {
        match &mut self.arrangement {
            Arrangement::Ordered(order) => *order = self.cards.clone(),
            Arrangement::Slotted(slots) => slots.iter_mut().for_each(|slot| slot.cards.clear()),
        }
    }

    pub fn location(&self, id: &CardId) -> Option<Location> {
        if !self.contains(id) {
            return None;
        }
        match &self.arrangement {
            Arrangement::Ordered(order) => order
                .iter()
                .position(|item| item == id)
                .map(Location::Position),
            Arrangement::Slotted(slots) => Some(
                slots
                    .iter()
                    .find(|slot| slot.cards.contains(id))
                    .map_or(Location::Pool, |slot| Location::Slot(slot.spec.id.clone())),
            ),
        }
    }

    /// The full sequence on a free board; `None` on a slotted one.
    pub fn order(&self) -> Option<&[CardId]> {
        match &self.arrangement {
            Arrangement::Ordered(order) => Some(order),
            Arrangement::Slotted(_) => None,
        }
    }

    pub fn slot_specs(&self) -> Vec<&SlotSpec> {
        match &self.arrangement {
            Arrangement::Ordered(_) => Vec::new(),
            Arrangement::Slotted(slots) => slots.iter().map(|slot| &slot.spec).collect(),
        }
    }

    pub fn slot_cards(&self, slot: &SlotId) -> Option<&[CardId]> {
        self.slot(slot).map(|state| state.cards.as_slice())
    }

    pub fn is_full(&self, slot: &SlotId) -> bool {
        self.slot(slot).is_some_and(SlotState::is_full)
    }

    /// Ids held in any bounded slot.
    pub fn assigned_ids(&self) -> BTreeSet<CardId> {
        match &self.arrangement {
            Arrangement::Ordered(_) => BTreeSet::new(),
            Arrangement::Slotted(slots) => slots
                .iter()
                .flat_map(|slot| slot.cards.iter().cloned())
                .collect(),
        }
    }

    /// Unassigned cards in catalog order. Empty on a free board.
    pub fn pool(&self) -> Vec<CardId> {
        if !self.is_slotted() {
            return Vec::new();
        }
        let assigned = self.assigned_ids();
        self.cards
            .iter()
            .filter(|id| !assigned.contains(*id))
            .cloned()
            .collect()
    }

    pub fn move_to_end(&mut self, id: &CardId) -> Result<Location, PlacementError> {
        let order = self.ordered_mut("move to end")?;
        let from = order
            .iter()
            .position(|item| item == id)
            .ok_or_else(|| PlacementError::UnknownCard(id.clone()))?;
        let moved = order.remove(from);
        order.push(moved);
        Ok(Location::Position(order.len() - 1))
    }

    /// Reinsert `dragged` directly in front of `target`.
    pub fn reorder(&mut self, dragged: &CardId, target: &CardId) -> Result<Location, PlacementError> {
        let order = self.ordered_mut("reorder")?;
        if dragged == target {
            return Err(PlacementError::SameCard(dragged.clone()));
        }
        let from = order
            .iter()
            .position(|item| item == dragged)
            .ok_or_else(|| PlacementError::UnknownCard(dragged.clone()))?;
        if !order.contains(target) {
            return Err(PlacementError::UnknownCard(target.clone()));
        }
        let moved = order.remove(from);
        let to = order
            .iter()
            .position(|item| item == target)
            .unwrap_or(order.len());
        order.insert(to, moved);
        Ok(Location::Position(to))
    }

    /// Move a card into `slot`, leaving any slot it held before. A full target
    /// rejects the move without touching the card's current slot.
    pub fn assign_to_slot(&mut self, id: &CardId, slot: &SlotId) -> Result<Location, PlacementError> {
        if !self.contains(id) {
            return Err(PlacementError::UnknownCard(id.clone()));
        }
        let slots = self.slotted_mut("assign to slot")?;
        let target = slots
            .iter()
            .position(|state| &state.spec.id == slot)
            .ok_or_else(|| PlacementError::UnknownSlot(slot.clone()))?;
        if slots[target].cards.contains(id) {
            return Ok(Location::Slot(slot.clone()));
        }
        if slots[target].is_full() {
            let capacity = slots[target].spec.capacity;
            debug!(card = %id, %slot, capacity, "slot full, assignment rejected");
            return Err(PlacementError::SlotFull {
                slot: slot.clone(),
                capacity,
            });
        }
        for state in slots.iter_mut() {
            state.cards.retain(|item| item != id);
        }
        slots[target].cards.push(id.clone());
        Ok(Location::Slot(slot.clone()))
    }

    /// Return a card to the pool. Releasing a pooled card is a no-op.
    pub fn release(&mut self, id: &CardId) -> Result<Location, PlacementError> {
        if !self.contains(id) {
            return Err(PlacementError::UnknownCard(id.clone()));
        }
        let slots = self.slotted_mut("release")?;
        for state in slots.iter_mut() {
            state.cards.retain(|item| item != id);
        }
        Ok(Location::Pool)
    }

    pub fn snapshot(&self) -> PlacementSnapshot {
        match &self.arrangement {
            Arrangement::Ordered(order) => PlacementSnapshot {
                mode: self.mode_label(),
                order: order.clone(),
                slots: Vec::new(),
                pool: Vec::new(),
            },
            Arrangement::Slotted(slots) => PlacementSnapshot {
                mode: self.mode_label(),
                order: Vec::new(),
                slots: slots
                    .iter()
                    .map(|state| SlotSnapshot {
                        id: state.spec.id.clone(),
                        label: state.spec.label.clone(),
                        capacity: state.spec.capacity,
                        cards: state.cards.clone(),
                    })
                    .collect(),
                pool: self.pool(),
            },
        }
    }

    fn slot(&self, id: &SlotId) -> Option<&SlotState> {
        match &self.arrangement {
            Arrangement::Ordered(_) => None,
            Arrangement::Slotted(slots) => slots.iter().find(|state| &state.spec.id == id),
        }
    }

    fn ordered_mut(&mut self, op: &'static str) -> Result<&mut Vec<CardId>, PlacementError> {
        match &mut self.arrangement {
            Arrangement::Ordered(order) => Ok(order),
            Arrangement::Slotted(_) => Err(PlacementError::WrongMode(op, "slotted")),
        }
    }

    fn slotted_mut(&mut self, op: &'static str) -> Result<&mut Vec<SlotState>, PlacementError> {
        match &mut self.arrangement {
            Arrangement::Slotted(slots) => Ok(slots),
            Arrangement::Ordered(_) => Err(PlacementError::WrongMode(op, "free")),
        }
    }
}

fn validate_slots(slots: &[SlotSpec]) -> Result<(), PlacementError> {
    if slots.is_empty() {
        return Err(PlacementError::InvalidLayout("no slots".to_string()));
    }
    let mut seen = HashSet::new();
    for spec in slots {
        if !seen.insert(&spec.id) {
            return Err(PlacementError::InvalidLayout(format!(
                "duplicate slot id {}",
                spec.id
            )));
        }
        if !(1..=MAX_SLOT_CAPACITY).contains(&spec.capacity) {
            return Err(PlacementError::InvalidLayout(format!(
                "slot {} capacity {} outside 1..={MAX_SLOT_CAPACITY}",
                spec.id, spec.capacity
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SlotSnapshot {
    pub id: SlotId,
    pub label: String,
    pub capacity: usize,
    pub cards: Vec<CardId>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlacementSnapshot {
    pub mode: &'static str,
    pub order: Vec<CardId>,
    pub slots: Vec<SlotSnapshot>,
    pub pool: Vec<CardId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<CardId> {
        names.iter().map(|name| CardId::from(*name)).collect()
    }

    fn order_of(store: &PlacementStore) -> Vec<&str> {
        store
            .order()
            .expect("free board")
            .iter()
            .map(CardId::as_str)
            .collect()
    }

    fn slotted(capacity: usize) -> PlacementStore {
        let mode = BoardMode::Slotted {
            slots: vec![
                SlotSpec::new("top", "Top", capacity),
                SlotSpec::new("next", "Next", 1),
            ],
        };
        PlacementStore::new(&mode, ids(&["A", "B", "C", "D"])).expect("layout")
    }

    #[test]
    fn reorder_inserts_before_target() {
        let mut store = PlacementStore::free(ids(&["A", "B", "C"]));
        store
            .reorder(&CardId::from("A"), &CardId::from("B"))
            .expect("reorder");
        assert_eq!(order_of(&store), vec!["A", "B", "C"]);

        let mut store = PlacementStore::free(ids(&["B", "A", "C"]));
        store
            .reorder(&CardId::from("A"), &CardId::from("B"))
            .expect("reorder");
        assert_eq!(order_of(&store), vec!["A", "B", "C"]);

        store
            .reorder(&CardId::from("A"), &CardId::from("C"))
            .expect("reorder");
        assert_eq!(order_of(&store), vec!["B", "A", "C"]);
    }

    #[test]
    fn reorder_rejects_unknown_and_equal_ids() {
        let mut store = PlacementStore::free(ids(&["A", "B"]));
        assert_eq!(
            store.reorder(&CardId::from("A"), &CardId::from("A")),
            Err(PlacementError::SameCard(CardId::from("A")))
        );
        assert_eq!(
            store.reorder(&CardId::from("Z"), &CardId::from("A")),
            Err(PlacementError::UnknownCard(CardId::from("Z")))
        );
        assert_eq!(
            store.reorder(&CardId::from("A"), &CardId::from("Z")),
            Err(PlacementError::UnknownCard(CardId::from("Z")))
        );
        assert_eq!(order_of(&store), vec!["A", "B"]);
    }

    #[test]
    fn move_to_end_appends() {
        let mut store = PlacementStore::free(ids(&["A", "B", "C"]));
        assert_eq!(
            store.move_to_end(&CardId::from("A")),
            Ok(Location::Position(2))
        );
        assert_eq!(order_of(&store), vec!["B", "C", "A"]);
        assert!(store.move_to_end(&CardId::from("nope")).is_err());
        assert_eq!(order_of(&store), vec!["B", "C", "A"]);
    }

    #[test]
    fn full_slot_rejects_and_keeps_occupants() {
        let mut store = slotted(2);
        let top = SlotId::from("top");
        store.assign_to_slot(&CardId::from("A"), &top).expect("first");
        store.assign_to_slot(&CardId::from("B"), &top).expect("second");
        let err = store
            .assign_to_slot(&CardId::from("C"), &top)
            .expect_err("third must be rejected");
        assert_eq!(
            err,
            PlacementError::SlotFull {
                slot: top.clone(),
                capacity: 2
            }
        );
        assert_eq!(store.slot_cards(&top), Some(ids(&["A", "B"]).as_slice()));
        assert_eq!(store.location(&CardId::from("C")), Some(Location::Pool));
    }

    #[test]
    fn rejected_move_keeps_prior_slot() {
        let mut store = slotted(2);
        let next = SlotId::from("next");
        store.assign_to_slot(&CardId::from("A"), &next).expect("assign");
        store
            .assign_to_slot(&CardId::from("B"), &SlotId::from("top"))
            .expect("assign");
        assert!(store.assign_to_slot(&CardId::from("B"), &next).is_err());
        assert_eq!(
            store.location(&CardId::from("B")),
            Some(Location::Slot(SlotId::from("top")))
        );
    }

    #[test]
    fn moving_between_slots_leaves_one_location() {
        let mut store = slotted(2);
        let card = CardId::from("A");
        store.assign_to_slot(&card, &SlotId::from("top")).expect("assign");
        store.assign_to_slot(&card, &SlotId::from("next")).expect("move");
        assert_eq!(store.slot_cards(&SlotId::from("top")), Some(&[][..]));
        assert_eq!(store.assigned_ids().len(), 1);
        assert_eq!(store.pool(), ids(&["B", "C", "D"]));
    }

    #[test]
    fn reassigning_to_same_full_slot_is_ok() {
        let mut store = slotted(1);
        let top = SlotId::from("top");
        store.assign_to_slot(&CardId::from("A"), &top).expect("assign");
        assert_eq!(
            store.assign_to_slot(&CardId::from("A"), &top),
            Ok(Location::Slot(top.clone()))
        );
        assert_eq!(store.slot_cards(&top).map(<[CardId]>::len), Some(1));
    }

    #[test]
    fn release_returns_to_pool() {
        let mut store = slotted(2);
        let card = CardId::from("C");
        store.assign_to_slot(&card, &SlotId::from("top")).expect("assign");
        assert_eq!(store.release(&card), Ok(Location::Pool));
        assert_eq!(store.release(&card), Ok(Location::Pool));
        assert!(store.assigned_ids().is_empty());
        assert_eq!(store.pool(), ids(&["A", "B", "C", "D"]));
    }

    #[test]
    fn operations_reject_wrong_mode_and_unknown_ids() {
        let mut free = PlacementStore::free(ids(&["A"]));
        assert!(matches!(
            free.assign_to_slot(&CardId::from("A"), &SlotId::from("top")),
            Err(PlacementError::WrongMode(_, "free"))
        ));
        let mut store = slotted(2);
        assert!(matches!(
            store.move_to_end(&CardId::from("A")),
            Err(PlacementError::WrongMode(_, "slotted"))
        ));
        assert_eq!(
            store.assign_to_slot(&CardId::from("A"), &SlotId::from("missing")),
            Err(PlacementError::UnknownSlot(SlotId::from("missing")))
        );
        assert_eq!(
            store.release(&CardId::from("Z")),
            Err(PlacementError::UnknownCard(CardId::from("Z")))
        );
    }

    #[test]
    fn layout_is_validated() {
        let bad_capacity = BoardMode::Slotted {
            slots: vec![SlotSpec::new("a", "A", 0)],
        };
        assert!(PlacementStore::new(&bad_capacity, ids(&["A"])).is_err());
        let duplicate = BoardMode::Slotted {
            slots: vec![SlotSpec::new("a", "A", 1), SlotSpec::new("a", "B", 1)],
        };
        assert!(PlacementStore::new(&duplicate, ids(&["A"])).is_err());
        assert!(PlacementStore::new(&BoardMode::Slotted { slots: Vec::new() }, ids(&["A"])).is_err());
    }

    #[test]
    fn reset_restores_initial_layout() {
        let mut free = PlacementStore::free(ids(&["A", "B"]));
        free.move_to_end(&CardId::from("A")).expect("move");
        free.reset();
        assert_eq!(order_of(&free), vec!["A", "B"]);

        let mut store = slotted(2);
        store
            .assign_to_slot(&CardId::from("A"), &SlotId::from("top"))
            .expect("assign");
        store.reset();
        assert!(store.assigned_ids().is_empty());
    }
}
