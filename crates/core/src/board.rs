//! A mounted board: the catalog, its one placement store, and the transient
//! gesture state (drag session, drop highlight, selection, filters).
//!
//! Surfaces translate their input into the calls below and never touch the
//! store directly. A drag is three phases: [`BoardSession::drag_start`],
//! any number of [`BoardSession::drag_enter`] highlights, then exactly one of
//! [`BoardSession::drop`] or [`BoardSession::drag_end`]. Both terminal calls
//! clear the session on every path.

use crate::filter::{available_pool, visible, visible_in};
use crate::{
    BoardMode, Card, CardId, Catalog, Event, EventBus, FilterSelection, Location, PlacementError,
    PlacementStore, SlotId,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DropTarget {
    Card(CardId),
    Slot(SlotId),
    Pool,
    BoardEnd,
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card(id) => write!(f, "card {id}"),
            Self::Slot(id) => write!(f, "slot {id}"),
            Self::Pool => f.write_str("pool"),
            Self::BoardEnd => f.write_str("board end"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DragSession {
    pub dragged: CardId,
    pub origin: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Moved {
        card: CardId,
        from: Location,
        to: Location,
    },
    Unchanged,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("no drag in progress")]
    NoActiveDrag,
    #[error("unknown card {0}")]
    UnknownCard(CardId),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// What the free board or slotted board currently shows, after filters.
#[derive(Debug, Clone)]
pub enum BoardView<'a> {
    Free {
        cards: Vec<&'a Card>,
    },
    Slotted {
        slots: Vec<SlotView<'a>>,
        pool: Vec<&'a Card>,
    },
}

#[derive(Debug, Clone)]
pub struct SlotView<'a> {
    pub id: SlotId,
    pub label: String,
    pub capacity: usize,
    pub cards: Vec<&'a Card>,
}

impl SlotView<'_> {
    pub fn is_full(&self) -> bool {
        self.cards.len() >= self.capacity
    }
}

pub struct BoardSession {
    catalog: Catalog,
    store: PlacementStore,
    drag: Option<DragSession>,
    drop_target: Option<DropTarget>,
    selected: Option<CardId>,
    filter: FilterSelection,
    pub events: EventBus,
}

impl BoardSession {
    pub fn new(catalog: Catalog, mode: &BoardMode) -> Result<Self, PlacementError> {
        let store = PlacementStore::new(mode, catalog.ids().cloned())?;
        Ok(Self {
            catalog,
            store,
            drag: None,
            drop_target: None,
            selected: None,
            filter: FilterSelection::default(),
            events: EventBus::default(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &PlacementStore {
        &self.store
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn drop_target(&self) -> Option<&DropTarget> {
        self.drop_target.as_ref()
    }

    pub fn selected(&self) -> Option<&CardId> {
        self.selected.as_ref()
    }

    pub fn filter(&self) -> &FilterSelection {
        &self.filter
    }

    pub fn set_filter(&mut self, selection: FilterSelection) {
        if self.filter == selection {
            return;
        }
        self.filter = selection.clone();
        self.events.push(Event::FilterChanged { selection });
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let options = self.catalog.category_options();
        let next = FilterSelection {
            category: self.filter.category.cycle(&options, forward),
            stage: self.filter.stage.clone(),
        };
        self.set_filter(next);
    }

    pub fn cycle_stage(&mut self, forward: bool) {
        let options = self.catalog.stage_options();
        let next = FilterSelection {
            category: self.filter.category.clone(),
            stage: self.filter.stage.cycle(&options, forward),
        };
        self.set_filter(next);
    }

    pub fn visible(&self) -> Vec<&Card> {
        visible(&self.catalog, &self.filter)
    }

    pub fn view(&self) -> BoardView<'_> {
        match self.store.order() {
            Some(order) => BoardView::Free {
                cards: visible_in(&self.catalog, order, &self.filter),
            },
            None => BoardView::Slotted {
                slots: self
                    .store
                    .slot_specs()
                    .into_iter()
                    .map(|spec| SlotView {
                        id: spec.id.clone(),
                        label: spec.label.clone(),
                        capacity: spec.capacity,
                        cards: self
                            .store
                            .slot_cards(&spec.id)
                            .unwrap_or_default()
                            .iter()
                            .filter_map(|id| self.catalog.get(id))
                            .collect(),
                    })
                    .collect(),
                pool: available_pool(&self.catalog, &self.filter, &self.store),
            },
        }
    }

    pub fn drag_start(&mut self, id: &CardId) -> Result<(), BoardError> {
        let origin = self
            .store
            .location(id)
            .ok_or_else(|| BoardError::UnknownCard(id.clone()))?;
        if let Some(stale) = self.drag.take() {
            debug!(card = %stale.dragged, "replacing stale drag session");
        }
        self.drop_target = None;
        self.drag = Some(DragSession {
            dragged: id.clone(),
            origin: origin.clone(),
        });
        self.events.push(Event::DragStarted {
            card: id.clone(),
            origin,
        });
        Ok(())
    }

    /// Highlight a prospective target. Never changes placement; hovering the
    /// dragged card over itself is ignored.
    pub fn drag_enter(&mut self, target: DropTarget) {
        let Some(session) = self.drag.as_ref() else {
            return;
        };
        if matches!(&target, DropTarget::Card(id) if *id == session.dragged) {
            return;
        }
        if self.drop_target.as_ref() == Some(&target) {
            return;
        }
        self.drop_target = Some(target.clone());
        self.events.push(Event::DropTargetChanged {
            target: Some(target),
        });
    }

    /// Kept for symmetry with pointer event streams; hovering has no effect
    /// beyond what `drag_enter` recorded.
    pub fn drag_over(&self) {}

    pub fn drop(&mut self, target: DropTarget) -> Result<DropOutcome, BoardError> {
        self.drop_target = None;
        let Some(session) = self.drag.take() else {
            return Err(BoardError::NoActiveDrag);
        };
        let card = session.dragged;
        let from = self
            .store
            .location(&card)
            .ok_or_else(|| BoardError::UnknownCard(card.clone()))?;
        if matches!(&target, DropTarget::Card(id) if *id == card) {
            return Ok(DropOutcome::Unchanged);
        }
        let result = match &target {
            DropTarget::Card(other) => self.drop_on_card(&card, other),
            DropTarget::Slot(slot) => self.store.assign_to_slot(&card, slot),
            DropTarget::Pool | DropTarget::BoardEnd => {
                if self.store.is_slotted() {
                    self.store.release(&card)
                } else {
                    self.store.move_to_end(&card)
                }
            }
        };
        match result {
            Ok(to) => Ok(self.record_move(card, from, to)),
            Err(err) => {
                debug!(card = %card, %target, error = %err, "drop rejected");
                self.events.push(Event::DropRejected {
                    card,
                    reason: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    fn drop_on_card(&mut self, card: &CardId, other: &CardId) -> Result<Location, PlacementError> {
        if !self.store.is_slotted() {
            return self.store.reorder(card, other);
        }
        match self.store.location(other) {
            Some(Location::Slot(slot)) => self.store.assign_to_slot(card, &slot),
            Some(_) => self.store.release(card),
            None => Err(PlacementError::UnknownCard(other.clone())),
        }
    }

    /// Abandon the gesture (escape, or released outside any target).
    pub fn drag_end(&mut self) {
        self.drop_target = None;
        if let Some(session) = self.drag.take() {
            self.events.push(Event::DragCancelled {
                card: session.dragged,
            });
        }
    }

    /// Toggle selection. Clicks that arrive while a drag is open are the tail
    /// of the gesture and are ignored. Returns whether anything changed.
    pub fn click(&mut self, id: &CardId) -> Result<bool, BoardError> {
        if !self.catalog.contains(id) {
            return Err(BoardError::UnknownCard(id.clone()));
        }
        if self.drag.is_some() {
            return Ok(false);
        }
        self.selected = if self.selected.as_ref() == Some(id) {
            None
        } else {
            Some(id.clone())
        };
        self.events.push(Event::SelectionChanged {
            selected: self.selected.clone(),
        });
        Ok(true)
    }

    /// Keyboard activation (Enter or Space) behaves like a click.
    pub fn activate(&mut self, id: &CardId) -> Result<bool, BoardError> {
        self.click(id)
    }

    pub fn move_to_end(&mut self, id: &CardId) -> Result<DropOutcome, BoardError> {
        let from = self.location_of(id)?;
        let to = self.store.move_to_end(id)?;
        Ok(self.record_move(id.clone(), from, to))
    }

    pub fn reorder(&mut self, dragged: &CardId, target: &CardId) -> Result<DropOutcome, BoardError> {
        let from = self.location_of(dragged)?;
        let to = self.store.reorder(dragged, target)?;
        Ok(self.record_move(dragged.clone(), from, to))
    }

    pub fn assign_to_slot(&mut self, id: &CardId, slot: &SlotId) -> Result<DropOutcome, BoardError> {
        let from = self.location_of(id)?;
        let to = self.store.assign_to_slot(id, slot)?;
        Ok(self.record_move(id.clone(), from, to))
    }

    pub fn release(&mut self, id: &CardId) -> Result<DropOutcome, BoardError> {
        let from = self.location_of(id)?;
        let to = self.store.release(id)?;
        Ok(self.record_move(id.clone(), from, to))
    }

    /// Back to the initial layout with no drag, selection or filter.
    pub fn reset(&mut self) {
        self.store.reset();
        self.drag = None;
        self.drop_target = None;
        self.selected = None;
        self.filter = FilterSelection::default();
        self.events.push(Event::BoardReset);
    }

    fn location_of(&self, id: &CardId) -> Result<Location, BoardError> {
        self.store
            .location(id)
            .ok_or_else(|| BoardError::UnknownCard(id.clone()))
    }

    fn record_move(&mut self, card: CardId, from: Location, to: Location) -> DropOutcome {
        if from == to {
            return DropOutcome::Unchanged;
        }
        self.events.push(Event::CardMoved {
            card: card.clone(),
            from: from.clone(),
            to: to.clone(),
        });
        DropOutcome::Moved { card, from, to }
    }
}
