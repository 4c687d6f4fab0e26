use crate::{CardId, DropTarget, FilterSelection, Location};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    DragStarted {
        card: CardId,
        origin: Location,
    },
    DropTargetChanged {
        target: Option<DropTarget>,
    },
    CardMoved {
        card: CardId,
        from: Location,
        to: Location,
    },
    DropRejected {
        card: CardId,
        reason: String,
    },
    DragCancelled {
        card: CardId,
    },
    SelectionChanged {
        selected: Option<CardId>,
    },
    FilterChanged {
        selection: FilterSelection,
    },
    BoardReset,
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
