use std::collections::VecDeque;
use tarotboard_core::{
    BoardError, BoardSession, BoardView, Card, CardId, DropOutcome, DropTarget, Event, Location,
    SlotId,
};
use tracing::debug;

pub const MAX_EVENT_LOG: usize = 200;

/// One line of the board list. Header rows are drop targets only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Card { id: CardId, in_slot: bool },
    Pool,
    Slot(SlotId),
    BoardEnd,
}

impl Row {
    pub fn target(&self) -> DropTarget {
        match self {
            Self::Card { id, .. } => DropTarget::Card(id.clone()),
            Self::Pool => DropTarget::Pool,
            Self::Slot(id) => DropTarget::Slot(id.clone()),
            Self::BoardEnd => DropTarget::BoardEnd,
        }
    }

    pub fn card(&self) -> Option<&CardId> {
        match self {
            Self::Card { id, .. } => Some(id),
            _ => None,
        }
    }
}

pub struct App {
    pub board: BoardSession,
    pub cursor: usize,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(board: BoardSession) -> Self {
        let status_line = format!(
            "{} cards on a {} board, ? for help",
            board.catalog().len(),
            board.store().mode_label()
        );
        Self {
            board,
            cursor: 0,
            event_log: VecDeque::new(),
            status_line,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn rows(&self) -> Vec<Row> {
        match self.board.view() {
            BoardView::Free { cards } => cards
                .iter()
                .map(|card| Row::Card {
                    id: card.id.clone(),
                    in_slot: false,
                })
                .chain(std::iter::once(Row::BoardEnd))
                .collect(),
            BoardView::Slotted { slots, pool } => {
                let mut rows = vec![Row::Pool];
                rows.extend(pool.iter().map(|card| Row::Card {
                    id: card.id.clone(),
                    in_slot: false,
                }));
                for slot in slots {
                    rows.push(Row::Slot(slot.id.clone()));
                    rows.extend(slot.cards.iter().map(|card| Row::Card {
                        id: card.id.clone(),
                        in_slot: true,
                    }));
                }
                rows
            }
        }
    }

    pub fn cursor_row(&self) -> Option<Row> {
        self.rows().get(self.cursor).cloned()
    }

    pub fn cursor_card(&self) -> Option<CardId> {
        self.cursor_row().and_then(|row| row.card().cloned())
    }

    /// The selected card if any, otherwise the card under the cursor.
    pub fn detail_card(&self) -> Option<&Card> {
        let id = match self.board.selected() {
            Some(id) => id.clone(),
            None => self.cursor_card()?,
        };
        self.board.catalog().get(&id)
    }

    pub fn card_name(&self, id: &CardId) -> String {
        card_name(&self.board, id)
    }

    pub fn is_carrying(&self) -> bool {
        self.board.drag().is_some()
    }

    pub fn move_cursor(&mut self, down: bool) {
        let rows = self.rows();
        move_index(&mut self.cursor, rows.len(), down);
        if self.is_carrying() {
            if let Some(row) = rows.get(self.cursor) {
                self.board.drag_enter(row.target());
            }
        }
        self.flush_events();
    }

    pub fn grab(&mut self) {
        let Some(id) = self.cursor_card() else {
            self.push_status("nothing to pick up here");
            return;
        };
        match self.board.drag_start(&id) {
            Ok(()) => self.push_status(format!("carrying {}", self.card_name(&id))),
            Err(err) => self.push_error(err),
        }
        self.flush_events();
    }

    pub fn drop_here(&mut self) {
        let Some(row) = self.cursor_row() else {
            self.board.drag_end();
            self.flush_events();
            return;
        };
        let result = self.board.drop(row.target());
        self.finish_move(result);
    }

    /// Esc: abandon the carried card, otherwise clear the selection.
    pub fn cancel(&mut self) {
        if self.is_carrying() {
            self.board.drag_end();
            self.push_status("drag cancelled");
        } else if let Some(selected) = self.board.selected().cloned() {
            if let Err(err) = self.board.click(&selected) {
                self.push_error(err);
            }
        }
        self.flush_events();
    }

    pub fn activate(&mut self) {
        let Some(id) = self.cursor_card() else {
            return;
        };
        if let Err(err) = self.board.activate(&id) {
            self.push_error(err);
        }
        self.flush_events();
    }

    /// Tail of the sequence on a free board, back to the pool on a slotted one.
    pub fn send_to_end(&mut self) {
        let Some(id) = self.cursor_card() else {
            return;
        };
        let result = if self.board.store().is_slotted() {
            self.board.release(&id)
        } else {
            self.board.move_to_end(&id)
        };
        self.finish_move(result);
    }

    /// `number` counts slots from 1 in layout order.
    pub fn assign_to_slot_number(&mut self, number: usize) {
        let Some(id) = self.cursor_card() else {
            return;
        };
        let slot = number.checked_sub(1).and_then(|idx| {
            self.board
                .store()
                .slot_specs()
                .get(idx)
                .map(|spec| spec.id.clone())
        });
        let Some(slot) = slot else {
            self.push_status(format!("no slot {number}"));
            return;
        };
        let result = self.board.assign_to_slot(&id, &slot);
        self.finish_move(result);
    }

    pub fn cycle_category(&mut self, forward: bool) {
        self.board.cycle_category(forward);
        self.normalize_cursor();
        self.flush_events();
    }

    pub fn cycle_stage(&mut self, forward: bool) {
        self.board.cycle_stage(forward);
        self.normalize_cursor();
        self.flush_events();
    }

    pub fn reset(&mut self) {
        self.board.reset();
        self.cursor = 0;
        self.push_status("board reset");
        self.flush_events();
    }

    pub fn normalize_cursor(&mut self) {
        let len = self.rows().len();
        clamp_index(&mut self.cursor, len);
    }

    pub fn push_status(&mut self, value: impl Into<String>) {
        self.status_line = value.into();
    }

    pub fn push_error(&mut self, err: BoardError) {
        self.status_line = format!("error: {err}");
    }

    fn finish_move(&mut self, result: Result<DropOutcome, BoardError>) {
        match result {
            Ok(DropOutcome::Moved { card, to, .. }) => {
                self.push_status(format!("{} -> {to}", self.card_name(&card)));
                self.follow(&card);
            }
            Ok(DropOutcome::Unchanged) => self.push_status("nothing moved"),
            Err(err) => {
                debug!(error = %err, "move rejected");
                self.push_error(err);
            }
        }
        self.normalize_cursor();
        self.flush_events();
    }

    /// Keep the cursor on a card after it changes rows.
    fn follow(&mut self, card: &CardId) {
        if let Some(idx) = self
            .rows()
            .iter()
            .position(|row| row.card() == Some(card))
        {
            self.cursor = idx;
        }
    }

    fn flush_events(&mut self) {
        if self.board.events.is_empty() {
            return;
        }
        let drained: Vec<_> = self.board.events.drain().collect();
        for event in drained {
            let line = format_event(&self.board, &event);
            self.push_event_line(line);
        }
    }

    fn push_event_line(&mut self, line: String) {
        if self.event_log.len() >= MAX_EVENT_LOG {
            let _ = self.event_log.pop_front();
        }
        self.event_log.push_back(line);
    }
}

fn card_name(board: &BoardSession, id: &CardId) -> String {
    board
        .catalog()
        .get(id)
        .map(|card| card.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn move_index(value: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *value = 0;
        return;
    }
    if down {
        *value = (*value + 1) % len;
    } else if *value == 0 {
        *value = len - 1;
    } else {
        *value -= 1;
    }
}

fn clamp_index(value: &mut usize, len: usize) {
    if len == 0 {
        *value = 0;
    } else if *value >= len {
        *value = len - 1;
    }
}

fn format_location(location: &Location) -> String {
    match location {
        Location::Position(idx) => format!("#{}", idx + 1),
        other => other.to_string(),
    }
}

fn format_event(board: &BoardSession, event: &Event) -> String {
    match event {
        Event::DragStarted { card, origin } => format!(
            "picked up {} from {}",
            card_name(board, card),
            format_location(origin)
        ),
        Event::DropTargetChanged { target } => match target {
            Some(DropTarget::Card(id)) => format!("over {}", card_name(board, id)),
            Some(other) => format!("over {other}"),
            None => "no drop target".to_string(),
        },
        Event::CardMoved { card, from, to } => format!(
            "{} moved {} -> {}",
            card_name(board, card),
            format_location(from),
            format_location(to)
        ),
        Event::DropRejected { card, reason } => {
            format!("{} rejected: {reason}", card_name(board, card))
        }
        Event::DragCancelled { card } => format!("put {} back", card_name(board, card)),
        Event::SelectionChanged { selected } => match selected {
            Some(id) => format!("selected {}", card_name(board, id)),
            None => "selection cleared".to_string(),
        },
        Event::FilterChanged { selection } => format!(
            "filter category {} stage {}",
            selection.category.label(),
            selection.stage.label()
        ),
        Event::BoardReset => "board reset".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarotboard_core::{BoardMode, CatalogBuilder, CatalogConfig, RawFirm, SlotSpec};

    fn board(mode: BoardMode) -> BoardSession {
        let records: Vec<RawFirm> = ["Alpha", "Beta", "Gamma"]
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let mut firm = RawFirm::new(idx as u64 + 1, name);
                let category = if idx == 1 { "Angel" } else { "VC" };
                firm.category = Some(category.to_string());
                firm
            })
            .collect();
        let catalog = CatalogBuilder::new(&CatalogConfig::default()).build(&records);
        BoardSession::new(catalog, &mode).expect("board")
    }

    fn slotted() -> BoardMode {
        BoardMode::Slotted {
            slots: vec![SlotSpec::new("top", "Top", 1), SlotSpec::new("next", "Next", 2)],
        }
    }

    fn order(app: &App) -> Vec<String> {
        app.board
            .store()
            .order()
            .unwrap_or_default()
            .iter()
            .map(|id| app.card_name(id))
            .collect()
    }

    #[test]
    fn free_rows_end_with_board_end() {
        let app = App::new(board(BoardMode::Free));
        let rows = app.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows.last(), Some(&Row::BoardEnd));
    }

    #[test]
    fn carrying_a_card_onto_another_reorders() {
        let mut app = App::new(board(BoardMode::Free));
        app.grab();
        assert!(app.is_carrying());
        app.move_cursor(true);
        app.move_cursor(true);
        app.drop_here();
        assert!(!app.is_carrying());
        assert_eq!(order(&app), vec!["Beta", "Alpha", "Gamma"]);
        assert_eq!(app.cursor_card(), Some(CardId::from("firm-1")));
        assert!(app.event_log.iter().any(|line| line.contains("Alpha moved")));
    }

    #[test]
    fn dropping_on_board_end_moves_to_tail() {
        let mut app = App::new(board(BoardMode::Free));
        app.grab();
        app.move_cursor(false);
        assert_eq!(app.cursor_row(), Some(Row::BoardEnd));
        app.drop_here();
        assert_eq!(order(&app), vec!["Beta", "Gamma", "Alpha"]);
    }

    #[test]
    fn cancel_puts_the_card_back() {
        let mut app = App::new(board(BoardMode::Free));
        app.grab();
        app.move_cursor(true);
        app.cancel();
        assert!(!app.is_carrying());
        assert_eq!(order(&app), vec!["Alpha", "Beta", "Gamma"]);
        assert!(app.event_log.iter().any(|line| line.starts_with("put Alpha back")));
    }

    #[test]
    fn numbered_slots_assign_and_reject_when_full() {
        let mut app = App::new(board(slotted()));
        app.move_cursor(true);
        assert_eq!(app.cursor_card(), Some(CardId::from("firm-1")));
        app.assign_to_slot_number(1);
        assert_eq!(
            app.board.store().location(&CardId::from("firm-1")),
            Some(Location::Slot(SlotId::from("top")))
        );
        app.cursor = 1;
        assert_eq!(app.cursor_card(), Some(CardId::from("firm-2")));
        app.assign_to_slot_number(1);
        assert!(app.status_line.starts_with("error: slot top is full"));
        app.assign_to_slot_number(7);
        assert_eq!(app.status_line, "no slot 7");
    }

    #[test]
    fn send_to_end_releases_in_slotted_mode() {
        let mut app = App::new(board(slotted()));
        app.cursor = 1;
        app.assign_to_slot_number(2);
        let rows = app.rows();
        app.cursor = rows
            .iter()
            .position(|row| row.card() == Some(&CardId::from("firm-1")))
            .expect("row");
        app.send_to_end();
        assert_eq!(
            app.board.store().location(&CardId::from("firm-1")),
            Some(Location::Pool)
        );
    }

    #[test]
    fn filters_clamp_the_cursor() {
        let mut app = App::new(board(BoardMode::Free));
        app.cursor = 3;
        app.cycle_category(true);
        assert_eq!(app.rows().len(), 3);
        assert!(app.cursor < 3);
        assert!(app.event_log.iter().any(|line| line.contains("category VC")));
    }

    #[test]
    fn activate_toggles_selection_and_cancel_clears_it() {
        let mut app = App::new(board(BoardMode::Free));
        app.activate();
        assert_eq!(app.board.selected(), Some(&CardId::from("firm-1")));
        assert_eq!(app.detail_card().map(|card| card.name.as_str()), Some("Alpha"));
        app.cancel();
        assert!(app.board.selected().is_none());
    }

    #[test]
    fn event_log_is_bounded() {
        let mut app = App::new(board(BoardMode::Free));
        for _ in 0..(MAX_EVENT_LOG + 10) {
            app.push_event_line("line".to_string());
        }
        assert_eq!(app.event_log.len(), MAX_EVENT_LOG);
    }
}
