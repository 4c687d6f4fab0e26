//! JSON shapes for the board API and the action dispatcher behind
//! `POST /api/action`.

use serde::{Deserialize, Serialize};
use tarotboard_core::{
    BoardError, BoardSession, BoardView, Card, CardId, DragSession, DropOutcome, DropTarget,
    Event, Facet, FilterSelection, SlotId,
};

#[derive(Debug, Default, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub card: Option<CardId>,
    #[serde(default)]
    pub target: Option<DropTarget>,
    /// Reorder anchor: the card that ends up right after `card`.
    #[serde(default)]
    pub before: Option<CardId>,
    #[serde(default)]
    pub slot: Option<SlotId>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub ok: bool,
    pub error: Option<String>,
    pub state: UiBoard,
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct UiBoard {
    pub mode: &'static str,
    pub filter: FilterSelection,
    pub category_options: Vec<String>,
    pub stage_options: Vec<String>,
    pub drag: Option<DragSession>,
    pub drop_target: Option<DropTarget>,
    pub selected: Option<CardId>,
    /// Free board sequence after filters; empty on a slotted board.
    pub cards: Vec<UiCard>,
    pub slots: Vec<UiSlot>,
    pub pool: Vec<UiCard>,
}

#[derive(Debug, Serialize)]
pub struct UiSlot {
    pub id: SlotId,
    pub label: String,
    pub capacity: usize,
    pub full: bool,
    pub cards: Vec<UiCard>,
}

#[derive(Debug, Serialize)]
pub struct UiCard {
    pub id: CardId,
    pub name: String,
    pub category: String,
    pub stage: Option<String>,
    pub investment_range: Option<String>,
    pub address: String,
    pub website: String,
    pub website_label: String,
    pub image: String,
    pub has_logo: bool,
    pub background: String,
    pub aura: String,
    pub accent: String,
    pub quote: String,
    pub notes: String,
    pub summary: String,
}

pub fn build_response(board: &mut BoardSession, err: Option<String>) -> ApiResponse {
    let events: Vec<_> = board.events.drain().collect();
    ApiResponse {
        ok: err.is_none(),
        error: err,
        state: snapshot_board(board),
        events,
    }
}

pub fn snapshot_board(board: &BoardSession) -> UiBoard {
    let (cards, slots, pool) = match board.view() {
        BoardView::Free { cards } => (
            cards.into_iter().map(snapshot_card).collect(),
            Vec::new(),
            Vec::new(),
        ),
        BoardView::Slotted { slots, pool } => (
            Vec::new(),
            slots
                .into_iter()
                .map(|slot| UiSlot {
                    full: slot.is_full(),
                    id: slot.id,
                    label: slot.label,
                    capacity: slot.capacity,
                    cards: slot.cards.into_iter().map(snapshot_card).collect(),
                })
                .collect(),
            pool.into_iter().map(snapshot_card).collect(),
        ),
    };
    UiBoard {
        mode: board.store().mode_label(),
        filter: board.filter().clone(),
        category_options: board.catalog().category_options(),
        stage_options: board.catalog().stage_options(),
        drag: board.drag().cloned(),
        drop_target: board.drop_target().cloned(),
        selected: board.selected().cloned(),
        cards,
        slots,
        pool,
    }
}

fn snapshot_card(card: &Card) -> UiCard {
    UiCard {
        id: card.id.clone(),
        name: card.name.clone(),
        category: card.category.clone(),
        stage: card.stage.clone(),
        investment_range: card.investment_range.clone(),
        address: card.address.clone(),
        website: card.website.clone(),
        website_label: card.website_label.clone(),
        image: card.image_source().to_string(),
        has_logo: card.logo.is_some(),
        background: card.palette.linear_gradient(),
        aura: card.palette.aura.clone(),
        accent: card.theme.accent.to_hex(),
        quote: card.quote.clone(),
        notes: card.notes.clone(),
        summary: card.summary.clone(),
    }
}

/// Run one request against the board. Returns the error text on failure.
pub fn apply_action(board: &mut BoardSession, req: ActionRequest) -> Option<String> {
    let result = match req.action.as_str() {
        "drag_start" => require_card(&req).and_then(|card| board.drag_start(&card).map_err(text)),
        "drag_enter" => match req.target {
            Some(target) => {
                board.drag_enter(target);
                Ok(())
            }
            None => Err("drag_enter needs a target".to_string()),
        },
        "drop" => match req.target {
            Some(target) => board.drop(target).map(|_| ()).map_err(text),
            None => Err("drop needs a target".to_string()),
        },
        "drag_end" => {
            board.drag_end();
            Ok(())
        }
        "click" => {
            require_card(&req).and_then(|card| board.click(&card).map(|_| ()).map_err(text))
        }
        "move_to_end" => require_card(&req).and_then(|card| moved(board.move_to_end(&card))),
        "reorder" => match (req.card.as_ref(), req.before.as_ref()) {
            (Some(card), Some(before)) => moved(board.reorder(card, before)),
            _ => Err("reorder needs card and before".to_string()),
        },
        "assign" => match (req.card.as_ref(), req.slot.as_ref()) {
            (Some(card), Some(slot)) => moved(board.assign_to_slot(card, slot)),
            _ => Err("assign needs card and slot".to_string()),
        },
        "release" => require_card(&req).and_then(|card| moved(board.release(&card))),
        "filter" => {
            let current = board.filter().clone();
            let selection = FilterSelection {
                category: req
                    .category
                    .as_deref()
                    .map_or(current.category, Facet::parse),
                stage: req
                    .stage
                    .as_deref()
                    .map_or(current.stage, Facet::parse),
            };
            board.set_filter(selection);
            Ok(())
        }
        "reset" => {
            board.reset();
            Ok(())
        }
        other => Err(format!("unknown action {other}")),
    };
    result.err()
}

fn require_card(req: &ActionRequest) -> Result<CardId, String> {
    req.card
        .clone()
        .ok_or_else(|| format!("{} needs a card", req.action))
}

fn moved(result: Result<DropOutcome, BoardError>) -> Result<(), String> {
    result.map(|_| ()).map_err(text)
}

fn text(err: BoardError) -> String {
    err.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarotboard_core::{BoardMode, CatalogBuilder, CatalogConfig, RawFirm, SlotSpec};

    fn board(mode: BoardMode) -> BoardSession {
        let records: Vec<RawFirm> = ["Alpha", "Beta", "Gamma"]
            .iter()
            .enumerate()
            .map(|(idx, name)| RawFirm::new(idx as u64 + 1, name))
            .collect();
        let catalog = CatalogBuilder::new(&CatalogConfig::default()).build(&records);
        BoardSession::new(catalog, &mode).expect("board")
    }

    fn request(body: &str) -> ActionRequest {
        serde_json::from_str(body).expect("request json")
    }

    fn free_names(board: &BoardSession) -> Vec<String> {
        snapshot_board(board)
            .cards
            .into_iter()
            .map(|card| card.name)
            .collect()
    }

    #[test]
    fn drag_gesture_over_json_reorders() {
        let mut board = board(BoardMode::Free);
        assert_eq!(
            apply_action(&mut board, request(r#"{"action":"drag_start","card":"firm-3"}"#)),
            None
        );
        assert_eq!(
            apply_action(
                &mut board,
                request(r#"{"action":"drag_enter","target":{"kind":"card","id":"firm-1"}}"#)
            ),
            None
        );
        assert_eq!(
            apply_action(
                &mut board,
                request(r#"{"action":"drop","target":{"kind":"card","id":"firm-1"}}"#)
            ),
            None
        );
        assert_eq!(free_names(&board), vec!["Gamma", "Alpha", "Beta"]);
        let response = build_response(&mut board, None);
        assert!(response.ok);
        assert!(response.state.drag.is_none());
        assert!(response
            .events
            .iter()
            .any(|event| matches!(event, Event::CardMoved { .. })));
    }

    #[test]
    fn board_end_target_needs_no_id() {
        let mut board = board(BoardMode::Free);
        apply_action(&mut board, request(r#"{"action":"drag_start","card":"firm-1"}"#));
        let err = apply_action(
            &mut board,
            request(r#"{"action":"drop","target":{"kind":"board_end"}}"#),
        );
        assert_eq!(err, None);
        assert_eq!(free_names(&board), vec!["Beta", "Gamma", "Alpha"]);
    }

    #[test]
    fn full_slot_reports_error_and_keeps_state() {
        let mode = BoardMode::Slotted {
            slots: vec![SlotSpec::new("top", "Top", 1)],
        };
        let mut board = board(mode);
        assert_eq!(
            apply_action(
                &mut board,
                request(r#"{"action":"assign","card":"firm-1","slot":"top"}"#)
            ),
            None
        );
        let err = apply_action(
            &mut board,
            request(r#"{"action":"assign","card":"firm-2","slot":"top"}"#),
        )
        .expect("slot is full");
        assert!(err.contains("full"), "{err}");
        let response = build_response(&mut board, Some(err));
        assert!(!response.ok);
        assert_eq!(response.state.slots[0].cards.len(), 1);
        assert!(response.state.slots[0].full);
        let pool: Vec<String> = response.state.pool.into_iter().map(|card| card.name).collect();
        assert_eq!(pool, vec!["Beta", "Gamma"]);
    }

    #[test]
    fn wrong_mode_and_missing_fields_are_errors() {
        let mut board = board(BoardMode::Free);
        assert!(apply_action(
            &mut board,
            request(r#"{"action":"release","card":"firm-1"}"#)
        )
        .is_some());
        assert_eq!(
            apply_action(&mut board, request(r#"{"action":"reorder","card":"firm-1"}"#)),
            Some("reorder needs card and before".to_string())
        );
        assert_eq!(
            apply_action(&mut board, request(r#"{"action":"fly"}"#)),
            Some("unknown action fly".to_string())
        );
        assert!(apply_action(&mut board, request(r#"{"action":"drop","target":{"kind":"pool"}}"#))
            .is_some());
    }

    #[test]
    fn filter_keeps_unspecified_dimension() {
        let mut board = board(BoardMode::Free);
        apply_action(
            &mut board,
            request(r#"{"action":"filter","category":"Independent","stage":"Seed"}"#),
        );
        apply_action(&mut board, request(r#"{"action":"filter","stage":"All Stages"}"#));
        assert_eq!(board.filter(), &FilterSelection::new("Independent", "All"));
        assert_eq!(free_names(&board).len(), 3);
    }

    #[test]
    fn snapshot_cards_carry_derived_styling() {
        let board = board(BoardMode::Free);
        let state = snapshot_board(&board);
        let card = &state.cards[0];
        assert!(!card.has_logo);
        assert!(card.image.starts_with("data:image/svg+xml;base64,"));
        assert!(card.background.starts_with("linear-gradient(135deg, #"));
        assert_eq!(state.category_options, vec!["All", "Independent"]);
    }
}
