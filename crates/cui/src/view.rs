use crate::app::{App, Row};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tarotboard_core::{hex_to_color, Card, DropTarget};

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(8),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(root[1]);

    draw_board(frame, middle[0], app);
    draw_detail(frame, middle[1], app);
    draw_events(frame, root[2], app);

    if app.show_help {
        draw_help_popup(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let store = app.board.store();
    let filter = app.board.filter();
    let title = format!(
        "Tarot Board | {} board | {} cards",
        store.mode_label(),
        app.board.catalog().len()
    );
    let carrying = match app.board.drag() {
        Some(session) => format!(
            "carrying {} from {}",
            app.card_name(&session.dragged),
            session.origin
        ),
        None => "not carrying".to_string(),
    };
    let lines = vec![
        Line::from(title.bold()),
        Line::from(format!(
            "Category: {}  Stage: {}  | {}",
            filter.category.label(),
            filter.stage.label(),
            carrying
        )),
        Line::from(format!("Status: {}", app.status_line)),
    ];
    let block = Block::default().borders(Borders::ALL).title("Overview");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let rows = app.rows();
    let target = app.board.drop_target();
    let selected = app.board.selected();
    let dragged = app.board.drag().map(|session| &session.dragged);
    let items: Vec<ListItem<'_>> = rows
        .iter()
        .map(|row| {
            let mut style = Style::default();
            if target == Some(&row.target()) {
                style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
            }
            let text = match row {
                Row::Card { id, in_slot } => {
                    let marker = if dragged == Some(id) {
                        "~"
                    } else if selected == Some(id) {
                        "*"
                    } else {
                        " "
                    };
                    let indent = if *in_slot { "    " } else { "  " };
                    if dragged == Some(id) {
                        style = style.add_modifier(Modifier::DIM);
                    }
                    format!("{marker}{indent}{}", app.card_name(id))
                }
                Row::Pool => {
                    style = style.add_modifier(Modifier::UNDERLINED);
                    "  Pool".to_string()
                }
                Row::Slot(id) => {
                    style = style.add_modifier(Modifier::UNDERLINED);
                    slot_header(app, id)
                }
                Row::BoardEnd => {
                    style = style.fg(Color::DarkGray);
                    "  (end of board)".to_string()
                }
            };
            ListItem::new(text).style(style)
        })
        .collect();
    let block = pane_block("Board", app.is_carrying());
    if items.len() <= 1 && !app.board.store().is_slotted() {
        frame.render_widget(
            Paragraph::new("no cards match the filter")
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.cursor.min(rows.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn slot_header(app: &App, id: &tarotboard_core::SlotId) -> String {
    let store = app.board.store();
    let filled = store.slot_cards(id).map_or(0, <[_]>::len);
    let spec = store.slot_specs().into_iter().find(|spec| spec.id == *id);
    match spec {
        Some(spec) => {
            let full = if filled >= spec.capacity { " full" } else { "" };
            format!("  [{}] {}/{}{full}", spec.label, filled, spec.capacity)
        }
        None => format!("  [{id}]"),
    }
}

fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title("Card");
    let Some(card) = app.detail_card() else {
        frame.render_widget(
            Paragraph::new("move the cursor onto a card")
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    };
    frame.render_widget(
        Paragraph::new(detail_lines(card))
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn detail_lines(card: &Card) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(card.name.as_str().bold()),
        Line::from(format!("{} | {}", card.category, card.id)),
    ];
    if let Some(stage) = card.stage.as_deref() {
        lines.push(Line::from(format!("Stage: {stage}")));
    }
    if let Some(range) = card.investment_range.as_deref() {
        lines.push(Line::from(format!("Investment: {range}")));
    }
    if !card.website_label.is_empty() {
        lines.push(Line::from(format!("Web: {}", card.website_label)));
    }
    if !card.address.is_empty() {
        lines.push(Line::from(format!("HQ: {}", card.address)));
    }
    lines.push(Line::from(format!(
        "Logo: {}",
        card.logo.as_deref().unwrap_or("generated placeholder")
    )));
    lines.push(Line::from(vec![
        Span::raw("Palette: "),
        swatch(&card.theme.base.to_hex()),
        swatch(&card.theme.accent.to_hex()),
        Span::raw(" -> "),
        swatch(&card.palette.gradient_base),
        swatch(&card.palette.gradient_accent),
        swatch(&card.palette.aura),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(format!("\"{}\"", card.quote).italic()));
    lines.push(Line::from(""));
    lines.push(Line::from(card.summary.as_str()));
    lines
}

fn swatch(hex: &str) -> Span<'static> {
    let color = hex_to_color(hex).map_or(Color::Reset, |c| Color::Rgb(c.r, c.g, c.b));
    Span::styled(format!(" {hex} "), Style::default().bg(color).fg(Color::White))
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem<'_>> = app
        .event_log
        .iter()
        .rev()
        .take(visible)
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let title = match app.board.drop_target() {
        Some(DropTarget::Card(id)) => format!("Events | over {}", app.card_name(id)),
        Some(target) => format!("Events | over {target}"),
        None => "Events".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from("q quit | ? help | arrows/jk move"),
        Line::from("space pick up / put down | enter select or put down"),
        Line::from("esc cancel drag or clear selection"),
        Line::from("e move to end (free) / back to pool (slots)"),
        Line::from("1-9 place in slot number"),
        Line::from("c/C cycle category | s/S cycle stage"),
        Line::from("R or Ctrl+R reset the board"),
    ];
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if focused {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    block
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
