use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    MoveUp,
    MoveDown,
    /// Pick up the card under the cursor, or put down the carried one.
    GrabOrDrop,
    Cancel,
    Activate,
    SendToEnd,
    AssignSlot(usize),
    NextCategory,
    PrevCategory,
    NextStage,
    PrevStage,
    Reset,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Esc => InputAction::Cancel,
        KeyCode::Up => InputAction::MoveUp,
        KeyCode::Down => InputAction::MoveDown,
        KeyCode::Enter => InputAction::Activate,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char(' ') => InputAction::GrabOrDrop,
        KeyCode::Char('k') => InputAction::MoveUp,
        KeyCode::Char('j') => InputAction::MoveDown,
        KeyCode::Char('e') => InputAction::SendToEnd,
        KeyCode::Char(c @ '1'..='9') => InputAction::AssignSlot(c as usize - '0' as usize),
        KeyCode::Char('c') => InputAction::NextCategory,
        KeyCode::Char('C') => InputAction::PrevCategory,
        KeyCode::Char('s') => InputAction::NextStage,
        KeyCode::Char('S') => InputAction::PrevStage,
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Reset,
        KeyCode::Char('R') => InputAction::Reset,
        _ => InputAction::None,
    }
}
