use crate::app::App;
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::MoveUp => app.move_cursor(false),
        InputAction::MoveDown => app.move_cursor(true),
        InputAction::GrabOrDrop => {
            if app.is_carrying() {
                app.drop_here();
            } else {
                app.grab();
            }
        }
        InputAction::Cancel => {
            if app.show_help {
                app.show_help = false;
            } else {
                app.cancel();
            }
        }
        InputAction::Activate => {
            if app.is_carrying() {
                app.drop_here();
            } else {
                app.activate();
            }
        }
        InputAction::SendToEnd => app.send_to_end(),
        InputAction::AssignSlot(number) => app.assign_to_slot_number(number),
        InputAction::NextCategory => app.cycle_category(true),
        InputAction::PrevCategory => app.cycle_category(false),
        InputAction::NextStage => app.cycle_stage(true),
        InputAction::PrevStage => app.cycle_stage(false),
        InputAction::Reset => app.reset(),
    }
}
