use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use vokabel_lib::vocabulary::SwipeDirection;

use super::app_state::{Mode, TuiState};

pub fn handle_key(state: &mut TuiState, key: KeyEvent) {
    // Clear flash message on any keypress
    state.flash_message = None;

    match state.mode {
        Mode::Deck => handle_deck_key(state, key),
        Mode::EditNotes => handle_input_key(state, key),
    }
}

fn handle_deck_key(state: &mut TuiState, key: KeyEvent) {
    if state.show_help {
        match key.code {
            KeyCode::Char('q') => state.quit = true,
            _ => state.toggle_help(),
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Char('h') | KeyCode::Left => state.begin_swipe(SwipeDirection::Left),
        KeyCode::Char('l') | KeyCode::Right => state.begin_swipe(SwipeDirection::Right),
        KeyCode::Char('k') | KeyCode::Up => state.begin_swipe(SwipeDirection::Up),
        KeyCode::Char('u') => state.undo(),
        KeyCode::Char(' ') | KeyCode::Enter => state.toggle_flip(),
        KeyCode::Char('n') => state.start_notes_edit(),
        KeyCode::Char('?') => state.toggle_help(),
        _ => {}
    }
}

fn handle_input_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => state.cancel_notes_edit(),
        KeyCode::Enter => state.save_notes_from_input(),
        KeyCode::Backspace => {
            state.input_text.pop();
        }
        KeyCode::Char(c) => {
            state.input_text.push(c);
        }
        _ => {}
    }
}

pub fn handle_mouse(state: &mut TuiState, mouse: MouseEvent) {
    if state.mode != Mode::Deck || state.show_help {
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            state.flash_message = None;
            state.start_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            state.update_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            state.end_drag(mouse.column, mouse.row);
        }
        _ => {}
    }
}
