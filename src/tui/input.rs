use super::helpers::row_to_px;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Represents the result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Move to next vacancy
    Next,
    /// Move to previous vacancy
    Previous,
    /// Start typing a search
    Search,
    /// Toggle the catalog tag at this index
    ToggleTag(usize),
    /// Move to the next city in the list
    CycleCity,
    /// Reset search, tags and city
    ClearFilters,
    /// Fetch remote vacancies
    Refresh,
    /// Toggle help overlay
    Help,
    /// No action
    None,
}

/// Maps keyboard events to actions
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q, Esc or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        // Navigation
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::PageDown, KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Previous,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Previous,
        (KeyCode::PageUp, KeyModifiers::NONE) => KeyAction::Previous,

        // Filters
        (KeyCode::Char('/'), KeyModifiers::NONE) => KeyAction::Search,
        (KeyCode::Char(d @ '1'..='6'), KeyModifiers::NONE) => {
            KeyAction::ToggleTag(d as usize - '1' as usize)
        }
        (KeyCode::Char('c'), KeyModifiers::NONE) => KeyAction::CycleCity,
        (KeyCode::Char('x'), KeyModifiers::NONE) => KeyAction::ClearFilters,

        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Refresh,

        // Help: ? (some terminals report it with Shift)
        (KeyCode::Char('?'), KeyModifiers::NONE) => KeyAction::Help,
        (KeyCode::Char('?'), KeyModifiers::SHIFT) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Keys while the search box has focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    Insert(char),
    Backspace,
    /// Leave search mode keeping the text
    Done,
    None,
}

/// Maps keyboard events to search box edits.
/// Used when ViewState is Search
pub fn handle_search_input(key: KeyEvent) -> SearchAction {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) | (KeyCode::Esc, _) => SearchAction::Done,
        (KeyCode::Backspace, _) => SearchAction::Backspace,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            SearchAction::Insert(c)
        }
        _ => SearchAction::None,
    }
}

/// Mouse events translated into swipe gesture steps, in drag coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    Start(f32),
    Move(f32),
    End,
    None,
}

/// Maps left-button mouse events to gesture steps
pub fn handle_mouse_event(mouse: MouseEvent) -> GestureAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => GestureAction::Start(row_to_px(mouse.row)),
        MouseEventKind::Drag(MouseButton::Left) => GestureAction::Move(row_to_px(mouse.row)),
        MouseEventKind::Up(MouseButton::Left) => GestureAction::End,
        _ => GestureAction::None,
    }
}
