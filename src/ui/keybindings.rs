// Keybindings for the screenshot screen
//
// Keybindings:
// - Arrow keys / hjkl: Move between screenshots in the preview
// - Enter: Open the hovered screenshot in the preview
// - Escape: Close the preview or cancel a pending delete
// - i: Invert list order
// - F5: Rescan the screenshot directory
// - Delete: Delete the hovered or previewed screenshot

use gdk4::Key;

use super::tile::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Navigate(Direction),
    OpenPreview,
    Close,
    InvertOrder,
    Rescan,
    Delete,
}

/// Maps a key press to a screen action.
pub fn action_for_key(keyval: Key) -> Option<KeyAction> {
    let action = match keyval {
        Key::Escape => KeyAction::Close,
        Key::Return | Key::KP_Enter => KeyAction::OpenPreview,
        Key::Delete | Key::KP_Delete => KeyAction::Delete,
        Key::F5 => KeyAction::Rescan,
        Key::i | Key::I => KeyAction::InvertOrder,
        // Arrow keys
        Key::Up => KeyAction::Navigate(Direction::Up),
        Key::Down => KeyAction::Navigate(Direction::Down),
        Key::Left => KeyAction::Navigate(Direction::Left),
        Key::Right => KeyAction::Navigate(Direction::Right),
        // Vim-style keys (hjkl)
        Key::h => KeyAction::Navigate(Direction::Left),
        Key::j => KeyAction::Navigate(Direction::Down),
        Key::k => KeyAction::Navigate(Direction::Up),
        Key::l => KeyAction::Navigate(Direction::Right),
        _ => return None,
    };
    Some(action)
}
