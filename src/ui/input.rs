use crate::ui::message::AppMessage;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key(key: KeyEvent) -> Option<AppMessage> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppMessage::Quit),
            (KeyCode::Char(' '), _) => Some(AppMessage::TogglePlayPause),
            (KeyCode::Char('n'), _) => Some(AppMessage::NextTrack),
            (KeyCode::Char('p'), _) => Some(AppMessage::PreviousTrack),
            (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => Some(AppMessage::VolumeUp),
            (KeyCode::Char('-'), _) => Some(AppMessage::VolumeDown),
            (KeyCode::Char('H'), _) => Some(AppMessage::SeekBackward),
            (KeyCode::Char('L'), _) => Some(AppMessage::SeekForward),
            (KeyCode::Char('m'), _) => Some(AppMessage::CycleMode),
            (KeyCode::Char('M'), _) => Some(AppMessage::ToggleMute),
            (KeyCode::Char('f'), _) => Some(AppMessage::ToggleFavorite),
            (KeyCode::Char('y'), _) => Some(AppMessage::ToggleLyrics),
            (KeyCode::Esc, _) => Some(AppMessage::GoBack),
            (KeyCode::Tab, _) => Some(AppMessage::NextTab),
            (KeyCode::BackTab, _) => Some(AppMessage::PreviousTab),
            (KeyCode::Char(c @ '1'..='5'), _) => {
                Some(AppMessage::SetTab(c as usize - '1' as usize))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Option<AppMessage> {
        InputHandler::handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn player_keys() {
        assert_eq!(press(KeyCode::Char(' ')), Some(AppMessage::TogglePlayPause));
        assert_eq!(press(KeyCode::Char('m')), Some(AppMessage::CycleMode));
        assert_eq!(
            InputHandler::handle_key(KeyEvent::new(KeyCode::Char('M'), KeyModifiers::SHIFT)),
            Some(AppMessage::ToggleMute)
        );
        assert_eq!(press(KeyCode::Char('f')), Some(AppMessage::ToggleFavorite));
    }

    #[test]
    fn digits_pick_tabs() {
        assert_eq!(press(KeyCode::Char('1')), Some(AppMessage::SetTab(0)));
        assert_eq!(press(KeyCode::Char('5')), Some(AppMessage::SetTab(4)));
        assert_eq!(press(KeyCode::Char('6')), None);
    }

    #[test]
    fn ctrl_c_quits() {
        assert_eq!(
            InputHandler::handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(AppMessage::Quit)
        );
        assert_eq!(press(KeyCode::Char('c')), None);
    }
}
