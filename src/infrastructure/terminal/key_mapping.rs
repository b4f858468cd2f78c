//! crossterm 키 이벤트를 도메인 키로 변환한다.

use crossterm::event::{
    KeyCode as CtKeyCode, KeyEvent as CtKeyEvent, KeyModifiers as CtKeyModifiers,
};

use crate::domain::key::{KeyCode, KeyEvent, KeyModifiers};

/// 편집기가 다루지 않는 키(미디어 키 등)는 `None`.
pub fn map_key_event(event: &CtKeyEvent) -> Option<KeyEvent> {
    let code = match event.code {
        CtKeyCode::Char(c) => KeyCode::Char(c),
        CtKeyCode::Enter => KeyCode::Enter,
        CtKeyCode::Backspace => KeyCode::Backspace,
        CtKeyCode::Delete => KeyCode::Delete,
        CtKeyCode::Insert => KeyCode::Insert,
        CtKeyCode::Esc => KeyCode::Escape,
        CtKeyCode::Tab | CtKeyCode::BackTab => KeyCode::Tab,
        CtKeyCode::Left => KeyCode::Left,
        CtKeyCode::Right => KeyCode::Right,
        CtKeyCode::Up => KeyCode::Up,
        CtKeyCode::Down => KeyCode::Down,
        CtKeyCode::Home => KeyCode::Home,
        CtKeyCode::End => KeyCode::End,
        CtKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };

    let mut modifiers = KeyModifiers::NONE;
    if event.modifiers.contains(CtKeyModifiers::CONTROL) {
        modifiers = modifiers | KeyModifiers::CONTROL;
    }
    if event.modifiers.contains(CtKeyModifiers::ALT) {
        modifiers = modifiers | KeyModifiers::ALT;
    }
    // 문자 키의 Shift는 이미 대소문자에 반영되어 있다.
    let shifted = event.modifiers.contains(CtKeyModifiers::SHIFT) || event.code == CtKeyCode::BackTab;
    if shifted && !matches!(code, KeyCode::Char(_)) {
        modifiers = modifiers | KeyModifiers::SHIFT;
    }

    Some(KeyEvent::new(code, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_codes_and_modifiers() {
        let ctrl_left = CtKeyEvent::new(CtKeyCode::Left, CtKeyModifiers::CONTROL);
        assert_eq!(map_key_event(&ctrl_left), Some(KeyEvent::ctrl(KeyCode::Left)));

        let upper = CtKeyEvent::new(CtKeyCode::Char('A'), CtKeyModifiers::SHIFT);
        assert_eq!(map_key_event(&upper), Some(KeyEvent::char('A')));

        let back_tab = CtKeyEvent::new(CtKeyCode::BackTab, CtKeyModifiers::NONE);
        assert_eq!(
            map_key_event(&back_tab),
            Some(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT))
        );

        let caps = CtKeyEvent::new(CtKeyCode::CapsLock, CtKeyModifiers::NONE);
        assert_eq!(map_key_event(&caps), None);
    }
}
