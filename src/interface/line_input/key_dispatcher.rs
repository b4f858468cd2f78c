//! 키 이벤트 하나를 정확히 하나의 결과로 분류한다.

use anyhow::Result;

use crate::application::ports::Terminal;
use crate::domain::key::{EditAction, KeyCode, KeyEvent, KeyModifiers};
use crate::interface::line_input::shortcut_table::ShortcutTable;

/// 키 이벤트 분류 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// 등록된 단축키 동작.
    Shortcut(EditAction),
    /// 줄 제출(Enter).
    Submitted,
    /// 단축키가 없는 Ctrl 조합. 호출자가 `^` 표시를 출력한다.
    ControlSequence(KeyEvent),
    /// 그 외 키. 호출자가 문자를 삽입한다.
    Unhandled(KeyEvent),
}

#[derive(Debug, Clone, Default)]
pub struct KeyDispatcher {
    shortcuts: ShortcutTable,
}

impl KeyDispatcher {
    pub fn new(shortcuts: ShortcutTable) -> Self {
        Self { shortcuts }
    }

    pub fn shortcuts(&self) -> &ShortcutTable {
        &self.shortcuts
    }

    /// 스크립트/재생 입력에 사용한다. 블로킹하지 않는다.
    pub fn dispatch(&self, key: &KeyEvent) -> KeyOutcome {
        if let Some(action) = self.shortcuts.resolve(key.code, key.modifiers) {
            return KeyOutcome::Shortcut(action);
        }
        if key.code == KeyCode::Enter {
            return KeyOutcome::Submitted;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeyOutcome::ControlSequence(*key);
        }
        KeyOutcome::Unhandled(*key)
    }

    /// 터미널에서 키 하나를 읽어 분류한다. 읽기가 취소되면 `None`.
    pub fn read_key(&self, terminal: &mut dyn Terminal) -> Result<Option<KeyOutcome>> {
        let Some(key) = terminal.read_key()? else {
            return Ok(None);
        };
        Ok(Some(self.dispatch(&key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::key::ShortcutDefinition;

    #[test]
    fn exactly_one_outcome_per_key() {
        let dispatcher = KeyDispatcher::default();

        assert_eq!(
            dispatcher.dispatch(&KeyEvent::plain(KeyCode::Left)),
            KeyOutcome::Shortcut(EditAction::MoveLeft)
        );
        assert_eq!(dispatcher.dispatch(&KeyEvent::enter()), KeyOutcome::Submitted);

        let ctrl_w = KeyEvent::ctrl(KeyCode::Char('w'));
        assert_eq!(dispatcher.dispatch(&ctrl_w), KeyOutcome::ControlSequence(ctrl_w));

        let a = KeyEvent::char('a');
        assert_eq!(dispatcher.dispatch(&a), KeyOutcome::Unhandled(a));
    }

    #[test]
    fn shortcut_wins_over_submit_and_control() {
        let table = ShortcutTable::register(
            &[],
            &[
                ShortcutDefinition::new(KeyCode::Enter, EditAction::NoOp),
                ShortcutDefinition::with_modifiers(
                    KeyCode::Char('a'),
                    KeyModifiers::CONTROL,
                    EditAction::Home,
                ),
            ],
        )
        .unwrap();
        let dispatcher = KeyDispatcher::new(table);

        assert_eq!(
            dispatcher.dispatch(&KeyEvent::enter()),
            KeyOutcome::Shortcut(EditAction::NoOp)
        );
        assert_eq!(
            dispatcher.dispatch(&KeyEvent::ctrl(KeyCode::Char('a'))),
            KeyOutcome::Shortcut(EditAction::Home)
        );
    }
}
