//! 세션 단위 단축키 테이블.
//!
//! 초기화 중에만 변경되고 이후에는 조회 전용이다.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::errors::ShortcutError;
use crate::domain::key::{EditAction, KeyCode, KeyModifiers, ShortcutDefinition};

#[derive(Debug, Clone)]
pub struct ShortcutTable {
    bindings: HashMap<(KeyCode, KeyModifiers), EditAction>,
}

impl ShortcutTable {
    /// 내장 기본값 위에 `defaults`를 덮어쓰고 `overrides`를 추가한다.
    ///
    /// `defaults`는 같은 조합을 조용히 교체한다(마지막 값 우선).
    /// `overrides`는 기본값을 덮어쓸 수 있지만, 사용자 설정끼리 같은 조합이면 실패한다.
    pub fn register(
        defaults: &[ShortcutDefinition],
        overrides: &[ShortcutDefinition],
    ) -> Result<Self, ShortcutError> {
        let mut bindings = HashMap::new();
        for shortcut in builtin_shortcuts().iter().chain(defaults) {
            bindings.insert((shortcut.key, shortcut.modifiers), shortcut.action);
        }

        let mut user_keys = Vec::with_capacity(overrides.len());
        for shortcut in overrides {
            let key = (shortcut.key, shortcut.modifiers);
            if user_keys.contains(&key) {
                return Err(ShortcutError::Duplicate {
                    combination: shortcut.combination(),
                });
            }
            user_keys.push(key);
            if let Some(previous) = bindings.insert(key, shortcut.action) {
                debug!(
                    combination = %shortcut.combination(),
                    ?previous,
                    action = ?shortcut.action,
                    "user shortcut overrides default"
                );
            }
        }

        Ok(Self { bindings })
    }

    /// 내장 기본값만 가진 테이블.
    pub fn builtin() -> Self {
        let bindings = builtin_shortcuts()
            .into_iter()
            .map(|s| ((s.key, s.modifiers), s.action))
            .collect();
        Self { bindings }
    }

    pub fn resolve(&self, key: KeyCode, modifiers: KeyModifiers) -> Option<EditAction> {
        self.bindings.get(&(key, modifiers)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for ShortcutTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// 내장 단축키. 단어 단위 동작의 수식키는 Ctrl이다.
pub fn builtin_shortcuts() -> Vec<ShortcutDefinition> {
    use EditAction::*;

    let plain = [
        (KeyCode::Left, MoveLeft),
        (KeyCode::Right, MoveRight),
        (KeyCode::Home, Home),
        (KeyCode::End, End),
        (KeyCode::Backspace, Backspace),
        (KeyCode::Delete, Delete),
        (KeyCode::Insert, NoOp),
        (KeyCode::Escape, ClearLine),
        (KeyCode::Up, HistoryPrevious),
        (KeyCode::Down, HistoryNext),
        (KeyCode::Tab, Complete),
    ];
    let word = [
        (KeyCode::Left, WordLeft),
        (KeyCode::Right, WordRight),
        (KeyCode::Backspace, BackspaceWord),
        (KeyCode::Delete, DeleteWord),
    ];

    plain
        .into_iter()
        .map(|(key, action)| ShortcutDefinition::new(key, action))
        .chain(word.into_iter().map(|(key, action)| {
            ShortcutDefinition::with_modifiers(key, KeyModifiers::CONTROL, action)
        }))
        .collect()
}
