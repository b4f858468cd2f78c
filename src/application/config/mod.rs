//! 애플리케이션이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수 접근은 `infrastructure`에서만 수행한다.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::domain::key::{EditAction, KeyCode, KeyModifiers, ShortcutDefinition};
use crate::domain::mode::DIRECT_MODE;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;
pub const DEFAULT_TITLE: &str = "modeshell";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// 전역 기본값
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// 사용자 정의 단축키(기본 단축키와 같은 조합이면 덮어쓴다)
    #[serde(default)]
    pub shortcuts: Vec<ShortcutConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DefaultsConfig {
    /// 시작 배너 제목
    pub title: Option<String>,
    /// 명령/지시어 manifest(JSON) 경로
    pub schema_path: Option<String>,
    /// 시작 모드(기본 direct)
    pub startup_mode: Option<String>,
    /// `[!]` 및 --interactive 허용 여부(기본 true)
    pub interactive_allowed: Option<bool>,
    /// 세션 내 입력 기록 최대 개수
    pub history_limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ShortcutConfig {
    /// `LeftArrow`, `w`, `F5` 같은 키 이름
    pub key: String,
    /// `ctrl`, `alt`, `shift`
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub action: EditAction,
}

impl ShortcutConfig {
    pub fn to_definition(&self) -> Result<ShortcutDefinition> {
        let key: KeyCode = self.key.parse().map_err(|e: String| anyhow!(e))?;
        let modifiers = KeyModifiers::parse_list(&self.modifiers).map_err(|e| anyhow!(e))?;
        Ok(ShortcutDefinition::with_modifiers(key, modifiers, self.action))
    }
}

impl Config {
    pub fn title(&self) -> String {
        self.defaults
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    pub fn startup_mode(&self) -> String {
        self.defaults
            .startup_mode
            .clone()
            .unwrap_or_else(|| DIRECT_MODE.to_string())
    }

    pub fn interactive_allowed(&self) -> bool {
        self.defaults.interactive_allowed.unwrap_or(true)
    }

    pub fn history_limit(&self) -> usize {
        self.defaults.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }

    /// 사용자 단축키 설정을 도메인 정의로 변환한다.
    pub fn user_shortcuts(&self) -> Result<Vec<ShortcutDefinition>> {
        self.shortcuts.iter().map(ShortcutConfig::to_definition).collect()
    }

    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    /// 단축키 목록은 이어 붙이며, 같은 조합 충돌은 등록 시점에 오류가 된다.
    pub fn merge_from(&mut self, other: Config) {
        self.defaults.merge_from(other.defaults);
        self.shortcuts.extend(other.shortcuts);
    }
}

impl DefaultsConfig {
    pub fn merge_from(&mut self, other: DefaultsConfig) {
        if other.title.is_some() {
            self.title = other.title;
        }
        if other.schema_path.is_some() {
            self.schema_path = other.schema_path;
        }
        if other.startup_mode.is_some() {
            self.startup_mode = other.startup_mode;
        }
        if other.interactive_allowed.is_some() {
            self.interactive_allowed = other.interactive_allowed;
        }
        if other.history_limit.is_some() {
            self.history_limit = other.history_limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_values_override_earlier_ones() {
        let mut base: Config = serde_json::from_str(
            r#"{"defaults": {"title": "base", "history_limit": 5},
                "shortcuts": [{"key": "w", "modifiers": ["ctrl"], "action": "backspace_word"}]}"#,
        )
        .unwrap();
        let overlay: Config =
            serde_json::from_str(r#"{"defaults": {"history_limit": 9}}"#).unwrap();

        base.merge_from(overlay);
        assert_eq!(base.title(), "base");
        assert_eq!(base.history_limit(), 9);
        assert_eq!(base.shortcuts.len(), 1);
        assert!(base.interactive_allowed());
        assert_eq!(base.startup_mode(), "direct");
    }

    #[test]
    fn shortcut_config_converts_to_definition() {
        let config = ShortcutConfig {
            key: "w".to_string(),
            modifiers: vec!["ctrl".to_string()],
            action: EditAction::BackspaceWord,
        };
        let definition = config.to_definition().unwrap();
        assert_eq!(definition.key, KeyCode::Char('w'));
        assert_eq!(definition.modifiers, KeyModifiers::CONTROL);
        assert_eq!(definition.action, EditAction::BackspaceWord);

        let bad = ShortcutConfig {
            key: "w".to_string(),
            modifiers: vec!["hyper".to_string()],
            action: EditAction::NoOp,
        };
        assert!(bad.to_definition().is_err());
    }
}
