//! 적용 설정 진단(inspection) 뷰 모델.

use std::path::Path;

use serde::Serialize;

use super::loader::LoadedConfig;
use crate::application::config::{DefaultsConfig, ShortcutConfig};
use crate::domain::key::EditAction;

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub defaults: DefaultsConfig,
    pub effective_defaults: EffectiveDefaults,
    pub shortcuts: Vec<ShortcutInspection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveDefaults {
    pub title: String,
    pub schema_path: Option<String>,
    pub schema_found: bool,
    pub startup_mode: String,
    pub interactive_allowed: bool,
    pub history_limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortcutInspection {
    pub combination: Option<String>,
    pub action: EditAction,
    pub error: Option<String>,
}

impl ConfigInspection {
    pub fn from_loaded(loaded: LoadedConfig) -> Self {
        let config = &loaded.config;
        Self {
            searched_paths: loaded
                .searched_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            loaded_paths: loaded
                .loaded_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            defaults: config.defaults.clone(),
            effective_defaults: EffectiveDefaults {
                title: config.title(),
                schema_path: config.defaults.schema_path.clone(),
                schema_found: config
                    .defaults
                    .schema_path
                    .as_deref()
                    .is_some_and(|p| Path::new(p).is_file()),
                startup_mode: config.startup_mode(),
                interactive_allowed: config.interactive_allowed(),
                history_limit: config.history_limit(),
            },
            shortcuts: config.shortcuts.iter().map(shortcut_inspection).collect(),
        }
    }
}

fn shortcut_inspection(cfg: &ShortcutConfig) -> ShortcutInspection {
    match cfg.to_definition() {
        Ok(def) => ShortcutInspection {
            combination: Some(def.combination()),
            action: cfg.action,
            error: None,
        },
        Err(err) => ShortcutInspection {
            combination: None,
            action: cfg.action,
            error: Some(err.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::application::config::Config;

    #[test]
    fn reports_invalid_shortcut_without_failing() {
        let config: Config = serde_json::from_str(
            r#"{"shortcuts": [
                {"key": "w", "modifiers": ["ctrl"], "action": "backspace_word"},
                {"key": "hyper", "action": "no_op"}
            ]}"#,
        )
        .unwrap();
        let inspection = ConfigInspection::from_loaded(LoadedConfig {
            config,
            searched_paths: vec![PathBuf::from("a.json")],
            loaded_paths: vec![],
        });

        assert_eq!(inspection.shortcuts[0].combination.as_deref(), Some("Ctrl+W"));
        assert!(inspection.shortcuts[1].error.is_some());
        assert_eq!(inspection.effective_defaults.startup_mode, "direct");
        assert!(!inspection.effective_defaults.schema_found);
    }
}
