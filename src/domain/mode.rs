//! 실행 모드(direct/interactive) 값 객체.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DIRECT_MODE: &str = "direct";
pub const INTERACTIVE_MODE: &str = "interactive";

/// 모드 참조. 이름(대소문자 구분)으로만 식별한다.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeRef(String);

impl ModeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn direct() -> Self {
        Self::new(DIRECT_MODE)
    }

    pub fn interactive() -> Self {
        Self::new(INTERACTIVE_MODE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModeRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// 애플리케이션에 등록되는 모드 후보.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ModeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn mode_ref(&self) -> ModeRef {
        ModeRef::new(self.name.clone())
    }

    /// 기본 제공 모드(direct, interactive).
    pub fn builtin() -> Vec<ModeDescriptor> {
        vec![
            ModeDescriptor {
                name: DIRECT_MODE.to_string(),
                description: Some("single-shot execution from process arguments".to_string()),
            },
            ModeDescriptor {
                name: INTERACTIVE_MODE.to_string(),
                description: Some("interactive session with scoped commands".to_string()),
            },
        ]
    }
}
