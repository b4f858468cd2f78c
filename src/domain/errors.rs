//! 스키마 해석/단축키 등록/실행 디스패치 오류 타입.
//!
//! 표시 계층이 렌더링할 수 있도록 식별 정보만 담는다.

use thiserror::Error;

use crate::domain::mode::ModeRef;
use crate::domain::schema::{CommandSchema, DirectiveSchema};

/// 스키마 해석 오류. 애플리케이션 시작 시 치명적이다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("application may define at most one default command")]
    TooManyDefaultCommands,
    #[error("application has no commands defined")]
    NoCommandsDefined,
    #[error("{} commands share the name '{name}'", commands.len())]
    DuplicateCommandName {
        name: String,
        commands: Vec<CommandSchema>,
    },
    #[error("{} directives share the name '{name}'", directives.len())]
    DuplicateDirectiveName {
        name: String,
        directives: Vec<DirectiveSchema>,
    },
    #[error("'{mode}' referenced by {owner} is not a registered mode")]
    InvalidModeType { owner: String, mode: String },
    #[error("command '{command}' defines option '--{option}' more than once")]
    DuplicateOptionName { command: String, option: String },
    #[error("command '{command}' defines option '-{short_name}' more than once")]
    DuplicateOptionShortName { command: String, short_name: char },
}

/// 사용자 단축키 등록 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortcutError {
    #[error("shortcut '{combination}' is already defined")]
    Duplicate { combination: String },
}

/// 한 줄 실행 디스패치 오류. 세션은 계속된다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("nothing to execute")]
    EmptyInput,
    #[error("unknown directive '[{0}]'")]
    UnknownDirective(String),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("command '{command}' requires option '{option}'")]
    MissingRequiredOption { command: String, option: String },
    #[error(
        "{kind} '{target}' cannot run in '{active_mode}' mode; supported modes: {}",
        join_modes(supported_modes)
    )]
    ModeRestriction {
        kind: &'static str,
        target: String,
        active_mode: ModeRef,
        supported_modes: Vec<ModeRef>,
    },
}

fn join_modes(modes: &[ModeRef]) -> String {
    if modes.is_empty() {
        return "none".to_string();
    }
    modes
        .iter()
        .map(ModeRef::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
