//! 명령/지시어 스키마 엔티티와 불변 루트 스키마.
//!
//! `*Descriptor`는 외부 스키마 소스가 넘겨주는 후보 정의이고,
//! `*Schema`는 resolver 검증을 통과한 값 객체다.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::mode::{DIRECT_MODE, INTERACTIVE_MODE, ModeRef};

/// 위치 인자 정의.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub name: String,
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub description: Option<String>,
}

/// 옵션 정의. 이름과 단축 이름 중 최소 하나를 가진다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSchema {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<char>,
    #[serde(default)]
    pub description: Option<String>,
    /// 입력과 fallback 값이 모두 없으면 디스패치가 거부된다.
    #[serde(default)]
    pub required: bool,
    /// 입력에 없을 때 값을 가져올 변수 이름(기본은 환경변수)
    #[serde(default)]
    pub fallback_variable: Option<String>,
}

impl OptionSchema {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            short_name: None,
            description: None,
            required: false,
            fallback_variable: None,
        }
    }

    pub fn with_short(mut self, short_name: char) -> Self {
        self.short_name = Some(short_name);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_fallback(mut self, variable: impl Into<String>) -> Self {
        self.fallback_variable = Some(variable.into());
        self
    }

    /// `--name` 또는 `-x`로 입력된 별칭이 이 옵션을 가리키는지.
    pub fn matches_alias(&self, alias: &str) -> bool {
        if self.name.as_deref() == Some(alias) {
            return true;
        }
        let mut chars = alias.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.short_name == Some(c),
            _ => false,
        }
    }

    /// fallback 값을 채울 때 쓰는 입력 별칭. 이름이 있으면 이름을 쓴다.
    pub fn alias(&self) -> Option<String> {
        self.name
            .clone()
            .or_else(|| self.short_name.map(|c| c.to_string()))
    }
}

impl fmt::Display for OptionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, self.short_name) {
            (Some(name), Some(short)) => write!(f, "-{short}|--{name}"),
            (Some(name), None) => write!(f, "--{name}"),
            (None, Some(short)) => write!(f, "-{short}"),
            (None, None) => f.write_str("<unnamed>"),
        }
    }
}

/// 외부 소스가 제공하는 명령 후보.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// 비어 있으면 기본(default) 명령으로 취급한다.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterSchema>,
    #[serde(default)]
    pub options: Vec<OptionSchema>,
    #[serde(default)]
    pub supported_modes: Vec<String>,
    #[serde(default)]
    pub excluded_modes: Vec<String>,
    /// 외부 invoker가 실행할 argv (선택)
    #[serde(default)]
    pub exec: Option<Vec<String>>,
}

impl CommandDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn default_command() -> Self {
        Self::default()
    }

    pub fn is_default(&self) -> bool {
        self.name.as_deref().map(str::trim).is_none_or(str::is_empty)
    }
}

/// 검증된 명령 스키마.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSchema {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<ParameterSchema>,
    pub options: Vec<OptionSchema>,
    pub supported_modes: BTreeSet<ModeRef>,
    pub excluded_modes: BTreeSet<ModeRef>,
    pub is_default: bool,
    pub exec: Option<Vec<String>>,
}

impl CommandSchema {
    /// 표시용 이름. 기본 명령은 `<default>`로 표기한다.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<default>")
    }
}

/// 지시어 동작 종류. 등록 시점에 한 번 결정된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    /// `[!]` interactive 모드 진입
    Interactive,
    /// `[>]` 현재 명령으로 scope 설정
    ScopeSet,
    /// `[.]` scope 한 단계 위로
    ScopeUp,
    /// `[..]` scope 초기화
    ScopeReset,
    /// `[preview]` 실행 없이 해석 결과만 출력
    Preview,
    /// 외부 invoker로 전달되는 사용자 지시어
    #[default]
    Custom,
}

/// 외부 소스가 제공하는 지시어 후보.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub kind: DirectiveKind,
    #[serde(default)]
    pub supported_modes: Vec<String>,
    #[serde(default)]
    pub excluded_modes: Vec<String>,
}

impl DirectiveDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn builtin(name: &str, kind: DirectiveKind, description: &str, supported: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            kind,
            supported_modes: supported.iter().map(|m| m.to_string()).collect(),
            excluded_modes: Vec::new(),
        }
    }
}

/// 기본 제공 지시어 목록.
pub fn builtin_directives() -> Vec<DirectiveDescriptor> {
    vec![
        DirectiveDescriptor::builtin(
            "!",
            DirectiveKind::Interactive,
            "Starts an interactive mode.",
            &[DIRECT_MODE],
        ),
        DirectiveDescriptor::builtin(
            ">",
            DirectiveKind::ScopeSet,
            "Sets a scope to command(s).",
            &[INTERACTIVE_MODE],
        ),
        DirectiveDescriptor::builtin(
            ".",
            DirectiveKind::ScopeUp,
            "Removes one command from the scope.",
            &[INTERACTIVE_MODE],
        ),
        DirectiveDescriptor::builtin(
            "..",
            DirectiveKind::ScopeReset,
            "Resets the scope to default value.",
            &[INTERACTIVE_MODE],
        ),
        DirectiveDescriptor::builtin(
            "preview",
            DirectiveKind::Preview,
            "Prints the parsed input instead of executing the command.",
            &[],
        ),
    ]
}

/// 검증된 지시어 스키마.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectiveSchema {
    pub name: String,
    pub description: Option<String>,
    pub kind: DirectiveKind,
    pub supported_modes: BTreeSet<ModeRef>,
    pub excluded_modes: BTreeSet<ModeRef>,
}

/// 모드 게이트 판단 대상(명령 또는 지시어).
#[derive(Debug, Clone, Copy)]
pub enum SchemaTarget<'a> {
    Command(&'a CommandSchema),
    Directive(&'a DirectiveSchema),
}

impl<'a> SchemaTarget<'a> {
    pub fn supported_modes(&self) -> &'a BTreeSet<ModeRef> {
        match *self {
            SchemaTarget::Command(c) => &c.supported_modes,
            SchemaTarget::Directive(d) => &d.supported_modes,
        }
    }

    pub fn excluded_modes(&self) -> &'a BTreeSet<ModeRef> {
        match *self {
            SchemaTarget::Command(c) => &c.excluded_modes,
            SchemaTarget::Directive(d) => &d.excluded_modes,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            SchemaTarget::Command(_) => "command",
            SchemaTarget::Directive(_) => "directive",
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            SchemaTarget::Command(c) => c.display_name().to_string(),
            SchemaTarget::Directive(d) => format!("[{}]", d.name),
        }
    }
}

/// resolver가 생성하는 불변 루트 스키마.
///
/// 생성 이후에는 읽기 전용이며 `Arc`로 공유된다.
#[derive(Debug, Clone)]
pub struct RootSchema {
    directives: HashMap<String, DirectiveSchema>,
    commands: HashMap<String, CommandSchema>,
    default_command: Option<CommandSchema>,
    modes: Vec<ModeRef>,
}

impl RootSchema {
    pub(crate) fn new(
        directives: HashMap<String, DirectiveSchema>,
        commands: HashMap<String, CommandSchema>,
        default_command: Option<CommandSchema>,
        modes: Vec<ModeRef>,
    ) -> Self {
        Self {
            directives,
            commands,
            default_command,
            modes,
        }
    }

    pub fn directives(&self) -> &HashMap<String, DirectiveSchema> {
        &self.directives
    }

    pub fn commands(&self) -> &HashMap<String, CommandSchema> {
        &self.commands
    }

    pub fn default_command(&self) -> Option<&CommandSchema> {
        self.default_command.as_ref()
    }

    /// 애플리케이션에 등록된 모든 모드.
    pub fn modes(&self) -> &[ModeRef] {
        &self.modes
    }

    pub fn find_command(&self, name: &str) -> Option<&CommandSchema> {
        self.commands.get(name)
    }

    pub fn find_directive(&self, name: &str) -> Option<&DirectiveSchema> {
        self.directives.get(name)
    }

    /// 이름순 정렬된 명령 목록(표시용).
    pub fn sorted_commands(&self) -> Vec<&CommandSchema> {
        let mut commands: Vec<&CommandSchema> = self.commands.values().collect();
        commands.sort_by(|a, b| a.name.cmp(&b.name));
        commands
    }

    /// 이름순 정렬된 지시어 목록(표시용).
    pub fn sorted_directives(&self) -> Vec<&DirectiveSchema> {
        let mut directives: Vec<&DirectiveSchema> = self.directives.values().collect();
        directives.sort_by(|a, b| a.name.cmp(&b.name));
        directives
    }
}
