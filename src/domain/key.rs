//! 키 입력/단축키/편집 동작 값 객체.
//!
//! 터미널 라이브러리와 무관한 도메인 표현이다. crossterm 변환은 인프라 계층에서 수행한다.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::BitOr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 키 코드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Insert,
    Escape,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    F(u8),
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(' ') => f.write_str("Spacebar"),
            KeyCode::Char(c) => write!(f, "{}", c.to_uppercase()),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Backspace => f.write_str("Backspace"),
            KeyCode::Delete => f.write_str("Delete"),
            KeyCode::Insert => f.write_str("Insert"),
            KeyCode::Escape => f.write_str("Escape"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::Left => f.write_str("LeftArrow"),
            KeyCode::Right => f.write_str("RightArrow"),
            KeyCode::Up => f.write_str("UpArrow"),
            KeyCode::Down => f.write_str("DownArrow"),
            KeyCode::Home => f.write_str("Home"),
            KeyCode::End => f.write_str("End"),
            KeyCode::F(n) => write!(f, "F{n}"),
        }
    }
}

impl FromStr for KeyCode {
    type Err = String;

    /// 설정 파일 표기(`LeftArrow`, `left`, `a`, `F5` 등)를 해석한다.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(KeyCode::Char(c.to_ascii_lowercase()));
        }

        let lower = trimmed.to_ascii_lowercase();
        let code = match lower.as_str() {
            "enter" | "return" => KeyCode::Enter,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "insert" | "ins" => KeyCode::Insert,
            "escape" | "esc" => KeyCode::Escape,
            "tab" => KeyCode::Tab,
            "space" | "spacebar" => KeyCode::Char(' '),
            "left" | "leftarrow" => KeyCode::Left,
            "right" | "rightarrow" => KeyCode::Right,
            "up" | "uparrow" => KeyCode::Up,
            "down" | "downarrow" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            _ => {
                let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) else {
                    return Err(format!("unknown key: {raw}"));
                };
                KeyCode::F(n)
            }
        };
        Ok(code)
    }
}

/// 수식 키 집합.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers(u8);

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers(0);
    pub const SHIFT: KeyModifiers = KeyModifiers(0b001);
    pub const CONTROL: KeyModifiers = KeyModifiers(0b010);
    pub const ALT: KeyModifiers = KeyModifiers(0b100);

    pub fn contains(self, other: KeyModifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 설정 파일 표기(`ctrl`, `control`, `alt`, `shift`)를 해석한다.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        let mut modifiers = KeyModifiers::NONE;
        for name in names {
            modifiers = modifiers
                | match name.as_ref().trim().to_ascii_lowercase().as_str() {
                    "ctrl" | "control" => KeyModifiers::CONTROL,
                    "alt" | "meta" => KeyModifiers::ALT,
                    "shift" => KeyModifiers::SHIFT,
                    other => return Err(format!("unknown modifier: {other}")),
                };
        }
        Ok(modifiers)
    }
}

impl BitOr for KeyModifiers {
    type Output = KeyModifiers;

    fn bitor(self, rhs: KeyModifiers) -> KeyModifiers {
        KeyModifiers(self.0 | rhs.0)
    }
}

impl fmt::Display for KeyModifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(KeyModifiers::CONTROL) {
            f.write_str("Ctrl+")?;
        }
        if self.contains(KeyModifiers::ALT) {
            f.write_str("Alt+")?;
        }
        if self.contains(KeyModifiers::SHIFT) {
            f.write_str("Shift+")?;
        }
        Ok(())
    }
}

/// 한 번의 키 입력.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub fn enter() -> Self {
        Self::plain(KeyCode::Enter)
    }

    /// 문자열을 문자 키 시퀀스로 변환한다. 스크립트 입력/테스트용.
    pub fn from_text(text: &str) -> Vec<KeyEvent> {
        text.chars().map(KeyEvent::char).collect()
    }
}

/// 라인 편집 동작. 단축키에 바인딩된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    MoveLeft,
    MoveRight,
    Home,
    End,
    Backspace,
    Delete,
    NoOp,
    ClearLine,
    WordLeft,
    WordRight,
    BackspaceWord,
    DeleteWord,
    HistoryPrevious,
    HistoryNext,
    Complete,
}

/// (키, 수식키) → 동작 매핑.
///
/// 동등성/해시는 (키, 수식키)만 본다. 동작이 달라도 같은 조합이면 같은 단축키다.
#[derive(Debug, Clone, Copy)]
pub struct ShortcutDefinition {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: EditAction,
}

impl ShortcutDefinition {
    pub fn new(key: KeyCode, action: EditAction) -> Self {
        Self::with_modifiers(key, KeyModifiers::NONE, action)
    }

    pub fn with_modifiers(key: KeyCode, modifiers: KeyModifiers, action: EditAction) -> Self {
        Self {
            key,
            modifiers,
            action,
        }
    }

    /// `Ctrl+LeftArrow` 형태의 조합 표기.
    pub fn combination(&self) -> String {
        format!("{}{}", self.modifiers, self.key)
    }
}

impl PartialEq for ShortcutDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.modifiers == other.modifiers
    }
}

impl Eq for ShortcutDefinition {}

impl Hash for ShortcutDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.modifiers.hash(state);
    }
}
