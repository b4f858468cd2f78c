//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::application::config::Config;
use crate::domain::input::Invocation;
use crate::domain::key::KeyEvent;
use crate::domain::mode::ModeDescriptor;
use crate::domain::schema::{CommandDescriptor, DirectiveDescriptor};

/// 설정 로딩/점검을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<Config>;
    fn inspect_pretty_json(&self) -> Result<String>;
}

/// 스키마 소스가 넘겨주는 후보 정의 묶음(발견 순서 유지).
#[derive(Debug, Clone, Default)]
pub struct SchemaDefinitions {
    pub commands: Vec<CommandDescriptor>,
    pub directives: Vec<DirectiveDescriptor>,
    pub modes: Vec<ModeDescriptor>,
}

/// 명령/지시어/모드 후보를 제공하는 포트.
pub trait SchemaSource: Send + Sync {
    fn load(&self) -> Result<SchemaDefinitions>;
}

/// 라인 편집기가 사용하는 최소 터미널 기능.
///
/// 좌표는 (column, row) 순서이며 0부터 시작한다.
pub trait Terminal {
    fn write_str(&mut self, text: &str) -> Result<()>;

    fn write_char(&mut self, ch: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.write_str(ch.encode_utf8(&mut buf))
    }

    fn write_newline(&mut self) -> Result<()> {
        self.write_str("\n")
    }

    fn set_cursor_position(&mut self, column: u16, row: u16) -> Result<()>;

    fn cursor_position(&mut self) -> Result<(u16, u16)>;

    fn buffer_width(&self) -> u16;

    /// 키 하나를 블로킹으로 읽는다. 취소되었거나 입력이 끝나면 `None`.
    fn read_key(&mut self) -> Result<Option<KeyEvent>>;

    /// 블로킹 읽기를 중단시키는 세션 토큰.
    fn cancellation_token(&self) -> CancellationToken;

    /// 한 줄 입력 시작 전 호출된다(raw mode 진입 등).
    fn begin_line(&mut self) -> Result<()> {
        Ok(())
    }

    /// 한 줄 입력 종료 후 호출된다.
    fn end_line(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Tab 자동완성 후보 제공 포트.
pub trait Completer: Send + Sync {
    /// 커서 앞 텍스트에 대한 완성 후보 전체 문자열을 반환한다.
    /// `scope`는 interactive 세션의 현재 명령 접두어(없으면 빈 문자열)다.
    fn complete(&self, scope: &str, text_before_cursor: &str) -> Vec<String>;
}

/// 입력에 없는 옵션 값을 채워 주는 포트. 값은 원문 문자열 그대로다.
pub trait OptionFallbackProvider: Send + Sync {
    fn lookup(&self, variable: &str) -> Option<String>;
}

impl OptionFallbackProvider for HashMap<String, String> {
    fn lookup(&self, variable: &str) -> Option<String> {
        self.get(variable).cloned()
    }
}

/// 모드 게이트를 통과한 명령을 실제로 실행하는 외부 invoker 포트.
#[async_trait]
pub trait CommandInvoker: Send + Sync {
    async fn invoke(&self, invocation: &Invocation) -> Result<()>;
}

/// 콘솔/로그 출력 추상화 포트.
pub trait Reporter: Send + Sync {
    fn kv(&self, key: &str, value: &str);
    fn status(&self, scope: &str, message: &str);
    fn error(&self, message: &str);
    fn raw(&self, line: &str);
}
