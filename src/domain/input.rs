//! 제출된 한 줄을 지시어/명령 토큰/인자로 나누는 입력 모델.
//!
//! 값 변환(문자열 → 타입)은 하지 않는다. 원문 그대로 외부 invoker로 넘긴다.

use serde::Serialize;

use crate::domain::mode::ModeRef;
use crate::domain::schema::{CommandSchema, DirectiveSchema};

/// 옵션 토큰과 그 뒤에 따라오는 원문 값들.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionInput {
    /// `--name`의 name 또는 `-x`의 x
    pub alias: String,
    pub values: Vec<String>,
}

/// 명령 이름 뒤 인자 분해 결과.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArgumentInput {
    pub parameters: Vec<String>,
    pub options: Vec<OptionInput>,
}

/// 모드 게이트를 통과해 외부 invoker로 넘겨지는 실행 요청.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub command: CommandSchema,
    /// 함께 입력된 사용자 정의 지시어
    pub directives: Vec<DirectiveSchema>,
    pub arguments: ArgumentInput,
    pub mode: ModeRef,
}

/// 공백 기준으로 토큰화한다. 큰따옴표로 묶인 구간은 하나의 토큰이다.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if has_token {
        tokens.push(current);
    }
    tokens
}

/// `[name]` 형태면 지시어 이름을 반환한다.
pub fn directive_name(token: &str) -> Option<&str> {
    let inner = token.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() || inner.contains(char::is_whitespace) {
        return None;
    }
    Some(inner)
}

/// 앞쪽 지시어 토큰과 나머지를 분리한다.
pub fn split_directives(tokens: &[String]) -> (Vec<String>, &[String]) {
    let mut directives = Vec::new();
    let mut idx = 0;
    while let Some(name) = tokens.get(idx).and_then(|t| directive_name(t)) {
        directives.push(name.to_string());
        idx += 1;
    }
    (directives, &tokens[idx..])
}

pub fn is_option_name(token: &str) -> bool {
    token
        .strip_prefix("--")
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_alphabetic)
}

pub fn is_option_alias(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some('-') && chars.next().is_some_and(char::is_alphabetic)
}

/// 인자 토큰을 위치 인자와 옵션으로 분해한다.
/// 첫 옵션 이전 토큰은 위치 인자, 이후 토큰은 직전 옵션의 값이다.
pub fn split_arguments(tokens: &[String]) -> ArgumentInput {
    let mut input = ArgumentInput::default();

    for token in tokens {
        if is_option_name(token) {
            input.options.push(OptionInput {
                alias: token[2..].to_string(),
                values: Vec::new(),
            });
        } else if is_option_alias(token) {
            // -abc는 -a -b -c로 펼친다.
            for alias in token[1..].chars() {
                input.options.push(OptionInput {
                    alias: alias.to_string(),
                    values: Vec::new(),
                });
            }
        } else if let Some(last) = input.options.last_mut() {
            last.values.push(token.clone());
        } else {
            input.parameters.push(token.clone());
        }
    }

    input
}
