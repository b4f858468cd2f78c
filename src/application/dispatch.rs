//! 제출된 한 줄을 스키마 조회 + 모드 게이트로 판정하는 실행 디스패처.
//!
//! 세션 상태(활성 모드, scope)를 소유하는 유일한 구성요소다.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::application::ports::OptionFallbackProvider;
use crate::domain::errors::{DispatchError, SchemaError};
use crate::domain::input::{
    ArgumentInput, Invocation, OptionInput, split_arguments, split_directives, tokenize,
};
use crate::domain::mode::ModeRef;
use crate::domain::policy::ModeGate;
use crate::domain::schema::{CommandSchema, DirectiveKind, DirectiveSchema, RootSchema, SchemaTarget};

/// 디스패처가 소유하는 가변 세션 상태.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionState {
    active_mode: ModeRef,
    /// interactive 모드에서 입력 앞에 붙는 명령 접두어
    scope: String,
}

/// `[preview]` 결과. 실행 없이 해석 내용만 담는다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewReport {
    pub directives: Vec<String>,
    pub command: String,
    pub arguments: ArgumentInput,
}

/// 한 줄 디스패치 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 외부 invoker로 넘길 실행 요청
    Execute(Invocation),
    /// interactive 모드로 전환됨. 함께 입력된 명령/지시어가 있으면
    /// interactive 모드 기준으로 판정한 결과를 담는다.
    EnterInteractive(Option<Box<DispatchOutcome>>),
    ScopeChanged { scope: String },
    Preview(PreviewReport),
}

/// 해석된 명령 + 남은 인자 토큰.
struct ResolvedCommand<'s> {
    schema: &'s CommandSchema,
    arguments: Vec<String>,
}

pub struct ExecutionDispatcher {
    schema: Arc<RootSchema>,
    state: SessionState,
    fallback: Arc<dyn OptionFallbackProvider>,
}

impl ExecutionDispatcher {
    /// fallback 값이 없는 디스패처. 옵션 fallback은 `with_fallback_provider`로 연결한다.
    pub fn new(schema: Arc<RootSchema>, startup_mode: ModeRef) -> Self {
        Self {
            schema,
            state: SessionState {
                active_mode: startup_mode,
                scope: String::new(),
            },
            fallback: Arc::new(HashMap::<String, String>::new()),
        }
    }

    pub fn with_fallback_provider(mut self, fallback: Arc<dyn OptionFallbackProvider>) -> Self {
        self.fallback = fallback;
        self
    }

    /// 설정에 적힌 시작 모드가 등록된 모드인지 확인한 뒤 생성한다.
    pub fn with_startup_mode(schema: Arc<RootSchema>, mode_name: &str) -> Result<Self, SchemaError> {
        let mode = ModeRef::new(mode_name.trim());
        if !schema.modes().contains(&mode) {
            return Err(SchemaError::InvalidModeType {
                owner: "startup configuration".to_string(),
                mode: mode_name.to_string(),
            });
        }
        Ok(Self::new(schema, mode))
    }

    pub fn schema(&self) -> &Arc<RootSchema> {
        &self.schema
    }

    pub fn active_mode(&self) -> &ModeRef {
        &self.state.active_mode
    }

    pub fn scope(&self) -> &str {
        &self.state.scope
    }

    /// interactive 모드로 직접 전환한다(CLI 플래그용).
    pub fn enter_interactive(&mut self) {
        self.state.active_mode = ModeRef::interactive();
    }

    /// 현재 scope를 반영한 프롬프트 문자열.
    pub fn prompt(&self) -> String {
        if self.state.scope.is_empty() {
            "> ".to_string()
        } else {
            format!("{}> ", self.state.scope)
        }
    }

    /// 명령 해석에 실제로 쓰이는 scope. interactive 모드에서만 적용된다.
    pub fn effective_scope(&self) -> &str {
        if self.state.active_mode == ModeRef::interactive() {
            &self.state.scope
        } else {
            ""
        }
    }

    /// 원문 한 줄을 토큰화한 뒤 디스패치한다.
    pub fn dispatch(&mut self, line: &str) -> Result<DispatchOutcome, DispatchError> {
        self.dispatch_tokens(&tokenize(line))
    }

    /// 이미 토큰화된 입력(프로세스 인자 등)을 디스패치한다.
    pub fn dispatch_tokens(&mut self, tokens: &[String]) -> Result<DispatchOutcome, DispatchError> {
        if tokens.is_empty() && self.state.scope.is_empty() && self.schema.default_command().is_none() {
            return Err(DispatchError::EmptyInput);
        }

        let schema = Arc::clone(&self.schema);
        let gate = ModeGate::new(schema.modes());
        let (directive_names, rest) = split_directives(tokens);

        let mut directives: Vec<&DirectiveSchema> = Vec::with_capacity(directive_names.len());
        for name in &directive_names {
            let directive = schema
                .find_directive(name)
                .ok_or_else(|| DispatchError::UnknownDirective(name.clone()))?;
            directives.push(directive);
        }

        let (entering, others): (Vec<&DirectiveSchema>, Vec<&DirectiveSchema>) = directives
            .into_iter()
            .partition(|d| d.kind == DirectiveKind::Interactive);
        if entering.is_empty() {
            return self.dispatch_with(&schema, gate, &directive_names, &others, rest);
        }

        for directive in &entering {
            gate.check(SchemaTarget::Directive(directive), &self.state.active_mode)?;
        }
        let previous = std::mem::replace(&mut self.state.active_mode, ModeRef::interactive());
        debug!(from = %previous, "entering interactive mode");

        if rest.is_empty() && others.is_empty() {
            return Ok(DispatchOutcome::EnterInteractive(None));
        }

        // 나머지 지시어와 명령은 interactive 모드 기준으로 판정한다.
        match self.dispatch_with(&schema, gate, &directive_names, &others, rest) {
            Ok(outcome) => Ok(DispatchOutcome::EnterInteractive(Some(Box::new(outcome)))),
            Err(err) => {
                // 실패한 줄은 세션 상태를 바꾸지 않는다.
                self.state.active_mode = previous;
                Err(err)
            }
        }
    }

    /// `[!]`를 제외한 지시어와 명령을 현재 모드에서 판정한다.
    fn dispatch_with(
        &mut self,
        schema: &RootSchema,
        gate: ModeGate<'_>,
        directive_names: &[String],
        directives: &[&DirectiveSchema],
        rest: &[String],
    ) -> Result<DispatchOutcome, DispatchError> {
        for directive in directives {
            gate.check(SchemaTarget::Directive(directive), &self.state.active_mode)?;
        }

        // command 없이 동작하는 scope 지시어는 명령 해석 전에 처리한다.
        for directive in directives {
            match directive.kind {
                DirectiveKind::ScopeReset => {
                    self.state.scope.clear();
                    debug!("scope reset");
                    return Ok(self.scope_changed());
                }
                DirectiveKind::ScopeUp => {
                    self.state.scope = scope_up(&self.state.scope);
                    debug!(scope = %self.state.scope, "scope moved up");
                    return Ok(self.scope_changed());
                }
                _ => {}
            }
        }

        let resolved = self.resolve_command(schema, rest)?;
        gate.check(SchemaTarget::Command(resolved.schema), &self.state.active_mode)?;

        if directives.iter().any(|d| d.kind == DirectiveKind::ScopeSet) {
            self.state.scope = resolved.schema.name.clone().unwrap_or_default();
            debug!(scope = %self.state.scope, "scope set");
            return Ok(self.scope_changed());
        }

        let arguments = self.bind_arguments(resolved.schema, &resolved.arguments)?;

        if directives.iter().any(|d| d.kind == DirectiveKind::Preview) {
            return Ok(DispatchOutcome::Preview(PreviewReport {
                directives: directive_names.to_vec(),
                command: resolved.schema.display_name().to_string(),
                arguments,
            }));
        }

        Ok(DispatchOutcome::Execute(Invocation {
            command: resolved.schema.clone(),
            directives: directives
                .iter()
                .filter(|d| d.kind == DirectiveKind::Custom)
                .map(|d| (*d).clone())
                .collect(),
            arguments,
            mode: self.state.active_mode.clone(),
        }))
    }

    /// 가장 긴 토큰 접두어와 일치하는 명령을 찾는다. 없으면 기본 명령.
    fn resolve_command<'s>(
        &self,
        schema: &'s RootSchema,
        rest: &[String],
    ) -> Result<ResolvedCommand<'s>, DispatchError> {
        let mut tokens: Vec<String> = self
            .effective_scope()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        tokens.extend(rest.iter().cloned());

        for len in (1..=tokens.len()).rev() {
            let name = tokens[..len].join(" ");
            if let Some(command) = schema.find_command(&name) {
                return Ok(ResolvedCommand {
                    schema: command,
                    arguments: tokens[len..].to_vec(),
                });
            }
        }

        match schema.default_command() {
            Some(command) => Ok(ResolvedCommand {
                schema: command,
                arguments: tokens,
            }),
            None if tokens.is_empty() => Err(DispatchError::EmptyInput),
            None => Err(DispatchError::UnknownCommand(tokens[0].clone())),
        }
    }

    /// 인자를 나누고, 입력에 없는 옵션은 fallback 변수로 채운 뒤 필수 옵션을 확인한다.
    fn bind_arguments(
        &self,
        command: &CommandSchema,
        tokens: &[String],
    ) -> Result<ArgumentInput, DispatchError> {
        let mut arguments = split_arguments(tokens);

        for option in &command.options {
            if arguments.options.iter().any(|o| option.matches_alias(&o.alias)) {
                continue;
            }

            let fallback = option
                .fallback_variable
                .as_deref()
                .and_then(|variable| self.fallback.lookup(variable));
            match (fallback, option.alias()) {
                (Some(value), Some(alias)) => {
                    debug!(option = %option, "option filled from fallback");
                    arguments.options.push(OptionInput {
                        alias,
                        values: vec![value],
                    });
                }
                _ if option.required => {
                    return Err(DispatchError::MissingRequiredOption {
                        command: command.display_name().to_string(),
                        option: option.to_string(),
                    });
                }
                _ => {}
            }
        }

        Ok(arguments)
    }

    fn scope_changed(&self) -> DispatchOutcome {
        DispatchOutcome::ScopeChanged {
            scope: self.state.scope.clone(),
        }
    }
}

fn scope_up(scope: &str) -> String {
    let mut words: Vec<&str> = scope.split_whitespace().collect();
    words.pop();
    words.join(" ")
}
