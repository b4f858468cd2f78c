//! 제출된 한 줄을 디스패치하고 결과를 invoker/reporter로 넘기는 유스케이스.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::application::dispatch::{DispatchOutcome, ExecutionDispatcher};
use crate::application::ports::{CommandInvoker, Reporter};
use crate::domain::errors::DispatchError;
use crate::domain::input::Invocation;

/// 한 줄 처리 결과. 거부된 줄은 세션을 끝내지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineStatus {
    Completed,
    EnteredInteractive,
    Rejected(DispatchError),
}

pub struct RunLineUseCase<'a> {
    pub invoker: &'a dyn CommandInvoker,
    pub reporter: &'a dyn Reporter,
}

impl<'a> RunLineUseCase<'a> {
    /// 원문 한 줄(REPL 입력)을 처리한다.
    pub async fn execute(&self, dispatcher: &mut ExecutionDispatcher, line: &str) -> Result<LineStatus> {
        let outcome = dispatcher.dispatch(line);
        self.handle(outcome).await
    }

    /// 토큰화된 입력(프로세스 인자)을 처리한다.
    pub async fn execute_tokens(
        &self,
        dispatcher: &mut ExecutionDispatcher,
        tokens: &[String],
    ) -> Result<LineStatus> {
        let outcome = dispatcher.dispatch_tokens(tokens);
        self.handle(outcome).await
    }

    async fn handle(&self, outcome: Result<DispatchOutcome, DispatchError>) -> Result<LineStatus> {
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "line rejected");
                self.reporter.error(&err.to_string());
                return Ok(LineStatus::Rejected(err));
            }
        };

        match outcome {
            DispatchOutcome::EnterInteractive(first) => {
                self.reporter.status("Mode", "interactive");
                if let Some(first) = first {
                    self.apply(*first).await?;
                }
                Ok(LineStatus::EnteredInteractive)
            }
            outcome => {
                self.apply(outcome).await?;
                Ok(LineStatus::Completed)
            }
        }
    }

    /// 실행/scope/preview 결과를 반영한다. 모드 전환은 `handle`이 처리한다.
    async fn apply(&self, outcome: DispatchOutcome) -> Result<()> {
        match outcome {
            DispatchOutcome::Execute(invocation) => self.invoke(&invocation).await,
            DispatchOutcome::ScopeChanged { scope } => {
                let shown = if scope.is_empty() { "<global>" } else { scope.as_str() };
                self.reporter.status("Scope", shown);
                Ok(())
            }
            DispatchOutcome::Preview(report) => {
                let json = serde_json::to_string_pretty(&report)
                    .context("failed to render preview")?;
                self.reporter.raw(&json);
                Ok(())
            }
            DispatchOutcome::EnterInteractive(_) => {
                debug!("nested interactive entry ignored");
                Ok(())
            }
        }
    }

    async fn invoke(&self, invocation: &Invocation) -> Result<()> {
        debug!(
            command = invocation.command.display_name(),
            mode = %invocation.mode,
            "invoking command"
        );
        self.invoker
            .invoke(invocation)
            .await
            .with_context(|| format!("command '{}' failed", invocation.command.display_name()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::application::schema_resolver::SchemaResolver;
    use crate::domain::mode::{ModeDescriptor, ModeRef};
    use crate::domain::schema::{CommandDescriptor, builtin_directives};

    #[derive(Default)]
    struct RecordingInvoker {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CommandInvoker for RecordingInvoker {
        async fn invoke(&self, invocation: &Invocation) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(invocation.command.display_name().to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        lines: Mutex<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn kv(&self, key: &str, value: &str) {
            self.lines.lock().unwrap().push(format!("{key}={value}"));
        }
        fn status(&self, scope: &str, message: &str) {
            self.lines.lock().unwrap().push(format!("[{scope}] {message}"));
        }
        fn error(&self, message: &str) {
            self.lines.lock().unwrap().push(format!("error: {message}"));
        }
        fn raw(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }

    fn dispatcher() -> ExecutionDispatcher {
        let root = SchemaResolver::new(
            vec![
                CommandDescriptor::named("book add"),
                CommandDescriptor {
                    supported_modes: vec!["interactive".to_string()],
                    ..CommandDescriptor::named("book edit")
                },
            ],
            builtin_directives(),
            ModeDescriptor::builtin(),
        )
        .resolve()
        .unwrap();
        ExecutionDispatcher::new(Arc::new(root), ModeRef::direct())
    }

    #[tokio::test]
    async fn executes_and_rejects_lines() {
        let invoker = RecordingInvoker::default();
        let reporter = RecordingReporter::default();
        let use_case = RunLineUseCase {
            invoker: &invoker,
            reporter: &reporter,
        };
        let mut dispatcher = dispatcher();

        let status = use_case.execute(&mut dispatcher, "book add x").await.unwrap();
        assert_eq!(status, LineStatus::Completed);

        let status = use_case.execute(&mut dispatcher, "book edit").await.unwrap();
        assert!(matches!(status, LineStatus::Rejected(DispatchError::ModeRestriction { .. })));

        let status = use_case.execute(&mut dispatcher, "[!] book edit").await.unwrap();
        assert_eq!(status, LineStatus::EnteredInteractive);

        assert_eq!(*invoker.calls.lock().unwrap(), vec!["book add", "book edit"]);
        let lines = reporter.lines.lock().unwrap();
        assert!(lines.iter().any(|l| l.starts_with("error: command 'book edit'")));
        assert!(lines.iter().any(|l| l == "[Mode] interactive"));
    }

    #[tokio::test]
    async fn preview_after_interactive_entry_does_not_invoke() {
        let invoker = RecordingInvoker::default();
        let reporter = RecordingReporter::default();
        let use_case = RunLineUseCase {
            invoker: &invoker,
            reporter: &reporter,
        };
        let mut dispatcher = dispatcher();

        let status = use_case
            .execute(&mut dispatcher, "[!] [preview] book add x")
            .await
            .unwrap();
        assert_eq!(status, LineStatus::EnteredInteractive);
        assert_eq!(dispatcher.active_mode(), &ModeRef::interactive());

        assert!(invoker.calls.lock().unwrap().is_empty());
        let lines = reporter.lines.lock().unwrap();
        assert_eq!(lines[0], "[Mode] interactive");
        assert!(lines[1].contains("\"command\": \"book add\""));
    }
}
