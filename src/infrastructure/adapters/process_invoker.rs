//! manifest의 `exec` argv를 자식 프로세스로 실행하는 invoker.

use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::program_locator::locate_in_env;
use crate::application::ports::{CommandInvoker, Reporter};
use crate::domain::input::Invocation;

/// `exec`가 없는 명령은 해석 결과만 reporter로 출력한다.
pub struct ProcessInvoker {
    reporter: Arc<dyn Reporter>,
}

impl ProcessInvoker {
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self { reporter }
    }

    fn report_unbound(&self, invocation: &Invocation) {
        self.reporter
            .status("Run", invocation.command.display_name());
        for (idx, value) in invocation.arguments.parameters.iter().enumerate() {
            let name = invocation
                .command
                .parameters
                .get(idx)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("#{idx}"));
            self.reporter.kv(&name, value);
        }
        for option in &invocation.arguments.options {
            self.reporter
                .kv(&render_option(&option.alias), &option.values.join(" "));
        }
    }
}

#[async_trait]
impl CommandInvoker for ProcessInvoker {
    async fn invoke(&self, invocation: &Invocation) -> Result<()> {
        let Some(exec) = invocation.command.exec.as_deref().filter(|e| !e.is_empty()) else {
            self.report_unbound(invocation);
            return Ok(());
        };

        let argv = build_argv(exec, invocation);
        let (program, args) = argv.split_first().context("exec is empty")?;
        let Some(resolved) = locate_in_env(program) else {
            bail!("program not found in PATH: '{program}'");
        };

        let directives = invocation
            .directives
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        debug!(program = %resolved.display(), args = ?args, "spawning command");

        let status = Command::new(&resolved)
            .args(args)
            .env("MODESHELL_MODE", invocation.mode.as_str())
            .env("MODESHELL_COMMAND", invocation.command.display_name())
            .env("MODESHELL_DIRECTIVES", directives)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("failed to spawn '{program}'"))?;

        if !status.success() {
            bail!("'{program}' exited with {status}");
        }
        Ok(())
    }
}

/// `{parameter}` 자리표시자를 위치 인자로 치환하고, 남은 인자와 옵션을 뒤에 붙인다.
fn build_argv(exec: &[String], invocation: &Invocation) -> Vec<String> {
    let values = &invocation.arguments.parameters;
    let mut consumed = vec![false; values.len()];

    let mut argv: Vec<String> = exec
        .iter()
        .map(|arg| {
            let mut out = arg.clone();
            for (idx, parameter) in invocation.command.parameters.iter().enumerate() {
                let placeholder = format!("{{{}}}", parameter.name);
                if let Some(value) = values.get(idx)
                    && out.contains(&placeholder)
                {
                    out = out.replace(&placeholder, value);
                    consumed[idx] = true;
                }
            }
            out
        })
        .collect();

    argv.extend(
        values
            .iter()
            .zip(&consumed)
            .filter(|(_, used)| !**used)
            .map(|(value, _)| value.clone()),
    );
    for option in &invocation.arguments.options {
        argv.push(render_option(&option.alias));
        argv.extend(option.values.iter().cloned());
    }
    argv
}

fn render_option(alias: &str) -> String {
    if alias.chars().count() == 1 {
        format!("-{alias}")
    } else {
        format!("--{alias}")
    }
}
