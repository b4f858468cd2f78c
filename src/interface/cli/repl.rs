//! `modeshell` 대화형 세션(REPL) 인터페이스.

use std::env;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::completion::SchemaCompleter;
use crate::application::config::Config;
use crate::application::dispatch::ExecutionDispatcher;
use crate::application::ports::Terminal;
use crate::application::usecases::run_line::RunLineUseCase;
use crate::infrastructure::terminal::CrosstermTerminal;
use crate::interface::cli::composition::AppComposition;
use crate::interface::cli::listing::{render_banner, render_schema_listing};
use crate::interface::line_input::{KeyDispatcher, LineEditor};

/// 스키마에 같은 이름의 명령이 없을 때만 세션 내장어로 동작한다.
const EXIT_WORDS: [&str; 2] = ["exit", "quit"];
const HELP_WORD: &str = "help";

enum Flow {
    Continue,
    Exit,
}

/// 대화형 세션을 실행한다.
/// - TTY + 지원 터미널: 라인 편집기(단축키/기록/자동완성)
/// - non-TTY/미지원 터미널: 일반 라인 입력
pub async fn run_repl(
    composition: &AppComposition,
    config: &Config,
    dispatcher: &mut ExecutionDispatcher,
) -> Result<()> {
    let use_case = composition.run_line_usecase();
    if !supports_interactive_input() {
        return run_plain(dispatcher, &use_case).await;
    }

    for line in render_banner(&config.title(), dispatcher.schema()) {
        println!("{line}");
    }

    let table = composition.shortcut_table(config)?;
    let completer = Arc::new(SchemaCompleter::new(dispatcher.schema().clone()));
    let mut editor = LineEditor::new(
        CrosstermTerminal::new(CancellationToken::new()),
        KeyDispatcher::new(table),
    )
    .with_history_limit(config.history_limit())
    .with_completer(completer);

    run_session(&mut editor, dispatcher, &use_case).await
}

/// 프롬프트 출력, 한 줄 읽기, 디스패치를 읽기가 취소될 때까지 반복한다.
pub async fn run_session<T: Terminal>(
    editor: &mut LineEditor<T>,
    dispatcher: &mut ExecutionDispatcher,
    use_case: &RunLineUseCase<'_>,
) -> Result<()> {
    loop {
        editor.terminal_mut().write_str(&dispatcher.prompt())?;
        editor.set_completion_scope(dispatcher.effective_scope());
        let Some(line) = editor.read_line()? else {
            editor.terminal_mut().write_newline()?;
            debug!("session input closed");
            break;
        };

        if let Flow::Exit = handle_line(line.trim(), dispatcher, use_case).await {
            break;
        }
    }
    Ok(())
}

async fn run_plain(dispatcher: &mut ExecutionDispatcher, use_case: &RunLineUseCase<'_>) -> Result<()> {
    loop {
        print!("{}", dispatcher.prompt());
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        if let Flow::Exit = handle_line(line.trim(), dispatcher, use_case).await {
            break;
        }
    }
    Ok(())
}

/// 거부된 줄과 실행 실패는 출력만 하고 세션을 이어간다.
async fn handle_line(
    line: &str,
    dispatcher: &mut ExecutionDispatcher,
    use_case: &RunLineUseCase<'_>,
) -> Flow {
    if line.is_empty() {
        return Flow::Continue;
    }

    let reserved = dispatcher.schema().find_command(line).is_none();
    if reserved && EXIT_WORDS.contains(&line) {
        return Flow::Exit;
    }
    if reserved && line == HELP_WORD {
        for row in render_schema_listing(dispatcher.schema()) {
            use_case.reporter.raw(&row);
        }
        return Flow::Continue;
    }

    if let Err(err) = use_case.execute(dispatcher, line).await {
        use_case.reporter.error(&format!("{err:#}"));
    }
    Flow::Continue
}

fn supports_interactive_input() -> bool {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return false;
    }

    // dumb 터미널에서는 제어 시퀀스 기반 편집을 비활성화한다.
    if let Ok(term) = env::var("TERM") && term.eq_ignore_ascii_case("dumb") {
        return false;
    }

    true
}
