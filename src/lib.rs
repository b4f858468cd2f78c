//! modeshell library root.
//! Clean Architecture + DDD 계층을 외부에 노출한다.

use anyhow::{Result, bail};

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

use application::usecases::run_line::LineStatus;
use interface::cli::listing::render_schema_listing;
use interface::cli::{AppComposition, SessionOptions, run_repl};

/// 세션을 실행하고 프로세스 종료 코드를 돌려준다.
///
/// 인자로 받은 줄은 direct 모드에서 한 번 실행한다. `[!]`로 interactive에
/// 들어갔거나 `--interactive`이면 이어서 대화형 세션을 연다. 인자가 없으면
/// 대화형 세션을 열고, 대화형이 허용되지 않으면 빈 줄을 direct 모드로 실행한다.
pub async fn run(options: SessionOptions) -> Result<i32> {
    let composition = AppComposition::default();
    let config = composition.load_config()?;
    let schema = composition.resolve_schema(&config, options.schema.as_deref())?;
    let mut dispatcher = composition.dispatcher(schema, &config)?;

    let mut interactive = options.interactive;
    if !options.runs_line_first(config.interactive_allowed()) {
        interactive = true;
    } else {
        let status = composition
            .run_line_usecase()
            .execute_tokens(&mut dispatcher, &options.args)
            .await?;
        match status {
            LineStatus::Rejected(_) => return Ok(1),
            LineStatus::EnteredInteractive => interactive = true,
            LineStatus::Completed => {}
        }
    }

    if !interactive {
        return Ok(0);
    }
    if !config.interactive_allowed() {
        bail!("interactive sessions are disabled by defaults.interactive_allowed");
    }

    dispatcher.enter_interactive();
    run_repl(&composition, &config, &mut dispatcher).await?;
    Ok(0)
}

/// 설정 점검 JSON 출력용 함수.
pub fn inspect_config_pretty_json() -> Result<String> {
    let composition = AppComposition::default();
    composition.inspect_config_json()
}

/// 해석된 스키마 목록 출력용 함수.
pub fn schema_listing(schema: Option<&std::path::Path>) -> Result<Vec<String>> {
    let composition = AppComposition::default();
    let config = composition.load_config()?;
    let root = composition.resolve_schema(&config, schema)?;
    Ok(render_schema_listing(&root))
}
