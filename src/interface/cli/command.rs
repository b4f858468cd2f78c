//! CLI 명령 파싱 모듈.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "modeshell")]
#[command(about = "Mode-aware command shell driven by a JSON schema manifest")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Schema manifest (JSON); overrides `defaults.schema_path`
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Start an interactive session even when a command line is given
    #[arg(short, long)]
    interactive: bool,

    /// Command line to run once in direct mode, e.g. `[preview] book add Dune`.
    /// Put `--` first when the line starts with `config` or `schema`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show effective merged config and searched paths
    Config,
    /// Show resolved commands, directives and modes
    Schema,
}

/// 세션 실행 옵션.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionOptions {
    pub schema: Option<PathBuf>,
    /// `--interactive`가 명시되었는지
    pub interactive: bool,
    pub args: Vec<String>,
}

impl SessionOptions {
    /// 세션을 열기 전에 인자 줄을 direct 모드에서 먼저 실행하는지.
    ///
    /// 인자가 없으면 보통 바로 대화형 세션을 연다. 대화형이 허용되지 않고
    /// `--interactive`도 없으면 빈 줄을 실행해 기본 명령에 맡긴다.
    pub fn runs_line_first(&self, interactive_allowed: bool) -> bool {
        !self.args.is_empty() || (!self.interactive && !interactive_allowed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    InspectConfig,
    ShowSchema(Option<PathBuf>),
    Run(SessionOptions),
}

impl Cli {
    pub fn parse_action() -> Result<CliAction, String> {
        Self::parse().into_action()
    }

    /// 테스트용: 임의 인자 목록을 해석한다.
    pub fn action_from<I, T>(args: I) -> Result<CliAction, String>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
            .map_err(|e| e.to_string())?
            .into_action()
    }

    fn into_action(self) -> Result<CliAction, String> {
        match self.command {
            Some(Commands::Config) => Ok(CliAction::InspectConfig),
            Some(Commands::Schema) => Ok(CliAction::ShowSchema(self.schema)),
            None => Ok(CliAction::Run(SessionOptions {
                interactive: self.interactive,
                schema: self.schema,
                args: self.args,
            })),
        }
    }
}
