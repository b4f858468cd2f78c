//! 애플리케이션 조립(composition root) 모듈.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::application::config::Config;
use crate::application::dispatch::ExecutionDispatcher;
use crate::application::ports::{ConfigRepository, Reporter, SchemaSource};
use crate::application::usecases::resolve_schema::ResolveSchemaUseCase;
use crate::application::usecases::run_line::RunLineUseCase;
use crate::domain::schema::RootSchema;
use crate::infrastructure::adapters::{
    ConsoleReporter, EnvironmentFallbackProvider, JsonConfigRepository, ManifestSchemaSource,
    ProcessInvoker, SchemaBuilder,
};
use crate::interface::line_input::ShortcutTable;

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_repo: JsonConfigRepository,
    reporter: Arc<ConsoleReporter>,
    invoker: ProcessInvoker,
}

impl Default for AppComposition {
    fn default() -> Self {
        let reporter = Arc::new(ConsoleReporter::new());
        Self {
            config_repo: JsonConfigRepository,
            invoker: ProcessInvoker::new(reporter.clone()),
            reporter,
        }
    }
}

impl AppComposition {
    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    pub fn load_config(&self) -> Result<Config> {
        self.config_repo.load()
    }

    /// 병합된 설정과 탐색 경로를 JSON으로 돌려준다.
    pub fn inspect_config_json(&self) -> Result<String> {
        self.config_repo.inspect_pretty_json()
    }

    /// 한 줄 실행 유스케이스를 생성한다.
    pub fn run_line_usecase(&self) -> RunLineUseCase<'_> {
        RunLineUseCase {
            invoker: &self.invoker,
            reporter: self.reporter.as_ref(),
        }
    }

    /// CLI 인자 > 설정 파일 순으로 manifest 경로를 고른다.
    pub fn schema_path(config: &Config, schema_override: Option<&Path>) -> Option<PathBuf> {
        schema_override
            .map(Path::to_path_buf)
            .or_else(|| config.defaults.schema_path.as_ref().map(PathBuf::from))
    }

    /// 스키마를 한 번 해석해 불변 루트 스키마로 고정한다.
    pub fn resolve_schema(
        &self,
        config: &Config,
        schema_override: Option<&Path>,
    ) -> Result<Arc<RootSchema>> {
        let path = Self::schema_path(config, schema_override);
        let source: Box<dyn SchemaSource> = match &path {
            Some(path) => Box::new(ManifestSchemaSource::new(path)),
            None => Box::new(SchemaBuilder::new()),
        };

        let use_case = ResolveSchemaUseCase {
            schema_source: source.as_ref(),
        };
        let root = use_case
            .execute(config.interactive_allowed())
            .with_context(|| match &path {
                Some(path) => format!("invalid schema in {}", path.display()),
                None => "no schema manifest configured (use --schema or defaults.schema_path)"
                    .to_string(),
            })?;
        info!(
            commands = root.commands().len(),
            directives = root.directives().len(),
            "schema ready"
        );
        Ok(Arc::new(root))
    }

    /// 내장 단축키 위에 사용자 단축키를 올린 세션 테이블.
    pub fn shortcut_table(&self, config: &Config) -> Result<ShortcutTable> {
        let user = config
            .user_shortcuts()
            .context("invalid shortcut in config")?;
        Ok(ShortcutTable::register(&[], &user)?)
    }

    pub fn dispatcher(&self, schema: Arc<RootSchema>, config: &Config) -> Result<ExecutionDispatcher> {
        let dispatcher = ExecutionDispatcher::with_startup_mode(schema, &config.startup_mode())
            .context("invalid defaults.startup_mode")?;
        Ok(dispatcher.with_fallback_provider(Arc::new(EnvironmentFallbackProvider)))
    }
}
