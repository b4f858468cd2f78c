//! 스키마 소스를 읽어 불변 루트 스키마를 구성하는 유스케이스.

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::SchemaSource;
use crate::application::schema_resolver::SchemaResolver;
use crate::domain::mode::ModeDescriptor;
use crate::domain::schema::{DirectiveKind, RootSchema, builtin_directives};

/// 기본 모드/지시어를 앞에 붙인 뒤 resolver로 검증한다.
pub struct ResolveSchemaUseCase<'a> {
    pub schema_source: &'a dyn SchemaSource,
}

impl<'a> ResolveSchemaUseCase<'a> {
    /// interactive가 허용되지 않으면 `[!]` 지시어를 등록하지 않는다.
    pub fn execute(&self, interactive_allowed: bool) -> Result<RootSchema> {
        let definitions = self
            .schema_source
            .load()
            .context("failed to load schema definitions")?;

        let mut modes = ModeDescriptor::builtin();
        for mode in definitions.modes {
            if !modes.iter().any(|m| m.name == mode.name.trim()) {
                modes.push(mode);
            }
        }

        let mut directives: Vec<_> = builtin_directives()
            .into_iter()
            .filter(|d| interactive_allowed || d.kind != DirectiveKind::Interactive)
            .collect();
        directives.extend(definitions.directives);

        debug!(
            commands = definitions.commands.len(),
            directives = directives.len(),
            modes = modes.len(),
            "resolving schema definitions"
        );

        let root = SchemaResolver::new(definitions.commands, directives, modes).resolve()?;
        Ok(root)
    }
}
