//! JSON manifest 파일 스키마 소스.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ports::{SchemaDefinitions, SchemaSource};
use crate::domain::mode::ModeDescriptor;
use crate::domain::schema::{CommandDescriptor, DirectiveDescriptor};

/// manifest 파일 형식. 배열 순서가 발견 순서다.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Manifest {
    #[serde(default)]
    pub commands: Vec<CommandDescriptor>,
    #[serde(default)]
    pub directives: Vec<DirectiveDescriptor>,
    #[serde(default)]
    pub modes: Vec<ModeDescriptor>,
}

impl From<Manifest> for SchemaDefinitions {
    fn from(manifest: Manifest) -> Self {
        Self {
            commands: manifest.commands,
            directives: manifest.directives,
            modes: manifest.modes,
        }
    }
}

pub struct ManifestSchemaSource {
    path: PathBuf,
}

impl ManifestSchemaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SchemaSource for ManifestSchemaSource {
    fn load(&self) -> Result<SchemaDefinitions> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read schema manifest at {}", self.path.display()))?;
        let manifest: Manifest = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON in {}", self.path.display()))?;
        debug!(
            path = %self.path.display(),
            commands = manifest.commands.len(),
            directives = manifest.directives.len(),
            modes = manifest.modes.len(),
            "schema manifest loaded"
        );
        Ok(manifest.into())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::schema::DirectiveKind;

    #[test]
    fn loads_manifest_in_file_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "commands": [
                    {{"name": "book add", "exec": ["echo", "add"]}},
                    {{"description": "fallback"}}
                ],
                "directives": [{{"name": "dry-run"}}],
                "modes": [{{"name": "admin"}}]
            }}"#
        )
        .unwrap();

        let definitions = ManifestSchemaSource::new(file.path()).load().unwrap();
        assert_eq!(definitions.commands[0].name.as_deref(), Some("book add"));
        assert!(definitions.commands[1].is_default());
        assert_eq!(definitions.directives[0].kind, DirectiveKind::Custom);
        assert_eq!(definitions.modes[0].name, "admin");
    }

    #[test]
    fn reports_path_on_parse_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = ManifestSchemaSource::new(file.path()).load().unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse JSON"));
    }
}
