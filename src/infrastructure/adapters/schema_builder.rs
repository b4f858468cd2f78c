//! 명시적 등록 방식의 스키마 소스.

use anyhow::Result;

use crate::application::ports::{SchemaDefinitions, SchemaSource};
use crate::domain::mode::ModeDescriptor;
use crate::domain::schema::{CommandDescriptor, DirectiveDescriptor};

/// 등록 순서가 곧 발견 순서다.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    definitions: SchemaDefinitions,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(mut self, command: CommandDescriptor) -> Self {
        self.definitions.commands.push(command);
        self
    }

    pub fn directive(mut self, directive: DirectiveDescriptor) -> Self {
        self.definitions.directives.push(directive);
        self
    }

    pub fn mode(mut self, mode: ModeDescriptor) -> Self {
        self.definitions.modes.push(mode);
        self
    }

    pub fn build(self) -> SchemaDefinitions {
        self.definitions
    }
}

impl SchemaSource for SchemaBuilder {
    fn load(&self) -> Result<SchemaDefinitions> {
        Ok(self.definitions.clone())
    }
}
