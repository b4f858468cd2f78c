//! 애플리케이션 포트를 실제 인프라 구현체로 연결하는 어댑터 계층.

mod config_repository;
mod env_fallback_provider;
mod manifest_schema_source;
mod process_invoker;
mod program_locator;
mod reporter;
mod schema_builder;

pub use config_repository::JsonConfigRepository;
pub use env_fallback_provider::EnvironmentFallbackProvider;
pub use manifest_schema_source::{Manifest, ManifestSchemaSource};
pub use process_invoker::ProcessInvoker;
pub use program_locator::{locate_in_env, locate_program};
pub use reporter::ConsoleReporter;
pub use schema_builder::SchemaBuilder;
