//! Application layer
//! 유스케이스를 정의하고 포트(추상 인터페이스)를 통해 인프라를 사용한다.

pub mod completion;
pub mod config;
pub mod dispatch;
pub mod ports;
pub mod schema_resolver;
pub mod usecases;
