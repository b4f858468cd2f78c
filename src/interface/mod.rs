//! Interface layer
//! CLI 진입점과 터미널 라인 편집 엔진.

pub mod cli;
pub mod line_input;
