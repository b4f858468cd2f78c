//! 터미널 한 줄 입력 편집 엔진.
//!
//! 키 분류(`KeyDispatcher`)와 버퍼/커서 관리(`LineEditor`)를 분리한다.

pub mod history;
pub mod key_dispatcher;
pub mod line_editor;
pub mod shortcut_table;

pub use key_dispatcher::{KeyDispatcher, KeyOutcome};
pub use line_editor::LineEditor;
pub use shortcut_table::ShortcutTable;
