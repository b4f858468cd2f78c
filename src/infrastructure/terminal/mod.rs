//! `Terminal` 포트 구현체.

mod crossterm_terminal;
mod key_mapping;
mod virtual_terminal;

pub use crossterm_terminal::CrosstermTerminal;
pub use key_mapping::map_key_event;
pub use virtual_terminal::VirtualTerminal;
