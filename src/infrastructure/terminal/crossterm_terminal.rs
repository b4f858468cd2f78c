//! crossterm 기반 실제 터미널.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::cursor;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode as CtKeyCode, KeyEventKind,
    KeyModifiers as CtKeyModifiers,
};
use crossterm::style::Print;
use crossterm::terminal;
use crossterm::{execute, queue};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::key_mapping::map_key_event;
use crate::application::ports::Terminal;
use crate::domain::key::KeyEvent;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const FALLBACK_WIDTH: u16 = 80;

/// 한 줄 입력 동안만 raw mode를 유지한다. Ctrl+C/Ctrl+D는 세션 토큰을 취소한다.
pub struct CrosstermTerminal {
    stdout: io::Stdout,
    token: CancellationToken,
    pending: VecDeque<KeyEvent>,
    guard: Option<RawModeGuard>,
}

impl CrosstermTerminal {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            stdout: io::stdout(),
            token,
            pending: VecDeque::new(),
            guard: None,
        }
    }
}

impl Terminal for CrosstermTerminal {
    fn write_str(&mut self, text: &str) -> Result<()> {
        // raw mode에서는 LF만으로 0열로 돌아가지 않는다.
        let rendered = if self.guard.is_some() {
            text.replace('\n', "\r\n")
        } else {
            text.to_string()
        };
        queue!(self.stdout, Print(rendered))?;
        self.stdout.flush()?;
        Ok(())
    }

    fn set_cursor_position(&mut self, column: u16, row: u16) -> Result<()> {
        execute!(self.stdout, cursor::MoveTo(column, row))?;
        Ok(())
    }

    fn cursor_position(&mut self) -> Result<(u16, u16)> {
        self.stdout.flush()?;
        cursor::position().context("failed to query cursor position")
    }

    fn buffer_width(&self) -> u16 {
        terminal::size().map(|(w, _)| w).unwrap_or(FALLBACK_WIDTH)
    }

    fn read_key(&mut self) -> Result<Option<KeyEvent>> {
        loop {
            if self.token.is_cancelled() {
                return Ok(None);
            }
            if let Some(key) = self.pending.pop_front() {
                return Ok(Some(key));
            }
            if !event::poll(POLL_INTERVAL)? {
                continue;
            }

            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if key.modifiers.contains(CtKeyModifiers::CONTROL)
                        && matches!(key.code, CtKeyCode::Char('c') | CtKeyCode::Char('d'))
                    {
                        debug!("session cancelled from keyboard");
                        self.token.cancel();
                        return Ok(None);
                    }
                    if let Some(mapped) = map_key_event(&key) {
                        return Ok(Some(mapped));
                    }
                }
                Event::Paste(text) => {
                    // 붙여넣은 줄바꿈은 제출로 취급하지 않는다.
                    self.pending.extend(
                        text.chars()
                            .filter(|c| !c.is_control())
                            .map(KeyEvent::char),
                    );
                }
                _ => {}
            }
        }
    }

    fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    fn begin_line(&mut self) -> Result<()> {
        if self.guard.is_none() {
            self.guard = Some(RawModeGuard::enter(&mut self.stdout)?);
        }
        Ok(())
    }

    fn end_line(&mut self) -> Result<()> {
        self.guard = None;
        Ok(())
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter(stdout: &mut io::Stdout) -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout, cursor::Show, EnableBracketedPaste)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, DisableBracketedPaste, cursor::Show);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}
