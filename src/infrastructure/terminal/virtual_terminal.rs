//! 메모리 위 문자 격자로 동작하는 터미널. 테스트와 스크립트 입력에 쓴다.

use std::collections::VecDeque;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::application::ports::Terminal;
use crate::domain::key::KeyEvent;

/// 고정 너비 격자. 행은 필요한 만큼 늘어난다.
///
/// 실제 터미널처럼 마지막 열에 쓰면 커서는 그 열에 머물고, 다음 글자를 쓸 때
/// 줄이 넘어간다. 커서 이동이나 `\r`/`\n`은 보류된 줄넘김을 취소한다.
#[derive(Debug, Clone)]
pub struct VirtualTerminal {
    width: u16,
    rows: Vec<Vec<char>>,
    column: u16,
    row: u16,
    pending_wrap: bool,
    keys: VecDeque<KeyEvent>,
    token: CancellationToken,
}

impl VirtualTerminal {
    pub fn new(width: u16) -> Self {
        Self {
            width: width.max(1),
            rows: vec![Vec::new()],
            column: 0,
            row: 0,
            pending_wrap: false,
            keys: VecDeque::new(),
            token: CancellationToken::new(),
        }
    }

    pub fn with_keys<I: IntoIterator<Item = KeyEvent>>(mut self, keys: I) -> Self {
        self.push_keys(keys);
        self
    }

    pub fn push_keys<I: IntoIterator<Item = KeyEvent>>(&mut self, keys: I) {
        self.keys.extend(keys);
    }

    pub fn cursor(&self) -> (u16, u16) {
        (self.column, self.row)
    }

    /// 행 내용(끝 공백 제외). 없는 행은 빈 문자열.
    pub fn row_text(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|cells| cells.iter().collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }

    pub fn screen(&self) -> Vec<String> {
        (0..self.rows.len()).map(|row| self.row_text(row)).collect()
    }

    fn put(&mut self, ch: char) {
        if self.pending_wrap {
            self.pending_wrap = false;
            self.column = 0;
            self.row = self.row.saturating_add(1);
        }
        let row = usize::from(self.row);
        let column = usize::from(self.column);
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= column {
            cells.resize(column + 1, ' ');
        }
        cells[column] = ch;

        if self.column + 1 >= self.width {
            self.pending_wrap = true;
        } else {
            self.column += 1;
        }
    }
}

impl Terminal for VirtualTerminal {
    fn write_str(&mut self, text: &str) -> Result<()> {
        for ch in text.chars() {
            match ch {
                '\n' => {
                    self.pending_wrap = false;
                    self.column = 0;
                    self.row = self.row.saturating_add(1);
                }
                '\r' => {
                    self.pending_wrap = false;
                    self.column = 0;
                }
                _ => self.put(ch),
            }
        }
        Ok(())
    }

    fn set_cursor_position(&mut self, column: u16, row: u16) -> Result<()> {
        self.pending_wrap = false;
        self.column = column.min(self.width - 1);
        self.row = row;
        Ok(())
    }

    fn cursor_position(&mut self) -> Result<(u16, u16)> {
        Ok(self.cursor())
    }

    fn buffer_width(&self) -> u16 {
        self.width
    }

    fn read_key(&mut self) -> Result<Option<KeyEvent>> {
        if self.token.is_cancelled() {
            return Ok(None);
        }
        Ok(self.keys.pop_front())
    }

    fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_width_and_handles_newlines() {
        let mut terminal = VirtualTerminal::new(3);
        terminal.write_str("abcd").unwrap();
        assert_eq!(terminal.cursor(), (1, 1));
        terminal.write_str("\nxy").unwrap();
        assert_eq!(terminal.screen(), vec!["abc", "d", "xy"]);
    }

    #[test]
    fn last_column_write_defers_the_wrap() {
        let mut terminal = VirtualTerminal::new(3);
        terminal.write_str("abc").unwrap();
        assert_eq!(terminal.cursor(), (2, 0));

        terminal.write_str("\rx").unwrap();
        assert_eq!(terminal.screen(), vec!["xbc"]);
        assert_eq!(terminal.cursor(), (1, 0));
    }

    #[test]
    fn cancelled_terminal_stops_reading() {
        let mut terminal = VirtualTerminal::new(10).with_keys([KeyEvent::char('a')]);
        terminal.cancellation_token().cancel();
        assert_eq!(terminal.read_key().unwrap(), None);
    }
}
