//! 커서 위치를 추적하는 한 줄 편집기.
//!
//! 버퍼의 논리 커서와 터미널에 그려진 커서를 항상 같은 위치로 유지한다.
//! 줄바꿈은 터미널 버퍼 너비 기준이며 코드포인트 하나를 한 칸으로 본다.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, trace};

use crate::application::ports::{Completer, Terminal};
use crate::domain::key::{EditAction, KeyCode, KeyEvent};
use crate::interface::line_input::history::InputHistory;
use crate::interface::line_input::key_dispatcher::{KeyDispatcher, KeyOutcome};

/// 편집 중인 줄. `cursor <= text.len()`을 항상 만족한다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LineBuffer {
    text: Vec<char>,
    cursor: usize,
}

impl LineBuffer {
    fn text(&self) -> String {
        self.text.iter().collect()
    }

    fn len(&self) -> usize {
        self.text.len()
    }

    fn is_start(&self) -> bool {
        self.cursor == 0
    }

    fn is_end(&self) -> bool {
        self.cursor == self.text.len()
    }

    fn before_cursor(&self) -> Option<char> {
        self.cursor.checked_sub(1).map(|idx| self.text[idx])
    }

    fn at_cursor(&self) -> Option<char> {
        self.text.get(self.cursor).copied()
    }

    fn tail(&self) -> String {
        self.text[self.cursor..].iter().collect()
    }

    fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

pub struct LineEditor<T: Terminal> {
    terminal: T,
    dispatcher: KeyDispatcher,
    buffer: LineBuffer,
    history: InputHistory,
    completer: Option<Arc<dyn Completer>>,
    completion_scope: String,
}

impl<T: Terminal> LineEditor<T> {
    pub fn new(terminal: T, dispatcher: KeyDispatcher) -> Self {
        Self {
            terminal,
            dispatcher,
            buffer: LineBuffer::default(),
            history: InputHistory::default(),
            completer: None,
            completion_scope: String::new(),
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = InputHistory::new(limit);
        self
    }

    pub fn with_completer(mut self, completer: Arc<dyn Completer>) -> Self {
        self.completer = Some(completer);
        self
    }

    /// 다음 Tab 완성에 쓸 명령 scope.
    pub fn set_completion_scope(&mut self, scope: &str) {
        self.completion_scope = scope.to_string();
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor
    }

    /// 터미널에서 Enter까지 읽는다. 읽기가 취소되면 `None`이며 버퍼는 그대로 둔다.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        self.terminal.begin_line()?;
        let submitted = self.read_until_submitted();
        let line = match submitted {
            Ok(true) => self.finish_line().map(Some),
            Ok(false) => Ok(None),
            Err(err) => Err(err),
        };
        self.terminal.end_line()?;
        line
    }

    /// 미리 기록된 키 시퀀스로 한 줄을 읽는다. 제출 키를 만나면 남은 키는 버린다.
    pub fn read_line_from<I>(&mut self, keys: I) -> Result<String>
    where
        I: IntoIterator<Item = KeyEvent>,
    {
        for key in keys {
            if self.handle_key(&key)? {
                break;
            }
        }
        self.finish_line()
    }

    fn read_until_submitted(&mut self) -> Result<bool> {
        let token = self.terminal.cancellation_token();
        loop {
            if token.is_cancelled() {
                debug!("line read cancelled");
                return Ok(false);
            }
            let Some(outcome) = self.dispatcher.read_key(&mut self.terminal)? else {
                return Ok(false);
            };
            if self.apply_outcome(outcome)? {
                return Ok(true);
            }
        }
    }

    /// 키 하나를 처리한다. 줄이 제출되면 `true`.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<bool> {
        let outcome = self.dispatcher.dispatch(key);
        self.apply_outcome(outcome)
    }

    fn apply_outcome(&mut self, outcome: KeyOutcome) -> Result<bool> {
        trace!(?outcome, "key");
        match outcome {
            KeyOutcome::Shortcut(action) => self.apply(action)?,
            KeyOutcome::Submitted => return Ok(true),
            KeyOutcome::ControlSequence(key) => {
                self.write_char('^')?;
                self.write_str(&key.code.to_string())?;
            }
            KeyOutcome::Unhandled(key) => {
                if let KeyCode::Char(c) = key.code {
                    self.write_char(c)?;
                }
            }
        }
        Ok(false)
    }

    fn finish_line(&mut self) -> Result<String> {
        let text = self.buffer.text().trim_end_matches(['\n', '\r']).to_string();
        self.terminal.write_newline()?;
        self.history.push(&text);
        self.buffer.clear();
        Ok(text)
    }

    /// 편집 동작 하나를 실행한다.
    pub fn apply(&mut self, action: EditAction) -> Result<()> {
        match action {
            EditAction::MoveLeft => self.move_left(1),
            EditAction::MoveRight => self.move_right(1),
            EditAction::Home => self.move_left(self.buffer.cursor),
            EditAction::End => self.move_right(self.buffer.len() - self.buffer.cursor),
            EditAction::Backspace => self.backspace(1),
            EditAction::Delete => self.delete(),
            EditAction::NoOp => Ok(()),
            EditAction::ClearLine => self.clear_line(),
            EditAction::WordLeft => self.word_backward(|editor| editor.move_left(1)),
            EditAction::WordRight => self.word_forward(|editor| editor.move_right(1)),
            EditAction::BackspaceWord => self.word_backward(|editor| editor.backspace(1)),
            EditAction::DeleteWord => self.word_forward(|editor| editor.delete()),
            EditAction::HistoryPrevious => {
                let current = self.buffer.text();
                match self.history.previous(&current).map(str::to_string) {
                    Some(entry) => self.replace_line(&entry),
                    None => Ok(()),
                }
            }
            EditAction::HistoryNext => match self.history.next().map(str::to_string) {
                Some(entry) => self.replace_line(&entry),
                None => Ok(()),
            },
            EditAction::Complete => self.complete(),
        }
    }

    pub fn write_str(&mut self, text: &str) -> Result<()> {
        for c in text.chars() {
            self.write_char(c)?;
        }
        Ok(())
    }

    /// 커서 위치에 문자를 넣는다. 줄 중간이면 나머지를 다시 그리고 커서를 되돌린다.
    pub fn write_char(&mut self, c: char) -> Result<()> {
        if self.buffer.is_end() {
            let (column, _) = self.terminal.cursor_position()?;
            self.buffer.text.push(c);
            self.terminal.write_char(c)?;
            self.buffer.cursor += 1;
            // 마지막 열에 쓴 뒤에는 터미널이 줄넘김을 미루므로 직접 다음 행으로 옮긴다.
            if usize::from(column) + 1 >= usize::from(self.terminal.buffer_width().max(1)) {
                self.terminal.write_newline()?;
            }
            return Ok(());
        }

        let (column, row) = self.terminal.cursor_position()?;
        let tail = self.buffer.tail();
        self.buffer.text.insert(self.buffer.cursor, c);
        self.terminal.write_char(c)?;
        self.terminal.write_str(&tail)?;
        self.terminal.set_cursor_position(column, row)?;
        self.move_right(1)
    }

    /// 커서 앞 문자를 `count`개까지 지운다. 줄 처음에서는 멈춘다.
    pub fn backspace(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            if self.buffer.is_start() {
                break;
            }
            self.move_left(1)?;
            self.buffer.text.remove(self.buffer.cursor);
            self.redraw_tail()?;
        }
        Ok(())
    }

    /// 커서 위치 문자를 지운다. 줄 끝에서는 아무것도 하지 않는다.
    pub fn delete(&mut self) -> Result<()> {
        if self.buffer.is_end() {
            return Ok(());
        }
        self.buffer.text.remove(self.buffer.cursor);
        self.redraw_tail()
    }

    /// 남은 글자와 지워진 자리 한 칸을 다시 그린 뒤 커서를 복원한다.
    fn redraw_tail(&mut self) -> Result<()> {
        let (column, row) = self.terminal.cursor_position()?;
        let mut tail = self.buffer.tail();
        tail.push(' ');
        self.terminal.write_str(&tail)?;
        self.terminal.set_cursor_position(column, row)
    }

    /// 0열에서 왼쪽으로 가면 윗행 마지막 열로 이동한다.
    pub fn move_left(&mut self, count: usize) -> Result<()> {
        let count = count.min(self.buffer.cursor);
        if count == 0 {
            return Ok(());
        }
        let width = usize::from(self.terminal.buffer_width().max(1));
        let (column, row) = self.terminal.cursor_position()?;
        let absolute = usize::from(row) * width + usize::from(column);
        let target = absolute.saturating_sub(count);
        self.set_absolute(target, width)?;
        self.buffer.cursor -= count;
        Ok(())
    }

    /// 마지막 열에서 오른쪽으로 가면 아랫행 0열로 이동한다.
    pub fn move_right(&mut self, count: usize) -> Result<()> {
        let count = count.min(self.buffer.len() - self.buffer.cursor);
        if count == 0 {
            return Ok(());
        }
        let width = usize::from(self.terminal.buffer_width().max(1));
        let (column, row) = self.terminal.cursor_position()?;
        let absolute = usize::from(row) * width + usize::from(column);
        self.set_absolute(absolute + count, width)?;
        self.buffer.cursor += count;
        Ok(())
    }

    fn set_absolute(&mut self, absolute: usize, width: usize) -> Result<()> {
        let column = u16::try_from(absolute % width).unwrap_or(u16::MAX);
        let row = u16::try_from(absolute / width).unwrap_or(u16::MAX);
        self.terminal.set_cursor_position(column, row)
    }

    /// 커서 앞 공백을 건너뛴 뒤 단어 하나가 끝날 때까지 `action`을 반복한다.
    ///
    /// `action`은 커서를 왼쪽으로 옮기거나 앞 글자를 지우는 동작이어야 한다.
    pub fn word_backward<F>(&mut self, mut action: F) -> Result<()>
    where
        F: FnMut(&mut Self) -> Result<()>,
    {
        self.repeat_while(&mut action, |b| b.before_cursor().is_some_and(char::is_whitespace))?;
        self.repeat_while(&mut action, |b| b.before_cursor().is_some_and(|c| !c.is_whitespace()))
    }

    /// 커서 뒤 공백을 건너뛴 뒤 단어 하나가 끝날 때까지 `action`을 반복한다.
    pub fn word_forward<F>(&mut self, mut action: F) -> Result<()>
    where
        F: FnMut(&mut Self) -> Result<()>,
    {
        self.repeat_while(&mut action, |b| b.at_cursor().is_some_and(char::is_whitespace))?;
        self.repeat_while(&mut action, |b| b.at_cursor().is_some_and(|c| !c.is_whitespace()))
    }

    fn repeat_while<F, P>(&mut self, action: &mut F, condition: P) -> Result<()>
    where
        F: FnMut(&mut Self) -> Result<()>,
        P: Fn(&LineBuffer) -> bool,
    {
        while condition(&self.buffer) {
            let before = (self.buffer.cursor, self.buffer.len());
            action(&mut *self)?;
            // 진행하지 않는 동작이면 멈춘다.
            if before == (self.buffer.cursor, self.buffer.len()) {
                break;
            }
        }
        Ok(())
    }

    /// 줄 처음까지 지우고 버퍼를 비운다.
    pub fn clear_line(&mut self) -> Result<()> {
        self.move_right(self.buffer.len() - self.buffer.cursor)?;
        self.backspace(self.buffer.cursor)?;
        self.buffer.clear();
        Ok(())
    }

    fn replace_line(&mut self, text: &str) -> Result<()> {
        self.clear_line()?;
        self.write_str(text)
    }

    /// 후보가 하나면 공백까지 붙여 넣고, 여럿이면 공통 접두어까지만 넣는다.
    fn complete(&mut self) -> Result<()> {
        let Some(completer) = self.completer.clone() else {
            return Ok(());
        };
        let before: String = self.buffer.text[..self.buffer.cursor].iter().collect();
        let candidates = completer.complete(&self.completion_scope, &before);
        debug!(count = candidates.len(), "completion candidates");

        let replacement = match candidates.as_slice() {
            [] => return Ok(()),
            [single] => format!("{single} "),
            many => common_prefix(many),
        };
        let Some(suffix) = replacement.strip_prefix(before.as_str()) else {
            return Ok(());
        };
        self.write_str(suffix)
    }
}

fn common_prefix(candidates: &[String]) -> String {
    let Some((first, rest)) = candidates.split_first() else {
        return String::new();
    };
    let mut len = first.chars().count();
    for other in rest {
        len = first
            .chars()
            .zip(other.chars())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count();
    }
    first.chars().take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::key::{KeyModifiers, ShortcutDefinition};
    use crate::infrastructure::terminal::VirtualTerminal;
    use crate::interface::line_input::shortcut_table::ShortcutTable;

    fn editor(width: u16) -> LineEditor<VirtualTerminal> {
        LineEditor::new(VirtualTerminal::new(width), KeyDispatcher::default())
    }

    struct Fixed(Vec<&'static str>);

    impl Completer for Fixed {
        fn complete(&self, _scope: &str, text_before_cursor: &str) -> Vec<String> {
            self.0
                .iter()
                .filter(|c| c.starts_with(text_before_cursor))
                .map(|c| c.to_string())
                .collect()
        }
    }

    #[test]
    fn write_then_backspace_returns_to_empty() {
        let mut editor = editor(80);
        editor.write_str("abc").unwrap();
        editor.backspace(3).unwrap();
        assert_eq!(editor.text(), "");
        assert_eq!(editor.cursor(), 0);
        assert_eq!(editor.terminal().cursor(), (0, 0));
        assert_eq!(editor.terminal().row_text(0), "");
    }

    #[test]
    fn backspace_is_clamped_at_start() {
        let mut editor = editor(80);
        editor.write_str("ab").unwrap();
        editor.backspace(10).unwrap();
        editor.move_left(5).unwrap();
        editor.delete().unwrap();
        assert_eq!(editor.cursor(), 0);
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn word_backward_stops_at_word_starts() {
        let mut editor = editor(80);
        editor.write_str("ab cd").unwrap();

        editor.word_backward(|e| e.move_left(1)).unwrap();
        assert_eq!(editor.cursor(), 3);
        editor.word_backward(|e| e.move_left(1)).unwrap();
        assert_eq!(editor.cursor(), 0);
        assert_eq!(editor.terminal().cursor(), (0, 0));

        editor.word_forward(|e| e.move_right(1)).unwrap();
        assert_eq!(editor.cursor(), 2);
        editor.word_forward(|e| e.move_right(1)).unwrap();
        assert_eq!(editor.cursor(), 5);
    }

    #[test]
    fn word_delete_shortcuts() {
        let mut editor = editor(80);
        editor.write_str("git commit -m").unwrap();
        editor.handle_key(&KeyEvent::ctrl(KeyCode::Backspace)).unwrap();
        assert_eq!(editor.text(), "git commit ");

        editor.apply(EditAction::Home).unwrap();
        editor.handle_key(&KeyEvent::ctrl(KeyCode::Delete)).unwrap();
        assert_eq!(editor.text(), " commit ");
        assert_eq!(editor.terminal().row_text(0), " commit");
    }

    #[test]
    fn insert_in_middle_redraws_tail() {
        let mut editor = editor(80);
        editor.write_str("ac").unwrap();
        editor.move_left(1).unwrap();
        editor.write_char('b').unwrap();
        assert_eq!(editor.text(), "abc");
        assert_eq!(editor.cursor(), 2);
        assert_eq!(editor.terminal().row_text(0), "abc");
        assert_eq!(editor.terminal().cursor(), (2, 0));
    }

    #[test]
    fn cursor_wraps_at_buffer_width() {
        let mut editor = editor(4);
        editor.write_str("abcdef").unwrap();
        assert_eq!(editor.terminal().cursor(), (2, 1));

        editor.move_left(3).unwrap();
        assert_eq!(editor.terminal().cursor(), (3, 0));
        assert_eq!(editor.cursor(), 3);

        editor.write_char('X').unwrap();
        assert_eq!(editor.terminal().cursor(), (0, 1));
        assert_eq!(editor.terminal().row_text(0), "abcX");
        assert_eq!(editor.terminal().row_text(1), "def");

        editor.backspace(1).unwrap();
        assert_eq!(editor.terminal().cursor(), (3, 0));
        assert_eq!(editor.terminal().row_text(0), "abcd");
        assert_eq!(editor.terminal().row_text(1), "ef");
        assert_eq!(editor.text(), "abcdef");
    }

    #[test]
    fn backspace_after_filling_a_row() {
        let mut editor = editor(4);
        editor.write_str("abcd").unwrap();
        assert_eq!(editor.terminal().cursor(), (0, 1));

        editor.backspace(1).unwrap();
        assert_eq!(editor.text(), "abc");
        assert_eq!(editor.terminal().cursor(), (3, 0));
        assert_eq!(editor.terminal().row_text(0), "abc");

        editor.write_char('z').unwrap();
        assert_eq!(editor.terminal().row_text(0), "abcz");
        assert_eq!(editor.terminal().cursor(), (0, 1));
    }

    #[test]
    fn read_line_from_stops_on_submit() {
        let mut editor = editor(80);
        let mut keys = KeyEvent::from_text("hi");
        keys.push(KeyEvent::enter());
        keys.extend(KeyEvent::from_text("ignored"));

        let line = editor.read_line_from(keys).unwrap();
        assert_eq!(line, "hi");
        assert_eq!(editor.text(), "");
        assert_eq!(editor.terminal().cursor(), (0, 1));
    }

    #[test]
    fn control_sequence_is_echoed() {
        let mut editor = editor(80);
        let line = editor
            .read_line_from([KeyEvent::ctrl(KeyCode::Char('w')), KeyEvent::enter()])
            .unwrap();
        assert_eq!(line, "^W");
    }

    #[test]
    fn escape_clears_line() {
        let mut editor = editor(80);
        let line = editor
            .read_line_from(
                KeyEvent::from_text("oops")
                    .into_iter()
                    .chain([KeyEvent::plain(KeyCode::Left), KeyEvent::plain(KeyCode::Escape)])
                    .chain(KeyEvent::from_text("ok")),
            )
            .unwrap();
        assert_eq!(line, "ok");
    }

    #[test]
    fn user_shortcut_binds_control_combination() {
        let table = ShortcutTable::register(
            &[],
            &[ShortcutDefinition::with_modifiers(
                KeyCode::Char('a'),
                KeyModifiers::CONTROL,
                EditAction::Home,
            )],
        )
        .unwrap();
        let mut editor = LineEditor::new(VirtualTerminal::new(80), KeyDispatcher::new(table));
        editor.write_str("bc").unwrap();
        editor.handle_key(&KeyEvent::ctrl(KeyCode::Char('a'))).unwrap();
        editor.write_char('a').unwrap();
        assert_eq!(editor.text(), "abc");
    }

    #[test]
    fn history_recalls_submitted_lines() {
        let mut editor = editor(80);
        editor.read_line_from(KeyEvent::from_text("first")).unwrap();
        editor.read_line_from(KeyEvent::from_text("second")).unwrap();

        editor.write_str("dra").unwrap();
        editor.handle_key(&KeyEvent::plain(KeyCode::Up)).unwrap();
        assert_eq!(editor.text(), "second");
        editor.handle_key(&KeyEvent::plain(KeyCode::Up)).unwrap();
        assert_eq!(editor.text(), "first");
        editor.handle_key(&KeyEvent::plain(KeyCode::Down)).unwrap();
        editor.handle_key(&KeyEvent::plain(KeyCode::Down)).unwrap();
        assert_eq!(editor.text(), "dra");
        assert_eq!(editor.cursor(), 3);
    }

    #[test]
    fn tab_completes_unique_and_common_prefix() {
        let mut editor =
            editor(80).with_completer(Arc::new(Fixed(vec!["book add", "book list", "borrow"])));

        editor.write_str("bor").unwrap();
        editor.handle_key(&KeyEvent::plain(KeyCode::Tab)).unwrap();
        assert_eq!(editor.text(), "borrow ");

        editor.apply(EditAction::ClearLine).unwrap();
        editor.write_str("boo").unwrap();
        editor.handle_key(&KeyEvent::plain(KeyCode::Tab)).unwrap();
        assert_eq!(editor.text(), "book ");
    }

    #[test]
    fn read_line_returns_none_when_input_ends() {
        let mut terminal = VirtualTerminal::new(80);
        terminal.push_keys(KeyEvent::from_text("abc"));
        let mut editor = LineEditor::new(terminal, KeyDispatcher::default());
        assert_eq!(editor.read_line().unwrap(), None);
        assert_eq!(editor.text(), "abc");

        editor.terminal_mut().push_keys([KeyEvent::enter()]);
        assert_eq!(editor.read_line().unwrap(), Some("abc".to_string()));
    }

    #[test]
    fn cancelled_read_keeps_buffer() {
        let mut terminal = VirtualTerminal::new(80);
        terminal.push_keys(KeyEvent::from_text("x"));
        let token = terminal.cancellation_token();
        let mut editor = LineEditor::new(terminal, KeyDispatcher::default());
        editor.handle_key(&KeyEvent::char('y')).unwrap();
        token.cancel();
        assert_eq!(editor.read_line().unwrap(), None);
        assert_eq!(editor.text(), "y");
    }
}
