//! 세션 내 입력 기록. 디스크에 저장하지 않는다.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct InputHistory {
    entries: VecDeque<String>,
    limit: usize,
    cursor: Option<usize>,
    pending: String,
}

impl InputHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
            cursor: None,
            pending: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 제출된 줄을 기록한다. 빈 줄과 직전과 같은 줄은 건너뛴다.
    pub fn push(&mut self, line: &str) {
        self.reset_navigation();
        if self.limit == 0 || line.trim().is_empty() {
            return;
        }
        if self.entries.back().is_some_and(|last| last == line) {
            return;
        }
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(line.to_string());
    }

    /// 한 단계 이전 기록. 처음 진입할 때 편집 중이던 줄을 보관한다.
    pub fn previous(&mut self, current: &str) -> Option<&str> {
        let next = match self.cursor {
            None => {
                if self.entries.is_empty() {
                    return None;
                }
                self.pending = current.to_string();
                self.entries.len() - 1
            }
            Some(0) => return None,
            Some(idx) => idx - 1,
        };
        self.cursor = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    /// 한 단계 다음 기록. 끝을 지나면 보관해 둔 줄을 돌려준다.
    pub fn next(&mut self) -> Option<&str> {
        let idx = self.cursor?;
        if idx + 1 < self.entries.len() {
            self.cursor = Some(idx + 1);
            return self.entries.get(idx + 1).map(String::as_str);
        }
        self.cursor = None;
        Some(self.pending.as_str())
    }

    pub fn reset_navigation(&mut self) {
        self.cursor = None;
        self.pending.clear();
    }
}

impl Default for InputHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_restores_pending_line() {
        let mut history = InputHistory::new(10);
        history.push("first");
        history.push("second");

        assert_eq!(history.previous("draft"), Some("second"));
        assert_eq!(history.previous("second"), Some("first"));
        assert_eq!(history.previous("first"), None);
        assert_eq!(history.next(), Some("second"));
        assert_eq!(history.next(), Some("draft"));
        assert_eq!(history.next(), None);
    }

    #[test]
    fn limit_drops_oldest_and_skips_repeats() {
        let mut history = InputHistory::new(2);
        history.push("a");
        history.push("a");
        history.push("  ");
        history.push("b");
        history.push("c");
        assert_eq!(history.len(), 2);
        assert_eq!(history.previous(""), Some("c"));
        assert_eq!(history.previous("c"), Some("b"));
        assert_eq!(history.previous("b"), None);
    }
}
