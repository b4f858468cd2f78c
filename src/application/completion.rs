//! 루트 스키마 기반 Tab 자동완성.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::application::ports::Completer;
use crate::domain::input::directive_name;
use crate::domain::schema::RootSchema;

/// 명령 이름을 단어 단위로, 지시어 이름을 `[name]` 단위로 완성한다.
///
/// scope가 있으면 입력 앞에 scope 단어를 붙여 비교한다(디스패처의 명령 해석과 같은 규칙).
pub struct SchemaCompleter {
    schema: Arc<RootSchema>,
}

impl SchemaCompleter {
    pub fn new(schema: Arc<RootSchema>) -> Self {
        Self { schema }
    }
}

impl Completer for SchemaCompleter {
    fn complete(&self, scope: &str, text_before_cursor: &str) -> Vec<String> {
        let ends_with_space = text_before_cursor.ends_with(char::is_whitespace);
        let mut words: Vec<&str> = text_before_cursor.split_whitespace().collect();
        let partial = if ends_with_space {
            ""
        } else {
            words.pop().unwrap_or("")
        };

        // 앞쪽 지시어 토큰은 명령 이름 비교에서 제외한다.
        let directive_count = words.iter().take_while(|w| directive_name(w).is_some()).count();
        let typed: Vec<&str> = scope
            .split_whitespace()
            .chain(words[directive_count..].iter().copied())
            .collect();

        let prefix_len = text_before_cursor.len() - partial.len();
        let prefix = &text_before_cursor[..prefix_len];
        let mut candidates: BTreeSet<String> = BTreeSet::new();

        if directive_count == words.len() && partial.starts_with('[') {
            for directive in self.schema.directives().keys() {
                let token = format!("[{directive}]");
                if token.starts_with(partial) {
                    candidates.insert(format!("{prefix}{token}"));
                }
            }
            return candidates.into_iter().collect();
        }

        for name in self.schema.commands().keys() {
            let name_words: Vec<&str> = name.split_whitespace().collect();
            if name_words.len() <= typed.len() || name_words[..typed.len()] != typed[..] {
                continue;
            }
            let next = name_words[typed.len()];
            if next.starts_with(partial) {
                candidates.insert(format!("{prefix}{next}"));
            }
        }

        candidates.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::schema_resolver::SchemaResolver;
    use crate::domain::mode::ModeDescriptor;
    use crate::domain::schema::{CommandDescriptor, builtin_directives};

    fn completer() -> SchemaCompleter {
        let root = SchemaResolver::new(
            vec![
                CommandDescriptor::named("book"),
                CommandDescriptor::named("book add"),
                CommandDescriptor::named("book list"),
                CommandDescriptor::named("borrow"),
            ],
            builtin_directives(),
            ModeDescriptor::builtin(),
        )
        .resolve()
        .unwrap();
        SchemaCompleter::new(Arc::new(root))
    }

    #[test]
    fn completes_first_word() {
        assert_eq!(completer().complete("", "bo"), vec!["book", "borrow"]);
    }

    #[test]
    fn completes_next_word_after_space() {
        assert_eq!(completer().complete("", "book "), vec!["book add", "book list"]);
        assert_eq!(completer().complete("", "book l"), vec!["book list"]);
    }

    #[test]
    fn completes_directives_and_skips_them_for_commands() {
        assert_eq!(completer().complete("", "[pr"), vec!["[preview]"]);
        assert_eq!(completer().complete("", "[preview] book a"), vec!["[preview] book add"]);
    }

    #[test]
    fn scope_is_prepended_to_typed_words() {
        assert_eq!(completer().complete("book", "li"), vec!["list"]);
        assert_eq!(completer().complete("book", ""), vec!["add", "list"]);
        assert_eq!(completer().complete("book", "[preview] a"), vec!["[preview] add"]);
        assert!(completer().complete("book", "bo").is_empty());
    }
}
