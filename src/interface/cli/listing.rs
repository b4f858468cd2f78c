//! 스키마 목록/시작 배너 텍스트 구성.
//!
//! 표시 순서는 항상 이름 정렬이다. 열 너비는 터미널 표시 폭 기준으로 맞춘다.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::mode::ModeRef;
use crate::domain::schema::{RootSchema, SchemaTarget};

const BOX_INNER_WIDTH: usize = 58;

/// `modeshell schema` 출력 본문.
pub fn render_schema_listing(schema: &RootSchema) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Commands".to_string());
    let mut rows: Vec<(String, String)> = schema
        .sorted_commands()
        .into_iter()
        .map(|c| {
            let mut name = c.name.clone().unwrap_or_default();
            for parameter in &c.parameters {
                name.push_str(&format!(" <{}>", parameter.name));
            }
            (name, describe(c.description.as_deref(), SchemaTarget::Command(c)))
        })
        .collect();
    if let Some(default) = schema.default_command() {
        rows.insert(
            0,
            (
                default.display_name().to_string(),
                describe(default.description.as_deref(), SchemaTarget::Command(default)),
            ),
        );
    }
    lines.extend(render_rows(&rows));

    lines.push(String::new());
    lines.push("Directives".to_string());
    let rows: Vec<(String, String)> = schema
        .sorted_directives()
        .into_iter()
        .map(|d| {
            (
                format!("[{}]", d.name),
                describe(d.description.as_deref(), SchemaTarget::Directive(d)),
            )
        })
        .collect();
    lines.extend(render_rows(&rows));

    lines.push(String::new());
    let modes = schema
        .modes()
        .iter()
        .map(ModeRef::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Modes: {modes}"));
    lines
}

fn describe(description: Option<&str>, target: SchemaTarget<'_>) -> String {
    let mut text = description.unwrap_or("").to_string();
    let supported = target.supported_modes();
    if !supported.is_empty() {
        let names: Vec<&str> = supported.iter().map(ModeRef::as_str).collect();
        text.push_str(&format!(" (only: {})", names.join(", ")));
    }
    let excluded = target.excluded_modes();
    if !excluded.is_empty() {
        let names: Vec<&str> = excluded.iter().map(ModeRef::as_str).collect();
        text.push_str(&format!(" (not: {})", names.join(", ")));
    }
    text.trim().to_string()
}

fn render_rows(rows: &[(String, String)]) -> Vec<String> {
    let width = rows
        .iter()
        .map(|(name, _)| UnicodeWidthStr::width(name.as_str()))
        .max()
        .unwrap_or(0);
    rows.iter()
        .map(|(name, description)| {
            format!("  {}  {}", pad_to_width(name, width), description)
                .trim_end()
                .to_string()
        })
        .collect()
}

/// 표시 폭이 `width`가 되도록 공백을 붙인다.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(text);
    let mut out = text.to_string();
    out.push_str(&" ".repeat(width.saturating_sub(current)));
    out
}

/// 표시 폭 기준으로 자르고 `...`를 붙인다.
pub fn fit_box_line(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width - 3 {
            break;
        }
        out.push(ch);
        used += w;
    }
    format!("{out}...")
}

/// 대화형 세션 시작 배너.
pub fn render_banner(title: &str, schema: &RootSchema) -> Vec<String> {
    let border = format!("+{}+", "-".repeat(BOX_INNER_WIDTH + 2));
    let row = |text: &str| {
        format!(
            "| {} |",
            pad_to_width(&fit_box_line(text, BOX_INNER_WIDTH), BOX_INNER_WIDTH)
        )
    };

    vec![
        border.clone(),
        row(title),
        row(&format!(
            "{} commands, {} directives",
            schema.commands().len() + usize::from(schema.default_command().is_some()),
            schema.directives().len()
        )),
        border.clone(),
        row("Tab completes, Up/Down recalls, Ctrl+C exits"),
        row("[>] cmd enters a scope, [.] goes up, [..] resets"),
        border,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::schema_resolver::SchemaResolver;
    use crate::domain::mode::ModeDescriptor;
    use crate::domain::schema::{CommandDescriptor, ParameterSchema, builtin_directives};

    #[test]
    fn pads_by_display_width() {
        assert_eq!(pad_to_width("책", 4), "책  ");
        assert_eq!(pad_to_width("abc", 2), "abc");
        assert_eq!(fit_box_line("가나다라", 5), "가...");
    }

    #[test]
    fn listing_is_sorted_and_aligned() {
        let schema = SchemaResolver::new(
            vec![
                CommandDescriptor {
                    parameters: vec![ParameterSchema {
                        name: "title".to_string(),
                        order: 0,
                        description: None,
                    }],
                    description: Some("add a book".to_string()),
                    ..CommandDescriptor::named("book add")
                },
                CommandDescriptor {
                    supported_modes: vec!["interactive".to_string()],
                    ..CommandDescriptor::named("audit")
                },
            ],
            builtin_directives(),
            ModeDescriptor::builtin(),
        )
        .resolve()
        .unwrap();

        let lines = render_schema_listing(&schema);
        assert_eq!(lines[0], "Commands");
        assert_eq!(lines[1], "  audit             (only: interactive)");
        assert_eq!(lines[2], "  book add <title>  add a book");
        assert!(lines.contains(&"Modes: direct, interactive".to_string()));
    }
}
