//! Source pane rendering with keyword highlighting
//!
//! # Features
//!
//! - Highlighting for reserved words, type names, strings, numbers, and comments
//! - Lines carrying a diagnostic are marked with the error color
//! - Tabs are expanded to the configured width
//! - Line numbering
//!
//! # Rendering
//!
//! Highlighting is done per line with a small character scanner. Reserved
//! words are looked up in the same [`KeywordTable`] the lexer used, so the
//! configured keyword case is respected.

use crate::parser::lexer::KeywordTable;
use crate::ui::panes::{clamp_scroll, pane_block, visible_rows};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rustc_hash::FxHashSet;

/// Replace tabs with spaces up to the next multiple of `width`
pub fn expand_tabs(line: &str, width: usize) -> String {
    let width = width.max(1);
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = width - column % width;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

fn word_style(word: &str, keywords: &KeywordTable) -> Style {
    match keywords.lookup(word) {
        Some(kind) if kind.is_type_keyword() => Style::default().fg(DEFAULT_THEME.type_name),
        Some(kind) if kind.is_logical() => Style::default().fg(DEFAULT_THEME.operator),
        Some(_) => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        None if word.starts_with(|c: char| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        None => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Split one line into styled spans
pub fn highlight_line(line: &str, keywords: &KeywordTable) -> Line<'static> {
    let chars: Vec<char> = line.chars().collect();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '#' {
            let rest: String = chars[i..].iter().collect();
            spans.push(Span::styled(rest, Style::default().fg(DEFAULT_THEME.comment)));
            break;
        }

        if c == '"' || c == '\'' {
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                end += 1;
            }
            end = (end + 1).min(chars.len());
            let literal: String = chars[i..end].iter().collect();
            spans.push(Span::styled(literal, Style::default().fg(DEFAULT_THEME.string)));
            i = end;
            continue;
        }

        let starts_number = c == '.' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
        if c.is_alphanumeric() || c == '_' || starts_number {
            let start = i;
            while i < chars.len()
                && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '.')
            {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let style = word_style(&word, keywords);
            spans.push(Span::styled(word, style));
            continue;
        }

        let style = match c {
            '{' | '}' | '(' | ')' => Style::default().fg(DEFAULT_THEME.primary),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
        i += 1;
    }

    Line::from(spans)
}

/// Render the source pane
#[allow(clippy::too_many_arguments)]
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    error_lines: &FxHashSet<usize>,
    keywords: &KeywordTable,
    tab_width: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Source ", is_focused);

    let lines: Vec<&str> = source_code.lines().collect();
    let visible_height = visible_rows(area);
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_error = error_lines.contains(&line_num);

            let num_style = if is_error {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };
            let marker = if is_error { "✗" } else { " " };

            let mut content = highlight_line(&expand_tabs(line, tab_width), keywords);
            if is_error {
                for span in &mut content.spans {
                    span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
                }
            }

            let mut spans = vec![
                Span::styled(format!("{:4} ", line_num), num_style),
                Span::styled(format!("{} ", marker), num_style),
            ];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(visible_lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordCase;
    use test_log::test;

    #[test]
    fn test_expand_tabs_to_stops() {
        assert_eq!(expand_tabs("\tx", 4), "    x");
        assert_eq!(expand_tabs("ab\tc", 4), "ab  c");
        assert_eq!(expand_tabs("a\tb", 0), "a b");
    }

    #[test]
    fn test_highlight_splits_words_and_comments() {
        let keywords = KeywordTable::new(KeywordCase::Insensitive);
        let line = highlight_line("leer x; # fin", &keywords);
        let texts: Vec<_> = line.spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(texts, vec!["leer", " ", "x", ";", " ", "# fin"]);
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.keyword));
    }
}
