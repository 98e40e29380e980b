//! Token stream pane

use crate::parser::lexer::{Token, TokenKind};
use crate::ui::panes::{clamp_scroll, pane_block, visible_rows};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

fn kind_style(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Identifier => Style::default().fg(DEFAULT_THEME.fg),
        TokenKind::Integer | TokenKind::Float => Style::default().fg(DEFAULT_THEME.number),
        TokenKind::Char | TokenKind::Str => Style::default().fg(DEFAULT_THEME.string),
        k if k.is_type_keyword() => Style::default().fg(DEFAULT_THEME.type_name),
        k if k.is_logical() => Style::default().fg(DEFAULT_THEME.operator),
        k if k.lexeme().is_some_and(|l| l.starts_with(char::is_alphabetic)) => {
            Style::default().fg(DEFAULT_THEME.keyword)
        }
        _ => Style::default().fg(DEFAULT_THEME.comment),
    }
}

/// Render the token table
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    tokens: &[Token],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Tokens ", is_focused);

    if tokens.is_empty() {
        let paragraph = Paragraph::new("(no tokens)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    // One row is taken by the header
    let visible_height = visible_rows(area).saturating_sub(1).max(1);
    clamp_scroll(scroll_offset, tokens.len(), visible_height);

    let rows: Vec<Row> = tokens
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|token| {
            Row::new(vec![
                Cell::from(token.kind.name()).style(kind_style(token.kind)),
                Cell::from(token.value_text()),
                Cell::from(format!("{}:{}", token.line, token.column))
                    .style(Style::default().fg(DEFAULT_THEME.comment)),
            ])
        })
        .collect();

    let header = Row::new(vec!["KIND", "VALUE", "POS"]).style(
        Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Min(8),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}
