//! Syntax tree pane

use crate::output::printer::render_tree;
use crate::parser::ast::Ast;
use crate::ui::panes::{clamp_scroll, pane_block, visible_rows};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the indented tree, or a notice when no tree was built
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    ast: Option<&Ast>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Syntax Tree ", is_focused);

    let Some(ast) = ast else {
        let paragraph = Paragraph::new("(no tree: input ended before the program was closed)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.error));
        frame.render_widget(paragraph, area);
        return;
    };

    let text = render_tree(ast);
    let lines: Vec<&str> = text.lines().collect();
    let visible_height = visible_rows(area);
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let visible: Vec<Line> = lines
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| {
            let indent = line.len() - line.trim_start().len();
            let (kind, label) = match line.trim_start().split_once(": ") {
                Some((kind, label)) => (kind, Some(label)),
                None => (line.trim_start(), None),
            };
            let mut spans = vec![
                Span::raw(" ".repeat(indent)),
                Span::styled(kind.to_string(), Style::default().fg(DEFAULT_THEME.keyword)),
            ];
            if let Some(label) = label {
                spans.push(Span::styled(": ", Style::default().fg(DEFAULT_THEME.comment)));
                spans.push(Span::styled(
                    label.to_string(),
                    Style::default().fg(DEFAULT_THEME.secondary),
                ));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}
