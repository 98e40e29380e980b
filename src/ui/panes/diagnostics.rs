//! Diagnostics pane

use crate::diagnostics::{DiagnosticLog, Stage};
use crate::ui::panes::{clamp_scroll, pane_block, visible_rows};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the diagnostics in log order
pub fn render_diagnostics_pane(
    frame: &mut Frame,
    area: Rect,
    diagnostics: &DiagnosticLog,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Diagnostics ({}) ", diagnostics.len());
    let block = pane_block(&title, is_focused);

    if diagnostics.is_empty() {
        let paragraph = Paragraph::new("No errors found.")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.success));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = visible_rows(area);
    clamp_scroll(scroll_offset, diagnostics.len(), visible_height);

    let items: Vec<ListItem> = diagnostics
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|diagnostic| {
            let stage_color = match diagnostic.stage() {
                Stage::Lexical => DEFAULT_THEME.secondary,
                Stage::Syntax => DEFAULT_THEME.error,
            };
            let position = match diagnostic.column {
                Some(column) => format!("{}:{}", diagnostic.line, column),
                None => diagnostic.line.to_string(),
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<18}", diagnostic.kind.name()),
                    Style::default()
                        .fg(stage_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:>7}  ", position),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    diagnostic.message.clone(),
                    Style::default().fg(DEFAULT_THEME.fg),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
