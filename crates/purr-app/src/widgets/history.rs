use purr_history::HistoryEntry;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::theme;

pub struct HistoryOverlayWidget<'a> {
    pub query: &'a str,
    pub entries: &'a [HistoryEntry],
    pub selected: usize,
}

impl<'a> HistoryOverlayWidget<'a> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = (area.width * 4 / 5).clamp(30, 100);
        let height = (area.height * 3 / 5).clamp(8, 24);
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" History ")
            .title_style(Style::default().fg(theme::ACCENT).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER_COLOR))
            .style(Style::default().bg(theme::OVERLAY_BG));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);

        let query_line = Line::from(vec![
            Span::styled("search: ", Style::default().fg(theme::TEXT_DIM)),
            Span::styled(self.query, Style::default().fg(theme::HEADER_FG)),
        ]);
        frame.render_widget(Paragraph::new(query_line), chunks[0]);

        let visible = chunks[1].height as usize;
        let first = self.selected.saturating_sub(visible.saturating_sub(1));
        let lines: Vec<Line> = self
            .entries
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .map(|(i, entry)| {
                let marker = if entry.success { " " } else { "✗" };
                let style = if i == self.selected {
                    Style::default().fg(theme::HEADER_FG).bg(theme::SELECTION_BG)
                } else {
                    Style::default().fg(theme::STATUS_FG)
                };
                let scope = format!("{}/{}", entry.context, entry.namespace);
                Line::from(vec![
                    Span::styled(format!("{marker} "), Style::default().fg(theme::STATUS_FAILED)),
                    Span::styled(entry.command.clone(), style),
                    Span::styled(format!("  {scope}"), Style::default().fg(theme::TEXT_DIM)),
                ])
            })
            .collect();

        if lines.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("no matching commands", Style::default().fg(theme::TEXT_DIM))),
                chunks[1],
            );
        } else {
            frame.render_widget(Paragraph::new(lines), chunks[1]);
        }
    }
}
