use purr_complete::Suggestion;
use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::theme;

/// Dropdown under the input line. The caller has already filtered and
/// capped the list.
pub struct SuggestionPopupWidget<'a> {
    pub suggestions: &'a [Suggestion],
    pub selected: usize,
}

impl<'a> SuggestionPopupWidget<'a> {
    pub fn render(&self, frame: &mut Frame, full_area: Rect, popup_x: u16, popup_y: u16) {
        if self.suggestions.is_empty() || popup_y >= full_area.y + full_area.height {
            return;
        }

        let value_width = self.suggestions.iter().map(|s| s.value.len()).max().unwrap_or(4);
        let desc_width = self.suggestions.iter().map(|s| s.description.len()).max().unwrap_or(0);
        let popup_w = ((value_width + desc_width + 4) as u16).clamp(16, 60);
        let popup_h = (self.suggestions.len() as u16).min((full_area.y + full_area.height).saturating_sub(popup_y));

        if popup_h == 0 {
            return;
        }

        let max_x = full_area.x + full_area.width;
        let popup_x = popup_x.min(max_x.saturating_sub(popup_w));
        let popup = Rect { x: popup_x, y: popup_y, width: popup_w, height: popup_h };
        frame.render_widget(Clear, popup);

        let lines: Vec<Line> = self
            .suggestions
            .iter()
            .enumerate()
            .take(popup_h as usize)
            .map(|(i, suggestion)| {
                let (value_style, desc_style) = if i == self.selected {
                    (
                        Style::default().fg(theme::HEADER_FG).bg(theme::SELECTION_BG).bold(),
                        Style::default().fg(theme::STATUS_FG).bg(theme::SELECTION_BG),
                    )
                } else {
                    (
                        Style::default().fg(theme::HEADER_FG).bg(theme::OVERLAY_BG),
                        Style::default().fg(theme::TEXT_DIM).bg(theme::OVERLAY_BG),
                    )
                };
                let text = format!(" {:<value_width$} ", suggestion.value);
                let desc = format!("{:<width$}", suggestion.description, width = desc_width + 1);
                Line::from(vec![Span::styled(text, value_style), Span::styled(desc, desc_style)])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(theme::OVERLAY_BG)), popup);
    }
}
