use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::theme;

pub struct InputLineWidget<'a> {
    pub input: &'a str,
    pub cursor: usize,
    pub running: bool,
}

impl<'a> InputLineWidget<'a> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.running { " purr (running…) " } else { " purr " };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(theme::ACCENT).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER_COLOR));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let line = Line::from(vec![
            Span::styled("❯ ", Style::default().fg(theme::ACCENT)),
            Span::styled(self.input, Style::default().fg(theme::HEADER_FG)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);

        let cursor_cells = self.input[..self.cursor.min(self.input.len())].chars().count() as u16;
        frame.set_cursor_position((inner.x + 2 + cursor_cells, inner.y));
    }
}
