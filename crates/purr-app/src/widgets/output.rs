use purr_exec::ExecuteResult;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::theme;

pub struct OutputViewWidget<'a> {
    pub command: &'a str,
    pub result: &'a ExecuteResult,
    pub scroll: u16,
}

impl<'a> OutputViewWidget<'a> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let status = if self.result.success() {
            Span::styled("ok", Style::default().fg(theme::STATUS_RUNNING))
        } else {
            Span::styled(format!("exit {}", self.result.exit_code), Style::default().fg(theme::STATUS_FAILED))
        };

        let title = Line::from(vec![
            Span::raw(" "),
            Span::styled(self.command, Style::default().fg(theme::ACCENT)),
            Span::raw(" · "),
            status,
            Span::raw(format!(" · {}ms ", self.result.duration.as_millis())),
        ]);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER_COLOR));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = Vec::new();
        for line in self.result.stdout.lines() {
            lines.push(Line::from(Span::styled(line.to_string(), Style::default().fg(theme::HEADER_FG))));
        }
        for line in self.result.stderr.lines() {
            lines.push(Line::from(Span::styled(line.to_string(), Style::default().fg(theme::STATUS_FAILED))));
        }
        if let Some(error) = &self.result.error {
            if self.result.stderr.is_empty() {
                lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(theme::STATUS_FAILED))));
            }
        }
        if lines.is_empty() {
            lines.push(Line::from(Span::styled("(no output)", Style::default().fg(theme::TEXT_DIM))));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).scroll((self.scroll, 0));
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn render(result: &ExecuteResult) -> String {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let widget = OutputViewWidget { command: "get pods", result, scroll: 0 };
                widget.render(frame, frame.area());
            })
            .unwrap();
        crate::widgets::buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn successful_output_shows_stdout() {
        let result = ExecuteResult {
            stdout: "NAME  READY\nweb-1 1/1".to_string(),
            duration: Duration::from_millis(42),
            ..Default::default()
        };
        let content = render(&result);
        assert!(content.contains("web-1"));
        assert!(content.contains("ok"));
    }

    #[test]
    fn failure_shows_exit_code_and_stderr() {
        let result = ExecuteResult {
            stderr: "error from server".to_string(),
            exit_code: 1,
            error: Some("command exited with code 1".to_string()),
            ..Default::default()
        };
        let content = render(&result);
        assert!(content.contains("exit 1"));
        assert!(content.contains("error from server"));
    }

    #[test]
    fn empty_output_has_placeholder() {
        let result = ExecuteResult::default();
        let content = render(&result);
        assert!(content.contains("(no output)"));
    }
}
