use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Syncing,
    Ready,
    Stalled,
}

pub struct StatusBarWidget<'a> {
    pub mode: &'a str,
    pub context: &'a str,
    pub namespace: &'a str,
    pub cache: CacheStatus,
    pub show_help: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();

        spans.push(Span::styled(
            format!(" {} ", self.mode.to_uppercase()),
            Style::default().fg(theme::STATUS_BG).bg(theme::ACCENT).bold(),
        ));

        if self.show_help {
            for (key, desc) in [("tab", "complete"), ("enter", "run"), ("ctrl-r", "history"), ("ctrl-c", "quit")] {
                spans.push(Span::styled(" │ ", Style::default().fg(theme::BORDER_COLOR).bg(theme::STATUS_BG)));
                spans.push(Span::styled(format!("<{key}>"), Style::default().fg(theme::ACCENT).bg(theme::STATUS_BG)));
                spans.push(Span::styled(format!(" {desc}"), Style::default().fg(theme::STATUS_FG).bg(theme::STATUS_BG)));
            }
        }

        let (cache_text, cache_color) = match self.cache {
            CacheStatus::Syncing => ("syncing…", theme::STATUS_PENDING),
            CacheStatus::Ready => ("synced", theme::STATUS_RUNNING),
            CacheStatus::Stalled => ("cache unavailable", theme::STATUS_FAILED),
        };
        let right_text = format!("{} / {} · {cache_text} ", self.context, self.namespace);
        let right_width = right_text.len() as u16;
        let left_used: u16 = spans.iter().map(|s| s.width() as u16).sum();
        let fill = area.width.saturating_sub(left_used + right_width);

        if fill > 0 {
            spans.push(Span::styled(" ".repeat(fill as usize), Style::default().bg(theme::STATUS_BG)));
        }

        spans.push(Span::styled(right_text, Style::default().fg(cache_color).bg(theme::STATUS_BG)));

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::STATUS_BG));
        frame.render_widget(bar, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(widget: StatusBarWidget) -> String {
        let backend = TestBackend::new(100, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| widget.render(frame, frame.area())).unwrap();
        crate::widgets::buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn shows_mode_context_and_namespace() {
        let content = render(StatusBarWidget {
            mode: "typing",
            context: "minikube",
            namespace: "default",
            cache: CacheStatus::Ready,
            show_help: true,
        });
        assert!(content.contains("TYPING"));
        assert!(content.contains("minikube / default"));
        assert!(content.contains("synced"));
        assert!(content.contains("<tab>"));
    }

    #[test]
    fn stalled_cache_is_called_out() {
        let content = render(StatusBarWidget {
            mode: "typing",
            context: "prod",
            namespace: "default",
            cache: CacheStatus::Stalled,
            show_help: false,
        });
        assert!(content.contains("cache unavailable"));
        assert!(!content.contains("<tab>"));
    }
}
