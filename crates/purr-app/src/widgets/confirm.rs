use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::theme;

/// Commands longer than this are elided in the dialog; what runs is the
/// untruncated line the app holds.
const MAX_COMMAND_WIDTH: usize = 72;

/// Gate in front of anything the classifier marked destructive. Shows
/// the exact command with the tokens that triggered the classification
/// called out, so the user sees *why* they are being asked.
pub struct ConfirmDialogWidget<'a> {
    pub command: &'a str,
}

impl<'a> ConfirmDialogWidget<'a> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let shown = elide(self.command, MAX_COMMAND_WIDTH);

        // Wide enough for the question line; grows with the command.
        let width = (shown.chars().count() as u16 + 8).clamp(46, area.width.saturating_sub(4));
        let height = 7.min(area.height.saturating_sub(2));
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" destructive command ")
            .title_style(Style::default().fg(theme::STATUS_FAILED).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::STATUS_FAILED))
            .style(Style::default().bg(theme::OVERLAY_BG));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let lines = vec![
            Line::from(Span::styled(
                "This can change or remove cluster state:",
                Style::default().fg(theme::STATUS_FG),
            )),
            Line::default(),
            highlight_command(&shown),
            Line::default(),
            Line::from(vec![
                Span::styled("y", Style::default().fg(theme::STATUS_FAILED).bold()),
                Span::styled(" run it   ", Style::default().fg(theme::STATUS_FG)),
                Span::styled("n", Style::default().fg(theme::ACCENT).bold()),
                Span::styled("/", Style::default().fg(theme::TEXT_DIM)),
                Span::styled("esc", Style::default().fg(theme::ACCENT).bold()),
                Span::styled(" keep it", Style::default().fg(theme::STATUS_FG)),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
}

/// The verb and `--force` are what put the command through this dialog;
/// they get the emphasis. A leading `kubectl` and other flags stay dim
/// so the dangerous part reads first.
fn highlight_command(command: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut verb_seen = false;
    for token in command.split_whitespace() {
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        let style = if token == "--force" {
            Style::default().fg(theme::STATUS_FAILED).bold()
        } else if token == "kubectl" && !verb_seen {
            Style::default().fg(theme::TEXT_DIM)
        } else if !verb_seen {
            verb_seen = true;
            Style::default().fg(theme::STATUS_FAILED).bold()
        } else if token.starts_with('-') {
            Style::default().fg(theme::TEXT_DIM)
        } else {
            Style::default().fg(theme::HEADER_FG)
        };
        spans.push(Span::styled(token.to_string(), style));
    }
    Line::from(spans)
}

fn elide(command: &str, max: usize) -> String {
    if command.chars().count() <= max {
        return command.to_string();
    }
    let mut out: String = command.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(command: &str) -> String {
        let backend = TestBackend::new(90, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let widget = ConfirmDialogWidget { command };
                widget.render(frame, frame.area());
            })
            .unwrap();
        crate::widgets::buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn dialog_shows_command_and_key_hints() {
        let content = render("kubectl delete pod nginx-abc123");
        assert!(content.contains("destructive command"), "should show the dialog title");
        assert!(content.contains("delete pod nginx-abc123"), "should show the command");
        assert!(content.contains("run it"), "should show the confirm hint");
        assert!(content.contains("keep it"), "should show the cancel hint");
    }

    #[test]
    fn long_commands_are_elided() {
        let long = format!("delete pod {}", "x".repeat(120));
        let content = render(&long);
        assert!(content.contains('…'), "overlong commands get an ellipsis");
        assert!(!content.contains(&"x".repeat(120)), "the full tail is not rendered");
    }

    #[test]
    fn verb_and_force_are_emphasized() {
        let line = highlight_command("kubectl delete pods web --force -n prod");
        let styled: Vec<(&str, Style)> =
            line.spans.iter().map(|s| (s.content.as_ref(), s.style)).collect();

        let danger = Style::default().fg(theme::STATUS_FAILED).bold();
        assert!(styled.contains(&("delete", danger)), "the verb is called out");
        assert!(styled.contains(&("--force", danger)), "--force is called out");

        let kubectl = styled.iter().find(|(t, _)| *t == "kubectl").unwrap();
        assert_eq!(kubectl.1.fg, Some(theme::TEXT_DIM), "the kubectl prefix stays dim");
        let name = styled.iter().find(|(t, _)| *t == "web").unwrap();
        assert_eq!(name.1.fg, Some(theme::HEADER_FG), "the target keeps normal weight");
    }

    #[test]
    fn bare_verb_without_kubectl_prefix_is_emphasized() {
        let line = highlight_command("drain node-1");
        let danger = Style::default().fg(theme::STATUS_FAILED).bold();
        assert_eq!(line.spans[0].content.as_ref(), "drain");
        assert_eq!(line.spans[0].style, danger);
    }

    #[test]
    fn elide_keeps_short_commands_intact() {
        assert_eq!(elide("delete pod web", 72), "delete pod web");
        let elided = elide(&"a".repeat(100), 10);
        assert_eq!(elided.chars().count(), 10);
        assert!(elided.ends_with('…'));
    }
}
