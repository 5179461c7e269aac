use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use tracing::warn;

use purr_complete::{ClusterCache, Completer, CompletionContext, Suggestion};
use purr_config::AppConfig;
use purr_core::{LiveCache, MockCache};
use purr_exec::{ExecuteResult, Executor};
use purr_history::{History, HistoryEntry};

use crate::app_log;
use crate::event::{AppEvent, EventHandler};
use crate::theme;
use crate::widgets::{
    CacheStatus, ConfirmDialogWidget, HistoryOverlayWidget, InputLineWidget, OutputViewWidget, StatusBarWidget,
    SuggestionPopupWidget,
};

/// How long the UI waits on cache readiness before calling it out.
const READY_DEADLINE: Duration = Duration::from_secs(30);

/// Either cache implementation, with its lifecycle methods kept
/// available next to the capability the engine sees.
pub enum CacheHandle {
    Live(Arc<LiveCache>),
    Mock(Arc<MockCache>),
}

impl CacheHandle {
    pub fn ready(&self) -> bool {
        match self {
            Self::Live(cache) => cache.ready(),
            Self::Mock(cache) => cache.ready(),
        }
    }

    pub fn stop(&self) {
        match self {
            Self::Live(cache) => cache.stop(),
            Self::Mock(cache) => cache.stop(),
        }
    }

    pub fn cluster_cache(&self) -> Arc<dyn ClusterCache> {
        match self {
            Self::Live(cache) => cache.clone(),
            Self::Mock(cache) => cache.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Typing,
    Confirming,
    History,
    Output,
    /// The cache missed its readiness deadline; the normal view is
    /// replaced until the user acknowledges or the cache recovers.
    Error,
}

impl Mode {
    fn label(self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::Confirming => "confirm",
            Self::History => "history",
            Self::Output => "output",
            Self::Error => "error",
        }
    }
}

pub struct App {
    config: AppConfig,
    completer: Completer,
    cache: CacheHandle,
    executor: Arc<Executor>,
    history: Arc<History>,
    context_name: String,
    namespace: String,

    mode: Mode,
    input: String,
    cursor: usize,
    suggestions: Vec<Suggestion>,
    selected: usize,
    pending_confirm: Option<String>,
    running: Option<String>,
    output: Option<(String, ExecuteResult)>,
    output_scroll: u16,
    history_query: String,
    history_results: Vec<HistoryEntry>,
    history_selected: usize,

    started: Instant,
    cache_error_shown: bool,
    should_quit: bool,
    events: EventHandler,
}

impl App {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: AppConfig,
        completer: Completer,
        cache: CacheHandle,
        executor: Arc<Executor>,
        history: Arc<History>,
        context_name: String,
        namespace: String,
    ) -> Self {
        Self {
            config,
            completer,
            cache,
            executor,
            history,
            context_name,
            namespace,
            mode: Mode::Typing,
            input: String::new(),
            cursor: 0,
            suggestions: Vec::new(),
            selected: 0,
            pending_confirm: None,
            running: None,
            output: None,
            output_scroll: 0,
            history_query: String::new(),
            history_results: Vec::new(),
            history_selected: 0,
            started: Instant::now(),
            cache_error_shown: false,
            should_quit: false,
            events: EventHandler::new(Duration::from_millis(250)),
        }
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            match self.events.next().await? {
                AppEvent::Key(key) => self.handle_key(key),
                AppEvent::Tick => self.check_cache_ready(),
                AppEvent::Resize(_, _) => {}
                AppEvent::ExecDone { command, result } => self.finish_execution(command, result),
            }
        }
        self.cache.stop();
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(1)])
            .split(frame.area());

        InputLineWidget { input: &self.input, cursor: self.cursor, running: self.running.is_some() }
            .render(frame, chunks[0]);

        if self.mode == Mode::Error {
            self.render_cache_error(frame, chunks[1]);
        } else {
            match &self.output {
                Some((command, result)) => {
                    OutputViewWidget { command, result, scroll: self.output_scroll }.render(frame, chunks[1]);
                }
                None => self.render_welcome(frame, chunks[1]),
            }
        }

        StatusBarWidget {
            mode: self.mode.label(),
            context: &self.context_name,
            namespace: &self.namespace,
            cache: self.cache_status(),
            show_help: self.config.ui.show_help,
        }
        .render(frame, chunks[2]);

        match self.mode {
            Mode::Typing if !self.suggestions.is_empty() => {
                let start = word_start(&self.input, self.cursor);
                let popup_x = chunks[0].x + 3 + self.input[..start].chars().count() as u16;
                SuggestionPopupWidget { suggestions: &self.suggestions, selected: self.selected }.render(
                    frame,
                    frame.area(),
                    popup_x,
                    chunks[0].bottom(),
                );
            }
            Mode::Confirming => {
                if let Some(command) = &self.pending_confirm {
                    ConfirmDialogWidget { command }.render(frame, frame.area());
                }
            }
            Mode::History => {
                HistoryOverlayWidget {
                    query: &self.history_query,
                    entries: &self.history_results,
                    selected: self.history_selected,
                }
                .render(frame, frame.area());
            }
            _ => {}
        }
    }

    fn render_welcome(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::default(),
            Line::from(Span::styled("  Type a kubectl command; tab completes.", Style::default().fg(theme::STATUS_FG))),
            Line::from(Span::styled(
                "  Prefix with ! for a shell escape, ctrl-r for history.",
                Style::default().fg(theme::TEXT_DIM),
            )),
        ];

        if !self.config.ui.compact_mode {
            let logs = app_log::recent_lines(5);
            if !logs.is_empty() {
                lines.push(Line::default());
                for log_line in logs {
                    lines.push(Line::from(Span::styled(format!("  {log_line}"), Style::default().fg(theme::TEXT_DIM))));
                }
            }
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn cache_status(&self) -> CacheStatus {
        if self.cache.ready() {
            CacheStatus::Ready
        } else if self.started.elapsed() > READY_DEADLINE {
            CacheStatus::Stalled
        } else {
            CacheStatus::Syncing
        }
    }

    /// Ticks the readiness deadline. Missing it replaces the view with
    /// the error mode once; the cache itself keeps retrying, so recovery
    /// drops back to typing.
    fn check_cache_ready(&mut self) {
        if self.mode == Mode::Error {
            if self.cache.ready() {
                self.mode = Mode::Typing;
            }
            return;
        }
        if self.cache_error_shown || self.cache.ready() {
            return;
        }
        if self.mode == Mode::Typing && self.started.elapsed() > READY_DEADLINE {
            self.mode = Mode::Error;
            self.cache_error_shown = true;
            self.suggestions.clear();
        }
    }

    fn render_cache_error(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::default(),
            Line::from(Span::styled(
                "  Cluster cache did not become ready in time.",
                Style::default().fg(theme::STATUS_FAILED).bold(),
            )),
            Line::default(),
            Line::from(Span::styled(
                "  Namespace, resource and container completions stay empty until",
                Style::default().fg(theme::STATUS_FG),
            )),
            Line::from(Span::styled(
                "  the connection recovers; the cache keeps retrying in the background.",
                Style::default().fg(theme::STATUS_FG),
            )),
            Line::default(),
            Line::from(Span::styled(
                "  Check cluster access, or restart with --demo for mock data.",
                Style::default().fg(theme::STATUS_FG),
            )),
            Line::default(),
            Line::from(Span::styled(
                "  esc continue without completions · ctrl-c quit",
                Style::default().fg(theme::TEXT_DIM),
            )),
        ];

        let logs = app_log::recent_lines(5);
        if !logs.is_empty() {
            lines.push(Line::default());
            for log_line in logs {
                lines.push(Line::from(Span::styled(format!("  {log_line}"), Style::default().fg(theme::TEXT_DIM))));
            }
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.mode {
            Mode::Typing => self.handle_typing_key(key),
            Mode::Confirming => self.handle_confirm_key(key),
            Mode::History => self.handle_history_key(key),
            Mode::Output => self.handle_output_key(key),
            Mode::Error => self.handle_error_key(key),
        }
    }

    fn handle_error_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.mode = Mode::Typing,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_typing_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Char('r') if ctrl => self.open_history(),
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                self.refresh_suggestions();
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.input.len();
                self.refresh_suggestions();
            }
            KeyCode::Char(c) if !ctrl => self.insert_char(c),
            KeyCode::Backspace => self.delete_back(),
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor = prev_char_boundary(&self.input, self.cursor);
                    self.refresh_suggestions();
                }
            }
            KeyCode::Right => {
                if self.cursor < self.input.len() {
                    self.cursor = next_char_boundary(&self.input, self.cursor);
                    self.refresh_suggestions();
                }
            }
            KeyCode::Home => {
                self.cursor = 0;
                self.refresh_suggestions();
            }
            KeyCode::End => {
                self.cursor = self.input.len();
                self.refresh_suggestions();
            }
            KeyCode::Tab => self.accept_suggestion(),
            KeyCode::Down => {
                if self.selected + 1 < self.suggestions.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Esc => {
                self.suggestions.clear();
                self.selected = 0;
            }
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(command) = self.pending_confirm.take() {
                    self.mode = Mode::Typing;
                    self.execute(command);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_confirm = None;
                self.mode = Mode::Typing;
            }
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Typing;
            }
            KeyCode::Enter => {
                if let Some(entry) = self.history_results.get(self.history_selected) {
                    self.input = entry.command.clone();
                    self.cursor = self.input.len();
                }
                self.mode = Mode::Typing;
                self.refresh_suggestions();
            }
            KeyCode::Down => {
                if self.history_selected + 1 < self.history_results.len() {
                    self.history_selected += 1;
                }
            }
            KeyCode::Up => self.history_selected = self.history_selected.saturating_sub(1),
            KeyCode::Backspace => {
                self.history_query.pop();
                self.history_results = self.history.search(&self.history_query);
                self.history_selected = 0;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.history_query.push(c);
                self.history_results = self.history.search(&self.history_query);
                self.history_selected = 0;
            }
            _ => {}
        }
    }

    fn handle_output_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.mode = Mode::Typing;
            }
            KeyCode::Up => self.output_scroll = self.output_scroll.saturating_sub(1),
            KeyCode::Down => self.output_scroll = self.output_scroll.saturating_add(1),
            KeyCode::PageUp => self.output_scroll = self.output_scroll.saturating_sub(10),
            KeyCode::PageDown => self.output_scroll = self.output_scroll.saturating_add(10),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.should_quit = true,
            _ => {}
        }
    }

    fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.refresh_suggestions();
    }

    fn delete_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = prev_char_boundary(&self.input, self.cursor);
        self.input.replace_range(start..self.cursor, "");
        self.cursor = start;
        self.refresh_suggestions();
    }

    fn refresh_suggestions(&mut self) {
        let ctx = CompletionContext { current_namespace: self.namespace.clone() };
        let all = self.completer.complete(&self.input, self.cursor, &ctx);
        let prefix = current_word(&self.input, self.cursor).to_string();
        self.suggestions = all
            .into_iter()
            .filter(|s| prefix.is_empty() || s.value.starts_with(&prefix))
            .take(self.config.ui.suggestion_limit)
            .collect();
        self.selected = 0;
    }

    fn accept_suggestion(&mut self) {
        if self.suggestions.is_empty() {
            self.refresh_suggestions();
        }
        let Some(suggestion) = self.suggestions.get(self.selected) else {
            return;
        };
        let value = suggestion.value.clone();
        let start = word_start(&self.input, self.cursor);
        self.input.replace_range(start..self.cursor, &value);
        self.cursor = start + value.len();
        self.input.insert(self.cursor, ' ');
        self.cursor += 1;
        self.refresh_suggestions();
    }

    fn open_history(&mut self) {
        self.history_query.clear();
        self.history_results = self.history.all();
        self.history_selected = 0;
        self.mode = Mode::History;
    }

    fn submit(&mut self) {
        let line = self.input.trim().to_string();
        if line.is_empty() || self.running.is_some() {
            return;
        }

        let parsed = purr_exec::parse(&line);
        if !parsed.is_valid && !parsed.is_shell() {
            return;
        }

        if self.config.general.confirm_destructive && purr_exec::is_destructive(&line) {
            self.pending_confirm = Some(line);
            self.mode = Mode::Confirming;
            return;
        }

        self.execute(line);
    }

    fn execute(&mut self, line: String) {
        self.running = Some(line.clone());
        self.suggestions.clear();

        let executor = self.executor.clone();
        let tx = self.events.sender();
        tokio::spawn(async move {
            let result = executor.run(&line).await;
            let _ = tx.send(AppEvent::ExecDone { command: line, result });
        });
    }

    fn finish_execution(&mut self, command: String, result: ExecuteResult) {
        self.running = None;
        if let Err(e) = self.history.record(&command, result.success(), &self.context_name, &self.namespace) {
            warn!(error = %e, "could not persist history");
        }
        self.input.clear();
        self.cursor = 0;
        self.suggestions.clear();
        self.output = Some((command, result));
        self.output_scroll = 0;
        self.mode = Mode::Output;
    }
}

/// Token under the cursor, from the last whitespace up to the cursor.
fn current_word(line: &str, cursor: usize) -> &str {
    &line[word_start(line, cursor)..cursor.min(line.len())]
}

fn word_start(line: &str, cursor: usize) -> usize {
    let upto = &line[..cursor.min(line.len())];
    upto.rfind(char::is_whitespace).map(|i| i + 1).unwrap_or(0)
}

fn prev_char_boundary(s: &str, mut i: usize) -> usize {
    i = i.saturating_sub(1);
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn next_char_boundary(s: &str, mut i: usize) -> usize {
    i += 1;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i.min(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_word_tracks_cursor() {
        assert_eq!(current_word("get pods", 8), "pods");
        assert_eq!(current_word("get pods", 3), "get");
        assert_eq!(current_word("get pods ", 9), "");
        assert_eq!(current_word("", 0), "");
    }

    #[test]
    fn word_start_after_whitespace() {
        assert_eq!(word_start("get pods", 8), 4);
        assert_eq!(word_start("get", 3), 0);
        assert_eq!(word_start("get pods -n ", 12), 12);
    }

    #[test]
    fn char_boundaries_handle_multibyte() {
        let s = "aé b";
        let end_of_e = 1 + 'é'.len_utf8();
        assert_eq!(prev_char_boundary(s, end_of_e), 1);
        assert_eq!(next_char_boundary(s, 1), end_of_e);
        assert_eq!(next_char_boundary(s, s.len()), s.len());
        assert_eq!(prev_char_boundary(s, 1), 0);
    }

    #[test]
    fn mode_labels() {
        assert_eq!(Mode::Typing.label(), "typing");
        assert_eq!(Mode::Confirming.label(), "confirm");
        assert_eq!(Mode::History.label(), "history");
        assert_eq!(Mode::Output.label(), "output");
        assert_eq!(Mode::Error.label(), "error");
    }
}
