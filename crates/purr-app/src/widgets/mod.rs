mod confirm;
mod history;
mod input;
mod output;
mod status_bar;
mod suggestions;

pub use confirm::ConfirmDialogWidget;
pub use history::HistoryOverlayWidget;
pub use input::InputLineWidget;
pub use output::OutputViewWidget;
pub use status_bar::{CacheStatus, StatusBarWidget};
pub use suggestions::SuggestionPopupWidget;

#[cfg(test)]
pub(crate) fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let mut out = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
