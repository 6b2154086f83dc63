use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Screen};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let screen_str = match app.screen() {
            Screen::Splash => "SPLASH",
            Screen::Showcase => "SHOWCASE",
        };
        let motion_str = if app.preference.prefers_reduced() {
            "motion: reduced"
        } else {
            "motion: full"
        };
        let gallery_str = if app.gallery_gate.is_paused() {
            "gallery: paused"
        } else {
            "gallery: playing"
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {} | {}", screen_str, msg)
        } else {
            format!(
                " {} | {} | {} | scroll: {:.0}",
                screen_str, motion_str, gallery_str, app.scroll_y
            )
        };

        let help_hint = " q:quit space:pause j/k:scroll h:hover m:motion r:replay ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.chars().count() + help_hint.len());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey1).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
