mod hero;
mod services;
mod splash;
mod status_bar;
mod track;

pub use hero::HeroWidget;
pub use services::ServicesWidget;
pub use splash::SplashWidget;
pub use status_bar::StatusBarWidget;
pub use track::TrackWidget;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::{App, Screen};

/// Areas of the showcase view, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowcaseLayout {
    pub hero: Rect,
    pub services: Rect,
    pub gallery: Rect,
    pub reviews: Rect,
    pub status: Rect,
}

impl ShowcaseLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // Hero
                Constraint::Length(5), // Services
                Constraint::Length(4), // Gallery
                Constraint::Length(4), // Reviews
                Constraint::Length(1), // Status bar
            ])
            .split(area);
        Self {
            hero: rows[0],
            services: rows[1],
            gallery: rows[2],
            reviews: rows[3],
            status: rows[4],
        }
    }
}

/// Draw the whole screen from the current motion frames
pub fn render(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    if app.viewport != size {
        app.resize(size.width, size.height);
    }

    let layout = ShowcaseLayout::new(size);
    let item_width = app.config.carousel.item_width;
    let copies = app.config.carousel.copies;
    let content = &app.config.content;

    HeroWidget::render(
        frame,
        layout.hero,
        app.reflection.as_ref().map(|band| band.frame()),
        app.depth_frame(),
        &app.theme,
    );
    ServicesWidget::render(
        frame,
        layout.services,
        &content.services,
        &app.services.frame(),
        &app.reveal.frame(),
        app.services_focused,
        &app.theme,
    );
    TrackWidget::new("Gallery", &content.gallery, item_width, copies).render(
        frame,
        layout.gallery,
        &app.gallery.frame(),
        &app.theme,
    );
    TrackWidget::new("Reviews", &content.reviews, item_width, copies).render(
        frame,
        layout.reviews,
        &app.reviews.frame(),
        &app.theme,
    );
    StatusBarWidget::render(frame, layout.status, app);

    // Overlay on top while the splash is still playing
    if app.screen() == Screen::Splash {
        if let Some(splash) = app.splash() {
            SplashWidget::render(frame, size, &splash.frame(), &content.services, &app.theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::input::Action;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_layout_stacks_sections() {
        let layout = ShowcaseLayout::new(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.status, Rect::new(0, 39, 100, 1));
        assert_eq!(layout.reviews.height, 4);
        assert_eq!(layout.gallery.y + layout.gallery.height, layout.reviews.y);
        assert_eq!(layout.hero.y, 0);
        assert!(layout.hero.height >= 5);
    }

    #[test]
    fn test_showcase_renders_every_section() {
        let (mut app, _clock) = test_app(true);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal.draw(|frame| render(frame, &mut app)).expect("draw");

        let text = screen_text(&terminal);
        assert!(text.contains("Services"));
        assert!(text.contains("Gallery"));
        assert!(text.contains("Reviews"));
        assert!(text.contains("SHOWCASE"));
        assert_eq!(app.viewport, Rect::new(0, 0, 100, 30));
    }

    #[test]
    fn test_splash_overlay_hides_showcase() {
        let (mut app, clock) = test_app(false);
        clock.advance_to(0.0);
        clock.advance_to(300.0);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal.draw(|frame| render(frame, &mut app)).expect("draw");

        let text = screen_text(&terminal);
        assert!(!text.contains("Gallery"));

        app.apply(Action::SkipSplash).expect("skip");
        terminal.draw(|frame| render(frame, &mut app)).expect("draw");
        assert!(screen_text(&terminal).contains("Gallery"));
    }
}
