//! Terminal Host - Runs the shell in a terminal
//!
//! `TerminalHost` owns the terminal session: raw mode, the alternate
//! screen and mouse capture are switched on when it is created and
//! restored when it is dropped. `run` is the event loop:
//!
//! ```text
//! poll → HostEvent → HostState::handle → (click | key-up | notify) → redraw
//! ```
//!
//! Everything between the event and the frame lives in `HostState`, which
//! does not touch the terminal.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use crate::config::HostConfig;
use crate::engine::{App, DisplayState};
use crate::error::Result;
use crate::types::{Props, WatchButton};

use super::hit_grid::HitGrid;
use super::input::{poll_event, HostEvent};
use super::layout::{compute_watch_layout, Region, WatchLayout, WatchMetrics};
use super::markup::render_text;

// =============================================================================
// HOST STATE
// =============================================================================

/// What the loop does after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Redraw,
    Idle,
    Quit,
}

/// Layout and hit testing for the current terminal size.
#[derive(Debug, Clone)]
pub struct HostState {
    metrics: WatchMetrics,
    layout: WatchLayout,
    grid: HitGrid,
}

impl HostState {
    pub fn new(width: u16, height: u16, metrics: WatchMetrics) -> Result<Self> {
        let layout = compute_watch_layout(width, height, &metrics)?;
        Ok(Self {
            metrics,
            grid: HitGrid::from_layout(&layout),
            layout,
        })
    }

    pub fn layout(&self) -> &WatchLayout {
        &self.layout
    }

    pub fn grid(&self) -> &HitGrid {
        &self.grid
    }

    /// Recompute the layout for a new terminal size.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.layout = compute_watch_layout(width, height, &self.metrics)?;
        self.grid.fill_layout(&self.layout);
        tracing::debug!(width, height, "host resized");
        Ok(())
    }

    /// Apply one host event to the app.
    pub fn handle(&mut self, event: &HostEvent, app: &App) -> Result<Control> {
        let control = match event {
            HostEvent::Key(key) => {
                app.elements().body.key_up(key.clone());
                Control::Redraw
            }
            HostEvent::Click { x, y } => match self.grid.hit_test(*x, *y) {
                Some(button) => {
                    self.press(button, app);
                    Control::Redraw
                }
                None => Control::Idle,
            },
            HostEvent::Resize(width, height) => {
                self.resize(*width, *height)?;
                Control::Redraw
            }
            HostEvent::TriggerNotification => {
                let form = app.notification_form();
                match form.kinds().next() {
                    Some(kind) => {
                        form.trigger(kind, None);
                        Control::Redraw
                    }
                    None => {
                        tracing::warn!("no notification kinds configured");
                        Control::Idle
                    }
                }
            }
            HostEvent::DismissNotification => {
                app.notification_form().dismiss();
                Control::Redraw
            }
            HostEvent::Quit => Control::Quit,
            HostEvent::Ignored => Control::Idle,
        };
        Ok(control)
    }

    /// Click the element behind a button. The overlay covers the face while
    /// a notification is shown.
    fn press(&self, button: WatchButton, app: &App) {
        let elements = app.elements();
        if button == WatchButton::Face && app.display_state() == DisplayState::NotificationVisible {
            elements.notification_container.click();
        } else {
            elements.button(button).click();
        }
    }

    /// Compose the full frame as terminal rows.
    pub fn compose(&self, app: &App) -> Vec<String> {
        let width = self.layout.width as usize;
        let height = self.layout.height as usize;
        let mut canvas = vec![vec![' '; width]; height];

        let elements = app.elements();
        let markup = match app.display_state() {
            DisplayState::NotificationVisible => elements.notification_container.inner_html(),
            DisplayState::PageVisible => elements.watch_face.inner_html(),
        };

        draw_border(&mut canvas, &self.layout.face);
        let inner_width = self.layout.face.width.saturating_sub(2);
        let inner_height = self.layout.face.height.saturating_sub(2) as usize;
        for (i, line) in render_text(&markup, inner_width).iter().take(inner_height).enumerate() {
            put(&mut canvas, self.layout.face.x + 1, self.layout.face.y + 1 + i as u16, line);
        }

        draw_button(&mut canvas, &self.layout.top, "▲");
        draw_button(&mut canvas, &self.layout.bottom, "▼");
        draw_button(&mut canvas, &self.layout.left, "◀");
        draw_button(&mut canvas, &self.layout.right, "▶");

        if height > 0 {
            let status = format!(
                " #{}  n notify  x dismiss  q quit",
                app.current_route().unwrap_or_default()
            );
            put(&mut canvas, 0, (height - 1) as u16, &status);
        }

        canvas.into_iter().map(|row| row.into_iter().collect()).collect()
    }
}

fn put(canvas: &mut [Vec<char>], x: u16, y: u16, text: &str) {
    let Some(row) = canvas.get_mut(y as usize) else {
        return;
    };
    for (i, c) in text.chars().enumerate() {
        match row.get_mut(x as usize + i) {
            Some(cell) => *cell = c,
            None => break,
        }
    }
}

fn draw_border(canvas: &mut [Vec<char>], region: &Region) {
    if region.width < 2 || region.height < 2 {
        return;
    }
    let inner = "─".repeat(region.width as usize - 2);
    put(canvas, region.x, region.y, &format!("╭{inner}╮"));
    put(canvas, region.x, region.y + region.height - 1, &format!("╰{inner}╯"));
    for dy in 1..region.height - 1 {
        put(canvas, region.x, region.y + dy, "│");
        put(canvas, region.x + region.width - 1, region.y + dy, "│");
    }
}

fn draw_button(canvas: &mut [Vec<char>], region: &Region, glyph: &str) {
    if region.width < 3 || region.height == 0 {
        return;
    }
    let label = format!("[{glyph}]");
    let x = region.x + (region.width - 3) / 2;
    let y = region.y + region.height / 2;
    put(canvas, x, y, &label);
}

// =============================================================================
// TERMINAL HOST
// =============================================================================

/// Terminal session running the shell.
pub struct TerminalHost {
    out: Stdout,
    state: HostState,
    active: bool,
}

impl TerminalHost {
    /// Take over the terminal.
    pub fn enter(metrics: WatchMetrics) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let state = HostState::new(width, height, metrics)?;

        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, EnableMouseCapture, Hide)?;
        tracing::debug!(width, height, "terminal host entered");

        Ok(Self {
            out,
            state,
            active: true,
        })
    }

    pub fn state(&self) -> &HostState {
        &self.state
    }

    /// Navigate to the configured start page and process events until quit.
    pub fn run(&mut self, app: &App, config: &HostConfig) -> Result<()> {
        let timeout = Duration::from_millis(config.poll_ms);

        app.navigate(&config.initial_path, Props::new());
        self.draw(app)?;

        loop {
            let Some(event) = poll_event(timeout)? else {
                continue;
            };
            match self.state.handle(&event, app)? {
                Control::Redraw => self.draw(app)?,
                Control::Idle => {}
                Control::Quit => break,
            }
        }

        tracing::debug!("terminal host loop finished");
        Ok(())
    }

    /// Write the current frame.
    pub fn draw(&mut self, app: &App) -> Result<()> {
        let frame = self.state.compose(app);
        queue!(self.out, Clear(ClearType::All))?;
        for (y, row) in frame.iter().enumerate() {
            queue!(self.out, MoveTo(0, y as u16), Print(row))?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Give the terminal back. Called on drop if not called before.
    pub fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.out, Show, DisableMouseCapture, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        if let Err(error) = self.leave() {
            tracing::warn!(%error, "failed to restore terminal");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::WatchDocument;
    use crate::notification::{hub, NotificationSpec};
    use crate::page::{Page, PageProps, PageType};
    use crate::router::RouteTable;
    use crate::types::KeyEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    thread_local! {
        static PRESSES: RefCell<Vec<WatchButton>> = const { RefCell::new(Vec::new()) };
    }

    struct Clock;
    impl Page for Clock {
        fn template(&self) -> String {
            "<div><h1>12:00</h1><p>Monday</p></div>".to_string()
        }
        fn left_button_event(&mut self) {
            PRESSES.with(|p| p.borrow_mut().push(WatchButton::Left));
        }
        fn face_button_event(&mut self) {
            PRESSES.with(|p| p.borrow_mut().push(WatchButton::Face));
        }
    }
    impl PageType for Clock {
        fn create(_: PageProps) -> Self {
            Clock
        }
    }

    fn setup() -> (WatchDocument, App, HostState) {
        hub::reset();
        PRESSES.with(|p| p.borrow_mut().clear());
        let doc = WatchDocument::default();
        let specs = vec![NotificationSpec::new("message", "New message", "Hi")];
        let app = App::new(RouteTable::new().route::<Clock>("/"), specs, &doc).unwrap();
        app.navigate("/", Props::new());
        let state = HostState::new(80, 24, WatchMetrics::default()).unwrap();
        (doc, app, state)
    }

    fn presses() -> Vec<WatchButton> {
        PRESSES.with(|p| p.borrow().clone())
    }

    #[test]
    fn test_click_hits_button() {
        let (_doc, app, mut state) = setup();
        let left = *state.layout().region(WatchButton::Left);

        let control = state
            .handle(&HostEvent::Click { x: left.x, y: left.y }, &app)
            .unwrap();
        assert_eq!(control, Control::Redraw);
        assert_eq!(presses(), vec![WatchButton::Left]);

        let control = state.handle(&HostEvent::Click { x: 0, y: 0 }, &app).unwrap();
        assert_eq!(control, Control::Idle);
    }

    #[test]
    fn test_key_reaches_page() {
        let (_doc, app, mut state) = setup();
        state.handle(&HostEvent::Key(KeyEvent::new(32)), &app).unwrap();
        assert_eq!(presses(), vec![WatchButton::Face]);
    }

    #[test]
    fn test_notify_and_dismiss() {
        let (_doc, app, mut state) = setup();

        state.handle(&HostEvent::TriggerNotification, &app).unwrap();
        assert_eq!(app.display_state(), DisplayState::NotificationVisible);
        let frame = state.compose(&app).join("\n");
        assert!(frame.contains("New message"));

        // Face clicks land on the overlay, which is bound to the face handler.
        let face = *state.layout().region(WatchButton::Face);
        state.handle(&HostEvent::Click { x: face.x + 1, y: face.y + 1 }, &app).unwrap();
        assert_eq!(presses(), vec![WatchButton::Face]);

        state.handle(&HostEvent::DismissNotification, &app).unwrap();
        assert_eq!(app.display_state(), DisplayState::PageVisible);
        assert!(state.compose(&app).join("\n").contains("12:00"));
    }

    #[test]
    fn test_compose_frame() {
        let (_doc, app, state) = setup();
        let frame = state.compose(&app);

        assert_eq!(frame.len(), 24);
        let face = state.layout().face;
        assert!(frame[face.y as usize + 1].contains("12:00"));
        assert!(frame[face.y as usize + 2].contains("Monday"));
        assert!(frame[23].contains("#/"));
    }

    #[test]
    fn test_resize_and_quit() {
        let (_doc, app, mut state) = setup();
        assert_eq!(state.handle(&HostEvent::Resize(100, 40), &app).unwrap(), Control::Redraw);
        assert_eq!(state.layout().width, 100);
        assert_eq!(state.grid().width(), 100);
        let face = state.layout().face;
        assert_eq!(state.grid().hit_test(face.x, face.y), Some(WatchButton::Face));
        assert_eq!(state.handle(&HostEvent::Quit, &app).unwrap(), Control::Quit);
        assert_eq!(state.handle(&HostEvent::Ignored, &app).unwrap(), Control::Idle);
    }

    #[test]
    fn test_trigger_without_kinds_is_idle() {
        hub::reset();
        let doc = WatchDocument::default();
        let app = App::new(RouteTable::new().route::<Clock>("/"), vec![], &doc).unwrap();
        let mut state = HostState::new(80, 24, WatchMetrics::default()).unwrap();
        let seen = Rc::new(RefCell::new(0));
        let s = seen.clone();
        let _cleanup = hub::on_show(move |_| *s.borrow_mut() += 1);

        assert_eq!(
            state.handle(&HostEvent::TriggerNotification, &app).unwrap(),
            Control::Idle
        );
        assert_eq!(*seen.borrow(), 0);
    }
}
