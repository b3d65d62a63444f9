use std::collections::BTreeMap;
use std::sync::Arc;

use ratatui::layout::Rect;
use tally_core::{
    ChatWidget, CompletionClient, FirmProfile, IntersectionObserver, RevealThreshold, SectionId,
    Settings, Viewport,
};
use tokio::sync::mpsc;
use tracing::info;

use crate::page::{self, wrap_to_width, PageLayout};
use crate::tui::AppEvent;

/// Rows trimmed off the bottom of the viewport before a section counts as
/// on screen.
const REVEAL_BOTTOM_MARGIN: u32 = 2;

/// Ticks a section takes to fade in once revealed.
pub const FADE_TICKS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Page,
    Chat,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub mode: Mode,
    pub profile: &'static FirmProfile,
    pub provider_name: &'static str,

    // Page state
    pub layout: PageLayout,
    pub page_scroll: u32,
    pub page_height: u16,
    pub observer: IntersectionObserver<SectionId>,
    pub fade: BTreeMap<SectionId, u8>,

    // Chat state
    pub chat: ChatWidget,
    pub chat_input: String,
    pub chat_cursor: usize, // cursor position in chat_input, in chars
    pub chat_scroll: u16,
    pub chat_height: u16, // Inner height of the transcript pane
    pub chat_width: u16,  // Inner width of the transcript pane
    pub client: Arc<dyn CompletionClient>,
    pub events: mpsc::UnboundedSender<AppEvent>,

    // Animation state
    pub animation_frame: u8, // 0-2 for the typing indicator

    // Panel areas for mouse hit-testing (updated during render)
    pub page_area: Option<Rect>,
    pub chat_area: Option<Rect>,
    pub launcher_area: Option<Rect>,
}

impl App {
    pub fn new(
        settings: &Settings,
        client: Arc<dyn CompletionClient>,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let mut observer = IntersectionObserver::new();
        for id in SectionId::all() {
            observer.observe(id, RevealThreshold::DEFAULT);
        }

        Self {
            should_quit: false,
            mode: Mode::Page,
            profile: settings.profile,
            provider_name: settings.provider.display_name(),

            layout: PageLayout::default(),
            page_scroll: 0,
            page_height: 0,
            observer,
            fade: BTreeMap::new(),

            chat: ChatWidget::from_settings(settings),
            chat_input: String::new(),
            chat_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            client,
            events,

            animation_frame: 0,

            page_area: None,
            chat_area: None,
            launcher_area: None,
        }
    }

    /// Fit the page to the body area: relayout on width change, clamp the
    /// scroll offset, and sample section visibility.
    pub fn set_page_area(&mut self, area: Rect) {
        if self.layout.width != area.width || self.layout.lines.is_empty() {
            self.layout = page::build(self.profile, area.width);
        }
        self.page_height = area.height;
        self.page_area = Some(area);
        self.page_scroll = self.page_scroll.min(self.max_page_scroll());
        self.update_reveals();
    }

    pub fn max_page_scroll(&self) -> u32 {
        self.layout
            .total_lines()
            .saturating_sub(self.page_height as u32)
    }

    pub fn update_reveals(&mut self) {
        if self.observer.observed_count() == 0 {
            return;
        }
        if self.layout.lines.is_empty() || self.page_height == 0 {
            return;
        }
        let viewport = Viewport::new(self.page_scroll, self.page_height as u32)
            .with_bottom_margin(REVEAL_BOTTOM_MARGIN);
        let layout = &self.layout;
        for id in self.observer.update(viewport, |id| layout.span_of(id)) {
            self.fade.insert(id, 0);
        }
    }

    /// 0.0 for a hidden section, rising to 1.0 as its fade completes.
    pub fn reveal_progress(&self, id: SectionId) -> f32 {
        if !self.observer.is_visible(id) {
            return 0.0;
        }
        let ticks = self.fade.get(&id).copied().unwrap_or(FADE_TICKS);
        ticks.min(FADE_TICKS) as f32 / FADE_TICKS as f32
    }

    /// Release the reveal observer before the page goes away.
    pub fn shutdown(&mut self) {
        let pending = self.observer.observed_count();
        self.observer.disconnect();
        info!(pending, "reveal observer disconnected");
    }

    // Page scrolling
    pub fn scroll_page_by(&mut self, delta: i64) {
        let target = (self.page_scroll as i64 + delta).clamp(0, self.max_page_scroll() as i64);
        self.page_scroll = target as u32;
        self.update_reveals();
    }

    pub fn scroll_page_to(&mut self, row: u32) {
        self.page_scroll = row.min(self.max_page_scroll());
        self.update_reveals();
    }

    pub fn half_page(&self) -> i64 {
        (self.page_height / 2).max(1) as i64
    }

    pub fn jump_to_section(&mut self, id: SectionId) {
        if let Some(span) = self.layout.span_of(id) {
            self.scroll_page_to(span.top);
        }
    }

    /// Section at the top of the viewport, for the nav highlight.
    pub fn current_section(&self) -> Option<SectionId> {
        self.layout.section_at(self.page_scroll)
    }

    pub fn tick(&mut self) {
        for ticks in self.fade.values_mut() {
            if *ticks < FADE_TICKS {
                *ticks += 1;
            }
        }
        if self.chat.is_sending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Chat
    pub fn open_chat(&mut self) {
        self.mode = Mode::Chat;
        self.chat_cursor = self.chat_input.chars().count();
        self.scroll_chat_to_bottom();
    }

    pub fn close_chat(&mut self) {
        self.mode = Mode::Page;
    }

    pub fn toggle_chat(&mut self) {
        match self.mode {
            Mode::Page => self.open_chat(),
            Mode::Chat => self.close_chat(),
        }
    }

    /// Send the input box's text. The box is cleared only when the widget
    /// accepts the text; the reply comes back as `AppEvent::Reply`.
    pub fn submit_chat(&mut self) {
        let Some(request) = self.chat.submit(&self.chat_input) else {
            return;
        };
        self.chat_input.clear();
        self.chat_cursor = 0;
        self.animation_frame = 0;

        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = client.complete(&request).await;
            if events.send(AppEvent::Reply(outcome)).is_err() {
                info!("chat reply dropped, UI already closed");
            }
        });
    }

    pub fn receive_reply(&mut self, outcome: anyhow::Result<String>) {
        self.chat.resolve(outcome);
    }

    pub fn chat_scroll_by(&mut self, delta: i32) {
        let max = self.chat_line_count().saturating_sub(self.chat_height);
        let target = (self.chat_scroll as i32 + delta).clamp(0, max as i32);
        self.chat_scroll = target as u16;
    }

    /// Column budget the transcript is wrapped to. Before the first render
    /// the pane size is unknown, so assume a typical panel width.
    pub fn chat_wrap_width(&self) -> usize {
        if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            40
        }
    }

    /// Number of rows the transcript occupies at the current pane width,
    /// including the typing indicator.
    pub fn chat_line_count(&self) -> u16 {
        let wrap_width = self.chat_wrap_width();

        let mut total_lines: usize = 0;
        if self.chat.transcript().is_empty() {
            total_lines += wrap_to_width(self.profile.assistant.greeting, wrap_width).len() + 1;
        }
        for msg in self.chat.transcript() {
            total_lines += 1; // Role line
            for line in msg.content.lines() {
                total_lines += wrap_to_width(line, wrap_width).len();
            }
            total_lines += 1; // Blank line after message
        }
        if self.chat.is_sending() {
            total_lines += 2; // Role line + "Typing..."
        }
        total_lines.min(u16::MAX as usize) as u16
    }

    /// Pin the transcript to its newest row.
    pub fn scroll_chat_to_bottom(&mut self) {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            10
        };
        self.chat_scroll = self.chat_line_count().saturating_sub(visible_height);
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = cursor_byte_offset(&self.chat_input, self.chat_cursor);
        self.chat_input.insert(byte_pos, c);
        self.chat_cursor += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.chat_cursor > 0 {
            self.chat_cursor -= 1;
            let byte_pos = cursor_byte_offset(&self.chat_input, self.chat_cursor);
            self.chat_input.remove(byte_pos);
        }
    }

    pub fn delete_at_cursor(&mut self) {
        if self.chat_cursor < self.chat_input.chars().count() {
            let byte_pos = cursor_byte_offset(&self.chat_input, self.chat_cursor);
            self.chat_input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.chat_cursor = self.chat_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.chat_cursor = (self.chat_cursor + 1).min(self.chat_input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.chat_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.chat_cursor = self.chat_input.chars().count();
    }
}

/// Byte offset of the `chars`-th character of `input`, or its length when
/// the cursor sits past the end.
fn cursor_byte_offset(input: &str, chars: usize) -> usize {
    input.chars().take(chars).map(char::len_utf8).sum()
}
