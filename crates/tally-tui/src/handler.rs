use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tally_core::SectionId;

use crate::app::{App, Mode};
use crate::tui::AppEvent;

/// Rows moved per mouse wheel notch.
const WHEEL_STEP: i64 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick(),
        AppEvent::Reply(outcome) => app.receive_reply(outcome),
    }

    if app.chat.take_scroll_to_bottom() {
        app.scroll_chat_to_bottom();
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.mode {
        Mode::Page => handle_page_key(app, key),
        Mode::Chat => handle_chat_key(app, key),
    }
}

fn handle_page_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Scrolling
        KeyCode::Char('j') | KeyCode::Down => app.scroll_page_by(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_page_by(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => {
            let step = app.half_page();
            app.scroll_page_by(step);
        }
        KeyCode::PageUp => {
            let step = app.half_page();
            app.scroll_page_by(-step);
        }
        KeyCode::Char('g') | KeyCode::Home => app.scroll_page_to(0),
        KeyCode::Char('G') | KeyCode::End => {
            let bottom = app.max_page_scroll();
            app.scroll_page_to(bottom);
        }

        // Nav links and call-to-action buttons
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            if let Some(&id) = SectionId::all().get(index) {
                app.jump_to_section(id);
            }
        }
        KeyCode::Char('b') => app.jump_to_section(SectionId::Contact),

        KeyCode::Char('a') | KeyCode::Char('?') => app.open_chat(),
        _ => {}
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_chat(),
        KeyCode::Enter => app.submit_chat(),
        KeyCode::Char(c) => app.insert_char(c),
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Up => app.chat_scroll_by(-1),
        KeyCode::Down => app.chat_scroll_by(1),
        KeyCode::PageUp => app.chat_scroll_by(-(app.chat_height.max(1) as i32)),
        KeyCode::PageDown => app.chat_scroll_by(app.chat_height.max(1) as i32),
        _ => {}
    }
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    // The chat panel floats above the page, so it wins hit-testing while open
    let in_chat = app.mode == Mode::Chat
        && app.chat_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_page = app.page_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let on_launcher = app.launcher_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if in_chat {
                app.chat_scroll_by(WHEEL_STEP as i32);
            } else if in_page {
                app.scroll_page_by(WHEEL_STEP);
            }
        }
        MouseEventKind::ScrollUp => {
            if in_chat {
                app.chat_scroll_by(-(WHEEL_STEP as i32));
            } else if in_page {
                app.scroll_page_by(-WHEEL_STEP);
            }
        }
        MouseEventKind::Down(MouseButton::Left) if on_launcher => app.toggle_chat(),
        _ => {}
    }
}
