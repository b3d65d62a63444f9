use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tally_core::{ChatRole, SectionId};

use crate::app::{App, Mode};
use crate::page::{rgb, wrap_to_width};

/// Fade progress below which a revealed section is still drawn dimmed.
const FADE_DIM_BELOW: f32 = 1.0;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    app.set_page_area(body_area);

    render_header(app, frame, header_area);
    render_page(app, frame, body_area);
    render_footer(app, frame, footer_area);

    match app.mode {
        Mode::Page => {
            app.chat_area = None;
            render_launcher(app, frame, body_area);
        }
        Mode::Chat => {
            app.launcher_area = None;
            render_chat(app, frame, body_area);
        }
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let accent = rgb(app.profile.palette.accent);
    let current = app.current_section();

    let mut spans = vec![
        Span::styled(
            format!(" [{}] ", app.profile.monogram),
            Style::default().fg(Color::White).bg(accent).bold(),
        ),
        Span::styled(
            format!(" {} ", app.profile.name),
            Style::default().fg(Color::White).bold(),
        ),
        Span::raw("  "),
    ];

    for (i, id) in SectionId::all().into_iter().enumerate() {
        let style = if current == Some(id) {
            Style::default().fg(accent).bg(Color::Black).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, id.nav_label()), style));
    }
    spans.push(Span::styled(
        format!("  v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::Gray),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.mode {
        Mode::Page => (" PAGE ", Style::default().bg(Color::Blue).fg(Color::White)),
        Mode::Chat => (" CHAT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match app.mode {
        Mode::Page => vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" 1-4 ", key_style),
            Span::styled(" jump ", label_style),
            Span::styled(" b ", key_style),
            Span::styled(" book ", label_style),
            Span::styled(" a ", key_style),
            Span::styled(" assistant ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        Mode::Chat => {
            let mut hints = if app.chat.is_sending() {
                vec![Span::styled(" waiting for reply ", label_style.italic())]
            } else {
                vec![
                    Span::styled(" Enter ", key_style),
                    Span::styled(" send ", label_style),
                ]
            };
            hints.extend(vec![
                Span::styled(" ↑/↓ ", key_style),
                Span::styled(" scroll ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" close ", label_style),
            ]);
            hints
        }
    };

    let status = Span::styled(
        format!(" {}: {} ", app.provider_name, app.chat.model()),
        Style::default().bg(Color::Black).fg(Color::DarkGray),
    );

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .chain(std::iter::once(status))
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

/// Visible slice of the page. Rows of sections that have not been revealed
/// yet stay blank; freshly revealed ones are drawn dim until their fade ends.
fn render_page(app: &App, frame: &mut Frame, area: Rect) {
    let start = app.page_scroll as usize;
    let end = (start + area.height as usize).min(app.layout.lines.len());

    let lines: Vec<Line> = (start..end)
        .map(|row| {
            let line = &app.layout.lines[row];
            match app.layout.section_at(row as u32) {
                Some(id) if !app.observer.is_visible(id) => Line::default(),
                Some(id) if app.reveal_progress(id) < FADE_DIM_BELOW => line
                    .clone()
                    .patch_style(Style::default().add_modifier(Modifier::DIM)),
                _ => line.clone(),
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn render_launcher(app: &mut App, frame: &mut Frame, area: Rect) {
    let label = format!(" {} ", app.profile.assistant.title);
    let width = (label.chars().count() as u16 + 2).min(area.width);
    let height = 3.min(area.height);
    let launcher = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + area.height.saturating_sub(height),
        width,
        height,
    );
    app.launcher_area = Some(launcher);

    let accent = rgb(app.profile.palette.accent);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    let button = Paragraph::new(Span::styled(label, Style::default().fg(accent).bold())).block(block);

    frame.render_widget(Clear, launcher);
    frame.render_widget(button, launcher);
}

/// Transcript rows, wrapped to `width`. Must stay in step with
/// `App::chat_line_count`.
fn chat_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let accent = rgb(app.profile.palette.accent);
    let assistant = &app.profile.assistant;
    let mut lines = Vec::new();

    if app.chat.transcript().is_empty() {
        for chunk in wrap_to_width(assistant.greeting, width) {
            lines.push(Line::from(Span::styled(
                chunk,
                Style::default().fg(Color::DarkGray).italic(),
            )));
        }
        lines.push(Line::default());
    }

    for msg in app.chat.transcript() {
        let (label, label_style, body_style) = match msg.role {
            ChatRole::User => (
                format!("{}:", msg.role.label()),
                Style::default().fg(Color::Cyan).bold(),
                Style::default().fg(Color::Cyan),
            ),
            ChatRole::Assistant => (
                format!("{}:", assistant.title),
                Style::default().fg(accent).bold(),
                Style::default(),
            ),
        };
        lines.push(Line::from(Span::styled(label, label_style)));
        for line in msg.content.lines() {
            for chunk in wrap_to_width(line, width) {
                lines.push(Line::from(Span::styled(chunk, body_style)));
            }
        }
        lines.push(Line::default());
    }

    if app.chat.is_sending() {
        lines.push(Line::from(Span::styled(
            format!("{}:", assistant.title),
            Style::default().fg(accent).bold(),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Typing{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let profile = app.profile;
    let assistant = &profile.assistant;
    let accent = rgb(profile.palette.accent);

    // Floating panel anchored bottom-right over the page
    let panel_width = 56.min(area.width.saturating_sub(2));
    let panel_height = 24.min(area.height);
    let panel = Rect::new(
        area.x + area.width.saturating_sub(panel_width + 1),
        area.y + area.height.saturating_sub(panel_height),
        panel_width,
        panel_height,
    );
    app.chat_area = Some(panel);
    frame.render_widget(Clear, panel);

    let [transcript_area, input_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(panel);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    let inner_width = transcript_area.width.saturating_sub(2);
    let inner_height = transcript_area.height.saturating_sub(2);
    if app.chat_width != inner_width || app.chat_height != inner_height {
        app.chat_width = inner_width;
        app.chat_height = inner_height;
        app.scroll_chat_to_bottom();
    }

    let transcript_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Line::from(vec![
            Span::styled(format!(" {} ", assistant.title), Style::default().fg(accent).bold()),
            Span::styled(format!("{} ", assistant.subtitle), Style::default().fg(Color::DarkGray)),
        ]));

    let transcript = Paragraph::new(Text::from(chat_lines(app, app.chat_wrap_width())))
        .block(transcript_block)
        .scroll((app.chat_scroll, 0));
    frame.render_widget(transcript, transcript_area);

    // Input box; the send hint greys out while a reply is pending
    let sending = app.chat.is_sending();
    let send_style = if sending || app.chat_input.trim().is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(accent).bold()
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if sending { Color::DarkGray } else { Color::Yellow }))
        .title_bottom(Line::from(Span::styled(" Send ⏎ ", send_style)).right_aligned());

    // Calculate visible portion of input with horizontal scrolling
    let field_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.chat_cursor;
    let scroll_offset = if field_width == 0 {
        0
    } else if cursor_pos >= field_width {
        cursor_pos - field_width + 1
    } else {
        0
    };

    let input = if app.chat_input.is_empty() {
        Paragraph::new(Span::styled(
            assistant.input_placeholder,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let visible_text: String = app
            .chat_input
            .chars()
            .skip(scroll_offset)
            .take(field_width)
            .collect();
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };
    frame.render_widget(input.block(input_block), input_area);

    let cursor_x = (cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
}
