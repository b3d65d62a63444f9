//! Page layout: turns a firm profile into wrapped, styled rows and records
//! where each section sits so the reveal observer can sample it.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use tally_core::{FirmProfile, RowSpan, SectionId};

/// Left/right padding in columns.
const MARGIN: usize = 2;

pub fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Greedy word wrap to `width` columns. A token wider than a whole row (a
/// long URL, say) is cut into row-sized pieces so nothing runs off the edge.
/// Always yields at least one row.
pub fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut rows: Vec<String> = Vec::new();
    let mut row = String::new();
    let mut row_cols = 0;

    for word in text.split_whitespace() {
        let mut rest = word;
        while !rest.is_empty() {
            let rest_cols = rest.chars().count();
            let gap = usize::from(row_cols > 0);

            if row_cols + gap + rest_cols <= width {
                if gap == 1 {
                    row.push(' ');
                }
                row.push_str(rest);
                row_cols += gap + rest_cols;
                break;
            }
            if row_cols > 0 {
                rows.push(std::mem::take(&mut row));
                row_cols = 0;
                continue;
            }

            // Empty row and the token still does not fit: hard split.
            let cut = rest
                .char_indices()
                .nth(width)
                .map_or(rest.len(), |(at, _)| at);
            rows.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }
    }

    if row_cols > 0 || rows.is_empty() {
        rows.push(row);
    }
    rows
}

/// The whole page at one terminal width.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub width: u16,
    pub lines: Vec<Line<'static>>,
    pub sections: Vec<(SectionId, RowSpan)>,
}

impl PageLayout {
    pub fn total_lines(&self) -> u32 {
        self.lines.len() as u32
    }

    pub fn span_of(&self, id: SectionId) -> Option<RowSpan> {
        self.sections
            .iter()
            .find(|(section, _)| *section == id)
            .map(|(_, span)| *span)
    }

    /// Section owning page row `row`, if any. The footer belongs to none.
    pub fn section_at(&self, row: u32) -> Option<SectionId> {
        self.sections
            .iter()
            .find(|(_, span)| row >= span.top && row < span.bottom())
            .map(|(id, _)| *id)
    }
}

struct PageBuilder {
    text_width: usize,
    accent: Style,
    ink: Style,
    muted: Style,
    lines: Vec<Line<'static>>,
}

impl PageBuilder {
    fn new(profile: &FirmProfile, width: u16) -> Self {
        let palette = profile.palette;
        Self {
            text_width: (width as usize).saturating_sub(MARGIN * 2).max(10),
            accent: Style::default().fg(rgb(palette.accent)),
            ink: Style::default().fg(Color::Reset),
            muted: Style::default().fg(rgb(palette.muted)),
            lines: Vec::new(),
        }
    }

    fn row(&self) -> u32 {
        self.lines.len() as u32
    }

    fn blank(&mut self) {
        self.lines.push(Line::default());
    }

    fn line(&mut self, spans: Vec<Span<'static>>) {
        let mut padded = vec![Span::raw(" ".repeat(MARGIN))];
        padded.extend(spans);
        self.lines.push(Line::from(padded));
    }

    fn eyebrow(&mut self, text: &str) {
        let style = self.accent.add_modifier(Modifier::BOLD);
        self.line(vec![
            Span::styled("── ", style),
            Span::styled(text.to_uppercase(), style),
        ]);
        self.blank();
    }

    fn heading(&mut self, text: &str, style: Style) {
        for chunk in wrap_to_width(text, self.text_width) {
            self.line(vec![Span::styled(chunk, style)]);
        }
    }

    fn paragraph(&mut self, text: &str, indent: usize) {
        let style = self.muted;
        for chunk in wrap_to_width(text, self.text_width.saturating_sub(indent)) {
            self.line(vec![Span::raw(" ".repeat(indent)), Span::styled(chunk, style)]);
        }
    }

    fn button(&mut self, key: &str, label: &str) {
        self.line(vec![
            Span::styled(
                format!(" {} ", key),
                Style::default().bg(Color::DarkGray).fg(Color::White),
            ),
            Span::styled(
                format!(" {} ", label.to_uppercase()),
                self.accent.add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ),
        ]);
    }
}

/// Lay out every section and the footer for `width` columns.
pub fn build(profile: &FirmProfile, width: u16) -> PageLayout {
    let mut page = PageBuilder::new(profile, width);
    let mut sections = Vec::new();

    for id in SectionId::all() {
        let top = page.row();
        match id {
            SectionId::Home => hero(&mut page, profile),
            SectionId::About => about(&mut page, profile),
            SectionId::Services => services(&mut page, profile),
            SectionId::Contact => contact(&mut page, profile),
        }
        sections.push((
            id,
            RowSpan {
                top,
                height: page.row() - top,
            },
        ));
    }

    footer(&mut page, profile);

    PageLayout {
        width,
        lines: page.lines,
        sections,
    }
}

fn hero(page: &mut PageBuilder, profile: &FirmProfile) {
    let hero = &profile.hero;
    page.blank();
    page.blank();
    page.eyebrow(hero.eyebrow);
    let headline = page.ink.add_modifier(Modifier::BOLD);
    page.heading(hero.headline, headline);
    let sub = page.accent.add_modifier(Modifier::BOLD | Modifier::ITALIC);
    page.heading(hero.subheadline, sub);
    page.blank();
    page.paragraph(hero.body, 0);
    page.blank();
    page.button("b", hero.call_to_action);
    page.blank();
    page.button("3", "Our Services");
    page.blank();
    page.blank();
}

fn about(page: &mut PageBuilder, profile: &FirmProfile) {
    let about = &profile.about;
    page.blank();
    page.eyebrow(about.eyebrow);
    let headline = page.ink.add_modifier(Modifier::BOLD);
    page.heading(about.headline, headline);
    page.blank();
    for paragraph in about.paragraphs {
        page.paragraph(paragraph, 0);
        page.blank();
    }
    for highlight in about.highlights {
        let title = page.accent.add_modifier(Modifier::BOLD);
        page.line(vec![
            Span::styled("✓ ", title),
            Span::styled(highlight.title.to_string(), title),
        ]);
        page.paragraph(highlight.body, 2);
        page.blank();
    }
    if !about.feature_list.is_empty() {
        for item in about.feature_list {
            let bullet = page.accent;
            page.line(vec![
                Span::styled("• ", bullet),
                Span::styled(item.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            ]);
        }
        page.blank();
    }
    page.blank();
}

fn services(page: &mut PageBuilder, profile: &FirmProfile) {
    let services = &profile.services;
    page.blank();
    page.eyebrow(services.eyebrow);
    let headline = page.ink.add_modifier(Modifier::BOLD);
    page.heading(services.headline, headline);
    page.blank();
    for service in services.items {
        let title = page.accent.add_modifier(Modifier::BOLD);
        page.line(vec![
            Span::styled("■ ", title),
            Span::styled(service.title.to_uppercase(), title),
        ]);
        page.paragraph(service.description, 2);
        page.blank();
    }
    page.blank();
}

fn contact(page: &mut PageBuilder, profile: &FirmProfile) {
    let contact = &profile.contact;
    page.blank();
    page.eyebrow(contact.eyebrow);
    let headline = page.ink.add_modifier(Modifier::BOLD | Modifier::ITALIC);
    page.heading(contact.headline, headline);
    page.blank();

    let label = Style::default().add_modifier(Modifier::BOLD);
    page.line(vec![
        Span::styled("Location  ", label),
        Span::styled(contact.location.to_string(), page.muted),
    ]);
    if let Some(phone) = contact.phone {
        page.line(vec![
            Span::styled("Phone     ", label),
            Span::styled(phone.to_string(), page.muted),
        ]);
    }
    page.blank();
    page.paragraph(contact.invitation, 0);
    page.blank();
    page.button("a", &format!("Ask the {}", profile.assistant.title));
    page.blank();
    page.blank();
}

fn footer(page: &mut PageBuilder, profile: &FirmProfile) {
    let footer = &profile.footer;
    let rule_width = page.text_width;
    page.line(vec![Span::styled("─".repeat(rule_width), page.muted)]);
    page.blank();
    let name = page.ink.add_modifier(Modifier::BOLD);
    page.line(vec![
        Span::styled(format!("[{}] ", profile.monogram), page.accent.add_modifier(Modifier::BOLD)),
        Span::styled(profile.name.to_string(), name),
    ]);
    page.paragraph(footer.blurb, 0);
    page.blank();
    let links = footer.legal_links.join("  ·  ");
    page.line(vec![Span::styled(links, page.muted.add_modifier(Modifier::BOLD))]);
    page.line(vec![Span::styled(
        format!("© {}. {}", profile.name, footer.locality),
        page.muted,
    )]);
    page.blank();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        assert_eq!(
            wrap_to_width("Simplify your finances today", 12),
            vec!["Simplify", "your", "finances", "today"]
        );
        assert_eq!(wrap_to_width("a bb ccc", 4), vec!["a bb", "ccc"]);
        assert_eq!(wrap_to_width("", 10), vec![String::new()]);
        assert_eq!(wrap_to_width("a b", 0), vec!["a b".to_string()]);
    }

    #[test]
    fn wrap_splits_tokens_wider_than_a_row() {
        assert_eq!(
            wrap_to_width("see abcdefghij now", 4),
            vec!["see", "abcd", "efgh", "ij", "now"]
        );
        // The tail of a split token shares its row with the next word.
        assert_eq!(wrap_to_width("abcdef gh", 4), vec!["abcd", "ef", "gh"]);
        assert_eq!(wrap_to_width("ab€déf", 3), vec!["ab€", "déf"]);

        let url = "https://www.canada.ca/en/revenue-agency/services/tax/businesses/topics/gst-hst-businesses/file.html";
        let rows = wrap_to_width(&format!("See {url} for dates."), 20);
        assert!(rows.iter().all(|r| r.chars().count() <= 20), "{rows:?}");
        assert!(rows.concat().contains(url));
    }

    #[test]
    fn sections_tile_the_page_in_order() {
        let layout = build(FirmProfile::default_profile(), 80);
        assert_eq!(layout.sections.len(), 4);
        assert_eq!(layout.sections[0].1.top, 0);
        for pair in layout.sections.windows(2) {
            assert_eq!(pair[0].1.bottom(), pair[1].1.top);
        }
        let last = layout.sections[3].1;
        // The footer follows the last section.
        assert!(layout.total_lines() > last.bottom());
        assert_eq!(layout.section_at(last.bottom()), None);
        assert_eq!(layout.section_at(0), Some(SectionId::Home));
    }

    #[test]
    fn narrower_pages_are_taller() {
        let profile = FirmProfile::by_key("general").unwrap();
        let wide = build(profile, 120);
        let narrow = build(profile, 40);
        assert!(narrow.total_lines() > wide.total_lines());
        assert_eq!(
            narrow.span_of(SectionId::Home).map(|s| s.top),
            Some(0)
        );
    }
}
