use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

/// Most recent audit entries, newest on top.
pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let width = area.width.saturating_sub(14) as usize;
    let items: Vec<ListItem> = app
        .audit
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", entry.short_time()), theme::dim_style()),
                Span::styled(
                    truncate(&entry.message, width),
                    theme::audit_style(entry.kind),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Audit Log ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(list, area);
}
