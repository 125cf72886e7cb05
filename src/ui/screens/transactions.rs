use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_row_amount, truncate};

fn block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ))
}

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" {} ({}) ", app.filter, app.transactions.len());

    if app.transactions.is_empty() {
        let (heading, hint) = app.empty_message();
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(
                heading,
                Style::default()
                    .fg(theme::TEXT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(hint, theme::dim_style())),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block(title)), area);
        return;
    }

    let header_cells = ["Date", "Description", "Type", "Account", "Category", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .transactions
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let kind_style = Style::default().fg(theme::kind_color(txn.kind));
            let style = if i == app.transaction_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(format!("  {}", txn.display_date())),
                Cell::from(truncate(&txn.description, 40)),
                Cell::from(Span::styled(txn.kind.as_str(), kind_style)),
                Cell::from(truncate(&txn.account, 16)),
                Cell::from(truncate(&txn.category, 16)),
                Cell::from(Span::styled(format_row_amount(txn), kind_style)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(17),
        Constraint::Length(17),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).header(header).block(block(title));
    f.render_widget(table, area);
}
