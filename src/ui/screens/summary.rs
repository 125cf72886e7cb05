use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{expense_label, income_label, net_label};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let income_count = app.transactions.iter().filter(|t| t.is_income()).count();
    let expense_count = app.transactions.iter().filter(|t| t.is_expense()).count();

    render_card(
        f,
        cards[0],
        "Income",
        income_label(app.total_income),
        theme::GREEN,
        format!("{income_count} shown"),
    );
    render_card(
        f,
        cards[1],
        "Expenses",
        expense_label(app.total_expense),
        theme::RED,
        format!("{expense_count} shown"),
    );
    let net_color = if app.net_balance >= Decimal::ZERO {
        theme::GREEN
    } else {
        theme::RED
    };
    render_card(
        f,
        cards[2],
        "Net Balance",
        net_label(app.net_balance),
        net_color,
        String::new(),
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color, sub: String) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sub, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}
