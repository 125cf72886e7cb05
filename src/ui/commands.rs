use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction};
use crate::ledger::Ledger;
use crate::models::{Filter, NewTransaction, TransactionId};
use crate::session::Session;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Session) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit TallyTUI", cmd_quit, r);
    register_command!("quit", "Quit TallyTUI", cmd_quit, r);
    register_command!(
        "add",
        "Add transaction (e.g. :add expense 4.50 Cash Food Coffee beans)",
        cmd_add,
        r
    );
    register_command!(
        "a",
        "Add transaction (e.g. :a income 1000 Checking Job Salary)",
        cmd_add,
        r
    );
    register_command!(
        "delete",
        "Delete selected transaction, or one by id",
        cmd_delete,
        r
    );
    register_command!(
        "del",
        "Delete selected transaction, or one by id",
        cmd_delete,
        r
    );
    register_command!(
        "filter",
        "Show all, income or expense (e.g. :filter income)",
        cmd_filter,
        r
    );
    register_command!("f", "Show all, income or expense", cmd_filter, r);
    register_command!("save", "Save transactions now", cmd_save, r);
    register_command!("w", "Save transactions now", cmd_save, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);

    r
});

pub(crate) fn handle_command(
    input: &str,
    app: &mut App,
    session: &mut Session,
) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, session)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `<type> <amount> <account> <category> <description...>`
pub(crate) fn parse_add_args(args: &str) -> Option<NewTransaction> {
    let mut parts = args.split_whitespace();
    let kind = parts.next()?;
    let amount = parts.next()?;
    let account = parts.next()?;
    let category = parts.next()?;
    let description = parts.collect::<Vec<_>>().join(" ");
    if description.is_empty() {
        return None;
    }
    Some(NewTransaction::new(
        description,
        kind,
        account,
        category,
        amount,
    ))
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let Some(input) = parse_add_args(args) else {
        app.set_status(
            "Usage: :add <income|expense> <amount> <account> <category> <description>",
        );
        return Ok(());
    };

    match session.add(input) {
        Ok(txn) => {
            app.refresh(session);
            app.set_status(format!(
                "Added {} '{}' ${:.2}",
                txn.kind, txn.description, txn.amount
            ));
        }
        Err(e) => {
            app.refresh(session);
            app.report_error(&e);
        }
    }
    Ok(())
}

fn cmd_delete(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if !args.is_empty() {
        let id = TransactionId::from(args);
        match session.ledger().delete(&id) {
            Ok(()) => app.set_status(format!("Deleted: {id}")),
            Err(e) => app.report_error(&e),
        }
        app.refresh(session);
        return Ok(());
    }

    let Some(txn) = app.selected() else {
        app.set_status("No transaction selected");
        return Ok(());
    };
    let (id, description) = (txn.id.clone(), txn.description.clone());
    app.confirm_message = format!("Delete '{description}'?");
    app.pending_action = Some(PendingAction::DeleteTransaction { id, description });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let filter = Filter::parse(args);
    app.set_filter(filter, session);
    app.set_status(format!(
        "Showing {filter} ({} transactions)",
        app.transactions.len()
    ));
    Ok(())
}

fn cmd_save(_args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let count = session.ledger().list().len();
    match session.ledger().persist() {
        Ok(()) => app.set_status(format!("Saved {count} transactions")),
        Err(e) => app.report_error(&e),
    }
    Ok(())
}

/// Runs a confirmed pending action.
pub(crate) fn confirm(action: PendingAction, app: &mut App, session: &mut Session) {
    match action {
        PendingAction::DeleteTransaction { id, description } => {
            match session.ledger().delete(&id) {
                Ok(()) => app.set_status(format!("Deleted: {description}")),
                Err(e) => app.report_error(&e),
            }
            app.refresh(session);
        }
    }
}
