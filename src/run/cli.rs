use anyhow::Result;

use crate::ledger::Ledger;
use crate::models::{NewTransaction, TransactionId};
use crate::session::Session;
use crate::ui::util::{expense_label, format_row_amount, income_label, net_label, truncate};

pub(crate) fn as_cli(args: &[String], session: &mut Session) -> Result<()> {
    let rest = &args[1..];
    match args[0].as_str() {
        "add" => cli_add(rest, session),
        "delete" | "rm" => cli_delete(rest, session),
        "show" => cli_show(rest, session),
        "list" | "ls" => cli_list(rest, session),
        "summary" | "s" => cli_summary(session),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("tallytui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("TallyTUI - local-only income and expense tracker");
    println!();
    println!("Usage: tallytui [--ephemeral] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  add <description> <income|expense> <account> <category> <amount>");
    println!("                                Record a transaction");
    println!("  delete <id>                   Delete a transaction");
    println!("  show <id>                     Print one transaction");
    println!("  list [all|income|expense]     List transactions");
    println!("  summary                       Print income, expenses and net balance");
    println!("  --ephemeral                   Keep everything in memory for this run");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn cli_add(args: &[String], session: &mut Session) -> Result<()> {
    let [description, kind, account, category, amount] = args else {
        anyhow::bail!(
            "Usage: tallytui add <description> <income|expense> <account> <category> <amount>"
        );
    };
    let input = NewTransaction::new(
        description.as_str(),
        kind.as_str(),
        account.as_str(),
        category.as_str(),
        amount.as_str(),
    );
    let txn = session.add(input)?;
    println!(
        "Added {} '{}' {} ({})",
        txn.kind,
        txn.description,
        format_row_amount(&txn),
        txn.id
    );
    Ok(())
}

fn cli_delete(args: &[String], session: &mut Session) -> Result<()> {
    let Some(id) = args.first() else {
        anyhow::bail!("Usage: tallytui delete <id>");
    };
    let id = TransactionId::from(id.as_str());
    let before = session.ledger().list().len();
    session.ledger().delete(&id)?;
    if session.ledger().list().len() < before {
        println!("Deleted {id}");
    } else {
        println!("No transaction with id '{id}'");
    }
    Ok(())
}

fn cli_show(args: &[String], session: &mut Session) -> Result<()> {
    let Some(id) = args.first() else {
        anyhow::bail!("Usage: tallytui show <id>");
    };
    let txn = session.ledger().get(&TransactionId::from(id.as_str()))?;
    println!("{}", serde_json::to_string_pretty(&txn)?);
    Ok(())
}

fn cli_list(args: &[String], session: &mut Session) -> Result<()> {
    let criterion = args.first().map(String::as_str).unwrap_or("all");
    let txns = session.ledger().filter(criterion);
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<36} {:<10} {:<8} {:<24} {:<14} {:>14}",
        "ID", "Date", "Type", "Description", "Category", "Amount"
    );
    println!("{}", "─".repeat(111));
    for txn in &txns {
        println!(
            "{:<36} {:<10} {:<8} {:<24} {:<14} {:>14}",
            txn.id.as_str(),
            txn.display_date(),
            txn.kind.as_str(),
            truncate(&txn.description, 24),
            truncate(&txn.category, 14),
            format_row_amount(txn),
        );
    }
    Ok(())
}

fn cli_summary(session: &mut Session) -> Result<()> {
    let ledger = session.ledger();
    let count = ledger.list().len();
    let income = ledger.total_income();
    let expense = ledger.total_expense();
    let net = ledger.net_balance();

    println!("TallyTUI summary");
    println!("{}", "─".repeat(32));
    println!("  Income:        {}", income_label(income));
    println!("  Expenses:      {}", expense_label(expense));
    println!("  Net Balance:   {}", net_label(net));
    println!("  Transactions:  {count}");
    Ok(())
}
