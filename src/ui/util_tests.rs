#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;
use crate::models::{Transaction, TransactionId, TransactionType};

fn txn(kind: TransactionType, amount: rust_decimal::Decimal) -> Transaction {
    Transaction {
        id: TransactionId::generate(),
        amount,
        description: "x".into(),
        kind,
        category: "c".into(),
        account: "a".into(),
        created_at: "2024-05-01T09:00:00+00:00".into(),
    }
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello", 5), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
    assert_eq!(truncate("hello", 1), "…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("café résumé", 5), "café…");
}

// ── amounts ───────────────────────────────────────────────────

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
    assert_eq!(format_amount(dec!(1.5)), "$1.50");
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
    assert_eq!(format_amount(dec!(-42.5)), "-$42.50");
}

#[test]
fn test_format_row_amount_signs_by_type() {
    assert_eq!(
        format_row_amount(&txn(TransactionType::Income, dec!(1000))),
        "+$1,000.00"
    );
    assert_eq!(
        format_row_amount(&txn(TransactionType::Expense, dec!(15))),
        "-$15.00"
    );
}

#[test]
fn test_card_labels() {
    assert_eq!(income_label(dec!(1000)), "+$1000.00");
    assert_eq!(expense_label(dec!(15)), "-$15.00");
    assert_eq!(net_label(dec!(985)), "$985.00");
}

#[test]
fn test_net_label_keeps_sign_after_dollar() {
    assert_eq!(net_label(dec!(-32.8)), "$-32.80");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (3, 1));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (4, 2);
    scroll_down(&mut index, &mut scroll, 5, 3);
    assert_eq!((index, scroll), (4, 2));
}

#[test]
fn test_scroll_up_pulls_window() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
}

#[test]
fn test_scroll_to_bottom_and_top() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_to_bottom_empty_list() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 0, 4);
    assert_eq!((index, scroll), (0, 0));
}
