use rust_decimal::Decimal;

use super::{Next, Outcome, Pipeline, Step};
use crate::error::{LedgerError, Result};
use crate::ledger::{check_headroom, check_new_transaction, AuditLog, Ledger};
use crate::models::{AuditKind, NewTransaction, Transaction, TransactionType};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PipelineSettings {
    pub currency_multiplier: Decimal,
    /// Categories (case-insensitive) that may only hold expenses.
    pub expense_only_categories: Vec<String>,
    pub strict_category: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            currency_multiplier: Decimal::ONE,
            expense_only_categories: vec!["rent".to_string()],
            strict_category: false,
        }
    }
}

pub(crate) struct AddContext<'l> {
    pub ledger: &'l mut dyn Ledger,
    pub input: NewTransaction,
    pub amount: Option<Decimal>,
    pub kind: Option<TransactionType>,
    pub created: Option<Transaction>,
    /// Names of the steps entered so far.
    pub trail: Vec<&'static str>,
}

impl<'l> AddContext<'l> {
    pub(crate) fn new(ledger: &'l mut dyn Ledger, input: NewTransaction) -> Self {
        Self {
            ledger,
            input,
            amount: None,
            kind: None,
            created: None,
            trail: Vec::new(),
        }
    }
}

struct ValidateInput {
    strict_category: bool,
    audit: AuditLog,
}

impl<'l> Step<AddContext<'l>> for ValidateInput {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn handle(&self, ctx: &mut AddContext<'l>, next: &mut Next<'_, AddContext<'l>>) -> Result<()> {
        ctx.trail.push(self.name());
        let (amount, kind) = check_new_transaction(&ctx.input, self.strict_category)
            .and_then(|(amount, kind)| {
                check_headroom(&mut *ctx.ledger, kind, amount)?;
                Ok((amount, kind))
            })
            .inspect_err(|e| self.audit.record(AuditKind::Failure, e.to_string()))?;
        ctx.amount = Some(amount);
        ctx.kind = Some(kind);
        next.run(ctx)
    }
}

struct ConvertCurrency {
    multiplier: Decimal,
    audit: AuditLog,
}

impl ConvertCurrency {
    fn convert(&self, ledger: &mut dyn Ledger, amount: Decimal, kind: TransactionType) -> Result<Decimal> {
        let converted = amount
            .checked_mul(self.multiplier)
            .ok_or_else(|| LedgerError::validation("Amount too large after conversion"))?
            .round_dp(2);
        check_headroom(ledger, kind, converted)?;
        Ok(converted)
    }
}

impl<'l> Step<AddContext<'l>> for ConvertCurrency {
    fn name(&self) -> &'static str {
        "convert-currency"
    }

    fn handle(&self, ctx: &mut AddContext<'l>, next: &mut Next<'_, AddContext<'l>>) -> Result<()> {
        ctx.trail.push(self.name());
        if let (Some(amount), Some(kind)) = (ctx.amount, ctx.kind) {
            let converted = self
                .convert(&mut *ctx.ledger, amount, kind)
                .inspect_err(|e| self.audit.record(AuditKind::Failure, e.to_string()))?;
            ctx.amount = Some(converted);
        }
        next.run(ctx)
    }
}

struct BusinessRules {
    expense_only: Vec<String>,
    audit: AuditLog,
}

impl<'l> Step<AddContext<'l>> for BusinessRules {
    fn name(&self) -> &'static str {
        "business-rules"
    }

    fn handle(&self, ctx: &mut AddContext<'l>, next: &mut Next<'_, AddContext<'l>>) -> Result<()> {
        ctx.trail.push(self.name());
        let category = ctx.input.category.trim().to_lowercase();
        let restricted = self.expense_only.iter().any(|c| c.to_lowercase() == category);
        if restricted && ctx.kind != Some(TransactionType::Expense) {
            let err = LedgerError::validation(format!(
                "Category '{}' must be an expense",
                ctx.input.category.trim()
            ));
            self.audit.record(AuditKind::Failure, err.to_string());
            return Err(err);
        }
        next.run(ctx)
    }
}

struct Observe;

impl<'l> Step<AddContext<'l>> for Observe {
    fn name(&self) -> &'static str {
        "observe"
    }

    fn handle(&self, ctx: &mut AddContext<'l>, next: &mut Next<'_, AddContext<'l>>) -> Result<()> {
        ctx.trail.push(self.name());
        tracing::info!(
            target: "tallytui::analytics",
            description = %ctx.input.description,
            amount = ?ctx.amount,
            "adding transaction"
        );
        next.run(ctx)
    }
}

struct AutoPersist;

impl<'l> Step<AddContext<'l>> for AutoPersist {
    fn name(&self) -> &'static str {
        "auto-persist"
    }

    fn handle(&self, ctx: &mut AddContext<'l>, next: &mut Next<'_, AddContext<'l>>) -> Result<()> {
        ctx.trail.push(self.name());
        next.run(ctx)?;
        if let Err(e) = ctx.ledger.persist() {
            tracing::warn!("auto-save after add failed: {e}");
        }
        Ok(())
    }
}

fn append(ctx: &mut AddContext<'_>) -> Result<()> {
    let amount = ctx
        .amount
        .ok_or_else(|| LedgerError::validation("Amount is required"))?;
    let input = NewTransaction {
        amount: amount.to_string(),
        ..ctx.input.clone()
    };
    ctx.created = Some(ctx.ledger.create(&input)?);
    Ok(())
}

pub(crate) fn build<'l>(settings: &PipelineSettings, audit: &AuditLog) -> Pipeline<AddContext<'l>> {
    Pipeline::new(Box::new(append))
        .step(ValidateInput {
            strict_category: settings.strict_category,
            audit: audit.clone(),
        })
        .step(ConvertCurrency {
            multiplier: settings.currency_multiplier,
            audit: audit.clone(),
        })
        .step(BusinessRules {
            expense_only: settings.expense_only_categories.clone(),
            audit: audit.clone(),
        })
        .step(Observe)
        .step(AutoPersist)
}

/// Runs `input` through the add-transaction pipeline into `ledger`.
pub(crate) fn add_transaction(
    ledger: &mut dyn Ledger,
    input: NewTransaction,
    settings: &PipelineSettings,
    audit: &AuditLog,
) -> Result<Transaction> {
    let pipeline = build(settings, audit);
    tracing::debug!("add pipeline: {:?}", pipeline.step_names());

    let mut ctx = AddContext::new(ledger, input);
    let outcome = pipeline.run(&mut ctx);
    tracing::debug!("add pipeline ran {:?}", ctx.trail);
    match outcome? {
        Outcome::Completed => ctx
            .created
            .ok_or_else(|| LedgerError::validation("Transaction was not created")),
        Outcome::Halted { at } => Err(LedgerError::validation(format!(
            "Transaction was not created (stopped at {at})"
        ))),
    }
}
