//! End-to-end walkthrough of the Balanza ledger engine.
//!
//! Seeds a small chart, runs journal entries through their lifecycle,
//! drives a customer sub-ledger, breaks the books on purpose to trip the
//! integrity checks, then repairs them and prints the closing reports.
//!
//! Usage: cargo run --bin demo

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use balanza_core::ledger::{AccountType, CreateEntryInput, Direction, PostingInput};
use balanza_core::subledger::{
    AgingBucket, ApprovalPolicy, CreateTransactionInput, ReconciliationInfo, ReconciliationStatus,
    SubLedgerKind, TransactionKind,
};
use balanza_core::LedgerEngine;
use balanza_shared::AppConfig;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let engine = LedgerEngine::new();
    for policy in &config.approvals {
        engine.register_approval_policy(ApprovalPolicy {
            gl_account: policy.gl_account.clone(),
            min_amount: policy.min_amount,
        })?;
    }

    seed_chart(&engine)?;
    run_journal_lifecycle(&engine)?;
    run_customer_subledger(&engine)?;
    run_integrity_cycle(&engine)?;
    print_reports(&engine)?;

    Ok(())
}

fn seed_chart(engine: &LedgerEngine) -> anyhow::Result<()> {
    engine.create_gl_account("101000", "Cash", AccountType::Asset)?;
    engine.create_gl_account("120000", "Accounts Receivable", AccountType::Asset)?;
    engine.create_gl_account("210000", "Accounts Payable", AccountType::Liability)?;
    engine.create_gl_account("300000", "Owner's Equity", AccountType::Equity)?;
    engine.create_gl_account("401000", "Service Revenue", AccountType::Revenue)?;
    engine.create_gl_account("501000", "Office Expense", AccountType::Expense)?;
    info!(accounts = engine.gl_accounts()?.len(), "Chart seeded");
    Ok(())
}

fn post_simple_entry(
    engine: &LedgerEngine,
    date: NaiveDate,
    description: &str,
    debit: (&str, Decimal),
    credit: (&str, Decimal),
) -> anyhow::Result<balanza_core::ledger::JournalEntry> {
    let entry = engine.create_entry(CreateEntryInput {
        date,
        description: description.to_string(),
        reference: None,
        postings: vec![
            PostingInput::new(debit.0, debit.1, Direction::Debit),
            PostingInput::new(credit.0, credit.1, Direction::Credit),
        ],
    })?;
    Ok(engine.post_entry(entry.id)?)
}

fn run_journal_lifecycle(engine: &LedgerEngine) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();

    post_simple_entry(
        engine,
        today - Duration::days(90),
        "Opening capital contribution",
        ("101000", dec!(25000)),
        ("300000", dec!(25000)),
    )?;
    post_simple_entry(
        engine,
        today - Duration::days(14),
        "Office supplies",
        ("501000", dec!(1200)),
        ("101000", dec!(1200)),
    )?;

    // Book the supplies twice, then back the duplicate out.
    let duplicate = post_simple_entry(
        engine,
        today - Duration::days(14),
        "Office supplies",
        ("501000", dec!(1200)),
        ("101000", dec!(1200)),
    )?;
    engine.reverse_entry(duplicate.id, today - Duration::days(13), "Duplicate booking")?;

    // An unbalanced draft never makes it into the journal.
    let result = engine.create_entry(CreateEntryInput {
        date: today,
        description: "Fat-fingered entry".to_string(),
        reference: None,
        postings: vec![
            PostingInput::new("101000", dec!(500), Direction::Debit),
            PostingInput::new("401000", dec!(499), Direction::Credit),
        ],
    });
    if let Err(e) = result {
        warn!(error = %e, code = e.error_code(), "Entry rejected");
    }

    info!(entries = engine.journal()?.len(), "Journal lifecycle complete");
    Ok(())
}

/// Books an invoice journal-first: Debit AR (linked) / Credit Revenue,
/// then a detail transaction referencing the posted AR leg.
fn book_linked_invoice(
    engine: &LedgerEngine,
    account: &str,
    amount: Decimal,
    days_ago: i64,
    reference: &str,
) -> anyhow::Result<()> {
    let date = Utc::now().date_naive() - Duration::days(days_ago);
    let entry = engine.create_entry(CreateEntryInput {
        date,
        description: format!("Invoice {reference}"),
        reference: Some(reference.to_string()),
        postings: vec![
            PostingInput {
                account_code: "120000".to_string(),
                amount,
                direction: Direction::Debit,
                subledger_account: Some(account.to_string()),
            },
            PostingInput::new("401000", amount, Direction::Credit),
        ],
    })?;
    let posted = engine.post_entry(entry.id)?;
    let ar_posting = posted
        .postings
        .iter()
        .find(|p| p.account_code == "120000")
        .map(|p| p.id)
        .context("posted invoice entry is missing its AR leg")?;

    engine.create_subledger_transaction(CreateTransactionInput {
        subledger_account: account.to_string(),
        date,
        amount,
        kind: TransactionKind::Invoice,
        description: reference.to_string(),
        created_by: "alice".to_string(),
        approved_by: None,
        posting_id: Some(ar_posting),
    })?;
    Ok(())
}

/// Books a customer receipt journal-first: Debit Cash / Credit AR (linked),
/// then the detail payment referencing the posted AR leg.
fn book_linked_receipt(
    engine: &LedgerEngine,
    account: &str,
    amount: Decimal,
    days_ago: i64,
    reference: &str,
) -> anyhow::Result<()> {
    let date = Utc::now().date_naive() - Duration::days(days_ago);
    let entry = engine.create_entry(CreateEntryInput {
        date,
        description: format!("Receipt {reference}"),
        reference: Some(reference.to_string()),
        postings: vec![
            PostingInput::new("101000", amount, Direction::Debit),
            PostingInput {
                account_code: "120000".to_string(),
                amount,
                direction: Direction::Credit,
                subledger_account: Some(account.to_string()),
            },
        ],
    })?;
    let posted = engine.post_entry(entry.id)?;
    let ar_posting = posted
        .postings
        .iter()
        .find(|p| p.account_code == "120000")
        .map(|p| p.id)
        .context("posted receipt entry is missing its AR leg")?;

    engine.create_subledger_transaction(CreateTransactionInput {
        subledger_account: account.to_string(),
        date,
        amount,
        kind: TransactionKind::Payment,
        description: reference.to_string(),
        created_by: "alice".to_string(),
        approved_by: None,
        posting_id: Some(ar_posting),
    })?;
    Ok(())
}

fn run_customer_subledger(engine: &LedgerEngine) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();

    engine.create_subledger_account("CUST-0001", "Acme Corp", "120000", SubLedgerKind::Customer)?;
    engine.create_subledger_account("CUST-0002", "Globex Ltd", "120000", SubLedgerKind::Customer)?;

    // Acme's billing runs journal-first: the AR legs carry the detail
    // linkage and the detail transactions reference them, so no control
    // posting is synthesized.
    book_linked_invoice(engine, "CUST-0001", dec!(7500), 75, "INV-2001")?;
    book_linked_invoice(engine, "CUST-0001", dec!(2400), 20, "INV-2002")?;
    book_linked_receipt(engine, "CUST-0001", dec!(3000), 5, "Wire 8841")?;

    // Detail-first entries synthesize their own one-sided control posting.
    let detail_first = |amount: Decimal, days_ago: i64, kind: TransactionKind, desc: &str| {
        CreateTransactionInput {
            subledger_account: "CUST-0001".to_string(),
            date: today - Duration::days(days_ago),
            amount,
            kind,
            description: desc.to_string(),
            created_by: "alice".to_string(),
            approved_by: None,
            posting_id: None,
        }
    };

    // Large transactions need an approver when a policy guards the
    // control account.
    if let Some(threshold) = engine.approval_threshold("120000")? {
        info!(%threshold, "Control account guarded by approval policy");
    }
    let oversized = detail_first(dec!(15000), 3, TransactionKind::Invoice, "INV-2003");
    match engine.create_subledger_transaction(oversized.clone()) {
        Ok(tx) => info!(transaction_id = %tx.id, "Large invoice accepted without a policy"),
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "Large invoice held for approval");
            let mut approved = oversized;
            approved.approved_by = Some("carol".to_string());
            engine.create_subledger_transaction(approved)?;
        }
    }
    // The settlement clears the same threshold, so it carries an approver.
    let mut settle_big = detail_first(dec!(15000), 1, TransactionKind::Payment, "Wire 8903");
    settle_big.approved_by = Some("carol".to_string());
    engine.create_subledger_transaction(settle_big)?;

    // A duplicate gets reversed rather than deleted.
    let dup = engine.create_subledger_transaction(detail_first(
        dec!(990),
        2,
        TransactionKind::Invoice,
        "INV-2002 (duplicate)",
    ))?;
    engine.reverse_subledger_transaction(dup.id, "Duplicate of INV-2002", "bob")?;

    // Globex invoices, pays in full, reconciles, and closes out.
    engine.create_subledger_transaction(CreateTransactionInput {
        subledger_account: "CUST-0002".to_string(),
        date: today - Duration::days(10),
        amount: dec!(1800),
        kind: TransactionKind::Invoice,
        description: "INV-2101".to_string(),
        created_by: "alice".to_string(),
        approved_by: None,
        posting_id: None,
    })?;
    engine.create_subledger_transaction(CreateTransactionInput {
        subledger_account: "CUST-0002".to_string(),
        date: today - Duration::days(2),
        amount: dec!(1800),
        kind: TransactionKind::Payment,
        description: "Check 1044".to_string(),
        created_by: "alice".to_string(),
        approved_by: None,
        posting_id: None,
    })?;

    engine.reconcile_subledger_account(
        "120000",
        "CUST-0002",
        &ReconciliationInfo {
            status: ReconciliationStatus::Matched,
            reconciled_by: "dana".to_string(),
            note: Some("Settled in full".to_string()),
        },
    )?;
    engine.deactivate_subledger_account("CUST-0002")?;

    Ok(())
}

fn run_integrity_cycle(engine: &LedgerEngine) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();

    let clean = engine.validate_integrity()?;
    info!(findings = clean.len(), "Integrity sweep over aligned books");

    // A GL-only adjustment knocks the control account out of line.
    let adjustment = post_simple_entry(
        engine,
        today,
        "Manual AR adjustment",
        ("120000", dec!(250)),
        ("401000", dec!(250)),
    )?;

    let found = engine.validate_integrity()?;
    for exception in &found {
        warn!(
            exception_id = %exception.id,
            kind = ?exception.kind,
            severity = ?exception.severity,
            account = %exception.account,
            amount = ?exception.amount,
            "Integrity break detected"
        );
    }

    // Backfill the missing detail side against the existing GL posting,
    // then close the exception.
    let ar_posting = adjustment
        .postings
        .iter()
        .find(|p| p.account_code == "120000")
        .map(|p| p.id)
        .context("adjustment entry is missing its AR leg")?;
    engine.create_subledger_transaction(CreateTransactionInput {
        subledger_account: "CUST-0001".to_string(),
        date: today,
        amount: dec!(250),
        kind: TransactionKind::Adjustment,
        description: "Backfill for manual AR adjustment".to_string(),
        created_by: "dana".to_string(),
        approved_by: None,
        posting_id: Some(ar_posting),
    })?;
    for exception in &found {
        engine.resolve_exception(exception.id, "Detail side backfilled", "dana")?;
    }

    let after = engine.validate_integrity()?;
    info!(
        findings = after.len(),
        open = engine.open_exceptions()?.len(),
        filed = engine.exceptions(Some("120000"))?.len(),
        "Integrity sweep after repair"
    );
    Ok(())
}

fn print_reports(engine: &LedgerEngine) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();

    let trial = engine.trial_balance()?;
    for row in &trial.rows {
        info!(
            account = %row.code,
            debits = %row.debits,
            credits = %row.credits,
            "Trial balance row"
        );
    }
    info!(
        total_debits = %trial.total_debits,
        total_credits = %trial.total_credits,
        balanced = trial.is_balanced,
        "Trial balance"
    );

    let report = engine.aging_report("CUST-0001", today)?;
    for bucket in [
        AgingBucket::Current,
        AgingBucket::Days1To30,
        AgingBucket::Days31To60,
        AgingBucket::Days61To90,
        AgingBucket::Over90,
    ] {
        let slice = report.slice(bucket);
        info!(
            bucket = bucket.label(),
            total = %slice.total,
            count = slice.count,
            oldest = ?slice.oldest,
            "Aging bucket"
        );
    }
    info!(
        account = %report.subledger_account,
        outstanding = %report.total_outstanding,
        transactions = report.transaction_count,
        "Aging report"
    );

    let balance = engine.subledger_balance("120000", "CUST-0001")?;
    info!(
        current = %balance.current_balance,
        period_debits = %balance.period_debits,
        period_credits = %balance.period_credits,
        transactions = balance.transaction_count,
        "Acme balance record"
    );

    let control = engine.gl_account("120000")?.balance;
    let detail: Decimal = engine
        .subledger_accounts_for_gl("120000")?
        .iter()
        .map(|account| account.balance)
        .sum();
    info!(control = %control, detail = %detail, "AR control vs detail");

    Ok(())
}
