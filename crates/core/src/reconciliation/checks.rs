//! Integrity checks between the general ledger and the sub-ledger book.
//!
//! Three sweeps, cheapest first: every detail account has a balance
//! record, every balance record agrees with its recomputed history, and
//! every control account agrees with the sum of its detail balances.
//! Findings land in the exception log; re-running the checks on broken
//! books files duplicate findings, which is the close reviewer's cue
//! that a break is still live.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::ledger::{within_tolerance, ChartOfAccounts};
use crate::subledger::{recomputed_balance, SubLedgerBook};

use super::service::ExceptionLog;
use super::types::{Exception, ExceptionKind, ExceptionSeverity};

/// Sweeps both books and files an exception for every break found.
///
/// Returns the newly created exceptions, in detection order. A clean
/// pass returns an empty vec and leaves the log untouched.
pub fn run_integrity_checks(
    chart: &ChartOfAccounts,
    book: &SubLedgerBook,
    log: &mut ExceptionLog,
) -> Vec<Exception> {
    let mut found = Vec::new();

    // Detail side: balance records exist and agree with their history.
    for account in book.accounts() {
        match book.balance_record(&account.gl_account, &account.code) {
            None => {
                let exception = log.create_exception(
                    ExceptionKind::MissingBalance,
                    ExceptionSeverity::Critical,
                    account.code.clone(),
                    format!(
                        "No balance record for sub-ledger account {} under control account {}",
                        account.code, account.gl_account
                    ),
                    None,
                );
                found.push(exception.clone());
            }
            Some(record) => {
                let recomputed = recomputed_balance(book.history(&account.code));
                let variance = record.current_balance - recomputed;
                if !within_tolerance(variance) {
                    let exception = log.create_exception(
                        ExceptionKind::BalanceVariance,
                        ExceptionSeverity::High,
                        account.code.clone(),
                        format!(
                            "Stored balance {} for {} disagrees with recomputed history {}",
                            record.current_balance, account.code, recomputed
                        ),
                        Some(variance),
                    );
                    found.push(exception.clone());
                }
            }
        }
    }

    // Control side: each control account against its detail total.
    let mut controls: BTreeMap<String, Decimal> = BTreeMap::new();
    for account in book.accounts() {
        let current = book
            .balance_record(&account.gl_account, &account.code)
            .map_or(account.balance, |record| record.current_balance);
        *controls.entry(account.gl_account.clone()).or_default() += current;
    }

    for (gl_account, detail_total) in controls {
        match chart.get(&gl_account) {
            Ok(control) => {
                let variance = control.balance - detail_total;
                if !within_tolerance(variance) {
                    let exception = log.create_exception(
                        ExceptionKind::ReconciliationFailure,
                        ExceptionSeverity::High,
                        gl_account.clone(),
                        format!(
                            "Control account {gl_account} balance {} disagrees with sub-ledger total {detail_total}",
                            control.balance
                        ),
                        Some(variance),
                    );
                    found.push(exception.clone());
                }
            }
            Err(_) => {
                let exception = log.create_exception(
                    ExceptionKind::ReconciliationFailure,
                    ExceptionSeverity::High,
                    gl_account.clone(),
                    format!("Control account {gl_account} is missing from the chart"),
                    None,
                );
                found.push(exception.clone());
            }
        }
    }

    found
}
