//! In-process evaluation of the reporting views.
//!
//! These mirror the SQL in `seed::views` row for row so the in-memory store
//! answers report queries the same way PostgreSQL answers them from the views.

use crate::model::{
    Account, GeneralLedgerRow, Journal, JournalLine, Person, Project, Reservation,
    ReservationSummaryRow, Shareholding, ShareholdingSummaryRow, TrialBalanceRow, Unit,
    UserLogAuditRow, UserLogEntry, Wallet, WalletBalanceRow, WalletTransaction,
};
use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use std::collections::HashMap;

fn out_of_range() -> anyhow::Error {
    anyhow!("bigint out of range")
}

fn person_names(persons: &[Person]) -> HashMap<&str, String> {
    persons
        .iter()
        .map(|p| (p.per_code.as_str(), p.display_name()))
        .collect()
}

/// Active accounts with debit/credit totals over posted (or unflagged) journals
pub fn trial_balance(
    accounts: &[Account],
    journals: &[Journal],
    lines: &[JournalLine],
) -> Result<Vec<TrialBalanceRow>> {
    let counted: HashMap<&str, bool> = journals
        .iter()
        .map(|j| (j.jrn_code.as_str(), j.jrn_is_posted != Some(false)))
        .collect();

    let mut totals: HashMap<&str, (i64, i64)> = HashMap::new();
    for line in lines {
        // lines whose journal is missing behave like a null posting flag
        if !counted.get(line.jrd_jrn_code.as_str()).copied().unwrap_or(true) {
            continue;
        }
        let (debit, credit) = totals.entry(line.jrd_acc_code.as_str()).or_default();
        *debit = debit.checked_add(line.jrd_debit).ok_or_else(out_of_range)?;
        *credit = credit.checked_add(line.jrd_credit).ok_or_else(out_of_range)?;
    }

    let mut rows = accounts
        .iter()
        .filter(|a| a.acc_is_active)
        .map(|a| {
            let (total_debit, total_credit) =
                totals.get(a.acc_code.as_str()).copied().unwrap_or((0, 0));
            Ok(TrialBalanceRow {
                acc_code: a.acc_code.clone(),
                acc_name: a.acc_name.clone(),
                acc_type: a.acc_type,
                acc_category: a.acc_category,
                total_debit,
                total_credit,
                balance: a
                    .acc_type
                    .balance(total_debit, total_credit)
                    .ok_or_else(out_of_range)?,
            })
        })
        .collect::<Result<Vec<TrialBalanceRow>>>()?;
    rows.sort_by(|a, b| a.acc_code.cmp(&b.acc_code));
    Ok(rows)
}

/// Posted journal lines ordered by date, journal code, line number
pub fn general_ledger(
    accounts: &[Account],
    journals: &[Journal],
    lines: &[JournalLine],
) -> Vec<GeneralLedgerRow> {
    let names: HashMap<&str, &str> = accounts
        .iter()
        .map(|a| (a.acc_code.as_str(), a.acc_name.as_str()))
        .collect();
    let posted: HashMap<&str, &Journal> = journals
        .iter()
        .filter(|j| j.jrn_is_posted == Some(true))
        .map(|j| (j.jrn_code.as_str(), j))
        .collect();

    let mut rows: Vec<GeneralLedgerRow> = lines
        .iter()
        .filter_map(|line| {
            let journal = posted.get(line.jrd_jrn_code.as_str())?;
            let account_name = names.get(line.jrd_acc_code.as_str())?;
            Some(GeneralLedgerRow {
                jrn_date: journal.jrn_date,
                jrn_code: journal.jrn_code.clone(),
                jrn_desc: journal.jrn_desc.clone(),
                jrd_line_no: line.jrd_line_no,
                jrd_acc_code: line.jrd_acc_code.clone(),
                account_name: account_name.to_string(),
                jrd_debit: line.jrd_debit,
                jrd_credit: line.jrd_credit,
                line_desc: line.jrd_desc.clone(),
                jrn_module: journal.jrn_module.clone(),
                jrn_ref_code: journal.jrn_ref_code.clone(),
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        a.jrn_date
            .cmp(&b.jrn_date)
            .then_with(|| a.jrn_code.cmp(&b.jrn_code))
            .then_with(|| a.jrd_line_no.cmp(&b.jrd_line_no))
    });
    rows
}

pub fn wallet_balances(
    wallets: &[(Wallet, Option<NaiveDateTime>)],
    persons: &[Person],
    transactions: &[WalletTransaction],
) -> Result<Vec<WalletBalanceRow>> {
    let names = person_names(persons);
    let mut sums: HashMap<&str, i64> = HashMap::new();
    for tx in transactions {
        let sum = sums.entry(tx.wtx_per_code.as_str()).or_default();
        *sum = sum.checked_add(tx.wtx_amount).ok_or_else(out_of_range)?;
    }

    let rows = wallets
        .iter()
        .filter_map(|(wallet, last_update)| {
            let person_name = names.get(wallet.wlt_per_code.as_str())?;
            Some(WalletBalanceRow {
                wlt_per_code: wallet.wlt_per_code.clone(),
                person_name: person_name.clone(),
                wlt_balance: wallet.wlt_balance,
                wlt_last_update: *last_update,
                total_transactions: sums
                    .get(wallet.wlt_per_code.as_str())
                    .copied()
                    .unwrap_or(0),
            })
        })
        .collect();
    Ok(rows)
}

/// Reservations with display names and stay length, newest check-in first
pub fn reservation_summary(
    reservations: &[Reservation],
    projects: &[Project],
    units: &[Unit],
    persons: &[Person],
) -> Vec<ReservationSummaryRow> {
    let names = person_names(persons);
    let project_titles: HashMap<&str, &str> = projects
        .iter()
        .map(|p| (p.prj_code.as_str(), p.prj_title.as_str()))
        .collect();
    let unit_titles: HashMap<(&str, &str), &str> = units
        .iter()
        .map(|u| {
            (
                (u.unt_prj_code.as_str(), u.unt_code.as_str()),
                u.unt_title.as_str(),
            )
        })
        .collect();

    let mut rows: Vec<ReservationSummaryRow> = reservations
        .iter()
        .filter_map(|r| {
            let project_title = project_titles.get(r.res_prj_code.as_str())?;
            let unit_title =
                unit_titles.get(&(r.res_prj_code.as_str(), r.res_unit_code.as_str()))?;
            let person_name = names.get(r.res_per_code.as_str())?;
            Some(ReservationSummaryRow {
                res_id: r.res_id,
                res_prj_code: r.res_prj_code.clone(),
                project_title: project_title.to_string(),
                res_unit_code: r.res_unit_code.clone(),
                unit_title: unit_title.to_string(),
                res_per_code: r.res_per_code.clone(),
                person_name: person_name.clone(),
                res_checkin: r.res_checkin,
                res_checkout: r.res_checkout,
                res_guest_count: r.res_guest_count,
                res_total_price: r.res_total_price,
                res_status: r.res_status.clone(),
                nights_count: (r.res_checkout - r.res_checkin).num_days() as i32,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.res_checkin.cmp(&a.res_checkin));
    rows
}

pub fn shareholding_summary(
    shareholdings: &[Shareholding],
    persons: &[Person],
    projects: &[Project],
) -> Vec<ShareholdingSummaryRow> {
    let names = person_names(persons);
    let project_titles: HashMap<&str, &str> = projects
        .iter()
        .map(|p| (p.prj_code.as_str(), p.prj_title.as_str()))
        .collect();

    let mut rows: Vec<ShareholdingSummaryRow> = shareholdings
        .iter()
        .filter_map(|s| {
            let person_name = names.get(s.shr_per_code.as_str())?;
            let project_title = project_titles.get(s.shr_prj_code.as_str())?;
            Some(ShareholdingSummaryRow {
                shr_per_code: s.shr_per_code.clone(),
                person_name: person_name.clone(),
                shr_prj_code: s.shr_prj_code.clone(),
                project_title: project_title.to_string(),
                shr_shares: s.shr_shares,
                shr_unit_price: s.shr_unit_price,
                shr_total_value: s.shr_total_value,
                shr_from_date: s.shr_from_date,
                shr_to_date: s.shr_to_date,
                shr_is_active: s.shr_is_active,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.shr_from_date.cmp(&a.shr_from_date));
    rows
}

pub fn user_log_audit(entries: &[UserLogEntry], persons: &[Person]) -> Vec<UserLogAuditRow> {
    let names = person_names(persons);
    let mut rows: Vec<UserLogAuditRow> = entries
        .iter()
        .filter_map(|e| {
            let person_name = names.get(e.ulg_per_code.as_str())?;
            Some(UserLogAuditRow {
                ulg_id: e.ulg_id,
                ulg_per_code: e.ulg_per_code.clone(),
                person_name: person_name.clone(),
                ulg_action: e.ulg_action.clone(),
                ulg_table_name: e.ulg_table_name.clone(),
                ulg_record_key: e.ulg_record_key.clone(),
                ulg_desc: e.ulg_desc.clone(),
                ulg_timestamp: e.ulg_timestamp,
                ulg_ip_address: e.ulg_ip_address.clone(),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.ulg_timestamp.cmp(&a.ulg_timestamp));
    rows
}
