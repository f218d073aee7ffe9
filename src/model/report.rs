//! Rows of the provisioned reporting views and the base-table rows they are
//! derived from. The seeding tool never writes the base rows itself; they are
//! produced by the running application.

use crate::model::{AccountCategory, AccountType};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub jrn_code: String,
    pub jrn_date: NaiveDate,
    pub jrn_desc: Option<String>,
    /// `None` for journals saved before posting was tracked
    pub jrn_is_posted: Option<bool>,
    pub jrn_module: Option<String>,
    pub jrn_ref_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    pub jrd_jrn_code: String,
    pub jrd_line_no: i32,
    pub jrd_acc_code: String,
    pub jrd_debit: i64,
    pub jrd_credit: i64,
    pub jrd_desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub wtx_per_code: String,
    pub wtx_amount: i64,
    pub wtx_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub res_id: i64,
    pub res_prj_code: String,
    pub res_unit_code: String,
    pub res_per_code: String,
    pub res_checkin: NaiveDate,
    pub res_checkout: NaiveDate,
    pub res_guest_count: i32,
    pub res_total_price: i64,
    pub res_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLogEntry {
    pub ulg_id: i64,
    pub ulg_per_code: String,
    pub ulg_action: String,
    pub ulg_table_name: Option<String>,
    pub ulg_record_key: Option<String>,
    pub ulg_desc: Option<String>,
    pub ulg_timestamp: NaiveDateTime,
    pub ulg_ip_address: Option<String>,
}

/// `v_trial_balance`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub acc_code: String,
    pub acc_name: String,
    pub acc_type: AccountType,
    pub acc_category: AccountCategory,
    pub total_debit: i64,
    pub total_credit: i64,
    pub balance: i64,
}

/// `v_general_ledger`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralLedgerRow {
    pub jrn_date: NaiveDate,
    pub jrn_code: String,
    pub jrn_desc: Option<String>,
    pub jrd_line_no: i32,
    pub jrd_acc_code: String,
    pub account_name: String,
    pub jrd_debit: i64,
    pub jrd_credit: i64,
    pub line_desc: Option<String>,
    pub jrn_module: Option<String>,
    pub jrn_ref_code: Option<String>,
}

/// `v_wallet_balance`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalanceRow {
    pub wlt_per_code: String,
    pub person_name: String,
    pub wlt_balance: i64,
    pub wlt_last_update: Option<NaiveDateTime>,
    pub total_transactions: i64,
}

/// `v_reservation_summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationSummaryRow {
    pub res_id: i64,
    pub res_prj_code: String,
    pub project_title: String,
    pub res_unit_code: String,
    pub unit_title: String,
    pub res_per_code: String,
    pub person_name: String,
    pub res_checkin: NaiveDate,
    pub res_checkout: NaiveDate,
    pub res_guest_count: i32,
    pub res_total_price: i64,
    pub res_status: String,
    pub nights_count: i32,
}

/// `v_shareholding_summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareholdingSummaryRow {
    pub shr_per_code: String,
    pub person_name: String,
    pub shr_prj_code: String,
    pub project_title: String,
    pub shr_shares: i64,
    pub shr_unit_price: i64,
    pub shr_total_value: i64,
    pub shr_from_date: NaiveDate,
    pub shr_to_date: Option<NaiveDate>,
    pub shr_is_active: bool,
}

/// `v_user_log_audit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLogAuditRow {
    pub ulg_id: i64,
    pub ulg_per_code: String,
    pub person_name: String,
    pub ulg_action: String,
    pub ulg_table_name: Option<String>,
    pub ulg_record_key: Option<String>,
    pub ulg_desc: Option<String>,
    pub ulg_timestamp: NaiveDateTime,
    pub ulg_ip_address: Option<String>,
}
