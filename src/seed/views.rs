//! Reporting views provisioned after the reference datasets.
//!
//! Every view reads base tables only, so they can be created in any order.

use crate::model::ViewDefinition;

pub const TRIAL_BALANCE: &str = "v_trial_balance";
pub const GENERAL_LEDGER: &str = "v_general_ledger";
pub const WALLET_BALANCE: &str = "v_wallet_balance";
pub const RESERVATION_SUMMARY: &str = "v_reservation_summary";
pub const SHAREHOLDING_SUMMARY: &str = "v_shareholding_summary";
pub const USER_LOG_AUDIT: &str = "v_user_log_audit";

// Unposted journals are excluded inside the aggregate so that every active
// account still gets a row.
const TRIAL_BALANCE_SQL: &str = r#"
SELECT
    a.acc_code,
    a.acc_name,
    a.acc_type,
    a.acc_category,
    COALESCE(SUM(jd.jrd_debit) FILTER (WHERE j.jrn_is_posted IS NOT FALSE), 0)::BIGINT AS total_debit,
    COALESCE(SUM(jd.jrd_credit) FILTER (WHERE j.jrn_is_posted IS NOT FALSE), 0)::BIGINT AS total_credit,
    CASE
        WHEN a.acc_type = 'debit' THEN
            COALESCE(SUM(jd.jrd_debit) FILTER (WHERE j.jrn_is_posted IS NOT FALSE), 0)
            - COALESCE(SUM(jd.jrd_credit) FILTER (WHERE j.jrn_is_posted IS NOT FALSE), 0)
        WHEN a.acc_type = 'credit' THEN
            COALESCE(SUM(jd.jrd_credit) FILTER (WHERE j.jrn_is_posted IS NOT FALSE), 0)
            - COALESCE(SUM(jd.jrd_debit) FILTER (WHERE j.jrn_is_posted IS NOT FALSE), 0)
        ELSE 0
    END::BIGINT AS balance
FROM t_account a
LEFT JOIN t_journal_detail jd ON a.acc_code = jd.jrd_acc_code
LEFT JOIN t_journal j ON jd.jrd_jrn_code = j.jrn_code
WHERE a.acc_is_active
GROUP BY a.acc_code, a.acc_name, a.acc_type, a.acc_category
ORDER BY a.acc_code
"#;

const GENERAL_LEDGER_SQL: &str = r#"
SELECT
    j.jrn_date,
    j.jrn_code,
    j.jrn_desc,
    jd.jrd_line_no,
    jd.jrd_acc_code,
    a.acc_name AS account_name,
    jd.jrd_debit,
    jd.jrd_credit,
    jd.jrd_desc AS line_desc,
    j.jrn_module,
    j.jrn_ref_code
FROM t_journal j
JOIN t_journal_detail jd ON j.jrn_code = jd.jrd_jrn_code
JOIN t_account a ON jd.jrd_acc_code = a.acc_code
WHERE j.jrn_is_posted
ORDER BY j.jrn_date, j.jrn_code, jd.jrd_line_no
"#;

const WALLET_BALANCE_SQL: &str = r#"
SELECT
    w.wlt_per_code,
    TRIM(p.per_name || ' ' || p.per_last_name) AS person_name,
    w.wlt_balance,
    w.wlt_last_update,
    COALESCE(SUM(wt.wtx_amount), 0)::BIGINT AS total_transactions
FROM t_wallet w
JOIN t_person p ON w.wlt_per_code = p.per_code
LEFT JOIN t_wallet_transaction wt ON w.wlt_per_code = wt.wtx_per_code
GROUP BY w.wlt_per_code, p.per_name, p.per_last_name, w.wlt_balance, w.wlt_last_update
"#;

const RESERVATION_SUMMARY_SQL: &str = r#"
SELECT
    r.res_id,
    r.res_prj_code,
    p.prj_title AS project_title,
    r.res_unit_code,
    u.unt_title AS unit_title,
    r.res_per_code,
    TRIM(per.per_name || ' ' || per.per_last_name) AS person_name,
    r.res_checkin,
    r.res_checkout,
    r.res_guest_count,
    r.res_total_price,
    r.res_status,
    (r.res_checkout - r.res_checkin)::INTEGER AS nights_count
FROM t_reservation r
JOIN t_project p ON r.res_prj_code = p.prj_code
JOIN t_unit u ON r.res_prj_code = u.unt_prj_code AND r.res_unit_code = u.unt_code
JOIN t_person per ON r.res_per_code = per.per_code
ORDER BY r.res_checkin DESC
"#;

const SHAREHOLDING_SUMMARY_SQL: &str = r#"
SELECT
    s.shr_id,
    s.shr_per_code,
    TRIM(p.per_name || ' ' || p.per_last_name) AS person_name,
    s.shr_prj_code,
    prj.prj_title AS project_title,
    s.shr_shares,
    s.shr_unit_price,
    s.shr_total_value,
    s.shr_from_date,
    s.shr_to_date,
    s.shr_is_active
FROM t_shareholding s
JOIN t_person p ON s.shr_per_code = p.per_code
JOIN t_project prj ON s.shr_prj_code = prj.prj_code
ORDER BY s.shr_from_date DESC
"#;

const USER_LOG_AUDIT_SQL: &str = r#"
SELECT
    ul.ulg_id,
    ul.ulg_per_code,
    TRIM(p.per_name || ' ' || p.per_last_name) AS person_name,
    ul.ulg_action,
    ul.ulg_table_name,
    ul.ulg_record_key,
    ul.ulg_desc,
    ul.ulg_timestamp,
    ul.ulg_ip_address
FROM t_user_log ul
JOIN t_person p ON ul.ulg_per_code = p.per_code
ORDER BY ul.ulg_timestamp DESC
"#;

/// The reporting views in provisioning order
pub fn default_views() -> Vec<ViewDefinition> {
    vec![
        ViewDefinition::new(
            TRIAL_BALANCE,
            "Debit/credit totals and signed balance per active account",
            TRIAL_BALANCE_SQL,
        ),
        ViewDefinition::new(
            GENERAL_LEDGER,
            "Posted journal lines in chronological order",
            GENERAL_LEDGER_SQL,
        ),
        ViewDefinition::new(
            WALLET_BALANCE,
            "Wallet balance and transaction total per owner",
            WALLET_BALANCE_SQL,
        ),
        ViewDefinition::new(
            RESERVATION_SUMMARY,
            "Reservations with project, unit and guest names",
            RESERVATION_SUMMARY_SQL,
        ),
        ViewDefinition::new(
            SHAREHOLDING_SUMMARY,
            "Shareholdings with holder and project names",
            SHAREHOLDING_SUMMARY_SQL,
        ),
        ViewDefinition::new(
            USER_LOG_AUDIT,
            "User actions with the acting person's name",
            USER_LOG_AUDIT_SQL,
        ),
    ]
}
