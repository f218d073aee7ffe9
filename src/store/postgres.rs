use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, Executor, PgPool, Row};

use crate::model::{
    format_role_set, parse_role_set, Account, CompositeKey, GeneralLedgerRow, Person, Project,
    ReservationSummaryRow, Shareholding, ShareholdingSummaryRow, ThemeData, ThemeReport,
    TrialBalanceRow, Unit, UserAccount, UserLogAuditRow, Wallet, WalletBalanceRow,
};
use crate::seed::views;
use crate::store::traits::{RecordStore, ReportStore, ThemeStore, UserLookup, ViewStore};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection. Fails if the pool was already closed.
    pub async fn close(&self) -> Result<()> {
        if self.pool.is_closed() {
            bail!("PostgreSQL connection pool is already closed");
        }
        self.pool.close().await;
        Ok(())
    }
}

fn key_part<'a>(key: &'a CompositeKey, index: usize) -> Result<&'a str> {
    key.0
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Composite key '{}' has no part {}", key, index))
}

fn account_from_row(row: &PgRow) -> Result<Account> {
    Ok(Account {
        acc_code: row.get("acc_code"),
        acc_name: row.get("acc_name"),
        acc_parent_code: row.get("acc_parent_code"),
        acc_type: row.get::<String, _>("acc_type").parse()?,
        acc_category: row.get::<String, _>("acc_category").parse()?,
        acc_sublevel_format: row.get("acc_sublevel_format"),
        acc_is_active: row.get("acc_is_active"),
    })
}

fn person_from_row(row: &PgRow) -> Result<Person> {
    Ok(Person {
        per_code: row.get("per_code"),
        per_name: row.get("per_name"),
        per_last_name: row.get("per_last_name"),
        per_national_id: row.get("per_national_id"),
        per_mobile: row.get("per_mobile"),
        per_email: row.get("per_email"),
        per_type_set: parse_role_set(&row.get::<String, _>("per_type_set"))?,
        per_acc_code: row.get("per_acc_code"),
    })
}

fn user_from_row(row: &PgRow) -> Result<UserAccount> {
    Ok(UserAccount {
        usr_per_code: row.get("usr_per_code"),
        usr_username: row.get("usr_username"),
        usr_password_hash: row.get("usr_password"),
        usr_role: row.get::<String, _>("usr_role").parse()?,
        usr_avatar: row.get("usr_avatar"),
    })
}

fn project_from_row(row: &PgRow) -> Result<Project> {
    Ok(Project {
        prj_code: row.get("prj_code"),
        prj_title: row.get("prj_title"),
        prj_location: row.get("prj_location"),
        prj_type: row.get("prj_type"),
        prj_model: row.get::<String, _>("prj_model").parse()?,
        prj_start_date: row.get("prj_start_date"),
        prj_end_date: row.get("prj_end_date"),
        prj_nav: row.get("prj_nav"),
        prj_created_by: row.get("prj_created_by"),
    })
}

const USER_COLUMNS: &str = "usr_per_code, usr_username, usr_password, usr_role, usr_avatar";

#[async_trait::async_trait]
impl RecordStore<Account> for PostgresStore {
    async fn find_by_key(&self, key: &String) -> Result<Option<Account>> {
        let row = sqlx::query(
            "SELECT acc_code, acc_name, acc_parent_code, acc_type, acc_category, \
             acc_sublevel_format, acc_is_active FROM t_account WHERE acc_code = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account")?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn create(&self, account: &Account) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO t_account (acc_code, acc_name, acc_parent_code, acc_type, acc_category,
                                   acc_sublevel_format, acc_is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&account.acc_code)
        .bind(&account.acc_name)
        .bind(&account.acc_parent_code)
        .bind(account.acc_type.as_str())
        .bind(account.acc_category.as_str())
        .bind(account.acc_sublevel_format)
        .bind(account.acc_is_active)
        .execute(&self.pool)
        .await
        .context("Failed to insert account")?;

        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE t_account SET
                acc_name = $2,
                acc_parent_code = $3,
                acc_type = $4,
                acc_category = $5,
                acc_sublevel_format = $6,
                acc_is_active = $7
            WHERE acc_code = $1
            "#,
        )
        .bind(&account.acc_code)
        .bind(&account.acc_name)
        .bind(&account.acc_parent_code)
        .bind(account.acc_type.as_str())
        .bind(account.acc_category.as_str())
        .bind(account.acc_sublevel_format)
        .bind(account.acc_is_active)
        .execute(&self.pool)
        .await
        .context("Failed to update account")?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore<Person> for PostgresStore {
    async fn find_by_key(&self, key: &String) -> Result<Option<Person>> {
        let row = sqlx::query(
            "SELECT per_code, per_name, per_last_name, per_national_id, per_mobile, per_email, \
             per_type_set, per_acc_code FROM t_person WHERE per_code = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch person")?;

        row.as_ref().map(person_from_row).transpose()
    }

    async fn create(&self, person: &Person) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO t_person (per_code, per_name, per_last_name, per_national_id, per_mobile,
                                  per_email, per_type_set, per_acc_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&person.per_code)
        .bind(&person.per_name)
        .bind(&person.per_last_name)
        .bind(&person.per_national_id)
        .bind(&person.per_mobile)
        .bind(&person.per_email)
        .bind(format_role_set(&person.per_type_set))
        .bind(&person.per_acc_code)
        .execute(&self.pool)
        .await
        .context("Failed to insert person")?;

        Ok(())
    }

    async fn update(&self, person: &Person) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE t_person SET
                per_name = $2,
                per_last_name = $3,
                per_national_id = $4,
                per_mobile = $5,
                per_email = $6,
                per_type_set = $7,
                per_acc_code = $8
            WHERE per_code = $1
            "#,
        )
        .bind(&person.per_code)
        .bind(&person.per_name)
        .bind(&person.per_last_name)
        .bind(&person.per_national_id)
        .bind(&person.per_mobile)
        .bind(&person.per_email)
        .bind(format_role_set(&person.per_type_set))
        .bind(&person.per_acc_code)
        .execute(&self.pool)
        .await
        .context("Failed to update person")?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore<UserAccount> for PostgresStore {
    async fn find_by_key(&self, key: &String) -> Result<Option<UserAccount>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM t_user_account WHERE usr_per_code = $1",
            USER_COLUMNS
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user account")?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn create(&self, user: &UserAccount) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO t_user_account (usr_per_code, usr_username, usr_password, usr_role, usr_avatar)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&user.usr_per_code)
        .bind(&user.usr_username)
        .bind(&user.usr_password_hash)
        .bind(user.usr_role.as_str())
        .bind(&user.usr_avatar)
        .execute(&self.pool)
        .await
        .context("Failed to insert user account")?;

        Ok(())
    }

    async fn update(&self, user: &UserAccount) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE t_user_account SET
                usr_username = $2,
                usr_password = $3,
                usr_role = $4,
                usr_avatar = $5
            WHERE usr_per_code = $1
            "#,
        )
        .bind(&user.usr_per_code)
        .bind(&user.usr_username)
        .bind(&user.usr_password_hash)
        .bind(user.usr_role.as_str())
        .bind(&user.usr_avatar)
        .execute(&self.pool)
        .await
        .context("Failed to update user account")?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore<Wallet> for PostgresStore {
    async fn find_by_key(&self, key: &String) -> Result<Option<Wallet>> {
        let row = sqlx::query(
            "SELECT wlt_per_code, wlt_balance, wlt_created_by FROM t_wallet WHERE wlt_per_code = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch wallet")?;

        Ok(row.map(|row| Wallet {
            wlt_per_code: row.get("wlt_per_code"),
            wlt_balance: row.get("wlt_balance"),
            wlt_created_by: row.get("wlt_created_by"),
        }))
    }

    async fn create(&self, wallet: &Wallet) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO t_wallet (wlt_per_code, wlt_balance, wlt_created_by, wlt_last_update)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(&wallet.wlt_per_code)
        .bind(wallet.wlt_balance)
        .bind(&wallet.wlt_created_by)
        .execute(&self.pool)
        .await
        .context("Failed to insert wallet")?;

        Ok(())
    }

    async fn update(&self, wallet: &Wallet) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE t_wallet SET
                wlt_balance = $2,
                wlt_created_by = $3,
                wlt_last_update = NOW()
            WHERE wlt_per_code = $1
            "#,
        )
        .bind(&wallet.wlt_per_code)
        .bind(wallet.wlt_balance)
        .bind(&wallet.wlt_created_by)
        .execute(&self.pool)
        .await
        .context("Failed to update wallet")?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore<Project> for PostgresStore {
    async fn find_by_key(&self, key: &String) -> Result<Option<Project>> {
        let row = sqlx::query(
            "SELECT prj_code, prj_title, prj_location, prj_type, prj_model, prj_start_date, \
             prj_end_date, prj_nav, prj_created_by FROM t_project WHERE prj_code = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch project")?;

        row.as_ref().map(project_from_row).transpose()
    }

    async fn create(&self, project: &Project) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO t_project (prj_code, prj_title, prj_location, prj_type, prj_model,
                                   prj_start_date, prj_end_date, prj_nav, prj_created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&project.prj_code)
        .bind(&project.prj_title)
        .bind(&project.prj_location)
        .bind(&project.prj_type)
        .bind(project.prj_model.as_str())
        .bind(project.prj_start_date)
        .bind(project.prj_end_date)
        .bind(project.prj_nav)
        .bind(&project.prj_created_by)
        .execute(&self.pool)
        .await
        .context("Failed to insert project")?;

        Ok(())
    }

    async fn update(&self, project: &Project) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE t_project SET
                prj_title = $2,
                prj_location = $3,
                prj_type = $4,
                prj_model = $5,
                prj_start_date = $6,
                prj_end_date = $7,
                prj_nav = $8,
                prj_created_by = $9
            WHERE prj_code = $1
            "#,
        )
        .bind(&project.prj_code)
        .bind(&project.prj_title)
        .bind(&project.prj_location)
        .bind(&project.prj_type)
        .bind(project.prj_model.as_str())
        .bind(project.prj_start_date)
        .bind(project.prj_end_date)
        .bind(project.prj_nav)
        .bind(&project.prj_created_by)
        .execute(&self.pool)
        .await
        .context("Failed to update project")?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore<Unit> for PostgresStore {
    async fn find_by_key(&self, key: &CompositeKey) -> Result<Option<Unit>> {
        let row = sqlx::query(
            "SELECT unt_prj_code, unt_code, unt_title, unt_type, unt_area, unt_capacity, \
             unt_floor, unt_block, unt_created_by FROM t_unit \
             WHERE unt_prj_code = $1 AND unt_code = $2",
        )
        .bind(key_part(key, 0)?)
        .bind(key_part(key, 1)?)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch unit")?;

        Ok(row.map(|row| Unit {
            unt_prj_code: row.get("unt_prj_code"),
            unt_code: row.get("unt_code"),
            unt_title: row.get("unt_title"),
            unt_type: row.get("unt_type"),
            unt_area: row.get("unt_area"),
            unt_capacity: row.get("unt_capacity"),
            unt_floor: row.get("unt_floor"),
            unt_block: row.get("unt_block"),
            unt_created_by: row.get("unt_created_by"),
        }))
    }

    async fn create(&self, unit: &Unit) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO t_unit (unt_prj_code, unt_code, unt_title, unt_type, unt_area,
                                unt_capacity, unt_floor, unt_block, unt_created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&unit.unt_prj_code)
        .bind(&unit.unt_code)
        .bind(&unit.unt_title)
        .bind(&unit.unt_type)
        .bind(unit.unt_area)
        .bind(unit.unt_capacity)
        .bind(&unit.unt_floor)
        .bind(&unit.unt_block)
        .bind(&unit.unt_created_by)
        .execute(&self.pool)
        .await
        .context("Failed to insert unit")?;

        Ok(())
    }

    async fn update(&self, unit: &Unit) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE t_unit SET
                unt_title = $3,
                unt_type = $4,
                unt_area = $5,
                unt_capacity = $6,
                unt_floor = $7,
                unt_block = $8,
                unt_created_by = $9
            WHERE unt_prj_code = $1 AND unt_code = $2
            "#,
        )
        .bind(&unit.unt_prj_code)
        .bind(&unit.unt_code)
        .bind(&unit.unt_title)
        .bind(&unit.unt_type)
        .bind(unit.unt_area)
        .bind(unit.unt_capacity)
        .bind(&unit.unt_floor)
        .bind(&unit.unt_block)
        .bind(&unit.unt_created_by)
        .execute(&self.pool)
        .await
        .context("Failed to update unit")?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore<Shareholding> for PostgresStore {
    async fn find_by_key(&self, key: &CompositeKey) -> Result<Option<Shareholding>> {
        let from_date = NaiveDate::parse_from_str(key_part(key, 2)?, "%Y-%m-%d")
            .with_context(|| format!("Invalid from-date in shareholding key '{}'", key))?;

        let row = sqlx::query(
            "SELECT shr_per_code, shr_prj_code, shr_shares, shr_unit_price, shr_total_value, \
             shr_from_date, shr_to_date, shr_is_active, shr_created_by FROM t_shareholding \
             WHERE shr_per_code = $1 AND shr_prj_code = $2 AND shr_from_date = $3",
        )
        .bind(key_part(key, 0)?)
        .bind(key_part(key, 1)?)
        .bind(from_date)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch shareholding")?;

        Ok(row.map(|row| Shareholding {
            shr_per_code: row.get("shr_per_code"),
            shr_prj_code: row.get("shr_prj_code"),
            shr_shares: row.get("shr_shares"),
            shr_unit_price: row.get("shr_unit_price"),
            shr_total_value: row.get("shr_total_value"),
            shr_from_date: row.get("shr_from_date"),
            shr_to_date: row.get("shr_to_date"),
            shr_is_active: row.get("shr_is_active"),
            shr_created_by: row.get("shr_created_by"),
        }))
    }

    async fn create(&self, holding: &Shareholding) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO t_shareholding (shr_per_code, shr_prj_code, shr_shares, shr_unit_price,
                                        shr_total_value, shr_from_date, shr_to_date,
                                        shr_is_active, shr_created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&holding.shr_per_code)
        .bind(&holding.shr_prj_code)
        .bind(holding.shr_shares)
        .bind(holding.shr_unit_price)
        .bind(holding.shr_total_value)
        .bind(holding.shr_from_date)
        .bind(holding.shr_to_date)
        .bind(holding.shr_is_active)
        .bind(&holding.shr_created_by)
        .execute(&self.pool)
        .await
        .context("Failed to insert shareholding")?;

        Ok(())
    }

    async fn update(&self, holding: &Shareholding) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE t_shareholding SET
                shr_shares = $4,
                shr_unit_price = $5,
                shr_total_value = $6,
                shr_to_date = $7,
                shr_is_active = $8,
                shr_created_by = $9
            WHERE shr_per_code = $1 AND shr_prj_code = $2 AND shr_from_date = $3
            "#,
        )
        .bind(&holding.shr_per_code)
        .bind(&holding.shr_prj_code)
        .bind(holding.shr_from_date)
        .bind(holding.shr_shares)
        .bind(holding.shr_unit_price)
        .bind(holding.shr_total_value)
        .bind(holding.shr_to_date)
        .bind(holding.shr_is_active)
        .bind(&holding.shr_created_by)
        .execute(&self.pool)
        .await
        .context("Failed to update shareholding")?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl ViewStore for PostgresStore {
    async fn execute_raw(&self, statement: &str) -> Result<u64> {
        // Simple query protocol: DDL does not need a prepared statement
        let result = (&self.pool)
            .execute(statement)
            .await
            .context("Failed to execute statement")?;
        Ok(result.rows_affected())
    }

    async fn execute_batch(&self, statements: &[String]) -> Result<u64> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;
        let mut affected = 0;
        for statement in statements {
            affected += (&mut *tx)
                .execute(statement.as_str())
                .await
                .context("Failed to execute statement")?
                .rows_affected();
        }
        tx.commit().await.context("Failed to commit transaction")?;
        Ok(affected)
    }
}

#[async_trait::async_trait]
impl ThemeStore for PostgresStore {
    async fn replace_theme(&self, theme: &ThemeData) -> Result<ThemeReport> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start theme transaction")?;

        let mut removed = 0;
        for table in [
            "t_theme_settings",
            "t_theme_languages",
            "t_theme_links",
            "t_theme_templates",
        ] {
            removed += sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to clear {}", table))?
                .rows_affected();
        }

        for language in &theme.languages {
            sqlx::query(
                r#"
                INSERT INTO t_theme_languages (code, name, native_name, direction, calendar,
                    font_primary, font_fallback, translation_file, date_format, time_format,
                    number_format, currency, currency_symbol, is_active, is_default)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                "#,
            )
            .bind(&language.code)
            .bind(&language.name)
            .bind(&language.native_name)
            .bind(language.direction.as_str())
            .bind(&language.calendar)
            .bind(&language.font_primary)
            .bind(&language.font_fallback)
            .bind(&language.translation_file)
            .bind(&language.date_format)
            .bind(&language.time_format)
            .bind(&language.number_format)
            .bind(&language.currency)
            .bind(&language.currency_symbol)
            .bind(language.is_active)
            .bind(language.is_default)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert theme language '{}'", language.code))?;
        }

        for setting in &theme.settings {
            sqlx::query(
                r#"
                INSERT INTO t_theme_settings (category, key, value, language_code)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&setting.category)
            .bind(&setting.key)
            .bind(&setting.value)
            .bind(&setting.language_code)
            .execute(&mut *tx)
            .await
            .with_context(|| {
                format!("Failed to insert theme setting '{}.{}'", setting.category, setting.key)
            })?;
        }

        for link in &theme.links {
            sqlx::query(
                r#"
                INSERT INTO t_theme_links (link_type, title, icon, image_path, url, sort_order)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&link.link_type)
            .bind(&link.title)
            .bind(&link.icon)
            .bind(&link.image_path)
            .bind(&link.url)
            .bind(link.sort_order)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert theme link '{}'", link.title))?;
        }

        for template in &theme.templates {
            sqlx::query(
                r#"
                INSERT INTO t_theme_templates (id, name, description, settings, is_default, is_system)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&template.id)
            .bind(&template.name)
            .bind(&template.description)
            .bind(&template.settings)
            .bind(template.is_default)
            .bind(template.is_system)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert theme template '{}'", template.id))?;
        }

        tx.commit()
            .await
            .context("Failed to commit theme transaction")?;

        Ok(ThemeReport {
            removed,
            languages: theme.languages.len(),
            settings: theme.settings.len(),
            links: theme.links.len(),
            templates: theme.templates.len(),
        })
    }
}

#[async_trait::async_trait]
impl UserLookup for PostgresStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM t_user_account WHERE usr_username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up user")?;

        row.as_ref().map(user_from_row).transpose()
    }
}

#[async_trait::async_trait]
impl ReportStore for PostgresStore {
    async fn trial_balance(&self) -> Result<Vec<TrialBalanceRow>> {
        let rows = sqlx::query(&format!(
            "SELECT acc_code, acc_name, acc_type, acc_category, total_debit, total_credit, \
             balance FROM {} ORDER BY acc_code",
            views::TRIAL_BALANCE
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to read trial balance")?;

        rows.iter()
            .map(|row| -> Result<TrialBalanceRow> {
                Ok(TrialBalanceRow {
                    acc_code: row.get("acc_code"),
                    acc_name: row.get("acc_name"),
                    acc_type: row.get::<String, _>("acc_type").parse()?,
                    acc_category: row.get::<String, _>("acc_category").parse()?,
                    total_debit: row.get("total_debit"),
                    total_credit: row.get("total_credit"),
                    balance: row.get("balance"),
                })
            })
            .collect()
    }

    async fn general_ledger(&self) -> Result<Vec<GeneralLedgerRow>> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM {} ORDER BY jrn_date, jrn_code, jrd_line_no",
            views::GENERAL_LEDGER
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to read general ledger")?;

        Ok(rows
            .iter()
            .map(|row| GeneralLedgerRow {
                jrn_date: row.get("jrn_date"),
                jrn_code: row.get("jrn_code"),
                jrn_desc: row.get("jrn_desc"),
                jrd_line_no: row.get("jrd_line_no"),
                jrd_acc_code: row.get("jrd_acc_code"),
                account_name: row.get("account_name"),
                jrd_debit: row.get("jrd_debit"),
                jrd_credit: row.get("jrd_credit"),
                line_desc: row.get("line_desc"),
                jrn_module: row.get("jrn_module"),
                jrn_ref_code: row.get("jrn_ref_code"),
            })
            .collect())
    }

    async fn wallet_balances(&self) -> Result<Vec<WalletBalanceRow>> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM {} ORDER BY wlt_per_code",
            views::WALLET_BALANCE
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to read wallet balances")?;

        Ok(rows
            .iter()
            .map(|row| WalletBalanceRow {
                wlt_per_code: row.get("wlt_per_code"),
                person_name: row.get("person_name"),
                wlt_balance: row.get("wlt_balance"),
                wlt_last_update: row.get("wlt_last_update"),
                total_transactions: row.get("total_transactions"),
            })
            .collect())
    }

    async fn reservation_summary(&self) -> Result<Vec<ReservationSummaryRow>> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM {} ORDER BY res_checkin DESC, res_id",
            views::RESERVATION_SUMMARY
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to read reservation summary")?;

        Ok(rows
            .iter()
            .map(|row| ReservationSummaryRow {
                res_id: row.get("res_id"),
                res_prj_code: row.get("res_prj_code"),
                project_title: row.get("project_title"),
                res_unit_code: row.get("res_unit_code"),
                unit_title: row.get("unit_title"),
                res_per_code: row.get("res_per_code"),
                person_name: row.get("person_name"),
                res_checkin: row.get("res_checkin"),
                res_checkout: row.get("res_checkout"),
                res_guest_count: row.get("res_guest_count"),
                res_total_price: row.get("res_total_price"),
                res_status: row.get("res_status"),
                nights_count: row.get("nights_count"),
            })
            .collect())
    }

    async fn shareholding_summary(&self) -> Result<Vec<ShareholdingSummaryRow>> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM {} ORDER BY shr_from_date DESC, shr_id",
            views::SHAREHOLDING_SUMMARY
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to read shareholding summary")?;

        Ok(rows
            .iter()
            .map(|row| ShareholdingSummaryRow {
                shr_per_code: row.get("shr_per_code"),
                person_name: row.get("person_name"),
                shr_prj_code: row.get("shr_prj_code"),
                project_title: row.get("project_title"),
                shr_shares: row.get("shr_shares"),
                shr_unit_price: row.get("shr_unit_price"),
                shr_total_value: row.get("shr_total_value"),
                shr_from_date: row.get("shr_from_date"),
                shr_to_date: row.get("shr_to_date"),
                shr_is_active: row.get("shr_is_active"),
            })
            .collect())
    }

    async fn user_log_audit(&self) -> Result<Vec<UserLogAuditRow>> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM {} ORDER BY ulg_timestamp DESC, ulg_id",
            views::USER_LOG_AUDIT
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to read user log audit")?;

        Ok(rows
            .iter()
            .map(|row| UserLogAuditRow {
                ulg_id: row.get("ulg_id"),
                ulg_per_code: row.get("ulg_per_code"),
                person_name: row.get("person_name"),
                ulg_action: row.get("ulg_action"),
                ulg_table_name: row.get("ulg_table_name"),
                ulg_record_key: row.get("ulg_record_key"),
                ulg_desc: row.get("ulg_desc"),
                ulg_timestamp: row.get("ulg_timestamp"),
                ulg_ip_address: row.get("ulg_ip_address"),
            })
            .collect())
    }
}
