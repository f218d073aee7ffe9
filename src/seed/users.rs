use crate::error::SeedError;
use crate::model::{
    ErrorPolicy, ReconcileOutcome, Record, RecordReport, UserAccount, UserAccountSeed,
};
use crate::seed::Dataset;
use crate::store::RecordStore;
use anyhow::{Context, Result};

/// One-way password hashing for seeded credentials
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String>;
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool>;
}

#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        bcrypt::hash(plaintext, self.cost).context("Failed to hash password")
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(plaintext, hash).context("Failed to verify password hash")
    }
}

/// Accounts ready to reconcile, plus the seeds whose password could not be
/// resolved under [`ErrorPolicy::BestEffort`]
#[derive(Debug)]
pub struct PreparedUsers {
    pub accounts: Dataset<UserAccount>,
    pub failures: Vec<RecordReport>,
}

/// Turn declared accounts into persistable ones.
///
/// A persisted hash that still verifies against the declared password is kept,
/// so re-running the seed does not rewrite every account with a fresh salt.
pub async fn prepare_user_accounts<S, H>(
    store: &S,
    hasher: &H,
    seeds: &Dataset<UserAccountSeed>,
    policy: ErrorPolicy,
) -> Result<PreparedUsers, SeedError>
where
    S: RecordStore<UserAccount> + ?Sized,
    H: PasswordHasher + ?Sized,
{
    let mut accounts = Vec::with_capacity(seeds.len());
    let mut failures = Vec::new();
    for seed in seeds {
        let key = seed.natural_key();
        match resolve_hash(store, hasher, seed).await {
            Ok(hash) => accounts.push(seed.clone().into_account(hash)),
            Err(source) if policy == ErrorPolicy::FailFast => {
                return Err(SeedError::Reconcile {
                    kind: UserAccount::KIND,
                    key,
                    source,
                });
            }
            Err(source) => {
                log::warn!("{} '{}' failed: {:#}", UserAccount::KIND, key, source);
                failures.push(RecordReport {
                    key,
                    outcome: ReconcileOutcome::Failed(format!("{:#}", source)),
                });
            }
        }
    }
    Ok(PreparedUsers {
        accounts: Dataset::new(accounts)?,
        failures,
    })
}

async fn resolve_hash<S, H>(store: &S, hasher: &H, seed: &UserAccountSeed) -> Result<String>
where
    S: RecordStore<UserAccount> + ?Sized,
    H: PasswordHasher + ?Sized,
{
    if let Some(existing) = store.find_by_key(&seed.usr_per_code).await? {
        match hasher.verify(&seed.usr_password, &existing.usr_password_hash) {
            Ok(true) => return Ok(existing.usr_password_hash),
            Ok(false) => {}
            Err(e) => log::debug!(
                "Stored hash for '{}' could not be verified, rehashing: {:#}",
                seed.usr_username,
                e
            ),
        }
    }
    hasher.hash(&seed.usr_password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserRole;
    use crate::store::InMemoryStore;
    use anyhow::bail;

    /// Refuses to hash one specific password
    struct RefusingHasher;

    impl PasswordHasher for RefusingHasher {
        fn hash(&self, plaintext: &str) -> Result<String> {
            if plaintext == "unhashable" {
                bail!("hashing backend unavailable");
            }
            Ok(format!("hashed:{}", plaintext))
        }

        fn verify(&self, plaintext: &str, hash: &str) -> Result<bool> {
            Ok(hash == format!("hashed:{}", plaintext))
        }
    }

    fn seed(per_code: &str, password: &str) -> UserAccountSeed {
        UserAccountSeed {
            usr_per_code: per_code.to_string(),
            usr_username: per_code.to_lowercase(),
            usr_password: password.to_string(),
            usr_role: UserRole::Viewer,
            usr_avatar: None,
        }
    }

    fn seeds() -> Dataset<UserAccountSeed> {
        Dataset::new(vec![seed("P001", "unhashable"), seed("P002", "secret")]).unwrap()
    }

    #[tokio::test]
    async fn hashing_failure_is_fatal_under_fail_fast() {
        let store = InMemoryStore::new();
        let err =
            prepare_user_accounts(&store, &RefusingHasher, &seeds(), ErrorPolicy::FailFast)
                .await
                .unwrap_err();
        assert!(matches!(err, SeedError::Reconcile { ref key, .. } if key == "P001"));
    }

    #[tokio::test]
    async fn hashing_failure_is_recorded_under_best_effort() {
        let store = InMemoryStore::new();
        let prepared =
            prepare_user_accounts(&store, &RefusingHasher, &seeds(), ErrorPolicy::BestEffort)
                .await
                .unwrap();

        assert_eq!(prepared.accounts.len(), 1);
        assert_eq!(prepared.accounts.records()[0].usr_password_hash, "hashed:secret");
        assert_eq!(prepared.failures.len(), 1);
        assert_eq!(prepared.failures[0].key, "P001");
        assert!(matches!(prepared.failures[0].outcome, ReconcileOutcome::Failed(_)));
    }

    #[test]
    fn bcrypt_hash_verifies_and_hides_plaintext() {
        let hasher = BcryptHasher::new(4);
        let hash = hasher.hash("change-me").unwrap();
        assert_ne!(hash, "change-me");
        assert!(hasher.verify("change-me", &hash).unwrap());
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }
}
