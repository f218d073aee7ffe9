use crate::error::SeedError;
use crate::model::DatasetKind;
use std::collections::HashSet;

/// Fixed processing order of reference datasets.
///
/// Every kind appears after the kinds its records point at, so a foreign key
/// is always persisted before the record that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRegistry {
    order: Vec<DatasetKind>,
}

impl DatasetRegistry {
    pub fn new(order: Vec<DatasetKind>) -> Result<Self, SeedError> {
        let mut seen = HashSet::new();
        for kind in &order {
            if !seen.insert(*kind) {
                return Err(SeedError::dependency_order(format!(
                    "{} is listed more than once",
                    kind
                )));
            }
            for dep in kind.depends_on() {
                if !seen.contains(dep) {
                    return Err(SeedError::dependency_order(format!(
                        "{} must be listed after {}",
                        kind, dep
                    )));
                }
            }
        }
        Ok(Self { order })
    }

    pub fn order(&self) -> &[DatasetKind] {
        &self.order
    }

    pub fn contains(&self, kind: DatasetKind) -> bool {
        self.order.contains(&kind)
    }
}

impl Default for DatasetRegistry {
    fn default() -> Self {
        Self {
            order: DatasetKind::ALL.to_vec(),
        }
    }
}
