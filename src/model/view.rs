use serde::{Deserialize, Serialize};

/// A named read model recomputed from base tables at query time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    pub name: String,
    pub description: String,
    pub select_sql: String,
}

impl ViewDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        select_sql: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            select_sql: select_sql.into(),
        }
    }

    fn drop_statement(&self) -> String {
        format!("DROP VIEW IF EXISTS {}", self.name)
    }

    fn create_statement(&self) -> String {
        format!("CREATE VIEW {} AS\n{}", self.name, self.select_sql.trim())
    }

    /// Drop then create, so an existing view with a different column list is
    /// replaced instead of rejected. Run both in one transaction.
    pub fn replace_statements(&self) -> Vec<String> {
        vec![self.drop_statement(), self.create_statement()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_statements_drop_before_create() {
        let view = ViewDefinition::new("v_demo", "demo", "  SELECT 1 AS one\n");
        assert_eq!(
            view.replace_statements(),
            vec![
                "DROP VIEW IF EXISTS v_demo".to_string(),
                "CREATE VIEW v_demo AS\nSELECT 1 AS one".to_string(),
            ]
        );
    }
}
