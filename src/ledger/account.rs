use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::context::Context;

/// A bank account whose balance seeds the cash position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankAccount {
    pub id: Uuid,
    pub name: String,
    pub current_balance: f64,
    #[serde(default = "BankAccount::default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub context: Context,
}

impl BankAccount {
    /// Creates an active account with the given opening balance.
    pub fn new(name: impl Into<String>, current_balance: f64, context: Context) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            current_balance,
            is_active: true,
            context,
        }
    }

    fn default_active() -> bool {
        true
    }
}
