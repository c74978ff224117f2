use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::CashflowError;

/// Ownership domain of a financial record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    #[default]
    Business,
    Personal,
}

/// Scope applied to context-aware aggregation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContextFilter {
    #[default]
    All,
    Business,
    Personal,
}

impl ContextFilter {
    pub fn matches(&self, context: Context) -> bool {
        match self {
            ContextFilter::All => true,
            ContextFilter::Business => context == Context::Business,
            ContextFilter::Personal => context == Context::Personal,
        }
    }
}

impl From<Context> for ContextFilter {
    fn from(context: Context) -> Self {
        match context {
            Context::Business => ContextFilter::Business,
            Context::Personal => ContextFilter::Personal,
        }
    }
}

impl fmt::Display for ContextFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContextFilter::All => "all",
            ContextFilter::Business => "business",
            ContextFilter::Personal => "personal",
        };
        f.write_str(label)
    }
}

impl FromStr for ContextFilter {
    type Err = CashflowError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ContextFilter::All),
            "business" => Ok(ContextFilter::Business),
            "personal" => Ok(ContextFilter::Personal),
            other => Err(CashflowError::Validation(format!(
                "unknown context `{other}` (expected all, business or personal)"
            ))),
        }
    }
}
