// src/engine/context.rs

//! Per-run compute context.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied run parameters, as received at the scheduler boundary.
///
/// `subject` is required (the tenant/user the computation is scoped to);
/// `fiscal_year` is an optional temporal scope. Any other fields flatten
/// into `params` and are passed through to handlers untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextInputs {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<i32>,
    #[serde(flatten)]
    pub params: serde_json::Map<String, Value>,
}

impl ContextInputs {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            fiscal_year: None,
            params: serde_json::Map::new(),
        }
    }

    pub fn with_fiscal_year(mut self, year: i32) -> Self {
        self.fiscal_year = Some(year);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// Immutable per-run input object handed to every handler invocation.
///
/// Built once per run from [`ContextInputs`] and shared via `Arc`; fields
/// are private so handlers cannot mutate it.
#[derive(Debug, Clone)]
pub struct ComputeContext {
    subject: String,
    fiscal_year: Option<i32>,
    params: serde_json::Map<String, Value>,
}

impl ComputeContext {
    pub fn from_inputs(inputs: ContextInputs) -> Self {
        Self {
            subject: inputs.subject,
            fiscal_year: inputs.fiscal_year,
            params: inputs.params,
        }
    }

    /// Identifier of the tenant/user this run is scoped to.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Temporal scope of the run, if the caller supplied one.
    pub fn fiscal_year(&self) -> Option<i32> {
        self.fiscal_year
    }

    /// Extra run-scoped parameter by name.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn params(&self) -> &serde_json::Map<String, Value> {
        &self.params
    }
}
