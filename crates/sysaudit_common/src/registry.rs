//! Check Registry
//!
//! Holds the known checks by identifier and runs them. One check failing
//! fatally does not stop the others in a multi-check run; its error is
//! returned alongside the other results.

use tracing::{debug, warn};

use crate::check::{Check, CheckContext, CheckMeta, CheckResult};
use crate::error::{AuditError, Result};
use crate::reboot::RebootCheck;

/// Result of running one check in a batch
#[derive(Debug)]
pub struct CheckRun {
    pub id: String,
    pub outcome: Result<CheckResult>,
}

#[derive(Default)]
pub struct CheckRegistry {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every check shipped in this crate
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.checks.push(Box::new(RebootCheck));
        registry
    }

    /// Add a check; identifiers must be unique
    pub fn register(&mut self, check: Box<dyn Check>) -> Result<()> {
        if self.get(check.id()).is_some() {
            return Err(AuditError::DuplicateCheck(check.id().to_string()));
        }
        self.checks.push(check);
        Ok(())
    }

    pub fn ids(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.id()).collect()
    }

    pub fn metas(&self) -> Vec<&CheckMeta> {
        self.checks.iter().map(|c| c.meta()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&dyn Check> {
        self.checks.iter().find(|c| c.id() == id).map(|c| c.as_ref())
    }

    /// Run one check by identifier
    pub fn run(&self, id: &str, ctx: &CheckContext) -> Result<CheckResult> {
        let check = self
            .get(id)
            .ok_or_else(|| AuditError::UnknownCheck(id.to_string()))?;
        debug!("Running check {}", id);
        check.run(ctx)
    }

    /// Run several checks in the given order
    pub fn run_selected(&self, ids: &[&str], ctx: &CheckContext) -> Vec<CheckRun> {
        ids.iter()
            .map(|id| {
                let outcome = self.run(id, ctx);
                if let Err(e) = &outcome {
                    warn!("Check {} aborted: {}", id, e);
                }
                CheckRun {
                    id: id.to_string(),
                    outcome,
                }
            })
            .collect()
    }
}
