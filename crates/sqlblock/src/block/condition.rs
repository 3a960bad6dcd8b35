//! WHERE and HAVING condition groups.

use crate::error::QbResult;
use crate::expr::{Condition, IntoCondition};
use crate::options::Options;
use crate::render::{Block, RenderCtx};
use std::sync::Arc;

/// `WHERE` / `HAVING`: each condition parenthesized, joined with `AND`.
#[derive(Clone, Debug)]
pub struct ConditionBlock {
    options: Arc<Options>,
    keyword: &'static str,
    conditions: Vec<Arc<dyn Condition>>,
}

impl ConditionBlock {
    pub fn where_(options: Arc<Options>) -> Self {
        Self::new(options, "WHERE")
    }

    pub fn having(options: Arc<Options>) -> Self {
        Self::new(options, "HAVING")
    }

    fn new(options: Arc<Options>, keyword: &'static str) -> Self {
        Self {
            options,
            keyword,
            conditions: Vec::new(),
        }
    }

    /// Add a condition; empty text and `None` are ignored.
    pub fn add(&mut self, condition: impl IntoCondition) {
        if let Some(condition) = condition.into_condition() {
            self.conditions.push(condition);
        }
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl Block for ConditionBlock {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        let mut parts = Vec::with_capacity(self.conditions.len());
        for condition in &self.conditions {
            let text = condition.render_condition(ctx)?;
            if !text.is_empty() {
                parts.push(format!("({text})"));
            }
        }
        if parts.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{} {}", self.keyword, parts.join(" AND ")))
    }
}
