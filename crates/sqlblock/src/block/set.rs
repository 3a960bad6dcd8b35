//! UPDATE SET assignments.

use crate::error::{QbError, QbResult};
use crate::expr::Arg;
use crate::options::Options;
use crate::render::{Block, RenderCtx};
use crate::sanitize::sanitize_field_name;
use std::sync::Arc;

#[derive(Clone, Debug)]
enum SetEntry {
    Assign { field: String, value: Arg },
    Raw { sql: String, args: Vec<Arg> },
}

/// `SET a = ?, b = (SELECT ...), c = c + 1` for UPDATE.
///
/// An UPDATE without any entry is incomplete, so this block fails to render
/// when empty.
#[derive(Clone, Debug)]
pub struct SetFieldBlock {
    options: Arc<Options>,
    entries: Vec<SetEntry>,
}

impl SetFieldBlock {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            options,
            entries: Vec::new(),
        }
    }

    /// Assign `field = value`. Setting a field again replaces its value.
    pub fn set(&mut self, field: &str, value: Arg) -> QbResult<()> {
        let field = sanitize_field_name(field, &self.options)?;
        if let Arg::Query(query) = &value {
            query.ensure_nestable()?;
        }
        let existing = self.entries.iter_mut().find_map(|entry| match entry {
            SetEntry::Assign { field: f, value } if *f == field => Some(value),
            _ => None,
        });
        match existing {
            Some(slot) => *slot = value,
            None => self.entries.push(SetEntry::Assign { field, value }),
        }
        Ok(())
    }

    /// A whole assignment written by hand, e.g. `count = count + ?`.
    pub fn set_raw(&mut self, sql: &str, args: Vec<Arg>) -> QbResult<()> {
        if sql.trim().is_empty() {
            return Err(QbError::invalid("SET expression cannot be empty"));
        }
        self.entries.push(SetEntry::Raw {
            sql: sql.to_string(),
            args,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Block for SetFieldBlock {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        if self.entries.is_empty() {
            return Err(QbError::incomplete(
                "UPDATE requires at least one field: call set() first",
            ));
        }
        let mut parts = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            parts.push(match entry {
                SetEntry::Assign { field, value } => {
                    let value = match value {
                        Arg::Value(v) => ctx.push_value(v)?,
                        Arg::Query(q) => ctx.push_nested(q)?,
                    };
                    format!("{field} = {value}")
                }
                SetEntry::Raw { sql, args } => ctx.push_template(sql, args)?,
            });
        }
        Ok(format!("SET {}", parts.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn empty_set_is_incomplete() {
        let block = SetFieldBlock::new(Arc::new(Options::default()));
        assert!(block.to_sql().unwrap_err().is_incomplete());
    }

    #[test]
    fn set_replaces_same_field() {
        let mut block = SetFieldBlock::new(Arc::new(Options::default()));
        block.set("name", Arg::value("a")).unwrap();
        block.set("age", Arg::value(3i32)).unwrap();
        block.set("name", Arg::value("b")).unwrap();
        block.set_raw("visits = visits + ?", vec![Arg::value(1i32)]).unwrap();
        let param = block.to_param().unwrap();
        assert_eq!(param.text, "SET name = ?, age = ?, visits = visits + ?");
        assert_eq!(
            param.values,
            vec![Value::Text("b".into()), Value::Int(3), Value::Int(1)]
        );
        assert_eq!(
            block.to_sql().unwrap(),
            "SET name = 'b', age = 3, visits = visits + 1"
        );
    }

    #[test]
    fn rejects_bad_field() {
        let mut block = SetFieldBlock::new(Arc::new(Options::default()));
        assert!(block.set("", Arg::value(1i32)).is_err());
        assert!(block.set_raw("  ", vec![]).is_err());
        assert!(block.is_empty());
    }
}
