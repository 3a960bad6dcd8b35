//! Selected field list and GROUP BY.

use crate::error::QbResult;
use crate::options::Options;
use crate::query::Query;
use crate::render::{Block, RenderCtx};
use crate::sanitize::{sanitize_field_alias, sanitize_field_name};
use std::sync::Arc;

#[derive(Clone, Debug)]
enum FieldSource {
    Name(String),
    Nested(Box<Query>),
}

#[derive(Clone, Debug)]
struct Field {
    source: FieldSource,
    alias: Option<String>,
}

/// The SELECT column list. Renders `*` when no field was added.
#[derive(Clone, Debug)]
pub struct FieldsBlock {
    options: Arc<Options>,
    fields: Vec<Field>,
}

impl FieldsBlock {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            options,
            fields: Vec::new(),
        }
    }

    /// Add `name [AS alias]`. Adding the same name and alias twice is a no-op.
    pub fn add_field(&mut self, name: &str, alias: Option<&str>) -> QbResult<()> {
        let name = sanitize_field_name(name, &self.options)?;
        let alias = alias
            .map(|a| sanitize_field_alias(a, &self.options))
            .transpose()?;
        let duplicate = self.fields.iter().any(|f| {
            matches!(&f.source, FieldSource::Name(existing) if *existing == name) && f.alias == alias
        });
        if !duplicate {
            self.fields.push(Field {
                source: FieldSource::Name(name),
                alias,
            });
        }
        Ok(())
    }

    /// Add `(SELECT ...) [AS alias]`.
    pub fn add_query(&mut self, query: impl Into<Query>, alias: Option<&str>) -> QbResult<()> {
        let query = query.into();
        query.ensure_nestable()?;
        let alias = alias
            .map(|a| sanitize_field_alias(a, &self.options))
            .transpose()?;
        self.fields.push(Field {
            source: FieldSource::Nested(Box::new(query)),
            alias,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Block for FieldsBlock {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        if self.fields.is_empty() {
            return Ok("*".to_string());
        }
        let mut parts = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let text = match &field.source {
                FieldSource::Name(name) => name.clone(),
                FieldSource::Nested(query) => ctx.push_nested(query)?,
            };
            parts.push(match &field.alias {
                Some(alias) => format!("{text} AS {alias}"),
                None => text,
            });
        }
        Ok(parts.join(", "))
    }
}

/// `GROUP BY a, b`.
#[derive(Clone, Debug)]
pub struct GroupByBlock {
    options: Arc<Options>,
    fields: Vec<String>,
}

impl GroupByBlock {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            options,
            fields: Vec::new(),
        }
    }

    pub fn add(&mut self, field: &str) -> QbResult<()> {
        let field = sanitize_field_name(field, &self.options)?;
        self.fields.push(field);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Block for GroupByBlock {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, _ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        if self.fields.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("GROUP BY {}", self.fields.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Delete, Select};

    fn quoting() -> Arc<Options> {
        Arc::new(
            Options::default()
                .with_auto_quote(true)
                .with_quote_character("\""),
        )
    }

    #[test]
    fn empty_fields_render_star() {
        let block = FieldsBlock::new(quoting());
        assert_eq!(block.to_sql().unwrap(), "*");
    }

    #[test]
    fn fields_and_aliases() {
        let mut block = FieldsBlock::new(quoting());
        block.add_field("u.id", None).unwrap();
        block.add_field("name", Some("n")).unwrap();
        block.add_field("name", Some("n")).unwrap();
        assert_eq!(block.len(), 2);
        assert_eq!(block.to_sql().unwrap(), r#""u"."id", "name" AS "n""#);
    }

    #[test]
    fn nested_field_query() {
        let sub = Select::new(Arc::new(Options::default()))
            .field("count(*)")
            .unwrap()
            .from("o")
            .unwrap();
        let mut block = FieldsBlock::new(Arc::new(Options::default()));
        block.add_query(sub, Some("total")).unwrap();
        assert_eq!(
            block.to_sql().unwrap(),
            r#"(SELECT count(*) FROM o) AS "total""#
        );
    }

    #[test]
    fn non_nestable_field_query_is_rejected() {
        let mut block = FieldsBlock::new(quoting());
        let err = block
            .add_query(Delete::new(quoting()), None)
            .unwrap_err();
        assert!(err.is_unsupported_nesting());
    }

    #[test]
    fn group_by_lists_fields() {
        let mut block = GroupByBlock::new(Arc::new(Options::default()));
        assert_eq!(block.to_sql().unwrap(), "");
        block.add("a").unwrap();
        block.add("b").unwrap();
        assert_eq!(block.to_sql().unwrap(), "GROUP BY a, b");
        assert!(block.add("").is_err());
    }
}
