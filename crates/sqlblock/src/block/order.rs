//! ORDER BY entries.

use crate::error::QbResult;
use crate::expr::Arg;
use crate::options::Options;
use crate::render::{Block, RenderCtx};
use crate::sanitize::sanitize_field_name;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Clone, Debug)]
enum OrderEntry {
    Field {
        field: String,
        direction: Option<Direction>,
    },
    Template {
        sql: String,
        args: Vec<Arg>,
        direction: Option<Direction>,
    },
}

/// `ORDER BY a ASC, b DESC`.
#[derive(Clone, Debug)]
pub struct OrderByBlock {
    options: Arc<Options>,
    entries: Vec<OrderEntry>,
}

impl OrderByBlock {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            options,
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, field: &str, direction: Option<Direction>) -> QbResult<()> {
        let field = sanitize_field_name(field, &self.options)?;
        self.entries.push(OrderEntry::Field { field, direction });
        Ok(())
    }

    /// Order by an expression whose parameter characters take `args`.
    ///
    /// The expression is used as written; it is not sanitized.
    pub fn add_template(&mut self, sql: &str, args: Vec<Arg>, direction: Option<Direction>) {
        self.entries.push(OrderEntry::Template {
            sql: sql.to_string(),
            args,
            direction,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn with_direction(text: String, direction: Option<Direction>) -> String {
    match direction {
        Some(dir) => format!("{text} {}", dir.as_sql()),
        None => text,
    }
}

impl Block for OrderByBlock {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        if self.entries.is_empty() {
            return Ok(String::new());
        }
        let mut parts = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            parts.push(match entry {
                OrderEntry::Field { field, direction } => with_direction(field.clone(), *direction),
                OrderEntry::Template {
                    sql,
                    args,
                    direction,
                } => with_direction(ctx.push_template(sql, args)?, *direction),
            });
        }
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }
}
