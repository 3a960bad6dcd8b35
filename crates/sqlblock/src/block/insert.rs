//! INSERT column/value blocks.
//!
//! [`InsertValuesBlock`] holds a rectangular grid: one field list and one row
//! of values per inserted record. [`InsertFromQueryBlock`] renders
//! `INSERT ... (a, b) (SELECT ...)`.

use crate::error::{QbError, QbResult};
use crate::expr::Arg;
use crate::options::Options;
use crate::query::Query;
use crate::render::{Block, RenderCtx};
use crate::sanitize::sanitize_field_name;
use std::sync::Arc;

fn render_arg(arg: &Arg, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
    match arg {
        Arg::Value(v) => ctx.push_value(v),
        Arg::Query(q) => ctx.push_nested(q),
    }
}

/// `(a, b) VALUES (?, ?), (?, ?)`.
#[derive(Clone, Debug)]
pub struct InsertValuesBlock {
    options: Arc<Options>,
    fields: Vec<String>,
    rows: Vec<Vec<Arg>>,
}

impl InsertValuesBlock {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            options,
            fields: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Set `field` to `value` in every row, adding the column if it is new.
    pub fn set(&mut self, field: &str, value: Arg) -> QbResult<()> {
        let field = sanitize_field_name(field, &self.options)?;
        if let Arg::Query(query) = &value {
            query.ensure_nestable()?;
        }
        if self.rows.is_empty() {
            self.rows.push(Vec::new());
        }
        match self.fields.iter().position(|f| *f == field) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.clone();
                }
            }
            None => {
                self.fields.push(field);
                for row in &mut self.rows {
                    row.push(value.clone());
                }
            }
        }
        Ok(())
    }

    /// Replace all rows.
    ///
    /// Every row must name the same fields as the first one, in any order;
    /// values are stored in the first row's field order.
    pub fn set_rows<S: AsRef<str>>(&mut self, rows: Vec<Vec<(S, Arg)>>) -> QbResult<()> {
        let mut rows = rows.into_iter();
        let Some(first) = rows.next() else {
            self.fields.clear();
            self.rows.clear();
            return Ok(());
        };

        let mut fields = Vec::with_capacity(first.len());
        let mut first_values = Vec::with_capacity(first.len());
        for (name, value) in first {
            let name = sanitize_field_name(name.as_ref(), &self.options)?;
            if fields.contains(&name) {
                return Err(QbError::invalid(format!(
                    "field {name} appears twice in one row"
                )));
            }
            fields.push(name);
            first_values.push(value);
        }

        let mut grid = vec![first_values];
        for (row_no, row) in rows.enumerate() {
            if row.len() != fields.len() {
                return Err(QbError::invalid(format!(
                    "row {} has {} field(s), expected {}",
                    row_no + 2,
                    row.len(),
                    fields.len()
                )));
            }
            let mut values: Vec<Option<Arg>> = vec![None; fields.len()];
            for (name, value) in row {
                let name = sanitize_field_name(name.as_ref(), &self.options)?;
                let Some(idx) = fields.iter().position(|f| *f == name) else {
                    return Err(QbError::invalid(format!(
                        "row {} has field {name} which the first row does not",
                        row_no + 2
                    )));
                };
                values[idx] = Some(value);
            }
            let values = values
                .into_iter()
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| {
                    QbError::invalid(format!("row {} repeats a field", row_no + 2))
                })?;
            grid.push(values);
        }

        for value in grid.iter().flatten() {
            if let Arg::Query(query) = value {
                query.ensure_nestable()?;
            }
        }

        self.fields = fields;
        self.rows = grid;
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Block for InsertValuesBlock {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        if self.fields.is_empty() {
            return Ok(String::new());
        }
        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let mut values = Vec::with_capacity(row.len());
            for value in row {
                values.push(render_arg(value, ctx)?);
            }
            rows.push(format!("({})", values.join(", ")));
        }
        Ok(format!(
            "({}) VALUES {}",
            self.fields.join(", "),
            rows.join(", ")
        ))
    }
}

/// `(a, b) (SELECT ...)`.
#[derive(Clone, Debug)]
pub struct InsertFromQueryBlock {
    options: Arc<Options>,
    fields: Vec<String>,
    query: Option<Box<Query>>,
}

impl InsertFromQueryBlock {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            options,
            fields: Vec::new(),
            query: None,
        }
    }

    pub fn set<S: AsRef<str>>(&mut self, fields: &[S], query: impl Into<Query>) -> QbResult<()> {
        let query = query.into();
        query.ensure_nestable()?;
        let fields = fields
            .iter()
            .map(|f| sanitize_field_name(f.as_ref(), &self.options))
            .collect::<QbResult<Vec<_>>>()?;
        self.fields = fields;
        self.query = Some(Box::new(query));
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_none()
    }
}

impl Block for InsertFromQueryBlock {
    fn options(&self) -> &Options {
        &self.options
    }

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
        let Some(query) = &self.query else {
            return Ok(String::new());
        };
        let nested = ctx.push_nested(query)?;
        if self.fields.is_empty() {
            Ok(nested)
        } else {
            Ok(format!("({}) {}", self.fields.join(", "), nested))
        }
    }
}
