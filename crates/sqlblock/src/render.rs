//! The dual-render protocol.
//!
//! Every block renders into a [`RenderCtx`]. In [`RenderMode::Inline`] values are
//! formatted as literals in place; in [`RenderMode::Param`] each value is
//! appended to the context and replaced by a placeholder. Nested queries render
//! into the same context, so placeholder numbers are computed as text is
//! produced and always follow left-to-right order, however deep the nesting.

use crate::error::{QbError, QbResult};
use crate::expr::Arg;
use crate::options::Options;
use crate::query::{Query, StatementKind};
use crate::value::{HandlerOutput, Value, format_literal};
use serde::Serialize;
use std::fmt;

/// Which of the two outputs is being produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// SQL text with values interpolated as literals (`to_sql()`).
    Inline,
    /// SQL text with placeholders plus a value list (`to_param()`).
    Param,
}

/// The result of a parameterized render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParamQuery {
    pub text: String,
    pub values: Vec<Value>,
}

impl ParamQuery {
    pub fn new(text: String, values: Vec<Value>) -> Self {
        Self { text, values }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.values.is_empty()
    }
}

/// Mutable state threaded through one render pass.
#[derive(Debug)]
pub struct RenderCtx<'a> {
    options: &'a Options,
    mode: RenderMode,
    values: Vec<Value>,
    nested: bool,
}

impl<'a> RenderCtx<'a> {
    pub fn new(options: &'a Options, mode: RenderMode) -> Self {
        Self {
            options,
            mode,
            values: Vec::new(),
            nested: false,
        }
    }

    pub fn options(&self) -> &'a Options {
        self.options
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Whether the block being rendered belongs to a nested query.
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// Number of values bound so far.
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Emit one value: its literal in inline mode, a bound placeholder otherwise.
    ///
    /// Lists expand to `(a, b, ...)` with one entry per element.
    pub fn push_value(&mut self, value: &Value) -> QbResult<String> {
        match self.mode {
            RenderMode::Inline => format_literal(value, self.options),
            RenderMode::Param => {
                let value = match self.options.value_handlers.get(value.type_id()) {
                    Some(handler) => match handler(value, true) {
                        HandlerOutput::Raw(text) => return Ok(text),
                        HandlerOutput::Value(v) => v,
                    },
                    None => value.clone(),
                };
                if let Value::List(items) = &value {
                    let parts = items
                        .iter()
                        .map(|item| self.push_value(item))
                        .collect::<QbResult<Vec<_>>>()?;
                    return Ok(format!("({})", parts.join(", ")));
                }
                let placeholder = self.options.placeholder(self.values.len());
                self.values.push(value);
                Ok(placeholder)
            }
        }
    }

    /// Render a query as a derived table or sub-expression.
    ///
    /// The query shares this context's value list. Output is parenthesized unless
    /// `raw_nesting` is set.
    pub fn push_nested(&mut self, query: &Query) -> QbResult<String> {
        query.ensure_nestable()?;
        let outer = std::mem::replace(&mut self.nested, true);
        let text = query.render(self);
        self.nested = outer;
        let text = text?;
        if self.options.raw_nesting {
            Ok(text)
        } else {
            Ok(format!("({text})"))
        }
    }

    /// Substitute each parameter character in `template` with the next argument.
    ///
    /// A template with no arguments is literal text and is not scanned.
    pub fn push_template(&mut self, template: &str, args: &[Arg]) -> QbResult<String> {
        if args.is_empty() {
            return Ok(template.to_string());
        }
        let marker = self.options.parameter_character.clone();
        if marker.is_empty() {
            return Err(QbError::invalid("parameter character is empty"));
        }
        let expected = template.matches(marker.as_str()).count();
        if expected != args.len() {
            return Err(QbError::invalid(format!(
                "template `{template}` has {expected} placeholder(s) but {} value(s)",
                args.len()
            )));
        }

        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        let mut args = args.iter();
        while let Some(pos) = rest.find(marker.as_str()) {
            out.push_str(&rest[..pos]);
            if let Some(arg) = args.next() {
                let text = match arg {
                    Arg::Value(v) => self.push_value(v)?,
                    Arg::Query(q) => self.push_nested(q)?,
                };
                out.push_str(&text);
            }
            rest = &rest[pos + marker.len()..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// One clause fragment of a statement.
///
/// `render` returns an empty string for a block with nothing to contribute, so
/// statements can drop it without leaving separator artifacts.
pub trait Block: fmt::Debug + Send + Sync {
    /// Options the block was constructed with.
    fn options(&self) -> &Options;

    fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String>;

    /// Render with values interpolated as literals.
    fn to_sql(&self) -> QbResult<String> {
        render_block(self, RenderMode::Inline).map(|q| q.text)
    }

    /// Render as text plus positional values.
    fn to_param(&self) -> QbResult<ParamQuery> {
        render_block(self, RenderMode::Param)
    }
}

pub(crate) fn render_block<B: Block + ?Sized>(block: &B, mode: RenderMode) -> QbResult<ParamQuery> {
    render_traced(block, mode, None)
}

/// Render a whole statement; the log event carries its kind.
pub(crate) fn render_statement<B: Block + ?Sized>(
    block: &B,
    kind: StatementKind,
    mode: RenderMode,
) -> QbResult<ParamQuery> {
    render_traced(block, mode, Some(kind))
}

fn render_traced<B: Block + ?Sized>(
    block: &B,
    mode: RenderMode,
    kind: Option<StatementKind>,
) -> QbResult<ParamQuery> {
    let mut ctx = RenderCtx::new(block.options(), mode);
    let text = block.render(&mut ctx)?;
    let values = ctx.into_values();
    tracing::debug!(
        target: "sqlblock.render",
        kind = ?kind,
        mode = ?mode,
        values = values.len(),
        sql = %text,
        "rendered"
    );
    Ok(ParamQuery::new(text, values))
}

/// Join non-empty fragments with `separator`.
pub(crate) fn join_fragments(parts: Vec<String>, separator: &str) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_value_inline_and_param() {
        let opts = Options::default();
        let mut ctx = RenderCtx::new(&opts, RenderMode::Inline);
        assert_eq!(ctx.push_value(&"a".into()).unwrap(), "'a'");
        assert_eq!(ctx.value_count(), 0);

        let mut ctx = RenderCtx::new(&opts, RenderMode::Param);
        assert_eq!(ctx.push_value(&"a".into()).unwrap(), "?");
        assert_eq!(ctx.push_value(&vec![1i32, 2].into()).unwrap(), "(?, ?)");
        assert_eq!(
            ctx.into_values(),
            vec![Value::Text("a".into()), Value::Int(1), Value::Int(2)]
        );
    }

    #[test]
    fn numbered_placeholders_count_up() {
        let opts = Options::default().with_numbered_parameters("$");
        let mut ctx = RenderCtx::new(&opts, RenderMode::Param);
        let text = ctx
            .push_template("a = ? AND b IN ?", &[Arg::value(1i32), Arg::value(vec![2i32, 3])])
            .unwrap();
        assert_eq!(text, "a = $1 AND b IN ($2, $3)");
        assert_eq!(ctx.value_count(), 3);
    }

    #[test]
    fn template_without_args_is_literal() {
        let opts = Options::default();
        let mut ctx = RenderCtx::new(&opts, RenderMode::Param);
        assert_eq!(ctx.push_template("note = '?'", &[]).unwrap(), "note = '?'");
        assert_eq!(ctx.value_count(), 0);
    }

    #[test]
    fn template_arity_mismatch_is_rejected() {
        let opts = Options::default();
        let mut ctx = RenderCtx::new(&opts, RenderMode::Inline);
        let err = ctx
            .push_template("a = ? AND b = ?", &[Arg::value(1i32)])
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn raw_handler_output_is_not_bound() {
        let opts = Options::default().with_value_handler::<bool, _>(|v, _| match v {
            Value::Bool(b) => HandlerOutput::Raw(if *b { "1" } else { "0" }.to_string()),
            other => HandlerOutput::Value(other.clone()),
        });
        let mut ctx = RenderCtx::new(&opts, RenderMode::Param);
        assert_eq!(ctx.push_value(&true.into()).unwrap(), "1");
        assert_eq!(ctx.value_count(), 0);
    }

    #[test]
    fn join_fragments_skips_empty() {
        let parts = vec!["SELECT".to_string(), String::new(), "*".to_string()];
        assert_eq!(join_fragments(parts, " "), "SELECT *");
    }
}
