//! Rendering options shared by every block of a builder.

use crate::value::{HandlerOutput, Value, ValueHandlers};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Option bundle a builder is constructed with.
///
/// A [`Dialect`](crate::Dialect) is a named default for this struct. A builder
/// wraps its options in an `Arc` at construction and never mutates them
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Quote table names with `name_quote_character`.
    pub auto_quote_table_names: bool,
    /// Quote field names with `name_quote_character`.
    pub auto_quote_field_names: bool,
    /// Quote table and field aliases with their alias quote characters.
    pub auto_quote_alias_names: bool,
    /// Render table aliases as `table AS alias`.
    pub use_as_for_table_alias_names: bool,
    /// Quote `a.b` as one name instead of `"a"."b"`.
    pub ignore_periods_for_field_name_quotes: bool,
    /// One character, or an open/close pair such as `[]`.
    pub name_quote_character: String,
    pub table_alias_quote_character: String,
    pub field_alias_quote_character: String,
    /// Placeholder marker, both in `?` templates and in parameterized output.
    pub parameter_character: String,
    /// Emit `$1, $2, ...` instead of repeating `parameter_character`.
    pub numbered_parameters: bool,
    pub numbered_parameters_prefix: String,
    pub numbered_parameters_start_at: usize,
    /// Escape `'` inside string literals in `to_sql()` output.
    pub replace_single_quotes: bool,
    pub single_quote_replacement: String,
    /// Joins the rendered blocks of a statement.
    pub separator: String,
    /// Do not wrap nested queries in parentheses.
    pub raw_nesting: bool,
    #[serde(skip)]
    pub value_handlers: ValueHandlers,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            auto_quote_table_names: false,
            auto_quote_field_names: false,
            auto_quote_alias_names: true,
            use_as_for_table_alias_names: false,
            ignore_periods_for_field_name_quotes: false,
            name_quote_character: "`".to_string(),
            table_alias_quote_character: "`".to_string(),
            field_alias_quote_character: "\"".to_string(),
            parameter_character: "?".to_string(),
            numbered_parameters: false,
            numbered_parameters_prefix: "$".to_string(),
            numbered_parameters_start_at: 1,
            replace_single_quotes: true,
            single_quote_replacement: "''".to_string(),
            separator: " ".to_string(),
            raw_nesting: false,
            value_handlers: ValueHandlers::new(),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn auto-quoting of table, field and alias names on or off together.
    pub fn with_auto_quote(mut self, enabled: bool) -> Self {
        self.auto_quote_table_names = enabled;
        self.auto_quote_field_names = enabled;
        self.auto_quote_alias_names = enabled;
        self
    }

    /// Use one quote character for names and both alias kinds.
    pub fn with_quote_character(mut self, quote: &str) -> Self {
        self.name_quote_character = quote.to_string();
        self.table_alias_quote_character = quote.to_string();
        self.field_alias_quote_character = quote.to_string();
        self
    }

    pub fn with_parameter_character(mut self, marker: &str) -> Self {
        self.parameter_character = marker.to_string();
        self
    }

    /// Switch to numbered placeholders (`prefix` + index, starting at 1).
    pub fn with_numbered_parameters(mut self, prefix: &str) -> Self {
        self.numbered_parameters = true;
        self.numbered_parameters_prefix = prefix.to_string();
        self
    }

    pub fn with_numbered_start(mut self, start_at: usize) -> Self {
        self.numbered_parameters_start_at = start_at;
        self
    }

    pub fn with_replace_single_quotes(mut self, enabled: bool) -> Self {
        self.replace_single_quotes = enabled;
        self
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    pub fn with_raw_nesting(mut self, enabled: bool) -> Self {
        self.raw_nesting = enabled;
        self
    }

    /// Register a handler for values of Rust type `T`.
    ///
    /// See [`ValueHandlerFn`](crate::value::ValueHandlerFn) for the contract.
    pub fn register_value_handler<T, F>(&mut self, handler: F)
    where
        T: Any,
        F: Fn(&Value, bool) -> HandlerOutput + Send + Sync + 'static,
    {
        self.value_handlers.register::<T, F>(handler);
    }

    /// Chainable form of [`register_value_handler`](Self::register_value_handler).
    pub fn with_value_handler<T, F>(mut self, handler: F) -> Self
    where
        T: Any,
        F: Fn(&Value, bool) -> HandlerOutput + Send + Sync + 'static,
    {
        self.register_value_handler::<T, F>(handler);
        self
    }

    /// Placeholder text for the value at 0-based position `index`.
    pub(crate) fn placeholder(&self, index: usize) -> String {
        if self.numbered_parameters {
            format!(
                "{}{}",
                self.numbered_parameters_prefix,
                self.numbered_parameters_start_at + index
            )
        } else {
            self.parameter_character.clone()
        }
    }
}
