//! LIMIT and OFFSET.

use crate::error::QbResult;
use crate::options::Options;
use crate::render::{Block, RenderCtx, RenderMode};
use crate::value::Value;
use std::sync::Arc;

/// Generates a single-number clause block (`LIMIT n`, `OFFSET n`).
///
/// The number is a literal in inline mode and a bound value in param mode.
macro_rules! count_block {
    ($(#[$meta:meta])* $name:ident, $keyword:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            options: Arc<Options>,
            value: Option<u32>,
        }

        impl $name {
            pub fn new(options: Arc<Options>) -> Self {
                Self {
                    options,
                    value: None,
                }
            }

            /// Set or clear the number.
            pub fn set(&mut self, value: Option<u32>) {
                self.value = value;
            }

            pub fn value(&self) -> Option<u32> {
                self.value
            }
        }

        impl Block for $name {
            fn options(&self) -> &Options {
                &self.options
            }

            fn render(&self, ctx: &mut RenderCtx<'_>) -> QbResult<String> {
                let Some(n) = self.value else {
                    return Ok(String::new());
                };
                let text = match ctx.mode() {
                    RenderMode::Inline => n.to_string(),
                    RenderMode::Param => ctx.push_value(&Value::Int(i64::from(n)))?,
                };
                Ok(format!(concat!($keyword, " {}"), text))
            }
        }
    };
}

count_block!(
    /// `LIMIT n`
    LimitBlock,
    "LIMIT"
);
count_block!(
    /// `OFFSET n`
    OffsetBlock,
    "OFFSET"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_literal_inline_and_bound_in_param() {
        let mut block = LimitBlock::new(Arc::new(Options::default()));
        assert_eq!(block.to_sql().unwrap(), "");
        block.set(Some(10));
        assert_eq!(block.to_sql().unwrap(), "LIMIT 10");
        let param = block.to_param().unwrap();
        assert_eq!(param.text, "LIMIT ?");
        assert_eq!(param.values, vec![Value::Int(10)]);
    }

    #[test]
    fn offset_can_be_cleared() {
        let mut block = OffsetBlock::new(Arc::new(Options::default()));
        block.set(Some(0));
        assert_eq!(block.to_sql().unwrap(), "OFFSET 0");
        block.set(None);
        assert_eq!(block.value(), None);
        assert_eq!(block.to_sql().unwrap(), "");
    }
}
