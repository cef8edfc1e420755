//! Unit middleware
//!
//! Recognises numbers with a CSS-style unit suffix (`10px`, `-2.5em`, `50%`)
//! and encodes them as a single number tagged with the unit.

use super::color::number;
use super::{authored_text, Middleware};
use crate::error::{CoreError, Result};
use crate::value::{format_number, Tagged, Value};
use nom::{
    branch::alt, bytes::complete::tag, character::complete::alpha1, combinator::all_consuming,
    sequence::pair, IResult,
};

const NAME: &str = "unit";

const UNITS: &[&str] = &[
    "%", "ch", "cm", "deg", "em", "ex", "in", "mm", "ms", "pc", "pt", "px", "rad", "rem", "s",
    "turn", "vh", "vmax", "vmin", "vw",
];

/// Built-in `unit` middleware
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitMiddleware;

impl Middleware for UnitMiddleware {
    fn name(&self) -> &str {
        NAME
    }

    fn input(&self, leaf: &Value) -> Option<Tagged> {
        let text = leaf.as_text()?;
        let (_, (n, unit)) = all_consuming(unit_number)(text.trim()).ok()?;
        UNITS
            .contains(&unit)
            .then(|| Tagged::new(NAME, unit, [n]).with_source(text))
    }

    fn output(&self, tagged: &Tagged) -> Result<Value> {
        if let Some(authored) = authored_text(self, tagged) {
            return Ok(authored);
        }
        match tagged.values.as_slice() {
            [n] => Ok(Value::Text(format!("{}{}", format_number(*n), tagged.format))),
            other => Err(CoreError::Validation(format!(
                "unit expects 1 value, got {}",
                other.len()
            ))),
        }
    }
}

fn unit_number(input: &str) -> IResult<&str, (f64, &str)> {
    pair(number, alt((tag("%"), alpha1)))(input)
}
