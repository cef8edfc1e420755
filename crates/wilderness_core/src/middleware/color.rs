//! Color middleware
//!
//! Recognises `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and
//! `rgba(r, g, b, a)`. Channels are encoded as `[r, g, b, a]` with r/g/b in
//! `0..=255` and alpha in `0..=1`, and the authored form is kept as the tag's
//! format so output writes the same notation back.

use super::{authored_text, Middleware};
use crate::error::{CoreError, Result};
use crate::value::{format_number, Tagged, Value};
use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while_m_n},
    character::complete::{char, digit0, digit1, multispace0},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

const NAME: &str = "color";

const HEX_SHORT: &str = "hex-short";
const HEX: &str = "hex";
const HEX_ALPHA: &str = "hex-alpha";
const RGB: &str = "rgb";
const RGBA: &str = "rgba";

/// Built-in `color` middleware
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorMiddleware;

impl Middleware for ColorMiddleware {
    fn name(&self) -> &str {
        NAME
    }

    fn input(&self, leaf: &Value) -> Option<Tagged> {
        let text = leaf.as_text()?;
        parse_color(text.trim()).map(|color| color.with_source(text))
    }

    fn output(&self, tagged: &Tagged) -> Result<Value> {
        if let Some(authored) = authored_text(self, tagged) {
            return Ok(authored);
        }
        let [r, g, b, a] = match tagged.values.as_slice() {
            [r, g, b, a] => [*r, *g, *b, *a],
            other => {
                return Err(CoreError::Validation(format!(
                    "color expects 4 channels, got {}",
                    other.len()
                )))
            }
        };
        let (r, g, b) = (channel(r), channel(g), channel(b));
        let a = a.clamp(0.0, 1.0);

        let text = match &*tagged.format {
            HEX_SHORT if [r, g, b].iter().all(|c| c % 17 == 0) => {
                format!("#{:x}{:x}{:x}", r / 17, g / 17, b / 17)
            }
            HEX_SHORT | HEX => format!("#{:02x}{:02x}{:02x}", r, g, b),
            HEX_ALPHA => format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                r,
                g,
                b,
                (a * 255.0).round() as u8
            ),
            RGB => format!("rgb({},{},{})", r, g, b),
            RGBA => format!("rgba({},{},{},{})", r, g, b, format_number(a)),
            other => {
                return Err(CoreError::Validation(format!(
                    "unknown color format `{}`",
                    other
                )))
            }
        };
        Ok(Value::Text(text))
    }
}

/// Round and clamp a tweened channel back into a byte
fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn parse_color(input: &str) -> Option<Tagged> {
    if let Ok((_, color)) = all_consuming(parse_hex_color)(input) {
        return Some(color);
    }
    if let Ok((_, color)) = all_consuming(parse_functional_color)(input) {
        return Some(color);
    }
    None
}

/// Parse hex color: #RGB, #RRGGBB, or #RRGGBBAA
fn parse_hex_color(input: &str) -> IResult<&str, Tagged> {
    let (rest, hex) = preceded(
        char('#'),
        take_while_m_n(3, 8, |c: char| c.is_ascii_hexdigit()),
    )(input)?;

    let byte = |s: &str| u8::from_str_radix(s, 16).map(f64::from).ok();
    let color = match hex.len() {
        3 => {
            let nibble = |i: usize| byte(&hex[i..=i].repeat(2));
            Tagged::new(
                NAME,
                HEX_SHORT,
                [nibble(0), nibble(1), nibble(2), Some(1.0)]
                    .into_iter()
                    .flatten(),
            )
        }
        6 => Tagged::new(
            NAME,
            HEX,
            [byte(&hex[0..2]), byte(&hex[2..4]), byte(&hex[4..6]), Some(1.0)]
                .into_iter()
                .flatten(),
        ),
        8 => Tagged::new(
            NAME,
            HEX_ALPHA,
            [
                byte(&hex[0..2]),
                byte(&hex[2..4]),
                byte(&hex[4..6]),
                byte(&hex[6..8]).map(|a| a / 255.0),
            ]
            .into_iter()
            .flatten(),
        ),
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::HexDigit,
            )))
        }
    };
    Ok((rest, color))
}

/// Parse rgb(r, g, b) or rgba(r, g, b, a)
fn parse_functional_color(input: &str) -> IResult<&str, Tagged> {
    let (input, format) = alt((tag_no_case("rgba"), tag_no_case("rgb")))(input)?;
    let (input, channels) = delimited(
        pair(multispace0, char('(')),
        separated_list1(char(','), delimited(multispace0, number, multispace0)),
        char(')'),
    )(input)?;

    let color = match (format.to_ascii_lowercase().as_str(), channels.as_slice()) {
        ("rgb", [r, g, b]) => Tagged::new(NAME, RGB, [*r, *g, *b, 1.0]),
        ("rgba", [r, g, b, a]) => Tagged::new(NAME, RGBA, [*r, *g, *b, *a]),
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Count,
            )))
        }
    };
    Ok((input, color))
}

/// Decimal number without exponent (`12`, `-0.5`, `.25`)
pub(super) fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(alt((char('-'), char('+')))),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
        ))),
        str::parse::<f64>,
    )(input)
}
