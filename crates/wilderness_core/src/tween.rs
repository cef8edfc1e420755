//! Structural linear interpolation

use crate::easing::Easing;
use crate::error::{CoreError, Result};
use crate::tree::{transform, Decompose, Node};
use crate::value::{Tagged, Value};
use smallvec::SmallVec;

/// Interpolate between two structurally identical value trees
///
/// Numeric leaves (including the numbers inside tagged leaves) become
/// `from + (to - from) * ease(position)`. Text and bool leaves, and the
/// format of tagged leaves, are taken from `from`. Any difference in shape
/// (kind, list length, map keys, tag discriminant or arity) fails with
/// [`CoreError::StructureMismatch`] naming the first offending path.
pub fn tween(from: &Value, to: &Value, easing: &Easing, position: f64) -> Result<Value> {
    let eased = easing.apply(position);
    transform(
        Pair {
            from,
            to,
            path: "$".to_string(),
        },
        |pair| pair.interpolate(eased),
    )
}

struct Pair<'a> {
    from: &'a Value,
    to: &'a Value,
    path: String,
}

impl<'a> Pair<'a> {
    fn mismatch(&self, reason: impl Into<String>) -> CoreError {
        CoreError::StructureMismatch {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn interpolate(self, eased: f64) -> Result<Value> {
        match (self.from, self.to) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(lerp(*a, *b, eased))),
            (Value::Tagged(a), Value::Tagged(b)) => {
                if a.middleware != b.middleware {
                    return Err(self.mismatch(format!(
                        "`{}` tag vs `{}` tag",
                        a.middleware, b.middleware
                    )));
                }
                if a.values.len() != b.values.len() {
                    return Err(self.mismatch(format!(
                        "{} values vs {} values",
                        a.values.len(),
                        b.values.len()
                    )));
                }
                let values: SmallVec<[f64; 4]> = a
                    .values
                    .iter()
                    .zip(&b.values)
                    .map(|(x, y)| lerp(*x, *y, eased))
                    .collect();
                // An endpoint keeps its authored text; output decides if it still applies
                let source = if values == a.values {
                    a.source.clone()
                } else if values == b.values {
                    b.source.clone()
                } else {
                    None
                };
                Ok(Value::Tagged(Tagged {
                    middleware: a.middleware.clone(),
                    format: a.format.clone(),
                    values,
                    source,
                }))
            }
            (Value::Text(_), Value::Text(_)) | (Value::Bool(_), Value::Bool(_)) => {
                Ok(self.from.clone())
            }
            (a, b) => Err(self.mismatch(format!("{} vs {}", a.kind(), b.kind()))),
        }
    }
}

impl<'a> Decompose for Pair<'a> {
    fn decompose(self) -> Result<Node<Self>> {
        match (self.from, self.to) {
            (Value::List(a), Value::List(b)) => {
                if a.len() != b.len() {
                    return Err(self.mismatch(format!(
                        "list of {} vs list of {}",
                        a.len(),
                        b.len()
                    )));
                }
                Ok(Node::List(
                    a.iter()
                        .zip(b)
                        .enumerate()
                        .map(|(i, (from, to))| Pair {
                            from,
                            to,
                            path: format!("{}[{}]", self.path, i),
                        })
                        .collect(),
                ))
            }
            (Value::Map(a), Value::Map(b)) => {
                if a.len() != b.len() {
                    return Err(self.mismatch(format!(
                        "map of {} keys vs map of {} keys",
                        a.len(),
                        b.len()
                    )));
                }
                let mut children = Vec::with_capacity(a.len());
                for (key, from) in a {
                    let to = b
                        .get(key)
                        .ok_or_else(|| self.mismatch(format!("key `{}` missing from target", key)))?;
                    children.push((
                        key.clone(),
                        Pair {
                            from,
                            to,
                            path: format!("{}.{}", self.path, key),
                        },
                    ));
                }
                Ok(Node::Map(children))
            }
            (a, b) if a.is_leaf() && b.is_leaf() => Ok(Node::Leaf(self)),
            (a, b) => Err(self.mismatch(format!("{} vs {}", a.kind(), b.kind()))),
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t == 1.0 {
        return b;
    }
    a + (b - a) * t
}
