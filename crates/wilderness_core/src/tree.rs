//! Iterative structural transform
//!
//! Every structural operation on values (middleware input, middleware output,
//! tween) is a rebuild of a tree where only the leaves change. [`transform`]
//! does that rebuild with an explicit work stack instead of recursion.

use crate::error::{CoreError, Result};
use crate::value::Value;

/// One level of a source tree, as seen by [`transform`]
pub enum Node<S> {
    Leaf(S),
    List(Vec<S>),
    Map(Vec<(String, S)>),
}

/// Something [`transform`] can walk
///
/// A source decides for itself what counts as a container. Decomposition may
/// fail, which is how paired walks report structural mismatches.
pub trait Decompose: Sized {
    fn decompose(self) -> Result<Node<Self>>;
}

impl Decompose for Value {
    fn decompose(self) -> Result<Node<Self>> {
        Ok(match self {
            Value::List(items) => Node::List(items),
            Value::Map(map) => Node::Map(map.into_iter().collect()),
            leaf => Node::Leaf(leaf),
        })
    }
}

impl<'a> Decompose for &'a Value {
    fn decompose(self) -> Result<Node<Self>> {
        Ok(match self {
            Value::List(items) => Node::List(items.iter().collect()),
            Value::Map(map) => Node::Map(map.iter().map(|(k, v)| (k.clone(), v)).collect()),
            leaf => Node::Leaf(leaf),
        })
    }
}

/// Deepest container nesting [`transform`] accepts
///
/// Values are dropped recursively, so a tree far deeper than this cannot be
/// released safely anyway.
pub const MAX_DEPTH: usize = 256;

enum Step<S> {
    Visit(S, usize),
    List(usize),
    Map(Vec<String>),
}

/// Rebuild `root` as a [`Value`], replacing each leaf with `leaf(source)`
///
/// Containers keep their shape and key order. Children are visited in order,
/// so `leaf` sees leaves in depth-first document order. Nesting deeper than
/// [`MAX_DEPTH`] fails with [`CoreError::Validation`].
pub fn transform<S, F>(root: S, mut leaf: F) -> Result<Value>
where
    S: Decompose,
    F: FnMut(S) -> Result<Value>,
{
    let mut work = vec![Step::Visit(root, 0)];
    let mut built: Vec<Value> = Vec::new();

    while let Some(step) = work.pop() {
        match step {
            Step::Visit(source, depth) => match source.decompose()? {
                Node::Leaf(source) => built.push(leaf(source)?),
                Node::List(items) => {
                    check_depth(depth)?;
                    work.push(Step::List(items.len()));
                    work.extend(items.into_iter().rev().map(|s| Step::Visit(s, depth + 1)));
                }
                Node::Map(entries) => {
                    check_depth(depth)?;
                    let (keys, children): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
                    work.push(Step::Map(keys));
                    work.extend(children.into_iter().rev().map(|s| Step::Visit(s, depth + 1)));
                }
            },
            Step::List(len) => {
                let items = built.split_off(built.len() - len);
                built.push(Value::List(items));
            }
            Step::Map(keys) => {
                let children = built.split_off(built.len() - keys.len());
                built.push(Value::Map(keys.into_iter().zip(children).collect()));
            }
        }
    }

    built
        .pop()
        .ok_or_else(|| CoreError::Validation("empty value tree".to_string()))
}

fn check_depth(depth: usize) -> Result<()> {
    if depth >= MAX_DEPTH {
        return Err(CoreError::Validation(format!(
            "value nested deeper than {} levels",
            MAX_DEPTH
        )));
    }
    Ok(())
}

/// Visit every leaf of `value` in document order without rebuilding
pub fn for_each_leaf<'a, F>(value: &'a Value, mut f: F)
where
    F: FnMut(&'a Value),
{
    let mut work = vec![value];
    while let Some(node) = work.pop() {
        match node {
            Value::List(items) => work.extend(items.iter().rev()),
            Value::Map(map) => work.extend(map.values().rev()),
            leaf => f(leaf),
        }
    }
}
