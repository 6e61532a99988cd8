//! Lazy depth-first walks over a node tree.

use std::slice;

use crate::node::Node;

/// Iterator over the leaves of a tree, left to right.
///
/// Pairs, triples, lists and typed arrays are expanded; every other node is
/// yielded as-is. Containers themselves are never yielded.
pub struct Leaves<'a> {
    stack: Vec<slice::Iter<'a, Node>>,
}

/// Leaves of `node`. A leaf root yields just itself.
pub fn leaves(node: &Node) -> Leaves<'_> {
    Leaves {
        stack: vec![slice::from_ref(node).iter()],
    }
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        loop {
            let next = self.stack.last_mut()?.next();
            match next {
                None => {
                    self.stack.pop();
                }
                Some(node) => match node.children() {
                    Some(children) => self.stack.push(children.iter()),
                    None => return Some(node),
                },
            }
        }
    }
}

/// Pre-order iterator over every node with its depth (root is 0).
pub struct Walk<'a> {
    stack: Vec<(usize, slice::Iter<'a, Node>)>,
}

pub fn walk(node: &Node) -> Walk<'_> {
    Walk {
        stack: vec![(0, slice::from_ref(node).iter())],
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<(usize, &'a Node)> {
        loop {
            let (depth, next) = {
                let (depth, iter) = self.stack.last_mut()?;
                (*depth, iter.next())
            };
            match next {
                None => {
                    self.stack.pop();
                }
                Some(node) => {
                    if let Some(children) = node.children() {
                        self.stack.push((depth + 1, children.iter()));
                    }
                    return Some((depth, node));
                }
            }
        }
    }
}

/// First leaf satisfying `pred`.
pub fn find_leaf<'a>(node: &'a Node, mut pred: impl FnMut(&Node) -> bool) -> Option<&'a Node> {
    leaves(node).find(|n| pred(n))
}

/// First string leaf whose value contains `needle`.
pub fn find_string_containing<'a>(node: &'a Node, needle: &str) -> Option<&'a Node> {
    find_leaf(node, |n| n.as_str().is_some_and(|s| s.contains(needle)))
}
