//! Recalculation order and circular dependency detection.
//!
//! After a cell changes, it and everything that transitively depends on it must
//! be re-evaluated, each cell after all of the cells it reads. This module walks
//! the dependents relation depth-first from the changed cell and emits a
//! topological order. Meeting a cell that is still on the walk means the cell
//! reaches itself: a cycle, which is reported instead of an order.
//!
//! The walk keeps its own stack so long reference chains cannot exhaust the
//! call stack.

use std::collections::HashMap;
use thiserror::Error;

use super::deps::DependencyGraph;

/// A dependency cycle, listed from the first repeated cell back to itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("circular dependency: {}", .cycle.join(" -> "))]
pub struct CircularDependency {
    pub cycle: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

struct Frame<'a> {
    name: &'a str,
    children: Vec<&'a str>,
    next: usize,
}

impl<'a> Frame<'a> {
    fn new(graph: &'a DependencyGraph, name: &'a str) -> Self {
        let mut children: Vec<&str> = graph.dependents(name).collect();
        // Sibling order is not part of the contract; sorting keeps output stable.
        children.sort_unstable();
        Frame {
            name,
            children,
            next: 0,
        }
    }
}

/// Order in which `start` and its transitive dependents must be recalculated.
///
/// `start` is always first. Every other cell appears after all cells it
/// depends on (within the returned set).
pub fn recalculation_order(
    graph: &DependencyGraph,
    start: &str,
) -> Result<Vec<String>, CircularDependency> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut finished: Vec<&str> = Vec::new();
    let mut stack: Vec<Frame> = vec![Frame::new(graph, start)];
    marks.insert(start, Mark::InProgress);

    while let Some(frame) = stack.last_mut() {
        let Some(&child) = frame.children.get(frame.next) else {
            marks.insert(frame.name, Mark::Done);
            finished.push(frame.name);
            stack.pop();
            continue;
        };
        frame.next += 1;

        match marks.get(child) {
            Some(Mark::Done) => {}
            Some(Mark::InProgress) => {
                let from = stack.iter().position(|f| f.name == child).unwrap_or(0);
                let mut cycle: Vec<String> =
                    stack[from..].iter().map(|f| f.name.to_string()).collect();
                cycle.push(child.to_string());
                return Err(CircularDependency { cycle });
            }
            None => {
                marks.insert(child, Mark::InProgress);
                stack.push(Frame::new(graph, child));
            }
        }
    }

    Ok(finished.into_iter().rev().map(str::to_string).collect())
}
