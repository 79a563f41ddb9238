//! Dependency graph between named cells.
//!
//! The graph is a set of ordered pairs `(s, t)` meaning "`t` depends on `s`":
//! `s` must be evaluated before `t`. `t` is a *dependent* of `s`, and `s` is a
//! *dependee* of `t`. Both directions are indexed so either question is
//! answered without a scan; every mutation updates the two maps together.
//!
//! ```
//! use sheetflow_engine::engine::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_dependency("A1", "B1");
//! graph.add_dependency("A1", "C1");
//! assert_eq!(graph.size(), 2);
//! assert_eq!(graph.dependee_count("B1"), 1);
//! assert!(graph.has_dependents("A1"));
//! ```

use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    /// s -> every t with (s, t)
    dependents: HashMap<String, HashSet<String>>,
    /// t -> every s with (s, t)
    dependees: HashMap<String, HashSet<String>>,
    size: usize,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ordered pairs in the graph.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells `s` depends on.
    pub fn dependee_count(&self, s: &str) -> usize {
        self.dependees.get(s).map_or(0, HashSet::len)
    }

    pub fn has_dependents(&self, s: &str) -> bool {
        self.dependents.get(s).is_some_and(|set| !set.is_empty())
    }

    pub fn has_dependees(&self, s: &str) -> bool {
        self.dependees.get(s).is_some_and(|set| !set.is_empty())
    }

    /// Cells that depend on `s`, in no particular order.
    pub fn dependents<'a>(&'a self, s: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.dependents
            .get(s)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Cells `s` depends on, in no particular order.
    pub fn dependees<'a>(&'a self, s: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.dependees
            .get(s)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Add the pair `(s, t)`. Adding a pair that is already present does nothing.
    pub fn add_dependency(&mut self, s: &str, t: &str) {
        let inserted = self
            .dependents
            .entry(s.to_string())
            .or_default()
            .insert(t.to_string());
        if !inserted {
            return;
        }
        self.dependees
            .entry(t.to_string())
            .or_default()
            .insert(s.to_string());
        self.size += 1;
    }

    /// Remove the pair `(s, t)` if it is present.
    pub fn remove_dependency(&mut self, s: &str, t: &str) {
        if !remove_from(&mut self.dependents, s, t) {
            return;
        }
        remove_from(&mut self.dependees, t, s);
        self.size -= 1;
    }

    /// Replace every `(s, r)` with `(s, t)` for each `t` in `new_dependents`.
    pub fn replace_dependents<I, S>(&mut self, s: &str, new_dependents: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(old) = self.dependents.remove(s) {
            for t in &old {
                remove_from(&mut self.dependees, t, s);
            }
            self.size -= old.len();
        }
        for t in new_dependents {
            self.add_dependency(s, t.as_ref());
        }
    }

    /// Replace every `(r, s)` with `(t, s)` for each `t` in `new_dependees`.
    pub fn replace_dependees<I, S>(&mut self, s: &str, new_dependees: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(old) = self.dependees.remove(s) {
            for t in &old {
                remove_from(&mut self.dependents, t, s);
            }
            self.size -= old.len();
        }
        for t in new_dependees {
            self.add_dependency(t.as_ref(), s);
        }
    }
}

/// Remove `value` from the set stored under `key`, dropping the set once empty.
fn remove_from(map: &mut HashMap<String, HashSet<String>>, key: &str, value: &str) -> bool {
    let Some(set) = map.get_mut(key) else {
        return false;
    };
    let removed = set.remove(value);
    if set.is_empty() {
        map.remove(key);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn sorted<'a>(it: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
        let mut v: Vec<_> = it.collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_empty_graph() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.size(), 0);
        assert_eq!(graph.dependee_count("a"), 0);
        assert!(!graph.has_dependents("a"));
        assert!(!graph.has_dependees("a"));
        assert_eq!(graph.dependents("a").count(), 0);
        assert_eq!(graph.dependees("a").count(), 0);
    }

    #[test]
    fn test_example_graph() {
        // {(a,b), (a,c), (b,d), (d,d)}
        let mut graph = DependencyGraph::new();
        graph.add_dependency("a", "b");
        graph.add_dependency("a", "c");
        graph.add_dependency("b", "d");
        graph.add_dependency("d", "d");

        assert_eq!(graph.size(), 4);
        assert_eq!(sorted(graph.dependents("a")), vec!["b", "c"]);
        assert_eq!(sorted(graph.dependents("b")), vec!["d"]);
        assert_eq!(sorted(graph.dependents("c")), Vec::<&str>::new());
        assert_eq!(sorted(graph.dependents("d")), vec!["d"]);
        assert_eq!(sorted(graph.dependees("a")), Vec::<&str>::new());
        assert_eq!(sorted(graph.dependees("b")), vec!["a"]);
        assert_eq!(sorted(graph.dependees("d")), vec!["b", "d"]);
        assert_eq!(graph.dependee_count("d"), 2);
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("x", "y");
        graph.add_dependency("x", "y");
        assert_eq!(graph.size(), 1);
        assert_eq!(graph.dependee_count("y"), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("x", "y");
        graph.remove_dependency("y", "x");
        graph.remove_dependency("x", "z");
        graph.remove_dependency("q", "r");
        assert_eq!(graph.size(), 1);

        graph.remove_dependency("x", "y");
        assert_eq!(graph.size(), 0);
        assert!(!graph.has_dependents("x"));
        assert!(!graph.has_dependees("y"));
    }

    #[test]
    fn test_replace_dependents() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("x", "y");
        graph.add_dependency("x", "z");
        graph.add_dependency("w", "z");

        graph.replace_dependents("x", ["a", "b", "a"]);
        assert_eq!(graph.size(), 3);
        assert_eq!(sorted(graph.dependents("x")), vec!["a", "b"]);
        assert_eq!(sorted(graph.dependees("z")), vec!["w"]);
        assert!(!graph.has_dependees("y"));

        graph.replace_dependents("x", Vec::<String>::new());
        assert_eq!(graph.size(), 1);
        assert!(!graph.has_dependents("x"));
    }

    #[test]
    fn test_replace_dependees() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("a", "t");
        graph.add_dependency("b", "t");
        graph.add_dependency("b", "u");

        graph.replace_dependees("t", ["c"]);
        assert_eq!(graph.size(), 2);
        assert_eq!(sorted(graph.dependees("t")), vec!["c"]);
        assert!(!graph.has_dependents("a"));
        assert_eq!(sorted(graph.dependents("b")), vec!["u"]);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Add(u8, u8),
        Remove(u8, u8),
        ReplaceDependents(u8, Vec<u8>),
        ReplaceDependees(u8, Vec<u8>),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let node = 0u8..6;
        prop_oneof![
            (node.clone(), node.clone()).prop_map(|(s, t)| Op::Add(s, t)),
            (node.clone(), node.clone()).prop_map(|(s, t)| Op::Remove(s, t)),
            (node.clone(), prop::collection::vec(node.clone(), 0..4))
                .prop_map(|(s, ts)| Op::ReplaceDependents(s, ts)),
            (node.clone(), prop::collection::vec(node, 0..4))
                .prop_map(|(s, ts)| Op::ReplaceDependees(s, ts)),
        ]
    }

    fn name(n: u8) -> String {
        format!("n{n}")
    }

    proptest! {
        #[test]
        fn prop_views_stay_consistent(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut graph = DependencyGraph::new();
            let mut model: BTreeSet<(String, String)> = BTreeSet::new();

            for op in ops {
                match op {
                    Op::Add(s, t) => {
                        graph.add_dependency(&name(s), &name(t));
                        model.insert((name(s), name(t)));
                    }
                    Op::Remove(s, t) => {
                        graph.remove_dependency(&name(s), &name(t));
                        model.remove(&(name(s), name(t)));
                    }
                    Op::ReplaceDependents(s, ts) => {
                        let ts: Vec<String> = ts.into_iter().map(name).collect();
                        graph.replace_dependents(&name(s), &ts);
                        model.retain(|(a, _)| *a != name(s));
                        model.extend(ts.into_iter().map(|t| (name(s), t)));
                    }
                    Op::ReplaceDependees(t, ss) => {
                        let ss: Vec<String> = ss.into_iter().map(name).collect();
                        graph.replace_dependees(&name(t), &ss);
                        model.retain(|(_, b)| *b != name(t));
                        model.extend(ss.into_iter().map(|s| (s, name(t))));
                    }
                }
            }

            prop_assert_eq!(graph.size(), model.len());
            for s in 0..6u8 {
                for t in 0..6u8 {
                    let (s, t) = (name(s), name(t));
                    let forward = graph.dependents(&s).any(|x| x == t);
                    let backward = graph.dependees(&t).any(|x| x == s);
                    prop_assert_eq!(forward, backward);
                    prop_assert_eq!(forward, model.contains(&(s.clone(), t.clone())));
                }
            }
        }
    }
}
