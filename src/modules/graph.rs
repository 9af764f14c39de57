//! Dependency graph for module activation ordering.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, VibeError};

/// Modules and the modules they depend on.
///
/// Insertion order is kept so that activation order is deterministic:
/// modules come out in the order they were added, except that every
/// module is preceded by its dependencies.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    order: Vec<String>,
    dependencies: HashMap<String, Vec<String>>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module with its direct dependencies. Re-adding replaces them.
    pub fn add(&mut self, module: impl Into<String>, dependencies: Vec<String>) {
        let module = module.into();
        if !self.dependencies.contains_key(&module) {
            self.order.push(module.clone());
        }
        self.dependencies.insert(module, dependencies);
    }

    pub fn contains(&self, module: &str) -> bool {
        self.dependencies.contains_key(module)
    }

    /// Direct dependencies of a module.
    pub fn dependencies_of(&self, module: &str) -> Option<&[String]> {
        self.dependencies.get(module).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Modules with dependencies before dependents.
    ///
    /// Dependencies that are not in the graph are ignored here; callers
    /// check for missing modules before ordering.
    pub fn activation_order(&self) -> Result<Vec<String>> {
        if let Some(cycle) = self.find_cycle() {
            return Err(VibeError::CircularDependency {
                cycle: cycle.join(" -> "),
            });
        }

        let mut done: HashSet<&str> = HashSet::new();
        let mut result = Vec::with_capacity(self.order.len());

        while result.len() < self.order.len() {
            let next = self.order.iter().find(|m| {
                !done.contains(m.as_str())
                    && self.dependencies[m.as_str()]
                        .iter()
                        .all(|d| !self.contains(d) || done.contains(d.as_str()))
            });
            match next {
                Some(module) => {
                    done.insert(module.as_str());
                    result.push(module.clone());
                }
                None => {
                    let remaining: Vec<&str> = self
                        .order
                        .iter()
                        .map(String::as_str)
                        .filter(|m| !done.contains(m))
                        .collect();
                    return Err(VibeError::CircularDependency {
                        cycle: remaining.join(" -> "),
                    });
                }
            }
        }

        Ok(result)
    }

    /// Find a cycle, returning the path (first node repeated at the end).
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Unvisited,
            Visiting,
            Visited,
        }

        fn dfs<'a>(
            node: &'a str,
            graph: &'a ModuleGraph,
            state: &mut HashMap<&'a str, State>,
            path: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            state.insert(node, State::Visiting);
            path.push(node);

            for dep in graph.dependencies.get(node).into_iter().flatten() {
                match state.get(dep.as_str()) {
                    Some(State::Visiting) => {
                        let start = path.iter().position(|s| *s == dep.as_str()).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            path[start..].iter().map(|s| s.to_string()).collect();
                        cycle.push(dep.clone());
                        return Some(cycle);
                    }
                    Some(State::Unvisited) => {
                        if let Some(cycle) = dfs(dep, graph, state, path) {
                            return Some(cycle);
                        }
                    }
                    Some(State::Visited) | None => {}
                }
            }

            path.pop();
            state.insert(node, State::Visited);
            None
        }

        let mut state: HashMap<&str, State> = self
            .order
            .iter()
            .map(|m| (m.as_str(), State::Unvisited))
            .collect();
        let mut path = Vec::new();

        for module in &self.order {
            if state.get(module.as_str()) == Some(&State::Unvisited) {
                if let Some(cycle) = dfs(module, self, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dependencies_come_first() {
        let mut graph = ModuleGraph::new();
        graph.add("testing", deps(&["core"]));
        graph.add("quality", vec![]);
        graph.add("core", vec![]);

        let order = graph.activation_order().unwrap();
        assert_eq!(order, vec!["quality", "core", "testing"]);
    }

    #[test]
    fn insertion_order_is_kept_when_unconstrained() {
        let mut graph = ModuleGraph::new();
        graph.add("b", vec![]);
        graph.add("a", vec![]);
        graph.add("c", vec![]);
        assert_eq!(graph.activation_order().unwrap(), vec!["b", "a", "c"]);
    }

    #[test]
    fn detects_cycle() {
        let mut graph = ModuleGraph::new();
        graph.add("a", deps(&["b"]));
        graph.add("b", deps(&["c"]));
        graph.add("c", deps(&["a"]));

        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle.first(), cycle.last());
        assert_eq!(cycle.len(), 4);

        let err = graph.activation_order().unwrap_err();
        assert!(matches!(err, VibeError::CircularDependency { .. }));
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let mut graph = ModuleGraph::new();
        graph.add("a", deps(&["a"]));
        assert_eq!(graph.find_cycle().unwrap(), vec!["a", "a"]);
    }

    #[test]
    fn diamond_has_no_cycle() {
        let mut graph = ModuleGraph::new();
        graph.add("top", deps(&["left", "right"]));
        graph.add("left", deps(&["base"]));
        graph.add("right", deps(&["base"]));
        graph.add("base", vec![]);

        assert!(graph.find_cycle().is_none());
        let order = graph.activation_order().unwrap();
        let pos = |m: &str| order.iter().position(|x| x == m).unwrap();
        assert!(pos("base") < pos("left"));
        assert!(pos("left") < pos("top"));
        assert!(pos("right") < pos("top"));
    }
}
