//! Dependency graph
//!
//! Directed graph over locators where an edge `from -> to` means `from`
//! depends on `to`. Every traversal visits neighbours in locator order, so
//! results are reproducible.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::domain::entities::{DependencyEdge, EdgeKind};
use crate::domain::value_objects::Locator;
use crate::error::IndexError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph {
    /// node -> (dependency -> kinds)
    forward: BTreeMap<Locator, BTreeMap<Locator, BTreeSet<EdgeKind>>>,
    /// node -> dependents
    reverse: BTreeMap<Locator, BTreeSet<Locator>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from nodes and edges. Edge endpoints are added as nodes.
    pub fn from_edges<'a>(
        nodes: impl IntoIterator<Item = &'a Locator>,
        edges: impl IntoIterator<Item = &'a DependencyEdge>,
    ) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node.clone());
        }
        for edge in edges {
            graph.add_edge(edge.from.clone(), edge.to.clone(), edge.kind);
        }
        graph
    }

    pub fn add_node(&mut self, locator: Locator) {
        self.reverse.entry(locator.clone()).or_default();
        self.forward.entry(locator).or_default();
    }

    pub fn add_edge(&mut self, from: Locator, to: Locator, kind: EdgeKind) {
        self.add_node(from.clone());
        self.add_node(to.clone());
        self.reverse
            .entry(to.clone())
            .or_default()
            .insert(from.clone());
        self.forward
            .entry(from)
            .or_default()
            .entry(to)
            .or_default()
            .insert(kind);
    }

    pub fn contains(&self, locator: &Locator) -> bool {
        self.forward.contains_key(locator)
    }

    pub fn node_count(&self) -> usize {
        self.forward.len()
    }

    pub fn edge_count(&self) -> usize {
        self.forward
            .values()
            .flat_map(|deps| deps.values())
            .map(BTreeSet::len)
            .sum()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Locator> {
        self.forward.keys()
    }

    /// Direct dependencies of `locator`, in locator order.
    pub fn dependencies_of(&self, locator: &Locator) -> Vec<&Locator> {
        self.forward
            .get(locator)
            .map(|deps| deps.keys().collect())
            .unwrap_or_default()
    }

    /// Direct dependents of `locator`, in locator order.
    pub fn dependents_of(&self, locator: &Locator) -> Vec<&Locator> {
        self.reverse
            .get(locator)
            .map(|deps| deps.iter().collect())
            .unwrap_or_default()
    }

    /// Every node that depends on any of `seeds`, directly or transitively.
    /// Seeds themselves are not included unless reachable from another seed.
    pub fn transitive_dependents<'a>(
        &self,
        seeds: impl IntoIterator<Item = &'a Locator>,
    ) -> BTreeSet<Locator> {
        let mut visited: BTreeSet<Locator> = BTreeSet::new();
        let mut queue: VecDeque<&Locator> = seeds.into_iter().collect();

        while let Some(current) = queue.pop_front() {
            for dependent in self.dependents_of(current) {
                if visited.insert(dependent.clone()) {
                    queue.push_back(dependent);
                }
            }
        }
        visited
    }

    /// Every elementary cycle witness, one per strongly connected component.
    ///
    /// Each cycle starts at the smallest locator of its component and lists
    /// nodes in dependency order; cycles are sorted by that first locator.
    pub fn detect_cycles(&self) -> Vec<Vec<Locator>> {
        let mut cycles: Vec<Vec<Locator>> = self
            .strongly_connected_components()
            .into_iter()
            .filter_map(|component| self.cycle_in(&component))
            .collect();
        cycles.sort();
        cycles
    }

    /// Nodes ordered dependencies-first; ties broken by locator.
    pub fn topological_order(&self) -> Result<Vec<Locator>, IndexError> {
        let mut remaining: BTreeMap<&Locator, usize> = self
            .forward
            .iter()
            .map(|(node, deps)| (node, deps.len()))
            .collect();
        let mut ready: BTreeSet<&Locator> = remaining
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(node, _)| *node)
            .collect();
        let mut order = Vec::with_capacity(self.forward.len());

        while let Some(node) = ready.pop_first() {
            order.push(node.clone());
            for dependent in self.dependents_of(node) {
                if let Some(count) = remaining.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if order.len() == self.forward.len() {
            return Ok(order);
        }

        let cycle = self.detect_cycles().into_iter().next().unwrap_or_default();
        Err(IndexError::CircularDependency { cycle })
    }

    /// Tarjan's algorithm, iterative.
    fn strongly_connected_components(&self) -> Vec<BTreeSet<&Locator>> {
        struct Frame<'g> {
            node: &'g Locator,
            next_child: usize,
        }

        let mut index_of: BTreeMap<&Locator, usize> = BTreeMap::new();
        let mut low_link: BTreeMap<&Locator, usize> = BTreeMap::new();
        let mut on_stack: BTreeSet<&Locator> = BTreeSet::new();
        let mut stack: Vec<&Locator> = Vec::new();
        let mut components = Vec::new();
        let mut next_index = 0;

        for root in self.forward.keys() {
            if index_of.contains_key(root) {
                continue;
            }

            let mut call_stack = vec![Frame {
                node: root,
                next_child: 0,
            }];
            index_of.insert(root, next_index);
            low_link.insert(root, next_index);
            next_index += 1;
            stack.push(root);
            on_stack.insert(root);

            while let Some(frame) = call_stack.last_mut() {
                let node = frame.node;
                let children = self.dependencies_of(node);

                if let Some(child) = children.get(frame.next_child).copied() {
                    frame.next_child += 1;
                    if !index_of.contains_key(child) {
                        index_of.insert(child, next_index);
                        low_link.insert(child, next_index);
                        next_index += 1;
                        stack.push(child);
                        on_stack.insert(child);
                        call_stack.push(Frame {
                            node: child,
                            next_child: 0,
                        });
                    } else if on_stack.contains(child) {
                        let lowest = low_link[node].min(index_of[child]);
                        low_link.insert(node, lowest);
                    }
                    continue;
                }

                call_stack.pop();
                if let Some(parent) = call_stack.last() {
                    let lowest = low_link[parent.node].min(low_link[node]);
                    low_link.insert(parent.node, lowest);
                }

                if low_link[node] == index_of[node] {
                    let mut component = BTreeSet::new();
                    while let Some(member) = stack.pop() {
                        on_stack.remove(member);
                        component.insert(member);
                        if member == node {
                            break;
                        }
                    }
                    components.push(component);
                }
            }
        }

        components
    }

    /// A cycle through the smallest node of `component`, if one exists.
    fn cycle_in(&self, component: &BTreeSet<&Locator>) -> Option<Vec<Locator>> {
        let start = *component.first()?;

        if component.len() == 1 {
            let self_loop = self
                .forward
                .get(start)
                .is_some_and(|deps| deps.contains_key(start));
            return self_loop.then(|| vec![start.clone()]);
        }

        // Depth-first search inside the component for a path back to start.
        let mut path: Vec<&Locator> = vec![start];
        let mut cursors: Vec<usize> = vec![0];
        let mut visited: BTreeSet<&Locator> = BTreeSet::from([start]);

        while let (Some(&node), Some(cursor)) = (path.last(), cursors.last_mut()) {
            let children = self.dependencies_of(node);
            let Some(child) = children.get(*cursor).copied() else {
                path.pop();
                cursors.pop();
                continue;
            };
            *cursor += 1;

            if child == start {
                return Some(path.into_iter().cloned().collect());
            }
            if component.contains(child) && visited.insert(child) {
                path.push(child);
                cursors.push(0);
            }
        }
        None
    }
}
