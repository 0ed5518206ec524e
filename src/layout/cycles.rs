use std::collections::{BTreeSet, HashMap};

use petgraph::algo::kosaraju_scc;
use petgraph::graph::DiGraph;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use tracing::{debug, warn};

use crate::core::graph::{Component, ScaffoldGraph};

/// Default cap on the number of simple cycles enumerated per component
pub const DEFAULT_MAX_CYCLES: usize = 100_000;

/// Links selected for removal so that a component can be traversed in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackLinks {
    /// One closing link per simple cycle (duplicates collapsed)
    pub links: BTreeSet<EdgeIndex>,

    /// Number of simple cycles enumerated
    pub cycles_found: usize,

    /// True if enumeration stopped at the cycle cap
    pub truncated: bool,
}

/// Removes a feedback link set from a component.
///
/// Every simple cycle is listed starting from its lowest-indexed contig and the
/// link from the cycle's last contig back to its first is removed. This is not a
/// minimum feedback set; downstream layout only needs some traversal order.
#[derive(Debug, Clone, Copy)]
pub struct CycleBreaker {
    max_cycles: usize,
}

impl Default for CycleBreaker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CYCLES)
    }
}

struct Frame {
    node: usize,
    succs: Vec<usize>,
    pos: usize,
    closed: bool,
}

impl CycleBreaker {
    pub fn new(max_cycles: usize) -> Self {
        Self { max_cycles }
    }

    /// Copy of `graph` with the component's feedback links removed
    pub fn break_cycles(&self, graph: &ScaffoldGraph, component: &Component) -> ScaffoldGraph {
        graph.without_links(&self.feedback_links(graph, component).links)
    }

    /// Enumerate simple cycles (Johnson's algorithm) and collect their closing links.
    ///
    /// Enumeration runs inside each strongly connected component, so contigs that
    /// sit on no cycle are never searched from.
    pub fn feedback_links(&self, graph: &ScaffoldGraph, component: &Component) -> FeedbackLinks {
        let nodes = &component.nodes;
        let local: HashMap<NodeIndex, usize> =
            nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        let adjacency: Vec<Vec<usize>> = nodes
            .iter()
            .map(|&n| {
                graph
                    .successors(n)
                    .into_iter()
                    .filter_map(|s| local.get(&s).copied())
                    .collect()
            })
            .collect();

        let mut local_graph: DiGraph<(), ()> = DiGraph::with_capacity(nodes.len(), 0);
        for _ in 0..nodes.len() {
            local_graph.add_node(());
        }
        for (v, succs) in adjacency.iter().enumerate() {
            for &w in succs {
                local_graph.add_edge(NodeIndex::new(v), NodeIndex::new(w), ());
            }
        }

        // Kosaraju's search is iterative, so long chains cannot exhaust the stack
        let mut sccs: Vec<Vec<usize>> = kosaraju_scc(&local_graph)
            .into_iter()
            .map(|scc| scc.into_iter().map(|n| n.index()).collect::<Vec<_>>())
            .filter(|scc| scc.len() > 1 || adjacency[scc[0]].contains(&scc[0]))
            .collect();
        for scc in &mut sccs {
            scc.sort_unstable();
        }
        sccs.sort_unstable();

        // Position of each contig within its strongly connected component
        let mut scc_of = vec![usize::MAX; nodes.len()];
        let mut slot = vec![0usize; nodes.len()];
        for (id, scc) in sccs.iter().enumerate() {
            for (k, &v) in scc.iter().enumerate() {
                scc_of[v] = id;
                slot[v] = k;
            }
        }

        let mut result = FeedbackLinks::default();
        let mut closing: BTreeSet<(usize, usize)> = BTreeSet::new();
        for (id, members) in sccs.iter().enumerate() {
            let sub: Vec<Vec<usize>> = members
                .iter()
                .map(|&v| {
                    adjacency[v]
                        .iter()
                        .filter(|&&w| scc_of[w] == id)
                        .map(|&w| slot[w])
                        .collect()
                })
                .collect();
            let mut pairs = BTreeSet::new();
            let complete = self.enumerate(&sub, &mut result, &mut pairs);
            closing.extend(pairs.into_iter().map(|(a, b)| (members[a], members[b])));
            if !complete {
                break;
            }
        }

        for (from, to) in closing {
            if let Some(edge) = graph.find_link(nodes[from], nodes[to]) {
                result.links.insert(edge);
            }
        }

        if result.truncated {
            warn!(
                "{}: stopped after {} cycles, layout may still contain cycles",
                component.name(),
                result.cycles_found
            );
        }
        debug!(
            "{}: {} cyclic groups, {} cycles, {} feedback links",
            component.name(),
            sccs.len(),
            result.cycles_found,
            result.links.len()
        );

        result
    }

    /// Johnson's search over one strongly connected component. Returns false once
    /// the cycle cap is reached.
    fn enumerate(
        &self,
        adjacency: &[Vec<usize>],
        result: &mut FeedbackLinks,
        closing: &mut BTreeSet<(usize, usize)>,
    ) -> bool {
        let n = adjacency.len();
        let mut blocked = vec![false; n];
        let mut blockers: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];

        for start in 0..n {
            // Every node >= start is unblocked between searches
            for v in start..n {
                blocked[v] = false;
                blockers[v].clear();
            }
            let succs_of = |v: usize| -> Vec<usize> {
                adjacency[v].iter().copied().filter(|&w| w >= start).collect()
            };

            blocked[start] = true;
            let mut path = vec![start];
            let mut frames = vec![Frame {
                node: start,
                succs: succs_of(start),
                pos: 0,
                closed: false,
            }];

            while let Some(frame) = frames.last_mut() {
                if frame.pos < frame.succs.len() {
                    let w = frame.succs[frame.pos];
                    frame.pos += 1;
                    if w == start {
                        frame.closed = true;
                        if let Some(&last) = path.last() {
                            closing.insert((last, start));
                        }
                        result.cycles_found += 1;
                        if result.cycles_found >= self.max_cycles {
                            result.truncated = true;
                            return false;
                        }
                    } else if !blocked[w] {
                        blocked[w] = true;
                        path.push(w);
                        frames.push(Frame {
                            node: w,
                            succs: succs_of(w),
                            pos: 0,
                            closed: false,
                        });
                    }
                    continue;
                }

                let Some(Frame {
                    node, succs, closed, ..
                }) = frames.pop()
                else {
                    break;
                };
                if closed {
                    unblock(node, &mut blocked, &mut blockers);
                } else {
                    for w in succs {
                        blockers[w].insert(node);
                    }
                }
                path.pop();
                if closed {
                    if let Some(parent) = frames.last_mut() {
                        parent.closed = true;
                    }
                }
            }
        }
        true
    }
}

fn unblock(node: usize, blocked: &mut [bool], blockers: &mut [BTreeSet<usize>]) {
    let mut stack = vec![node];
    while let Some(u) = stack.pop() {
        if !blocked[u] {
            continue;
        }
        blocked[u] = false;
        stack.extend(std::mem::take(&mut blockers[u]));
    }
}
