use std::collections::{BTreeSet, HashMap, VecDeque};

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::core::contig::{Contig, Link};

/// A maximal weakly connected set of contigs, laid out independently
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Zero-based component number, in order of the first contig it contains
    pub id: usize,

    /// Member contigs in node order
    pub nodes: Vec<NodeIndex>,
}

impl Component {
    pub fn name(&self) -> String {
        format!("scaffold_{}", self.id)
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Directed assembly graph of oriented contigs joined by links
///
/// Node and edge indices stay valid when links are removed, so a copy with
/// links removed can still be compared against the original.
#[derive(Debug, Clone)]
pub struct ScaffoldGraph {
    graph: StableDiGraph<Contig, Link>,
    name_to_node: HashMap<String, NodeIndex>,
}

impl Default for ScaffoldGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ScaffoldGraph {
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            name_to_node: HashMap::new(),
        }
    }

    /// Add a contig, replacing the attributes of an existing contig with the same name
    pub fn add_contig(&mut self, contig: Contig) -> NodeIndex {
        if let Some(&node) = self.name_to_node.get(&contig.name) {
            self.graph[node] = contig;
            return node;
        }
        let name = contig.name.clone();
        let node = self.graph.add_node(contig);
        self.name_to_node.insert(name, node);
        node
    }

    /// Add a link between two named contigs.
    ///
    /// A second link between the same ordered pair replaces the first. Returns
    /// `None` if either contig is unknown.
    pub fn add_link(&mut self, source: &str, target: &str, link: Link) -> Option<EdgeIndex> {
        let a = self.node(source)?;
        let b = self.node(target)?;
        if let Some(edge) = self.graph.find_edge(a, b) {
            self.graph[edge] = link;
            return Some(edge);
        }
        Some(self.graph.add_edge(a, b, link))
    }

    pub fn node(&self, name: &str) -> Option<NodeIndex> {
        self.name_to_node.get(name).copied()
    }

    pub fn contig(&self, node: NodeIndex) -> &Contig {
        &self.graph[node]
    }

    pub fn link(&self, edge: EdgeIndex) -> &Link {
        &self.graph[edge]
    }

    pub fn name(&self, node: NodeIndex) -> &str {
        &self.graph[node].name
    }

    pub fn endpoints(&self, edge: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(edge)
    }

    pub fn find_link(&self, source: NodeIndex, target: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(source, target)
    }

    pub fn contig_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All contigs in node order
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// All links in edge order
    pub fn links(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn in_degree(&self, node: NodeIndex) -> usize {
        self.graph.edges_directed(node, Direction::Incoming).count()
    }

    pub fn out_degree(&self, node: NodeIndex) -> usize {
        self.graph.edges_directed(node, Direction::Outgoing).count()
    }

    pub fn incoming_links(&self, node: NodeIndex) -> Vec<EdgeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .map(|e| e.id())
            .collect();
        edges.sort_unstable();
        edges
    }

    pub fn outgoing_links(&self, node: NodeIndex) -> Vec<EdgeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| e.id())
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Direct successors in node order
    pub fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut nodes: Vec<_> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    /// Neighbors over the undirected view of the graph, in node order, without `node` itself
    pub fn undirected_neighbors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut nodes: Vec<_> = self
            .graph
            .neighbors_undirected(node)
            .filter(|&n| n != node)
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    /// Weakly connected components, numbered in order of their first contig
    pub fn components(&self) -> Vec<Component> {
        let mut seen: BTreeSet<NodeIndex> = BTreeSet::new();
        let mut components = Vec::new();

        for root in self.nodes() {
            if !seen.insert(root) {
                continue;
            }
            let mut nodes = vec![root];
            let mut queue = VecDeque::from([root]);
            while let Some(node) = queue.pop_front() {
                for n in self.undirected_neighbors(node) {
                    if seen.insert(n) {
                        nodes.push(n);
                        queue.push_back(n);
                    }
                }
            }
            nodes.sort_unstable();
            components.push(Component {
                id: components.len(),
                nodes,
            });
        }

        components
    }

    /// Pick the contig to anchor a component's layout at coordinate 0.
    ///
    /// Among contigs with at least one outgoing link, the one with the fewest
    /// incoming links wins; ties go to the earliest contig. Returns `None` when
    /// no contig has an outgoing link.
    pub fn start_node(&self, component: &Component) -> Option<NodeIndex> {
        let mut best: Option<(NodeIndex, usize)> = None;
        for &node in &component.nodes {
            if self.out_degree(node) == 0 {
                continue;
            }
            let in_degree = self.in_degree(node);
            if best.map_or(true, |(_, min)| in_degree < min) {
                best = Some((node, in_degree));
            }
        }
        best.map(|(node, _)| node)
    }

    /// Copy of this graph without the given links; contigs and indices are unchanged
    #[must_use]
    pub fn without_links(&self, links: &BTreeSet<EdgeIndex>) -> Self {
        let mut edited = self.clone();
        for &edge in links {
            edited.graph.remove_edge(edge);
        }
        edited
    }
}
