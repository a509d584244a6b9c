//! Spanning skeleton: a spanning tree over the 4-adjacency graph of
//! existing tiles.
//!
//! # Algorithm overview
//!
//! 1. **Graph:** one node per existing tile, added in row-major order;
//!    candidate edges are added per tile toward its east neighbour, then
//!    its south neighbour.
//! 2. **Reduce:** keep a spanning subset of the edges according to the
//!    [`SpanningStrategy`]. Kruskal variants merge `UnionFind` sets in
//!    edge order (every edge has the same weight, so the order alone
//!    decides the tree); depth-first keeps the DFS tree edges.
//! 3. **Index:** store each tile's tree-edge [`Directions`] for the
//!    path code resolver.

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::{DfsEvent, depth_first_search};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::tile_grid::TileGrid;
use crate::types::{Direction, Directions, PlanError, SpanningStrategy, TileCoord};

/// Tile adjacency graph. Node weights are tile coordinates.
type TileGraph = UnGraph<TileCoord, ()>;

/// A spanning tree over the existing tiles of a [`TileGrid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSkeleton")]
pub struct SpanningSkeleton {
    rows: usize,
    cols: usize,
    strategy: SpanningStrategy,
    /// Tree nodes in row-major order.
    nodes: Vec<TileCoord>,
    /// Tree-edge directions, parallel to `nodes`.
    directions: Vec<Directions>,
    /// Tree edges as `(lower, higher)` pairs, sorted.
    edges: Vec<(TileCoord, TileCoord)>,
}

impl SpanningSkeleton {
    /// Build the skeleton of `grid`.
    ///
    /// `rng` is only drawn from by [`SpanningStrategy::RandomizedKruskal`].
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InternalConsistency`] if the reduced edge set
    /// is not a spanning tree of the existing tiles.
    pub fn build<R: Rng + ?Sized>(
        grid: &TileGrid,
        strategy: SpanningStrategy,
        rng: &mut R,
    ) -> Result<Self, PlanError> {
        let graph = adjacency_graph(grid);
        let tree_edges = match strategy {
            SpanningStrategy::Kruskal => {
                let order: Vec<EdgeIndex> = graph.edge_indices().collect();
                kruskal(&graph, &order)
            }
            SpanningStrategy::RandomizedKruskal => {
                let mut order: Vec<EdgeIndex> = graph.edge_indices().collect();
                order.shuffle(rng);
                kruskal(&graph, &order)
            }
            SpanningStrategy::DepthFirst => depth_first(&graph),
        };

        let skeleton = Self::from_tree_edges(grid, strategy, &tree_edges)?;
        log::debug!(
            "{strategy} skeleton: {} nodes, {} edges",
            skeleton.node_count(),
            skeleton.edge_count()
        );
        Ok(skeleton)
    }

    /// Index a set of tree edges over `grid`'s existing tiles.
    fn from_tree_edges(
        grid: &TileGrid,
        strategy: SpanningStrategy,
        tree_edges: &[(TileCoord, TileCoord)],
    ) -> Result<Self, PlanError> {
        let nodes: Vec<TileCoord> = grid.matrix().existing().collect();
        let mut directions = vec![Directions::empty(); nodes.len()];
        let mut edges = Vec::with_capacity(tree_edges.len());

        for &(a, b) in tree_edges {
            let toward = a.direction_to(b).ok_or_else(|| {
                PlanError::InternalConsistency(format!(
                    "tree edge {a} - {b} joins tiles that are not 4-adjacent"
                ))
            })?;
            let (ia, ib) = match (nodes.binary_search(&a), nodes.binary_search(&b)) {
                (Ok(ia), Ok(ib)) => (ia, ib),
                _ => {
                    return Err(PlanError::InternalConsistency(format!(
                        "tree edge {a} - {b} touches a missing tile"
                    )));
                }
            };
            directions[ia] |= toward.flag();
            directions[ib] |= toward.opposite().flag();
            edges.push((a.min(b), a.max(b)));
        }
        edges.sort_unstable();

        if !nodes.is_empty() && edges.len() + 1 != nodes.len() {
            return Err(PlanError::InternalConsistency(format!(
                "spanning tree over {} tiles has {} edges",
                nodes.len(),
                edges.len()
            )));
        }

        Ok(Self {
            rows: grid.rows(),
            cols: grid.cols(),
            strategy,
            nodes,
            directions,
            edges,
        })
    }

    /// Tile rows of the source grid.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Tile columns of the source grid.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// The strategy that produced this tree.
    #[must_use]
    pub const fn strategy(&self) -> SpanningStrategy {
        self.strategy
    }

    /// Number of tree nodes (existing tiles).
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of tree edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Tree nodes in row-major order.
    #[must_use]
    pub fn nodes(&self) -> &[TileCoord] {
        &self.nodes
    }

    /// Tree edges as sorted `(lower, higher)` pairs.
    #[must_use]
    pub fn edges(&self) -> &[(TileCoord, TileCoord)] {
        &self.edges
    }

    /// Whether `tile` is a node of the tree.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        self.nodes.binary_search(&tile).is_ok()
    }

    /// Directions of the tree edges leaving `tile`; empty if `tile` is
    /// not a node.
    #[must_use]
    pub fn directions(&self, tile: TileCoord) -> Directions {
        self.nodes
            .binary_search(&tile)
            .ok()
            .and_then(|i| self.directions.get(i).copied())
            .unwrap_or_default()
    }

    /// Tree degree of `tile`.
    #[must_use]
    pub fn degree(&self, tile: TileCoord) -> u32 {
        self.directions(tile).degree()
    }

    /// Nodes paired with their tree-edge directions, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, Directions)> + '_ {
        self.nodes.iter().copied().zip(self.directions.iter().copied())
    }

    /// Number of nodes of each degree, indexed 0 to 4.
    #[must_use]
    pub fn degree_histogram(&self) -> [usize; 5] {
        let mut histogram = [0; 5];
        for d in &self.directions {
            if let Some(slot) = histogram.get_mut(d.degree() as usize) {
                *slot += 1;
            }
        }
        histogram
    }

    /// Whether the tree edge from `tile` toward `direction` exists.
    #[must_use]
    pub fn has_edge(&self, tile: TileCoord, direction: Direction) -> bool {
        self.directions(tile).has(direction)
    }
}

/// Unchecked serde form of [`SpanningSkeleton`].
#[derive(Deserialize)]
struct RawSkeleton {
    rows: usize,
    cols: usize,
    strategy: SpanningStrategy,
    nodes: Vec<TileCoord>,
    directions: Vec<Directions>,
    edges: Vec<(TileCoord, TileCoord)>,
}

impl TryFrom<RawSkeleton> for SpanningSkeleton {
    type Error = PlanError;

    fn try_from(raw: RawSkeleton) -> Result<Self, Self::Error> {
        if raw.directions.len() != raw.nodes.len() {
            return Err(PlanError::InvalidDimensions(format!(
                "{} direction sets for {} skeleton nodes",
                raw.directions.len(),
                raw.nodes.len()
            )));
        }
        if !raw.nodes.windows(2).all(|w| w[0] < w[1]) {
            return Err(PlanError::InvalidDimensions(
                "skeleton nodes are not in strict row-major order".to_string(),
            ));
        }
        let in_bounds = |t: &TileCoord| t.row < raw.rows && t.col < raw.cols;
        if let Some(outside) = raw.nodes.iter().find(|t| !in_bounds(t)) {
            return Err(PlanError::InvalidDimensions(format!(
                "skeleton node {outside} lies outside a {}x{} grid",
                raw.rows, raw.cols
            )));
        }
        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            strategy: raw.strategy,
            nodes: raw.nodes,
            directions: raw.directions,
            edges: raw.edges,
        })
    }
}

/// Build the tile adjacency graph of `grid`.
fn adjacency_graph(grid: &TileGrid) -> TileGraph {
    let matrix = grid.matrix();
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut graph = TileGraph::with_capacity(grid.existing_count(), 2 * grid.existing_count());

    // Row-major node insertion keeps NodeIndex aligned with tile order.
    let mut index_of = vec![None; rows * cols];
    for tile in matrix.existing() {
        if let Some(slot) = matrix.index(tile) {
            index_of[slot] = Some(graph.add_node(tile));
        }
    }

    let node_at =
        |tile: TileCoord| -> Option<NodeIndex> { matrix.index(tile).and_then(|i| index_of[i]) };
    for tile in matrix.existing() {
        let Some(here) = node_at(tile) else {
            continue;
        };
        for direction in [Direction::East, Direction::South] {
            if let Some(there) = tile.neighbor(direction, rows, cols).and_then(node_at) {
                graph.add_edge(here, there, ());
            }
        }
    }
    graph
}

/// Kruskal over unit weights: accept each edge in `order` that joins two
/// different components.
fn kruskal(graph: &TileGraph, order: &[EdgeIndex]) -> Vec<(TileCoord, TileCoord)> {
    let mut components = UnionFind::<usize>::new(graph.node_count());
    let mut tree = Vec::with_capacity(graph.node_count().saturating_sub(1));

    for &edge in order {
        let Some((a, b)) = graph.edge_endpoints(edge) else {
            continue;
        };
        if components.union(a.index(), b.index()) {
            tree.push((graph[a], graph[b]));
        }
    }
    tree
}

/// Tree edges of a depth-first search from the first tile.
fn depth_first(graph: &TileGraph) -> Vec<(TileCoord, TileCoord)> {
    let mut tree = Vec::with_capacity(graph.node_count().saturating_sub(1));
    let Some(start) = graph.node_indices().next() else {
        return tree;
    };
    depth_first_search(graph, Some(start), |event| {
        if let DfsEvent::TreeEdge(u, v) = event {
            tree.push((graph[u], graph[v]));
        }
    });
    tree
}
