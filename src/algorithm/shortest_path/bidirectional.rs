//! 双向 Dijkstra
//!
//! 正向从源点、反向从目标点同时搜索，两侧交替扩展。
//! 当两侧队首距离之和不小于当前最优值时停止。

use super::{list_backed_paths, ShortestPathAlgorithm};
use crate::algorithm::indexed::IndexedGraph;
use crate::algorithm::path::{GraphPath, SingleSourcePaths};
use crate::config::AlgorithmConfig;
use crate::error::{Error, Result};
use crate::graph::{VertexId, WeightedGraph};
use crate::metrics::global_metrics;
use crate::tolerance::MinDistance;
use once_cell::sync::OnceCell;
use priority_queue::PriorityQueue;
use std::sync::Arc;
use tracing::{debug, trace};

/// 单侧搜索状态
struct Frontier<'a> {
    index: &'a IndexedGraph,
    forward: bool,
    queue: PriorityQueue<usize, MinDistance>,
    distance: Vec<f64>,
    predecessor: Vec<Option<usize>>,
}

impl<'a> Frontier<'a> {
    fn new(index: &'a IndexedGraph, start: usize, forward: bool) -> Self {
        let n = index.vertex_count();
        let mut frontier = Self {
            index,
            forward,
            queue: PriorityQueue::new(),
            distance: vec![f64::INFINITY; n],
            predecessor: vec![None; n],
        };
        frontier.distance[start] = 0.0;
        frontier.queue.push(start, MinDistance(0.0));
        frontier
    }

    fn min_key(&self) -> Option<f64> {
        self.queue.peek().map(|(_, d)| d.0)
    }

    fn edges(&self, vertex: usize) -> &'a [usize] {
        if self.forward {
            self.index.outgoing(vertex)
        } else {
            self.index.incoming(vertex)
        }
    }

    fn update(&mut self, vertex: usize, edge: usize, distance: f64) -> bool {
        if distance < self.distance[vertex] {
            self.distance[vertex] = distance;
            self.predecessor[vertex] = Some(edge);
            self.queue.push(vertex, MinDistance(distance));
            true
        } else {
            false
        }
    }
}

/// 双向 Dijkstra 最短路
pub struct BidirectionalDijkstraShortestPath<G: WeightedGraph + ?Sized> {
    graph: Arc<G>,
    config: AlgorithmConfig,
    index: OnceCell<IndexedGraph>,
}

impl<G: WeightedGraph + ?Sized> BidirectionalDijkstraShortestPath<G> {
    pub fn new(graph: Arc<G>) -> Self {
        Self {
            graph,
            config: AlgorithmConfig::default(),
            index: OnceCell::new(),
        }
    }

    pub fn with_config(mut self, config: AlgorithmConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// 设置搜索半径，超过半径的路径视为不存在
    pub fn with_radius(mut self, radius: f64) -> Result<Self> {
        self.config = self.config.with_radius(radius)?;
        Ok(self)
    }

    fn index(&self) -> &IndexedGraph {
        self.index
            .get_or_init(|| IndexedGraph::from_graph(self.graph.as_ref()))
    }

    fn search(&self, source: usize, sink: usize) -> Result<Option<GraphPath>> {
        let index = self.index();
        let radius = self.config.radius;
        let metrics = global_metrics();
        let timer = metrics.record_shortest_path_start();
        debug!(
            "双向 Dijkstra 开始: {} -> {}, vertices={}, radius={}",
            index.vertex(source),
            index.vertex(sink),
            index.vertex_count(),
            radius
        );

        let mut forward = Frontier::new(index, source, true);
        let mut backward = Frontier::new(index, sink, false);
        let mut best = f64::INFINITY;
        let mut meeting: Option<usize> = None;
        let mut relaxations = 0u64;
        let mut forward_turn = true;

        loop {
            let (Some(min_f), Some(min_b)) = (forward.min_key(), backward.min_key()) else {
                break;
            };
            if min_f + min_b >= best || min_f + min_b > radius {
                break;
            }

            let (frontier, other) = if forward_turn {
                (&mut forward, &backward)
            } else {
                (&mut backward, &forward)
            };
            forward_turn = !forward_turn;

            let Some((u, MinDistance(dist))) = frontier.queue.pop() else {
                break;
            };
            for &edge in frontier.edges(u) {
                let w = index.edge(edge).weight;
                if w < 0.0 {
                    return Err(Error::NegativeEdgeWeight {
                        edge: index.edge(edge).id.as_u64(),
                        weight: w,
                    });
                }
                let v = index.opposite(edge, u);
                relaxations += 1;
                frontier.update(v, edge, dist + w);

                let total = dist + w + other.distance[v];
                if total < best {
                    best = total;
                    meeting = Some(v);
                    trace!("更新候选路径: meeting={}, weight={}", index.vertex(v), best);
                }
            }
        }

        metrics.record_shortest_path_complete(timer, relaxations);

        let path = match meeting {
            Some(middle) if best.is_finite() && best <= radius => {
                Some(self.join(&forward, &backward, source, sink, middle, best))
            }
            _ => None,
        };
        debug!("双向 Dijkstra 完成: weight={}, relaxations={}", best, relaxations);
        Ok(path)
    }

    /// 拼接正向树中 source->middle 与反向树中 middle->sink 两段
    fn join(
        &self,
        forward: &Frontier<'_>,
        backward: &Frontier<'_>,
        source: usize,
        sink: usize,
        middle: usize,
        weight: f64,
    ) -> GraphPath {
        let index = self.index();
        let mut vertices = vec![index.vertex(middle)];
        let mut edges = Vec::new();

        let mut current = middle;
        while current != source {
            let Some(edge) = forward.predecessor[current] else {
                break;
            };
            current = index.opposite(edge, current);
            edges.push(index.edge(edge).id);
            vertices.push(index.vertex(current));
        }
        vertices.reverse();
        edges.reverse();

        let mut current = middle;
        while current != sink {
            let Some(edge) = backward.predecessor[current] else {
                break;
            };
            current = index.opposite(edge, current);
            edges.push(index.edge(edge).id);
            vertices.push(index.vertex(current));
        }

        GraphPath::new(vertices, edges, weight)
    }
}

impl<G: WeightedGraph + ?Sized> ShortestPathAlgorithm for BidirectionalDijkstraShortestPath<G> {
    fn path(&self, source: VertexId, sink: VertexId) -> Result<Option<GraphPath>> {
        let index = self.index();
        let s = index.require(source, "源点")?;
        let t = index.require(sink, "目标点")?;
        if s == t {
            return Ok(Some(GraphPath::empty(source)));
        }
        self.search(s, t)
    }

    fn paths(&self, source: VertexId) -> Result<SingleSourcePaths> {
        let index = self.index();
        index.require(source, "源点")?;
        list_backed_paths(self, source, index.vertices().iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn v(id: u64) -> VertexId {
        VertexId::new(id)
    }

    /// 1-2(3), 2-4(3), 1-3(3), 3-5(5), 5-4(5)
    fn two_routes() -> Arc<Graph> {
        let graph = Graph::undirected();
        for (a, b, w) in [
            (1, 2, 3.0),
            (2, 4, 3.0),
            (1, 3, 3.0),
            (3, 5, 5.0),
            (5, 4, 5.0),
        ] {
            graph.add_edge_with_vertices(a, b, w).unwrap();
        }
        graph
    }

    #[test]
    fn test_two_routes() {
        let algo = BidirectionalDijkstraShortestPath::new(two_routes());
        let path = algo.path(v(3), v(4)).unwrap().unwrap();
        assert_eq!(path.weight(), 9.0);
        assert_eq!(path.vertices(), &[v(3), v(1), v(2), v(4)]);
        assert_eq!(path.length(), 3);
        assert_eq!(algo.path_weight(v(3), v(4)).unwrap(), 9.0);
    }

    #[test]
    fn test_directed_backward_search() {
        let graph = Graph::directed();
        graph.add_edge_with_vertices(1, 2, 1.0).unwrap();
        graph.add_edge_with_vertices(2, 3, 1.0).unwrap();
        graph.add_edge_with_vertices(1, 3, 5.0).unwrap();
        graph.add_edge_with_vertices(3, 4, 1.0).unwrap();

        let algo = BidirectionalDijkstraShortestPath::new(graph);
        let path = algo.path(v(1), v(4)).unwrap().unwrap();
        assert_eq!(path.vertices(), &[v(1), v(2), v(3), v(4)]);
        assert_eq!(path.weight(), 3.0);
        assert!(algo.path(v(4), v(1)).unwrap().is_none());
    }

    #[test]
    fn test_radius_bound() {
        let algo = BidirectionalDijkstraShortestPath::new(two_routes())
            .with_radius(8.0)
            .unwrap();
        assert!(algo.path(v(3), v(4)).unwrap().is_none());
        assert_eq!(algo.path_weight(v(3), v(1)).unwrap(), 3.0);

        let algo = BidirectionalDijkstraShortestPath::new(two_routes())
            .with_radius(9.0)
            .unwrap();
        assert_eq!(algo.path_weight(v(3), v(4)).unwrap(), 9.0);
    }

    #[test]
    fn test_invalid_arguments() {
        let graph = two_routes();
        assert!(matches!(
            BidirectionalDijkstraShortestPath::new(graph.clone()).with_radius(-1.0),
            Err(Error::InvalidArgument(_))
        ));
        let algo = BidirectionalDijkstraShortestPath::new(graph);
        assert!(algo.path(v(99), v(1)).unwrap_err().is_invalid_argument());
        assert!(algo.path(v(1), v(99)).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_same_vertex_and_paths() {
        let algo = BidirectionalDijkstraShortestPath::new(two_routes());
        assert!(algo.path(v(5), v(5)).unwrap().unwrap().is_empty());

        let paths = algo.paths(v(3)).unwrap();
        assert_eq!(paths.weight(v(3)), 0.0);
        assert_eq!(paths.weight(v(2)), 6.0);
        assert_eq!(paths.weight(v(4)), 9.0);
    }

    #[test]
    fn test_negative_weight() {
        let graph = Graph::directed();
        graph.add_edge_with_vertices(1, 2, -2.0).unwrap();
        let algo = BidirectionalDijkstraShortestPath::new(graph);
        assert!(matches!(
            algo.path(v(1), v(2)),
            Err(Error::NegativeEdgeWeight { .. })
        ));
    }
}
