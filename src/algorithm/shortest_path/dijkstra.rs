//! Dijkstra 单源最短路
//!
//! 基于 `priority_queue` 的可更新优先队列，要求非负边权。
//! 支持搜索半径：距离超过半径的顶点不会被确定。

use super::ShortestPathAlgorithm;
use crate::algorithm::indexed::IndexedGraph;
use crate::algorithm::path::{GraphPath, SingleSourcePaths};
use crate::config::AlgorithmConfig;
use crate::error::{Error, Result};
use crate::graph::{VertexId, WeightedGraph};
use crate::metrics::global_metrics;
use crate::tolerance::MinDistance;
use once_cell::sync::OnceCell;
use priority_queue::PriorityQueue;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 一次搜索得到的最短路树
#[derive(Debug, Clone)]
pub(crate) struct SearchTree {
    source: usize,
    distance: Vec<f64>,
    /// 进入顶点的树边
    predecessor: Vec<Option<usize>>,
    settled: Vec<bool>,
    pub relaxations: u64,
}

impl SearchTree {
    pub fn distance(&self, vertex: usize) -> f64 {
        if self.settled[vertex] {
            self.distance[vertex]
        } else {
            f64::INFINITY
        }
    }

    pub fn settled_count(&self) -> usize {
        self.settled.iter().filter(|&&s| s).count()
    }

    pub fn path_to(&self, index: &IndexedGraph, target: usize) -> Option<GraphPath> {
        if !self.settled[target] {
            return None;
        }
        let mut vertices = vec![index.vertex(target)];
        let mut edges = Vec::new();
        let mut current = target;
        while current != self.source {
            let edge = self.predecessor[current]?;
            current = index.opposite(edge, current);
            edges.push(index.edge(edge).id);
            vertices.push(index.vertex(current));
        }
        vertices.reverse();
        edges.reverse();
        Some(GraphPath::new(vertices, edges, self.distance[target]))
    }

    /// 转成对外的单源结果，`adjust(v, d)` 用于 Johnson 还原重赋权后的距离
    pub fn into_paths<F>(self, index: &IndexedGraph, adjust: F) -> SingleSourcePaths
    where
        F: Fn(usize, f64) -> f64,
    {
        let mut distances = HashMap::new();
        let mut predecessors = HashMap::new();
        for v in 0..index.vertex_count() {
            if !self.settled[v] {
                continue;
            }
            distances.insert(index.vertex(v), adjust(v, self.distance[v]));
            if let Some(edge) = self.predecessor[v] {
                let previous = index.opposite(edge, v);
                predecessors.insert(
                    index.vertex(v),
                    (index.edge(edge).id, index.vertex(previous)),
                );
            }
        }
        SingleSourcePaths::from_predecessors(index.vertex(self.source), distances, predecessors)
    }
}

/// 从 `source` 出发的 Dijkstra 搜索
///
/// `weight` 给出每条边（快照下标）参与计算的权重。确定 `target` 后立即停止；
/// 弹出的距离超过 `radius` 时停止。
pub(crate) fn search<W>(
    index: &IndexedGraph,
    source: usize,
    target: Option<usize>,
    radius: f64,
    weight: W,
) -> Result<SearchTree>
where
    W: Fn(usize) -> f64,
{
    let n = index.vertex_count();
    let mut tree = SearchTree {
        source,
        distance: vec![f64::INFINITY; n],
        predecessor: vec![None; n],
        settled: vec![false; n],
        relaxations: 0,
    };
    let mut queue = PriorityQueue::new();
    tree.distance[source] = 0.0;
    queue.push(source, MinDistance(0.0));

    while let Some((u, MinDistance(dist))) = queue.pop() {
        if dist > radius {
            break;
        }
        tree.settled[u] = true;
        if Some(u) == target {
            break;
        }

        for &edge in index.outgoing(u) {
            let w = weight(edge);
            if w < 0.0 {
                return Err(Error::NegativeEdgeWeight {
                    edge: index.edge(edge).id.as_u64(),
                    weight: w,
                });
            }
            let v = index.opposite(edge, u);
            if tree.settled[v] {
                continue;
            }
            tree.relaxations += 1;
            let candidate = dist + w;
            if candidate < tree.distance[v] {
                tree.distance[v] = candidate;
                tree.predecessor[v] = Some(edge);
                queue.push(v, MinDistance(candidate));
            }
        }
    }

    Ok(tree)
}

/// Dijkstra 最短路
pub struct DijkstraShortestPath<G: WeightedGraph + ?Sized> {
    graph: Arc<G>,
    config: AlgorithmConfig,
    index: OnceCell<IndexedGraph>,
}

impl<G: WeightedGraph + ?Sized> DijkstraShortestPath<G> {
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

    /// 设置搜索半径，负数报错
    pub fn with_radius(mut self, radius: f64) -> Result<Self> {
        self.config = self.config.with_radius(radius)?;
        Ok(self)
    }

    pub fn radius(&self) -> f64 {
        self.config.radius
    }

    fn index(&self) -> &IndexedGraph {
        self.index
            .get_or_init(|| IndexedGraph::from_graph(self.graph.as_ref()))
    }

    fn run(&self, source: usize, target: Option<usize>) -> Result<SearchTree> {
        let index = self.index();
        let metrics = global_metrics();
        let timer = metrics.record_shortest_path_start();
        debug!(
            "Dijkstra 开始: source={}, vertices={}, edges={}, radius={}",
            index.vertex(source),
            index.vertex_count(),
            index.edge_count(),
            self.config.radius
        );

        let tree = search(index, source, target, self.config.radius, |e| {
            index.edge(e).weight
        })?;

        metrics.record_shortest_path_complete(timer, tree.relaxations);
        debug!(
            "Dijkstra 完成: settled={}, relaxations={}",
            tree.settled_count(),
            tree.relaxations
        );
        Ok(tree)
    }
}

impl<G: WeightedGraph + ?Sized> ShortestPathAlgorithm for DijkstraShortestPath<G> {
    fn path(&self, source: VertexId, sink: VertexId) -> Result<Option<GraphPath>> {
        let index = self.index();
        let s = index.require(source, "源点")?;
        let t = index.require(sink, "目标点")?;
        if s == t {
            return Ok(Some(GraphPath::empty(source)));
        }
        let tree = self.run(s, Some(t))?;
        Ok(tree.path_to(index, t))
    }

    fn path_weight(&self, source: VertexId, sink: VertexId) -> Result<f64> {
        let index = self.index();
        let s = index.require(source, "源点")?;
        let t = index.require(sink, "目标点")?;
        if s == t {
            return Ok(0.0);
        }
        Ok(self.run(s, Some(t))?.distance(t))
    }

    fn paths(&self, source: VertexId) -> Result<SingleSourcePaths> {
        let index = self.index();
        let s = index.require(source, "源点")?;
        let tree = self.run(s, None)?;
        Ok(tree.into_paths(index, |_, d| d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn v(id: u64) -> VertexId {
        VertexId::new(id)
    }

    /// 1-2(2), 1-3(3), 2-4(5), 3-4(20), 4-5(5), 1-5(100)
    fn undirected_sample() -> Arc<Graph> {
        let graph = Graph::undirected();
        for (a, b, w) in [
            (1, 2, 2.0),
            (1, 3, 3.0),
            (2, 4, 5.0),
            (3, 4, 20.0),
            (4, 5, 5.0),
            (1, 5, 100.0),
        ] {
            graph.add_edge_with_vertices(a, b, w).unwrap();
        }
        graph
    }

    #[test]
    fn test_single_pair() {
        let dijkstra = DijkstraShortestPath::new(undirected_sample());
        let path = dijkstra.path(v(3), v(5)).unwrap().unwrap();
        assert_eq!(path.vertices(), &[v(3), v(1), v(2), v(4), v(5)]);
        assert_eq!(path.weight(), 15.0);
        assert_eq!(dijkstra.path_weight(v(3), v(4)).unwrap(), 10.0);
    }

    #[test]
    fn test_single_source() {
        let dijkstra = DijkstraShortestPath::new(undirected_sample());
        let paths = dijkstra.paths(v(3)).unwrap();
        assert_eq!(paths.weight(v(1)), 3.0);
        assert_eq!(paths.weight(v(2)), 5.0);
        assert_eq!(paths.weight(v(3)), 0.0);
        assert_eq!(paths.weight(v(4)), 10.0);
        assert_eq!(paths.weight(v(5)), 15.0);
        assert_eq!(paths.path(v(5)).unwrap().length(), 4);
    }

    #[test]
    fn test_source_equals_target() {
        let dijkstra = DijkstraShortestPath::new(undirected_sample());
        let path = dijkstra.path(v(2), v(2)).unwrap().unwrap();
        assert!(path.is_empty());
        assert_eq!(path.weight(), 0.0);
    }

    #[test]
    fn test_unreachable() {
        let graph = Graph::directed();
        graph.add_edge_with_vertices(1, 2, 1.0).unwrap();
        graph.add_vertex_with_id(v(3)).unwrap();
        let dijkstra = DijkstraShortestPath::new(graph);
        assert!(dijkstra.path(v(2), v(1)).unwrap().is_none());
        assert_eq!(dijkstra.path_weight(v(1), v(3)).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_negative_edge_rejected() {
        let graph = Graph::directed();
        graph.add_edge_with_vertices(1, 2, 1.0).unwrap();
        graph.add_edge_with_vertices(2, 3, -1.0).unwrap();
        let dijkstra = DijkstraShortestPath::new(graph);
        let err = dijkstra.path(v(1), v(3)).unwrap_err();
        assert!(matches!(err, Error::NegativeEdgeWeight { weight, .. } if weight == -1.0));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_unknown_vertex() {
        let dijkstra = DijkstraShortestPath::new(undirected_sample());
        assert!(matches!(
            dijkstra.path(v(1), v(42)),
            Err(Error::VertexNotFound(_))
        ));
        assert!(dijkstra.paths(v(42)).is_err());
    }

    #[test]
    fn test_radius() {
        let dijkstra = DijkstraShortestPath::new(undirected_sample())
            .with_radius(6.0)
            .unwrap();
        let paths = dijkstra.paths(v(3)).unwrap();
        assert_eq!(paths.weight(v(2)), 5.0);
        assert!(!paths.is_reachable(v(4)));
        assert!(dijkstra.path(v(3), v(5)).unwrap().is_none());

        assert!(DijkstraShortestPath::new(undirected_sample())
            .with_radius(-1.0)
            .is_err());
    }
}
