//! Floyd-Warshall 全源最短路
//!
//! 稠密距离矩阵加首跳矩阵，首次查询时计算并缓存。
//! 平行边取最小权重；自环只在为负时改写对角线。
//!
//! 存在负权环时结果为尽力而为：距离取 |V| 轮迭代后的矩阵值，
//! 路径重建超过 |V| 跳即返回 `NegativeCycle`。

use super::ShortestPathAlgorithm;
use crate::algorithm::indexed::IndexedGraph;
use crate::algorithm::path::{GraphPath, SingleSourcePaths};
use crate::config::AlgorithmConfig;
use crate::error::{Error, Result};
use crate::graph::{VertexId, WeightedGraph};
use crate::metrics::global_metrics;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug)]
struct DistanceMatrix {
    n: usize,
    distance: Vec<f64>,
    /// 首跳顶点
    next: Vec<Option<usize>>,
    /// 首跳所用的边
    next_edge: Vec<Option<usize>>,
}

impl DistanceMatrix {
    fn compute(index: &IndexedGraph) -> (Self, u64) {
        let n = index.vertex_count();
        let mut m = Self {
            n,
            distance: vec![f64::INFINITY; n * n],
            next: vec![None; n * n],
            next_edge: vec![None; n * n],
        };
        for i in 0..n {
            m.distance[i * n + i] = 0.0;
        }

        for (edge, e) in index.edges().iter().enumerate() {
            if e.is_loop() {
                let ii = e.source * n + e.source;
                m.distance[ii] = m.distance[ii].min(e.weight);
                continue;
            }
            m.seed(e.source, e.target, edge, e.weight);
            if !index.is_directed() {
                m.seed(e.target, e.source, edge, e.weight);
            }
        }

        let mut relaxations = 0u64;
        for k in 0..n {
            for i in 0..n {
                if m.distance[i * n + k] == f64::INFINITY {
                    continue;
                }
                for j in 0..n {
                    // j == k 时 d[i][k] 可能刚被改写，每次重新读取
                    let candidate = m.distance[i * n + k] + m.distance[k * n + j];
                    relaxations += 1;
                    if candidate < m.distance[i * n + j] {
                        m.distance[i * n + j] = candidate;
                        // i == k 且只有负自环时没有首跳，保留原首跳
                        if let Some(hop) = m.next[i * n + k] {
                            m.next[i * n + j] = Some(hop);
                            m.next_edge[i * n + j] = m.next_edge[i * n + k];
                        }
                    }
                }
            }
        }
        (m, relaxations)
    }

    fn seed(&mut self, from: usize, to: usize, edge: usize, weight: f64) {
        let at = from * self.n + to;
        if weight < self.distance[at] {
            self.distance[at] = weight;
            self.next[at] = Some(to);
            self.next_edge[at] = Some(edge);
        }
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        self.distance[i * self.n + j]
    }

    fn has_negative_diagonal(&self) -> bool {
        (0..self.n).any(|i| self.get(i, i) < 0.0)
    }
}

/// Floyd-Warshall 全源最短路
pub struct FloydWarshallShortestPaths<G: WeightedGraph + ?Sized> {
    graph: Arc<G>,
    config: AlgorithmConfig,
    index: OnceCell<IndexedGraph>,
    matrix: OnceCell<DistanceMatrix>,
}

impl<G: WeightedGraph + ?Sized> FloydWarshallShortestPaths<G> {
    pub fn new(graph: Arc<G>) -> Self {
        Self {
            graph,
            config: AlgorithmConfig::default(),
            index: OnceCell::new(),
            matrix: OnceCell::new(),
        }
    }

    pub fn with_config(mut self, config: AlgorithmConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    fn index(&self) -> &IndexedGraph {
        self.index
            .get_or_init(|| IndexedGraph::from_graph(self.graph.as_ref()))
    }

    fn matrix(&self) -> &DistanceMatrix {
        self.matrix.get_or_init(|| {
            let index = self.index();
            let metrics = global_metrics();
            let timer = metrics.record_shortest_path_start();
            debug!(
                "Floyd-Warshall 开始: vertices={}, edges={}",
                index.vertex_count(),
                index.edge_count()
            );
            let (matrix, relaxations) = DistanceMatrix::compute(index);
            metrics.record_shortest_path_complete(timer, relaxations);
            if matrix.has_negative_diagonal() {
                metrics.record_negative_cycle();
                warn!("Floyd-Warshall 检测到负权环, 距离仅为迭代后的近似值");
            }
            debug!("Floyd-Warshall 完成: relaxations={}", relaxations);
            matrix
        })
    }

    fn pair(&self, source: VertexId, sink: VertexId) -> Result<(usize, usize)> {
        let index = self.index();
        Ok((index.require(source, "源点")?, index.require(sink, "目标点")?))
    }

    fn build_path(&self, s: usize, t: usize) -> Result<Option<GraphPath>> {
        let index = self.index();
        let matrix = self.matrix();
        if s == t {
            return Ok(Some(GraphPath::empty(index.vertex(s))));
        }
        let weight = matrix.get(s, t);
        if weight == f64::INFINITY {
            return Ok(None);
        }

        let n = matrix.n;
        let mut vertices = vec![index.vertex(s)];
        let mut edges = Vec::new();
        let mut current = s;
        while current != t {
            let at = current * n + t;
            let (Some(hop), Some(edge)) = (matrix.next[at], matrix.next_edge[at]) else {
                return Err(Error::NegativeCycle);
            };
            edges.push(index.edge(edge).id);
            vertices.push(index.vertex(hop));
            current = hop;
            if edges.len() > n {
                return Err(Error::NegativeCycle);
            }
        }
        Ok(Some(GraphPath::new(vertices, edges, weight)))
    }

    /// 从 `source` 到 `sink` 最短路上的第一个后继顶点
    pub fn first_hop(&self, source: VertexId, sink: VertexId) -> Result<Option<VertexId>> {
        let (s, t) = self.pair(source, sink)?;
        let matrix = self.matrix();
        Ok(matrix.next[s * matrix.n + t].map(|hop| self.index().vertex(hop)))
    }

    /// 最短路上 `sink` 之前的顶点
    pub fn last_hop(&self, source: VertexId, sink: VertexId) -> Result<Option<VertexId>> {
        let (s, t) = self.pair(source, sink)?;
        Ok(self.build_path(s, t)?.and_then(|path| {
            let vertices = path.vertices();
            (vertices.len() >= 2).then(|| vertices[vertices.len() - 2])
        }))
    }

    /// 最大的有限距离
    pub fn diameter(&self) -> f64 {
        self.matrix()
            .distance
            .iter()
            .filter(|d| d.is_finite())
            .fold(0.0, |acc: f64, &d| acc.max(d))
    }

    /// 存在路径的有序顶点对数量（不含自身）
    pub fn shortest_paths_count(&self) -> usize {
        let matrix = self.matrix();
        let n = matrix.n;
        (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .filter(|&(i, j)| i != j && matrix.get(i, j).is_finite())
            .count()
    }

    /// 对角线上是否出现负值
    pub fn has_negative_cycle(&self) -> bool {
        let matrix = self.matrix();
        let comparator = self.config.comparator();
        (0..matrix.n).any(|i| comparator.is_negative(matrix.get(i, i)))
    }
}

impl<G: WeightedGraph + ?Sized> ShortestPathAlgorithm for FloydWarshallShortestPaths<G> {
    fn path(&self, source: VertexId, sink: VertexId) -> Result<Option<GraphPath>> {
        let (s, t) = self.pair(source, sink)?;
        self.build_path(s, t)
    }

    fn path_weight(&self, source: VertexId, sink: VertexId) -> Result<f64> {
        let (s, t) = self.pair(source, sink)?;
        Ok(self.matrix().get(s, t))
    }

    fn paths(&self, source: VertexId) -> Result<SingleSourcePaths> {
        let index = self.index();
        let s = index.require(source, "源点")?;
        let matrix = self.matrix();

        let mut distances = HashMap::new();
        let mut paths = HashMap::new();
        for t in 0..index.vertex_count() {
            let d = matrix.get(s, t);
            if !d.is_finite() {
                continue;
            }
            distances.insert(index.vertex(t), d);
            match self.build_path(s, t) {
                Ok(Some(path)) => {
                    paths.insert(index.vertex(t), path);
                }
                Ok(None) => {}
                Err(err) => debug!("跳过无法重建的路径 {} -> {}: {}", source, index.vertex(t), err),
            }
        }
        Ok(SingleSourcePaths::from_parts(source, distances, paths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, GraphType};

    fn v(id: u64) -> VertexId {
        VertexId::new(id)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    /// 四个顶点，每对相邻顶点之间三条平行边，含负权
    fn negative_pseudograph() -> Arc<Graph> {
        let graph = Graph::new(GraphType::pseudograph());
        for (a, b, w) in [
            (1, 2, -5.0),
            (1, 2, -2.0),
            (1, 2, 1.0),
            (2, 3, 0.0),
            (2, 3, -2.0),
            (2, 3, -5.0),
            (3, 4, -100.0),
            (3, 4, 100.0),
            (3, 4, 1.0),
        ] {
            graph.add_edge_with_vertices(a, b, w).unwrap();
        }
        graph
    }

    #[test]
    fn test_negative_pseudograph_weights() {
        crate::test_support::init_tracing();
        let fw = FloydWarshallShortestPaths::new(negative_pseudograph());
        assert_close(fw.path_weight(v(2), v(1)).unwrap(), -345.0);
        assert_close(fw.path_weight(v(2), v(4)).unwrap(), -575.0);
        assert_close(fw.path_weight(v(1), v(1)).unwrap(), -340.0);
        assert_close(fw.path_weight(v(4), v(4)).unwrap(), -800.0);
        assert_close(fw.path_weight(v(3), v(1)).unwrap(), -370.0);
        assert_close(fw.path_weight(v(3), v(2)).unwrap(), -375.0);
        assert_close(fw.path_weight(v(3), v(3)).unwrap(), -400.0);
        assert_close(fw.path_weight(v(3), v(4)).unwrap(), -600.0);
        assert!(fw.has_negative_cycle());

        assert_eq!(fw.first_hop(v(1), v(4)).unwrap(), Some(v(2)));
        assert_eq!(fw.first_hop(v(4), v(1)).unwrap(), Some(v(3)));
        assert_eq!(fw.first_hop(v(2), v(3)).unwrap(), Some(v(1)));
        assert_eq!(fw.first_hop(v(2), v(4)).unwrap(), Some(v(1)));
        assert_eq!(fw.first_hop(v(3), v(4)).unwrap(), Some(v(2)));
        assert_eq!(fw.diameter(), 0.0);
        assert_eq!(fw.shortest_paths_count(), 12);

        let paths = fw.paths(v(2)).unwrap();
        assert_close(paths.weight(v(2)), -350.0);
        assert!(paths.path(v(2)).unwrap().is_empty());
    }

    #[test]
    fn test_nonnegative_paths() {
        let graph = Graph::directed();
        graph.add_edge_with_vertices(1, 2, 1.0).unwrap();
        graph.add_edge_with_vertices(2, 3, 2.0).unwrap();
        graph.add_edge_with_vertices(1, 3, 5.0).unwrap();
        graph.add_edge_with_vertices(3, 4, 1.0).unwrap();

        let fw = FloydWarshallShortestPaths::new(graph);
        let path = fw.path(v(1), v(4)).unwrap().unwrap();
        assert_eq!(path.vertices(), &[v(1), v(2), v(3), v(4)]);
        assert_eq!(path.weight(), 4.0);
        assert_eq!(fw.first_hop(v(1), v(4)).unwrap(), Some(v(2)));
        assert_eq!(fw.last_hop(v(1), v(4)).unwrap(), Some(v(3)));
        assert!(fw.path(v(4), v(1)).unwrap().is_none());
        assert_eq!(fw.path_weight(v(4), v(1)).unwrap(), f64::INFINITY);
        assert_eq!(fw.diameter(), 4.0);
        assert_eq!(fw.shortest_paths_count(), 6);
        assert!(!fw.has_negative_cycle());
    }

    #[test]
    fn test_parallel_edges_and_loops() {
        let graph = Graph::new(GraphType::directed_pseudograph());
        graph.add_edge_with_vertices(1, 2, 7.0).unwrap();
        let cheap = graph.add_edge_with_vertices(1, 2, 3.0).unwrap();
        graph.add_edge_with_vertices(1, 1, 4.0).unwrap();

        let fw = FloydWarshallShortestPaths::new(graph);
        let path = fw.path(v(1), v(2)).unwrap().unwrap();
        assert_eq!(path.edges(), &[cheap]);
        assert_eq!(fw.path_weight(v(1), v(1)).unwrap(), 0.0);
        assert_eq!(fw.shortest_paths_count(), 1);
    }

    #[test]
    fn test_negative_self_loop() {
        let graph = Graph::new(GraphType::directed_pseudograph());
        graph.add_edge_with_vertices(1, 2, 1.0).unwrap();
        graph.add_edge_with_vertices(2, 2, -1.0).unwrap();

        let fw = FloydWarshallShortestPaths::new(graph);
        assert!(fw.has_negative_cycle());
        assert!(fw.path_weight(v(2), v(2)).unwrap() < 0.0);
        assert!(fw.path(v(1), v(2)).unwrap().is_some());
    }

    #[test]
    fn test_unknown_vertex() {
        let fw = FloydWarshallShortestPaths::new(Graph::directed());
        assert!(matches!(
            fw.path(v(1), v(2)),
            Err(Error::VertexNotFound(_))
        ));
        assert_eq!(fw.diameter(), 0.0);
        assert_eq!(fw.shortest_paths_count(), 0);
    }
}
