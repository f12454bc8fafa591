//! 最短路算法
//!
//! - `DijkstraShortestPath`: 非负权单源
//! - `BidirectionalDijkstraShortestPath`: 非负权单对
//! - `BellmanFordShortestPath`: 允许负权，检测负权环
//! - `FloydWarshallShortestPaths`: 稠密全源
//! - `JohnsonShortestPaths`: 稀疏全源，允许负权

mod bellman_ford;
mod bidirectional;
mod dijkstra;
mod floyd_warshall;
mod johnson;

pub use bellman_ford::BellmanFordShortestPath;
pub use bidirectional::BidirectionalDijkstraShortestPath;
pub use dijkstra::DijkstraShortestPath;
pub use floyd_warshall::FloydWarshallShortestPaths;
pub use johnson::JohnsonShortestPaths;

use crate::algorithm::path::{GraphPath, SingleSourcePaths};
use crate::config::AlgorithmConfig;
use crate::error::Result;
use crate::graph::{VertexId, WeightedGraph};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// 最短路算法的公共接口
pub trait ShortestPathAlgorithm {
    /// `source` 到 `sink` 的最短路，不可达时为 `None`
    fn path(&self, source: VertexId, sink: VertexId) -> Result<Option<GraphPath>>;

    /// 最短路权重，不可达时为正无穷
    fn path_weight(&self, source: VertexId, sink: VertexId) -> Result<f64> {
        Ok(self
            .path(source, sink)?
            .map(|p| p.weight())
            .unwrap_or(f64::INFINITY))
    }

    /// 从 `source` 出发的全部最短路
    fn paths(&self, source: VertexId) -> Result<SingleSourcePaths>;
}

/// 对每个目标顶点调用一次 `path`，组装成按路径存储的单源结果
pub(crate) fn list_backed_paths<A, I>(
    algorithm: &A,
    source: VertexId,
    targets: I,
) -> Result<SingleSourcePaths>
where
    A: ShortestPathAlgorithm + ?Sized,
    I: IntoIterator<Item = VertexId>,
{
    let mut paths = HashMap::new();
    for target in targets {
        if let Some(path) = algorithm.path(source, target)? {
            paths.insert(target, path);
        }
    }
    Ok(SingleSourcePaths::from_paths(source, paths))
}

/// 可选的最短路算法
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShortestPathStrategy {
    #[default]
    Dijkstra,
    BidirectionalDijkstra,
    BellmanFord,
    FloydWarshall,
    Johnson,
}

impl ShortestPathStrategy {
    pub const ALL: [ShortestPathStrategy; 5] = [
        ShortestPathStrategy::Dijkstra,
        ShortestPathStrategy::BidirectionalDijkstra,
        ShortestPathStrategy::BellmanFord,
        ShortestPathStrategy::FloydWarshall,
        ShortestPathStrategy::Johnson,
    ];

    /// 按策略创建算法实例
    pub fn build<G: WeightedGraph + ?Sized>(
        self,
        graph: Arc<G>,
        config: AlgorithmConfig,
    ) -> Result<ShortestPathEngine<G>> {
        Ok(match self {
            ShortestPathStrategy::Dijkstra => {
                ShortestPathEngine::Dijkstra(DijkstraShortestPath::new(graph).with_config(config)?)
            }
            ShortestPathStrategy::BidirectionalDijkstra => ShortestPathEngine::BidirectionalDijkstra(
                BidirectionalDijkstraShortestPath::new(graph).with_config(config)?,
            ),
            ShortestPathStrategy::BellmanFord => ShortestPathEngine::BellmanFord(
                BellmanFordShortestPath::new(graph).with_config(config)?,
            ),
            ShortestPathStrategy::FloydWarshall => ShortestPathEngine::FloydWarshall(
                FloydWarshallShortestPaths::new(graph).with_config(config)?,
            ),
            ShortestPathStrategy::Johnson => {
                ShortestPathEngine::Johnson(JohnsonShortestPaths::new(graph).with_config(config)?)
            }
        })
    }
}

/// 已选定的最短路算法实例
pub enum ShortestPathEngine<G: WeightedGraph + ?Sized> {
    Dijkstra(DijkstraShortestPath<G>),
    BidirectionalDijkstra(BidirectionalDijkstraShortestPath<G>),
    BellmanFord(BellmanFordShortestPath<G>),
    FloydWarshall(FloydWarshallShortestPaths<G>),
    Johnson(JohnsonShortestPaths<G>),
}

impl<G: WeightedGraph + ?Sized> ShortestPathEngine<G> {
    fn inner(&self) -> &dyn ShortestPathAlgorithm {
        match self {
            ShortestPathEngine::Dijkstra(a) => a,
            ShortestPathEngine::BidirectionalDijkstra(a) => a,
            ShortestPathEngine::BellmanFord(a) => a,
            ShortestPathEngine::FloydWarshall(a) => a,
            ShortestPathEngine::Johnson(a) => a,
        }
    }

    pub fn strategy(&self) -> ShortestPathStrategy {
        match self {
            ShortestPathEngine::Dijkstra(_) => ShortestPathStrategy::Dijkstra,
            ShortestPathEngine::BidirectionalDijkstra(_) => {
                ShortestPathStrategy::BidirectionalDijkstra
            }
            ShortestPathEngine::BellmanFord(_) => ShortestPathStrategy::BellmanFord,
            ShortestPathEngine::FloydWarshall(_) => ShortestPathStrategy::FloydWarshall,
            ShortestPathEngine::Johnson(_) => ShortestPathStrategy::Johnson,
        }
    }
}

impl<G: WeightedGraph + ?Sized> ShortestPathAlgorithm for ShortestPathEngine<G> {
    fn path(&self, source: VertexId, sink: VertexId) -> Result<Option<GraphPath>> {
        self.inner().path(source, sink)
    }

    fn path_weight(&self, source: VertexId, sink: VertexId) -> Result<f64> {
        self.inner().path_weight(source, sink)
    }

    fn paths(&self, source: VertexId) -> Result<SingleSourcePaths> {
        self.inner().paths(source)
    }
}

/// 全源最短路表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllPairsShortestPaths {
    rows: IndexMap<VertexId, SingleSourcePaths>,
}

impl AllPairsShortestPaths {
    /// 对每个顶点调用一次 `paths`
    pub fn compute<A, I>(algorithm: &A, vertices: I) -> Result<Self>
    where
        A: ShortestPathAlgorithm + ?Sized,
        I: IntoIterator<Item = VertexId>,
    {
        let mut rows = IndexMap::new();
        for vertex in vertices {
            rows.insert(vertex, algorithm.paths(vertex)?);
        }
        Ok(Self { rows })
    }

    /// 距离，未知顶点或不可达时为正无穷
    pub fn weight(&self, source: VertexId, sink: VertexId) -> f64 {
        self.rows
            .get(&source)
            .map(|row| row.weight(sink))
            .unwrap_or(f64::INFINITY)
    }

    pub fn path(&self, source: VertexId, sink: VertexId) -> Option<GraphPath> {
        self.rows.get(&source)?.path(sink)
    }

    pub fn from_source(&self, source: VertexId) -> Option<&SingleSourcePaths> {
        self.rows.get(&source)
    }

    pub fn sources(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.rows.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::graph::{Graph, GraphType};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_graph(rng: &mut StdRng, graph_type: GraphType, n: u64, m: usize) -> Arc<Graph> {
        let graph = Graph::new(graph_type);
        graph.add_vertices(0..n);
        for _ in 0..m {
            let a = rng.gen_range(0..n);
            let b = rng.gen_range(0..n);
            let w = (rng.gen_range(0.0..10.0_f64) * 100.0).round() / 100.0;
            graph
                .add_weighted_edge(VertexId::new(a), VertexId::new(b), w)
                .unwrap();
        }
        graph
    }

    fn assert_all_agree(graph: Arc<Graph>) {
        let engines: Vec<_> = ShortestPathStrategy::ALL
            .iter()
            .map(|s| s.build(graph.clone(), AlgorithmConfig::default()).unwrap())
            .collect();
        let vertices = graph.vertices();
        for &s in &vertices {
            for &t in &vertices {
                let reference = engines[0].path_weight(s, t).unwrap();
                for engine in &engines[1..] {
                    let weight = engine.path_weight(s, t).unwrap();
                    if reference.is_infinite() {
                        assert!(weight.is_infinite(), "{:?} {} -> {}", engine.strategy(), s, t);
                    } else {
                        assert!(
                            (weight - reference).abs() < 1e-9,
                            "{:?} {} -> {}: {} vs {}",
                            engine.strategy(),
                            s,
                            t,
                            weight,
                            reference
                        );
                    }
                    if let Some(path) = engine.path(s, t).unwrap() {
                        assert_eq!(path.start_vertex(), s);
                        assert_eq!(path.end_vertex(), t);
                        assert_eq!(path.vertices().len(), path.length() + 1);
                        let sum: f64 = path.edges().iter().map(|&e| graph.edge_weight(e)).sum();
                        assert!((sum - path.weight()).abs() < 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn test_engines_agree_on_random_directed_graphs() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let graph = random_graph(&mut rng, GraphType::directed_pseudograph(), 12, 40);
            assert_all_agree(graph);
        }
    }

    #[test]
    fn test_engines_agree_on_random_undirected_graphs() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let graph = random_graph(&mut rng, GraphType::pseudograph(), 10, 25);
            assert_all_agree(graph);
        }
    }

    #[test]
    fn test_negative_cycle_engines() {
        let graph = Graph::directed();
        graph.add_edge_with_vertices(1, 2, 2.0).unwrap();
        graph.add_edge_with_vertices(2, 3, -4.0).unwrap();
        graph.add_edge_with_vertices(3, 2, 1.0).unwrap();

        for strategy in [ShortestPathStrategy::BellmanFord, ShortestPathStrategy::Johnson] {
            let engine = strategy.build(graph.clone(), AlgorithmConfig::default()).unwrap();
            assert!(matches!(
                engine.path_weight(VertexId::new(1), VertexId::new(3)),
                Err(Error::NegativeCycle)
            ));
        }
    }

    #[test]
    fn test_all_pairs_table() {
        let graph = Graph::undirected();
        graph.add_edge_with_vertices(1, 2, 1.0).unwrap();
        graph.add_edge_with_vertices(2, 3, 2.0).unwrap();
        let engine = ShortestPathStrategy::FloydWarshall
            .build(graph.clone(), AlgorithmConfig::default())
            .unwrap();
        let table = AllPairsShortestPaths::compute(&engine, graph.vertices()).unwrap();
        assert_eq!(table.weight(VertexId::new(1), VertexId::new(3)), 3.0);
        assert_eq!(table.weight(VertexId::new(3), VertexId::new(9)), f64::INFINITY);
        assert_eq!(table.path(VertexId::new(3), VertexId::new(1)).unwrap().length(), 2);
        assert_eq!(table.sources().count(), 3);
    }

    #[test]
    fn test_build_rejects_bad_config() {
        let config = AlgorithmConfig {
            epsilon: 1e-9,
            radius: -3.0,
        };
        assert!(ShortestPathStrategy::Dijkstra
            .build(Graph::directed(), config)
            .is_err());
    }
}
