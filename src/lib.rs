//! graphalg - 带权图最短路与最大流算法库
//!
//! 提供：
//! - 单源 / 单对 / 全源最短路（Dijkstra、双向 Dijkstra、Bellman-Ford、Floyd-Warshall、Johnson）
//! - 最大流与最小 s-t 割（Edmonds-Karp、推送-重标记）
//! - 内存图实现 `Graph`，以及供算法读取的 `WeightedGraph` 接口
//!
//! 算法实例在构造时绑定一张图，计算期间图必须保持不变。

pub mod algorithm;
pub mod config;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod tolerance;

// 重导出常用类型
pub use algorithm::{
    AllPairsShortestPaths, BellmanFordShortestPath, BidirectionalDijkstraShortestPath,
    DijkstraShortestPath, EdmondsKarpMaximumFlow, FloydWarshallShortestPaths, GraphPath,
    JohnsonShortestPaths, MaximumFlow, MaximumFlowAlgorithm, MaximumFlowStrategy, MinimumCut,
    MinimumCutAlgorithm, PushRelabelMaximumFlow, ShortestPathAlgorithm, ShortestPathStrategy,
    SingleSourcePaths,
};
pub use config::AlgorithmConfig;
pub use error::{Error, Result};
pub use graph::{Edge, EdgeId, Graph, GraphType, VertexId, WeightedGraph};
pub use metrics::{global_metrics, MetricsSnapshot};
pub use tolerance::ToleranceComparator;

use std::sync::Arc;

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `source` 到 `target` 的最短路，不可达时为 `None`
pub fn shortest_path<G: WeightedGraph + ?Sized>(
    graph: Arc<G>,
    source: VertexId,
    target: VertexId,
    strategy: ShortestPathStrategy,
) -> Result<Option<GraphPath>> {
    strategy
        .build(graph, AlgorithmConfig::default())?
        .path(source, target)
}

/// 从 `source` 出发的全部最短路
pub fn shortest_paths_from<G: WeightedGraph + ?Sized>(
    graph: Arc<G>,
    source: VertexId,
    strategy: ShortestPathStrategy,
) -> Result<SingleSourcePaths> {
    strategy
        .build(graph, AlgorithmConfig::default())?
        .paths(source)
}

/// 全源最短路表
pub fn all_pairs_shortest_paths<G: WeightedGraph + ?Sized>(
    graph: Arc<G>,
    strategy: ShortestPathStrategy,
) -> Result<AllPairsShortestPaths> {
    let vertices = graph.vertices();
    let engine = strategy.build(graph, AlgorithmConfig::default())?;
    AllPairsShortestPaths::compute(&engine, vertices)
}

/// 最大流
pub fn maximum_flow<G: WeightedGraph + ?Sized>(
    graph: Arc<G>,
    source: VertexId,
    sink: VertexId,
    strategy: MaximumFlowStrategy,
) -> Result<MaximumFlow> {
    strategy
        .build(graph, AlgorithmConfig::default())?
        .maximum_flow(source, sink)
}

/// 最小 s-t 割
pub fn minimum_cut<G: WeightedGraph + ?Sized>(
    graph: Arc<G>,
    source: VertexId,
    sink: VertexId,
    strategy: MaximumFlowStrategy,
) -> Result<MinimumCut> {
    strategy
        .build(graph, AlgorithmConfig::default())?
        .minimum_cut(source, sink)
}

#[cfg(test)]
pub(crate) mod test_support {
    /// 测试时打开日志，`RUST_LOG=graphalg=trace cargo test` 查看算法过程
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::init_tracing;

    fn v(id: u64) -> VertexId {
        VertexId::new(id)
    }

    #[test]
    fn test_shortest_path_entry_points() {
        init_tracing();
        let graph = Graph::directed();
        graph.add_edge_with_vertices(1, 2, 1.0).unwrap();
        graph.add_edge_with_vertices(2, 3, 1.0).unwrap();
        graph.add_edge_with_vertices(1, 3, 3.0).unwrap();

        for strategy in ShortestPathStrategy::ALL {
            let path = shortest_path(graph.clone(), v(1), v(3), strategy)
                .unwrap()
                .unwrap();
            assert_eq!(path.weight(), 2.0);
            let paths = shortest_paths_from(graph.clone(), v(1), strategy).unwrap();
            assert_eq!(paths.weight(v(2)), 1.0);
        }

        let table = all_pairs_shortest_paths(graph, ShortestPathStrategy::Johnson).unwrap();
        assert_eq!(table.weight(v(1), v(3)), 2.0);
        assert_eq!(table.weight(v(3), v(1)), f64::INFINITY);
    }

    #[test]
    fn test_flow_entry_points() {
        init_tracing();
        let graph = Graph::directed();
        graph.add_edge_with_vertices(1, 2, 4.0).unwrap();
        graph.add_edge_with_vertices(2, 3, 3.0).unwrap();

        let flow = maximum_flow(graph.clone(), v(1), v(3), MaximumFlowStrategy::PushRelabel).unwrap();
        assert_eq!(flow.value, 3.0);
        let cut = minimum_cut(graph, v(1), v(3), MaximumFlowStrategy::EdmondsKarp).unwrap();
        assert_eq!(cut.weight, 3.0);
        assert_eq!(cut.source_partition.len(), 2);
    }

    #[test]
    fn test_dyn_graph() {
        let graph: Arc<dyn WeightedGraph + Send + Sync> = Graph::undirected();
        assert!(shortest_path(graph, v(1), v(2), ShortestPathStrategy::Dijkstra).is_err());
    }
}
