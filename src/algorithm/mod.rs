//! 图算法模块
//!
//! 包含最短路和最大流 / 最小割算法。所有算法先把图转成稠密下标快照再计算。

pub mod flow;
mod indexed;
mod path;
pub mod shortest_path;

pub use flow::{
    EdmondsKarpMaximumFlow, MaximumFlow, MaximumFlowAlgorithm, MaximumFlowEngine,
    MaximumFlowStrategy, MinimumCut, MinimumCutAlgorithm, PushRelabelMaximumFlow,
};
pub use path::{GraphPath, SingleSourcePaths};
pub use shortest_path::{
    AllPairsShortestPaths, BellmanFordShortestPath, BidirectionalDijkstraShortestPath,
    DijkstraShortestPath, FloydWarshallShortestPaths, JohnsonShortestPaths, ShortestPathAlgorithm,
    ShortestPathEngine, ShortestPathStrategy,
};
