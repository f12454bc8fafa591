//! 图核心模块
//!
//! 定义顶点、边、图类型、算法读取图所用的 trait，以及默认的内存图实现

mod edge;
mod graph;
mod index;
mod types;
mod vertex;
mod view;

pub use edge::{Edge, EdgeId};
pub use graph::Graph;
pub use types::GraphType;
pub use vertex::VertexId;
pub use view::WeightedGraph;
