//! 路径与单源路径结果

use crate::graph::{EdgeId, VertexId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 一条带权路径
///
/// `vertices` 比 `edges` 多一个元素；起点等于终点时为空路径，权重为 0。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPath {
    vertices: Vec<VertexId>,
    edges: Vec<EdgeId>,
    weight: f64,
}

impl GraphPath {
    pub(crate) fn new(vertices: Vec<VertexId>, edges: Vec<EdgeId>, weight: f64) -> Self {
        debug_assert_eq!(vertices.len(), edges.len() + 1);
        Self {
            vertices,
            edges,
            weight,
        }
    }

    /// 单顶点空路径
    pub fn empty(vertex: VertexId) -> Self {
        Self {
            vertices: vec![vertex],
            edges: Vec::new(),
            weight: 0.0,
        }
    }

    pub fn start_vertex(&self) -> VertexId {
        self.vertices[0]
    }

    pub fn end_vertex(&self) -> VertexId {
        self.vertices[self.vertices.len() - 1]
    }

    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// 边数
    pub fn length(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// 路径的存储方式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) enum Routes {
    /// 前驱表：目标 -> (进入目标的边, 上一个顶点)
    Predecessors(HashMap<VertexId, (EdgeId, VertexId)>),
    /// 直接存放完整路径
    Paths(HashMap<VertexId, GraphPath>),
}

/// 从同一源点出发到所有可达顶点的最短路径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleSourcePaths {
    source: VertexId,
    distances: HashMap<VertexId, f64>,
    routes: Routes,
}

impl SingleSourcePaths {
    pub(crate) fn from_predecessors(
        source: VertexId,
        distances: HashMap<VertexId, f64>,
        predecessors: HashMap<VertexId, (EdgeId, VertexId)>,
    ) -> Self {
        Self {
            source,
            distances,
            routes: Routes::Predecessors(predecessors),
        }
    }

    pub(crate) fn from_paths(source: VertexId, paths: HashMap<VertexId, GraphPath>) -> Self {
        let distances = paths.iter().map(|(&v, p)| (v, p.weight())).collect();
        Self {
            source,
            distances,
            routes: Routes::Paths(paths),
        }
    }

    /// 距离与路径分开给出（距离可能来自矩阵，路径可能缺失）
    pub(crate) fn from_parts(
        source: VertexId,
        distances: HashMap<VertexId, f64>,
        paths: HashMap<VertexId, GraphPath>,
    ) -> Self {
        Self {
            source,
            distances,
            routes: Routes::Paths(paths),
        }
    }

    pub fn source(&self) -> VertexId {
        self.source
    }

    /// 到 `target` 的距离，不可达时为正无穷
    pub fn weight(&self, target: VertexId) -> f64 {
        self.distances
            .get(&target)
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    pub fn is_reachable(&self, target: VertexId) -> bool {
        self.weight(target).is_finite()
    }

    /// 可达顶点（含源点）
    pub fn reachable(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.distances
            .iter()
            .filter(|(_, d)| d.is_finite())
            .map(|(&v, _)| v)
    }

    /// 到 `target` 的路径，不可达时为 `None`
    pub fn path(&self, target: VertexId) -> Option<GraphPath> {
        match &self.routes {
            Routes::Paths(paths) => paths.get(&target).cloned(),
            Routes::Predecessors(predecessors) => {
                if target == self.source {
                    return Some(GraphPath::empty(target));
                }
                let weight = self.weight(target);
                if !weight.is_finite() {
                    return None;
                }

                let mut vertices = vec![target];
                let mut edges = Vec::new();
                let mut current = target;
                while current != self.source {
                    let &(edge, previous) = predecessors.get(&current)?;
                    edges.push(edge);
                    vertices.push(previous);
                    current = previous;
                    // 前驱表损坏时避免死循环
                    if edges.len() > predecessors.len() {
                        return None;
                    }
                }
                vertices.reverse();
                edges.reverse();
                Some(GraphPath::new(vertices, edges, weight))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(id: u64) -> VertexId {
        VertexId::new(id)
    }

    fn e(id: u64) -> EdgeId {
        EdgeId::new(id)
    }

    #[test]
    fn test_empty_path() {
        let path = GraphPath::empty(v(3));
        assert_eq!(path.start_vertex(), v(3));
        assert_eq!(path.end_vertex(), v(3));
        assert_eq!(path.length(), 0);
        assert_eq!(path.weight(), 0.0);
        assert!(path.is_empty());
    }

    #[test]
    fn test_predecessor_paths() {
        let distances = HashMap::from([(v(1), 0.0), (v(2), 2.0), (v(3), 5.0)]);
        let predecessors = HashMap::from([(v(2), (e(10), v(1))), (v(3), (e(11), v(2)))]);
        let paths = SingleSourcePaths::from_predecessors(v(1), distances, predecessors);

        let path = paths.path(v(3)).unwrap();
        assert_eq!(path.vertices(), &[v(1), v(2), v(3)]);
        assert_eq!(path.edges(), &[e(10), e(11)]);
        assert_eq!(path.weight(), 5.0);
        assert_eq!(path.length(), 2);

        assert!(paths.path(v(1)).unwrap().is_empty());
        assert!(paths.path(v(9)).is_none());
        assert_eq!(paths.weight(v(9)), f64::INFINITY);
        assert_eq!(paths.reachable().count(), 3);
    }

    #[test]
    fn test_list_backed_paths() {
        let path = GraphPath::new(vec![v(1), v(2)], vec![e(4)], 1.5);
        let paths = SingleSourcePaths::from_paths(
            v(1),
            HashMap::from([(v(1), GraphPath::empty(v(1))), (v(2), path.clone())]),
        );
        assert_eq!(paths.path(v(2)), Some(path));
        assert_eq!(paths.weight(v(2)), 1.5);
        assert!(!paths.is_reachable(v(3)));
    }

    #[test]
    fn test_path_serialize() {
        let path = GraphPath::new(vec![v(1), v(2)], vec![e(4)], 1.5);
        let json = serde_json::to_string(&path).unwrap();
        assert!(json.contains("\"weight\":1.5"));
    }
}
