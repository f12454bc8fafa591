//! 图类型描述

use serde::{Deserialize, Serialize};

/// 图的结构属性：方向性、是否允许自环和多重边、是否带权
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphType {
    directed: bool,
    allows_self_loops: bool,
    allows_multiple_edges: bool,
    weighted: bool,
}

impl GraphType {
    pub const fn new(
        directed: bool,
        allows_self_loops: bool,
        allows_multiple_edges: bool,
        weighted: bool,
    ) -> Self {
        Self {
            directed,
            allows_self_loops,
            allows_multiple_edges,
            weighted,
        }
    }

    /// 简单无向带权图
    pub const fn simple() -> Self {
        Self::new(false, false, false, true)
    }

    /// 简单有向带权图
    pub const fn directed_simple() -> Self {
        Self::new(true, false, false, true)
    }

    /// 无向多重图（无自环）
    pub const fn multigraph() -> Self {
        Self::new(false, false, true, true)
    }

    /// 有向多重图（无自环）
    pub const fn directed_multigraph() -> Self {
        Self::new(true, false, true, true)
    }

    /// 无向伪图（允许自环和多重边）
    pub const fn pseudograph() -> Self {
        Self::new(false, true, true, true)
    }

    /// 有向伪图
    pub const fn directed_pseudograph() -> Self {
        Self::new(true, true, true, true)
    }

    /// 返回不带权的同结构类型，所有边权重视为 1
    pub const fn unweighted(self) -> Self {
        Self {
            weighted: false,
            ..self
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_undirected(&self) -> bool {
        !self.directed
    }

    pub fn is_allowing_self_loops(&self) -> bool {
        self.allows_self_loops
    }

    pub fn is_allowing_multiple_edges(&self) -> bool {
        self.allows_multiple_edges
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    pub fn is_simple(&self) -> bool {
        !self.allows_self_loops && !self.allows_multiple_edges
    }

    pub fn is_pseudograph(&self) -> bool {
        self.allows_self_loops && self.allows_multiple_edges
    }
}

impl Default for GraphType {
    fn default() -> Self {
        Self::directed_simple()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_types() {
        assert!(GraphType::simple().is_simple());
        assert!(GraphType::simple().is_undirected());
        assert!(GraphType::directed_pseudograph().is_pseudograph());
        assert!(GraphType::directed_pseudograph().is_directed());
        assert!(!GraphType::multigraph().is_allowing_self_loops());
        assert!(!GraphType::pseudograph().unweighted().is_weighted());
    }
}
