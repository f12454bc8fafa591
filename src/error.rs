//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    #[error("顶点不存在: {0}")]
    VertexNotFound(String),

    #[error("边不存在: {0}")]
    EdgeNotFound(String),

    #[error("顶点已存在: {0}")]
    VertexAlreadyExists(String),

    #[error("图不允许自环: {0}")]
    LoopsNotAllowed(String),

    #[error("图不允许多重边: {0}")]
    MultipleEdgesNotAllowed(String),

    #[error("边 {edge} 的权重为负数 ({weight})，该算法要求非负权重")]
    NegativeEdgeWeight { edge: u64, weight: f64 },

    #[error("图中存在负权环")]
    NegativeCycle,
}

impl Error {
    /// 是否属于调用方传参错误（与图本身的性质无关）
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument(_)
                | Error::VertexNotFound(_)
                | Error::EdgeNotFound(_)
                | Error::NegativeEdgeWeight { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert!(Error::InvalidArgument("epsilon".into()).is_invalid_argument());
        assert!(Error::VertexNotFound("7".into()).is_invalid_argument());
        assert!(!Error::NegativeCycle.is_invalid_argument());
        assert!(!Error::LoopsNotAllowed("1".into()).is_invalid_argument());
    }

    #[test]
    fn test_error_message() {
        let err = Error::NegativeEdgeWeight {
            edge: 3,
            weight: -1.5,
        };
        assert!(err.to_string().contains("-1.5"));
        assert_eq!(Error::NegativeCycle.to_string(), "图中存在负权环");
    }
}
