//! 算法配置

use crate::error::{Error, Result};
use crate::tolerance::{ToleranceComparator, DEFAULT_EPSILON};
use serde::{Deserialize, Serialize};

/// 算法通用参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmConfig {
    /// 浮点比较容差
    pub epsilon: f64,
    /// 搜索半径（仅 Dijkstra 类算法使用），超出半径的路径视为不存在
    pub radius: f64,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            radius: f64::INFINITY,
        }
    }
}

impl AlgorithmConfig {
    /// 校验参数，负数或 NaN 直接报错，不做修正
    pub fn validate(&self) -> Result<()> {
        ToleranceComparator::new(self.epsilon)?;
        if self.radius.is_nan() || self.radius < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "搜索半径必须为非负数, 实际为 {}",
                self.radius
            )));
        }
        Ok(())
    }

    pub fn comparator(&self) -> ToleranceComparator {
        ToleranceComparator::new(self.epsilon).unwrap_or_default()
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Result<Self> {
        self.epsilon = epsilon;
        self.validate()?;
        Ok(self)
    }

    pub fn with_radius(mut self, radius: f64) -> Result<Self> {
        self.radius = radius;
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AlgorithmConfig::default();
        assert_eq!(config.epsilon, 1e-9);
        assert!(config.radius.is_infinite());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reject_negative_values() {
        let config = AlgorithmConfig::default();
        assert!(matches!(
            config.with_radius(-2.0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            config.with_epsilon(-0.1),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(config.with_radius(0.0).unwrap().radius, 0.0);
    }

    #[test]
    fn test_partial_json() {
        let config: AlgorithmConfig = serde_json::from_str(r#"{"radius": 12.5}"#).unwrap();
        assert_eq!(config.radius, 12.5);
        assert_eq!(config.epsilon, DEFAULT_EPSILON);
    }
}
