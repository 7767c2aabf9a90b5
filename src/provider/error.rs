// ==========================================
// 图书零售库存决策支持系统 - 协作方错误类型
// ==========================================
// 职责: 定义外部数据协作方的错误类型
// ==========================================

use thiserror::Error;

/// 协作方数据访问错误
///
/// 所有错误信息必须包含显式原因 (可解释性)
#[derive(Error, Debug)]
pub enum ProviderError {
    /// 实体不存在 (未知品目等)
    #[error("{entity}(id={id})不存在")]
    NotFound { entity: String, id: String },

    /// 协作方暂不可用 (连接/超时等)
    #[error("协作方不可用: {0}")]
    Unavailable(String),

    /// 数据质量问题 (乱序序列、非法数值等)
    #[error("数据校验失败: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProviderError {
    /// 未知品目的便捷构造
    pub fn item_not_found(item_id: &str) -> Self {
        ProviderError::NotFound {
            entity: "Item".to_string(),
            id: item_id.to_string(),
        }
    }
}

/// Result 类型别名
pub type ProviderResult<T> = Result<T, ProviderError>;
