// ==========================================
// 图书零售库存决策支持系统 - API层错误类型
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 10. 错误分级
// 职责: 定义API层错误类型,转换协作方错误为用户友好的错误消息
// 红线: 所有错误信息必须包含显式原因 (可解释性)
// ==========================================
// 说明: 历史不足 (InsufficientData) 与退化输入 (零销售额/零均值)
// 不是错误 —— 算法内部降级为低置信度缺省或中性零值
// ==========================================

use crate::engine::orchestrator::OrchestrationError;
use crate::provider::error::ProviderError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum AnalysisError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    /// 未知品目 (上层映射为 404 等价)
    #[error("品目不存在: {0}")]
    ItemNotFound(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 编排错误 (上层映射为 500 等价)
    // ==========================================
    /// 集成分析任一阶段失败,整次运行失败
    #[error(transparent)]
    OrchestrationFailure(#[from] OrchestrationError),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("协作方访问失败: {0}")]
    ProviderFailure(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ProviderError 转换
// 目的: 将协作方层的技术错误转换为用户友好的业务错误
// ==========================================
impl From<ProviderError> for AnalysisError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound { entity, id } => {
                if entity == "Item" {
                    AnalysisError::ItemNotFound(id)
                } else {
                    AnalysisError::ProviderFailure(format!("{}(id={})不存在", entity, id))
                }
            }
            ProviderError::Unavailable(msg) => AnalysisError::ProviderFailure(msg),
            ProviderError::ValidationError(msg) => AnalysisError::InvalidInput(msg),
            ProviderError::Other(err) => AnalysisError::Other(err),
        }
    }
}

/// Result 类型别名
pub type AnalysisApiResult<T> = Result<T, AnalysisError>;
