// ==========================================
// 图书零售库存决策支持系统 - API 层
// ==========================================
// 职责: 面向进程内调用方的类型化接口与错误转换
// 说明: REST/调度等外层由排除在外的服务层承担
// ==========================================

pub mod analysis_api;
pub mod error;
pub mod inventory_api;

pub use analysis_api::AnalysisApi;
pub use error::{AnalysisApiResult, AnalysisError};
pub use inventory_api::{DisposalRecommendation, InventoryAnalysisApi};
