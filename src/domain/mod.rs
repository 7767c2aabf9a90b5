// ==========================================
// 图书零售库存决策支持系统 - 领域层
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 1. 数据模型
// 职责: 实体与类型定义,不含业务规则
// ==========================================

pub mod classification;
pub mod forecast;
pub mod item;
pub mod optimization;
pub mod policy;
pub mod types;

pub use classification::{turnover_speed, ClassificationMatrix, ItemClassification};
pub use forecast::{DemandForecast, ForecastAccuracy};
pub use item::{first_of_month, trailing_window, DemandObservation, InventorySnapshot, ItemMaster};
pub use optimization::{
    ConstraintViolation, OptimizationConstraints, OptimizationResult, OrderCandidate,
};
pub use policy::{StockAssessment, StockPolicy};
pub use types::{
    AbcClass, AnalysisPhase, DisposalStrategy, ForecastAlgorithm, LifecycleStage, PriorityFocus,
    ReportType, StockStatus, TurnoverSpeed, XyzClass,
};
