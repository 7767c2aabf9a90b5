// ==========================================
// 图书零售库存决策支持系统 - 核心库
// ==========================================
// 依据: Inventory_DSS_Master_Spec.md - 系统宪法
// 技术栈: Rust + Tokio
// 系统定位: 库存决策支持引擎 (进程内被服务层调用)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 协作方接口层 - 外部数据访问
pub mod provider;

// 引擎层 - 分析规则
pub mod engine;

// 配置层 - 只读分析配置
pub mod config;

// 缓存层 - 分析结果缓存
pub mod cache;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AbcClass, AnalysisPhase, DisposalStrategy, ForecastAlgorithm, LifecycleStage, PriorityFocus,
    ReportType, StockStatus, TurnoverSpeed, XyzClass,
};

// 领域实体
pub use domain::{
    ClassificationMatrix, DemandForecast, DemandObservation, ForecastAccuracy,
    InventorySnapshot, ItemClassification, ItemMaster, OptimizationConstraints,
    OptimizationResult, OrderCandidate, StockAssessment, StockPolicy,
};

// 引擎
pub use engine::{
    AnalysisOrchestrator, AnalysisRequest, AnalysisWorkerPool, DemandClassifier, ForecastEngine,
    IntegratedResult, OrderOptimizer, StockPolicyCalculator,
};

// 协作方
pub use provider::{
    AnalysisProviders, CatalogProvider, DemandHistoryProvider, InventoryProvider, ProviderError,
};

// 配置
pub use config::AnalysisConfig;

// API
pub use api::{AnalysisApi, AnalysisError, InventoryAnalysisApi};

// ==========================================
// 系统常量
// ==========================================

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
