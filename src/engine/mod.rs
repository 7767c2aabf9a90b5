// ==========================================
// 图书零售库存决策支持系统 - 引擎层
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 2. 组件拆分
// ==========================================
// 职责: 实现分析规则引擎,不做持久化
// 红线: Engine 只消费协作方数据,所有判定必须可解释
// ==========================================

pub mod classifier;
pub mod forecast;
pub mod metrics;
pub mod optimizer;
pub mod orchestrator;
pub mod stock_policy;
pub mod worker_pool;

// 重导出核心引擎
pub use classifier::{coefficient_of_variation, xyz_class, DemandClassifier};
pub use forecast::ForecastEngine;
pub use metrics::{MetricsSink, NoOpMetricsSink, OptionalMetricsSink};
pub use optimizer::OrderOptimizer;
pub use orchestrator::{
    AnalysisOrchestrator, AnalysisRequest, BaseAggregate, IntegratedResult, OrchestrationError,
    PhaseTiming,
};
pub use stock_policy::{classify_stock_status, obsolescence_factor, StockPolicyCalculator};
pub use worker_pool::{AnalysisWorkerPool, PoolClosedError};
