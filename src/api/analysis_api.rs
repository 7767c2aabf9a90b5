// ==========================================
// 图书零售库存决策支持系统 - 集成分析 API
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 7. Analysis Orchestrator / 11. 对外接口
// 职责: 集成分析入口 (顺序/并行) 与独立采购优化入口
// ==========================================

use crate::api::error::AnalysisApiResult;
use crate::config::AnalysisConfig;
use crate::domain::optimization::{OptimizationConstraints, OptimizationResult, OrderCandidate};
use crate::engine::optimizer::OrderOptimizer;
use crate::engine::orchestrator::{AnalysisOrchestrator, AnalysisRequest, IntegratedResult};
use crate::perf::PerfGuard;
use std::sync::Arc;

// ==========================================
// AnalysisApi - 集成分析 API
// ==========================================
pub struct AnalysisApi {
    orchestrator: Arc<AnalysisOrchestrator>,
    optimizer: OrderOptimizer,
    config: Arc<AnalysisConfig>,
}

impl AnalysisApi {
    /// 创建新的集成分析 API
    pub fn new(orchestrator: Arc<AnalysisOrchestrator>, config: Arc<AnalysisConfig>) -> Self {
        Self {
            orchestrator,
            optimizer: OrderOptimizer::new(),
            config,
        }
    }

    /// 集成分析 (顺序路径)
    ///
    /// 调用方需要直接拿到最终结果时的缺省入口
    pub async fn run_integrated(
        &self,
        request: &AnalysisRequest,
    ) -> AnalysisApiResult<Arc<IntegratedResult>> {
        let _perf = PerfGuard::new("run_integrated");
        Ok(self.orchestrator.run(request).await?)
    }

    /// 集成分析 (并行路径)
    ///
    /// 独立子分析扇出到工作池,扇入后执行优化阶段。
    /// 未提供超时控制: 调用方如有需要自行包装本 future。
    pub async fn run_integrated_parallel(
        &self,
        request: &AnalysisRequest,
    ) -> AnalysisApiResult<Arc<IntegratedResult>> {
        let _perf = PerfGuard::new("run_integrated_parallel");
        Ok(self.orchestrator.run_parallel(request).await?)
    }

    /// 独立采购优化 (调用方自备候选集)
    ///
    /// # 参数
    /// - candidates: 采购候选列表
    /// - constraints: 约束覆盖 (None 取配置缺省)
    pub async fn optimize_orders(
        &self,
        candidates: Vec<OrderCandidate>,
        constraints: Option<OptimizationConstraints>,
    ) -> AnalysisApiResult<OptimizationResult> {
        let _perf = PerfGuard::new("optimize_orders");
        let constraints = constraints.unwrap_or_else(|| self.config.default_constraints.clone());
        Ok(self.optimizer.optimize(candidates, &constraints))
    }
}
