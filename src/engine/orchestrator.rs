// ==========================================
// 图书零售库存决策支持系统 - 分析编排器
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 7. Analysis Orchestrator
// 用途: 协调四大核心引擎的执行顺序与结果合并
// ==========================================
// 红线: 任一阶段失败则整次运行失败,不返回部分结果
// 缓存: 请求指纹命中则完全短路 (并行路径同样生效)
// ==========================================

use crate::cache::AnalysisCache;
use crate::config::AnalysisConfig;
use crate::domain::classification::ItemClassification;
use crate::domain::forecast::DemandForecast;
use crate::domain::item::{DemandObservation, InventorySnapshot, ItemMaster};
use crate::domain::optimization::{OptimizationConstraints, OptimizationResult, OrderCandidate};
use crate::domain::policy::StockAssessment;
use crate::domain::types::{AnalysisPhase, ReportType};
use crate::engine::classifier::DemandClassifier;
use crate::engine::forecast::ForecastEngine;
use crate::engine::metrics::{MetricsSink, OptionalMetricsSink};
use crate::engine::optimizer::OrderOptimizer;
use crate::engine::stock_policy::StockPolicyCalculator;
use crate::engine::worker_pool::AnalysisWorkerPool;
use crate::provider::AnalysisProviders;
use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 历史拉取窗口 (月): 覆盖全部统计窗口并留有余量
const HISTORY_FETCH_MONTHS: u32 = 24;

/// 工作池缺省规模
const POOL_WORKERS: usize = 4;
const POOL_QUEUE_CAPACITY: usize = 16;

// ==========================================
// OrchestrationError - 编排失败
// ==========================================

/// 集成分析失败 (携带失败阶段,供上层定位)
#[derive(Debug, Error)]
#[error("集成分析失败: phase={phase}, {message}")]
pub struct OrchestrationError {
    pub phase: AnalysisPhase,
    pub message: String,
}

impl OrchestrationError {
    pub fn new(phase: AnalysisPhase, message: impl Into<String>) -> Self {
        Self {
            phase,
            message: message.into(),
        }
    }
}

// ==========================================
// AnalysisRequest - 集成分析请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub as_of: NaiveDate,                            // 分析基准日期
    pub report_type: ReportType,                     // 报告类型 (决定缓存 TTL)
    pub include_forecast: bool,                      // 是否执行预测阶段
    pub include_optimization: bool,                  // 是否执行优化阶段
    pub horizon_months: u32,                         // 预测展望期 (月)
    pub constraints: Option<OptimizationConstraints>, // 优化约束覆盖 (None 取配置缺省)
    pub item_ids: Option<Vec<String>>,               // 品目范围 (None=全目录)
}

impl AnalysisRequest {
    /// 归一化请求指纹 (缓存键)
    ///
    /// 品目列表排序去重; serde_json 键序稳定,同语义请求产出同一指纹
    pub fn fingerprint(&self) -> String {
        let item_ids = self.item_ids.as_ref().map(|ids| {
            let mut ids = ids.clone();
            ids.sort();
            ids.dedup();
            ids
        });

        json!({
            "as_of": self.as_of,
            "report_type": self.report_type,
            "include_forecast": self.include_forecast,
            "include_optimization": self.include_optimization,
            "horizon_months": self.horizon_months,
            "constraints": self.constraints,
            "item_ids": item_ids,
        })
        .to_string()
    }

    /// 预测阶段是否需要执行 (优化阶段依赖预测口径的策略计算)
    fn forecast_needed(&self) -> bool {
        self.include_forecast || self.include_optimization
    }
}

// ==========================================
// PhaseTiming / IntegratedResult
// ==========================================

/// 单阶段耗时记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub phase: AnalysisPhase,
    pub elapsed_ms: u64,
}

/// 集成分析结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegratedResult {
    pub run_id: String,                            // 本次运行标识
    pub as_of: NaiveDate,                          // 分析基准日期
    pub report_type: ReportType,                   // 报告类型
    pub classifications: Vec<ItemClassification>,  // 分类阶段输出
    pub forecasts: Vec<DemandForecast>,            // 预测阶段输出 (未请求时为空)
    pub assessments: Vec<StockAssessment>,         // 策略评估 (优化阶段产出)
    pub optimization: Option<OptimizationResult>,  // 优化阶段输出
    pub phase_timings: Vec<PhaseTiming>,           // 阶段耗时
    pub computed_at: DateTime<Utc>,                // 计算完成时间
}

/// 基础聚合数据 (阶段一输出)
#[derive(Debug, Clone, Default)]
pub struct BaseAggregate {
    pub items: Vec<ItemMaster>,
    pub histories: HashMap<String, Vec<DemandObservation>>,
    pub snapshots: HashMap<String, InventorySnapshot>,
}

// ==========================================
// AnalysisOrchestrator - 分析编排器
// ==========================================
pub struct AnalysisOrchestrator {
    providers: AnalysisProviders,
    config: Arc<AnalysisConfig>,
    forecaster: ForecastEngine,
    classifier: DemandClassifier,
    policy_calculator: StockPolicyCalculator,
    optimizer: OrderOptimizer,
    cache: AnalysisCache<IntegratedResult>,
    metrics: OptionalMetricsSink,
    pool: AnalysisWorkerPool,
}

impl AnalysisOrchestrator {
    /// 创建新的编排器实例 (须在 Tokio 运行时内调用: 内部工作池会立即启动)
    ///
    /// # 参数
    /// - providers: 数据协作方集合
    /// - config: 只读分析配置
    pub fn new(providers: AnalysisProviders, config: Arc<AnalysisConfig>) -> Self {
        Self {
            forecaster: ForecastEngine::new(config.clone()),
            classifier: DemandClassifier::new(config.clone()),
            policy_calculator: StockPolicyCalculator::new(config.clone()),
            optimizer: OrderOptimizer::new(),
            cache: AnalysisCache::new(),
            metrics: OptionalMetricsSink::none(),
            pool: AnalysisWorkerPool::new(POOL_WORKERS, POOL_QUEUE_CAPACITY),
            providers,
            config,
        }
    }

    /// 配置可选的指标接收方
    pub fn with_metrics(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics = OptionalMetricsSink::with_sink(sink);
        self
    }

    /// 停机: 关闭内部工作池 (等待在途任务)
    pub async fn shutdown(&self) {
        self.pool.shutdown().await;
    }

    // ==========================================
    // 同步路径 (顺序执行)
    // ==========================================

    /// 执行完整集成分析 (顺序)
    ///
    /// 阶段: 基础聚合 → 分类 → (可选)预测 → (可选)优化
    /// 每阶段记录墙钟耗时; 任一阶段失败整次运行失败
    pub async fn run(
        &self,
        request: &AnalysisRequest,
    ) -> Result<Arc<IntegratedResult>, OrchestrationError> {
        let key = request.fingerprint();
        if let Some(cached) = self.cache.get(&key) {
            self.metrics
                .record_cache_lookup(request.report_type.as_str(), true);
            info!(report_type = %request.report_type, "缓存命中,短路返回");
            return Ok(cached);
        }
        self.metrics
            .record_cache_lookup(request.report_type.as_str(), false);

        info!(
            as_of = %request.as_of,
            report_type = %request.report_type,
            include_forecast = request.include_forecast,
            include_optimization = request.include_optimization,
            "开始执行集成分析 (顺序)"
        );

        let mut timings = Vec::new();

        // ==========================================
        // 阶段1: 基础数据聚合
        // ==========================================
        debug!("阶段1: 基础数据聚合");
        let started = Instant::now();
        let base = Self::aggregate_base(
            self.providers.clone(),
            request.as_of,
            request.item_ids.clone(),
        )
        .await?;
        self.push_timing(&mut timings, AnalysisPhase::BaseAggregation, started);

        // ==========================================
        // 阶段2: ABC/XYZ 分类
        // ==========================================
        debug!("阶段2: ABC/XYZ 分类");
        let started = Instant::now();
        let pairs = base_pairs(&base);
        let classifications = self.classifier.classify(&pairs, request.as_of);
        self.push_timing(&mut timings, AnalysisPhase::Classification, started);

        info!(classified_count = classifications.len(), "分类阶段完成");

        // ==========================================
        // 阶段3: 需求预测 (按需)
        // ==========================================
        let forecasts = if request.forecast_needed() {
            debug!("阶段3: 需求预测");
            let started = Instant::now();
            let forecasts =
                self.forecast_all(&base, request.as_of, request.horizon_months);
            self.push_timing(&mut timings, AnalysisPhase::Forecasting, started);
            info!(forecasts_count = forecasts.len(), "预测阶段完成");
            forecasts
        } else {
            Vec::new()
        };

        // ==========================================
        // 阶段4: 采购优化 (按需)
        // ==========================================
        let (assessments, optimization) = if request.include_optimization {
            debug!("阶段4: 采购优化");
            let started = Instant::now();
            let (assessments, optimization) = self.optimize_phase(&base, request);
            self.push_timing(&mut timings, AnalysisPhase::Optimization, started);
            info!(
                selected_count = optimization.item_count,
                optimization_score = optimization.optimization_score,
                "优化阶段完成"
            );
            (assessments, Some(optimization))
        } else {
            (Vec::new(), None)
        };

        let result = IntegratedResult {
            run_id: Uuid::new_v4().to_string(),
            as_of: request.as_of,
            report_type: request.report_type,
            classifications,
            forecasts,
            assessments,
            optimization,
            phase_timings: timings,
            computed_at: Utc::now(),
        };

        let ttl = self.config.cache_ttl(request.report_type);
        Ok(self.cache.put(key, result, ttl))
    }

    // ==========================================
    // 并行路径 (扇出/扇入)
    // ==========================================

    /// 执行完整集成分析 (并行)
    ///
    /// 基础聚合、分类、预测作为独立任务投递到工作池并发执行
    /// (各自独立拉取数据); 优化阶段在三者全部完成后启动。
    /// 任一子任务失败则整个组合失败。
    pub async fn run_parallel(
        &self,
        request: &AnalysisRequest,
    ) -> Result<Arc<IntegratedResult>, OrchestrationError> {
        let key = request.fingerprint();
        if let Some(cached) = self.cache.get(&key) {
            self.metrics
                .record_cache_lookup(request.report_type.as_str(), true);
            info!(report_type = %request.report_type, "缓存命中,短路返回 (并行路径)");
            return Ok(cached);
        }
        self.metrics
            .record_cache_lookup(request.report_type.as_str(), false);

        info!(
            as_of = %request.as_of,
            report_type = %request.report_type,
            "开始执行集成分析 (并行)"
        );

        let as_of = request.as_of;
        let item_ids = request.item_ids.clone();
        let horizon = request.horizon_months;

        // ===== 扇出: 基础聚合 =====
        let providers = self.providers.clone();
        let scope = item_ids.clone();
        let base_rx = self
            .pool
            .submit(async move {
                let started = Instant::now();
                let base = Self::aggregate_base(providers, as_of, scope).await?;
                Ok::<_, OrchestrationError>((base, elapsed_ms(started)))
            })
            .await
            .map_err(|e| OrchestrationError::new(AnalysisPhase::BaseAggregation, e.to_string()))?;

        // ===== 扇出: 分类 (独立拉取数据) =====
        let providers = self.providers.clone();
        let config = self.config.clone();
        let scope = item_ids.clone();
        let classify_rx = self
            .pool
            .submit(async move {
                let started = Instant::now();
                let base = Self::aggregate_base(providers, as_of, scope).await?;
                let classifier = DemandClassifier::new(config);
                let pairs = base_pairs(&base);
                let classifications = classifier.classify(&pairs, as_of);
                Ok::<_, OrchestrationError>((classifications, elapsed_ms(started)))
            })
            .await
            .map_err(|e| OrchestrationError::new(AnalysisPhase::Classification, e.to_string()))?;

        // ===== 扇出: 预测 (按需, 独立拉取数据) =====
        let forecast_rx = if request.forecast_needed() {
            let providers = self.providers.clone();
            let config = self.config.clone();
            let scope = item_ids.clone();
            let rx = self
                .pool
                .submit(async move {
                    let started = Instant::now();
                    let base = Self::aggregate_base(providers, as_of, scope).await?;
                    let forecaster = ForecastEngine::new(config);
                    let mut forecasts = Vec::new();
                    for item in &base.items {
                        let history = base
                            .histories
                            .get(&item.item_id)
                            .map(Vec::as_slice)
                            .unwrap_or(&[]);
                        forecasts.extend(forecaster.forecast(item, history, as_of, horizon));
                    }
                    Ok::<_, OrchestrationError>((forecasts, elapsed_ms(started)))
                })
                .await
                .map_err(|e| OrchestrationError::new(AnalysisPhase::Forecasting, e.to_string()))?;
            Some(rx)
        } else {
            None
        };

        // ===== 扇入: 等待全部子任务 =====
        let (base, base_elapsed) = join_task(base_rx, AnalysisPhase::BaseAggregation).await?;
        let (classifications, classify_elapsed) =
            join_task(classify_rx, AnalysisPhase::Classification).await?;
        let (forecasts, forecast_elapsed) = match forecast_rx {
            Some(rx) => {
                let (forecasts, elapsed) = join_task(rx, AnalysisPhase::Forecasting).await?;
                (forecasts, Some(elapsed))
            }
            None => (Vec::new(), None),
        };

        let mut timings = vec![
            PhaseTiming {
                phase: AnalysisPhase::BaseAggregation,
                elapsed_ms: base_elapsed,
            },
            PhaseTiming {
                phase: AnalysisPhase::Classification,
                elapsed_ms: classify_elapsed,
            },
        ];
        self.metrics
            .record_phase(AnalysisPhase::BaseAggregation.as_str(), base_elapsed);
        self.metrics
            .record_phase(AnalysisPhase::Classification.as_str(), classify_elapsed);
        if let Some(elapsed) = forecast_elapsed {
            timings.push(PhaseTiming {
                phase: AnalysisPhase::Forecasting,
                elapsed_ms: elapsed,
            });
            self.metrics
                .record_phase(AnalysisPhase::Forecasting.as_str(), elapsed);
        }

        // ===== 优化阶段: 必须在扇入之后 =====
        let (assessments, optimization) = if request.include_optimization {
            let started = Instant::now();
            let (assessments, optimization) = self.optimize_phase(&base, request);
            self.push_timing(&mut timings, AnalysisPhase::Optimization, started);
            (assessments, Some(optimization))
        } else {
            (Vec::new(), None)
        };

        let result = IntegratedResult {
            run_id: Uuid::new_v4().to_string(),
            as_of: request.as_of,
            report_type: request.report_type,
            classifications,
            forecasts,
            assessments,
            optimization,
            phase_timings: timings,
            computed_at: Utc::now(),
        };

        let ttl = self.config.cache_ttl(request.report_type);
        Ok(self.cache.put(key, result, ttl))
    }

    // ==========================================
    // 阶段实现
    // ==========================================

    /// 阶段1: 基础数据聚合
    ///
    /// 拉取品目主数据、历史需求与现货快照。
    /// 单品目失败仅告警并跳过,不中断整批 (批量容错);
    /// 目录级失败则整个阶段失败。
    async fn aggregate_base(
        providers: AnalysisProviders,
        as_of: NaiveDate,
        item_ids: Option<Vec<String>>,
    ) -> Result<BaseAggregate, OrchestrationError> {
        let items: Vec<ItemMaster> = match item_ids {
            Some(ids) => {
                let mut items = Vec::with_capacity(ids.len());
                for id in ids {
                    match providers.catalog.get_item(&id).await {
                        Ok(item) => items.push(item),
                        Err(e) => {
                            warn!(item_id = %id, error = %e, "品目拉取失败,跳过");
                        }
                    }
                }
                items
            }
            None => providers.catalog.list_items().await.map_err(|e| {
                OrchestrationError::new(AnalysisPhase::BaseAggregation, e.to_string())
            })?,
        };

        let from = as_of
            .checked_sub_months(Months::new(HISTORY_FETCH_MONTHS))
            .unwrap_or(as_of);

        let mut aggregate = BaseAggregate::default();
        for item in items {
            let history = match providers
                .demand
                .monthly_demand(&item.item_id, from, as_of)
                .await
            {
                Ok(history) => history,
                Err(e) => {
                    warn!(item_id = %item.item_id, error = %e, "历史需求拉取失败,跳过品目");
                    continue;
                }
            };
            let snapshot = match providers.inventory.snapshot(&item.item_id).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(item_id = %item.item_id, error = %e, "现货快照拉取失败,跳过品目");
                    continue;
                }
            };

            aggregate.histories.insert(item.item_id.clone(), history);
            aggregate.snapshots.insert(item.item_id.clone(), snapshot);
            aggregate.items.push(item);
        }

        debug!(items_count = aggregate.items.len(), "基础数据聚合完成");
        Ok(aggregate)
    }

    /// 阶段3: 全品目预测
    fn forecast_all(
        &self,
        base: &BaseAggregate,
        as_of: NaiveDate,
        horizon_months: u32,
    ) -> Vec<DemandForecast> {
        let mut forecasts = Vec::new();
        for item in &base.items {
            let history = base
                .histories
                .get(&item.item_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            forecasts.extend(self.forecaster.forecast(item, history, as_of, horizon_months));
        }
        forecasts
    }

    /// 阶段4: 策略评估 + 采购优化
    ///
    /// 对每个品目派生库存策略,将可订货候选送入优化器
    fn optimize_phase(
        &self,
        base: &BaseAggregate,
        request: &AnalysisRequest,
    ) -> (Vec<StockAssessment>, OptimizationResult) {
        let mut assessments = Vec::with_capacity(base.items.len());
        let mut candidates = Vec::new();

        for item in &base.items {
            let Some(snapshot) = base.snapshots.get(&item.item_id) else {
                continue;
            };
            let history = base
                .histories
                .get(&item.item_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            let assessment =
                self.policy_calculator
                    .calculate(item, history, snapshot, None, request.as_of);
            if assessment.is_order_candidate() {
                candidates.push(OrderCandidate::from_assessment(
                    item,
                    &assessment,
                    self.config.cost_ratio,
                ));
            }
            assessments.push(assessment);
        }

        let constraints = request
            .constraints
            .clone()
            .unwrap_or_else(|| self.config.default_constraints.clone());
        let optimization = self.optimizer.optimize(candidates, &constraints);

        (assessments, optimization)
    }

    // ==========================================
    // 计时辅助
    // ==========================================

    fn push_timing(
        &self,
        timings: &mut Vec<PhaseTiming>,
        phase: AnalysisPhase,
        started: Instant,
    ) {
        let elapsed = elapsed_ms(started);
        self.metrics.record_phase(phase.as_str(), elapsed);
        timings.push(PhaseTiming {
            phase,
            elapsed_ms: elapsed,
        });
    }
}

/// 聚合数据转为分类器输入 (保持品目顺序)
fn base_pairs(base: &BaseAggregate) -> Vec<(ItemMaster, Vec<DemandObservation>)> {
    base.items
        .iter()
        .map(|item| {
            (
                item.clone(),
                base.histories.get(&item.item_id).cloned().unwrap_or_default(),
            )
        })
        .collect()
}

/// 等待子任务结果 (worker panic → 该阶段失败)
async fn join_task<T>(
    rx: tokio::sync::oneshot::Receiver<Result<T, OrchestrationError>>,
    phase: AnalysisPhase,
) -> Result<T, OrchestrationError> {
    rx.await
        .map_err(|_| OrchestrationError::new(phase, "子任务异常终止"))?
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
