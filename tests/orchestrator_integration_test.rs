// ==========================================
// AnalysisOrchestrator 集成测试
// ==========================================
// 测试目标: 验证四阶段编排、并行扇出/扇入、缓存短路与失败传播
// 覆盖范围: 顺序/并行一致性、TTL 缓存、单品目容错、工作池停机
// ==========================================

mod test_helpers;

use async_trait::async_trait;
use retail_inventory_dss::config::AnalysisConfig;
use retail_inventory_dss::domain::item::ItemMaster;
use retail_inventory_dss::domain::types::{AnalysisPhase, ReportType, StockStatus};
use retail_inventory_dss::engine::{AnalysisOrchestrator, AnalysisRequest, AnalysisWorkerPool};
use retail_inventory_dss::provider::{
    AnalysisProviders, CatalogProvider, InMemoryCatalog, InMemoryDemandHistory, InMemoryInventory,
    ProviderError, ProviderResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use test_helpers::*;

// ==========================================
// 测试夹具
// ==========================================

fn as_of() -> chrono::NaiveDate {
    date(2026, 7, 15)
}

/// 标准夹具: 三个形态各异的品目
///
/// - ISBN-001: 平稳热销 (现货充足)
/// - ISBN-002: 新书低现货 (应触发 REORDER_NEEDED)
/// - ISBN-003: 偶发需求老书 (Z 类)
fn build_catalog_data() -> (
    Vec<ItemMaster>,
    InMemoryDemandHistory,
    InMemoryInventory,
) {
    let items = vec![
        create_test_item("ISBN-001", 45.0, date(2024, 5, 1)),
        create_test_item("ISBN-002", 88.0, date(2025, 9, 1)),
        create_test_item("ISBN-003", 32.0, date(2019, 3, 1)),
    ];

    let mut demand = InMemoryDemandHistory::new();
    demand.load_series("ISBN-001", constant_history("ISBN-001", as_of(), 12, 20));
    demand.load_series("ISBN-002", constant_history("ISBN-002", as_of(), 6, 10));
    demand.load_series(
        "ISBN-003",
        history_from_quantities("ISBN-003", as_of(), &[0, 0, 120, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    );

    let inventory = InMemoryInventory::new(vec![
        create_test_snapshot("ISBN-001", 80, 60, Some(date(2026, 7, 10))),
        create_test_snapshot("ISBN-002", 2, 1, Some(date(2026, 7, 12))),
        create_test_snapshot("ISBN-003", 30, 10, Some(date(2025, 6, 1))),
    ]);

    (items, demand, inventory)
}

fn build_providers() -> AnalysisProviders {
    let (items, demand, inventory) = build_catalog_data();
    AnalysisProviders::new(
        Arc::new(InMemoryCatalog::new(items)),
        Arc::new(demand),
        Arc::new(inventory),
    )
}

fn full_request() -> AnalysisRequest {
    AnalysisRequest {
        as_of: as_of(),
        report_type: ReportType::FullAnalysis,
        include_forecast: true,
        include_optimization: true,
        horizon_months: 1,
        constraints: None,
        item_ids: None,
    }
}

// ==========================================
// 测试用例 1: 顺序路径
// ==========================================

#[tokio::test]
async fn test_sync_run_all_phases() {
    let orchestrator = AnalysisOrchestrator::new(
        build_providers(),
        Arc::new(AnalysisConfig::default()),
    );

    let result = orchestrator.run(&full_request()).await.expect("集成分析应成功");

    // 三个品目全部分类
    assert_eq!(result.classifications.len(), 3);
    // 每品目 5 条预测 (四算法 + 集成)
    assert_eq!(result.forecasts.len(), 15);
    assert!(result.forecasts.iter().all(|f| f.predicted_demand >= 1));

    // 策略评估与优化
    assert_eq!(result.assessments.len(), 3);
    let optimization = result.optimization.as_ref().expect("应有优化结果");
    assert!(optimization
        .selected
        .iter()
        .any(|c| c.item_id == "ISBN-002"));
    assert!(optimization.total_cost <= 50_000.0);

    // 新书低现货应为 REORDER_NEEDED
    let assessment = result
        .assessments
        .iter()
        .find(|a| a.policy.item_id == "ISBN-002")
        .expect("ISBN-002 应有策略评估");
    assert_eq!(assessment.status, StockStatus::ReorderNeeded);

    // 四个阶段按序计时
    let phases: Vec<AnalysisPhase> = result.phase_timings.iter().map(|t| t.phase).collect();
    assert_eq!(
        phases,
        vec![
            AnalysisPhase::BaseAggregation,
            AnalysisPhase::Classification,
            AnalysisPhase::Forecasting,
            AnalysisPhase::Optimization,
        ]
    );
}

#[tokio::test]
async fn test_dashboard_run_skips_optional_phases() {
    let orchestrator = AnalysisOrchestrator::new(
        build_providers(),
        Arc::new(AnalysisConfig::default()),
    );

    let request = AnalysisRequest {
        report_type: ReportType::Dashboard,
        include_forecast: false,
        include_optimization: false,
        ..full_request()
    };
    let result = orchestrator.run(&request).await.expect("看板分析应成功");

    assert_eq!(result.classifications.len(), 3);
    assert!(result.forecasts.is_empty());
    assert!(result.optimization.is_none());
    assert!(result.assessments.is_empty());
    assert_eq!(result.phase_timings.len(), 2);
}

// ==========================================
// 测试用例 2: 并行路径与顺序路径一致
// ==========================================

#[tokio::test]
async fn test_parallel_run_matches_sync_run() {
    // 独立的两个编排器,避免缓存互相干扰
    let sync_orchestrator = AnalysisOrchestrator::new(
        build_providers(),
        Arc::new(AnalysisConfig::default()),
    );
    let parallel_orchestrator = AnalysisOrchestrator::new(
        build_providers(),
        Arc::new(AnalysisConfig::default()),
    );

    let request = full_request();
    let sync_result = sync_orchestrator.run(&request).await.expect("顺序路径应成功");
    let parallel_result = parallel_orchestrator
        .run_parallel(&request)
        .await
        .expect("并行路径应成功");

    // 同输入同结果 (运行标识与耗时除外)
    assert_eq!(sync_result.classifications, parallel_result.classifications);
    assert_eq!(sync_result.forecasts.len(), parallel_result.forecasts.len());

    let sync_opt = sync_result.optimization.as_ref().unwrap();
    let parallel_opt = parallel_result.optimization.as_ref().unwrap();
    assert_eq!(sync_opt.item_count, parallel_opt.item_count);
    assert_eq!(sync_opt.total_cost, parallel_opt.total_cost);
    assert_eq!(sync_opt.optimization_score, parallel_opt.optimization_score);
}

// ==========================================
// 测试用例 3: 缓存短路
// ==========================================

/// 统计 list_items 调用次数的目录包装
struct CountingCatalog {
    inner: InMemoryCatalog,
    list_calls: AtomicUsize,
}

#[async_trait]
impl CatalogProvider for CountingCatalog {
    async fn get_item(&self, item_id: &str) -> ProviderResult<ItemMaster> {
        self.inner.get_item(item_id).await
    }

    async fn list_items(&self) -> ProviderResult<Vec<ItemMaster>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_items().await
    }
}

#[tokio::test]
async fn test_cache_hit_short_circuits_recomputation() {
    let (items, demand, inventory) = build_catalog_data();
    let catalog = Arc::new(CountingCatalog {
        inner: InMemoryCatalog::new(items),
        list_calls: AtomicUsize::new(0),
    });
    let providers = AnalysisProviders::new(catalog.clone(), Arc::new(demand), Arc::new(inventory));
    let orchestrator =
        AnalysisOrchestrator::new(providers, Arc::new(AnalysisConfig::default()));

    let request = full_request();
    let first = orchestrator.run(&request).await.expect("首次运行应成功");
    assert_eq!(catalog.list_calls.load(Ordering::SeqCst), 1);

    // 第二次同指纹请求: 完全短路,不再访问协作方
    let second = orchestrator.run(&request).await.expect("二次运行应成功");
    assert_eq!(catalog.list_calls.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));

    // 并行路径同样被缓存短路
    let third = orchestrator
        .run_parallel(&request)
        .await
        .expect("并行运行应成功");
    assert_eq!(catalog.list_calls.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &third));
}

#[tokio::test]
async fn test_different_fingerprint_recomputes() {
    let orchestrator = AnalysisOrchestrator::new(
        build_providers(),
        Arc::new(AnalysisConfig::default()),
    );

    let first = orchestrator.run(&full_request()).await.unwrap();

    // 改变展望期 → 指纹不同 → 重新计算
    let request = AnalysisRequest {
        horizon_months: 3,
        ..full_request()
    };
    let second = orchestrator.run(&request).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

// ==========================================
// 测试用例 4: 失败传播
// ==========================================

/// 目录级失败的协作方
struct FailingCatalog;

#[async_trait]
impl CatalogProvider for FailingCatalog {
    async fn get_item(&self, _item_id: &str) -> ProviderResult<ItemMaster> {
        Err(ProviderError::Unavailable("目录服务不可达".to_string()))
    }

    async fn list_items(&self) -> ProviderResult<Vec<ItemMaster>> {
        Err(ProviderError::Unavailable("目录服务不可达".to_string()))
    }
}

#[tokio::test]
async fn test_phase_failure_aborts_whole_run() {
    let (_, demand, inventory) = build_catalog_data();
    let providers = AnalysisProviders::new(
        Arc::new(FailingCatalog),
        Arc::new(demand),
        Arc::new(inventory),
    );
    let orchestrator =
        AnalysisOrchestrator::new(providers, Arc::new(AnalysisConfig::default()));

    // 顺序路径: 基础聚合失败 → 整次运行失败,无部分结果
    let err = orchestrator
        .run(&full_request())
        .await
        .expect_err("目录失败应中止运行");
    assert_eq!(err.phase, AnalysisPhase::BaseAggregation);

    // 并行路径: 任一子任务失败 → 组合失败
    let err = orchestrator
        .run_parallel(&full_request())
        .await
        .expect_err("并行路径同样失败");
    assert!(matches!(
        err.phase,
        AnalysisPhase::BaseAggregation
            | AnalysisPhase::Classification
            | AnalysisPhase::Forecasting
    ));
}

#[tokio::test]
async fn test_per_item_failure_tolerated_in_batch() {
    // ISBN-003 缺少现货快照: 单品目失败仅跳过,整批继续
    let (items, demand, _) = build_catalog_data();
    let inventory = InMemoryInventory::new(vec![
        create_test_snapshot("ISBN-001", 80, 60, Some(date(2026, 7, 10))),
        create_test_snapshot("ISBN-002", 2, 1, Some(date(2026, 7, 12))),
    ]);
    let providers = AnalysisProviders::new(
        Arc::new(InMemoryCatalog::new(items)),
        Arc::new(demand),
        Arc::new(inventory),
    );
    let orchestrator =
        AnalysisOrchestrator::new(providers, Arc::new(AnalysisConfig::default()));

    let result = orchestrator.run(&full_request()).await.expect("整批应继续");
    assert_eq!(result.classifications.len(), 2);
    assert_eq!(result.assessments.len(), 2);
    assert!(result
        .assessments
        .iter()
        .all(|a| a.policy.item_id != "ISBN-003"));
}

// ==========================================
// 测试用例 5: 工作池
// ==========================================

#[tokio::test]
async fn test_worker_pool_executes_and_shuts_down_gracefully() {
    let pool = AnalysisWorkerPool::new(2, 4);

    let rx1 = pool.submit(async { 6 * 7 }).await.expect("提交应成功");
    let rx2 = pool.submit(async { "done" }).await.expect("提交应成功");
    assert_eq!(rx1.await.unwrap(), 42);
    assert_eq!(rx2.await.unwrap(), "done");

    // 停机后拒绝新提交
    pool.shutdown().await;
    assert!(pool.submit(async { 1 }).await.is_err());
}

// ==========================================
// 测试用例 6: 请求指纹归一化
// ==========================================

#[test]
fn test_request_fingerprint_normalizes_item_ids() {
    let base = full_request();

    let shuffled = AnalysisRequest {
        item_ids: Some(vec!["ISBN-002".to_string(), "ISBN-001".to_string()]),
        ..base.clone()
    };
    let sorted = AnalysisRequest {
        item_ids: Some(vec!["ISBN-001".to_string(), "ISBN-002".to_string()]),
        ..base.clone()
    };
    // 品目顺序不影响指纹
    assert_eq!(shuffled.fingerprint(), sorted.fingerprint());

    // 范围不同 → 指纹不同
    assert_ne!(base.fingerprint(), sorted.fingerprint());
}
