// ==========================================
// 图书零售库存决策支持系统 - 品目分析 API
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 11. 对外接口
// 职责: 单品目预测/策略评估 + 目录级分类与处置建议
// 红线: 批量接口单品目失败仅告警跳过,不中断整批
// ==========================================

use crate::api::error::{AnalysisApiResult, AnalysisError};
use crate::config::AnalysisConfig;
use crate::domain::classification::{ClassificationMatrix, ItemClassification};
use crate::domain::forecast::{DemandForecast, ForecastAccuracy};
use crate::domain::item::{first_of_month, DemandObservation, ItemMaster};
use crate::domain::policy::StockAssessment;
use crate::domain::types::{DisposalStrategy, ForecastAlgorithm, LifecycleStage, TurnoverSpeed};
use crate::engine::classifier::DemandClassifier;
use crate::engine::forecast::ForecastEngine;
use crate::engine::stock_policy::StockPolicyCalculator;
use crate::perf::PerfGuard;
use crate::provider::AnalysisProviders;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// 历史拉取窗口 (月)
const HISTORY_FETCH_MONTHS: u32 = 24;

// ==========================================
// DisposalRecommendation - 处置建议
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisposalRecommendation {
    pub item_id: String,
    pub title: String,
    pub turnover: TurnoverSpeed,
    pub lifecycle: LifecycleStage,
    pub days_since_last_sale: Option<i64>,
    pub strategy: DisposalStrategy,
}

// ==========================================
// InventoryAnalysisApi - 品目分析 API
// ==========================================
pub struct InventoryAnalysisApi {
    providers: AnalysisProviders,
    config: Arc<AnalysisConfig>,
    forecaster: ForecastEngine,
    classifier: DemandClassifier,
    policy_calculator: StockPolicyCalculator,
}

impl InventoryAnalysisApi {
    /// 创建新的品目分析 API
    pub fn new(providers: AnalysisProviders, config: Arc<AnalysisConfig>) -> Self {
        Self {
            forecaster: ForecastEngine::new(config.clone()),
            classifier: DemandClassifier::new(config.clone()),
            policy_calculator: StockPolicyCalculator::new(config.clone()),
            providers,
            config,
        }
    }

    // ==========================================
    // 单品目接口
    // ==========================================

    /// 单品目全算法需求预测
    ///
    /// # 错误
    /// - ItemNotFound: 未知品目,不重试直接上抛
    pub async fn forecast_item(
        &self,
        item_id: &str,
        as_of: NaiveDate,
        horizon_months: u32,
    ) -> AnalysisApiResult<Vec<DemandForecast>> {
        let _perf = PerfGuard::new("forecast_item");

        let item = self.providers.catalog.get_item(item_id).await?;
        let history = self.fetch_history(item_id, as_of).await?;
        Ok(self.forecaster.forecast(&item, &history, as_of, horizon_months))
    }

    /// 单品目预测回测精度
    ///
    /// 将调用方持有的历史预测与该品目同月实际销量比对
    pub async fn forecast_accuracy(
        &self,
        item_id: &str,
        algorithm: ForecastAlgorithm,
        past_forecasts: &[DemandForecast],
        from: NaiveDate,
        to: NaiveDate,
    ) -> AnalysisApiResult<ForecastAccuracy> {
        let _perf = PerfGuard::new("forecast_accuracy");

        if from > to {
            return Err(AnalysisError::InvalidInput(format!(
                "评估窗口无效: from={} > to={}",
                from, to
            )));
        }

        // 校验品目存在 (未知品目上抛 NotFound)
        self.providers.catalog.get_item(item_id).await?;

        let actuals = self
            .providers
            .demand
            .monthly_demand(item_id, first_of_month(from), to)
            .await?;

        Ok(self
            .forecaster
            .evaluate_accuracy(algorithm, past_forecasts, &actuals, from, to))
    }

    /// 单品目库存策略评估 (EOQ/安全库存/再订货点/状态)
    pub async fn stock_assessment(
        &self,
        item_id: &str,
        as_of: NaiveDate,
    ) -> AnalysisApiResult<StockAssessment> {
        let _perf = PerfGuard::new("stock_assessment");

        let item = self.providers.catalog.get_item(item_id).await?;
        let history = self.fetch_history(item_id, as_of).await?;
        let snapshot = self.providers.inventory.snapshot(item_id).await?;

        Ok(self
            .policy_calculator
            .calculate(&item, &history, &snapshot, None, as_of))
    }

    // ==========================================
    // 目录级接口
    // ==========================================

    /// 全目录 ABC/XYZ 分类
    pub async fn classify_catalog(
        &self,
        as_of: NaiveDate,
    ) -> AnalysisApiResult<Vec<ItemClassification>> {
        let _perf = PerfGuard::new("classify_catalog");

        let pairs = self.catalog_histories(as_of).await?;
        Ok(self.classifier.classify(&pairs, as_of))
    }

    /// 全目录分类的 9 宫格分组视图 (ABC×XYZ)
    pub async fn classification_matrix(
        &self,
        as_of: NaiveDate,
    ) -> AnalysisApiResult<ClassificationMatrix> {
        let classifications = self.classify_catalog(as_of).await?;
        Ok(ClassificationMatrix::from_classifications(&classifications))
    }

    /// 慢销/滞销盘点: 给出处置策略建议
    pub async fn disposal_review(
        &self,
        as_of: NaiveDate,
    ) -> AnalysisApiResult<Vec<DisposalRecommendation>> {
        let _perf = PerfGuard::new("disposal_review");

        let pairs = self.catalog_histories(as_of).await?;
        let items_by_id: HashMap<String, ItemMaster> = pairs
            .iter()
            .map(|(item, _)| (item.item_id.clone(), item.clone()))
            .collect();
        let classifications = self.classifier.classify(&pairs, as_of);

        let mut recommendations = Vec::new();
        for classification in &classifications {
            let turnover = classification.turnover_speed();
            if matches!(turnover, TurnoverSpeed::Fast | TurnoverSpeed::Medium) {
                continue;
            }
            let Some(item) = items_by_id.get(&classification.item_id) else {
                continue;
            };

            // 单品目快照失败仅告警跳过
            let snapshot = match self.providers.inventory.snapshot(&item.item_id).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(item_id = %item.item_id, error = %e, "现货快照拉取失败,跳过处置评估");
                    continue;
                }
            };

            let lifecycle = item.lifecycle_stage(as_of);
            let days_since_last_sale = snapshot.days_since_last_sale(as_of);
            if let Some(strategy) =
                self.classifier
                    .recommend_disposal(turnover, days_since_last_sale, lifecycle)
            {
                recommendations.push(DisposalRecommendation {
                    item_id: item.item_id.clone(),
                    title: item.title.clone(),
                    turnover,
                    lifecycle,
                    days_since_last_sale,
                    strategy,
                });
            }
        }

        Ok(recommendations)
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    /// 拉取单品目历史需求 (统一窗口)
    async fn fetch_history(
        &self,
        item_id: &str,
        as_of: NaiveDate,
    ) -> AnalysisApiResult<Vec<DemandObservation>> {
        let from = as_of
            .checked_sub_months(Months::new(HISTORY_FETCH_MONTHS))
            .unwrap_or(as_of);
        Ok(self
            .providers
            .demand
            .monthly_demand(item_id, from, as_of)
            .await?)
    }

    /// 拉取全目录 (品目, 历史) 对; 单品目失败告警跳过
    async fn catalog_histories(
        &self,
        as_of: NaiveDate,
    ) -> AnalysisApiResult<Vec<(ItemMaster, Vec<DemandObservation>)>> {
        let items = self.providers.catalog.list_items().await?;

        let mut pairs = Vec::with_capacity(items.len());
        for item in items {
            match self.fetch_history(&item.item_id, as_of).await {
                Ok(history) => pairs.push((item, history)),
                Err(e) => {
                    warn!(item_id = %item.item_id, error = %e, "历史需求拉取失败,跳过品目");
                }
            }
        }
        Ok(pairs)
    }

    /// 当前最低销售额阈值 (供调用方展示)
    pub fn min_sales_threshold(&self) -> f64 {
        self.config.min_sales_threshold
    }
}
