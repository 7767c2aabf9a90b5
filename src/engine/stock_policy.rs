// ==========================================
// 图书零售库存决策支持系统 - 库存策略计算引擎
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 5. Stock Policy Calculator
// 红线: 需求均值取自真实历史聚合,不使用合成数据
// ==========================================
// 职责: EOQ / 安全库存 / 再订货点 / 最优库存水平 + 现货状态判定
// 输入: 品目主数据 + 月度需求序列 + 现货快照 + 趋势系数
// 输出: StockAssessment (策略 + 状态 + 建议订货)
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::item::{trailing_window, DemandObservation, InventorySnapshot, ItemMaster};
use crate::domain::policy::{StockAssessment, StockPolicy};
use crate::domain::types::StockStatus;
use chrono::{Datelike, Months, NaiveDate};
use std::sync::Arc;
use tracing::instrument;

/// 需求统计窗口 (月)
const POLICY_WINDOW_MONTHS: u32 = 12;

/// EOQ 调整系数 (按序相乘)
const EOQ_VOLUME_THRESHOLD: f64 = 50.0; // 基础 EOQ 超过该值触发批量折扣激励
const EOQ_VOLUME_FACTOR: f64 = 1.2;
const EOQ_NEW_RELEASE_FACTOR: f64 = 0.8; // 出版一年内需求不确定性惩罚
const EOQ_HIGH_VALUE_FACTOR: f64 = 0.9; // 高价品资金占用惩罚

/// 标准差不可得时的近似比例 (σ ≈ 30% × 月均需求)
const SIGMA_FALLBACK_RATIO: f64 = 0.30;

/// 现货状态区间
const UNDERSTOCK_RATIO: f64 = 0.8;
const OVERSTOCK_RATIO: f64 = 1.2;

// ==========================================
// StockPolicyCalculator - 库存策略计算引擎
// ==========================================
pub struct StockPolicyCalculator {
    config: Arc<AnalysisConfig>,
}

impl StockPolicyCalculator {
    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 单品目策略计算与现货评估
    ///
    /// # 参数
    /// - item: 品目主数据
    /// - history: 月度需求序列
    /// - snapshot: 现货快照 (门店 + 仓库)
    /// - trend_factor: 趋势系数 (趋势分析协作方提供, None 取 1.0)
    /// - as_of: 计算基准日期
    #[instrument(skip(self, item, history, snapshot), fields(
        item_id = %item.item_id,
        history_len = history.len()
    ))]
    pub fn calculate(
        &self,
        item: &ItemMaster,
        history: &[DemandObservation],
        snapshot: &InventorySnapshot,
        trend_factor: Option<f64>,
        as_of: NaiveDate,
    ) -> StockAssessment {
        let window = trailing_window(history, as_of, POLICY_WINDOW_MONTHS);
        let avg_monthly = if window.is_empty() {
            0.0
        } else {
            window.iter().map(|obs| obs.quantity as f64).sum::<f64>() / window.len() as f64
        };

        let eoq = self.economic_order_quantity(item, avg_monthly, as_of);
        let safety_stock = self.safety_stock(&window, avg_monthly);
        let reorder_point = self.reorder_point(avg_monthly, safety_stock);

        // 最优库存 = (EOQ + 安全库存) × 陈旧度 × 趋势 × 季节
        let obsolescence = obsolescence_factor(item.publish_age_years(as_of));
        let trend = trend_factor.unwrap_or(1.0);
        let seasonality = self.config.seasonal_factor(as_of.month());
        let optimal_level =
            (((eoq + safety_stock) as f64) * obsolescence * trend * seasonality).round() as i64;
        let optimal_level = optimal_level.max(0);

        let current_stock = snapshot.on_hand();
        let status = classify_stock_status(current_stock, optimal_level, reorder_point);

        // REORDER_NEEDED 时给出建议订货量与预估成本/收入
        let (recommended_order_qty, estimated_cost, estimated_revenue) =
            if status == StockStatus::ReorderNeeded {
                let qty = eoq.max(optimal_level - current_stock);
                let cost = qty as f64 * item.unit_price * self.config.cost_ratio;
                let revenue = qty as f64 * item.unit_price;
                (qty, cost, revenue)
            } else {
                (0, 0.0, 0.0)
            };

        let valid_from = as_of;
        let valid_to = as_of.checked_add_months(Months::new(1)).unwrap_or(as_of);

        StockAssessment {
            policy: StockPolicy {
                item_id: item.item_id.clone(),
                eoq,
                safety_stock,
                reorder_point,
                optimal_level,
                valid_from,
                valid_to,
            },
            status,
            current_stock,
            recommended_order_qty,
            estimated_cost,
            estimated_revenue,
            obsolescence_factor: obsolescence,
            trend_factor: trend,
            seasonality_factor: seasonality,
        }
    }

    // ==========================================
    // EOQ (经济订货批量)
    // ==========================================

    /// EOQ = sqrt(2 × 年需求 × 订货成本 / 持有成本), 再按序应用调整系数
    ///
    /// 调整顺序:
    /// 1) 基础 EOQ > 50 → ×1.2 (批量折扣激励)
    /// 2) 出版一年内 → ×0.8 (需求不确定性)
    /// 3) 单价超高价阈值 → ×0.9
    ///
    /// 向下取整, 下限 1; 零需求/零价格退化为 1
    pub fn economic_order_quantity(
        &self,
        item: &ItemMaster,
        avg_monthly_demand: f64,
        as_of: NaiveDate,
    ) -> i64 {
        let annual_demand = 12.0 * avg_monthly_demand;
        let holding_cost = item.unit_price * self.config.holding_cost_rate;

        let base = if annual_demand > 0.0 && holding_cost > 0.0 {
            (2.0 * annual_demand * self.config.ordering_cost / holding_cost).sqrt()
        } else {
            0.0
        };

        let mut adjusted = base;
        if base > EOQ_VOLUME_THRESHOLD {
            adjusted *= EOQ_VOLUME_FACTOR;
        }
        if item.published_within_last_year(as_of) {
            adjusted *= EOQ_NEW_RELEASE_FACTOR;
        }
        if item.unit_price > self.config.high_value_threshold {
            adjusted *= EOQ_HIGH_VALUE_FACTOR;
        }

        (adjusted.floor() as i64).max(1)
    }

    // ==========================================
    // 安全库存与再订货点
    // ==========================================

    /// 安全库存 = round(z × σ × sqrt(提前期月数)), 下限 1
    ///
    /// σ 取窗口样本标准差; 不足整窗时近似为 30% × 月均需求
    fn safety_stock(&self, window: &[&DemandObservation], avg_monthly: f64) -> i64 {
        let sigma = if window.len() >= POLICY_WINDOW_MONTHS as usize {
            sample_std_dev(window)
        } else {
            SIGMA_FALLBACK_RATIO * avg_monthly
        };

        let lead_time_months = self.config.lead_time_weeks / 4.0;
        let safety = (self.config.service_level_z * sigma * lead_time_months.sqrt()).round() as i64;
        safety.max(1)
    }

    /// 再订货点 = round(月均需求 × 提前期月数) + 安全库存, 下限 1
    fn reorder_point(&self, avg_monthly: f64, safety_stock: i64) -> i64 {
        let lead_time_months = self.config.lead_time_weeks / 4.0;
        let demand_during_lead = (avg_monthly * lead_time_months).round() as i64;
        (demand_during_lead + safety_stock).max(1)
    }
}

// ==========================================
// 状态判定与系数
// ==========================================

/// 现货状态判定 (REORDER_NEEDED 优先)
///
/// - C ≤ R → REORDER_NEEDED
/// - C < 0.8×O → UNDERSTOCK
/// - C > 1.2×O → OVERSTOCK
/// - 其余 → OPTIMAL
pub fn classify_stock_status(current: i64, optimal: i64, reorder_point: i64) -> StockStatus {
    if current <= reorder_point {
        StockStatus::ReorderNeeded
    } else if (current as f64) < UNDERSTOCK_RATIO * optimal as f64 {
        StockStatus::Understock
    } else if (current as f64) > OVERSTOCK_RATIO * optimal as f64 {
        StockStatus::Overstock
    } else {
        StockStatus::Optimal
    }
}

/// 陈旧度系数 (出版时长分档)
///
/// ≤1年 1.0, ≤3年 0.95, ≤5年 0.85, 更久 0.70
pub fn obsolescence_factor(publish_age_years: i32) -> f64 {
    if publish_age_years <= 1 {
        1.0
    } else if publish_age_years <= 3 {
        0.95
    } else if publish_age_years <= 5 {
        0.85
    } else {
        0.70
    }
}

/// 窗口样本标准差 (n−1)
fn sample_std_dev(window: &[&DemandObservation]) -> f64 {
    let n = window.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = window.iter().map(|obs| obs.quantity as f64).sum::<f64>() / nf;
    let variance = window
        .iter()
        .map(|obs| {
            let d = obs.quantity as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / (nf - 1.0);
    variance.sqrt()
}
