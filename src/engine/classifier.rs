// ==========================================
// 图书零售库存决策支持系统 - 需求分类引擎
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 4. Demand Classifier
// 红线: 同一分析日期整体重算; 越界项(零销售额)静默剔除而非报错
// ==========================================
// 职责: ABC(销售贡献) + XYZ(需求波动) 分类与处置策略建议
// 输入: 品目 + 月度需求序列
// 输出: ItemClassification 列表 (贡献占比合计 100)
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::classification::ItemClassification;
use crate::domain::item::{trailing_window, DemandObservation, ItemMaster};
use crate::domain::types::{AbcClass, DisposalStrategy, LifecycleStage, TurnoverSpeed, XyzClass};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, instrument};

/// ABC 统计窗口 (月)
const ABC_WINDOW_MONTHS: u32 = 12;

/// A 类累计贡献边界 (%)
const ABC_BOUNDARY_A: f64 = 20.0;
/// B 类累计贡献边界 (%)
const ABC_BOUNDARY_B: f64 = 80.0;

/// XYZ 变异系数边界
const XYZ_BOUNDARY_X: f64 = 0.5;
const XYZ_BOUNDARY_Y: f64 = 1.0;

/// 处置策略的滞销天数阈值
const DISPOSAL_LIQUIDATE_DAYS: i64 = 365;
const DISPOSAL_BULK_SALE_DAYS: i64 = 180;

// ==========================================
// DemandClassifier - 需求分类引擎
// ==========================================
pub struct DemandClassifier {
    config: Arc<AnalysisConfig>,
}

impl DemandClassifier {
    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 整体分类 (ABC + XYZ)
    ///
    /// 流程:
    /// 1) 统计近 12 个月销售额,剔除低于最低销售额阈值的品目
    /// 2) 归一化为贡献百分比 (4 位小数,合计 100),按贡献降序稳定排序
    /// 3) 沿累计贡献划分 ABC (跨越边界的品目归属上一档)
    /// 4) 按月需求变异系数划分 XYZ
    ///
    /// 输入数据不变时重复运行产出完全一致的记录
    #[instrument(skip(self, item_histories), fields(items_count = item_histories.len()))]
    pub fn classify(
        &self,
        item_histories: &[(ItemMaster, Vec<DemandObservation>)],
        as_of: NaiveDate,
    ) -> Vec<ItemClassification> {
        // 1. 统计销售额与需求序列
        let mut entries: Vec<(&ItemMaster, f64, Vec<f64>)> = Vec::new();
        for (item, history) in item_histories {
            let window = trailing_window(history, as_of, ABC_WINDOW_MONTHS);
            let sales_value: f64 = window
                .iter()
                .map(|obs| obs.quantity as f64 * item.unit_price)
                .sum();

            if sales_value < self.config.min_sales_threshold {
                debug!(
                    item_id = %item.item_id,
                    sales_value,
                    threshold = self.config.min_sales_threshold,
                    "低于最低销售额阈值,不参与分类"
                );
                continue;
            }

            let quantities: Vec<f64> = window.iter().map(|obs| obs.quantity as f64).collect();
            entries.push((item, sales_value, quantities));
        }

        // 2. 归一化 (零总额防护: 产出空结果而非除零)
        let total_sales: f64 = entries.iter().map(|(_, value, _)| value).sum();
        if total_sales <= 0.0 {
            debug!("窗口内总销售额为零,分类结果为空");
            return Vec::new();
        }

        let mut scored: Vec<(&ItemMaster, f64, Vec<f64>)> = entries
            .into_iter()
            .map(|(item, value, quantities)| {
                (item, round_pct(value / total_sales * 100.0), quantities)
            })
            .collect();

        // 降序稳定排序: 同值保持输入顺序,边界并列由此决定归属
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        // 3/4. 沿累计贡献划分 ABC,逐品目计算 XYZ
        let mut classifications = Vec::with_capacity(scored.len());
        let mut cumulative = 0.0;
        for (item, pct, quantities) in scored {
            // 跨越边界的品目仍归属上一档 (按进入该品目前的累计值判定)
            let abc = if cumulative < ABC_BOUNDARY_A {
                AbcClass::A
            } else if cumulative < ABC_BOUNDARY_B {
                AbcClass::B
            } else {
                AbcClass::C
            };
            cumulative += pct;

            let cv = coefficient_of_variation(&quantities);
            classifications.push(ItemClassification {
                item_id: item.item_id.clone(),
                abc,
                xyz: xyz_class(cv),
                sales_contribution_pct: pct,
                demand_cv: cv,
                analysis_date: as_of,
            });
        }

        classifications
    }

    // ==========================================
    // 处置策略建议
    // ==========================================

    /// 慢销/滞销库存的处置策略
    ///
    /// 规则 (命中即返回):
    /// - FAST/MEDIUM → 无需处置
    /// - DEAD + 新书退货窗口内 → 退货给供应商
    /// - DEAD + 超 365 天未售出 (或从未售出) → 清仓
    /// - DEAD + 超 180 天未售出 → 批量折价外销
    /// - DEAD 其余 → 店内折扣
    /// - SLOW + 超 180 天未售出 (或从未售出) → 店内折扣
    pub fn recommend_disposal(
        &self,
        turnover: TurnoverSpeed,
        days_since_last_sale: Option<i64>,
        lifecycle: LifecycleStage,
    ) -> Option<DisposalStrategy> {
        match turnover {
            TurnoverSpeed::Fast | TurnoverSpeed::Medium => None,
            TurnoverSpeed::Dead => {
                if lifecycle == LifecycleStage::NewRelease {
                    return Some(DisposalStrategy::ReturnToSupplier);
                }
                match days_since_last_sale {
                    None => Some(DisposalStrategy::Liquidate),
                    Some(days) if days > DISPOSAL_LIQUIDATE_DAYS => {
                        Some(DisposalStrategy::Liquidate)
                    }
                    Some(days) if days > DISPOSAL_BULK_SALE_DAYS => {
                        Some(DisposalStrategy::BulkSale)
                    }
                    Some(_) => Some(DisposalStrategy::DiscountSale),
                }
            }
            TurnoverSpeed::Slow => match days_since_last_sale {
                None => Some(DisposalStrategy::DiscountSale),
                Some(days) if days > DISPOSAL_BULK_SALE_DAYS => {
                    Some(DisposalStrategy::DiscountSale)
                }
                Some(_) => None,
            },
        }
    }
}

// ==========================================
// 统计辅助函数
// ==========================================

/// 变异系数 CV = σ/μ (总体标准差; 均值为 0 时取 0)
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    variance.sqrt() / mean
}

/// CV → XYZ 分档 (Z 的下界为闭区间)
pub fn xyz_class(cv: f64) -> XyzClass {
    if cv < XYZ_BOUNDARY_X {
        XyzClass::X
    } else if cv < XYZ_BOUNDARY_Y {
        XyzClass::Y
    } else {
        XyzClass::Z
    }
}

/// 百分比四舍五入到 4 位小数 (half-up)
fn round_pct(pct: f64) -> f64 {
    (pct * 10_000.0).round() / 10_000.0
}
