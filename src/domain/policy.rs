// ==========================================
// 图书零售库存决策支持系统 - 库存策略领域模型
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 5. Stock Policy Calculator
// ==========================================

use crate::domain::types::StockStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// StockPolicy - 库存策略
// ==========================================
// 派生记录,可替换; 同一品目随时间形成策略历史
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPolicy {
    pub item_id: String,        // 关联品目
    pub eoq: i64,               // 经济订货批量 (>0)
    pub safety_stock: i64,      // 安全库存 (≥0)
    pub reorder_point: i64,     // 再订货点 (≥0)
    pub optimal_level: i64,     // 调整后最优库存水平 (≥0)
    pub valid_from: NaiveDate,  // 有效期起 (含)
    pub valid_to: NaiveDate,    // 有效期止 (不含)
}

// ==========================================
// StockAssessment - 策略 + 状态评估
// ==========================================
// StockPolicyCalculator 的完整输出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAssessment {
    pub policy: StockPolicy,          // 派生库存策略
    pub status: StockStatus,          // 现货状态判定
    pub current_stock: i64,           // 判定所用现货 (门店+仓库)
    pub recommended_order_qty: i64,   // 建议订货量 (非 REORDER_NEEDED 时为 0)
    pub estimated_cost: f64,          // 建议订货的预估成本 (售价 × 成本率)
    pub estimated_revenue: f64,       // 建议订货的预估收入
    pub obsolescence_factor: f64,     // 陈旧度系数 (出版时长分档)
    pub trend_factor: f64,            // 趋势系数 (外部协作方提供, 默认 1.0)
    pub seasonality_factor: f64,      // 季节系数 (月度查表, 默认 1.0)
}

impl StockAssessment {
    /// 是否值得进入采购优化候选集
    pub fn is_order_candidate(&self) -> bool {
        matches!(
            self.status,
            StockStatus::ReorderNeeded | StockStatus::Understock
        ) || self.recommended_order_qty > 0
    }
}
