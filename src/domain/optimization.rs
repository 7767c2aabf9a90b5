// ==========================================
// 图书零售库存决策支持系统 - 采购优化领域模型
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 6. Order Optimizer
// ==========================================

use crate::domain::item::ItemMaster;
use crate::domain::policy::StockAssessment;
use crate::domain::types::{PriorityFocus, StockStatus};
use serde::{Deserialize, Serialize};

// ==========================================
// OptimizationConstraints - 优化约束
// ==========================================
// 值对象,单次优化调用内不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConstraints {
    pub max_budget: f64,          // 预算上限 (元)
    pub max_items: usize,         // 品目数上限
    pub max_weight: f64,          // 总权重上限 (默认按每册 1 单位计)
    pub min_profit_margin: f64,   // 最低利润率 (profit / revenue)
    pub priority_focus: PriorityFocus, // 优化目标
}

// ==========================================
// OrderCandidate - 采购候选
// ==========================================
// 通常由 StockAssessment + 品目主数据构造
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCandidate {
    pub item_id: String,          // 关联品目
    pub title: String,            // 展示标题
    pub status: StockStatus,      // 库存状态 (紧急度来源)
    pub order_qty: i64,           // 建议订货量 (册)
    pub unit_cost: f64,           // 单册进货成本 (元)
    pub unit_revenue: f64,        // 单册售价 (元)
    pub weight_per_unit: f64,     // 单册权重 (默认 1.0)
    pub obsolescence_factor: f64, // 陈旧度系数 (风险评分输入)
    pub seasonality_factor: f64,  // 季节系数 (风险评分输入)
}

impl OrderCandidate {
    /// 由策略评估构造采购候选
    ///
    /// 单册成本 = 售价 × 成本率 (与评估中的预估口径一致); 权重按每册 1 单位计
    pub fn from_assessment(item: &ItemMaster, assessment: &StockAssessment, cost_ratio: f64) -> Self {
        Self {
            item_id: item.item_id.clone(),
            title: item.title.clone(),
            status: assessment.status,
            order_qty: assessment.recommended_order_qty,
            unit_cost: item.unit_price * cost_ratio,
            unit_revenue: item.unit_price,
            weight_per_unit: 1.0,
            obsolescence_factor: assessment.obsolescence_factor,
            seasonality_factor: assessment.seasonality_factor,
        }
    }

    /// 候选总成本
    pub fn total_cost(&self) -> f64 {
        self.order_qty as f64 * self.unit_cost
    }

    /// 候选总收入
    pub fn total_revenue(&self) -> f64 {
        self.order_qty as f64 * self.unit_revenue
    }

    /// 候选总利润
    pub fn total_profit(&self) -> f64 {
        self.total_revenue() - self.total_cost()
    }

    /// 候选总权重
    pub fn total_weight(&self) -> f64 {
        self.order_qty as f64 * self.weight_per_unit
    }
}

// ==========================================
// ConstraintViolation - 约束违规记录
// ==========================================
// 贪心填充按构造不会超预算/超数量; 利润率检查为事后校验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    pub violation_type: String, // BUDGET_EXCEEDED / ITEM_COUNT_EXCEEDED / MARGIN_BELOW_MINIMUM
    pub reason: String,         // 显式原因 (含实际值与阈值)
}

// ==========================================
// OptimizationResult - 优化结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub selected: Vec<OrderCandidate>,        // 入选候选 (保持录取顺序)
    pub total_cost: f64,                      // 合计成本
    pub total_revenue: f64,                   // 合计收入
    pub total_profit: f64,                    // 合计利润
    pub item_count: usize,                    // 入选品目数
    pub optimization_score: f64,              // 优化得分 (0~100)
    pub violations: Vec<ConstraintViolation>, // 事后校验违规列表
}

impl OptimizationResult {
    /// 利润率 (profit / revenue, 收入为 0 时取 0)
    pub fn profit_margin(&self) -> f64 {
        if self.total_revenue > 0.0 {
            self.total_profit / self.total_revenue
        } else {
            0.0
        }
    }
}
