// ==========================================
// 图书零售库存决策支持系统 - 采购优化引擎
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 6. Order Optimizer
// 红线: 预算/数量/权重约束优先于候选得分
// ==========================================
// 职责: 约束下的贪心采购选择 (非精确求解器)
// 输入: 采购候选列表 + 优化约束
// 输出: OptimizationResult (入选集 + 得分 + 事后校验)
// ==========================================

use crate::domain::optimization::{
    ConstraintViolation, OptimizationConstraints, OptimizationResult, OrderCandidate,
};
use crate::domain::types::{PriorityFocus, StockStatus};
use tracing::{debug, instrument};

/// 现金流目标的紧急度乘数
const URGENCY_REORDER_NEEDED: f64 = 2.0;
const URGENCY_UNDERSTOCK: f64 = 1.5;
const URGENCY_DEFAULT: f64 = 1.0;

/// 风险评分项
const RISK_BASE: f64 = 1.0;
const RISK_SEASONALITY_THRESHOLD: f64 = 0.9;
const RISK_SEASONALITY_PENALTY: f64 = 0.5;
const RISK_REORDER_PENALTY: f64 = 0.3;

/// 优化得分权重
const SCORE_MARGIN_WEIGHT: f64 = 100.0;
const SCORE_UTILIZATION_WEIGHT: f64 = 20.0;
const SCORE_VIOLATION_PENALTY: f64 = 10.0;

// ==========================================
// OrderOptimizer - 采购优化引擎
// ==========================================
pub struct OrderOptimizer {
    // 无状态引擎,不需要注入依赖
}

impl OrderOptimizer {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 约束下的贪心采购选择
    ///
    /// 流程:
    /// 1) 过滤可订货候选 (REORDER_NEEDED/UNDERSTOCK 或已有正建议量)
    /// 2) 按优化目标打分并稳定排序 (同分保持输入顺序 → 同输入同结果)
    /// 3) 按序贪心录取,任一约束 (预算/数量/权重) 会被突破则跳过该候选继续
    /// 4) 计算优化得分并做事后约束校验
    ///
    /// 无回溯/分支定界; 利润率约束不参与录取,仅事后记录违规
    #[instrument(skip(self, candidates), fields(
        candidates_count = candidates.len(),
        focus = %constraints.priority_focus
    ))]
    pub fn optimize(
        &self,
        candidates: Vec<OrderCandidate>,
        constraints: &OptimizationConstraints,
    ) -> OptimizationResult {
        // 1. 过滤可订货候选
        let mut viable: Vec<OrderCandidate> = candidates
            .into_iter()
            .filter(is_viable)
            .collect();

        // 2. 打分排序
        let focus = constraints.priority_focus;
        match focus {
            PriorityFocus::Profit | PriorityFocus::CashFlow => {
                viable.sort_by(|a, b| {
                    score_candidate(b, focus)
                        .partial_cmp(&score_candidate(a, focus))
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            PriorityFocus::RiskMinimization => {
                // 低风险优先,升序
                viable.sort_by(|a, b| {
                    score_candidate(a, focus)
                        .partial_cmp(&score_candidate(b, focus))
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            }
        }

        // 3. 贪心录取
        let mut selected = Vec::new();
        let mut total_cost = 0.0;
        let mut total_revenue = 0.0;
        let mut total_weight = 0.0;

        for candidate in viable {
            let cost = candidate.total_cost();
            let weight = candidate.total_weight();

            if total_cost + cost > constraints.max_budget {
                debug!(
                    item_id = %candidate.item_id,
                    cost,
                    remaining_budget = constraints.max_budget - total_cost,
                    "BUDGET_CAP: 预算不足,跳过候选"
                );
                continue;
            }
            if selected.len() + 1 > constraints.max_items {
                debug!(item_id = %candidate.item_id, "ITEM_CAP: 已达品目数上限,跳过候选");
                continue;
            }
            if total_weight + weight > constraints.max_weight {
                debug!(
                    item_id = %candidate.item_id,
                    weight,
                    remaining_weight = constraints.max_weight - total_weight,
                    "WEIGHT_CAP: 权重不足,跳过候选"
                );
                continue;
            }

            total_cost += cost;
            total_revenue += candidate.total_revenue();
            total_weight += weight;
            selected.push(candidate);
        }

        let total_profit = total_revenue - total_cost;
        let item_count = selected.len();

        // 4. 事后约束校验
        let violations = validate_constraints(total_cost, total_revenue, item_count, constraints);

        // 优化得分 = 利润率×100 + 预算利用率×20 − 10×违规数, 截断到 [0,100]
        let margin = if total_revenue > 0.0 {
            total_profit / total_revenue
        } else {
            0.0
        };
        let utilization = if constraints.max_budget > 0.0 {
            total_cost / constraints.max_budget
        } else {
            0.0
        };
        let optimization_score = (margin * SCORE_MARGIN_WEIGHT
            + utilization * SCORE_UTILIZATION_WEIGHT
            - SCORE_VIOLATION_PENALTY * violations.len() as f64)
            .clamp(0.0, 100.0);

        OptimizationResult {
            selected,
            total_cost,
            total_revenue,
            total_profit,
            item_count,
            optimization_score,
            violations,
        }
    }
}

impl Default for OrderOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 评分与校验
// ==========================================

/// 候选是否可订货
fn is_viable(candidate: &OrderCandidate) -> bool {
    matches!(
        candidate.status,
        StockStatus::ReorderNeeded | StockStatus::Understock
    ) || candidate.order_qty > 0
}

/// 按优化目标打分
///
/// - PROFIT: (收入−成本)/成本
/// - CASH_FLOW: 利润率 × 紧急度乘数
/// - RISK_MINIMIZATION: 1 + (1−陈旧度) + 0.5·[季节<0.9] + 0.3·[REORDER_NEEDED]
pub fn score_candidate(candidate: &OrderCandidate, focus: PriorityFocus) -> f64 {
    match focus {
        PriorityFocus::Profit => profit_ratio(candidate),
        PriorityFocus::CashFlow => {
            let urgency = match candidate.status {
                StockStatus::ReorderNeeded => URGENCY_REORDER_NEEDED,
                StockStatus::Understock => URGENCY_UNDERSTOCK,
                _ => URGENCY_DEFAULT,
            };
            profit_ratio(candidate) * urgency
        }
        PriorityFocus::RiskMinimization => {
            let mut risk = RISK_BASE + (1.0 - candidate.obsolescence_factor);
            if candidate.seasonality_factor < RISK_SEASONALITY_THRESHOLD {
                risk += RISK_SEASONALITY_PENALTY;
            }
            if candidate.status == StockStatus::ReorderNeeded {
                risk += RISK_REORDER_PENALTY;
            }
            risk
        }
    }
}

/// 利润率 = (收入−成本)/成本 (成本为 0 时取 0)
fn profit_ratio(candidate: &OrderCandidate) -> f64 {
    let cost = candidate.total_cost();
    if cost > 0.0 {
        (candidate.total_revenue() - cost) / cost
    } else {
        0.0
    }
}

/// 事后约束校验
///
/// 贪心循环按构造满足预算与数量约束; 利润率约束不参与录取,此处可能记录违规
fn validate_constraints(
    total_cost: f64,
    total_revenue: f64,
    item_count: usize,
    constraints: &OptimizationConstraints,
) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();

    if total_cost > constraints.max_budget {
        violations.push(ConstraintViolation {
            violation_type: "BUDGET_EXCEEDED".to_string(),
            reason: format!(
                "total_cost={:.2}, max_budget={:.2}",
                total_cost, constraints.max_budget
            ),
        });
    }

    if item_count > constraints.max_items {
        violations.push(ConstraintViolation {
            violation_type: "ITEM_COUNT_EXCEEDED".to_string(),
            reason: format!("item_count={}, max_items={}", item_count, constraints.max_items),
        });
    }

    let margin = if total_revenue > 0.0 {
        (total_revenue - total_cost) / total_revenue
    } else {
        0.0
    };
    if item_count > 0 && margin < constraints.min_profit_margin {
        violations.push(ConstraintViolation {
            violation_type: "MARGIN_BELOW_MINIMUM".to_string(),
            reason: format!(
                "margin={:.4}, min_profit_margin={:.4}",
                margin, constraints.min_profit_margin
            ),
        });
    }

    violations
}
