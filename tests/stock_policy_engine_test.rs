// ==========================================
// StockPolicyCalculator 引擎集成测试
// ==========================================
// 测试目标: 验证 EOQ/安全库存/再订货点/最优库存与状态判定
// 覆盖范围: EOQ 调整系数、持有成本单调性、状态边界、建议订货
// ==========================================

mod test_helpers;

use retail_inventory_dss::config::AnalysisConfig;
use retail_inventory_dss::domain::types::StockStatus;
use retail_inventory_dss::engine::{
    classify_stock_status, obsolescence_factor, StockPolicyCalculator,
};
use std::sync::Arc;
use test_helpers::*;

fn create_calculator() -> StockPolicyCalculator {
    StockPolicyCalculator::new(Arc::new(AnalysisConfig::default()))
}

// ==========================================
// 测试用例 1: EOQ 基础公式
// ==========================================

#[test]
fn test_eoq_base_formula() {
    let calculator = create_calculator();
    let as_of = date(2026, 7, 15);

    // 月均 10, 单价 100: 年需求 120, 持有成本 25
    // base = sqrt(2×120×50/25) = sqrt(480) ≈ 21.9 → 向下取整 21
    let item = create_test_item("ISBN-001", 100.0, date(2015, 1, 1));
    let eoq = calculator.economic_order_quantity(&item, 10.0, as_of);
    assert_eq!(eoq, 21);
}

#[test]
fn test_eoq_volume_discount_adjustment() {
    let calculator = create_calculator();
    let as_of = date(2026, 7, 15);

    // 月均 100: base = sqrt(4800) ≈ 69.3 > 50 → ×1.2 ≈ 83.1 → 83
    let item = create_test_item("ISBN-001", 100.0, date(2015, 1, 1));
    let eoq = calculator.economic_order_quantity(&item, 100.0, as_of);
    assert_eq!(eoq, 83);
}

#[test]
fn test_eoq_new_release_adjustment() {
    let calculator = create_calculator();
    let as_of = date(2026, 7, 15);

    // 出版一年内: 69.3 × 1.2 × 0.8 ≈ 66.5 → 66
    let item = create_test_item("ISBN-NEW", 100.0, date(2025, 10, 1));
    let eoq = calculator.economic_order_quantity(&item, 100.0, as_of);
    assert_eq!(eoq, 66);
}

#[test]
fn test_eoq_high_value_adjustment() {
    let calculator = create_calculator();
    let as_of = date(2026, 7, 15);

    // 单价 200 (> 高价阈值 150): 持有成本 50
    // base = sqrt(2×120×50/50) = sqrt(240) ≈ 15.49 → ×0.9 ≈ 13.9 → 13
    let item = create_test_item("ISBN-LUX", 200.0, date(2015, 1, 1));
    let eoq = calculator.economic_order_quantity(&item, 10.0, as_of);
    assert_eq!(eoq, 13);
}

#[test]
fn test_eoq_degenerate_inputs_floor_one() {
    let calculator = create_calculator();
    let as_of = date(2026, 7, 15);

    // 零需求与零价格都退化为 1
    let item = create_test_item("ISBN-001", 100.0, date(2015, 1, 1));
    assert_eq!(calculator.economic_order_quantity(&item, 0.0, as_of), 1);

    let free_item = create_test_item("ISBN-FREE", 0.0, date(2015, 1, 1));
    assert_eq!(calculator.economic_order_quantity(&free_item, 10.0, as_of), 1);
}

#[test]
fn test_eoq_decreases_when_holding_rate_doubles() {
    let as_of = date(2026, 7, 15);
    let item = create_test_item("ISBN-001", 100.0, date(2015, 1, 1));

    let base_calculator = create_calculator();
    let doubled_calculator = StockPolicyCalculator::new(Arc::new(AnalysisConfig {
        holding_cost_rate: 0.50,
        ..AnalysisConfig::default()
    }));

    // 反平方根关系: 持有成本率翻倍 → EOQ 严格下降
    let base_eoq = base_calculator.economic_order_quantity(&item, 10.0, as_of);
    let doubled_eoq = doubled_calculator.economic_order_quantity(&item, 10.0, as_of);
    assert!(
        doubled_eoq < base_eoq,
        "doubled_eoq={} 应严格小于 base_eoq={}",
        doubled_eoq,
        base_eoq
    );
}

// ==========================================
// 测试用例 2: 安全库存与再订货点
// ==========================================

#[test]
fn test_safety_stock_fallback_sigma() {
    let calculator = create_calculator();
    let as_of = date(2026, 7, 15);

    // 仅 6 个月历史 (不足整窗): σ ≈ 0.3×10 = 3
    // 安全库存 = round(1.65 × 3 × sqrt(0.5)) = round(3.50) = 4
    // 再订货点 = round(10 × 0.5) + 4 = 9
    let item = create_test_item("ISBN-001", 100.0, date(2025, 8, 1));
    let history = constant_history("ISBN-001", as_of, 6, 10);
    let snapshot = create_test_snapshot("ISBN-001", 3, 2, Some(date(2026, 7, 1)));

    let assessment = calculator.calculate(&item, &history, &snapshot, None, as_of);
    assert_eq!(assessment.policy.safety_stock, 4);
    assert_eq!(assessment.policy.reorder_point, 9);

    // EOQ: sqrt(480) ≈ 21.9 → 新书 ×0.8 ≈ 17.5 → 17
    assert_eq!(assessment.policy.eoq, 17);

    // 最优库存 = (17 + 4) × 1.0(新书陈旧度) × 1.0(趋势) × 1.0(7月季节) = 21
    assert_eq!(assessment.policy.optimal_level, 21);

    // 现货 5 ≤ 再订货点 9 → REORDER_NEEDED
    assert_eq!(assessment.status, StockStatus::ReorderNeeded);
    assert_eq!(assessment.current_stock, 5);

    // 建议订货 = max(EOQ=17, 21−5=16) = 17
    assert_eq!(assessment.recommended_order_qty, 17);
    assert!((assessment.estimated_revenue - 1700.0).abs() < 1e-6);
    assert!((assessment.estimated_cost - 1190.0).abs() < 1e-6);

    // 有效期 [as_of, as_of + 1个月)
    assert_eq!(assessment.policy.valid_from, as_of);
    assert_eq!(assessment.policy.valid_to, date(2026, 8, 15));
}

#[test]
fn test_safety_stock_full_window_uses_sample_std_dev() {
    let calculator = create_calculator();
    let as_of = date(2026, 7, 15);

    // 整 12 个月: 交替 8/12, 样本标准差 ≈ 2.089
    // 安全库存 = round(1.65 × 2.089 × sqrt(0.5)) = round(2.44) = 2
    let item = create_test_item("ISBN-001", 100.0, date(2015, 1, 1));
    let history =
        history_from_quantities("ISBN-001", as_of, &[8, 12, 8, 12, 8, 12, 8, 12, 8, 12, 8, 12]);
    let snapshot = create_test_snapshot("ISBN-001", 50, 50, Some(date(2026, 7, 1)));

    let assessment = calculator.calculate(&item, &history, &snapshot, None, as_of);
    assert_eq!(assessment.policy.safety_stock, 2);
}

#[test]
fn test_safety_stock_constant_demand_floors_one() {
    let calculator = create_calculator();
    let as_of = date(2026, 7, 15);

    // 恒定需求 → σ = 0 → 安全库存下限 1
    let item = create_test_item("ISBN-001", 100.0, date(2015, 1, 1));
    let history = constant_history("ISBN-001", as_of, 12, 10);
    let snapshot = create_test_snapshot("ISBN-001", 50, 50, Some(date(2026, 7, 1)));

    let assessment = calculator.calculate(&item, &history, &snapshot, None, as_of);
    assert_eq!(assessment.policy.safety_stock, 1);
}

// ==========================================
// 测试用例 3: 现货状态边界
// ==========================================

#[test]
fn test_stock_status_boundaries() {
    // 现货 50 ≤ 再订货点 60 → REORDER_NEEDED
    assert_eq!(
        classify_stock_status(50, 100, 60),
        StockStatus::ReorderNeeded
    );
    // 75 < 0.8×100 → UNDERSTOCK
    assert_eq!(classify_stock_status(75, 100, 10), StockStatus::Understock);
    // 130 > 1.2×100 → OVERSTOCK
    assert_eq!(classify_stock_status(130, 100, 10), StockStatus::Overstock);
    // 95 在 [80, 120] 内 → OPTIMAL
    assert_eq!(classify_stock_status(95, 100, 10), StockStatus::Optimal);
    // 边界值 80/120 均视为 OPTIMAL (区间判定为严格不等)
    assert_eq!(classify_stock_status(80, 100, 10), StockStatus::Optimal);
    assert_eq!(classify_stock_status(120, 100, 10), StockStatus::Optimal);
}

#[test]
fn test_no_recommendation_when_stock_sufficient() {
    let calculator = create_calculator();
    let as_of = date(2026, 7, 15);

    let item = create_test_item("ISBN-001", 100.0, date(2025, 8, 1));
    let history = constant_history("ISBN-001", as_of, 6, 10);
    // 现货 20 > 再订货点 9, 且在最优区间附近
    let snapshot = create_test_snapshot("ISBN-001", 10, 10, Some(date(2026, 7, 1)));

    let assessment = calculator.calculate(&item, &history, &snapshot, None, as_of);
    assert_ne!(assessment.status, StockStatus::ReorderNeeded);
    assert_eq!(assessment.recommended_order_qty, 0);
    assert_eq!(assessment.estimated_cost, 0.0);
    assert_eq!(assessment.estimated_revenue, 0.0);
}

// ==========================================
// 测试用例 4: 调整系数
// ==========================================

#[test]
fn test_obsolescence_factor_bands() {
    assert_eq!(obsolescence_factor(0), 1.0);
    assert_eq!(obsolescence_factor(1), 1.0);
    assert_eq!(obsolescence_factor(2), 0.95);
    assert_eq!(obsolescence_factor(3), 0.95);
    assert_eq!(obsolescence_factor(4), 0.85);
    assert_eq!(obsolescence_factor(5), 0.85);
    assert_eq!(obsolescence_factor(6), 0.70);
    assert_eq!(obsolescence_factor(20), 0.70);
}

#[test]
fn test_trend_factor_scales_optimal_level() {
    let calculator = create_calculator();
    let as_of = date(2026, 7, 15);

    let item = create_test_item("ISBN-001", 100.0, date(2025, 8, 1));
    let history = constant_history("ISBN-001", as_of, 6, 10);
    let snapshot = create_test_snapshot("ISBN-001", 50, 50, Some(date(2026, 7, 1)));

    let baseline = calculator.calculate(&item, &history, &snapshot, None, as_of);
    let boosted = calculator.calculate(&item, &history, &snapshot, Some(1.5), as_of);

    // 趋势系数 1.5 → 最优库存按比例抬升 (21 → 32)
    assert_eq!(baseline.policy.optimal_level, 21);
    assert_eq!(boosted.policy.optimal_level, 32);
    assert_eq!(boosted.trend_factor, 1.5);
}
