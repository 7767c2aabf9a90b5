// ==========================================
// DemandClassifier 引擎集成测试
// ==========================================
// 测试目标: 验证 ABC/XYZ 分类与处置策略建议
// 覆盖范围: 累计贡献边界、CV 边界、阈值剔除、幂等性
// ==========================================

mod test_helpers;

use retail_inventory_dss::config::AnalysisConfig;
use retail_inventory_dss::domain::classification::turnover_speed;
use retail_inventory_dss::domain::item::{DemandObservation, ItemMaster};
use retail_inventory_dss::domain::types::{
    AbcClass, DisposalStrategy, LifecycleStage, TurnoverSpeed, XyzClass,
};
use retail_inventory_dss::engine::{coefficient_of_variation, xyz_class, DemandClassifier};
use std::sync::Arc;
use test_helpers::*;

fn create_classifier() -> DemandClassifier {
    DemandClassifier::new(Arc::new(AnalysisConfig::default()))
}

/// 单月集中销量的品目 (控制销售额占比)
fn item_with_total_sales(
    item_id: &str,
    unit_price: f64,
    as_of: chrono::NaiveDate,
    total_qty: i64,
) -> (ItemMaster, Vec<DemandObservation>) {
    let item = create_test_item(item_id, unit_price, date(2020, 1, 1));
    let history = history_from_quantities(item_id, as_of, &[total_qty]);
    (item, history)
}

// ==========================================
// 测试用例 1: ABC 累计贡献边界
// ==========================================

#[test]
fn test_abc_boundary_50_30_20() {
    let classifier = create_classifier();
    let as_of = date(2026, 7, 15);

    // 贡献占比 50%/30%/20% → 累计 50/80/100 → A/B/C
    let inputs = vec![
        item_with_total_sales("ISBN-A", 10.0, as_of, 500),
        item_with_total_sales("ISBN-B", 10.0, as_of, 300),
        item_with_total_sales("ISBN-C", 10.0, as_of, 200),
    ];

    let classifications = classifier.classify(&inputs, as_of);
    assert_eq!(classifications.len(), 3);

    // 输出按贡献降序
    assert_eq!(classifications[0].item_id, "ISBN-A");
    assert_eq!(classifications[0].abc, AbcClass::A);
    assert!((classifications[0].sales_contribution_pct - 50.0).abs() < 1e-9);

    assert_eq!(classifications[1].item_id, "ISBN-B");
    assert_eq!(classifications[1].abc, AbcClass::B);
    assert!((classifications[1].sales_contribution_pct - 30.0).abs() < 1e-9);

    assert_eq!(classifications[2].item_id, "ISBN-C");
    assert_eq!(classifications[2].abc, AbcClass::C);
    assert!((classifications[2].sales_contribution_pct - 20.0).abs() < 1e-9);
}

#[test]
fn test_abc_contribution_sums_to_100() {
    let classifier = create_classifier();
    let as_of = date(2026, 7, 15);

    let inputs = vec![
        item_with_total_sales("ISBN-001", 30.0, as_of, 120),
        item_with_total_sales("ISBN-002", 45.0, as_of, 80),
        item_with_total_sales("ISBN-003", 99.0, as_of, 40),
        item_with_total_sales("ISBN-004", 25.0, as_of, 310),
    ];

    let classifications = classifier.classify(&inputs, as_of);
    let total_pct: f64 = classifications
        .iter()
        .map(|c| c.sales_contribution_pct)
        .sum();
    // 4 位小数舍入后允许微小偏差
    assert!((total_pct - 100.0).abs() < 0.01, "total_pct={}", total_pct);
}

#[test]
fn test_abc_drops_items_below_sales_threshold() {
    let classifier = create_classifier();
    let as_of = date(2026, 7, 15);

    // 缺省阈值 200 元: 第二个品目年销售额仅 50 元,应被剔除
    let inputs = vec![
        item_with_total_sales("ISBN-001", 10.0, as_of, 500),
        item_with_total_sales("ISBN-TINY", 10.0, as_of, 5),
    ];

    let classifications = classifier.classify(&inputs, as_of);
    assert_eq!(classifications.len(), 1);
    assert_eq!(classifications[0].item_id, "ISBN-001");
    // 剩余品目归一化后占 100%
    assert!((classifications[0].sales_contribution_pct - 100.0).abs() < 1e-9);
}

#[test]
fn test_abc_zero_total_sales_yields_empty() {
    let classifier = create_classifier();
    let as_of = date(2026, 7, 15);

    // 全部低于阈值 → 零总额防护,空结果而非除零
    let inputs = vec![
        item_with_total_sales("ISBN-001", 1.0, as_of, 3),
        item_with_total_sales("ISBN-002", 1.0, as_of, 7),
    ];
    let classifications = classifier.classify(&inputs, as_of);
    assert!(classifications.is_empty());
}

// ==========================================
// 测试用例 2: XYZ 变异系数边界
// ==========================================

#[test]
fn test_xyz_boundaries() {
    // X < 0.5 ≤ Y < 1.0 ≤ Z (Z 下界为闭区间)
    assert_eq!(xyz_class(0.0), XyzClass::X);
    assert_eq!(xyz_class(0.49), XyzClass::X);
    assert_eq!(xyz_class(0.50), XyzClass::Y);
    assert_eq!(xyz_class(0.99), XyzClass::Y);
    assert_eq!(xyz_class(1.00), XyzClass::Z);
    assert_eq!(xyz_class(2.5), XyzClass::Z);
}

#[test]
fn test_coefficient_of_variation() {
    // 恒定序列 → CV 0
    assert_eq!(coefficient_of_variation(&[10.0, 10.0, 10.0]), 0.0);

    // 零均值防护 → 0
    assert_eq!(coefficient_of_variation(&[0.0, 0.0]), 0.0);
    assert_eq!(coefficient_of_variation(&[]), 0.0);

    // [4, 8]: μ=6, σ=2 (总体) → CV = 1/3
    let cv = coefficient_of_variation(&[4.0, 8.0]);
    assert!((cv - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_stable_demand_classified_x() {
    let classifier = create_classifier();
    let as_of = date(2026, 7, 15);

    let item = create_test_item("ISBN-001", 25.0, date(2020, 1, 1));
    let history = constant_history("ISBN-001", as_of, 12, 10);

    let classifications = classifier.classify(&[(item, history)], as_of);
    assert_eq!(classifications.len(), 1);
    assert_eq!(classifications[0].xyz, XyzClass::X);
    assert_eq!(classifications[0].demand_cv, 0.0);
}

#[test]
fn test_erratic_demand_classified_z() {
    let classifier = create_classifier();
    let as_of = date(2026, 7, 15);

    // 偶发大单: CV ≥ 1.0
    let item = create_test_item("ISBN-001", 25.0, date(2020, 1, 1));
    let history =
        history_from_quantities("ISBN-001", as_of, &[0, 0, 0, 120, 0, 0, 0, 0, 0, 0, 0, 0]);

    let classifications = classifier.classify(&[(item, history)], as_of);
    assert_eq!(classifications.len(), 1);
    assert_eq!(classifications[0].xyz, XyzClass::Z);
    assert!(classifications[0].demand_cv >= 1.0);
}

// ==========================================
// 测试用例 3: 幂等性
// ==========================================

#[test]
fn test_classify_is_idempotent() {
    let classifier = create_classifier();
    let as_of = date(2026, 7, 15);

    let inputs = vec![
        item_with_total_sales("ISBN-001", 30.0, as_of, 120),
        item_with_total_sales("ISBN-002", 45.0, as_of, 80),
        item_with_total_sales("ISBN-003", 99.0, as_of, 40),
    ];

    let first = classifier.classify(&inputs, as_of);
    let second = classifier.classify(&inputs, as_of);
    assert_eq!(first, second);
}

// ==========================================
// 测试用例 4: 周转速度与处置策略
// ==========================================

#[test]
fn test_turnover_mapping_drives_disposal() {
    let classifier = create_classifier();

    // 快销/平销不处置
    assert_eq!(
        classifier.recommend_disposal(TurnoverSpeed::Fast, Some(400), LifecycleStage::Legacy),
        None
    );
    assert_eq!(
        classifier.recommend_disposal(TurnoverSpeed::Medium, Some(400), LifecycleStage::Legacy),
        None
    );

    // 滞销 + 新书退货窗口内 → 退供应商
    assert_eq!(
        classifier.recommend_disposal(TurnoverSpeed::Dead, Some(90), LifecycleStage::NewRelease),
        Some(DisposalStrategy::ReturnToSupplier)
    );

    // 滞销超一年未售出 → 清仓; 从未售出同样清仓
    assert_eq!(
        classifier.recommend_disposal(TurnoverSpeed::Dead, Some(400), LifecycleStage::Backlist),
        Some(DisposalStrategy::Liquidate)
    );
    assert_eq!(
        classifier.recommend_disposal(TurnoverSpeed::Dead, None, LifecycleStage::Legacy),
        Some(DisposalStrategy::Liquidate)
    );

    // 滞销 180~365 天 → 批量外销
    assert_eq!(
        classifier.recommend_disposal(TurnoverSpeed::Dead, Some(200), LifecycleStage::Backlist),
        Some(DisposalStrategy::BulkSale)
    );

    // 滞销不足 180 天 → 店内折扣
    assert_eq!(
        classifier.recommend_disposal(TurnoverSpeed::Dead, Some(60), LifecycleStage::Backlist),
        Some(DisposalStrategy::DiscountSale)
    );

    // 慢销超 180 天 → 店内折扣; 不足则不处置
    assert_eq!(
        classifier.recommend_disposal(TurnoverSpeed::Slow, Some(200), LifecycleStage::Backlist),
        Some(DisposalStrategy::DiscountSale)
    );
    assert_eq!(
        classifier.recommend_disposal(TurnoverSpeed::Slow, Some(30), LifecycleStage::Backlist),
        None
    );
}

#[test]
fn test_turnover_speed_matrix() {
    // Z 列一律 DEAD,其余按 ABC 档位
    assert_eq!(turnover_speed(AbcClass::A, XyzClass::Z), TurnoverSpeed::Dead);
    assert_eq!(turnover_speed(AbcClass::A, XyzClass::X), TurnoverSpeed::Fast);
    assert_eq!(turnover_speed(AbcClass::B, XyzClass::Y), TurnoverSpeed::Medium);
    assert_eq!(turnover_speed(AbcClass::C, XyzClass::X), TurnoverSpeed::Slow);
}
