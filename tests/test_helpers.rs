// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的品目、需求序列、快照、候选构造
// ==========================================

#![allow(dead_code)]

use chrono::{Months, NaiveDate};
use retail_inventory_dss::domain::item::{
    first_of_month, DemandObservation, InventorySnapshot, ItemMaster,
};
use retail_inventory_dss::domain::optimization::OrderCandidate;
use retail_inventory_dss::domain::types::StockStatus;

/// 日期快捷构造
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 创建测试用品目
pub fn create_test_item(
    item_id: &str,
    unit_price: f64,
    publish_date: NaiveDate,
) -> ItemMaster {
    ItemMaster {
        item_id: item_id.to_string(),
        title: format!("测试书目-{}", item_id),
        unit_price,
        publish_date,
    }
}

/// 由销量数组构造月度需求序列
///
/// 数组末位对应 as_of 前一个月,向前逐月回溯
pub fn history_from_quantities(
    item_id: &str,
    as_of: NaiveDate,
    quantities: &[i64],
) -> Vec<DemandObservation> {
    let end = first_of_month(as_of);
    let n = quantities.len() as u32;
    quantities
        .iter()
        .enumerate()
        .map(|(i, &qty)| {
            let month = end
                .checked_sub_months(Months::new(n - i as u32))
                .unwrap();
            DemandObservation::new(item_id, month, qty)
        })
        .collect()
}

/// 恒定月销量序列
pub fn constant_history(
    item_id: &str,
    as_of: NaiveDate,
    months: u32,
    quantity: i64,
) -> Vec<DemandObservation> {
    let quantities: Vec<i64> = (0..months).map(|_| quantity).collect();
    history_from_quantities(item_id, as_of, &quantities)
}

/// 创建测试用现货快照
pub fn create_test_snapshot(
    item_id: &str,
    store_qty: i64,
    warehouse_qty: i64,
    last_sold_date: Option<NaiveDate>,
) -> InventorySnapshot {
    InventorySnapshot {
        item_id: item_id.to_string(),
        store_qty,
        warehouse_qty,
        last_sold_date,
    }
}

/// 创建测试用采购候选
pub fn create_test_candidate(
    item_id: &str,
    status: StockStatus,
    order_qty: i64,
    unit_cost: f64,
    unit_revenue: f64,
) -> OrderCandidate {
    OrderCandidate {
        item_id: item_id.to_string(),
        title: format!("测试书目-{}", item_id),
        status,
        order_qty,
        unit_cost,
        unit_revenue,
        weight_per_unit: 1.0,
        obsolescence_factor: 1.0,
        seasonality_factor: 1.0,
    }
}
