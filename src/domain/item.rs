// ==========================================
// 图书零售库存决策支持系统 - 品目领域模型
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 1. 数据模型
// 红线: 品目主数据由目录协作方拥有,引擎层只读
// ==========================================

use crate::domain::types::LifecycleStage;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

// ==========================================
// ItemMaster - 品目主数据
// ==========================================
// 用途: 目录协作方提供,引擎层只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemMaster {
    // ===== 主键 =====
    pub item_id: String, // 品目唯一标识 (ISBN 或内部编码)

    // ===== 基础信息 =====
    pub title: String,          // 展示标题
    pub unit_price: f64,        // 单册售价 (元)
    pub publish_date: NaiveDate, // 出版日期 (驱动陈旧度与退货窗口)
}

impl ItemMaster {
    /// 出版时长 (整年,向下取整)
    pub fn publish_age_years(&self, as_of: NaiveDate) -> i32 {
        let mut years = as_of.year() - self.publish_date.year();
        if (as_of.month(), as_of.day()) < (self.publish_date.month(), self.publish_date.day()) {
            years -= 1;
        }
        years.max(0)
    }

    /// 是否在出版后一年内 (新书判定)
    pub fn published_within_last_year(&self, as_of: NaiveDate) -> bool {
        self.publish_age_years(as_of) < 1
    }

    /// 生命周期阶段
    pub fn lifecycle_stage(&self, as_of: NaiveDate) -> LifecycleStage {
        let years = self.publish_age_years(as_of);
        if years < 1 {
            LifecycleStage::NewRelease
        } else if years < 5 {
            LifecycleStage::Backlist
        } else {
            LifecycleStage::Legacy
        }
    }
}

// ==========================================
// DemandObservation - 月度需求观测
// ==========================================
// 用途: 历史需求协作方提供,所有统计量的唯一来源
// 约定: month 恒为该月首日,序列按月升序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandObservation {
    pub item_id: String,   // 关联品目
    pub month: NaiveDate,  // 日历月 (该月首日)
    pub quantity: i64,     // 当月销量 (册, ≥0)
}

impl DemandObservation {
    pub fn new(item_id: impl Into<String>, month: NaiveDate, quantity: i64) -> Self {
        Self {
            item_id: item_id.into(),
            month: first_of_month(month),
            quantity,
        }
    }
}

/// 归一化为该月首日
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// 截取 [as_of - window_months, as_of) 的尾部观测窗口
///
/// 观测序列按月升序; 窗口不含 as_of 当月 (当月尚未完结)。
pub fn trailing_window(
    history: &[DemandObservation],
    as_of: NaiveDate,
    window_months: u32,
) -> Vec<&DemandObservation> {
    let end = first_of_month(as_of);
    let start = end
        .checked_sub_months(Months::new(window_months))
        .unwrap_or(end);

    history
        .iter()
        .filter(|obs| obs.month >= start && obs.month < end)
        .collect()
}

// ==========================================
// InventorySnapshot - 现货快照
// ==========================================
// 用途: 库存协作方提供 (门店 + 仓库)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub item_id: String,                    // 关联品目
    pub store_qty: i64,                     // 门店现货 (册)
    pub warehouse_qty: i64,                 // 仓库现货 (册)
    pub last_sold_date: Option<NaiveDate>,  // 最近售出日期 (None=从未售出)
}

impl InventorySnapshot {
    /// 总现货 (门店 + 仓库)
    pub fn on_hand(&self) -> i64 {
        self.store_qty + self.warehouse_qty
    }

    /// 距最近售出的天数 (从未售出按快照视角返回 None)
    pub fn days_since_last_sale(&self, as_of: NaiveDate) -> Option<i64> {
        self.last_sold_date
            .map(|d| (as_of - d).num_days().max(0))
    }
}
