// ==========================================
// 图书零售库存决策支持系统 - 内存协作方实现
// ==========================================
// 职责: 面向测试与内嵌场景的内存数据协作方
// 说明: 数据装载完成后只读,跨任务以 Arc 共享
// ==========================================

use crate::domain::item::{DemandObservation, InventorySnapshot, ItemMaster};
use crate::provider::error::{ProviderError, ProviderResult};
use crate::provider::{CatalogProvider, DemandHistoryProvider, InventoryProvider};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

// ==========================================
// InMemoryCatalog - 内存目录
// ==========================================
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: HashMap<String, ItemMaster>,
}

impl InMemoryCatalog {
    pub fn new(items: Vec<ItemMaster>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|item| (item.item_id.clone(), item))
                .collect(),
        }
    }

    pub fn insert(&mut self, item: ItemMaster) {
        self.items.insert(item.item_id.clone(), item);
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalog {
    async fn get_item(&self, item_id: &str) -> ProviderResult<ItemMaster> {
        self.items
            .get(item_id)
            .cloned()
            .ok_or_else(|| ProviderError::item_not_found(item_id))
    }

    async fn list_items(&self) -> ProviderResult<Vec<ItemMaster>> {
        let mut items: Vec<ItemMaster> = self.items.values().cloned().collect();
        // 稳定输出顺序,保证同输入同结果
        items.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        Ok(items)
    }
}

// ==========================================
// InMemoryDemandHistory - 内存需求历史
// ==========================================
#[derive(Debug, Default)]
pub struct InMemoryDemandHistory {
    series: HashMap<String, Vec<DemandObservation>>,
}

impl InMemoryDemandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加观测 (保持按月升序)
    pub fn push(&mut self, obs: DemandObservation) {
        let series = self.series.entry(obs.item_id.clone()).or_default();
        series.push(obs);
        series.sort_by_key(|o| o.month);
    }

    /// 批量装载一个品目的序列
    pub fn load_series(&mut self, item_id: &str, observations: Vec<DemandObservation>) {
        let series = self.series.entry(item_id.to_string()).or_default();
        series.extend(observations);
        series.sort_by_key(|o| o.month);
    }
}

#[async_trait]
impl DemandHistoryProvider for InMemoryDemandHistory {
    async fn monthly_demand(
        &self,
        item_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ProviderResult<Vec<DemandObservation>> {
        Ok(self
            .series
            .get(item_id)
            .map(|series| {
                series
                    .iter()
                    .filter(|obs| obs.month >= from && obs.month <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

// ==========================================
// InMemoryInventory - 内存现货快照
// ==========================================
#[derive(Debug, Default)]
pub struct InMemoryInventory {
    snapshots: HashMap<String, InventorySnapshot>,
}

impl InMemoryInventory {
    pub fn new(snapshots: Vec<InventorySnapshot>) -> Self {
        Self {
            snapshots: snapshots
                .into_iter()
                .map(|s| (s.item_id.clone(), s))
                .collect(),
        }
    }

    pub fn insert(&mut self, snapshot: InventorySnapshot) {
        self.snapshots.insert(snapshot.item_id.clone(), snapshot);
    }
}

#[async_trait]
impl InventoryProvider for InMemoryInventory {
    async fn snapshot(&self, item_id: &str) -> ProviderResult<InventorySnapshot> {
        self.snapshots
            .get(item_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                entity: "InventorySnapshot".to_string(),
                id: item_id.to_string(),
            })
    }
}
