// ==========================================
// 图书零售库存决策支持系统 - 数据协作方接口
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 9. 外部协作方契约
// 职责: 定义核心引擎消费的外部数据接口 (不包含实现细节)
// 红线: 目录/历史/库存数据由协作方拥有,引擎层只读
// ==========================================

pub mod error;
pub mod memory;

pub use error::{ProviderError, ProviderResult};
pub use memory::{InMemoryCatalog, InMemoryDemandHistory, InMemoryInventory};

use crate::domain::item::{DemandObservation, InventorySnapshot, ItemMaster};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

// ==========================================
// CatalogProvider - 目录查询
// ==========================================
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// 按品目 ID 查询主数据
    ///
    /// # 返回
    /// - Ok(ItemMaster): 品目主数据
    /// - Err(ProviderError::NotFound): 未知品目
    async fn get_item(&self, item_id: &str) -> ProviderResult<ItemMaster>;

    /// 列出全部在售品目
    async fn list_items(&self) -> ProviderResult<Vec<ItemMaster>>;
}

// ==========================================
// DemandHistoryProvider - 历史需求查询
// ==========================================
#[async_trait]
pub trait DemandHistoryProvider: Send + Sync {
    /// 查询品目在 [from, to] 内的月度需求序列
    ///
    /// # 返回
    /// 按月升序的观测序列; 可能为空
    async fn monthly_demand(
        &self,
        item_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ProviderResult<Vec<DemandObservation>>;
}

// ==========================================
// InventoryProvider - 现货快照查询
// ==========================================
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    /// 查询品目当前现货 (门店 + 仓库) 与最近售出日期
    async fn snapshot(&self, item_id: &str) -> ProviderResult<InventorySnapshot>;
}

// ==========================================
// AnalysisProviders - 协作方集合
// ==========================================

/// 分析引擎协作方集合
///
/// 聚合引擎所需的全部数据协作方,简化依赖注入。
///
/// # 包含的协作方
/// - `catalog`: 目录查询
/// - `demand`: 历史需求查询
/// - `inventory`: 现货快照查询
#[derive(Clone)]
pub struct AnalysisProviders {
    pub catalog: Arc<dyn CatalogProvider>,
    pub demand: Arc<dyn DemandHistoryProvider>,
    pub inventory: Arc<dyn InventoryProvider>,
}

impl AnalysisProviders {
    /// 创建新的协作方集合
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        demand: Arc<dyn DemandHistoryProvider>,
        inventory: Arc<dyn InventoryProvider>,
    ) -> Self {
        Self {
            catalog,
            demand,
            inventory,
        }
    }
}
