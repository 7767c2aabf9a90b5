// ==========================================
// 图书零售库存决策支持系统 - 分析结果缓存
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 7.3 结果缓存
// ==========================================
// 职责: 请求指纹 → (结果, 过期时刻) 的内存缓存, TTL 按报告类型
// 约定: 同键并发写以后写为准; 结果对同输入幂等,读到临期值无害
// 说明: 不做并发去重 (single-flight),同键并发未命中可能重复计算
// ==========================================

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;

struct CacheEntry<T> {
    value: Arc<T>,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

// ==========================================
// AnalysisCache - 键值 TTL 缓存
// ==========================================
pub struct AnalysisCache<T> {
    store: RwLock<HashMap<String, CacheEntry<T>>>,
}

impl<T> AnalysisCache<T> {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// 查询缓存 (命中过期项时顺手移除并按未命中处理)
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        {
            let store = self.store.read().expect("缓存读锁中毒");
            if let Some(entry) = store.get(key) {
                if !entry.is_expired() {
                    return Some(entry.value.clone());
                }
            } else {
                return None;
            }
        }

        // 过期项: 升级为写锁移除
        let mut store = self.store.write().expect("缓存写锁中毒");
        store.remove(key);
        debug!(key, "缓存项已过期,移除");
        None
    }

    /// 写入缓存,返回共享句柄 (同键后写覆盖先写)
    pub fn put(&self, key: impl Into<String>, value: T, ttl: Duration) -> Arc<T> {
        let value = Arc::new(value);
        let entry = CacheEntry {
            value: value.clone(),
            expires_at: Instant::now() + ttl,
        };
        let mut store = self.store.write().expect("缓存写锁中毒");
        store.insert(key.into(), entry);
        value
    }

    /// 清理全部过期项
    pub fn purge_expired(&self) {
        let mut store = self.store.write().expect("缓存写锁中毒");
        store.retain(|_, entry| !entry.is_expired());
    }

    /// 当前缓存项数量 (含未清理的过期项)
    pub fn len(&self) -> usize {
        self.store.read().expect("缓存读锁中毒").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清空缓存
    pub fn clear(&self) {
        self.store.write().expect("缓存写锁中毒").clear();
    }
}

impl<T> Default for AnalysisCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
