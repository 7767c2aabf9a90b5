// ==========================================
// 图书零售库存决策支持系统 - 预测领域模型
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 3. Forecast Engine
// ==========================================

use crate::domain::types::ForecastAlgorithm;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// DemandForecast - 单算法需求预测
// ==========================================
// 不可变记录; 同 (item, algorithm, forecast_date) 键以新一轮运行覆盖旧值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandForecast {
    pub item_id: String,                // 关联品目
    pub forecast_date: NaiveDate,       // 预测基准日期 (as_of)
    pub algorithm: ForecastAlgorithm,   // 产出算法
    pub horizon_months: u32,            // 预测展望期 (月)
    pub predicted_demand: i64,          // 预测需求量 (册, 恒 ≥ 1)
    pub confidence: f64,                // 置信度 (0~1, 按算法固定)
    pub created_at: DateTime<Utc>,      // 生成时间
}

impl DemandForecast {
    /// 覆盖键: 同键的新一轮预测取代旧值
    pub fn supersede_key(&self) -> (String, ForecastAlgorithm, NaiveDate) {
        (self.item_id.clone(), self.algorithm, self.forecast_date)
    }
}

// ==========================================
// ForecastAccuracy - 算法回测精度
// ==========================================
// 窗口内无预测时返回哨兵值: MAE=0, RMSE=0, MAPE=100
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastAccuracy {
    pub algorithm: ForecastAlgorithm, // 被评估算法
    pub mae: f64,                     // 平均绝对误差
    pub mape: f64,                    // 平均绝对百分比误差 (%)
    pub rmse: f64,                    // 均方根误差
    pub from_date: NaiveDate,         // 评估窗口起 (含)
    pub to_date: NaiveDate,           // 评估窗口止 (含)
    pub sample_count: usize,          // 参与比对的 (预测, 实际) 对数
}

impl ForecastAccuracy {
    /// 无样本哨兵: 窗口内不存在可比对预测
    pub fn empty_window(
        algorithm: ForecastAlgorithm,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Self {
        Self {
            algorithm,
            mae: 0.0,
            mape: 100.0,
            rmse: 0.0,
            from_date,
            to_date,
            sample_count: 0,
        }
    }
}
