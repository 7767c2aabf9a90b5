// ==========================================
// 图书零售库存决策支持系统 - 分类领域模型
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 4. Demand Classifier
// 不变量: 单次运行内 sales_contribution_pct 之和为 100
// ==========================================

use crate::domain::types::{AbcClass, TurnoverSpeed, XyzClass};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// ItemClassification - ABC×XYZ 分类记录
// ==========================================
// 每个分析日期整体重算,不做增量更新
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemClassification {
    pub item_id: String,              // 关联品目
    pub abc: AbcClass,                // 销售贡献分类
    pub xyz: XyzClass,                // 波动性分类
    pub sales_contribution_pct: f64,  // 销售贡献百分比 (0~100, 4位小数)
    pub demand_cv: f64,               // 月需求变异系数 (≥0)
    pub analysis_date: NaiveDate,     // 分析基准日期
}

impl ItemClassification {
    /// ABC×XYZ 组合标签 (如 "AX")
    pub fn matrix_label(&self) -> String {
        format!("{}{}", self.abc, self.xyz)
    }

    /// 组合映射出的周转速度
    pub fn turnover_speed(&self) -> TurnoverSpeed {
        turnover_speed(self.abc, self.xyz)
    }
}

/// ABC×XYZ → 周转速度映射
///
/// AX/AY→FAST, BX/BY→MEDIUM, CX/CY→SLOW, 所有 Z 列→DEAD
pub fn turnover_speed(abc: AbcClass, xyz: XyzClass) -> TurnoverSpeed {
    if xyz == XyzClass::Z {
        return TurnoverSpeed::Dead;
    }
    match abc {
        AbcClass::A => TurnoverSpeed::Fast,
        AbcClass::B => TurnoverSpeed::Medium,
        AbcClass::C => TurnoverSpeed::Slow,
    }
}

// ==========================================
// ClassificationMatrix - 9 宫格分组视图
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationMatrix {
    /// 键为组合标签 ("AX".."CZ"),值为该组分类记录
    pub groups: HashMap<String, Vec<ItemClassification>>,
}

impl ClassificationMatrix {
    /// 按 9 个 ABC×XYZ 组合分组 (空组合不占键)
    pub fn from_classifications(records: &[ItemClassification]) -> Self {
        let mut groups: HashMap<String, Vec<ItemClassification>> = HashMap::new();
        for record in records {
            groups
                .entry(record.matrix_label())
                .or_default()
                .push(record.clone());
        }
        Self { groups }
    }

    /// 某组合下的品目数量
    pub fn count(&self, label: &str) -> usize {
        self.groups.get(label).map(|g| g.len()).unwrap_or(0)
    }
}
