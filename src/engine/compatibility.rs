// ==========================================
// 层压排产引擎 - 模具兼容性解析
// ==========================================
// 职责: 判定哪些启用模具可生产指定产品族
// 红线: 产品族缺失/为空时不匹配任何模具（防止误判为通用）
// ==========================================

use crate::domain::capacity::ResourcePool;

// ==========================================
// CompatibilityResolver - 兼容性解析器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CompatibilityResolver {
    // 无状态引擎
}

impl CompatibilityResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 单个模具是否可生产指定产品族
    ///
    /// 顺序（命中即返回）:
    /// 1) 模具未启用 → 否
    /// 2) 产品族为空/空白 → 否
    /// 3) 通用模具 → 是
    /// 4) 逐字匹配 → 是
    /// 5) 规范化匹配（小写、去除 `_`/`-`）→ 是
    ///
    /// 匹配使用原始产品族，不做 trim。
    pub fn is_compatible(&self, family: &str, resource: &ResourcePool) -> bool {
        resource.enabled
            && !family.trim().is_empty()
            && resource.compatibility.accepts(family)
    }

    /// 返回兼容模具在输入列表中的下标（保持输入顺序）
    pub fn compatible_indices(&self, family: Option<&str>, resources: &[ResourcePool]) -> Vec<usize> {
        let Some(family) = family else {
            return Vec::new();
        };

        resources
            .iter()
            .enumerate()
            .filter(|(_, r)| self.is_compatible(family, r))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// 返回兼容且启用的模具（保持输入顺序）
    pub fn resolve<'a>(&self, family: Option<&str>, resources: &'a [ResourcePool]) -> Vec<&'a ResourcePool> {
        self.compatible_indices(family, resources)
            .into_iter()
            .map(|idx| &resources[idx])
            .collect()
    }
}
