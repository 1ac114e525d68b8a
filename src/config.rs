use serde::{Deserialize, Serialize};

/// 批处理解析器配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// 对尚未接受的候选交易执行"校验并应用"的最大轮数
    ///
    /// 为1时只扫描一遍。大于1时，后续轮次会重试之前被拒绝的候选，
    /// 以便接受依赖同批次其他交易输出的交易。某一轮没有接受任何交易时提前结束，
    /// 实际轮数不会超过候选交易数量。
    pub max_passes: usize,
}

impl ResolverConfig {
    pub fn single_pass() -> Self {
        ResolverConfig { max_passes: 1 }
    }

    pub fn fixed_point() -> Self {
        ResolverConfig {
            max_passes: usize::MAX,
        }
    }

    /// 针对给定批次大小的实际轮数上限
    pub fn pass_limit(&self, batch_size: usize) -> usize {
        self.max_passes.clamp(1, batch_size.max(1))
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::single_pass()
    }
}

/// 候选交易排序策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// 按到达顺序
    #[default]
    Greedy,
    /// 按表观手续费从高到低
    MaxFee,
}
