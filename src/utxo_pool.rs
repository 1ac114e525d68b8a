use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::transaction::{Amount, Fee, OutPoint, TxOutput};

/// 未花费交易输出池，以 (交易哈希, 输出索引) 为键
///
/// 池本身不做持久化和并发控制。`Clone` 产生完全独立的副本。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtxoPool {
    utxos: HashMap<OutPoint, TxOutput>,
}

/// 序列化时使用的池条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtxoEntry {
    pub outpoint: OutPoint,
    pub output: TxOutput,
}

impl UtxoPool {
    pub fn new() -> Self {
        UtxoPool {
            utxos: HashMap::new(),
        }
    }

    pub fn contains(&self, outpoint: &OutPoint) -> bool {
        self.utxos.contains_key(outpoint)
    }

    pub fn get(&self, outpoint: &OutPoint) -> Result<&TxOutput, PoolError> {
        self.utxos
            .get(outpoint)
            .ok_or_else(|| PoolError::NotFound(outpoint.clone()))
    }

    /// 插入UTXO，已存在时覆盖并返回旧记录
    pub fn insert(&mut self, outpoint: OutPoint, output: TxOutput) -> Option<TxOutput> {
        self.utxos.insert(outpoint, output)
    }

    pub fn remove(&mut self, outpoint: &OutPoint) -> Option<TxOutput> {
        self.utxos.remove(outpoint)
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OutPoint, &TxOutput)> {
        self.utxos.iter()
    }

    /// 池中所有UTXO的金额总和
    pub fn total_value(&self) -> Fee {
        self.utxos.values().map(|output| output.value as Fee).sum()
    }

    /// 按标识排序后导出，输出顺序确定
    pub fn to_entries(&self) -> Vec<UtxoEntry> {
        let mut entries: Vec<UtxoEntry> = self
            .utxos
            .iter()
            .map(|(outpoint, output)| UtxoEntry {
                outpoint: outpoint.clone(),
                output: output.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.outpoint.cmp(&b.outpoint));
        entries
    }

    pub fn value_of(&self, outpoint: &OutPoint) -> Option<Amount> {
        self.utxos.get(outpoint).map(|output| output.value)
    }
}

impl FromIterator<(OutPoint, TxOutput)> for UtxoPool {
    fn from_iter<I: IntoIterator<Item = (OutPoint, TxOutput)>>(iter: I) -> Self {
        UtxoPool {
            utxos: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<UtxoEntry> for UtxoPool {
    fn from_iter<I: IntoIterator<Item = UtxoEntry>>(iter: I) -> Self {
        iter.into_iter()
            .map(|entry| (entry.outpoint, entry.output))
            .collect()
    }
}
