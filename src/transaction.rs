//! # 交易模块
//!
//! 定义交易、交易输入、交易输出以及UTXO标识（`OutPoint`）。
//!
//! 交易哈希和签名载荷都由交易字段确定性地重新计算，不单独存储。

use std::fmt::{Display, Formatter};

use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::utxo_pool::UtxoPool;

/// 金额类型。使用有符号整数，以便负数输出能够被表示并被校验拒绝
pub type Amount = i64;

/// 金额求和与手续费使用的类型，足以容纳任意多个 `Amount` 相加而不溢出
pub type Fee = i128;

/// UTXO标识：产生该输出的交易哈希和输出索引
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutPoint {
    /// 产生该输出的交易哈希（16进制字符串）
    pub tx_hash: String,
    /// 输出在交易中的索引
    pub index: u32,
}

impl OutPoint {
    pub fn new(tx_hash: impl Into<String>, index: u32) -> Self {
        OutPoint {
            tx_hash: tx_hash.into(),
            index,
        }
    }
}

impl Display for OutPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.tx_hash, self.index)
    }
}

/// 交易输入，引用之前交易的输出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// 前一个交易的哈希
    pub prev_tx: String,
    /// 前一个交易中输出的索引
    pub prev_index: u32,
    /// 对该输入签名载荷的签名（64字节紧凑格式）
    #[serde(with = "hex::serde", default)]
    pub signature: Vec<u8>,
}

impl TxInput {
    /// 创建尚未签名的输入
    pub fn unsigned(prev_tx: impl Into<String>, prev_index: u32) -> Self {
        TxInput {
            prev_tx: prev_tx.into(),
            prev_index,
            signature: Vec::new(),
        }
    }

    pub fn outpoint(&self) -> OutPoint {
        OutPoint::new(self.prev_tx.clone(), self.prev_index)
    }
}

/// 交易输出：金额和接收者的公钥
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub value: Amount,
    pub recipient: PublicKey,
}

impl TxOutput {
    pub fn new(value: Amount, recipient: PublicKey) -> Self {
        TxOutput { value, recipient }
    }
}

/// 交易结构，包含交易输入和输出列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// 交易输入列表，表示花费的UTXO
    pub inputs: Vec<TxInput>,
    /// 交易输出列表，表示创建的新UTXO
    pub outputs: Vec<TxOutput>,
}

/// 参与哈希和签名载荷编码的输入视图，签名可以省略
#[derive(Serialize)]
struct EncodedInput<'a> {
    prev_tx: &'a str,
    prev_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
}

#[derive(Serialize)]
struct Encoding<'a> {
    inputs: Vec<EncodedInput<'a>>,
    outputs: &'a [TxOutput],
}

impl Transaction {
    pub fn new(inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Self {
        Transaction { inputs, outputs }
    }

    /// 计算交易哈希
    ///
    /// 哈希覆盖所有输入的引用和所有输出，但不包含任何签名，
    /// 因此签名前后的交易哈希保持一致。
    pub fn calculate_hash(&self) -> String {
        let encoding = Encoding {
            inputs: self
                .inputs
                .iter()
                .map(|input| EncodedInput {
                    prev_tx: &input.prev_tx,
                    prev_index: input.prev_index,
                    signature: None,
                })
                .collect(),
            outputs: &self.outputs,
        };
        let mut hasher = Sha256::new();
        hasher.update(encode(&encoding));
        hex::encode(hasher.finalize())
    }

    /// 返回第 `index` 个输入需要签名的原始数据
    ///
    /// 载荷包含：索引之前的输入（含其签名）、当前输入的引用（不含签名），
    /// 以及全部输出。索引之后的输入不参与签名。
    pub fn raw_data_to_sign(&self, index: usize) -> Vec<u8> {
        let inputs = self
            .inputs
            .iter()
            .take(index.saturating_add(1))
            .enumerate()
            .map(|(i, input)| EncodedInput {
                prev_tx: &input.prev_tx,
                prev_index: input.prev_index,
                signature: (i < index).then(|| hex::encode(&input.signature)),
            })
            .collect();
        encode(&Encoding {
            inputs,
            outputs: &self.outputs,
        })
    }

    /// 该交易的输出对应的新UTXO标识
    pub fn output_points(&self) -> impl Iterator<Item = (OutPoint, &TxOutput)> + '_ {
        let hash = self.calculate_hash();
        self.outputs
            .iter()
            .enumerate()
            .map(move |(index, output)| (OutPoint::new(hash.clone(), index as u32), output))
    }

    /// 输出金额总和，溢出时返回 `None`
    pub fn total_output_value(&self) -> Option<Amount> {
        self.outputs
            .iter()
            .try_fold(0 as Amount, |acc, output| acc.checked_add(output.value))
    }

    /// 按给定UTXO池计算的表观手续费
    ///
    /// 不在池中的输入按0计算，因此依赖尚未确认输出的交易可能得到负值。
    pub fn fee_against(&self, pool: &UtxoPool) -> Fee {
        let inputs: Fee = self
            .inputs
            .iter()
            .filter_map(|input| pool.get(&input.outpoint()).ok())
            .map(|output| output.value as Fee)
            .sum();
        let outputs: Fee = self.outputs.iter().map(|output| output.value as Fee).sum();
        inputs - outputs
    }
}

fn encode<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value)
        .expect("transaction encoding only contains strings, integers and public keys")
}
