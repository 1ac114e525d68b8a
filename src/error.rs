//! 错误类型定义

use thiserror::Error;

use crate::transaction::{Amount, Fee, OutPoint};

/// UTXO池操作错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("UTXO不存在: {0}")]
    NotFound(OutPoint),
}

/// 交易校验失败的原因
///
/// 校验失败是预期内的结果：候选交易被拒绝，批处理继续处理下一个候选。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("输入 {index} 引用的UTXO不在池中: {outpoint}")]
    MissingOutput { index: usize, outpoint: OutPoint },

    #[error("输入 {index} 的签名无效")]
    InvalidSignature { index: usize },

    #[error("UTXO被同一交易重复引用: {0}")]
    DuplicateInput(OutPoint),

    #[error("输出 {index} 的金额为负数: {value}")]
    NegativeOutput { index: usize, value: Amount },

    #[error("输入金额不足: 输入 {have}, 输出 {need}")]
    InsufficientInput { have: Fee, need: Fee },
}

/// 钱包构造或签名交易时的错误
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("输入索引越界: {index} (共 {len} 个输入)")]
    InputOutOfRange { index: usize, len: usize },

    #[error("余额不足: 可用 {available}, 需要 {required}")]
    InsufficientFunds { available: Fee, required: Fee },

    #[error("签名失败: {0}")]
    Signing(#[from] secp256k1::Error),
}
