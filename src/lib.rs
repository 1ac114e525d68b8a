//! # UTXO账本交易接受核心
//!
//! 针对未花费输出池（UTXO池）校验一批候选交易，选出相互一致的子集并更新池。
//!
//! ## 主要模块
//!
//! * `transaction` - 定义交易、输入、输出和UTXO标识
//! * `utxo_pool` - UTXO池
//! * `crypto` - 签名校验
//! * `wallet` - 密钥管理和交易签名
//! * `validation` - 单笔交易校验
//! * `resolver` - 批处理解析（按到达顺序 / 按手续费）
//! * `config` - 解析器配置

pub mod config;
pub mod crypto;
pub mod error;
pub mod resolver;
pub mod transaction;
pub mod utxo_pool;
pub mod validation;
pub mod wallet;

pub use config::{ResolverConfig, StrategyKind};
pub use crypto::{Secp256k1Verifier, SignatureVerifier};
pub use error::{PoolError, ValidationError, WalletError};
pub use resolver::{ArrivalOrder, FeeOrder, MaxFeeTxHandler, OrderingStrategy, Resolver, TxHandler};
pub use transaction::{Amount, Fee, OutPoint, Transaction, TxInput, TxOutput};
pub use utxo_pool::{UtxoEntry, UtxoPool};
pub use wallet::Wallet;
