//! # 批处理解析器
//!
//! 从一批无序、可能相互冲突的候选交易中选出一致的子集，并把它应用到UTXO池。
//!
//! 两种处理器共享同一个"校验并应用"过程，区别只在候选交易的排序策略：
//!
//! * [`TxHandler`] - 按到达顺序
//! * [`MaxFeeTxHandler`] - 按表观手续费从高到低，近似最大化手续费收入

use log::{debug, info};

use crate::config::ResolverConfig;
use crate::crypto::{Secp256k1Verifier, SignatureVerifier};
use crate::error::ValidationError;
use crate::transaction::{Fee, Transaction};
use crate::utxo_pool::UtxoPool;
use crate::validation;

/// 候选交易排序策略
pub trait OrderingStrategy {
    /// 对剩余候选排序。`pool` 为本轮开始时的池状态
    fn order<'a>(&self, pool: &UtxoPool, candidates: Vec<&'a Transaction>) -> Vec<&'a Transaction>;

    fn default_config(&self) -> ResolverConfig {
        ResolverConfig::single_pass()
    }
}

/// 保持到达顺序
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrivalOrder;

impl OrderingStrategy for ArrivalOrder {
    fn order<'a>(&self, _pool: &UtxoPool, candidates: Vec<&'a Transaction>) -> Vec<&'a Transaction> {
        candidates
    }
}

/// 按表观手续费降序排列，手续费相同时保持原有相对顺序
///
/// 手续费在每轮开始时针对当前池一次性计算，轮内不随池的变化重新计算。
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeOrder;

impl OrderingStrategy for FeeOrder {
    fn order<'a>(&self, pool: &UtxoPool, candidates: Vec<&'a Transaction>) -> Vec<&'a Transaction> {
        let mut ranked: Vec<(Fee, &'a Transaction)> = candidates
            .into_iter()
            .map(|tx| (tx.fee_against(pool), tx))
            .collect();
        // sort_by 是稳定排序
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked.into_iter().map(|(_, tx)| tx).collect()
    }

    fn default_config(&self) -> ResolverConfig {
        ResolverConfig::fixed_point()
    }
}

/// 批处理解析器，独占一个UTXO池副本
pub struct Resolver<S, V = Secp256k1Verifier> {
    pool: UtxoPool,
    strategy: S,
    verifier: V,
    config: ResolverConfig,
}

/// 按到达顺序接受交易的处理器
pub type TxHandler = Resolver<ArrivalOrder>;

/// 按表观手续费排序接受交易的处理器
pub type MaxFeeTxHandler = Resolver<FeeOrder>;

impl<S> Resolver<S, Secp256k1Verifier>
where
    S: OrderingStrategy + Default,
{
    /// 以 `pool` 的独立副本创建处理器，调用方的池不会被修改
    pub fn new(pool: &UtxoPool) -> Self {
        Self::with_verifier(pool, Secp256k1Verifier::new())
    }
}

impl<S, V> Resolver<S, V>
where
    S: OrderingStrategy + Default,
    V: SignatureVerifier,
{
    pub fn with_verifier(pool: &UtxoPool, verifier: V) -> Self {
        let strategy = S::default();
        let config = strategy.default_config();
        Self::with_parts(pool, strategy, verifier, config)
    }
}

impl<S, V> Resolver<S, V>
where
    S: OrderingStrategy,
    V: SignatureVerifier,
{
    pub fn with_parts(pool: &UtxoPool, strategy: S, verifier: V, config: ResolverConfig) -> Self {
        Resolver {
            pool: pool.clone(),
            strategy,
            verifier,
            config,
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn pool(&self) -> &UtxoPool {
        &self.pool
    }

    pub fn into_pool(self) -> UtxoPool {
        self.pool
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// 针对当前池校验交易
    pub fn validate_tx(&self, tx: &Transaction) -> Result<Fee, ValidationError> {
        validation::validate(&self.pool, tx, &self.verifier)
    }

    pub fn is_valid_tx(&self, tx: &Transaction) -> bool {
        self.validate_tx(tx).is_ok()
    }

    /// 处理一个周期的候选交易
    ///
    /// 返回按接受顺序排列的交易，池随之推进到批处理之后的状态。
    /// 每笔交易都针对当前池校验，接受后立即应用，再处理下一笔，
    /// 所以花费同一UTXO的两笔交易最多只有一笔被接受。
    pub fn handle_txs(&mut self, candidates: &[Transaction]) -> Vec<Transaction> {
        let passes = self.config.pass_limit(candidates.len());
        let mut pending: Vec<&Transaction> = candidates.iter().collect();
        let mut accepted: Vec<&Transaction> = Vec::with_capacity(candidates.len());
        let mut total_fee: Fee = 0;

        for pass in 0..passes {
            let ordered = self.strategy.order(&self.pool, pending);
            let (admitted, rejected) = ordered.into_iter().fold(
                (Vec::new(), Vec::new()),
                |(mut admitted, mut rejected), tx| {
                    match self.admit(tx) {
                        Ok(fee) => {
                            total_fee += fee;
                            admitted.push(tx);
                        }
                        Err(e) => {
                            debug!("第 {} 轮拒绝交易 {}: {}", pass + 1, tx.calculate_hash(), e);
                            rejected.push(tx);
                        }
                    }
                    (admitted, rejected)
                },
            );

            let progressed = !admitted.is_empty();
            accepted.extend(admitted);
            pending = rejected;
            if !progressed || pending.is_empty() {
                break;
            }
        }

        info!(
            "批处理完成: 候选 {} 笔, 接受 {} 笔, 拒绝 {} 笔, 手续费 {}, 池中剩余UTXO {} 个",
            candidates.len(),
            accepted.len(),
            pending.len(),
            total_fee,
            self.pool.len()
        );

        accepted.into_iter().cloned().collect()
    }

    /// 校验通过则应用到池，否则池保持不变
    fn admit(&mut self, tx: &Transaction) -> Result<Fee, ValidationError> {
        let fee = self.validate_tx(tx)?;
        apply_transaction(&mut self.pool, tx);
        Ok(fee)
    }
}

/// 把已通过校验的交易应用到池：移除被花费的UTXO，加入新产生的输出
///
/// # Panics
///
/// 被花费的UTXO不在池中时panic。只应对刚通过校验的交易调用。
pub fn apply_transaction(pool: &mut UtxoPool, tx: &Transaction) {
    for input in &tx.inputs {
        let outpoint = input.outpoint();
        let removed = pool.remove(&outpoint);
        assert!(removed.is_some(), "spent output {} missing from pool", outpoint);
    }

    for (outpoint, output) in tx.output_points() {
        pool.insert(outpoint, output.clone());
    }
}
