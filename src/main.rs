//! # 批处理演示程序入口
//!
//! 从JSON文件读取初始UTXO池和候选交易，运行所选的处理器，
//! 输出被接受的交易哈希和处理后的UTXO池。
//!
//! 用法: `utxo_ledger [batch.json]`，不带参数时运行内置演示场景。

use std::env;
use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use utxo_ledger::resolver::apply_transaction;
use utxo_ledger::{
    MaxFeeTxHandler, OutPoint, ResolverConfig, StrategyKind, Transaction, TxHandler, TxOutput,
    UtxoEntry, UtxoPool, Wallet,
};

/// 批处理输入文件格式
#[derive(Debug, Deserialize)]
struct BatchFile {
    #[serde(default)]
    strategy: StrategyKind,
    #[serde(default)]
    config: Option<ResolverConfig>,
    utxos: Vec<UtxoEntry>,
    candidates: Vec<Transaction>,
}

/// 批处理结果
#[derive(Debug, Serialize)]
struct BatchReport {
    strategy: StrategyKind,
    accepted: Vec<String>,
    pool: Vec<UtxoEntry>,
}

fn run_batch(
    strategy: StrategyKind,
    config: Option<ResolverConfig>,
    pool: &UtxoPool,
    candidates: &[Transaction],
) -> BatchReport {
    let (accepted, pool) = match strategy {
        StrategyKind::Greedy => {
            let mut handler = TxHandler::new(pool);
            if let Some(config) = config {
                handler = handler.with_config(config);
            }
            let accepted = handler.handle_txs(candidates);
            (accepted, handler.into_pool())
        }
        StrategyKind::MaxFee => {
            let mut handler = MaxFeeTxHandler::new(pool);
            if let Some(config) = config {
                handler = handler.with_config(config);
            }
            let accepted = handler.handle_txs(candidates);
            (accepted, handler.into_pool())
        }
    };

    BatchReport {
        strategy,
        accepted: accepted.iter().map(Transaction::calculate_hash).collect(),
        pool: pool.to_entries(),
    }
}

fn run_file(path: &str) -> Result<()> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("无法读取批处理文件 {}", path))?;
    let batch: BatchFile =
        serde_json::from_str(&contents).with_context(|| format!("无法解析批处理文件 {}", path))?;

    let pool: UtxoPool = batch.utxos.into_iter().collect();
    let report = run_batch(batch.strategy, batch.config, &pool, &batch.candidates);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// 内置演示：一笔普通支付、一笔与之冲突的双花、一笔依赖同批次输出的交易
fn run_demo() -> Result<()> {
    let alice = Wallet::new();
    let bob = Wallet::new();
    let carol = Wallet::new();
    println!("Alice: {}", alice.address);
    println!("Bob:   {}", bob.address);
    println!("Carol: {}", carol.address);

    let genesis = OutPoint::new("0".repeat(64), 0);
    let mut pool = UtxoPool::new();
    pool.insert(genesis, TxOutput::new(100, alice.public_key));

    let pay_bob = alice.create_transaction(&bob.public_key, 60, 5, &pool)?;
    let double_spend = alice.create_transaction(&carol.public_key, 90, 2, &pool)?;

    let mut after_pay = pool.clone();
    apply_transaction(&mut after_pay, &pay_bob);
    let bob_pays_carol = bob.create_transaction(&carol.public_key, 50, 10, &after_pay)?;

    let candidates = vec![bob_pays_carol, double_spend, pay_bob];
    for strategy in [StrategyKind::Greedy, StrategyKind::MaxFee] {
        let report = run_batch(strategy, None, &pool, &candidates);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    match args.get(1) {
        Some(path) => run_file(path),
        None => run_demo(),
    }
}
