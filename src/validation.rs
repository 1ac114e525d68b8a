//! # 单笔交易校验
//!
//! 针对某一时刻的UTXO池快照判断交易是否可被接受。按顺序检查，遇到第一个失败即返回：
//!
//! 1. 每个输入引用的UTXO都在池中
//! 2. 每个输入的签名对被引用输出的接收者公钥有效
//! 3. 同一交易没有重复引用同一个UTXO
//! 4. 所有输出金额非负
//! 5. 输入金额总和不小于输出金额总和
//!
//! 校验从不修改池。

use std::collections::HashSet;

use crate::crypto::SignatureVerifier;
use crate::error::ValidationError;
use crate::transaction::{Fee, Transaction};
use crate::utxo_pool::UtxoPool;

/// 校验交易，成功时返回手续费（输入总额减去输出总额）
pub fn validate<V>(pool: &UtxoPool, tx: &Transaction, verifier: &V) -> Result<Fee, ValidationError>
where
    V: SignatureVerifier + ?Sized,
{
    let mut claimed = HashSet::with_capacity(tx.inputs.len());
    let mut total_input: Fee = 0;

    for (index, input) in tx.inputs.iter().enumerate() {
        let outpoint = input.outpoint();
        let spent = pool
            .get(&outpoint)
            .map_err(|_| ValidationError::MissingOutput {
                index,
                outpoint: outpoint.clone(),
            })?;

        let message = tx.raw_data_to_sign(index);
        if !verifier.verify(&spent.recipient, &message, &input.signature) {
            return Err(ValidationError::InvalidSignature { index });
        }

        if !claimed.insert(outpoint.clone()) {
            return Err(ValidationError::DuplicateInput(outpoint));
        }

        total_input += spent.value as Fee;
    }

    let mut total_output: Fee = 0;
    for (index, output) in tx.outputs.iter().enumerate() {
        if output.value < 0 {
            return Err(ValidationError::NegativeOutput {
                index,
                value: output.value,
            });
        }
        total_output += output.value as Fee;
    }

    if total_input < total_output {
        return Err(ValidationError::InsufficientInput {
            have: total_input,
            need: total_output,
        });
    }

    Ok(total_input - total_output)
}

pub fn is_valid<V>(pool: &UtxoPool, tx: &Transaction, verifier: &V) -> bool
where
    V: SignatureVerifier + ?Sized,
{
    validate(pool, tx, verifier).is_ok()
}
