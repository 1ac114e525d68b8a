use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use ripemd::Ripemd160;

use crate::crypto::message_digest;
use crate::error::WalletError;
use crate::transaction::{Amount, Fee, Transaction, TxInput, TxOutput};
use crate::utxo_pool::UtxoPool;

pub struct Wallet {
    pub private_key: SecretKey,
    pub public_key: PublicKey,
    pub address: String,
}

impl Wallet {
    pub fn new() -> Self {
        let secp = Secp256k1::new();
        let mut rng = rand::thread_rng();
        let (secret_key, public_key) = secp.generate_keypair(&mut rng);
        let address = Self::public_key_to_address(&public_key);

        Wallet {
            private_key: secret_key,
            public_key,
            address,
        }
    }

    /// 公钥的简短可读形式，仅用于日志和展示
    pub fn public_key_to_address(public_key: &PublicKey) -> String {
        let sha = Sha256::digest(public_key.serialize());
        hex::encode(Ripemd160::digest(sha))
    }

    /// 用本钱包持有的UTXO构造一笔支付交易并签名
    ///
    /// 按标识顺序选取UTXO直到覆盖 `amount + fee`，多余部分找零给自己。
    pub fn create_transaction(
        &self,
        to: &PublicKey,
        amount: Amount,
        fee: Amount,
        pool: &UtxoPool,
    ) -> Result<Transaction, WalletError> {
        let required = amount as Fee + fee as Fee;
        let mut inputs = Vec::new();
        let mut total_input: Fee = 0;

        for entry in pool.to_entries() {
            if total_input >= required {
                break;
            }
            if entry.output.recipient != self.public_key {
                continue;
            }
            inputs.push(TxInput::unsigned(entry.outpoint.tx_hash, entry.outpoint.index));
            total_input += entry.output.value as Fee;
        }

        if total_input < required {
            return Err(WalletError::InsufficientFunds {
                available: total_input,
                required,
            });
        }

        let mut outputs = vec![TxOutput::new(amount, *to)];
        let change = total_input - required;
        if change > 0 {
            outputs.push(TxOutput::new(change as Amount, self.public_key));
        }

        let mut tx = Transaction::new(inputs, outputs);
        self.sign_all(&mut tx)?;
        Ok(tx)
    }

    /// 对第 `index` 个输入签名
    ///
    /// 签名载荷包含之前输入的签名，所以输入必须按顺序签名。
    pub fn sign_input(&self, tx: &mut Transaction, index: usize) -> Result<(), WalletError> {
        let len = tx.inputs.len();
        if index >= len {
            return Err(WalletError::InputOutOfRange { index, len });
        }

        let secp = Secp256k1::signing_only();
        let message = message_digest(&tx.raw_data_to_sign(index))?;
        let signature = secp.sign_ecdsa(&message, &self.private_key);
        tx.inputs[index].signature = signature.serialize_compact().to_vec();
        Ok(())
    }

    pub fn sign_all(&self, tx: &mut Transaction) -> Result<(), WalletError> {
        for index in 0..tx.inputs.len() {
            self.sign_input(tx, index)?;
        }
        Ok(())
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}
