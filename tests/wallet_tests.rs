use utxo_ledger::crypto::{Secp256k1Verifier, SignatureVerifier};
use utxo_ledger::error::WalletError;
use utxo_ledger::transaction::{OutPoint, Transaction, TxInput, TxOutput};
use utxo_ledger::utxo_pool::UtxoPool;
use utxo_ledger::validation::validate;
use utxo_ledger::wallet::Wallet;

#[test]
fn test_wallet_creation() {
    let wallet = Wallet::new();

    // 地址是40个字符的十六进制字符串（20字节的RIPEMD160哈希）
    assert_eq!(wallet.address.len(), 40);
    assert!(wallet.address.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(wallet.address, Wallet::public_key_to_address(&wallet.public_key));

    let wallet2 = Wallet::new();
    assert_ne!(wallet.address, wallet2.address);
}

#[test]
fn test_transaction_creation_with_change() {
    let wallet = Wallet::new();
    let recipient = Wallet::new();
    let mut pool = UtxoPool::new();
    pool.insert(OutPoint::new("1".repeat(64), 0), TxOutput::new(100, wallet.public_key));

    // 创建交易：支付50，手续费5
    let tx = wallet.create_transaction(&recipient.public_key, 50, 5, &pool).unwrap();

    // 验证交易输入
    assert_eq!(tx.inputs.len(), 1);
    assert_eq!(tx.inputs[0].prev_tx, "1".repeat(64));
    // 验证交易输出：一个给接收者，一个找零
    assert_eq!(tx.outputs.len(), 2);
    assert_eq!(tx.outputs[0], TxOutput::new(50, recipient.public_key));
    assert_eq!(tx.outputs[1], TxOutput::new(45, wallet.public_key));
    assert_eq!(validate(&pool, &tx, &Secp256k1Verifier::new()), Ok(5));
}

#[test]
fn test_transaction_creation_with_exact_funds() {
    let wallet = Wallet::new();
    let recipient = Wallet::new();
    let mut pool = UtxoPool::new();
    pool.insert(OutPoint::new("1".repeat(64), 0), TxOutput::new(50, wallet.public_key));

    let tx = wallet.create_transaction(&recipient.public_key, 50, 0, &pool).unwrap();

    // 没有找零输出
    assert_eq!(tx.outputs.len(), 1);
    assert_eq!(tx.outputs[0].value, 50);
}

#[test]
fn test_transaction_creation_skips_foreign_outputs() {
    let wallet = Wallet::new();
    let other = Wallet::new();
    let mut pool = UtxoPool::new();
    pool.insert(OutPoint::new("1".repeat(64), 0), TxOutput::new(30, wallet.public_key));
    // 其他钱包持有的UTXO不能被选中
    pool.insert(OutPoint::new("2".repeat(64), 0), TxOutput::new(500, other.public_key));
    pool.insert(OutPoint::new("3".repeat(64), 1), TxOutput::new(30, wallet.public_key));

    let tx = wallet.create_transaction(&other.public_key, 50, 1, &pool).unwrap();

    assert_eq!(tx.inputs.len(), 2);
    assert!(tx.inputs.iter().all(|input| input.prev_tx != "2".repeat(64)));
    assert_eq!(validate(&pool, &tx, &Secp256k1Verifier::new()), Ok(1));
}

#[test]
fn test_transaction_creation_with_insufficient_funds() {
    let wallet = Wallet::new();
    let mut pool = UtxoPool::new();
    pool.insert(OutPoint::new("1".repeat(64), 0), TxOutput::new(30, wallet.public_key));

    let result = wallet.create_transaction(&wallet.public_key, 50, 0, &pool);

    assert!(matches!(
        result,
        Err(WalletError::InsufficientFunds {
            available: 30,
            required: 50
        })
    ));
}

#[test]
fn test_sign_input_verifies_against_payload() {
    let wallet = Wallet::new();
    let mut tx = Transaction::new(
        vec![TxInput::unsigned("1".repeat(64), 0)],
        vec![TxOutput::new(5, wallet.public_key)],
    );

    // 签名交易
    wallet.sign_input(&mut tx, 0).unwrap();

    // 签名是64字节的紧凑格式，只能用签名者的公钥校验
    assert_eq!(tx.inputs[0].signature.len(), 64);
    let verifier = Secp256k1Verifier::new();
    assert!(verifier.verify(&wallet.public_key, &tx.raw_data_to_sign(0), &tx.inputs[0].signature));
    assert!(!verifier.verify(&Wallet::new().public_key, &tx.raw_data_to_sign(0), &tx.inputs[0].signature));
}

#[test]
fn test_sign_input_out_of_range() {
    let wallet = Wallet::new();
    let mut tx = Transaction::new(vec![], vec![TxOutput::new(5, wallet.public_key)]);

    assert!(matches!(
        wallet.sign_input(&mut tx, 0),
        Err(WalletError::InputOutOfRange { index: 0, len: 0 })
    ));
}
