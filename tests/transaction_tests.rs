use utxo_ledger::transaction::{OutPoint, Transaction, TxInput, TxOutput};
use utxo_ledger::utxo_pool::UtxoPool;
use utxo_ledger::wallet::Wallet;

fn two_input_tx(owner: &Wallet, recipient: &Wallet) -> Transaction {
    Transaction::new(
        vec![
            TxInput::unsigned("1".repeat(64), 0),
            TxInput::unsigned("2".repeat(64), 1),
        ],
        vec![
            TxOutput::new(30, recipient.public_key),
            TxOutput::new(20, owner.public_key),
        ],
    )
}

#[test]
fn test_hash_ignores_signatures() {
    let owner = Wallet::new();
    let recipient = Wallet::new();
    let mut tx = two_input_tx(&owner, &recipient);

    let unsigned_hash = tx.calculate_hash();
    owner.sign_all(&mut tx).unwrap();

    // 签名不影响交易哈希
    assert_eq!(tx.calculate_hash(), unsigned_hash);
    assert_eq!(unsigned_hash.len(), 64);
    assert!(unsigned_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_hash_changes_with_outputs() {
    let owner = Wallet::new();
    let recipient = Wallet::new();
    let tx = two_input_tx(&owner, &recipient);

    let mut changed = tx.clone();
    changed.outputs[0].value = 31;

    assert_ne!(tx.calculate_hash(), changed.calculate_hash());
}

#[test]
fn test_signing_payload_excludes_later_inputs() {
    let owner = Wallet::new();
    let recipient = Wallet::new();
    let tx = two_input_tx(&owner, &recipient);

    // 修改第二个输入不影响第一个输入的签名载荷
    let mut changed = tx.clone();
    changed.inputs[1].prev_index = 7;
    changed.inputs[1].signature = vec![9; 64];
    assert_eq!(tx.raw_data_to_sign(0), changed.raw_data_to_sign(0));
    assert_ne!(tx.raw_data_to_sign(1), changed.raw_data_to_sign(1));
}

#[test]
fn test_signing_payload_covers_earlier_signatures() {
    let owner = Wallet::new();
    let recipient = Wallet::new();
    let mut tx = two_input_tx(&owner, &recipient);

    let before = tx.raw_data_to_sign(1);
    owner.sign_input(&mut tx, 0).unwrap();
    let after = tx.raw_data_to_sign(1);
    assert_ne!(before, after);

    // 当前输入自己的签名不在载荷中
    let payload = tx.raw_data_to_sign(0);
    tx.inputs[0].signature = vec![1; 64];
    assert_eq!(payload, tx.raw_data_to_sign(0));
}

#[test]
fn test_encoding_distinguishes_transactions() {
    let owner = Wallet::new();
    let recipient = Wallet::new();
    let tx = two_input_tx(&owner, &recipient);
    let other = Transaction::new(
        vec![TxInput::unsigned("3".repeat(64), 0)],
        vec![TxOutput::new(30, recipient.public_key)],
    );

    // 签名载荷不为空，且不同交易的载荷和哈希都不同
    assert!(!tx.raw_data_to_sign(0).is_empty());
    assert_ne!(tx.raw_data_to_sign(0), other.raw_data_to_sign(0));
    assert_ne!(tx.calculate_hash(), other.calculate_hash());

    // 空交易也有确定的非空编码
    let empty = Transaction::new(vec![], vec![]);
    assert!(!empty.raw_data_to_sign(0).is_empty());
    assert_eq!(empty.calculate_hash(), Transaction::new(vec![], vec![]).calculate_hash());
}

#[test]
fn test_output_points_use_transaction_hash() {
    let owner = Wallet::new();
    let recipient = Wallet::new();
    let tx = two_input_tx(&owner, &recipient);
    let hash = tx.calculate_hash();

    let points: Vec<(OutPoint, &TxOutput)> = tx.output_points().collect();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].0, OutPoint::new(hash.clone(), 0));
    assert_eq!(points[1].0, OutPoint::new(hash, 1));
    assert_eq!(points[0].1.value, 30);
    assert_eq!(points[1].1.value, 20);
}

#[test]
fn test_fee_against_counts_missing_inputs_as_zero() {
    let owner = Wallet::new();
    let recipient = Wallet::new();
    let tx = two_input_tx(&owner, &recipient);

    // 空池：所有输入按0计算
    let mut pool = UtxoPool::new();
    assert_eq!(tx.fee_against(&pool), -50);

    // 逐个加入被引用的UTXO

    pool.insert(OutPoint::new("1".repeat(64), 0), TxOutput::new(40, owner.public_key));
    assert_eq!(tx.fee_against(&pool), -10);

    pool.insert(OutPoint::new("2".repeat(64), 1), TxOutput::new(15, owner.public_key));
    assert_eq!(tx.fee_against(&pool), 5);
}

#[test]
fn test_total_output_value_overflow() {
    let owner = Wallet::new();
    let tx = Transaction::new(
        vec![],
        vec![
            TxOutput::new(i64::MAX, owner.public_key),
            TxOutput::new(1, owner.public_key),
        ],
    );
    assert_eq!(tx.total_output_value(), None);
}

#[test]
fn test_transaction_json_roundtrip_keeps_hash() {
    let owner = Wallet::new();
    let recipient = Wallet::new();
    let mut tx = two_input_tx(&owner, &recipient);
    owner.sign_all(&mut tx).unwrap();

    let json = serde_json::to_string(&tx).unwrap();
    let decoded: Transaction = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, tx);
    assert_eq!(decoded.calculate_hash(), tx.calculate_hash());
}
