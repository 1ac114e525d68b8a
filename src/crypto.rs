//! # 签名校验
//!
//! 校验器只回答"签名是否有效"。格式错误的签名视为无效，不会向上传播错误。

use secp256k1::ecdsa::Signature;
use secp256k1::{All, Message, PublicKey, Secp256k1};
use sha2::{Digest, Sha256};

/// 签名校验能力，必须是确定性且无副作用的
pub trait SignatureVerifier {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &[u8]) -> bool;
}

impl<F> SignatureVerifier for F
where
    F: Fn(&PublicKey, &[u8], &[u8]) -> bool,
{
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &[u8]) -> bool {
        self(public_key, message, signature)
    }
}

/// 基于secp256k1 ECDSA的校验器，对消息的SHA-256摘要进行校验
pub struct Secp256k1Verifier {
    secp: Secp256k1<All>,
}

impl Secp256k1Verifier {
    pub fn new() -> Self {
        Secp256k1Verifier {
            secp: Secp256k1::new(),
        }
    }
}

impl Default for Secp256k1Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureVerifier for Secp256k1Verifier {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &[u8]) -> bool {
        let signature = match Signature::from_compact(signature) {
            Ok(signature) => signature,
            Err(e) => {
                log::trace!("签名格式错误: {}", e);
                return false;
            }
        };
        match message_digest(message) {
            Ok(digest) => self.secp.verify_ecdsa(&digest, &signature, public_key).is_ok(),
            Err(_) => false,
        }
    }
}

/// 计算待签名消息的摘要
pub fn message_digest(message: &[u8]) -> Result<Message, secp256k1::Error> {
    Message::from_slice(&Sha256::digest(message))
}
