//! 本模块实现 WEAPI 请求加密。
//!
//! 该加密方案模拟网易云音乐官方网页端客户端的行为，任何一步偏差
//! （IV 错误、密钥顺序错误、RSA 带填充）都会被远端直接拒绝。
//! 本实现仅用于加密 API 请求，不应用于实际安全目的。

use aes::{
    Aes128,
    cipher::{BlockSizeUser, KeyIvInit, generic_array::GenericArray},
};
use base64::{Engine, prelude::BASE64_STANDARD};
use block_padding::Pkcs7;
use cbc::Encryptor as CbcModeEncryptor;
use cipher::BlockEncryptMut;
use num_bigint::BigInt;
use num_traits::Num;
use rand::{Rng, distr::Alphanumeric, rng};
use serde::Serialize;

use crate::error::{MusicApiError, Result};

/// WEAPI 第一轮 AES CBC 加密使用的固定预置密钥。
pub(crate) const PRESET_KEY: &str = "0CoJUm6Qyw8W8jud";
/// 两轮 AES CBC 加密共用的固定初始化向量。
pub(crate) const WEAPI_IV: &str = "0102030405060708";
/// RSA 公钥指数 ("010001"，即 65537)。
pub(crate) const PUBKEY_HEX: &str = "010001";
/// RSA 公钥模数。与官方客户端内嵌的 PEM 公钥等价。
pub(crate) const MODULUS_HEX: &str = "00e0b509f6259df8642dbc35662901477df22677ec152b5ff68ace615bb7b725152b3ab17a876aea8a5aa76d2e417629ec4ee341f56135fccf695280104e0312ecbda92557c93870114af6c9d05c4f7f0c3685b7a46bee255932575cce10b424d813cfe4875d3e82047b97ddef52741d546b8e289dc6935b3ece0462db0a22b8e7";

/// 一次 WEAPI 加密的产物，直接对应请求体的两个字段。
#[derive(Debug)]
pub(crate) struct WeapiForm {
    /// 两轮 AES CBC 加密后的参数密文（Base64）。
    pub params: String,
    /// RSA 加密随机密钥得到的十六进制字符串，长度固定为 256。
    pub enc_sec_key: String,
}

/// 生成一个指定长度的随机字母数字字符串。
///
/// 既用于每次请求的一次性对称密钥，也用于进程级的设备 ID。
pub(crate) fn create_secret_key(length: usize) -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// 执行完整的 WEAPI 加密流程。
///
/// 1. 将载荷序列化为紧凑 JSON；
/// 2. 生成 16 位一次性密钥；
/// 3. 用预置密钥做第一轮 AES CBC 加密；
/// 4. 用一次性密钥做第二轮加密，得到 `params`；
/// 5. 将一次性密钥反转后做无填充 RSA 加密，得到 `encSecKey`。
///
/// 一次性密钥只在本函数内存在，不会被持久化或记录。
pub(crate) fn weapi_encrypt<T: Serialize>(payload: &T) -> Result<WeapiForm> {
    let text = serde_json::to_string(payload)?;
    let secret_key = create_secret_key(16);

    let first_pass = aes_cbc_encrypt_base64(&text, PRESET_KEY, WEAPI_IV)?;
    let params = aes_cbc_encrypt_base64(&first_pass, &secret_key, WEAPI_IV)?;

    let enc_sec_key = rsa_encode(&secret_key, PUBKEY_HEX, MODULUS_HEX)?;

    Ok(WeapiForm {
        params,
        enc_sec_key,
    })
}

/// 实现 AES CBC 模式加密，并返回 Base64 编码的字符串。
///
/// # 参数
/// * `data_str` - 待加密的明文字符串。
/// * `key_str` - 密钥字符串 (ASCII，必须为 16 字节)。
/// * `iv_str` - 初始化向量字符串 (ASCII，必须为 16 字节)。
pub(crate) fn aes_cbc_encrypt_base64(data_str: &str, key_str: &str, iv_str: &str) -> Result<String> {
    let key_bytes = key_str.as_bytes();
    let iv_bytes = iv_str.as_bytes();
    let block_size = Aes128::block_size();

    if key_bytes.len() != block_size {
        return Err(MusicApiError::Crypto(format!(
            "AES 密钥长度必须为 {} 字节，当前为 {}",
            block_size,
            key_bytes.len()
        )));
    }
    if iv_bytes.len() != block_size {
        return Err(MusicApiError::Crypto(format!(
            "AES 初始化向量长度必须为 {} 字节，当前为 {}",
            block_size,
            iv_bytes.len()
        )));
    }

    let key_ga = GenericArray::from_slice(key_bytes);
    let iv_ga = GenericArray::from_slice(iv_bytes);
    let cipher = CbcModeEncryptor::<Aes128>::new(key_ga, iv_ga);

    let mut buffer = data_str.as_bytes().to_vec();
    let msg_len = buffer.len();

    let padded_len = (msg_len / block_size + 1) * block_size;
    buffer.resize(padded_len, 0);

    let ciphertext = cipher
        .encrypt_padded_mut::<Pkcs7>(&mut buffer, msg_len)
        .map_err(|e| MusicApiError::Crypto(format!("AES CBC 加密失败: {e:?}")))?;

    Ok(BASE64_STANDARD.encode(ciphertext))
}

/// 将十六进制字符串转换为大整数。
fn hex_str_to_bigint(hex: &str) -> Result<BigInt> {
    BigInt::from_str_radix(hex, 16)
        .map_err(|e| MusicApiError::Crypto(format!("无法解析十六进制字符串: {e}")))
}

/// 无填充（教科书式）RSA 加密，用于包装一次性对称密钥。
///
/// 远端期望的就是这种非标准的无填充形式，不能换成 OAEP/PKCS#1。
///
/// 明文会先反转再加密；输出为小写十六进制，长度固定 256
/// （不足前补 0，超出取低 256 位，与官方客户端一致）。
pub(crate) fn rsa_encode(text: &str, pubkey_hex: &str, modulus_hex: &str) -> Result<String> {
    let reversed_text: String = text.chars().rev().collect();
    let text_hex = hex::encode(reversed_text.as_bytes());

    let plaintext = hex_str_to_bigint(&text_hex)?;
    let exponent = hex_str_to_bigint(pubkey_hex)?;
    let modulus = hex_str_to_bigint(modulus_hex)?;

    if plaintext >= modulus {
        return Err(MusicApiError::Crypto(
            "RSA 明文超出了模数范围".to_string(),
        ));
    }

    let encrypted = plaintext.modpow(&exponent, &modulus);
    let mut key_hex = format!("{encrypted:x}");

    match key_hex.len().cmp(&256) {
        std::cmp::Ordering::Less => {
            key_hex = format!("{}{}", "0".repeat(256 - key_hex.len()), key_hex);
        }
        std::cmp::Ordering::Greater => {
            key_hex = key_hex.split_at(key_hex.len() - 256).1.to_string();
        }
        std::cmp::Ordering::Equal => {}
    }
    Ok(key_hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbc::Decryptor as CbcModeDecryptor;
    use cipher::BlockDecryptMut;
    use serde_json::json;
    use std::collections::HashSet;

    fn aes_cbc_decrypt_base64(data_b64: &str, key_str: &str, iv_str: &str) -> String {
        let mut buffer = BASE64_STANDARD.decode(data_b64).unwrap();
        let key_ga = GenericArray::from_slice(key_str.as_bytes());
        let iv_ga = GenericArray::from_slice(iv_str.as_bytes());
        let cipher = CbcModeDecryptor::<Aes128>::new(key_ga, iv_ga);
        let plaintext = cipher.decrypt_padded_mut::<Pkcs7>(&mut buffer).unwrap();
        String::from_utf8(plaintext.to_vec()).unwrap()
    }

    #[test]
    fn test_create_secret_key() {
        let key = create_secret_key(16);
        assert_eq!(key.len(), 16);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_aes_round_trip_two_stages() {
        let payload = json!({ "s": "test", "type": 1, "limit": 2, "offset": 0 });
        let text = serde_json::to_string(&payload).unwrap();

        // 用已知的一次性密钥手动重放两轮加密，再逐层解密
        let secret_key = "aB3dE5fG7hJ9kL1m";
        let first_pass = aes_cbc_encrypt_base64(&text, PRESET_KEY, WEAPI_IV).unwrap();
        let second_pass = aes_cbc_encrypt_base64(&first_pass, secret_key, WEAPI_IV).unwrap();

        let outer = aes_cbc_decrypt_base64(&second_pass, secret_key, WEAPI_IV);
        assert_eq!(outer, first_pass);
        let inner = aes_cbc_decrypt_base64(&outer, PRESET_KEY, WEAPI_IV);
        assert_eq!(inner, text);
    }

    #[test]
    fn test_aes_rejects_bad_key_length() {
        let result = aes_cbc_encrypt_base64("data", "short", WEAPI_IV);
        assert!(matches!(result, Err(MusicApiError::Crypto(_))));
    }

    #[test]
    fn test_rsa_encode_shape() {
        let key = create_secret_key(16);
        let encoded = rsa_encode(&key, PUBKEY_HEX, MODULUS_HEX).unwrap();
        assert_eq!(encoded.len(), 256);
        assert!(encoded.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(encoded, encoded.to_lowercase());
    }

    #[test]
    fn test_rsa_encode_deterministic_for_same_input() {
        let a = rsa_encode("aB3dE5fG7hJ9kL1m", PUBKEY_HEX, MODULUS_HEX).unwrap();
        let b = rsa_encode("aB3dE5fG7hJ9kL1m", PUBKEY_HEX, MODULUS_HEX).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rsa_encode_rejects_bad_hex() {
        let result = rsa_encode("key", "zz", MODULUS_HEX);
        assert!(matches!(result, Err(MusicApiError::Crypto(_))));
    }

    #[test]
    fn test_weapi_encrypt_never_reuses_key_material() {
        let payload = json!({ "s": "同一个载荷", "limit": 30 });

        let mut params_seen = HashSet::new();
        let mut enc_sec_keys_seen = HashSet::new();
        for _ in 0..100 {
            let form = weapi_encrypt(&payload).unwrap();
            assert!(params_seen.insert(form.params), "params 不应重复");
            assert!(
                enc_sec_keys_seen.insert(form.enc_sec_key),
                "encSecKey 不应重复"
            );
        }
    }
}
