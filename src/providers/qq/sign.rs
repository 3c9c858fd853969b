//! QQ 音乐请求签名的简化实现。
//!
//! 官方客户端的真实签名算法要复杂得多；这里只保证对相同输入
//! 产生确定的输出，不参与任何响应校验，本模块的调用方也不会把
//! 它附加到请求上。

use base64::{Engine, prelude::BASE64_STANDARD};
use serde::Serialize;
use sha1::{Digest, Sha1};

use crate::error::{MusicApiError, Result};

/// 参与编码的摘要字节数。SHA-1 摘要恰好是 20 字节。
const SIGN_SLICE_LEN: usize = 20;

/// 计算请求数据的签名。
///
/// 数据序列化为紧凑 JSON 后做 SHA-1 摘要，截取固定长度的摘要
/// 字节，先转十六进制再还原为字节做 Base64 编码。
pub fn sign<T: Serialize>(data: &T) -> Result<String> {
    let text = serde_json::to_string(data)?;

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();

    let slice_hex = hex::encode(&digest[..SIGN_SLICE_LEN]);
    let sign_bytes = hex::decode(&slice_hex)
        .map_err(|e| MusicApiError::Crypto(format!("签名字节还原失败: {e}")))?;

    Ok(BASE64_STANDARD.encode(sign_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sign_is_deterministic() {
        let data = json!({ "comm": { "ct": "11" }, "param": { "query": "test" } });
        let first = sign(&data).unwrap();
        let second = sign(&data).unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_sign_differs_for_different_input() {
        let a = sign(&json!({ "query": "a" })).unwrap();
        let b = sign(&json!({ "query": "b" })).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sign_is_valid_base64_of_digest_len() {
        let encoded = sign(&json!({ "query": "周杰伦" })).unwrap();
        let decoded = BASE64_STANDARD.decode(&encoded).unwrap();
        assert_eq!(decoded.len(), SIGN_SLICE_LEN);
    }
}
