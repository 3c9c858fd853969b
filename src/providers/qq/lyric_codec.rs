//! QQ 音乐歌词子载荷的解码。
//!
//! 歌词接口返回的各个子字段都是 Base64 编码的文本；逐字歌词则在
//! Base64 之下再套了一层 zlib 压缩。这里的解码都是尽力而为：
//! 解不开就退回原始数据或空串，绝不让局部解码失败变成整体错误。

use std::io::Read;

use base64::{Engine, prelude::BASE64_STANDARD};
use flate2::read::ZlibDecoder;
use tracing::warn;

/// 一次尽力而为解码的结果。
///
/// `degraded` 为 `true` 表示解码失败、`text` 是未经处理的原始
/// 输入，调用方（和测试）据此区分"上游本来为空"与"解码回退"。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DecodedText {
    /// 解码后的文本，或回退时的原始输入。
    pub text: String,
    /// 是否发生了回退。
    pub degraded: bool,
}

/// 解码一个 Base64 编码的歌词子字段。
///
/// 输入不是合法 Base64、或解码结果不是合法 UTF-8 时，原样返回
/// 输入。对已经是明文的输入因此是幂等的。
pub(crate) fn decode_lyric_block(raw: &str) -> DecodedText {
    if raw.is_empty() {
        return DecodedText {
            text: String::new(),
            degraded: false,
        };
    }

    if let Ok(bytes) = BASE64_STANDARD.decode(raw)
        && let Ok(text) = String::from_utf8(bytes)
    {
        return DecodedText {
            text,
            degraded: false,
        };
    }

    warn!("歌词字段无法按 Base64 解码，按原文返回");
    DecodedText {
        text: raw.to_string(),
        degraded: true,
    }
}

/// 解码逐字歌词：先 Base64 解码，再 zlib 解压为 UTF-8 文本。
///
/// 逐字歌词只是锦上添花的字段，任何一步失败都返回空串而不是
/// 错误。
pub(crate) fn decode_timed_block(raw: &str) -> String {
    let Ok(compressed) = BASE64_STANDARD.decode(raw) else {
        return String::new();
    };

    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut text = String::new();
    match decoder.read_to_string(&mut text) {
        Ok(_) => text,
        Err(e) => {
            warn!("逐字歌词解压失败: {e}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{Compression, write::ZlibEncoder};
    use std::io::Write;

    #[test]
    fn test_decode_base64_block() {
        // "[00:01.00]你好" 的 Base64
        let encoded = BASE64_STANDARD.encode("[00:01.00]你好");
        let decoded = decode_lyric_block(&encoded);
        assert_eq!(decoded.text, "[00:01.00]你好");
        assert!(!decoded.degraded);
    }

    #[test]
    fn test_decode_is_idempotent_on_plain_text() {
        let plain = "[00:01.00]已经是明文的歌词!";
        let decoded = decode_lyric_block(plain);
        assert_eq!(decoded.text, plain);
        assert!(decoded.degraded);

        let again = decode_lyric_block(&decoded.text);
        assert_eq!(again.text, plain);
    }

    #[test]
    fn test_decode_empty_is_not_degraded() {
        let decoded = decode_lyric_block("");
        assert_eq!(decoded.text, "");
        assert!(!decoded.degraded);
    }

    #[test]
    fn test_decode_timed_block_round_trip() {
        let original = "[1,100]逐[101,200]字[201,300]歌[301,400]词";
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(original.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();
        let encoded = BASE64_STANDARD.encode(compressed);

        assert_eq!(decode_timed_block(&encoded), original);
    }

    #[test]
    fn test_decode_timed_block_degrades_to_empty() {
        assert_eq!(decode_timed_block("not base64 at all!"), "");
        // 合法 Base64 但不是 zlib 流
        let encoded = BASE64_STANDARD.encode("plain text");
        assert_eq!(decode_timed_block(&encoded), "");
    }
}
