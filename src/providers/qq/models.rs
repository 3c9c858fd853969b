//! 用于反序列化 QQ 音乐接口响应的数据结构。
//!
//! 搜索类响应交给归一化层以 `serde_json::Value` 形式处理，这里
//! 只保留歌词接口的模型。

use serde::Deserialize;

/// 歌词接口业务对象的数据部分。
///
/// 每个字段都是 Base64 编码的文本，缺失时为空串。
#[derive(Debug, Deserialize, Default)]
pub struct LyricData {
    /// 原文歌词。
    #[serde(default)]
    pub lyric: String,
    /// 翻译歌词。
    #[serde(default)]
    pub trans: String,
    /// 罗马音歌词。
    #[serde(default)]
    pub roma: String,
    /// 逐字歌词（Base64 + zlib 压缩）。
    #[serde(default)]
    pub qrc: String,
}

/// 歌词接口的业务对象。
#[derive(Debug, Deserialize)]
pub struct LyricApiResult {
    /// 歌词数据，未找到歌曲时缺失。
    pub data: Option<LyricData>,
}
