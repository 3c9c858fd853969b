//! 用于反序列化网易云音乐歌词接口响应的数据结构。
//!
//! 搜索类接口的响应直接以 `serde_json::Value` 的形式交给归一化层
//! 处理，因此这里只保留歌词接口的模型。

use serde::Deserialize;

/// 歌词接口 (`/weapi/song/lyric`) 的顶层响应结构。
#[derive(Debug, Deserialize)]
pub struct LyricResponse {
    /// API 返回码，`200` 表示成功。
    #[serde(default)]
    pub code: i32,
    /// 标准 LRC 歌词。
    pub lrc: Option<LyricBlock>,
    /// 翻译 LRC 歌词。
    pub tlyric: Option<LyricBlock>,
    /// 罗马音 LRC 歌词。
    pub romalrc: Option<LyricBlock>,
}

/// 单一歌词内容的数据结构。
#[derive(Debug, Deserialize)]
pub struct LyricBlock {
    /// 歌词文本内容，可能为空串。
    #[serde(default)]
    pub lyric: String,
}
