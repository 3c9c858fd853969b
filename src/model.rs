//! 定义了对外暴露的统一数据结构。
//!
//! 无论结果来自哪个平台，门面层最终都会把响应整理成本模块中的形状。

use serde::{Deserialize, Serialize};

/// 搜索操作的默认返回数量。
pub const DEFAULT_SEARCH_LIMIT: u32 = 30;

/// 一次搜索调用的输入参数。
///
/// 每次调用单独构造，构造后不再修改。
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// 搜索关键词，不应为空。
    pub keywords: String,
    /// 返回数量上限，应大于 0。
    pub limit: u32,
    /// 结果偏移量。
    pub offset: u32,
}

impl SearchQuery {
    /// 构造一个搜索查询，`limit` 为 0 时修正为 [`DEFAULT_SEARCH_LIMIT`]。
    pub fn new(keywords: impl Into<String>, limit: u32, offset: u32) -> Self {
        Self {
            keywords: keywords.into(),
            limit: if limit == 0 { DEFAULT_SEARCH_LIMIT } else { limit },
            offset,
        }
    }
}

/// 统一格式下的单首歌曲。
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalSong {
    /// 歌曲在其所在平台的 ID（网易云为数字 ID，QQ 音乐为 mid）。
    pub id: String,
    /// 歌曲名。
    pub name: String,
    /// 演唱者，多位时以 "/" 连接。
    pub artist: String,
    /// 专辑名。
    pub album: String,
    /// 时长，单位为秒。
    pub duration: u64,
    /// "mm:ss" 形式的时长，便于直接展示。
    pub duration_formatted: String,
}

/// 搜索结果的数据部分。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchData {
    /// 歌曲列表，保持上游返回顺序。
    pub songs: Vec<CanonicalSong>,
    /// 上游报告的结果总数。
    pub total: u64,
    /// 失败时的错误描述。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 门面层搜索操作的统一返回值。
///
/// 无论成功失败都是这个形状，门面保证不向外抛出错误。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalResult {
    /// 200 表示成功，500 表示本层捕获到了错误。
    pub code: i32,
    /// 结果数据。
    pub data: SearchData,
}

impl CanonicalResult {
    /// 构造一个成功结果。
    pub fn ok(songs: Vec<CanonicalSong>, total: u64) -> Self {
        Self {
            code: 200,
            data: SearchData {
                songs,
                total,
                error: None,
            },
        }
    }

    /// 构造一个空的成功结果。
    pub fn empty() -> Self {
        Self::ok(Vec::new(), 0)
    }

    /// 构造一个携带错误信息的失败结果。
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: 500,
            data: SearchData {
                songs: Vec::new(),
                total: 0,
                error: Some(message.into()),
            },
        }
    }
}

/// 歌词内容，每个字段在上游缺失时独立为空。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LyricPayload {
    /// 原文歌词。
    pub plain: String,
    /// 翻译歌词。
    pub translated: String,
    /// 罗马音歌词。
    pub romanized: String,
    /// 逐字（带时间戳）歌词，仅在请求且上游提供时存在。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timed_format: Option<String>,
}

/// 门面层歌词操作的统一返回值。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricResult {
    /// 200 成功，404 未找到歌词，500 本层捕获到了错误。
    pub code: i32,
    /// 歌词数据。
    pub data: LyricPayload,
    /// 失败时的错误描述。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LyricResult {
    /// 构造一个成功结果。
    pub fn ok(payload: LyricPayload) -> Self {
        Self {
            code: 200,
            data: payload,
            error: None,
        }
    }

    /// 构造一个未找到歌词的结果。
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: 404,
            data: LyricPayload::default(),
            error: Some(message.into()),
        }
    }

    /// 构造一个携带错误信息的失败结果。
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: 500,
            data: LyricPayload::default(),
            error: Some(message.into()),
        }
    }
}
