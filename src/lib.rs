#![warn(missing_docs)]

//! # Music API RS
//!
//! 统一的网易云音乐和 QQ 音乐接口库，提供搜索和歌词获取功能，
//! 并把两个平台各自的传输细节（请求加密、信封签名、响应拆包）
//! 封装在统一的结果形状之后。
//!
//! ## 搜索
//!
//! ```rust,no_run
//! use music_api_rs::MusicApi;
//!
//! async {
//!     let api = MusicApi::new();
//!
//!     let result = api.search_netease("周杰伦", 10, 0).await;
//!     println!("共 {} 首，返回 {} 首", result.data.total, result.data.songs.len());
//!
//!     let lyric = api.get_qq_lyric("001JDzPT1MgGy9").await;
//!     if lyric.code == 200 {
//!         println!("{}", lyric.data.plain);
//!     }
//! };
//! ```
//!
//! 搜索和歌词入口永远不会返回 `Err`：所有失败都会被整理成
//! `code: 500` 的结构化结果。

pub mod error;
pub mod model;
pub mod normalizer;
pub mod providers;
pub mod transport;

use std::sync::Arc;

use serde_json::Value;
use tracing::error;

pub use crate::{
    error::{MusicApiError, Result},
    model::{
        CanonicalResult, CanonicalSong, DEFAULT_SEARCH_LIMIT, LyricPayload, LyricResult,
        SearchQuery,
    },
};

use crate::{
    normalizer::Platform,
    providers::{
        netease::{self, NeteaseClient},
        qq::{LyricOptions, QQMusicClient},
    },
    transport::{HttpTransport, Transport},
};

/// 顶层客户端，封装两个平台，对外提供统一、不抛错的接口。
///
/// 这是与本库交互的主要入口点。所有操作都是无状态的请求/响应
/// 调用，可以被任意并发使用。
pub struct MusicApi {
    netease: NeteaseClient,
    qq: QQMusicClient,
}

impl Default for MusicApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MusicApi {
    /// 使用默认的 HTTP 传输创建客户端。
    pub fn new() -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()))
    }

    /// 使用自定义传输创建客户端，主要用于测试。
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            netease: NeteaseClient::new(Arc::clone(&transport)),
            qq: QQMusicClient::new(transport),
        }
    }

    /// 网易云音乐搜索。
    ///
    /// `limit` 为 0 时按 [`DEFAULT_SEARCH_LIMIT`] 处理。
    /// 任何失败都返回 `code: 500` 的结果，不会向外抛错。
    pub async fn search_netease(&self, keywords: &str, limit: u32, offset: u32) -> CanonicalResult {
        let query = SearchQuery::new(keywords, limit, offset);
        match self
            .netease
            .cloud_search(&query, netease::SearchType::Song)
            .await
        {
            Ok(raw) => normalizer::normalize(Platform::Netease, &raw),
            Err(e) => {
                error!("网易云音乐搜索失败: {e}");
                CanonicalResult::failure(e.to_string())
            }
        }
    }

    /// QQ 音乐搜索。
    ///
    /// `limit` 为 0 时按 [`DEFAULT_SEARCH_LIMIT`] 处理。
    /// 任何失败都返回 `code: 500` 的结果，不会向外抛错。
    pub async fn search_qq(&self, keywords: &str, limit: u32, offset: u32) -> CanonicalResult {
        let query = SearchQuery::new(keywords, limit, offset);
        match self.qq.search_songs(&query).await {
            Ok(raw) => normalizer::normalize(Platform::Qq, &raw),
            Err(e) => {
                error!("QQ 音乐搜索失败: {e}");
                CanonicalResult::failure(e.to_string())
            }
        }
    }

    /// 获取网易云音乐歌词。
    ///
    /// 成功返回 `code: 200`，远端没有歌词时返回 `code: 404`，
    /// 其余失败返回 `code: 500`。
    pub async fn get_netease_lyric(&self, id: &str) -> LyricResult {
        match self.netease.get_lyric(id).await {
            Ok(response) if response.code == 200 => {
                let payload = LyricPayload {
                    plain: response.lrc.map(|b| b.lyric).unwrap_or_default(),
                    translated: response.tlyric.map(|b| b.lyric).unwrap_or_default(),
                    romanized: response.romalrc.map(|b| b.lyric).unwrap_or_default(),
                    timed_format: None,
                };
                LyricResult::ok(payload)
            }
            Ok(_) => LyricResult::not_found("未找到歌词"),
            Err(e) => {
                error!("获取网易云音乐歌词失败: {e}");
                LyricResult::failure(e.to_string())
            }
        }
    }

    /// 获取 QQ 音乐歌词（含翻译和罗马音）。
    ///
    /// 成功返回 `code: 200`，远端没有歌词时返回 `code: 404`，
    /// 其余失败返回 `code: 500`。
    pub async fn get_qq_lyric(&self, songmid: &str) -> LyricResult {
        match self.qq.get_lyric(songmid, LyricOptions::default()).await {
            Ok(Some(payload)) => LyricResult::ok(payload),
            Ok(None) => LyricResult::not_found("未找到歌词"),
            Err(e) => {
                error!("获取 QQ 音乐歌词失败: {e}");
                LyricResult::failure(e.to_string())
            }
        }
    }

    /// 网易云音乐热门搜索，返回平台原始响应。
    pub async fn netease_hot_search(&self) -> Result<Value> {
        self.netease.hot_search().await
    }

    /// 网易云音乐搜索建议，返回平台原始响应。
    pub async fn netease_search_suggest(
        &self,
        keywords: &str,
        suggest_type: netease::SuggestType,
    ) -> Result<Value> {
        self.netease.search_suggest(keywords, suggest_type).await
    }

    /// QQ 音乐热搜词，返回平台原始响应。
    pub async fn qq_hotkey(&self) -> Result<Value> {
        self.qq.hotkey().await
    }

    /// QQ 音乐搜索补全，返回平台原始响应。
    pub async fn qq_smartbox_complete(&self, keywords: &str) -> Result<Value> {
        self.qq.smartbox_complete(keywords).await
    }

    /// 访问底层的网易云客户端，用于本门面未覆盖的操作。
    pub fn netease(&self) -> &NeteaseClient {
        &self.netease
    }

    /// 访问底层的 QQ 音乐客户端，用于本门面未覆盖的操作。
    pub fn qq(&self) -> &QQMusicClient {
        &self.qq
    }
}
