//! 响应归一化层。
//!
//! 把两个平台各不相同的搜索响应整理成统一的 [`CanonicalResult`]。
//! 上游的响应结构不受本库控制、且实际观测中会变化，所以这里的
//! 解析是尽力而为的：任何结构不匹配都归一化为空结果，而不是
//! 向上抛错。

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::model::{CanonicalResult, CanonicalSong};

/// 标识响应来自哪个平台。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// 网易云音乐。
    Netease,
    /// QQ 音乐。
    Qq,
}

/// 把一个平台的原始搜索响应归一化为统一结果。
///
/// 结构不符合预期时返回 `{code: 200, songs: [], total: 0}`，
/// 不会失败。
pub fn normalize(platform: Platform, raw: &Value) -> CanonicalResult {
    match platform {
        Platform::Netease => normalize_netease(raw),
        Platform::Qq => normalize_qq(raw),
    }
}

/// 把秒数格式化为零填充的 `"mm:ss"`。
///
/// 零或负数一律格式化为 `"00:00"`。
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "00:00".to_string();
    }
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

// =================================================================
// 网易云搜索响应的宽松视图
// =================================================================

#[derive(Debug, Deserialize, Default)]
struct NeteaseSearchView {
    #[serde(default)]
    result: NeteaseResultView,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct NeteaseResultView {
    #[serde(default)]
    songs: Vec<NeteaseSongView>,
    #[serde(default)]
    song_count: u64,
}

#[derive(Debug, Deserialize, Default)]
struct NeteaseSongView {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    name: String,
    /// 演唱者列表。
    #[serde(default, rename = "ar")]
    artists: Vec<NameView>,
    /// 所属专辑。
    #[serde(default, rename = "al")]
    album: NameView,
    /// 时长，单位为毫秒。
    #[serde(default, rename = "dt")]
    duration_ms: u64,
}

#[derive(Debug, Deserialize, Default)]
struct NameView {
    #[serde(default)]
    name: String,
}

fn normalize_netease(raw: &Value) -> CanonicalResult {
    let view: NeteaseSearchView = match serde_json::from_value(raw.clone()) {
        Ok(view) => view,
        Err(e) => {
            warn!("网易云搜索响应结构不符合预期，返回空结果: {e}");
            return CanonicalResult::empty();
        }
    };

    let songs = view
        .result
        .songs
        .into_iter()
        .map(|song| {
            let duration = song.duration_ms / 1000;
            CanonicalSong {
                id: song.id.to_string(),
                name: song.name,
                artist: join_names(song.artists),
                album: song.album.name,
                duration,
                duration_formatted: format_duration(duration as i64),
            }
        })
        .collect();

    CanonicalResult::ok(songs, view.result.song_count)
}

// =================================================================
// QQ 音乐搜索响应的宽松视图
// =================================================================

#[derive(Debug, Deserialize, Default)]
struct QqSearchView {
    #[serde(default)]
    data: QqDataView,
}

#[derive(Debug, Deserialize, Default)]
struct QqDataView {
    #[serde(default)]
    body: QqBodyView,
    #[serde(default)]
    meta: QqMetaView,
}

#[derive(Debug, Deserialize, Default)]
struct QqBodyView {
    #[serde(default)]
    song: QqSongListView,
}

#[derive(Debug, Deserialize, Default)]
struct QqSongListView {
    #[serde(default)]
    list: Vec<QqSongView>,
}

#[derive(Debug, Deserialize, Default)]
struct QqMetaView {
    sum: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct QqSongView {
    /// 新版字段名。
    mid: Option<String>,
    /// 旧版字段名，与 `mid` 二选一。
    songmid: Option<String>,
    /// 新版字段名。
    title: Option<String>,
    /// 旧版字段名，与 `title` 二选一。
    songname: Option<String>,
    #[serde(default)]
    singer: Vec<NameView>,
    #[serde(default)]
    album: NameView,
    /// 时长，单位已经是秒。
    #[serde(default)]
    interval: u64,
}

fn normalize_qq(raw: &Value) -> CanonicalResult {
    let view: QqSearchView = match serde_json::from_value(raw.clone()) {
        Ok(view) => view,
        Err(e) => {
            warn!("QQ 音乐搜索响应结构不符合预期，返回空结果: {e}");
            return CanonicalResult::empty();
        }
    };

    let list = view.data.body.song.list;
    let total = view.data.meta.sum.unwrap_or(list.len() as u64);

    let songs = list
        .into_iter()
        .map(|song| CanonicalSong {
            id: song.mid.or(song.songmid).unwrap_or_default(),
            name: song.title.or(song.songname).unwrap_or_default(),
            artist: join_names(song.singer),
            album: song.album.name,
            duration: song.interval,
            duration_formatted: format_duration(song.interval as i64),
        })
        .collect();

    CanonicalResult::ok(songs, total)
}

fn join_names(names: Vec<NameView>) -> String {
    names
        .into_iter()
        .map(|n| n.name)
        .collect::<Vec<_>>()
        .join("/")
}
