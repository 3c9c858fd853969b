//! QQ 音乐平台的请求编解码与操作实现。
//!
//! 所有操作都走同一个 RPC 风格端点，靠信封里的模块/方法对区分。
//! 请求不加密，但需要携带固定的客户端身份参数和每次调用重新生成
//! 的设备遥测标识。

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use rand::{Rng, rng};
use reqwest::{
    Method,
    header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT},
};
use serde_json::{Value, json};
use tracing::trace;

use crate::{
    error::{MusicApiError, Result},
    model::{LyricPayload, SearchQuery},
    transport::{ApiRequest, Transport},
};

pub(crate) mod lyric_codec;
pub mod models;
pub mod sign;

const API_ENDPOINT: &str = "https://u.y.qq.com/cgi-bin/musicu.fcg";

const SEARCH_MODULE: &str = "music.search.SearchCgiService";
const SEARCH_METHOD: &str = "DoSearchForQQMusicDesktop";

const LYRIC_MODULE: &str = "music.musichallSong.PlayLyricInfo";
const LYRIC_METHOD: &str = "GetPlayLyricInfo";

const HOTKEY_MODULE: &str = "music.musicsearch.HotkeyService";
const HOTKEY_METHOD: &str = "GetHotkeyForQQMusicMobile";

const SMARTBOX_MODULE: &str = "music.smartboxCgi.SmartBoxCgi";
const SMARTBOX_METHOD: &str = "GetSmartBoxResult";

const QQ_UA: &str = "Mozilla/5.0 (Windows NT 11.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36 Edg/116.0.1938.54";

/// 该端点观测到的响应明显偏慢，超时放宽到 30 秒。
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 搜索结果类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// 单曲。
    Song,
    /// 专辑。
    Album,
    /// 歌手。
    Singer,
    /// MV。
    Mv,
    /// 歌单。
    Playlist,
    /// 用户。
    User,
    /// 歌词。
    Lyric,
}

impl SearchType {
    /// 返回接口使用的类型编码。
    pub fn as_code(self) -> u32 {
        match self {
            Self::Song => 0,
            Self::Album => 8,
            Self::Singer => 9,
            Self::Mv => 12,
            Self::Playlist => 3,
            Self::User | Self::Lyric => 7,
        }
    }
}

/// 控制歌词请求要拉取哪些子字段。
#[derive(Debug, Clone, Copy)]
pub struct LyricOptions {
    /// 是否请求逐字歌词。
    pub qrc: bool,
    /// 是否请求翻译。
    pub trans: bool,
    /// 是否请求罗马音。
    pub roma: bool,
}

impl Default for LyricOptions {
    fn default() -> Self {
        Self {
            qrc: false,
            trans: true,
            roma: true,
        }
    }
}

/// 生成一个 32 位十六进制的设备遥测标识。
///
/// 与网易云进程级稳定的设备 ID 不同，这个标识每次请求都重新
/// 生成。
fn generate_qimei36() -> String {
    const HEX_CHARS: &[u8] = b"0123456789abcdef";
    let mut generator = rng();
    (0..32)
        .map(|_| HEX_CHARS[generator.random_range(0..HEX_CHARS.len())] as char)
        .collect()
}

/// 生成一个随机搜索会话 ID。
fn generate_search_id() -> u32 {
    rng().random_range(1..=2_147_483_647)
}

/// 构造一次调用的公共参数块。
fn build_comm() -> Value {
    json!({
        "ct": "11",
        "cv": 13_020_508,
        "v": 13_020_508,
        "tmeAppID": "qqmusic",
        "QIMEI36": generate_qimei36(),
        "uid": "3931641530",
        "format": "json",
        "inCharset": "utf-8",
        "outCharset": "utf-8",
    })
}

/// 构造完整的请求信封，返回模块调用键和信封本身。
///
/// `"<module>.<method>"` 字符串同时作为外层键和内层 `module`/
/// `method` 字段出现。这种重复是远端接口要求的契约，不能省略。
pub(crate) fn build_envelope(module: &str, method: &str, param: Value) -> (String, Value) {
    let request_key = format!("{module}.{method}");
    let envelope = json!({
        "comm": build_comm(),
        &request_key: {
            "module": module,
            "method": method,
            "param": param,
        }
    });
    (request_key, envelope)
}

/// QQ 音乐的客户端实现。
///
/// 只持有传输句柄，本身无状态，可被并发调用。
pub struct QQMusicClient {
    transport: Arc<dyn Transport>,
}

impl QQMusicClient {
    /// 创建一个新的客户端。
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// 为已构造好的信封生成 HTTP 请求。
    fn build_request(&self, envelope: &Value) -> Result<ApiRequest> {
        let body = serde_json::to_vec(envelope)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(QQ_UA));
        headers.insert(REFERER, HeaderValue::from_static("https://y.qq.com/"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://y.qq.com"));
        headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("empty"));
        headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("cors"));
        headers.insert("Sec-Fetch-Site", HeaderValue::from_static("same-site"));

        Ok(ApiRequest {
            method: Method::POST,
            url: API_ENDPOINT.to_string(),
            headers,
            body,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// 执行一次模块调用并拆出业务对象。
    ///
    /// 响应顶层 `code` 非零视为远端业务错误；拆包时找不到模块
    /// 调用键则按原始响应整体返回。
    async fn execute(&self, module: &str, method: &str, param: Value) -> Result<Value> {
        let (request_key, envelope) = build_envelope(module, method, param);
        let request = self.build_request(&envelope)?;
        let response = self.transport.send(request).await?;

        trace!("原始 JSON 响应 {request_key}: {}", response.body);

        let mut value: Value = serde_json::from_str(&response.body)
            .map_err(|e| MusicApiError::Decoding(format!("响应不是合法 JSON: {e}")))?;

        if let Some(code) = value.get("code").and_then(Value::as_i64)
            && code != 0
        {
            let message = value
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or("未知错误")
                .to_string();
            return Err(MusicApiError::Upstream { code, message });
        }

        match value.get_mut(&request_key).map(Value::take) {
            Some(business_object) => Ok(business_object),
            None => {
                trace!("响应中未找到键 '{request_key}'，返回原始响应");
                Ok(value)
            }
        }
    }

    /// 歌曲搜索。
    pub async fn search_songs(&self, query: &SearchQuery) -> Result<Value> {
        let param = json!({
            "query": query.keywords,
            "page_no": query.offset / query.limit.max(1) + 1,
            "num_per_page": query.limit,
            "search_type": SearchType::Song.as_code(),
        });
        self.execute(SEARCH_MODULE, SEARCH_METHOD, param).await
    }

    /// 综合搜索，附带会话标识参数。
    pub async fn general_search(&self, query: &SearchQuery) -> Result<Value> {
        let param = json!({
            "query": query.keywords,
            "page_no": query.offset / query.limit.max(1) + 1,
            "num_per_page": query.limit,
            "search_type": SearchType::Song.as_code(),
            "nqc_flag": 0,
            "page_id": 1,
            "search_id": generate_search_id(),
        });
        self.execute(SEARCH_MODULE, SEARCH_METHOD, param).await
    }

    /// 快速搜索，固定取第一页。
    pub async fn quick_search(&self, keywords: &str, limit: u32) -> Result<Value> {
        let param = json!({
            "query": keywords,
            "page_no": 1,
            "num_per_page": limit,
            "search_type": SearchType::Song.as_code(),
        });
        self.execute(SEARCH_MODULE, SEARCH_METHOD, param).await
    }

    /// 按类型搜索。
    pub async fn search_by_type(
        &self,
        query: &SearchQuery,
        search_type: SearchType,
    ) -> Result<Value> {
        let param = json!({
            "query": query.keywords,
            "page_no": query.offset / query.limit.max(1) + 1,
            "num_per_page": query.limit,
            "search_type": search_type.as_code(),
        });
        self.execute(SEARCH_MODULE, SEARCH_METHOD, param).await
    }

    /// 获取歌词并解码所有请求到的子字段。
    ///
    /// 返回 `Ok(None)` 表示远端没有这首歌的歌词。
    pub async fn get_lyric(
        &self,
        songmid: &str,
        options: LyricOptions,
    ) -> Result<Option<LyricPayload>> {
        let param = json!({
            "songmid": songmid,
            "pcachetime": Utc::now().timestamp_millis(),
            "qrc": i32::from(options.qrc),
            "trans": i32::from(options.trans),
            "roma": i32::from(options.roma),
            "type": 1,
            "json": 1,
        });

        let business_object = self.execute(LYRIC_MODULE, LYRIC_METHOD, param).await?;
        let result: models::LyricApiResult = serde_json::from_value(business_object)
            .map_err(|e| MusicApiError::Decoding(format!("歌词响应结构不符合预期: {e}")))?;

        let Some(data) = result.data else {
            return Ok(None);
        };

        let timed_format = if options.qrc && !data.qrc.is_empty() {
            Some(lyric_codec::decode_timed_block(&data.qrc))
        } else {
            None
        };

        Ok(Some(LyricPayload {
            plain: lyric_codec::decode_lyric_block(&data.lyric).text,
            translated: lyric_codec::decode_lyric_block(&data.trans).text,
            romanized: lyric_codec::decode_lyric_block(&data.roma).text,
            timed_format,
        }))
    }

    /// 获取热搜词。
    pub async fn hotkey(&self) -> Result<Value> {
        let param = json!({ "search_id": generate_search_id() });
        self.execute(HOTKEY_MODULE, HOTKEY_METHOD, param).await
    }

    /// 获取搜索补全。
    pub async fn smartbox_complete(&self, keywords: &str) -> Result<Value> {
        let param = json!({
            "query": keywords,
            "search_id": generate_search_id(),
        });
        self.execute(SMARTBOX_MODULE, SMARTBOX_METHOD, param).await
    }
}
