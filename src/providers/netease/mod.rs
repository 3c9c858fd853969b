//! 网易云音乐平台的请求编解码与操作实现。
//!
//! 所有请求都走 WEAPI 加密方案：载荷经两轮 AES CBC 加密后作为
//! `params` 字段，一次性密钥经 RSA 包装后作为 `encSecKey` 字段，
//! 以表单形式 POST 到远端。

use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};

use chrono::Utc;
use reqwest::{
    Method,
    header::{
        ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, CONTENT_TYPE, COOKIE, HeaderMap,
        HeaderValue, PRAGMA, REFERER, USER_AGENT,
    },
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::trace;

use crate::{
    error::{MusicApiError, Result},
    model::SearchQuery,
    transport::{ApiRequest, Transport},
};

pub(crate) mod crypto;
pub mod models;

const BASE_URL: &str = "https://music.163.com";

const SEARCH_PATH: &str = "/weapi/search/get";
const CLOUD_SEARCH_PATH: &str = "/weapi/cloudsearch/pc";
const SUGGEST_PATH_PREFIX: &str = "/api/search/suggest";
const HOT_SEARCH_PATH: &str = "/api/search/hot";
const LYRIC_PATH: &str = "/weapi/song/lyric";

const NETEASE_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 该平台的接口响应较快，10 秒超时已经足够。
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

static PROCESS_IDENTITY: LazyLock<Arc<SessionIdentity>> =
    LazyLock::new(|| Arc::new(SessionIdentity::generate()));

/// 搜索结果类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// 单曲。
    Song,
    /// 专辑。
    Album,
    /// 歌手。
    Artist,
    /// 歌单。
    Playlist,
    /// 用户。
    User,
    /// MV。
    Mv,
    /// 歌词。
    Lyric,
    /// 电台。
    Radio,
    /// 视频。
    Video,
}

impl SearchType {
    /// 返回接口使用的类型编码。
    pub fn as_code(self) -> u32 {
        match self {
            Self::Song => 1,
            Self::Album => 10,
            Self::Artist => 100,
            Self::Playlist => 1000,
            Self::User => 1002,
            Self::Mv => 1004,
            Self::Lyric => 1006,
            Self::Radio => 1009,
            Self::Video => 1014,
        }
    }
}

/// 搜索建议的接口形态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestType {
    /// 网页端建议接口。
    Web,
    /// 移动端关键词接口。
    Mobile,
}

impl SuggestType {
    fn endpoint(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Mobile => "keyword",
        }
    }
}

/// 一组随请求发送的客户端身份属性，以 Cookie 形式携带。
///
/// 设备 ID 在进程启动时生成一次，之后保持不变；其余字段都是
/// 固定的客户端常量。初始化完成后整个结构只读，可安全地被并发
/// 调用共享。
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    /// 客户端版本号。
    pub app_version: String,
    /// 客户端版本编码。
    pub version_code: String,
    /// 构建时间戳（Unix 秒）。
    pub build_version: String,
    /// 屏幕分辨率。
    pub resolution: String,
    /// 操作系统标识。
    pub os: String,
    /// 操作系统版本串。
    pub os_version: String,
    /// 32 位随机字母数字设备 ID。
    pub device_id: String,
    /// 分发渠道。
    pub channel: String,
}

impl SessionIdentity {
    /// 生成一个新的身份实例，设备 ID 为随机值。
    pub fn generate() -> Self {
        Self {
            app_version: "8.20.20.231215173437".to_string(),
            version_code: "140".to_string(),
            build_version: Utc::now().timestamp().to_string(),
            resolution: "1920x1080".to_string(),
            os: "pc".to_string(),
            os_version: "Microsoft-Windows-10-Professional-build-22631-64bit".to_string(),
            device_id: crypto::create_secret_key(32),
            channel: "netease".to_string(),
        }
    }

    /// 返回进程级共享的身份实例。
    pub fn process() -> Arc<Self> {
        Arc::clone(&PROCESS_IDENTITY)
    }

    /// 按固定顺序列出全部 Cookie 属性。
    fn cookie_pairs(&self) -> [(&'static str, &str); 8] {
        [
            ("appver", &self.app_version),
            ("versioncode", &self.version_code),
            ("buildver", &self.build_version),
            ("resolution", &self.resolution),
            ("os", &self.os),
            ("osver", &self.os_version),
            ("deviceId", &self.device_id),
            ("channel", &self.channel),
        ]
    }

    /// 将身份属性编码为 Cookie 请求头的值。
    pub(crate) fn cookie_header(&self) -> String {
        self.cookie_pairs()
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// 网易云音乐的客户端实现。
///
/// 只持有传输句柄和只读身份，本身无状态，可被并发调用。
pub struct NeteaseClient {
    transport: Arc<dyn Transport>,
    identity: Arc<SessionIdentity>,
}

impl NeteaseClient {
    /// 使用进程级身份创建客户端。
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_identity(transport, SessionIdentity::process())
    }

    /// 使用自定义身份创建客户端。
    pub fn with_identity(transport: Arc<dyn Transport>, identity: Arc<SessionIdentity>) -> Self {
        Self {
            transport,
            identity,
        }
    }

    /// 为给定载荷构造一个完整的 WEAPI 加密请求。
    ///
    /// 每次调用都会生成新的一次性密钥，因此同一载荷两次构造出的
    /// 请求体不会逐字节相同。
    fn build_weapi_request<T: Serialize>(&self, path: &str, payload: &T) -> Result<ApiRequest> {
        let form = crypto::weapi_encrypt(payload)?;

        let body = format!(
            "params={}&encSecKey={}",
            urlencoding::encode(&form.params),
            form.enc_sec_key,
        );

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(NETEASE_UA));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers.insert(REFERER, HeaderValue::from_static("https://music.163.com/"));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
        );
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("empty"));
        headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("cors"));
        headers.insert("Sec-Fetch-Site", HeaderValue::from_static("same-origin"));
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let cookie_value = self
            .identity
            .cookie_header()
            .parse::<HeaderValue>()
            .map_err(|e| MusicApiError::Internal(format!("无法编码 Cookie 请求头: {e}")))?;
        headers.insert(COOKIE, cookie_value);

        Ok(ApiRequest {
            method: Method::POST,
            url: format!("{BASE_URL}{path}"),
            headers,
            body: body.into_bytes(),
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// 发送一个 WEAPI 请求并把响应体解析为 JSON。
    async fn post_weapi<T: Serialize>(&self, path: &str, payload: &T) -> Result<Value> {
        let request = self.build_weapi_request(path, payload)?;
        let response = self.transport.send(request).await?;

        trace!("WEAPI 原始响应 {path}: {}", response.body);

        if response.body.is_empty() {
            return Err(MusicApiError::Decoding(
                "WEAPI 接口返回了空响应".to_string(),
            ));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| MusicApiError::Decoding(format!("WEAPI 响应不是合法 JSON: {e}")))
    }

    /// 基础搜索接口。
    pub async fn search(&self, query: &SearchQuery, search_type: SearchType) -> Result<Value> {
        let payload = json!({
            "s": query.keywords,
            "type": search_type.as_code(),
            "limit": query.limit,
            "offset": query.offset,
            "csrf_token": "",
        });
        self.post_weapi(SEARCH_PATH, &payload).await
    }

    /// 云搜索接口。结果总数更准确，优先使用。
    pub async fn cloud_search(
        &self,
        query: &SearchQuery,
        search_type: SearchType,
    ) -> Result<Value> {
        let payload = json!({
            "s": query.keywords,
            "type": search_type.as_code(),
            "limit": query.limit,
            "offset": query.offset,
            "total": true,
            "csrf_token": "",
        });
        self.post_weapi(CLOUD_SEARCH_PATH, &payload).await
    }

    /// 搜索建议接口。
    pub async fn search_suggest(&self, keywords: &str, suggest_type: SuggestType) -> Result<Value> {
        let payload = json!({ "s": keywords });
        let path = format!("{}/{}", SUGGEST_PATH_PREFIX, suggest_type.endpoint());
        self.post_weapi(&path, &payload).await
    }

    /// 热门搜索接口。
    pub async fn hot_search(&self) -> Result<Value> {
        let payload = json!({ "type": 1111 });
        self.post_weapi(HOT_SEARCH_PATH, &payload).await
    }

    /// 获取歌词，包括翻译与罗马音版本。
    pub async fn get_lyric(&self, id: &str) -> Result<models::LyricResponse> {
        let payload = json!({
            "id": id,
            "lv": -1,
            "kv": -1,
            "tv": -1,
            "rv": -1,
            "csrf_token": "",
        });
        let value = self.post_weapi(LYRIC_PATH, &payload).await?;
        serde_json::from_value(value)
            .map_err(|e| MusicApiError::Decoding(format!("歌词响应结构不符合预期: {e}")))
    }
}
