//! 门面层的端到端测试，使用桩传输替代真实网络。

use std::sync::Arc;

use async_trait::async_trait;
use music_api_rs::{
    MusicApi, MusicApiError,
    transport::{ApiRequest, ApiResponse, Transport},
};

/// 永远返回同一响应体的桩传输。
struct StubTransport {
    body: String,
}

impl StubTransport {
    fn new(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: body.to_string(),
        })
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, _request: ApiRequest) -> music_api_rs::Result<ApiResponse> {
        Ok(ApiResponse {
            status: 200,
            body: self.body.clone(),
        })
    }
}

/// 永远失败的桩传输。
struct FailingTransport {
    reason: fn() -> MusicApiError,
}

#[async_trait]
impl Transport for FailingTransport {
    async fn send(&self, _request: ApiRequest) -> music_api_rs::Result<ApiResponse> {
        Err((self.reason)())
    }
}

#[tokio::test]
async fn search_netease_returns_canonical_songs() {
    let body = r#"{
        "code": 200,
        "result": {
            "songs": [
                {
                    "id": 186016,
                    "name": "七里香",
                    "ar": [{ "name": "周杰伦" }],
                    "al": { "name": "七里香" },
                    "dt": 296999
                },
                {
                    "id": 186017,
                    "name": "晴天",
                    "ar": [{ "name": "周杰伦" }],
                    "al": { "name": "叶惠美" },
                    "dt": 269000
                }
            ],
            "songCount": 2
        }
    }"#;

    let api = MusicApi::with_transport(StubTransport::new(body));
    let result = api.search_netease("test", 2, 0).await;

    assert_eq!(result.code, 200);
    assert_eq!(result.data.songs.len(), 2);
    assert_eq!(result.data.total, 2);
    for song in &result.data.songs {
        assert!(!song.duration_formatted.is_empty());
    }
    assert_eq!(result.data.songs[0].duration_formatted, "04:56");
}

#[tokio::test]
async fn search_qq_timeout_becomes_structured_error() {
    let transport = Arc::new(FailingTransport {
        reason: || MusicApiError::Timeout("timeout".to_string()),
    });
    let api = MusicApi::with_transport(transport);

    let result = api.search_qq("周杰伦", 2, 0).await;

    assert_eq!(result.code, 500);
    assert!(result.data.songs.is_empty());
    assert_eq!(result.data.total, 0);
    let error = result.data.error.expect("失败结果应携带错误信息");
    assert!(error.contains("timeout"));
}

#[tokio::test]
async fn search_netease_connection_reset_becomes_structured_error() {
    let transport = Arc::new(FailingTransport {
        reason: || MusicApiError::ConnectionReset("connection reset by peer".to_string()),
    });
    let api = MusicApi::with_transport(transport);

    let result = api.search_netease("test", 30, 0).await;
    assert_eq!(result.code, 500);
    assert!(result.data.error.unwrap().contains("connection reset by peer"));
}

#[tokio::test]
async fn search_with_shapeless_upstream_response_is_empty_success() {
    let api = MusicApi::with_transport(StubTransport::new(r#"{"code":200}"#));

    let result = api.search_netease("test", 2, 0).await;
    assert_eq!(result.code, 200);
    assert!(result.data.songs.is_empty());
    assert_eq!(result.data.total, 0);
}

#[tokio::test]
async fn get_netease_lyric_maps_blocks() {
    let body = r#"{
        "code": 200,
        "lrc": { "lyric": "[00:01.00]第一句" },
        "tlyric": { "lyric": "[00:01.00]first line" },
        "romalrc": { "lyric": "" }
    }"#;

    let api = MusicApi::with_transport(StubTransport::new(body));
    let result = api.get_netease_lyric("186016").await;

    assert_eq!(result.code, 200);
    assert_eq!(result.data.plain, "[00:01.00]第一句");
    assert_eq!(result.data.translated, "[00:01.00]first line");
    assert_eq!(result.data.romanized, "");
    assert!(result.error.is_none());
}

#[tokio::test]
async fn get_netease_lyric_not_found() {
    let api = MusicApi::with_transport(StubTransport::new(r#"{"code":404}"#));

    let result = api.get_netease_lyric("0").await;
    assert_eq!(result.code, 404);
    assert_eq!(result.data.plain, "");
    assert!(result.error.is_some());
}

#[tokio::test]
async fn get_qq_lyric_decodes_payload() {
    // "[00:01.00]你好" 的 Base64 是 WzAwOjAxLjAwXeS9oOWlvQ==
    let body = r#"{
        "code": 0,
        "music.musichallSong.PlayLyricInfo.GetPlayLyricInfo": {
            "code": 0,
            "data": { "lyric": "WzAwOjAxLjAwXeS9oOWlvQ==", "trans": "", "roma": "" }
        }
    }"#;

    let api = MusicApi::with_transport(StubTransport::new(body));
    let result = api.get_qq_lyric("001JDzPT1MgGy9").await;

    assert_eq!(result.code, 200);
    assert_eq!(result.data.plain, "[00:01.00]你好");
    assert_eq!(result.data.translated, "");
}

#[tokio::test]
async fn get_qq_lyric_upstream_error_becomes_500() {
    let api = MusicApi::with_transport(StubTransport::new(r#"{"code":2001,"msg":"拒绝访问"}"#));

    let result = api.get_qq_lyric("whatever").await;
    assert_eq!(result.code, 500);
    assert!(result.error.unwrap().contains("2001"));
}

#[tokio::test]
async fn facade_never_panics_on_garbage_body() {
    let api = MusicApi::with_transport(StubTransport::new("<html>这不是 JSON</html>"));

    let search = api.search_qq("test", 2, 0).await;
    assert_eq!(search.code, 500);

    let lyric = api.get_netease_lyric("186016").await;
    assert_eq!(lyric.code, 500);
}
