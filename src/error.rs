//! 定义了整个库的错误类型 `MusicApiError`。

use thiserror::Error;

/// `music-api-rs` 库的通用错误枚举。
#[derive(Error, Debug)]
pub enum MusicApiError {
    /// 请求载荷序列化失败 (源自 `serde_json::Error`)
    #[error("请求序列化失败: {0}")]
    Encoding(#[from] serde_json::Error),

    /// 加密失败（密钥材料无效或加密前置条件不满足）
    #[error("加密失败: {0}")]
    Crypto(String),

    /// 网络请求超时
    #[error("请求超时: {0}")]
    Timeout(String),

    /// 连接被对端重置
    #[error("网络连接被重置: {0}")]
    ConnectionReset(String),

    /// 其它网络层错误
    #[error("网络请求失败: {0}")]
    Transport(String),

    /// 远端在响应体内返回了业务错误码
    #[error("接口返回业务错误 (code {code}): {message}")]
    Upstream {
        /// 远端载荷中携带的业务错误码。
        code: i64,
        /// 远端给出的错误描述，可能为空。
        message: String,
    },

    /// 响应体的结构或编码不符合预期
    #[error("响应解析失败: {0}")]
    Decoding(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

/// `MusicApiError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, MusicApiError>;

impl From<reqwest::Error> for MusicApiError {
    fn from(err: reqwest::Error) -> Self {
        // 超时和连接重置需要区分开，便于调用方诊断；本层都不会自动重试
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionReset(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
