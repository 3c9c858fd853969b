//! 网络传输层抽象。
//!
//! 编解码层只负责构造请求和解释响应，实际的收发通过 [`Transport`]
//! 完成。测试可以注入桩实现，生产环境使用基于 `reqwest` 的
//! [`HttpTransport`]。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, header::HeaderMap};

use crate::error::Result;

/// 一个已经编码完成、可以直接发送的请求。
///
/// 每次调用都会重新构造，因为请求体内嵌入的密钥是一次性的，
/// 不能跨调用复用。
#[derive(Debug)]
pub struct ApiRequest {
    /// HTTP 方法。
    pub method: Method,
    /// 完整的目标 URL。
    pub url: String,
    /// 请求头集合。
    pub headers: HeaderMap,
    /// 已编码的请求体。
    pub body: Vec<u8>,
    /// 本次请求的超时时间。
    pub timeout: Duration,
}

/// 传输层返回的原始响应。
#[derive(Debug)]
pub struct ApiResponse {
    /// HTTP 状态码。
    pub status: u16,
    /// 响应体文本。
    pub body: String,
}

/// 传输层需要实现的唯一原语。
///
/// 实现者不应解析响应内容，只负责把请求发出去并在超时内等回来。
#[async_trait]
pub trait Transport: Send + Sync {
    /// 发送请求并返回原始响应。
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// 基于 `reqwest` 的默认传输实现。
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// 创建一个新的 `HttpTransport`。
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .body(request.body)
            .timeout(request.timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ApiResponse { status, body })
    }
}
