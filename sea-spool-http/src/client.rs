use bytes::Bytes;
use futures::{stream::BoxStream, StreamExt};
use std::{future::Future, time::Duration};

use crate::HttpErr;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// A response body, chunk by chunk.
pub type ByteStream = BoxStream<'static, Result<Bytes, HttpErr>>;

/// The one request the driver needs: a streaming GET.
pub trait HttpClient: Send + Sync {
    /// Send the request and hand back the body as a stream. Fails on any non-success status.
    ///
    /// Errors while reading the body should be reported as [`HttpErr::Payload`], so the caller
    /// can tell them apart from a failed request.
    fn stream(&self, url: &str) -> impl Future<Output = Result<ByteStream, HttpErr>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpOptions {
    connect_timeout: Duration,
    basic_auth: Option<BasicAuth>,
}

#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: Option<String>,
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    options: HttpOptions,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            basic_auth: None,
        }
    }
}

impl HttpOptions {
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn set_connect_timeout(&mut self, v: Duration) -> &mut Self {
        self.connect_timeout = v;
        self
    }

    pub fn basic_auth(&self) -> Option<&BasicAuth> {
        self.basic_auth.as_ref()
    }

    pub fn set_basic_auth(&mut self, username: String, password: Option<String>) -> &mut Self {
        self.basic_auth = Some(BasicAuth { username, password });
        self
    }
}

impl BasicAuth {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "******"))
            .finish()
    }
}

impl ReqwestClient {
    pub fn new(options: HttpOptions) -> Result<Self, HttpErr> {
        let client = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(HttpErr::Request)?;
        Ok(Self { client, options })
    }

    pub fn options(&self) -> &HttpOptions {
        &self.options
    }
}

impl HttpClient for ReqwestClient {
    async fn stream(&self, url: &str) -> Result<ByteStream, HttpErr> {
        let mut request = self.client.get(url);
        if let Some(auth) = &self.options.basic_auth {
            request = request.basic_auth(&auth.username, auth.password.as_ref());
        }

        let response = request.send().await.map_err(HttpErr::Request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(HttpErr::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }
        log::debug!("GET {url} {status}");

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(classify))
            .boxed())
    }
}

fn classify(err: reqwest::Error) -> HttpErr {
    if err.is_body() || err.is_decode() {
        HttpErr::payload(err)
    } else {
        HttpErr::Request(err)
    }
}
