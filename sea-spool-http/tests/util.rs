use bytes::Bytes;
use futures::StreamExt;
use sea_spool_http::{ByteStream, HttpClient, HttpErr};
use sea_spool_types::{
    export::time::OffsetDateTime, FilenameGenerator, FixedEnv, Sink, Template, UnitBackend,
};
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

#[derive(Debug)]
pub enum Script {
    Refuse(HttpErr),
    Body(Vec<Result<Bytes, HttpErr>>),
}

/// Serves one script per request, in order.
#[derive(Debug)]
pub struct ScriptedClient {
    scripts: Mutex<VecDeque<Script>>,
    requests: AtomicUsize,
}

impl ScriptedClient {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl HttpClient for ScriptedClient {
    async fn stream(&self, url: &str) -> Result<ByteStream, HttpErr> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let script = self.scripts.lock().unwrap().pop_front();
        match script {
            Some(Script::Body(chunks)) => Ok(futures::stream::iter(chunks).boxed()),
            Some(Script::Refuse(e)) => Err(e),
            None => Err(HttpErr::Status {
                url: url.to_owned(),
                status: 410,
            }),
        }
    }
}

pub fn chunk(bytes: &'static [u8]) -> Result<Bytes, HttpErr> {
    Ok(Bytes::from_static(bytes))
}

pub fn broken_pipe() -> Result<Bytes, HttpErr> {
    Err(HttpErr::payload(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "connection reset mid-body",
    )))
}

#[derive(Debug, thiserror::Error)]
#[error("RecordErr")]
pub struct RecordErr;

/// Committed units, shared by every sink built from the same [`Recorder`].
pub type Committed = Arc<Mutex<Vec<(String, Vec<u8>)>>>;

#[derive(Debug, Default)]
pub struct Recorder {
    committed: Committed,
    open: Option<(String, Vec<u8>)>,
    broken: bool,
}

impl Recorder {
    pub fn new(committed: Committed) -> Self {
        Self {
            committed,
            ..Default::default()
        }
    }

    /// A backend that fails on every call.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Default::default()
        }
    }
}

impl UnitBackend for Recorder {
    type Error = RecordErr;

    async fn new_file(&mut self, name: &str) -> Result<(), RecordErr> {
        if self.broken || self.open.is_some() {
            return Err(RecordErr);
        }
        self.open = Some((name.to_owned(), Vec::new()));
        Ok(())
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), RecordErr> {
        let (_, buffer) = self.open.as_mut().ok_or(RecordErr)?;
        buffer.extend_from_slice(bytes);
        Ok(())
    }

    async fn close_file(&mut self) -> Result<(), RecordErr> {
        let unit = self.open.take().ok_or(RecordErr)?;
        self.committed.lock().unwrap().push(unit);
        Ok(())
    }
}

pub fn new_sink(backend: Recorder, threshold: u64) -> Sink<Recorder> {
    let env = FixedEnv {
        now: OffsetDateTime::UNIX_EPOCH,
        uuid: "00000000-0000-0000-0000-000000000000".to_owned(),
        host: "localhost".to_owned(),
    };
    let template = Template::compile("file-$index").unwrap();
    Sink::new(
        backend,
        FilenameGenerator::new(template, Arc::new(env)),
        threshold,
    )
}

pub fn units(committed: &Committed) -> Vec<(String, String)> {
    committed
        .lock()
        .unwrap()
        .iter()
        .map(|(name, bytes)| (name.clone(), String::from_utf8_lossy(bytes).into_owned()))
        .collect()
}

/// Accepts one connection, replies with `response` verbatim and hangs up. The handle resolves to
/// the request head as received.
pub async fn serve_once(
    response: &'static [u8],
) -> anyhow::Result<(String, tokio::task::JoinHandle<anyhow::Result<String>>)> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://{}/stream", listener.local_addr()?);
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        socket.write_all(response).await?;
        socket.shutdown().await?;
        Ok(String::from_utf8_lossy(&head).into_owned())
    });
    Ok((url, handle))
}

/// Read the body to the end, or up to the first error.
pub async fn drain(mut body: ByteStream) -> (Vec<u8>, Option<HttpErr>) {
    let mut bytes = Vec::new();
    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(chunk) => bytes.extend_from_slice(&chunk),
            Err(e) => return (bytes, Some(e)),
        }
    }
    (bytes, None)
}
