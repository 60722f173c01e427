use async_trait::async_trait;
use futures::stream::BoxStream;
use sea_spool_s3::{
    export::object_store::{
        memory::InMemory, path::Path, GetOptions, GetResult, ListResult, MultipartUpload,
        ObjectMeta, ObjectStore, PutMultipartOpts, PutOptions, PutPayload, PutResult,
        Result as ObjectResult,
    },
    ObjectBackend, ObjectOptions,
};
use sea_spool_types::{export::time::OffsetDateTime, FilenameGenerator, FixedEnv, Sink, Template};
use std::{
    fmt::Display,
    io::Read,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

/// An in-memory store that counts uploads.
#[derive(Debug)]
pub struct CountingStore {
    inner: InMemory,
    puts: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemory::new(),
            puts: AtomicUsize::new(0),
        }
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl Display for CountingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CountingStore({})", self.inner)
    }
}

#[async_trait]
impl ObjectStore for CountingStore {
    async fn put_opts(
        &self,
        location: &Path,
        payload: PutPayload,
        opts: PutOptions,
    ) -> ObjectResult<PutResult> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put_opts(location, payload, opts).await
    }

    async fn put_multipart_opts(
        &self,
        location: &Path,
        opts: PutMultipartOpts,
    ) -> ObjectResult<Box<dyn MultipartUpload>> {
        self.inner.put_multipart_opts(location, opts).await
    }

    async fn get_opts(&self, location: &Path, options: GetOptions) -> ObjectResult<GetResult> {
        self.inner.get_opts(location, options).await
    }

    async fn delete(&self, location: &Path) -> ObjectResult<()> {
        self.inner.delete(location).await
    }

    fn list(&self, prefix: Option<&Path>) -> BoxStream<'_, ObjectResult<ObjectMeta>> {
        self.inner.list(prefix)
    }

    async fn list_with_delimiter(&self, prefix: Option<&Path>) -> ObjectResult<ListResult> {
        self.inner.list_with_delimiter(prefix).await
    }

    async fn copy(&self, from: &Path, to: &Path) -> ObjectResult<()> {
        self.inner.copy(from, to).await
    }

    async fn copy_if_not_exists(&self, from: &Path, to: &Path) -> ObjectResult<()> {
        self.inner.copy_if_not_exists(from, to).await
    }
}

pub fn new_sink(
    template: &str,
    threshold: u64,
) -> anyhow::Result<(Arc<CountingStore>, Sink<ObjectBackend>)> {
    let store = Arc::new(CountingStore::new());
    let env = FixedEnv {
        now: OffsetDateTime::UNIX_EPOCH,
        uuid: "00000000-0000-0000-0000-000000000000".to_owned(),
        host: "localhost".to_owned(),
    };
    let names = FilenameGenerator::new(Template::compile(template)?, Arc::new(env));
    let backend = ObjectBackend::new(store.clone(), "test-bucket", ObjectOptions::default());
    Ok((store, Sink::new(backend, names, threshold)))
}

pub fn gunzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoded = Vec::new();
    flate2::read::GzDecoder::new(bytes).read_to_end(&mut decoded)?;
    Ok(decoded)
}
