use bytes::Bytes;
use futures::StreamExt;
use sea_spool_types::{Sink, SpoolResult, UnitBackend};
use std::time::{Duration, Instant};

use crate::{mib_per_sec, DriverErr, HttpClient, Throughput, DEFAULT_REPORT_INTERVAL};

/// Downloads one URL into a [`Sink`], restarting from scratch whenever the body breaks off.
#[derive(Debug)]
pub struct StreamDriver<C: HttpClient> {
    client: C,
    url: String,
    report_interval: Duration,
}

impl<C: HttpClient> StreamDriver<C> {
    pub fn new<S: Into<String>>(client: C, url: S) -> Self {
        Self {
            client,
            url: url.into(),
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn report_interval(&self) -> Duration {
        self.report_interval
    }

    pub fn set_report_interval(&mut self, v: Duration) -> &mut Self {
        self.report_interval = v;
        self
    }

    /// Stream until the body ends.
    ///
    /// `new_sink` is called once per attempt, so a restart always begins at unit index 1. Payload
    /// errors are retried without limit; any other error is returned. Returns the number of
    /// attempts made.
    pub async fn run<B, F>(&self, mut new_sink: F) -> Result<u32, DriverErr<B::Error>>
    where
        B: UnitBackend,
        F: FnMut() -> SpoolResult<Sink<B>, B::Error>,
    {
        let mut attempts = 0;
        loop {
            let mut sink = new_sink().map_err(DriverErr::Sink)?;
            attempts += 1;
            match self.attempt(&mut sink).await {
                Ok(()) => {
                    log::info!("Stream ended after {} unit(s)", sink.index());
                    return Ok(attempts);
                }
                Err(DriverErr::Http(e)) if e.is_transient() => {
                    log::error!("Exception streaming data, resetting connection: {e}");
                    if let Some(unit) = sink.current_unit() {
                        log::debug!("Abandoned unit {} ({unit})", sink.index());
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One request, read to the end. The end of the body is fed to the sink as an empty chunk,
    /// and so is any empty chunk the server sends; either one ends the attempt.
    async fn attempt<B: UnitBackend>(&self, sink: &mut Sink<B>) -> Result<(), DriverErr<B::Error>> {
        let mut body = self.client.stream(&self.url).await?;
        let mut meter = Throughput::new(self.report_interval);

        loop {
            let chunk = match body.next().await {
                Some(chunk) => chunk?,
                None => Bytes::new(),
            };
            sink.write(&chunk).await.map_err(DriverErr::Sink)?;
            if chunk.is_empty() {
                return Ok(());
            }
            if let Some(rate) = meter.record(chunk.len(), Instant::now()) {
                log::info!("Downloading at {:0.2} MB/s", mib_per_sec(rate));
            }
        }
    }
}
