use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::buffer::ReportBuffer;
use super::dedup::SubmittedUids;
use super::errors::ReportError;
use super::metrics::ReportMetrics;
use crate::breadcrumb::Breadcrumb;
use crate::config::{FlushPolicy, MonitorConfig, ReportHooks};
use crate::delivery::DeliveryEngine;
use crate::record::{Envelope, EventKind, EventRecord, ReportData};
use crate::utils::{UNIQUE_ID_LEN, now_millis, unique_id};

/// Sub-type of records produced by resource timing collection
const RESOURCE_SUB_TYPE: &str = "resource";

/// What happened to a record handed to [`Reporter::send`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Wrapped in its own envelope and handed to delivery
    Dispatched,
    /// Appended to the batch buffer
    Buffered,
    /// An earlier record with the same `errorUid` was already sent
    Duplicate,
    /// The error message matched the ignore list
    Ignored,
    /// A resource record smaller than the configured floor
    BelowResourceLimit,
    /// `before_data_report` returned `None`
    Cancelled,
}

/// Owns the buffer, the submitted-UID set and the delivery engine
pub struct Reporter {
    config: Arc<MonitorConfig>,
    hooks: ReportHooks,
    user_id: String,
    breadcrumb: Arc<Breadcrumb>,
    buffer: ReportBuffer,
    submitted: SubmittedUids,
    delivery: DeliveryEngine,
    metrics: ReportMetrics,
    handle: Handle,
}

impl Reporter {
    pub fn new(
        config: Arc<MonitorConfig>,
        hooks: ReportHooks,
        user_id: String,
        breadcrumb: Arc<Breadcrumb>,
        delivery: DeliveryEngine,
        handle: Handle,
    ) -> Self {
        Self {
            config,
            hooks,
            user_id,
            breadcrumb,
            buffer: ReportBuffer::new(),
            submitted: SubmittedUids::new(),
            delivery,
            metrics: ReportMetrics::new(),
            handle,
        }
    }

    /// Run `record` through the send pipeline.
    ///
    /// Delivery itself happens on a tracked task, so transport failures
    /// never show up here.
    ///
    /// # Arguments
    ///
    /// * `record` - Record to deduplicate, filter, stamp and hand to delivery
    /// * `immediate` - Send in its own envelope now instead of buffering for a batch
    ///
    /// # Returns
    ///
    /// The [`SendOutcome`]. Suppressed records (duplicate, ignored, below the
    /// resource floor, cancelled by the hook) resolve to `Ok` with the
    /// matching outcome.
    ///
    /// # Errors
    ///
    /// [`ReportError::MissingUrl`] when no collector URL is configured; the
    /// record is logged and dropped.
    pub async fn send(
        self: &Arc<Self>,
        record: EventRecord,
        immediate: bool,
    ) -> Result<SendOutcome, ReportError> {
        if let Some(uid) = record.error_uid()
            && !self.submitted.insert(uid)
        {
            ReportMetrics::bump(&self.metrics.duplicates);
            log::debug!("Suppressing duplicate error '{uid}'");
            return Ok(SendOutcome::Duplicate);
        }

        if let Some(message) = record.main_data.message()
            && self.config.is_ignored(message)
        {
            ReportMetrics::bump(&self.metrics.ignored);
            log::debug!("Ignoring error matching ignore list: {message}");
            return Ok(SendOutcome::Ignored);
        }

        if self.is_below_resource_limit(&record) {
            ReportMetrics::bump(&self.metrics.below_limit);
            log::debug!("Dropping resource record below size floor");
            return Ok(SendOutcome::BelowResourceLimit);
        }

        let mut record = self.format_record(record);

        if let Some(hook) = &self.hooks.before_data_report {
            match hook(record).await {
                Some(updated) => record = updated,
                None => {
                    ReportMetrics::bump(&self.metrics.cancelled);
                    log::debug!("Record cancelled by before_data_report hook");
                    return Ok(SendOutcome::Cancelled);
                }
            }
        }

        if !self.config.has_url() {
            ReportMetrics::bump(&self.metrics.missing_url);
            log::error!("Report url is not configured; dropping '{}' record", record.sub_type);
            return Err(ReportError::MissingUrl);
        }

        Ok(self.send_time(record, immediate))
    }

    /// Spawn [`send`](Self::send) for callers that cannot await.
    ///
    /// The task is tracked by the delivery engine, so teardown waits for it.
    pub fn dispatch(
        self: &Arc<Self>,
        record: EventRecord,
        immediate: bool,
    ) -> JoinHandle<Result<SendOutcome, ReportError>> {
        let reporter = Arc::clone(self);
        self.delivery
            .in_flight()
            .spawn(&self.handle, async move { reporter.send(record, immediate).await })
    }

    /// Drain everything buffered and deliver it now, bypassing the threshold.
    ///
    /// Cancels the pending debounce timer and delivers one batch envelope
    /// through the request transport on the caller's task. Nothing is retried.
    ///
    /// # Returns
    ///
    /// The number of records flushed; 0 when the buffer was empty, in which
    /// case nothing is sent.
    ///
    /// # Errors
    ///
    /// [`ReportError::MissingUrl`] when buffered records exist but no
    /// collector URL is configured, or the transport error of the awaited
    /// delivery.
    pub async fn flush_all(&self) -> Result<usize, ReportError> {
        self.buffer.cancel_timer();
        let records = self.buffer.drain_all();
        if records.is_empty() {
            return Ok(0);
        }
        if !self.config.has_url() {
            ReportMetrics::bump(&self.metrics.missing_url);
            log::error!(
                "Report url is not configured; dropping {} buffered records",
                records.len()
            );
            return Err(ReportError::MissingUrl);
        }

        let count = records.len();
        let envelope = self.envelope(ReportData::Batch(records));
        ReportMetrics::bump(&self.metrics.batches_flushed);
        self.delivery.deliver_now(&envelope, &self.config.url).await?;
        Ok(count)
    }

    fn send_time(self: &Arc<Self>, record: EventRecord, immediate: bool) -> SendOutcome {
        if immediate {
            let envelope = self.envelope(ReportData::Single(Box::new(record)));
            ReportMetrics::bump(&self.metrics.dispatched);
            let _ = self.delivery.report(envelope, self.config.url.clone());
            return SendOutcome::Dispatched;
        }

        self.buffer.push(record);
        ReportMetrics::bump(&self.metrics.buffered);
        self.schedule_flush();
        SendOutcome::Buffered
    }

    /// Restart the trailing-debounce timer
    fn schedule_flush(self: &Arc<Self>) {
        let reporter = Arc::downgrade(self);
        let quiet = self.config.flush_interval_duration();
        let timer = self.handle.spawn(async move {
            tokio::time::sleep(quiet).await;
            if let Some(reporter) = reporter.upgrade() {
                reporter.on_flush_timer();
            }
        });
        self.buffer.replace_timer(timer);
    }

    /// Timer fire: deliver the buffer only once it reached `cache_num`
    fn on_flush_timer(&self) {
        let threshold = match self.config.flush_policy {
            FlushPolicy::WaitForThreshold => self.config.cache_num,
            FlushPolicy::FlushPartial => 1,
        };
        match self.buffer.drain_if_at_least(threshold) {
            Some(records) => {
                log::debug!("Flushing batch of {} records", records.len());
                let envelope = self.envelope(ReportData::Batch(records));
                ReportMetrics::bump(&self.metrics.batches_flushed);
                let _ = self.delivery.report(envelope, self.config.url.clone());
            }
            None => {
                log::debug!(
                    "Batch below threshold ({} of {}); waiting for next send",
                    self.buffer.len(),
                    threshold
                );
            }
        }
    }

    fn is_below_resource_limit(&self, record: &EventRecord) -> bool {
        record.kind == EventKind::Performance
            && record.sub_type == RESOURCE_SUB_TYPE
            && record
                .main_data
                .get("transferSize")
                .and_then(serde_json::Value::as_f64)
                .is_some_and(|size| self.config.is_below_resource_limit(size))
    }

    /// Stamp time and page, and attach history to error records
    fn format_record(&self, mut record: EventRecord) -> EventRecord {
        if record.time == 0 {
            record.time = now_millis();
        }
        if record.page_url.is_empty() {
            record.page_url = self.hooks.current_page_url();
        }
        if record.kind == EventKind::Error {
            record.breadcrumb_data = Some(self.breadcrumb.get_stack());
        }
        record
    }

    fn envelope(&self, data: ReportData) -> Envelope {
        Envelope {
            id: unique_id(UNIQUE_ID_LEN),
            app_id: self.config.app_id.clone(),
            user_id: self.user_id.clone(),
            app_name: self.config.app_name.clone(),
            sdk_name: Some(self.config.sdk_name.clone()),
            sdk_version: Some(self.config.sdk_version.clone()),
            environment: self.config.environment.clone(),
            network_info: self.hooks.current_network_info(),
            data,
        }
    }

    #[must_use]
    pub fn buffer(&self) -> &ReportBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn submitted(&self) -> &SubmittedUids {
        &self.submitted
    }

    #[must_use]
    pub fn breadcrumb(&self) -> &Arc<Breadcrumb> {
        &self.breadcrumb
    }

    #[must_use]
    pub fn delivery(&self) -> &DeliveryEngine {
        &self.delivery
    }

    #[must_use]
    pub fn metrics(&self) -> &ReportMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("url", &self.config.url)
            .field("buffered", &self.buffer.len())
            .field("submitted", &self.submitted.len())
            .field("delivery", &self.delivery)
            .finish()
    }
}
