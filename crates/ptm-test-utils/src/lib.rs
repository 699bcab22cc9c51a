//! Testing utilities for the product team member workspace
//!
//! Shared test helpers, fixtures, and recording collaborators.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use ptm_core::{
    BackendError, CreatePayload, CreatorConfig, HostContainer, LookupWidget, MemberTypeOption,
    Notifier, ObjectMetadata, ParentRecordId, PicklistValue, ProductTeamMemberCreator,
    ProductTeamMemberSharing, ProductTeamService, SchemaConfig, SearchRequest, SearchResult,
    SharingRow, Toast, ToastVariant,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

type Reply<T> = Result<T, BackendError>;

/// Backend call as seen by [`ScriptedService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    CheckAccess(String),
    ListMemberTypes,
    ResolveMetadata(String),
    ListPicklistValues { record_type_id: String, field: String },
    Search(SearchRequest),
    Create(CreatePayload),
    ListSharingRows(String),
}

#[derive(Debug)]
struct Script {
    access: Reply<bool>,
    member_types: Reply<Vec<MemberTypeOption>>,
    metadata: Reply<ObjectMetadata>,
    picklists: HashMap<String, Reply<Vec<PicklistValue>>>,
    search: Reply<Vec<SearchResult>>,
    create: Reply<()>,
    sharing_rows: Reply<Vec<SharingRow>>,
}

impl Default for Script {
    fn default() -> Self {
        let schema = SchemaConfig::default();
        let mut picklists = HashMap::new();
        picklists.insert(schema.access_level_field, Ok(access_level_values()));
        picklists.insert(schema.role_field, Ok(role_values()));
        Self {
            access: Ok(true),
            member_types: Ok(vec![distributor_type()]),
            metadata: Ok(ObjectMetadata {
                default_record_type_id: RECORD_TYPE_ID.to_string(),
            }),
            picklists,
            search: Ok(vec![ann_result()]),
            create: Ok(()),
            sharing_rows: Ok(Vec::new()),
        }
    }
}

/// In-memory backend with scripted replies
///
/// Defaults: access granted, one member type (`T1`), access levels and roles
/// present, search returns one candidate (`M9`), create succeeds, no sharing
/// rows. Access checks and searches can be gated to control resolution order.
#[derive(Debug, Default)]
pub struct ScriptedService {
    script: Mutex<Script>,
    access_gate: Mutex<Option<oneshot::Receiver<Reply<bool>>>>,
    search_gates: Mutex<HashMap<String, oneshot::Receiver<Reply<Vec<SearchResult>>>>>,
    calls: Mutex<Vec<ServiceCall>>,
}

impl ScriptedService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_access(self, granted: bool) -> Self {
        self.script.lock().access = Ok(granted);
        self
    }

    #[must_use]
    pub fn failing_access(self, error: BackendError) -> Self {
        self.script.lock().access = Err(error);
        self
    }

    #[must_use]
    pub fn with_member_types(self, types: Vec<MemberTypeOption>) -> Self {
        self.script.lock().member_types = Ok(types);
        self
    }

    #[must_use]
    pub fn failing_member_types(self, error: BackendError) -> Self {
        self.script.lock().member_types = Err(error);
        self
    }

    #[must_use]
    pub fn failing_metadata(self, error: BackendError) -> Self {
        self.script.lock().metadata = Err(error);
        self
    }

    #[must_use]
    pub fn with_picklist(self, field: &str, values: Vec<PicklistValue>) -> Self {
        self.script.lock().picklists.insert(field.to_string(), Ok(values));
        self
    }

    #[must_use]
    pub fn failing_picklist(self, field: &str, error: BackendError) -> Self {
        self.script.lock().picklists.insert(field.to_string(), Err(error));
        self
    }

    #[must_use]
    pub fn with_search_results(self, results: Vec<SearchResult>) -> Self {
        self.script.lock().search = Ok(results);
        self
    }

    #[must_use]
    pub fn failing_search(self, error: BackendError) -> Self {
        self.script.lock().search = Err(error);
        self
    }

    #[must_use]
    pub fn failing_create(self, error: BackendError) -> Self {
        self.script.lock().create = Err(error);
        self
    }

    #[must_use]
    pub fn with_sharing_rows(self, rows: Vec<SharingRow>) -> Self {
        self.script.lock().sharing_rows = Ok(rows);
        self
    }

    #[must_use]
    pub fn failing_sharing_rows(self, error: BackendError) -> Self {
        self.script.lock().sharing_rows = Err(error);
        self
    }

    /// Hold the next access check until the returned sender fires
    pub fn gate_access(&self) -> oneshot::Sender<Reply<bool>> {
        let (tx, rx) = oneshot::channel();
        *self.access_gate.lock() = Some(rx);
        tx
    }

    /// Hold the next search for `term` until the returned sender fires
    pub fn gate_search(&self, term: &str) -> oneshot::Sender<Reply<Vec<SearchResult>>> {
        let (tx, rx) = oneshot::channel();
        self.search_gates.lock().insert(term.to_string(), rx);
        tx
    }

    /// Every call received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().clone()
    }

    /// Calls matching `pred`
    pub fn count_calls(&self, pred: impl Fn(&ServiceCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: ServiceCall) {
        self.calls.lock().push(call);
    }
}

async fn gated<T>(gate: Option<oneshot::Receiver<Reply<T>>>) -> Option<Reply<T>> {
    match gate {
        Some(rx) => Some(
            rx.await
                .unwrap_or_else(|_| Err(BackendError::Unavailable("gate dropped".to_string()))),
        ),
        None => None,
    }
}

#[async_trait]
impl ProductTeamService for ScriptedService {
    async fn check_access(&self, product_id: &ParentRecordId) -> Result<bool, BackendError> {
        self.record(ServiceCall::CheckAccess(product_id.to_string()));
        let gate = self.access_gate.lock().take();
        match gated(gate).await {
            Some(reply) => reply,
            None => self.script.lock().access.clone(),
        }
    }

    async fn list_member_types(&self) -> Result<Vec<MemberTypeOption>, BackendError> {
        self.record(ServiceCall::ListMemberTypes);
        self.script.lock().member_types.clone()
    }

    async fn resolve_metadata(&self, object_api_name: &str) -> Result<ObjectMetadata, BackendError> {
        self.record(ServiceCall::ResolveMetadata(object_api_name.to_string()));
        self.script.lock().metadata.clone()
    }

    async fn list_picklist_values(
        &self,
        record_type_id: &str,
        field_api_name: &str,
    ) -> Result<Vec<PicklistValue>, BackendError> {
        self.record(ServiceCall::ListPicklistValues {
            record_type_id: record_type_id.to_string(),
            field: field_api_name.to_string(),
        });
        self.script
            .lock()
            .picklists
            .get(field_api_name)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, BackendError> {
        self.record(ServiceCall::Search(request.clone()));
        let gate = self.search_gates.lock().remove(&request.search_term);
        match gated(gate).await {
            Some(reply) => reply,
            None => self.script.lock().search.clone(),
        }
    }

    async fn create_association(&self, payload: &CreatePayload) -> Result<(), BackendError> {
        self.record(ServiceCall::Create(payload.clone()));
        self.script.lock().create.clone()
    }

    async fn list_sharing_rows(
        &self,
        product_id: &ParentRecordId,
    ) -> Result<Vec<SharingRow>, BackendError> {
        self.record(ServiceCall::ListSharingRows(product_id.to_string()));
        self.script.lock().sharing_rows.clone()
    }
}

/// Notifier that keeps every toast
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.messages(ToastVariant::Error)
    }

    #[must_use]
    pub fn successes(&self) -> Vec<String> {
        self.messages(ToastVariant::Success)
    }

    /// Label identifiers of error notifications, in order
    #[must_use]
    pub fn error_keys(&self) -> Vec<&'static str> {
        self.toasts
            .lock()
            .iter()
            .filter(|t| t.variant == ToastVariant::Error)
            .map(|t| t.key.as_str())
            .collect()
    }

    fn messages(&self, variant: ToastVariant) -> Vec<String> {
        self.toasts
            .lock()
            .iter()
            .filter(|t| t.variant == variant)
            .map(|t| t.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().push(toast);
    }
}

/// Container that counts close requests
#[derive(Debug, Default)]
pub struct RecordingContainer {
    closes: AtomicUsize,
}

impl RecordingContainer {
    #[must_use]
    pub fn close_requests(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl HostContainer for RecordingContainer {
    fn request_close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Search widget that keeps every result batch
#[derive(Debug, Default)]
pub struct RecordingLookup {
    batches: Mutex<Vec<Vec<SearchResult>>>,
    clears: AtomicUsize,
}

impl RecordingLookup {
    #[must_use]
    pub fn batches(&self) -> Vec<Vec<SearchResult>> {
        self.batches.lock().clone()
    }

    #[must_use]
    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl LookupWidget for RecordingLookup {
    fn set_search_results(&self, results: Vec<SearchResult>) {
        self.batches.lock().push(results);
    }

    fn clear_selection(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

pub const RECORD_TYPE_ID: &str = "012000000000000AAA";

pub fn distributor_type() -> MemberTypeOption {
    MemberTypeOption::new("T1", "Distributor", "Distributor__c")
}

pub fn retailer_type() -> MemberTypeOption {
    MemberTypeOption::new("T2", "Retailer", "Retailer__c")
}

pub fn access_level_values() -> Vec<PicklistValue> {
    vec![
        PicklistValue::new("Read Only", "Read"),
        PicklistValue::new("Read/Write", "Edit"),
    ]
}

pub fn role_values() -> Vec<PicklistValue> {
    vec![
        PicklistValue::new("Sales", "Sales"),
        PicklistValue::new("Support", "Support"),
    ]
}

pub fn ann_result() -> SearchResult {
    SearchResult::new("M9", "Account", "Ann")
}

pub fn backend_down() -> BackendError {
    BackendError::Unavailable("connection refused".to_string())
}

/// Creator wired to recording collaborators
#[derive(Debug)]
pub struct CreatorHarness {
    pub creator: ProductTeamMemberCreator,
    pub service: Arc<ScriptedService>,
    pub notifier: Arc<RecordingNotifier>,
    pub container: Arc<RecordingContainer>,
    pub lookup: Arc<RecordingLookup>,
}

pub fn setup_creator(service: ScriptedService) -> CreatorHarness {
    setup_creator_with_config(service, CreatorConfig::new())
}

pub fn setup_creator_with_config(service: ScriptedService, config: CreatorConfig) -> CreatorHarness {
    let service = Arc::new(service);
    let notifier = Arc::new(RecordingNotifier::default());
    let container = Arc::new(RecordingContainer::default());
    let lookup = Arc::new(RecordingLookup::default());
    let creator = ProductTeamMemberCreator::new(
        Arc::clone(&service) as Arc<dyn ProductTeamService>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        Arc::clone(&container) as Arc<dyn HostContainer>,
        config,
    )
    .with_lookup(Arc::clone(&lookup) as Arc<dyn LookupWidget>);

    CreatorHarness {
        creator,
        service,
        notifier,
        container,
        lookup,
    }
}

/// Sharing view wired to a recording notifier
#[derive(Debug)]
pub struct SharingHarness {
    pub sharing: ProductTeamMemberSharing,
    pub service: Arc<ScriptedService>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn setup_sharing(service: ScriptedService) -> SharingHarness {
    let service = Arc::new(service);
    let notifier = Arc::new(RecordingNotifier::default());
    let sharing = ProductTeamMemberSharing::new(
        Arc::clone(&service) as Arc<dyn ProductTeamService>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        CreatorConfig::new(),
    );

    SharingHarness {
        sharing,
        service,
        notifier,
    }
}

/// Route `tracing` output to the test writer; `RUST_LOG` filters it
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory sink for `tracing` output
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Capture every event on the current thread until the guard drops
    #[must_use]
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .without_time()
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Formatted lines captured so far
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buffer.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// First captured line containing `needle`
    #[must_use]
    pub fn find(&self, needle: &str) -> Option<String> {
        self.lines().into_iter().find(|line| line.contains(needle))
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
