// In-memory adapters for exercising commands and handlers without I/O

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use backend_domain::{
    BlogPayload, BlogPost, BlogRepository, Claims, ConfigRepository, ConsoleReply,
    DatabaseRepository, DnsProvider, DnsRecord, GameConsole, Hypervisor, HypervisorError,
    LogLevel, LogMessage, LogRepository, PlaytimeEntry, PlaytimeRepository, PublicIpRecord,
    PublicIpRepository, PublicIpSource, RconConfig, RuntimeConfig, TokenService, VmInventory,
};

use crate::{AppState, Journal, Metrics};

pub const TEST_ADMIN_USERNAME: &str = "admin";
pub const TEST_ADMIN_PASSWORD: &str = "hunter2";

pub fn test_runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        admin_username: Some(TEST_ADMIN_USERNAME.to_string()),
        admin_password: Some(TEST_ADMIN_PASSWORD.to_string()),
        playtime_interval_seconds: 600,
        reconcile_interval_seconds: 60,
        max_body_bytes: 1024 * 1024,
        request_timeout_seconds: 5,
        log_retention_hours: 24,
    }
}

pub struct TestHarness {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub dns: Arc<FakeDnsProvider>,
    pub ip_source: Arc<FakeIpSource>,
    pub console: Arc<FakeConsole>,
    pub hypervisor: Arc<FakeHypervisor>,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let dns = Arc::new(FakeDnsProvider::default());
        let ip_source = Arc::new(FakeIpSource::default());
        let console = Arc::new(FakeConsole::default());
        let hypervisor = Arc::new(FakeHypervisor::default());

        let state = AppState {
            config: test_runtime_config(),
            database: store.clone(),
            blog_repo: store.clone(),
            public_ip_repo: store.clone(),
            playtime_repo: store.clone(),
            log_repo: store.clone(),
            config_repo: store.clone(),
            ip_source: ip_source.clone(),
            dns_provider: dns.clone(),
            console: console.clone(),
            hypervisor: hypervisor.clone(),
            token_service: Arc::new(FakeTokenService),
            journal: Journal::new(store.clone()),
            metrics: Arc::new(Metrics::default()),
            ip_audit_lock: Arc::new(tokio::sync::Mutex::new(())),
        };

        Self {
            state,
            store,
            dns,
            ip_source,
            console,
            hypervisor,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    posts: Vec<BlogPost>,
    ip_records: Vec<PublicIpRecord>,
    playtime: Vec<PlaytimeEntry>,
    logs: Vec<LogMessage>,
    rcon: RconConfig,
    unavailable: bool,
    failing_players: Vec<String>,
    yield_on_last_ip: bool,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Implements every repository port over plain vectors.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store lock")
    }

    pub fn post(&self, id: i64) -> Option<BlogPost> {
        self.tables().posts.iter().find(|post| post.id == id).cloned()
    }

    pub fn ip_records(&self) -> Vec<PublicIpRecord> {
        self.tables().ip_records.clone()
    }

    pub fn playtime_rows(&self) -> Vec<PlaytimeEntry> {
        self.tables().playtime.clone()
    }

    pub fn playtime_minutes(&self, user_name: &str, date: NaiveDate) -> Option<i64> {
        self.tables()
            .playtime
            .iter()
            .find(|entry| entry.user_name == user_name && entry.date == date)
            .map(|entry| entry.playtime_minutes)
    }

    pub fn logs(&self) -> Vec<LogMessage> {
        self.tables().logs.clone()
    }

    /// Makes `ping` fail, as an unreachable database would.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.tables().unavailable = unavailable;
    }

    /// Playtime lookups for `user_name` fail from now on.
    pub fn fail_playtime_for(&self, user_name: &str) {
        self.tables().failing_players.push(user_name.to_string());
    }

    /// `last_known_ip` hands control back to the scheduler before reading,
    /// so concurrent callers interleave there.
    pub fn yield_on_last_ip(&self, enabled: bool) {
        self.tables().yield_on_last_ip = enabled;
    }
}

#[async_trait]
impl DatabaseRepository for MemoryStore {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        if self.tables().unavailable {
            bail!("database unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl BlogRepository for MemoryStore {
    async fn list_posts(&self) -> Result<Vec<BlogPost>> {
        let mut posts = self.tables().posts.clone();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(posts)
    }

    async fn find_post(&self, id: i64) -> Result<Option<BlogPost>> {
        Ok(self.post(id))
    }

    async fn insert_post(&self, payload: &BlogPayload, now: DateTime<Utc>) -> Result<BlogPost> {
        let mut tables = self.tables();
        let post = BlogPost {
            id: tables.next_id(),
            title: payload.title.clone(),
            content: payload.content.clone(),
            author: payload.author.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: i64, payload: &BlogPayload, now: DateTime<Utc>) -> Result<bool> {
        let mut tables = self.tables();
        let Some(post) = tables.posts.iter_mut().find(|post| post.id == id) else {
            return Ok(false);
        };
        post.title = payload.title.clone();
        post.content = payload.content.clone();
        post.author = payload.author.clone();
        post.updated_at = now;
        Ok(true)
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables();
        let before = tables.posts.len();
        tables.posts.retain(|post| post.id != id);
        Ok(tables.posts.len() != before)
    }
}

#[async_trait]
impl PublicIpRepository for MemoryStore {
    async fn last_known_ip(&self) -> Result<Option<String>> {
        let yield_first = self.tables().yield_on_last_ip;
        if yield_first {
            tokio::task::yield_now().await;
        }
        Ok(self
            .tables()
            .ip_records
            .iter()
            .max_by_key(|record| (record.changed_at, record.id))
            .map(|record| record.new_ip.clone()))
    }

    async fn insert_record(
        &self,
        new_ip: &str,
        old_ip: Option<&str>,
        changed_at: DateTime<Utc>,
    ) -> Result<PublicIpRecord> {
        let mut tables = self.tables();
        let record = PublicIpRecord {
            id: tables.next_id(),
            new_ip: new_ip.to_string(),
            old_ip: old_ip.map(str::to_string),
            changed_at,
        };
        tables.ip_records.push(record.clone());
        Ok(record)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<PublicIpRecord>> {
        let mut records = self.tables().ip_records.clone();
        records.sort_by(|a, b| (b.changed_at, b.id).cmp(&(a.changed_at, a.id)));
        records.truncate(limit);
        Ok(records)
    }
}

#[async_trait]
impl PlaytimeRepository for MemoryStore {
    async fn find_entry(&self, user_name: &str, date: NaiveDate) -> Result<Option<PlaytimeEntry>> {
        let tables = self.tables();
        if tables.failing_players.iter().any(|name| name == user_name) {
            bail!("database is locked");
        }
        Ok(tables
            .playtime
            .iter()
            .find(|entry| entry.user_name == user_name && entry.date == date)
            .cloned())
    }

    async fn insert_entry(
        &self,
        user_name: &str,
        date: NaiveDate,
        minutes: i64,
        seen_at: DateTime<Utc>,
    ) -> Result<PlaytimeEntry> {
        let mut tables = self.tables();
        if tables
            .playtime
            .iter()
            .any(|entry| entry.user_name == user_name && entry.date == date)
        {
            bail!("UNIQUE constraint failed: user_playtime.user_name, user_playtime.date");
        }
        let entry = PlaytimeEntry {
            id: tables.next_id(),
            user_name: user_name.to_string(),
            date,
            last_login: Some(seen_at),
            playtime_minutes: minutes,
        };
        tables.playtime.push(entry.clone());
        Ok(entry)
    }

    async fn add_minutes(&self, id: i64, minutes: i64, seen_at: DateTime<Utc>) -> Result<i64> {
        let mut tables = self.tables();
        let entry = tables
            .playtime
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| anyhow!("playtime row {} not found", id))?;
        entry.playtime_minutes += minutes;
        entry.last_login = Some(seen_at);
        Ok(entry.playtime_minutes)
    }

    async fn list_for_date(&self, date: NaiveDate) -> Result<Vec<PlaytimeEntry>> {
        Ok(self
            .tables()
            .playtime
            .iter()
            .filter(|entry| entry.date == date)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LogRepository for MemoryStore {
    async fn insert_log(&self, level: LogLevel, message: &str, at: DateTime<Utc>) -> Result<()> {
        let mut tables = self.tables();
        let log = LogMessage {
            id: tables.next_id(),
            level: level.as_str().to_string(),
            message: message.to_string(),
            created_at: at,
        };
        tables.logs.push(log);
        Ok(())
    }

    async fn list_since(&self, since: DateTime<Utc>, limit: usize) -> Result<Vec<LogMessage>> {
        let mut logs: Vec<LogMessage> = self
            .tables()
            .logs
            .iter()
            .filter(|log| log.created_at >= since)
            .cloned()
            .collect();
        logs.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        logs.truncate(limit);
        Ok(logs)
    }
}

#[async_trait]
impl ConfigRepository for MemoryStore {
    async fn load_rcon_config(&self) -> Result<RconConfig> {
        Ok(self.tables().rcon.clone())
    }

    async fn save_rcon_config(&self, config: &RconConfig) -> Result<()> {
        self.tables().rcon = config.clone();
        Ok(())
    }
}

#[derive(Default)]
struct DnsState {
    records: Vec<DnsRecord>,
    fail_list: bool,
    failing: Vec<String>,
    updates: Vec<(DnsRecord, String)>,
}

#[derive(Default)]
pub struct FakeDnsProvider {
    state: Mutex<DnsState>,
    list_calls: AtomicUsize,
}

impl FakeDnsProvider {
    fn state(&self) -> std::sync::MutexGuard<'_, DnsState> {
        self.state.lock().expect("dns lock")
    }

    pub fn set_records(&self, records: Vec<DnsRecord>) {
        self.state().records = records;
    }

    pub fn fail_listing(&self, fail: bool) {
        self.state().fail_list = fail;
    }

    pub fn fail_updates_for(&self, name: &str) {
        self.state().failing.push(name.to_string());
    }

    /// Every attempted update as `(record before the update, new ip)`.
    pub fn updates(&self) -> Vec<(DnsRecord, String)> {
        self.state().updates.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsProvider for FakeDnsProvider {
    async fn list_a_records(&self) -> Result<Vec<DnsRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        if state.fail_list {
            bail!("dns listing failed");
        }
        Ok(state.records.clone())
    }

    async fn update_record(&self, record: &DnsRecord, ip: &str) -> Result<()> {
        let mut state = self.state();
        state.updates.push((record.clone(), ip.to_string()));
        if state.failing.contains(&record.name) {
            bail!("update of {} rejected", record.name);
        }
        if let Some(stored) = state.records.iter_mut().find(|stored| stored.id == record.id) {
            stored.content = ip.to_string();
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeIpSource {
    ip: Mutex<Option<Result<String, String>>>,
}

impl FakeIpSource {
    pub fn set_ip(&self, ip: &str) {
        *self.ip.lock().expect("ip lock") = Some(Ok(ip.to_string()));
    }

    pub fn fail(&self, reason: &str) {
        *self.ip.lock().expect("ip lock") = Some(Err(reason.to_string()));
    }
}

#[async_trait]
impl PublicIpSource for FakeIpSource {
    async fn current_ip(&self) -> Result<String> {
        match self.ip.lock().expect("ip lock").clone() {
            Some(Ok(ip)) => Ok(ip),
            Some(Err(reason)) => Err(anyhow!(reason)),
            None => bail!("no public ip configured"),
        }
    }
}

#[derive(Default)]
struct ConsoleState {
    replies: HashMap<String, String>,
    fail: bool,
    commands: Vec<String>,
}

/// Answers commands from a fixed reply table; unknown commands get an
/// empty body.
#[derive(Default)]
pub struct FakeConsole {
    state: Mutex<ConsoleState>,
}

impl FakeConsole {
    fn state(&self) -> std::sync::MutexGuard<'_, ConsoleState> {
        self.state.lock().expect("console lock")
    }

    pub fn reply(&self, command: &str, body: &str) {
        self.state()
            .replies
            .insert(command.to_string(), body.to_string());
    }

    pub fn fail(&self, fail: bool) {
        self.state().fail = fail;
    }

    pub fn commands(&self) -> Vec<String> {
        self.state().commands.clone()
    }
}

#[async_trait]
impl GameConsole for FakeConsole {
    async fn run(&self, commands: &[String]) -> Result<Vec<ConsoleReply>> {
        let mut state = self.state();
        if state.fail {
            bail!("connection refused");
        }
        let mut replies = Vec::with_capacity(commands.len());
        for command in commands {
            state.commands.push(command.clone());
            replies.push(ConsoleReply {
                command: command.clone(),
                body: state.replies.get(command).cloned().unwrap_or_default(),
                elapsed_ms: 3,
            });
        }
        Ok(replies)
    }
}

#[derive(Default)]
struct HypervisorState {
    inventory: VmInventory,
    login_fails: bool,
}

#[derive(Default)]
pub struct FakeHypervisor {
    state: Mutex<HypervisorState>,
}

impl FakeHypervisor {
    pub fn set_inventory(&self, inventory: VmInventory) {
        self.state.lock().expect("hypervisor lock").inventory = inventory;
    }

    pub fn fail_login(&self) {
        self.state.lock().expect("hypervisor lock").login_fails = true;
    }
}

#[async_trait]
impl Hypervisor for FakeHypervisor {
    async fn vm_inventory(&self) -> Result<VmInventory, HypervisorError> {
        let state = self.state.lock().expect("hypervisor lock");
        if state.login_fails {
            return Err(HypervisorError::Unauthorized(anyhow!("authentication failure")));
        }
        Ok(state.inventory.clone())
    }
}

/// Tokens are `token-for:<username>`; anything else is rejected.
pub struct FakeTokenService;

impl TokenService for FakeTokenService {
    fn issue(&self, username: &str) -> Result<String> {
        Ok(format!("token-for:{}", username))
    }

    fn verify(&self, token: &str) -> Result<Claims> {
        let username = token
            .strip_prefix("token-for:")
            .ok_or_else(|| anyhow!("invalid token"))?;
        let now = Utc::now().timestamp();
        Ok(Claims {
            username: username.to_string(),
            iat: now,
            exp: now + 3600,
        })
    }
}
