use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use backend_domain::{ConfigRepository, ConsoleReply, GameConsole, RconConfig};

pub const PACKET_LOGIN: i32 = 3;
pub const PACKET_COMMAND: i32 = 2;
pub const PACKET_AUTH_RESPONSE: i32 = 2;
pub const PACKET_RESPONSE: i32 = 0;

/// id + type + two terminating NULs.
const PACKET_OVERHEAD: i32 = 10;
const MAX_PAYLOAD: i32 = 4096;
const AUTH_FAILED_ID: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RconPacket {
    pub id: i32,
    pub kind: i32,
    pub body: String,
}

impl RconPacket {
    pub fn new(id: i32, kind: i32, body: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            body: body.into(),
        }
    }

    /// `len | id | type | body | 0x00 0x00`, integers little-endian.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let body = self.body.as_bytes();
        if body.len() > MAX_PAYLOAD as usize {
            bail!("rcon payload too large: {} bytes", body.len());
        }
        let length = body.len() as i32 + PACKET_OVERHEAD;
        let mut buf = Vec::with_capacity(length as usize + 4);
        buf.extend_from_slice(&length.to_le_bytes());
        buf.extend_from_slice(&self.id.to_le_bytes());
        buf.extend_from_slice(&self.kind.to_le_bytes());
        buf.extend_from_slice(body);
        buf.extend_from_slice(&[0, 0]);
        Ok(buf)
    }
}

pub async fn write_packet<W>(writer: &mut W, packet: &RconPacket) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&packet.encode()?).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_packet<R>(reader: &mut R) -> Result<RconPacket>
where
    R: AsyncRead + Unpin,
{
    let length = reader.read_i32_le().await.context("rcon connection closed")?;
    if !(PACKET_OVERHEAD..=MAX_PAYLOAD + PACKET_OVERHEAD).contains(&length) {
        bail!("invalid rcon packet length {}", length);
    }
    let id = reader.read_i32_le().await?;
    let kind = reader.read_i32_le().await?;
    let mut body = vec![0u8; (length - 8) as usize];
    reader.read_exact(&mut body).await?;
    let text_len = body.iter().position(|byte| *byte == 0).unwrap_or(body.len());
    body.truncate(text_len);
    Ok(RconPacket {
        id,
        kind,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// One authenticated session. Dropping it closes the socket.
pub struct RconConnection {
    stream: TcpStream,
    next_id: i32,
    io_timeout: Duration,
}

impl RconConnection {
    pub async fn connect(config: &RconConfig) -> Result<Self> {
        let io_timeout = Duration::from_secs(config.timeout_seconds.max(1));
        let address = config.address();
        let stream = timeout(io_timeout, TcpStream::connect(&address))
            .await
            .map_err(|_| anyhow!("timed out connecting to {}", address))?
            .with_context(|| format!("failed to connect to {}", address))?;
        let mut connection = Self {
            stream,
            next_id: 0,
            io_timeout,
        };
        connection.login(&config.password).await?;
        debug!(%address, "rcon session opened");
        Ok(connection)
    }

    async fn login(&mut self, password: &str) -> Result<()> {
        let id = self.allocate_id();
        self.send(&RconPacket::new(id, PACKET_LOGIN, password)).await?;
        loop {
            let packet = self.receive().await?;
            // Some servers send an empty response value before the auth reply.
            if packet.kind != PACKET_AUTH_RESPONSE {
                continue;
            }
            if packet.id == AUTH_FAILED_ID {
                bail!("rcon authentication failed");
            }
            if packet.id != id {
                bail!("unexpected rcon auth response id {}", packet.id);
            }
            return Ok(());
        }
    }

    pub async fn command(&mut self, command: &str) -> Result<String> {
        let id = self.allocate_id();
        self.send(&RconPacket::new(id, PACKET_COMMAND, command)).await?;
        loop {
            let packet = self.receive().await?;
            if packet.id == id && packet.kind == PACKET_RESPONSE {
                return Ok(packet.body);
            }
        }
    }

    fn allocate_id(&mut self) -> i32 {
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.next_id
    }

    async fn send(&mut self, packet: &RconPacket) -> Result<()> {
        timeout(self.io_timeout, write_packet(&mut self.stream, packet))
            .await
            .map_err(|_| anyhow!("timed out writing rcon packet"))?
    }

    async fn receive(&mut self) -> Result<RconPacket> {
        timeout(self.io_timeout, read_packet(&mut self.stream))
            .await
            .map_err(|_| anyhow!("timed out waiting for rcon response"))?
    }
}

/// Game console backed by RCON. Settings are reloaded on every call so
/// edits to `rcon.toml` apply without a restart.
pub struct RconConsole {
    config_repo: Arc<dyn ConfigRepository>,
}

impl RconConsole {
    pub fn new(config_repo: Arc<dyn ConfigRepository>) -> Self {
        Self { config_repo }
    }
}

#[async_trait]
impl GameConsole for RconConsole {
    async fn run(&self, commands: &[String]) -> Result<Vec<ConsoleReply>> {
        let config = self.config_repo.load_rcon_config().await?;
        if !config.enabled {
            bail!("console disabled");
        }
        let mut connection = RconConnection::connect(&config).await?;
        let mut replies = Vec::with_capacity(commands.len());
        for command in commands {
            let started = Instant::now();
            let body = connection
                .command(command)
                .await
                .with_context(|| format!("rcon command '{}' failed", command))?;
            replies.push(ConsoleReply {
                command: command.clone(),
                body,
                elapsed_ms: started.elapsed().as_millis() as u64,
            });
        }
        Ok(replies)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::net::TcpListener;

    use super::*;

    struct FixedConfig(RconConfig);

    #[async_trait]
    impl ConfigRepository for FixedConfig {
        async fn load_rcon_config(&self) -> Result<RconConfig> {
            Ok(self.0.clone())
        }

        async fn save_rcon_config(&self, _config: &RconConfig) -> Result<()> {
            Ok(())
        }
    }

    /// Accepts one connection, checks the password and echoes every
    /// command as `reply:<command>`.
    async fn spawn_server(password: &'static str) -> (u16, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let login = read_packet(&mut socket).await.expect("login packet");
            assert_eq!(login.kind, PACKET_LOGIN);
            write_packet(&mut socket, &RconPacket::new(login.id, PACKET_RESPONSE, ""))
                .await
                .expect("empty response");
            let auth_id = if login.body == password { login.id } else { AUTH_FAILED_ID };
            write_packet(&mut socket, &RconPacket::new(auth_id, PACKET_AUTH_RESPONSE, ""))
                .await
                .expect("auth response");
            while let Ok(packet) = read_packet(&mut socket).await {
                log.lock().expect("log").push(packet.body.clone());
                let reply = RconPacket::new(packet.id, PACKET_RESPONSE, format!("reply:{}", packet.body));
                if write_packet(&mut socket, &reply).await.is_err() {
                    break;
                }
            }
        });
        (port, seen)
    }

    fn console(port: u16, password: &str) -> RconConsole {
        RconConsole::new(Arc::new(FixedConfig(RconConfig {
            host: "127.0.0.1".to_string(),
            port,
            password: password.to_string(),
            enabled: true,
            timeout_seconds: 2,
        })))
    }

    #[test]
    fn encodes_little_endian_frame() {
        let bytes = RconPacket::new(7, PACKET_COMMAND, "list").encode().expect("encode");
        assert_eq!(&bytes[0..4], &14i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &7i32.to_le_bytes());
        assert_eq!(&bytes[8..12], &2i32.to_le_bytes());
        assert_eq!(&bytes[12..16], b"list");
        assert_eq!(&bytes[16..], &[0, 0]);
    }

    #[tokio::test]
    async fn decodes_what_it_encodes() {
        let packet = RconPacket::new(42, PACKET_RESPONSE, "There are 0 of a max of 20 players online:");
        let bytes = packet.encode().expect("encode");
        let decoded = read_packet(&mut bytes.as_slice()).await.expect("decode");
        assert_eq!(decoded, packet);
    }

    #[tokio::test]
    async fn rejects_oversized_length() {
        let mut bytes = 100_000i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0; 12]);
        assert!(read_packet(&mut bytes.as_slice()).await.is_err());
    }

    #[tokio::test]
    async fn runs_commands_in_one_session() {
        let (port, seen) = spawn_server("secret").await;
        let replies = console(port, "secret")
            .run(&["list".to_string(), "version".to_string()])
            .await
            .expect("run");
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].body, "reply:list");
        assert_eq!(replies[1].command, "version");
        assert_eq!(*seen.lock().expect("log"), vec!["list".to_string(), "version".to_string()]);
    }

    #[tokio::test]
    async fn wrong_password_fails_login() {
        let (port, _) = spawn_server("secret").await;
        let err = console(port, "nope")
            .run(&["list".to_string()])
            .await
            .expect_err("auth");
        assert!(err.to_string().contains("authentication failed"));
    }

    #[tokio::test]
    async fn disabled_console_never_connects() {
        let console = RconConsole::new(Arc::new(FixedConfig(RconConfig {
            enabled: false,
            ..RconConfig::default()
        })));
        let err = console.run(&["list".to_string()]).await.expect_err("disabled");
        assert_eq!(err.to_string(), "console disabled");
    }
}
