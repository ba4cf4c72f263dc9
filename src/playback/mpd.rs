//! Minimal MPD client: one connection per command, text protocol.
use super::{PlaybackBackend, PlayerState, PlayerStatus};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

pub struct MpdBackend {
    address: String,
}

impl MpdBackend {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Send one command line and collect the `key: value` pairs of the reply.
    /// An `ACK` reply is returned as an error carrying MPD's message.
    async fn command(&self, line: &str) -> Result<Vec<(String, String)>> {
        let stream = TcpStream::connect(&self.address)
            .await
            .with_context(|| format!("connecting to mpd at {}", self.address))?;
        let (r, mut w) = stream.into_split();
        let mut reader = BufReader::new(r);

        let mut greeting = String::new();
        reader.read_line(&mut greeting).await?;
        if !greeting.starts_with("OK MPD") {
            bail!("unexpected mpd greeting: {}", greeting.trim_end());
        }

        log::debug!("mpd > {}", line);
        w.write_all(format!("{}\n", line).as_bytes()).await?;
        w.flush().await?;

        let mut pairs = Vec::new();
        loop {
            let mut buf = String::new();
            if reader.read_line(&mut buf).await? == 0 {
                bail!("mpd closed the connection during '{}'", line);
            }
            let reply = buf.trim_end_matches(['\r', '\n']);
            if reply == "OK" {
                break;
            }
            if let Some(err) = reply.strip_prefix("ACK ") {
                return Err(anyhow!("{}", err));
            }
            if let Some((k, v)) = reply.split_once(": ") {
                pairs.push((k.to_string(), v.to_string()));
            }
        }
        Ok(pairs)
    }
}

/// Quote an argument for the MPD protocol. Line breaks cannot be escaped and would end the
/// command early, so they are refused.
pub fn quote(arg: &str) -> Result<String> {
    if arg.contains(['\r', '\n']) {
        bail!("argument contains a line break: {:?}", arg);
    }
    let escaped = arg.replace('\\', "\\\\").replace('"', "\\\"");
    Ok(format!("\"{}\"", escaped))
}

fn parse_status(pairs: &[(String, String)]) -> Result<PlayerState> {
    let get = |key: &str| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());

    let status = match get("state") {
        Some("play") => PlayerStatus::Play,
        Some("pause") => PlayerStatus::Pause,
        Some("stop") => PlayerStatus::Stop,
        other => bail!("unknown mpd state {:?}", other),
    };
    let seek = get("elapsed")
        .and_then(|s| s.parse::<f64>().ok())
        .map(|secs| (secs * 1000.0).round() as u64)
        .unwrap_or(0);
    let duration = get("duration")
        .and_then(|s| s.parse::<f64>().ok())
        .map(|secs| secs.round() as u64);
    let volume = get("volume")
        .and_then(|s| s.parse::<i32>().ok())
        .and_then(|v| u8::try_from(v).ok());

    Ok(PlayerState {
        status,
        seek,
        duration,
        volume,
    })
}

#[async_trait]
impl PlaybackBackend for MpdBackend {
    async fn stop(&self) -> Result<()> {
        self.command("stop").await.map(|_| ())
    }

    async fn clear(&self) -> Result<()> {
        self.command("clear").await.map(|_| ())
    }

    async fn load(&self, uri: &str) -> Result<()> {
        self.command(&format!("load {}", quote(uri)?)).await.map(|_| ())
    }

    async fn add(&self, uri: &str) -> Result<()> {
        self.command(&format!("add {}", quote(uri)?)).await.map(|_| ())
    }

    async fn play(&self) -> Result<()> {
        self.command("play").await.map(|_| ())
    }

    async fn pause(&self) -> Result<()> {
        self.command("pause 1").await.map(|_| ())
    }

    async fn seek(&self, position_ms: u64) -> Result<()> {
        let secs = position_ms as f64 / 1000.0;
        self.command(&format!("seekcur {:.3}", secs)).await.map(|_| ())
    }

    async fn get_state(&self) -> Result<PlayerState> {
        let pairs = self.command("status").await?;
        parse_status(&pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn quotes_and_escapes() {
        assert_eq!(quote("http://x/a b").unwrap(), "\"http://x/a b\"");
        assert_eq!(quote("a\"b\\c").unwrap(), "\"a\\\"b\\\\c\"");
    }

    #[test]
    fn refuses_line_breaks() {
        assert!(quote("http://x/a\nstop").is_err());
        assert!(quote("http://x/a\rb").is_err());
    }

    #[test]
    fn parses_status_reply() {
        let st = parse_status(&pairs(&[
            ("volume", "80"),
            ("state", "play"),
            ("elapsed", "12.345"),
            ("duration", "201.6"),
        ]))
        .unwrap();
        assert_eq!(st.status, PlayerStatus::Play);
        assert_eq!(st.seek, 12345);
        assert_eq!(st.duration, Some(202));
        assert_eq!(st.volume, Some(80));
    }

    #[test]
    fn stopped_status_without_song() {
        let st = parse_status(&pairs(&[("volume", "-1"), ("state", "stop")])).unwrap();
        assert_eq!(st.status, PlayerStatus::Stop);
        assert_eq!(st.seek, 0);
        assert_eq!(st.duration, None);
        assert_eq!(st.volume, None);
    }

    #[test]
    fn missing_state_is_an_error() {
        assert!(parse_status(&pairs(&[("volume", "10")])).is_err());
    }
}
