use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};
use tidal_browse_adapter::error::AdapterError;
use tidal_browse_adapter::models::{ItemKind, PlayableTrack};
use tidal_browse_adapter::playback::mpd::MpdBackend;
use tidal_browse_adapter::playback::{Playback, PlaybackBackend, PlayerState, PlayerStatus};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// Records commands; those named in `failing` return an error.
struct RecordingBackend {
    log: Mutex<Vec<String>>,
    failing: Vec<&'static str>,
}

impl RecordingBackend {
    fn new(failing: &[&'static str]) -> Self {
        Self {
            log: Mutex::new(Vec::new()),
            failing: failing.to_vec(),
        }
    }

    fn record(&self, cmd: &str) -> Result<()> {
        self.log.lock().unwrap().push(cmd.to_string());
        let name = cmd.split_whitespace().next().unwrap_or("");
        if self.failing.iter().any(|f| *f == name) {
            Err(anyhow!("{} refused", name))
        } else {
            Ok(())
        }
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PlaybackBackend for RecordingBackend {
    async fn stop(&self) -> Result<()> {
        self.record("stop")
    }
    async fn clear(&self) -> Result<()> {
        self.record("clear")
    }
    async fn load(&self, uri: &str) -> Result<()> {
        self.record(&format!("load {}", uri))
    }
    async fn add(&self, uri: &str) -> Result<()> {
        self.record(&format!("add {}", uri))
    }
    async fn play(&self) -> Result<()> {
        self.record("play")
    }
    async fn pause(&self) -> Result<()> {
        self.record("pause")
    }
    async fn seek(&self, position_ms: u64) -> Result<()> {
        self.record(&format!("seek {}", position_ms))
    }
    async fn get_state(&self) -> Result<PlayerState> {
        self.record("status")?;
        Ok(PlayerState {
            status: PlayerStatus::Stop,
            seek: 0,
            duration: None,
            volume: None,
        })
    }
}

fn track(uri: &str) -> PlayableTrack {
    PlayableTrack {
        uri: uri.into(),
        service: "tidal".into(),
        name: "Song".into(),
        artist: "Band".into(),
        album: "Record".into(),
        kind: ItemKind::Song,
        duration: 180,
        tracknumber: 1,
        albumart: String::new(),
        samplerate: "44.1 kHz".into(),
        bitdepth: "16 bit".into(),
        track_type: "AAC".into(),
    }
}

#[tokio::test]
async fn failed_load_falls_back_to_add() {
    let playback = Playback::new(RecordingBackend::new(&["load"]));
    playback.clear_add_play_track(&track("https://s/1")).await.unwrap();
    assert_eq!(
        playback.backend().log(),
        vec!["stop", "clear", "load https://s/1", "add https://s/1", "play"]
    );
}

#[tokio::test]
async fn successful_load_skips_add() {
    let playback = Playback::new(RecordingBackend::new(&[]));
    playback.clear_add_play_track(&track("local.m3u")).await.unwrap();
    assert_eq!(playback.backend().log(), vec!["stop", "clear", "load local.m3u", "play"]);
}

#[tokio::test]
async fn failing_step_aborts_the_sequence() {
    let playback = Playback::new(RecordingBackend::new(&["clear"]));
    match playback.clear_add_play_track(&track("https://s/1")).await {
        Err(AdapterError::Playback { command, .. }) => assert_eq!(command, "clear"),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(playback.backend().log(), vec!["stop", "clear"]);

    let playback = Playback::new(RecordingBackend::new(&["load", "add"]));
    match playback.clear_add_play_track(&track("https://s/1")).await {
        Err(AdapterError::Playback { command, .. }) => assert_eq!(command, "add"),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn simple_controls_map_to_backend() {
    let playback = Playback::new(RecordingBackend::new(&[]));
    playback.pause().await.unwrap();
    playback.resume().await.unwrap();
    playback.seek(1500).await.unwrap();
    playback.stop().await.unwrap();
    assert_eq!(playback.get_state().await.unwrap().status, PlayerStatus::Stop);
    assert_eq!(
        playback.backend().log(),
        vec!["pause", "play", "seek 1500", "stop", "status"]
    );
}

/// A tiny MPD stand-in: greets, answers one command per connection, and records it.
async fn fake_mpd() -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_srv = seen.clone();

    tokio::spawn(async move {
        loop {
            let (sock, _) = match listener.accept().await {
                Ok(s) => s,
                Err(_) => break,
            };
            let seen = seen_srv.clone();
            tokio::spawn(async move {
                let (r, mut w) = sock.into_split();
                let mut reader = BufReader::new(r);
                w.write_all(b"OK MPD 0.23.5\n").await.unwrap();
                let mut line = String::new();
                reader.read_line(&mut line).await.unwrap();
                let cmd = line.trim_end().to_string();
                seen.lock().unwrap().push(cmd.clone());
                let reply: &[u8] = if cmd.starts_with("load ") {
                    b"ACK [50@0] {load} No such playlist\n"
                } else if cmd == "status" {
                    b"volume: 70\nrepeat: 0\nstate: pause\nelapsed: 3.250\nduration: 181.000\nOK\n"
                } else {
                    b"OK\n"
                };
                w.write_all(reply).await.unwrap();
            });
        }
    });

    (addr, seen)
}

#[tokio::test]
async fn mpd_backend_speaks_the_text_protocol() {
    let (addr, seen) = fake_mpd().await;
    let playback = Playback::new(MpdBackend::new(addr));

    playback
        .clear_add_play_track(&track("https://cdn.example/a \"b\".flac"))
        .await
        .unwrap();
    playback.seek(2500).await.unwrap();
    playback.pause().await.unwrap();
    let state = playback.get_state().await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "stop".to_string(),
            "clear".to_string(),
            r#"load "https://cdn.example/a \"b\".flac""#.to_string(),
            r#"add "https://cdn.example/a \"b\".flac""#.to_string(),
            "play".to_string(),
            "seekcur 2.500".to_string(),
            "pause 1".to_string(),
            "status".to_string(),
        ]
    );
    assert_eq!(state.status, PlayerStatus::Pause);
    assert_eq!(state.seek, 3250);
    assert_eq!(state.duration, Some(181));
    assert_eq!(state.volume, Some(70));
}

#[tokio::test]
async fn unreachable_mpd_is_a_playback_error() {
    // bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let playback = Playback::new(MpdBackend::new(addr));
    match playback.stop().await {
        Err(AdapterError::Playback { command, .. }) => assert_eq!(command, "stop"),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn stream_url_with_line_break_never_reaches_mpd() {
    let (addr, seen) = fake_mpd().await;
    let playback = Playback::new(MpdBackend::new(addr));

    match playback
        .clear_add_play_track(&track("https://cdn.example/a\nclear"))
        .await
    {
        Err(AdapterError::Playback { command, .. }) => assert_eq!(command, "add"),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(*seen.lock().unwrap(), vec!["stop".to_string(), "clear".to_string()]);
}
