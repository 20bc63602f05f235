//! MPRIS remote control on the session bus.
//!
//! D-Bus method calls become [`ControlCmd`]s for the event loop; properties
//! are answered from a shared snapshot that [`MprisHandle`] keeps current as a
//! [`NowPlayingObserver`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};
use std::time::Duration;

use async_io::{Timer, block_on};
use zbus::{Connection, interface};
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::catalog::TrackRecord;
use crate::cursor::NowPlayingObserver;
use crate::transport::{RepeatMode, TransportState};

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.jukebox";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
    SetRepeat(RepeatMode),
}

#[derive(Debug, Default)]
struct SharedState {
    playback: TransportState,
    repeat: RepeatMode,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    position_micros: i64,
    track_id: Option<OwnedObjectPath>,
}

fn loop_status_name(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "None",
        RepeatMode::RepeatOne => "Track",
        RepeatMode::CycleList => "Playlist",
    }
}

fn parse_loop_status(value: &str) -> Option<RepeatMode> {
    match value {
        "None" => Some(RepeatMode::Off),
        "Track" => Some(RepeatMode::RepeatOne),
        "Playlist" => Some(RepeatMode::CycleList),
        _ => None,
    }
}

fn micros(d: Duration) -> i64 {
    i64::try_from(d.as_micros()).unwrap_or(i64::MAX)
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[derive(Clone)]
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: TransportState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
    }

    pub fn set_repeat(&self, repeat: RepeatMode) {
        if let Ok(mut s) = self.state.lock() {
            s.repeat = repeat;
        }
    }

    pub fn set_position(&self, elapsed: Duration) {
        if let Ok(mut s) = self.state.lock() {
            s.position_micros = micros(elapsed);
        }
    }

    /// Publish `track` at catalog `position`, or clear the metadata.
    pub fn set_track_metadata(&self, position: Option<usize>, track: Option<&TrackRecord>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        match (position, track) {
            (Some(position), Some(track)) => {
                s.title = non_empty(&track.title).or_else(|| non_empty(&track.display));
                s.artist = non_empty(&track.artist).into_iter().collect();
                s.album = non_empty(&track.album);
                s.url = Some(format!("file://{}", track.source.display()));
                s.length_micros = track.duration.map(micros);
                s.track_id =
                    OwnedObjectPath::try_from(format!("{OBJECT_PATH}/track/{position}")).ok();
            }
            _ => {
                s.title = None;
                s.artist.clear();
                s.album = None;
                s.url = None;
                s.length_micros = None;
                s.track_id = None;
            }
        }
        s.position_micros = 0;
    }
}

impl NowPlayingObserver for MprisHandle {
    fn track_changed(&self, position: usize, track: &TrackRecord) {
        self.set_track_metadata(Some(position), Some(track));
    }

    fn state_changed(&self, state: TransportState) {
        self.set_playback(state);
    }

    fn repeat_changed(&self, mode: RepeatMode) {
        self.set_repeat(mode);
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "jukebox"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            TransportState::Idle => "Stopped",
            TransportState::Playing => "Playing",
            TransportState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn loop_status(&self) -> &str {
        self.state
            .lock()
            .map(|s| loop_status_name(s.repeat))
            .unwrap_or("Playlist")
    }

    #[zbus(property)]
    fn set_loop_status(&mut self, value: String) {
        match parse_loop_status(&value) {
            Some(mode) => {
                let _ = self.tx.send(ControlCmd::SetRepeat(mode));
            }
            None => tracing::debug!("MPRIS: ignoring unknown LoopStatus {value:?}"),
        }
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        self.state.lock().map(|s| s.position_micros).unwrap_or(0)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };

        if let Some(id) = &s.track_id {
            put("mpris:trackid", Value::from(id.clone().into_inner()));
        }
        if let Some(title) = &s.title {
            put("xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            put("xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(album) = &s.album {
            put("xesam:album", Value::from(album.clone()));
        }
        if let Some(url) = &s.url {
            put("xesam:url", Value::from(url.clone()));
        }
        if let Some(len) = s.length_micros {
            put("mpris:length", Value::from(len));
        }
        map
    }
}

/// Start the MPRIS service on its own thread. Bus failures are logged and
/// leave the player running without remote control.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!("MPRIS: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                tracing::warn!("MPRIS: failed to acquire name {BUS_NAME}: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server.at(OBJECT_PATH, RootIface { tx: tx.clone() }).await {
                tracing::warn!("MPRIS: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                tracing::warn!("MPRIS: failed to register player iface: {e}");
                return;
            }

            tracing::info!("MPRIS: serving {BUS_NAME}");

            // Keep the service alive.
            loop {
                Timer::after(Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}
