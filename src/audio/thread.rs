use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};

use super::sink::paused_sink;
use super::types::{AudioCmd, StatusHandle};

/// How often the thread checks whether the sink ran dry.
const COMPLETION_POLL: Duration = Duration::from_millis(100);

pub(super) fn spawn_audio_thread(rx: Receiver<AudioCmd>, status: StatusHandle) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!("no audio output device: {e}");
                if let Ok(mut s) = status.lock() {
                    s.unavailable = Some(e.to_string());
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;

        loop {
            match rx.recv_timeout(COMPLETION_POLL) {
                Ok(AudioCmd::Load {
                    source,
                    start_at,
                    total,
                    generation,
                    autoplay,
                }) => {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    let new_sink = paused_sink(&stream, source);
                    if let Ok(mut s) = status.lock() {
                        s.reset();
                        s.generation = Some(generation);
                        s.accumulated = start_at;
                        s.total = total;
                        if autoplay {
                            new_sink.play();
                            s.start_clock();
                        }
                    }
                    sink = Some(new_sink);
                }

                Ok(AudioCmd::Play) => {
                    if let Some(ref s) = sink {
                        s.play();
                        if let Ok(mut st) = status.lock() {
                            st.start_clock();
                        }
                    }
                }

                Ok(AudioCmd::Pause) => {
                    if let Some(ref s) = sink {
                        s.pause();
                        if let Ok(mut st) = status.lock() {
                            st.stop_clock();
                        }
                    }
                }

                Ok(AudioCmd::Stop) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    if let Ok(mut st) = status.lock() {
                        st.reset();
                    }
                }

                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    if let Some(ref s) = sink {
                        fade_out_sink(s, fade_out_ms);
                        s.stop();
                    }
                    if let Ok(mut st) = status.lock() {
                        st.stop_clock();
                    }
                    break;
                }

                Err(RecvTimeoutError::Timeout) => {
                    let ran_dry = sink.as_ref().is_some_and(|s| !s.is_paused() && s.empty());
                    if ran_dry {
                        sink = None;
                        if let Ok(mut st) = status.lock() {
                            st.stop_clock();
                            st.finished = st.generation;
                        }
                    }
                }

                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 || sink.is_paused() {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    let start = sink.volume();
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
