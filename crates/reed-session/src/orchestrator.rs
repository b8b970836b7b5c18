//! Session orchestration.
//!
//! [`SessionOrchestrator`] owns the session: it acquires devices, opens
//! the live transport, pumps outbound frames, applies inbound live
//! events, and arbitrates capture triggers against the single outbound
//! stream. The phase machine is the arbitration mechanism — a capture is
//! admitted only by the `Streaming → Capturing` transition, taken under
//! one lock, so at most one capture is ever in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use chrono::Utc;
use metrics::{counter, gauge};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use reed_core::capture::{CaptureOrigin, CaptureRequest};
use reed_core::events::{EventSink, ReedEvent};
use reed_core::ids::SessionId;
use reed_core::item::Item;
use reed_core::orb::{OrbState, OrbStateMachine};
use reed_core::phase::SessionPhase;
use reed_media::source::{MediaGateway, MediaHandles};
use reed_media::stream::OutboundStream;
use reed_settings::types::ReedSettings;
use reed_store::store::ItemStore;

use crate::ack::AckTracker;
use crate::capture::CaptureCoordinator;
use crate::errors::SessionError;
use crate::transport::{LiveEvent, LiveTransport, ToolOutcome};

/// Orchestrates one live session from start to stop.
pub struct SessionOrchestrator {
    id: SessionId,
    settings: ReedSettings,
    media: Arc<dyn MediaGateway>,
    transport: Arc<dyn LiveTransport>,
    store: Arc<ItemStore>,
    sink: Arc<dyn EventSink>,
    phase: Mutex<SessionPhase>,
    orb: Mutex<OrbStateMachine>,
    acks: Mutex<AckTracker>,
    stream: Mutex<Option<Arc<OutboundStream>>>,
    coordinator: Mutex<Option<Arc<CaptureCoordinator>>>,
    handles: Mutex<Option<MediaHandles>>,
    cancel: CancellationToken,
    transport_failures: AtomicU32,
}

impl SessionOrchestrator {
    /// New orchestrator in `Initializing`. Nothing is acquired until
    /// [`start`](Self::start).
    pub fn new(
        settings: ReedSettings,
        media: Arc<dyn MediaGateway>,
        transport: Arc<dyn LiveTransport>,
        store: Arc<ItemStore>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            id: SessionId::generate(),
            settings,
            media,
            transport,
            store,
            sink,
            phase: Mutex::new(SessionPhase::Initializing),
            orb: Mutex::new(OrbStateMachine::new()),
            acks: Mutex::new(AckTracker::new()),
            stream: Mutex::new(None),
            coordinator: Mutex::new(None),
            handles: Mutex::new(None),
            cancel: CancellationToken::new(),
            transport_failures: AtomicU32::new(0),
        }
    }

    /// This session's identifier.
    pub fn session_id(&self) -> &SessionId {
        &self.id
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        *self.phase.lock()
    }

    /// Current orb state.
    pub fn orb_state(&self) -> OrbState {
        self.orb.lock().state()
    }

    /// The item cache this session persists into.
    pub fn store(&self) -> &Arc<ItemStore> {
        &self.store
    }

    /// Acquire devices, connect the transport, and enter `Streaming`.
    ///
    /// Returns the inbound live-event channel, to be driven through
    /// [`run`](Self::run). Acquisition or connection failure stops the
    /// session: both are unrecoverable without user action.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn start(&self) -> Result<mpsc::Receiver<LiveEvent>, SessionError> {
        if self.phase() != SessionPhase::Initializing {
            return Err(SessionError::AlreadyStarted);
        }

        let handles = match self.media.acquire().await {
            Ok(handles) => handles,
            Err(e) => {
                let _ = self.set_phase(SessionPhase::Stopped);
                return Err(e.into());
            }
        };

        let events = match self.transport.connect().await {
            Ok(events) => events,
            Err(e) => {
                handles.release();
                let _ = self.set_phase(SessionPhase::Stopped);
                return Err(e.into());
            }
        };

        let stream = Arc::new(OutboundStream::new(Arc::clone(&handles.video)));
        let coordinator = Arc::new(CaptureCoordinator::new(
            Arc::clone(&stream),
            Arc::clone(&self.store),
            Duration::from_millis(self.settings.capture.timeout_ms),
        ));
        *self.stream.lock() = Some(stream);
        *self.coordinator.lock() = Some(coordinator);
        *self.handles.lock() = Some(handles);

        let _ = self.set_phase(SessionPhase::Streaming);
        info!("session started");
        Ok(events)
    }

    /// Drive the session: pump outbound frames and apply inbound events
    /// until the session stops or the duration cap expires.
    #[instrument(skip_all, fields(session_id = %self.id))]
    pub async fn run(&self, mut events: mpsc::Receiver<LiveEvent>) {
        // Clamp to 1 ms: an fps override above 1000 must not produce the
        // zero period `interval` panics on.
        let frame_period =
            Duration::from_millis((1_000 / u64::from(self.settings.video.fps.max(1))).max(1));
        let mut ticker = time::interval(frame_period);
        let deadline =
            time::Instant::now() + Duration::from_secs(self.settings.session.max_duration_minutes * 60);

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                () = time::sleep_until(deadline) => {
                    info!("session duration cap reached");
                    self.stop().await;
                    break;
                }
                _ = ticker.tick() => self.pump_frame().await,
                event = events.recv() => {
                    let disconnect_reason = match event {
                        Some(LiveEvent::Disconnected { reason }) => Some(reason),
                        Some(event) => {
                            self.handle_live_event(event).await;
                            None
                        }
                        None => Some("event channel closed".to_string()),
                    };
                    if let Some(reason) = disconnect_reason {
                        match self.handle_disconnect(&reason).await {
                            Some(reconnected) => events = reconnected,
                            None => break,
                        }
                    }
                }
            }
        }
    }

    /// Request a capture. At most one capture is in flight; a trigger
    /// arriving while one is pending is rejected with
    /// [`SessionError::CaptureBusy`] without touching the stream.
    #[instrument(skip(self), fields(session_id = %self.id, origin = ?request.origin))]
    pub async fn request_capture(&self, request: CaptureRequest) -> Result<Item, SessionError> {
        counter!("capture_requests_total", "origin" => origin_label(request.origin)).increment(1);

        // Admission is the phase transition itself, taken under one lock.
        {
            let mut phase = self.phase.lock();
            match *phase {
                SessionPhase::Streaming => *phase = SessionPhase::Capturing,
                SessionPhase::Capturing => {
                    counter!("capture_busy_rejections_total").increment(1);
                    return Err(SessionError::CaptureBusy);
                }
                SessionPhase::Stopped => return Err(SessionError::SessionStopped),
                phase => return Err(SessionError::NotStreaming { phase }),
            }
        }
        self.publish_phase(SessionPhase::Capturing);

        let result = self.run_capture().await;

        // Back to streaming unless the session stopped underneath us.
        {
            let mut phase = self.phase.lock();
            if *phase == SessionPhase::Capturing {
                *phase = SessionPhase::Streaming;
            } else {
                drop(phase);
                return Err(SessionError::SessionStopped);
            }
        }
        self.publish_phase(SessionPhase::Streaming);

        match &result {
            Ok(item) => {
                let latency_ms = (Utc::now() - request.requested_at).num_milliseconds();
                debug!(item_id = %item.id, latency_ms, "capture completed");
            }
            Err(e) => warn!(error = %e, "capture failed"),
        }
        result
    }

    async fn run_capture(&self) -> Result<Item, SessionError> {
        let coordinator = self
            .coordinator
            .lock()
            .clone()
            .ok_or(SessionError::SessionStopped)?;
        tokio::select! {
            () = self.cancel.cancelled() => Err(SessionError::SessionStopped),
            result = coordinator.capture() => result,
        }
    }

    /// Apply one inbound live event.
    pub async fn handle_live_event(&self, event: LiveEvent) {
        match event {
            LiveEvent::AudioActivity { activity } => {
                let changed = self.orb.lock().apply(activity);
                if let Some(state) = changed {
                    self.sink.publish(ReedEvent::OrbStateChanged { state });
                }
            }
            LiveEvent::ToolInvocation { token } => {
                if !self.acks.lock().register(token.clone()) {
                    return;
                }
                let outcome = match self.request_capture(CaptureRequest::remote(token.clone())).await
                {
                    Ok(item) => ToolOutcome::Success { item_id: item.id },
                    Err(e) => ToolOutcome::Failure {
                        reason: e.to_string(),
                    },
                };
                // The tracker gates the send so the transport sees exactly
                // one answer per token.
                if self.acks.lock().acknowledge(&token) {
                    if let Err(e) = self.transport.acknowledge_tool_result(&token, outcome).await {
                        warn!(token = %token, error = %e, "tool acknowledgment failed");
                    }
                }
            }
            LiveEvent::Disconnected { reason } => {
                // Reached only when called directly; the run loop intercepts
                // disconnects to thread the new receiver back in.
                warn!(reason = %reason, "disconnect event outside run loop");
            }
        }
    }

    /// Submit one outbound audio chunk, honoring the mute flag.
    pub async fn send_audio_chunk(&self, chunk: &[u8]) -> Result<(), SessionError> {
        if self.phase().is_stopped() {
            return Err(SessionError::SessionStopped);
        }
        if self.is_muted() {
            return Ok(());
        }
        self.transport.send_audio(chunk).await?;
        Ok(())
    }

    /// Suppress or restore outbound audio. Video is unaffected.
    pub fn set_muted(&self, muted: bool) {
        if let Some(stream) = self.stream.lock().as_ref() {
            stream.set_muted(muted);
        }
    }

    /// Whether outbound audio is suppressed.
    pub fn is_muted(&self) -> bool {
        self.stream.lock().as_ref().is_some_and(|s| s.is_muted())
    }

    /// Stop the session and release every resource. Idempotent.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn stop(&self) {
        if !self.set_phase(SessionPhase::Stopped) {
            return;
        }
        self.cancel.cancel();

        let abandoned = self.acks.lock().abandon_all();
        if !abandoned.is_empty() {
            warn!(count = abandoned.len(), "abandoning unacknowledged tool invocations");
        }

        let _ = self.coordinator.lock().take();
        let _ = self.stream.lock().take();
        if let Some(handles) = self.handles.lock().take() {
            handles.release();
        }
        self.transport.close().await;
        info!("session stopped");
    }

    async fn pump_frame(&self) {
        let frame = match self.stream.lock().as_ref() {
            Some(stream) => stream.next_frame(),
            None => None,
        };
        if let Some(frame) = frame {
            if let Err(e) = self.transport.send_video_frame(&frame).await {
                counter!("frame_send_failures_total").increment(1);
                warn!(error = %e, "outbound frame submission failed");
            }
        }
    }

    /// One disconnect cycle: enter `Error`, back off, reconnect. Returns
    /// the new event channel, or `None` after the retry budget is spent
    /// (the session is stopped).
    async fn handle_disconnect(&self, reason: &str) -> Option<mpsc::Receiver<LiveEvent>> {
        warn!(reason, "transport disconnected");
        let _ = self.set_phase(SessionPhase::Error);

        loop {
            let failures = self.transport_failures.fetch_add(1, Ordering::SeqCst) + 1;
            counter!("transport_failures_total").increment(1);
            if failures > self.settings.session.reconnect_max_retries {
                warn!(failures, "retry budget exhausted");
                self.stop().await;
                return None;
            }

            time::sleep(Duration::from_millis(self.settings.session.reconnect_backoff_ms)).await;
            match self.transport.connect().await {
                Ok(events) => {
                    self.transport_failures.store(0, Ordering::SeqCst);
                    let _ = self.set_phase(SessionPhase::Streaming);
                    info!("transport reconnected");
                    return Some(events);
                }
                Err(e) => warn!(error = %e, "reconnect attempt failed"),
            }
        }
    }

    /// Take a phase transition if legal; publish it. Returns whether the
    /// transition was taken.
    fn set_phase(&self, next: SessionPhase) -> bool {
        {
            let mut phase = self.phase.lock();
            if !phase.can_transition_to(next) {
                return false;
            }
            *phase = next;
        }
        self.publish_phase(next);
        true
    }

    fn publish_phase(&self, phase: SessionPhase) {
        gauge!("session_phase").set(phase_gauge(phase));
        debug!(phase = %phase, "phase changed");
        self.sink.publish(ReedEvent::SessionPhaseChanged { phase });
    }
}

fn origin_label(origin: CaptureOrigin) -> &'static str {
    match origin {
        CaptureOrigin::Local => "local",
        CaptureOrigin::RemoteTool => "remote_tool",
    }
}

fn phase_gauge(phase: SessionPhase) -> f64 {
    match phase {
        SessionPhase::Initializing => 0.0,
        SessionPhase::Streaming => 1.0,
        SessionPhase::Capturing => 2.0,
        SessionPhase::Error => 3.0,
        SessionPhase::Stopped => 4.0,
    }
}
