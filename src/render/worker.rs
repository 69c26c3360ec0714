use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{GlobeError, Result};
use crate::globe::{generate_frame, GridSpec, LandShape, SamplePoint};

/// Everything needed to compute one frame. The worker keeps nothing between
/// requests, so a frame is fully determined by this message.
#[derive(Debug, Clone)]
pub struct FrameRequest {
    /// Frame sequence number, also the ice flicker seed
    pub seq: u64,
    /// Composed pitch (tilt plus vertical drag)
    pub rotation_x: f64,
    /// Composed yaw (auto-rotation plus horizontal drag)
    pub rotation_y: f64,
    pub shapes: Arc<[LandShape]>,
    pub grid: GridSpec,
}

impl FrameRequest {
    /// Run the sample grid on the calling thread
    pub fn compute(&self) -> FrameResponse {
        let start = Instant::now();
        let points = generate_frame(self.rotation_x, self.rotation_y, &self.shapes, &self.grid, self.seq);
        FrameResponse {
            seq: self.seq,
            points,
            elapsed: start.elapsed(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameResponse {
    pub seq: u64,
    /// Visible points in grid order; the presenter sorts them
    pub points: Vec<SamplePoint>,
    /// Time spent generating the frame
    pub elapsed: Duration,
}

/// Frame generation on a dedicated thread.
///
/// At most one request is outstanding: [`RenderWorker::post`] declines while
/// the previous frame has not come back. Dropping the worker closes the
/// request channel and joins the thread.
pub struct RenderWorker {
    requests: Option<Sender<FrameRequest>>,
    responses: Receiver<FrameResponse>,
    handle: Option<JoinHandle<()>>,
    in_flight: bool,
}

impl RenderWorker {
    pub fn spawn() -> Result<Self> {
        let (req_tx, req_rx) = mpsc::channel::<FrameRequest>();
        let (resp_tx, resp_rx) = mpsc::channel::<FrameResponse>();

        let handle = thread::Builder::new()
            .name("globe-render".into())
            .spawn(move || {
                debug!("render worker started");
                for request in req_rx {
                    if resp_tx.send(request.compute()).is_err() {
                        break;
                    }
                }
                debug!("render worker stopped");
            })
            .map_err(GlobeError::WorkerSpawn)?;

        Ok(Self {
            requests: Some(req_tx),
            responses: resp_rx,
            handle: Some(handle),
            in_flight: false,
        })
    }

    /// A worker whose thread is already gone: both channel ends are closed
    #[cfg(test)]
    fn disconnected() -> Self {
        let (req_tx, _) = mpsc::channel::<FrameRequest>();
        let (_, resp_rx) = mpsc::channel::<FrameResponse>();
        Self {
            requests: Some(req_tx),
            responses: resp_rx,
            handle: None,
            in_flight: false,
        }
    }

    /// True while a posted frame has not been received yet
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Post a request. Returns `Ok(false)` without sending if one is already in flight.
    pub fn post(&mut self, request: FrameRequest) -> Result<bool> {
        if self.in_flight {
            return Ok(false);
        }
        let tx = self.requests.as_ref().ok_or(GlobeError::WorkerDisconnected)?;
        tx.send(request).map_err(|_| GlobeError::WorkerDisconnected)?;
        self.in_flight = true;
        Ok(true)
    }

    /// Non-blocking poll for the outstanding frame
    pub fn try_recv(&mut self) -> Result<Option<FrameResponse>> {
        match self.responses.try_recv() {
            Ok(response) => {
                self.in_flight = false;
                Ok(Some(response))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(GlobeError::WorkerDisconnected),
        }
    }

    /// Wait up to `timeout` for the outstanding frame
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<FrameResponse>> {
        match self.responses.recv_timeout(timeout) {
            Ok(response) => {
                self.in_flight = false;
                Ok(Some(response))
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(GlobeError::WorkerDisconnected),
        }
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("render worker panicked");
            }
        }
    }
}

/// Where frames get computed. Falls back to inline generation when the
/// worker thread cannot be started or dies.
pub enum RenderBackend {
    Worker(RenderWorker),
    Inline { ready: Option<FrameResponse> },
}

impl RenderBackend {
    pub fn new(use_worker_thread: bool) -> Self {
        if !use_worker_thread {
            return Self::inline();
        }
        match RenderWorker::spawn() {
            Ok(worker) => RenderBackend::Worker(worker),
            Err(e) => {
                warn!(error = %e, "rendering inline");
                Self::inline()
            }
        }
    }

    pub fn inline() -> Self {
        RenderBackend::Inline { ready: None }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RenderBackend::Worker(_) => "worker",
            RenderBackend::Inline { .. } => "inline",
        }
    }

    /// True when a frame is pending and a new request would be declined
    pub fn is_busy(&self) -> bool {
        match self {
            RenderBackend::Worker(worker) => worker.is_busy(),
            RenderBackend::Inline { .. } => false,
        }
    }

    /// Hand a request to the backend. Returns false if it was skipped because
    /// the previous frame is still being computed.
    pub fn submit(&mut self, request: FrameRequest) -> bool {
        let posted = match self {
            RenderBackend::Worker(worker) => worker.post(request.clone()),
            RenderBackend::Inline { ready } => {
                *ready = Some(request.compute());
                return true;
            }
        };
        match posted {
            Ok(accepted) => accepted,
            Err(e) => {
                self.degrade(&e);
                self.submit(request)
            }
        }
    }

    /// Take the finished frame, if any
    pub fn poll(&mut self) -> Option<FrameResponse> {
        let received = match self {
            RenderBackend::Worker(worker) => worker.try_recv(),
            RenderBackend::Inline { ready } => return ready.take(),
        };
        match received {
            Ok(response) => response,
            Err(e) => {
                self.degrade(&e);
                None
            }
        }
    }

    fn degrade(&mut self, error: &GlobeError) {
        warn!(error = %error, "render worker lost, rendering inline");
        *self = Self::inline();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globe::Polygon;

    fn request(seq: u64) -> FrameRequest {
        let shapes: Arc<[LandShape]> =
            vec![Polygon::new(vec![(-20.0, -20.0), (20.0, -20.0), (20.0, 20.0), (-20.0, 20.0)]).into()].into();
        FrameRequest {
            seq,
            rotation_x: 0.2,
            rotation_y: -0.4,
            shapes,
            grid: GridSpec::default(),
        }
    }

    #[test]
    fn test_worker_matches_inline() {
        let mut worker = RenderWorker::spawn().unwrap();
        assert!(worker.post(request(5)).unwrap());
        let response = worker.recv_timeout(Duration::from_secs(10)).unwrap().unwrap();
        assert_eq!(response.seq, 5);
        assert_eq!(response.points, request(5).compute().points);
    }

    #[test]
    fn test_one_request_in_flight() {
        let mut worker = RenderWorker::spawn().unwrap();
        assert!(worker.post(request(1)).unwrap());
        assert!(worker.is_busy());
        assert!(!worker.post(request(2)).unwrap());

        let first = worker.recv_timeout(Duration::from_secs(10)).unwrap().unwrap();
        assert_eq!(first.seq, 1);
        assert!(!worker.is_busy());
        assert!(worker.post(request(3)).unwrap());
        let next = worker.recv_timeout(Duration::from_secs(10)).unwrap().unwrap();
        assert_eq!(next.seq, 3);
    }

    #[test]
    fn test_try_recv_empty_when_idle() {
        let mut worker = RenderWorker::spawn().unwrap();
        assert!(worker.try_recv().unwrap().is_none());
    }

    #[test]
    fn test_drop_joins_with_frame_in_flight() {
        let mut worker = RenderWorker::spawn().unwrap();
        worker.post(request(1)).unwrap();
        drop(worker);
    }

    #[test]
    fn test_inline_backend() {
        let mut backend = RenderBackend::new(false);
        assert_eq!(backend.name(), "inline");
        assert!(backend.poll().is_none());
        assert!(backend.submit(request(9)));
        assert!(!backend.is_busy());
        let response = backend.poll().unwrap();
        assert_eq!(response.seq, 9);
        assert!(backend.poll().is_none());
    }

    #[test]
    fn test_lost_worker_falls_back_on_poll() {
        let mut backend = RenderBackend::Worker(RenderWorker::disconnected());
        assert_eq!(backend.name(), "worker");
        assert!(backend.poll().is_none());
        assert_eq!(backend.name(), "inline");

        assert!(backend.submit(request(11)));
        assert_eq!(backend.poll().unwrap().seq, 11);
    }

    #[test]
    fn test_lost_worker_falls_back_on_submit() {
        let mut backend = RenderBackend::Worker(RenderWorker::disconnected());
        assert!(backend.submit(request(12)));
        assert_eq!(backend.name(), "inline");
        assert_eq!(backend.poll().unwrap().seq, 12);
    }

    #[test]
    fn test_threaded_backend_round_trip() {
        let mut backend = RenderBackend::new(true);
        assert_eq!(backend.name(), "worker");
        assert!(backend.submit(request(4)));
        assert!(!backend.submit(request(5)));

        let deadline = Instant::now() + Duration::from_secs(10);
        let response = loop {
            if let Some(r) = backend.poll() {
                break r;
            }
            assert!(Instant::now() < deadline, "worker never answered");
            thread::sleep(Duration::from_millis(1));
        };
        assert_eq!(response.seq, 4);
    }
}
