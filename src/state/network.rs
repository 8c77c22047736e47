use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error, info};
use roster_api::{LoadOptions, RosterApi};
use std::time::Duration;
use tokio::sync::mpsc;

pub const SPINNER_INTERVAL: Duration = Duration::from_millis(120);
const SPINNER_FRAMES: [char; 4] = ['◐', '◓', '◑', '◒'];
const FAILED_MARK: char = '✗';

/// Where the most recent roster load stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    /// The last load failed. Any previously loaded roster is still shown.
    Failed,
}

/// Load progress as seen by the UI loop. Advanced by `UiEvent::Tick`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadingState {
    phase: LoadPhase,
    frame: usize,
}

impl LoadingState {
    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn begin(&mut self) {
        self.phase = LoadPhase::Loading;
        self.frame = 0;
    }

    pub fn finish(&mut self, ok: bool) {
        self.phase = if ok { LoadPhase::Idle } else { LoadPhase::Failed };
    }

    /// Step the spinner. Returns whether the indicator changed.
    pub fn tick(&mut self) -> bool {
        if !self.is_loading() {
            return false;
        }
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
        true
    }

    pub fn indicator(&self) -> Option<char> {
        match self.phase {
            LoadPhase::Idle => None,
            LoadPhase::Loading => Some(SPINNER_FRAMES[self.frame]),
            LoadPhase::Failed => Some(FAILED_MARK),
        }
    }
}

/// Runs roster loads off the UI loop, one at a time.
pub struct NetworkWorker {
    api: RosterApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
}

impl NetworkWorker {
    pub fn new(
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            api: RosterApi::new(),
            requests,
            responses,
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let response = match self.newest(request) {
                NetworkRequest::LoadRoster { options } => self.load_roster(&options).await,
            };

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    /// Reloads queued up behind a running load collapse into the latest one.
    fn newest(&mut self, mut request: NetworkRequest) -> NetworkRequest {
        while let Ok(next) = self.requests.try_recv() {
            debug!("skipping superseded roster load");
            request = next;
        }
        request
    }

    async fn load_roster(&self, options: &LoadOptions) -> NetworkResponse {
        let _ = self
            .responses
            .send(NetworkResponse::LoadStarted {
                source: options.source.to_string(),
            })
            .await;

        match self.api.load(options).await {
            Ok(loaded) => {
                info!(
                    "roster ready after {} attempt(s): {} players",
                    loaded.attempts,
                    loaded.roster.len()
                );
                NetworkResponse::RosterLoaded { loaded: Box::new(loaded) }
            }
            Err(e) => NetworkResponse::Error { message: e.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_api::RosterSource;
    use std::path::PathBuf;

    fn request(path: PathBuf) -> NetworkRequest {
        NetworkRequest::LoadRoster {
            options: LoadOptions::new(RosterSource::Path(path)),
        }
    }

    #[test]
    fn spinner_only_turns_while_loading() {
        let mut loading = LoadingState::default();
        assert_eq!(loading.indicator(), None);
        assert!(!loading.tick());

        loading.begin();
        let first = loading.indicator();
        assert!(loading.tick());
        assert_ne!(loading.indicator(), first);

        loading.finish(false);
        assert_eq!(loading.phase(), LoadPhase::Failed);
        assert_eq!(loading.indicator(), Some(FAILED_MARK));
        assert!(!loading.tick());

        loading.begin();
        loading.finish(true);
        assert_eq!(loading.indicator(), None);
    }

    #[tokio::test]
    async fn queued_reloads_collapse_into_the_latest() {
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, mut resp_rx) = mpsc::channel(8);

        req_tx
            .send(request("/nonexistent/players.csv".into()))
            .await
            .unwrap();
        let sample = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/players.csv");
        req_tx.send(request(sample.clone())).await.unwrap();
        drop(req_tx);

        NetworkWorker::new(req_rx, resp_tx).run().await;

        match resp_rx.recv().await {
            Some(NetworkResponse::LoadStarted { source }) => {
                assert_eq!(source, sample.display().to_string())
            }
            other => panic!("expected LoadStarted, got {other:?}"),
        }
        match resp_rx.recv().await {
            Some(NetworkResponse::RosterLoaded { loaded }) => assert!(!loaded.roster.is_empty()),
            other => panic!("expected RosterLoaded, got {other:?}"),
        }
        assert!(resp_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn failed_load_reports_the_error() {
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, mut resp_rx) = mpsc::channel(8);
        req_tx
            .send(request("/nonexistent/players.csv".into()))
            .await
            .unwrap();
        drop(req_tx);

        NetworkWorker::new(req_rx, resp_tx).run().await;

        assert!(matches!(resp_rx.recv().await, Some(NetworkResponse::LoadStarted { .. })));
        match resp_rx.recv().await {
            Some(NetworkResponse::Error { message }) => assert!(message.contains("could not read")),
            other => panic!("expected Error, got {other:?}"),
        }
    }
}
