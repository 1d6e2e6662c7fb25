// Remote controller client
// Posts observations to controller-server without blocking the game loop

use std::sync::mpsc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

use super::protocol::{ControllerInput, ControllerOutput};
use crate::ai::{Bot, ControllerError};

/// Answer from the network task, stamped with the epoch it was requested in
struct Reply {
    epoch: u64,
    result: Result<f32, ControllerError>,
}

/// A `Bot` backed by the HTTP controller service.
///
/// Requests run on a private tokio runtime and answers come back over a
/// channel that `poll_target` drains. `cancel` bumps the epoch, so replies to
/// earlier requests are discarded even if they are already queued.
pub struct RemoteBot {
    name: String,
    endpoint: String,
    client: reqwest::Client,
    runtime: Option<Runtime>,
    tx: mpsc::Sender<Reply>,
    rx: mpsc::Receiver<Reply>,
    epoch: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl RemoteBot {
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("retropong-ai")
            .enable_all()
            .build()?;

        let client = {
            let _guard = runtime.enter();
            reqwest::Client::builder()
                .timeout(timeout)
                .no_proxy()
                .build()?
        };

        let (tx, rx) = mpsc::channel();

        tracing::info!("Remote controller at {}", endpoint);

        Ok(Self {
            name: format!("Remote ({})", endpoint),
            endpoint: endpoint.to_string(),
            client,
            runtime: Some(runtime),
            tx,
            rx,
            epoch: 0,
            in_flight: None,
        })
    }

    fn busy(&self) -> bool {
        self.in_flight
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

async fn fetch_target(
    client: reqwest::Client,
    endpoint: String,
    observation: ControllerInput,
) -> Result<f32, ControllerError> {
    let response = client
        .post(&endpoint)
        .json(&observation)
        .send()
        .await
        .map_err(|e| ControllerError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ControllerError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let output: ControllerOutput = response
        .json()
        .await
        .map_err(|e| ControllerError::Malformed(e.to_string()))?;

    if !output.target_y.is_finite() {
        return Err(ControllerError::Malformed(format!(
            "non-finite targetY {}",
            output.target_y
        )));
    }
    Ok(output.target_y)
}

impl Bot for RemoteBot {
    fn request(&mut self, observation: ControllerInput) {
        // One request at a time; a slow service just skips polling cycles
        if self.busy() {
            tracing::debug!("Controller request still in flight, skipping cycle");
            return;
        }
        let Some(runtime) = self.runtime.as_ref() else {
            return;
        };

        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let tx = self.tx.clone();
        let epoch = self.epoch;

        self.in_flight = Some(runtime.spawn(async move {
            let result = fetch_target(client, endpoint, observation).await;
            // Receiver gone means the bot was dropped
            let _ = tx.send(Reply { epoch, result });
        }));
    }

    fn poll_target(&mut self) -> Option<f32> {
        let mut latest = None;
        while let Ok(reply) = self.rx.try_recv() {
            if reply.epoch != self.epoch {
                continue;
            }
            match reply.result {
                Ok(target) => latest = Some(target),
                Err(e) => tracing::warn!("{}: no target this cycle: {}", self.name, e),
            }
        }
        latest
    }

    fn cancel(&mut self) {
        self.epoch += 1;
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for RemoteBot {
    fn drop(&mut self) {
        self.cancel();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Difficulty;
    use crate::network::protocol::PREDICT_PATH;
    use crate::network::server::{serve, ServiceState};
    use std::time::Instant;

    fn observation(ball_y: f32) -> ControllerInput {
        ControllerInput {
            ball_x: 400.0,
            ball_y,
            ball_dx: 5.0,
            ball_dy: 0.0,
            paddle_y: 300.0,
            opponent_paddle_y: 300.0,
            board_height: 600.0,
            paddle_height: 100.0,
            is_ball_moving_towards_ai: true,
            paddle_speed: 10.0,
        }
    }

    /// Start a controller-server on a loopback port
    fn spawn_server() -> (Runtime, String) {
        let runtime = Runtime::new().unwrap();
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let addr = listener.local_addr().unwrap();
        runtime.spawn(async move {
            let _ = serve(listener, ServiceState::seeded(Difficulty::Classic, 1)).await;
        });
        (runtime, format!("http://{}{}", addr, PREDICT_PATH))
    }

    fn wait_for_target(bot: &mut RemoteBot, limit: Duration) -> Option<f32> {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if let Some(target) = bot.poll_target() {
                return Some(target);
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        None
    }

    #[test]
    fn test_remote_round_trip() {
        let (_server, endpoint) = spawn_server();
        let mut bot = RemoteBot::new(&endpoint, Duration::from_secs(2)).unwrap();

        bot.request(observation(500.0));
        let target = wait_for_target(&mut bot, Duration::from_secs(5)).expect("no reply");
        assert!((target - 308.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejected_request_gives_no_target() {
        let (_server, endpoint) = spawn_server();
        let mut bot = RemoteBot::new(&endpoint, Duration::from_secs(2)).unwrap();

        let mut bad = observation(500.0);
        bad.paddle_height = 10_000.0;
        bot.request(bad);
        assert_eq!(wait_for_target(&mut bot, Duration::from_millis(500)), None);

        // Still usable afterwards
        bot.request(observation(300.0));
        assert!(wait_for_target(&mut bot, Duration::from_secs(5)).is_some());
    }

    #[test]
    fn test_unreachable_service_is_not_fatal() {
        // Grab a free port, then close it
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let endpoint = format!("http://{}{}", addr, PREDICT_PATH);
        let mut bot = RemoteBot::new(&endpoint, Duration::from_millis(300)).unwrap();

        bot.request(observation(500.0));
        assert_eq!(wait_for_target(&mut bot, Duration::from_secs(1)), None);
    }

    #[test]
    fn test_cancel_discards_late_reply() {
        let (_server, endpoint) = spawn_server();
        let mut bot = RemoteBot::new(&endpoint, Duration::from_secs(2)).unwrap();

        bot.request(observation(500.0));
        bot.cancel();
        assert_eq!(wait_for_target(&mut bot, Duration::from_millis(500)), None);
    }
}
