use super::config::Config;
use super::dispatch::Dispatcher;
use super::robot::RobotSocket;
use super::server;
use crate::planner::Decider;
use crate::state::World;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::Mutex;

/// top-level session: one shared world, three cooperating loops.
///
/// the receive loop applies frames, the decision loop plans over locked
/// snapshots, and the dispatcher drains committed actions outward. all
/// three observe `connected` and wind down when the transport collapses.
pub struct Client {
    config: Config,
    world: Arc<Mutex<World>>,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            world: Arc::new(Mutex::new(World::new())),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let stream = server::connect(&self.config.connect_url()).await?;
        self.world.lock().await.set_connected(true);
        let (sink, stream) = stream.split();
        let (server_tx, server_rx) = unbounded_channel();
        let (event_tx, event_rx) = unbounded_channel();
        let writer = tokio::spawn(server::send_loop(sink, server_rx));
        let receiver = tokio::spawn(server::recv_loop(
            stream,
            self.world.clone(),
            event_tx,
        ));
        let decider = tokio::spawn(Decider::new(self.world.clone(), self.config.game_fps).run());
        let dispatcher = Dispatcher::new(
            self.world.clone(),
            self.config.coalesce_commands,
            self.config.game_fps,
        );
        if self.config.python_simulation {
            log::info!("dispatching to server (simulation mode)");
            dispatcher.relay(server_tx).await?;
        } else {
            log::info!("dispatching to robot [{}]", self.config.robot_addr());
            let socket = RobotSocket::connect(&self.config.robot_addr()).await?;
            dispatcher.drive(socket, event_rx).await?;
        }
        receiver.await.ok();
        decider.await.ok();
        writer.abort();
        log::info!("session closed");
        Ok(())
    }
}
