use super::search::Planner;
use crate::board::Metric;
use crate::state::GhostColor;
use crate::state::World;
use std::sync::Arc;
use tokio::sync::Mutex;

/// paced planning loop: one plan per game tick.
///
/// holds the cooperative lock for the duration of each plan so inbound
/// frames drop instead of mutating the world mid-search, and refuses to
/// plan ahead of the dispatcher: a fresh plan is only worth making once
/// the previous one has fully left the queue.
pub struct Decider {
    world: Arc<Mutex<World>>,
    planner: Planner,
    fps: u16,
    victim: Option<GhostColor>,
    pellet: (u8, u8),
}

impl Decider {
    pub fn new(world: Arc<Mutex<World>>, fps: u16) -> Self {
        Self {
            world,
            planner: Planner::new(Metric::Maze),
            fps: fps.max(1),
            victim: None,
            pellet: (23, 14),
        }
    }

    pub async fn run(mut self) {
        let tick = std::time::Duration::from_secs_f64(1.0 / f64::from(self.fps));
        loop {
            {
                let world = self.world.lock().await;
                if !world.is_connected() {
                    log::info!("session over, decision loop closing");
                    break;
                }
                // the dispatcher still owes the robot the previous plan
                if world.backlog() > 0 {
                    drop(world);
                    tokio::time::sleep(tick).await;
                    continue;
                }
            }
            tokio::time::sleep(tick).await;
            let mut world = self.world.lock().await;
            if world.mode.running() {
                world.lock();
                let delay = world.update_period.clamp(1, 24);
                let (victim, pellet) = self.planner.plan(&mut world, delay, self.victim, self.pellet);
                self.victim = victim;
                self.pellet = pellet;
                world.unlock();
            }
        }
    }
}
