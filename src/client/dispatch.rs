use super::robot::RobotSocket;
use super::server::ModeEvent;
use crate::state::Direction;
use crate::state::World;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;

/// drains the committed plan queue, either toward the physical robot over
/// the sequenced datagram session or straight back to the server when the
/// rig runs against the simulator.
pub struct Dispatcher {
    world: Arc<Mutex<World>>,
    coalesce: bool,
    tick: std::time::Duration,
}

impl Dispatcher {
    pub fn new(world: Arc<Mutex<World>>, coalesce: bool, fps: u16) -> Self {
        Self {
            world,
            coalesce,
            tick: std::time::Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
        }
    }

    /// physical mode. every command is gated on the robot having echoed
    /// and finished the previous one; pause transitions outrank moves;
    /// a move whose provenance disagrees with the live world is dropped,
    /// since the world has drifted from the plan.
    pub async fn drive(
        self,
        mut socket: RobotSocket,
        mut events: UnboundedReceiver<ModeEvent>,
    ) -> anyhow::Result<()> {
        let (cell, running) = {
            let world = self.world.lock().await;
            (world.pacman.cell(), world.mode.running())
        };
        // (re)connection preamble: re-anchor the robot, key it to the mode
        let mut expected = cell;
        socket.flush(cell).await?;
        if !self.await_ready(&mut socket).await {
            return Ok(());
        }
        match running {
            true => socket.start().await?,
            false => socket.stop().await?,
        }
        loop {
            if !self.world.lock().await.is_connected() {
                break;
            }
            while let Ok(event) = events.try_recv() {
                if !self.await_ready(&mut socket).await {
                    return Ok(());
                }
                match event {
                    ModeEvent::Started(cell) => {
                        socket.flush(cell).await?;
                        expected = cell;
                        if !self.await_ready(&mut socket).await {
                            return Ok(());
                        }
                        socket.start().await?;
                    }
                    ModeEvent::Stopped(_) => socket.stop().await?,
                }
            }
            if !self.await_ready(&mut socket).await {
                break;
            }
            let action = self.world.lock().await.pop_action();
            let Some(action) = action else {
                tokio::time::sleep(self.tick).await;
                continue;
            };
            if action.direction == Direction::None {
                // deliberate stall: spend the delay, send nothing
                tokio::time::sleep(self.tick * u32::from(action.delay.max(1))).await;
                continue;
            }
            let (dr, dc) = action.direction.deltas();
            let mut distance = 1u8;
            if self.coalesce {
                let mut world = self.world.lock().await;
                while world
                    .peek_action()
                    .is_some_and(|next| next.direction == action.direction)
                {
                    world.pop_action();
                    distance += 1;
                }
            }
            let target = (
                (expected.0 as i16 + i16::from(dr) * i16::from(distance)) as u8,
                (expected.1 as i16 + i16::from(dc) * i16::from(distance)) as u8,
            );
            // back-track the source this move assumes and drop on drift
            let source = provenance(target, action.direction, distance);
            let actual = self.world.lock().await.pacman.cell();
            if source != actual {
                log::warn!(
                    "dropping move: planned from ({},{}) but Pac-Man is at ({},{})",
                    source.0,
                    source.1,
                    actual.0,
                    actual.1
                );
                expected = actual;
                continue;
            }
            if crate::board::wall_at(target.0 as i16, target.1 as i16) {
                log::warn!("dropping move into wall at ({},{})", target.0, target.1);
                expected = actual;
                continue;
            }
            socket.drive(target, action.direction, distance).await?;
            expected = target;
        }
        Ok(())
    }

    /// stall until the robot has echoed and finished the last command,
    /// polling with a fixed backoff. false once the session is over.
    async fn await_ready(&self, socket: &mut RobotSocket) -> bool {
        loop {
            socket.poll();
            if socket.caught_up() {
                return true;
            }
            if !self.world.lock().await.is_connected() {
                return false;
            }
            tokio::time::sleep(crate::ACK_POLL).await;
        }
    }

    /// simulation mode: replay queued actions to the server as single key
    /// bytes, pacing each by its planned delay
    pub async fn relay(self, server: UnboundedSender<bytes::Bytes>) -> anyhow::Result<()> {
        loop {
            let (connected, action) = {
                let mut world = self.world.lock().await;
                (world.is_connected(), world.pop_action())
            };
            if !connected {
                break;
            }
            match action {
                Some(action) => {
                    let key = bytes::Bytes::copy_from_slice(&[u8::from(action.direction)]);
                    if server.send(key).is_err() {
                        log::warn!("server writer gone, closing relay");
                        break;
                    }
                    tokio::time::sleep(self.tick * u32::from(action.delay.max(1))).await;
                }
                None => tokio::time::sleep(self.tick).await,
            }
        }
        Ok(())
    }
}

/// the cell a MOVE claims to start from: its target walked back along
/// the commanded direction
fn provenance(target: (u8, u8), direction: Direction, distance: u8) -> (u8, u8) {
    let (dr, dc) = direction.deltas();
    (
        (target.0 as i16 - i16::from(dr) * i16::from(distance)) as u8,
        (target.1 as i16 - i16::from(dc) * i16::from(distance)) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_walks_back_along_the_move() {
        assert_eq!(provenance((23, 11), Direction::Left, 2), (23, 13));
        assert_eq!(provenance((20, 13), Direction::Up, 3), (23, 13));
        assert_eq!(provenance((23, 14), Direction::Right, 1), (23, 13));
        assert_eq!(provenance((24, 13), Direction::Down, 1), (23, 13));
    }
}
