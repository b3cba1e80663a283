use super::command::Ack;
use super::command::Command;
use super::command::SEQ_MOD;
use tokio::net::UdpSocket;

/// sequence bookkeeping for the robot session.
///
/// the robot echoes the last sequence it accepted plus a done bit; a new
/// command may only go out once the echo has caught up with what we sent
/// and execution has finished. an echo running ahead of us is treated as
/// transient: the next send simply resumes from echo + 1.
#[derive(Debug, Clone, Copy)]
pub struct Sequencer {
    seq: u16,
    acked: u16,
    done: bool,
}

impl Default for Sequencer {
    fn default() -> Self {
        // before the first ack we assume a ready robot, or nothing
        // would ever be sent
        Self {
            seq: 0,
            acked: 0,
            done: true,
        }
    }
}

impl Sequencer {
    /// whether the robot has confirmed the last command and finished it
    pub fn caught_up(&self) -> bool {
        self.acked == self.seq && self.done
    }

    /// claim the next sequence number for an outgoing command
    pub fn advance(&mut self) -> u16 {
        self.seq = if self.acked > self.seq {
            (self.acked + 1) % SEQ_MOD
        } else {
            (self.seq + 1) % SEQ_MOD
        };
        self.seq
    }

    /// fold in an acknowledgement; true on the not-ready to ready edge
    pub fn observe(&mut self, ack: Ack) -> bool {
        let edge = !self.done && ack.done;
        self.acked = ack.seq;
        self.done = ack.done;
        edge
    }

    pub fn last_sent(&self) -> u16 {
        self.seq
    }
}

/// datagram session with the robot: fire commands, drain echoes.
pub struct RobotSocket {
    socket: UdpSocket,
    sequencer: Sequencer,
}

impl RobotSocket {
    pub async fn connect(addr: &str) -> anyhow::Result<Self> {
        use anyhow::Context;
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .context("bind robot socket")?;
        socket
            .connect(addr)
            .await
            .with_context(|| format!("connect robot socket [{}]", addr))?;
        Ok(Self {
            socket,
            sequencer: Sequencer::default(),
        })
    }

    pub fn caught_up(&self) -> bool {
        self.sequencer.caught_up()
    }

    /// drain pending acknowledgement datagrams without blocking.
    /// returns true when the robot just flipped to ready.
    pub fn poll(&mut self) -> bool {
        let mut ready = false;
        let mut buffer = [0u8; 64];
        while let Ok(n) = self.socket.try_recv(&mut buffer) {
            if let Some(ack) = Ack::parse(&buffer[..n]) {
                if self.sequencer.observe(ack) {
                    log::debug!("robot ready at seq {}", ack.seq);
                    ready = true;
                }
            } else {
                log::warn!("unparseable ack datagram ({} bytes)", n);
            }
        }
        ready
    }

    pub async fn start(&mut self) -> anyhow::Result<()> {
        log::info!("robot start");
        let seq = self.sequencer.advance();
        self.dispatch(Command::start(seq)).await
    }

    pub async fn stop(&mut self) -> anyhow::Result<()> {
        log::info!("robot stop");
        let seq = self.sequencer.advance();
        self.dispatch(Command::stop(seq)).await
    }

    pub async fn flush(&mut self, cell: (u8, u8)) -> anyhow::Result<()> {
        log::info!("robot flush to ({},{})", cell.0, cell.1);
        let seq = self.sequencer.advance();
        self.dispatch(Command::flush(seq, cell)).await
    }

    pub async fn drive(
        &mut self,
        target: (u8, u8),
        direction: crate::state::Direction,
        distance: u8,
    ) -> anyhow::Result<()> {
        let seq = self.sequencer.advance();
        log::debug!(
            "robot move #{} -> ({},{}) x{}",
            seq,
            target.0,
            target.1,
            distance
        );
        self.dispatch(Command::drive(seq, target, direction, distance))
            .await
    }

    async fn dispatch(&mut self, command: Command) -> anyhow::Result<()> {
        use anyhow::Context;
        self.socket
            .send(&command.encode())
            .await
            .context("send robot command")?;
        Ok(())
    }
}
