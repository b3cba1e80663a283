use crate::state::World;
use futures::Sink;
use futures::SinkExt;
use futures::Stream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;

/// pause-boundary transitions observed in the inbound frame stream,
/// stamped with Pac-Man's cell at the moment of the flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    Started((u8, u8)),
    Stopped((u8, u8)),
}

/// connect the websocket to the game server.
/// a refused connection is fatal at startup, logged with the endpoint.
pub async fn connect(
    url: &str,
) -> anyhow::Result<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
> {
    use anyhow::Context;
    let (stream, _) = tokio_tungstenite::connect_async(url)
        .await
        .inspect_err(|e| log::error!("websocket connection refused [{}]: {}", url, e))
        .with_context(|| format!("connect to game server [{}]", url))?;
    log::info!("connected to game server [{}]", url);
    Ok(stream)
}

/// receive loop: apply frames in arrival order, then surface mode flips.
///
/// contention policy is drop, not buffer: if the planner holds the world,
/// this frame is stale by the time the plan ends, so losing it is free.
pub async fn recv_loop<S>(
    mut stream: S,
    world: Arc<Mutex<World>>,
    events: UnboundedSender<ModeEvent>,
) where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(message) = stream.next().await {
        let frame = match message {
            Ok(Message::Binary(frame)) => frame,
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => continue,
        };
        let Ok(mut world) = world.try_lock() else {
            // planner mid-search; the next frame will be fresher
            continue;
        };
        let before = world.mode;
        match world.update(&frame, false) {
            Err(e) => {
                log::warn!("dropping malformed frame: {}", e);
                continue;
            }
            Ok(()) => {}
        }
        let after = world.mode;
        let cell = world.pacman.cell();
        drop(world);
        let event = match (before.running(), after.running()) {
            (false, true) => Some(ModeEvent::Started(cell)),
            (true, false) => Some(ModeEvent::Stopped(cell)),
            _ => None,
        };
        if let Some(event) = event {
            log::info!("game {:?}", event);
            let _ = events.send(event);
        }
        tokio::task::yield_now().await;
    }
    log::info!("server stream closed");
    world.lock().await.set_connected(false);
}

/// writer half: forward queued payloads to the server socket
pub async fn send_loop<S>(mut sink: S, mut outbound: UnboundedReceiver<bytes::Bytes>)
where
    S: Sink<Message> + Unpin,
{
    while let Some(payload) = outbound.recv().await {
        if sink.send(Message::Binary(payload.into())).await.is_err() {
            log::warn!("server write failed, closing send loop");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Mode;
    use crate::state::FRAME_LEN;

    #[tokio::test]
    async fn frames_apply_and_mode_flips_surface() {
        let world = Arc::new(Mutex::new(World::default()));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut frame = [0u8; FRAME_LEN];
        frame[3] = 2; // chase
        frame[22] = 23;
        frame[23] = 13;
        let messages = vec![Ok(Message::Binary(frame.to_vec().into()))];
        recv_loop(futures::stream::iter(messages), world.clone(), tx).await;
        assert_eq!(world.lock().await.mode, Mode::Chase);
        assert_eq!(rx.recv().await, Some(ModeEvent::Started((23, 13))));
        // stream ended: the session is over
        assert!(!world.lock().await.is_connected());
    }

    #[tokio::test]
    async fn malformed_frames_leave_state_alone() {
        let world = Arc::new(Mutex::new(World::default()));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let messages = vec![Ok(Message::Binary(vec![1, 2, 3].into()))];
        recv_loop(futures::stream::iter(messages), world.clone(), tx).await;
        assert_eq!(world.lock().await.mode, Mode::Paused);
        assert!(rx.try_recv().is_err());
    }
}
