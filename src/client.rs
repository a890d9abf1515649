//! One-shot WebSocket client used by the self-test and the `send` CLI command.

use futures::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use crate::foundation::error::PenResult;
use crate::receiver::message::PenMessage;

/// Stage-space legs of the self-test square, as `(from, to)` pairs.
///
/// Starts and ends at `(100, 100)`.
pub const SELF_TEST_SQUARE: [((f64, f64), (f64, f64)); 4] = [
    ((100.0, 100.0), (100.0, -100.0)),
    ((100.0, -100.0), (-100.0, -100.0)),
    ((-100.0, -100.0), (-100.0, 100.0)),
    ((-100.0, 100.0), (100.0, 100.0)),
];

/// `ws://` URL for a listen address such as `127.0.0.1:8765`.
pub fn ws_url(addr: impl std::fmt::Display) -> String {
    format!("ws://{addr}")
}

/// Connect to `url`, send `msg` as one text frame and close.
pub async fn send_message(url: &str, msg: &PenMessage) -> PenResult<()> {
    let text = msg.encode()?;
    let (mut ws, _) = connect_async(url).await?;
    ws.send(Message::Text(text)).await?;
    ws.close(None).await?;
    // Wait for the server's close reply so the next connection is only opened after this message
    // has been handled.
    while let Some(frame) = ws.next().await {
        if frame.is_err() {
            break;
        }
    }
    debug!(url, ?msg, "sent");
    Ok(())
}

/// Self-test messages for the square, in order.
pub fn self_test_messages() -> Vec<PenMessage> {
    SELF_TEST_SQUARE
        .iter()
        .map(|&(from, to)| PenMessage::go_to(from, to))
        .collect()
}

/// Send the four square legs, each over its own connection, in order.
pub async fn run_self_test(url: &str) -> PenResult<()> {
    for msg in self_test_messages() {
        send_message(url, &msg).await?;
    }
    Ok(())
}
