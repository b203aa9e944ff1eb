use super::actor::SessionHandle;
use super::broadcaster;
use super::protocol::{decode_client_message, ClientMessage};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::Extension;
use futures::{SinkExt, StreamExt};

/// `GET /ws`: upgrades to the session WebSocket.
pub async fn handle_session_socket(
    ws: WebSocketUpgrade,
    Extension(session): Extension<SessionHandle>,
) -> Response {
    ws.on_upgrade(move |socket| serve_connection(socket, session))
}

/// Drives one connection until the client leaves.
///
/// The connection is registered with the actor before its first frame is
/// read, so the snapshot always precedes the effects of its own commands.
/// Outgoing traffic is written by a separate task draining the outbox.
async fn serve_connection(socket: WebSocket, session: SessionHandle) {
    let (mut sink, mut stream) = socket.split();
    let (outbox, mut inbox) = broadcaster::outbox();

    let client = match session.connect(outbox).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Could not register connection: {:#}", e);
            return;
        }
    };

    let writer = tokio::spawn(async move {
        while let Some(message) = inbox.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("Failed to encode '{}': {}", message.event_name(), e);
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!("Socket error on {}: {}", client, e);
                break;
            }
        };

        let result = match decode_client_message(&text) {
            Ok(ClientMessage::Disconnect) => break,
            Ok(message) => session.send(&client, message).await,
            Err(e) => session.reject(&client, format!("Malformed message: {}", e)).await,
        };

        if let Err(e) = result {
            tracing::error!("Dropping connection {}: {:#}", client, e);
            break;
        }
    }

    // Once the actor forgets the client it drops the outbox sender, which lets
    // the writer flush what is queued and finish.
    if let Err(e) = session.disconnect(&client).await {
        tracing::warn!("Could not unregister {}: {:#}", client, e);
    }
    let _ = writer.await;
}
