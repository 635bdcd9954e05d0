//! WebSocket side of the live notification hub.
//!
//! Viewers upgrade at `/ws` and then only receive: the protocol is
//! server-to-client JSON events, one per new index playlist. The receive
//! half of the socket is watched solely to detect close/error so the
//! connection can be removed from the registry.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};

use crate::hub::SegmentEvent;
use crate::server::AppContext;

/// Upgrade handler for viewer connections.
pub async fn ws_handler(State(ctx): State<AppContext>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, ctx))
}

async fn handle_socket(socket: WebSocket, ctx: AppContext) {
    // Scan for the newest index playlist before registering so the
    // catch-up event always precedes any watch-driven event.
    let catch_up = match ctx.store.latest_index(&ctx.config.media.index_prefix) {
        Ok(latest) => latest,
        Err(e) => {
            tracing::warn!("Catch-up scan failed: {e}");
            None
        }
    };

    let (id, mut rx) = ctx.hub.register();
    let (mut sender, mut receiver) = socket.split();

    // Catch-up send: give a just-joined viewer an immediate starting
    // point instead of waiting for the next filesystem change.
    if let Some(name) = catch_up {
        let event = SegmentEvent::for_file(&ctx.config.media.public_base, &name);
        if send_event(&mut sender, &event).await.is_err() {
            ctx.hub.unregister(id);
            return;
        }
    }

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => {
                    if send_event(&mut sender, &event).await.is_err() {
                        break;
                    }
                }
                // Hub shut down; close out gracefully.
                None => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            },
            msg = receiver.next() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Viewers have no defined client->server payloads; ignore
                // anything they do send (including pings, which axum
                // answers automatically).
                Some(Ok(_)) => {}
            },
        }
    }

    ctx.hub.unregister(id);
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &SegmentEvent,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event)
        .unwrap_or_else(|e| format!(r#"{{"error":"serialization failed: {}"}}"#, e));
    sender.send(Message::Text(json.into())).await
}
