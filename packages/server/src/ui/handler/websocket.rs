//! WebSocket connection handlers.

use std::{fmt::Display, sync::Arc};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::{sync::mpsc, task::JoinSet};

use crate::{
    domain::{AccessToken, ParticipantId, PusherChannel, Room, RoomId, TimeRange},
    infrastructure::dto::{
        conversion::users_of,
        websocket::{ClientMessage, JoinRoomPayload, ServerMessage, SubmitAnswersPayload},
    },
    ui::state::AppState,
    usecase::{ErrorCode, JoinOutcome, JoinRoomError},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's channel into the WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Queue a frame for this connection only.
fn reply(tx: &PusherChannel, message: &ServerMessage) {
    match message.to_json() {
        Ok(json) => {
            // the connection may already be gone; nothing to do then
            let _ = tx.send(json);
        }
        Err(e) => tracing::error!("Failed to serialize server message: {}", e),
    }
}

fn reply_error<E: ErrorCode + Display>(tx: &PusherChannel, error: &E) {
    reply(
        tx,
        &ServerMessage::Error {
            code: error.code().to_string(),
            message: error.to_string(),
        },
    );
}

fn reply_invalid(tx: &PusherChannel, message: impl Into<String>) {
    reply(
        tx,
        &ServerMessage::Error {
            code: "invalid_message".to_string(),
            message: message.into(),
        },
    );
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    let participant = state
        .connect_participant_usecase
        .execute(tx.clone())
        .await;
    tracing::info!("Participant '{}' connected", participant);

    reply(
        &tx,
        &ServerMessage::Connected {
            participant_id: participant.as_str().to_string(),
        },
    );

    let mut send_task = pusher_loop(rx, sender);

    // Joins run on their own tasks so a close is seen while a profile fetch
    // is still pending; they are aborted before the leave below.
    let mut joins = JoinSet::new();
    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    handle_text(&state, &participant, &tx, &mut joins, text.as_str()).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Participant '{}' closed the connection", participant);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error from '{}': {}", participant, e);
                    break;
                }
            },
            Some(finished) = joins.join_next(), if !joins.is_empty() => {
                if let Err(e) = finished {
                    tracing::error!("Join task of '{}' failed: {}", participant, e);
                }
            }
            _ = &mut send_task => break,
        }
    }

    send_task.abort();
    joins.shutdown().await;

    let departures = state
        .disconnect_participant_usecase
        .execute(&participant)
        .await;
    for departure in departures {
        if departure.stranded.is_empty() {
            continue;
        }
        let message = ServerMessage::Error {
            code: "room_closed".to_string(),
            message: format!("Your opponent left room '{}'", departure.room_id),
        };
        match message.to_json() {
            Ok(json) => {
                if let Err(e) = state
                    .disconnect_participant_usecase
                    .notify_stranded(departure.stranded, &json)
                    .await
                {
                    tracing::warn!("Failed to notify room '{}': {}", departure.room_id, e);
                }
            }
            Err(e) => tracing::error!("Failed to serialize room_closed: {}", e),
        }
    }
    tracing::info!("Participant '{}' disconnected", participant);
}

async fn handle_text(
    state: &Arc<AppState>,
    participant: &ParticipantId,
    tx: &PusherChannel,
    joins: &mut JoinSet<()>,
    text: &str,
) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Invalid message from '{}': {}", participant, e);
            reply_invalid(tx, format!("Invalid message: {}", e));
            return;
        }
    };

    match message {
        ClientMessage::JoinRoom(payload) => {
            let state = state.clone();
            let participant = participant.clone();
            let tx = tx.clone();
            joins.spawn(async move { handle_join(&state, &participant, &tx, payload).await });
        }
        ClientMessage::SubmitAnswers(payload) => {
            handle_submit(state, participant, tx, payload).await
        }
    }
}

async fn handle_join(
    state: &AppState,
    participant: &ParticipantId,
    tx: &PusherChannel,
    payload: JoinRoomPayload,
) {
    let room_id = match RoomId::try_from(payload.room_id) {
        Ok(room_id) => room_id,
        Err(e) => return reply_invalid(tx, e.to_string()),
    };
    let token = match AccessToken::try_from(payload.access_token) {
        Ok(token) => token,
        Err(e) => return reply_invalid(tx, e.to_string()),
    };
    let requested = payload
        .term_length
        .as_deref()
        .map(|selector| TimeRange::from_selector(Some(selector)));

    tracing::info!("Participant '{}' joining room '{}'", participant, room_id);
    match state
        .join_room_usecase
        .execute(room_id, participant.clone(), token, requested)
        .await
    {
        Ok(JoinOutcome::Waiting) => {}
        Ok(JoinOutcome::Ready(room)) => deliver_quiz(state, &room).await,
        Err(e @ JoinRoomError::RoomFull) => {
            tracing::warn!("Participant '{}' rejected: {}", participant, e);
            reply(
                tx,
                &ServerMessage::RoomFull {
                    message: e.to_string(),
                },
            );
        }
        Err(e) => {
            tracing::warn!("Participant '{}' failed to join: {}", participant, e);
            reply_error(tx, &e);
        }
    }
}

/// Send each participant their own half of the quiz.
async fn deliver_quiz(state: &AppState, room: &Room) {
    let users = users_of(room);
    for participant in &room.participants {
        let Some(half) = room.quiz_half_for(participant) else {
            continue;
        };
        let message = ServerMessage::QuizReady {
            room_id: room.id.as_str().to_string(),
            questions: half.into(),
            users: users.clone(),
        };

        let json = match message.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize quiz_ready: {}", e);
                continue;
            }
        };
        if let Err(e) = state.join_room_usecase.deliver_quiz(participant, &json).await {
            tracing::warn!("Failed to deliver quiz to '{}': {}", participant, e);
        }
    }
}

async fn handle_submit(
    state: &AppState,
    participant: &ParticipantId,
    tx: &PusherChannel,
    payload: SubmitAnswersPayload,
) {
    let room_id = match RoomId::try_from(payload.room_id) {
        Ok(room_id) => room_id,
        Err(e) => return reply_invalid(tx, e.to_string()),
    };
    let claimed = match payload.user_id.map(ParticipantId::try_from).transpose() {
        Ok(claimed) => claimed,
        Err(e) => return reply_invalid(tx, e.to_string()),
    };

    match state
        .submit_answers_usecase
        .execute(room_id, participant.clone(), claimed, payload.answers.into())
        .await
    {
        Ok(None) => {}
        Ok(Some(result)) => {
            let message: ServerMessage = (&result).into();
            match message.to_json() {
                Ok(json) => {
                    state
                        .submit_answers_usecase
                        .schedule_results(result.participants(), json);
                }
                Err(e) => tracing::error!("Failed to serialize game_results: {}", e),
            }
        }
        Err(e) => {
            tracing::warn!("Participant '{}' failed to submit: {}", participant, e);
            reply_error(tx, &e);
        }
    }
}
