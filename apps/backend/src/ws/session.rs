//! Per-endpoint websocket actor and the `/ws` upgrade handler.
//!
//! Each connected endpoint gets one `GameWsSession`. The actor attaches
//! to its room when started, relays inbound `move` frames to the room
//! (rejections are logged and dropped; the authoritative event stream
//! corrects the client), and detaches on stop so role bindings never go
//! stale.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ai::RandomMover;
use crate::domain::player::{GameType, PlayerHandle, Sign};
use crate::domain::rules::GameConfig;
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::ws::ai_player::AiEndpoint;
use crate::ws::hub::{GameRoom, Outbound, SessionRegistry};
use crate::ws::protocol::ClientMsg;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// Query string accepted by `/ws`: either a join (`game_id`, optionally
/// `rejoin_as`) or a full creation config.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub game_id: Option<String>,
    pub rejoin_as: Option<PlayerHandle>,
    pub field_width: Option<u8>,
    pub field_height: Option<u8>,
    pub qty_to_win: Option<u8>,
    pub game_type: Option<GameType>,
    pub host_char: Option<Sign>,
    pub start_player_handle: Option<PlayerHandle>,
}

impl ConnectQuery {
    fn creation_config(&self) -> Result<GameConfig, AppError> {
        let require = |name: &'static str| {
            move || AppError::invalid("MISSING_PARAM", format!("missing query parameter {name}"))
        };
        Ok(GameConfig {
            field_width: self.field_width.ok_or_else(require("field_width"))?,
            field_height: self.field_height.ok_or_else(require("field_height"))?,
            qty_to_win: self.qty_to_win.ok_or_else(require("qty_to_win"))?,
            game_type: self.game_type.ok_or_else(require("game_type"))?,
            host_char: self.host_char.ok_or_else(require("host_char"))?,
            start_player_handle: self
                .start_player_handle
                .ok_or_else(require("start_player_handle"))?,
        })
    }
}

/// Resolve or create the room, spin up any built-in movers the game
/// type calls for, then hand the connection to a session actor.
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<ConnectQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    // Validate the websocket handshake before touching the registry.
    // A rejected request must not leave a room (or its movers) behind,
    // since nothing would ever detach from it.
    ws::handshake(&req)?;

    let registry = app_state.registry();

    let (room, rejoin_as) = match &query.game_id {
        Some(game_id) => {
            let room = registry.get(game_id).map_err(AppError::from)?;
            (room, query.rejoin_as)
        }
        None => {
            let config = query.creation_config()?;
            let room = registry.create(config).map_err(AppError::from)?;
            spawn_automatons(&room, &registry, config.game_type);
            (room, None)
        }
    };

    let session = GameWsSession::new(room, registry, rejoin_as);
    ws::start(session, &req, stream)
}

fn spawn_automatons(room: &Arc<GameRoom>, registry: &Arc<SessionRegistry>, game_type: GameType) {
    match game_type {
        GameType::VsHum => {}
        GameType::VsAi => {
            AiEndpoint::spawn(
                room.clone(),
                registry.clone(),
                PlayerHandle::Opponent,
                Box::new(RandomMover::new(None)),
            );
        }
        GameType::AiVsAi => {
            AiEndpoint::spawn(
                room.clone(),
                registry.clone(),
                PlayerHandle::Host,
                Box::new(RandomMover::new(None)),
            );
            AiEndpoint::spawn(
                room.clone(),
                registry.clone(),
                PlayerHandle::Opponent,
                Box::new(RandomMover::new(None)),
            );
        }
    }
}

pub struct GameWsSession {
    conn_id: Uuid,
    room: Arc<GameRoom>,
    registry: Arc<SessionRegistry>,
    rejoin_as: Option<PlayerHandle>,
    last_heartbeat: Instant,
    heartbeat_handle: Option<actix::SpawnHandle>,
}

impl GameWsSession {
    fn new(
        room: Arc<GameRoom>,
        registry: Arc<SessionRegistry>,
        rejoin_as: Option<PlayerHandle>,
    ) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            room,
            registry,
            rejoin_as,
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
        }
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    game_id = %actor.room.id(),
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }

    fn close_on_protocol_violation(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        detail: &str,
    ) {
        warn!(
            conn_id = %self.conn_id,
            game_id = %self.room.id(),
            detail,
            "[WS SESSION] protocol violation"
        );
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Protocol)));
        ctx.stop();
    }
}

impl Actor for GameWsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            game_id = %self.room.id(),
            "[WS SESSION] started"
        );

        self.room
            .attach(self.conn_id, ctx.address().recipient(), self.rejoin_as);
        // With a mover waiting to open the game, its first move should
        // land after this endpoint's setup, like every later one.
        self.room.kick_automatons();
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.room.detach(self.conn_id);
        self.registry.remove_if_empty(self.room.id());
        info!(
            conn_id = %self.conn_id,
            game_id = %self.room.id(),
            "[WS SESSION] stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameWsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(ClientMsg::Move { x, y }) => {
                        // Rejected moves are dropped: the sender stays
                        // locked until the next authoritative event.
                        let _ = self.room.handle_move(self.conn_id, x, y);
                    }
                    Err(err) => {
                        self.close_on_protocol_violation(ctx, &err.to_string());
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.close_on_protocol_violation(ctx, "binary frames not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    game_id = %self.room.id(),
                    error = %err,
                    "[WS SESSION] transport error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<Outbound> for GameWsSession {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) -> Self::Result {
        match msg {
            Outbound::Event(server_msg) => match serde_json::to_string(&server_msg) {
                Ok(payload) => ctx.text(payload),
                Err(err) => warn!(
                    conn_id = %self.conn_id,
                    game_id = %self.room.id(),
                    error = %err,
                    "[WS SESSION] failed to serialize outbound message"
                ),
            },
            // Pokes are for built-in movers only.
            Outbound::Poke => {}
            Outbound::Stop => {
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
            }
        }
    }
}
