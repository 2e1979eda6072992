//! Session registry and per-session rooms.
//!
//! A `GameRoom` is the unit of mutual exclusion the protocol requires:
//! attach, moves and detach on one session all run under its mutex, and
//! outbound fan-out happens while the mutex is held, so each endpoint's
//! mailbox observes events in exactly the order the session emitted
//! them. Different rooms share nothing and run fully in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use actix::prelude::*;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ai::AiMover;
use crate::domain::events::SessionEvent;
use crate::domain::player::{GameType, PlayerHandle};
use crate::domain::rules::GameConfig;
use crate::domain::session::{EndpointId, GameSession, Phase};
use crate::domain::snapshot::SetupSnapshot;
use crate::errors::domain::DomainError;
use crate::ws::protocol::ServerMsg;

/// Message delivered to an attached endpoint's mailbox.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub enum Outbound {
    /// A broadcast protocol event.
    Event(ServerMsg),
    /// Prod built-in movers to act if it is their turn. Sockets ignore
    /// this.
    Poke,
    /// The room is shutting this endpoint down.
    Stop,
}

/// How an endpoint is driven: a remote websocket, or a built-in mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnKind {
    Socket,
    Automaton,
}

struct Conn {
    kind: ConnKind,
    recipient: Recipient<Outbound>,
}

struct RoomInner {
    session: GameSession,
    connections: HashMap<EndpointId, Conn>,
}

impl RoomInner {
    /// Deliver `msg` to every attached endpoint except `exclude`.
    /// Callers hold the room lock, which is what serializes the
    /// per-endpoint ordering.
    fn broadcast(&self, msg: &ServerMsg, exclude: Option<EndpointId>) {
        for (endpoint, conn) in &self.connections {
            if Some(*endpoint) == exclude {
                continue;
            }
            conn.recipient.do_send(Outbound::Event(msg.clone()));
        }
    }

    fn publish_events(&self, events: &[SessionEvent], exclude: Option<EndpointId>) {
        for event in events {
            // Only the joiner's own join is withheld; it learns its
            // role from setup.
            let exclude = match event {
                SessionEvent::PlayerJoined { .. } => exclude,
                _ => None,
            };
            self.broadcast(&ServerMsg::from(*event), exclude);
        }
    }

    fn socket_count(&self) -> usize {
        self.connections
            .values()
            .filter(|conn| conn.kind == ConnKind::Socket)
            .count()
    }
}

/// One live session plus its attached endpoints.
pub struct GameRoom {
    id: String,
    /// Whether the id is shared with clients for joining (two-human
    /// sessions only).
    joinable: bool,
    allow_reclaim: bool,
    inner: Mutex<RoomInner>,
}

impl GameRoom {
    fn new(id: String, session: GameSession, allow_reclaim: bool) -> Self {
        let joinable = session.game_type() == GameType::VsHum;
        Self {
            id,
            joinable,
            allow_reclaim,
            inner: Mutex::new(RoomInner {
                session,
                connections: HashMap::new(),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Attach a socket endpoint: register its mailbox, bind a role, and
    /// send it the setup snapshot, atomically with respect to all other
    /// room traffic.
    pub fn attach(
        &self,
        endpoint: EndpointId,
        recipient: Recipient<Outbound>,
        rejoin_as: Option<PlayerHandle>,
    ) {
        let mut inner = self.inner.lock();
        let game_id = self.joinable.then(|| self.id.clone());
        let attachment = inner
            .session
            .attach(endpoint, rejoin_as, self.allow_reclaim, game_id);

        info!(
            game_id = %self.id,
            endpoint = %endpoint,
            role = ?attachment.role,
            "[ROOM] endpoint attached"
        );

        recipient.do_send(Outbound::Event(ServerMsg::Setup(attachment.snapshot)));
        inner.connections.insert(
            endpoint,
            Conn {
                kind: ConnKind::Socket,
                recipient,
            },
        );
        inner.publish_events(&attachment.events, Some(endpoint));
    }

    /// Attach a built-in mover to the slot its game type owns.
    pub fn attach_automaton(
        &self,
        endpoint: EndpointId,
        recipient: Recipient<Outbound>,
        player_handle: PlayerHandle,
    ) {
        let mut inner = self.inner.lock();
        let attachment = inner.session.attach_automaton(endpoint, player_handle);

        info!(
            game_id = %self.id,
            endpoint = %endpoint,
            role = ?attachment.role,
            "[ROOM] automaton attached"
        );

        recipient.do_send(Outbound::Event(ServerMsg::Setup(attachment.snapshot)));
        inner.connections.insert(
            endpoint,
            Conn {
                kind: ConnKind::Automaton,
                recipient,
            },
        );
        inner.publish_events(&attachment.events, Some(endpoint));
    }

    /// Apply one move from `endpoint`. Rejections leave the session
    /// untouched; the caller drops them after this has logged them.
    pub fn handle_move(&self, endpoint: EndpointId, x: u8, y: u8) -> Result<(), DomainError> {
        let mut inner = self.inner.lock();
        let Some(player_handle) = inner.session.role_of(endpoint) else {
            warn!(
                game_id = %self.id,
                endpoint = %endpoint,
                x, y,
                "[ROOM] move from a non-mover endpoint ignored"
            );
            return Err(DomainError::NotYourTurn);
        };

        match inner.session.apply_move(player_handle, x, y) {
            Ok(events) => {
                debug!(
                    game_id = %self.id,
                    player_handle = player_handle.as_str(),
                    x, y,
                    "[ROOM] move committed"
                );
                inner.publish_events(&events, None);
                Ok(())
            }
            Err(err) => {
                warn!(
                    game_id = %self.id,
                    player_handle = player_handle.as_str(),
                    x, y,
                    error = %err,
                    "[ROOM] move rejected"
                );
                Err(err)
            }
        }
    }

    /// Let the built-in mover at `endpoint` act if it is on turn. The
    /// whole decide-and-commit runs under one lock acquisition, so the
    /// turn it observes is the turn it moves on.
    pub fn automaton_move(&self, endpoint: EndpointId, mover: &dyn AiMover) {
        let mut inner = self.inner.lock();
        let Some(player_handle) = inner.session.role_of(endpoint) else {
            return;
        };
        if inner.session.phase() != Phase::Active || inner.session.turn() != player_handle {
            return;
        }

        let open = inner.session.open_cells();
        match mover.choose_move(&open) {
            Ok((x, y)) => match inner.session.apply_move(player_handle, x, y) {
                Ok(events) => inner.publish_events(&events, None),
                Err(err) => warn!(
                    game_id = %self.id,
                    player_handle = player_handle.as_str(),
                    error = %err,
                    "[ROOM] automaton move rejected"
                ),
            },
            Err(err) => warn!(
                game_id = %self.id,
                player_handle = player_handle.as_str(),
                error = %err,
                "[ROOM] automaton failed to choose a move"
            ),
        }
    }

    /// Prod every built-in mover; each checks for itself whether it is
    /// on turn. Called once a real endpoint has finished attaching.
    pub fn kick_automatons(&self) {
        let inner = self.inner.lock();
        for conn in inner.connections.values() {
            if conn.kind == ConnKind::Automaton {
                conn.recipient.do_send(Outbound::Poke);
            }
        }
    }

    /// Detach an endpoint, fan out any departure event, and stop
    /// orphaned automatons once no real socket remains. Returns whether
    /// the room is now empty and can be reaped.
    pub fn detach(&self, endpoint: EndpointId) -> bool {
        let mut inner = self.inner.lock();
        if inner.connections.remove(&endpoint).is_none() {
            return inner.connections.is_empty();
        }

        let events = inner.session.detach(endpoint);
        inner.publish_events(&events, None);

        info!(
            game_id = %self.id,
            endpoint = %endpoint,
            remaining = inner.connections.len(),
            "[ROOM] endpoint detached"
        );

        if inner.socket_count() == 0 {
            for conn in inner.connections.values() {
                if conn.kind == ConnKind::Automaton {
                    conn.recipient.do_send(Outbound::Stop);
                }
            }
        }

        inner.connections.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().connections.is_empty()
    }

    /// Current snapshot for an already-attached endpoint (spectator
    /// view unless the endpoint holds a role).
    pub fn snapshot_for(&self, endpoint: EndpointId) -> SetupSnapshot {
        let inner = self.inner.lock();
        let role = inner
            .session
            .role_of(endpoint)
            .map_or(crate::domain::player::ViewerRole::Spectator, Into::into);
        let game_id = self.joinable.then(|| self.id.clone());
        inner.session.snapshot(role, game_id)
    }
}

/// Maps session ids to live rooms. Owns every session; rooms are
/// retired as soon as their last endpoint detaches.
pub struct SessionRegistry {
    rooms: DashMap<String, Arc<GameRoom>>,
    allow_reclaim: bool,
}

impl SessionRegistry {
    pub fn new(allow_reclaim: bool) -> Self {
        Self {
            rooms: DashMap::new(),
            allow_reclaim,
        }
    }

    /// Create a fresh session under a collision-resistant id.
    pub fn create(&self, config: GameConfig) -> Result<Arc<GameRoom>, DomainError> {
        let session = GameSession::create(config)?;
        let id = Uuid::new_v4().simple().to_string();
        let room = Arc::new(GameRoom::new(id.clone(), session, self.allow_reclaim));
        self.rooms.insert(id.clone(), room.clone());
        info!(game_id = %id, game_type = ?config.game_type, "[REGISTRY] session created");
        Ok(room)
    }

    /// Look up a live session by id.
    pub fn get(&self, game_id: &str) -> Result<Arc<GameRoom>, DomainError> {
        self.rooms
            .get(game_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DomainError::SessionNotFound(game_id.to_string()))
    }

    /// Drop the registry entry once the room has no attached endpoints.
    /// Called after every detach.
    pub fn remove_if_empty(&self, game_id: &str) {
        let removed = self
            .rooms
            .remove_if(game_id, |_, room| room.is_empty())
            .is_some();
        if removed {
            info!(game_id = %game_id, "[REGISTRY] empty session removed");
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
