//! Built-in mover endpoint.
//!
//! An `AiEndpoint` attaches to a room exactly like a socket endpoint:
//! it registers a mailbox, receives the same outbound events, and
//! submits moves through the same room interface. Only the decision
//! source differs.

use std::sync::Arc;

use actix::prelude::*;
use tracing::info;
use uuid::Uuid;

use crate::ai::AiMover;
use crate::domain::player::PlayerHandle;
use crate::domain::session::EndpointId;
use crate::ws::hub::{GameRoom, Outbound, SessionRegistry};
use crate::ws::protocol::ServerMsg;

pub struct AiEndpoint {
    conn_id: EndpointId,
    room: Arc<GameRoom>,
    registry: Arc<SessionRegistry>,
    mover: Box<dyn AiMover>,
}

impl AiEndpoint {
    /// Start the actor and bind it to `player_handle`'s slot. The
    /// attach happens synchronously, so callers control binding order
    /// regardless of when the actor itself gets polled.
    pub fn spawn(
        room: Arc<GameRoom>,
        registry: Arc<SessionRegistry>,
        player_handle: PlayerHandle,
        mover: Box<dyn AiMover>,
    ) -> Addr<Self> {
        let conn_id = Uuid::new_v4();
        let addr = Self {
            conn_id,
            room: room.clone(),
            registry,
            mover,
        }
        .start();
        room.attach_automaton(conn_id, addr.clone().recipient(), player_handle);
        addr
    }

    fn try_move(&self) {
        self.room.automaton_move(self.conn_id, self.mover.as_ref());
    }
}

impl Actor for AiEndpoint {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            game_id = %self.room.id(),
            "[AI ENDPOINT] started"
        );
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.room.detach(self.conn_id);
        self.registry.remove_if_empty(self.room.id());
        info!(
            conn_id = %self.conn_id,
            game_id = %self.room.id(),
            "[AI ENDPOINT] stopped"
        );
    }
}

impl Handler<Outbound> for AiEndpoint {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) -> Self::Result {
        match msg {
            // A committed move may have handed us the turn; a poke says
            // an endpoint finished attaching. Either way the room
            // decides whether we actually act.
            Outbound::Event(ServerMsg::Move { .. }) | Outbound::Poke => self.try_move(),
            Outbound::Event(_) => {}
            Outbound::Stop => ctx.stop(),
        }
    }
}
