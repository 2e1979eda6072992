//! One game's authoritative state machine.
//!
//! A `GameSession` owns the board, the role slots and the turn, and is
//! the only place any of them mutate. Every mutation is serialized by
//! the owning room, so exactly one `apply_move` is ever in flight per
//! session; mutations return the events to broadcast rather than doing
//! any delivery themselves.

use uuid::Uuid;

use crate::domain::board::{Board, MoveVerdict};
use crate::domain::events::SessionEvent;
use crate::domain::player::{GameResult, GameType, PlayerHandle, ViewerRole};
use crate::domain::rules::GameConfig;
use crate::domain::snapshot::{SetupSnapshot, SignsMap};
use crate::errors::domain::DomainError;

/// Transport-level identity of an attached endpoint.
pub type EndpointId = Uuid;

/// Lifecycle phase. `Finished` is terminal: the transition into it is
/// one-way and no operation mutates the board or turn thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingOpponent,
    Active,
    Finished(GameResult),
}

/// Binding state of one mover role. At most one endpoint holds a slot
/// at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoleSlot {
    Vacant,
    Connected(EndpointId),
    Disconnected,
}

impl RoleSlot {
    fn is_connected(self) -> bool {
        matches!(self, RoleSlot::Connected(_))
    }

    fn holds(self, endpoint: EndpointId) -> bool {
        self == RoleSlot::Connected(endpoint)
    }
}

/// Outcome of binding an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub role: ViewerRole,
    pub snapshot: SetupSnapshot,
    pub events: Vec<SessionEvent>,
}

#[derive(Debug)]
pub struct GameSession {
    board: Board,
    qty_to_win: u8,
    game_type: GameType,
    signs: SignsMap,
    start_player_handle: PlayerHandle,
    turn: PlayerHandle,
    phase: Phase,
    host: RoleSlot,
    opponent: RoleSlot,
    /// Set when the host departs: the opponent slot is closed to new
    /// endpoints for good (a reclaiming host can reopen it).
    unjoinable: bool,
}

impl GameSession {
    /// Validates `config` and builds a fresh session awaiting its
    /// players. Roles bind through `attach`.
    pub fn create(config: GameConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self {
            board: Board::new(config.field_width, config.field_height),
            qty_to_win: config.qty_to_win,
            game_type: config.game_type,
            signs: SignsMap::from_host_char(config.host_char),
            start_player_handle: config.start_player_handle,
            turn: config.start_player_handle,
            phase: Phase::AwaitingOpponent,
            host: RoleSlot::Vacant,
            opponent: RoleSlot::Vacant,
            unjoinable: false,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> PlayerHandle {
        self.turn
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mover handle bound to `endpoint`, if any.
    pub fn role_of(&self, endpoint: EndpointId) -> Option<PlayerHandle> {
        if self.host.holds(endpoint) {
            Some(PlayerHandle::Host)
        } else if self.opponent.holds(endpoint) {
            Some(PlayerHandle::Opponent)
        } else {
            None
        }
    }

    /// Bind a connecting socket endpoint.
    ///
    /// Policy: the creator binds `host`; the first subsequent endpoint
    /// binds `opponent` (session becomes active); everyone later is a
    /// spectator. A `rejoin_as` hint re-binds a disconnected slot when
    /// `allow_reclaim` is set. Slots owned by built-in movers (per the
    /// game type) are never handed to sockets.
    pub fn attach(
        &mut self,
        endpoint: EndpointId,
        rejoin_as: Option<PlayerHandle>,
        allow_reclaim: bool,
        connection_game_id: Option<String>,
    ) -> Attachment {
        let bound = self.bind(endpoint, rejoin_as, allow_reclaim);
        self.attachment(bound, connection_game_id)
    }

    /// Bind a built-in mover to the slot its game type owns. The slot
    /// must still be vacant; anything else attaches as a spectator.
    pub fn attach_automaton(
        &mut self,
        endpoint: EndpointId,
        player_handle: PlayerHandle,
    ) -> Attachment {
        let slot = match player_handle {
            PlayerHandle::Host => &mut self.host,
            PlayerHandle::Opponent => &mut self.opponent,
        };
        let bound = if *slot == RoleSlot::Vacant {
            *slot = RoleSlot::Connected(endpoint);
            self.sync_phase();
            Some(player_handle)
        } else {
            None
        };
        self.attachment(bound, None)
    }

    fn attachment(
        &mut self,
        bound: Option<PlayerHandle>,
        connection_game_id: Option<String>,
    ) -> Attachment {
        let role = bound.map_or(ViewerRole::Spectator, ViewerRole::from);
        let events = bound
            .map(|player_handle| vec![SessionEvent::PlayerJoined { player_handle }])
            .unwrap_or_default();

        Attachment {
            role,
            snapshot: self.snapshot(role, connection_game_id),
            events,
        }
    }

    /// Which mover slots sockets may occupy for this game type.
    fn socket_may_bind(&self, handle: PlayerHandle) -> bool {
        match (handle, self.game_type) {
            (PlayerHandle::Host, GameType::VsHum | GameType::VsAi) => true,
            (PlayerHandle::Host, GameType::AiVsAi) => false,
            (PlayerHandle::Opponent, GameType::VsHum) => true,
            (PlayerHandle::Opponent, GameType::VsAi | GameType::AiVsAi) => false,
        }
    }

    fn bind(
        &mut self,
        endpoint: EndpointId,
        rejoin_as: Option<PlayerHandle>,
        allow_reclaim: bool,
    ) -> Option<PlayerHandle> {
        if allow_reclaim {
            match rejoin_as {
                Some(PlayerHandle::Host)
                    if self.host == RoleSlot::Disconnected
                        && self.socket_may_bind(PlayerHandle::Host) =>
                {
                    self.host = RoleSlot::Connected(endpoint);
                    self.unjoinable = false;
                    self.sync_phase();
                    return Some(PlayerHandle::Host);
                }
                Some(PlayerHandle::Opponent)
                    if self.opponent == RoleSlot::Disconnected
                        && self.socket_may_bind(PlayerHandle::Opponent) =>
                {
                    self.opponent = RoleSlot::Connected(endpoint);
                    self.sync_phase();
                    return Some(PlayerHandle::Opponent);
                }
                _ => {}
            }
        }

        if self.host == RoleSlot::Vacant && self.socket_may_bind(PlayerHandle::Host) {
            self.host = RoleSlot::Connected(endpoint);
            self.sync_phase();
            return Some(PlayerHandle::Host);
        }

        let opponent_open = !self.opponent.is_connected()
            && self.socket_may_bind(PlayerHandle::Opponent)
            && !self.unjoinable
            && !matches!(self.phase, Phase::Finished(_));
        if opponent_open {
            self.opponent = RoleSlot::Connected(endpoint);
            self.sync_phase();
            return Some(PlayerHandle::Opponent);
        }

        None
    }

    /// Validate and commit one move.
    pub fn apply_move(
        &mut self,
        player_handle: PlayerHandle,
        x: u8,
        y: u8,
    ) -> Result<Vec<SessionEvent>, DomainError> {
        if self.phase != Phase::Active {
            return Err(DomainError::GameNotActive);
        }
        if player_handle != self.turn {
            return Err(DomainError::NotYourTurn);
        }

        self.board.place(x, y, player_handle)?;

        let mut events = vec![SessionEvent::Move {
            player_handle,
            x,
            y,
        }];

        match self.board.check_result(x, y, self.qty_to_win) {
            MoveVerdict::Ongoing => {
                self.turn = player_handle.other();
            }
            MoveVerdict::Win(winner) => {
                self.phase = Phase::Finished(GameResult::Win(winner));
                events.push(SessionEvent::GameOver {
                    result_of_move: GameResult::Win(winner),
                });
            }
            MoveVerdict::Draw => {
                self.phase = Phase::Finished(GameResult::Draw);
                events.push(SessionEvent::GameOver {
                    result_of_move: GameResult::Draw,
                });
            }
        }

        Ok(events)
    }

    /// Vacate whatever role `endpoint` held. Board state survives the
    /// departure; only the binding goes stale.
    pub fn detach(&mut self, endpoint: EndpointId) -> Vec<SessionEvent> {
        let vacated = if self.host.holds(endpoint) {
            self.host = RoleSlot::Disconnected;
            self.unjoinable = true;
            Some(PlayerHandle::Host)
        } else if self.opponent.holds(endpoint) {
            self.opponent = RoleSlot::Disconnected;
            Some(PlayerHandle::Opponent)
        } else {
            None
        };

        self.sync_phase();

        vacated
            .map(|player_handle| vec![SessionEvent::PlayerLeft { player_handle }])
            .unwrap_or_default()
    }

    /// Re-derive the non-terminal phase from the opponent binding:
    /// active exactly when both movers are connected.
    fn sync_phase(&mut self) {
        if matches!(self.phase, Phase::Finished(_)) {
            return;
        }
        self.phase = if self.host.is_connected() && self.opponent.is_connected() {
            Phase::Active
        } else {
            Phase::AwaitingOpponent
        };
    }

    /// Full state snapshot for one viewer, reflecting exactly the
    /// committed board and turn.
    pub fn snapshot(&self, role: ViewerRole, connection_game_id: Option<String>) -> SetupSnapshot {
        SetupSnapshot {
            connection_game_id,
            player_handle: role,
            signs_map: self.signs,
            start_player_handle: self.start_player_handle,
            field_width: self.board.width(),
            field_height: self.board.height(),
            field: self.board.cells().to_vec(),
        }
    }

    /// Empty cells, for built-in movers choosing a move.
    pub fn open_cells(&self) -> Vec<(u8, u8)> {
        let mut open = Vec::new();
        for x in 0..self.board.width() {
            for y in 0..self.board.height() {
                if self.board.cell(x, y).is_none() {
                    open.push((x, y));
                }
            }
        }
        open
    }
}
