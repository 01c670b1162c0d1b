//! One sitting at the board: the current game, its observers and the
//! engine boundary.
//!
//! The session serialises suggestion requests. While one is outstanding the
//! human side cannot move; a reply is only accepted if its tag still matches
//! the game number and cursor, so navigating away or restarting turns any
//! late reply into a `StaleReply`.

use std::collections::VecDeque;

use log::{info, warn};

use crate::engines::engine_trait::{MoveSuggester, RequestTag, SuggestionReply, SuggestionRequest};
use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{CandidateMove, Color, GameStatus, PieceKind, Square};
use crate::game_state::game_state::{Game, MoveApplied, MoveOutcome, Navigation};
use crate::session::observer::GameObserver;
use crate::session::session_config::{SessionConfig, SessionContext};
use crate::utils::pgn::{default_headers, write_pgn_with_headers};
use crate::utils::san::{apply_san, san_stream};

/// Messages queued for the external engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Suggest(SuggestionRequest),
    GameOver { tag: RequestTag, result: String },
}

pub struct GameSession {
    game: Game,
    config: SessionConfig,
    context: SessionContext,
    observers: Vec<Box<dyn GameObserver>>,
    pending: Option<RequestTag>,
    outbox: VecDeque<OutboundMessage>,
    /// Side that resigned the current game.
    resigned: Option<Color>,
    result_reported: bool,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_game(Game::new(), config)
    }

    /// A session whose first game starts from `game`.
    pub fn with_game(game: Game, config: SessionConfig) -> Self {
        Self {
            game,
            config,
            context: SessionContext::default(),
            observers: Vec::new(),
            pending: None,
            outbox: VecDeque::new(),
            resigned: None,
            result_reported: false,
        }
    }

    #[inline]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Hands a side to the suggester, or takes it back with `None`.
    pub fn set_engine_color(&mut self, color: Option<Color>) {
        self.config.engine_color = color;
    }

    /// Updates an engine option carried on later requests.
    pub fn set_option(&mut self, name: &str, value: &str) {
        self.config.options.set(name, value);
    }

    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    /// Tag describing the displayed position.
    pub fn current_tag(&self) -> RequestTag {
        RequestTag {
            game: self.context.game_number,
            ply: self.game.cursor(),
        }
    }

    pub fn pending_request(&self) -> Option<RequestTag> {
        self.pending
    }

    /// True when the configured engine side is to move in a live game.
    pub fn engine_to_move(&self) -> bool {
        self.config.engine_color == Some(self.game.side_to_move()) && !self.is_over()
    }

    pub fn is_over(&self) -> bool {
        self.resigned.is_some() || self.game.is_over()
    }

    /// Result token, counting a resignation.
    pub fn result(&self) -> &'static str {
        match self.resigned {
            Some(Color::Light) => "0-1",
            Some(Color::Dark) => "1-0",
            None => self.game.status().result_token(),
        }
    }

    pub fn legal_moves(&mut self, square: Square) -> Vec<CandidateMove> {
        self.game.legal_moves(square)
    }

    pub fn try_move(&mut self, from: Square, to: Square) -> ChessResult<MoveOutcome> {
        self.ensure_human_can_move()?;
        let outcome = self.game.try_move(from, to)?;
        if let MoveOutcome::Applied(applied) = &outcome {
            self.after_ply(applied);
        }
        Ok(outcome)
    }

    pub fn complete_promotion(&mut self, kind: PieceKind) -> ChessResult<MoveApplied> {
        self.ensure_human_can_move()?;
        let applied = self.game.complete_promotion(kind)?;
        self.after_ply(&applied);
        Ok(applied)
    }

    pub fn try_move_with_promotion(
        &mut self,
        from: Square,
        to: Square,
        kind: PieceKind,
    ) -> ChessResult<MoveApplied> {
        self.ensure_human_can_move()?;
        let applied = self.game.try_move_with_promotion(from, to, kind)?;
        self.after_ply(&applied);
        Ok(applied)
    }

    /// Plays a human move given in SAN.
    pub fn apply_san(&mut self, text: &str) -> ChessResult<MoveApplied> {
        self.ensure_human_can_move()?;
        let applied = apply_san(&mut self.game, text)?;
        self.after_ply(&applied);
        Ok(applied)
    }

    fn ensure_human_can_move(&self) -> ChessResult<()> {
        if self.pending.is_some() {
            return Err(ChessError::AwaitingEngine);
        }
        if self.resigned.is_some() {
            return Err(ChessError::GameOver);
        }
        Ok(())
    }

    /// Navigation stays available while a request is pending; the request's
    /// tag simply stops matching.
    pub fn move_back(&mut self) -> Option<Navigation> {
        let navigation = self.game.move_back()?;
        self.notify_navigation(&navigation);
        Some(navigation)
    }

    pub fn move_forward(&mut self) -> Option<Navigation> {
        let navigation = self.game.move_forward()?;
        self.notify_navigation(&navigation);
        Some(navigation)
    }

    fn notify_navigation(&mut self, navigation: &Navigation) {
        for observer in &mut self.observers {
            observer.on_navigation(navigation);
            observer.on_squares_changed(&navigation.changed_squares);
        }
    }

    /// Issues a suggestion request for the displayed position.
    pub fn request_suggestion(&mut self) -> ChessResult<SuggestionRequest> {
        if self.is_over() {
            return Err(ChessError::GameOver);
        }
        if self.pending.is_some() {
            return Err(ChessError::AwaitingEngine);
        }
        if !self.game.history().is_at_tail() {
            return Err(ChessError::HistoryNotAtTail);
        }

        let request = SuggestionRequest {
            tag: self.current_tag(),
            start_fen: self.game.setup_fen().map(str::to_owned),
            moves: san_stream(&self.game),
            options: self.config.options.clone(),
        };
        info!(
            "suggestion requested for game {} ply {}",
            request.tag.game, request.tag.ply
        );
        self.pending = Some(request.tag);
        self.outbox.push_back(OutboundMessage::Suggest(request.clone()));
        Ok(request)
    }

    /// Plays the suggested move if the reply still matches the position.
    pub fn accept_reply(&mut self, reply: &SuggestionReply) -> ChessResult<MoveApplied> {
        let pending = self.pending.ok_or(ChessError::NoPendingRequest)?;
        if reply.tag != pending {
            warn!("dropping reply for {:?}, waiting on {:?}", reply.tag, pending);
            return Err(ChessError::StaleReply);
        }
        self.pending = None;
        if pending != self.current_tag() {
            warn!("dropping reply for {:?}, position is now {:?}", pending, self.current_tag());
            return Err(ChessError::StaleReply);
        }

        info!("engine replied {} ({} metric lines)", reply.san, reply.metrics.len());
        let applied = apply_san(&mut self.game, &reply.san)?;
        self.after_ply(&applied);
        Ok(applied)
    }

    pub fn abandon_request(&mut self) -> Option<RequestTag> {
        let abandoned = self.pending.take();
        if let Some(tag) = abandoned {
            info!("abandoned request {tag:?}");
        }
        abandoned
    }

    /// Request, suggest and accept in one step with an in-process suggester.
    pub fn play_suggestion(&mut self, suggester: &mut dyn MoveSuggester) -> ChessResult<MoveApplied> {
        let request = self.request_suggestion()?;
        match suggester.suggest(&request) {
            Ok(reply) => self.accept_reply(&reply),
            Err(err) => {
                self.abandon_request();
                Err(err)
            }
        }
    }

    /// The side to move resigns.
    pub fn resign(&mut self) -> ChessResult<()> {
        if self.is_over() {
            return Err(ChessError::GameOver);
        }
        let loser = self.game.side_to_move();
        info!("{loser} resigns");
        self.pending = None;
        self.resigned = Some(loser);
        self.report_result(Some(loser.opposite()), self.game.status());
        Ok(())
    }

    /// Starts the next game of the session.
    pub fn restart(&mut self) {
        self.restart_with(Game::new());
    }

    /// Starts the next game of the session from `game`.
    pub fn restart_with(&mut self, game: Game) {
        self.game = game;
        self.context.game_number += 1;
        self.pending = None;
        self.resigned = None;
        self.result_reported = false;
        info!("starting game {}", self.context.game_number);
    }

    /// PGN of the displayed game with session headers.
    pub fn export_pgn(&self) -> String {
        let headers = default_headers(&self.game, &self.context, &self.config, self.result());
        write_pgn_with_headers(&self.game, &headers)
    }

    /// Takes every queued outbound message.
    pub fn drain_outbox(&mut self) -> Vec<OutboundMessage> {
        self.outbox.drain(..).collect()
    }

    fn after_ply(&mut self, applied: &MoveApplied) {
        for observer in &mut self.observers {
            observer.on_move(applied);
            observer.on_squares_changed(&applied.changed_squares);
        }
        match applied.status {
            GameStatus::Checkmate { winner } => self.report_result(Some(winner), applied.status),
            GameStatus::Stalemate => self.report_result(None, applied.status),
            GameStatus::Ongoing | GameStatus::Check => {}
        }
    }

    fn report_result(&mut self, winner: Option<Color>, status: GameStatus) {
        if self.result_reported {
            return;
        }
        self.result_reported = true;
        self.context.games_completed += 1;
        self.context.last_winner = winner;

        let result = self.result();
        info!("game {} finished {result}", self.context.game_number);
        self.outbox.push_back(OutboundMessage::GameOver {
            tag: self.current_tag(),
            result: result.to_owned(),
        });
        for observer in &mut self.observers {
            observer.on_game_over(status, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::engines::engine_random::RandomSuggester;
    use crate::utils::algebraic::algebraic_to_square;

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl GameObserver for Recorder {
        fn on_move(&mut self, applied: &MoveApplied) {
            self.events.borrow_mut().push(format!("move {}", applied.record.san));
        }

        fn on_navigation(&mut self, navigation: &Navigation) {
            self.events
                .borrow_mut()
                .push(format!("{:?} {}", navigation.direction, navigation.record.san));
        }

        fn on_squares_changed(&mut self, squares: &[Square]) {
            self.events.borrow_mut().push(format!("redraw {}", squares.len()));
        }

        fn on_game_over(&mut self, _status: GameStatus, result: &str) {
            self.events.borrow_mut().push(format!("over {result}"));
        }
    }

    fn sq(text: &str) -> Square {
        algebraic_to_square(text).expect("test square should parse")
    }

    #[test]
    fn human_moves_wait_for_the_engine() {
        let mut session = GameSession::default();
        session.apply_san("e4").expect("e4 is legal");
        let request = session.request_suggestion().expect("request should issue");
        assert_eq!(request.moves, "e4");
        assert_eq!(request.tag, RequestTag { game: 1, ply: 0 });

        assert_eq!(
            session.try_move(sq("e7"), sq("e5")),
            Err(ChessError::AwaitingEngine)
        );
        assert_eq!(session.request_suggestion(), Err(ChessError::AwaitingEngine));

        let reply = SuggestionReply {
            tag: request.tag,
            san: "e5".to_owned(),
            metrics: Vec::new(),
        };
        let applied = session.accept_reply(&reply).expect("reply is current");
        assert_eq!(applied.record.san, "e5");
        assert_eq!(session.pending_request(), None);
        assert!(matches!(
            session.drain_outbox().as_slice(),
            [OutboundMessage::Suggest(_)]
        ));
    }

    #[test]
    fn reply_after_navigation_is_stale() {
        let mut session = GameSession::default();
        session.apply_san("e4").expect("e4 is legal");
        let request = session.request_suggestion().expect("request should issue");
        session.move_back().expect("one ply to undo");

        let reply = SuggestionReply {
            tag: request.tag,
            san: "e5".to_owned(),
            metrics: Vec::new(),
        };
        assert_eq!(session.accept_reply(&reply), Err(ChessError::StaleReply));
        assert_eq!(session.game().cursor(), -1);
        assert_eq!(session.accept_reply(&reply), Err(ChessError::NoPendingRequest));
    }

    #[test]
    fn resignation_and_restart_update_the_context() {
        let mut session = GameSession::default();
        session.apply_san("e4").expect("e4 is legal");
        session.resign().expect("dark may resign");
        assert_eq!(session.result(), "1-0");
        assert_eq!(session.context().last_winner, Some(Color::Light));
        assert_eq!(session.apply_san("e5"), Err(ChessError::GameOver));
        assert!(session.export_pgn().contains("1. e4 1-0"));

        session.restart();
        assert_eq!(session.context().game_number, 2);
        assert_eq!(session.context().games_completed, 1);
        assert!(!session.is_over());
        assert!(session.export_pgn().contains("[Round \"2\"]"));
    }

    #[test]
    fn checkmate_queues_game_over_once() {
        let mut session = GameSession::default();
        for san in ["f3", "e5", "g4", "Qh4#"] {
            session.apply_san(san).expect("move should be legal");
        }
        let messages = session.drain_outbox();
        assert_eq!(
            messages,
            vec![OutboundMessage::GameOver {
                tag: RequestTag { game: 1, ply: 3 },
                result: "0-1".to_owned()
            }]
        );
        assert_eq!(session.context().last_winner, Some(Color::Dark));
        assert_eq!(session.request_suggestion(), Err(ChessError::GameOver));
    }

    #[test]
    fn in_process_suggester_plays_for_the_engine_side() {
        let config = SessionConfig {
            engine_color: Some(Color::Dark),
            ..SessionConfig::default()
        };
        let mut session = GameSession::new(config);
        let mut suggester = RandomSuggester::with_seed(3);
        session.apply_san("d4").expect("d4 is legal");
        assert!(session.engine_to_move());
        let applied = session
            .play_suggestion(&mut suggester)
            .expect("random suggester should find a move");
        assert_eq!(applied.record.color, Color::Dark);
        assert!(!session.engine_to_move());
    }

    #[test]
    fn observers_see_moves_navigation_and_the_result() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut session = GameSession::default();
        session.add_observer(Box::new(Recorder {
            events: Rc::clone(&events),
        }));

        session.apply_san("f3").expect("f3 is legal");
        session.move_back().expect("one ply to undo");
        session.move_forward().expect("one ply to redo");
        for san in ["e5", "g4", "Qh4#"] {
            session.apply_san(san).expect("move should be legal");
        }

        let events = events.borrow();
        assert_eq!(
            events[..6],
            ["move f3", "redraw 2", "Back f3", "redraw 2", "Forward f3", "redraw 2"]
        );
        assert_eq!(events.last().map(String::as_str), Some("over 0-1"));
        assert_eq!(events.iter().filter(|e| e.starts_with("over")).count(), 1);
    }

    #[test]
    fn options_reach_the_request_verbatim() {
        let mut session = GameSession::default();
        session.set_option("Skill Level", "casual");
        session.set_option("UCI_Elo", "1500");
        let request = session.request_suggestion().expect("request should issue");
        assert_eq!(request.options.skill_level.as_deref(), Some("casual"));
        assert_eq!(
            request.options.extra.get("UCI_Elo").map(String::as_str),
            Some("1500")
        );
    }
}
