//! Line-oriented console front end.
//!
//! Reads one command per line, drives a `GameSession` and answers on the
//! output stream. When an engine side is configured, the suggester replies
//! automatically after each human move.

use std::io::{self, BufRead, Write};

use crate::engines::engine_random::RandomSuggester;
use crate::engines::engine_trait::MoveSuggester;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{CandidateMove, Color, PieceKind};
use crate::game_state::game_state::{Game, MoveApplied, MoveOutcome};
use crate::move_generation::perft::perft;
use crate::session::game_session::GameSession;
use crate::session::observer::LoggingObserver;
use crate::session::session_config::SessionConfig;
use crate::utils::algebraic::algebraic_to_square;
use crate::utils::render_game_state::render_game_state;

const HELP: &str = "commands: new | fen <fen> | board | legal <sq> | move <from> <to> [q|r|b|n] \
| san <move> | back | forward | pgn | suggest | engine <light|dark|off> \
| setoption name <name> value <value> | perft <depth> | resign | quit";

pub fn run_stdio_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut console = ConsoleState::new(SessionConfig::default(), Box::new(RandomSuggester::new()));

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = console.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

pub struct ConsoleState {
    session: GameSession,
    suggester: Box<dyn MoveSuggester>,
}

impl ConsoleState {
    pub fn new(config: SessionConfig, suggester: Box<dyn MoveSuggester>) -> Self {
        let mut session = GameSession::new(config);
        session.add_observer(Box::new(LoggingObserver));
        Self { session, suggester }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Handles one line; returns `true` when the loop should stop.
    pub fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        let response = match cmd {
            "quit" | "exit" => return Ok(true),
            "help" => Ok(vec![HELP.to_owned()]),
            "new" => self.handle_new(None),
            "fen" => Game::from_fen(&args.join(" ")).and_then(|game| self.handle_new(Some(game))),
            "board" => Ok(vec![render_game_state(self.session.game())]),
            "legal" => self.handle_legal(&args),
            "move" => self.handle_move(&args),
            "san" => self
                .session
                .apply_san(&args.join(" "))
                .and_then(|applied| self.after_human_move(&applied)),
            "back" => Ok(vec![match self.session.move_back() {
                Some(nav) => format!("undid {}", nav.record.san),
                None => "at the starting position".to_owned(),
            }]),
            "forward" => Ok(vec![match self.session.move_forward() {
                Some(nav) => format!("redid {}", nav.record.san),
                None => "at the latest move".to_owned(),
            }]),
            "pgn" => Ok(vec![self.session.export_pgn()]),
            "suggest" => self.play_engine_move(),
            "engine" => self.handle_engine(&args),
            "setoption" => self.handle_setoption(&args),
            "perft" => self.handle_perft(&args),
            "resign" => self
                .session
                .resign()
                .map(|()| vec![format!("result {}", self.session.result())]),
            _ => Err(ChessError::InvalidNotation(format!("unknown command '{cmd}'"))),
        };

        match response {
            Ok(lines) => {
                for line in lines {
                    writeln!(out, "{}", line.trim_end())?;
                }
            }
            Err(err) => writeln!(out, "error: {err}")?,
        }
        Ok(false)
    }

    fn handle_new(&mut self, game: Option<Game>) -> ChessResult<Vec<String>> {
        match game {
            Some(game) => self.session.restart_with(game),
            None => self.session.restart(),
        }
        self.suggester.new_game();
        let mut lines = vec![
            format!("game {}", self.session.context().game_number),
            render_game_state(self.session.game()),
        ];
        lines.extend(self.engine_turn()?);
        Ok(lines)
    }

    fn handle_legal(&mut self, args: &[&str]) -> ChessResult<Vec<String>> {
        let square = algebraic_to_square(args.first().copied().unwrap_or_default())?;
        let targets: Vec<String> = self
            .session
            .legal_moves(square)
            .iter()
            .map(describe_target)
            .collect();
        Ok(vec![targets.join(" ")])
    }

    fn handle_move(&mut self, args: &[&str]) -> ChessResult<Vec<String>> {
        let (from, to) = match args {
            [from, to, ..] => (algebraic_to_square(from)?, algebraic_to_square(to)?),
            _ => {
                return Err(ChessError::InvalidNotation(
                    "usage: move <from> <to> [q|r|b|n]".to_owned(),
                ))
            }
        };
        let promotion = match args.get(2) {
            Some(letter) => Some(parse_promotion_letter(letter)?),
            None => None,
        };

        let applied = match self.session.try_move(from, to)? {
            MoveOutcome::Applied(applied) => applied,
            MoveOutcome::PromotionPending { .. } => self
                .session
                .complete_promotion(promotion.unwrap_or(PieceKind::Queen))?,
        };
        self.after_human_move(&applied)
    }

    fn handle_engine(&mut self, args: &[&str]) -> ChessResult<Vec<String>> {
        let color = match args.first().copied() {
            Some("light" | "white") => Some(Color::Light),
            Some("dark" | "black") => Some(Color::Dark),
            Some("off") => None,
            _ => {
                return Err(ChessError::InvalidNotation(
                    "usage: engine <light|dark|off>".to_owned(),
                ))
            }
        };
        self.session.set_engine_color(color);
        self.engine_turn()
    }

    fn handle_setoption(&mut self, args: &[&str]) -> ChessResult<Vec<String>> {
        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";

        for tok in args {
            match *tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(*tok),
                _ if mode == "value" => value_tokens.push(*tok),
                _ => {}
            }
        }

        if name_tokens.is_empty() {
            return Err(ChessError::InvalidNotation(
                "usage: setoption name <name> value <value>".to_owned(),
            ));
        }
        self.session
            .set_option(&name_tokens.join(" "), &value_tokens.join(" "));
        Ok(Vec::new())
    }

    fn handle_perft(&mut self, args: &[&str]) -> ChessResult<Vec<String>> {
        let depth = args
            .first()
            .and_then(|d| d.parse::<u8>().ok())
            .ok_or_else(|| ChessError::InvalidNotation("usage: perft <depth>".to_owned()))?;
        let counts = perft(self.session.game(), depth)?;
        Ok(vec![format!("nodes {}", counts.nodes)])
    }

    fn after_human_move(&mut self, applied: &MoveApplied) -> ChessResult<Vec<String>> {
        let mut lines = describe_move("played", applied);
        lines.extend(self.engine_turn()?);
        Ok(lines)
    }

    fn play_engine_move(&mut self) -> ChessResult<Vec<String>> {
        let applied = self.session.play_suggestion(self.suggester.as_mut())?;
        Ok(describe_move("engine plays", &applied))
    }

    /// Lets the configured engine side reply.
    fn engine_turn(&mut self) -> ChessResult<Vec<String>> {
        if self.session.engine_to_move() {
            self.play_engine_move()
        } else {
            Ok(Vec::new())
        }
    }
}

fn parse_promotion_letter(letter: &str) -> ChessResult<PieceKind> {
    match letter.to_ascii_lowercase().as_str() {
        "q" => Ok(PieceKind::Queen),
        "r" => Ok(PieceKind::Rook),
        "b" => Ok(PieceKind::Bishop),
        "n" => Ok(PieceKind::Knight),
        _ => Err(ChessError::InvalidSpecialState(format!(
            "cannot promote to '{letter}'"
        ))),
    }
}

fn describe_target(candidate: &CandidateMove) -> String {
    if candidate.is_capture() {
        format!("x{}", candidate.to)
    } else {
        candidate.to.to_string()
    }
}

fn describe_move(prefix: &str, applied: &MoveApplied) -> Vec<String> {
    let mut lines = vec![format!("{prefix} {}", applied.record.san)];
    if applied.status.is_game_over() {
        lines.push(format!("result {}", applied.status.result_token()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(console: &mut ConsoleState, commands: &[&str]) -> String {
        let mut out = Vec::<u8>::new();
        for command in commands {
            let quit = console
                .handle_command(command, &mut out)
                .expect("writing to a Vec should not fail");
            if quit {
                break;
            }
        }
        String::from_utf8(out).expect("console output should be UTF-8")
    }

    fn console() -> ConsoleState {
        ConsoleState::new(SessionConfig::default(), Box::new(RandomSuggester::with_seed(5)))
    }

    #[test]
    fn moves_and_navigation() {
        let mut console = console();
        let text = run(&mut console, &["move e2 e4", "san e5", "back", "forward", "legal g1"]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[..4], ["played e4", "played e5", "undid e5", "redid e5"]);
        let mut targets: Vec<&str> = lines[4].split(' ').collect();
        targets.sort_unstable();
        assert_eq!(targets, ["e2", "f3", "h3"]);
    }

    #[test]
    fn errors_are_reported_not_fatal() {
        let mut console = console();
        let text = run(&mut console, &["move e2 e5", "frobnicate", "move e2 e4"]);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("error: "));
        assert!(lines[1].starts_with("error: "));
        assert_eq!(lines[2], "played e4");
    }

    #[test]
    fn engine_side_replies_automatically() {
        let mut console = console();
        let text = run(&mut console, &["engine dark", "move d2 d4"]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "played d4");
        assert!(lines[1].starts_with("engine plays "));
        assert_eq!(console.session().game().cursor(), 1);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut console = console();
        let mut out = Vec::<u8>::new();
        assert!(console
            .handle_command("quit", &mut out)
            .expect("writing to a Vec should not fail"));
        assert!(out.is_empty());
    }
}
