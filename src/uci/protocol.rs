use std::io::{self, BufRead, Write};

use crate::board::position::{Board, Color};
use crate::eval::evaluate::CHECKMATE;
use crate::search::alphabeta::{Engine, SearchResult};
use crate::search::transposition::MATE_THRESHOLD;

/// Text-protocol front end. Reads UCI commands from stdin and drives the
/// engine synchronously; `go` blocks until the search finishes.
pub struct UciSession {
    board: Board,
    engine: Engine,
}

impl UciSession {
    pub fn new() -> Self {
        Self {
            board: Board::startpos(),
            engine: Engine::new(),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            if !self.handle_command(line.trim()) {
                break;
            }
        }
        Ok(())
    }

    /// Returns false when the session should end.
    pub fn handle_command(&mut self, line: &str) -> bool {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("uci") => {
                println!("id name corvid");
                println!("id author corvid developers");
                println!("option name Hash type spin default 64 min 1 max 4096");
                println!("uciok");
            }
            Some("isready") => println!("readyok"),
            Some("ucinewgame") => {
                self.board.reset();
                self.engine.clear_cache();
            }
            Some("setoption") => self.handle_setoption(line),
            Some("position") => self.handle_position(tokens.collect::<Vec<_>>()),
            Some("go") => self.handle_go(tokens.collect::<Vec<_>>()),
            Some("d") => println!("{}\nfen: {}", self.board, self.board.to_fen()),
            Some("perft") => {
                let depth = tokens.next().and_then(|v| v.parse().ok()).unwrap_or(4);
                self.handle_perft(depth);
            }
            Some("eval") => {
                println!("eval: {} cp", self.engine.evaluate(&mut self.board));
            }
            Some("stop") => self.engine.stop_search(),
            Some("quit") => return false,
            _ => {}
        }
        let _ = io::stdout().flush();
        true
    }

    fn handle_setoption(&mut self, line: &str) {
        // "setoption name Hash value <mb>"
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if let (Some(name_at), Some(value_at)) = (
            tokens.iter().position(|&t| t == "name"),
            tokens.iter().position(|&t| t == "value"),
        ) {
            if name_at + 1 > value_at {
                return;
            }
            let name = tokens[name_at + 1..value_at].join(" ");
            if name.eq_ignore_ascii_case("hash") {
                if let Some(mb) = tokens.get(value_at + 1).and_then(|v| v.parse().ok()) {
                    self.engine.set_tt_size(mb);
                }
            }
        }
    }

    fn handle_perft(&mut self, depth: u32) {
        let start = std::time::Instant::now();
        let mut total = 0;
        for (mv, nodes) in crate::movegen::perft::perft_divide(&mut self.board, depth) {
            println!("{mv}: {nodes}");
            total += nodes;
        }
        let elapsed = start.elapsed().as_millis().max(1) as u64;
        println!(
            "\nnodes {} time {} nps {}",
            total,
            elapsed,
            total * 1000 / elapsed
        );
    }

    fn handle_position(&mut self, tokens: Vec<&str>) {
        let mut index = 0;
        match tokens.first() {
            Some(&"startpos") => {
                self.board.reset();
                index = 1;
            }
            Some(&"fen") => {
                let fen_end = tokens
                    .iter()
                    .position(|&t| t == "moves")
                    .unwrap_or(tokens.len());
                let fen = tokens[1..fen_end].join(" ");
                if let Err(err) = self.board.load_fen(&fen) {
                    println!("info string {err}");
                    return;
                }
                index = fen_end;
            }
            _ => return,
        }

        if tokens.get(index) == Some(&"moves") {
            for text in &tokens[index + 1..] {
                match self.board.parse_uci_move(text) {
                    Ok(mv) => {
                        if self.board.make_move(mv).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        println!("info string {err}");
                        break;
                    }
                }
            }
        }
    }

    fn handle_go(&mut self, tokens: Vec<&str>) {
        let mut depth: Option<i32> = None;
        let mut movetime: Option<u64> = None;
        let mut wtime: Option<u64> = None;
        let mut btime: Option<u64> = None;
        let mut winc: Option<u64> = None;
        let mut binc: Option<u64> = None;
        let mut infinite = false;

        let mut iter = tokens.iter();
        while let Some(&token) = iter.next() {
            match token {
                "depth" => depth = iter.next().and_then(|v| v.parse().ok()),
                "movetime" => movetime = iter.next().and_then(|v| v.parse().ok()),
                "wtime" => wtime = iter.next().and_then(|v| v.parse().ok()),
                "btime" => btime = iter.next().and_then(|v| v.parse().ok()),
                "winc" => winc = iter.next().and_then(|v| v.parse().ok()),
                "binc" => binc = iter.next().and_then(|v| v.parse().ok()),
                "infinite" => infinite = true,
                _ => {}
            }
        }

        self.engine.set_progress_callback(Box::new(print_info));

        let result = if infinite || (depth.is_some() && movetime.is_none() && wtime.is_none()) {
            let max_depth = depth.unwrap_or(self.engine.config().max_depth);
            self.engine.find_best_move_depth(&mut self.board, max_depth)
        } else {
            let budget = movetime.unwrap_or_else(|| {
                let (time, inc) = match self.board.side_to_move() {
                    Color::White => (wtime, winc),
                    Color::Black => (btime, binc),
                };
                match time {
                    // Simple allocation: a thirtieth of the clock plus
                    // most of the increment.
                    Some(remaining) => (remaining / 30 + inc.unwrap_or(0) / 2).max(10),
                    None => self.engine.config().time_limit_ms,
                }
            });
            match depth {
                Some(max_depth) => {
                    self.engine
                        .find_best_move_with_limits(&mut self.board, max_depth, budget)
                }
                None => self.engine.find_best_move(&mut self.board, budget),
            }
        };

        let best = if result.best_move.is_null() {
            "0000".to_string()
        } else {
            result.best_move.to_uci()
        };
        println!("bestmove {best}");
    }
}

impl Default for UciSession {
    fn default() -> Self {
        Self::new()
    }
}

fn print_info(result: &SearchResult) {
    let score = if result.score.abs() > MATE_THRESHOLD {
        let plies = CHECKMATE - result.score.abs();
        let mate_in = (plies + 1) / 2;
        format!(
            "mate {}",
            if result.score > 0 { mate_in } else { -mate_in }
        )
    } else {
        format!("cp {}", result.score)
    };

    let nps = if result.time_ms > 0 {
        result.nodes_searched * 1000 / result.time_ms
    } else {
        0
    };

    let pv: Vec<String> = result.pv.iter().map(|mv| mv.to_uci()).collect();

    println!(
        "info depth {} score {} nodes {} nps {} time {} pv {}",
        result.depth,
        score,
        result.nodes_searched,
        nps,
        result.time_ms,
        pv.join(" ")
    );
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_startpos_with_moves() {
        let mut session = UciSession::new();
        session.handle_command("position startpos moves e2e4 e7e5 g1f3");
        assert_eq!(
            session.board.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
    }

    #[test]
    fn test_position_fen() {
        let mut session = UciSession::new();
        session.handle_command(
            "position fen rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1 moves d7d5",
        );
        assert_eq!(session.board.side_to_move(), Color::White);
        assert_eq!(session.board.fullmove_number(), 2);
    }

    #[test]
    fn test_bad_fen_keeps_previous_position() {
        let mut session = UciSession::new();
        session.handle_command("position startpos moves e2e4");
        let fen = session.board.to_fen();
        session.handle_command("position fen not a real fen");
        assert_eq!(session.board.to_fen(), fen);
    }

    #[test]
    fn test_ucinewgame_resets() {
        let mut session = UciSession::new();
        session.handle_command("position startpos moves e2e4");
        session.handle_command("ucinewgame");
        assert_eq!(
            session.board.to_fen(),
            crate::board::position::STARTING_FEN
        );
    }

    #[test]
    fn test_quit_ends_session() {
        let mut session = UciSession::new();
        assert!(session.handle_command("isready"));
        assert!(!session.handle_command("quit"));
    }
}
