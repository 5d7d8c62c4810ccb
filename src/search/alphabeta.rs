use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::board::position::{Board, Move, MoveList, PieceType};
use crate::eval::evaluate::{evaluate, evaluate_static, Score, CHECKMATE, DRAW_SCORE};
use crate::eval::material::piece_value;
use crate::search::time_management::TimeManager;
use crate::search::transposition::{score_from_tt, score_to_tt, Bound, TranspositionTable};

pub const MAX_PLY: i32 = 64;
const INFINITY: Score = 33_000;

const TT_MOVE_SCORE: i32 = 1_000_000;
const CAPTURE_SCORE: i32 = 500_000;
const KILLER_SCORE: i32 = 90_000;

struct KillerMoves {
    killers: [[Move; 2]; MAX_PLY as usize],
}

impl KillerMoves {
    fn new() -> Self {
        Self {
            killers: [[Move::NULL; 2]; MAX_PLY as usize],
        }
    }

    fn store(&mut self, ply: i32, mv: Move) {
        let ply = ply as usize;
        if ply < MAX_PLY as usize && self.killers[ply][0] != mv {
            self.killers[ply][1] = self.killers[ply][0];
            self.killers[ply][0] = mv;
        }
    }

    fn is_killer(&self, ply: i32, mv: Move) -> bool {
        let ply = ply as usize;
        ply < MAX_PLY as usize && (self.killers[ply][0] == mv || self.killers[ply][1] == mv)
    }

    fn clear(&mut self) {
        self.killers = [[Move::NULL; 2]; MAX_PLY as usize];
    }
}

struct HistoryTable {
    scores: [[i32; 64]; 64],
}

impl HistoryTable {
    fn new() -> Self {
        Self {
            scores: [[0; 64]; 64],
        }
    }

    fn store(&mut self, mv: Move, depth: i32) {
        self.scores[mv.from() as usize][mv.to() as usize] += depth * depth;
    }

    fn get(&self, mv: Move) -> i32 {
        self.scores[mv.from() as usize][mv.to() as usize]
    }

    fn clear(&mut self) {
        self.scores = [[0; 64]; 64];
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub time_limit_ms: u64,
    pub max_depth: i32,
    pub tt_size_mb: usize,
    pub use_transposition_table: bool,
    pub use_quiescence: bool,
    pub use_move_ordering: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 5_000,
            max_depth: 20,
            tt_size_mb: 64,
            use_transposition_table: true,
            use_quiescence: true,
            use_move_ordering: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: Score,
    pub depth: i32,
    pub nodes_searched: u64,
    pub time_ms: u64,
    pub pv: Vec<Move>,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub best_move: Move,
    pub pv: Vec<Move>,
    pub score: Score,
    pub depth: i32,
    pub move_scores: Vec<(Move, Score)>,
}

pub type ProgressCallback = Box<dyn FnMut(&SearchResult)>;

pub struct Engine {
    config: SearchConfig,
    tt: TranspositionTable,
    killers: KillerMoves,
    history: HistoryTable,
    stop_flag: Arc<AtomicBool>,
    nodes: u64,
    root_best: Move,
    on_iteration: Option<ProgressCallback>,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        let tt = TranspositionTable::new(config.tt_size_mb);
        Self {
            config,
            tt,
            killers: KillerMoves::new(),
            history: HistoryTable::new(),
            stop_flag: Arc::new(AtomicBool::new(false)),
            nodes: 0,
            root_best: Move::NULL,
            on_iteration: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        if config.tt_size_mb != self.config.tt_size_mb {
            self.tt.resize(config.tt_size_mb);
        }
        self.config = config;
    }

    pub fn set_tt_size(&mut self, size_mb: usize) {
        self.config.tt_size_mb = size_mb;
        self.tt.resize(size_mb);
    }

    /// Drop all cached search state: hash table, killers, history.
    pub fn clear_cache(&mut self) {
        self.tt.clear();
        self.killers.clear();
        self.history.clear();
    }

    /// Request cooperative cancellation; the search polls this flag at
    /// every node and unwinds promptly.
    pub fn stop_search(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Shared handle to the stop flag, usable from a progress callback or
    /// another owner of the clone.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_flag)
    }

    /// Invoked after every completed deepening iteration.
    pub fn set_progress_callback(&mut self, callback: ProgressCallback) {
        self.on_iteration = Some(callback);
    }

    pub fn evaluate(&self, board: &mut Board) -> Score {
        evaluate(board)
    }

    /// Iterative deepening until the time budget runs out; depth is capped
    /// by the configured maximum.
    pub fn find_best_move(&mut self, board: &mut Board, time_limit_ms: u64) -> SearchResult {
        self.search(board, self.config.max_depth, Some(time_limit_ms))
    }

    /// Iterative deepening to a fixed depth with no clock.
    pub fn find_best_move_depth(&mut self, board: &mut Board, max_depth: i32) -> SearchResult {
        self.search(board, max_depth, None)
    }

    /// Both bounds; the search stops at whichever is hit first.
    pub fn find_best_move_with_limits(
        &mut self,
        board: &mut Board,
        max_depth: i32,
        time_limit_ms: u64,
    ) -> SearchResult {
        self.search(board, max_depth, Some(time_limit_ms))
    }

    fn search(
        &mut self,
        board: &mut Board,
        max_depth: i32,
        time_limit_ms: Option<u64>,
    ) -> SearchResult {
        self.stop_flag.store(false, Ordering::Relaxed);
        self.nodes = 0;
        // Killers and history persist across iterations within one
        // search, never across searches.
        self.killers.clear();
        self.history.clear();

        let timer = TimeManager::new(time_limit_ms, Some(max_depth));
        let max_depth = max_depth.clamp(1, MAX_PLY - 1);
        let mut result = SearchResult::default();

        for depth in 1..=max_depth {
            self.root_best = Move::NULL;
            let score = self.negamax(board, depth, 0, -INFINITY, INFINITY);

            if self.stop_flag.load(Ordering::Relaxed) {
                break;
            }

            result = SearchResult {
                best_move: if self.root_best.is_null() {
                    result.best_move
                } else {
                    self.root_best
                },
                score,
                depth,
                nodes_searched: self.nodes,
                time_ms: timer.elapsed_ms(),
                pv: self.principal_variation(board, depth as usize),
            };

            if let Some(callback) = self.on_iteration.as_mut() {
                callback(&result);
            }

            if timer.out_of_time() {
                break;
            }
        }

        result.nodes_searched = self.nodes;
        result.time_ms = timer.elapsed_ms();
        result
    }

    fn negamax(
        &mut self,
        board: &mut Board,
        mut depth: i32,
        ply: i32,
        mut alpha: Score,
        mut beta: Score,
    ) -> Score {
        if self.stop_flag.load(Ordering::Relaxed) {
            return 0;
        }
        self.nodes += 1;

        if ply >= MAX_PLY - 1 {
            return evaluate_static(board.position());
        }

        let root = ply == 0;
        let original_alpha = alpha;
        let hash = board.zobrist_hash();

        let mut tt_move = Move::NULL;
        if self.config.use_transposition_table {
            if let Some(entry) = self.tt.lookup(hash, depth) {
                tt_move = entry.best_move;
                let tt_score = score_from_tt(entry.score, ply);
                if !root {
                    match entry.flag {
                        Bound::Exact => return tt_score,
                        Bound::LowerBound => alpha = alpha.max(tt_score),
                        Bound::UpperBound => beta = beta.min(tt_score),
                    }
                    if alpha >= beta {
                        return tt_score;
                    }
                }
            } else if let Some(entry) = self.tt.lookup(hash, 0) {
                // Too shallow to trust the score, still the best ordering
                // hint available.
                tt_move = entry.best_move;
            }
        }

        if board.is_50_move_draw() {
            return DRAW_SCORE;
        }

        let in_check = board.is_in_check();
        if in_check {
            depth += 1;
        }

        if depth <= 0 {
            return if self.config.use_quiescence {
                self.quiescence(board, ply, alpha, beta)
            } else {
                evaluate_static(board.position())
            };
        }

        let moves = board.generate_moves();
        if moves.is_empty() {
            return if in_check {
                -CHECKMATE + ply
            } else {
                DRAW_SCORE
            };
        }

        let ordered = self.order_moves(board, &moves, tt_move, ply);

        let mut best_score = -INFINITY;
        let mut best_move = Move::NULL;
        let mut searched = 0;

        for mv in ordered {
            let is_tactical = board.is_tactical(mv);

            board.apply_move(mv);
            let gives_check = board.is_in_check();

            let score = if searched == 0 {
                // Principal variation: first move gets the full window.
                -self.negamax(board, depth - 1, ply + 1, -beta, -alpha)
            } else {
                let mut reduction = 0;
                if depth >= 3 && !is_tactical && !gives_check && !in_check {
                    reduction = if depth >= 6 { 2 } else { 1 };
                }
                let null_window =
                    -self.negamax(board, depth - 1 - reduction, ply + 1, -alpha - 1, -alpha);
                if null_window > alpha {
                    -self.negamax(board, depth - 1, ply + 1, -beta, -alpha)
                } else {
                    null_window
                }
            };

            board.revert_move();

            if self.stop_flag.load(Ordering::Relaxed) {
                return 0;
            }
            searched += 1;

            if score > best_score {
                best_score = score;
                best_move = mv;
                if root {
                    self.root_best = mv;
                }
            }

            if score > alpha {
                alpha = score;
            }

            if alpha >= beta {
                if !is_tactical {
                    self.killers.store(ply, mv);
                }
                break;
            }
        }

        if !best_move.is_null() && !board.is_tactical(best_move) {
            self.history.store(best_move, depth);
        }

        if self.config.use_transposition_table {
            let flag = if best_score <= original_alpha {
                Bound::UpperBound
            } else if best_score >= beta {
                Bound::LowerBound
            } else {
                Bound::Exact
            };
            self.tt
                .store(hash, score_to_tt(best_score, ply), depth, flag, best_move);
        }

        best_score
    }

    /// Depth-unlimited tactical search to settle the horizon: stand pat,
    /// then captures ordered by MVV/LVA.
    fn quiescence(&mut self, board: &mut Board, ply: i32, mut alpha: Score, beta: Score) -> Score {
        if self.stop_flag.load(Ordering::Relaxed) {
            return 0;
        }
        self.nodes += 1;

        if ply >= MAX_PLY - 1 {
            return evaluate_static(board.position());
        }

        let legal = board.generate_moves();
        if legal.is_empty() {
            return if board.is_in_check() {
                -CHECKMATE + ply
            } else {
                DRAW_SCORE
            };
        }

        let stand_pat = evaluate_static(board.position());
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut captures: Vec<(i32, Move)> = legal
            .iter()
            .copied()
            .filter(|&mv| board.is_tactical(mv))
            .map(|mv| (mvv_lva(board, mv), mv))
            .collect();
        captures.sort_unstable_by_key(|&(score, _)| std::cmp::Reverse(score));

        for (_, mv) in captures {
            board.apply_move(mv);
            let score = -self.quiescence(board, ply + 1, -beta, -alpha);
            board.revert_move();

            if self.stop_flag.load(Ordering::Relaxed) {
                return 0;
            }

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    fn order_moves(
        &self,
        board: &Board,
        moves: &MoveList,
        tt_move: Move,
        ply: i32,
    ) -> Vec<Move> {
        let mut scored: Vec<(i32, Move)> = moves
            .iter()
            .copied()
            .map(|mv| (self.move_score(board, mv, tt_move, ply), mv))
            .collect();
        if self.config.use_move_ordering {
            scored.sort_unstable_by_key(|&(score, _)| std::cmp::Reverse(score));
        }
        scored.into_iter().map(|(_, mv)| mv).collect()
    }

    /// Ordering heuristic: hash move, then captures by MVV/LVA, then
    /// killers, then history.
    fn move_score(&self, board: &Board, mv: Move, tt_move: Move, ply: i32) -> i32 {
        if mv == tt_move && !tt_move.is_null() {
            return TT_MOVE_SCORE;
        }
        if board.is_tactical(mv) {
            return CAPTURE_SCORE + mvv_lva(board, mv);
        }
        if self.killers.is_killer(ply, mv) {
            return KILLER_SCORE;
        }
        self.history.get(mv)
    }

    /// Walk the table from the current position, following stored best
    /// moves while they stay legal.
    pub fn principal_variation(&mut self, board: &mut Board, max_len: usize) -> Vec<Move> {
        let mut pv = Vec::with_capacity(max_len);

        for _ in 0..max_len {
            let Some(entry) = self.tt.lookup(board.zobrist_hash(), 0) else {
                break;
            };
            let mv = entry.best_move;
            // A stale or colliding entry may name a move that is not
            // legal here.
            if mv.is_null() || !board.generate_moves().contains(mv) {
                break;
            }
            board.apply_move(mv);
            pv.push(mv);
        }

        for _ in 0..pv.len() {
            board.revert_move();
        }

        pv
    }

    pub fn get_principal_variation(&mut self, board: &mut Board, depth: usize) -> Vec<Move> {
        self.principal_variation(board, depth)
    }

    /// Legal moves in the engine's current ordering, best first.
    pub fn get_ranked_moves(&mut self, board: &mut Board) -> MoveList {
        let legal = board.generate_moves();
        let tt_move = self
            .tt
            .lookup(board.zobrist_hash(), 0)
            .map(|entry| entry.best_move)
            .unwrap_or(Move::NULL);

        let mut ranked = MoveList::new();
        for mv in self.order_moves(board, &legal, tt_move, 0) {
            ranked.add(mv);
        }
        ranked
    }

    /// Fixed-depth analysis: best line plus a score for every root move.
    pub fn analyze(&mut self, board: &mut Board, depth: i32) -> Analysis {
        let depth = depth.clamp(1, MAX_PLY - 1);
        let result = self.find_best_move_depth(board, depth);

        let mut move_scores = Vec::new();
        for &mv in &board.generate_moves() {
            board.apply_move(mv);
            let score = -self.negamax(board, depth - 1, 1, -INFINITY, INFINITY);
            board.revert_move();
            move_scores.push((mv, score));
        }
        move_scores.sort_unstable_by_key(|&(_, score)| std::cmp::Reverse(score));

        Analysis {
            best_move: result.best_move,
            pv: result.pv,
            score: result.score,
            depth,
            move_scores,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Most valuable victim, least valuable attacker. En-passant victims are
/// always pawns.
fn mvv_lva(board: &Board, mv: Move) -> i32 {
    let victim = if mv.is_en_passant() {
        piece_value(PieceType::Pawn)
    } else {
        board
            .piece_at(mv.to())
            .map(|(_, piece)| piece_value(piece))
            .unwrap_or(0)
    };
    let attacker = board
        .piece_at(mv.from())
        .map(|(_, piece)| piece_value(piece))
        .unwrap_or(0);
    10 * victim - attacker
}
