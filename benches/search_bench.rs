use criterion::{black_box, criterion_group, criterion_main, Criterion};

use corvid::board::position::Board;
use corvid::eval::evaluate::evaluate_static;
use corvid::search::alphabeta::Engine;

const MIDGAME_FEN: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn search_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(20);

    group.bench_function("startpos_depth_4", |b| {
        let mut board = Board::startpos();
        let mut engine = Engine::new();
        b.iter(|| {
            engine.clear_cache();
            black_box(engine.find_best_move_depth(&mut board, 4).nodes_searched)
        });
    });

    group.bench_function("midgame_depth_4", |b| {
        let mut board = Board::new();
        board.load_fen(MIDGAME_FEN).unwrap();
        let mut engine = Engine::new();
        b.iter(|| {
            engine.clear_cache();
            black_box(engine.find_best_move_depth(&mut board, 4).nodes_searched)
        });
    });

    group.finish();
}

fn eval_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");

    group.bench_function("static_eval_midgame", |b| {
        let mut board = Board::new();
        board.load_fen(MIDGAME_FEN).unwrap();
        b.iter(|| black_box(evaluate_static(board.position())));
    });

    group.finish();
}

criterion_group!(benches, search_benchmark, eval_benchmark);
criterion_main!(benches);
