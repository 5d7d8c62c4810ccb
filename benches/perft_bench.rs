use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use corvid::board::position::Board;
use corvid::movegen::perft::perft;

fn perft_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    group.throughput(Throughput::Elements(8_902));
    group.bench_function("startpos_depth_3", |b| {
        let mut board = Board::startpos();
        b.iter(|| black_box(perft(&mut board, 3)));
    });

    group.throughput(Throughput::Elements(2_039));
    group.bench_function("kiwipete_depth_2", |b| {
        let mut board = Board::new();
        board
            .load_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
        b.iter(|| black_box(perft(&mut board, 2)));
    });

    group.finish();
}

fn movegen_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    group.bench_function("legal_moves_startpos", |b| {
        let mut board = Board::startpos();
        b.iter(|| black_box(board.generate_moves().len()));
    });

    group.bench_function("make_unmake_startpos", |b| {
        let mut board = Board::startpos();
        let moves = board.generate_moves();
        b.iter(|| {
            for &mv in &moves {
                board.apply_move(mv);
                board.revert_move();
            }
            black_box(board.zobrist_hash())
        });
    });

    group.finish();
}

criterion_group!(benches, perft_benchmark, movegen_benchmark);
criterion_main!(benches);
