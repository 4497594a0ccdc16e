use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_link::core::{compact, find_path, Board, BoardGenerator, DeadlockResolver, MatchRule, Session, SimpleRng};
use tui_link::types::{FallStyle, Mode, Pos, Tile};

/// A level-2 board with every other column emptied, so searches have room.
fn sparse_board() -> Board {
    let mut board = BoardGenerator::new().generate(2, &mut SimpleRng::new(12345));
    for row in 1..=board.rows() {
        for col in (2..=board.cols()).step_by(2) {
            board.set(Pos::new(row, col), Tile::EMPTY);
        }
    }
    board
}

fn bench_find_path(c: &mut Criterion) {
    let board = sparse_board();
    let from = Pos::new(1, 1);
    let to = Pos::new(7, 15);

    c.bench_function("find_path_across_board", |b| {
        b.iter(|| find_path(black_box(&board), black_box(from), black_box(to)))
    });
}

fn bench_any_move_exists(c: &mut Criterion) {
    let resolver = DeadlockResolver::new();
    let full = BoardGenerator::new().generate(2, &mut SimpleRng::new(7));
    let sparse = sparse_board();

    c.bench_function("any_move_exists_full", |b| {
        b.iter(|| resolver.any_move_exists(black_box(&full), MatchRule::Identity))
    });
    c.bench_function("any_move_exists_sparse", |b| {
        b.iter(|| resolver.any_move_exists(black_box(&sparse), MatchRule::Identity))
    });
}

fn bench_compact(c: &mut Criterion) {
    let board = sparse_board();

    c.bench_function("compact_center", |b| {
        b.iter(|| {
            let mut board = board.clone();
            compact(&mut board, black_box(FallStyle::Center));
            board
        })
    });
}

fn bench_level_setup(c: &mut Criterion) {
    let mut session = Session::new(Mode::ClassicEasy, 12345);
    session.start();

    c.bench_function("restart_level", |b| b.iter(|| session.restart()));
}

criterion_group!(
    benches,
    bench_find_path,
    bench_any_move_exists,
    bench_compact,
    bench_level_setup
);
criterion_main!(benches);
