use boomgrid::engine::{Board, MineLayout, RevealResult, Tile};
use boomgrid::error::GameError;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn board_with(positions: &[(usize, usize)]) -> Board {
    Board::new(MineLayout::from_positions(10, 10, positions).expect("layout"))
}

#[test]
fn neighbors_are_clipped_and_exclude_self() {
    let layout = MineLayout::from_positions(10, 10, &[]).unwrap();
    for y in 0..10 {
        for x in 0..10 {
            let n = layout.neighbors(x, y).unwrap();
            assert!((3..=8).contains(&n.len()), "({},{}) has {}", x, y, n.len());
            assert!(!n.contains(&(x, y)));
            assert!(n.iter().all(|&(nx, ny)| nx < 10 && ny < 10 && nx.abs_diff(x) <= 1 && ny.abs_diff(y) <= 1));
        }
    }
    assert_eq!(layout.neighbors(0, 0).unwrap().len(), 3);
    assert_eq!(layout.neighbors(0, 5).unwrap().len(), 5);
    assert_eq!(layout.neighbors(5, 5).unwrap().len(), 8);
}

#[test]
fn adjacency_matches_neighbor_mines() {
    let mut rng = StdRng::seed_from_u64(999);
    let b = Board::random(10, 10, 0.2, &mut rng).expect("board");
    let layout = b.layout();
    for y in 0..10 {
        for x in 0..10 {
            let expected = layout.neighbors(x, y).unwrap().into_iter()
                .filter(|&(nx, ny)| layout.is_mine(nx, ny).unwrap())
                .count();
            assert_eq!(layout.adjacency_count(x, y).unwrap() as usize, expected, "at ({},{})", x, y);
            assert_eq!(b.cell(x, y).unwrap().adjacent() as usize, expected);
        }
    }
}

#[test]
fn same_seed_same_layout() {
    let a = MineLayout::generate(10, 10, 0.2, &mut StdRng::seed_from_u64(7)).unwrap();
    let b = MineLayout::generate(10, 10, 0.2, &mut StdRng::seed_from_u64(7)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn probability_extremes() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(MineLayout::generate(10, 10, 0.0, &mut rng).unwrap().mine_count(), 0);
    assert_eq!(MineLayout::generate(10, 10, 1.0, &mut rng).unwrap().mine_count(), 100);
}

#[test]
fn single_mine_cascade_opens_everything_else() {
    let mut b = board_with(&[(3, 3)]);
    assert_eq!(b.reveal(0, 0).unwrap(), RevealResult::RevealedSafe(99));
    assert!(!b.is_revealed(3, 3).unwrap());
    assert!(!b.is_exploded());
    for (x, y) in b.layout().neighbors(3, 3).unwrap() {
        assert_eq!(b.tile(x, y).unwrap(), Tile::Revealed(1));
    }
    assert_eq!(b.tile(9, 9).unwrap(), Tile::Revealed(0));
    assert_eq!(b.tile(3, 3).unwrap(), Tile::Hidden);
}

#[test]
fn cascade_stops_at_numbered_border() {
    // A wall of mines on column 5 splits the board.
    let wall: Vec<_> = (0..10).map(|y| (5, y)).collect();
    let mut b = board_with(&wall);
    b.reveal(0, 0).unwrap();
    for y in 0..10 {
        for x in 0..5 {
            assert!(b.is_revealed(x, y).unwrap());
        }
        for x in 5..10 {
            assert!(!b.is_revealed(x, y).unwrap());
        }
    }
    assert_eq!(b.tile(4, 0).unwrap(), Tile::Revealed(2));
    assert_eq!(b.tile(4, 4).unwrap(), Tile::Revealed(3));
    assert!(!b.is_exploded());
}

#[test]
fn numbered_cell_does_not_cascade() {
    let mut b = board_with(&[(1, 0)]);
    assert_eq!(b.reveal(0, 0).unwrap(), RevealResult::RevealedSafe(1));
    assert_eq!(b.revealed_count(), 1);
}

#[test]
fn reveal_is_idempotent() {
    let mut b = board_with(&[(3, 3)]);
    b.reveal(9, 9).unwrap();
    let before = b.revealed_count();
    assert_eq!(b.reveal(9, 9).unwrap(), RevealResult::NoOp);
    assert_eq!(b.reveal(0, 0).unwrap(), RevealResult::NoOp);
    assert_eq!(b.revealed_count(), before);
}

#[test]
fn flag_round_trip() {
    let mut b = board_with(&[(3, 3)]);
    assert!(b.toggle_flag(2, 7).unwrap());
    assert!(b.is_flagged(2, 7).unwrap());
    assert_eq!(b.tile(2, 7).unwrap(), Tile::Flagged);
    assert!(b.toggle_flag(2, 7).unwrap());
    assert!(!b.is_flagged(2, 7).unwrap());
    assert_eq!(b.flagged_count(), 0);
}

#[test]
fn flag_on_revealed_is_noop() {
    let mut b = board_with(&[(1, 0)]);
    b.reveal(0, 0).unwrap();
    assert!(!b.toggle_flag(0, 0).unwrap());
    assert!(!b.is_flagged(0, 0).unwrap());
}

#[test]
fn reveal_flagged_safe_cell_unflags_it() {
    let mut b = board_with(&[(0, 0)]);
    b.toggle_flag(5, 5).unwrap();
    b.reveal(5, 5).unwrap();
    assert!(!b.is_flagged(5, 5).unwrap());
    assert!(b.is_revealed(5, 5).unwrap());
}

#[test]
fn reveal_flagged_mine_explodes() {
    let mut b = board_with(&[(5, 5)]);
    b.toggle_flag(5, 5).unwrap();
    assert_eq!(b.reveal(5, 5).unwrap(), RevealResult::HitMine);
    assert_eq!(b.exploded(), Some((5, 5)));
    assert!(!b.is_revealed(5, 5).unwrap());
    assert_eq!(b.tile(5, 5).unwrap(), Tile::Exploded);
}

#[test]
fn hitting_mine_leaves_other_state_alone() {
    let mut b = board_with(&[(7, 7), (0, 9)]);
    b.reveal(0, 0).unwrap();
    b.toggle_flag(0, 9).unwrap();
    let revealed = b.revealed_count();
    assert_eq!(b.reveal(7, 7).unwrap(), RevealResult::HitMine);
    assert!(b.is_exploded());
    assert_eq!(b.exploded(), Some((7, 7)));
    assert_eq!(b.revealed_count(), revealed);
    assert!(!b.is_revealed(7, 7).unwrap());
    // Only the render pass clears flags on other mines.
    assert!(b.is_flagged(0, 9).unwrap());
    b.clear_flags_on_mines();
    assert!(!b.is_flagged(0, 9).unwrap());
    assert_eq!(b.tile(0, 9).unwrap(), Tile::Mine);
}

#[test]
fn no_moves_after_explosion() {
    let mut b = board_with(&[(7, 7), (1, 1)]);
    b.reveal(7, 7).unwrap();
    assert_eq!(b.reveal(1, 1), Err(GameError::AlreadyEnded));
    assert_eq!(b.toggle_flag(0, 0), Err(GameError::AlreadyEnded));
    assert_eq!(b.exploded(), Some((7, 7)));
}

#[test]
fn out_of_bounds_is_rejected() {
    let mut b = board_with(&[]);
    assert_eq!(b.reveal(10, 0), Err(GameError::OutOfBounds { x: 10, y: 0 }));
    assert_eq!(b.toggle_flag(0, 10), Err(GameError::OutOfBounds { x: 0, y: 10 }));
    assert!(b.tile(10, 10).is_err());
    assert!(MineLayout::from_positions(10, 10, &[(10, 3)]).is_err());
}

#[test]
fn random_cascades_never_explode() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut b = Board::random(10, 10, 0.2, &mut rng).unwrap();
        let zero = (0..100).map(|i| (i % 10, i / 10)).find(|&(x, y)| {
            !b.layout().is_mine(x, y).unwrap() && b.layout().adjacency_count(x, y).unwrap() == 0
        });
        let Some((x, y)) = zero else { continue };
        b.reveal(x, y).unwrap();
        assert!(!b.is_exploded());
        for cy in 0..10 {
            for cx in 0..10 {
                if b.is_revealed(cx, cy).unwrap() {
                    assert!(!b.layout().is_mine(cx, cy).unwrap());
                }
            }
        }
    }
}

#[test]
fn display_marks_tiles() {
    let mut b = board_with(&[(9, 9)]);
    b.toggle_flag(9, 9).unwrap();
    let text = b.to_string();
    assert!(text.contains('F'));
    b.reveal(0, 0).unwrap();
    assert!(b.to_string().contains('1'));
}
