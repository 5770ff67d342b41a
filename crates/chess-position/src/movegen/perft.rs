//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::generate_moves;
use crate::Position;
use chess_core::Move;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|&m| perft(&position.play_unchecked(m), depth - 1))
        .sum()
}

/// Leaf counts below each legal move, sorted by coordinate notation.
///
/// Comparing the split against a reference engine narrows a wrong total
/// down to the first move that disagrees.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(Move, u64)> {
    let moves = generate_moves(position);
    let mut results: Vec<(Move, u64)> = moves
        .iter()
        .map(|&m| {
            let nodes = perft(&position.play_unchecked(m), depth.saturating_sub(1));
            tracing::trace!(mv = %m, nodes, "perft divide");
            (m, nodes)
        })
        .collect();

    results.sort_by_key(|(m, _)| m.to_uci());
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

    fn check(fen: &str, expected: &[u64]) {
        let position = Position::from_fen(fen).unwrap();
        for (depth, &nodes) in (1..).zip(expected) {
            assert_eq!(perft(&position, depth), nodes, "{fen} at depth {depth}");
        }
    }

    #[test]
    fn perft_depth_zero_is_one() {
        assert_eq!(perft(&Position::startpos(), 0), 1);
    }

    #[test]
    fn perft_startpos() {
        check(chess_core::FenParser::STARTPOS, &[20, 400, 8902]);
    }

    #[test]
    #[ignore]
    fn perft_startpos_deep() {
        let position = Position::startpos();
        assert_eq!(perft(&position, 4), 197_281);
        assert_eq!(perft(&position, 5), 4_865_609);
    }

    #[test]
    fn perft_kiwipete() {
        check(KIWIPETE, &[48, 2039, 97_862]);
    }

    #[test]
    #[ignore]
    fn perft_kiwipete_deep() {
        let position = Position::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&position, 4), 4_085_603);
    }

    #[test]
    fn perft_position3() {
        check(POSITION_3, &[14, 191, 2812, 43_238]);
    }

    #[test]
    fn perft_position4() {
        check(POSITION_4, &[6, 264, 9467]);
    }

    #[test]
    fn perft_position4_mirrored() {
        check(
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
            &[6, 264, 9467],
        );
    }

    #[test]
    fn perft_position5() {
        check(POSITION_5, &[44, 1486, 62_379]);
    }

    #[test]
    fn perft_divide_sums_to_perft() {
        let position = Position::from_fen(KIWIPETE).unwrap();
        let results = perft_divide(&position, 2);
        assert_eq!(results.len(), 48);
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 2039);

        let names: Vec<String> = results.iter().map(|(m, _)| m.to_uci()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn perft_divide_depth_one_counts_each_move_once() {
        let results = perft_divide(&Position::startpos(), 1);
        assert_eq!(results.len(), 20);
        assert!(results.iter().all(|&(_, n)| n == 1));
    }
}
