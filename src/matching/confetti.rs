use rand::seq::SliceRandom;
use rand::Rng;

pub const PIECE_COUNT: usize = 50;
pub const PALETTE: [&str; 4] = ["#FFB5A7", "#C8A2C8", "#F7CAC9", "#F4A6CD"];

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    /// Horizontal offset in percent of the viewport width.
    pub left_percent: f32,
    pub color: &'static str,
}

/// Decorative burst shown with the results.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiBurst {
    pub pieces: Vec<ConfettiPiece>,
}

impl ConfettiBurst {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let pieces = (0..PIECE_COUNT)
            .map(|_| ConfettiPiece {
                left_percent: rng.gen_range(0.0..100.0),
                color: PALETTE.choose(rng).copied().unwrap_or(PALETTE[0]),
            })
            .collect();

        Self { pieces }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn burst_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let burst = ConfettiBurst::generate(&mut rng);

        assert_eq!(burst.pieces.len(), PIECE_COUNT);
        for piece in &burst.pieces {
            assert!((0.0..100.0).contains(&piece.left_percent));
            assert!(PALETTE.contains(&piece.color));
        }
    }
}
