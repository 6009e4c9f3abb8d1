//! Five-reel video slots with paylines, wilds and scatter free spins

use super::types::{GameTitle, RoundSummary};
use crate::errors::{GameError, RuleResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum VideoSymbol {
    Diamond,
    Seven,
    Lemon,
    Grape,
    Bell,
    Star,
    Wild,
}

impl VideoSymbol {
    pub const REEL: [VideoSymbol; 7] = [
        VideoSymbol::Diamond,
        VideoSymbol::Seven,
        VideoSymbol::Lemon,
        VideoSymbol::Grape,
        VideoSymbol::Bell,
        VideoSymbol::Star,
        VideoSymbol::Wild,
    ];
}

pub const ROWS: usize = 3;
pub const COLUMNS: usize = 5;
pub const MAX_PAYLINES: u32 = 10;
pub const JACKPOT_SHARE_DIVISOR: i64 = 10;

/// Visible window, `grid[row][column]`
pub type Grid = [[VideoSymbol; COLUMNS]; ROWS];

/// Paylines as cell indices `row * 5 + column`, activated in order
pub const PAYLINES: [[usize; COLUMNS]; MAX_PAYLINES as usize] = [
    [0, 1, 2, 3, 4],
    [5, 6, 7, 8, 9],
    [10, 11, 12, 13, 14],
    [0, 6, 12, 8, 4],
    [10, 6, 12, 8, 0],
    [0, 1, 12, 9, 10],
    [10, 11, 12, 3, 4],
    [2, 7, 12, 7, 2],
    [5, 6, 7, 8, 9],
    [0, 3, 6, 9, 12],
];

fn cell(grid: &Grid, index: usize) -> VideoSymbol {
    grid[index / COLUMNS][index % COLUMNS]
}

pub fn line_symbols(grid: &Grid, line: usize) -> [VideoSymbol; COLUMNS] {
    PAYLINES[line].map(|index| cell(grid, index))
}

/// Credits paid by one payline at `bet` per line
///
/// A run starts on the first reel and must not start with a wild; wilds
/// extend it. Only the longest run pays. Three or more wilds anywhere on the
/// line pay a separate bonus.
pub fn line_payout(symbols: &[VideoSymbol; COLUMNS], bet: i64) -> i64 {
    let mut total = 0;

    let first = symbols[0];
    if first != VideoSymbol::Wild {
        let run = 1 + symbols[1..]
            .iter()
            .take_while(|&&s| s == first || s == VideoSymbol::Wild)
            .count();
        total += match run {
            5 => bet * 50,
            4 => bet * 20,
            3 => bet * 5,
            _ => 0,
        };
    }

    let wilds = symbols.iter().filter(|&&s| s == VideoSymbol::Wild).count();
    total += match wilds {
        5 => bet * 100,
        4 => bet * 25,
        3 => bet * 10,
        _ => 0,
    };

    total
}

/// Free spins awarded for scattered stars anywhere in the window
pub fn free_spins_awarded(grid: &Grid) -> u32 {
    let stars = grid
        .iter()
        .flatten()
        .filter(|&&s| s == VideoSymbol::Star)
        .count();
    match stars {
        0..=2 => 0,
        3 => 5,
        4 => 10,
        _ => 20,
    }
}

pub fn spin_grid<R: Rng + ?Sized>(rng: &mut R) -> Grid {
    let mut grid = [[VideoSymbol::Diamond; COLUMNS]; ROWS];
    for row in grid.iter_mut() {
        for slot in row.iter_mut() {
            *slot = VideoSymbol::REEL[rng.gen_range(0..VideoSymbol::REEL.len())];
        }
    }
    grid
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSpin {
    pub grid: Grid,
    /// Indices of the active paylines that paid
    pub winning_lines: Vec<usize>,
    pub free_spins_awarded: u32,
    /// Whether this spin consumed a free spin instead of a stake
    pub free: bool,
    pub summary: RoundSummary,
}

/// Evaluate a window for `lines` active paylines at `bet` per line
pub fn evaluate(grid: Grid, bet: i64, lines: u32, free: bool) -> VideoSpin {
    let mut payout = 0;
    let mut winning_lines = Vec::new();
    for line in 0..lines as usize {
        let win = line_payout(&line_symbols(&grid, line), bet);
        if win > 0 {
            payout += win;
            winning_lines.push(line);
        }
    }

    let staked = if free { 0 } else { bet * lines as i64 };
    let summary =
        RoundSummary::new(GameTitle::VideoSlots, staked, payout).with_contribution(staked / JACKPOT_SHARE_DIVISOR);

    VideoSpin {
        free_spins_awarded: free_spins_awarded(&grid),
        grid,
        winning_lines,
        free,
        summary,
    }
}

/// Video slots machine; remembers the free spins still owed to the player
#[derive(Debug, Clone, Default)]
pub struct VideoSlots {
    free_spins: u32,
}

impl VideoSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn free_spins(&self) -> u32 {
        self.free_spins
    }

    /// Total stake the next spin will debit
    pub fn stake(&self, bet: i64, lines: u32) -> i64 {
        if self.free_spins > 0 {
            0
        } else {
            bet * lines as i64
        }
    }

    /// Spin once. A pending free spin is used first and stakes nothing.
    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R, bet: i64, lines: u32) -> RuleResult<VideoSpin> {
        let title = GameTitle::VideoSlots;
        title.limits().check(title, bet)?;
        if lines == 0 || lines > MAX_PAYLINES {
            return Err(GameError::InvalidPaylines {
                lines,
                max: MAX_PAYLINES,
            });
        }

        let free = self.free_spins > 0;
        if free {
            self.free_spins -= 1;
        }

        let result = evaluate(spin_grid(rng), bet, lines, free);
        self.free_spins += result.free_spins_awarded;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use VideoSymbol::*;

    fn filled(symbol: VideoSymbol) -> Grid {
        [[symbol; COLUMNS]; ROWS]
    }

    #[test]
    fn test_run_lengths() {
        assert_eq!(line_payout(&[Seven, Seven, Seven, Seven, Seven], 10), 500);
        assert_eq!(line_payout(&[Seven, Seven, Wild, Seven, Lemon], 10), 200);
        assert_eq!(line_payout(&[Bell, Wild, Bell, Grape, Bell], 10), 50);
        assert_eq!(line_payout(&[Bell, Bell, Grape, Bell, Bell], 10), 0);
    }

    #[test]
    fn test_wild_bonus_and_leading_wild() {
        // Leading wild never starts a symbol run
        assert_eq!(line_payout(&[Wild, Wild, Wild, Lemon, Grape], 10), 100);
        assert_eq!(line_payout(&[Wild; 5], 10), 1_000);
        // Run of five with three wilds pays both
        assert_eq!(line_payout(&[Diamond, Wild, Wild, Wild, Diamond], 10), 500 + 100);
    }

    #[test]
    fn test_paylines_read_row_major_cells() {
        let mut grid = filled(Lemon);
        grid[2][2] = Diamond;
        let line = line_symbols(&grid, 3);
        assert_eq!(line, [Lemon, Lemon, Diamond, Lemon, Lemon]);
    }

    #[test]
    fn test_scatter_awards() {
        let mut grid = filled(Lemon);
        assert_eq!(free_spins_awarded(&grid), 0);
        grid[0][0] = Star;
        grid[1][3] = Star;
        grid[2][4] = Star;
        assert_eq!(free_spins_awarded(&grid), 5);
        grid[2][0] = Star;
        assert_eq!(free_spins_awarded(&grid), 10);
        assert_eq!(free_spins_awarded(&filled(Star)), 20);
    }

    #[test]
    fn test_only_active_lines_pay() {
        let spin = evaluate(filled(Grape), 10, 2, false);
        assert_eq!(spin.winning_lines, vec![0, 1]);
        assert_eq!(spin.summary.bet, 20);
        assert_eq!(spin.summary.payout, 1_000);
        assert_eq!(spin.summary.jackpot_contribution, 2);
    }

    #[test]
    fn test_free_spin_stakes_nothing() {
        let spin = evaluate(filled(Bell), 10, 1, true);
        assert_eq!(spin.summary.bet, 0);
        assert_eq!(spin.summary.jackpot_contribution, 0);
        assert_eq!(spin.summary.net_win(), 500);
    }

    #[test]
    fn test_machine_validates_and_tracks_free_spins() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut machine = VideoSlots::new();
        assert!(matches!(
            machine.spin(&mut rng, 10, 11),
            Err(GameError::InvalidPaylines { lines: 11, max: 10 })
        ));
        assert!(machine.spin(&mut rng, 5, 1).is_err());

        for _ in 0..50 {
            let pending = machine.free_spins();
            let spin = machine.spin(&mut rng, 10, 10).unwrap();
            assert_eq!(spin.free, pending > 0);
            let expected = pending - u32::from(spin.free) + spin.free_spins_awarded;
            assert_eq!(machine.free_spins(), expected);
        }
    }
}
