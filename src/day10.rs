use arrayvec::ArrayVec;
use itertools::Itertools;
use std::error::Error;
use std::fmt;

use crate::PuzzleError;

pub type Coord = (usize, usize);

#[derive(Debug, PartialEq, Eq)]
pub enum GridError {
    EmptyGrid,
    RaggedRow {row: usize, expected: usize, found: usize},
    BadCell {row: usize, col: usize, byte: u8},
}

impl Error for GridError {}
impl fmt::Display for GridError {fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
        GridError::EmptyGrid => write!(f, "grid has no rows"),
        GridError::RaggedRow {row, expected, found} =>
            write!(f, "row {} has {} cells, expected {}", row, found, expected),
        GridError::BadCell {row, col, byte} =>
            write!(f, "cell ({}, {}) is {:?}, expected a digit", row, col, *byte as char),
    }
}}

/// Topographic map of single-digit heights, stored row-major.
#[derive(Debug, Clone)]
pub struct Grid {
    heights: Vec<u8>,
    width: usize,
}

impl Grid {
    pub fn parse(input: &str) -> Result<Self, GridError> {
        let rows = input.trim().lines().map(|line| line.trim_end_matches('\r').as_bytes()).collect::<Vec<_>>();
        let Some(first) = rows.first() else {return Err(GridError::EmptyGrid)};
        let width = first.len();
        if width == 0 {return Err(GridError::EmptyGrid)};

        let mut heights = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            if line.len() != width {
                return Err(GridError::RaggedRow {row, expected: width, found: line.len()});
            }
            for (col, &byte) in line.iter().enumerate() {
                if !byte.is_ascii_digit() {return Err(GridError::BadCell {row, col, byte})};
                heights.push(byte - b'0');
            }
        }
        Ok(Grid {heights, width})
    }

    pub fn rows(&self) -> usize {self.heights.len() / self.width}
    pub fn width(&self) -> usize {self.width}
    fn len(&self) -> usize {self.heights.len()}

    fn index(&self, (row, col): Coord) -> usize {row * self.width + col}

    pub fn height(&self, at: Coord) -> u8 {self.heights[self.index(at)]}

    /// In-bounds orthogonal neighbours: down, right, up, left.
    pub fn neighbors(&self, (row, col): Coord) -> ArrayVec<Coord, 4> {
        let mut out = ArrayVec::new();
        if row + 1 < self.rows() {out.push((row + 1, col))};
        if col + 1 < self.width {out.push((row, col + 1))};
        if row > 0 {out.push((row - 1, col))};
        if col > 0 {out.push((row, col - 1))};
        out
    }

    pub fn trailheads(&self) -> impl Iterator<Item = Coord> + '_ {
        (0 .. self.rows()).cartesian_product(0 .. self.width).filter(|&at| self.height(at) == 0)
    }
}

/// A summit is exactly `9 - height` steps away, so no cell reaches more than
/// the 36 cells at distance 9 from a trailhead.
pub const MAX_SUMMITS: usize = 36;

/// Summits reachable from one cell: `nines` holds their grid indices in
/// ascending order, `paths` counts the distinct uphill routes to any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reach {
    pub nines: ArrayVec<u32, MAX_SUMMITS>,
    pub paths: u64,
}

impl Reach {
    pub fn score(&self) -> usize {self.nines.len()}

    fn absorb(&mut self, other: &Reach) {
        self.nines = self.nines.iter().merge(&other.nines).dedup().copied().collect();
        self.paths += other.paths;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub score: usize,
    pub rating: u64,
}

pub struct Trails<'g> {
    grid: &'g Grid,
    cache: Vec<Option<Reach>>,
}

impl<'g> Trails<'g> {
    pub fn new(grid: &'g Grid) -> Self {
        Trails {grid, cache: vec![None; grid.len()]}
    }

    pub fn reach(&mut self, at: Coord) -> &Reach {
        let ix = self.grid.index(at);
        // explore(at) only visits strictly higher cells, so slot `ix` is not read while taken
        let reach = match self.cache[ix].take() {
            Some(reach) => reach,
            None => self.explore(at),
        };
        self.cache[ix].insert(reach)
    }

    fn explore(&mut self, at: Coord) -> Reach {
        let grid = self.grid;
        let height = grid.height(at);
        let mut reach = Reach::default();
        if height == 9 {
            reach.nines.push(grid.index(at) as u32);
            reach.paths = 1;
            return reach;
        }

        for next in grid.neighbors(at) {
            if grid.height(next) != height + 1 {continue};
            reach.absorb(self.reach(next));
        }
        reach
    }
}

pub fn compute(grid: &Grid) -> Totals {
    let mut trails = Trails::new(grid);
    grid.trailheads().fold(Totals::default(), |totals, at| {
        let reach = trails.reach(at);
        Totals {score: totals.score + reach.score(), rating: totals.rating + reach.paths}
    })
}

pub fn solve(part: u8, input: &str) -> Result<String, PuzzleError> {
    let grid = Grid::parse(input)?;
    tracing::debug!(rows = grid.rows(), cols = grid.width(), trailheads = grid.trailheads().count(), "parsed grid");
    let totals = compute(&grid);
    Ok(if part == 1 {totals.score.to_string()} else {totals.rating.to_string()})
}

#[cfg(test)]
mod tests {
    use super::*;

    const LARGER: &str = "\
89010123
78121874
87430965
96549874
45678903
32019012
01329801
10456732
";

    fn totals(input: &str) -> Totals {
        compute(&Grid::parse(input).unwrap())
    }

    #[test]
    fn larger_example() {
        assert_eq!(totals(LARGER), Totals {score: 36, rating: 81});
    }

    #[test]
    fn single_summit_many_paths() {
        assert_eq!(totals("0123\n1234\n8765\n9876"), Totals {score: 1, rating: 16});
    }

    #[test]
    fn single_trailhead_two_summits() {
        assert_eq!(totals("9876543210\n8765432101"), Totals {score: 2, rating: 10});
        assert_eq!(totals("012345\n123456\n234567\n345678\n416789\n567891"), Totals {score: 2, rating: 227});
    }

    #[test]
    fn straight_line() {
        assert_eq!(totals("0123456789"), Totals {score: 1, rating: 1});
    }

    #[test]
    fn no_summit_reachable() {
        assert_eq!(totals("000\n111\n222"), Totals::default());
        assert_eq!(totals("0129\n9999"), Totals::default());
    }

    #[test]
    fn rating_never_below_score() {
        for input in [LARGER, "0123\n1234\n8765\n9876", "0123\n1234\n2345\n3456\n4567\n5678\n6789"] {
            let grid = Grid::parse(input).unwrap();
            let mut trails = Trails::new(&grid);
            for at in grid.trailheads() {
                let reach = trails.reach(at);
                assert!(reach.paths >= reach.score() as u64, "{:?} in {:?}", at, input);
            }
        }
    }

    #[test]
    fn reach_is_stable() {
        let grid = Grid::parse(LARGER).unwrap();
        let mut trails = Trails::new(&grid);
        let first = trails.reach((0, 2)).clone();
        let second = trails.reach((0, 2)).clone();
        assert_eq!(first, second);
        assert_eq!((first.score(), first.paths), (5, 20));
    }

    #[test]
    fn summit_reaches_itself() {
        let grid = Grid::parse("09\n00").unwrap();
        let mut trails = Trails::new(&grid);
        let reach = trails.reach((0, 1));
        assert_eq!(reach.paths, 1);
        assert_eq!(reach.nines.as_slice(), &[1]);
    }

    #[test]
    fn neighbour_order() {
        let grid = Grid::parse("000\n000\n000").unwrap();
        assert_eq!(grid.neighbors((1, 1)).as_slice(), &[(2, 1), (1, 2), (0, 1), (1, 0)]);
        assert_eq!(grid.neighbors((0, 0)).as_slice(), &[(1, 0), (0, 1)]);
        assert_eq!(grid.neighbors((2, 2)).as_slice(), &[(1, 2), (2, 1)]);
    }

    #[test]
    fn large_flat_grid() {
        let input = vec!["0".repeat(400); 400].join("\n");
        let grid = Grid::parse(&input).unwrap();
        let mut trails = Trails::new(&grid);
        assert!(grid.trailheads().all(|at| trails.reach(at) == &Reach::default()));
        assert_eq!(compute(&grid), Totals::default());
    }

    #[test]
    fn summit_sets_stay_small() {
        // one trailhead in the middle of a diamond of rising rings, 36 summits on the rim
        let input = (0 .. 19).map(|row: i32| (0 .. 19).map(|col: i32| {
            let dist = (row - 9).abs() + (col - 9).abs();
            if dist <= 9 {char::from(b'0' + dist as u8)} else {'0'}
        }).collect::<String>()).join("\n");
        let grid = Grid::parse(&input).unwrap();
        let mut trails = Trails::new(&grid);
        let reach = trails.reach((9, 9)).clone();
        assert_eq!(reach.score(), MAX_SUMMITS);
        assert!(reach.nines.windows(2).all(|w| w[0] < w[1]));
        assert!(reach.nines.iter().all(|&ix| grid.height((ix as usize / 19, ix as usize % 19)) == 9));
    }

    #[test]
    fn crlf_and_padding() {
        assert_eq!(totals("\n0123\r\n1234\r\n8765\r\n9876\r\n\n"), Totals {score: 1, rating: 16});
    }

    #[test]
    fn rejects_malformed_grids() {
        assert_eq!(Grid::parse("").unwrap_err(), GridError::EmptyGrid);
        assert_eq!(Grid::parse(" \n ").unwrap_err(), GridError::EmptyGrid);
        assert_eq!(Grid::parse("0123\n012").unwrap_err(), GridError::RaggedRow {row: 1, expected: 4, found: 3});
        assert_eq!(Grid::parse("01\n2.").unwrap_err(), GridError::BadCell {row: 1, col: 1, byte: b'.'});
    }

    #[test]
    fn solve_parts() {
        assert_eq!(solve(1, LARGER).unwrap(), "36");
        assert_eq!(solve(2, LARGER).unwrap(), "81");
    }
}
