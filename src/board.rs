/// The secondary game: 5×5 tic-tac-toe, four in a row to win, with a
/// per-player turn timer.  Pure logic in the same value-in/value-out style
/// as the shooter's compute module.

pub const BOARD_SIZE: usize = 5;
pub const WIN_LEN: usize = 4;

/// Turn allotments in seconds — X plays faster than O.
pub const TIME_X: u32 = 4;
pub const TIME_O: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn allotment(self) -> u32 {
        match self {
            Mark::X => TIME_X,
            Mark::O => TIME_O,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win(Mark),
    Draw,
}

/// Wins and draws accumulated across resets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub x: u32,
    pub o: u32,
    pub draws: u32,
}

#[derive(Clone, Debug)]
pub struct Board {
    pub cells: [Option<Mark>; BOARD_SIZE * BOARD_SIZE],
    pub current: Mark,
    pub outcome: Option<Outcome>,
    pub score: Score,
    /// Seconds left in the current player's turn.
    pub time_left: u32,
}

impl Board {
    pub fn new() -> Board {
        Board {
            cells: [None; BOARD_SIZE * BOARD_SIZE],
            current: Mark::X,
            outcome: None,
            score: Score::default(),
            time_left: Mark::X.allotment(),
        }
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

// ── Win detection ────────────────────────────────────────────────────────────

/// Scan for `WIN_LEN` in a row from every cell along the four directions
/// (→, ↓, ↘, ↙); a full board with no line is a draw.
pub fn check_outcome(cells: &[Option<Mark>; BOARD_SIZE * BOARD_SIZE]) -> Option<Outcome> {
    const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

    for row in 0..BOARD_SIZE as isize {
        for col in 0..BOARD_SIZE as isize {
            let mark = match cells[(row * BOARD_SIZE as isize + col) as usize] {
                Some(m) => m,
                None => continue,
            };
            for (dx, dy) in DIRECTIONS {
                let mut count = 1;
                for step in 1..WIN_LEN as isize {
                    let r = row + step * dy;
                    let c = col + step * dx;
                    if r < 0 || r >= BOARD_SIZE as isize || c < 0 || c >= BOARD_SIZE as isize
                    {
                        break;
                    }
                    if cells[(r * BOARD_SIZE as isize + c) as usize] != Some(mark) {
                        break;
                    }
                    count += 1;
                }
                if count == WIN_LEN {
                    return Some(Outcome::Win(mark));
                }
            }
        }
    }

    if cells.iter().all(|c| c.is_some()) {
        Some(Outcome::Draw)
    } else {
        None
    }
}

// ── Moves ────────────────────────────────────────────────────────────────────

/// Place the current player's mark at `index`.  Occupied cells and finished
/// games are silent no-ops.
pub fn play(board: &Board, index: usize) -> Board {
    if index >= board.cells.len() || board.cells[index].is_some() || board.outcome.is_some() {
        return board.clone();
    }

    let mut cells = board.cells;
    cells[index] = Some(board.current);

    match check_outcome(&cells) {
        Some(outcome) => {
            let mut score = board.score;
            match outcome {
                Outcome::Win(Mark::X) => score.x += 1,
                Outcome::Win(Mark::O) => score.o += 1,
                Outcome::Draw => score.draws += 1,
            }
            Board {
                cells,
                outcome: Some(outcome),
                score,
                ..board.clone()
            }
        }
        None => {
            let next = board.current.other();
            Board {
                cells,
                current: next,
                time_left: next.allotment(),
                ..board.clone()
            }
        }
    }
}

/// One second of turn-timer progress.  At zero the turn is forfeited: the
/// other player moves next with a fresh allotment, no mark is placed.
/// Frozen once the game has an outcome.
pub fn tick_timer(board: &Board) -> Board {
    if board.outcome.is_some() {
        return board.clone();
    }
    if board.time_left > 0 {
        return Board { time_left: board.time_left - 1, ..board.clone() };
    }
    let next = board.current.other();
    Board {
        current: next,
        time_left: next.allotment(),
        ..board.clone()
    }
}

/// Clear the board, winner and timer for a rematch.  The score persists.
pub fn reset(board: &Board) -> Board {
    Board {
        cells: [None; BOARD_SIZE * BOARD_SIZE],
        current: Mark::X,
        outcome: None,
        time_left: Mark::X.allotment(),
        score: board.score,
    }
}
