/// Library surface: the pure simulation logic for both games plus the
/// crossterm rendering layer.  The `board`, `compute` and `entities`
/// modules perform no terminal I/O, so the integration tests can drive
/// them directly; `display` only translates state into terminal commands
/// for any `io::Write` sink.

pub mod board;
pub mod compute;
pub mod display;
pub mod entities;
