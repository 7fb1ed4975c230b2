mod day10;
mod day11;
mod logging;

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum PuzzleError {
    Grid(day10::GridError),
    Stones(day11::StoneError),
    UnknownDay(usize),
    BadPart(String),
}

impl Error for PuzzleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PuzzleError::Grid(e) => Some(e),
            PuzzleError::Stones(e) => Some(e),
            _ => None,
        }
    }
}
impl fmt::Display for PuzzleError {fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
        PuzzleError::Grid(e) => write!(f, "bad trail map: {}", e),
        PuzzleError::Stones(e) => write!(f, "bad stone list: {}", e),
        PuzzleError::UnknownDay(day) => write!(f, "no solver for day {}", day),
        PuzzleError::BadPart(part) => write!(f, "part must be 1 or 2, got {:?}", part),
    }
}}

impl From<day10::GridError> for PuzzleError {
    fn from(e: day10::GridError) -> Self {PuzzleError::Grid(e)}
}
impl From<day11::StoneError> for PuzzleError {
    fn from(e: day11::StoneError) -> Self {PuzzleError::Stones(e)}
}

type Solver = fn(u8, &str) -> Result<String, PuzzleError>;

fn solver(day: usize) -> Result<Solver, PuzzleError> {
    match day {
        10 => Ok(day10::solve),
        11 => Ok(day11::solve),
        _ => Err(PuzzleError::UnknownDay(day)),
    }
}

fn parse_part(part_arg: &str) -> Result<u8, PuzzleError> {
    match part_arg {
        "1" => Ok(1),
        "2" => Ok(2),
        _ => Err(PuzzleError::BadPart(part_arg.to_owned())),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let args = std::env::args().collect::<Vec<_>>();
    let (day_arg, part_arg, fname) = match &args[..] {
        [_, day_arg, part_arg] => (day_arg, part_arg, format!("day{}.in", day_arg)),
        [_, day_arg, test_arg, part_arg] => (day_arg, part_arg, format!("day{}test{}.in", day_arg, test_arg)),
        _ => {
            println!("exactly two or three arguments expected - day number, optionally test number and 1/2 for part");
            std::process::exit(1);
        }
    };

    let part = parse_part(part_arg)?;
    let solve = solver(day_arg.parse()?)?;
    tracing::debug!(%fname, part, "reading input");
    let input = std::fs::read_to_string(&fname)?;
    let time = std::time::Instant::now();
    println!("{}", solve(part, &input)?);
    println!("{} seconds elapsed", time.elapsed().as_secs_f32());
    Ok(())
}
