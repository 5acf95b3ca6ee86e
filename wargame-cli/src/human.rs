//! Human move input

use std::io::{self, BufRead, Write};

use wargame_core::{Choice, Coord, GameState, IllegalMove, Move, MoveSource};

/// Where typed lines come from
pub trait LineInput {
    /// Append the next line to `buf`; `Ok(0)` at end of input
    fn next_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl<R: BufRead> LineInput for R {
    fn next_line(&mut self, buf: &mut String) -> io::Result<usize> {
        self.read_line(buf)
    }
}

/// Process stdin, locked only while a line is read so both players of a
/// human-vs-human game can share it
pub struct SharedStdin;

impl LineInput for SharedStdin {
    fn next_line(&mut self, buf: &mut String) -> io::Result<usize> {
        io::stdin().read_line(buf)
    }
}

/// Reads moves from a text stream, prompting on another
pub struct HumanSource<R, W> {
    input: R,
    output: W,
}

impl<R: LineInput, W: Write> HumanSource<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl HumanSource<SharedStdin, io::Stdout> {
    pub fn stdin() -> Self {
        Self::new(SharedStdin, io::stdout())
    }
}

/// Accepts either notation: `attack D4 C4`, or a bare pair `D4 C4` whose
/// kind is inferred from the board (a pair of equal cells self-destructs)
pub fn parse_input(state: &GameState, line: &str) -> Result<Move, String> {
    let line = line.trim();
    if let Ok(mv) = line.parse::<Move>() {
        return Ok(mv);
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    let [from, to] = parts.as_slice() else {
        return Err(format!("cannot understand '{}'", line));
    };
    let from: Coord = from.parse().map_err(|e| format!("{}", e))?;
    let to: Coord = to.parse().map_err(|e| format!("{}", e))?;
    Ok(state.resolve_pair(from, to))
}

impl<R: LineInput, W: Write> MoveSource for HumanSource<R, W> {
    fn name(&self) -> &str {
        "human"
    }

    fn choose_move(&mut self, state: &GameState) -> Option<Choice> {
        loop {
            write!(
                self.output,
                "{} move (e.g. 'B2 B3', 'attack D4 C4', 'destruct C3'): ",
                state.current_player()
            )
            .ok()?;
            self.output.flush().ok()?;

            let mut line = String::new();
            // End of input means the player has left
            if self.input.next_line(&mut line).ok()? == 0 {
                return None;
            }
            if line.trim().is_empty() {
                continue;
            }

            match parse_input(state, &line) {
                Ok(mv) => return Some(Choice::from(mv)),
                Err(message) => writeln!(self.output, "{}", message).ok()?,
            }
        }
    }

    fn on_rejected(&mut self, _mv: Move, error: &IllegalMove) {
        let _ = writeln!(self.output, "The move is not valid: {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn c(s: &str) -> Coord {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_input() {
        let state = GameState::default();
        assert_eq!(
            parse_input(&state, "C4 B4"),
            Ok(Move::Movement { from: c("C4"), to: c("B4") })
        );
        assert_eq!(
            parse_input(&state, "attack D4 C4"),
            Ok(Move::Attack { from: c("D4"), to: c("C4") })
        );
        assert_eq!(parse_input(&state, "D3 D3"), Ok(Move::SelfDestruct { at: c("D3") }));
        // Friendly target reads as a repair
        assert_eq!(
            parse_input(&state, "E4 E3"),
            Ok(Move::Repair { from: c("E4"), to: c("E3") })
        );
        assert!(parse_input(&state, "Z9 A0").is_err());
        assert!(parse_input(&state, "hello").is_err());
    }

    #[test]
    fn test_reads_until_parseable() {
        let input = Cursor::new("\nnonsense\nC4 B4\n");
        let mut source = HumanSource::new(input, Vec::new());
        let choice = source.choose_move(&GameState::default()).unwrap();
        assert_eq!(choice.mv, Move::Movement { from: c("C4"), to: c("B4") });
        assert!(choice.report.is_none());

        let prompts = String::from_utf8(source.output).unwrap();
        assert!(prompts.contains("cannot understand 'nonsense'"));
    }

    #[test]
    fn test_two_sources_share_stdin() {
        let attacker = HumanSource::stdin();
        let defender = HumanSource::stdin();
        assert_eq!(attacker.name(), defender.name());
    }

    #[test]
    fn test_end_of_input_gives_up() {
        let mut source = HumanSource::new(Cursor::new(""), Vec::new());
        assert!(source.choose_move(&GameState::default()).is_none());
    }
}
