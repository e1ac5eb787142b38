/// ----- PANEL MODULE -----
/// Console stand-in for the hall call buttons. Reads lines such as `12 up`
/// or `-1 down` and puts them on the request board. `quit` stops the program.

use std::io::{self, BufRead};
use std::sync::Arc;

use crossbeam_channel::Sender;
use log::{info, warn};
use thiserror::Error;

use shared_resources::call_message::CallMessage;
use shared_resources::direction::{Direction, ParseDirectionError};

use crate::utilities::request_board::RequestBoard;

use super::submit_call;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Call(CallMessage),
    Quit,
    Nothing,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PanelError {
    #[error("expected `<floor> <up|down>`, got `{0}`")]
    Malformed(String),

    #[error("`{0}` is not a floor number")]
    BadFloor(String),

    #[error(transparent)]
    BadDirection(#[from] ParseDirectionError),
}

pub fn parse_line(line: &str) -> Result<Command, PanelError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => Ok(Command::Nothing),
        [word] if word.eq_ignore_ascii_case("quit") || word.eq_ignore_ascii_case("exit") => Ok(Command::Quit),
        [floor, direction] => {
            let floor = floor.parse::<i32>().map_err(|_| PanelError::BadFloor(floor.to_string()))?;
            let direction = direction.parse::<Direction>()?;
            Ok(Command::Call(CallMessage::new(floor, direction)))
        }
        _ => Err(PanelError::Malformed(line.trim().to_string())),
    }
}

pub fn main<R: BufRead>(mut input: R, board: Arc<RequestBoard>, quit_tx: Sender<()>) {
    let mut raw = Vec::new();
    loop {
        raw.clear();
        match input.read_until(b'\n', &mut raw) {
            Ok(0) => break,
            Ok(_) => {},
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Could not read from the panel: {}", e);
                break;
            },
        }
        // invalid UTF-8 turns into a malformed line
        let line = String::from_utf8_lossy(&raw);
        match parse_line(&line) {
            Ok(Command::Call(call)) => {
                // rejections are already logged
                submit_call(&board, call, "panel").ok();
            },
            Ok(Command::Quit) => {
                quit_tx.send(()).ok();
                return
            },
            Ok(Command::Nothing) => {},
            Err(e) => warn!("Ignoring panel input: {}", e),
        }
    }
    info!("Panel input closed, calls are still accepted over the network");
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use crossbeam_channel::unbounded;
    use shared_resources::floor_range::FloorRange;

    #[test]
    fn parses_calls_and_commands() {
        assert_eq!(parse_line("12 up"), Ok(Command::Call(CallMessage::new(12, Direction::Up))));
        assert_eq!(parse_line("  -2   DOWN "), Ok(Command::Call(CallMessage::new(-2, Direction::Down))));
        assert_eq!(parse_line("quit"), Ok(Command::Quit));
        assert_eq!(parse_line("EXIT"), Ok(Command::Quit));
        assert_eq!(parse_line("   "), Ok(Command::Nothing));
    }

    #[test]
    fn reports_bad_lines() {
        assert_eq!(parse_line("twelve up"), Err(PanelError::BadFloor("twelve".to_string())));
        assert_eq!(
            parse_line("3 sideways"),
            Err(PanelError::BadDirection(ParseDirectionError("sideways".to_string())))
        );
        assert_eq!(parse_line("3 up now"), Err(PanelError::Malformed("3 up now".to_string())));
    }

    #[test]
    fn submits_valid_calls_and_skips_the_rest() {
        let board = Arc::new(RequestBoard::new(FloorRange::new(-2, 20).unwrap()));
        let (quit_tx, quit_rx) = unbounded();
        let input = Cursor::new("12 up\n20 up\nnonsense\n-1 down\n");

        main(input, Arc::clone(&board), quit_tx);

        assert_eq!(board.has_waiting_request(Direction::Up, 12), Ok(true));
        assert_eq!(board.has_waiting_request(Direction::Up, 20), Ok(false));
        assert_eq!(board.has_waiting_request(Direction::Down, -1), Ok(true));
        assert!(quit_rx.try_recv().is_err());
    }

    #[test]
    fn non_utf8_line_is_skipped_without_closing_the_panel() {
        let board = Arc::new(RequestBoard::new(FloorRange::new(0, 20).unwrap()));
        let (quit_tx, _quit_rx) = unbounded();
        let input = Cursor::new(b"3 up\n\xff\xfe up\n12 down\n".to_vec());

        main(input, Arc::clone(&board), quit_tx);

        assert_eq!(board.has_waiting_request(Direction::Up, 3), Ok(true));
        assert_eq!(board.has_waiting_request(Direction::Down, 12), Ok(true));
    }

    #[test]
    fn last_line_without_newline_still_counts() {
        let board = Arc::new(RequestBoard::new(FloorRange::new(0, 5).unwrap()));
        let (quit_tx, _quit_rx) = unbounded();

        main(Cursor::new("2 down"), Arc::clone(&board), quit_tx);

        assert_eq!(board.has_waiting_request(Direction::Down, 2), Ok(true));
    }

    #[test]
    fn quit_stops_reading() {
        let board = Arc::new(RequestBoard::new(FloorRange::new(0, 5).unwrap()));
        let (quit_tx, quit_rx) = unbounded();

        main(Cursor::new("quit\n3 up\n"), Arc::clone(&board), quit_tx);

        assert_eq!(quit_rx.try_recv(), Ok(()));
        assert_eq!(board.has_waiting_request(Direction::Up, 3), Ok(false));
    }
}
