// Classic six-field FEN. Parsing checks shape only; position plausibility
// (piece counts, pawns on back ranks) is left to external validators.

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::board::{BoardState, CastleSide, CastlingRights, no_castling_rights};
use crate::color::Color;
use crate::error::ChessError;
use crate::piece::Piece;
use crate::square::{File, NUM_FILES, NUM_RANKS, Rank, Square};


pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub fn starting_position() -> BoardState {
    parse_fen(STARTING_FEN).unwrap()
}


fn parse_error(fen: &str, message: impl Into<String>) -> ChessError {
    ChessError::FenParse { message: message.into(), fen: fen.to_owned() }
}

fn turn_from_fen(fen: &str, s: &str) -> Result<Color, ChessError> {
    match s {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(parse_error(fen, format!("invalid side to move: {s}"))),
    }
}

fn turn_to_fen(turn: Color) -> char {
    match turn {
        Color::White => 'w',
        Color::Black => 'b',
    }
}

fn castling_char(color: Color, side: CastleSide) -> char {
    let ch = match side {
        CastleSide::Kingside => 'k',
        CastleSide::Queenside => 'q',
    };
    match color {
        Color::White => ch.to_ascii_uppercase(),
        Color::Black => ch,
    }
}

fn castling_from_fen(fen: &str, s: &str) -> Result<CastlingRights, ChessError> {
    let mut rights = no_castling_rights();
    if s == "-" {
        return Ok(rights);
    }
    // "KQkq" order is mandatory and each right may appear at most once.
    let order = Color::iter()
        .cartesian_product(CastleSide::iter())
        .map(|(color, side)| (castling_char(color, side), color, side))
        .collect_vec();
    let mut next = 0;
    for ch in s.chars() {
        let found = order[next..].iter().position(|&(expected, _, _)| expected == ch);
        match found {
            Some(offset) => {
                let (_, color, side) = order[next + offset];
                rights[color][side] = true;
                next += offset + 1;
            }
            None => return Err(parse_error(fen, format!("invalid castling field: {s}"))),
        }
    }
    Ok(rights)
}

fn castling_to_fen(rights: &CastlingRights) -> String {
    let s: String = Color::iter()
        .cartesian_product(CastleSide::iter())
        .filter(|&(color, side)| rights[color][side])
        .map(|(color, side)| castling_char(color, side))
        .collect();
    if s.is_empty() { "-".to_owned() } else { s }
}

fn grid_from_fen(fen: &str, s: &str, state: &mut BoardState) -> Result<(), ChessError> {
    let rows = s.split('/').collect_vec();
    if rows.len() as u8 != NUM_RANKS {
        return Err(parse_error(fen, format!("expected {NUM_RANKS} ranks, got {}", rows.len())));
    }
    // The board field runs from rank 8 down to rank 1.
    for (row_idx, row) in rows.iter().enumerate() {
        let rank = Rank::from_zero_based(NUM_RANKS - 1 - row_idx as u8).unwrap();
        let mut file_idx: u8 = 0;
        for ch in row.chars() {
            if let Some(n) = ch.to_digit(10) {
                if n < 1 || n > 8 {
                    return Err(parse_error(fen, format!("invalid empty-square run: {ch}")));
                }
                file_idx += n as u8;
            } else {
                let piece = Piece::from_ascii(ch)
                    .ok_or_else(|| parse_error(fen, format!("unknown piece symbol: {ch}")))?;
                let file = File::from_zero_based(file_idx).ok_or_else(|| {
                    parse_error(fen, format!("rank {} overflows", rank.to_algebraic()))
                })?;
                state.set_piece(Square::new(file, rank), Some(piece));
                file_idx += 1;
            }
        }
        if file_idx != NUM_FILES {
            return Err(parse_error(
                fen,
                format!("rank {} has {file_idx} files, expected {NUM_FILES}", rank.to_algebraic()),
            ));
        }
    }
    Ok(())
}

fn grid_to_fen(state: &BoardState) -> String {
    Rank::all()
        .rev()
        .map(|rank| {
            let mut row = String::new();
            let mut empty_run: u8 = 0;
            for file in File::all() {
                match state.piece(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_run > 0 {
                            row.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        row.push(piece.to_ascii());
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                row.push_str(&empty_run.to_string());
            }
            row
        })
        .join("/")
}

pub fn parse_fen(fen: &str) -> Result<BoardState, ChessError> {
    let (grid_field, turn_field, castling_field, en_passant_field, halfmove_field, fullmove_field) =
        fen.split_whitespace()
            .collect_tuple()
            .ok_or_else(|| parse_error(fen, "expected 6 whitespace-separated fields"))?;

    let mut state = BoardState::empty();
    grid_from_fen(fen, grid_field, &mut state)?;
    state.turn = turn_from_fen(fen, turn_field)?;
    state.castling_rights = castling_from_fen(fen, castling_field)?;
    state.en_passant_square = match en_passant_field {
        "-" => None,
        s => Some(
            Square::from_algebraic(s)
                .map_err(|_| parse_error(fen, format!("invalid en passant square: {s}")))?,
        ),
    };
    state.halfmove_clock = halfmove_field
        .parse()
        .map_err(|_| parse_error(fen, format!("invalid halfmove clock: {halfmove_field}")))?;
    state.fullmove_number = fullmove_field
        .parse()
        .map_err(|_| parse_error(fen, format!("invalid fullmove number: {fullmove_field}")))?;
    if state.fullmove_number < 1 {
        return Err(parse_error(fen, "fullmove number must be at least 1"));
    }
    Ok(state)
}

pub fn board_to_fen(state: &BoardState) -> String {
    format!(
        "{} {} {} {} {} {}",
        grid_to_fen(state),
        turn_to_fen(state.turn),
        castling_to_fen(&state.castling_rights),
        state.en_passant_square.map_or("-".to_owned(), |sq| sq.to_algebraic()),
        state.halfmove_clock,
        state.fullmove_number,
    )
}
