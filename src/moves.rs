use serde::{Deserialize, Serialize};

use crate::error::ChessError;
use crate::piece::{PROMOTION_KINDS, PieceKind};
use crate::square::Square;


// Equality is structural, which makes pseudo-legal membership tests trivial.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Move { from, to, promotion: None }
    }
    pub const fn promoting(from: Square, to: Square, kind: PieceKind) -> Self {
        Move { from, to, promotion: Some(kind) }
    }

    // Accepts 4 or 5 characters; the promotion letter is case-insensitive.
    pub fn from_uci(uci: &str) -> Result<Self, ChessError> {
        let err = |message: &str| ChessError::UciParse {
            message: message.to_owned(),
            uci: uci.to_owned(),
        };
        if !uci.is_ascii() || (uci.len() != 4 && uci.len() != 5) {
            return Err(err("expected 4 or 5 ASCII characters"));
        }
        let from = Square::from_algebraic(&uci[0..2]).map_err(|_| err("bad from-square"))?;
        let to = Square::from_algebraic(&uci[2..4]).map_err(|_| err("bad to-square"))?;
        let promotion = match uci[4..].chars().next() {
            None => None,
            Some(ch) => {
                let kind = PieceKind::from_ascii(ch)
                    .filter(|kind| PROMOTION_KINDS.contains(kind))
                    .ok_or_else(|| err("bad promotion piece"))?;
                Some(kind)
            }
        };
        Ok(Move { from, to, promotion })
    }

    // Promotion letters are always emitted lowercase.
    pub fn to_uci(&self) -> String {
        let mut uci = format!("{}{}", self.from.to_algebraic(), self.to.to_algebraic());
        if let Some(kind) = self.promotion {
            uci.push(kind.to_ascii());
        }
        uci
    }
}
