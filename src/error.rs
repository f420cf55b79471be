use thiserror::Error;


// All failures that cross the core boundary. Validation and legality errors
// surface to the caller unchanged; the core never swallows them.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum ChessError {
    #[error("invalid square {0:?}")]
    InvalidSquare(String),

    #[error("cannot parse FEN {fen:?}: {message}")]
    FenParse { message: String, fen: String },

    #[error("cannot parse UCI move {uci:?}: {message}")]
    UciParse { message: String, uci: String },

    #[error("cannot parse SAN {san:?}: {message}")]
    SanParse { message: String, san: String },

    #[error("ambiguous move {0}")]
    AmbiguousMove(String),

    #[error("illegal move {uci}: {message}")]
    IllegalMove { message: String, uci: String },

    #[error("move {0} leaves own king in check")]
    KingInCheck(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("PGN write error: {0}")]
    PgnWrite(String),

    #[error("invalid variation tree: {0}")]
    InvalidVariation(String),

    #[error("node {node_id} references missing parent {parent_id}")]
    ParentNotFound { node_id: String, parent_id: String },

    #[error("session {0:?} already exists")]
    SessionExists(String),

    #[error("session {0:?} not found")]
    SessionNotFound(String),
}

impl ChessError {
    pub fn illegal_move(uci: impl Into<String>, message: impl Into<String>) -> Self {
        ChessError::IllegalMove { message: message.into(), uci: uci.into() }
    }
}
