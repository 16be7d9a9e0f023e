use std::fmt;

use crate::model::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    // 手牌に存在しない牌を参照した (状態は変更されない)
    InvalidTileReference { seat: Seat, tile: Tile },
    // 条件を満たさない鳴きが受理された
    MalformedCallAttempt {
        seat: Seat,
        call: CallType,
        tile: Tile,
    },
    // 牌の総数の不一致など構造的な不整合
    InvalidState { message: String },
}

impl EngineError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileReference { seat, tile } => {
                write!(f, "invalid tile reference: seat{} does not hold {}", seat, tile)
            }
            Self::MalformedCallAttempt { seat, call, tile } => {
                write!(f, "malformed call: seat{} cannot {} on {}", seat, call, tile)
            }
            Self::InvalidState { message } => {
                write!(f, "invalid state: {}", message)
            }
        }
    }
}

impl std::error::Error for EngineError {}

pub type EngineResult<T = ()> = Result<T, EngineError>;
