// 麻雀のデータモデル
mod action;
mod define;
mod event;
mod meld;
mod player;
mod rule;
mod stage;
mod tile;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use action::*;
pub use define::*;
pub use event::*;
pub use meld::*;
pub use player::*;
pub use rule::*;
pub use stage::*;
pub use tile::*;
