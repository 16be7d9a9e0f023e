// 手牌の和了判定を行うモジュール
mod win;

pub use self::win::{
    decompose, is_chiitoitsu_win, is_complete, is_kokushimusou_win, is_winning_hand,
    tenpai_discards, wait_tiles, winning_discards, winning_tiles, Block, Decomposition,
};
