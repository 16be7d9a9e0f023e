use super::*;
use crate::util::misc::vec_to_string;

#[derive(Debug, Default, Clone, Serialize)]
pub struct Player {
    pub seat: Seat,               // 座席番号
    pub hand: TileTable,          // 手牌(4x10の配列)
    pub drawn: Option<Tile>,      // ツモ牌
    pub melds: Vec<Meld>,         // 鳴き一覧 (暗槓を含む)
    pub discards: Vec<Discard>,   // 捨て牌一覧 (鳴かれた牌は取り除かれる)
    pub riichi: Option<Index>,    // リーチ宣言牌のdiscardsにおけるindex
    pub is_riichi: bool,          // リーチ
    pub riichi_waits: Vec<Tile>,  // リーチ宣言時に固定された待ち牌
    pub win_tiles: Vec<Tile>,     // 聴牌時の和了牌 (打牌ごとに更新)
}

impl Player {
    pub fn hand_len(&self) -> usize {
        self.hand.iter().map(|tr| tr[1..].iter().sum::<usize>()).sum()
    }

    // 副露(暗槓を除く)がない
    pub fn is_menzen(&self) -> bool {
        self.melds.iter().all(|m| !m.meld_type.is_open())
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hand = vec![];
        for ti in 0..TYPE {
            for ni in 1..TNUM {
                let e = self.hand[ti][ni];
                for c in 0..e {
                    if ti != TZ && ni == 5 && c < self.hand[ti][0] {
                        hand.push(Tile(ti, 0)); // 赤5
                    } else {
                        hand.push(Tile(ti, ni));
                    }
                }
            }
        }
        let drawn = if let Some(d) = self.drawn {
            d.to_string()
        } else {
            "None".to_string()
        };
        writeln!(
            f,
            "seat: {}, riichi: {:?}, drawn: {}, win_tiles: {}",
            self.seat,
            self.riichi,
            drawn,
            vec_to_string(&self.win_tiles),
        )?;
        writeln!(f, "hand: {}", vec_to_string(&hand))?;
        writeln!(f, "melds: {}", vec_to_string(&self.melds))?;
        write!(f, "discards: {}", vec_to_string(&self.discards))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Discard {
    pub step: usize,
    pub tile: Tile,
    pub is_drawn: bool,           // ツモ切りフラグ
}

impl fmt::Display for Discard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tile)
    }
}
