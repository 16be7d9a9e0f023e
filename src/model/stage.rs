use super::*;
use crate::util::misc::vec_to_string;

#[derive(Debug, Default, Clone, Serialize)]
pub struct Stage {
    pub rule: Rule,
    pub round: usize,                     // 局数 (対局開始から何局目か)
    pub dealer: Seat,                     // 親の座席
    pub dice: usize,                      // サイコロの目の和
    pub turn: Seat,                       // ツモ番のプレイヤーの座席
    pub step: usize,                      // ステップ イベントを処理する毎に+1する
    pub wall_count: usize,                // 牌山の残り枚数
    pub doras: Vec<Tile>,                 // ドラ表示牌
    pub last_tile: Option<(Seat, Tile)>,  // 他家に鳴かれる(ロンされる)可能性のある捨て牌
    pub n_kan: usize,                     // 槓の回数 (暗槓を含む)
    pub kan_seats: Vec<Seat>,             // 槓を行ったプレイヤー (槓の順)
    pub is_four_kan_abort: bool,          // 複数のプレイヤーが槓を行った (四槓散了の条件)
    pub players: [Player; SEAT],          // 各プレイヤー情報
}

impl Stage {
    // 槓が可能かどうか (嶺上牌と槓ドラの残り,ハイテイ)
    #[inline]
    pub fn can_declare_kan(&self) -> bool {
        self.n_kan < 4 && self.wall_count > 0
    }

    pub fn count_riichi(&self) -> usize {
        self.players.iter().filter(|pl| pl.is_riichi).count()
    }

    // 一巡目で鳴きが発生していない
    pub fn is_no_meld_turn1(&self, seat: Seat) -> bool {
        self.players[seat].discards.is_empty()
            && self.players.iter().all(|pl| pl.melds.is_empty())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "round: {}, dealer: {}, dice: {}, n_kan: {}",
            self.round, self.dealer, self.dice, self.n_kan,
        )?;
        writeln!(
            f,
            "turn: {}, wall_count: {}, doras: {}, last_tile: {:?}",
            self.turn,
            self.wall_count,
            vec_to_string(&self.doras),
            self.last_tile,
        )?;
        writeln!(f)?;

        let boader = "-".to_string().repeat(80);
        write!(f, "{}", boader)?;
        for p in &self.players {
            writeln!(f)?;
            writeln!(f, "{}", p)?;
            write!(f, "{}", boader)?;
        }
        writeln!(f)?;

        Ok(())
    }
}
