use super::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Begin(EventBegin),     // ゲーム開始
    New(EventNew),         // 局開始
    Deal(EventDeal),       // ツモ
    Discard(EventDiscard), // 打牌
    Meld(EventMeld),       // 鳴き,暗槓
    Dora(EventDora),       // 新ドラ
    Win(EventWin),         // 局終了 (和了)
    Draw(EventDraw),       // 局終了 (流局)
    End(EventEnd),         // ゲーム終了
}

impl Event {
    #[inline]
    pub fn begin() -> Self {
        Self::Begin(EventBegin {})
    }

    #[inline]
    pub fn new(
        rule: Rule,
        round: usize,
        dealer: Seat,
        dice: usize,
        doras: Vec<Tile>,
        hands: [Vec<Tile>; SEAT],
        wall_count: usize,
    ) -> Self {
        Self::New(EventNew {
            rule,
            round,
            dealer,
            dice,
            doras,
            hands,
            wall_count,
        })
    }

    #[inline]
    pub fn deal(seat: Seat, tile: Tile, is_replacement: bool) -> Self {
        Self::Deal(EventDeal {
            seat,
            tile,
            is_replacement,
        })
    }

    #[inline]
    pub fn discard(seat: Seat, tile: Tile, is_drawn: bool, is_riichi: bool) -> Self {
        Self::Discard(EventDiscard {
            seat,
            tile,
            is_drawn,
            is_riichi,
        })
    }

    #[inline]
    pub fn meld(
        seat: Seat,
        meld_type: MeldType,
        consumed: Vec<Tile>,
        claimed: Option<(Seat, Tile)>,
    ) -> Self {
        Self::Meld(EventMeld {
            seat,
            meld_type,
            consumed,
            claimed,
        })
    }

    #[inline]
    pub fn dora(tile: Tile) -> Self {
        Self::Dora(EventDora { tile })
    }

    #[inline]
    pub fn win(
        seat: Seat,
        win_type: WinType,
        tile: Tile,
        from: Seat,
        hand: Vec<Tile>,
        melds: Vec<Meld>,
    ) -> Self {
        Self::Win(EventWin {
            seat,
            win_type,
            tile,
            from,
            hand,
            melds,
        })
    }

    #[inline]
    pub fn draw(draw_type: DrawType, tenpais: [bool; SEAT]) -> Self {
        Self::Draw(EventDraw { draw_type, tenpais })
    }

    #[inline]
    pub fn end() -> Self {
        Self::End(EventEnd {})
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBegin {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventNew {
    pub rule: Rule,
    pub round: usize,             // 局数
    pub dealer: Seat,             // 親
    pub dice: usize,              // 王牌の位置を決めたサイコロの目
    pub doras: Vec<Tile>,         // ドラ表示牌
    pub hands: [Vec<Tile>; SEAT], // 各プレイヤーの配牌(13枚)
    pub wall_count: usize,        // 牌山残り枚数
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDeal {
    pub seat: Seat,
    pub tile: Tile,            // ツモ牌
    pub is_replacement: bool,  // 嶺上牌
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDiscard {
    pub seat: Seat,
    pub tile: Tile,
    pub is_drawn: bool,  // ツモ切り
    pub is_riichi: bool, // リーチ宣言
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMeld {
    pub seat: Seat,
    pub meld_type: MeldType,             // 鳴き種別
    pub consumed: Vec<Tile>,             // 手牌から消費される牌
    pub claimed: Option<(Seat, Tile)>,   // 鳴いた捨て牌 (暗槓はNone)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDora {
    pub tile: Tile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventWin {
    pub seat: Seat,
    pub win_type: WinType,
    pub tile: Tile,        // 和了牌
    pub from: Seat,        // 放銃者 (ツモの場合は和了者自身)
    pub hand: Vec<Tile>,   // 和了牌を除く手牌
    pub melds: Vec<Meld>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraw {
    pub draw_type: DrawType,
    pub tenpais: [bool; SEAT], // 流局時に聴牌していたプレイヤー
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnd {}

// [DrawType]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawType {
    Exhaustive,    // 荒牌平局
    NineTerminals, // 九種九牌
    FourWinds,     // 四風連打
    FourKans,      // 四槓散了
    FourRiichi,    // 四家立直
}

impl fmt::Display for DrawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DrawType::Exhaustive => "荒牌平局",
                DrawType::NineTerminals => "九種九牌",
                DrawType::FourWinds => "四風連打",
                DrawType::FourKans => "四槓散了",
                DrawType::FourRiichi => "四家立直",
            }
        )
    }
}
