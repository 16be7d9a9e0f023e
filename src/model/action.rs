use super::*;

// 他家の打牌に対する鳴きの種別 (優先度順)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CallType {
    Kan,  // 大明槓
    Pon,  // ポン
    Chii, // チー
}

impl CallType {
    #[inline]
    pub fn meld_type(&self) -> MeldType {
        match self {
            Self::Kan => MeldType::OpenKan,
            Self::Pon => MeldType::Triplet,
            Self::Chii => MeldType::Sequence,
        }
    }

    // 手牌から消費する牌の数
    #[inline]
    pub fn consumed_count(&self) -> usize {
        match self {
            Self::Kan => 3,
            Self::Pon | Self::Chii => 2,
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinType {
    Tsumo,
    Ron,
}

// 鳴きの候補
// consumedは鳴きにより手牌から消失する牌 (チーの場合は選択肢ごとに1要素)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOffer {
    pub seat: Seat,
    pub call_type: CallType,
    pub tile: Tile,
    pub candidates: Vec<Vec<Tile>>,
}

impl fmt::Display for CallOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "seat{} {} {} {:?}",
            self.seat, self.call_type, self.tile, self.candidates
        )
    }
}
