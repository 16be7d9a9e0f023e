use crate::actor::Actor;
use crate::control::common::*;
use crate::errors::{EngineError, EngineResult};
use crate::hand::*;
use crate::listener::Listener;
use crate::model::*;

// Stageの更新はすべてEventを経由して行う
// 更新後にListener,Actorの順でイベントを通知
#[derive(Debug)]
pub struct StageController {
    stage: Stage,
    actors: [Box<dyn Actor>; SEAT],
    listeners: Vec<Box<dyn Listener>>,
}

impl StageController {
    pub fn new(actors: [Box<dyn Actor>; SEAT], listeners: Vec<Box<dyn Listener>>) -> Self {
        Self {
            stage: Stage::default(),
            actors,
            listeners,
        }
    }

    #[inline]
    pub fn get_stage(&self) -> &Stage {
        &self.stage
    }

    // イベントの検証に失敗した場合,Stageは変更されない
    pub fn handle_event(&mut self, event: &Event) -> EngineResult {
        let stg = &mut self.stage;
        match event {
            Event::Begin(e) => event_begin(stg, e),
            Event::New(e) => event_new(stg, e),
            Event::Deal(e) => event_deal(stg, e),
            Event::Discard(e) => event_discard(stg, e),
            Event::Meld(e) => event_meld(stg, e),
            Event::Dora(e) => event_dora(stg, e),
            Event::Win(e) => event_win(stg, e),
            Event::Draw(e) => event_draw(stg, e),
            Event::End(e) => event_end(stg, e),
        }?;
        stg.step += 1;

        if let Event::New(_) = event {
            for (s, a) in self.actors.iter_mut().enumerate() {
                a.init(s);
            }
        }

        let stg = &self.stage;
        // Actorより先にListenerに通知 (Actorが特定のイベントで異常終了する場合に前もって記録するため)
        for a in &mut self.listeners {
            a.notify_event(stg, event);
        }
        for a in &mut self.actors {
            a.notify_event(stg, event);
        }
        Ok(())
    }

    // [Decision]
    pub fn choose_discard(&mut self, seat: Seat, hand: &[Tile], drawn: Option<Tile>) -> Tile {
        self.actors[seat].choose_discard(&self.stage, seat, hand, drawn)
    }

    pub fn respond_to_call_offer(&mut self, offer: &CallOffer) -> bool {
        self.actors[offer.seat].respond_to_call_offer(&self.stage, offer)
    }

    pub fn choose_chii_candidate(&mut self, seat: Seat, candidates: &[Vec<Tile>]) -> usize {
        self.actors[seat].choose_chii_candidate(&self.stage, seat, candidates)
    }

    pub fn declare_riichi(&mut self, seat: Seat, waits: &[Tile]) -> bool {
        self.actors[seat].declare_riichi(&self.stage, seat, waits)
    }

    pub fn declare_concealed_kan(&mut self, seat: Seat, tile: Tile) -> bool {
        self.actors[seat].declare_concealed_kan(&self.stage, seat, tile)
    }

    pub fn declare_tsumo(&mut self, seat: Seat, tile: Tile) -> bool {
        self.actors[seat].declare_tsumo(&self.stage, seat, tile)
    }

    pub fn respond_to_ron(&mut self, seat: Seat, tile: Tile, from: Seat) -> bool {
        self.actors[seat].respond_to_ron(&self.stage, seat, tile, from)
    }

    pub fn declare_nine_terminals(&mut self, seat: Seat) -> bool {
        self.actors[seat].declare_nine_terminals(&self.stage, seat)
    }
}

// [Event]
fn event_begin(_stg: &mut Stage, _event: &EventBegin) -> EngineResult {
    Ok(())
}

fn event_new(stg: &mut Stage, event: &EventNew) -> EngineResult {
    if event.hands.iter().any(|h| h.len() != N_HAND) {
        return Err(EngineError::invalid_state("initial hand must have 13 tiles"));
    }

    let step = stg.step;
    *stg = Stage::default();
    stg.step = step;
    stg.rule = event.rule.clone();
    stg.round = event.round;
    stg.dealer = event.dealer;
    stg.dice = event.dice;
    stg.turn = event.dealer;
    stg.wall_count = event.wall_count;
    stg.doras = event.doras.clone();

    let irregular = stg.rule.irregular_hands;
    for s in 0..SEAT {
        let pl = &mut stg.players[s];
        pl.seat = s;
        pl.hand = tiles_to_tile_table(&event.hands[s]);
        pl.win_tiles = winning_tiles(&pl.hand, &pl.melds, irregular);
    }
    Ok(())
}

fn event_deal(stg: &mut Stage, event: &EventDeal) -> EngineResult {
    if stg.wall_count == 0 {
        return Err(EngineError::invalid_state("deal from an empty wall"));
    }
    stg.wall_count -= 1;
    stg.turn = event.seat;
    stg.last_tile = None;

    let pl = &mut stg.players[event.seat];
    inc_tile(&mut pl.hand, event.tile);
    pl.drawn = Some(event.tile);
    Ok(())
}

fn event_discard(stg: &mut Stage, event: &EventDiscard) -> EngineResult {
    let (s, t) = (event.seat, event.tile);
    let step = stg.step;
    let irregular = stg.rule.irregular_hands;
    let pl = &mut stg.players[s];
    if count_tile(&pl.hand, t) == 0 {
        return Err(EngineError::InvalidTileReference { seat: s, tile: t });
    }

    dec_tile(&mut pl.hand, t);
    if event.is_riichi {
        pl.riichi = Some(pl.discards.len());
        pl.is_riichi = true;
        pl.riichi_waits = winning_tiles(&pl.hand, &pl.melds, irregular);
    }
    pl.discards.push(Discard {
        step,
        tile: t,
        is_drawn: event.is_drawn,
    });
    pl.drawn = None;
    pl.win_tiles = winning_tiles(&pl.hand, &pl.melds, irregular);

    stg.turn = s;
    stg.last_tile = Some((s, t));
    Ok(())
}

fn event_meld(stg: &mut Stage, event: &EventMeld) -> EngineResult {
    let s = event.seat;
    let step = stg.step;
    let irregular = stg.rule.irregular_hands;

    // 手牌の検証 (変更前)
    let mut h = stg.players[s].hand;
    for &t in &event.consumed {
        if count_tile(&h, t) == 0 {
            return Err(EngineError::InvalidTileReference { seat: s, tile: t });
        }
        dec_tile(&mut h, t);
    }

    let mut tiles = event.consumed.clone();
    match event.claimed {
        Some((from, t)) => {
            if stg.last_tile != Some((from, t)) {
                return Err(EngineError::invalid_state(format!(
                    "meld on a tile which is not the last discard: {}",
                    t
                )));
            }
            if stg.players[from].discards.last().map(|d| d.tile) != Some(t) {
                return Err(EngineError::invalid_state(format!(
                    "discard pile of seat{} does not end with {}",
                    from, t
                )));
            }
            stg.players[from].discards.pop();
            tiles.push(t);
            stg.last_tile = None;
        }
        None => {
            if event.meld_type != MeldType::ConcealedKan {
                return Err(EngineError::invalid_state("open meld without a claimed tile"));
            }
        }
    }
    tiles.sort();

    if event.meld_type.is_kan() {
        if stg.kan_seats.iter().any(|&k| k != s) {
            stg.is_four_kan_abort = true;
        }
        stg.kan_seats.push(s);
        stg.n_kan += 1;
    }
    stg.turn = s;

    let pl = &mut stg.players[s];
    pl.hand = h;
    pl.drawn = None;
    pl.melds.push(Meld {
        step,
        seat: s,
        meld_type: event.meld_type,
        tiles,
        claimed: event.claimed,
    });
    pl.win_tiles = winning_tiles(&pl.hand, &pl.melds, irregular);
    Ok(())
}

fn event_dora(stg: &mut Stage, event: &EventDora) -> EngineResult {
    stg.doras.push(event.tile);
    Ok(())
}

fn event_win(stg: &mut Stage, event: &EventWin) -> EngineResult {
    stg.turn = event.seat;
    Ok(())
}

fn event_draw(_stg: &mut Stage, _event: &EventDraw) -> EngineResult {
    Ok(())
}

fn event_end(_stg: &mut Stage, _event: &EventEnd) -> EngineResult {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Nop;
    use crate::control::string::tiles_from_string;

    fn tiles(s: &str) -> Vec<Tile> {
        tiles_from_string(s).unwrap()
    }

    fn controller() -> StageController {
        let actors: [Box<dyn Actor>; SEAT] = [
            Box::new(Nop::new()),
            Box::new(Nop::new()),
            Box::new(Nop::new()),
            Box::new(Nop::new()),
        ];
        StageController::new(actors, vec![])
    }

    fn new_round(ctrl: &mut StageController) {
        let hands = [
            tiles("m12345678p12s1z77"),
            tiles("m1235p405s55z1114"),
            tiles("p11s11234z222333"),
            tiles("m999p999s999z5556"),
        ];
        let ev = Event::new(Rule::default(), 0, 0, 7, vec![Tile(TZ, WE)], hands, 70);
        ctrl.handle_event(&ev).unwrap();
    }

    #[test]
    fn test_deal_and_discard() {
        let mut ctrl = controller();
        new_round(&mut ctrl);
        assert_eq!(ctrl.get_stage().step, 1);
        assert_eq!(ctrl.get_stage().players[0].hand_len(), 13);

        ctrl.handle_event(&Event::deal(0, Tile(TZ, DW), false)).unwrap();
        let stg = ctrl.get_stage();
        assert_eq!(stg.wall_count, 69);
        assert_eq!(stg.players[0].drawn, Some(Tile(TZ, DW)));
        assert_eq!(stg.players[0].hand_len(), 14);

        // 手牌にない牌の打牌は拒否され,状態は変わらない
        let err = ctrl.handle_event(&Event::discard(0, Tile(TZ, DG), false, false));
        assert_eq!(
            err,
            Err(EngineError::InvalidTileReference {
                seat: 0,
                tile: Tile(TZ, DG)
            })
        );
        assert_eq!(ctrl.get_stage().players[0].hand_len(), 14);
        // 実在しない牌
        let err = ctrl.handle_event(&Event::discard(0, Tile(TM, 12), false, false));
        assert!(matches!(err, Err(EngineError::InvalidTileReference { seat: 0, .. })));

        ctrl.handle_event(&Event::discard(0, Tile(TZ, DW), true, false)).unwrap();
        let stg = ctrl.get_stage();
        assert_eq!(stg.last_tile, Some((0, Tile(TZ, DW))));
        assert_eq!(stg.players[0].discards.len(), 1);
        assert_eq!(stg.players[0].drawn, None);
    }

    #[test]
    fn test_meld_pops_discard() {
        let mut ctrl = controller();
        new_round(&mut ctrl);
        ctrl.handle_event(&Event::deal(0, Tile(TS, 1), false)).unwrap();
        ctrl.handle_event(&Event::discard(0, Tile(TS, 1), true, false)).unwrap();

        // 直前の打牌ではない
        let ev = Event::meld(2, MeldType::Triplet, tiles("s11"), Some((0, Tile(TS, 2))));
        assert!(ctrl.handle_event(&ev).is_err());
        // seat1はs1を持たない
        let ev = Event::meld(1, MeldType::Triplet, tiles("s11"), Some((0, Tile(TS, 1))));
        assert!(ctrl.handle_event(&ev).is_err());
        assert_eq!(ctrl.get_stage().players[0].discards.len(), 1);

        let ev = Event::meld(2, MeldType::Triplet, tiles("s11"), Some((0, Tile(TS, 1))));
        ctrl.handle_event(&ev).unwrap();
        let stg = ctrl.get_stage();
        assert!(stg.players[0].discards.is_empty());
        assert_eq!(stg.players[2].melds[0].tiles, tiles("s111"));
        assert_eq!(stg.players[2].hand_len(), 11);
        assert_eq!(stg.turn, 2);
        assert_eq!(stg.last_tile, None);
    }

    #[test]
    fn test_kan_seats() {
        let mut ctrl = controller();
        new_round(&mut ctrl);
        // seat3の暗槓 (s999 + ツモs9)
        ctrl.handle_event(&Event::deal(3, Tile(TS, 9), false)).unwrap();
        ctrl.handle_event(&Event::meld(3, MeldType::ConcealedKan, tiles("s9999"), None))
            .unwrap();
        let stg = ctrl.get_stage();
        assert_eq!(stg.n_kan, 1);
        assert!(!stg.is_four_kan_abort);
        assert_eq!(stg.players[3].melds[0].tiles, tiles("s9999"));
        assert_eq!(stg.players[3].hand_len(), 10);

        // 同じプレイヤーの槓では四槓散了の条件を満たさない
        ctrl.handle_event(&Event::deal(3, Tile(TM, 9), false)).unwrap();
        ctrl.handle_event(&Event::meld(3, MeldType::ConcealedKan, tiles("m9999"), None))
            .unwrap();
        assert!(!ctrl.get_stage().is_four_kan_abort);

        // 別のプレイヤーの槓
        ctrl.handle_event(&Event::deal(2, Tile(TZ, 2), false)).unwrap();
        ctrl.handle_event(&Event::meld(2, MeldType::ConcealedKan, tiles("z2222"), None))
            .unwrap();
        let stg = ctrl.get_stage();
        assert_eq!(stg.n_kan, 3);
        assert_eq!(stg.kan_seats, vec![3, 3, 2]);
        assert!(stg.is_four_kan_abort);
    }
}
