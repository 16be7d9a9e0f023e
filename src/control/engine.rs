use std::collections::VecDeque;

use rand::prelude::*;

use super::call::*;
use super::common::*;
use super::dead_wall::DeadWall;
use super::stage_controller::StageController;
use super::wall::{build_layout, roll_dice, WallLayout};
use crate::actor::{default_discard, Actor};
use crate::errors::{EngineError, EngineResult};
use crate::hand::*;
use crate::listener::Listener;
use crate::model::*;
use crate::{debug, info, warn};

// [Engine]
// 局の進行状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitDraw,         // ツモ待ち (嶺上牌を含む)
    AwaitDiscard,      // ツモ番のプレイヤーの行動(和了,暗槓,リーチ,打牌)待ち
    AwaitCallResponse, // 打牌に対する他家の応答(ロン,鳴き)待ち
    HandComplete,      // 和了
    WallExhausted,     // 荒牌平局
    Aborted,           // 途中流局
}

impl TurnState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::HandComplete | Self::WallExhausted | Self::Aborted
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundResult {
    Win {
        seat: Seat,
        win_type: WinType,
        tile: Tile,
        from: Seat,
    },
    Draw {
        draw_type: DrawType,
        tenpais: [bool; SEAT],
    },
}

#[derive(Debug)]
struct NextRoundInfo {
    round: usize,
    dealer: Seat,
}

#[derive(Debug)]
pub struct MahjongEngine {
    seed: u64,          // 牌山生成用の乱数のシード値
    rng: StdRng,        // 乱数 (牌山生成,サイコロ)
    fixed_dice: Option<usize>,
    // ゲーム制御
    rule: Rule,
    ctrl: StageController,
    state: TurnState,
    next_seat: Seat,           // 次にツモを行うプレイヤー
    replacement_pending: bool, // 次のツモが嶺上牌
    round_result: Option<RoundResult>,
    next_round_info: NextRoundInfo,
    // 牌山
    draw_queue: VecDeque<Tile>,
    dead_wall: Option<DeadWall>,
}

impl MahjongEngine {
    pub fn new(
        seed: u64,
        rule: Rule,
        actors: [Box<dyn Actor>; SEAT],
        listeners: Vec<Box<dyn Listener>>,
    ) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            fixed_dice: None,
            rule,
            ctrl: StageController::new(actors, listeners),
            state: TurnState::AwaitDraw,
            next_seat: 0,
            replacement_pending: false,
            round_result: None,
            next_round_info: NextRoundInfo { round: 0, dealer: 0 },
            draw_queue: VecDeque::new(),
            dead_wall: None,
        }
    }

    // サイコロの目を固定 (Noneの場合は毎局2d6)
    pub fn set_fixed_dice(&mut self, dice: Option<usize>) {
        if let Some(d) = dice {
            assert!((2..=12).contains(&d), "dice out of range: {}", d);
        }
        self.fixed_dice = dice;
    }

    #[inline]
    pub fn get_stage(&self) -> &Stage {
        self.ctrl.get_stage()
    }

    #[inline]
    pub fn get_state(&self) -> TurnState {
        self.state
    }

    #[inline]
    pub fn get_round_result(&self) -> Option<&RoundResult> {
        self.round_result.as_ref()
    }

    #[inline]
    pub fn get_draw_queue(&self) -> &VecDeque<Tile> {
        &self.draw_queue
    }

    #[inline]
    pub fn get_dead_wall(&self) -> Option<&DeadWall> {
        self.dead_wall.as_ref()
    }

    // 対局全体 (Begin, 各局, End)
    pub fn run(&mut self) -> EngineResult<Vec<RoundResult>> {
        debug!("game start: seed={}", self.seed);
        self.handle_event(Event::begin())?;
        let mut results = vec![];
        for _ in 0..self.rule.hands {
            let res = self.run_round()?;
            info!("round {}: {:?}", self.next_round_info.round, res);

            let info = &mut self.next_round_info;
            match res {
                RoundResult::Win { seat, .. } if seat == info.dealer => {} // 連荘
                _ => info.dealer = (info.dealer + 1) % SEAT,
            }
            info.round += 1;
            results.push(res);
        }
        self.handle_event(Event::end())?;
        Ok(results)
    }

    pub fn run_round(&mut self) -> EngineResult<RoundResult> {
        self.start_round()?;
        self.play_round()
    }

    // 現在の局を終了まで進める
    pub fn play_round(&mut self) -> EngineResult<RoundResult> {
        while !self.state.is_terminal() {
            self.step()?;
        }
        self.round_result
            .clone()
            .ok_or_else(|| EngineError::invalid_state("round ended without result"))
    }

    pub fn start_round(&mut self) -> EngineResult {
        let dice = self
            .fixed_dice
            .unwrap_or_else(|| roll_dice(&mut self.rng));
        let dealer = self.next_round_info.dealer;
        let layout = build_layout(&mut self.rng, self.rule.red5, dice, dealer);
        self.start_round_with_layout(layout)
    }

    pub fn start_round_with_layout(&mut self, layout: WallLayout) -> EngineResult {
        let WallLayout {
            dice,
            hands,
            draw_queue,
            dead_wall,
        } = layout;
        let doras = dead_wall.indicators();
        let wall_count = draw_queue.len();
        self.draw_queue = draw_queue;
        self.dead_wall = Some(dead_wall);

        let rn = &self.next_round_info;
        self.next_seat = rn.dealer;
        self.replacement_pending = false;
        self.round_result = None;
        self.state = TurnState::AwaitDraw;

        let event = Event::new(
            self.rule.clone(),
            rn.round,
            rn.dealer,
            dice,
            doras,
            hands,
            wall_count,
        );
        self.handle_event(event)?;
        self.check_tile_count()
    }

    // 状態遷移を1回行う
    pub fn step(&mut self) -> EngineResult<TurnState> {
        match self.state {
            TurnState::AwaitDraw => self.do_deal()?,
            TurnState::AwaitDiscard => self.do_turn_operation()?,
            TurnState::AwaitCallResponse => self.do_call_operation()?,
            _ => return Ok(self.state),
        }
        self.check_tile_count()?;
        Ok(self.state)
    }

    #[inline]
    fn handle_event(&mut self, event: Event) -> EngineResult {
        self.ctrl.handle_event(&event)
    }

    fn do_deal(&mut self) -> EngineResult {
        let s = self.next_seat;
        let event = if self.replacement_pending {
            let dw = self
                .dead_wall
                .as_mut()
                .ok_or_else(|| EngineError::invalid_state("dead wall is not built"))?;
            let tail = self
                .draw_queue
                .pop_back()
                .ok_or_else(|| EngineError::invalid_state("no live tile to refill the dead wall"))?;
            let t = dw.draw_replacement(tail)?;
            self.replacement_pending = false;
            Event::deal(s, t, true)
        } else {
            let t = self
                .draw_queue
                .pop_front()
                .ok_or_else(|| EngineError::invalid_state("deal from an empty wall"))?;
            Event::deal(s, t, false)
        };
        self.handle_event(event)?;
        self.state = TurnState::AwaitDiscard;
        Ok(())
    }

    fn do_turn_operation(&mut self) -> EngineResult {
        let stg = self.ctrl.get_stage();
        let s = stg.turn;
        let pl = &stg.players[s];
        let hand = pl.hand;
        let melds = pl.melds.clone();
        let drawn = pl.drawn;
        let is_riichi = pl.is_riichi;
        let is_menzen = pl.is_menzen();
        let riichi_waits = pl.riichi_waits.clone();
        let can_kan = stg.can_declare_kan();
        let wall_count = stg.wall_count;
        let is_turn1 = stg.is_no_meld_turn1(s);
        let irregular = self.rule.irregular_hands;

        if let Some(t) = drawn {
            // ツモ和了
            let can_tsumo = if is_riichi {
                riichi_waits.contains(&t.to_normal())
            } else {
                is_winning_hand(&hand, &melds, irregular)
            };
            if can_tsumo && (is_riichi || self.ctrl.declare_tsumo(s, t)) {
                return self.do_event_win(s, WinType::Tsumo, t, s);
            }

            // 九種九牌
            if self.rule.abortive_draw
                && is_turn1
                && count_end_kinds(&hand) >= 9
                && self.ctrl.declare_nine_terminals(s)
            {
                return self.do_event_draw(DrawType::NineTerminals);
            }

            // 暗槓
            if !is_riichi && can_kan {
                let kans: Vec<Tile> = distinct_tiles(&hand)
                    .into_iter()
                    .map(|t| t.to_normal())
                    .filter(|t| hand[t.0][t.1] == TILE)
                    .collect();
                for k in kans {
                    if !self.ctrl.declare_concealed_kan(s, k) {
                        continue;
                    }
                    let consumed = take_copies(&hand, k, TILE);
                    self.handle_event(Event::meld(s, MeldType::ConcealedKan, consumed, None))?;
                    self.reveal_dora()?;
                    self.replacement_pending = true;
                    self.next_seat = s;
                    self.state = TurnState::AwaitDraw;
                    return Ok(());
                }
            }

            // リーチ中はツモ切り
            if is_riichi {
                return self.do_event_discard(s, t, true, false);
            }

            // リーチ宣言 (ツモ前の13枚で聴牌)
            if is_menzen && wall_count >= 4 {
                let mut h = hand;
                dec_tile(&mut h, t);
                let waits = winning_tiles(&h, &melds, irregular);
                if !waits.is_empty() && self.ctrl.declare_riichi(s, &waits) {
                    return self.do_event_discard(s, t, true, true);
                }
            }
        }

        let tiles = tiles_from_tile_table(&hand);
        let mut d = self.ctrl.choose_discard(s, &tiles, drawn);
        if !d.is_valid() || count_tile(&hand, d) == 0 {
            warn!("seat{}: invalid discard {}, fallback to tsumogiri", s, d);
            d = default_discard(&tiles, drawn);
        }
        self.do_event_discard(s, d, drawn == Some(d), false)
    }

    fn do_call_operation(&mut self) -> EngineResult {
        let stg = self.ctrl.get_stage();
        let (d, t) = stg
            .last_tile
            .ok_or_else(|| EngineError::invalid_state("no discard to respond to"))?;
        let irregular = self.rule.irregular_hands;

        // ロン (打牌者から近い順に最初の1人のみ)
        let ron_seats: Vec<Seat> = seats_after(d)
            .filter(|&s| {
                let pl = &stg.players[s];
                if pl.is_riichi {
                    pl.riichi_waits.contains(&t.to_normal())
                } else {
                    let mut h = pl.hand;
                    inc_tile(&mut h, t);
                    is_winning_hand(&h, &pl.melds, irregular)
                }
            })
            .collect();
        for s in ron_seats {
            if self.ctrl.respond_to_ron(s, t, d) {
                return self.do_event_win(s, WinType::Ron, t, d);
            }
        }

        // 途中流局
        if self.rule.abortive_draw {
            let stg = self.ctrl.get_stage();
            if stg.n_kan == 4 && stg.is_four_kan_abort {
                return self.do_event_draw(DrawType::FourKans);
            }
            if stg.count_riichi() == SEAT {
                return self.do_event_draw(DrawType::FourRiichi);
            }
            if is_four_winds(stg) {
                return self.do_event_draw(DrawType::FourWinds);
            }
        }

        // 鳴き
        let offers = calc_call_offers(self.ctrl.get_stage(), d, t);
        for offer in offers {
            debug!("call offer: {}", offer);
            if !self.ctrl.respond_to_call_offer(&offer) {
                continue;
            }

            let consumed = match offer.call_type {
                CallType::Chii => {
                    let cands = &offer.candidates;
                    if cands.is_empty() {
                        return Err(EngineError::invalid_state("chii offered without candidates"));
                    }
                    let mut i = 0;
                    if cands.len() > 1 {
                        i = self.ctrl.choose_chii_candidate(offer.seat, cands);
                        if i >= cands.len() {
                            warn!("seat{}: invalid chii candidate {}, fallback to 0", offer.seat, i);
                            i = 0;
                        }
                    }
                    cands[i].clone()
                }
                _ => offer.candidates.first().cloned().ok_or_else(|| {
                    EngineError::invalid_state(format!("{} offered without tiles", offer.call_type))
                })?,
            };
            validate_call(
                self.ctrl.get_stage(),
                offer.seat,
                offer.call_type,
                d,
                t,
                &consumed,
            )?;

            let meld_type = offer.call_type.meld_type();
            self.handle_event(Event::meld(offer.seat, meld_type, consumed, Some((d, t))))?;
            if meld_type.is_kan() {
                self.reveal_dora()?;
                self.replacement_pending = true;
                self.next_seat = offer.seat;
                self.state = TurnState::AwaitDraw;
            } else {
                self.state = TurnState::AwaitDiscard;
            }
            return Ok(());
        }

        // 荒牌平局
        if self.draw_queue.is_empty() {
            return self.do_event_draw(DrawType::Exhaustive);
        }

        self.next_seat = (d + 1) % SEAT;
        self.state = TurnState::AwaitDraw;
        Ok(())
    }

    fn reveal_dora(&mut self) -> EngineResult {
        let dw = self
            .dead_wall
            .as_mut()
            .ok_or_else(|| EngineError::invalid_state("dead wall is not built"))?;
        let t = dw.reveal_next()?;
        self.handle_event(Event::dora(t))
    }

    fn do_event_discard(
        &mut self,
        seat: Seat,
        tile: Tile,
        is_drawn: bool,
        is_riichi: bool,
    ) -> EngineResult {
        self.handle_event(Event::discard(seat, tile, is_drawn, is_riichi))?;
        self.state = TurnState::AwaitCallResponse;
        Ok(())
    }

    fn do_event_win(&mut self, seat: Seat, win_type: WinType, tile: Tile, from: Seat) -> EngineResult {
        let pl = &self.ctrl.get_stage().players[seat];
        let mut h = pl.hand;
        if win_type == WinType::Tsumo {
            dec_tile(&mut h, tile);
        }
        let event = Event::win(
            seat,
            win_type,
            tile,
            from,
            tiles_from_tile_table(&h),
            pl.melds.clone(),
        );
        self.handle_event(event)?;
        self.round_result = Some(RoundResult::Win {
            seat,
            win_type,
            tile,
            from,
        });
        self.state = TurnState::HandComplete;
        Ok(())
    }

    fn do_event_draw(&mut self, draw_type: DrawType) -> EngineResult {
        let stg = self.ctrl.get_stage();
        let mut tenpais = [false; SEAT];
        for (s, pl) in stg.players.iter().enumerate() {
            tenpais[s] = pl.is_riichi || !pl.win_tiles.is_empty();
        }
        self.handle_event(Event::draw(draw_type, tenpais))?;
        self.round_result = Some(RoundResult::Draw { draw_type, tenpais });
        self.state = if draw_type == DrawType::Exhaustive {
            TurnState::WallExhausted
        } else {
            TurnState::Aborted
        };
        Ok(())
    }

    // 牌の総数 (=136) と牌山の残り枚数の整合性
    fn check_tile_count(&self) -> EngineResult {
        let stg = self.ctrl.get_stage();
        let n_dead = self.dead_wall.as_ref().map_or(0, |dw| dw.count());
        let mut n = self.draw_queue.len() + n_dead;
        for pl in &stg.players {
            n += count_tiles(&pl.hand);
            n += pl.melds.iter().map(|m| m.tiles.len()).sum::<usize>();
            n += pl.discards.len();
        }
        if n != N_TILE {
            return Err(EngineError::invalid_state(format!(
                "tile count mismatch: {} (step: {})",
                n, stg.step
            )));
        }
        if stg.wall_count != self.draw_queue.len() {
            return Err(EngineError::invalid_state(format!(
                "wall count mismatch: stage {}, queue {}",
                stg.wall_count,
                self.draw_queue.len()
            )));
        }
        Ok(())
    }
}

// 四風連打: 全員の第1打牌が同じ風牌で,鳴きが発生していない
fn is_four_winds(stg: &Stage) -> bool {
    let first = match stg.players[0].discards.first() {
        Some(d) => d.tile,
        None => return false,
    };
    first.is_wind()
        && stg
            .players
            .iter()
            .all(|pl| pl.melds.is_empty() && pl.discards.len() == 1 && pl.discards[0].tile == first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Nop, RandomDiscard};
    use crate::control::wall::{create_layout_debug, LayoutPreset};

    fn nop_actors() -> [Box<dyn Actor>; SEAT] {
        [
            Box::new(Nop::new()),
            Box::new(Nop::new()),
            Box::new(Nop::new()),
            Box::new(Nop::new()),
        ]
    }

    #[test]
    fn test_nop_round_exhausts_wall() {
        let rule = Rule {
            abortive_draw: false,
            ..Rule::default()
        };
        let mut engine = MahjongEngine::new(1, rule, nop_actors(), vec![]);
        engine.set_fixed_dice(Some(7));
        // Nopは何も宣言しないため必ず荒牌平局
        let res = engine.run_round().unwrap();
        assert!(matches!(
            res,
            RoundResult::Draw {
                draw_type: DrawType::Exhaustive,
                ..
            }
        ));
        assert_eq!(engine.get_round_result(), Some(&res));
        assert_eq!(engine.get_state(), TurnState::WallExhausted);
        assert!(engine.get_draw_queue().is_empty());
        let n_discards: usize = engine.get_stage().players.iter().map(|pl| pl.discards.len()).sum();
        assert_eq!(n_discards, 70);
    }

    #[test]
    fn test_first_step_is_dealer_draw() {
        let mut engine = MahjongEngine::new(3, Rule::default(), nop_actors(), vec![]);
        engine.set_fixed_dice(Some(5));
        engine.start_round().unwrap();
        assert_eq!(engine.get_state(), TurnState::AwaitDraw);
        assert_eq!(engine.get_draw_queue().len(), 70);
        assert_eq!(engine.step().unwrap(), TurnState::AwaitDiscard);
        let stg = engine.get_stage();
        assert_eq!(stg.turn, 0);
        assert_eq!(stg.players[0].hand_len(), 14);
        assert_eq!(stg.wall_count, 69);
    }

    #[test]
    fn test_four_winds() {
        let preset = LayoutPreset {
            hands: ["m123p456s789z1", "m123p456s789z1", "m123p456s789z1", "m123p456s789z1"],
            draws: "z5z6z7m9",
            ..Default::default()
        };
        let layout = create_layout_debug(&preset, 0, 1).unwrap();

        // Nopはツモ切りするため,手牌の東を打牌させる
        #[derive(Clone)]
        struct WindDiscard(crate::actor::Config);
        impl Actor for WindDiscard {
            fn choose_discard(&mut self, _: &Stage, _: Seat, _: &[Tile], _: Option<Tile>) -> Tile {
                Tile(TZ, WE)
            }
            fn get_config(&self) -> &crate::actor::Config {
                &self.0
            }
        }
        impl Listener for WindDiscard {}

        let conf = crate::actor::Config {
            name: "WindDiscard".to_string(),
            args: vec![],
        };
        let actors: [Box<dyn Actor>; SEAT] = [
            Box::new(WindDiscard(conf.clone())),
            Box::new(WindDiscard(conf.clone())),
            Box::new(WindDiscard(conf.clone())),
            Box::new(WindDiscard(conf)),
        ];
        let mut engine = MahjongEngine::new(0, Rule::default(), actors, vec![]);
        engine.start_round_with_layout(layout).unwrap();
        let res = engine.play_round().unwrap();
        assert_eq!(engine.get_state(), TurnState::Aborted);
        assert!(matches!(
            res,
            RoundResult::Draw {
                draw_type: DrawType::FourWinds,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_discard_falls_back() {
        let preset = LayoutPreset {
            hands: ["m1", "", "", ""],
            draws: "m9",
            ..Default::default()
        };
        let layout = create_layout_debug(&preset, 0, 1).unwrap();

        // 実在しない牌を返す
        #[derive(Clone)]
        struct OutOfRange(crate::actor::Config);
        impl Actor for OutOfRange {
            fn choose_discard(&mut self, _: &Stage, _: Seat, _: &[Tile], _: Option<Tile>) -> Tile {
                Tile(TM, 12)
            }
            fn get_config(&self) -> &crate::actor::Config {
                &self.0
            }
        }
        impl Listener for OutOfRange {}

        let mut actors = nop_actors();
        actors[0] = Box::new(OutOfRange(crate::actor::Config {
            name: "OutOfRange".to_string(),
            args: vec![],
        }));
        let mut engine = MahjongEngine::new(0, Rule::default(), actors, vec![]);
        engine.start_round_with_layout(layout).unwrap();
        assert_eq!(engine.step().unwrap(), TurnState::AwaitDiscard);
        assert_eq!(engine.step().unwrap(), TurnState::AwaitCallResponse);
        let discards = &engine.get_stage().players[0].discards;
        assert_eq!(discards.len(), 1);
        assert_eq!(discards[0].tile, Tile(TM, 9));
        assert!(discards[0].is_drawn);
    }

    #[test]
    fn test_random_game() {
        let actors: [Box<dyn Actor>; SEAT] = [
            Box::new(RandomDiscard::new(1, 0.5)),
            Box::new(RandomDiscard::new(2, 0.5)),
            Box::new(RandomDiscard::new(3, 0.5)),
            Box::new(RandomDiscard::new(4, 0.5)),
        ];
        let mut engine = MahjongEngine::new(42, Rule::default(), actors, vec![]);
        let results = engine.run().unwrap();
        assert_eq!(results.len(), 4);
    }
}
