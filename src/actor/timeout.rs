use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::*;
use crate::warn;

// [Timeout]
// 内部のActorを別スレッドで呼び出し,制限時間内に応答がない場合はパスとして扱う
// 応答が遅れたActorのスレッドはMutexを保持したまま残るため,以降の呼び出しも待たされる可能性がある
pub struct Timeout {
    config: Config,
    inner: Arc<Mutex<Box<dyn Actor>>>,
    limit: Duration,
}

impl Timeout {
    pub fn new(inner: Box<dyn Actor>, limit: Duration) -> Self {
        let config = Config {
            name: format!("Timeout[{:?}]", inner),
            args: vec![Arg::float("sec", limit.as_secs_f64())],
        };
        Self {
            config,
            inner: Arc::new(Mutex::new(inner)),
            limit,
        }
    }

    fn call<T, F>(&self, name: &str, default: T, f: F) -> T
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn Actor) -> T + Send + 'static,
    {
        let inner = self.inner.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut a = match inner.lock() {
                Ok(a) => a,
                Err(_) => return,
            };
            tx.send(f(&mut **a)).ok();
        });

        match rx.recv_timeout(self.limit) {
            Ok(r) => r,
            Err(_) => {
                warn!("{}: {} timed out", self.config.name, name);
                default
            }
        }
    }
}

// 複製時は内部のActorも複製する (複製間で状態を共有しない)
impl Clone for Timeout {
    fn clone(&self) -> Self {
        let inner = match self.inner.lock() {
            Ok(a) => a.clone_box(),
            Err(e) => e.into_inner().clone_box(),
        };
        Self {
            config: self.config.clone(),
            inner: Arc::new(Mutex::new(inner)),
            limit: self.limit,
        }
    }
}

impl Actor for Timeout {
    fn init(&mut self, seat: Seat) {
        match self.inner.try_lock() {
            Ok(mut a) => a.init(seat),
            Err(_) => warn!("{}: init skipped (busy)", self.config.name),
        }
    }

    fn choose_discard(
        &mut self,
        stg: &Stage,
        seat: Seat,
        hand: &[Tile],
        drawn: Option<Tile>,
    ) -> Tile {
        let stg = stg.clone();
        let hand = hand.to_vec();
        let default = default_discard(&hand, drawn);
        self.call("choose_discard", default, move |a: &mut dyn Actor| {
            a.choose_discard(&stg, seat, &hand, drawn)
        })
    }

    fn respond_to_call_offer(&mut self, stg: &Stage, offer: &CallOffer) -> bool {
        let stg = stg.clone();
        let offer = offer.clone();
        self.call("respond_to_call_offer", false, move |a: &mut dyn Actor| {
            a.respond_to_call_offer(&stg, &offer)
        })
    }

    fn choose_chii_candidate(
        &mut self,
        stg: &Stage,
        seat: Seat,
        candidates: &[Vec<Tile>],
    ) -> usize {
        let stg = stg.clone();
        let candidates = candidates.to_vec();
        self.call("choose_chii_candidate", 0, move |a: &mut dyn Actor| {
            a.choose_chii_candidate(&stg, seat, &candidates)
        })
    }

    fn declare_riichi(&mut self, stg: &Stage, seat: Seat, waits: &[Tile]) -> bool {
        let stg = stg.clone();
        let waits = waits.to_vec();
        self.call("declare_riichi", false, move |a: &mut dyn Actor| {
            a.declare_riichi(&stg, seat, &waits)
        })
    }

    fn declare_concealed_kan(&mut self, stg: &Stage, seat: Seat, tile: Tile) -> bool {
        let stg = stg.clone();
        self.call("declare_concealed_kan", false, move |a: &mut dyn Actor| {
            a.declare_concealed_kan(&stg, seat, tile)
        })
    }

    fn declare_tsumo(&mut self, stg: &Stage, seat: Seat, tile: Tile) -> bool {
        let stg = stg.clone();
        self.call("declare_tsumo", false, move |a: &mut dyn Actor| {
            a.declare_tsumo(&stg, seat, tile)
        })
    }

    fn respond_to_ron(&mut self, stg: &Stage, seat: Seat, tile: Tile, from: Seat) -> bool {
        let stg = stg.clone();
        self.call("respond_to_ron", false, move |a: &mut dyn Actor| {
            a.respond_to_ron(&stg, seat, tile, from)
        })
    }

    fn declare_nine_terminals(&mut self, stg: &Stage, seat: Seat) -> bool {
        let stg = stg.clone();
        self.call("declare_nine_terminals", false, move |a: &mut dyn Actor| {
            a.declare_nine_terminals(&stg, seat)
        })
    }

    fn get_config(&self) -> &Config {
        &self.config
    }
}

impl Listener for Timeout {
    fn notify_event(&mut self, stg: &Stage, event: &Event) {
        if let Ok(mut a) = self.inner.try_lock() {
            a.notify_event(stg, event);
        }
    }
}
