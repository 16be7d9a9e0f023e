use super::Listener;
use crate::control::common::dora_from_indicator;
use crate::model::*;
use crate::util::misc::vec_to_string;

// [EventPrinter]
#[derive(Debug)]
pub struct EventPrinter {}

impl EventPrinter {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for EventPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for EventPrinter {
    fn notify_event(&mut self, stg: &Stage, event: &Event) {
        use Event::*;
        print!("(step:{}) ", stg.step);
        match event {
            Begin(_) => {
                println!("Begin");
            }
            New(e) => {
                println!("New round: {}, dealer: {}, dice: {}", e.round, e.dealer, e.dice);
                println!("{}", stg);
            }
            Deal(e) => {
                let kind = if e.is_replacement { " (replacement)" } else { "" };
                println!("Deal seat{} {}{}", e.seat, e.tile, kind);
                println!("{}", stg.players[e.seat]);
            }
            Discard(e) => {
                println!(
                    "Discard seat{} {} {}",
                    e.seat,
                    e.tile,
                    if e.is_riichi { "riichi" } else { "" }
                );
                println!("{}", stg.players[e.seat]);
            }
            Meld(e) => {
                println!("Meld seat{} {:?} {}", e.seat, e.meld_type, vec_to_string(&e.consumed));
                println!("{}", stg.players[e.seat]);
            }
            Dora(e) => {
                println!("Dora indicator {} (dora: {})", e.tile, dora_from_indicator(e.tile));
            }
            Win(e) => {
                println!(
                    "Win seat{} {:?} {} from seat{}",
                    e.seat, e.win_type, e.tile, e.from
                );
                println!("hand: {}, melds: {}", vec_to_string(&e.hand), vec_to_string(&e.melds));
                println!("{}", stg);
            }
            Draw(e) => {
                println!("Draw {} tenpai: {:?}", e.draw_type, e.tenpais);
                println!("{}", stg);
            }
            End(_) => {
                println!("End");
            }
        }
        println!();
    }
}
