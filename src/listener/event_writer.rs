use serde_json::{json, Value};

use super::Listener;
use crate::error;
use crate::model::*;
use crate::util::misc::{unixtime_now, write_to_file};

// [EventWriter]
// 局ごとのイベントをjsonで保存 (local/paifu/<開始時刻>/<局数>.json)
#[derive(Debug)]
pub struct EventWriter {
    dir: String,
    start_time: u64,
    round_index: usize,
    record: Vec<Value>,
}

impl EventWriter {
    pub fn new() -> Self {
        Self::with_dir("local/paifu")
    }

    pub fn with_dir(dir: &str) -> Self {
        Self {
            dir: dir.to_string(),
            start_time: unixtime_now(),
            round_index: 0,
            record: vec![],
        }
    }

    fn file_path(&self) -> String {
        format!("{}/{}/{:02}.json", self.dir, self.start_time, self.round_index)
    }
}

impl Default for EventWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for EventWriter {
    fn notify_event(&mut self, _stg: &Stage, event: &Event) {
        let mut write = false;
        match event {
            Event::Begin(_) => {
                self.record.clear();
                self.start_time = unixtime_now();
                self.round_index = 0;
                return;
            }
            Event::New(_) => {
                self.record.clear();
            }
            Event::Win(_) | Event::Draw(_) => {
                write = true;
            }
            Event::End(_) => return,
            _ => {}
        }

        self.record.push(json!(event));
        if write {
            let data = match serde_json::to_string_pretty(&self.record) {
                Ok(d) => d,
                Err(e) => {
                    error!("{}", e);
                    return;
                }
            };
            if let Err(e) = write_to_file(&self.file_path(), &data) {
                error!("{}: {}", self.file_path(), e);
            }
            self.record.clear();
            self.round_index += 1;
        }
    }
}

#[test]
fn test_event_writer() {
    let dir = std::env::temp_dir().join(format!("riichi_table_writer_{}", std::process::id()));
    let dir_str = dir.to_string_lossy().to_string();
    let mut writer = EventWriter::with_dir(&dir_str);
    let stg = Stage::default();
    writer.notify_event(&stg, &Event::begin());
    writer.notify_event(&stg, &Event::deal(0, Tile(TM, 1), false));
    let path = writer.file_path();
    writer.notify_event(&stg, &Event::draw(DrawType::Exhaustive, [true, false, false, false]));

    let data = std::fs::read_to_string(&path).unwrap();
    let v: Value = serde_json::from_str(&data).unwrap();
    assert_eq!(v[0]["type"], "Deal");
    assert_eq!(v[0]["tile"], "m1");
    assert_eq!(v[1]["type"], "Draw");
    assert_eq!(v[1]["draw_type"], "Exhaustive");
    std::fs::remove_dir_all(&dir).ok();
}
