use super::*;

// 対局ルール
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    pub hands: usize,           // 対局の局数
    pub red5: usize,            // 各数牌の赤5の枚数 (0~4)
    pub irregular_hands: bool,  // 七対子,国士無双を和了形として扱う
    pub abortive_draw: bool,    // 途中流局 (九種九牌,四風連打,四槓散了,四家立直)
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            hands: 4,
            red5: 1,
            irregular_hands: false,
            abortive_draw: true,
        }
    }
}

impl Rule {
    pub fn from_json(s: &str) -> crate::util::misc::Res<Self> {
        let rule: Self = serde_json::from_str(s)?;
        if rule.red5 > TILE {
            Err(format!("red5 must be in 0..={}: {}", TILE, rule.red5))?;
        }
        Ok(rule)
    }
}

#[test]
fn test_rule_from_json() {
    let rule = Rule::from_json(r#"{"hands": 8, "irregular_hands": true}"#).unwrap();
    assert_eq!(rule.hands, 8);
    assert_eq!(rule.red5, 1);
    assert!(rule.irregular_hands);
    assert!(rule.abortive_draw);
    assert!(Rule::from_json(r#"{"red5": 5}"#).is_err());
}
