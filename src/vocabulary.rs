//! Word-of-the-day: a read-only built-in list combined with the user's
//! custom words, and the flip state of the card that shows one of them.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::planner_model::{CustomWord, VocabularyWord};

const BUILT_IN: &[(&str, &str)] = &[
    ("abandon", "버리다, 포기하다"),
    ("accommodate", "수용하다"),
    ("acquire", "얻다, 습득하다"),
    ("adequate", "충분한, 적절한"),
    ("allocate", "할당하다"),
    ("ambiguous", "모호한"),
    ("anticipate", "예상하다"),
    ("arbitrary", "임의의"),
    ("assess", "평가하다"),
    ("coherent", "일관성 있는"),
    ("compensate", "보상하다"),
    ("comprehensive", "포괄적인"),
    ("consecutive", "연속적인"),
    ("contemporary", "동시대의, 현대의"),
    ("deliberate", "고의의, 신중한"),
    ("diligent", "부지런한"),
    ("eliminate", "제거하다"),
    ("enhance", "향상시키다"),
    ("feasible", "실현 가능한"),
    ("fluctuate", "변동하다"),
    ("implement", "시행하다"),
    ("inevitable", "불가피한"),
    ("integrity", "진실성"),
    ("mandatory", "의무적인"),
    ("meticulous", "꼼꼼한"),
    ("negligible", "무시할 수 있는"),
    ("obsolete", "구식의"),
    ("persevere", "인내하다"),
    ("precede", "앞서다"),
    ("reluctant", "꺼리는"),
    ("scrutinize", "면밀히 조사하다"),
    ("substantial", "상당한"),
    ("tentative", "잠정적인"),
    ("verify", "검증하다"),
];

pub fn built_in() -> Vec<VocabularyWord> {
    BUILT_IN
        .iter()
        .map(|(eng, kor)| VocabularyWord {
            eng: (*eng).to_string(),
            kor: (*kor).to_string(),
        })
        .collect()
}

/// Built-in words followed by the user's custom words.
pub fn word_pool(custom: &[CustomWord]) -> Vec<VocabularyWord> {
    let mut pool = built_in();
    pool.extend(custom.iter().map(VocabularyWord::from));
    pool
}

pub fn pick<R: Rng + ?Sized>(pool: &[VocabularyWord], rng: &mut R) -> Option<VocabularyWord> {
    pool.choose(rng).cloned()
}

/// The card on screen. Flipping reveals the meaning; a fresh pick always
/// shows the front.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashCard {
    pub word: Option<VocabularyWord>,
    pub flipped: bool,
}

impl FlashCard {
    pub fn draw<R: Rng + ?Sized>(pool: &[VocabularyWord], rng: &mut R) -> Self {
        Self {
            word: pick(pool, rng),
            flipped: false,
        }
    }

    /// No-op on an empty card.
    pub fn flip(&mut self) {
        if self.word.is_some() {
            self.flipped = !self.flipped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pool_grows_with_custom_words() {
        let base = word_pool(&[]).len();
        let custom = vec![CustomWord { id: "1".into(), eng: "ubiquitous".into(), kor: "어디에나 있는".into() }];
        let pool = word_pool(&custom);
        assert_eq!(pool.len(), base + 1);
        assert_eq!(pool.last().map(|w| w.eng.as_str()), Some("ubiquitous"));
    }

    #[test]
    fn test_pick_from_empty_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pick(&[], &mut rng).is_none());
        let mut card = FlashCard::draw(&[], &mut rng);
        card.flip();
        assert!(!card.flipped);
    }

    #[test]
    fn test_pick_is_from_pool() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool = word_pool(&[]);
        for _ in 0..20 {
            let word = pick(&pool, &mut rng).unwrap();
            assert!(pool.contains(&word));
        }
    }

    #[test]
    fn test_flip_toggles_and_redraw_resets() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = word_pool(&[]);
        let mut card = FlashCard::draw(&pool, &mut rng);
        card.flip();
        assert!(card.flipped);
        card = FlashCard::draw(&pool, &mut rng);
        assert!(!card.flipped);
    }
}
