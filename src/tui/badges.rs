use fxhash::FxHashMap;
use ratatui::style::Color;

use crate::tui::styles::BADGE_PALETTE;

/// 便名の前に表示する航空会社のバッジ
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AirlineBadge {
    pub(crate) code: String,
    pub(crate) color: Color,
}

impl AirlineBadge {
    fn new(code: &str) -> Self {
        let index = fxhash::hash64(code) % BADGE_PALETTE.len() as u64;
        Self {
            code: code.to_string(),
            color: BADGE_PALETTE[index as usize],
        }
    }
}

/// 航空会社コードごとのバッジのキャッシュ
/// 一度作ったバッジは破棄しない
#[derive(Debug, Default)]
pub(crate) struct AirlineBadges {
    cache: FxHashMap<String, AirlineBadge>,
}

impl AirlineBadges {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&mut self, code: &str) -> &AirlineBadge {
        self.cache
            .entry(code.to_string())
            .or_insert_with(|| AirlineBadge::new(code))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_cache() {
        let mut badges = AirlineBadges::new();

        // [正常系] 同じコードは同じバッジを返す
        let first = badges.get("LO").clone();
        let second = badges.get("LO").clone();
        assert_eq!(first, second);
        assert_eq!(first.code, "LO");
        assert_eq!(badges.len(), 1);

        // [正常系] 色はパレットの中から選ばれる
        let other = badges.get("VY").clone();
        assert!(BADGE_PALETTE.contains(&other.color));
        assert_eq!(badges.len(), 2);
    }

    #[test]
    fn test_badge_color_is_stable() {
        // [正常系] キャッシュが別でも同じコードは同じ色
        let mut a = AirlineBadges::new();
        let mut b = AirlineBadges::new();
        assert_eq!(a.get("KQ").color, b.get("KQ").color);
    }
}
