//! Seed volume table
//!
//! The 44 volumes loaded when the durable slot is empty. Only `vol-1`
//! carries sample content.

use crate::types::{Volume, VolumeId};

/// Number of volumes in the gazetteer
pub const SEED_VOLUME_COUNT: usize = 44;

/// Placeholder original text for volumes not yet transcribed
pub const PENDING_ORIGINAL: &str = "<p>待录入...</p>";

const SAMPLE_ORIGINAL: &str = "<p>华阳县，古蜀国地。秦灭蜀，置蜀郡。汉因之。...</p><p>（此处为示例原文，管理员可登录后编辑完整内容）</p>";
const SAMPLE_ANNOTATION: &str = "<ul><li><strong>古蜀国</strong>: 指四川盆地古代建立的国家。</li><li><strong>蜀郡</strong>: 秦国灭蜀后设立的行政区划。</li></ul>";
const SAMPLE_TRANSLATION: &str = "<p>华阳县，是古代蜀国的领地。秦国灭掉蜀国后，设置了蜀郡。汉朝沿袭了这一建制...</p>";

const DIGITS: [&str; 10] = ["", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// Chinese numeral for 1..=99 (十, 十一, 二十, 二十一, ...)
#[must_use]
pub fn chinese_numeral(n: usize) -> String {
    debug_assert!((1..100).contains(&n));
    let (tens, ones) = (n / 10, n % 10);
    match tens {
        0 => DIGITS[ones].to_string(),
        1 => format!("十{}", DIGITS[ones]),
        _ => format!("{}十{}", DIGITS[tens], DIGITS[ones]),
    }
}

/// Build the seed collection
#[must_use]
pub fn seed_volumes() -> Vec<Volume> {
    (1..=SEED_VOLUME_COUNT)
        .map(|position| {
            let title = format!("卷{}", chinese_numeral(position));
            let mut volume = Volume::new(VolumeId::seed(position), title);
            if position == 1 {
                volume.original = SAMPLE_ORIGINAL.to_string();
                volume.annotation = SAMPLE_ANNOTATION.to_string();
                volume.translation = SAMPLE_TRANSLATION.to_string();
            } else {
                volume.original = PENDING_ORIGINAL.to_string();
            }
            volume
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rendition;
    use std::collections::HashSet;

    #[test]
    fn numerals() {
        assert_eq!(chinese_numeral(1), "一");
        assert_eq!(chinese_numeral(10), "十");
        assert_eq!(chinese_numeral(14), "十四");
        assert_eq!(chinese_numeral(20), "二十");
        assert_eq!(chinese_numeral(44), "四十四");
    }

    #[test]
    fn seed_ids_unique_and_titles_present() {
        let volumes = seed_volumes();
        assert_eq!(volumes.len(), SEED_VOLUME_COUNT);

        let ids: HashSet<_> = volumes.iter().map(|v| v.id.clone()).collect();
        assert_eq!(ids.len(), volumes.len());
        assert!(volumes.iter().all(|v| !v.title.is_empty()));
    }

    #[test]
    fn seed_content_layout() {
        let volumes = seed_volumes();
        assert_eq!(volumes[0].title, "卷一");
        assert!(!volumes[0].is_blank(Rendition::Annotation));

        let second = &volumes[1];
        assert_eq!(second.id.as_str(), "vol-2");
        assert_eq!(second.original, PENDING_ORIGINAL);
        assert!(second.is_blank(Rendition::Translation));
        assert_eq!(volumes[43].title, "卷四十四");
    }
}
