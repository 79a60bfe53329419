//! Search tag extraction from file names.

use super::classify::stem_of;

/// Tokens of this many characters or fewer are dropped.
const MIN_TAG_EXCLUSIVE: usize = 2;

/// Derive lowercase search tags from a file name.
///
/// The final extension is removed, the rest is split on runs of `_`, `-`,
/// `.` and whitespace, and tokens that are too short or purely numeric are
/// discarded. Order is preserved and duplicates are kept.
pub fn extract_tags(name: &str) -> Vec<String> {
    stem_of(name)
        .to_lowercase()
        .split(|c: char| matches!(c, '_' | '-' | '.') || c.is_whitespace())
        .filter(|token| token.chars().count() > MIN_TAG_EXCLUSIVE)
        .filter(|token| !token.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boss_fight() {
        assert_eq!(extract_tags("Boss_Fight-02.lua"), vec!["boss", "fight"]);
    }

    #[test]
    fn test_short_tokens_dropped() {
        assert!(extract_tags("a.b").is_empty());
        assert!(extract_tags("ab_cd-ef.png").is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_tags("").is_empty());
    }

    #[test]
    fn test_numeric_tokens_dropped() {
        assert_eq!(extract_tags("tile_0001_grass.png"), vec!["tile", "grass"]);
        // Mixed alphanumerics survive.
        assert_eq!(extract_tags("level_01a_x256.tmx"), vec!["level", "01a", "x256"]);
    }

    #[test]
    fn test_separator_runs_and_whitespace() {
        assert_eq!(
            extract_tags("Dark  Forest__--Theme .ogg"),
            vec!["dark", "forest", "theme"]
        );
        assert_eq!(extract_tags("big\ttree.png"), vec!["big", "tree"]);
    }

    #[test]
    fn test_inner_dots_split() {
        assert_eq!(
            extract_tags("player.walk.cycle.png"),
            vec!["player", "walk", "cycle"]
        );
    }

    #[test]
    fn test_duplicates_kept_in_order() {
        assert_eq!(
            extract_tags("grass_dirt_grass.png"),
            vec!["grass", "dirt", "grass"]
        );
    }

    #[test]
    fn test_dotfile_keeps_name() {
        assert_eq!(extract_tags(".gitignore"), vec!["gitignore"]);
    }

    #[test]
    fn test_every_tag_is_valid() {
        let names = [
            "Boss_Fight-02.lua",
            "a.b",
            "123_4567.png",
            "UI Button Pressed 2x.PNG",
            "snd-explosion-big-03.wav",
        ];
        for name in names {
            for tag in extract_tags(name) {
                assert!(tag.chars().count() >= 3, "{name}: {tag}");
                assert!(!tag.chars().all(|c| c.is_ascii_digit()), "{name}: {tag}");
                assert_eq!(tag, tag.to_lowercase(), "{name}: {tag}");
            }
        }
    }
}
