use std::collections::HashMap;
use std::sync::LazyLock;

/// Cyrillic to Latin transliteration pairs for the lowercase alphabet,
/// including the Ukrainian letters є, і, ї and ґ.
/// Uppercase mappings are derived by uppercasing both sides.
static TRANSLITERATION: [(char, &str); 37] = [
    ('а', "a"),
    ('б', "b"),
    ('в', "v"),
    ('г', "g"),
    ('д', "d"),
    ('е', "e"),
    ('ё', "e"),
    ('ж', "j"),
    ('з', "z"),
    ('и', "i"),
    ('й', "j"),
    ('к', "k"),
    ('л', "l"),
    ('м', "m"),
    ('н', "n"),
    ('о', "o"),
    ('п', "p"),
    ('р', "r"),
    ('с', "s"),
    ('т', "t"),
    ('у', "u"),
    ('ф', "f"),
    ('х', "h"),
    ('ц', "ts"),
    ('ч', "ch"),
    ('ш', "sh"),
    ('щ', "sch"),
    ('ъ', ""),
    ('ы', "y"),
    ('ь', ""),
    ('э', "e"),
    ('ю', "yu"),
    ('я', "u"),
    ('є', "ja"),
    ('і', "je"),
    ('ї', "ji"),
    ('ґ', "g"),
];

static TRANSLITERATION_MAP: LazyLock<HashMap<char, String>> = LazyLock::new(|| {
    let mut map = HashMap::with_capacity(TRANSLITERATION.len() * 2);
    for (cyrillic, latin) in TRANSLITERATION {
        map.insert(cyrillic, latin.to_string());
        for uppercase in cyrillic.to_uppercase() {
            map.insert(uppercase, latin.to_uppercase());
        }
    }
    map
});

/// Map an arbitrary filename to a safe ASCII filename.
///
/// Characters in the transliteration table are replaced with their Latin
/// equivalents first, then everything that is not an ASCII letter, digit,
/// `.` or `_` becomes a single `_`. Consecutive underscores are not collapsed.
///
/// The result contains only safe characters, so running `normalize` on its
/// own output returns it unchanged.
///
/// ```rust
/// use sortdir::normalize::normalize;
///
/// assert_eq!(normalize("Фото 1.jpg"), "Foto_1.jpg");
/// ```
#[must_use]
pub fn normalize(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for character in name.chars() {
        match TRANSLITERATION_MAP.get(&character) {
            Some(latin) => result.push_str(latin),
            None if is_safe_character(character) => result.push(character),
            None => result.push('_'),
        }
    }
    result
}

/// Characters allowed to pass through sanitization unchanged.
const fn is_safe_character(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '.' || character == '_'
}

#[cfg(test)]
mod normalize_tests {
    use super::*;

    #[test]
    fn transliterates_cyrillic() {
        assert_eq!(normalize("Привіт.txt"), "Privjet.txt");
        assert_eq!(normalize("Фото.jpg"), "Foto.jpg");
        assert_eq!(normalize("щука"), "schuka");
    }

    #[test]
    fn transliterates_uppercase_with_uppercase_output() {
        assert_eq!(normalize("ЩУКА"), "SCHUKA");
        assert_eq!(normalize("ЦУМ.pdf"), "TSUM.pdf");
    }

    #[test]
    fn elides_soft_and_hard_signs() {
        assert_eq!(normalize("день"), "den");
        assert_eq!(normalize("об'єкт"), "ob_jakt");
        assert_eq!(normalize("подъезд"), "podezd");
    }

    #[test]
    fn replaces_unsafe_characters_without_collapsing() {
        assert_eq!(normalize("my file (1).txt"), "my_file__1_.txt");
        assert_eq!(normalize("a  b"), "a__b");
        assert_eq!(normalize("naïve—file"), "na_ve_file");
    }

    #[test]
    fn keeps_safe_characters_unchanged() {
        assert_eq!(normalize("already_safe.FILE.123"), "already_safe.FILE.123");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn is_idempotent() {
        for name in [
            "Привіт.txt",
            "Фото з відпустки (2023).jpg",
            "ПодЪезд №3.doc",
            "plain.txt",
            "сон 🌙.png",
            "___...___",
        ] {
            let once = normalize(name);
            assert_eq!(normalize(&once), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn output_uses_safe_charset_only() {
        for name in ["Привіт, світ!", "väärä/nimi\\tiedosto", "файл з пробілами.tar.gz", "🎵🎵.mp3"] {
            for character in normalize(name).chars() {
                assert!(
                    is_safe_character(character),
                    "unsafe character {character:?} in normalized {name:?}"
                );
            }
        }
    }
}
