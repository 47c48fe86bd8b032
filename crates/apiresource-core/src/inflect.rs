//! English inflection helpers for resource and model naming.
//!
//! Resource names are underscored paths (`my_module/related`), resource
//! types are pluralised (`people`), model names are camel-cased
//! (`Person`, `MyModule::Thing`).

use std::sync::{PoisonError, RwLock};

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("datum", "data"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("analysis", "analyses"),
    ("crisis", "crises"),
    ("diagnosis", "diagnoses"),
    ("thesis", "theses"),
    ("axis", "axes"),
    ("leaf", "leaves"),
    ("loaf", "loaves"),
    ("half", "halves"),
    ("calf", "calves"),
    ("elf", "elves"),
    ("self", "selves"),
    ("shelf", "shelves"),
    ("wolf", "wolves"),
    ("thief", "thieves"),
    ("scarf", "scarves"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("life", "lives"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "news",
];

/// Singulars ending in `s` that take `es`.
const ES_SINGULARS: &[&str] = &["alias", "bus", "campus", "census", "status", "virus"];

/// Singulars ending in `ie`; everything else ending in `ies` comes from `y`.
const IE_SINGULARS: &[&str] = &[
    "brownie", "calorie", "cookie", "die", "genie", "lie", "movie", "pie", "prairie", "rookie",
    "selfie", "tie", "zombie",
];

/// Singulars ending in `oe`; everything else ending in `oes` comes from `o`.
const OE_SINGULARS: &[&str] = &["canoe", "doe", "floe", "foe", "hoe", "oboe", "shoe", "toe"];

/// Words ending in consonant + `o` that only take `s`.
const O_EXCEPTIONS: &[&str] = &["photo", "piano", "halo", "memo", "pro", "auto"];

struct CustomInflections {
    uncountable: Vec<String>,
    irregular: Vec<(String, String)>,
}

static CUSTOM: RwLock<CustomInflections> = RwLock::new(CustomInflections {
    uncountable: Vec::new(),
    irregular: Vec::new(),
});

/// Register a word that is the same in singular and plural form
/// (`preferences`). Applies process-wide.
pub fn add_uncountable(word: impl Into<String>) {
    let word = word.into();
    let mut custom = CUSTOM.write().unwrap_or_else(PoisonError::into_inner);
    if !custom.uncountable.contains(&word) {
        tracing::debug!(%word, "Registered uncountable word");
        custom.uncountable.push(word);
    }
}

/// Register an irregular singular/plural pair
/// (`numero_telefone` / `numeros_telefone`). Applies process-wide.
pub fn add_irregular(singular: impl Into<String>, plural: impl Into<String>) {
    let pair = (singular.into(), plural.into());
    let mut custom = CUSTOM.write().unwrap_or_else(PoisonError::into_inner);
    if !custom.irregular.contains(&pair) {
        tracing::debug!(singular = %pair.0, plural = %pair.1, "Registered irregular word");
        custom.irregular.push(pair);
    }
}

/// Whole-word lookups against the built-in and registered tables.
enum Known {
    Uncountable,
    Irregular { singular: String, plural: String },
}

fn known(word: &str) -> Option<Known> {
    if UNCOUNTABLE.contains(&word) {
        return Some(Known::Uncountable);
    }
    if let Some((singular, plural)) = IRREGULAR.iter().find(|(s, p)| *s == word || *p == word) {
        return Some(Known::Irregular {
            singular: (*singular).to_string(),
            plural: (*plural).to_string(),
        });
    }

    let custom = CUSTOM.read().unwrap_or_else(PoisonError::into_inner);
    if custom.uncountable.iter().any(|w| w == word) {
        return Some(Known::Uncountable);
    }
    custom
        .irregular
        .iter()
        .find(|(s, p)| s == word || p == word)
        .map(|(singular, plural)| Known::Irregular {
            singular: singular.clone(),
            plural: plural.clone(),
        })
}

fn is_vowel(c: char) -> bool {
    "aeiou".contains(c)
}

/// Convert `CamelCase` (optionally `A::B` namespaced) to `snake_case`,
/// turning `::` into `/`.
///
/// - `Hero` -> `hero`
/// - `TeamMember` -> `team_member`
/// - `HTTPServer` -> `http_server`
/// - `MyModule::Related` -> `my_module/related`
pub fn underscore(s: &str) -> String {
    let s = s.replace("::", "/");
    let mut result = String::with_capacity(s.len() + 4);
    let chars: Vec<char> = s.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            result.push('_');
        } else if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next = chars.get(i + 1).copied();

                let should_underscore = prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next.is_some_and(|n| n.is_lowercase()));

                if should_underscore {
                    result.push('_');
                }
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Convert `snake_case` (optionally `a/b` namespaced) to `CamelCase`,
/// turning `/` into `::`.
pub fn camelize(s: &str) -> String {
    s.split('/')
        .map(|segment| {
            segment
                .split('_')
                .filter(|part| !part.is_empty())
                .map(|part| {
                    let mut chars = part.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                        None => String::new(),
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("::")
}

/// Strip any namespace from a name: `Api::V2::Book` -> `Book`,
/// `api/v2/book` -> `book`.
pub fn demodulize(s: &str) -> &str {
    let tail = s.rsplit("::").next().unwrap_or(s);
    tail.rsplit('/').next().unwrap_or(tail)
}

/// Table-to-class style conversion: `book_comments` -> `BookComment`,
/// `people` -> `Person`.
pub fn classify(s: &str) -> String {
    let underscored = underscore(s);
    let (prefix, last) = match underscored.rfind('/') {
        Some(idx) => underscored.split_at(idx + 1),
        None => ("", underscored.as_str()),
    };
    camelize(&format!("{prefix}{}", singularize(last)))
}

/// Simple English pluralization.
///
/// Only the last `_`-separated word is inflected:
/// `book_comment` -> `book_comments`, `person` -> `people`.
pub fn pluralize(word: &str) -> String {
    inflect_last_word(word, pluralize_word)
}

/// Simple English singularization, the inverse of [`pluralize`].
pub fn singularize(word: &str) -> String {
    inflect_last_word(word, singularize_word)
}

fn inflect_last_word(word: &str, f: fn(&str) -> String) -> String {
    let (namespace, name) = match word.rfind('/') {
        Some(idx) => word.split_at(idx + 1),
        None => ("", word),
    };
    // Multi-word registrations (`numero_telefone`) match whole.
    if name.contains('_') && known(name).is_some() {
        return format!("{namespace}{}", f(name));
    }
    match name.rfind('_') {
        Some(idx) => {
            let (head, tail) = name.split_at(idx + 1);
            format!("{namespace}{head}{}", f(tail))
        }
        None => format!("{namespace}{}", f(name)),
    }
}

fn pluralize_word(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    match known(word) {
        Some(Known::Uncountable) => return word.to_string(),
        Some(Known::Irregular { plural, .. }) => return plural,
        None => {}
    }

    if ES_SINGULARS.contains(&word) {
        return format!("{word}es");
    }
    if word == "quiz" {
        return "quizzes".to_string();
    }
    if ["ss", "sh", "ch", "x", "z"].iter().any(|s| word.ends_with(*s)) {
        return format!("{word}es");
    }
    // Already plural (`links`, `ids`).
    if word.ends_with('s') {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}ies");
        }
        return format!("{word}s");
    }
    if let Some(stem) = word.strip_suffix('o') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) && !O_EXCEPTIONS.contains(&word) {
            return format!("{word}es");
        }
    }

    format!("{word}s")
}

fn singularize_word(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    match known(word) {
        Some(Known::Uncountable) => return word.to_string(),
        Some(Known::Irregular { singular, .. }) => return singular,
        None => {}
    }

    // Singular input comes back unchanged.
    if !word.ends_with('s')
        || word.ends_with("ss")
        || word.ends_with("sis")
        || ES_SINGULARS.contains(&word)
    {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("es") {
        if ES_SINGULARS.contains(&stem) {
            return stem.to_string();
        }
        if stem == "quizz" {
            return "quiz".to_string();
        }
    }
    if let Some(stem) = word.strip_suffix("ies") {
        let ie = format!("{stem}ie");
        if IE_SINGULARS.contains(&ie.as_str()) {
            return ie;
        }
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}y");
        }
        return ie;
    }
    if let Some(stem) = word.strip_suffix("oes") {
        let oe = format!("{stem}oe");
        if OE_SINGULARS.contains(&oe.as_str()) {
            return oe;
        }
        return format!("{stem}o");
    }
    if let Some(stem) = word.strip_suffix("es") {
        if ["ss", "sh", "ch", "x"].iter().any(|s| stem.ends_with(*s)) {
            return stem.to_string();
        }
        // buzzes -> buzz, waltzes -> waltz, but sizes -> size.
        if let Some(head) = stem.strip_suffix('z') {
            if head.chars().last().is_some_and(|c| c == 'z' || !is_vowel(c)) {
                return stem.to_string();
            }
        }
    }

    // houses -> house, courses -> course, posts -> post.
    word.strip_suffix('s').unwrap_or(word).to_string()
}
