use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use strsim::damerau_levenshtein;
use unicode_normalization::UnicodeNormalization;

/// Alias → canonical skill mapping for the marketplace's common stacks.
/// Candidate-entered and employer-entered spellings of the same skill must
/// land on the same token or the overlap factor undercounts.
static ALIAS_TO_CANONICAL: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let aliases: &[(&str, &[&str])] = &[
        ("php", &["php7", "php8", "hypertext preprocessor"]),
        ("laravel", &["laravel framework", "php laravel"]),
        ("wordpress", &["wp", "word press"]),
        ("mysql", &["my sql", "mariadb"]),
        ("postgresql", &["postgres", "pg", "postgre sql"]),
        ("sqlite", &["sqlite3", "sql lite"]),
        (
            "javascript",
            &["js", "java script", "ecmascript", "es6", "es2015"],
        ),
        ("typescript", &["ts", "type script"]),
        ("nodejs", &["node.js", "node js", "node"]),
        ("react", &["reactjs", "react.js", "react js"]),
        ("vue", &["vue.js", "vuejs", "vue js"]),
        ("css", &["css3", "cascading style sheets"]),
        ("html", &["html5", "hypertext markup language"]),
        ("sass", &["scss"]),
        ("bootstrap", &["bootstrap4", "bootstrap5"]),
        ("python", &["python3", "python 3", "py"]),
        ("django", &["django rest framework", "drf"]),
        ("java", &["java8", "java11", "java17", "openjdk"]),
        ("csharp", &["c#", "c sharp", ".net", "dotnet"]),
        ("golang", &["go", "go lang"]),
        ("rust", &["rust lang", "rust language"]),
        ("ruby", &["ruby on rails", "rails", "ror"]),
        ("excel", &["ms excel", "microsoft excel", "spreadsheets"]),
        ("accounting", &["bookkeeping", "accounts"]),
        ("sales", &["salesmanship", "selling"]),
        (
            "customer-service",
            &["customer service", "customer care", "client service"],
        ),
        ("marketing", &["digital marketing", "online marketing"]),
        ("docker", &["docker container", "containerization"]),
        ("kubernetes", &["k8s", "kube"]),
        ("aws", &["amazon web services", "aws cloud"]),
        ("git", &["github", "gitlab", "version control"]),
    ];

    let mut map = HashMap::new();
    for (canonical, alias_list) in aliases {
        map.insert(*canonical, *canonical);
        for alias in *alias_list {
            map.insert(*alias, *canonical);
        }
    }
    map
});

/// Same mapping keyed by separator-stripped, NFKC-folded form, so entries
/// like "Node.JS" and "node js" collapse before lookup.
static COMPACT_ALIAS_TO_CANONICAL: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for (alias, canonical) in ALIAS_TO_CANONICAL.iter() {
        map.entry(compact_key(alias)).or_insert(*canonical);
    }
    map
});

fn nfkc_lower_trim(input: &str) -> String {
    input.nfkc().collect::<String>().trim().to_lowercase()
}

fn compact_key(input: &str) -> String {
    input
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-' | '_' | '/'))
        .collect()
}

fn fuzzy_match_canonical(compact: &str) -> Option<&'static str> {
    // Short tokens (go, php, css) are far too easy to mistake for one
    // another; only longer inputs get the typo-tolerant path.
    if compact.len() < 5 {
        return None;
    }

    let mut best: Option<(&'static str, usize)> = None;
    for (alias, canonical) in COMPACT_ALIAS_TO_CANONICAL.iter() {
        if alias.len() < 5 || canonical.len() < 5 {
            continue;
        }

        let distance = damerau_levenshtein(compact, alias);
        if distance == 0 {
            return Some(canonical);
        }

        let len = compact.len().max(alias.len());
        let acceptable = distance == 1 || (len >= 8 && distance == 2);
        if !acceptable {
            continue;
        }

        match best {
            Some((_, best_dist)) if distance >= best_dist => {}
            _ => best = Some((canonical, distance)),
        }
    }

    best.map(|(canonical, _)| canonical)
}

fn match_canonical_token(token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }

    if let Some(canonical) = ALIAS_TO_CANONICAL.get(token) {
        return Some((*canonical).to_string());
    }

    let compact = compact_key(token);
    if let Some(canonical) = COMPACT_ALIAS_TO_CANONICAL.get(&compact) {
        return Some((*canonical).to_string());
    }

    fuzzy_match_canonical(&compact).map(str::to_string)
}

/// Canonicalize a single skill entry. Unknown skills pass through
/// lowercased and trimmed rather than being dropped.
pub fn normalize_skill(skill: &str) -> String {
    let normalized = nfkc_lower_trim(skill);
    match match_canonical_token(&normalized) {
        Some(canonical) => canonical,
        None => normalized,
    }
}

/// Split a stored skill field (comma or semicolon delimited) into canonical
/// tokens. Blank segments and duplicates disappear; order is sorted for
/// deterministic output.
pub fn tokenize_skill_field(raw: &str) -> Vec<String> {
    let mut tokens: Vec<String> = raw
        .split([',', ';'])
        .map(normalize_skill)
        .filter(|s| !s.is_empty())
        .collect();
    tokens.sort();
    tokens.dedup();
    tokens
}

/// Normalized set form used by the overlap factor.
pub fn normalize_skill_set(skills: &[String]) -> HashSet<String> {
    skills
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| normalize_skill(s))
        .collect()
}
