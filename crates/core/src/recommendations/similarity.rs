//! Cuisine similarity resolution

/// Score when the candidate cuisine matches a preferred cuisine exactly
pub const EXACT_MATCH: f64 = 1.0;
/// Score when the candidate cuisine is adjacent to a preferred cuisine
pub const SIMILAR_MATCH: f64 = 0.7;
/// Score when the user expressed no cuisine preference
pub const NO_PREFERENCE: f64 = 0.5;
/// Floor for unrelated cuisines; never zero so no venue is excluded outright
pub const WEAK_MATCH: f64 = 0.2;

/// Cuisines considered close enough to substitute for one another
const SIMILAR_CUISINES: &[(&str, &[&str])] = &[
    ("italian", &["mediterranean", "pizza", "french"]),
    ("chinese", &["asian", "thai", "japanese", "pan asian"]),
    ("indian", &["north indian", "south indian", "mughlai"]),
    ("japanese", &["sushi", "asian", "korean"]),
    ("mexican", &["tex-mex", "latin american", "spanish"]),
    ("thai", &["asian", "vietnamese", "chinese"]),
    ("french", &["continental", "european", "italian"]),
    ("american", &["burgers", "bbq", "continental"]),
    ("mediterranean", &["greek", "lebanese", "middle eastern", "italian"]),
    ("continental", &["european", "french", "american"]),
];

fn adjacent(from: &str, to: &str) -> bool {
    SIMILAR_CUISINES
        .iter()
        .find(|(cuisine, _)| *cuisine == from)
        .map(|(_, similar)| similar.contains(&to))
        .unwrap_or(false)
}

/// Score how well `candidate` fits a set of preferred cuisines.
///
/// Comparison is case-insensitive. The adjacency table is consulted in both
/// directions, so a preferred "sushi" still finds a "japanese" venue similar.
pub fn resolve<S: AsRef<str>>(candidate: &str, preferred: &[S]) -> f64 {
    let preferred: Vec<String> = preferred
        .iter()
        .map(|cuisine| cuisine.as_ref().trim().to_lowercase())
        .filter(|cuisine| !cuisine.is_empty())
        .collect();

    if preferred.is_empty() {
        return NO_PREFERENCE;
    }

    let candidate = candidate.trim().to_lowercase();

    if preferred.iter().any(|cuisine| *cuisine == candidate) {
        return EXACT_MATCH;
    }

    let is_similar = preferred
        .iter()
        .any(|cuisine| adjacent(cuisine, &candidate) || adjacent(&candidate, cuisine));

    if is_similar {
        SIMILAR_MATCH
    } else {
        WEAK_MATCH
    }
}
