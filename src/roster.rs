use rand::seq::SliceRandom;
use rand::Rng;

const DEFAULT_NAMES: [&str; 5] = ["Alan", "Bob", "Carol", "Dean", "Elin"];

/// Fixed set of display names used for senders and @mention suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Default for Roster {
    fn default() -> Self {
        Roster::new(DEFAULT_NAMES)
    }
}

impl Roster {
    /// # Panics
    ///
    /// Panics if `names` is empty; a sender must always be sampleable.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        assert!(!names.is_empty(), "roster needs at least one name");
        Roster { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Uniformly picks one name.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // non-empty by construction
        self.names.choose(rng).map_or("", String::as_str)
    }

    /// Names starting with `prefix`, ignoring case, in roster order.
    pub fn starting_with(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        self.names
            .iter()
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_roster_has_five_names() {
        let roster = Roster::default();
        assert_eq!(roster.names(), ["Alan", "Bob", "Carol", "Dean", "Elin"]);
    }

    #[test]
    fn sample_always_returns_member() {
        let roster = Roster::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(roster.contains(roster.sample(&mut rng)));
        }
    }

    #[test]
    fn prefix_filter_is_case_insensitive() {
        let roster = Roster::default();
        assert_eq!(roster.starting_with("b"), vec!["Bob"]);
        assert_eq!(roster.starting_with("CA"), vec!["Carol"]);
        assert_eq!(roster.starting_with(""), roster.names().to_vec());
        assert!(roster.starting_with("z").is_empty());
    }

    #[test]
    #[should_panic(expected = "roster needs at least one name")]
    fn empty_roster_is_rejected() {
        let _ = Roster::new(Vec::<String>::new());
    }
}
