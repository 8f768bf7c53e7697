/// A boolean that may be unknown.
///
/// Used wherever the underlying data is an estimate that can be missing
/// (time-to-death, untracked durations). Unknown is never silently coerced:
/// callers pick their conservative default with [`Tristate::or_assume`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tristate {
    True,
    False,
    Unknown,
}

impl Tristate {
    /// `None` becomes `Unknown`.
    pub fn from_option(value: Option<bool>) -> Self {
        match value {
            Some(true) => Tristate::True,
            Some(false) => Tristate::False,
            None => Tristate::Unknown,
        }
    }

    pub fn is_true(self) -> bool {
        matches!(self, Tristate::True)
    }

    pub fn is_false(self) -> bool {
        matches!(self, Tristate::False)
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Tristate::Unknown)
    }

    /// Collapses to a boolean, substituting `default` for `Unknown`.
    pub fn or_assume(self, default: bool) -> bool {
        match self {
            Tristate::True => true,
            Tristate::False => false,
            Tristate::Unknown => default,
        }
    }

    /// Kleene conjunction: `False` dominates, then `Unknown`.
    pub fn and(self, other: Tristate) -> Tristate {
        match (self, other) {
            (Tristate::False, _) | (_, Tristate::False) => Tristate::False,
            (Tristate::True, Tristate::True) => Tristate::True,
            _ => Tristate::Unknown,
        }
    }

    /// Kleene negation: `Unknown` stays `Unknown`.
    pub fn negate(self) -> Tristate {
        match self {
            Tristate::True => Tristate::False,
            Tristate::False => Tristate::True,
            Tristate::Unknown => Tristate::Unknown,
        }
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value { Tristate::True } else { Tristate::False }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_uses_caller_default() {
        assert!(Tristate::Unknown.or_assume(true));
        assert!(!Tristate::Unknown.or_assume(false));
        assert!(Tristate::True.or_assume(false));
        assert!(!Tristate::False.or_assume(true));
    }

    #[test]
    fn kleene_logic() {
        assert_eq!(Tristate::Unknown.and(Tristate::False), Tristate::False);
        assert_eq!(Tristate::Unknown.and(Tristate::True), Tristate::Unknown);
        assert_eq!(Tristate::True.and(Tristate::True), Tristate::True);
        assert_eq!(Tristate::Unknown.negate(), Tristate::Unknown);
        assert_eq!(Tristate::from_option(None), Tristate::Unknown);
    }
}
