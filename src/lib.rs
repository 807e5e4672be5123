//! Map-style argument parsing with typed accessors.
//!
//! This crate is intentionally small and self-contained: an [`args::ArgsTable`]
//! is built once from the process argument vector at startup and then queried
//! from anywhere in the embedding application. Parsing never fails; malformed
//! input degrades to defined fallback values instead of errors.

pub mod args {
    use indexmap::IndexMap;

    /// One stored occurrence of a flag.
    ///
    /// A token like `-flag=value` produces an occurrence with an explicit
    /// value; a bare `-flag` produces one with no value at all. The two are
    /// distinct states: `-flag=` carries an *empty* value, not an absent one.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Occurrence {
        value: Option<String>,
        negation: bool,
    }

    impl Occurrence {
        /// The assigned value, if an `=` was present in the token.
        pub fn value(&self) -> Option<&str> {
            self.value.as_deref()
        }

        /// Whether this entry was synthesized from a `no`-prefixed token.
        pub fn is_negation(&self) -> bool {
            self.negation
        }
    }

    /// Parsed arguments, keyed by flag name without leading dashes.
    ///
    /// Built once with [`ArgsTable::parse`] and immutable afterwards. Flag
    /// names are case-sensitive and keep their insertion order; every
    /// occurrence of a repeated flag is retained, with the first one
    /// determining the answers of the typed accessors.
    #[derive(Debug, Clone, Default)]
    pub struct ArgsTable {
        flags: IndexMap<String, Vec<Occurrence>>,
        positionals: Vec<String>,
    }

    impl ArgsTable {
        /// Parse an argument vector, excluding the program name.
        ///
        /// Tokens introduced by one or two dashes are stored as flags (`--`
        /// is plain sugar for `-`). A `no`-prefixed flag additionally stores
        /// a negation marker under the base name: `-nolisten` asserts
        /// `listen` false, while `-nolisten=0` cancels itself and asserts
        /// `listen` true. Everything else is kept as a positional token.
        pub fn parse<I, S>(argv: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: AsRef<str>,
        {
            let mut table = Self::default();
            for token in argv {
                let token = token.as_ref();

                let stripped = if let Some(rest) = token.strip_prefix("--") {
                    rest
                } else if let Some(rest) = token.strip_prefix('-') {
                    rest
                } else {
                    token
                };
                if stripped.len() == token.len() || stripped.is_empty() {
                    // No dashes, or nothing left after them (`-`, `--`).
                    tracing::trace!("ignoring positional token: {token}");
                    table.positionals.push(token.to_string());
                    continue;
                }

                let (name, value) = match stripped.split_once('=') {
                    Some((name, value)) => (name, Some(value.to_string())),
                    None => (stripped, None),
                };
                if name.is_empty() {
                    tracing::trace!("ignoring positional token: {token}");
                    table.positionals.push(token.to_string());
                    continue;
                }

                if let Some(base) = name.strip_prefix("no") {
                    if !base.is_empty() {
                        // -noX asserts X=0; -noX=0 cancels the negation and
                        // asserts X=1. The marker carries the resolved text.
                        let marker = if value.as_deref() == Some("0") { "1" } else { "0" };
                        tracing::trace!("negation marker: {base}={marker}");
                        table.push(base, Occurrence {
                            value: Some(marker.to_string()),
                            negation: true,
                        });
                    }
                }

                tracing::trace!("stored flag: {name}");
                table.push(name, Occurrence { value, negation: false });
            }
            table
        }

        fn push(&mut self, name: &str, occurrence: Occurrence) {
            self.flags
                .entry(name.to_string())
                .or_default()
                .push(occurrence);
        }

        /// The occurrence that answers queries for `name`: the first
        /// un-negated one if any exists (a positive flag outranks its
        /// negation regardless of order), otherwise the first negation
        /// marker.
        fn effective(&self, name: &str) -> Option<&Occurrence> {
            let occurrences = self.flags.get(name)?;
            occurrences
                .iter()
                .find(|o| !o.negation)
                .or_else(|| occurrences.first())
        }

        /// Boolean query. A present flag with no value or any value other
        /// than `"0"` is true; `"0"` is false. `default` only applies when
        /// `name` never occurs.
        pub fn get_bool(&self, name: &str, default: bool) -> bool {
            match self.effective(name) {
                Some(occurrence) => match occurrence.value() {
                    Some(value) => value != "0",
                    None => true,
                },
                None => default,
            }
        }

        /// String query. A present flag without `=value` yields the empty
        /// string; `default` only applies when `name` never occurs.
        pub fn get_str(&self, name: &str, default: &str) -> String {
            match self.effective(name) {
                Some(occurrence) => occurrence.value().unwrap_or("").to_string(),
                None => default.to_string(),
            }
        }

        /// Integer query, base 10. Non-numeric or missing value text yields
        /// 0 rather than an error or the default; only a wholly absent flag
        /// yields `default`.
        pub fn get_int(&self, name: &str, default: i64) -> i64 {
            match self.effective(name) {
                Some(occurrence) => {
                    occurrence.value().unwrap_or("").parse().unwrap_or(0)
                }
                None => default,
            }
        }

        /// Whether `name` occurs at all, as a flag or a negation marker.
        pub fn is_present(&self, name: &str) -> bool {
            self.flags.contains_key(name)
        }

        /// All occurrences of `name`, in argument-vector order.
        pub fn get_all(&self, name: &str) -> Option<&[Occurrence]> {
            self.flags.get(name).map(Vec::as_slice)
        }

        /// Tokens that were not stored as flags, in order.
        pub fn positionals(&self) -> &[String] {
            self.positionals.as_slice()
        }

        /// Number of distinct flag names parsed.
        pub fn len(&self) -> usize {
            self.flags.len()
        }

        pub fn is_empty(&self) -> bool {
            self.flags.is_empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::args::ArgsTable;

    fn parse(tokens: &[&str]) -> ArgsTable {
        ArgsTable::parse(tokens.iter().copied())
    }

    #[test]
    fn splits_at_first_equals_only() {
        let t = parse(&["-conf=path=with=equals"]);
        assert_eq!(t.get_str("conf", ""), "path=with=equals");
    }

    #[test]
    fn absent_and_empty_values_are_distinct() {
        let t = parse(&["-datadir"]);
        let occurrences = t.get_all("datadir").unwrap();
        assert_eq!(occurrences[0].value(), None);

        let t = parse(&["-datadir="]);
        let occurrences = t.get_all("datadir").unwrap();
        assert_eq!(occurrences[0].value(), Some(""));
    }

    #[test]
    fn bare_and_double_dashes_are_positionals() {
        let t = parse(&["-", "--", "blocks.dat"]);
        assert!(t.is_empty());
        assert_eq!(t.positionals(), ["-", "--", "blocks.dat"]);
    }

    #[test]
    fn dashless_tokens_are_never_flags() {
        let t = parse(&["daemon", "-daemon"]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.positionals(), ["daemon"]);
        assert!(t.get_bool("daemon", false));
    }

    #[test]
    fn empty_name_with_value_is_positional() {
        let t = parse(&["-=1"]);
        assert!(t.is_empty());
        assert_eq!(t.positionals(), ["-=1"]);
    }

    #[test]
    fn repeated_flags_keep_every_occurrence_in_order() {
        let t = parse(&["-connect=a", "-connect=b", "-connect"]);
        let values: Vec<_> = t
            .get_all("connect")
            .unwrap()
            .iter()
            .map(|o| o.value())
            .collect();
        assert_eq!(values, [Some("a"), Some("b"), None]);
    }

    #[test]
    fn negation_stores_marker_and_raw_entry() {
        let t = parse(&["-nolisten"]);
        assert!(t.is_present("listen"));
        assert!(t.is_present("nolisten"));

        let marker = &t.get_all("listen").unwrap()[0];
        assert!(marker.is_negation());
        assert_eq!(marker.value(), Some("0"));

        let raw = &t.get_all("nolisten").unwrap()[0];
        assert!(!raw.is_negation());
        assert_eq!(raw.value(), None);
    }

    #[test]
    fn cancelled_negation_marker_reads_true() {
        let t = parse(&["-nolisten=0"]);
        let marker = &t.get_all("listen").unwrap()[0];
        assert_eq!(marker.value(), Some("1"));
        assert!(t.get_bool("listen", false));
    }

    #[test]
    fn plain_no_flag_is_not_a_negation() {
        let t = parse(&["-no"]);
        assert_eq!(t.len(), 1);
        assert!(t.get_bool("no", false));

        let t = parse(&["-no=1"]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.get_str("no", ""), "1");
    }

    #[test]
    fn flag_names_are_case_sensitive() {
        let t = parse(&["-Daemon"]);
        assert!(t.is_present("Daemon"));
        assert!(!t.is_present("daemon"));
        assert!(!t.get_bool("daemon", false));
    }

    #[test]
    fn table_reports_distinct_name_count() {
        let t = parse(&["-a=1", "-a=2", "-b"]);
        assert_eq!(t.len(), 2);
        assert!(!t.is_empty());
        assert!(parse(&[]).is_empty());
    }
}
