//! Built-in module design patterns.

use std::fmt;
use std::str::FromStr;

use crate::error::ModuleError;

/// One file family within a pattern, e.g. the `Conductor` of an MCH triad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    /// Appended to the module name (`""` for a plain module).
    pub suffix: &'static str,
    /// Sibling members this one depends on, by suffix.
    pub depends_on: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// A single source module.
    Src,
    /// Driver, Hardware.
    Dh,
    /// Driver, Interrupt, Hardware.
    Dih,
    /// Model, Conductor, Hardware.
    Mch,
    /// Model, Presenter, View.
    Mvp,
}

impl Pattern {
    #[must_use]
    pub const fn members(self) -> &'static [Member] {
        match self {
            Self::Src => &[Member {
                suffix: "",
                depends_on: &[],
            }],
            Self::Dh => &[
                Member {
                    suffix: "Driver",
                    depends_on: &["Hardware"],
                },
                Member {
                    suffix: "Hardware",
                    depends_on: &[],
                },
            ],
            Self::Dih => &[
                Member {
                    suffix: "Driver",
                    depends_on: &["Hardware", "Interrupt"],
                },
                Member {
                    suffix: "Interrupt",
                    depends_on: &["Hardware"],
                },
                Member {
                    suffix: "Hardware",
                    depends_on: &[],
                },
            ],
            Self::Mch => &[
                Member {
                    suffix: "Model",
                    depends_on: &[],
                },
                Member {
                    suffix: "Conductor",
                    depends_on: &["Model", "Hardware"],
                },
                Member {
                    suffix: "Hardware",
                    depends_on: &[],
                },
            ],
            Self::Mvp => &[
                Member {
                    suffix: "Model",
                    depends_on: &[],
                },
                Member {
                    suffix: "Presenter",
                    depends_on: &["Model", "View"],
                },
                Member {
                    suffix: "View",
                    depends_on: &[],
                },
            ],
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Src => "src",
            Self::Dh => "dh",
            Self::Dih => "dih",
            Self::Mch => "mch",
            Self::Mvp => "mvp",
        }
    }
}

impl FromStr for Pattern {
    type Err = ModuleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "src" => Ok(Self::Src),
            "dh" => Ok(Self::Dh),
            "dih" => Ok(Self::Dih),
            "mch" => Ok(Self::Mch),
            "mvp" => Ok(Self::Mvp),
            _ => Err(ModuleError::UnknownPattern(value.to_string())),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("src", Pattern::Src, 1)]
    #[case("DH", Pattern::Dh, 2)]
    #[case("dih", Pattern::Dih, 3)]
    #[case("Mch", Pattern::Mch, 3)]
    #[case("mvp", Pattern::Mvp, 3)]
    fn parses_case_insensitively(#[case] text: &str, #[case] pattern: Pattern, #[case] members: usize) {
        let parsed: Pattern = text.parse().expect("known pattern");
        assert_eq!(parsed, pattern);
        assert_eq!(parsed.members().len(), members);
    }

    #[test]
    fn unknown_pattern_is_rejected() {
        let err = "triad".parse::<Pattern>().expect_err("should fail");
        assert!(matches!(err, ModuleError::UnknownPattern(name) if name == "triad"));
    }

    #[test]
    fn conductor_depends_on_model_and_hardware() {
        let conductor = Pattern::Mch.members()[1];
        assert_eq!(conductor.suffix, "Conductor");
        assert_eq!(conductor.depends_on, &["Model", "Hardware"]);
    }
}
