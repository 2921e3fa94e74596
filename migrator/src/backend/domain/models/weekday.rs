//! Domain model for the weekdays a medication is taken on.
use std::fmt;

/// A day of the week, in the order the app displays them (Monday first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Canonical ordering of the 3-letter labels
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// The 3-letter Spanish label stored by current app versions
    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "Lun",
            Weekday::Tuesday => "Mar",
            Weekday::Wednesday => "Mié",
            Weekday::Thursday => "Jue",
            Weekday::Friday => "Vie",
            Weekday::Saturday => "Sab",
            Weekday::Sunday => "Dom",
        }
    }

    /// The single-letter code stored by older app versions
    pub fn legacy_code(&self) -> &'static str {
        match self {
            Weekday::Monday => "L",
            Weekday::Tuesday => "M",
            Weekday::Wednesday => "X",
            Weekday::Thursday => "J",
            Weekday::Friday => "V",
            Weekday::Saturday => "S",
            Weekday::Sunday => "D",
        }
    }

    /// Look up a legacy code. Matching is exact: `"m"` is not a code.
    pub fn from_legacy_code(code: &str) -> Option<Weekday> {
        match code {
            "L" => Some(Weekday::Monday),
            "M" => Some(Weekday::Tuesday),
            "X" => Some(Weekday::Wednesday),
            "J" => Some(Weekday::Thursday),
            "V" => Some(Weekday::Friday),
            "S" => Some(Weekday::Saturday),
            "D" => Some(Weekday::Sunday),
            _ => None,
        }
    }

    /// Look up a canonical 3-letter label
    pub fn from_label(label: &str) -> Option<Weekday> {
        Weekday::ALL.into_iter().find(|day| day.label() == label)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
