use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Optional role an agent speaks as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Persona {
    Patient,
    Doctor,
    Teacher,
    Engineer,
    Student,
}

impl Persona {
    pub const ALL: [Persona; 5] = [
        Persona::Patient,
        Persona::Doctor,
        Persona::Teacher,
        Persona::Engineer,
        Persona::Student,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Persona::Patient => "Patient",
            Persona::Doctor => "Doctor",
            Persona::Teacher => "Teacher",
            Persona::Engineer => "Engineer",
            Persona::Student => "Student",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Persona {
    type Err = String;

    /// Case-insensitive match against the persona names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Persona::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = Persona::ALL.iter().map(|p| p.name()).collect();
                format!("unknown persona '{}'; expected one of {}", wanted, names.join(", "))
            })
    }
}
