use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::ids::ExerciseId;

/// Identity entered on the login page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub group: String,
}

impl UserProfile {
    /// Builds a profile from raw form input. `id` is the login timestamp in ms.
    pub fn from_form(name: &str, surname: &str, group: &str, id: u64) -> Result<Self, SessionError> {
        let (name, surname, group) = (name.trim(), surname.trim(), group.trim());
        if name.is_empty() || surname.is_empty() || group.is_empty() {
            return Err(SessionError::IncompleteProfile);
        }
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            surname: surname.to_string(),
            group: group.to_string(),
        })
    }

    pub fn display_name(&self) -> String {
        alloc::format!("{} {}", self.name, self.surname)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    IncompleteProfile,
    /// A stored identity could not be decoded.
    CorruptProfile(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::IncompleteProfile => write!(f, "Please complete all fields."),
            SessionError::CorruptProfile(reason) => write!(f, "Stored profile is unreadable: {}", reason),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SessionError {}

/// One answered exercise as reported to the result relay.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct AnswerRecord {
    pub exercise: ExerciseId,
    pub question: String,
    pub selected: Option<u32>,
    pub correct: bool,
}

/// Payload POSTed to the result relay. Every field is free-form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResultSubmission {
    pub name: String,
    pub surname: String,
    pub group: String,
    pub book: String,
    pub unit: String,
    pub score: String,
    pub answers: Option<Vec<AnswerRecord>>,
}
