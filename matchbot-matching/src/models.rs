use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::matching::scoring::normalize_interests;
use crate::schema::{likes, matches, passes, profiles};

pub use matchbot_shared::UserId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`, expected one of: {expected}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

// --- Gender / Preference ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(UnknownVariant {
                kind: "gender",
                value: s.to_string(),
                expected: "Male, Female, Other",
            }),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which gender(s) a profile wants to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preference {
    Male,
    Female,
    Any,
}

impl Preference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Any => "Any",
        }
    }
}

impl FromStr for Preference {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "any" => Ok(Self::Any),
            _ => Err(UnknownVariant {
                kind: "preference",
                value: s.to_string(),
                expected: "Male, Female, Any",
            }),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Profile ---

#[derive(Debug, Queryable, Serialize, Clone, PartialEq)]
#[diesel(table_name = profiles)]
pub struct Profile {
    pub user_id: UserId,
    pub display_name: String,
    pub age: Option<i32>,
    pub gender: String,
    pub preference: String,
    /// Comma-delimited, as entered.
    pub interests: String,
    pub bio: String,
    pub handle: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Profile {
    pub fn interest_set(&self) -> BTreeSet<String> {
        normalize_interests(&self.interests)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile<'a> {
    pub user_id: UserId,
    pub display_name: &'a str,
    pub age: Option<i32>,
    pub gender: &'a str,
    pub preference: &'a str,
    pub interests: &'a str,
    pub bio: &'a str,
    pub handle: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

// --- Like / Pass ---

#[derive(Debug, Insertable)]
#[diesel(table_name = likes)]
pub struct NewLike {
    pub liker_id: UserId,
    pub liked_id: UserId,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = passes)]
pub struct NewPass {
    pub passer_id: UserId,
    pub passed_id: UserId,
    pub created_at: NaiveDateTime,
}

// --- Match ---

/// Mutual match, stored with `user_a_id <= user_b_id`.
#[derive(Debug, Queryable, Serialize, Clone, PartialEq)]
#[diesel(table_name = matches)]
pub struct Match {
    pub user_a_id: UserId,
    pub user_b_id: UserId,
    pub created_at: NaiveDateTime,
}

impl Match {
    /// The other participant, seen from `user_id`.
    pub fn counterpart(&self, user_id: UserId) -> UserId {
        if self.user_a_id == user_id {
            self.user_b_id
        } else {
            self.user_a_id
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatch {
    pub user_a_id: UserId,
    pub user_b_id: UserId,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_and_preference_parse_case_insensitively() {
        assert_eq!(" female ".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("MALE".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!("any".parse::<Preference>(), Ok(Preference::Any));
        assert!("any".parse::<Gender>().is_err());
        assert!("other".parse::<Preference>().is_err());
    }

    #[test]
    fn unknown_variant_names_the_choices() {
        let err = "robot".parse::<Gender>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown gender `robot`, expected one of: Male, Female, Other"
        );
    }

    #[test]
    fn counterpart_works_from_either_side() {
        let m = Match {
            user_a_id: 3,
            user_b_id: 8,
            created_at: chrono::Utc::now().naive_utc(),
        };
        assert_eq!(m.counterpart(3), 8);
        assert_eq!(m.counterpart(8), 3);
    }
}
