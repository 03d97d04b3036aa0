//! Validated field newtypes shared by people, events and polls.
//!
//! Every field is validated on construction, including deserialization: the
//! serde representation is a plain string routed through [`TryFrom<String>`],
//! so a persisted file with a malformed phone number fails to load instead of
//! producing an invalid [`Person`](crate::Person).

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Characters allowed in the local part of an email address, besides
/// alphanumerics.
const EMAIL_LOCAL_SPECIALS: &str = "!#$%&'*+/=?`{|}~^.-";

/// Minimum number of digits in a phone number.
const PHONE_MIN_DIGITS: usize = 3;

/// Minimum length of an email domain.
const EMAIL_DOMAIN_MIN_LEN: usize = 2;

/// Errors produced when a raw value violates a field constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Names hold alphanumerics and spaces and start with an alphanumeric.
    #[error("invalid name {value:?}: names should only contain alphanumeric characters and spaces, and should not be blank")]
    InvalidName {
        /// The rejected value.
        value: String,
    },

    /// Phone numbers hold only digits, at least three of them.
    #[error("invalid phone {value:?}: phone numbers should only contain digits and be at least 3 digits long")]
    InvalidPhone {
        /// The rejected value.
        value: String,
    },

    /// Emails have the form `local@domain`.
    #[error("invalid email {value:?}: emails should be of the format local-part@domain")]
    InvalidEmail {
        /// The rejected value.
        value: String,
    },

    /// Addresses can hold anything but must not start with whitespace.
    #[error("invalid address {value:?}: addresses can take any value but should not be blank")]
    InvalidAddress {
        /// The rejected value.
        value: String,
    },

    /// Tags are single alphanumeric words.
    #[error("invalid tag {value:?}: tags should be alphanumeric")]
    InvalidTag {
        /// The rejected value.
        value: String,
    },

    /// Interests are single alphanumeric words.
    #[error("invalid interest {value:?}: interests should be alphanumeric")]
    InvalidInterest {
        /// The rejected value.
        value: String,
    },

    /// Poll and option labels must contain a non-whitespace character.
    #[error("label must not be blank")]
    BlankLabel,

    /// The end of a time range precedes its start.
    #[error("end time {end} is before start time {start}")]
    EndBeforeStart {
        /// Start of the rejected range.
        start: NaiveTime,
        /// End of the rejected range.
        end: NaiveTime,
    },
}

/// Generates a validated string newtype with standard derives and
/// conversions.
macro_rules! define_field {
    (
        $(#[$meta:meta])*
        $name:ident => $validate:path
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate `raw` and wrap it.
            ///
            /// # Errors
            ///
            /// Returns the [`FieldError`] describing the violated constraint.
            pub fn parse(raw: &str) -> Result<Self, FieldError> {
                $validate(raw)?;
                Ok(Self(raw.to_owned()))
            }

            /// Return the validated value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = FieldError;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                $validate(&raw)?;
                Ok(Self(raw))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl core::str::FromStr for $name {
            type Err = FieldError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Self::parse(raw)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_field! {
    /// A person or event name.
    Name => validate_name
}

define_field! {
    /// A phone number made of digits.
    Phone => validate_phone
}

define_field! {
    /// An email address.
    Email => validate_email
}

define_field! {
    /// A free-form postal address or venue.
    Address => validate_address
}

define_field! {
    /// A single-word tag attached to a person or event.
    Tag => validate_tag
}

define_field! {
    /// A single-word interest attached to a person.
    Interest => validate_interest
}

define_field! {
    /// A non-blank label used for poll names and poll options.
    Label => validate_label
}

fn validate_name(raw: &str) -> Result<(), FieldError> {
    let mut chars = raw.chars();
    let valid = chars.next().is_some_and(char::is_alphanumeric)
        && chars.all(|c| c.is_alphanumeric() || c == ' ');
    if valid {
        Ok(())
    } else {
        Err(FieldError::InvalidName {
            value: raw.to_owned(),
        })
    }
}

fn validate_phone(raw: &str) -> Result<(), FieldError> {
    if raw.len() >= PHONE_MIN_DIGITS && raw.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FieldError::InvalidPhone {
            value: raw.to_owned(),
        })
    }
}

fn validate_email(raw: &str) -> Result<(), FieldError> {
    let invalid = || FieldError::InvalidEmail {
        value: raw.to_owned(),
    };
    let (local, domain) = raw.split_once('@').ok_or_else(invalid)?;

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || EMAIL_LOCAL_SPECIALS.contains(c));
    let domain_ok = domain.len() >= EMAIL_DOMAIN_MIN_LEN
        && domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        });

    if local_ok && domain_ok {
        Ok(())
    } else {
        Err(invalid())
    }
}

fn validate_address(raw: &str) -> Result<(), FieldError> {
    if raw.chars().next().is_some_and(|c| !c.is_whitespace()) {
        Ok(())
    } else {
        Err(FieldError::InvalidAddress {
            value: raw.to_owned(),
        })
    }
}

fn is_single_word(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(char::is_alphanumeric)
}

fn validate_tag(raw: &str) -> Result<(), FieldError> {
    if is_single_word(raw) {
        Ok(())
    } else {
        Err(FieldError::InvalidTag {
            value: raw.to_owned(),
        })
    }
}

fn validate_interest(raw: &str) -> Result<(), FieldError> {
    if is_single_word(raw) {
        Ok(())
    } else {
        Err(FieldError::InvalidInterest {
            value: raw.to_owned(),
        })
    }
}

fn validate_label(raw: &str) -> Result<(), FieldError> {
    if raw.trim().is_empty() {
        Err(FieldError::BlankLabel)
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TimeRange
// ---------------------------------------------------------------------------

/// Unchecked wire form of a [`TimeRange`].
#[derive(Deserialize)]
struct RawTimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

/// A start/end time pair where the end is never before the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    /// Build a range, rejecting an end earlier than the start.
    ///
    /// A zero-length range (`start == end`) is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::EndBeforeStart`] when `end < start`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, FieldError> {
        if end < start {
            return Err(FieldError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start of the range.
    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    /// End of the range.
    pub const fn end(&self) -> NaiveTime {
        self.end
    }
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = FieldError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl core::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}
