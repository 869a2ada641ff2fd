//! Enumerations for record sources, statuses and roles.
//!
//! Each enum serializes to the exact label the REST mock stores. Labels the
//! console does not know decode into `Other` so a single foreign record cannot
//! fail a whole list fetch.

use serde::{Deserialize, Serialize};

/// Sales reps offered by the assignment dropdowns.
pub const REPS: &[&str] = &["Alice", "Bob", "Carol"];

/// Error returned when parsing a label that is not one of the known options.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value} (expected one of: {options})")]
pub struct UnknownOption {
    /// Which option list was consulted.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
    /// Comma separated valid labels.
    pub options: String,
}

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, default = $default:ident {
            $( $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $(
                #[doc = $label]
                $variant,
            )+
            /// A label not known to the console, kept verbatim.
            Other(String),
        }

        impl $name {
            /// Every known option, in dropdown order.
            #[must_use]
            pub fn all() -> Vec<Self> {
                vec![$(Self::$variant),+]
            }

            /// No option chosen yet (an empty dropdown).
            #[must_use]
            pub const fn unset() -> Self {
                Self::Other(String::new())
            }

            /// The label stored on the wire and shown in tables.
            #[must_use]
            pub fn label(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Other(raw) => raw,
                }
            }

            /// Known labels, for option lists and error messages.
            #[must_use]
            pub fn labels() -> Vec<&'static str> {
                vec![$($label),+]
            }

            /// Parse strictly: only known labels (case-insensitive) are accepted.
            ///
            /// # Errors
            ///
            /// Returns [`UnknownOption`] when the label is not a known option.
            pub fn parse_known(s: &str) -> Result<Self, UnknownOption> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($label) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownOption {
                    kind: $kind,
                    value: s.to_owned(),
                    options: Self::labels().join(", "),
                })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::parse_known(&raw).unwrap_or(Self::Other(raw))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.label().to_owned()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_known(s)
            }
        }
    };
}

labelled_enum! {
    /// Where a lead came from.
    LeadSource, "lead source", default = Website {
        Website => "Website",
        WalkIn => "Walk-in",
        Social => "Social",
        Referral => "Referral",
    }
}

labelled_enum! {
    /// Lead lifecycle status.
    LeadStatus, "lead status", default = New {
        New => "New",
        Contacted => "Contacted",
        Converted => "Converted",
        Junk => "Junk",
    }
}

labelled_enum! {
    /// Opportunity pipeline stage.
    OpportunityStatus, "opportunity status", default = Prospecting {
        Prospecting => "Prospecting",
        Qualification => "Qualification",
        Proposal => "Proposal",
        Negotiation => "Negotiation",
        Won => "Won",
        Lost => "Lost",
    }
}

labelled_enum! {
    /// Console user role.
    UserRole, "user role", default = SalesRep {
        Admin => "Admin",
        SalesRep => "Sales Rep",
        Manager => "Manager",
    }
}

impl LeadStatus {
    /// Whether the lead can still be converted to an opportunity.
    #[must_use]
    pub const fn is_convertible(&self) -> bool {
        !matches!(self, Self::Converted)
    }
}
