use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Mentor,
    Admin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MentorVerificationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Lifecycle state of a lead.
///
/// The legal edges are:
///
/// ```text
/// PENDING ──► VERIFIED ──► PURCHASED ──► INVITED ──► CONFIRMED
///    │                         │
///    └──► REJECTED             └──► PASSED
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    Pending,
    Verified,
    Rejected,
    Purchased,
    Invited,
    Confirmed,
    Passed,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 7] = [
        LeadStatus::Pending,
        LeadStatus::Verified,
        LeadStatus::Rejected,
        LeadStatus::Purchased,
        LeadStatus::Invited,
        LeadStatus::Confirmed,
        LeadStatus::Passed,
    ];

    pub fn can_transition_to(self, next: LeadStatus) -> bool {
        matches!(
            (self, next),
            (LeadStatus::Pending, LeadStatus::Verified)
                | (LeadStatus::Pending, LeadStatus::Rejected)
                | (LeadStatus::Verified, LeadStatus::Purchased)
                | (LeadStatus::Purchased, LeadStatus::Invited)
                | (LeadStatus::Purchased, LeadStatus::Passed)
                | (LeadStatus::Invited, LeadStatus::Confirmed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LeadStatus::Rejected | LeadStatus::Confirmed | LeadStatus::Passed
        )
    }

    /// A mentor has paid for the lead at some point.
    pub fn is_purchased(self) -> bool {
        matches!(
            self,
            LeadStatus::Purchased | LeadStatus::Invited | LeadStatus::Confirmed | LeadStatus::Passed
        )
    }

    /// Contact fields are only revealed to the owning mentor once purchased.
    pub fn reveals_contact(self) -> bool {
        self.is_purchased()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Paid,
    Cancelled,
}

impl InvitationStatus {
    pub fn is_active(self) -> bool {
        !matches!(self, InvitationStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentKind {
    LeadPurchase,
    Ticket,
}

macro_rules! text_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($ty::$variant),)+
                    other => Err(AppError::Validation(format!(
                        "Unknown {} value: {}",
                        stringify!($ty),
                        other
                    ))),
                }
            }
        }
    };
}

text_enum!(Role {
    User => "USER",
    Mentor => "MENTOR",
    Admin => "ADMIN",
});

text_enum!(MentorVerificationStatus {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

text_enum!(LeadStatus {
    Pending => "PENDING",
    Verified => "VERIFIED",
    Rejected => "REJECTED",
    Purchased => "PURCHASED",
    Invited => "INVITED",
    Confirmed => "CONFIRMED",
    Passed => "PASSED",
});

text_enum!(InvitationStatus {
    Pending => "PENDING",
    Paid => "PAID",
    Cancelled => "CANCELLED",
});

text_enum!(PaymentKind {
    LeadPurchase => "LEAD_PURCHASE",
    Ticket => "TICKET",
});

/// The authenticated caller of a domain operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn require_role(&self, required: Role) -> Result<(), AppError> {
        let allowed = match (self.role, required) {
            (Role::User, Role::User) => true,
            (Role::Mentor, Role::Mentor) => true,
            (Role::Admin, Role::Admin) => true,
            (Role::User, _) | (Role::Mentor, _) | (Role::Admin, _) => false,
        };

        if allowed {
            Ok(())
        } else {
            Err(AppError::NotAuthorized(format!(
                "{} role required",
                required.as_str()
            )))
        }
    }
}
