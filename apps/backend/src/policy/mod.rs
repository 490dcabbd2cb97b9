//! Ownership policy.
//!
//! Decides whether an authenticated identity may touch a slice of job or bit
//! data. Every check is a string comparison; nothing here performs I/O, so a
//! denied request never reaches the record store.

use crate::auth::Identity;
use crate::error::AppError;
use crate::logging::security;
use crate::store::{Document, Field, Filter};

/// Which owner field of a record a route acts through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// `employer_email`
    Employer,
    /// `userEmail`
    Applicant,
    /// Either owner field
    Either,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Forbidden,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Check a route requires before any data access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// A valid session, no path email to match.
    Authenticated,
    /// A valid session whose email equals the route's email parameter.
    SelfOnly(Role),
}

/// Every data route, named by what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteIntent {
    ListJobs,
    ListJobsByCategory,
    FetchJob,
    ListPostedJobs,
    CreateJob,
    UpdateJob,
    DeleteJob,
    ListAllBits,
    ListOwnBits,
    ListBitRequests,
    FetchBit,
    CreateBit,
    UpdateBitProgress,
    UpdateBitRequestStatus,
}

impl RouteIntent {
    pub const ALL: [RouteIntent; 14] = [
        RouteIntent::ListJobs,
        RouteIntent::ListJobsByCategory,
        RouteIntent::FetchJob,
        RouteIntent::ListPostedJobs,
        RouteIntent::CreateJob,
        RouteIntent::UpdateJob,
        RouteIntent::DeleteJob,
        RouteIntent::ListAllBits,
        RouteIntent::ListOwnBits,
        RouteIntent::ListBitRequests,
        RouteIntent::FetchBit,
        RouteIntent::CreateBit,
        RouteIntent::UpdateBitProgress,
        RouteIntent::UpdateBitRequestStatus,
    ];

    pub fn access(self) -> Access {
        use RouteIntent::*;
        match self {
            ListJobs | ListJobsByCategory | FetchJob => Access::Public,
            ListAllBits | CreateJob | CreateBit => Access::Authenticated,
            ListPostedJobs | UpdateJob | DeleteJob | ListBitRequests | UpdateBitRequestStatus => {
                Access::SelfOnly(Role::Employer)
            }
            ListOwnBits | UpdateBitProgress => Access::SelfOnly(Role::Applicant),
            FetchBit => Access::SelfOnly(Role::Either),
        }
    }
}

/// Owner fields of a record, as far as the policy cares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Owners<'a> {
    pub employer_email: Option<&'a str>,
    pub user_email: Option<&'a str>,
}

impl<'a> Owners<'a> {
    pub fn of(doc: &'a Document) -> Self {
        Self {
            employer_email: Field::EmployerEmail.read(doc),
            user_email: Field::UserEmail.read(doc),
        }
    }
}

/// Allow iff the identity is the one named by the route. Exact comparison.
pub fn authorize(identity: &Identity, route_email: &str) -> Decision {
    if identity.email == route_email {
        Decision::Allow
    } else {
        Decision::Forbidden
    }
}

/// Allow iff the owner field selected by `role` names the identity.
pub fn authorize_owner(identity: &Identity, owners: &Owners<'_>, role: Role) -> Decision {
    let is_me = |owner: Option<&str>| owner == Some(identity.email.as_str());
    let allowed = match role {
        Role::Employer => is_me(owners.employer_email),
        Role::Applicant => is_me(owners.user_email),
        Role::Either => is_me(owners.employer_email) || is_me(owners.user_email),
    };
    if allowed {
        Decision::Allow
    } else {
        Decision::Forbidden
    }
}

/// Proof that a request passed its route's check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clearance {
    email: Option<String>,
    role: Option<Role>,
}

impl Clearance {
    /// The cleared identity's email, absent on public routes.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Restrict `filter` to records the cleared identity owns in its role.
    /// Public and authenticated-only clearances leave the filter unchanged.
    pub fn scope(&self, filter: Filter) -> Filter {
        let (Some(email), Some(role)) = (self.email.as_ref(), self.role) else {
            return filter;
        };
        match role {
            Role::Employer => filter.eq(Field::EmployerEmail, email.clone()),
            Role::Applicant => filter.eq(Field::UserEmail, email.clone()),
            Role::Either => filter.any_of([
                (Field::EmployerEmail, email.clone()),
                (Field::UserEmail, email.clone()),
            ]),
        }
    }

    /// Require the cleared identity to own `doc` in `role`. Used for bodies of
    /// create requests, where there is no path email to compare against.
    pub fn require_owner(&self, doc: &Document, role: Role) -> Result<(), AppError> {
        let email = self.email.as_deref().ok_or_else(AppError::unauthorized)?;
        let owners = Owners::of(doc);
        match authorize_owner(&Identity::new(email), &owners, role) {
            Decision::Allow => Ok(()),
            Decision::Forbidden => {
                let claimed = match role {
                    Role::Applicant => owners.user_email,
                    _ => owners.employer_email,
                };
                security::ownership_denied(email, claimed.unwrap_or(""));
                Err(AppError::forbidden())
            }
        }
    }
}

/// Run the check `intent` requires.
///
/// `route_email` is the email path parameter of self-only routes.
pub fn clear(
    intent: RouteIntent,
    identity: Option<&Identity>,
    route_email: Option<&str>,
) -> Result<Clearance, AppError> {
    match intent.access() {
        Access::Public => Ok(Clearance {
            email: identity.map(|i| i.email.clone()),
            role: None,
        }),
        Access::Authenticated => {
            let identity = identity.ok_or_else(AppError::unauthorized)?;
            Ok(Clearance {
                email: Some(identity.email.clone()),
                role: None,
            })
        }
        Access::SelfOnly(role) => {
            let identity = identity.ok_or_else(AppError::unauthorized)?;
            let route_email = route_email.ok_or_else(|| {
                AppError::internal(format!("{intent:?} requires an email path parameter"))
            })?;
            match authorize(identity, route_email) {
                Decision::Allow => Ok(Clearance {
                    email: Some(identity.email.clone()),
                    role: Some(role),
                }),
                Decision::Forbidden => {
                    security::ownership_denied(&identity.email, route_email);
                    Err(AppError::forbidden())
                }
            }
        }
    }
}
