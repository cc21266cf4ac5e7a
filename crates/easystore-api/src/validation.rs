//! Field validation for employees and outlets
//!
//! Each entity has a fixed, ordered list of named rules. Rules run in order
//! and the first failure is the only one reported. Format rules never touch
//! the database; uniqueness rules do, and skip the record being updated.

use easystore_db::{Database, Status, UniqueField};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::error::ApiError;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// Required length of a phone number
pub const PHONE_LENGTH: usize = 10;

/// Whether the candidate is a new record or changes to an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    /// Update of the record with this id
    Update(i64),
}

impl Operation {
    fn exclude_id(&self) -> Option<i64> {
        match self {
            Operation::Create => None,
            Operation::Update(id) => Some(*id),
        }
    }
}

/// A single validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Every required field is present and non-empty (create only)
    Required,
    PhoneLength,
    StatusValue,
    EmailFormat,
    UniqueEmail,
    UniquePhone,
    UniqueWebsite,
}

/// The first rule a candidate broke
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    #[error("All fields are required")]
    MissingFields,

    #[error("Phone number must be 10 digits")]
    PhoneLength,

    #[error("Status must be active or inactive")]
    InvalidStatus,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Email already exists")]
    EmailTaken,

    #[error("Phone number already exists")]
    PhoneTaken,

    #[error("Website already exists")]
    WebsiteTaken,
}

/// Entity kinds that go through field validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Employee,
    Outlet,
}

pub const EMPLOYEE_RULES: &[Rule] = &[
    Rule::Required,
    Rule::PhoneLength,
    Rule::EmailFormat,
    Rule::UniqueEmail,
    Rule::UniquePhone,
];

pub const OUTLET_RULES: &[Rule] = &[
    Rule::Required,
    Rule::PhoneLength,
    Rule::StatusValue,
    Rule::EmailFormat,
    Rule::UniqueEmail,
    Rule::UniquePhone,
    Rule::UniqueWebsite,
];

impl Entity {
    pub fn rules(&self) -> &'static [Rule] {
        match self {
            Entity::Employee => EMPLOYEE_RULES,
            Entity::Outlet => OUTLET_RULES,
        }
    }

    fn unique_field(&self, rule: Rule) -> Option<UniqueField> {
        match (self, rule) {
            (Entity::Employee, Rule::UniqueEmail) => Some(UniqueField::EmployeeEmail),
            (Entity::Employee, Rule::UniquePhone) => Some(UniqueField::EmployeePhone),
            (Entity::Outlet, Rule::UniqueEmail) => Some(UniqueField::OutletEmail),
            (Entity::Outlet, Rule::UniquePhone) => Some(UniqueField::OutletPhone),
            (Entity::Outlet, Rule::UniqueWebsite) => Some(UniqueField::OutletWebsite),
            _ => None,
        }
    }
}

/// Field values of a record under validation.
///
/// `None` means the field was not supplied; on update such fields are
/// left untouched and skipped by every rule.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub entity: Entity,
    pub required: Vec<Option<&'a str>>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub website: Option<&'a str>,
    pub status: Option<&'a str>,
}

impl<'a> Candidate<'a> {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            required: Vec::new(),
            phone: None,
            email: None,
            website: None,
            status: None,
        }
    }

    fn value_for(&self, rule: Rule) -> Option<&'a str> {
        match rule {
            Rule::UniqueEmail | Rule::EmailFormat => self.email,
            Rule::UniquePhone | Rule::PhoneLength => self.phone,
            Rule::UniqueWebsite => self.website,
            Rule::StatusValue => self.status,
            Rule::Required => None,
        }
    }
}

/// Checks that need no storage access
fn check_format(candidate: &Candidate<'_>, rule: Rule, op: Operation) -> Result<(), Violation> {
    match rule {
        Rule::Required => {
            let missing = candidate
                .required
                .iter()
                .any(|value| value.is_none_or(|v| v.trim().is_empty()));
            if op == Operation::Create && missing {
                return Err(Violation::MissingFields);
            }
        }
        Rule::PhoneLength => {
            if let Some(phone) = candidate.phone {
                if phone.chars().count() != PHONE_LENGTH {
                    return Err(Violation::PhoneLength);
                }
            }
        }
        Rule::StatusValue => {
            if let Some(status) = candidate.status {
                status.parse::<Status>().map_err(|_| Violation::InvalidStatus)?;
            }
        }
        Rule::EmailFormat => {
            if let Some(email) = candidate.email {
                if !EMAIL_REGEX.is_match(email) {
                    return Err(Violation::InvalidEmail);
                }
            }
        }
        Rule::UniqueEmail | Rule::UniquePhone | Rule::UniqueWebsite => {}
    }
    Ok(())
}

fn taken_violation(rule: Rule) -> Violation {
    match rule {
        Rule::UniquePhone => Violation::PhoneTaken,
        Rule::UniqueWebsite => Violation::WebsiteTaken,
        _ => Violation::EmailTaken,
    }
}

/// Run the entity's rules in order, stopping at the first failure
pub async fn validate(
    db: &Database,
    candidate: &Candidate<'_>,
    op: Operation,
) -> Result<(), ApiError> {
    for &rule in candidate.entity.rules() {
        check_format(candidate, rule, op)?;

        let Some(field) = candidate.entity.unique_field(rule) else {
            continue;
        };
        let Some(value) = candidate.value_for(rule) else {
            continue;
        };

        if db.is_taken(field, value, op.exclude_id()).await? {
            debug!("Validation failed on {:?}: {:?} is taken", candidate.entity, field);
            return Err(taken_violation(rule).into());
        }
    }

    Ok(())
}
