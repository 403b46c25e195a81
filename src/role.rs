//! Actor roles as assigned by the surrounding account system.

use std::fmt;

/// Roles are assigned externally and fixed for the duration of a single
/// transition evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, minicbor::Encode, minicbor::Decode)]
pub enum Role {
    #[n(0)]
    Owner,
    #[n(1)]
    Director,
    #[n(2)]
    FinanceManager,
    #[n(3)]
    Finance,
    #[n(4)]
    Administration,
    #[n(5)]
    OperationsManager,
    #[n(6)]
    Operations,
    #[n(7)]
    HumanResources,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Owner,
        Role::Director,
        Role::FinanceManager,
        Role::Finance,
        Role::Administration,
        Role::OperationsManager,
        Role::Operations,
        Role::HumanResources,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Director => "director",
            Role::FinanceManager => "finance_manager",
            Role::Finance => "finance",
            Role::Administration => "administration",
            Role::OperationsManager => "operations_manager",
            Role::Operations => "operations",
            Role::HumanResources => "hr",
        }
    }

    /// Parse the role string the account system stores. An unknown string is
    /// caller data, not a bug, so this returns `None` rather than panicking.
    /// "ops" survives as a legacy alias for operations.
    pub fn parse(raw: &str) -> Option<Role> {
        match raw {
            "owner" => Some(Role::Owner),
            "director" => Some(Role::Director),
            "finance_manager" => Some(Role::FinanceManager),
            "finance" => Some(Role::Finance),
            "administration" => Some(Role::Administration),
            "operations_manager" => Some(Role::OperationsManager),
            "operations" | "ops" => Some(Role::Operations),
            "hr" => Some(Role::HumanResources),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
