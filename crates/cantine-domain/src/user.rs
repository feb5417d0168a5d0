//! User-facing enums: role, site, department.

use serde::{Deserialize, Serialize};

/// User role.
///
/// Wire format: `u8` (0 = Employee, 1 = Secretary, 2 = Caterer, 3 = Admin).
/// Stored as `i16` in the users table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee = 0,
    Secretary = 1,
    Caterer = 2,
    Admin = 3,
}

impl Role {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Employee),
            1 => Some(Self::Secretary),
            2 => Some(Self::Caterer),
            3 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Any non-employee role.
    pub fn is_staff(self) -> bool {
        !matches!(self, Self::Employee)
    }

    /// Roles allowed to manage menus and advance order fulfilment.
    pub fn manages_orders(self) -> bool {
        matches!(self, Self::Admin | Self::Caterer)
    }

    /// Roles allowed to moderate reviews.
    pub fn moderates_reviews(self) -> bool {
        matches!(self, Self::Admin | Self::Secretary)
    }
}

/// Cafeteria site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    Danga = 0,
    Campus = 1,
}

impl Site {
    pub const ALL: [Site; 2] = [Site::Danga, Site::Campus];

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Danga),
            1 => Some(Self::Campus),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Organizational department of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Development = 0,
    HumanResources = 1,
    Accounting = 2,
    Marketing = 3,
    Data = 4,
    Cybersecurity = 5,
    Infrastructure = 6,
    Secretariat = 7,
    Other = 8,
}

impl Department {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Development),
            1 => Some(Self::HumanResources),
            2 => Some(Self::Accounting),
            3 => Some(Self::Marketing),
            4 => Some(Self::Data),
            5 => Some(Self::Cybersecurity),
            6 => Some(Self::Infrastructure),
            7 => Some(Self::Secretariat),
            8 => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
