// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Ticket categories and per-category purchase requests.
//!
//! # Example
//!
//! ```
//! use ticket_service_rs::{TicketCategory, TicketTypeRequest};
//!
//! let request = TicketTypeRequest::new(TicketCategory::Adult, 2).unwrap();
//! assert_eq!(request.count(), 2);
//! assert_eq!("child".parse::<TicketCategory>().unwrap(), TicketCategory::Child);
//! ```

use crate::error::PurchaseError;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Category of a ticket.
///
/// Labels other than `ADULT`, `CHILD` and `INFANT` are kept as
/// [`TicketCategory::Unrecognized`] and rejected when a purchase is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketCategory {
    Adult,
    Child,
    Infant,
    Unrecognized(String),
}

impl TicketCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Adult => "ADULT",
            Self::Child => "CHILD",
            Self::Infant => "INFANT",
            Self::Unrecognized(label) => label,
        }
    }

    /// Whether holders of this ticket occupy a seat.
    pub const fn occupies_seat(&self) -> bool {
        matches!(self, Self::Adult | Self::Child)
    }
}

impl From<&str> for TicketCategory {
    fn from(label: &str) -> Self {
        let label = label.trim();
        match label.to_uppercase().as_str() {
            "ADULT" => Self::Adult,
            "CHILD" => Self::Child,
            "INFANT" => Self::Infant,
            _ => Self::Unrecognized(label.to_owned()),
        }
    }
}

impl From<String> for TicketCategory {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<TicketCategory> for String {
    fn from(category: TicketCategory) -> Self {
        match category {
            TicketCategory::Unrecognized(label) => label,
            known => known.as_str().to_owned(),
        }
    }
}

impl FromStr for TicketCategory {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request for `count` tickets of one category.
///
/// Immutable once built; the count is always at least one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTicketTypeRequest")]
pub struct TicketTypeRequest {
    category: TicketCategory,
    count: u32,
}

impl TicketTypeRequest {
    /// # Errors
    ///
    /// Returns [`PurchaseError::InvalidTicketCount`] when `count` is zero.
    pub fn new(category: impl Into<TicketCategory>, count: u32) -> Result<Self, PurchaseError> {
        if count == 0 {
            return Err(PurchaseError::InvalidTicketCount);
        }
        Ok(Self {
            category: category.into(),
            count,
        })
    }

    pub fn category(&self) -> &TicketCategory {
        &self.category
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[derive(Deserialize)]
struct RawTicketTypeRequest {
    category: TicketCategory,
    count: u32,
}

impl TryFrom<RawTicketTypeRequest> for TicketTypeRequest {
    type Error = PurchaseError;

    fn try_from(raw: RawTicketTypeRequest) -> Result<Self, Self::Error> {
        Self::new(raw.category, raw.count)
    }
}
