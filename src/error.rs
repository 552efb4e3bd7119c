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

//! Error types for ticket purchases.

use crate::gateway::GatewayError;
use thiserror::Error;

/// Reasons a ticket purchase is rejected.
///
/// Validation errors are raised before any gateway is contacted.
/// [`PurchaseError::GatewayFailure`] is the only variant that can follow a
/// side effect (a payment may already have been taken).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    /// Account identifier is zero, negative or not an integer
    #[error("invalid account identifier")]
    InvalidAccount,

    /// No ticket requests were supplied
    #[error("no ticket request")]
    EmptyRequest,

    /// A request names a category outside ADULT, CHILD and INFANT
    #[error("invalid ticket type: {0}")]
    InvalidTicketType(String),

    /// A request asks for zero or a negative number of tickets
    #[error("invalid ticket count (must be positive)")]
    InvalidTicketCount,

    /// Tickets were requested without any adult
    #[error("adult required for ticket purchase")]
    MissingAdult,

    /// The purchase exceeds the per-purchase ticket limit
    #[error("exceeds maximum ticket count")]
    TooManyTickets,

    /// More infants than adults to hold them
    #[error("too many infants relative to adults")]
    InfantAdultImbalance,

    /// Payment or seat reservation failed; carries the gateway's message
    #[error("{0}")]
    GatewayFailure(String),
}

impl PurchaseError {
    /// Stable machine-readable reason code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidAccount => "INVALID_ACCOUNT",
            Self::EmptyRequest => "EMPTY_REQUEST",
            Self::InvalidTicketType(_) => "INVALID_TICKET_TYPE",
            Self::InvalidTicketCount => "INVALID_TICKET_COUNT",
            Self::MissingAdult => "MISSING_ADULT",
            Self::TooManyTickets => "TOO_MANY_TICKETS",
            Self::InfantAdultImbalance => "INFANT_ADULT_IMBALANCE",
            Self::GatewayFailure(_) => "GATEWAY_FAILURE",
        }
    }
}

impl From<GatewayError> for PurchaseError {
    fn from(err: GatewayError) -> Self {
        Self::GatewayFailure(err.message().to_owned())
    }
}
