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

//! Fixed ticket prices and the policy used to fold them into a total.

use crate::ticket::TicketCategory;

/// Price of one adult ticket.
pub const ADULT_PRICE: u64 = 20;
/// Price of one child ticket.
pub const CHILD_PRICE: u64 = 10;
/// Infants travel free.
pub const INFANT_PRICE: u64 = 0;

/// Unit price for a category, `None` for unrecognized labels.
pub const fn unit_price(category: &TicketCategory) -> Option<u64> {
    match category {
        TicketCategory::Adult => Some(ADULT_PRICE),
        TicketCategory::Child => Some(CHILD_PRICE),
        TicketCategory::Infant => Some(INFANT_PRICE),
        TicketCategory::Unrecognized(_) => None,
    }
}

/// How a request's contribution to the total price is computed.
///
/// The two policies agree whenever each category appears in at most one
/// request. They differ once a category is split across requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PricingPolicy {
    /// Each request adds `unit_price * running_count`, where the running count
    /// includes every earlier request of the same category.
    ///
    /// `ADULT x2` then `ADULT x3` costs `20 * 2 + 20 * 5 = 140`.
    #[default]
    RunningTotal,
    /// Each request adds `unit_price * request_count`.
    ///
    /// `ADULT x2` then `ADULT x3` costs `20 * 5 = 100`.
    PerRequest,
}

impl PricingPolicy {
    /// Price added to the total after folding in one request.
    pub(crate) const fn charge(self, unit_price: u64, running_count: u64, request_count: u64) -> u64 {
        match self {
            Self::RunningTotal => unit_price.saturating_mul(running_count),
            Self::PerRequest => unit_price.saturating_mul(request_count),
        }
    }
}
