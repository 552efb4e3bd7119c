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

//! Contracts for the external payment and seat reservation services.
//!
//! Both services are synchronous: a call either completes or returns a
//! [`GatewayError`]. Timeouts and retries, if any, belong to the
//! implementations behind these traits.

use crate::base::AccountId;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by an external service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GatewayError {
    message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Payment provider charged once per successful purchase.
pub trait TicketPaymentService {
    /// Charges `total_amount` to the account.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the charge could not be made.
    fn make_payment(&self, account_id: AccountId, total_amount: u64) -> Result<(), GatewayError>;
}

/// Seat booking provider called once per successful purchase.
pub trait SeatReservationService {
    /// Reserves `seat_count` seats for the account. Infants are never counted.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the seats could not be reserved.
    fn reserve_seat(&self, account_id: AccountId, seat_count: u64) -> Result<(), GatewayError>;
}

impl<T: TicketPaymentService + ?Sized> TicketPaymentService for &T {
    fn make_payment(&self, account_id: AccountId, total_amount: u64) -> Result<(), GatewayError> {
        (**self).make_payment(account_id, total_amount)
    }
}

impl<T: TicketPaymentService + ?Sized> TicketPaymentService for Box<T> {
    fn make_payment(&self, account_id: AccountId, total_amount: u64) -> Result<(), GatewayError> {
        (**self).make_payment(account_id, total_amount)
    }
}

impl<T: TicketPaymentService + ?Sized> TicketPaymentService for Arc<T> {
    fn make_payment(&self, account_id: AccountId, total_amount: u64) -> Result<(), GatewayError> {
        (**self).make_payment(account_id, total_amount)
    }
}

impl<T: SeatReservationService + ?Sized> SeatReservationService for &T {
    fn reserve_seat(&self, account_id: AccountId, seat_count: u64) -> Result<(), GatewayError> {
        (**self).reserve_seat(account_id, seat_count)
    }
}

impl<T: SeatReservationService + ?Sized> SeatReservationService for Box<T> {
    fn reserve_seat(&self, account_id: AccountId, seat_count: u64) -> Result<(), GatewayError> {
        (**self).reserve_seat(account_id, seat_count)
    }
}

impl<T: SeatReservationService + ?Sized> SeatReservationService for Arc<T> {
    fn reserve_seat(&self, account_id: AccountId, seat_count: u64) -> Result<(), GatewayError> {
        (**self).reserve_seat(account_id, seat_count)
    }
}
