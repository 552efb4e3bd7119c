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

//! # Ticket Service
//!
//! This library validates ticket purchases for a venue and, once a purchase
//! satisfies the booking rules, charges the account and reserves its seats
//! through external services.
//!
//! ## Core Components
//!
//! - [`TicketService`]: Validates purchases and calls the external services
//! - [`TicketTypeRequest`]: Number of tickets wanted for one [`TicketCategory`]
//! - [`TicketPaymentService`] / [`SeatReservationService`]: External service contracts
//! - [`PurchaseError`]: Reasons a purchase is rejected
//!
//! ## Example
//!
//! ```
//! use ticket_service_rs::{
//!     AccountId, GatewayError, SeatReservationService, TicketCategory, TicketPaymentService,
//!     TicketService, TicketTypeRequest,
//! };
//!
//! struct Payments;
//! impl TicketPaymentService for Payments {
//!     fn make_payment(&self, _: AccountId, _: u64) -> Result<(), GatewayError> {
//!         Ok(())
//!     }
//! }
//!
//! struct Seats;
//! impl SeatReservationService for Seats {
//!     fn reserve_seat(&self, _: AccountId, _: u64) -> Result<(), GatewayError> {
//!         Ok(())
//!     }
//! }
//!
//! let service = TicketService::new(Payments, Seats);
//! let requests = [
//!     TicketTypeRequest::new(TicketCategory::Adult, 2).unwrap(),
//!     TicketTypeRequest::new(TicketCategory::Infant, 1).unwrap(),
//! ];
//!
//! let receipt = service.purchase_tickets(AccountId(100), &requests).unwrap();
//! assert_eq!(receipt.total_price, 40);
//! assert_eq!(receipt.seats, 2);
//! ```

mod base;
pub mod error;
pub mod gateway;
pub mod pricing;
mod service;
mod ticket;

pub use base::AccountId;
pub use error::PurchaseError;
pub use gateway::{GatewayError, SeatReservationService, TicketPaymentService};
pub use pricing::PricingPolicy;
pub use service::{MAX_TICKETS_PER_PURCHASE, PurchaseReceipt, TicketService};
pub use ticket::{TicketCategory, TicketTypeRequest};
