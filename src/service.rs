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

//! Ticket purchase service.
//!
//! The [`TicketService`] validates a purchase against the venue's booking
//! rules and, only once every rule holds, charges the account and reserves
//! its seats through the external services it was built with.
//!
//! # Rules
//!
//! Checked in this order, failing on the first violation:
//!
//! 1. The account identifier is positive.
//! 2. At least one ticket request is given.
//! 3. Every request names a known category.
//! 4. At least one adult ticket is bought.
//! 5. No more than [`MAX_TICKETS_PER_PURCHASE`] tickets are bought.
//! 6. There are no more infants than adults.
//!
//! Infants pay nothing and sit on an adult's lap, so they count towards the
//! ticket limit but not towards the reserved seats.
//!
//! # Thread Safety
//!
//! The service holds no mutable state. It is `Sync` whenever its gateways
//! are, so one instance can serve concurrent purchases.

use crate::base::AccountId;
use crate::error::PurchaseError;
use crate::gateway::{SeatReservationService, TicketPaymentService};
use crate::pricing::{PricingPolicy, unit_price};
use crate::ticket::{TicketCategory, TicketTypeRequest};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Most tickets a single purchase may contain, infants included.
pub const MAX_TICKETS_PER_PURCHASE: u64 = 20;

/// Summary of a completed purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PurchaseReceipt {
    pub account_id: AccountId,
    /// Amount charged to the payment service.
    pub total_price: u64,
    /// Seats reserved; adults and children only.
    pub seats: u64,
    /// Tickets issued, infants included.
    pub tickets: u64,
}

/// Running counts for one purchase evaluation.
#[derive(Debug, Default)]
struct PurchaseTally {
    adults: u64,
    children: u64,
    infants: u64,
    /// Tickets whose holder occupies a seat.
    seats: u64,
    total_price: u64,
}

impl PurchaseTally {
    fn count_mut(&mut self, category: &TicketCategory) -> Option<&mut u64> {
        match category {
            TicketCategory::Adult => Some(&mut self.adults),
            TicketCategory::Child => Some(&mut self.children),
            TicketCategory::Infant => Some(&mut self.infants),
            TicketCategory::Unrecognized(_) => None,
        }
    }

    /// Adds one request to the counts and the running price.
    fn fold(
        &mut self,
        request: &TicketTypeRequest,
        pricing: PricingPolicy,
    ) -> Result<(), PurchaseError> {
        let category = request.category();
        let (Some(price), Some(running)) = (unit_price(category), self.count_mut(category)) else {
            return Err(PurchaseError::InvalidTicketType(category.to_string()));
        };

        let count = u64::from(request.count());
        *running = running.saturating_add(count);
        let charge = pricing.charge(price, *running, count);
        self.total_price = self.total_price.saturating_add(charge);
        if category.occupies_seat() {
            self.seats = self.seats.saturating_add(count);
        }
        Ok(())
    }

    fn seats(&self) -> u64 {
        self.seats
    }

    fn tickets(&self) -> u64 {
        self.seats().saturating_add(self.infants)
    }

    /// Checks the folded counts against the booking rules.
    fn validate(&self) -> Result<(), PurchaseError> {
        if self.adults == 0 && self.children == 0 && self.infants == 0 {
            return Err(PurchaseError::EmptyRequest);
        }
        if self.adults == 0 {
            return Err(PurchaseError::MissingAdult);
        }
        if self.tickets() > MAX_TICKETS_PER_PURCHASE {
            return Err(PurchaseError::TooManyTickets);
        }
        if self.adults < self.infants {
            return Err(PurchaseError::InfantAdultImbalance);
        }
        self.assert_invariants();
        Ok(())
    }

    fn assert_invariants(&self) {
        debug_assert_eq!(
            self.seats,
            self.adults + self.children,
            "Invariant violated: seats must cover adults and children only"
        );
        debug_assert!(
            self.adults >= 1 && self.adults >= self.infants,
            "Invariant violated: {} adults for {} infants",
            self.adults,
            self.infants
        );
        debug_assert!(
            self.tickets() <= MAX_TICKETS_PER_PURCHASE,
            "Invariant violated: {} tickets exceeds the limit",
            self.tickets()
        );
    }
}

/// Validates ticket purchases and hands them to the payment and seat
/// reservation services.
///
/// # Invariants
///
/// - Both gateways are called exactly once per successful purchase, payment
///   first.
/// - Neither gateway is called when validation fails.
/// - A payment is not refunded if the seat reservation then fails.
#[derive(Debug, Clone)]
pub struct TicketService<P, S> {
    payments: P,
    reservations: S,
    pricing: PricingPolicy,
}

impl<P, S> TicketService<P, S>
where
    P: TicketPaymentService,
    S: SeatReservationService,
{
    /// Creates a service using [`PricingPolicy::RunningTotal`].
    pub fn new(payments: P, reservations: S) -> Self {
        Self {
            payments,
            reservations,
            pricing: PricingPolicy::default(),
        }
    }

    /// Replaces the pricing policy.
    pub fn with_pricing(mut self, pricing: PricingPolicy) -> Self {
        self.pricing = pricing;
        self
    }

    /// Policy used to fold request prices into the total.
    pub fn pricing(&self) -> PricingPolicy {
        self.pricing
    }

    /// Validates and completes a purchase.
    ///
    /// # Errors
    ///
    /// - [`PurchaseError::InvalidAccount`] - Account identifier is not positive.
    /// - [`PurchaseError::EmptyRequest`] - No ticket requests were given.
    /// - [`PurchaseError::InvalidTicketType`] - A request has an unknown category.
    /// - [`PurchaseError::MissingAdult`] - No adult ticket in the purchase.
    /// - [`PurchaseError::TooManyTickets`] - More than [`MAX_TICKETS_PER_PURCHASE`] tickets.
    /// - [`PurchaseError::InfantAdultImbalance`] - More infants than adults.
    /// - [`PurchaseError::GatewayFailure`] - Payment or reservation failed.
    pub fn purchase_tickets(
        &self,
        account_id: AccountId,
        requests: &[TicketTypeRequest],
    ) -> Result<PurchaseReceipt, PurchaseError> {
        let tally = self
            .evaluate(account_id, requests)
            .inspect_err(|err| debug!(account = %account_id, reason = %err, "Purchase rejected"))?;

        let receipt = PurchaseReceipt {
            account_id,
            total_price: tally.total_price,
            seats: tally.seats(),
            tickets: tally.tickets(),
        };
        self.make_reservation(&receipt)?;

        info!(
            account = %account_id,
            total_price = receipt.total_price,
            seats = receipt.seats,
            tickets = receipt.tickets,
            "Purchase completed"
        );
        Ok(receipt)
    }

    fn evaluate(
        &self,
        account_id: AccountId,
        requests: &[TicketTypeRequest],
    ) -> Result<PurchaseTally, PurchaseError> {
        if !account_id.is_valid() {
            return Err(PurchaseError::InvalidAccount);
        }
        if requests.is_empty() {
            return Err(PurchaseError::EmptyRequest);
        }

        let mut tally = PurchaseTally::default();
        for request in requests {
            tally.fold(request, self.pricing)?;
        }
        tally.validate()?;
        Ok(tally)
    }

    /// Charges the account, then reserves its seats.
    fn make_reservation(&self, receipt: &PurchaseReceipt) -> Result<(), PurchaseError> {
        let account_id = receipt.account_id;
        self.payments
            .make_payment(account_id, receipt.total_price)
            .inspect_err(|err| warn!(account = %account_id, error = %err, "Payment failed"))?;
        self.reservations
            .reserve_seat(account_id, receipt.seats)
            .inspect_err(|err| {
                warn!(
                    account = %account_id,
                    error = %err,
                    "Seat reservation failed after payment was taken"
                )
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(category: TicketCategory, count: u32) -> TicketTypeRequest {
        TicketTypeRequest::new(category, count).unwrap()
    }

    fn tally_of(requests: &[TicketTypeRequest], pricing: PricingPolicy) -> PurchaseTally {
        let mut tally = PurchaseTally::default();
        for r in requests {
            tally.fold(r, pricing).unwrap();
        }
        tally
    }

    // === PurchaseTally Internal Tests ===

    #[test]
    fn tally_counts_seats_without_infants() {
        let tally = tally_of(
            &[
                request(TicketCategory::Infant, 1),
                request(TicketCategory::Adult, 3),
                request(TicketCategory::Child, 16),
            ],
            PricingPolicy::RunningTotal,
        );
        assert_eq!(tally.seats(), 19);
        assert_eq!(tally.tickets(), 20);
        assert_eq!(tally.total_price, 220);
    }

    #[test]
    fn tally_seats_only_count_seated_categories() {
        let tally = tally_of(
            &[
                request(TicketCategory::Adult, 2),
                request(TicketCategory::Infant, 2),
                request(TicketCategory::Child, 1),
                request(TicketCategory::Adult, 1),
            ],
            PricingPolicy::RunningTotal,
        );
        assert_eq!(tally.seats(), 4);
        assert_eq!(tally.seats(), tally.adults + tally.children);
        assert_eq!(tally.tickets(), 6);
    }

    #[test]
    fn tally_running_total_charges_split_category_cumulatively() {
        let requests = [
            request(TicketCategory::Adult, 2),
            request(TicketCategory::Adult, 3),
        ];
        assert_eq!(tally_of(&requests, PricingPolicy::RunningTotal).total_price, 140);
        assert_eq!(tally_of(&requests, PricingPolicy::PerRequest).total_price, 100);
    }

    #[test]
    fn tally_rejects_unrecognized_category() {
        let mut tally = PurchaseTally::default();
        let result = tally.fold(
            &request(TicketCategory::Unrecognized("SENIOR".into()), 1),
            PricingPolicy::RunningTotal,
        );
        assert_eq!(result, Err(PurchaseError::InvalidTicketType("SENIOR".into())));
    }

    #[test]
    fn tally_with_no_tickets_is_empty_request() {
        assert_eq!(
            PurchaseTally::default().validate(),
            Err(PurchaseError::EmptyRequest)
        );
    }

    #[test]
    fn tally_handles_counts_beyond_u32() {
        let tally = tally_of(
            &[
                request(TicketCategory::Adult, u32::MAX),
                request(TicketCategory::Adult, u32::MAX),
            ],
            PricingPolicy::RunningTotal,
        );
        assert_eq!(tally.adults, 2 * u64::from(u32::MAX));
        assert_eq!(tally.validate(), Err(PurchaseError::TooManyTickets));
    }

    #[test]
    fn missing_adult_checked_before_ticket_limit() {
        let tally = tally_of(
            &[request(TicketCategory::Child, 30)],
            PricingPolicy::RunningTotal,
        );
        assert_eq!(tally.validate(), Err(PurchaseError::MissingAdult));
    }
}
