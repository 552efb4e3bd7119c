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

use clap::{Parser, ValueEnum};
use csv::{ReaderBuilder, Trim, Writer};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use ticket_service_rs::{
    AccountId, GatewayError, PricingPolicy, PurchaseError, PurchaseReceipt,
    SeatReservationService, TicketPaymentService, TicketService, TicketTypeRequest,
};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Ticket Service - Process ticket purchase CSV files
///
/// Reads purchase requests from a CSV file and writes one outcome per
/// purchase to stdout.
#[derive(Parser, Debug)]
#[command(name = "ticket-service-rs")]
#[command(about = "Validates ticket purchases from a CSV file", long_about = None)]
struct Args {
    /// Path to CSV file with purchase requests
    ///
    /// Expected format: purchase,account,type,count
    /// Consecutive rows with the same purchase id form one purchase.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// How prices are folded when a category appears in several rows
    #[arg(long, value_enum, default_value_t = Pricing::RunningTotal)]
    pricing: Pricing,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Pricing {
    RunningTotal,
    PerRequest,
}

impl From<Pricing> for PricingPolicy {
    fn from(pricing: Pricing) -> Self {
        match pricing {
            Pricing::RunningTotal => PricingPolicy::RunningTotal,
            Pricing::PerRequest => PricingPolicy::PerRequest,
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticket_service_rs=info,main=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let service = TicketService::new(LoggingPaymentService, LoggingSeatReservationService)
        .with_pricing(args.pricing.into());

    let outcomes = match process_purchases(BufReader::new(file), &service) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("Error processing purchases: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = write_outcomes(&outcomes, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Payment service that only records the charge in the log.
struct LoggingPaymentService;

impl TicketPaymentService for LoggingPaymentService {
    fn make_payment(&self, account_id: AccountId, total_amount: u64) -> Result<(), GatewayError> {
        info!(account = %account_id, amount = total_amount, "Payment taken");
        Ok(())
    }
}

/// Seat reservation service that only records the booking in the log.
struct LoggingSeatReservationService;

impl SeatReservationService for LoggingSeatReservationService {
    fn reserve_seat(&self, account_id: AccountId, seat_count: u64) -> Result<(), GatewayError> {
        info!(account = %account_id, seats = seat_count, "Seats reserved");
        Ok(())
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `purchase, account, type, count`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    purchase: u32,
    account: String,
    #[serde(rename = "type")]
    ticket_type: String,
    /// `None` when empty or not an integer.
    #[serde(deserialize_with = "csv::invalid_option")]
    count: Option<i64>,
}

/// Anything that is not an integer is as invalid as a zero account.
fn parse_account(raw: &str) -> AccountId {
    AccountId(raw.trim().parse().unwrap_or(0))
}

/// Rows of one purchase gathered from consecutive records.
#[derive(Debug)]
struct PendingPurchase {
    purchase: u32,
    account_id: AccountId,
    requests: Vec<TicketTypeRequest>,
    /// First row problem that rejects the whole purchase.
    rejected: Option<PurchaseError>,
}

impl PendingPurchase {
    fn new(record: &CsvRecord) -> Self {
        Self {
            purchase: record.purchase,
            account_id: parse_account(&record.account),
            requests: Vec::new(),
            rejected: None,
        }
    }

    fn push(&mut self, record: CsvRecord) {
        // Every row of a purchase must name the same account.
        if parse_account(&record.account) != self.account_id {
            self.rejected.get_or_insert(PurchaseError::InvalidAccount);
            return;
        }

        let request = record
            .count
            .and_then(|count| u32::try_from(count).ok())
            .ok_or(PurchaseError::InvalidTicketCount)
            .and_then(|count| TicketTypeRequest::new(record.ticket_type, count));
        match request {
            Ok(request) => self.requests.push(request),
            Err(e) => {
                self.rejected.get_or_insert(e);
            }
        }
    }

    fn run<P, S>(self, service: &TicketService<P, S>) -> PurchaseOutcome
    where
        P: TicketPaymentService,
        S: SeatReservationService,
    {
        let result = match self.rejected {
            // The account check still comes first.
            Some(e) if self.account_id.is_valid() => Err(e),
            _ => service.purchase_tickets(self.account_id, &self.requests),
        };
        PurchaseOutcome {
            purchase: self.purchase,
            account_id: self.account_id,
            result,
        }
    }
}

/// Result of one purchase from the input file.
#[derive(Debug)]
pub struct PurchaseOutcome {
    pub purchase: u32,
    pub account_id: AccountId,
    pub result: Result<PurchaseReceipt, PurchaseError>,
}

/// Process purchases from a CSV reader.
///
/// Rows are grouped into purchases by the `purchase` column; a new group
/// starts whenever the id changes. Rows that cannot be read at all are
/// skipped; a bad count or a changed account rejects the whole purchase.
///
/// # CSV Format
///
/// Expected columns: `purchase, account, type, count`
/// - `purchase`: Purchase id (u32) grouping consecutive rows
/// - `account`: Account id; must be the same on every row of the group
/// - `type`: Ticket category (adult, child, infant)
/// - `count`: Number of tickets of that category; a missing or non-integer
///   count rejects the whole purchase
///
/// # Example
///
/// ```csv
/// purchase,account,type,count
/// 1,100,adult,2
/// 1,100,infant,1
/// 2,7,child,3
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn process_purchases<R, P, S>(
    reader: R,
    service: &TicketService<P, S>,
) -> Result<Vec<PurchaseOutcome>, csv::Error>
where
    R: Read,
    P: TicketPaymentService,
    S: SeatReservationService,
{
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);

    let mut outcomes = Vec::new();
    let mut pending: Option<PendingPurchase> = None;

    for result in rdr.deserialize::<CsvRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "Skipping malformed row");
                continue;
            }
        };

        if let Some(current) = pending.take_if(|p| p.purchase != record.purchase) {
            outcomes.push(current.run(service));
        }
        pending
            .get_or_insert_with(|| PendingPurchase::new(&record))
            .push(record);
    }

    if let Some(last) = pending {
        outcomes.push(last.run(service));
    }

    Ok(outcomes)
}

/// One output row.
#[derive(Debug, Serialize)]
struct OutcomeRecord {
    purchase: u32,
    account: AccountId,
    status: &'static str,
    total_price: Option<u64>,
    seats: Option<u64>,
    reason: Option<&'static str>,
    message: Option<String>,
}

impl From<&PurchaseOutcome> for OutcomeRecord {
    fn from(outcome: &PurchaseOutcome) -> Self {
        let (status, total_price, seats, reason, message) = match &outcome.result {
            Ok(receipt) => ("ok", Some(receipt.total_price), Some(receipt.seats), None, None),
            Err(e) => ("rejected", None, None, Some(e.code()), Some(e.to_string())),
        };
        Self {
            purchase: outcome.purchase,
            account: outcome.account_id,
            status,
            total_price,
            seats,
            reason,
            message,
        }
    }
}

/// Write purchase outcomes to a CSV writer.
///
/// # CSV Format
///
/// Columns: `purchase, account, status, total_price, seats, reason, message`
///
/// # Example
///
/// ```csv
/// purchase,account,status,total_price,seats,reason,message
/// 1,100,ok,40,2,,
/// 2,7,rejected,,,MISSING_ADULT,adult required for ticket purchase
/// ```
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_outcomes<W: Write>(outcomes: &[PurchaseOutcome], writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for outcome in outcomes {
        wtr.serialize(OutcomeRecord::from(outcome))?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn service() -> TicketService<LoggingPaymentService, LoggingSeatReservationService> {
        TicketService::new(LoggingPaymentService, LoggingSeatReservationService)
    }

    fn run(csv: &str) -> Vec<PurchaseOutcome> {
        process_purchases(Cursor::new(csv), &service()).unwrap()
    }

    #[test]
    fn parse_single_purchase() {
        let outcomes = run("purchase,account,type,count\n\
                            1,100,adult,2\n\
                            1,100,infant,1\n");

        assert_eq!(outcomes.len(), 1);
        let receipt = outcomes[0].result.as_ref().unwrap();
        assert_eq!(receipt.total_price, 40);
        assert_eq!(receipt.seats, 2);
        assert_eq!(receipt.tickets, 3);
    }

    #[test]
    fn consecutive_ids_form_separate_purchases() {
        let outcomes = run("purchase,account,type,count\n\
                            1,100,adult,1\n\
                            2,100,child,1\n\
                            3,100,adult,1\n");

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_ok());
        assert_eq!(outcomes[1].result, Err(PurchaseError::MissingAdult));
        assert!(outcomes[2].result.is_ok());
    }

    #[test]
    fn parse_with_whitespace() {
        let outcomes = run("purchase,account,type,count\n 1 , 100 , Adult , 3 \n");

        assert_eq!(outcomes[0].result.as_ref().unwrap().total_price, 60);
    }

    #[test]
    fn non_integer_account_is_invalid() {
        let outcomes = run("purchase,account,type,count\n1,abc,adult,1\n");

        assert_eq!(outcomes[0].account_id, AccountId(0));
        assert_eq!(outcomes[0].result, Err(PurchaseError::InvalidAccount));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let outcomes = run("purchase,account,type,count\n\
                            1,1,senior,4\n\
                            1,1,adult,3\n");

        assert_eq!(
            outcomes[0].result,
            Err(PurchaseError::InvalidTicketType("senior".into()))
        );
    }

    #[test]
    fn negative_count_rejects_whole_purchase() {
        let outcomes = run("purchase,account,type,count\n\
                            1,1,adult,3\n\
                            1,1,child,-2\n");

        assert_eq!(outcomes[0].result, Err(PurchaseError::InvalidTicketCount));
    }

    #[test]
    fn non_integer_count_rejects_whole_purchase() {
        let outcomes = run("purchase,account,type,count\n\
                            1,100,adult,2\n\
                            1,100,child,2.5\n\
                            1,100,infant,\n");

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].result, Err(PurchaseError::InvalidTicketCount));
    }

    #[test]
    fn empty_count_rejects_whole_purchase() {
        let outcomes = run("purchase,account,type,count\n\
                            1,100,adult,2\n\
                            1,100,infant,\n");

        assert_eq!(outcomes[0].result, Err(PurchaseError::InvalidTicketCount));
    }

    #[test]
    fn mixed_accounts_reject_whole_purchase() {
        let outcomes = run("purchase,account,type,count\n\
                            1,100,adult,2\n\
                            1,0,child,2\n");

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].account_id, AccountId(100));
        assert_eq!(outcomes[0].result, Err(PurchaseError::InvalidAccount));
    }

    #[test]
    fn same_account_written_differently_is_accepted() {
        let outcomes = run("purchase,account,type,count\n\
                            1,100,adult,2\n\
                            1, 100 ,child,1\n");

        assert_eq!(outcomes[0].result.as_ref().unwrap().total_price, 50);
    }

    #[test]
    fn invalid_account_wins_over_bad_count() {
        let outcomes = run("purchase,account,type,count\n1,0,adult,0\n");

        assert_eq!(outcomes[0].result, Err(PurchaseError::InvalidAccount));
    }

    #[test]
    fn skip_malformed_rows() {
        let outcomes = run("purchase,account,type,count\n\
                            1,100,adult,2\n\
                            not,a,valid,row\n\
                            2,100,adult,1\n");

        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn write_outcomes_to_csv() {
        let outcomes = run("purchase,account,type,count\n\
                            1,100,adult,2\n\
                            2,7,child,3\n");

        let mut output = Vec::new();
        write_outcomes(&outcomes, &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        let mut lines = output_str.lines();
        assert_eq!(
            lines.next(),
            Some("purchase,account,status,total_price,seats,reason,message")
        );
        assert_eq!(lines.next(), Some("1,100,ok,40,2,,"));
        assert_eq!(
            lines.next(),
            Some("2,7,rejected,,,MISSING_ADULT,adult required for ticket purchase")
        );
    }

    #[test]
    fn per_request_pricing_flag() {
        let service = service().with_pricing(Pricing::PerRequest.into());
        let csv = "purchase,account,type,count\n\
                   1,100,adult,2\n\
                   1,100,adult,3\n";

        let outcomes = process_purchases(Cursor::new(csv), &service).unwrap();

        assert_eq!(outcomes[0].result.as_ref().unwrap().total_price, 100);
    }
}
