//! Invoice amount and naming derivation, plus the persistence bridge.
//!
//! An invoice bills `rate × lessons` for a month identified by an ISO
//! `yyyy-MM-dd` business date. The date also decides where the generated PDF
//! lives: invoices are filed under `<year>/<zero-padded-month>` beneath the
//! storage root, so paths sort chronologically and stay locale-independent.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::error::{Result, TutordeskError};
use crate::storage::Storage;

/// Shape check applied before calendar validation: exactly `yyyy-MM-dd`.
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

static MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The business date an invoice is issued for.
///
/// Parsed strictly from `yyyy-MM-dd`; the month and year drive both the
/// displayed billing period and the storage subpath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceDate {
    date: NaiveDate,
}

impl InvoiceDate {
    /// Parse an ISO calendar date string.
    ///
    /// The string must match `yyyy-MM-dd` exactly (zero-padded month and
    /// day) and denote a real calendar date; `2025-13-01` and `2025-02-30`
    /// are both rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TutordeskError::InvalidDateFormat`] otherwise.
    pub fn parse(input: &str) -> Result<Self> {
        if !DATE_SHAPE.is_match(input) {
            return Err(TutordeskError::InvalidDateFormat(input.to_string()));
        }
        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map_err(|_| TutordeskError::InvalidDateFormat(input.to_string()))?;
        Ok(Self { date })
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Calendar month, `1..=12`.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// English month name for display on the invoice.
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.date.month() - 1) as usize]
    }

    /// Storage subpath for this date: `<year>/<zero-padded-month>`.
    ///
    /// Numeric months keep the directory tree sortable regardless of locale.
    #[must_use]
    pub fn storage_subpath(&self) -> String {
        format!("{}/{:02}", self.date.year(), self.date.month())
    }
}

/// Compute the billed amount for a month of lessons.
///
/// The result keeps full floating-point precision; rounding to two decimals
/// happens only at presentation time via [`format_amount`].
///
/// # Errors
///
/// Returns [`TutordeskError::InvalidArgument`] for a negative rate.
pub fn invoice_amount(rate_per_lesson: f64, lesson_count: u32) -> Result<f64> {
    if rate_per_lesson < 0.0 || !rate_per_lesson.is_finite() {
        return Err(TutordeskError::InvalidArgument(format!(
            "rate per lesson must be a non-negative number, got {rate_per_lesson}"
        )));
    }
    Ok(rate_per_lesson * f64::from(lesson_count))
}

/// Format an amount for display with exactly two decimal places.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Everything the PDF renderer needs to lay out one invoice.
///
/// Ephemeral: built per request and dropped once the PDF bytes are stored.
#[derive(Debug, Clone)]
pub struct InvoiceSummary {
    /// Identifier of the billed student (informational; not checked against
    /// the record store).
    pub student_id: i64,

    /// Display name of the billed student.
    pub student_name: String,

    /// Rate charged per lesson.
    pub rate_per_lesson: f64,

    /// English name of the billed month.
    pub month_name: String,

    /// Calendar year of the billed month.
    pub year: i32,

    /// Number of lessons billed.
    pub lesson_count: u32,

    /// Total billed amount, full precision.
    pub amount: f64,
}

impl InvoiceSummary {
    /// Assemble a summary from request inputs, deriving the amount.
    ///
    /// # Errors
    ///
    /// Returns [`TutordeskError::InvalidArgument`] for a negative rate.
    pub fn new(
        student_id: i64,
        student_name: impl Into<String>,
        rate_per_lesson: f64,
        date: &InvoiceDate,
        lesson_count: u32,
    ) -> Result<Self> {
        let amount = invoice_amount(rate_per_lesson, lesson_count)?;
        Ok(Self {
            student_id,
            student_name: student_name.into(),
            rate_per_lesson,
            month_name: date.month_name().to_string(),
            year: date.year(),
            lesson_count,
            amount,
        })
    }
}

/// Store rendered invoice bytes under the date's year/month directory.
///
/// Provisions `<year>/<month>` beneath the storage root (idempotent), writes
/// `bytes` to `<subpath>/<file_name>` overwriting any file already at that
/// exact name, and returns the relative path actually used. A failed write
/// surfaces as an error; a successful return never references a partial file.
///
/// # Errors
///
/// Returns [`TutordeskError::PathTraversalDenied`] if the subpath or file
/// name escapes the root, and an I/O error if provisioning or the write
/// fails.
pub fn store_invoice(
    storage: &Storage,
    bytes: &[u8],
    file_name: &str,
    date: &InvoiceDate,
) -> Result<String> {
    let subpath = date.storage_subpath();
    storage.ensure_directory_for_date(&subpath)?;

    let relative = format!("{subpath}/{file_name}");
    storage.write_file(&relative, bytes)?;

    info!(path = %relative, size = bytes.len(), "stored invoice");
    Ok(relative)
}
