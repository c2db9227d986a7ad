//! Invoice generation API endpoints.
//!
//! An invoice bills one month of lessons for a student. The lesson count is
//! either derived automatically (count the student's lesson weekday within
//! the month of the given date) or supplied directly by the caller. The
//! rendered PDF is filed under the storage root at
//! `<year>/<month>/<student name>.pdf`.

use axum::extract::{Query, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use tutordesk_core::{
    count_weekday_occurrences, format_amount, render_invoice, store_invoice, InvoiceDate,
    InvoiceSummary,
};

use crate::api::error::ApiResult;
use crate::state::SharedState;

/// Creates the invoices router with both generation modes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/generateinvoice/auto", post(generate_invoice_auto))
        .route("/generateinvoice/manual", post(generate_invoice_manual))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for automatic invoice generation.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AutoInvoiceParams {
    /// Identifier of the billed student.
    #[serde(rename = "studentId")]
    #[param(example = 7)]
    pub student_id: i64,

    /// Display name of the billed student; also names the stored PDF.
    #[param(example = "Alice Tan")]
    pub name: String,

    /// Rate charged per lesson.
    #[param(example = 50.0)]
    pub rate: f64,

    /// Business date in yyyy-MM-dd format; selects the billed month.
    #[param(example = "2025-05-01")]
    pub date: String,

    /// Weekday the student has lessons on, e.g. "Thursday".
    #[param(example = "Thursday")]
    pub day: String,
}

/// Query parameters for manual invoice generation.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ManualInvoiceParams {
    /// Identifier of the billed student.
    #[serde(rename = "studentId")]
    #[param(example = 7)]
    pub student_id: i64,

    /// Display name of the billed student; also names the stored PDF.
    #[param(example = "Alice Tan")]
    pub name: String,

    /// Rate charged per lesson.
    #[param(example = 50.0)]
    pub rate: f64,

    /// Business date in yyyy-MM-dd format; selects the billed month.
    #[param(example = "2025-05-01")]
    pub date: String,

    /// Number of lessons to bill.
    #[serde(rename = "numberOfLessons")]
    #[param(example = 5)]
    pub number_of_lessons: u32,
}

/// Response after generating and storing an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "filePath": "2025/05/Alice Tan.pdf",
    "lessonCount": 5,
    "amount": "250.00"
}))]
pub struct GenerateInvoiceResponse {
    /// Relative path of the stored PDF under the storage root.
    #[serde(rename = "filePath")]
    #[schema(example = "2025/05/Alice Tan.pdf")]
    pub file_path: String,

    /// Number of lessons billed.
    #[serde(rename = "lessonCount")]
    #[schema(example = 5)]
    pub lesson_count: u32,

    /// Billed amount, rounded to two decimals for display.
    #[schema(example = "250.00")]
    pub amount: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Generate an invoice, deriving the lesson count from a weekday.
///
/// Counts how many times `day` occurs in the month of `date`, bills
/// `rate × count`, renders the PDF and stores it under the month's directory.
#[utoipa::path(
    post,
    path = "/invoices/generateinvoice/auto",
    tag = "invoices",
    operation_id = "generateInvoiceAuto",
    summary = "Generate an invoice with an auto-counted lesson total",
    description = "Counts the occurrences of the given weekday in the month \
        of the given date, bills rate times count, and stores the rendered \
        PDF under <year>/<month>/<name>.pdf.",
    params(AutoInvoiceParams),
    responses(
        (status = 200, description = "Invoice generated and stored", body = GenerateInvoiceResponse),
        (status = 400, description = "Invalid date, weekday, or rate"),
        (status = 500, description = "Rendering or storage failure")
    )
)]
pub async fn generate_invoice_auto(
    State(state): State<SharedState>,
    Query(params): Query<AutoInvoiceParams>,
) -> ApiResult<Json<GenerateInvoiceResponse>> {
    // All validation happens before any I/O.
    let date = InvoiceDate::parse(&params.date)?;
    let lesson_count = count_weekday_occurrences(date.year(), date.month(), &params.day)?;
    let summary =
        InvoiceSummary::new(params.student_id, &params.name, params.rate, &date, lesson_count)?;

    let pdf = render_invoice(&summary);
    let file_path = store_invoice(
        &state.storage,
        &pdf,
        &format!("{}.pdf", params.name),
        &date,
    )?;

    Ok(Json(GenerateInvoiceResponse {
        file_path,
        lesson_count,
        amount: format_amount(summary.amount),
    }))
}

/// Generate an invoice from a caller-supplied lesson count.
#[utoipa::path(
    post,
    path = "/invoices/generateinvoice/manual",
    tag = "invoices",
    operation_id = "generateInvoiceManual",
    summary = "Generate an invoice with an explicit lesson count",
    description = "Bills rate times the supplied number of lessons and stores \
        the rendered PDF under <year>/<month>/<name>.pdf.",
    params(ManualInvoiceParams),
    responses(
        (status = 200, description = "Invoice generated and stored", body = GenerateInvoiceResponse),
        (status = 400, description = "Invalid date or rate"),
        (status = 500, description = "Rendering or storage failure")
    )
)]
pub async fn generate_invoice_manual(
    State(state): State<SharedState>,
    Query(params): Query<ManualInvoiceParams>,
) -> ApiResult<Json<GenerateInvoiceResponse>> {
    let date = InvoiceDate::parse(&params.date)?;
    let summary = InvoiceSummary::new(
        params.student_id,
        &params.name,
        params.rate,
        &date,
        params.number_of_lessons,
    )?;

    let pdf = render_invoice(&summary);
    let file_path = store_invoice(
        &state.storage,
        &pdf,
        &format!("{}.pdf", params.name),
        &date,
    )?;

    Ok(Json(GenerateInvoiceResponse {
        file_path,
        lesson_count: params.number_of_lessons,
        amount: format_amount(summary.amount),
    }))
}
