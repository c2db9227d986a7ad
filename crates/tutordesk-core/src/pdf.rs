//! Plain-text invoice PDF rendering.
//!
//! Deliberately small: one A4 page of Helvetica text lines carrying the
//! billing facts (month, bill-to name, lesson line, total). Visual layout
//! (logos, tables, QR codes) is an external concern; swapping in a richer
//! renderer touches only this module. Output is deterministic for a given
//! summary.

use crate::invoice::{format_amount, InvoiceSummary};

const PAGE_WIDTH: u32 = 595; // A4 in points
const PAGE_HEIGHT: u32 = 842;

/// Render an invoice summary to PDF bytes.
#[must_use]
pub fn render_invoice(summary: &InvoiceSummary) -> Vec<u8> {
    let content = content_stream(summary);

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ),
    ];

    let mut out = Vec::with_capacity(1024 + content.len());
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", index + 1).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );

    out
}

/// Lay the invoice lines out top to bottom as one content stream.
fn content_stream(summary: &InvoiceSummary) -> String {
    let period = format!("{} {}", summary.month_name, summary.year);
    let mut ops = String::new();

    text_line(
        &mut ops,
        16,
        50,
        780,
        &format!("OFFICIAL INVOICE FOR {}", period.to_uppercase()),
    );
    text_line(
        &mut ops,
        10,
        50,
        760,
        &format!("Invoice # {}/{:03}", summary.year, summary.student_id),
    );
    text_line(&mut ops, 10, 50, 746, &format!("Date: 2 {period}"));
    text_line(&mut ops, 10, 50, 732, &format!("Due Date: 15 {period}"));

    text_line(&mut ops, 11, 50, 700, "Bill To:");
    text_line(&mut ops, 12, 50, 684, &summary.student_name);

    text_line(
        &mut ops,
        11,
        50,
        644,
        &format!(
            "{period} ({} Lessons) x {} per lesson",
            summary.lesson_count,
            format_amount(summary.rate_per_lesson)
        ),
    );
    text_line(
        &mut ops,
        11,
        50,
        628,
        &format!("Amount: {}", format_amount(summary.amount)),
    );

    text_line(
        &mut ops,
        13,
        50,
        588,
        &format!("Balance Due: {}", format_amount(summary.amount)),
    );
    text_line(
        &mut ops,
        9,
        50,
        548,
        "Please send us a screenshot once the payment is made. Thank you!",
    );

    ops
}

fn text_line(ops: &mut String, size: u32, x: u32, y: u32, text: &str) {
    ops.push_str(&format!(
        "BT /F1 {size} Tf {x} {y} Td ({}) Tj ET\n",
        escape_text(text)
    ));
}

/// Escape the characters with meaning inside PDF literal strings.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
