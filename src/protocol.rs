//! Protocol export — assembles the monthly recipient list into a
//! committee protocol and renders it as LaTeX text or PDF bytes.
//!
//! LaTeX output runs the stored template (`template_variables` row
//! "protocol.latex") through `{{name}}` substitution with a repeated
//! `{{#rows}}…{{/rows}}` section. PDF output is rendered directly via
//! `printpdf` with builtin fonts.

use std::collections::HashMap;
use std::io::BufWriter;

use printpdf::*;
use regex::Regex;
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::aid::{self, format_amount, MonthlySummary};
use crate::db::{self, DatabaseError};
use crate::models::{month_name, PROTOCOL_TEMPLATE_NAME};

// ─── Types ────────────────────────────────────────────────────────────────────

/// One numbered recipient line of the protocol table.
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolRow {
    pub index: usize,
    pub student: String,
    pub faculty_number: String,
    pub group: String,
    pub category: String,
    pub amount: i64,
}

/// Fully assembled protocol, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolData {
    pub title: String,
    pub academic_year_label: String,
    pub month: u32,
    pub month_name: String,
    pub calendar_year: i32,
    pub rows: Vec<ProtocolRow>,
    pub total_amount: i64,
    pub recipient_count: usize,
    /// Stored template variables plus computed reserved names.
    pub variables: HashMap<String, String>,
}

// ─── Assembly ─────────────────────────────────────────────────────────────────

/// Builds the protocol for one (academic year, month): recipient rows
/// from the aid summary, stored template variables, and computed values
/// (which win over stored ones of the same name).
pub fn build_protocol(
    conn: &Connection,
    academic_year_id: &Uuid,
    month: u32,
) -> Result<ProtocolData, DatabaseError> {
    let summary = aid::monthly_summary(conn, academic_year_id, month)?;

    let mut variables: HashMap<String, String> = db::get_all_template_variables(conn)?
        .into_iter()
        .filter(|v| v.name != PROTOCOL_TEMPLATE_NAME)
        .map(|v| (v.name, v.value))
        .collect();

    let name = month_name(summary.month).to_string();
    variables.insert("month_name".into(), name.clone());
    variables.insert("calendar_year".into(), summary.calendar_year.to_string());
    variables.insert("academic_year".into(), summary.academic_year_label.clone());
    variables.insert(
        "protocol_date".into(),
        chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
    );
    variables.insert("total".into(), format_amount(summary.total_amount));
    variables.insert("recipient_count".into(), summary.recipient_count.to_string());

    Ok(protocol_from_summary(summary, name, variables))
}

fn protocol_from_summary(
    summary: MonthlySummary,
    month_name: String,
    variables: HashMap<String, String>,
) -> ProtocolData {
    let rows = summary
        .recipients
        .iter()
        .enumerate()
        .map(|(i, r)| ProtocolRow {
            index: i + 1,
            student: r.student_name.clone(),
            faculty_number: r.faculty_number.clone(),
            group: format!("{} / {}", r.direction_name, r.group_name),
            category: r.category_name.clone(),
            amount: r.amount,
        })
        .collect();

    ProtocolData {
        title: format!(
            "Financial aid protocol — {} {}",
            month_name, summary.calendar_year
        ),
        academic_year_label: summary.academic_year_label,
        month: summary.month,
        month_name,
        calendar_year: summary.calendar_year,
        rows,
        total_amount: summary.total_amount,
        recipient_count: summary.recipient_count,
        variables,
    }
}

// ─── Template substitution ────────────────────────────────────────────────────

/// Replaces `{{name}}` placeholders and expands the `{{#rows}}…{{/rows}}`
/// section once per row. Unknown placeholders stay intact so a template
/// typo is visible in the output rather than silently dropped.
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
    rows: &[HashMap<String, String>],
) -> String {
    let section_re =
        Regex::new(r"(?s)\{\{#rows\}\}(.*?)\{\{/rows\}\}").expect("static regex compiles");
    let expanded = section_re.replace_all(template, |caps: &regex::Captures<'_>| {
        let body = &caps[1];
        rows.iter()
            .map(|row| substitute(body, row))
            .collect::<String>()
    });

    substitute(&expanded, variables)
}

fn substitute(text: &str, variables: &HashMap<String, String>) -> String {
    let var_re = Regex::new(r"\{\{([A-Za-z0-9_.]+)\}\}").expect("static regex compiles");
    var_re
        .replace_all(text, |caps: &regex::Captures<'_>| {
            match variables.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Escapes LaTeX-special characters in data values.
pub fn latex_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '\\' => out.push_str("\\textbackslash{}"),
            _ => out.push(ch),
        }
    }
    out
}

// ─── LaTeX output ─────────────────────────────────────────────────────────────

/// Renders the protocol through the stored LaTeX template.
pub fn render_latex(conn: &Connection, protocol: &ProtocolData) -> Result<String, DatabaseError> {
    let template = db::get_template_variable_by_name(conn, PROTOCOL_TEMPLATE_NAME)?
        .ok_or_else(|| DatabaseError::NotFound {
            entity_type: "TemplateVariable".into(),
            id: PROTOCOL_TEMPLATE_NAME.into(),
        })?;

    let variables: HashMap<String, String> = protocol
        .variables
        .iter()
        .map(|(k, v)| (k.clone(), latex_escape(v)))
        .collect();

    let rows: Vec<HashMap<String, String>> = protocol
        .rows
        .iter()
        .map(|r| {
            HashMap::from([
                ("index".to_string(), r.index.to_string()),
                ("student".to_string(), latex_escape(&r.student)),
                ("faculty_number".to_string(), latex_escape(&r.faculty_number)),
                ("group".to_string(), latex_escape(&r.group)),
                ("category".to_string(), latex_escape(&r.category)),
                ("amount".to_string(), format_amount(r.amount)),
            ])
        })
        .collect();

    Ok(render_template(&template.value, &variables, &rows))
}

// ─── PDF output ───────────────────────────────────────────────────────────────

/// Renders the protocol as PDF bytes: title, header lines, numbered
/// recipient table, total, signature lines for the committee.
pub fn render_pdf(protocol: &ProtocolData) -> Result<Vec<u8>, DatabaseError> {
    let (doc, page1, layer1) =
        PdfDocument::new(&protocol.title, Mm(210.0), Mm(297.0), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("PDF font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("PDF font error: {e}")))?;
    let courier = doc
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("PDF font error: {e}")))?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut y = Mm(280.0);

    // Header
    if let Some(university) = protocol.variables.get("university") {
        layer.use_text(university, 12.0, Mm(20.0), y, &bold);
        y -= Mm(8.0);
    }
    layer.use_text(&protocol.title, 14.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    layer.use_text(
        format!("Academic year {}", protocol.academic_year_label),
        10.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(5.0);
    if let Some(date) = protocol.variables.get("protocol_date") {
        layer.use_text(format!("Date: {date}"), 10.0, Mm(20.0), y, &font);
        y -= Mm(5.0);
    }
    y -= Mm(5.0);

    // Recipient table
    layer.use_text("RECIPIENTS:", 11.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    for row in &protocol.rows {
        let text = format!(
            "{:3}. {} ({}) — {} — {} — {}",
            row.index,
            row.student,
            row.faculty_number,
            row.group,
            row.category,
            format_amount(row.amount)
        );
        for line in wrap_text(&text, 90) {
            if y < Mm(20.0) {
                let (page, new_layer) =
                    doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
                layer = doc.get_page(page).get_layer(new_layer);
                y = Mm(280.0);
            }
            layer.use_text(&line, 8.0, Mm(25.0), y, &courier);
            y -= Mm(4.0);
        }
    }

    // Totals
    y -= Mm(6.0);
    if y < Mm(20.0) {
        let (page, new_layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
        layer = doc.get_page(page).get_layer(new_layer);
        y = Mm(280.0);
    }
    layer.use_text(
        format!(
            "Recipients: {}    Total: {}",
            protocol.recipient_count,
            format_amount(protocol.total_amount)
        ),
        11.0,
        Mm(20.0),
        y,
        &bold,
    );

    // Signature lines
    y -= Mm(16.0);
    for (label, key) in [
        ("Chair", "committee_chair"),
        ("Member", "committee_member_1"),
        ("Member", "committee_member_2"),
    ] {
        if y < Mm(20.0) {
            let (page, new_layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            layer = doc.get_page(page).get_layer(new_layer);
            y = Mm(280.0);
        }
        let name = protocol.variables.get(key).cloned().unwrap_or_default();
        layer.use_text(
            format!("{label}: {name} ............................"),
            10.0,
            Mm(20.0),
            y,
            &font,
        );
        y -= Mm(10.0);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| DatabaseError::ConstraintViolation(format!("PDF buffer error: {e}")))
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

// ─── Tests ────────────────────────────────────────────────────────────────────
