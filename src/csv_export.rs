//! CSV export of captured leads.
//!
//! Output is one header line of column labels followed by one line per
//! lead, joined with `\n`. A cell is quoted only when it contains a comma,
//! a double quote or a newline; inner quotes are doubled.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

use crate::errors::AppError;
use crate::models::Lead;

/// Byte-order mark prepended to downloaded files so spreadsheet tools
/// detect UTF-8 and keep accented characters.
pub const BOM: char = '\u{FEFF}';

/// Display format for `created_at`, following the pt-BR locale.
const CREATED_AT_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Exportable lead columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadColumn {
    BirthYear,
    Name,
    Email,
    Whatsapp,
    CouponCode,
    Pin,
    CouponCondition,
    ZodiacSignName,
    CreatedAt,
}

impl LeadColumn {
    /// Every column, in the order offered to admins.
    pub const ALL: [LeadColumn; 9] = [
        LeadColumn::BirthYear,
        LeadColumn::Name,
        LeadColumn::Email,
        LeadColumn::Whatsapp,
        LeadColumn::CouponCode,
        LeadColumn::Pin,
        LeadColumn::CouponCondition,
        LeadColumn::ZodiacSignName,
        LeadColumn::CreatedAt,
    ];

    /// Field name of the column on `Lead`.
    pub fn key(self) -> &'static str {
        match self {
            LeadColumn::BirthYear => "birth_year",
            LeadColumn::Name => "name",
            LeadColumn::Email => "email",
            LeadColumn::Whatsapp => "whatsapp",
            LeadColumn::CouponCode => "coupon_code",
            LeadColumn::Pin => "pin",
            LeadColumn::CouponCondition => "coupon_condition",
            LeadColumn::ZodiacSignName => "zodiac_sign_name",
            LeadColumn::CreatedAt => "created_at",
        }
    }

    /// Header label written to the CSV.
    pub fn label(self) -> &'static str {
        match self {
            LeadColumn::BirthYear => "Ano",
            LeadColumn::Name => "Nome",
            LeadColumn::Email => "E-mail",
            LeadColumn::Whatsapp => "WhatsApp",
            LeadColumn::CouponCode => "Cupom",
            LeadColumn::Pin => "PIN",
            LeadColumn::CouponCondition => "Condição do cupom",
            LeadColumn::ZodiacSignName => "Signo",
            LeadColumn::CreatedAt => "Data",
        }
    }

    fn cell(self, lead: &Lead, offset: &FixedOffset) -> Option<String> {
        match self {
            LeadColumn::BirthYear => Some(lead.birth_year.to_string()),
            LeadColumn::Name => Some(lead.name.clone()),
            LeadColumn::Email => Some(lead.email.clone()),
            LeadColumn::Whatsapp => Some(lead.whatsapp.clone()),
            LeadColumn::CouponCode => Some(lead.coupon_code.clone()),
            LeadColumn::Pin => lead.pin.clone(),
            LeadColumn::CouponCondition => lead.coupon_condition.clone(),
            LeadColumn::ZodiacSignName => Some(lead.zodiac_sign_name.clone()),
            LeadColumn::CreatedAt => Some(format_created_at(&lead.created_at, offset)),
        }
    }
}

impl FromStr for LeadColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadColumn::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("Coluna desconhecida: {}", s))
    }
}

/// Parses a comma-separated column selection, keeping first-seen order and
/// dropping repeats. `None` selects every column.
pub fn parse_columns(raw: Option<&str>) -> Result<Vec<LeadColumn>, AppError> {
    let Some(raw) = raw else {
        return Ok(LeadColumn::ALL.to_vec());
    };

    let mut columns: Vec<LeadColumn> = Vec::new();
    for key in raw.split(',').map(str::trim).filter(|k| !k.is_empty()) {
        let column = key.parse::<LeadColumn>().map_err(AppError::BadRequest)?;
        if !columns.contains(&column) {
            columns.push(column);
        }
    }

    if columns.is_empty() {
        return Err(AppError::BadRequest(
            "Selecione ao menos uma coluna para exportar.".to_string(),
        ));
    }

    Ok(columns)
}

/// Quotes a cell when it contains a comma, a double quote or a newline.
pub fn escape_value(value: &str) -> Cow<'_, str> {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Renders a timestamp as `dd/mm/yyyy, HH:MM:SS` in the display offset.
pub fn format_created_at(created_at: &DateTime<Utc>, offset: &FixedOffset) -> String {
    created_at
        .with_timezone(offset)
        .format(CREATED_AT_FORMAT)
        .to_string()
}

/// Builds the CSV text for `rows` restricted to `columns`, in that order.
pub fn export(rows: &[Lead], columns: &[LeadColumn], offset: &FixedOffset) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(","),
    );

    for lead in rows {
        let line = columns
            .iter()
            .map(|c| {
                let value = c.cell(lead, offset).unwrap_or_default();
                escape_value(&value).into_owned()
            })
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

/// Prefixes the byte-order mark for file materialisation.
pub fn with_bom(csv: &str) -> String {
    let mut out = String::with_capacity(csv.len() + BOM.len_utf8());
    out.push(BOM);
    out.push_str(csv);
    out
}

/// `leads-YYYY-MM-DD.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("leads-{}.csv", date.format("%Y-%m-%d"))
}
