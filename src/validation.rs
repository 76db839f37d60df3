//! Form validation for the public wheel, the lead form and the admin login.
//!
//! Messages are user-facing and stay in Portuguese. Every failing field is
//! reported at once; nothing here touches the backend.

use phonenumber::country::Id as CountryId;
use phonenumber::Mode;
use regex::Regex;
use std::sync::OnceLock;

use crate::errors::{AppError, FieldErrors};
use crate::models::{LeadRequest, LoginRequest, YearInput};

pub const MIN_BIRTH_YEAR: i32 = 1900;
pub const MAX_BIRTH_YEAR: i32 = 2100;

/// Country calling code for Brazil.
const BR_COUNTRY_CODE: u16 = 55;

pub const MSG_BIRTH_YEAR: &str = "Informe um ano de nascimento válido (AAAA).";
pub const MSG_NAME: &str = "O nome deve ter pelo menos 2 caracteres.";
pub const MSG_EMAIL: &str = "Por favor, informe um email válido.";
pub const MSG_WHATSAPP: &str = "Informe um WhatsApp válido (DDD + número).";
pub const MSG_LOGIN_EMAIL: &str = "E-mail inválido";
pub const MSG_LOGIN_PASSWORD: &str = "Informe a senha";

/// Lead form after validation and normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidLeadForm {
    pub birth_year: i32,
    pub name: String,
    /// Trimmed and lowercased.
    pub email: String,
    /// Display mask, e.g. `(11) 98765-4321`.
    pub whatsapp: String,
}

/// Parses a four-digit birth year within `MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR`.
pub fn parse_birth_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.len() != 4 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = raw.parse().ok()?;
    (MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR)
        .contains(&year)
        .then_some(year)
}

/// Validates the year sent by the wheel, reporting it under `birth_year`.
pub fn validate_birth_year(input: &YearInput) -> Result<i32, AppError> {
    parse_birth_year(&input.as_text()).ok_or_else(|| {
        let mut fields = FieldErrors::new();
        fields.insert("birth_year".to_string(), MSG_BIRTH_YEAR.to_string());
        AppError::Validation(fields)
    })
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        // RFC 5322 simplified: local@domain.tld
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email regex compiles")
    })
}

/// Validate email address
///
/// Checks for:
/// - Basic email format (contains @ and .)
/// - Minimum length requirements
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 5 || !email.contains('@') || !email.contains('.') {
        return false;
    }

    if !email_regex().is_match(email) {
        tracing::debug!("Invalid email format: {}", email);
        return false;
    }

    true
}

/// Validate and normalize Brazilian phone number
///
/// Parses with region BR via `phonenumber` and, when valid and registered
/// under country code 55, returns the E.164 form (`+5511987654321`).
///
/// Returns: (is_valid, normalized_phone_or_error_msg)
pub fn validate_br_phone(raw: &str) -> (bool, String) {
    if raw.trim().is_empty() || raw.len() < 8 {
        return (false, "Phone too short".to_string());
    }

    match phonenumber::parse(Some(CountryId::BR), raw) {
        Ok(number) => {
            if number.code().value() != BR_COUNTRY_CODE {
                tracing::debug!("Rejected non-Brazilian phone number: {}", raw);
                (false, "Not a Brazilian phone number".to_string())
            } else if phonenumber::is_valid(&number) {
                let formatted = number.format().mode(Mode::E164).to_string();
                tracing::debug!("Valid BR phone: {} -> {}", raw, formatted);
                (true, formatted)
            } else {
                tracing::debug!("Invalid BR phone number: {}", raw);
                (false, "Invalid Brazilian phone number".to_string())
            }
        }
        Err(e) => {
            tracing::debug!("Failed to parse BR phone '{}': {:?}", raw, e);
            (false, format!("Parse error: {:?}", e))
        }
    }
}

/// Renders a Brazilian number in the `(DD) NNNNN-NNNN` mask shown to users.
///
/// Accepts E.164 (`+55...`) or bare digits; anything that is not 10 or 11
/// national digits is returned as its digits only.
pub fn format_br_phone_display(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let national = match digits.strip_prefix("55") {
        Some(rest) if phone.trim_start().starts_with('+') || digits.len() > 11 => rest,
        _ => digits.as_str(),
    };

    match national.len() {
        10 | 11 => {
            let (ddd, number) = national.split_at(2);
            let (head, tail) = number.split_at(number.len() - 4);
            format!("({}) {}-{}", ddd, head, tail)
        }
        _ => national.to_string(),
    }
}

/// Validates the lead capture form.
pub fn validate_lead_form(req: &LeadRequest) -> Result<ValidLeadForm, AppError> {
    let mut fields = FieldErrors::new();

    let birth_year = parse_birth_year(&req.birth_year.as_text());
    if birth_year.is_none() {
        fields.insert("birth_year".to_string(), MSG_BIRTH_YEAR.to_string());
    }

    let name = req.name.trim();
    if name.chars().count() < 2 {
        fields.insert("name".to_string(), MSG_NAME.to_string());
    }

    let email = req.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        fields.insert("email".to_string(), MSG_EMAIL.to_string());
    }

    let (phone_ok, normalized) = validate_br_phone(req.whatsapp.trim());
    if !phone_ok {
        fields.insert("whatsapp".to_string(), MSG_WHATSAPP.to_string());
    }

    match birth_year {
        Some(birth_year) if fields.is_empty() => Ok(ValidLeadForm {
            birth_year,
            name: name.to_string(),
            email,
            whatsapp: format_br_phone_display(&normalized),
        }),
        _ => Err(AppError::Validation(fields)),
    }
}

/// Validates the admin login form. Only shape is checked here.
pub fn validate_login_form(req: &LoginRequest) -> Result<(), AppError> {
    let mut fields = FieldErrors::new();

    let email = req.email.trim();
    if !(email.contains('.') && email_regex().is_match(email)) {
        fields.insert("email".to_string(), MSG_LOGIN_EMAIL.to_string());
    }
    if req.password.is_empty() {
        fields.insert("password".to_string(), MSG_LOGIN_PASSWORD.to_string());
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_request(year: &str, name: &str, email: &str, whatsapp: &str) -> LeadRequest {
        LeadRequest {
            birth_year: YearInput::Text(year.to_string()),
            name: name.to_string(),
            email: email.to_string(),
            whatsapp: whatsapp.to_string(),
        }
    }

    fn field_names(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(fields) => fields.into_keys().collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_birth_year_bounds() {
        assert_eq!(parse_birth_year("1900"), Some(1900));
        assert_eq!(parse_birth_year("2100"), Some(2100));
        assert_eq!(parse_birth_year(" 1992 "), Some(1992));
        assert_eq!(parse_birth_year("1899"), None);
        assert_eq!(parse_birth_year("2101"), None);
        assert_eq!(parse_birth_year("199"), None);
        assert_eq!(parse_birth_year("19920"), None);
        assert_eq!(parse_birth_year("19a2"), None);
        assert_eq!(parse_birth_year("+992"), None);
        assert_eq!(parse_birth_year(""), None);
    }

    #[test]
    fn test_validate_birth_year_number_input() {
        assert_eq!(validate_birth_year(&YearInput::Number(1984)).unwrap(), 1984);
        assert!(validate_birth_year(&YearInput::Number(84)).is_err());
    }

    #[test]
    fn test_format_br_phone_display() {
        assert_eq!(format_br_phone_display("+5511987654321"), "(11) 98765-4321");
        assert_eq!(format_br_phone_display("+551133334444"), "(11) 3333-4444");
        assert_eq!(format_br_phone_display("11987654321"), "(11) 98765-4321");
        assert_eq!(format_br_phone_display("(21) 98765-4321"), "(21) 98765-4321");
        assert_eq!(format_br_phone_display("123"), "123");
    }

    #[test]
    fn test_valid_lead_form_normalises() {
        let form = validate_lead_form(&lead_request(
            "1992",
            "  Ana Souza ",
            " Ana.Souza@Example.com ",
            "11987654321",
        ))
        .unwrap();

        assert_eq!(form.birth_year, 1992);
        assert_eq!(form.name, "Ana Souza");
        assert_eq!(form.email, "ana.souza@example.com");
        assert_eq!(form.whatsapp, "(11) 98765-4321");
    }

    #[test]
    fn test_invalid_lead_form_reports_every_field() {
        let err = validate_lead_form(&lead_request("92", "A", "not-an-email", "123")).unwrap_err();
        assert_eq!(
            field_names(err),
            vec!["birth_year", "email", "name", "whatsapp"]
        );
    }

    #[test]
    fn test_short_name_counts_characters_not_bytes() {
        // "Zé" is two characters but three bytes.
        let form = validate_lead_form(&lead_request("1990", "Zé", "ze@example.com", "(21) 98765-4321"));
        assert!(form.is_ok());

        let err = validate_lead_form(&lead_request("1990", " é ", "ze@example.com", "(21) 98765-4321"))
            .unwrap_err();
        assert_eq!(field_names(err), vec!["name"]);
    }

    #[test]
    fn test_login_form() {
        let ok = LoginRequest {
            email: "admin@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(validate_login_form(&ok).is_ok());

        let bad = LoginRequest {
            email: "admin".to_string(),
            password: String::new(),
        };
        assert_eq!(
            field_names(validate_login_form(&bad).unwrap_err()),
            vec!["email", "password"]
        );
    }
}
