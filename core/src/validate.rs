//! Pre-flight validation of request values.
//!
//! Rules live next to the wire directives in each type's [`FieldTable`] and
//! are channel independent. Everything except [`Rule::Required`] is skipped
//! for zero values; slice fields are checked element by element.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ApiError, FieldViolation};
use crate::field::FieldTable;
use crate::wire::{Mapped, WireValue};

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    MaxLen(usize),
    MinLen(usize),
    Len(usize),
    LenBetween(usize, usize),
    /// Inclusive numeric bounds.
    Range(i64, i64),
    Numeric,
    Email,
    CountryCode,
    /// At least one lower-case letter, one upper-case letter and one symbol.
    Password,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::MaxLen(_) => "max_len",
            Rule::MinLen(_) => "min_len",
            Rule::Len(_) => "len",
            Rule::LenBetween(..) => "len_between",
            Rule::Range(..) => "range",
            Rule::Numeric => "numeric",
            Rule::Email => "email",
            Rule::CountryCode => "country_code",
            Rule::Password => "password",
        }
    }

    /// Check one formatted value; `None` means it passes.
    fn check(&self, value: &str) -> Option<String> {
        let len = value.chars().count();
        let ok = match self {
            Rule::Required => true,
            Rule::MaxLen(max) => len <= *max,
            Rule::MinLen(min) => len >= *min,
            Rule::Len(n) => len == *n,
            Rule::LenBetween(min, max) => (*min..=*max).contains(&len),
            Rule::Range(min, max) => value
                .parse::<i64>()
                .is_ok_and(|n| (*min..=*max).contains(&n)),
            Rule::Numeric => is_numeric(value),
            Rule::Email => EMAIL_RE.is_match(value),
            Rule::CountryCode => is_country_code(value),
            Rule::Password => {
                LOWER_RE.is_match(value) && UPPER_RE.is_match(value) && SYMBOL_RE.is_match(value)
            }
        };
        if ok {
            return None;
        }
        Some(match self {
            Rule::Required => "is required".to_string(),
            Rule::MaxLen(max) => format!("must be at most {max} characters"),
            Rule::MinLen(min) => format!("must be at least {min} characters"),
            Rule::Len(n) => format!("must be exactly {n} characters"),
            Rule::LenBetween(min, max) => format!("must be {min} to {max} characters"),
            Rule::Range(min, max) => format!("must be a number between {min} and {max}"),
            Rule::Numeric => "must contain digits only".to_string(),
            Rule::Email => "must be an email address".to_string(),
            Rule::CountryCode => "must be an ISO 3166-1 alpha-2 code".to_string(),
            Rule::Password => {
                "must mix lower-case, upper-case and symbol characters".to_string()
            }
        })
    }
}

/// Validate `value` against its table. All violations are collected.
pub fn validate<T: Mapped>(value: &T) -> Result<(), ApiError> {
    let violations = violations(value, "")?;
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(violations))
    }
}

/// Violations of `value`, with field paths prefixed by `path`.
pub fn violations<T: Mapped>(value: &T, path: &str) -> Result<Vec<FieldViolation>, ApiError> {
    let table = T::field_table()?;
    let fields = value.wire_fields();
    let mut out = Vec::new();

    for (name, field) in &fields {
        let Some(decl) = table.decl(name) else { continue };
        let field_path = join_path(path, name);
        check_field(&field_path, *field, &decl.rules, &mut out);
        if !field.is_zero() {
            out.extend(field.nested_violations(&field_path)?);
        }
    }

    check_groups(table, &fields, path, &mut out);
    Ok(out)
}

fn check_field(path: &str, field: &dyn WireValue, rules: &[Rule], out: &mut Vec<FieldViolation>) {
    if field.is_zero() {
        if rules.contains(&Rule::Required) {
            out.push(FieldViolation {
                field: path.to_string(),
                rule: Rule::Required.name(),
                message: "is required".to_string(),
            });
        }
        return;
    }

    let values = field.wire_values();
    for rule in rules.iter().filter(|r| **r != Rule::Required) {
        if let Some(message) = values.iter().find_map(|v| rule.check(v)) {
            out.push(FieldViolation {
                field: path.to_string(),
                rule: rule.name(),
                message,
            });
        }
    }
}

fn check_groups(
    table: &FieldTable,
    fields: &[(&'static str, &dyn WireValue)],
    path: &str,
    out: &mut Vec<FieldViolation>,
) {
    for group in table.exactly_one_of_groups() {
        let present = fields
            .iter()
            .filter(|(name, value)| group.contains(name) && !value.is_zero())
            .count();
        if present != 1 {
            out.push(FieldViolation {
                field: join_path(path, &group.join("|")),
                rule: "exactly_one_of",
                message: format!("exactly one of {} must be set", group.join(", ")),
            });
        }
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

pub fn is_numeric(value: &str) -> bool {
    NUMBER_RE.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_country_code(value: &str) -> bool {
    COUNTRY_CODES.binary_search(&value).is_ok()
}

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("invalid number regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("invalid email regex")
});

static LOWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]").expect("invalid lower-case regex"));
static UPPER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]").expect("invalid upper-case regex"));
static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[~*!@$#%_+.?:,{}]").expect("invalid symbol regex"));

/// ISO 3166-1 alpha-2, sorted for binary search.
const COUNTRY_CODES: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
    "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS",
    "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
    "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
    "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
    "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC",
    "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
    "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG",
    "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS",
    "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
    "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Channel, FieldTable};
    use crate::mapped;

    #[derive(Debug, Clone, Default)]
    struct Inner {
        city: String,
        country: String,
    }

    mapped!(Inner { city, country }, || FieldTable::builder()
        .scalar("city")
        .on(Channel::ADD, "city")
        .rule(Rule::Required)
        .rule(Rule::MaxLen(5))
        .scalar("country")
        .on(Channel::ADD, "country")
        .rule(Rule::CountryCode)
        .build());

    #[derive(Debug, Clone, Default)]
    struct Form {
        id: String,
        email: String,
        ids: Vec<String>,
        limit: u16,
        password: String,
        username: String,
        inner: Inner,
    }

    mapped!(Form { id, email, ids, limit, password, username, inner }, || FieldTable::builder()
        .scalar("id")
        .on(Channel::ADD, "id,optional")
        .rule(Rule::Numeric)
        .scalar("email")
        .on(Channel::ADD, "email,optional")
        .rule(Rule::Email)
        .slice("ids")
        .on(Channel::ADD, "ids,optional")
        .rule(Rule::Numeric)
        .scalar("limit")
        .on(Channel::ADD, "limit")
        .rule(Rule::Required)
        .rule(Rule::Range(10, 500))
        .scalar("password")
        .on(Channel::ADD, "passwd,optional")
        .rule(Rule::LenBetween(9, 16))
        .rule(Rule::Password)
        .scalar("username")
        .on(Channel::ADD, "username,optional")
        .nested("inner")
        .on(Channel::ADD, "inner")
        .exactly_one_of(&["id", "username"])
        .build());

    fn valid() -> Form {
        Form {
            id: "42".into(),
            limit: 25,
            inner: Inner {
                city: "Oslo".into(),
                country: "NO".into(),
            },
            ..Default::default()
        }
    }

    fn rules_of(err: ApiError) -> Vec<(String, &'static str)> {
        match err {
            ApiError::Validation(v) => v.into_iter().map(|v| (v.field, v.rule)).collect(),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn valid_value_passes() {
        assert!(validate(&valid()).is_ok());
    }

    #[test]
    fn zero_optional_fields_skip_format_rules() {
        let form = Form {
            email: String::new(),
            password: String::new(),
            ..valid()
        };
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn collects_all_violations_in_declaration_order() {
        let form = Form {
            id: "4x".into(),
            email: "not-an-email".into(),
            ids: vec!["1".into(), "two".into()],
            limit: 0,
            password: "short".into(),
            inner: Inner {
                city: String::new(),
                country: "XX".into(),
            },
            ..Default::default()
        };
        assert_eq!(
            rules_of(validate(&form).unwrap_err()),
            vec![
                ("id".to_string(), "numeric"),
                ("email".to_string(), "email"),
                ("ids".to_string(), "numeric"),
                ("limit".to_string(), "required"),
                ("password".to_string(), "len_between"),
                ("password".to_string(), "password"),
                ("inner.city".to_string(), "required"),
                ("inner.country".to_string(), "country_code"),
            ]
        );
    }

    #[test]
    fn range_checks_numeric_bounds() {
        let form = Form {
            limit: 501,
            ..valid()
        };
        assert_eq!(
            rules_of(validate(&form).unwrap_err()),
            vec![("limit".to_string(), "range")]
        );
    }

    #[test]
    fn exactly_one_of_rejects_none_and_both() {
        let none = Form {
            id: String::new(),
            ..valid()
        };
        assert_eq!(
            rules_of(validate(&none).unwrap_err()),
            vec![("id|username".to_string(), "exactly_one_of")]
        );

        let both = Form {
            username: "alice@example.com".into(),
            ..valid()
        };
        assert!(validate(&both).is_err());
    }

    #[test]
    fn password_rule_needs_all_classes() {
        assert!(Rule::Password.check("Abcdefgh!").is_none());
        assert!(Rule::Password.check("abcdefgh!").is_some());
        assert!(Rule::Password.check("ABCDEFGHi").is_some());
    }

    #[test]
    fn helpers() {
        assert!(is_numeric("0123"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("12a"));
        assert!(is_email("first.last+tag@sub.example.co.uk"));
        assert!(!is_email("missing-at.example.com"));
        assert!(!is_email("a@localhost"));
        assert!(is_country_code("ID"));
        assert!(!is_country_code("id"));
        assert!(!is_country_code("UK"));
    }

    #[test]
    fn country_codes_are_sorted() {
        assert!(COUNTRY_CODES.windows(2).all(|w| w[0] < w[1]));
    }
}
