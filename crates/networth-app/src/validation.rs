// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use time::Date;
use time::macros::format_description;
use url::Url;

pub const DATE_LAYOUT: &str = "YYYY-MM-DD";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9(][0-9 ()\-.]{5,}[0-9]$").expect("phone pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid money value")]
    InvalidMoney,
    #[error("negative money value")]
    NegativeMoney,
    #[error("invalid date value (expected {DATE_LAYOUT})")]
    InvalidDate,
    #[error("invalid number")]
    InvalidNumber,
    #[error("value {value} is outside {min}..={max}")]
    OutOfRange { value: f64, min: f64, max: f64 },
    #[error("invalid email address")]
    InvalidEmail,
    #[error("invalid phone number")]
    InvalidPhone,
    #[error("invalid URL (expected http:// or https://)")]
    InvalidUrl,
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

pub fn parse_required_cents(input: &str) -> ValidationResult<i64> {
    parse_cents(input.trim())
}

pub fn parse_optional_cents(input: &str) -> ValidationResult<Option<i64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_cents(trimmed).map(Some)
}

/// Formats cents with grouping, e.g. `₹1,234.56`.
pub fn format_cents(cents: i64, symbol: &str) -> String {
    let (sign, cents) = normalize_sign(cents);
    let whole = cents / 100;
    let remainder = cents % 100;
    format!("{sign}{symbol}{}.{remainder:02}", comma_format(whole))
}

pub fn format_optional_cents(cents: Option<i64>, symbol: &str) -> String {
    cents.map_or_else(String::new, |cents| format_cents(cents, symbol))
}

pub fn parse_date(input: &str) -> ValidationResult<Date> {
    Date::parse(input, &format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValidationError::InvalidDate)
}

pub fn parse_optional_date(input: &str) -> ValidationResult<Option<Date>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_date(trimmed).map(Some)
}

pub fn format_date(value: Option<Date>) -> String {
    value.map_or_else(String::new, |date| date.to_string())
}

pub fn parse_number(input: &str) -> ValidationResult<f64> {
    let value = input
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidNumber)?;
    if !value.is_finite() {
        return Err(ValidationError::InvalidNumber);
    }
    Ok(value)
}

pub fn check_bounds(value: f64, min: Option<f64>, max: Option<f64>) -> ValidationResult<f64> {
    let below = min.is_some_and(|min| value < min);
    let above = max.is_some_and(|max| value > max);
    if below || above {
        return Err(ValidationError::OutOfRange {
            value,
            min: min.unwrap_or(f64::MIN),
            max: max.unwrap_or(f64::MAX),
        });
    }
    Ok(value)
}

pub fn parse_percentage(input: &str) -> ValidationResult<f64> {
    check_bounds(parse_number(input)?, Some(0.0), Some(100.0))
}

pub fn validate_email(input: &str) -> ValidationResult<()> {
    if EMAIL_PATTERN.is_match(input.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_phone(input: &str) -> ValidationResult<()> {
    if PHONE_PATTERN.is_match(input.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

pub fn validate_url(input: &str) -> ValidationResult<Url> {
    let url = Url::parse(input.trim()).map_err(|_| ValidationError::InvalidUrl)?;
    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(url),
        _ => Err(ValidationError::InvalidUrl),
    }
}

fn parse_cents(input: &str) -> ValidationResult<i64> {
    let clean = input.replace(',', "");
    if clean.starts_with('-') {
        return Err(ValidationError::NegativeMoney);
    }

    let clean = clean
        .strip_prefix('$')
        .or_else(|| clean.strip_prefix('₹'))
        .unwrap_or(&clean);
    if clean.is_empty() {
        return Err(ValidationError::InvalidMoney);
    }

    let (whole, frac) = match clean.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (clean, None),
    };

    let whole = parse_digits(whole, true)?;
    if whole > i64::MAX / 100 {
        return Err(ValidationError::InvalidMoney);
    }

    let frac = match frac {
        None => 0,
        Some(digits) if digits.len() > 2 => return Err(ValidationError::InvalidMoney),
        Some(digits) => {
            let value = parse_digits(digits, false)?;
            if digits.len() == 1 { value * 10 } else { value }
        }
    };

    whole
        .checked_mul(100)
        .and_then(|value| value.checked_add(frac))
        .ok_or(ValidationError::InvalidMoney)
}

fn parse_digits(input: &str, allow_empty: bool) -> ValidationResult<i64> {
    if input.is_empty() {
        if allow_empty {
            return Ok(0);
        }
        return Err(ValidationError::InvalidMoney);
    }
    if !input.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ValidationError::InvalidMoney);
    }
    input
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidMoney)
}

fn comma_format(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn normalize_sign(cents: i64) -> (&'static str, i64) {
    if cents >= 0 {
        return ("", cents);
    }
    if cents == i64::MIN {
        ("-", i64::MAX)
    } else {
        ("-", -cents)
    }
}
