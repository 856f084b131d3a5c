// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Locale-aware number formatting for displayed metrics.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

/// Grouping and decimal separators of a display locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    tag: &'static str,
    grouping: char,
    decimal: char,
}

impl NumberLocale {
    pub const EN_US: NumberLocale = NumberLocale::new("en-US", ',', '.');
    pub const EN_GB: NumberLocale = NumberLocale::new("en-GB", ',', '.');
    pub const DE_DE: NumberLocale = NumberLocale::new("de-DE", '.', ',');
    pub const CS_CZ: NumberLocale = NumberLocale::new("cs-CZ", '\u{a0}', ',');
    pub const FR_FR: NumberLocale = NumberLocale::new("fr-FR", '\u{202f}', ',');

    const KNOWN: [NumberLocale; 5] = [
        Self::EN_US,
        Self::EN_GB,
        Self::DE_DE,
        Self::CS_CZ,
        Self::FR_FR,
    ];

    const fn new(tag: &'static str, grouping: char, decimal: char) -> Self {
        Self {
            tag,
            grouping,
            decimal,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Format a non-negative integer with thousands grouping.
    pub fn group_integer(&self, value: u64) -> String {
        let digits = value.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.grouping);
            }
            out.push(ch);
        }
        out
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::EN_US
    }
}

impl fmt::Display for NumberLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag)
    }
}

impl FromStr for NumberLocale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "-");
        Self::KNOWN
            .into_iter()
            .find(|l| l.tag.eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnknownLocale(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

/// Round a non-negative quantity to a whole number, half away from zero.
fn round_whole(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Step count as a grouped integer, e.g. `12345 -> "12,345"`.
pub fn format_steps(steps: f64, locale: &NumberLocale) -> String {
    locale.group_integer(round_whole(steps))
}

/// Total energy in whole kilocalories: `round(active + passive)`.
pub fn format_energy(active_kcal: f64, passive_kcal: f64, locale: &NumberLocale) -> String {
    locale.group_integer(round_whole(active_kcal + passive_kcal))
}

/// Body mass in grams, converted to kilograms with exactly two fractional
/// digits (half-up), e.g. `72450 -> "72.45 kg"`.
pub fn format_mass_kg(grams: f64, locale: &NumberLocale) -> String {
    let kg = grams_to_kg(grams);
    let whole = kg.trunc().to_u64().unwrap_or(0);
    let hundredths = (kg.fract() * Decimal::ONE_HUNDRED).to_u64().unwrap_or(0);
    format!(
        "{}{}{:02} kg",
        locale.group_integer(whole),
        locale.decimal,
        hundredths
    )
}

/// Kilograms rounded to two decimals.
pub fn grams_to_kg(grams: f64) -> Decimal {
    let grams = Decimal::from_f64(grams.max(0.0)).unwrap_or(Decimal::ZERO);
    (grams / Decimal::ONE_THOUSAND)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
