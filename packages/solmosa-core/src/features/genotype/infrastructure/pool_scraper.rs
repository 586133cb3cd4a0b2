//! Literal pools scraped from Solidity source

use crate::features::genotype::domain::ValuePools;
use alloy_primitives::{Address, I256, U256};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::hash::Hash;
use std::str::FromStr;
use tracing::warn;

static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//[^\n]*").unwrap());
static PRAGMA_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*pragma\b[^\n]*").unwrap());
static IMPORT_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*import\b[^\n]*").unwrap());
static ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b0x[A-Za-z0-9]{40}\b").unwrap());
static ETHER_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+)(?:\.(\d+))?\s*(wei|gwei|szabo|finney|ether)\b").unwrap());
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());
static STRING_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""((?:[^"\\\n]|\\.)*)"|'((?:[^'\\\n]|\\.)*)'"#).unwrap());
static GUARD_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:require|revert)\s*\(").unwrap());

/// Collect address, wei, integer and string literals from `source`
///
/// Addresses the executor does not know as accounts are dropped.
pub fn scrape_pools(source: &str, known_accounts: &[Address]) -> ValuePools {
    let code = strip_comments(source);

    ValuePools {
        addresses: scrape_addresses(&code, known_accounts),
        wei: scrape_wei(&code),
        ints: scrape_ints(&code),
        strings: scrape_strings(&code),
    }
}

fn strip_comments(source: &str) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(source, " ");
    LINE_COMMENT.replace_all(&without_blocks, "").into_owned()
}

fn scrape_addresses(code: &str, known_accounts: &[Address]) -> Vec<Address> {
    let found = ADDRESS.find_iter(code).filter_map(|m| {
        let address = Address::from_str(m.as_str()).ok()?;
        if known_accounts.contains(&address) {
            Some(address)
        } else {
            warn!(address = %address, "Address literal is not an executor account, ignoring it");
            None
        }
    });
    dedup_ordered(found)
}

fn scrape_wei(code: &str) -> Vec<U256> {
    let found = ETHER_AMOUNT.captures_iter(code).filter_map(|caps| {
        let whole = caps.get(1)?.as_str();
        let fraction = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let decimals = match caps.get(3)?.as_str() {
            "wei" => 0,
            "gwei" => 9,
            "szabo" => 12,
            "finney" => 15,
            _ => 18,
        };
        to_wei(whole, fraction, decimals)
    });
    dedup_ordered(found)
}

/// Exact decimal-to-wei conversion; `None` if the amount is not integral in wei
fn to_wei(whole: &str, fraction: &str, decimals: usize) -> Option<U256> {
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals {
        return None;
    }
    let digits = format!("{}{}{}", whole, fraction, "0".repeat(decimals - fraction.len()));
    U256::from_str_radix(&digits, 10).ok()
}

fn scrape_ints(code: &str) -> Vec<I256> {
    let code = PRAGMA_LINE.replace_all(code, "");
    let bytes = code.as_bytes();
    let is_attached = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'.';

    let found = DIGITS.find_iter(&code).filter_map(|m| {
        let before = m.start().checked_sub(1).map(|i| bytes[i]);
        let after = bytes.get(m.end()).copied();
        if before.is_some_and(is_attached) || after.is_some_and(is_attached) {
            return None;
        }
        I256::from_dec_str(m.as_str()).ok()
    });
    dedup_ordered(found.collect::<Vec<_>>())
}

fn scrape_strings(code: &str) -> Vec<String> {
    let code = IMPORT_LINE.replace_all(code, "");
    let guarded = guard_call_spans(&code);

    let found = STRING_LITERAL.captures_iter(&code).filter_map(|caps| {
        let whole = caps.get(0)?;
        if guarded.iter().any(|(start, end)| whole.start() >= *start && whole.end() <= *end) {
            return None;
        }
        caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str().to_string())
    });
    dedup_ordered(found.collect::<Vec<_>>())
}

/// Byte spans of `require(...)`/`revert(...)` argument lists
fn guard_call_spans(code: &str) -> Vec<(usize, usize)> {
    let bytes = code.as_bytes();
    GUARD_CALL
        .find_iter(code)
        .map(|m| {
            let mut depth = 1usize;
            let mut quote: Option<u8> = None;
            let mut i = m.end();
            while i < bytes.len() && depth > 0 {
                let b = bytes[i];
                match quote {
                    Some(_) if b == b'\\' => i += 1,
                    Some(q) if b == q => quote = None,
                    Some(_) => {}
                    None => match b {
                        b'"' | b'\'' => quote = Some(b),
                        b'(' => depth += 1,
                        b')' => depth -= 1,
                        _ => {}
                    },
                }
                i += 1;
            }
            (m.start(), i)
        })
        .collect()
}

fn dedup_ordered<T: Eq + Hash + Clone>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}
