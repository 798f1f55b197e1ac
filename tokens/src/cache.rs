//! Memoized denom normalization and logo lookups.
//!
//! The cache is owned by whoever builds the token source and is cleared
//! explicitly; nothing here is global.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Denoms whose search symbol is not derivable by stripping the micro prefix.
const ALIASES: [(&str, &str); 4] = [
    ("basecro", "cro"),
    ("staevmos", "stevmos"),
    ("stuatom", "atom"),
    ("stuosmo", "osmo"),
];

pub struct DenomCache {
    /// Tokens whose name genuinely starts with `u` (e.g. `uni`).
    native_u_tokens: HashSet<String>,
    search_symbols: RwLock<HashMap<String, String>>,
    logos: RwLock<HashMap<String, String>>,
}

impl DenomCache {
    pub fn new(native_u_tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            native_u_tokens: native_u_tokens.into_iter().collect(),
            search_symbols: RwLock::new(HashMap::new()),
            logos: RwLock::new(HashMap::new()),
        }
    }

    /// The lower-case symbol to look `denom` up by in the price feed.
    ///
    /// `uatom` → `atom`, `stuatom` → `atom`, `basecro` → `cro`; denoms listed
    /// as native `u` tokens are left alone.
    pub fn search_symbol(&self, denom: &str) -> String {
        if let Ok(cached) = self.search_symbols.read() {
            if let Some(symbol) = cached.get(denom) {
                return symbol.clone();
            }
        }
        let symbol = self.normalize(denom);
        if let Ok(mut cached) = self.search_symbols.write() {
            cached.insert(denom.to_string(), symbol.clone());
        }
        symbol
    }

    fn normalize(&self, denom: &str) -> String {
        if let Some((_, alias)) = ALIASES.iter().find(|(from, _)| *from == denom) {
            return (*alias).to_string();
        }
        if !self.native_u_tokens.contains(denom) && (denom.starts_with('u') || denom.starts_with("stu")) {
            return denom.replacen('u', "", 1);
        }
        denom.to_string()
    }

    pub fn logo(&self, symbol: &str) -> Option<String> {
        self.logos.read().ok()?.get(symbol).cloned()
    }

    pub fn set_logo(&self, symbol: &str, logo: String) {
        if let Ok(mut logos) = self.logos.write() {
            logos.insert(symbol.to_string(), logo);
        }
    }

    /// Drop every memoized entry.
    pub fn clear(&self) {
        let mut dropped = 0;
        if let Ok(mut symbols) = self.search_symbols.write() {
            dropped += symbols.len();
            symbols.clear();
        }
        if let Ok(mut logos) = self.logos.write() {
            dropped += logos.len();
            logos.clear();
        }
        tracing::debug!(dropped, "denom cache cleared");
    }

    /// Number of memoized entries across both maps.
    pub fn len(&self) -> usize {
        let symbols = self.search_symbols.read().map_or(0, |m| m.len());
        let logos = self.logos.read().map_or(0, |m| m.len());
        symbols + logos
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DenomCache {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
