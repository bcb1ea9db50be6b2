//! Heading numeral conversion
//!
//! Chinese ordinals are only understood from 一 to 二十. Anything outside
//! that range is "no value", never zero, so a heading like 二十一、 can not
//! be mistaken for a sequence break or a continuation.

use crate::config::NumeralSystem;

const CHINESE_ORDINALS: [&str; 20] = [
    "一", "二", "三", "四", "五", "六", "七", "八", "九", "十", //
    "十一", "十二", "十三", "十四", "十五", "十六", "十七", "十八", "十九", "二十",
];

pub fn chinese_to_int(token: &str) -> Option<u32> {
    CHINESE_ORDINALS
        .iter()
        .position(|numeral| *numeral == token)
        .map(|index| index as u32 + 1)
}

pub fn int_to_chinese(value: u32) -> Option<&'static str> {
    let index = usize::try_from(value).ok()?.checked_sub(1)?;
    CHINESE_ORDINALS.get(index).copied()
}

/// ASCII decimal digits only; full-width or other Unicode digits fail
pub fn arabic_to_int(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

impl NumeralSystem {
    pub fn to_int(self, token: &str) -> Option<u32> {
        match self {
            NumeralSystem::Chinese => chinese_to_int(token),
            NumeralSystem::Arabic => arabic_to_int(token),
        }
    }

    /// Render `value` in this system, for "expected ..." notes.
    /// Chinese values past the table fall back to digits.
    pub fn render(self, value: u32) -> String {
        match self {
            NumeralSystem::Chinese => int_to_chinese(value)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
            NumeralSystem::Arabic => value.to_string(),
        }
    }
}
