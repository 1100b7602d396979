// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use deunicode::deunicode_with_tofu;

/// 常见排版符号到ASCII的映射
const REPLACEMENTS: &[(char, &str)] = &[
    ('\u{2013}', "-"),   // en dash
    ('\u{2014}', "--"),  // em dash
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2026}', "..."),
    ('\u{00A0}', " "),
    ('\u{00AE}', "(R)"),
    ('\u{00A9}', "(C)"),
    ('\u{2122}', "(TM)"),
];

/// 需要整体剔除的emoji码位区间
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F600, 0x1F64F), // emoticons
    (0x1F300, 0x1F5FF), // symbols & pictographs
    (0x1F680, 0x1F6FF), // transport & map
    (0x1F1E0, 0x1F1FF), // flags
    (0x2190, 0x21FF),   // arrows
    (0x2300, 0x23FF),   // misc technical
    (0x24C2, 0x24C2),   // circled M
    (0x25A0, 0x25FF),   // geometric shapes
    (0x2600, 0x27BF),   // misc symbols, dingbats
    (0x2934, 0x2935),   // curved arrows
    (0x2B00, 0x2BFF),   // misc symbols and arrows
    (0x1F000, 0x1F2FF), // mahjong, cards, enclosed supplements
    (0x1F900, 0x1F9FF), // supplemental symbols
    (0x1FA70, 0x1FAFF), // extended-A
    (0xFE0F, 0xFE0F),   // variation selector
    (0x200D, 0x200D),   // zero width joiner
];

fn is_emoji(c: char) -> bool {
    let cp = c as u32;
    EMOJI_RANGES
        .iter()
        .any(|(start, end)| (*start..=*end).contains(&cp))
}

/// 将任意文本转换为可安全写入报告的可打印ASCII
///
/// 处理顺序：排版符号映射、剔除emoji、音译为ASCII、折叠空白、
/// 丢弃剩余的非可打印ASCII字符。对结果再次调用不会改变它。
pub fn sanitize_for_report(input: &str) -> String {
    let mut mapped = String::with_capacity(input.len());
    for c in input.chars() {
        if let Some((_, replacement)) = REPLACEMENTS.iter().find(|(from, _)| *from == c) {
            mapped.push_str(replacement);
        } else if !is_emoji(c) {
            mapped.push(c);
        }
    }

    let transliterated = deunicode_with_tofu(&mapped, "");

    transliterated
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| (' '..='~').contains(c))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 截断到指定字符数，超出部分以`...`表示
pub fn truncate_with_ellipsis(input: &str, max_chars: usize) -> String {
    if input.chars().count() > max_chars {
        let head: String = input.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        input.to_string()
    }
}
