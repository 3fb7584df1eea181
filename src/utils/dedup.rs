// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;

/// 保序去重
///
/// 保留每个元素第一次出现的位置，丢弃后续重复项
pub fn unique_in_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for item in items {
        let item = item.into();
        if seen.insert(item.clone()) {
            unique.push(item);
        }
    }

    unique
}
