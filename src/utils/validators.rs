// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use once_cell::sync::Lazy;
use regex::Regex;

/// 搜索关键字允许的最短长度
pub const MIN_QUERY_LEN: usize = 3;
/// 搜索关键字允许的最长长度
pub const MAX_QUERY_LEN: usize = 16;

static SEARCH_QUERY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^[A-Za-z0-9_]{{{},{}}}$", MIN_QUERY_LEN, MAX_QUERY_LEN))
        .expect("search query pattern is valid")
});

/// 检查字符串是否可以作为搜索关键字
///
/// 只接受由字母、数字和下划线组成、长度在 3 到 16 之间的完整字符串，
/// 不会裁剪前后空白。
///
/// # 参数
///
/// * `query` - 待检查的关键字
///
/// # 返回值
///
/// 合法返回true，否则返回false
pub fn is_valid_search_query(query: &str) -> bool {
    SEARCH_QUERY_REGEX.is_match(query)
}
