// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::form_urlencoded;

/// 拼接接口URL
///
/// 去掉基础地址末尾的 `/`，然后附加路径和按顺序编码的查询参数
pub fn build_endpoint_url(base_url: &str, path: &str, params: &[(&str, &str)]) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish();
    format!("{}{}?{}", base_url.trim_end_matches('/'), path, query)
}
