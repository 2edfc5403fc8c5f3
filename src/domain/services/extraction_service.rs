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
use scraper::Html;
use std::collections::HashSet;

// Attribute-less single-line cells only; the archive emits domains that way
// and cells with attributes carry icons and counters we do not want.
static CELL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<td>(.+?)\s*</td>").unwrap());

static ASSET_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(gif|png|jpg|jpeg|css|js|ico|svg)$").unwrap());

static IPV4_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").unwrap());

static DOMAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}").unwrap());

/// 提取服务
///
/// 负责从存档页面的表格单元格中提取域名。这是一个尽力而为的
/// 启发式过滤器，不是严格的域名校验器：上游标记中混杂着图标、
/// 计数器和时间戳，边缘情况下的误判是可接受的。
pub struct ExtractionService;

impl ExtractionService {
    /// 从页面标记中分离出所有表格单元格片段
    pub fn cell_fragments(markup: &str) -> Vec<&str> {
        CELL_RE
            .captures_iter(markup)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// 从单个单元格片段中提取归一化域名
    ///
    /// # 返回值
    ///
    /// * `Some(domain)` - 小写的域名字符串
    /// * `None` - 片段不包含可识别的域名
    pub fn extract_domain(fragment: &str) -> Option<String> {
        let document = Html::parse_fragment(fragment);
        let clean: String = document.root_element().text().collect();
        let clean = clean.trim();

        if clean.len() < 4 || ASSET_SUFFIX_RE.is_match(clean) {
            return None;
        }

        if IPV4_RE.is_match(clean) {
            return None;
        }

        // Single alphanumeric character: counter column, not a domain
        if clean.len() == 1 && clean.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }

        let matched = DOMAIN_RE.find(clean)?;
        let domain = matched.as_str().to_lowercase();

        let parts: Vec<&str> = domain.split('.').collect();
        if parts.len() < 2 {
            return None;
        }

        let tld = parts[parts.len() - 1];
        if tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(domain)
        } else {
            None
        }
    }

    /// 对一页的单元格片段运行提取并去重
    ///
    /// 去重仅在单页范围内进行，保留首次出现的顺序；
    /// 跨页出现的重复域名会被重新上报。
    pub fn page_domains(fragments: &[&str]) -> Vec<String> {
        let mut seen = HashSet::new();
        fragments
            .iter()
            .filter_map(|fragment| Self::extract_domain(fragment))
            .filter(|domain| seen.insert(domain.clone()))
            .collect()
    }
}
