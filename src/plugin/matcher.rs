//! Plugin matching engine.
//!
//! Classifies a query against a set of plugins. Each plugin is tried with
//! three strategies in strict precedence order, and the first hit wins:
//!
//! 1. **Keyword**: `keyword <payload>` scores 100 with the payload extracted,
//!    a query equal to the keyword scores 90 with an empty payload.
//! 2. **Regex**: the plugin's pattern against the whole trimmed query;
//!    scores the plugin's priority (80 when unset), payload is the whole query.
//! 3. **Fuzzy**: greedy subsequence score against the display name, for
//!    plugins that opt in; included at a raw score of 50, capped at 70.
//!
//! Results are ranked by score, then by priority. The sort is stable, so
//! remaining ties keep the input order.

use regex::RegexBuilder;
use std::sync::Arc;
use tracing::debug;

use super::types::{MatchResult, MatchType, Plugin};

/// Score for `keyword <payload>`.
pub const KEYWORD_PREFIX_SCORE: u32 = 100;
/// Score for a query that is exactly a keyword.
pub const KEYWORD_EXACT_SCORE: u32 = 90;
/// Regex score when the plugin has no configured priority.
pub const REGEX_DEFAULT_SCORE: u32 = 80;
/// Minimum raw fuzzy score for inclusion.
pub const FUZZY_THRESHOLD: u32 = 50;
/// Highest score a fuzzy match can be emitted with.
pub const FUZZY_MAX_SCORE: u32 = 70;

/// Stateless query classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluginMatcher;

impl PluginMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Match `query` against `plugins`, returning results ranked best first.
    ///
    /// Blank queries never match. Disabled plugins are skipped even if the
    /// caller passed them in.
    pub fn match_query(&self, query: &str, plugins: &[Arc<Plugin>]) -> Vec<MatchResult> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return vec![];
        }

        let mut results: Vec<MatchResult> = plugins
            .iter()
            .filter(|plugin| plugin.is_enabled())
            .filter_map(|plugin| {
                Self::match_keyword(trimmed, plugin)
                    .or_else(|| Self::match_regex(trimmed, plugin))
                    .or_else(|| Self::match_fuzzy(trimmed, plugin))
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| b.plugin.priority().cmp(&a.plugin.priority()))
        });

        debug!("Found {} matches for \"{}\"", results.len(), query);
        results
    }

    fn match_keyword(input: &str, plugin: &Arc<Plugin>) -> Option<MatchResult> {
        for keyword in &plugin.config().keywords {
            let prefix = RegexBuilder::new(&format!(r"^{}\s+(.+)$", regex::escape(keyword)))
                .case_insensitive(true)
                .build();

            match prefix {
                Ok(prefix) => {
                    if let Some(payload) = prefix.captures(input).and_then(|caps| caps.get(1)) {
                        debug!(
                            "Keyword match: \"{}\" for plugin {}",
                            keyword,
                            plugin.name()
                        );
                        return Some(MatchResult {
                            plugin: Arc::clone(plugin),
                            score: KEYWORD_PREFIX_SCORE,
                            extracted_input: payload.as_str().trim().to_string(),
                            match_type: MatchType::Keyword,
                        });
                    }
                }
                Err(e) => debug!("Skipping keyword \"{}\": {}", keyword, e),
            }

            if input.to_lowercase() == keyword.to_lowercase() {
                return Some(MatchResult {
                    plugin: Arc::clone(plugin),
                    score: KEYWORD_EXACT_SCORE,
                    extracted_input: String::new(),
                    match_type: MatchType::Keyword,
                });
            }
        }

        None
    }

    fn match_regex(input: &str, plugin: &Arc<Plugin>) -> Option<MatchResult> {
        let pattern = plugin.config().pattern.as_ref()?;
        if !pattern.is_match(input) {
            return None;
        }

        debug!("Regex match for plugin {}", plugin.name());
        Some(MatchResult {
            plugin: Arc::clone(plugin),
            score: plugin
                .config()
                .priority
                .map(u32::from)
                .unwrap_or(REGEX_DEFAULT_SCORE),
            extracted_input: input.to_string(),
            match_type: MatchType::Regex,
        })
    }

    fn match_fuzzy(input: &str, plugin: &Arc<Plugin>) -> Option<MatchResult> {
        if !plugin.config().fuzzy_match {
            return None;
        }

        let score = fuzzy_score(&input.to_lowercase(), &plugin.name().to_lowercase());
        if score < FUZZY_THRESHOLD {
            return None;
        }

        debug!("Fuzzy match: score={} for plugin {}", score, plugin.name());
        Some(MatchResult {
            plugin: Arc::clone(plugin),
            score: score.min(FUZZY_MAX_SCORE),
            extracted_input: input.to_string(),
            match_type: MatchType::Fuzzy,
        })
    }
}

/// Greedy single-pass subsequence score of `input` against `target`, 0-100.
///
/// Each target char equal to the next unconsumed input char scores 10, plus
/// `2 * run` once a consecutive run is longer than one. Consuming all of
/// `input` adds 20. The length difference costs 2 per char. Comparison is
/// exact; callers lowercase both sides.
pub fn fuzzy_score(input: &str, target: &str) -> u32 {
    if input == target {
        return 100;
    }

    let input: Vec<char> = input.chars().collect();
    let target: Vec<char> = target.chars().collect();

    let mut score: i64 = 0;
    let mut cursor = 0;
    let mut run: i64 = 0;

    for &c in &target {
        if cursor >= input.len() {
            break;
        }
        if c == input[cursor] {
            score += 10;
            run += 1;
            if run > 1 {
                score += run * 2;
            }
            cursor += 1;
        } else {
            run = 0;
        }
    }

    if cursor == input.len() {
        score += 20;
    }

    let length_diff = (target.len() as i64 - input.len() as i64).abs();
    score -= length_diff * 2;

    score.clamp(0, 100) as u32
}
