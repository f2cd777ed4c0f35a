//! Matching Integration Tests.
//!
//! Run the matcher against snapshots taken from a live registry:
//! - Blank and disabled handling
//! - Keyword, regex and fuzzy strategies
//! - Ranking and tie-breaking

mod common;

use common::*;
use honey_launcher::{fuzzy_score, MatchType, PluginMatcher, PluginRegistry};

async fn registry_with_fixtures() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register(translate_plugin()).await.unwrap();
    registry.register(calculator_plugin()).await.unwrap();
    registry
        .register(fuzzy_plugin("clipboard", "Clipboard History"))
        .await
        .unwrap();
    registry
}

// ========== Blank Input ==========

#[tokio::test]
async fn test_blank_queries_match_nothing() {
    let registry = registry_with_fixtures().await;
    let matcher = PluginMatcher::new();

    for query in ["", " ", "\t", "  \n  "] {
        assert!(
            matcher.match_query(query, &registry.get_enabled()).is_empty(),
            "query {:?} should not match",
            query
        );
    }
}

// ========== Disabled Plugins ==========

#[tokio::test]
async fn test_disabled_plugin_never_matches() {
    let mut registry = registry_with_fixtures().await;
    registry.set_enabled("translate", false).unwrap();
    let matcher = PluginMatcher::new();

    for query in ["translate hello", "translate", "fy x"] {
        let results = matcher.match_query(query, &registry.get_enabled());
        assert!(results.iter().all(|r| r.plugin.id() != "translate"));
    }

    // Even if a caller passes the full catalog
    let results = matcher.match_query("translate hello", &registry.get_all());
    assert!(results.iter().all(|r| r.plugin.id() != "translate"));
}

// ========== Keyword ==========

#[tokio::test]
async fn test_keyword_extracts_payload() {
    let registry = registry_with_fixtures().await;
    let results = PluginMatcher::new().match_query("translate  hello world", &registry.get_enabled());

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].plugin.id(), "translate");
    assert_eq!(results[0].extracted_input, "hello world");
    assert_eq!(results[0].score, 100);
    assert_eq!(results[0].match_type, MatchType::Keyword);
}

#[tokio::test]
async fn test_whole_keyword_input() {
    let registry = registry_with_fixtures().await;
    let results = PluginMatcher::new().match_query("translate", &registry.get_enabled());

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].extracted_input, "");
    assert_eq!(results[0].score, 90);
}

// ========== Regex ==========

#[tokio::test]
async fn test_regex_forwards_full_query() {
    let registry = registry_with_fixtures().await;
    let results = PluginMatcher::new().match_query("12 + 3", &registry.get_enabled());

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].plugin.id(), "calculator");
    assert_eq!(results[0].extracted_input, "12 + 3");
    assert_eq!(results[0].match_type, MatchType::Regex);
}

// ========== Fuzzy ==========

#[tokio::test]
async fn test_fuzzy_threshold() {
    assert!(fuzzy_score("calc", "calculator") >= 50);
    assert!(fuzzy_score("xyz", "calculator") < 50);

    let mut registry = PluginRegistry::new();
    registry
        .register(fuzzy_plugin("calculator", "Calculator"))
        .await
        .unwrap();
    let matcher = PluginMatcher::new();

    let results = matcher.match_query("CALC", &registry.get_enabled());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].match_type, MatchType::Fuzzy);
    assert!(results[0].score <= 70);
    assert_eq!(results[0].extracted_input, "CALC");

    assert!(matcher.match_query("xyz", &registry.get_enabled()).is_empty());
}

// ========== Ranking ==========

#[tokio::test]
async fn test_equal_scores_ranked_by_priority() {
    let mut registry = PluginRegistry::new();
    registry
        .register(keyword_plugin("low", "go", 30))
        .await
        .unwrap();
    registry
        .register(keyword_plugin("high", "go", 70))
        .await
        .unwrap();

    let results = PluginMatcher::new().match_query("go home", &registry.get_enabled());

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].score, results[1].score);
    assert_eq!(results[0].plugin.id(), "high");
    assert_eq!(results[1].plugin.id(), "low");
}

#[tokio::test]
async fn test_results_sorted_by_score() {
    let mut registry = registry_with_fixtures().await;
    registry
        .register(fuzzy_plugin("translator", "Translator"))
        .await
        .unwrap();

    let results = PluginMatcher::new().match_query("translate", &registry.get_enabled());

    assert_eq!(results.len(), 2);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(results[0].plugin.id(), "translate");
    assert_eq!(results[1].plugin.id(), "translator");
}

#[tokio::test]
async fn test_one_result_per_plugin() {
    let registry = registry_with_fixtures().await;
    let results = PluginMatcher::new().match_query("fy 1 + 1", &registry.get_enabled());

    // translate matches on keyword, calculator does not match "fy 1 + 1"
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].extracted_input, "1 + 1");
}
