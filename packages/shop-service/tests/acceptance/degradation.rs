use std::time::Duration;

use super::suite::{self, Harness, ScriptedLlm, StubCatalog, Verdict};
use shop_service::Error;

#[tokio::test]
async fn failed_validation_drops_only_that_candidate() {
	let shoes = suite::category("Shoes");
	let mut catalog = StubCatalog::new(vec![shoes.clone()]);
	let kept = catalog.add_product(&shoes, "Derby", 0.8);

	catalog.add_product(&shoes, "Brogue", 0.7);

	let llm = ScriptedLlm::new(suite::plan("Hi!", &[("Shoes", 2, "smart shoes")]))
		.with_verdict("Brogue", Verdict::Fail);
	let harness = Harness::new(catalog, llm);
	let response = harness
		.service
		.semantic_product_search(suite::request("smart shoes for dinner"))
		.await
		.expect("Search should succeed.");
	let ids: Vec<_> = response.results[0].products.iter().map(|product| product.id).collect();

	assert_eq!(ids, vec![kept]);
	// One call for the Derby plus every attempt for the Brogue.
	assert_eq!(harness.validation_calls(), 1 + 3);
}

#[tokio::test]
async fn failed_retrieval_omits_only_that_category() {
	let shoes = suite::category("Shoes");
	let hats = suite::category("Hats");
	let mut catalog = StubCatalog::new(vec![shoes.clone(), hats.clone()]);

	catalog.add_product(&shoes, "Derby", 0.8);
	catalog.add_product(&hats, "Panama", 0.8);
	catalog.failing_categories.insert(shoes.id);

	let llm = ScriptedLlm::new(suite::plan("Hi!", &[("Shoes", 1, "feet"), ("Hats", 1, "sun")]));
	let harness = Harness::new(catalog, llm);
	let response = harness
		.service
		.semantic_product_search(suite::request("summer wedding outfit"))
		.await
		.expect("Search should succeed.");

	assert_eq!(response.results.len(), 1);
	assert_eq!(response.results[0].category.id, hats.id);
	assert_eq!(harness.retrieval_calls(), 2);
}

#[tokio::test]
async fn fully_degraded_pipeline_returns_an_empty_success() {
	let shoes = suite::category("Shoes");
	let mut catalog = StubCatalog::new(vec![shoes.clone()]);

	catalog.add_product(&shoes, "Derby", 0.8);

	let llm = ScriptedLlm::new(suite::plan("Hi!", &[("Shoes", 1, "feet")]))
		.with_verdict("Derby", Verdict::Fail);
	let harness = Harness::new(catalog, llm);
	let response = harness
		.service
		.semantic_product_search(suite::request("smart shoes for dinner"))
		.await
		.expect("Search should succeed.");

	assert_eq!(response.message, "Hi!");
	assert!(response.results.is_empty());
}

#[tokio::test]
async fn request_deadline_is_an_upstream_failure() {
	let mut cfg = suite::test_config();

	cfg.pipeline.request_timeout_ms = 20;

	let mut llm = ScriptedLlm::new(suite::plan("Hi!", &[("Shoes", 1, "feet")]));

	llm.delay = Some(Duration::from_millis(500));

	let harness =
		Harness::with_config(cfg, StubCatalog::new(vec![suite::category("Shoes")]), llm);
	let err = harness
		.service
		.semantic_product_search(suite::request("smart shoes for dinner"))
		.await
		.expect_err("The deadline must fail the request.");

	assert!(matches!(err, Error::Upstream { .. }), "Unexpected error: {err}");
	assert_eq!(harness.embedding_calls(), 0);
}

#[tokio::test]
async fn fan_out_stays_within_configured_concurrency() {
	let cfg = suite::test_config();
	let retrieval_cap = cfg.pipeline.retrieval_concurrency as usize;
	let validation_cap = cfg.pipeline.validation_concurrency as usize;
	let names = ["Shoes", "Hats", "Coats", "Scarves"];
	let categories: Vec<_> = names.iter().map(|name| suite::category(name)).collect();
	let mut catalog = StubCatalog::new(categories.clone());

	for category in &categories {
		for i in 0..5 {
			catalog.add_product(category, &format!("{} {i}", category.name), 0.9);
		}
	}

	catalog.delay = Some(Duration::from_millis(20));

	let plan: Vec<_> = names.iter().map(|name| (*name, 5, "wardrobe")).collect();
	let mut llm = ScriptedLlm::new(suite::plan("Hi!", &plan));

	llm.delay = Some(Duration::from_millis(10));

	let harness = Harness::with_config(cfg, catalog, llm);
	let response = harness
		.service
		.semantic_product_search(suite::request("a full winter wardrobe"))
		.await
		.expect("Search should succeed.");
	let retrieval_peak = harness.catalog.retrievals_in_flight.peak();
	let validation_peak = harness.llm.validations_in_flight.peak();

	assert_eq!(response.results.len(), names.len());
	assert_eq!(harness.validation_calls(), 20);
	assert!(retrieval_peak > 1 && retrieval_peak <= retrieval_cap, "retrieval peak {retrieval_peak}");
	assert!(
		validation_peak > 1 && validation_peak <= validation_cap,
		"validation peak {validation_peak}"
	);
}
