use std::collections::HashSet;

use super::suite::{self, Harness, ScriptedLlm, StubCatalog, Verdict};

#[tokio::test]
async fn formalwear_request_returns_validated_products_in_similarity_order() {
	let formal = suite::category("Formalwear");
	let casual = suite::category("Casualwear");
	let mut catalog = StubCatalog::new(vec![formal.clone(), casual.clone()]);
	let blazer = catalog.add_product(&formal, "Wool Blazer", 0.9);
	let trousers = catalog.add_product(&formal, "Pleated Trousers", 0.5);

	catalog.add_product(&formal, "Bow Tie", 0.25);
	catalog.add_product(&casual, "Hoodie", 0.7);

	let llm = ScriptedLlm::new(suite::plan(
		"Let's get you ready for the office!",
		&[("Formalwear", 3, "matches formal request")],
	))
	.with_verdict("Bow Tie", Verdict::Reject);
	let harness = Harness::new(catalog, llm);
	let response = harness
		.service
		.semantic_product_search(suite::request("professional outfit for work"))
		.await
		.expect("Search should succeed.");

	assert_eq!(response.message, "Let's get you ready for the office!");
	assert_eq!(response.results.len(), 1);

	let group = &response.results[0];
	let ids: Vec<_> = group.products.iter().map(|product| product.id).collect();

	assert_eq!(group.category.name, "Formalwear");
	assert_eq!(group.category.id, formal.id);
	assert_eq!(group.category.reason, "matches formal request");
	assert_eq!(ids, vec![blazer, trousers]);
	assert_eq!(group.products[0].price, "49.90");
	assert_eq!(group.products[0].category_id, formal.id);
	assert_eq!(group.products[0].reason, "Wool Blazer suits the occasion.");
	assert_eq!(harness.embedding_calls(), 1);
	assert_eq!(harness.plan_calls(), 1);
	assert_eq!(harness.validation_calls(), 3);
}

#[tokio::test]
async fn empty_plan_returns_greeting_without_downstream_calls() {
	let catalog = StubCatalog::new(vec![suite::category("Formalwear")]);
	let llm = ScriptedLlm::new(suite::plan("Sorry, we do not stock that yet.", &[]));
	let harness = Harness::new(catalog, llm);
	let response = harness
		.service
		.semantic_product_search(suite::request("a pet dragon"))
		.await
		.expect("Search should succeed.");

	assert_eq!(response.message, "Sorry, we do not stock that yet.");
	assert!(response.results.is_empty());
	assert_eq!(harness.embedding_calls(), 0);
	assert_eq!(harness.retrieval_calls(), 0);
	assert_eq!(harness.validation_calls(), 0);
}

#[tokio::test]
async fn unknown_planned_names_are_dropped() {
	let shoes = suite::category("Shoes");
	let mut catalog = StubCatalog::new(vec![shoes.clone()]);

	catalog.add_product(&shoes, "Oxford Shoe", 0.8);

	let llm = ScriptedLlm::new(suite::plan(
		"Hello!",
		&[("Spaceships", 2, "invented"), ("  shoes ", 1, "goes with the suit")],
	));
	let harness = Harness::new(catalog, llm);
	let response = harness
		.service
		.semantic_product_search(suite::request("shoes for a wedding"))
		.await
		.expect("Search should succeed.");

	assert_eq!(response.results.len(), 1);
	assert_eq!(response.results[0].category.id, shoes.id);
	assert_eq!(harness.retrieval_calls(), 1);
}

#[tokio::test]
async fn plan_without_known_names_skips_embedding() {
	let catalog = StubCatalog::new(vec![suite::category("Shoes")]);
	let llm = ScriptedLlm::new(suite::plan("Hello!", &[("Spaceships", 2, "invented")]));
	let harness = Harness::new(catalog, llm);
	let response = harness
		.service
		.semantic_product_search(suite::request("a rocket"))
		.await
		.expect("Search should succeed.");

	assert_eq!(response.message, "Hello!");
	assert!(response.results.is_empty());
	assert_eq!(harness.embedding_calls(), 0);
}

#[tokio::test]
async fn only_products_strictly_above_threshold_are_returned() {
	let shoes = suite::category("Shoes");
	let hats = suite::category("Hats");
	let mut catalog = StubCatalog::new(vec![shoes.clone(), hats.clone()]);
	let kept = catalog.add_product(&shoes, "Loafer", 0.21);

	catalog.add_product(&shoes, "Boot", 0.2);
	catalog.add_product(&shoes, "Sandal", 0.05);
	catalog.add_product(&hats, "Fedora", 0.95);

	catalog.leaky = true;

	let llm = ScriptedLlm::new(suite::plan("Hi!", &[("Shoes", 5, "footwear")]));
	let harness = Harness::new(catalog, llm);
	let response = harness
		.service
		.semantic_product_search(suite::request("comfortable shoes"))
		.await
		.expect("Search should succeed.");
	let ids: Vec<_> = response.results[0].products.iter().map(|product| product.id).collect();

	assert_eq!(ids, vec![kept]);
	assert_eq!(harness.validation_calls(), 1);
}

#[tokio::test]
async fn groups_respect_counts_and_never_repeat_products() {
	let shoes = suite::category("Shoes");
	let boots = suite::category("Boots");
	let mut catalog = StubCatalog::new(vec![shoes.clone(), boots.clone()]);

	for (idx, sim) in [0.9, 0.8, 0.7, 0.6].into_iter().enumerate() {
		catalog.add_product(&shoes, &format!("Shoe {idx}"), sim);
	}

	catalog.add_product(&boots, "Chelsea Boot", 0.4);

	let llm = ScriptedLlm::new(suite::plan(
		"Hi!",
		&[("Shoes", 2, "footwear"), ("Boots", 5, "sturdier"), ("Shoes", 4, "again")],
	));
	let harness = Harness::new(catalog, llm);
	let response = harness
		.service
		.semantic_product_search(suite::request("something for my feet"))
		.await
		.expect("Search should succeed.");
	let mut seen = HashSet::new();

	assert_eq!(response.results.len(), 2);
	assert_eq!(response.results[0].products.len(), 2);
	assert_eq!(response.results[1].products.len(), 1);

	for group in &response.results {
		for product in &group.products {
			assert!(seen.insert(product.id), "Product {} repeated.", product.id);
		}
	}
}

#[tokio::test]
async fn categories_without_survivors_are_omitted() {
	let shoes = suite::category("Shoes");
	let hats = suite::category("Hats");
	let mut catalog = StubCatalog::new(vec![shoes.clone(), hats.clone()]);

	catalog.add_product(&shoes, "Clog", 0.6);
	catalog.add_product(&hats, "Beanie", 0.6);

	let llm = ScriptedLlm::new(suite::plan("Hi!", &[("Shoes", 1, "feet"), ("Hats", 1, "head")]))
		.with_verdict("Clog", Verdict::Reject);
	let harness = Harness::new(catalog, llm);
	let response = harness
		.service
		.semantic_product_search(suite::request("winter accessories"))
		.await
		.expect("Search should succeed.");

	assert_eq!(response.results.len(), 1);
	assert_eq!(response.results[0].category.name, "Hats");
}

#[tokio::test]
async fn repeated_requests_are_deterministic() {
	let shoes = suite::category("Shoes");
	let hats = suite::category("Hats");
	let mut catalog = StubCatalog::new(vec![shoes.clone(), hats.clone()]);

	catalog.add_product(&shoes, "Runner", 0.5);
	catalog.add_product(&shoes, "Trail Shoe", 0.5);
	catalog.add_product(&shoes, "Court Shoe", 0.7);
	catalog.add_product(&hats, "Cap", 0.3);

	let llm = ScriptedLlm::new(suite::plan("Hi!", &[("Hats", 1, "sun"), ("Shoes", 3, "run")]));
	let harness = Harness::new(catalog, llm);
	let first = harness
		.service
		.semantic_product_search(suite::request("gear for a sunny jog"))
		.await
		.expect("Search should succeed.");
	let second = harness
		.service
		.semantic_product_search(suite::request("gear for a sunny jog"))
		.await
		.expect("Search should succeed.");
	let shoe_names: Vec<_> =
		first.results[1].products.iter().map(|product| product.name.as_str()).collect();

	assert_eq!(first, second);
	assert_eq!(first.results[0].category.name, "Hats");
	assert_eq!(shoe_names, vec!["Court Shoe", "Runner", "Trail Shoe"]);
}
