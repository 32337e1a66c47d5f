use std::time::{Duration, Instant};

use futures::{StreamExt, stream};
use serde::{Deserialize, Serialize};

use crate::{
	Candidate, Error, RecommendationGroup, ResolvedCategory, Result, ShopService,
	ValidatedCandidate, aggregate, planner,
};
use shop_domain::prompt::{self, PromptRejectReason};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SemanticSearchRequest {
	pub prompt: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SemanticSearchResponse {
	pub message: String,
	pub results: Vec<RecommendationGroup>,
}
impl SemanticSearchResponse {
	fn greeting_only(message: String) -> Self {
		Self { message, results: Vec::new() }
	}
}

struct ValidationJob {
	group: usize,
	candidate: Candidate,
}

impl ShopService {
	pub async fn semantic_product_search(
		&self,
		req: SemanticSearchRequest,
	) -> Result<SemanticSearchResponse> {
		let prompt = prompt::validate_prompt(&req.prompt).map_err(|reason| match reason {
			PromptRejectReason::TooShort { chars } => Error::InvalidInput {
				message: format!(
					"prompt must be at least {} characters, got {chars}.",
					prompt::MIN_PROMPT_CHARS
				),
			},
		})?;
		let deadline = Duration::from_millis(self.cfg.pipeline.request_timeout_ms);

		match tokio::time::timeout(deadline, self.run_pipeline(prompt)).await {
			Ok(result) => result,
			Err(_) => Err(Error::Upstream {
				message: format!("Recommendation deadline of {deadline:?} exceeded."),
			}),
		}
	}

	async fn run_pipeline(&self, prompt: &str) -> Result<SemanticSearchResponse> {
		let started = Instant::now();
		let categories = self.catalog.categories().await?;

		if categories.is_empty() {
			return Err(Error::Precondition {
				message: "The catalog has no categories.".to_string(),
			});
		}

		let plan = self.plan_categories(prompt, &categories).await?;
		let resolved = planner::resolve_plan(&plan, &categories);

		tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Planning finished.");

		if resolved.is_empty() {
			tracing::info!(
				planned = plan.categories.len(),
				resolved = 0,
				groups = 0,
				"No catalog category matched the request."
			);

			return Ok(SemanticSearchResponse::greeting_only(plan.greeting));
		}

		let resolved_count = resolved.len();
		let query = self.embed_prompt(prompt).await?;

		tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Embedding finished.");

		let retrieved = self.retrieve_all(&query, resolved).await;

		tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Retrieval finished.");

		let groups = self.validate_all(prompt, retrieved).await;
		let results = aggregate::aggregate(groups);

		tracing::info!(
			planned = plan.categories.len(),
			resolved = resolved_count,
			groups = results.len(),
			products = results.iter().map(|group| group.products.len()).sum::<usize>(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Semantic product search finished."
		);

		Ok(SemanticSearchResponse { message: plan.greeting, results })
	}

	/// Retrieves every resolved category concurrently. A category whose retrieval fails is
	/// omitted.
	async fn retrieve_all(
		&self,
		query: &[f32],
		resolved: Vec<ResolvedCategory>,
	) -> Vec<(ResolvedCategory, Vec<Candidate>)> {
		let concurrency = self.cfg.pipeline.retrieval_concurrency.max(1) as usize;
		let settled: Vec<_> = stream::iter(resolved)
			.map(|category| self.retrieve_for(query, category))
			.buffered(concurrency)
			.collect()
			.await;

		settled.into_iter().flatten().collect()
	}

	async fn retrieve_for(
		&self,
		query: &[f32],
		resolved: ResolvedCategory,
	) -> Option<(ResolvedCategory, Vec<Candidate>)> {
		match self.retrieve_candidates(resolved.category.id, query, resolved.count).await {
			Ok(candidates) => Some((resolved, candidates)),
			Err(err) => {
				tracing::warn!(
					category = %resolved.category.name,
					error = %err,
					"Omitting category after retrieval failure."
				);

				None
			},
		}
	}

	/// Validates all candidates of all groups through one bounded stream and regroups the
	/// verdicts in retrieval order.
	async fn validate_all(
		&self,
		prompt: &str,
		retrieved: Vec<(ResolvedCategory, Vec<Candidate>)>,
	) -> Vec<(ResolvedCategory, Vec<ValidatedCandidate>)> {
		let concurrency = self.cfg.pipeline.validation_concurrency.max(1) as usize;
		let mut groups = Vec::with_capacity(retrieved.len());
		let mut jobs = Vec::new();

		for (group, (resolved, candidates)) in retrieved.into_iter().enumerate() {
			groups.push((resolved, Vec::with_capacity(candidates.len())));
			jobs.extend(candidates.into_iter().map(|candidate| ValidationJob { group, candidate }));
		}

		let settled: Vec<_> = stream::iter(jobs)
			.map(|job| self.validate_job(prompt, job))
			.buffered(concurrency)
			.collect()
			.await;

		for (group, validated) in settled.into_iter().flatten() {
			if let Some((_, items)) = groups.get_mut(group) {
				items.push(validated);
			}
		}

		groups
	}

	async fn validate_job(
		&self,
		prompt: &str,
		job: ValidationJob,
	) -> Option<(usize, ValidatedCandidate)> {
		let verdict = self.validate_candidate(prompt, &job.candidate).await?;

		Some((
			job.group,
			ValidatedCandidate {
				candidate: job.candidate,
				suitable: verdict.suitable,
				reason: verdict.reason,
			},
		))
	}
}
