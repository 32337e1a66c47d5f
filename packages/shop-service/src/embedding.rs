use std::time::Duration;

use crate::{
	Error, Result, ShopService,
	retry::{self, CallError},
};
use shop_domain::vector;

impl ShopService {
	/// Embeds the shopper prompt once. The vector must match the configured dimension.
	pub(crate) async fn embed_prompt(&self, prompt: &str) -> Result<Vec<f32>> {
		let embed_cfg = &self.cfg.providers.embedding;
		let embedding = &self.providers.embedding;
		let texts = [prompt.to_string()];
		let texts = texts.as_slice();
		let timeout = Duration::from_millis(embed_cfg.timeout_ms);
		let mut vectors =
			retry::with_retry(&self.cfg.retry, timeout, "prompt_embedding", move || async move {
				Ok::<_, CallError>(embedding.embed(embed_cfg, texts).await?)
			})
			.await
			.map_err(|err| Error::Upstream { message: format!("Prompt embedding failed: {err}") })?;
		let Some(vector) = vectors.pop().filter(|_| vectors.is_empty()) else {
			return Err(Error::Upstream {
				message: "Embedding provider must return exactly one vector.".to_string(),
			});
		};

		check_dimensions(&vector, embed_cfg.dimensions)?;

		Ok(vector)
	}
}

fn check_dimensions(vector: &[f32], expected: u32) -> Result<()> {
	vector::check_embedding(vector, expected)
		.map_err(|reason| Error::Upstream { message: reason.to_string() })
}
