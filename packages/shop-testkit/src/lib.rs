mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, PgPool,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

/// Environment variable naming a Postgres server with pgvector available.
pub const DSN_ENV: &str = "SHOP_PG_DSN";

const MAINTENANCE_DATABASE: &str = "postgres";

/// A throwaway database on the server named by `SHOP_PG_DSN`. Dropped on `cleanup` or, failing
/// that, when the value goes out of scope.
pub struct TestDatabase {
	name: String,
	dsn: String,
	maintenance: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("{DSN_ENV} is not a valid DSN: {err}.")))?;
		let maintenance = base.clone().database(MAINTENANCE_DATABASE);
		let name = format!("shop_test_{}", Uuid::new_v4().simple());
		let mut conn = PgConnection::connect_with(&maintenance).await?;

		sqlx::query(&format!(r#"CREATE DATABASE "{name}""#)).execute(&mut conn).await?;
		conn.close().await?;

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, maintenance, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.name, &self.maintenance).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let maintenance = self.maintenance.clone();
		// Drop may run inside a runtime that is shutting down; use a private one.
		let handle = thread::spawn(move || {
			let outcome = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| Error::Message(err.to_string()))
				.and_then(|runtime| runtime.block_on(drop_database(&name, &maintenance)));

			if let Err(err) = outcome {
				eprintln!("Failed to drop test database {name}: {err}.");
			}
		});

		let _ = handle.join();
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(DSN_ENV).ok().filter(|dsn| !dsn.trim().is_empty())
}

pub async fn insert_category(pool: &PgPool, name: &str, description: &str) -> Result<Uuid> {
	let id = sqlx::query_scalar::<_, Uuid>(
		"INSERT INTO categories (id, name, description) VALUES ($1, $2, $3) RETURNING id",
	)
	.bind(Uuid::new_v4())
	.bind(name)
	.bind(description)
	.fetch_one(pool)
	.await?;

	Ok(id)
}

/// Inserts a product described as `"{name} description"`. `price` is a decimal literal such as
/// `"49.90"`; `None` leaves the embedding for the backfill worker.
pub async fn insert_product(
	pool: &PgPool,
	category_id: Uuid,
	name: &str,
	price: &str,
	embedding: Option<&[f32]>,
) -> Result<Uuid> {
	let embedding = embedding.map(|values| {
		let joined = values.iter().map(f32::to_string).collect::<Vec<_>>().join(",");

		format!("[{joined}]")
	});
	let id = sqlx::query_scalar::<_, Uuid>(
		"\
INSERT INTO products (id, name, description, price, embedding, category_id)
VALUES ($1, $2, $3, $4::numeric, $5::text::vector, $6)
RETURNING id",
	)
	.bind(Uuid::new_v4())
	.bind(name)
	.bind(format!("{name} description"))
	.bind(price)
	.bind(embedding)
	.bind(category_id)
	.fetch_one(pool)
	.await?;

	Ok(id)
}

async fn drop_database(name: &str, maintenance: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(maintenance).await?;

	sqlx::query(&format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#))
		.execute(&mut conn)
		.await?;
	conn.close().await?;

	Ok(())
}
