pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid input: {message}")]
	InvalidInput { message: String },
	#[error("Precondition failed: {message}")]
	Precondition { message: String },
	#[error("Upstream error: {message}")]
	Upstream { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<shop_storage::Error> for Error {
	fn from(err: shop_storage::Error) -> Self {
		match err {
			shop_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			shop_storage::Error::InvalidArgument(message) => Self::Storage { message },
		}
	}
}
