//! The provider seam: primary and fallback are two instances of one
//! capability interface, selected by configuration rather than subclassing.

use crate::types::Provider;
use crate::AiError;

/// A text-generation capability. Implementations make one bounded outbound
/// call and return the raw generated text; all response-shape normalization
/// happens above this seam.
pub trait ContentProvider {
    /// Stable identifier for logging and `provider_used` attribution.
    fn provider(&self) -> Provider;

    /// Generate raw text for a prompt.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Http`], [`AiError::Api`], [`AiError::JsonDecode`],
    /// or [`AiError::EmptyResponse`] depending on where the call failed.
    fn generate_text(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, AiError>> + Send;
}
