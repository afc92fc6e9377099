//! Schema-validated generation.
//!
//! Composes the gateway with the shared payload validator: a JSON response
//! that violates its [`PayloadKind`] schema triggers a re-prompt with a
//! corrective instruction, up to a bounded number of tries. Only validation
//! failures are retried here; gateway errors propagate at once.

use crate::error::DebateError;
use crate::gateway::GenerationGateway;
use crate::ports::generation_backend::{GenerationBackend, GenerationRequest};
use mad_domain::{DebatePromptTemplate, PayloadKind, validate};
use serde_json::Value;
use tracing::{debug, warn};

/// Generate a JSON payload that satisfies `kind`.
///
/// Each retry appends the corrective instruction to the original prompt,
/// never to an already-corrected one. After `max_attempts` tries the last
/// violation is returned as [`DebateError::SchemaValidation`] together with
/// the last raw response; a partially valid payload is never returned.
pub async fn generate_with_validation<B: GenerationBackend + 'static>(
    gateway: &GenerationGateway<B>,
    request: &GenerationRequest,
    kind: PayloadKind,
    max_attempts: u32,
) -> Result<Value, DebateError> {
    let attempts = max_attempts.max(1);
    let mut current = request.clone();

    for attempt in 1..=attempts {
        let reply = gateway.generate_json_reply(&current).await?;
        let value = reply.value;

        let violation = match validate(&value, kind) {
            Ok(()) => {
                if attempt > 1 {
                    debug!("{} payload repaired on attempt {}", kind, attempt);
                }
                return Ok(value);
            }
            Err(violation) => violation,
        };

        if attempt == attempts {
            warn!(
                "{} payload still invalid after {} attempts: {}",
                kind, attempts, violation
            );
            return Err(DebateError::SchemaValidation {
                kind,
                violation,
                attempts,
                raw: reply.raw,
            });
        }

        warn!(
            "{} payload invalid ({}), re-prompting [{}/{}]",
            kind, violation, attempt, attempts
        );
        let suffix = DebatePromptTemplate::corrective_suffix(kind, &violation.to_string());
        current = request.with_prompt(format!("{}{}", request.prompt, suffix));
    }

    Err(DebateError::illegal_state("validation loop ended without a result"))
}
