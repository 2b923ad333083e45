//! Orchestrates rationale generation: rate limiting, prompt-budget
//! shrinking, the LLM call itself, response validation, and the
//! deterministic template fallback.

use crate::client::LlmClient;
use crate::prompt::{assemble_prompt, prompt_token_cost};
use crate::template::generate_template_rationale;
use selscore_core::config::{defaults, env, token_budgets};
use selscore_core::evidence::{rank_evidence_for_rationale, Evidence};
use selscore_core::fusion::SkillWeights;
use selscore_core::rationale::{Rationale, RationaleGenerator};
use selscore_core::skill::Skill;
use selscore_ratelimit::RateLimiter;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct LlmRationaleBody {
    narrative: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    growth_suggestions: Vec<String>,
}

pub struct RationaleGeneratorService {
    client: Arc<dyn LlmClient>,
    rate_limiter: Arc<RateLimiter>,
    model_family: String,
}

impl RationaleGeneratorService {
    pub fn new(client: Arc<dyn LlmClient>, rate_limiter: Arc<RateLimiter>, model_family: impl Into<String>) -> Self {
        Self {
            client,
            rate_limiter,
            model_family: model_family.into(),
        }
    }

    /// Generate a rationale for `skill` at `fused_score`, citing `evidence`
    /// (re-ranked here by `weight × relevance × source_confidence`, most
    /// relevant first). Always succeeds: any failure along the LLM path
    /// (rate limit, transport, malformed response) falls back to the
    /// deterministic template.
    pub async fn generate(
        &self,
        skill: Skill,
        fused_score: f64,
        evidence: &[Evidence],
        weights: &SkillWeights,
        caller_key: &str,
    ) -> Rationale {
        let ranked = rank_evidence_for_rationale(evidence.to_vec(), weights);
        match self.try_llm(skill, fused_score, &ranked, caller_key).await {
            Ok(rationale) => rationale,
            Err(reason) => {
                tracing::info!(skill = skill.as_str(), reason = %reason, "falling back to template rationale");
                generate_template_rationale(skill, fused_score)
            }
        }
    }

    async fn try_llm(
        &self,
        skill: Skill,
        fused_score: f64,
        evidence: &[Evidence],
        caller_key: &str,
    ) -> Result<Rationale, String> {
        if let Err(retry_after) = self.rate_limiter.acquire(caller_key) {
            return Err(format!("rate limited, retry after {retry_after:.2}s"));
        }

        let budget = token_budgets::budget_for(&self.model_family);
        let prompt = self.fit_prompt_to_budget(skill, fused_score, evidence, budget)?;

        let deadline = Duration::from_secs(env::llm_call_deadline_secs());
        let raw_response = tokio::time::timeout(deadline, self.client.complete(&prompt))
            .await
            .map_err(|_| "LLM call exceeded its deadline".to_string())?
            .map_err(|err| err.to_string())?;

        self.parse_response(&raw_response)
    }

    /// Halve the evidence count across retries (per
    /// `defaults::EVIDENCE_BUDGET_SEQUENCE`) until the assembled prompt
    /// fits `budget` tokens, or give up after the sequence is exhausted.
    fn fit_prompt_to_budget(
        &self,
        skill: Skill,
        fused_score: f64,
        evidence: &[Evidence],
        budget: usize,
    ) -> Result<String, String> {
        for &count in defaults::EVIDENCE_BUDGET_SEQUENCE.iter() {
            let count = count.min(evidence.len().max(1));
            let cost = prompt_token_cost(skill, fused_score, evidence, count);
            if cost <= budget {
                return Ok(assemble_prompt(skill, fused_score, evidence, count));
            }
        }
        Err("prompt could not be shrunk to fit the model's token budget".to_string())
    }

    fn parse_response(&self, raw_response: &str) -> Result<Rationale, String> {
        let body: LlmRationaleBody = serde_json::from_str(raw_response)
            .map_err(|err| format!("malformed LLM response: {err}"))?;

        if body.narrative.trim().is_empty() {
            return Err("LLM response had an empty narrative".to_string());
        }

        Ok(Rationale {
            narrative: Rationale::trim_narrative(&body.narrative),
            strengths: Rationale::cap_list(body.strengths),
            growth_suggestions: Rationale::cap_list(body.growth_suggestions),
            generator: RationaleGenerator::Llm,
            tokens_consumed: crate::tokenizer::estimate_tokens(raw_response),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use selscore_core::error::Result as SelResult;
    use selscore_core::evidence::EvidenceSource;
    use selscore_ratelimit::RateLimitConfig;

    struct StubClient {
        response: Result<String, String>,
    }

    #[async_trait]
    impl LlmClient for StubClient {
        async fn complete(&self, _prompt: &str) -> SelResult<String> {
            self.response
                .clone()
                .map_err(|message| selscore_core::error::SelError::LlmTransportFailure { message })
        }
    }

    fn sample_evidence() -> Vec<Evidence> {
        vec![Evidence {
            source: EvidenceSource::Model,
            skill: Skill::Empathy,
            normalized_score: 0.7,
            relevance: 1.0,
            provenance: "ref-1".into(),
            captured_at: Utc::now(),
        }]
    }

    fn sample_weights() -> SkillWeights {
        std::collections::HashMap::from([("ml_inference".to_string(), 1.0)])
    }

    fn generous_limiter() -> Arc<RateLimiter> {
        Arc::new(RateLimiter::new(
            "test",
            RateLimitConfig {
                calls_per_minute: 100,
                calls_per_hour: 1000,
                burst_size: 100,
            },
        ))
    }

    #[tokio::test]
    async fn uses_llm_response_when_well_formed() {
        let body = r#"{"narrative":"Strong empathy shown this term.","strengths":["kindness"],"growth_suggestions":["practice listening"]}"#;
        let service = RationaleGeneratorService::new(
            Arc::new(StubClient {
                response: Ok(body.to_string()),
            }),
            generous_limiter(),
            "default".to_string(),
        );
        let rationale = service.generate(Skill::Empathy, 0.8, &sample_evidence(), &sample_weights(), "caller-1").await;
        assert_eq!(rationale.generator, RationaleGenerator::Llm);
        assert_eq!(rationale.narrative, "Strong empathy shown this term.");
    }

    #[tokio::test]
    async fn falls_back_to_template_on_transport_failure() {
        let service = RationaleGeneratorService::new(
            Arc::new(StubClient {
                response: Err("connection refused".to_string()),
            }),
            generous_limiter(),
            "default".to_string(),
        );
        let rationale = service.generate(Skill::Empathy, 0.8, &sample_evidence(), &sample_weights(), "caller-1").await;
        assert_eq!(rationale.generator, RationaleGenerator::Template);
    }

    #[tokio::test]
    async fn falls_back_to_template_on_malformed_response() {
        let service = RationaleGeneratorService::new(
            Arc::new(StubClient {
                response: Ok("not json".to_string()),
            }),
            generous_limiter(),
            "default".to_string(),
        );
        let rationale = service.generate(Skill::Empathy, 0.8, &sample_evidence(), &sample_weights(), "caller-1").await;
        assert_eq!(rationale.generator, RationaleGenerator::Template);
    }

    #[tokio::test]
    async fn falls_back_to_template_when_rate_limited() {
        let limiter = Arc::new(RateLimiter::new(
            "test",
            RateLimitConfig {
                calls_per_minute: 1,
                calls_per_hour: 1,
                burst_size: 1,
            },
        ));
        let service = RationaleGeneratorService::new(
            Arc::new(StubClient {
                response: Ok(r#"{"narrative":"n","strengths":[],"growth_suggestions":[]}"#.to_string()),
            }),
            limiter,
            "default".to_string(),
        );
        // exhaust the limiter for this caller
        let _ = service.generate(Skill::Empathy, 0.8, &sample_evidence(), &sample_weights(), "caller-2").await;
        let rationale = service.generate(Skill::Empathy, 0.8, &sample_evidence(), &sample_weights(), "caller-2").await;
        assert_eq!(rationale.generator, RationaleGenerator::Template);
    }
}
