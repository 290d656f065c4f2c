//! Integration test: service → factory → verifier → mock backend.
//!
//! Every scenario goes through `VerificationService`, the same entry point
//! the HTTP node uses.

use axum::http::StatusCode;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use std::time::Duration;

use credverify_core::translator::UNKNOWN_ERROR_MESSAGE;
use credverify_core::{CheckResult, ErrorTranslator, VerificationConfig};
use credverify_integration_tests::{closed_endpoint, MockBackend, MockReply};
use credverify_verifiers::{
    VerificationRequest, VerificationService, VerificationSettings, VerifierFactory,
    TRANSPORT_FAILURE_MESSAGE,
};

fn service() -> VerificationService {
    service_with(VerificationSettings::default())
}

fn service_with(settings: VerificationSettings) -> VerificationService {
    VerificationService::new(VerifierFactory::new(&settings).expect("valid settings"))
}

fn sample_credential() -> serde_json::Value {
    json!({
        "@context": ["https://www.w3.org/ns/credentials/v2"],
        "type": ["VerifiableCredential", "BenefitEligibility"],
        "issuer": "did:cord:issuer",
        "credentialSubject": {"id": "did:cord:holder", "income": "low"}
    })
}

// =========================================================================
// Remote API backend
// =========================================================================

#[tokio::test]
async fn test_backend_success_echoes_checks() {
    let backend = MockBackend::start(MockReply::json(json!({
        "checks": [{"title": "x", "isValid": true}]
    })))
    .await;

    let result = service()
        .verify_credential(
            sample_credential(),
            VerificationConfig::online("api").with_endpoint(backend.endpoint()),
        )
        .await;

    assert!(result.success);
    assert_eq!(result.message, "Credential verified successfully.");
    assert!(result.errors.is_none());
    assert_eq!(
        result.checks,
        Some(vec![CheckResult {
            title: "x".into(),
            status: true
        }])
    );
    assert_eq!(backend.hits(), 1);
    assert_eq!(backend.last_body(), Some(sample_credential()));
    assert!(backend.last_authorization().is_none());
}

#[tokio::test]
async fn test_backend_failure_is_translated() {
    let backend = MockBackend::start(MockReply::json(json!({
        "error": [{"message": "Failed to verify CordProof2024"}]
    })))
    .await;

    let result = service()
        .verify_credential(
            sample_credential(),
            VerificationConfig::online("api").with_endpoint(backend.endpoint()),
        )
        .await;

    assert!(!result.success);
    assert_eq!(result.message, "Credential verification failed.");
    let errors = result.errors.expect("errors present on failure");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].raw, "Failed to verify CordProof2024");
    assert_eq!(
        errors[0].error,
        ErrorTranslator::new().translate("Failed to verify CordProof2024")
    );
    assert!(result.checks.is_none());
}

#[tokio::test]
async fn test_failed_checks_and_errors_combined() {
    let backend = MockBackend::start(MockReply::json(json!({
        "checks": [
            {"title": "proof", "isValid": true},
            {"message": "Error verifyDisclosedAttributes", "isValid": false}
        ],
        "error": {"message": "backend internals leaked"}
    })))
    .await;

    let result = service()
        .verify_credential(
            sample_credential(),
            VerificationConfig::online("api").with_endpoint(backend.endpoint()),
        )
        .await;

    let errors = result.errors.expect("errors");
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].raw, "Error verifyDisclosedAttributes");
    assert_eq!(errors[1].raw, "backend internals leaked");
    assert_eq!(errors[1].error, UNKNOWN_ERROR_MESSAGE);
    assert!(errors.iter().all(|e| e.error != "backend internals leaked"));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let endpoint = closed_endpoint();
    let result = service()
        .verify_credential(
            sample_credential(),
            VerificationConfig::online("api").with_endpoint(endpoint),
        )
        .await;

    assert!(!result.success);
    assert_eq!(result.message, TRANSPORT_FAILURE_MESSAGE);
    let errors = result.errors.expect("errors");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error, errors[0].raw);
}

#[tokio::test]
async fn test_non_2xx_without_failures_is_transport_error() {
    let backend =
        MockBackend::start(MockReply::raw(StatusCode::SERVICE_UNAVAILABLE, "maintenance")).await;

    let result = service()
        .verify_credential(
            sample_credential(),
            VerificationConfig::online("api").with_endpoint(backend.endpoint()),
        )
        .await;

    assert_eq!(result.message, TRANSPORT_FAILURE_MESSAGE);
    assert_eq!(
        result.errors.expect("errors")[0].raw,
        "backend returned HTTP 503 Service Unavailable"
    );
    assert_eq!(backend.hits(), 1);
}

#[tokio::test]
async fn test_non_2xx_with_reported_errors_is_backend_failure() {
    let backend = MockBackend::start(
        MockReply::json(json!({"error": [{"message": "Failed to verify CordProof2024"}]}))
            .with_status(StatusCode::BAD_REQUEST),
    )
    .await;

    let result = service()
        .verify_credential(
            sample_credential(),
            VerificationConfig::online("api").with_endpoint(backend.endpoint()),
        )
        .await;

    assert_eq!(result.message, "Credential verification failed.");
    assert_eq!(result.errors.expect("errors")[0].raw, "Failed to verify CordProof2024");
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let backend = MockBackend::start(
        MockReply::json(json!({"checks": []})).delayed(Duration::from_secs(5)),
    )
    .await;
    let settings = VerificationSettings {
        timeout_secs: 1,
        ..Default::default()
    };

    let started = std::time::Instant::now();
    let result = service_with(settings)
        .verify_credential(
            sample_credential(),
            VerificationConfig::online("api").with_endpoint(backend.endpoint()),
        )
        .await;

    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(!result.success);
    assert_eq!(result.message, TRANSPORT_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_dropped_verification_abandons_backend_call() {
    let backend = MockBackend::start(
        MockReply::json(json!({"checks": []})).delayed(Duration::from_secs(2)),
    )
    .await;
    let svc = service();

    let outcome = tokio::time::timeout(
        Duration::from_millis(500),
        svc.verify_credential(
            sample_credential(),
            VerificationConfig::online("api").with_endpoint(backend.endpoint()),
        ),
    )
    .await;
    assert!(outcome.is_err(), "caller deadline should fire first");

    // Outlive the backend delay: the abandoned handler must not finish.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(backend.hits(), 1);
    assert_eq!(backend.completed(), 0);
}

// =========================================================================
// Trust-issuer backend
// =========================================================================

#[tokio::test]
async fn test_expired_credential_never_reaches_backend() {
    let backend = MockBackend::start(MockReply::json(json!({}))).await;

    let result = service()
        .verify_credential(
            json!({"validUntil": "2000-01-01"}),
            VerificationConfig::online("dhiway").with_endpoint(backend.endpoint()),
        )
        .await;

    assert!(!result.success);
    let errors = result.errors.expect("errors");
    assert_eq!(errors[0].raw, "VC expiration check failed");
    assert_eq!(errors[0].error, "The credential has expired and is no longer valid.");
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn test_no_expiry_field_calls_backend_once() {
    let backend = MockBackend::start(MockReply::json(json!({
        "checks": [{"title": "proof", "isValid": true}]
    })))
    .await;

    let result = service()
        .verify_credential(
            sample_credential(),
            VerificationConfig::online("dhiway").with_endpoint(backend.endpoint()),
        )
        .await;

    assert!(result.success);
    assert_eq!(result.message, "Credential verified successfully.");
    assert!(result.checks.is_none());
    assert!(result.errors.is_none());
    assert_eq!(backend.hits(), 1);
}

#[tokio::test]
async fn test_future_expiry_calls_backend() {
    let backend = MockBackend::start(MockReply::json(json!({"error": []}))).await;
    let valid_until = (Utc::now() + ChronoDuration::days(30)).to_rfc3339();

    let result = service()
        .verify_credential(
            json!({"id": "urn:vc:7", "validUntil": valid_until}),
            VerificationConfig::online("dhiway").with_endpoint(backend.endpoint()),
        )
        .await;

    assert!(result.success);
    assert_eq!(backend.hits(), 1);
}

#[tokio::test]
async fn test_bearer_token_sent_when_configured() {
    let backend = MockBackend::start(MockReply::json(json!({}))).await;
    let svc = service();

    svc.verify_credential(
        sample_credential(),
        VerificationConfig::online("dhiway")
            .with_endpoint(backend.endpoint())
            .with_token("issuer-token"),
    )
    .await;
    assert_eq!(
        backend.last_authorization().as_deref(),
        Some("Bearer issuer-token")
    );

    svc.verify_credential(
        sample_credential(),
        VerificationConfig::online("dhiway").with_endpoint(backend.endpoint()),
    )
    .await;
    assert!(backend.last_authorization().is_none());
    assert_eq!(backend.hits(), 2);
}

#[tokio::test]
async fn test_default_endpoint_and_token_from_settings() {
    let backend = MockBackend::start(MockReply::json(json!({}))).await;
    let mut settings = VerificationSettings::default();
    settings
        .default_endpoints
        .insert("dhiway".into(), backend.endpoint());
    settings
        .default_tokens
        .insert("dhiway".into(), "configured-token".into());

    let result = service_with(settings)
        .verify_credential(sample_credential(), VerificationConfig::online("dhiway"))
        .await;

    assert!(result.success);
    assert_eq!(
        backend.last_authorization().as_deref(),
        Some("Bearer configured-token")
    );
}

#[tokio::test]
async fn test_custom_translations_apply() {
    let backend = MockBackend::start(MockReply::json(json!({
        "error": {"message": "Issuer revoked"}
    })))
    .await;
    let mut settings = VerificationSettings::default();
    settings
        .translations
        .insert("Issuer revoked".into(), "The issuer has revoked this credential.".into());

    let result = service_with(settings)
        .verify_credential(
            sample_credential(),
            VerificationConfig::online("dhiway").with_endpoint(backend.endpoint()),
        )
        .await;

    let errors = result.errors.expect("errors");
    assert_eq!(errors[0].error, "The issuer has revoked this credential.");
    assert_eq!(errors[0].raw, "Issuer revoked");
}

// =========================================================================
// Dispatch and input validation
// =========================================================================

#[tokio::test]
async fn test_method_absent_matches_explicit_online() {
    let backend = MockBackend::start(MockReply::json(json!({"checks": []}))).await;
    let svc = service();

    let explicit = svc
        .verify_credential(
            sample_credential(),
            VerificationConfig::online("api").with_endpoint(backend.endpoint()),
        )
        .await;
    let implicit = svc
        .verify_credential(
            sample_credential(),
            VerificationConfig {
                method: None,
                ..VerificationConfig::online("api").with_endpoint(backend.endpoint())
            },
        )
        .await;

    assert_eq!(explicit, implicit);
    assert_eq!(backend.hits(), 2);
}

#[tokio::test]
async fn test_invalid_credentials_never_reach_backend() {
    let backend = MockBackend::start(MockReply::json(json!({}))).await;
    let svc = service();

    for credential in [json!(null), json!({}), json!([]), json!("vc"), json!(3)] {
        for name in ["api", "dhiway"] {
            let result = svc
                .verify_credential(
                    credential.clone(),
                    VerificationConfig::online(name).with_endpoint(backend.endpoint()),
                )
                .await;
            assert!(!result.success);
        }
    }

    let missing = svc
        .verify(VerificationRequest {
            credential: None,
            config: VerificationConfig::online("api").with_endpoint(backend.endpoint()),
        })
        .await;
    assert!(!missing.success);
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn test_unknown_backend_makes_no_calls() {
    let backend = MockBackend::start(MockReply::json(json!({}))).await;

    let result = service()
        .verify_credential(
            sample_credential(),
            VerificationConfig::online("doesnotexist").with_endpoint(backend.endpoint()),
        )
        .await;

    assert!(!result.success);
    assert!(result.message.contains("unknown online verifier: doesnotexist"));
    assert!(result.errors.is_none());
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn test_unknown_method() {
    let result = service()
        .verify_credential(
            sample_credential(),
            VerificationConfig {
                method: Some("carrierpigeon".into()),
                ..Default::default()
            },
        )
        .await;

    assert!(!result.success);
    assert!(result.message.contains("unknown verification method"));
}

#[tokio::test]
async fn test_offline_signature_placeholder() {
    let result = service()
        .verify_credential(sample_credential(), VerificationConfig::offline())
        .await;

    assert!(!result.success);
    assert_eq!(result.message, "Credential verification using signature failed.");
    assert_eq!(result.error_count(), 1);
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let ok = MockBackend::start(MockReply::json(json!({"checks": []}))).await;
    let bad = MockBackend::start(MockReply::json(json!({
        "error": [{"message": "Failed to verify CordProof2024"}]
    })))
    .await;
    let svc = std::sync::Arc::new(service());

    let mut handles = Vec::new();
    for i in 0..10 {
        let svc = std::sync::Arc::clone(&svc);
        let endpoint = if i % 2 == 0 { ok.endpoint() } else { bad.endpoint() };
        handles.push(tokio::spawn(async move {
            let result = svc
                .verify_credential(
                    sample_credential(),
                    VerificationConfig::online("api").with_endpoint(endpoint),
                )
                .await;
            (i, result)
        }));
    }

    for handle in handles {
        let (i, result) = handle.await.expect("task");
        assert_eq!(result.success, i % 2 == 0);
    }
    assert_eq!(ok.hits(), 5);
    assert_eq!(bad.hits(), 5);
}
