use hot_deals::model::OpenEnum;
use hot_deals::model::RuleViolation;
use hot_deals::prelude::*;
use serde_json::{json, Value};
use std::sync::Mutex;

struct MemoryStore {
    uploads: Mutex<Vec<String>>,
}

impl MemoryStore {
    fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn upload(
        &self,
        bytes: &[u8],
        mime_type: &str,
        display_name: &str,
    ) -> Result<DocumentHandle, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError("empty document".to_string()));
        }
        let mut uploads = self.uploads.lock().unwrap();
        let id = format!("files/{}", uploads.len());
        uploads.push(id.clone());
        Ok(DocumentHandle {
            id,
            display_name: display_name.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    async fn delete(&self, handle: &DocumentHandle) -> Result<(), UploadError> {
        self.uploads.lock().unwrap().retain(|id| id != &handle.id);
        Ok(())
    }
}

enum Reply {
    Text(String),
    Transport,
}

struct FakeModel(Reply);

#[async_trait::async_trait]
impl InferenceClient for FakeModel {
    async fn generate(&self, request: InferenceRequest<'_>) -> Result<String, InferenceError> {
        assert_eq!(request.document.display_name, "Uploaded PDF");
        match &self.0 {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Transport => Err(InferenceError::Transport("connection reset".to_string())),
        }
    }
}

fn orchestrator(reply: Reply) -> ExtractionOrchestrator<MemoryStore, FakeModel> {
    ExtractionOrchestrator::new(MemoryStore::new(), FakeModel(reply))
}

fn full_deal() -> Value {
    json!({
        "name": "Honeymoon in Paradise",
        "deal_type": "limited_time",
        "hotel": {
            "name": "Coral Bay Resort",
            "address": "1 Beach Road, Mahé",
            "rating": 4.5,
            "price": 180.0,
            "image": "https://example.com/coral.jpg",
            "url": "https://example.com/coral",
            "description": "Beachfront villas"
        },
        "description": "Seven nights for the price of five.",
        "marketing_headline": "Escape to Paradise - 25% Off",
        "marketing_subtitle": "Save big on your dream getaway",
        "urgency_message": "Only a few villas left!",
        "original_display_price": 200.0,
        "discounted_display_price": 150.0,
        "savings_percentage": 25.0,
        "valid_from": "2025-01-01",
        "valid_until": "2025-03-31",
        "booking_deadline": "2025-02-15",
        "minimum_nights": 3,
        "maximum_nights": 14,
        "travel_dates_from": "2025-01-10",
        "travel_dates_until": "2025-04-30",
        "deal_inclusions": [
            {"title": "Sunset cruise", "description": "For two", "category": "activity"},
            {"title": "Champagne on arrival", "description": null, "category": "honeymoon"}
        ],
        "meal_plans": [
            {"name": "Half Board", "adult_price": 45.0, "child_price": 20.0, "infant_free": true, "description": "Breakfast and dinner"}
        ],
        "special_offers": [
            {"code": "S7P5", "title": "Stay 7 Pay 5", "description": null, "min_nights": 7, "max_free_nights": 2, "valid_from": "2025-01-01", "valid_until": "2025-03-31", "combined_with": [1]},
            {"code": "EB", "title": "Early Bird", "description": "Book 60 days ahead", "min_nights": 1, "max_free_nights": 0, "valid_from": null, "valid_until": null, "combined_with": []}
        ],
        "wedding_packages": []
    })
}

#[tokio::test]
async fn test_round_trip_reproduces_every_field() {
    let response = format!("```json\n{}\n```", json!({"hot_deals": [full_deal()]}));
    let result = orchestrator(Reply::Text(response))
        .process(b"%PDF-1.7", "application/pdf")
        .await
        .unwrap();
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);

    let exported: Value = serde_json::from_str(&EditableProjection::from(result).export_json().unwrap()).unwrap();
    assert_eq!(exported, json!({"hot_deals": [full_deal()]}));
}

#[tokio::test]
async fn test_transport_error_propagates_untouched() {
    let orchestrator = orchestrator(Reply::Transport);
    let handle = orchestrator.upload(b"%PDF", "application/pdf").await.unwrap();
    let err = orchestrator.extract_default(&handle).await.unwrap_err();
    match err {
        ExtractionError::Inference(InferenceError::Transport(message)) => {
            assert_eq!(message, "connection reset");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_error_stops_processing() {
    let err = orchestrator(Reply::Text("{}".to_string()))
        .process(b"", "application/pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractionError::Upload(_)));
}

#[tokio::test]
async fn test_unparsable_response_keeps_raw_text() {
    let text = "Sorry, I cannot read this contract.";
    let err = orchestrator(Reply::Text(text.to_string()))
        .process(b"%PDF", "application/pdf")
        .await
        .unwrap_err();
    assert_eq!(err.raw_text(), Some(text));
    assert!(matches!(err, ExtractionError::Normalization(_)));
}

#[tokio::test]
async fn test_processing_cleans_up_the_upload() {
    let orchestrator = orchestrator(Reply::Text(r#"{"hot_deals": []}"#.to_string()));
    let result = orchestrator.process(b"%PDF", "application/pdf").await.unwrap();
    assert!(result.packages.is_empty());
    assert!(orchestrator.store().uploads.lock().unwrap().is_empty());

    let handle = orchestrator.upload(b"%PDF", "application/pdf").await.unwrap();
    orchestrator.extract_default(&handle).await.unwrap();
    // A manual upload stays until the caller deletes it.
    assert_eq!(*orchestrator.store().uploads.lock().unwrap(), vec![handle.id]);
}

#[test]
fn test_defaults_and_required_fields() {
    let result = normalize(
        r#"{"hot_deals": [
            {"name": "Weekend Escape", "hotel": {"name": "City Inn"}},
            {"deal_type": "weekend_escape", "hotel": {"name": "City Inn"}}
        ]}"#,
    )
    .unwrap();

    assert_eq!(result.packages.len(), 1);
    let deal = &result.packages[0].deal;
    assert_eq!(deal.minimum_nights, 1);
    assert!(deal.deal_type.is_none());

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].deal_index, Some(1));
    match &result.warnings[0].issue {
        Issue::Rejected(err) => {
            assert!(matches!(err, FieldError::Validation { .. }));
            assert_eq!(err.path(), "name");
        }
        other => panic!("unexpected issue {other:?}"),
    }
}

#[test]
fn test_one_entity_per_deal_in_order() {
    let deals: Vec<Value> = (0..5)
        .map(|i| json!({"name": format!("Deal {i}"), "hotel": {"name": "H"}}))
        .collect();
    let result = normalize(&json!({"hot_deals": deals}).to_string()).unwrap();
    let names: Vec<String> = result.packages.iter().map(|p| p.deal.name.clone()).collect();
    assert_eq!(names, ["Deal 0", "Deal 1", "Deal 2", "Deal 3", "Deal 4"]);
}

#[test]
fn test_savings_mismatch_is_flagged_not_rejected() {
    let result = normalize(
        &json!({"hot_deals": [{
            "name": "Price Drop",
            "hotel": {"name": "H"},
            "original_display_price": 200,
            "discounted_display_price": 150,
            "savings_percentage": 40
        }]})
        .to_string(),
    )
    .unwrap();

    assert_eq!(result.packages.len(), 1);
    assert_eq!(result.warnings.len(), 1);
    assert!(matches!(
        result.warnings[0].issue,
        Issue::Rule(RuleViolation::SavingsMismatch { .. })
    ));
}

#[test]
fn test_unknown_vocabulary_survives_export() {
    let result = normalize(
        r#"{"hot_deals": [{"name": "Flash", "deal_type": "Flash Sale", "hotel": {"name": "H"},
            "deal_inclusions": [{"title": "Spa", "category": "wellness"}]}]}"#,
    )
    .unwrap();
    let deal = &result.packages[0].deal;
    assert_eq!(deal.deal_type, Some(OpenEnum::Unknown("Flash Sale".to_string())));

    let exported: Value = serde_json::from_str(&EditableProjection::from(result).export_json().unwrap()).unwrap();
    assert_eq!(exported["hot_deals"][0]["deal_type"], "Flash Sale");
    assert_eq!(exported["hot_deals"][0]["deal_inclusions"][0]["category"], "wellness");
}

#[test]
fn test_combined_offers_resolve_within_the_deal() {
    let result = normalize(&json!({"hot_deals": [full_deal()]}).to_string()).unwrap();
    let package = &result.packages[0];

    let partners: Vec<&str> = package.combined_offers(0).map(|offer| offer.label()).collect();
    assert_eq!(partners, ["Early Bird"]);
    assert_eq!(package.combined_offers(1).count(), 0);
}

#[test]
fn test_failed_edit_is_not_partially_applied() {
    let result = normalize(&json!({"hot_deals": [full_deal()]}).to_string()).unwrap();
    let mut projection = EditableProjection::from(result);
    let before = projection.export_json().unwrap();

    let err = projection.update_field(0, "hotel.rating", json!("five")).unwrap_err();
    assert!(matches!(err, FieldError::Validation { .. }));
    assert_eq!(projection.export_json().unwrap(), before);
}

#[test]
fn test_price_increase_keeps_negative_savings() {
    let result = normalize(
        &json!({"hot_deals": [{
            "name": "Peak Season",
            "hotel": {"name": "H"},
            "original_display_price": 100,
            "discounted_display_price": 120,
            "savings_percentage": -20
        }]})
        .to_string(),
    )
    .unwrap();

    assert_eq!(result.packages[0].deal.savings_percentage, Some(-20.0));
    let issues: Vec<&Issue> = result.warnings.iter().map(|w| &w.issue).collect();
    assert_eq!(issues.len(), 1, "{:?}", result.warnings);
    assert!(matches!(issues[0], Issue::Rule(RuleViolation::DiscountAboveOriginal { .. })));

    let mut projection = EditableProjection::from(result);
    let exported: Value = serde_json::from_str(&projection.export_json().unwrap()).unwrap();
    assert_eq!(exported["hot_deals"][0]["savings_percentage"], -20.0);

    projection.update_field(0, "savings_percentage", json!(-25)).unwrap();
    assert_eq!(projection.get_deal_packages()[0].deal.savings_percentage, Some(-25.0));
}

#[test]
fn test_zero_maximum_nights_is_kept_and_flagged() {
    let result = normalize(
        r#"{"hot_deals": [{"name": "Day Use", "hotel": {"name": "H"}, "maximum_nights": 0}]}"#,
    )
    .unwrap();

    assert_eq!(result.packages[0].deal.maximum_nights, Some(0));
    assert_eq!(result.warnings.len(), 1);
    assert!(matches!(
        result.warnings[0].issue,
        Issue::Rule(RuleViolation::NightsOutOfOrder { minimum: 1, maximum: 0 })
    ));
}

#[test]
fn test_unpadded_date_is_downgraded_and_refused_on_edit() {
    let result = normalize(
        r#"{"hot_deals": [{"name": "Early Bird", "hotel": {"name": "H"}, "valid_from": "2025-1-5"}]}"#,
    )
    .unwrap();

    assert_eq!(result.packages[0].deal.valid_from, None);
    assert!(matches!(
        &result.warnings[0].issue,
        Issue::Field(FieldError::DateFormat { value, .. }) if value == "2025-1-5"
    ));

    let mut projection = EditableProjection::from(result);
    let err = projection.update_field(0, "valid_from", json!("2025-1-5")).unwrap_err();
    assert!(matches!(err, FieldError::DateFormat { .. }));
    projection.update_field(0, "valid_from", json!("2025-01-05")).unwrap();
}
