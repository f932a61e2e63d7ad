//! The instruction template for hot-deal extraction.

/// Default instructions sent alongside an uploaded hotel contract.
///
/// Asks for a single JSON object with a `hot_deals` list in the export
/// schema, plus the pricing and exclusivity rules the normalizer checks.
pub const DEFAULT_INSTRUCTIONS: &str = r#"You write travel deals for a tour operator.
The attached document is a hotel rates contract. It may describe the hotel
(name, address, star rating, description, rates, validity periods, room types),
promotions and special offers, inclusions such as meals, transfers, activities
or honeymoon bonuses, and wedding or event packages.

Build marketing-ready hot deal packages from the special offers and wedding
packages in the contract. A deal built from special offers has an empty
wedding_packages list; a deal built from a wedding package has an empty
special_offers list. Never mix the two in one deal.

Reply with one JSON object and nothing else, shaped like this:

{
  "hot_deals": [
    {
      "name": "string",
      "deal_type": "limited_time | price_drop | popular_choice | exclusive_access | best_value | trending | seasonal_special | weekend_escape | extended_stay | flight_package | wedding",
      "hotel": {
        "name": "string",
        "address": "string",
        "rating": number,
        "price": number,
        "image": "image URL, or null",
        "url": "booking or official site URL, or null",
        "description": "string"
      },
      "description": "string",
      "marketing_headline": "short catchy title",
      "marketing_subtitle": "one line on savings and appeal",
      "urgency_message": "short call to book now",
      "original_display_price": number,
      "discounted_display_price": number,
      "savings_percentage": number,
      "valid_from": "YYYY-MM-DD",
      "valid_until": "YYYY-MM-DD",
      "booking_deadline": "YYYY-MM-DD",
      "minimum_nights": integer,
      "maximum_nights": integer or null,
      "travel_dates_from": "YYYY-MM-DD",
      "travel_dates_until": "YYYY-MM-DD",
      "deal_inclusions": [
        {"title": "string", "description": "string", "category": "bonus | meal | activity | loyalty | honeymoon"}
      ],
      "meal_plans": [
        {"name": "string", "adult_price": number or null, "child_price": number or null, "infant_free": boolean, "description": "string"}
      ],
      "special_offers": [
        {"code": "string or null", "title": "string", "description": "string", "min_nights": integer, "max_free_nights": integer, "valid_from": "YYYY-MM-DD", "valid_until": "YYYY-MM-DD", "combined_with": ["code or title of another offer in this deal"]}
      ],
      "wedding_packages": [
        {"name": "string", "base_price": number or null, "comissionable": boolean, "min_guests": integer, "description": "string", "code": "string or null"}
      ]
    }
  ]
}

Rules:
- Fill gaps from context where the contract allows it, e.g. estimate the star rating.
- original_display_price must be higher than discounted_display_price.
- savings_percentage is (original - discounted) / original * 100.
- Put every inclusion in the closest category.
- When a meal plan applies to a deal, included or at extra cost, list it.
- Use null for anything the contract does not support; do not invent dates.
- Headlines and urgency messages should be persuasive and create a sense of scarcity.
- Vary deal_type across deals.
"#;
