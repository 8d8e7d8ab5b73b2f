// ============================================================================
// Structures du fil + validation
// ============================================================================
// L'API renvoie des nombres tantôt en JSON number, tantôt en chaîne ("1500"),
// des identifiants numériques ou textuels, des réponses enveloppées dans
// { "data": ... } ou non. On parse d'abord vers des structures "souples"
// qui acceptent ces variations, puis on valide vers les types du domaine.
//
// Une réponse qui ne respecte pas le schéma échoue ICI, bruyamment, avec le
// nom du champ fautif, au lieu de propager des valeurs absentes jusque dans
// les calculs.
//
// CONCEPT RUST : #[serde(deserialize_with = "...")]
// - Remplace la désérialisation d'un champ par une fonction maison
// - Combiné avec #[serde(default)] pour les champs optionnels
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::api::error::ApiError;
use crate::models::{
    Allocation, Bundle, Deal, DealStatus, DealSummary, DealType, InvestmentRef, ListingStatus,
    Offer, SecondaryListing, Seller, Spv, WalletBalance,
};

// ============================================================================
// Désérialiseurs souples
// ============================================================================

/// Nombre en JSON number ou en chaîne numérique ; null/"" -> None
fn loose_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("nombre invalide : {:?}", s))),
        Some(other) => Err(D::Error::custom(format!("nombre attendu, trouvé : {}", other))),
    }
}

/// Identifiant en chaîne ou en nombre
fn loose_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("identifiant invalide : {}", other))),
    }
}

fn loose_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("identifiant invalide : {}", other))),
    }
}

// ============================================================================
// Enveloppes
// ============================================================================

/// Retire l'enveloppe { "data": ... } si présente
pub(crate) fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Extrait une liste : [..], { "data": [..] }, { "<key>": [..] } ou
/// { "data": { "<key>": [..] } }
pub(crate) fn unwrap_list(value: Value, key: &str) -> Result<Vec<Value>, ApiError> {
    match unwrap_data(value) {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ApiError::malformed(key, "liste attendue")),
        },
        _ => Err(ApiError::malformed(key, "liste attendue")),
    }
}

/// Extrait un objet : { "data": { "<key>": {..} } }, { "<key>": {..} } ou {..}
pub(crate) fn unwrap_object(value: Value, key: &str) -> Value {
    match unwrap_data(value) {
        Value::Object(mut map) if map.get(key).map_or(false, Value::is_object) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Message d'une enveloppe d'erreur ({ "message": ... } ou { "error": ... })
pub(crate) fn error_message(value: &Value) -> Option<String> {
    let text = |v: &Value| v.as_str().map(str::to_string);

    value
        .get("message")
        .and_then(text)
        .or_else(|| value.get("error").and_then(text))
        .or_else(|| value.get("error").and_then(|e| e.get("message")).and_then(text))
}

/// Parse une valeur en structure du fil, en nommant le champ en cas d'échec
fn from_value<T: for<'de> Deserialize<'de>>(value: Value, field: &str) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::malformed(field, e.to_string()))
}

// ============================================================================
// Validation commune
// ============================================================================

fn non_negative(value: Option<f64>, field: &str) -> Result<Option<f64>, ApiError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(ApiError::malformed(field, format!("valeur négative ou non finie : {}", v)))
        }
        other => Ok(other),
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ApiError::malformed(field, "champ requis manquant")),
    }
}

fn whole_number(value: Option<f64>, field: &str) -> Result<Option<u64>, ApiError> {
    Ok(non_negative(value, field)?.map(|v| v.round() as u64))
}

// ============================================================================
// Deals
// ============================================================================

#[derive(Debug, Deserialize)]
struct WireSpv {
    #[serde(default, deserialize_with = "loose_opt_id", alias = "_id")]
    id: Option<String>,
    #[serde(default, deserialize_with = "loose_f64")]
    total_shares: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    issued_shares: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    share_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireDeal {
    #[serde(deserialize_with = "loose_id", alias = "_id")]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "type", alias = "deal_type")]
    deal_type: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default, deserialize_with = "loose_f64")]
    min_ticket: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    target_amount: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    raised_amount: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    investor_count: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    expected_roi: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    expected_irr: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    holding_period_months: Option<f64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    images: Option<Vec<String>>,
    #[serde(default)]
    spv: Option<WireSpv>,
    #[serde(default, alias = "closingDate", alias = "end_date")]
    closing_date: Option<DateTime<Utc>>,
}

fn validate_spv(wire: WireSpv, field: &str) -> Result<Spv, ApiError> {
    Ok(Spv {
        id: required_text(wire.id, &format!("{}.id", field))?,
        total_shares: non_negative(wire.total_shares, &format!("{}.total_shares", field))?,
        issued_shares: non_negative(wire.issued_shares, &format!("{}.issued_shares", field))?,
        share_price: non_negative(wire.share_price, &format!("{}.share_price", field))?,
    })
}

fn validate_deal(wire: WireDeal, field: &str) -> Result<Deal, ApiError> {
    let f = |name: &str| format!("{}.{}", field, name);

    let holding = whole_number(wire.holding_period_months, &f("holding_period_months"))?
        .map(|m| u32::try_from(m).unwrap_or(u32::MAX));

    Ok(Deal {
        id: wire.id,
        title: required_text(wire.title, &f("title"))?,
        deal_type: wire
            .deal_type
            .as_deref()
            .map(DealType::from_wire)
            .unwrap_or(DealType::Other),
        location: wire.location.filter(|l| !l.trim().is_empty()),
        min_ticket: non_negative(wire.min_ticket, &f("min_ticket"))?,
        target_amount: non_negative(wire.target_amount, &f("target_amount"))?,
        raised_amount: non_negative(wire.raised_amount, &f("raised_amount"))?,
        investor_count: whole_number(wire.investor_count, &f("investor_count"))?,
        expected_roi: wire.expected_roi.filter(|v| v.is_finite()),
        expected_irr: wire.expected_irr.filter(|v| v.is_finite()),
        holding_period_months: holding,
        status: wire
            .status
            .as_deref()
            .map(DealStatus::from_wire)
            .unwrap_or(DealStatus::Other),
        images: wire.images.unwrap_or_default(),
        spv: wire.spv.map(|spv| validate_spv(spv, &f("spv"))).transpose()?,
        closing_date: wire.closing_date,
    })
}

/// Parse la réponse de GET /deals
pub fn parse_deals(value: Value) -> Result<Vec<Deal>, ApiError> {
    unwrap_list(value, "deals")?
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let field = format!("deals[{}]", i);
            let wire: WireDeal = from_value(item, &field)?;
            validate_deal(wire, &field)
        })
        .collect()
}

/// Parse la réponse de GET /deals/:id
pub fn parse_deal(value: Value) -> Result<Deal, ApiError> {
    let wire: WireDeal = from_value(unwrap_object(value, "deal"), "deal")?;
    validate_deal(wire, "deal")
}

// ============================================================================
// Marché secondaire
// ============================================================================

/// Le vendeur est tantôt un nom, tantôt un objet
///
/// CONCEPT RUST : #[serde(untagged)]
/// - Serde essaie chaque variant dans l'ordre jusqu'à ce qu'un match
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireSeller {
    Name(String),
    Object {
        #[serde(default, deserialize_with = "loose_opt_id", alias = "_id")]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default, alias = "firstName")]
        first_name: Option<String>,
        #[serde(default, alias = "lastName")]
        last_name: Option<String>,
    },
}

impl WireSeller {
    fn into_seller(self) -> Seller {
        match self {
            WireSeller::Name(name) => Seller { id: None, name },
            WireSeller::Object { id, name, first_name, last_name } => {
                let name = name.unwrap_or_else(|| {
                    [first_name, last_name]
                        .into_iter()
                        .flatten()
                        .collect::<Vec<_>>()
                        .join(" ")
                });
                Seller {
                    id,
                    name: if name.trim().is_empty() { "Anonymous".to_string() } else { name },
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireDealSummary {
    #[serde(deserialize_with = "loose_id", alias = "_id")]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "type", alias = "deal_type")]
    deal_type: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default, deserialize_with = "loose_f64")]
    expected_roi: Option<f64>,
    #[serde(default)]
    spv: Option<WireSpv>,
}

#[derive(Debug, Deserialize)]
struct WireInvestment {
    #[serde(deserialize_with = "loose_id", alias = "_id")]
    id: String,
    deal: WireDealSummary,
}

#[derive(Debug, Deserialize)]
struct WireOffer {
    #[serde(deserialize_with = "loose_id", alias = "_id")]
    id: String,
    #[serde(default)]
    buyer: Option<WireSeller>,
    #[serde(default, deserialize_with = "loose_f64", alias = "offerPrice")]
    offer_price: Option<f64>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireListing {
    #[serde(deserialize_with = "loose_id", alias = "_id")]
    id: String,
    seller: Option<WireSeller>,
    investment: Option<WireInvestment>,
    #[serde(default, deserialize_with = "loose_f64")]
    shares_for_sale: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    price_per_share: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    total_price: Option<f64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    offers: Option<Vec<WireOffer>>,
}

fn validate_listing(wire: WireListing, field: &str) -> Result<SecondaryListing, ApiError> {
    let f = |name: &str| format!("{}.{}", field, name);

    let investment = wire
        .investment
        .ok_or_else(|| ApiError::malformed(f("investment"), "champ requis manquant"))?;
    let deal = investment.deal;
    let share_price = match deal.spv {
        Some(spv) => non_negative(spv.share_price, &f("investment.deal.spv.share_price"))?,
        None => None,
    };

    let shares_for_sale = non_negative(wire.shares_for_sale, &f("shares_for_sale"))?
        .ok_or_else(|| ApiError::malformed(f("shares_for_sale"), "champ requis manquant"))?;
    let price_per_share = non_negative(wire.price_per_share, &f("price_per_share"))?;

    // Prix total absent : dérivé du prix unitaire
    let total_price = match non_negative(wire.total_price, &f("total_price"))? {
        Some(total) => Some(total),
        None => price_per_share.map(|p| p * shares_for_sale),
    };

    let offers = wire
        .offers
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, offer)| {
            let offer_field = format!("{}.offers[{}]", field, i);
            Ok(Offer {
                id: offer.id,
                buyer: offer.buyer.map(|b| b.into_seller().name),
                offer_price: non_negative(offer.offer_price, &format!("{}.offer_price", offer_field))?
                    .ok_or_else(|| ApiError::malformed(&offer_field, "offer_price manquant"))?,
                status: offer.status.unwrap_or_else(|| "pending".to_string()),
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(SecondaryListing {
        id: wire.id,
        seller: wire
            .seller
            .map(WireSeller::into_seller)
            .ok_or_else(|| ApiError::malformed(f("seller"), "champ requis manquant"))?,
        investment: InvestmentRef {
            id: investment.id,
            deal: DealSummary {
                id: deal.id,
                title: required_text(deal.title, &f("investment.deal.title"))?,
                deal_type: deal
                    .deal_type
                    .as_deref()
                    .map(DealType::from_wire)
                    .unwrap_or(DealType::Other),
                location: deal.location,
                expected_roi: deal.expected_roi.filter(|v| v.is_finite()),
                share_price,
            },
        },
        shares_for_sale,
        price_per_share,
        total_price,
        status: wire
            .status
            .as_deref()
            .map(ListingStatus::from_wire)
            .unwrap_or(ListingStatus::Other),
        created_at: wire.created_at,
        offers,
    })
}

/// Parse la réponse de GET /secondary-market/listings
pub fn parse_listings(value: Value) -> Result<Vec<SecondaryListing>, ApiError> {
    unwrap_list(value, "listings")?
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let field = format!("listings[{}]", i);
            let wire: WireListing = from_value(item, &field)?;
            validate_listing(wire, &field)
        })
        .collect()
}

// ============================================================================
// Bundles
// ============================================================================

#[derive(Debug, Deserialize)]
struct WireAllocation {
    #[serde(deserialize_with = "loose_id", alias = "dealId")]
    deal_id: String,
    #[serde(default, deserialize_with = "loose_f64", alias = "percentage")]
    weight: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireBundle {
    #[serde(deserialize_with = "loose_id", alias = "_id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "loose_f64")]
    expected_roi: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    min_investment: Option<f64>,
    #[serde(default)]
    allocation: Option<Vec<WireAllocation>>,
}

/// Parse la réponse de GET /bundles
pub fn parse_bundles(value: Value) -> Result<Vec<Bundle>, ApiError> {
    unwrap_list(value, "bundles")?
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let field = format!("bundles[{}]", i);
            let wire: WireBundle = from_value(item, &field)?;

            let allocation = wire
                .allocation
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(j, a)| {
                    let weight_field = format!("{}.allocation[{}].weight", field, j);
                    Ok(Allocation {
                        deal_id: a.deal_id,
                        weight: non_negative(a.weight, &weight_field)?
                            .ok_or_else(|| ApiError::malformed(&weight_field, "champ requis manquant"))?,
                    })
                })
                .collect::<Result<Vec<_>, ApiError>>()?;

            Ok(Bundle {
                id: wire.id,
                name: required_text(wire.name, &format!("{}.name", field))?,
                description: wire.description,
                expected_roi: wire.expected_roi.filter(|v| v.is_finite()),
                min_investment: non_negative(wire.min_investment, &format!("{}.min_investment", field))?,
                allocation,
            })
        })
        .collect()
}

// ============================================================================
// Portefeuille et accusés de réception
// ============================================================================

#[derive(Debug, Deserialize)]
struct WireWallet {
    #[serde(default, deserialize_with = "loose_f64", rename = "availableBalance", alias = "available_balance")]
    available_balance: Option<f64>,
}

/// Parse la réponse de GET /wallet/balance : { wallet: { availableBalance } }
pub fn parse_wallet(value: Value) -> Result<WalletBalance, ApiError> {
    let wire: WireWallet = from_value(unwrap_object(value, "wallet"), "wallet")?;
    let balance = non_negative(wire.available_balance, "wallet.availableBalance")?
        .ok_or_else(|| ApiError::malformed("wallet.availableBalance", "champ requis manquant"))?;
    Ok(WalletBalance::new(balance))
}

/// Accusé de réception d'une écriture (investissement, offre...)
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub id: Option<String>,
    pub message: Option<String>,
}

pub fn parse_receipt(value: Value) -> Receipt {
    let message = value.get("message").and_then(Value::as_str).map(str::to_string);
    let data = unwrap_data(value);
    let id = ["id", "_id"]
        .iter()
        .find_map(|key| data.get(*key))
        .and_then(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
    Receipt { id, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deal_json() -> Value {
        json!({
            "id": 12,
            "title": "Marina Heights 2BR",
            "type": "real_estate",
            "location": "Dubai Marina",
            "min_ticket": "500",
            "target_amount": 200000,
            "raised_amount": "50000.50",
            "investor_count": 37,
            "expected_roi": 8.5,
            "expected_irr": null,
            "holding_period_months": 36,
            "status": "open",
            "images": ["a.jpg"],
            "spv": { "id": "spv-12", "total_shares": 2000, "issued_shares": "500", "share_price": 100 }
        })
    }

    #[test]
    fn test_parse_deals_accepts_loose_numbers_and_envelope() {
        let deals = parse_deals(json!({ "success": true, "data": [deal_json()] })).unwrap();
        assert_eq!(deals.len(), 1);

        let deal = &deals[0];
        assert_eq!(deal.id, "12");
        assert_eq!(deal.deal_type, DealType::RealEstate);
        assert_eq!(deal.min_ticket, Some(500.0));
        assert_eq!(deal.raised_amount, Some(50000.5));
        assert_eq!(deal.expected_irr, None);
        assert_eq!(deal.investor_count, Some(37));
        assert_eq!(deal.spv_id(), Some("spv-12"));
        assert_eq!(deal.spv.as_ref().unwrap().shares_available(), Some(1500.0));
    }

    #[test]
    fn test_parse_deals_named_list() {
        let deals = parse_deals(json!({ "data": { "deals": [deal_json(), deal_json()] } })).unwrap();
        assert_eq!(deals.len(), 2);

        let bare = parse_deals(json!([deal_json()])).unwrap();
        assert_eq!(bare.len(), 1);
    }

    #[test]
    fn test_malformed_deal_fails_loudly_with_field_name() {
        let mut bad = deal_json();
        bad["min_ticket"] = json!("five hundred");
        match parse_deals(json!([deal_json(), bad])) {
            Err(ApiError::Malformed { field, .. }) => assert_eq!(field, "deals[1]"),
            other => panic!("expected Malformed, got {:?}", other),
        }

        let mut negative = deal_json();
        negative["target_amount"] = json!(-5);
        match parse_deal(json!({ "data": negative })) {
            Err(ApiError::Malformed { field, .. }) => assert_eq!(field, "deal.target_amount"),
            other => panic!("expected Malformed, got {:?}", other),
        }

        let mut untitled = deal_json();
        untitled["title"] = json!("  ");
        assert!(parse_deal(untitled).is_err());
    }

    #[test]
    fn test_parse_listings() {
        let value = json!({
            "listings": [{
                "id": "l-1",
                "seller": { "_id": 4, "firstName": "Noor", "lastName": "A." },
                "investment": {
                    "id": "inv-1",
                    "deal": { "id": "d-1", "title": "Shawarma Co. Franchise", "type": "franchise",
                              "expected_roi": "14", "spv": { "id": "s", "share_price": "100" } }
                },
                "shares_for_sale": 10,
                "price_per_share": "90",
                "status": "active",
                "created_at": "2026-03-01T10:00:00Z",
                "offers": [{ "id": "o-1", "offerPrice": 850, "status": "pending", "buyer": "Ali" }]
            }]
        });

        let listings = parse_listings(value).unwrap();
        let listing = &listings[0];
        assert_eq!(listing.seller.name, "Noor A.");
        assert_eq!(listing.seller.id.as_deref(), Some("4"));
        assert_eq!(listing.total_price, Some(900.0));
        assert_eq!(listing.discount_percent(), Some(10.0));
        assert_eq!(listing.status, ListingStatus::Active);
        assert_eq!(listing.offers[0].offer_price, 850.0);
        assert_eq!(listing.offers[0].buyer.as_deref(), Some("Ali"));
    }

    #[test]
    fn test_listing_without_investment_is_malformed() {
        let value = json!([{ "id": "l-1", "seller": "Omar", "shares_for_sale": 1 }]);
        match parse_listings(value) {
            Err(ApiError::Malformed { field, .. }) => assert_eq!(field, "listings[0].investment"),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_wallet() {
        let wallet = parse_wallet(json!({ "wallet": { "availableBalance": "1000" } })).unwrap();
        assert_eq!(wallet.available_balance, 1000.0);

        assert!(parse_wallet(json!({ "wallet": {} })).is_err());
    }

    #[test]
    fn test_parse_bundles() {
        let bundles = parse_bundles(json!({ "data": [{
            "id": "b-1",
            "name": "Gulf Income",
            "expected_roi": 9,
            "min_investment": "1000",
            "allocation": [{ "dealId": 1, "weight": 60 }, { "deal_id": "2", "percentage": "40" }]
        }]}))
        .unwrap();

        assert_eq!(bundles[0].allocation.len(), 2);
        assert_eq!(bundles[0].allocation[0].deal_id, "1");
        assert_eq!(bundles[0].total_weight(), 100.0);
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(&json!({ "message": "Insufficient balance" })).as_deref(),
            Some("Insufficient balance")
        );
        assert_eq!(
            error_message(&json!({ "error": { "message": "Listing closed" } })).as_deref(),
            Some("Listing closed")
        );
        assert_eq!(error_message(&json!({ "ok": false })), None);
    }

    #[test]
    fn test_parse_receipt() {
        let receipt = parse_receipt(json!({ "message": "Investment created", "data": { "_id": 99 } }));
        assert_eq!(receipt.id.as_deref(), Some("99"));
        assert_eq!(receipt.message.as_deref(), Some("Investment created"));
    }
}
