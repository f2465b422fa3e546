//! Toll amount extraction
//!
//! Toll responses come in several shapes. Each shape has a pure strategy;
//! strategies run in priority order and the first positive amount wins:
//!
//! 1. top-level `total_cost`
//! 2. top-level `total_toll`
//! 3. top-level `toll`
//! 4. `route.toll_cost`
//! 5. sum over a top-level `tolls` array
//! 6. one element of a `routes` array
//! 7. first positive number under a key mentioning toll, cost, amount or price
//!
//! A body matching none of them is [`TollResponseShape::Unrecognized`], which
//! prices the route at zero. A toll-free route looks the same.

use serde_json::{Map, Value};

/// Recognized response shape with the amount it yielded
#[derive(Debug, Clone, PartialEq)]
pub enum TollResponseShape {
    /// `{"total_cost": n}`
    TotalCost(f64),
    /// `{"total_toll": n}`
    TotalToll(f64),
    /// `{"toll": n}`
    TopLevelToll(f64),
    /// `{"route": {"toll_cost": n}}`
    RouteCost(f64),
    /// `{"tolls": [{"amount": n}, ...]}`
    TollsArray(f64),
    /// `{"routes": [{"tolls": [...], "costs": {...}}, ...]}`
    RoutesArray(f64),
    /// Any top-level key that looks like a price
    KeyScan {
        /// Matching key
        key: String,
        /// Its value
        amount: f64,
    },
    /// Nothing positive found
    Unrecognized,
}

type Strategy = fn(&Map<String, Value>) -> Option<TollResponseShape>;

const STRATEGIES: [Strategy; 7] = [
    total_cost,
    total_toll,
    top_level_toll,
    route_cost,
    tolls_array,
    routes_array,
    key_scan,
];

/// Fields holding a segment price, in preference order
const SEGMENT_PRICE_FIELDS: [&str; 5] = ["amount", "price", "cost", "tagCost", "cashCost"];

const PRICE_KEY_FRAGMENTS: [&str; 4] = ["toll", "cost", "amount", "price"];

impl TollResponseShape {
    /// Classify a parsed response body
    #[must_use]
    pub fn classify(body: &Value) -> Self {
        let Some(object) = body.as_object() else {
            return Self::Unrecognized;
        };
        STRATEGIES
            .iter()
            .find_map(|strategy| strategy(object))
            .unwrap_or(Self::Unrecognized)
    }

    /// Extracted amount; zero when unrecognized
    #[must_use]
    pub fn amount(&self) -> f64 {
        match self {
            Self::TotalCost(a)
            | Self::TotalToll(a)
            | Self::TopLevelToll(a)
            | Self::RouteCost(a)
            | Self::TollsArray(a)
            | Self::RoutesArray(a)
            | Self::KeyScan { amount: a, .. } => *a,
            Self::Unrecognized => 0.0,
        }
    }

    /// Short label for logs
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TotalCost(_) => "total_cost",
            Self::TotalToll(_) => "total_toll",
            Self::TopLevelToll(_) => "toll",
            Self::RouteCost(_) => "route.toll_cost",
            Self::TollsArray(_) => "tolls[]",
            Self::RoutesArray(_) => "routes[]",
            Self::KeyScan { .. } => "key_scan",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// A JSON number greater than zero
fn positive_number(value: Option<&Value>) -> Option<f64> {
    value
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite() && *n > 0.0)
}

/// A number, or a string holding one
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|n: &f64| n.is_finite())
}

/// JSON truthiness: not null, false, zero or empty string
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// First present, non-null field among `fields`, coerced to a number
fn first_price(item: &Value, fields: &[&str]) -> f64 {
    fields
        .iter()
        .find_map(|f| item.get(*f).filter(|v| !v.is_null()))
        .and_then(numeric)
        .unwrap_or(0.0)
}

fn non_empty_array(value: Option<&Value>) -> Option<&Vec<Value>> {
    value.and_then(Value::as_array).filter(|a| !a.is_empty())
}

fn total_cost(body: &Map<String, Value>) -> Option<TollResponseShape> {
    positive_number(body.get("total_cost")).map(TollResponseShape::TotalCost)
}

fn total_toll(body: &Map<String, Value>) -> Option<TollResponseShape> {
    positive_number(body.get("total_toll")).map(TollResponseShape::TotalToll)
}

fn top_level_toll(body: &Map<String, Value>) -> Option<TollResponseShape> {
    positive_number(body.get("toll")).map(TollResponseShape::TopLevelToll)
}

fn route_cost(body: &Map<String, Value>) -> Option<TollResponseShape> {
    positive_number(body.get("route").and_then(|r| r.get("toll_cost")))
        .map(TollResponseShape::RouteCost)
}

fn tolls_array(body: &Map<String, Value>) -> Option<TollResponseShape> {
    let tolls = non_empty_array(body.get("tolls"))?;
    let sum: f64 = tolls
        .iter()
        .map(|t| first_price(t, &["amount", "price", "cost"]))
        .sum();
    (sum > 0.0).then_some(TollResponseShape::TollsArray(sum))
}

fn routes_array(body: &Map<String, Value>) -> Option<TollResponseShape> {
    let routes = non_empty_array(body.get("routes"))?;

    let chosen = routes
        .iter()
        .find(|r| non_empty_array(r.get("tolls")).is_some())
        .or_else(|| {
            routes.iter().find(|r| {
                let costs = r.get("costs");
                truthy(costs.and_then(|c| c.get("tag")))
                    || truthy(costs.and_then(|c| c.get("expressLanes")))
            })
        })
        .unwrap_or(&routes[0]);

    let costs = chosen.get("costs");
    let mut total: f64 = chosen
        .get("tolls")
        .and_then(Value::as_array)
        .map(|tolls| {
            tolls
                .iter()
                .map(|t| first_price(t, &SEGMENT_PRICE_FIELDS))
                .sum()
        })
        .unwrap_or(0.0);

    if total <= 0.0 {
        total = costs
            .and_then(|c| c.get("tag"))
            .and_then(numeric)
            .unwrap_or(0.0);
    }
    if let Some(express) = costs
        .and_then(|c| c.get("expressLanes"))
        .and_then(numeric)
        .filter(|e| *e > 0.0)
    {
        total += express;
    }

    (total > 0.0).then_some(TollResponseShape::RoutesArray(total))
}

fn key_scan(body: &Map<String, Value>) -> Option<TollResponseShape> {
    body.iter().find_map(|(key, value)| {
        let lower = key.to_lowercase();
        if !PRICE_KEY_FRAGMENTS.iter().any(|f| lower.contains(f)) {
            return None;
        }
        positive_number(Some(value)).map(|amount| TollResponseShape::KeyScan {
            key: key.clone(),
            amount,
        })
    })
}
