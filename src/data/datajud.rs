//! DataJud API integration (public court-records search endpoint).
//!
//! The endpoint is an Elasticsearch `_search` facade: we POST a fixed query
//! (match_all, capped size, explicit `_source` field list) with an API-key
//! header and read case records out of the hits.
//!
//! Field extraction is deliberately tolerant: the upstream index is not
//! uniform, so claim values arrive as numbers, numeric strings, or not at
//! all, and are coerced to 0 rather than failing the batch (zero-value
//! records are later removed by the minimum-claim filter).

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::RawCase;
use crate::error::AppError;

const BASE_URL: &str = "https://api-publica.datajud.cnj.jus.br/api_publica_stj/_search";
const PAGE_SIZE: usize = 50;

const SOURCE_FIELDS: [&str; 5] = [
    "classeProcessual.nome",
    "valorDaCausa",
    "dataAjuizamento",
    "assunto",
    "tribunal.nome",
];

pub struct DatajudClient {
    client: Client,
    api_key: String,
}

impl DatajudClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("DATAJUD_API_KEY")
            .map_err(|_| AppError::new(2, "Missing DATAJUD_API_KEY in environment (.env)."))?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }

    /// Fetch one page of case records.
    ///
    /// `asof` anchors the duration computation (days from filing to `asof`);
    /// records without a parsable filing date keep `duration_days = None` so
    /// the enrichment stage fills them.
    pub fn fetch_cases(&self, asof: NaiveDate) -> Result<Vec<RawCase>, AppError> {
        let query = json!({
            "size": PAGE_SIZE,
            "query": { "match_all": {} },
            "_source": SOURCE_FIELDS,
        });

        let resp = self
            .client
            .post(BASE_URL)
            .header("Authorization", format!("APIKey {}", self.api_key))
            .json(&query)
            .send()
            .map_err(|e| AppError::new(4, format!("DataJud request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("DataJud request failed with status {}.", resp.status()),
            ));
        }

        let body: SearchResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse DataJud response: {e}")))?;

        let cases: Vec<RawCase> = body
            .hits
            .hits
            .into_iter()
            .map(|hit| source_to_raw(&hit.source, asof))
            .collect();

        if cases.is_empty() {
            return Err(AppError::new(4, "DataJud returned 0 hits for the query."));
        }

        Ok(cases)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: Value,
}

/// Map one `_source` document to a raw case.
pub fn source_to_raw(source: &Value, asof: NaiveDate) -> RawCase {
    let category = name_of(&source["classeProcessual"]);
    let court = name_of(&source["tribunal"]);
    let subject = name_of(&source["assunto"]);

    let claim_value = coerce_claim_value(&source["valorDaCausa"]);

    let filed_date = source["dataAjuizamento"]
        .as_str()
        .and_then(parse_filed_date);
    let duration_days = filed_date
        .map(|d| (asof - d).num_days().max(0));

    RawCase {
        category,
        claim_value,
        duration_days,
        strategy: None,
        outcome: None,
        court,
        subject,
        filed_date,
    }
}

/// Coerce a claim value that may be a number, a numeric string, or absent.
pub fn coerce_claim_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Parse the filing timestamp; the index mixes ISO datetimes and bare dates.
pub fn parse_filed_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    for fmt in ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

// `assunto` can be an object, an array of objects, or a plain string.
fn name_of(value: &Value) -> Option<String> {
    let name = match value {
        Value::Object(map) => map.get("nome").and_then(Value::as_str),
        Value::Array(items) => items
            .first()
            .and_then(|v| v.get("nome"))
            .and_then(Value::as_str),
        Value::String(s) => Some(s.as_str()),
        _ => None,
    };
    name.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asof() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[test]
    fn coerce_handles_numbers_strings_and_garbage() {
        assert_eq!(coerce_claim_value(&json!(50_000.5)), 50_000.5);
        assert_eq!(coerce_claim_value(&json!("120000.00")), 120_000.0);
        assert_eq!(coerce_claim_value(&json!("85000,50")), 85_000.5);
        assert_eq!(coerce_claim_value(&json!("not a number")), 0.0);
        assert_eq!(coerce_claim_value(&json!(null)), 0.0);
        assert_eq!(coerce_claim_value(&json!(-100.0)), 0.0);
        assert_eq!(coerce_claim_value(&Value::Null), 0.0);
    }

    #[test]
    fn filed_date_accepts_both_index_formats() {
        assert_eq!(
            parse_filed_date("2020-01-15T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(2020, 1, 15)
        );
        assert_eq!(
            parse_filed_date("2020-01-15T10:30:00"),
            NaiveDate::from_ymd_opt(2020, 1, 15)
        );
        assert_eq!(parse_filed_date("2020-01-15"), NaiveDate::from_ymd_opt(2020, 1, 15));
        assert_eq!(parse_filed_date("15/01/2020"), None);
    }

    #[test]
    fn source_mapping_computes_duration_from_filing() {
        let source = json!({
            "classeProcessual": { "nome": "Recurso Especial" },
            "valorDaCausa": "500000.00",
            "dataAjuizamento": "2023-03-05T00:00:00.000Z",
            "tribunal": { "nome": "STJ" },
            "assunto": [ { "nome": "Direito Civil" } ],
        });

        let raw = source_to_raw(&source, asof());
        assert_eq!(raw.category.as_deref(), Some("Recurso Especial"));
        assert_eq!(raw.claim_value, 500_000.0);
        assert_eq!(raw.court.as_deref(), Some("STJ"));
        assert_eq!(raw.subject.as_deref(), Some("Direito Civil"));

        let expected = (asof() - NaiveDate::from_ymd_opt(2023, 3, 5).unwrap()).num_days();
        assert_eq!(raw.duration_days, Some(expected));
        assert!(raw.strategy.is_none());
        assert!(raw.outcome.is_none());
    }

    #[test]
    fn missing_fields_degrade_to_defaults() {
        let raw = source_to_raw(&json!({}), asof());
        assert!(raw.category.is_none());
        assert_eq!(raw.claim_value, 0.0);
        assert!(raw.duration_days.is_none());
        assert!(raw.filed_date.is_none());
    }

    #[test]
    fn future_filing_date_clamps_duration_to_zero() {
        let source = json!({
            "valorDaCausa": 1_000.0,
            "dataAjuizamento": "2030-01-01T00:00:00.000Z",
        });
        let raw = source_to_raw(&source, asof());
        assert_eq!(raw.duration_days, Some(0));
    }
}
